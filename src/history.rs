//! Price History
//!
//! Turns the submissions for a product into a daily, multi-market series for charting.
//!
//! 1. Submissions outside the [`HistoryWindow`] (or after `now`) are dropped.
//! 2. If more than [`HistoryQuery::max_markets`] markets remain, only the markets with the
//!    most recent submissions are kept (see [`selection`]).
//! 3. The remaining submissions become [`PriceHistoryPoint`]s which are grouped by calendar
//!    day and market into [`DayBucket`]s (see [`buckets`]).

use clap::ValueEnum;
use jiff::{SignedDuration, Timestamp, civil::Date, tz::TimeZone};
use rust_decimal::Decimal;
use smallvec::SmallVec;
use tracing::debug;

use crate::{
    markets::MarketKey,
    products::ProductKey,
    statistics::PriceStatistics,
    store::PriceStore,
    submissions::Quality,
};

pub mod buckets;
pub mod selection;

pub use buckets::{DayBucket, MarketPrice, aggregate_by_day};
pub use selection::{DEFAULT_MAX_MARKETS, select_recent_markets};

/// How far back a history reaches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum HistoryWindow {
    /// Last 7 days
    #[value(name = "7d")]
    Week,

    /// Last 30 days
    #[default]
    #[value(name = "30d")]
    Month,

    /// Last 90 days
    #[value(name = "90d")]
    Quarter,

    /// Everything up to now
    All,
}

impl HistoryWindow {
    /// Window length in days, `None` for [`HistoryWindow::All`].
    pub fn days(self) -> Option<i64> {
        match self {
            HistoryWindow::Week => Some(7),
            HistoryWindow::Month => Some(30),
            HistoryWindow::Quarter => Some(90),
            HistoryWindow::All => None,
        }
    }

    /// Earliest timestamp inside the window ending at `now`.
    pub fn start(self, now: Timestamp) -> Option<Timestamp> {
        let days = self.days()?;

        now.checked_sub(SignedDuration::from_hours(days * 24)).ok()
    }

    /// Returns `true` if `at` lies within `[now - window, now]`.
    pub fn contains(self, at: Timestamp, now: Timestamp) -> bool {
        at <= now && self.start(now).is_none_or(|start| at >= start)
    }
}

/// Parameters for building a [`PriceHistory`].
#[derive(Debug, Clone)]
pub struct HistoryQuery {
    /// Window to include
    pub window: HistoryWindow,

    /// Reference time the window ends at
    pub now: Timestamp,

    /// Time zone calendar days are computed in
    pub time_zone: TimeZone,

    /// Maximum number of markets to chart
    pub max_markets: usize,
}

impl HistoryQuery {
    /// Query for `window` ending at `now`, in UTC, charting up to three markets.
    pub fn new(window: HistoryWindow, now: Timestamp) -> Self {
        Self {
            window,
            now,
            time_zone: TimeZone::UTC,
            max_markets: DEFAULT_MAX_MARKETS,
        }
    }

    /// Compute calendar days in the given time zone.
    #[must_use]
    pub fn with_time_zone(mut self, time_zone: TimeZone) -> Self {
        self.time_zone = time_zone;
        self
    }

    /// Chart at most `max_markets` markets.
    #[must_use]
    pub fn with_max_markets(mut self, max_markets: usize) -> Self {
        self.max_markets = max_markets;
        self
    }
}

/// A single submission projected onto the chart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceHistoryPoint {
    /// Calendar day of the submission
    pub date: Date,

    /// Submission timestamp
    pub timestamp: Timestamp,

    /// Market the price was observed in
    pub market: MarketKey,

    /// Market display name
    pub market_name: String,

    /// Observed price
    pub price: Decimal,

    /// Observed quality
    pub quality: Quality,
}

/// Chart points for a product, filtered to the query window and market selection.
///
/// Points are ordered by ascending timestamp.
pub fn history_points(
    store: &PriceStore,
    product: ProductKey,
    query: &HistoryQuery,
) -> Vec<PriceHistoryPoint> {
    let in_window: Vec<_> = store
        .submissions_for_product(product)
        .filter(|s| query.window.contains(s.submitted_at(), query.now))
        .collect();

    let markets = select_recent_markets(
        in_window.iter().map(|s| (s.market(), s.submitted_at())),
        query.max_markets,
    );

    let mut points: Vec<PriceHistoryPoint> = in_window
        .into_iter()
        .filter(|s| markets.contains(&s.market()))
        .filter_map(|s| {
            let market = store.market(s.market())?;

            Some(PriceHistoryPoint {
                date: s.submitted_at().to_zoned(query.time_zone.clone()).date(),
                timestamp: s.submitted_at(),
                market: s.market(),
                market_name: market.name.clone(),
                price: s.price().amount(),
                quality: s.quality(),
            })
        })
        .collect();

    points.sort_by_key(|point| point.timestamp);

    debug!(
        points = points.len(),
        markets = markets.len(),
        window = ?query.window,
        "collected history points"
    );

    points
}

/// Daily price series for one product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceHistory {
    product: ProductKey,
    markets: SmallVec<[MarketKey; 3]>,
    buckets: Vec<DayBucket>,
}

impl PriceHistory {
    /// Build the history of `product` from the store.
    pub fn build(store: &PriceStore, product: ProductKey, query: &HistoryQuery) -> Self {
        Self::from_points(product, &history_points(store, product, query))
    }

    /// Build a history from pre-selected chart points.
    pub fn from_points(product: ProductKey, points: &[PriceHistoryPoint]) -> Self {
        let mut markets = SmallVec::new();

        for point in points {
            if !markets.contains(&point.market) {
                markets.push(point.market);
            }
        }

        Self {
            product,
            markets,
            buckets: aggregate_by_day(points),
        }
    }

    /// Product the history is for
    pub fn product(&self) -> ProductKey {
        self.product
    }

    /// Charted markets, in order of first appearance
    pub fn markets(&self) -> &[MarketKey] {
        &self.markets
    }

    /// Day buckets, oldest first
    pub fn buckets(&self) -> &[DayBucket] {
        &self.buckets
    }

    /// Returns `true` if there is nothing to chart.
    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Summary statistics over the daily averages.
    pub fn statistics(&self) -> PriceStatistics {
        PriceStatistics::from_buckets(&self.buckets)
    }
}
