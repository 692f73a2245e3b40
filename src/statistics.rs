//! Price Statistics

use std::fmt;

use rust_decimal::Decimal;

use crate::{history::DayBucket, pricing::PriceSummary};

/// Coarse direction of the latest day-over-day move.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Trend {
    /// More than 1% up
    Up,

    /// More than 1% down
    Down,

    /// Within ±1%
    #[default]
    Stable,
}

impl Trend {
    /// Classify a percent change: above `+1` is up, below `-1` is down, anything else is stable.
    pub fn classify(change_percent: Decimal) -> Self {
        if change_percent > Decimal::ONE {
            Trend::Up
        } else if change_percent < Decimal::NEGATIVE_ONE {
            Trend::Down
        } else {
            Trend::Stable
        }
    }

    /// Lowercase label
    pub fn as_str(self) -> &'static str {
        match self {
            Trend::Up => "up",
            Trend::Down => "down",
            Trend::Stable => "stable",
        }
    }
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Summary statistics over a daily price series.
///
/// All fields are zero (and the trend stable) for an empty series.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PriceStatistics {
    /// Latest day's average
    pub current: Decimal,

    /// Previous day's average, or `current` when there is only one day
    pub previous: Decimal,

    /// Mean of the daily averages
    pub average: Decimal,

    /// Lowest daily average
    pub min: Decimal,

    /// Highest daily average
    pub max: Decimal,

    /// `current - previous`
    pub change: Decimal,

    /// `change / previous` in percentage points; zero when `previous` is zero
    pub change_percent: Decimal,

    /// Direction of the latest move
    pub trend: Trend,
}

impl PriceStatistics {
    /// Statistics over an ordered (oldest first) series of daily averages.
    pub fn from_daily_averages(series: &[Decimal]) -> Self {
        let Some((&current, rest)) = series.split_last() else {
            return Self::default();
        };

        let previous = rest.last().copied().unwrap_or(current);
        let summary = PriceSummary::from_prices(series.iter().copied());

        let change = current - previous;
        let change_percent = percent_change(previous, change);

        PriceStatistics {
            current,
            previous,
            average: summary.average,
            min: summary.min,
            max: summary.max,
            change,
            change_percent,
            trend: Trend::classify(change_percent),
        }
    }

    /// Statistics over the averages of a bucketed series.
    pub fn from_buckets(buckets: &[DayBucket]) -> Self {
        let averages: Vec<Decimal> = buckets.iter().map(|bucket| bucket.average).collect();

        Self::from_daily_averages(&averages)
    }
}

/// `change` as a percentage of `previous`; zero when `previous` is zero or on overflow.
pub fn percent_change(previous: Decimal, change: Decimal) -> Decimal {
    if previous.is_zero() {
        return Decimal::ZERO;
    }

    change
        .checked_div(previous)
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
        .unwrap_or(Decimal::ZERO)
}
