//! Synthetic History
//!
//! Generates plausible daily price series for demos and tests. Prices start from a random
//! base inside the product category's band and are shaped by:
//!
//! - a yearly seasonal sinusoid scaled by the category volatility,
//! - a weekend uplift,
//! - a slow linear drift,
//! - per-day noise.
//!
//! Each market only reports on a given day with [`HistoryGenerator::submission_probability`].
//! Results are clamped to the category band and rounded to two decimal places. All randomness
//! comes from the caller's [`Rng`], so a seeded generator gives reproducible output.

use std::f64::consts::TAU;

use decimal_percentage::Percentage;
use jiff::{SignedDuration, Timestamp, civil::Weekday, tz::TimeZone};
use num_traits::{FromPrimitive, ToPrimitive};
use rand::{Rng, seq::SliceRandom};
use rust_decimal::Decimal;
use thiserror::Error;
use tracing::debug;

use crate::{
    markets::MarketKey,
    prices::{Price, PriceError},
    products::ProductKey,
    store::{PriceStore, StoreError},
    submissions::{PriceSubmission, Quality, VerificationStatus},
};

pub mod bands;

pub use bands::CategoryBand;

/// User id recorded on generated submissions.
pub const SYNTHETIC_USER: &str = "synthetic";

const GENERATED_GRADES: [Quality; 3] = [Quality::Excellent, Quality::Good, Quality::Average];

/// Errors generating a synthetic history.
#[derive(Debug, Error)]
pub enum GeneratorError {
    /// Product is not in the store
    #[error("unknown product key")]
    UnknownProduct,

    /// Market is not in the store
    #[error("unknown market key")]
    UnknownMarket,

    /// Product declares no units to quote prices in
    #[error("product {0} declares no units")]
    NoUnits(String),

    /// Timestamp arithmetic left the supported range
    #[error(transparent)]
    Time(#[from] jiff::Error),

    /// A generated price was invalid
    #[error(transparent)]
    Price(#[from] PriceError),

    /// Generated submissions were rejected by the store
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Synthetic price history generator.
#[derive(Debug, Clone)]
pub struct HistoryGenerator {
    /// Chance that a market reports on any given day
    pub submission_probability: Percentage,

    /// Price uplift on Saturdays and Sundays
    pub weekend_uplift: Percentage,

    /// Price drift per elapsed day
    pub daily_drift: Percentage,

    /// Time zone used for weekdays and seasons
    pub time_zone: TimeZone,
}

impl Default for HistoryGenerator {
    fn default() -> Self {
        Self {
            submission_probability: Percentage::from(0.7),
            weekend_uplift: Percentage::from(0.05),
            daily_drift: Percentage::from(0.001),
            time_zone: TimeZone::UTC,
        }
    }
}

impl HistoryGenerator {
    /// Generate `days` days of submissions (ending at `now`) for `product` in each market.
    ///
    /// Submissions are returned oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the product or a market is not in the store.
    pub fn generate<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        store: &PriceStore,
        product: ProductKey,
        markets: &[MarketKey],
        days: u32,
        now: Timestamp,
    ) -> Result<Vec<PriceSubmission>, GeneratorError> {
        let meta = store
            .product(product)
            .ok_or(GeneratorError::UnknownProduct)?;

        let unit = meta
            .default_unit()
            .ok_or_else(|| GeneratorError::NoUnits(meta.id.clone()))?;

        let band = CategoryBand::for_category(meta.category);
        let volatility = ratio(band.volatility);
        let submission_probability = ratio(self.submission_probability).clamp(0.0, 1.0);

        let mut submissions = Vec::new();

        for &market in markets {
            if store.market(market).is_none() {
                return Err(GeneratorError::UnknownMarket);
            }

            let base = rng.gen_range(to_f64(band.min)..=to_f64(band.max));

            for offset in (0..days).rev() {
                let at = now.checked_sub(SignedDuration::from_hours(i64::from(offset) * 24))?;

                if !rng.gen_bool(submission_probability) {
                    continue;
                }

                let elapsed = days - 1 - offset;
                let noise = 1.0 + rng.gen_range(-volatility..=volatility) * 0.5;
                let raw = base * self.multiplier(at, elapsed, volatility) * noise;

                let price = Decimal::from_f64(raw)
                    .map_or(band.min, |price| band.clamp(price))
                    .round_dp(2);

                let quality = GENERATED_GRADES
                    .choose(rng)
                    .copied()
                    .unwrap_or_default();

                submissions.push(
                    PriceSubmission::new(product, market, Price::new(price)?, unit, at)
                        .with_user(SYNTHETIC_USER)
                        .with_quality(quality)
                        .with_status(VerificationStatus::Verified),
                );
            }
        }

        submissions.sort_by_key(PriceSubmission::submitted_at);

        debug!(
            product = %meta.id,
            markets = markets.len(),
            days,
            generated = submissions.len(),
            "generated synthetic history"
        );

        Ok(submissions)
    }

    /// Generate a history and append it to the store.
    ///
    /// # Errors
    ///
    /// Returns an error if generation fails or the store rejects a submission.
    pub fn populate<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        store: &mut PriceStore,
        product: ProductKey,
        markets: &[MarketKey],
        days: u32,
        now: Timestamp,
    ) -> Result<usize, GeneratorError> {
        let submissions = self.generate(rng, store, product, markets, days, now)?;

        Ok(store.extend_submissions(submissions, now)?)
    }

    /// Seasonal, weekend and drift multiplier for a day.
    fn multiplier(&self, at: Timestamp, elapsed: u32, volatility: f64) -> f64 {
        let zoned = at.to_zoned(self.time_zone.clone());

        let season = (TAU * f64::from(zoned.day_of_year()) / 365.0).sin();
        let seasonal = 1.0 + volatility * season;

        let weekend = match zoned.weekday() {
            Weekday::Saturday | Weekday::Sunday => 1.0 + ratio(self.weekend_uplift),
            _ => 1.0,
        };

        let drift = 1.0 + ratio(self.daily_drift) * f64::from(elapsed);

        seasonal * weekend * drift
    }
}

fn ratio(percentage: Percentage) -> f64 {
    to_f64(percentage * Decimal::ONE)
}

fn to_f64(value: Decimal) -> f64 {
    value.to_f64().unwrap_or_default()
}
