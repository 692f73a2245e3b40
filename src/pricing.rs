//! Pricing
//!
//! Small aggregate helpers shared by the history, statistics and listing modules.

use rust_decimal::Decimal;

/// Calculates the arithmetic mean of a sequence of prices.
///
/// Returns `None` when the sequence is empty.
pub fn mean(values: impl IntoIterator<Item = Decimal>) -> Option<Decimal> {
    let mut mean = Mean::default();

    values.into_iter().for_each(|value| mean.push(value));

    mean.value()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Total {
    Sum(Decimal),
    Running(Decimal),
}

impl Default for Total {
    fn default() -> Self {
        Total::Sum(Decimal::ZERO)
    }
}

/// Streaming arithmetic mean.
///
/// Sums exactly while the total fits in a [`Decimal`]; once it would overflow, continues as
/// an incremental mean so very large prices never panic.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Mean {
    total: Total,
    count: usize,
}

impl Mean {
    /// Add a value.
    pub fn push(&mut self, value: Decimal) {
        let previous = Decimal::from(self.count);

        self.count += 1;

        let count = Decimal::from(self.count);

        self.total = match self.total {
            Total::Sum(sum) => match sum.checked_add(value) {
                Some(sum) => Total::Sum(sum),
                // Overflow needs a non-zero sum, so at least one value came before.
                None => Total::Running(step(sum / previous, value, count)),
            },
            Total::Running(mean) => Total::Running(step(mean, value, count)),
        };
    }

    /// Number of values added.
    pub fn count(&self) -> usize {
        self.count
    }

    /// The mean so far, or `None` if nothing was added.
    pub fn value(&self) -> Option<Decimal> {
        if self.count == 0 {
            return None;
        }

        Some(match self.total {
            Total::Sum(sum) => sum / Decimal::from(self.count),
            Total::Running(mean) => mean,
        })
    }
}

// Bounded by the larger of |mean| and |value|.
fn step(mean: Decimal, value: Decimal, count: Decimal) -> Decimal {
    (mean - mean / count).saturating_add(value / count)
}

/// Count, mean and range over a set of prices.
///
/// An empty set summarises to zeros rather than an error, so callers can render "no data".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PriceSummary {
    /// Number of prices summarised
    pub count: usize,

    /// Mean price
    pub average: Decimal,

    /// Lowest price
    pub min: Decimal,

    /// Highest price
    pub max: Decimal,
}

impl PriceSummary {
    /// Summarise a sequence of prices.
    pub fn from_prices(values: impl IntoIterator<Item = Decimal>) -> Self {
        let mut mean = Mean::default();
        let mut range: Option<(Decimal, Decimal)> = None;

        for value in values {
            mean.push(value);

            range = Some(match range {
                Some((min, max)) => (min.min(value), max.max(value)),
                None => (value, value),
            });
        }

        let (Some((min, max)), Some(average)) = (range, mean.value()) else {
            return Self::default();
        };

        PriceSummary {
            count: mean.count(),
            average,
            min,
            max,
        }
    }

    /// Returns `true` if no prices were summarised.
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn mean_of_empty_is_none() {
        assert_eq!(mean([]), None);
    }

    #[test]
    fn mean_of_values() {
        assert_eq!(mean([dec!(9.5), dec!(7.0)]), Some(dec!(8.25)));
    }

    #[test]
    fn summary_of_empty_is_zeroed() {
        let summary = PriceSummary::from_prices([]);

        assert!(summary.is_empty());
        assert_eq!(summary, PriceSummary::default());
        assert_eq!(summary.average, Decimal::ZERO);
    }

    #[test]
    fn summary_tracks_range_and_average() {
        let summary = PriceSummary::from_prices([dec!(8.5), dec!(9.5), dec!(7.0)]);

        assert_eq!(summary.count, 3);
        assert_eq!(summary.min, dec!(7.0));
        assert_eq!(summary.max, dec!(9.5));
        assert_eq!(summary.average, dec!(25) / dec!(3));
    }

    #[test]
    fn mean_survives_sums_beyond_decimal_range() {
        assert_eq!(mean([Decimal::MAX, Decimal::MAX]), Some(Decimal::MAX));

        let summary = PriceSummary::from_prices([Decimal::MAX, Decimal::MAX, Decimal::MAX]);

        assert_eq!(summary.count, 3);
        assert_eq!(summary.min, Decimal::MAX);
        assert_eq!(summary.average, Decimal::MAX);
    }

    #[test]
    fn mean_after_overflow_stays_between_extremes() {
        let half = Decimal::MAX / dec!(2);
        let value = mean([Decimal::MAX, Decimal::MAX, half, half]).unwrap_or_default();

        assert!(value > half && value < Decimal::MAX, "{value}");
    }
}
