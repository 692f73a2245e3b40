//! Day Buckets

use std::collections::BTreeMap;

use jiff::{Timestamp, civil::Date};
use rust_decimal::Decimal;
use smallvec::SmallVec;

use crate::{history::PriceHistoryPoint, markets::MarketKey, pricing::{Mean, mean}};

/// Average price for one market on one day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarketPrice {
    /// Market
    pub market: MarketKey,

    /// Mean of that market's submissions for the day
    pub price: Decimal,
}

/// One calendar day of the price series.
///
/// Markets without a submission that day have no entry; they are gaps, not zeros.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayBucket {
    /// Calendar day
    pub date: Date,

    /// Earliest submission of the day
    pub timestamp: Timestamp,

    /// Per-market averages, in order of first submission that day
    pub prices: SmallVec<[MarketPrice; 3]>,

    /// Mean of the per-market averages
    pub average: Decimal,
}

impl DayBucket {
    /// Average price for `market` on this day, if it reported one.
    pub fn price_for(&self, market: MarketKey) -> Option<Decimal> {
        self.prices
            .iter()
            .find(|p| p.market == market)
            .map(|p| p.price)
    }
}

#[derive(Debug)]
struct DayAccumulator {
    timestamp: Timestamp,
    markets: SmallVec<[(MarketKey, Mean); 3]>,
}

/// Group chart points by calendar day and market.
///
/// Same-day submissions for a market are averaged first, then the day average is taken over
/// the market averages, so a busy market does not outweigh a quiet one. Buckets are ordered
/// by ascending timestamp.
pub fn aggregate_by_day(points: &[PriceHistoryPoint]) -> Vec<DayBucket> {
    let mut days: BTreeMap<Date, DayAccumulator> = BTreeMap::new();

    for point in points {
        let day = days.entry(point.date).or_insert_with(|| DayAccumulator {
            timestamp: point.timestamp,
            markets: SmallVec::new(),
        });

        day.timestamp = day.timestamp.min(point.timestamp);

        match day.markets.iter_mut().find(|(m, _)| *m == point.market) {
            Some((_, mean)) => mean.push(point.price),
            None => {
                let mut mean = Mean::default();
                mean.push(point.price);
                day.markets.push((point.market, mean));
            }
        }
    }

    let mut buckets: Vec<DayBucket> = days
        .into_iter()
        .map(|(date, day)| {
            let prices: SmallVec<[MarketPrice; 3]> = day
                .markets
                .into_iter()
                .filter_map(|(market, mean)| {
                    Some(MarketPrice {
                        market,
                        price: mean.value()?,
                    })
                })
                .collect();

            let average = mean(prices.iter().map(|p| p.price)).unwrap_or_default();

            DayBucket {
                date,
                timestamp: day.timestamp,
                prices,
                average,
            }
        })
        .collect();

    buckets.sort_by_key(|bucket| bucket.timestamp);

    buckets
}

#[cfg(test)]
mod tests {
    use jiff::tz::TimeZone;
    use rust_decimal_macros::dec;
    use slotmap::SlotMap;
    use testresult::TestResult;

    use super::*;
    use crate::submissions::Quality;

    fn point(
        market: MarketKey,
        at: &str,
        price: Decimal,
    ) -> Result<PriceHistoryPoint, jiff::Error> {
        let timestamp: Timestamp = at.parse()?;

        Ok(PriceHistoryPoint {
            date: timestamp.to_zoned(TimeZone::UTC).date(),
            timestamp,
            market,
            market_name: String::new(),
            price,
            quality: Quality::Good,
        })
    }

    fn two_markets() -> (MarketKey, MarketKey) {
        let mut map: SlotMap<MarketKey, ()> = SlotMap::with_key();

        (map.insert(()), map.insert(()))
    }

    #[test]
    fn empty_points_give_no_buckets() {
        assert!(aggregate_by_day(&[]).is_empty());
    }

    #[test]
    fn buckets_average_per_market_then_across_markets() -> TestResult {
        let (a, b) = two_markets();

        let points = [
            point(a, "2026-10-02T08:00:00Z", dec!(9.0))?,
            point(a, "2026-10-02T16:00:00Z", dec!(11.0))?,
            point(a, "2026-10-02T17:00:00Z", dec!(10.0))?,
            point(b, "2026-10-02T09:00:00Z", dec!(6.0))?,
        ];

        let buckets = aggregate_by_day(&points);
        let [bucket] = buckets.as_slice() else {
            return Err("expected one bucket".into());
        };

        assert_eq!(bucket.price_for(a), Some(dec!(10)));
        assert_eq!(bucket.price_for(b), Some(dec!(6)));
        // mean of market means (10, 6), not of raw prices (9, 11, 10, 6)
        assert_eq!(bucket.average, dec!(8));
        assert_eq!(bucket.timestamp, "2026-10-02T08:00:00Z".parse::<Timestamp>()?);

        Ok(())
    }

    #[test]
    fn missing_markets_are_gaps() -> TestResult {
        let (a, b) = two_markets();

        let points = [
            point(a, "2026-10-01T10:00:00Z", dec!(8.5))?,
            point(b, "2026-10-02T10:00:00Z", dec!(7.0))?,
        ];

        let buckets = aggregate_by_day(&points);

        assert_eq!(buckets.len(), 2);
        assert_eq!(buckets.first().and_then(|d| d.price_for(b)), None);
        assert_eq!(buckets.get(1).and_then(|d| d.price_for(a)), None);

        Ok(())
    }

    #[test]
    fn buckets_are_ordered_by_time() -> TestResult {
        let (a, _) = two_markets();

        let points = [
            point(a, "2026-10-03T10:00:00Z", dec!(3))?,
            point(a, "2026-10-01T10:00:00Z", dec!(1))?,
            point(a, "2026-10-02T10:00:00Z", dec!(2))?,
        ];

        let averages: Vec<Decimal> = aggregate_by_day(&points)
            .iter()
            .map(|bucket| bucket.average)
            .collect();

        assert_eq!(averages, [dec!(1), dec!(2), dec!(3)]);

        Ok(())
    }
}
