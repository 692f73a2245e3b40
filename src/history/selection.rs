//! Market Selection
//!
//! Charting every market that ever reported a price clutters the chart, so only the markets
//! with the most recent activity are kept. Dropped markets are removed entirely, not merged.

use jiff::Timestamp;
use smallvec::SmallVec;

use crate::markets::MarketKey;

/// Number of markets charted by default.
pub const DEFAULT_MAX_MARKETS: usize = 3;

/// Pick up to `limit` markets, most recent submission first.
///
/// Markets whose latest submissions share a timestamp keep the order they were first seen in.
pub fn select_recent_markets(
    activity: impl IntoIterator<Item = (MarketKey, Timestamp)>,
    limit: usize,
) -> SmallVec<[MarketKey; 3]> {
    let mut latest: SmallVec<[(MarketKey, Timestamp); 8]> = SmallVec::new();

    for (market, at) in activity {
        match latest.iter_mut().find(|(seen, _)| *seen == market) {
            Some((_, last)) => {
                if at > *last {
                    *last = at;
                }
            }
            None => latest.push((market, at)),
        }
    }

    // stable sort keeps first-seen order on ties
    latest.sort_by(|(_, a), (_, b)| b.cmp(a));

    latest
        .into_iter()
        .take(limit)
        .map(|(market, _)| market)
        .collect()
}

#[cfg(test)]
mod tests {
    use slotmap::SlotMap;
    use testresult::TestResult;

    use super::*;

    fn keys(n: usize) -> Vec<MarketKey> {
        let mut map: SlotMap<MarketKey, ()> = SlotMap::with_key();

        (0..n).map(|_| map.insert(())).collect()
    }

    #[test]
    fn keeps_all_markets_under_the_limit() -> TestResult {
        let [a, b] = <[MarketKey; 2]>::try_from(keys(2)).map_err(|_keys| "two keys")?;

        let selected = select_recent_markets(
            [
                (a, "2026-10-01T00:00:00Z".parse()?),
                (b, "2026-10-02T00:00:00Z".parse()?),
            ],
            3,
        );

        assert_eq!(selected.as_slice(), [b, a]);

        Ok(())
    }

    #[test]
    fn drops_least_recent_markets() -> TestResult {
        let markets = keys(4);
        let [a, b, c, d] = <[MarketKey; 4]>::try_from(markets).map_err(|_keys| "four keys")?;

        // `a` has an old and a new submission; its latest one counts.
        let selected = select_recent_markets(
            [
                (a, "2026-09-01T00:00:00Z".parse()?),
                (b, "2026-10-02T00:00:00Z".parse()?),
                (c, "2026-10-01T00:00:00Z".parse()?),
                (d, "2026-10-03T00:00:00Z".parse()?),
                (a, "2026-10-04T00:00:00Z".parse()?),
            ],
            3,
        );

        assert_eq!(selected.as_slice(), [a, d, b]);
        assert!(!selected.contains(&c));

        Ok(())
    }

    #[test]
    fn ties_keep_first_seen_order() -> TestResult {
        let markets = keys(4);
        let [a, b, c, d] = <[MarketKey; 4]>::try_from(markets).map_err(|_keys| "four keys")?;
        let at: Timestamp = "2026-10-01T00:00:00Z".parse()?;

        let selected = select_recent_markets([(c, at), (a, at), (d, at), (b, at)], 3);

        assert_eq!(selected.as_slice(), [c, a, d]);

        Ok(())
    }

    #[test]
    fn empty_activity_selects_nothing() {
        assert!(select_recent_markets([], 3).is_empty());
    }
}
