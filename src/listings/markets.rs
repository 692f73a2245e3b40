//! Market Listings

use jiff::Timestamp;

use crate::{
    cities::CityKey,
    listings::{Listing, SortOrder, matches_query, sort_listings},
    markets::{Market, MarketKey, MarketType},
    pricing::PriceSummary,
    products::ProductKey,
    store::PriceStore,
};

/// Market listing filter. All set criteria must match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MarketFilter {
    /// Case-insensitive substring of the market name
    pub query: Option<String>,

    /// Exact city
    pub city: Option<CityKey>,

    /// Exact market type
    pub market_type: Option<MarketType>,
}

impl MarketFilter {
    /// Returns `true` if the market passes every set criterion.
    pub fn matches(&self, market: &Market) -> bool {
        matches_query(&market.name, self.query.as_deref())
            && self.city.is_none_or(|city| city == market.city)
            && self.market_type.is_none_or(|kind| kind == market.market_type)
    }
}

/// A market row with derived price fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarketListing {
    /// Market
    pub market: MarketKey,

    /// Market name
    pub name: String,

    /// City the market is in
    pub city: CityKey,

    /// Market type
    pub market_type: MarketType,

    /// Price summary over every counted submission in the market
    pub summary: PriceSummary,

    /// Number of distinct products with submissions
    pub product_count: usize,

    /// Latest submission timestamp
    pub latest_update: Option<Timestamp>,
}

impl Listing for MarketListing {
    fn name(&self) -> &str {
        &self.name
    }

    fn summary(&self) -> &PriceSummary {
        &self.summary
    }

    fn latest_update(&self) -> Option<Timestamp> {
        self.latest_update
    }
}

impl MarketListing {
    /// Derive the listing row for one market.
    ///
    /// Returns `None` if the market is not in the store.
    pub fn build(store: &PriceStore, market: MarketKey) -> Option<Self> {
        let meta = store.market(market)?;

        let mut products: Vec<ProductKey> = Vec::new();
        let mut latest_update = None;

        let summary = PriceSummary::from_prices(store.submissions_for_market(market).map(|s| {
            if !products.contains(&s.product()) {
                products.push(s.product());
            }

            latest_update = latest_update.max(Some(s.submitted_at()));

            s.price().amount()
        }));

        Some(MarketListing {
            market,
            name: meta.name.clone(),
            city: meta.city,
            market_type: meta.market_type,
            summary,
            product_count: products.len(),
            latest_update,
        })
    }
}

/// Build, filter and sort the market listing.
pub fn market_listings(
    store: &PriceStore,
    filter: &MarketFilter,
    order: SortOrder,
) -> Vec<MarketListing> {
    let mut listings: Vec<MarketListing> = store
        .markets()
        .filter(|(_, market)| filter.matches(market))
        .filter_map(|(key, _)| MarketListing::build(store, key))
        .collect();

    sort_listings(&mut listings, order);

    listings
}

#[cfg(test)]
mod tests {
    use slotmap::SlotMap;

    use super::*;
    use crate::markets::OpeningHours;

    fn market(name: &str, city: CityKey, market_type: MarketType) -> Market {
        Market {
            id: name.to_lowercase(),
            name: name.to_string(),
            city,
            market_type,
            opening_hours: OpeningHours::default(),
        }
    }

    #[test]
    fn filter_by_city_and_type() {
        let mut cities: SlotMap<CityKey, ()> = SlotMap::with_key();
        let (rabat, fes) = (cities.insert(()), cities.insert(()));

        let filter = MarketFilter {
            query: None,
            city: Some(rabat),
            market_type: Some(MarketType::Wholesale),
        };

        assert!(filter.matches(&market("Marché de Gros", rabat, MarketType::Wholesale)));
        assert!(!filter.matches(&market("Marché de Gros", fes, MarketType::Wholesale)));
        assert!(!filter.matches(&market("Marjane", rabat, MarketType::Modern)));
    }

    #[test]
    fn filter_by_name() {
        let filter = MarketFilter {
            query: Some("souk".to_string()),
            ..MarketFilter::default()
        };

        assert!(filter.matches(&market("Souk El Had", CityKey::default(), MarketType::Traditional)));
        assert!(!filter.matches(&market("Marjane", CityKey::default(), MarketType::Modern)));
    }
}
