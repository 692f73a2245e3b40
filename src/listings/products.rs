//! Product Listings

use jiff::Timestamp;
use rust_decimal::Decimal;
use smallvec::SmallVec;

use crate::{
    listings::{Listing, SortOrder, matches_query, sort_listings},
    markets::MarketKey,
    pricing::{PriceSummary, mean},
    products::{Category, ProductKey},
    store::PriceStore,
};

/// Number of cheapest markets reported per product.
pub const TOP_MARKETS: usize = 3;

/// Product listing filter. All set criteria must match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductFilter {
    /// Case-insensitive substring of the product name
    pub query: Option<String>,

    /// Exact category
    pub category: Option<Category>,
}

impl ProductFilter {
    /// Returns `true` if the product passes every set criterion.
    pub fn matches(&self, name: &str, category: Category) -> bool {
        matches_query(name, self.query.as_deref())
            && self.category.is_none_or(|wanted| wanted == category)
    }
}

/// A product row with derived price fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductListing {
    /// Product
    pub product: ProductKey,

    /// Product name
    pub name: String,

    /// Product category
    pub category: Category,

    /// Price summary over every counted submission
    pub summary: PriceSummary,

    /// Number of distinct markets with submissions
    pub market_count: usize,

    /// Latest submission timestamp
    pub latest_update: Option<Timestamp>,

    /// Cheapest markets by average price, cheapest first
    pub top_markets: SmallVec<[MarketKey; TOP_MARKETS]>,
}

impl Listing for ProductListing {
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

impl ProductListing {
    /// Derive the listing row for one product.
    ///
    /// Returns `None` if the product is not in the store.
    pub fn build(store: &PriceStore, product: ProductKey) -> Option<Self> {
        let meta = store.product(product)?;

        let mut per_market: Vec<(MarketKey, Vec<Decimal>)> = Vec::new();
        let mut latest_update = None;

        for submission in store.submissions_for_product(product) {
            latest_update = latest_update.max(Some(submission.submitted_at()));

            let price = submission.price().amount();

            match per_market.iter_mut().find(|(m, _)| *m == submission.market()) {
                Some((_, prices)) => prices.push(price),
                None => per_market.push((submission.market(), vec![price])),
            }
        }

        let summary = PriceSummary::from_prices(
            per_market
                .iter()
                .flat_map(|(_, prices)| prices.iter().copied()),
        );

        let mut market_averages: Vec<(MarketKey, Decimal)> = per_market
            .iter()
            .filter_map(|(market, prices)| Some((*market, mean(prices.iter().copied())?)))
            .collect();

        market_averages.sort_by(|(_, a), (_, b)| a.cmp(b));

        Some(ProductListing {
            product,
            name: meta.name.clone(),
            category: meta.category,
            summary,
            market_count: per_market.len(),
            latest_update,
            top_markets: market_averages
                .into_iter()
                .take(TOP_MARKETS)
                .map(|(market, _)| market)
                .collect(),
        })
    }
}

/// Build, filter and sort the product listing.
pub fn product_listings(
    store: &PriceStore,
    filter: &ProductFilter,
    order: SortOrder,
) -> Vec<ProductListing> {
    let mut listings: Vec<ProductListing> = store
        .products()
        .filter(|(_, product)| filter.matches(&product.name, product.category))
        .filter_map(|(key, _)| ProductListing::build(store, key))
        .collect();

    sort_listings(&mut listings, order);

    listings
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_composes_with_and() {
        let filter = ProductFilter {
            query: Some("tom".to_string()),
            category: Some(Category::Vegetables),
        };

        assert!(filter.matches("Tomatoes", Category::Vegetables));
        assert!(!filter.matches("Tomato Paste", Category::Grains));
        assert!(!filter.matches("Potatoes", Category::Vegetables));
    }

    #[test]
    fn empty_filter_matches_everything() {
        let filter = ProductFilter::default();

        assert!(filter.matches("Saffron", Category::Spices));
    }

    #[test]
    fn unknown_product_has_no_listing() {
        let store = PriceStore::default();

        assert_eq!(ProductListing::build(&store, ProductKey::default()), None);
    }
}
