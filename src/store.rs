//! Price Store
//!
//! In-memory repository of cities, markets, products and price submissions. The store is
//! written through `&mut self` while it is being populated and only borrowed immutably by
//! the aggregation engine afterwards.

use jiff::Timestamp;
use rustc_hash::FxHashMap;
use rusty_money::iso::{self, Currency};
use slotmap::SlotMap;
use thiserror::Error;
use tracing::debug;

use crate::{
    cities::{City, CityKey},
    markets::{Market, MarketKey},
    products::{Product, ProductKey},
    submissions::{PriceSubmission, SubmissionError},
};

/// Errors raised by store lookups and inserts.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    /// No city with the given id
    #[error("city not found: {0}")]
    CityNotFound(String),

    /// No market with the given id
    #[error("market not found: {0}")]
    MarketNotFound(String),

    /// No product with the given id
    #[error("product not found: {0}")]
    ProductNotFound(String),

    /// A referenced key is not present in the store
    #[error("unknown {0} key")]
    UnknownKey(&'static str),

    /// An entity with the same id was already inserted
    #[error("duplicate {kind} id: {id}")]
    DuplicateId {
        /// Entity kind
        kind: &'static str,

        /// The repeated id
        id: String,
    },

    /// Products must declare at least one unit
    #[error("product {0} declares no units")]
    NoUnits(String),

    /// The submission's unit is not one of the product's units
    #[error("unit {unit} is not supported by product {product}")]
    UnsupportedUnit {
        /// Submitted unit
        unit: String,

        /// Product id
        product: String,
    },

    /// Submission failed validation
    #[error(transparent)]
    Submission(#[from] SubmissionError),
}

/// Price Store
#[derive(Debug)]
pub struct PriceStore {
    currency: &'static Currency,

    cities: SlotMap<CityKey, City>,
    markets: SlotMap<MarketKey, Market>,
    products: SlotMap<ProductKey, Product>,

    city_keys: FxHashMap<String, CityKey>,
    market_keys: FxHashMap<String, MarketKey>,
    product_keys: FxHashMap<String, ProductKey>,

    submissions: Vec<PriceSubmission>,
}

impl Default for PriceStore {
    fn default() -> Self {
        Self::new(iso::MAD)
    }
}

impl PriceStore {
    /// Create an empty store quoting all prices in `currency`.
    pub fn new(currency: &'static Currency) -> Self {
        Self {
            currency,
            cities: SlotMap::with_key(),
            markets: SlotMap::with_key(),
            products: SlotMap::with_key(),
            city_keys: FxHashMap::default(),
            market_keys: FxHashMap::default(),
            product_keys: FxHashMap::default(),
            submissions: Vec::new(),
        }
    }

    /// Currency all prices in the store are quoted in.
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }

    /// Insert a city.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::DuplicateId`] if a city with the same id exists.
    pub fn insert_city(&mut self, city: City) -> Result<CityKey, StoreError> {
        if self.city_keys.contains_key(&city.id) {
            return Err(StoreError::DuplicateId {
                kind: "city",
                id: city.id,
            });
        }

        let id = city.id.clone();
        let key = self.cities.insert(city);
        self.city_keys.insert(id, key);

        Ok(key)
    }

    /// Insert a market.
    ///
    /// # Errors
    ///
    /// Returns an error if the id is taken or the market's city is not in the store.
    pub fn insert_market(&mut self, market: Market) -> Result<MarketKey, StoreError> {
        if !self.cities.contains_key(market.city) {
            return Err(StoreError::UnknownKey("city"));
        }

        if self.market_keys.contains_key(&market.id) {
            return Err(StoreError::DuplicateId {
                kind: "market",
                id: market.id,
            });
        }

        let id = market.id.clone();
        let key = self.markets.insert(market);
        self.market_keys.insert(id, key);

        Ok(key)
    }

    /// Insert a product.
    ///
    /// # Errors
    ///
    /// Returns an error if the id is taken or the product declares no units.
    pub fn insert_product(&mut self, product: Product) -> Result<ProductKey, StoreError> {
        if product.units.is_empty() {
            return Err(StoreError::NoUnits(product.id));
        }

        if self.product_keys.contains_key(&product.id) {
            return Err(StoreError::DuplicateId {
                kind: "product",
                id: product.id,
            });
        }

        let id = product.id.clone();
        let key = self.products.insert(product);
        self.product_keys.insert(id, key);

        Ok(key)
    }

    /// Insert a price submission after validating it against the store and `now`.
    ///
    /// # Errors
    ///
    /// Returns an error if the product or market is unknown, the unit is not one of the
    /// product's units, or the submission is dated after `now`.
    pub fn insert_submission(
        &mut self,
        submission: PriceSubmission,
        now: Timestamp,
    ) -> Result<(), StoreError> {
        let product = self
            .products
            .get(submission.product())
            .ok_or(StoreError::UnknownKey("product"))?;

        if !self.markets.contains_key(submission.market()) {
            return Err(StoreError::UnknownKey("market"));
        }

        if !product.supports_unit(submission.unit()) {
            return Err(StoreError::UnsupportedUnit {
                unit: submission.unit().to_string(),
                product: product.id.clone(),
            });
        }

        submission.validate(now)?;

        self.submissions.push(submission);

        Ok(())
    }

    /// Insert many submissions, stopping at the first invalid one.
    ///
    /// # Errors
    ///
    /// Returns the first error raised by [`PriceStore::insert_submission`].
    pub fn extend_submissions(
        &mut self,
        submissions: impl IntoIterator<Item = PriceSubmission>,
        now: Timestamp,
    ) -> Result<usize, StoreError> {
        let mut inserted = 0;

        for submission in submissions {
            self.insert_submission(submission, now)?;
            inserted += 1;
        }

        debug!(inserted, total = self.submissions.len(), "extended submissions");

        Ok(inserted)
    }

    /// Get a city by key.
    pub fn city(&self, key: CityKey) -> Option<&City> {
        self.cities.get(key)
    }

    /// Get a market by key.
    pub fn market(&self, key: MarketKey) -> Option<&Market> {
        self.markets.get(key)
    }

    /// Get a product by key.
    pub fn product(&self, key: ProductKey) -> Option<&Product> {
        self.products.get(key)
    }

    /// Get a city key by its fixture id.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::CityNotFound`] if no city has this id.
    pub fn city_key(&self, id: &str) -> Result<CityKey, StoreError> {
        self.city_keys
            .get(id)
            .copied()
            .ok_or_else(|| StoreError::CityNotFound(id.to_string()))
    }

    /// Get a market key by its fixture id.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::MarketNotFound`] if no market has this id.
    pub fn market_key(&self, id: &str) -> Result<MarketKey, StoreError> {
        self.market_keys
            .get(id)
            .copied()
            .ok_or_else(|| StoreError::MarketNotFound(id.to_string()))
    }

    /// Get a product key by its fixture id.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ProductNotFound`] if no product has this id.
    pub fn product_key(&self, id: &str) -> Result<ProductKey, StoreError> {
        self.product_keys
            .get(id)
            .copied()
            .ok_or_else(|| StoreError::ProductNotFound(id.to_string()))
    }

    /// Get a product by its fixture id.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ProductNotFound`] if no product has this id.
    pub fn product_by_id(&self, id: &str) -> Result<&Product, StoreError> {
        self.product_key(id)
            .and_then(|key| self.product(key).ok_or(StoreError::UnknownKey("product")))
    }

    /// Get a market by its fixture id.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::MarketNotFound`] if no market has this id.
    pub fn market_by_id(&self, id: &str) -> Result<&Market, StoreError> {
        self.market_key(id)
            .and_then(|key| self.market(key).ok_or(StoreError::UnknownKey("market")))
    }

    /// Iterate over all cities.
    pub fn cities(&self) -> impl Iterator<Item = (CityKey, &City)> {
        self.cities.iter()
    }

    /// Iterate over all markets.
    pub fn markets(&self) -> impl Iterator<Item = (MarketKey, &Market)> {
        self.markets.iter()
    }

    /// Iterate over all products.
    pub fn products(&self) -> impl Iterator<Item = (ProductKey, &Product)> {
        self.products.iter()
    }

    /// All submissions, in insertion order, including rejected ones.
    pub fn submissions(&self) -> &[PriceSubmission] {
        &self.submissions
    }

    /// Counted (non-rejected) submissions for a product, in insertion order.
    pub fn submissions_for_product(
        &self,
        product: ProductKey,
    ) -> impl Iterator<Item = &PriceSubmission> {
        self.submissions
            .iter()
            .filter(move |s| s.product() == product && s.is_counted())
    }

    /// Counted (non-rejected) submissions observed in a market, in insertion order.
    pub fn submissions_for_market(
        &self,
        market: MarketKey,
    ) -> impl Iterator<Item = &PriceSubmission> {
        self.submissions
            .iter()
            .filter(move |s| s.market() == market && s.is_counted())
    }

    /// Markets that have at least one counted submission for the product, first-seen order.
    pub fn markets_for_product(&self, product: ProductKey) -> Vec<MarketKey> {
        let mut markets = Vec::new();

        for submission in self.submissions_for_product(product) {
            if !markets.contains(&submission.market()) {
                markets.push(submission.market());
            }
        }

        markets
    }
}
