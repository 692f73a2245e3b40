//! Fixtures
//!
//! YAML fixture sets standing in for a backend. A set named `default` is read from
//! `<base>/cities/default.yml`, `<base>/markets/default.yml`, `<base>/products/default.yml` and
//! `<base>/submissions/default.yml`, in that order, since each kind references the ones before.

use std::{fs, path::PathBuf};

use jiff::Timestamp;
use rusty_money::iso::Currency;
use thiserror::Error;
use tracing::{debug, info};

use crate::{
    fixtures::{
        cities::CitiesFixture,
        markets::{HoursParseError, MarketsFixture},
        products::ProductsFixture,
        submissions::SubmissionsFixture,
    },
    prices::PriceError,
    store::{PriceStore, StoreError},
};

pub mod cities;
pub mod markets;
pub mod products;
pub mod submissions;

/// Fixture Parsing Errors
#[derive(Debug, Error)]
pub enum FixtureError {
    /// IO error reading fixture files
    #[error("Failed to read fixture file {path}: {source}")]
    Io {
        /// File that could not be read
        path: PathBuf,

        /// Underlying IO error
        source: std::io::Error,
    },

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Invalid price
    #[error("Invalid price: {0}")]
    Price(#[from] PriceError),

    /// Malformed or inverted opening hours
    #[error("Invalid opening hours for market {market}: {source}")]
    Hours {
        /// Market id
        market: String,

        /// Underlying error
        source: HoursParseError,
    },

    /// Price currency differs from the store currency
    #[error("Currency mismatch: expected {0}, found {1}")]
    CurrencyMismatch(String, String),

    /// The store rejected an entity
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Fixture
#[derive(Debug)]
pub struct Fixture {
    /// Base path for fixture files
    base_path: PathBuf,

    /// Reference time submissions are validated against
    now: Timestamp,

    /// Store being populated
    store: PriceStore,
}

impl Default for Fixture {
    fn default() -> Self {
        Self::new()
    }
}

impl Fixture {
    /// Create a new empty fixture with default base path
    pub fn new() -> Self {
        Self::with_base_path("./fixtures")
    }

    /// Create a new empty fixture with custom base path
    pub fn with_base_path(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
            now: Timestamp::now(),
            store: PriceStore::default(),
        }
    }

    /// Validate submissions against `now` instead of the current time.
    #[must_use]
    pub fn at(mut self, now: Timestamp) -> Self {
        self.now = now;
        self
    }

    /// Quote prices in `currency` instead of MAD. Must be called before loading anything.
    #[must_use]
    pub fn with_currency(mut self, currency: &'static Currency) -> Self {
        self.store = PriceStore::new(currency);
        self
    }

    fn read(&self, kind: &str, name: &str) -> Result<String, FixtureError> {
        let path = self.base_path.join(kind).join(format!("{name}.yml"));

        debug!(path = %path.display(), "reading fixture");

        fs::read_to_string(&path).map_err(|source| FixtureError::Io { path, source })
    }

    /// Load cities from a YAML fixture file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or an id is repeated.
    pub fn load_cities(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let contents = self.read("cities", name)?;

        self.load_cities_from_str(&contents)
    }

    /// Load cities from YAML text
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML cannot be parsed or an id is repeated.
    pub fn load_cities_from_str(&mut self, yaml: &str) -> Result<&mut Self, FixtureError> {
        let fixture: CitiesFixture = serde_norway::from_str(yaml)?;
        let count = fixture.cities.len();

        for (id, city) in fixture.cities {
            self.store.insert_city(city.into_city(id))?;
        }

        info!(count, "loaded cities");

        Ok(self)
    }

    /// Load markets from a YAML fixture file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, a city is unknown, or opening
    /// hours are invalid.
    pub fn load_markets(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let contents = self.read("markets", name)?;

        self.load_markets_from_str(&contents)
    }

    /// Load markets from YAML text
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML cannot be parsed, a city is unknown, or opening hours are
    /// invalid.
    pub fn load_markets_from_str(&mut self, yaml: &str) -> Result<&mut Self, FixtureError> {
        let fixture: MarketsFixture = serde_norway::from_str(yaml)?;
        let count = fixture.markets.len();

        for (id, market) in fixture.markets {
            let market = market.try_into_market(id, &self.store)?;

            self.store.insert_market(market)?;
        }

        info!(count, "loaded markets");

        Ok(self)
    }

    /// Load products from a YAML fixture file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or a product is invalid.
    pub fn load_products(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let contents = self.read("products", name)?;

        self.load_products_from_str(&contents)
    }

    /// Load products from YAML text
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML cannot be parsed or a product is invalid.
    pub fn load_products_from_str(&mut self, yaml: &str) -> Result<&mut Self, FixtureError> {
        let fixture: ProductsFixture = serde_norway::from_str(yaml)?;
        let count = fixture.products.len();

        for (id, product) in fixture.products {
            self.store.insert_product(product.into_product(id))?;
        }

        info!(count, "loaded products");

        Ok(self)
    }

    /// Load price submissions from a YAML fixture file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or a submission is invalid.
    pub fn load_submissions(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let contents = self.read("submissions", name)?;

        self.load_submissions_from_str(&contents)
    }

    /// Load price submissions from YAML text
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML cannot be parsed, a submission references an unknown
    /// product or market, its price or unit is invalid, or it is dated in the future.
    pub fn load_submissions_from_str(&mut self, yaml: &str) -> Result<&mut Self, FixtureError> {
        let fixture: SubmissionsFixture = serde_norway::from_str(yaml)?;
        let count = fixture.submissions.len();

        for submission in fixture.submissions {
            let submission = submission.try_into_submission(&self.store)?;

            self.store.insert_submission(submission, self.now)?;
        }

        info!(count, "loaded submissions");

        Ok(self)
    }

    /// Load every kind of fixture from the set with the given name
    ///
    /// # Errors
    ///
    /// Returns an error if any of the fixture files cannot be loaded.
    pub fn load_set(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        self.load_cities(name)?
            .load_markets(name)?
            .load_products(name)?
            .load_submissions(name)
    }

    /// Load a complete fixture set from `./fixtures`
    ///
    /// # Errors
    ///
    /// Returns an error if any of the fixture files cannot be loaded.
    pub fn from_set(name: &str) -> Result<Self, FixtureError> {
        let mut fixture = Self::new();

        fixture.load_set(name)?;

        Ok(fixture)
    }

    /// The populated store
    pub fn store(&self) -> &PriceStore {
        &self.store
    }

    /// Consume the fixture, returning the populated store
    pub fn into_store(self) -> PriceStore {
        self.store
    }
}
