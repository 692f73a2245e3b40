//! Listings
//!
//! Derived, filterable and sortable views over products and markets.

use std::{cmp::Ordering, fmt};

use clap::ValueEnum;
use icu_collator::{Collator, CollatorOptions, Strength};
use icu_locid::locale;
use jiff::Timestamp;
use tracing::warn;

use crate::pricing::PriceSummary;

pub mod markets;
pub mod products;

pub use markets::{MarketFilter, MarketListing, market_listings};
pub use products::{ProductFilter, ProductListing, product_listings};

/// Listing sort order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum SortOrder {
    /// Alphabetical by name
    #[default]
    Name,

    /// Cheapest average price first
    PriceLow,

    /// Most expensive average price first
    PriceHigh,

    /// Most submissions first
    Popular,

    /// Most recently updated first
    Recent,
}

/// Common view of a listing row, used for sorting.
pub trait Listing {
    /// Display name
    fn name(&self) -> &str;

    /// Price summary over all counted submissions
    fn summary(&self) -> &PriceSummary;

    /// Latest submission timestamp, if any
    fn latest_update(&self) -> Option<Timestamp>;
}

/// Locale-aware name ordering.
///
/// Names are collated with French rules at secondary strength, so accented letters sort
/// next to their base letter (`Épinards` before `Zaatar`) and case is ignored. Names that
/// collate equal fall back to an exact comparison, keeping the order total.
pub struct NameCollator {
    collator: Option<Collator>,
}

impl fmt::Debug for NameCollator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NameCollator")
            .field("locale", &"fr")
            .field("loaded", &self.collator.is_some())
            .finish()
    }
}

impl Default for NameCollator {
    fn default() -> Self {
        Self::new()
    }
}

impl NameCollator {
    /// Load the French collator. If collation data is unavailable, names are compared by
    /// lowercase code points instead.
    pub fn new() -> Self {
        let mut options = CollatorOptions::new();
        options.strength = Some(Strength::Secondary);

        let collator = Collator::try_new(&locale!("fr").into(), options)
            .inspect_err(|err| warn!(error = %err, "falling back to code point name ordering"))
            .ok();

        Self { collator }
    }

    /// Compare two display names.
    pub fn compare(&self, a: &str, b: &str) -> Ordering {
        let primary = match &self.collator {
            Some(collator) => collator.compare(a, b),
            None => a.to_lowercase().cmp(&b.to_lowercase()),
        };

        primary.then_with(|| a.cmp(b))
    }
}

/// Sort listings in place. The sort is stable.
pub fn sort_listings<L: Listing>(listings: &mut [L], order: SortOrder) {
    match order {
        SortOrder::Name => {
            let collator = NameCollator::new();

            listings.sort_by(|a, b| collator.compare(a.name(), b.name()));
        }
        SortOrder::PriceLow => {
            listings.sort_by(|a, b| a.summary().average.cmp(&b.summary().average));
        }
        SortOrder::PriceHigh => {
            listings.sort_by(|a, b| b.summary().average.cmp(&a.summary().average));
        }
        SortOrder::Popular => {
            listings.sort_by(|a, b| b.summary().count.cmp(&a.summary().count));
        }
        SortOrder::Recent => {
            // `None` sorts before `Some`, so never-updated rows end up last
            listings.sort_by(|a, b| b.latest_update().cmp(&a.latest_update()));
        }
    }
}

/// Case-insensitive substring match; an empty or absent query matches everything.
pub fn matches_query(name: &str, query: Option<&str>) -> bool {
    match query.map(str::trim) {
        None | Some("") => true,
        Some(query) => name.to_lowercase().contains(&query.to_lowercase()),
    }
}
