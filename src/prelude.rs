//! Souk prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    cities::{City, CityKey},
    fixtures::{Fixture, FixtureError},
    history::{
        DayBucket, HistoryQuery, HistoryWindow, MarketPrice, PriceHistory, PriceHistoryPoint,
        aggregate_by_day, history_points, select_recent_markets,
    },
    listings::{
        Listing, MarketFilter, MarketListing, ProductFilter, ProductListing, SortOrder,
        market_listings, product_listings,
    },
    markets::{DayHours, Market, MarketKey, MarketType, OpeningHours},
    prices::{Price, PriceError, parse_price},
    pricing::PriceSummary,
    products::{Category, Product, ProductKey},
    render::RenderError,
    statistics::{PriceStatistics, Trend},
    store::{PriceStore, StoreError},
    submissions::{PriceSubmission, Quality, SubmissionError, VerificationStatus},
    synthetic::{CategoryBand, GeneratorError, HistoryGenerator},
};
