//! Souk
//!
//! Souk is a crowdsourced market-price engine: it turns flat price submissions into daily
//! chart series, summary statistics and product/market listings.

pub mod cities;
pub mod fixtures;
pub mod history;
pub mod listings;
pub mod markets;
pub mod prelude;
pub mod prices;
pub mod pricing;
pub mod products;
pub mod render;
pub mod statistics;
pub mod store;
pub mod submissions;
pub mod synthetic;
