//! Markets

use std::fmt;

use clap::ValueEnum;
use serde::Deserialize;
use slotmap::new_key_type;

use crate::cities::CityKey;

pub mod hours;

pub use hours::{DayHours, HoursError, OpeningHours};

new_key_type! {
    /// Market Key
    pub struct MarketKey;
}

/// Kind of market a price was observed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum MarketType {
    /// Souks and open-air markets
    Traditional,

    /// Supermarkets and hypermarkets
    Modern,

    /// Wholesale markets
    Wholesale,
}

impl MarketType {
    /// Lowercase identifier, as used in fixtures.
    pub fn as_str(self) -> &'static str {
        match self {
            MarketType::Traditional => "traditional",
            MarketType::Modern => "modern",
            MarketType::Wholesale => "wholesale",
        }
    }
}

impl fmt::Display for MarketType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Market
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Market {
    /// Fixture identifier (e.g. `derb-ghallef`)
    pub id: String,

    /// Display name
    pub name: String,

    /// City the market is located in
    pub city: CityKey,

    /// Market type
    pub market_type: MarketType,

    /// Weekly opening hours
    pub opening_hours: OpeningHours,
}
