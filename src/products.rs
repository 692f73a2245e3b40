//! Products

use std::fmt;

use clap::ValueEnum;
use serde::Deserialize;
use slotmap::new_key_type;
use smallvec::SmallVec;

new_key_type! {
    /// Product Key
    pub struct ProductKey;
}

/// Product category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// Fresh vegetables
    Vegetables,

    /// Fresh fruit
    Fruits,

    /// Red meat and poultry
    Meat,

    /// Fish and seafood
    Fish,

    /// Milk, cheese, eggs
    Dairy,

    /// Flour, rice, pulses
    Grains,

    /// Spices and herbs
    Spices,

    /// Anything else
    Other,
}

impl Category {
    /// All categories, in display order.
    pub const ALL: [Category; 8] = [
        Category::Vegetables,
        Category::Fruits,
        Category::Meat,
        Category::Fish,
        Category::Dairy,
        Category::Grains,
        Category::Spices,
        Category::Other,
    ];

    /// Lowercase identifier, as used in fixtures.
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Vegetables => "vegetables",
            Category::Fruits => "fruits",
            Category::Meat => "meat",
            Category::Fish => "fish",
            Category::Dairy => "dairy",
            Category::Grains => "grains",
            Category::Spices => "spices",
            Category::Other => "other",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Product
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    /// Fixture identifier (e.g. `tomatoes`)
    pub id: String,

    /// Product name
    pub name: String,

    /// Product category
    pub category: Category,

    /// Units prices are quoted in (e.g. `kg`, `bunch`); the first is the default
    pub units: SmallVec<[String; 2]>,
}

impl Product {
    /// Returns `true` if prices may be quoted in `unit`.
    pub fn supports_unit(&self, unit: &str) -> bool {
        self.units.iter().any(|u| u == unit)
    }

    /// The default unit, if any are declared.
    pub fn default_unit(&self) -> Option<&str> {
        self.units.first().map(String::as_str)
    }
}
