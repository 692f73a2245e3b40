//! Cities

use slotmap::new_key_type;

new_key_type! {
    /// City Key
    pub struct CityKey;
}

/// City
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct City {
    /// Fixture identifier (e.g. `casablanca`)
    pub id: String,

    /// Display name
    pub name: String,

    /// Administrative region
    pub region: String,
}
