//! City Fixtures

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::cities::City;

/// Wrapper for cities in YAML
#[derive(Debug, Deserialize)]
pub struct CitiesFixture {
    /// Map of city id -> city fixture
    pub cities: BTreeMap<String, CityFixture>,
}

/// City Fixture
#[derive(Debug, Deserialize)]
pub struct CityFixture {
    /// City name
    pub name: String,

    /// Administrative region
    #[serde(default)]
    pub region: String,
}

impl CityFixture {
    /// Convert into a [`City`] with the given id.
    pub fn into_city(self, id: String) -> City {
        City {
            id,
            name: self.name,
            region: self.region,
        }
    }
}
