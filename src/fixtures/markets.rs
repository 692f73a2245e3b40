//! Market Fixtures

use std::collections::BTreeMap;

use jiff::civil::Time;
use serde::Deserialize;
use thiserror::Error;

use crate::{
    fixtures::FixtureError,
    markets::{DayHours, HoursError, Market, MarketType, OpeningHours},
    store::PriceStore,
};

/// Errors turning YAML opening hours into [`OpeningHours`].
#[derive(Debug, Error)]
pub enum HoursParseError {
    /// A day was neither `closed` nor a `HH:MM-HH:MM` range.
    #[error("expected 'closed' or 'HH:MM-HH:MM', got: {0}")]
    MalformedRange(String),

    /// One side of a range was not a `HH:MM` time.
    #[error("invalid time {value:?}: {source}")]
    InvalidTime {
        /// The offending time text
        value: String,

        /// Underlying parse error
        source: jiff::Error,
    },

    /// A range that closes at or before it opens.
    #[error(transparent)]
    Range(#[from] HoursError),
}

/// Wrapper for markets in YAML
#[derive(Debug, Deserialize)]
pub struct MarketsFixture {
    /// Map of market id -> market fixture
    pub markets: BTreeMap<String, MarketFixture>,
}

/// Market Fixture
#[derive(Debug, Deserialize)]
pub struct MarketFixture {
    /// Market name
    pub name: String,

    /// City id
    pub city: String,

    /// Market type
    #[serde(rename = "type")]
    pub market_type: MarketType,

    /// Opening hours; markets without hours are treated as always closed
    #[serde(default)]
    pub opening_hours: OpeningHoursFixture,
}

/// Opening hours in YAML.
///
/// Each day is either `closed` or a `HH:MM-HH:MM` range. `daily` applies to any day not
/// listed explicitly.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OpeningHoursFixture {
    /// Hours for days not listed explicitly
    pub daily: Option<String>,

    /// Monday
    pub monday: Option<String>,

    /// Tuesday
    pub tuesday: Option<String>,

    /// Wednesday
    pub wednesday: Option<String>,

    /// Thursday
    pub thursday: Option<String>,

    /// Friday
    pub friday: Option<String>,

    /// Saturday
    pub saturday: Option<String>,

    /// Sunday
    pub sunday: Option<String>,
}

impl MarketFixture {
    /// Convert into a [`Market`] with the given id, resolving the city in `store`.
    ///
    /// # Errors
    ///
    /// Returns an error if the city is unknown or the opening hours are invalid.
    pub fn try_into_market(self, id: String, store: &PriceStore) -> Result<Market, FixtureError> {
        let city = store.city_key(&self.city)?;

        let opening_hours = self
            .opening_hours
            .try_into_hours()
            .map_err(|source| FixtureError::Hours {
                market: id.clone(),
                source,
            })?;

        Ok(Market {
            id,
            name: self.name,
            city,
            market_type: self.market_type,
            opening_hours,
        })
    }
}

impl OpeningHoursFixture {
    /// Parse every day into validated opening hours.
    ///
    /// # Errors
    ///
    /// Returns an error if any day is malformed or closes at or before it opens.
    pub fn try_into_hours(self) -> Result<OpeningHours, HoursParseError> {
        let daily = self.daily.as_deref().map(parse_day).transpose()?;

        let days = [
            self.monday,
            self.tuesday,
            self.wednesday,
            self.thursday,
            self.friday,
            self.saturday,
            self.sunday,
        ];

        let mut parsed = [DayHours::Closed; 7];

        for (slot, day) in parsed.iter_mut().zip(days) {
            *slot = match day.as_deref() {
                Some(day) => parse_day(day)?,
                None => daily.unwrap_or_default(),
            };
        }

        Ok(OpeningHours::new(parsed)?)
    }
}

/// Parse `closed` or `HH:MM-HH:MM`.
fn parse_day(s: &str) -> Result<DayHours, HoursParseError> {
    let s = s.trim();

    if s.eq_ignore_ascii_case("closed") {
        return Ok(DayHours::Closed);
    }

    let (open, close) = s
        .split_once('-')
        .ok_or_else(|| HoursParseError::MalformedRange(s.to_string()))?;

    Ok(DayHours::Open {
        open: parse_time(open)?,
        close: parse_time(close)?,
    })
}

fn parse_time(s: &str) -> Result<Time, HoursParseError> {
    let value = s.trim();

    Time::strptime("%H:%M", value).map_err(|source| HoursParseError::InvalidTime {
        value: value.to_string(),
        source,
    })
}
