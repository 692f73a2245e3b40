//! Opening Hours

use jiff::civil::{DateTime, Time, Weekday};
use thiserror::Error;

/// Errors constructing opening hours.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum HoursError {
    /// Closing time must be after opening time on the same day.
    #[error("{weekday:?}: closing time {close} is not after opening time {open}")]
    CloseNotAfterOpen {
        /// Day with the invalid range
        weekday: Weekday,

        /// Opening time
        open: Time,

        /// Closing time
        close: Time,
    },
}

/// Hours for a single weekday.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DayHours {
    /// Closed all day
    #[default]
    Closed,

    /// Open from `open` (inclusive) until `close` (exclusive)
    Open {
        /// Opening time
        open: Time,

        /// Closing time
        close: Time,
    },
}

impl DayHours {
    /// Returns `true` if `time` falls within the opening range.
    pub fn contains(self, time: Time) -> bool {
        match self {
            DayHours::Closed => false,
            DayHours::Open { open, close } => open <= time && time < close,
        }
    }
}

/// Weekly opening hours, Monday first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OpeningHours {
    days: [DayHours; 7],
}

impl OpeningHours {
    /// Build opening hours from a Monday-first array of days.
    ///
    /// # Errors
    ///
    /// Returns [`HoursError::CloseNotAfterOpen`] if any open day closes at or before it opens.
    pub fn new(days: [DayHours; 7]) -> Result<Self, HoursError> {
        let mut weekday = Weekday::Monday;

        for day in days {
            if let DayHours::Open { open, close } = day
                && close <= open
            {
                return Err(HoursError::CloseNotAfterOpen {
                    weekday,
                    open,
                    close,
                });
            }

            weekday = weekday.next();
        }

        Ok(OpeningHours { days })
    }

    /// Same hours every day of the week.
    ///
    /// # Errors
    ///
    /// Returns [`HoursError::CloseNotAfterOpen`] if `close` is not after `open`.
    pub fn daily(open: Time, close: Time) -> Result<Self, HoursError> {
        Self::new([DayHours::Open { open, close }; 7])
    }

    /// Hours for the given weekday.
    pub fn on(&self, weekday: Weekday) -> DayHours {
        usize::try_from(weekday.to_monday_zero_offset())
            .ok()
            .and_then(|idx| self.days.get(idx))
            .copied()
            .unwrap_or_default()
    }

    /// Returns `true` if the market is open at the given local date-time.
    pub fn is_open_at(&self, datetime: DateTime) -> bool {
        self.on(datetime.weekday()).contains(datetime.time())
    }

    /// Returns `true` if the market never opens.
    pub fn is_always_closed(&self) -> bool {
        self.days.iter().all(|day| *day == DayHours::Closed)
    }
}
