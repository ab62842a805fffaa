use std::fmt;

use thiserror::Error;

use crate::{id::*, time::*, url::*};

#[derive(Debug, Error)]
#[error("A stage lasts at most 8 hours in steps of 30 minutes")]
pub struct InvalidStageDuration;

/// The duration of a stage, counted in half hours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StageDuration(u8);

impl StageDuration {
    pub const MAX_HALF_HOURS: u8 = 16;

    const SECONDS_PER_HALF_HOUR: i64 = 30 * 60;

    pub fn try_from_half_hours(half_hours: u8) -> Result<Self, InvalidStageDuration> {
        if half_hours == 0 || half_hours > Self::MAX_HALF_HOURS {
            return Err(InvalidStageDuration);
        }
        Ok(Self(half_hours))
    }

    /// Accepts exactly `0.5`, `1.0`, ..., `8.0`.
    pub fn try_from_hours(hours: f64) -> Result<Self, InvalidStageDuration> {
        if !(hours > 0.0 && hours <= 8.0) {
            return Err(InvalidStageDuration);
        }
        let half_hours = hours * 2.0;
        if half_hours.fract() != 0.0 {
            return Err(InvalidStageDuration);
        }
        Self::try_from_half_hours(half_hours as u8)
    }

    pub const fn half_hours(self) -> u8 {
        self.0
    }

    pub fn hours(self) -> f64 {
        f64::from(self.0) / 2.0
    }

    pub fn as_duration(self) -> ::time::Duration {
        ::time::Duration::seconds(i64::from(self.0) * Self::SECONDS_PER_HALF_HOUR)
    }
}

impl fmt::Display for StageDuration {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}h", self.hours())
    }
}

/// A single scheduled performance of an album.
#[rustfmt::skip]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stage {
    pub id             : Id,
    pub album_id       : Id,
    pub venue_id       : Option<Id>,
    pub start          : Timestamp,
    pub duration       : StageDuration,
    // Derived by the storage from start + duration, never written by clients!
    pub end            : Timestamp,
    pub title          : Option<String>,
    pub promotion_url  : Option<Url>,
    pub address_detail : Option<String>,
}

/// The stored attributes of a stage, i.e. without the derived end.
#[rustfmt::skip]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewStage {
    pub id             : Id,
    pub album_id       : Id,
    pub venue_id       : Option<Id>,
    pub start          : Timestamp,
    pub duration       : StageDuration,
    pub title          : Option<String>,
    pub promotion_url  : Option<Url>,
    pub address_detail : Option<String>,
}

impl Stage {
    /// Estimated end for optimistic previews before the stage
    /// has been stored.
    ///
    /// The persisted [`Stage::end`] is authoritative, always read it
    /// back instead of relying on this value.
    pub fn preview_end(start: Timestamp, duration: StageDuration) -> Option<Timestamp> {
        start.checked_add(duration.as_duration())
    }
}
