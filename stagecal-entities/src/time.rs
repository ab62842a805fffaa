use std::{fmt, str::FromStr};

use ::time::{
    format_description::BorrowedFormatItem, macros::format_description, Date, Duration, OffsetDateTime,
    PrimitiveDateTime, Time, UtcOffset,
};
use thiserror::Error;

const UTC_INSTANT_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]Z");

const UTC_INSTANT_FORMAT_WITH_SUBSECONDS: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond]Z");

const UTC_INSTANT_OUTPUT_FORMAT: &[BorrowedFormatItem<'static>] = format_description!(
    "[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond digits:3]Z"
);

const UTC_OFFSET_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[offset_hour sign:mandatory]:[offset_minute]");

#[derive(Debug, Error)]
#[error("Not an UTC instant: expected YYYY-MM-DDTHH:MM:SS[.fff]Z")]
pub struct TimestampParseError;

#[derive(Debug, Error)]
#[error("Timestamp out of range")]
pub struct TimestampOutOfRange;

/// An absolute point in time with millisecond precision.
///
/// The value is timezone-free. Conversions into calendar dates
/// are only done through a [`DisplayZone`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(OffsetDateTime);

impl Timestamp {
    pub fn now() -> Self {
        Self::truncate(OffsetDateTime::now_utc())
    }

    fn truncate(dt: OffsetDateTime) -> Self {
        let dt = dt.to_offset(UtcOffset::UTC);
        let millis = dt.millisecond();
        // Always valid: the nanoseconds of a millisecond value are < 1e9
        let dt = dt.replace_nanosecond(u32::from(millis) * 1_000_000).unwrap_or(dt);
        Self(dt)
    }

    pub fn try_from_millis(millis: i64) -> Result<Self, TimestampOutOfRange> {
        OffsetDateTime::from_unix_timestamp_nanos(i128::from(millis) * 1_000_000)
            .map(Self)
            .map_err(|_| TimestampOutOfRange)
    }

    pub fn as_millis(&self) -> i64 {
        (self.0.unix_timestamp_nanos() / 1_000_000) as i64
    }

    /// Parses a strict UTC instant like `2025-07-11T15:00:00.000Z`.
    ///
    /// Local times and explicit offsets other than the `Z` marker are rejected.
    /// Sub-millisecond digits are accepted but truncated.
    pub fn parse_utc(s: &str) -> Result<Self, TimestampParseError> {
        let format = if s.contains('.') {
            UTC_INSTANT_FORMAT_WITH_SUBSECONDS
        } else {
            UTC_INSTANT_FORMAT
        };
        PrimitiveDateTime::parse(s, format)
            .map(|dt| Self::truncate(dt.assume_utc()))
            .map_err(|_| TimestampParseError)
    }

    pub fn checked_add(self, duration: Duration) -> Option<Self> {
        self.0.checked_add(duration).map(Self)
    }

    pub fn checked_sub(self, duration: Duration) -> Option<Self> {
        self.0.checked_sub(duration).map(Self)
    }

    pub fn as_offset_date_time(&self) -> OffsetDateTime {
        self.0
    }
}

impl From<OffsetDateTime> for Timestamp {
    fn from(from: OffsetDateTime) -> Self {
        Self::truncate(from)
    }
}

impl From<Timestamp> for OffsetDateTime {
    fn from(from: Timestamp) -> Self {
        from.0
    }
}

impl FromStr for Timestamp {
    type Err = TimestampParseError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_utc(s)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let s = self
            .0
            .format(UTC_INSTANT_OUTPUT_FORMAT)
            .map_err(|_| fmt::Error)?;
        f.write_str(&s)
    }
}

#[derive(Debug, Error)]
#[error("Invalid UTC offset: expected +HH:MM, -HH:MM or Z")]
pub struct DisplayZoneParseError;

/// The single, fixed timezone used for turning instants into calendar dates.
///
/// All day bucketing, "today" comparisons and calendar navigation go through
/// this type. Never take the date components of a raw UTC instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayZone(UtcOffset);

impl DisplayZone {
    pub const UTC: Self = Self(UtcOffset::UTC);

    pub const fn new(offset: UtcOffset) -> Self {
        Self(offset)
    }

    pub fn from_hms(hours: i8, minutes: i8, seconds: i8) -> Result<Self, DisplayZoneParseError> {
        UtcOffset::from_hms(hours, minutes, seconds)
            .map(Self)
            .map_err(|_| DisplayZoneParseError)
    }

    pub const fn offset(&self) -> UtcOffset {
        self.0
    }

    pub fn to_local(&self, ts: Timestamp) -> PrimitiveDateTime {
        let local = ts.0.to_offset(self.0);
        PrimitiveDateTime::new(local.date(), local.time())
    }

    pub fn local_date(&self, ts: Timestamp) -> Date {
        self.to_local(ts).date()
    }

    pub fn to_utc_instant(&self, date: Date, time: Time) -> Timestamp {
        Timestamp::truncate(PrimitiveDateTime::new(date, time).assume_offset(self.0))
    }

    /// Local midnight of `date` as an instant.
    pub fn start_of_day(&self, date: Date) -> Timestamp {
        self.to_utc_instant(date, Time::MIDNIGHT)
    }

    /// The last representable millisecond of `date` as an instant.
    pub fn end_of_day(&self, date: Date) -> Timestamp {
        let end = Time::from_hms_milli(23, 59, 59, 999).unwrap_or(Time::MIDNIGHT);
        self.to_utc_instant(date, end)
    }

    pub fn today(&self) -> Date {
        self.local_date(Timestamp::now())
    }
}

impl Default for DisplayZone {
    fn default() -> Self {
        Self::UTC
    }
}

impl FromStr for DisplayZone {
    type Err = DisplayZoneParseError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("z") || s.eq_ignore_ascii_case("utc") {
            return Ok(Self::UTC);
        }
        UtcOffset::parse(s, UTC_OFFSET_FORMAT)
            .map(Self)
            .map_err(|_| DisplayZoneParseError)
    }
}

impl fmt::Display for DisplayZone {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let s = self.0.format(UTC_OFFSET_FORMAT).map_err(|_| fmt::Error)?;
        f.write_str(&s)
    }
}
