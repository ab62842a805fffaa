use std::{fmt, str::FromStr};

use thiserror::Error;
use time::{util::is_leap_year, Date, Month};

use crate::entities::*;

#[derive(Debug, Error)]
#[error("Invalid year and month, expected YYYY-MM")]
pub struct YearMonthParseError;

/// A month of the display calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    first_day: Date,
}

impl YearMonth {
    pub fn new(year: i32, month: Month) -> Option<Self> {
        Date::from_calendar_date(year, month, 1)
            .ok()
            .map(|first_day| Self { first_day })
    }

    /// The month containing `date`.
    pub fn of(date: Date) -> Self {
        Self {
            first_day: date.replace_day(1).unwrap_or(date),
        }
    }

    pub fn year(&self) -> i32 {
        self.first_day.year()
    }

    pub fn month(&self) -> Month {
        self.first_day.month()
    }

    pub fn first_day(&self) -> Date {
        self.first_day
    }

    pub fn last_day(&self) -> Date {
        self.first_day
            .replace_day(self.days_in_month())
            .unwrap_or(self.first_day)
    }

    pub fn days_in_month(&self) -> u8 {
        match self.month() {
            Month::February if is_leap_year(self.year()) => 29,
            Month::February => 28,
            Month::April | Month::June | Month::September | Month::November => 30,
            _ => 31,
        }
    }

    pub fn contains(&self, date: Date) -> bool {
        date.year() == self.year() && date.month() == self.month()
    }

    /// The adjacent month(s), `None` outside of the supported date range.
    pub fn add_months(&self, delta: i32) -> Option<Self> {
        let index = self
            .year()
            .checked_mul(12)?
            .checked_add(i32::from(u8::from(self.month())) - 1)?
            .checked_add(delta)?;
        let month = Month::try_from(u8::try_from(index.rem_euclid(12) + 1).ok()?).ok()?;
        Self::new(index.div_euclid(12), month)
    }

    /// The instants of local midnight on the first day and the local
    /// end of the last day.
    pub fn utc_range(&self, zone: DisplayZone) -> (Timestamp, Timestamp) {
        (
            zone.start_of_day(self.first_day),
            zone.end_of_day(self.last_day()),
        )
    }
}

impl From<Date> for YearMonth {
    fn from(from: Date) -> Self {
        Self::of(from)
    }
}

impl FromStr for YearMonth {
    type Err = YearMonthParseError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (year, month) = s.trim().split_once('-').ok_or(YearMonthParseError)?;
        if year.len() != 4 || month.len() != 2 {
            return Err(YearMonthParseError);
        }
        let year = year.parse::<i32>().map_err(|_| YearMonthParseError)?;
        let month = month
            .parse::<u8>()
            .ok()
            .and_then(|m| Month::try_from(m).ok())
            .ok_or(YearMonthParseError)?;
        Self::new(year, month).ok_or(YearMonthParseError)
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year(), u8::from(self.month()))
    }
}
