mod consts;
mod peel;
mod prelude;
mod types;

pub use consts::*;
pub use peel::{
    decompose_day_count, verify_strategy_equivalence, Division, MagicDivisor, MulShift,
    PeelArithmetic, RawDate, StrategyDivergence, MAGIC_100_YEARS, MAGIC_400_YEARS, MAGIC_4_YEARS,
    MAGIC_YEARS,
};
pub use types::{days_in_month, is_leap_year, Day, Month, Year};

use crate::prelude::*;
use serde::{Deserialize, Serialize};
use std::convert::TryFrom;

/// Everything that can go wrong constructing an instant or a date.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DateError {
    /// Tick count before the epoch or past the last tick of 9999-12-31.
    #[error("tick count {0} is outside the representable range (0001-01-01 through 9999-12-31)")]
    TicksOutOfRange(i64),
    /// Unix second count whose tick conversion overflows or lands outside
    /// the representable range.
    #[error("unix second count {0} falls outside the representable tick range")]
    UnixSecondsOutOfRange(i64),
    /// Day count at or past the first day of year 10000.
    #[error("day count {0} is past the last representable proleptic-Gregorian day")]
    DayCountOutOfRange(u32),
    #[error("invalid year: {0} (must be 1-9999)")]
    InvalidYear(u16),
    #[error("invalid month: {0} (must be 1-12)")]
    InvalidMonth(u8),
    #[error("invalid day {day} for month {year}-{month:02}")]
    InvalidDay { month: u8, day: u8, year: u16 },
}

/// An absolute instant: a count of 100ns ticks since 0001-01-01T00:00:00.
///
/// Construction validates the tick count against `0..=MAX_TICKS`, so every
/// `Instant` decomposes into a valid calendar date without further checks.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, Serialize, Deserialize,
)]
#[display(fmt = "{_0}")]
#[serde(try_from = "i64", into = "i64")]
pub struct Instant(i64);

impl Instant {
    /// Creates an instant from a raw tick count.
    ///
    /// # Errors
    /// Returns `DateError::TicksOutOfRange` unless `0 <= ticks <= MAX_TICKS`.
    pub fn new(ticks: i64) -> Result<Self, DateError> {
        if !(0..=MAX_TICKS).contains(&ticks) {
            return Err(DateError::TicksOutOfRange(ticks));
        }
        Ok(Self(ticks))
    }

    /// Creates an instant from whole seconds since the Unix epoch.
    /// Negative values reach back before 1970, as far as year 1.
    ///
    /// # Errors
    /// Returns `DateError::UnixSecondsOutOfRange` if the tick conversion
    /// overflows, or `DateError::TicksOutOfRange` if the result lands
    /// outside the representable range.
    pub fn from_unix_seconds(seconds: i64) -> Result<Self, DateError> {
        let ticks = seconds
            .checked_mul(TICKS_PER_SECOND)
            .and_then(|t| t.checked_add(UNIX_EPOCH_TICKS))
            .ok_or(DateError::UnixSecondsOutOfRange(seconds))?;
        Self::new(ticks)
    }

    /// Returns the raw tick count.
    #[inline]
    pub const fn ticks(self) -> i64 {
        self.0
    }

    /// Whole days elapsed since the epoch's day boundary.
    /// Day 0 is 0001-01-01.
    #[inline]
    pub const fn day_count(self) -> u32 {
        (self.0 / TICKS_PER_DAY) as u32
    }
}

impl TryFrom<i64> for Instant {
    type Error = DateError;

    fn try_from(ticks: i64) -> Result<Self, Self::Error> {
        Self::new(ticks)
    }
}

impl From<Instant> for i64 {
    fn from(instant: Instant) -> Self {
        instant.0
    }
}

/// A proleptic-Gregorian calendar date with validated components.
///
/// Orders lexicographically by (year, month, day).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, Serialize, Deserialize,
)]
#[display(fmt = "{:04}-{:02}-{:02}", "year.get()", "month.get()", "day.get()")]
#[serde(try_from = "(u16, u8, u8)", into = "(u16, u8, u8)")]
pub struct CalendarDate {
    year:  Year,
    month: Month,
    day:   Day,
}

impl CalendarDate {
    /// Creates a date from its components, validating each one.
    ///
    /// # Errors
    /// Returns the `DateError` of the first invalid component.
    pub fn new(year: u16, month: u8, day: u8) -> Result<Self, DateError> {
        Ok(Self {
            year:  Year::new(year)?,
            month: Month::new(month)?,
            day:   Day::new(day, year, month)?,
        })
    }

    /// Wraps peeling output, which is well-formed by construction.
    fn from_raw(raw: RawDate) -> Self {
        Self {
            year:  Year::from_peeled(raw.year),
            month: Month::from_peeled(raw.month),
            day:   Day::from_peeled(raw.day),
        }
    }

    /// Returns the year component
    pub const fn year(&self) -> Year {
        self.year
    }

    /// Returns the month component
    pub const fn month(&self) -> Month {
        self.month
    }

    /// Returns the day component
    pub const fn day(&self) -> Day {
        self.day
    }

    /// Returns the components as a plain (year, month, day) triple
    pub const fn to_parts(&self) -> (u16, u8, u8) {
        (self.year.get(), self.month.get(), self.day.get())
    }

    /// Whole days from 0001-01-01 to this date, the inverse of
    /// decomposition (standard Gregorian day-number formula).
    pub fn day_count(&self) -> u32 {
        let y = u32::from(self.year.get()) - 1;
        let table = if is_leap_year(self.year.get()) {
            &DAYS_TO_MONTH_366
        } else {
            &DAYS_TO_MONTH_365
        };
        y * DAYS_PER_YEAR + y / 4 - y / 100 + y / 400
            + u32::from(table[self.month.get() as usize - 1])
            + u32::from(self.day.get())
            - 1
    }

    /// The midnight instant of this date.
    pub fn to_instant(&self) -> Instant {
        Instant(i64::from(self.day_count()) * TICKS_PER_DAY)
    }
}

impl TryFrom<(u16, u8, u8)> for CalendarDate {
    type Error = DateError;

    fn try_from(parts: (u16, u8, u8)) -> Result<Self, Self::Error> {
        Self::new(parts.0, parts.1, parts.2)
    }
}

impl From<CalendarDate> for (u16, u8, u8) {
    fn from(date: CalendarDate) -> Self {
        date.to_parts()
    }
}

/// Which quotient arithmetic a [`Decomposer`] runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Strategy {
    /// True integer division at each period level; always correct.
    #[default]
    Division,
    /// Multiply-shift strength reduction; exists purely for throughput and
    /// must pass the equivalence sweep before use.
    MulShift,
}

/// Decomposes instants into calendar dates with a fixed strategy.
///
/// The multiply-shift strategy can only be obtained through
/// [`Decomposer::with_strategy`], which verifies it against the division
/// baseline over the full day-count domain before returning. Division
/// needs no such gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decomposer {
    strategy: Strategy,
}

impl Decomposer {
    /// A decomposer using the division baseline.
    pub const fn new() -> Self {
        Self {
            strategy: Strategy::Division,
        }
    }

    /// A decomposer using `strategy`, running the full-domain equivalence
    /// check first when the multiply-shift strategy is requested.
    ///
    /// # Errors
    /// Returns the first `StrategyDivergence` found; the multiply-shift
    /// constants must not be used on a target where this fails.
    pub fn with_strategy(strategy: Strategy) -> Result<Self, StrategyDivergence> {
        if strategy == Strategy::MulShift {
            verify_strategy_equivalence()?;
        }
        Ok(Self { strategy })
    }

    /// Returns the strategy this decomposer runs.
    pub const fn strategy(&self) -> Strategy {
        self.strategy
    }

    /// Splits an instant into its calendar date.
    ///
    /// Infallible: `Instant` guarantees its day count is in range, and
    /// the hot path performs no allocation and takes no lock.
    pub fn decompose(&self, instant: Instant) -> CalendarDate {
        let day_count = instant.day_count();
        let raw = match self.strategy {
            Strategy::Division => peel::peel::<Division>(day_count),
            Strategy::MulShift => peel::peel::<MulShift>(day_count),
        };
        CalendarDate::from_raw(raw)
    }
}

impl Default for Decomposer {
    fn default() -> Self {
        Self::new()
    }
}

/// Decomposes an instant with the division baseline.
pub fn decompose(instant: Instant) -> CalendarDate {
    Decomposer::new().decompose(instant)
}
