use std::fmt;
use std::str::FromStr;

use super::DurationError;

pub const MILLISECOND: u64 = 1;
pub const SECOND: u64 = MILLISECOND * 1000;
pub const MINUTE: u64 = SECOND * 60;
pub const HOUR: u64 = MINUTE * 60;
pub const DAY: u64 = HOUR * 24;
pub const WEEK: u64 = DAY * 7;
/// An average month of 30.4167 days.
pub const MONTH: u64 = DAY * 304_167 / 10_000;
pub const YEAR: u64 = DAY * 365;

/// A unit of time with a fixed millisecond length.
///
/// Months and years are approximations; there is no calendar awareness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Unit {
    Millisecond,
    Second,
    Minute,
    Hour,
    Day,
    Week,
    Month,
    Year,
}

impl Unit {
    /// Largest unit first, the order used when formatting.
    pub const DESCENDING: [Unit; 8] = [
        Unit::Year,
        Unit::Month,
        Unit::Week,
        Unit::Day,
        Unit::Hour,
        Unit::Minute,
        Unit::Second,
        Unit::Millisecond,
    ];

    pub fn millis(self) -> u64 {
        match self {
            Unit::Millisecond => MILLISECOND,
            Unit::Second => SECOND,
            Unit::Minute => MINUTE,
            Unit::Hour => HOUR,
            Unit::Day => DAY,
            Unit::Week => WEEK,
            Unit::Month => MONTH,
            Unit::Year => YEAR,
        }
    }

    pub fn short(self) -> &'static str {
        match self {
            Unit::Millisecond => "ms",
            Unit::Second => "s",
            Unit::Minute => "m",
            Unit::Hour => "h",
            Unit::Day => "d",
            Unit::Week => "w",
            Unit::Month => "mt",
            Unit::Year => "y",
        }
    }

    /// Singular long name, e.g. `"hour"`.
    pub fn long(self) -> &'static str {
        match self {
            Unit::Millisecond => "millisecond",
            Unit::Second => "second",
            Unit::Minute => "minute",
            Unit::Hour => "hour",
            Unit::Day => "day",
            Unit::Week => "week",
            Unit::Month => "month",
            Unit::Year => "year",
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.long())
    }
}

impl FromStr for Unit {
    type Err = DurationError;

    /// Accepts the short form, the long singular form and the long plural
    /// form, ignoring case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_ascii_lowercase();
        Unit::DESCENDING
            .into_iter()
            .find(|unit| {
                lower == unit.short()
                    || lower == unit.long()
                    || lower.strip_suffix('s') == Some(unit.long())
            })
            .ok_or_else(|| DurationError::UnknownUnit(s.to_string()))
    }
}
