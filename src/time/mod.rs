//! Human-readable durations.
//!
//! A [`Span`] is a canonical millisecond count. It can be parsed from
//! expressions such as `"1h"`, `"90 minutes"` or `"1 day, 12h"`, viewed as a
//! ratio of any [`Unit`], and formatted back into coarse units.

mod unit;

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, TimeDelta, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

pub use unit::*;

static COMPONENT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<amount>\d+) *(?P<unit>[A-Za-z]+)$").expect("component pattern is valid")
});

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DurationError {
    #[error("unknown time unit: {0}")]
    UnknownUnit(String),

    #[error("duplicate time unit at position {position}: {unit}")]
    DuplicateUnit { unit: Unit, position: usize },

    #[error("malformed duration component: {0:?}")]
    Malformed(String),

    #[error("duration is too large: {0}")]
    Overflow(String),
}

/// A duration measured in whole milliseconds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Span(u64);

impl Span {
    pub const ZERO: Span = Span(0);

    pub const fn from_millis(ms: u64) -> Self {
        Span(ms)
    }

    /// `amount` of `unit`, or `None` if that does not fit in a u64.
    pub fn of(amount: u64, unit: Unit) -> Option<Self> {
        amount.checked_mul(unit.millis()).map(Span)
    }

    /// Parses a duration expression.
    ///
    /// A bare integer is taken as milliseconds. Anything else is a
    /// comma-separated list of `<amount><unit>` components, each unit used
    /// at most once.
    pub fn parse(input: &str) -> Result<Self, DurationError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(DurationError::Malformed(input.to_string()));
        }
        if input.bytes().all(|b| b.is_ascii_digit()) {
            return input
                .parse()
                .map(Span)
                .map_err(|_| DurationError::Overflow(input.to_string()));
        }

        let mut seen: Vec<Unit> = Vec::new();
        let mut total: u64 = 0;
        for (position, component) in input.split(',').map(str::trim).enumerate() {
            let (amount, unit) = split_component(component)?;
            if seen.contains(&unit) {
                return Err(DurationError::DuplicateUnit { unit, position });
            }
            seen.push(unit);

            total = Span::of(amount, unit)
                .and_then(|span| total.checked_add(span.0))
                .ok_or_else(|| DurationError::Overflow(input.to_string()))?;
        }
        Ok(Span(total))
    }

    pub fn millis(self) -> u64 {
        self.0
    }

    /// This span as a (fractional) number of `unit`s.
    pub fn ratio(self, unit: Unit) -> f64 {
        self.0 as f64 / unit.millis() as f64
    }

    pub fn seconds(self) -> f64 {
        self.ratio(Unit::Second)
    }

    pub fn minutes(self) -> f64 {
        self.ratio(Unit::Minute)
    }

    pub fn hours(self) -> f64 {
        self.ratio(Unit::Hour)
    }

    pub fn days(self) -> f64 {
        self.ratio(Unit::Day)
    }

    pub fn weeks(self) -> f64 {
        self.ratio(Unit::Week)
    }

    pub fn months(self) -> f64 {
        self.ratio(Unit::Month)
    }

    pub fn years(self) -> f64 {
        self.ratio(Unit::Year)
    }

    /// The instant this span after `base`, saturating at chrono's range.
    pub fn after(self, base: DateTime<Utc>) -> DateTime<Utc> {
        base.checked_add_signed(self.delta())
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    }

    /// The instant this span before `base`, saturating at chrono's range.
    pub fn before(self, base: DateTime<Utc>) -> DateTime<Utc> {
        base.checked_sub_signed(self.delta())
            .unwrap_or(DateTime::<Utc>::MIN_UTC)
    }

    pub fn from_now(self) -> DateTime<Utc> {
        self.after(Utc::now())
    }

    pub fn ago(self) -> DateTime<Utc> {
        self.before(Utc::now())
    }

    /// Greedy breakdown from years down to milliseconds.
    ///
    /// Zero quantities are left out. The long form reads `"1 day, 2 hours"`;
    /// the short form reads `"1d 2h"`.
    pub fn format(self, short: bool) -> String {
        let mut rest = self.0;
        let mut parts = Vec::new();
        for unit in Unit::DESCENDING {
            let quantity = rest / unit.millis();
            rest %= unit.millis();
            if quantity == 0 {
                continue;
            }
            if short {
                parts.push(format!("{}{}", quantity, unit.short()));
            } else {
                let plural = if quantity > 1 { "s" } else { "" };
                parts.push(format!("{} {}{}", quantity, unit.long(), plural));
            }
        }

        match (parts.is_empty(), short) {
            (true, true) => "0s".to_string(),
            (true, false) => "0 seconds".to_string(),
            (false, true) => parts.join(" "),
            (false, false) => parts.join(", "),
        }
    }

    fn delta(self) -> TimeDelta {
        i64::try_from(self.0)
            .ok()
            .and_then(TimeDelta::try_milliseconds)
            .unwrap_or(TimeDelta::MAX)
    }
}

fn split_component(component: &str) -> Result<(u64, Unit), DurationError> {
    let caps = COMPONENT
        .captures(component)
        .ok_or_else(|| DurationError::Malformed(component.to_string()))?;
    let amount = caps["amount"]
        .parse::<u64>()
        .map_err(|_| DurationError::Overflow(component.to_string()))?;
    let unit = caps["unit"].parse::<Unit>()?;
    Ok((amount, unit))
}

impl From<u64> for Span {
    fn from(ms: u64) -> Self {
        Span(ms)
    }
}

impl From<Span> for std::time::Duration {
    fn from(span: Span) -> Self {
        std::time::Duration::from_millis(span.0)
    }
}

impl FromStr for Span {
    type Err = DurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Span::parse(s)
    }
}

/// Long form by default, short form with `{:#}`.
impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format(f.alternate()))
    }
}
