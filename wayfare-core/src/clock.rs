//! Zone-naive times of day expressed as minutes since the start of a trip day.
//!
//! Itineraries are scheduled in a single declared timezone per trip, so the
//! engine never tracks calendar rollover. A visit that runs past midnight keeps
//! counting upwards: `24:30` is half past midnight of the *same* trip day.
//! Hours up to 47 are accepted so overnight values survive a parse/format
//! round trip.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Number of minutes in one calendar day.
pub const MINUTES_PER_DAY: u32 = 24 * 60;

const MAX_MINUTES: u32 = 2 * MINUTES_PER_DAY - 1;

/// Errors returned when parsing a [`ClockTime`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClockTimeError {
    /// The input was not shaped like `HH:MM`, `HH:MM:SS` or `HHMM`.
    #[error("'{input}' is not a time of day (expected HH:MM)")]
    Malformed {
        /// Raw input string.
        input: String,
    },
    /// Hours or minutes were outside the accepted range.
    #[error("'{input}' is out of range (hours 0-47, minutes 0-59)")]
    OutOfRange {
        /// Raw input string.
        input: String,
    },
}

/// Minutes since the start of the trip day.
///
/// # Examples
/// ```
/// use wayfare_core::ClockTime;
///
/// let opens: ClockTime = "09:30".parse()?;
/// assert_eq!(opens.minutes(), 570);
/// assert_eq!(opens.add_minutes(45).to_string(), "10:15");
/// # Ok::<(), wayfare_core::ClockTimeError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct ClockTime(u32);

impl ClockTime {
    /// Midnight at the start of the day.
    pub const MIDNIGHT: Self = Self(0);

    /// Build a time from cumulative minutes, saturating at `47:59`.
    pub const fn from_minutes(minutes: u32) -> Self {
        if minutes > MAX_MINUTES {
            Self(MAX_MINUTES)
        } else {
            Self(minutes)
        }
    }

    /// Build a time from an hour and minute pair.
    ///
    /// Returns `None` when the hour exceeds 47 or the minute exceeds 59.
    pub const fn from_hm(hours: u32, minutes: u32) -> Option<Self> {
        if hours > 47 || minutes > 59 {
            return None;
        }
        Some(Self(hours * 60 + minutes))
    }

    /// Cumulative minutes since the start of the day.
    pub const fn minutes(self) -> u32 {
        self.0
    }

    /// Minutes past the most recent midnight, folding overnight values back
    /// into `0..1440`.
    pub const fn minute_of_day(self) -> u32 {
        self.0 % MINUTES_PER_DAY
    }

    /// Advance by `minutes`, saturating at `47:59`.
    #[must_use]
    pub const fn add_minutes(self, minutes: u32) -> Self {
        Self::from_minutes(self.0.saturating_add(minutes))
    }

    /// The same wall-clock time on the following day.
    #[must_use]
    pub const fn next_day(self) -> Self {
        self.add_minutes(MINUTES_PER_DAY)
    }

    /// Signed minutes from `self` until `later`; negative when `later` is
    /// earlier.
    pub fn minutes_until(self, later: Self) -> i64 {
        i64::from(later.0) - i64::from(self.0)
    }

    /// Parse `raw`, logging and discarding malformed input.
    ///
    /// Itinerary documents are user supplied, so unparsable times degrade the
    /// affected check to "unknown" instead of failing the request.
    pub fn parse_lenient(raw: &str, field: &str) -> Option<Self> {
        match raw.parse() {
            Ok(time) => Some(time),
            Err(err) => {
                log::warn!("ignoring {field}: {err}");
                None
            }
        }
    }
}

impl FromStr for ClockTime {
    type Err = ClockTimeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let parts = match trimmed.split(':').collect::<Vec<_>>().as_slice() {
            [h, m] | [h, m, _] => parse_component(h).zip(parse_component(m)),
            // Compact `HHMM` as used by place-data providers.
            [compact] if compact.len() == 4 && compact.bytes().all(|b| b.is_ascii_digit()) => {
                let (h, m) = compact.split_at(2);
                parse_component(h).zip(parse_component(m))
            }
            _ => None,
        };
        let (hours, minutes) = parts.ok_or_else(|| ClockTimeError::Malformed {
            input: s.to_owned(),
        })?;
        Self::from_hm(hours, minutes).ok_or_else(|| ClockTimeError::OutOfRange {
            input: s.to_owned(),
        })
    }
}

fn parse_component(raw: &str) -> Option<u32> {
    if raw.is_empty() || raw.len() > 2 || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    raw.parse().ok()
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.0 / 60, self.0 % 60)
    }
}

impl Serialize for ClockTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ClockTime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("09:00", 540)]
    #[case("9:05", 545)]
    #[case("17:30:00", 1050)]
    #[case("2230", 1350)]
    #[case("25:15", 1515)]
    #[case(" 00:00 ", 0)]
    fn parses_supported_shapes(#[case] raw: &str, #[case] minutes: u32) {
        let time: ClockTime = raw.parse().expect("valid time");
        assert_eq!(time.minutes(), minutes);
    }

    #[rstest]
    #[case("")]
    #[case("noon")]
    #[case("9")]
    #[case("9:5:1:2")]
    #[case("-1:00")]
    fn rejects_malformed(#[case] raw: &str) {
        let err = raw.parse::<ClockTime>().expect_err("malformed");
        assert!(matches!(err, ClockTimeError::Malformed { .. }));
    }

    #[rstest]
    #[case("48:00")]
    #[case("10:60")]
    fn rejects_out_of_range(#[case] raw: &str) {
        let err = raw.parse::<ClockTime>().expect_err("out of range");
        assert!(matches!(err, ClockTimeError::OutOfRange { .. }));
    }

    #[test]
    fn formats_overnight_values_cumulatively() {
        let late = ClockTime::from_minutes(23 * 60 + 45).add_minutes(30);
        assert_eq!(late.to_string(), "24:15");
        assert_eq!(late.minute_of_day(), 15);
    }

    #[test]
    fn add_minutes_saturates() {
        let time = ClockTime::from_minutes(MAX_MINUTES).add_minutes(90);
        assert_eq!(time.minutes(), MAX_MINUTES);
    }

    #[test]
    fn minutes_until_is_signed() {
        let eleven = ClockTime::from_minutes(660);
        let half_ten = ClockTime::from_minutes(630);
        assert_eq!(eleven.minutes_until(half_ten), -30);
        assert_eq!(half_ten.minutes_until(eleven), 30);
    }

    #[test]
    fn lenient_parse_discards_garbage() {
        assert_eq!(ClockTime::parse_lenient("later", "arrivalTime"), None);
        assert_eq!(
            ClockTime::parse_lenient("08:00", "arrivalTime"),
            ClockTime::from_hm(8, 0)
        );
    }

    #[test]
    fn serde_uses_hh_mm_strings() {
        let time = ClockTime::from_minutes(545);
        let json = serde_json::to_string(&time).expect("serialise");
        assert_eq!(json, "\"09:05\"");
        let back: ClockTime = serde_json::from_str(&json).expect("deserialise");
        assert_eq!(back, time);
    }
}
