//! Heterogeneous date input accepted at the API boundary

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// A date in any of the forms callers hand us.
///
/// Resolution to an instant happens in [`Calendar::normalize`]:
/// - `Text("2017-07-14")` is UTC midnight of that day
/// - `Text` with an RFC 3339 timestamp is that instant
/// - `Text` with a naive `YYYY-MM-DDTHH:MM[:SS]` is local time
/// - `Millis` is UTC epoch milliseconds
/// - `Day` is local midnight of that calendar day
/// - `Instant` is already canonical
///
/// [`Calendar::normalize`]: crate::services::calendar::Calendar::normalize
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DateLike {
    Millis(i64),
    Text(String),
    Day(NaiveDate),
    Instant(DateTime<Utc>),
}

impl From<i64> for DateLike {
    fn from(millis: i64) -> Self {
        Self::Millis(millis)
    }
}

impl From<&str> for DateLike {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for DateLike {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<NaiveDate> for DateLike {
    fn from(day: NaiveDate) -> Self {
        Self::Day(day)
    }
}

impl From<DateTime<Utc>> for DateLike {
    fn from(instant: DateTime<Utc>) -> Self {
        Self::Instant(instant)
    }
}

impl fmt::Display for DateLike {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Millis(ms) => write!(f, "{}", ms),
            Self::Text(text) => f.write_str(text),
            Self::Day(day) => write!(f, "{}T00:00:00", day.format("%Y-%m-%d")),
            Self::Instant(instant) => {
                f.write_str(&instant.to_rfc3339_opts(SecondsFormat::Millis, true))
            }
        }
    }
}

/// JSON shape: integers are epoch millis, strings are parsed later
#[derive(Deserialize)]
#[serde(untagged)]
enum RawDateLike {
    Millis(i64),
    Text(String),
}

impl<'de> Deserialize<'de> for DateLike {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match RawDateLike::deserialize(deserializer)? {
            RawDateLike::Millis(ms) => Self::Millis(ms),
            RawDateLike::Text(text) => Self::Text(text),
        })
    }
}

// `Day` and `Instant` serialize to text forms that parse back to the same instant
impl Serialize for DateLike {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Millis(ms) => serializer.serialize_i64(*ms),
            other => serializer.collect_str(other),
        }
    }
}
