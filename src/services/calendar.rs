//! Date normalization and local-day arithmetic
//!
//! Every [`DateLike`] is resolved to a UTC instant ([`CanonicalDate`]) once,
//! at the boundary. Calendar questions ("which day is this?", "shift by n
//! days") are then answered in a configurable [`Zone`], so results do not
//! depend on the host timezone unless `Zone::Local` is chosen.

use crate::types::{DateLike, HeatmapError, Result};
use chrono::{
    DateTime, Duration, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Offset, TimeZone, Utc,
};
use serde::{Deserialize, Serialize};

/// Normalized internal date representation
pub type CanonicalDate = DateTime<Utc>;

pub const MILLISECONDS_IN_ONE_DAY: i64 = 86_400_000;

/// Naive date-time layouts accepted as local time
const LOCAL_DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Timezone used to interpret "local" calendar days
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Zone {
    /// Host timezone
    #[default]
    Local,
    Utc,
    /// Fixed offset in seconds east of UTC
    Offset(i32),
}

impl Zone {
    pub fn validate(self) -> Result<()> {
        match self {
            Self::Offset(secs) if FixedOffset::east_opt(secs).is_none() => Err(
                HeatmapError::InvalidConfig(format!("zone offset out of range: {}s", secs)),
            ),
            _ => Ok(()),
        }
    }

    fn fixed(secs: i32) -> FixedOffset {
        FixedOffset::east_opt(secs).unwrap_or_else(|| Utc.fix())
    }

    /// Wall-clock reading of `instant` in this zone
    pub fn to_local(self, instant: CanonicalDate) -> NaiveDateTime {
        match self {
            Self::Local => instant.with_timezone(&chrono::Local).naive_local(),
            Self::Utc => instant.naive_utc(),
            Self::Offset(secs) => instant.with_timezone(&Self::fixed(secs)).naive_local(),
        }
    }

    /// Instant of a wall-clock reading in this zone
    pub fn from_local(self, naive: NaiveDateTime) -> CanonicalDate {
        match self {
            Self::Local => resolve_local(&chrono::Local, naive),
            Self::Utc => naive.and_utc(),
            Self::Offset(secs) => resolve_local(&Self::fixed(secs), naive),
        }
    }
}

/// Ambiguous readings take the earlier instant; readings inside a DST gap
/// move forward to the first valid instant.
fn resolve_local<Tz: TimeZone>(tz: &Tz, naive: NaiveDateTime) -> CanonicalDate {
    if let Some(dt) = tz.from_local_datetime(&naive).earliest() {
        return dt.with_timezone(&Utc);
    }
    let mut probe = naive;
    for _ in 0..8 {
        probe += Duration::minutes(15);
        if let Some(dt) = tz.from_local_datetime(&probe).earliest() {
            return dt.with_timezone(&Utc);
        }
    }
    naive.and_utc()
}

/// Shift a calendar day by `n` days (negative goes back)
pub fn shift_day(day: NaiveDate, n: i64) -> Result<NaiveDate> {
    Duration::try_days(n)
        .and_then(|delta| day.checked_add_signed(delta))
        .ok_or_else(|| HeatmapError::DateOutOfRange(format!("{} shifted by {} days", day, n)))
}

/// Calendar arithmetic in one zone
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Calendar {
    zone: Zone,
}

impl Calendar {
    pub fn new(zone: Zone) -> Self {
        Self { zone }
    }

    pub fn zone(&self) -> Zone {
        self.zone
    }

    /// Resolve a [`DateLike`] to an instant.
    ///
    /// An `Instant` comes back unchanged. A date-only string is UTC midnight
    /// in every zone.
    pub fn normalize(&self, input: &DateLike) -> Result<CanonicalDate> {
        match input {
            DateLike::Instant(instant) => Ok(*instant),
            DateLike::Millis(ms) => DateTime::from_timestamp_millis(*ms).ok_or_else(|| {
                HeatmapError::InvalidDate(format!("timestamp out of range: {}", ms))
            }),
            DateLike::Day(day) => Ok(self.midnight(*day)),
            DateLike::Text(text) => self.parse_text(text.trim()),
        }
    }

    fn parse_text(&self, text: &str) -> Result<CanonicalDate> {
        if let Ok(day) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
            return Ok(day.and_time(NaiveTime::MIN).and_utc());
        }
        if let Ok(instant) = DateTime::parse_from_rfc3339(text) {
            return Ok(instant.with_timezone(&Utc));
        }
        LOCAL_DATETIME_FORMATS
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
            .map(|naive| self.zone.from_local(naive))
            .ok_or_else(|| HeatmapError::InvalidDate(text.to_string()))
    }

    /// Local calendar day of an instant
    pub fn local_date(&self, date: CanonicalDate) -> NaiveDate {
        self.zone.to_local(date).date()
    }

    /// Local midnight of a calendar day
    pub fn midnight(&self, day: NaiveDate) -> CanonicalDate {
        self.zone.from_local(day.and_time(NaiveTime::MIN))
    }

    pub fn start_of_local_day(&self, date: CanonicalDate) -> CanonicalDate {
        self.midnight(self.local_date(date))
    }

    /// Last millisecond of the local day
    pub fn end_of_local_day(&self, date: CanonicalDate) -> CanonicalDate {
        let day = self.local_date(date);
        match day.succ_opt() {
            Some(next) => self.midnight(next) - Duration::milliseconds(1),
            // NaiveTime arithmetic wraps, so this is 23:59:59.999
            None => self
                .zone
                .from_local(day.and_time(NaiveTime::MIN - Duration::milliseconds(1))),
        }
    }

    /// Same local time of day, `n` calendar days later
    pub fn shift_by_days(&self, date: CanonicalDate, n: i64) -> Result<CanonicalDate> {
        let local = self.zone.to_local(date);
        Duration::try_days(n)
            .and_then(|delta| local.checked_add_signed(delta))
            .map(|shifted| self.zone.from_local(shifted))
            .ok_or_else(|| {
                HeatmapError::DateOutOfRange(format!("{} shifted by {} days", date, n))
            })
    }

    /// Local days from `start`'s day through `end`'s day, both included.
    ///
    /// Time-of-day never changes the result; `end` before `start` gives
    /// zero or a negative count.
    pub fn days_between_inclusive(&self, start: CanonicalDate, end: CanonicalDate) -> i64 {
        (self.local_date(end) - self.local_date(start)).num_days() + 1
    }
}
