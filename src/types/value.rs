//! Dated values plotted on the heatmap

use super::{DateLike, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Anything that can be placed on the calendar grid.
///
/// The core only ever reads the date; every other field is handed back to
/// the caller's derivation functions untouched.
pub trait HeatmapValue {
    fn date(&self) -> &DateLike;
}

/// A dated count with arbitrary extra JSON fields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayValue {
    pub date: DateLike,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<i64>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl DayValue {
    pub fn new(date: impl Into<DateLike>, count: i64) -> Self {
        Self {
            date: date.into(),
            count: Some(count),
            extra: serde_json::Map::new(),
        }
    }

    /// Count treated as zero when missing or negative
    pub fn count_or_zero(&self) -> u64 {
        self.count.map(|c| c.max(0) as u64).unwrap_or(0)
    }

    /// Read a JSON array of values
    pub fn load_json_file(path: &Path) -> Result<Vec<Self>> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }
}

impl HeatmapValue for DayValue {
    fn date(&self) -> &DateLike {
        &self.date
    }
}

impl<T: HeatmapValue + ?Sized> HeatmapValue for &T {
    fn date(&self) -> &DateLike {
        (**self).date()
    }
}
