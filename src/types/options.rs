//! Heatmap configuration

use super::{DateLike, HeatmapError, Result};
use crate::services::calendar::Zone;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const DEFAULT_MONTH_LABELS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

pub const DEFAULT_WEEKDAY_LABELS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

/// Which weekday labels are drawn, by week-start relative position (0-6)
#[derive(Clone, Copy, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeekdayLabelVisibility {
    /// Odd positions only, so neighbouring labels never crowd
    #[default]
    Alternate,
    All,
    None,
    #[serde(skip)]
    Custom(fn(u32) -> bool),
}

impl WeekdayLabelVisibility {
    pub fn is_visible(self, position: u32) -> bool {
        match self {
            Self::Alternate => position % 2 == 1,
            Self::All => true,
            Self::None => false,
            Self::Custom(predicate) => predicate(position),
        }
    }
}

impl fmt::Debug for WeekdayLabelVisibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Alternate => f.write_str("Alternate"),
            Self::All => f.write_str("All"),
            Self::None => f.write_str("None"),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// Extra per-week summary square placed after the seven day slots
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklySummaryOptions {
    /// Empty square slots between the last weekday and the summary square
    pub offset_squares: u32,
}

/// One row of the legend drawn below the grid
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegendKey {
    pub class_name: String,
    pub label: String,
}

/// All plain-data settings of a heatmap.
///
/// Derivation callbacks live in [`Derivations`](crate::services::derive::Derivations)
/// since they cannot be deserialized.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HeatmapOptions {
    pub start_date: Option<DateLike>,
    /// Inclusive; `None` means now
    pub end_date: Option<DateLike>,
    /// Deprecated day count, takes precedence over `start_date`
    pub num_days: Option<u32>,
    pub square_size: f64,
    pub gutter_size: f64,
    pub horizontal: bool,
    pub show_month_labels: bool,
    pub show_weekday_labels: bool,
    pub show_out_of_range_days: bool,
    /// 0 = Sunday ... 6 = Saturday
    pub week_start_day: u32,
    /// January first
    pub month_labels: Vec<String>,
    /// Sunday first, regardless of `week_start_day`
    pub weekday_labels: Vec<String>,
    pub weekday_label_visibility: WeekdayLabelVisibility,
    pub weekly_summary: Option<WeeklySummaryOptions>,
    pub legend: Vec<LegendKey>,
    pub zone: Zone,
}

impl Default for HeatmapOptions {
    fn default() -> Self {
        Self {
            start_date: None,
            end_date: None,
            num_days: None,
            square_size: 10.0,
            gutter_size: 1.0,
            horizontal: true,
            show_month_labels: true,
            show_weekday_labels: false,
            show_out_of_range_days: false,
            week_start_day: 0,
            month_labels: DEFAULT_MONTH_LABELS.iter().map(|s| s.to_string()).collect(),
            weekday_labels: DEFAULT_WEEKDAY_LABELS.iter().map(|s| s.to_string()).collect(),
            weekday_label_visibility: WeekdayLabelVisibility::default(),
            weekly_summary: None,
            legend: Vec::new(),
            zone: Zone::default(),
        }
    }
}

impl HeatmapOptions {
    /// Explicit date range (inclusive on both ends)
    pub fn with_range(start: impl Into<DateLike>, end: impl Into<DateLike>) -> Self {
        Self {
            start_date: Some(start.into()),
            end_date: Some(end.into()),
            ..Self::default()
        }
    }

    /// Load options from a JSON file, missing keys take their defaults
    pub fn from_json_file(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let options: Self = serde_json::from_str(&content)?;
        options.validate()?;
        Ok(options)
    }

    pub fn validate(&self) -> Result<()> {
        if self.week_start_day > 6 {
            return Err(HeatmapError::InvalidConfig(format!(
                "weekStartDay must be 0-6, got {}",
                self.week_start_day
            )));
        }
        if self.month_labels.len() != 12 {
            return Err(HeatmapError::InvalidConfig(format!(
                "monthLabels needs 12 entries, got {}",
                self.month_labels.len()
            )));
        }
        if self.weekday_labels.len() != 7 {
            return Err(HeatmapError::InvalidConfig(format!(
                "weekdayLabels needs 7 entries, got {}",
                self.weekday_labels.len()
            )));
        }
        if !(self.square_size > 0.0 && self.square_size.is_finite()) {
            return Err(HeatmapError::InvalidConfig(format!(
                "squareSize must be positive, got {}",
                self.square_size
            )));
        }
        if !(self.gutter_size >= 0.0 && self.gutter_size.is_finite()) {
            return Err(HeatmapError::InvalidConfig(format!(
                "gutterSize must be non-negative, got {}",
                self.gutter_size
            )));
        }
        self.zone.validate()
    }
}
