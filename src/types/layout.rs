//! Layout description produced for one draw pass

use crate::services::derive::TooltipMap;
use chrono::NaiveDate;
use serde::Serialize;

/// A view-box position, also used as a translation
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn offset(self, by: Point) -> Self {
        Self::new(self.x + by.x, self.y + by.y)
    }
}

/// One day cell
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Square<'a, V> {
    /// Position within the week, relative to its transform
    pub x: f64,
    pub y: f64,
    /// Day offset from the padded start
    pub index: i64,
    pub date: NaiveDate,
    /// Week-start relative day slot (0-6)
    pub slot: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<&'a V>,
    pub class_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "TooltipMap::is_empty")]
    pub tooltip_attrs: TooltipMap,
    /// False for padding days
    pub in_range: bool,
}

/// Per-week summary cell
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummarySquare {
    pub x: f64,
    pub y: f64,
    pub class_name: String,
    /// In-range values that fell in this week
    pub value_count: usize,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Week<'a, V> {
    pub index: u32,
    pub transform: Point,
    pub squares: Vec<Square<'a, V>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<SummarySquare>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthLabel {
    pub x: f64,
    pub y: f64,
    pub text: String,
    pub week: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeekdayLabel {
    pub x: f64,
    pub y: f64,
    pub text: String,
    /// Week-start relative position (0-6)
    pub position: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LegendEntry {
    pub square: Point,
    pub text: Point,
    pub class_name: String,
    pub label: String,
}

/// Geometry and per-cell classification for painting.
///
/// Each group carries its own transform; coordinates of its children are
/// relative to it. Square positions are additionally relative to their
/// week's transform.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Layout<'a, V> {
    pub view_width: f64,
    pub view_height: f64,
    pub square_size: f64,
    pub gutter_size: f64,
    pub weeks_transform: Point,
    pub month_labels_transform: Point,
    pub weekday_labels_transform: Point,
    pub legend_transform: Point,
    pub weeks: Vec<Week<'a, V>>,
    pub month_labels: Vec<MonthLabel>,
    pub weekday_labels: Vec<WeekdayLabel>,
    pub legend: Vec<LegendEntry>,
}

impl<'a, V> Layout<'a, V> {
    /// Distance between neighbouring squares
    pub fn pitch(&self) -> f64 {
        self.square_size + self.gutter_size
    }

    pub fn squares(&self) -> impl Iterator<Item = &Square<'a, V>> {
        self.weeks.iter().flat_map(|w| w.squares.iter())
    }

    /// Squares that carry a value
    pub fn filled_count(&self) -> usize {
        self.squares().filter(|s| s.value.is_some()).count()
    }

    pub fn square_for_index(&self, index: i64) -> Option<&Square<'a, V>> {
        self.squares().find(|s| s.index == index)
    }

    /// Top-left corner of a square in absolute view-box coordinates
    pub fn square_origin(&self, week: &Week<'a, V>, square: &Square<'a, V>) -> Point {
        self.weeks_transform
            .offset(week.transform)
            .offset(Point::new(square.x, square.y))
    }

    /// Square covering the view-box point `(x, y)`, gutters excluded
    pub fn square_at(&self, x: f64, y: f64) -> Option<&Square<'a, V>> {
        self.weeks.iter().find_map(|week| {
            week.squares.iter().find(|square| {
                let origin = self.square_origin(week, square);
                x >= origin.x
                    && x < origin.x + self.square_size
                    && y >= origin.y
                    && y < origin.y + self.square_size
            })
        })
    }
}
