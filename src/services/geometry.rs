//! View-box geometry for the grid, labels and legend
//!
//! Horizontal orientation lays weeks out as columns (primary axis = x) with
//! days as rows; vertical swaps the two. All coordinates are in view-box
//! units and are relative to the group transform they belong to.

use crate::types::{HeatmapOptions, Point};

use super::range::DAYS_IN_WEEK;

pub const MONTH_LABEL_GUTTER_SIZE: f64 = 4.0;

/// Weekday label band width in horizontal orientation
pub const HORIZONTAL_WEEKDAY_LABEL_SIZE: f64 = 30.0;

/// Month labels sit slightly above their week row in vertical orientation
const VERTICAL_MONTH_LABEL_OFFSET: f64 = -2.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Geometry {
    pub square_size: f64,
    pub gutter_size: f64,
    pub horizontal: bool,
    pub show_month_labels: bool,
    pub show_weekday_labels: bool,
    /// Offset in squares of the weekly summary, `None` when disabled
    pub summary_offset: Option<u32>,
    pub legend_rows: usize,
    pub week_count: u32,
}

impl Geometry {
    pub fn new(options: &HeatmapOptions, week_count: u32) -> Self {
        Self {
            square_size: options.square_size,
            gutter_size: options.gutter_size,
            horizontal: options.horizontal,
            show_month_labels: options.show_month_labels,
            show_weekday_labels: options.show_weekday_labels,
            summary_offset: options.weekly_summary.map(|s| s.offset_squares),
            legend_rows: options.legend.len(),
            week_count,
        }
    }

    /// Swap coordinates for vertical orientation
    fn oriented(&self, primary: f64, secondary: f64) -> Point {
        if self.horizontal {
            Point::new(primary, secondary)
        } else {
            Point::new(secondary, primary)
        }
    }

    pub fn square_size_with_gutter(&self) -> f64 {
        self.square_size + self.gutter_size
    }

    pub fn month_label_size(&self) -> f64 {
        if !self.show_month_labels {
            0.0
        } else if self.horizontal {
            self.square_size + MONTH_LABEL_GUTTER_SIZE
        } else {
            2.0 * (self.square_size + MONTH_LABEL_GUTTER_SIZE)
        }
    }

    pub fn weekday_label_size(&self) -> f64 {
        if !self.show_weekday_labels {
            0.0
        } else if self.horizontal {
            HORIZONTAL_WEEKDAY_LABEL_SIZE
        } else {
            self.square_size * 1.5
        }
    }

    /// Day slot of the weekly summary square
    pub fn summary_slot(&self) -> Option<u32> {
        self.summary_offset.map(|offset| DAYS_IN_WEEK + offset)
    }

    /// Span of one week across its seven days (and summary, if any)
    pub fn week_width(&self) -> f64 {
        let slots = self.summary_slot().map(|s| s + 1).unwrap_or(DAYS_IN_WEEK);
        f64::from(slots) * self.square_size_with_gutter()
    }

    /// Length along the week axis
    pub fn primary_axis_length(&self) -> f64 {
        f64::from(self.week_count) * self.square_size_with_gutter() - self.gutter_size
            + self.weekday_label_size()
    }

    /// Length along the day axis
    pub fn secondary_axis_length(&self) -> f64 {
        self.week_width() + self.month_label_size() - self.gutter_size
    }

    pub fn legend_key_height(&self) -> f64 {
        self.square_size + self.gutter_size
    }

    pub fn legend_height(&self) -> f64 {
        self.legend_key_height() * self.legend_rows as f64
    }

    pub fn view_width(&self) -> f64 {
        if self.horizontal {
            self.primary_axis_length()
        } else {
            self.secondary_axis_length()
        }
    }

    /// View height, including the legend band below the grid
    pub fn view_height(&self) -> f64 {
        let grid = if self.horizontal {
            self.secondary_axis_length()
        } else {
            self.primary_axis_length()
        };
        grid + self.legend_height()
    }

    /// Translation of the group holding all weeks
    pub fn weeks_transform(&self) -> Point {
        if self.horizontal {
            Point::new(self.weekday_label_size(), self.month_label_size())
        } else {
            Point::new(0.0, self.weekday_label_size())
        }
    }

    /// Translation of one week within the weeks group
    pub fn week_transform(&self, week: u32) -> Point {
        self.oriented(f64::from(week) * self.square_size_with_gutter(), 0.0)
    }

    pub fn month_labels_transform(&self) -> Point {
        if self.horizontal {
            Point::new(self.weekday_label_size(), 0.0)
        } else {
            Point::new(
                self.week_width() + MONTH_LABEL_GUTTER_SIZE,
                self.weekday_label_size(),
            )
        }
    }

    pub fn weekday_labels_transform(&self) -> Point {
        if self.horizontal {
            Point::new(self.square_size, self.month_label_size())
        } else {
            Point::default()
        }
    }

    pub fn legend_transform(&self) -> Point {
        Point::new(0.0, self.view_height() - self.legend_height())
    }

    /// Square position inside its week for a day slot (0-6, or the summary slot)
    pub fn square_coordinates(&self, slot: u32) -> Point {
        self.oriented(0.0, f64::from(slot) * self.square_size_with_gutter())
    }

    /// Anchor of the weekday label at week-start relative `position`
    pub fn weekday_label_coordinates(&self, position: u32) -> Point {
        let p = f64::from(position);
        if self.horizontal {
            Point::new(0.0, (p + 1.0) * self.square_size + p * self.gutter_size)
        } else {
            Point::new(p * self.square_size + p * self.gutter_size, self.square_size)
        }
    }

    pub fn month_label_coordinates(&self, week: u32) -> Point {
        let w = f64::from(week);
        if self.horizontal {
            Point::new(
                w * self.square_size_with_gutter(),
                self.month_label_size() - MONTH_LABEL_GUTTER_SIZE,
            )
        } else {
            Point::new(
                0.0,
                (w + 1.0) * self.square_size_with_gutter() + VERTICAL_MONTH_LABEL_OFFSET,
            )
        }
    }

    /// Square and text anchors for legend row `row`
    pub fn legend_key_coordinates(&self, row: usize) -> (Point, Point) {
        let key_height = self.legend_key_height();
        let baseline = key_height * (row + 1) as f64;
        (
            Point::new(0.0, baseline - key_height + self.gutter_size + 1.0),
            Point::new(self.square_size + self.gutter_size, baseline),
        )
    }
}
