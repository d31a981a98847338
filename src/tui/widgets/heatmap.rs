//! Terminal rendering of a heatmap [`Layout`]
//!
//! Each square becomes a two-character block. Weeks run along columns in
//! horizontal orientation and along rows in vertical orientation, matching
//! the view-box layout.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    widgets::Widget,
};

use crate::services::range::DAYS_IN_WEEK;
use crate::tui::theme::Theme;
use crate::types::{Layout, Point};

/// Cell dimensions for grid layout
pub const CELL_WIDTH: u16 = 3; // 2 chars content + 1 gap
const LABEL_WIDTH: u16 = 4; // "Mon " prefix
const MONTH_LABEL_WIDTH: u16 = 4;

const FILLED: &str = "██";
const PADDING: &str = "░░";

/// Heatmap grid widget for ratatui
pub struct HeatmapGrid<'l, 'a, V> {
    layout: &'l Layout<'a, V>,
    horizontal: bool,
    theme: Theme,
    selected: Option<i64>,
}

impl<'l, 'a, V> HeatmapGrid<'l, 'a, V> {
    pub fn new(layout: &'l Layout<'a, V>, horizontal: bool, theme: Theme) -> Self {
        Self {
            layout,
            horizontal,
            theme,
            selected: None,
        }
    }

    pub fn with_selected(mut self, index: Option<i64>) -> Self {
        self.selected = index;
        self
    }

    /// Day slots per week, including the summary slot
    fn slot_count(&self) -> u16 {
        let summary_slot = self
            .layout
            .weeks
            .iter()
            .filter_map(|w| w.summary.as_ref())
            .map(|s| self.slot_of(Point::new(s.x, s.y)))
            .max();
        summary_slot.map_or(DAYS_IN_WEEK as u16, |s| s + 1)
    }

    /// Slot of a position inside a week
    fn slot_of(&self, position: Point) -> u16 {
        let along = if self.horizontal { position.y } else { position.x };
        (along / self.layout.pitch()).round() as u16
    }

    fn week_count(&self) -> u16 {
        u16::try_from(self.layout.weeks.len()).unwrap_or(u16::MAX)
    }

    /// Terminal size needed to show the whole grid
    pub fn size(&self) -> (u16, u16) {
        let legend = self.layout.legend.len() as u16;
        if self.horizontal {
            (
                LABEL_WIDTH.saturating_add(self.week_count().saturating_mul(CELL_WIDTH)),
                (1 + self.slot_count()).saturating_add(legend),
            )
        } else {
            (
                self.slot_count() * CELL_WIDTH + MONTH_LABEL_WIDTH,
                self.week_count().saturating_add(1).saturating_add(legend),
            )
        }
    }

    fn grid_origin(&self, area: Rect) -> (u16, u16) {
        let left = if self.horizontal { LABEL_WIDTH } else { 0 };
        (area.x + left, area.y + 1)
    }

    /// Top-left terminal cell of a square
    pub fn cell_origin(&self, area: Rect, week: u16, slot: u16) -> (u16, u16) {
        let (x, y) = self.grid_origin(area);
        // long ranges run past the edge; `put` clips them
        if self.horizontal {
            (x.saturating_add(week.saturating_mul(CELL_WIDTH)), y + slot)
        } else {
            (x + slot * CELL_WIDTH, y.saturating_add(week))
        }
    }

    /// Day index of the square drawn at a terminal cell
    pub fn index_at(&self, area: Rect, column: u16, row: u16) -> Option<i64> {
        let (x, y) = self.grid_origin(area);
        if column < x || row < y {
            return None;
        }
        let (col, offset) = ((column - x) / CELL_WIDTH, (column - x) % CELL_WIDTH);
        if offset >= 2 {
            return None;
        }
        let line = row - y;
        let (week, slot) = if self.horizontal {
            (col, line)
        } else {
            (line, col)
        };

        let pitch = self.layout.pitch();
        let half = self.layout.square_size / 2.0;
        let (primary, secondary) = (f64::from(week) * pitch, f64::from(slot) * pitch);
        let within = if self.horizontal {
            Point::new(primary, secondary)
        } else {
            Point::new(secondary, primary)
        };
        let target = self
            .layout
            .weeks_transform
            .offset(within)
            .offset(Point::new(half, half));
        self.layout.square_at(target.x, target.y).map(|s| s.index)
    }

    fn render_month_labels(&self, area: Rect, buf: &mut Buffer) {
        let style = Style::default().fg(self.theme.muted());
        let (gx, gy) = self.grid_origin(area);
        for label in &self.layout.month_labels {
            let week = u16::try_from(label.week).unwrap_or(u16::MAX);
            let (x, y) = if self.horizontal {
                (gx.saturating_add(week.saturating_mul(CELL_WIDTH)), area.y)
            } else {
                (gx + self.slot_count() * CELL_WIDTH + 1, gy.saturating_add(week))
            };
            put(buf, area, x, y, &label.text, style);
        }
    }

    fn render_weekday_labels(&self, area: Rect, buf: &mut Buffer) {
        let style = Style::default().fg(self.theme.muted());
        let (gx, gy) = self.grid_origin(area);
        for label in &self.layout.weekday_labels {
            let position = label.position as u16;
            if self.horizontal {
                put(buf, area, area.x, gy + position, &label.text, style);
            } else {
                let short: String = label.text.chars().take(2).collect();
                put(buf, area, gx + position * CELL_WIDTH, area.y, &short, style);
            }
        }
    }

    fn render_squares(&self, area: Rect, buf: &mut Buffer) {
        for week in &self.layout.weeks {
            let w = u16::try_from(week.index).unwrap_or(u16::MAX);
            for square in &week.squares {
                let (x, y) = self.cell_origin(area, w, square.slot as u16);
                let (symbol, style) = if self.selected == Some(square.index) {
                    (
                        FILLED,
                        Style::default()
                            .fg(self.theme.accent())
                            .add_modifier(Modifier::BOLD),
                    )
                } else if square.in_range {
                    (
                        FILLED,
                        Style::default().fg(self.theme.class_color(&square.class_name)),
                    )
                } else {
                    (PADDING, Style::default().fg(self.theme.muted()))
                };
                put(buf, area, x, y, symbol, style);
            }

            if let Some(summary) = &week.summary {
                let slot = self.slot_of(Point::new(summary.x, summary.y));
                let (x, y) = self.cell_origin(area, w, slot);
                let style = Style::default().fg(self.theme.class_color(&summary.class_name));
                put(buf, area, x, y, FILLED, style);
            }
        }
    }

    fn render_legend(&self, area: Rect, buf: &mut Buffer) {
        let grid_height = if self.horizontal {
            self.slot_count()
        } else {
            self.week_count()
        };
        let top = area.y.saturating_add(1).saturating_add(grid_height);
        for (row, entry) in self.layout.legend.iter().enumerate() {
            let y = top.saturating_add(u16::try_from(row).unwrap_or(u16::MAX));
            let style = Style::default().fg(self.theme.class_color(&entry.class_name));
            put(buf, area, area.x, y, FILLED, style);
            put(
                buf,
                area,
                area.x + CELL_WIDTH,
                y,
                &entry.label,
                Style::default().fg(self.theme.text()),
            );
        }
    }
}

/// Write `text` if its first cell lies inside `area`; overflow is clipped
fn put(buf: &mut Buffer, area: Rect, x: u16, y: u16, text: &str, style: Style) {
    if x < area.right() && y < area.bottom() {
        let room = (area.right() - x) as usize;
        buf.set_stringn(x, y, text, room, style);
    }
}

impl<V> Widget for HeatmapGrid<'_, '_, V> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.render_month_labels(area, buf);
        self.render_weekday_labels(area, buf);
        self.render_squares(area, buf);
        self.render_legend(area, buf);
    }
}
