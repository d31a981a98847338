//! Preview application state and event loop

use std::cell::{Cell, RefCell};
use std::io;
use std::rc::Rc;
use std::time::Duration;

use chrono::{NaiveDate, Utc};
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, MouseButton,
    MouseEventKind,
};
use crossterm::execute;
use log::LevelFilter;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    widgets::Widget,
    DefaultTerminal, Frame,
};

use crate::heatmap::Heatmap;
use crate::services::calendar::CanonicalDate;
use crate::services::events::CellEventKind;
use crate::types::{DayValue, Layout};

use super::theme::Theme;
use super::widgets::heatmap::HeatmapGrid;

const KEY_HINTS: [(&str, &str); 4] = [
    ("o", "orientation"),
    ("l", "weekday labels"),
    ("r", "out-of-range days"),
    ("q", "quit"),
];

/// Text written by the cell event handlers
#[derive(Debug, Default, Clone, PartialEq, Eq)]
struct CellStatus {
    hovered: Option<String>,
    clicked: Option<String>,
}

fn describe(value: Option<&DayValue>) -> String {
    match value {
        Some(v) => format!("{}: {}", v.date, v.count_or_zero()),
        None => "no value".to_string(),
    }
}

/// Application state
pub struct App {
    heatmap: Heatmap<DayValue>,
    theme: Theme,
    /// Fixed clock so the range does not drift while previewing
    now: CanonicalDate,
    status: Rc<RefCell<CellStatus>>,
    hovered: Option<(i64, NaiveDate)>,
    selected: Option<i64>,
    /// Where the grid was last drawn, for mouse hit testing
    grid_area: Cell<Rect>,
    should_quit: bool,
}

impl App {
    pub fn new(heatmap: Heatmap<DayValue>, theme: Theme, now: CanonicalDate) -> Self {
        let status = Rc::new(RefCell::new(CellStatus::default()));

        let over = Rc::clone(&status);
        let leave = Rc::clone(&status);
        let click = Rc::clone(&status);
        let heatmap = heatmap
            .on_mouse_over(move |v| over.borrow_mut().hovered = Some(describe(v)))
            .on_mouse_leave(move |_| leave.borrow_mut().hovered = None)
            .on_click(move |v| click.borrow_mut().clicked = Some(describe(v)));

        Self {
            heatmap,
            theme,
            now,
            status,
            hovered: None,
            selected: None,
            grid_area: Cell::new(Rect::default()),
            should_quit: false,
        }
    }

    /// Handle keyboard and mouse events
    pub fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => match key.code {
                KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                    self.should_quit = true;
                }
                KeyCode::Char('o') => {
                    let options = self.heatmap.options_mut();
                    options.horizontal = !options.horizontal;
                    self.clear_hover();
                }
                KeyCode::Char('l') => {
                    let options = self.heatmap.options_mut();
                    options.show_weekday_labels = !options.show_weekday_labels;
                    self.clear_hover();
                }
                KeyCode::Char('r') => {
                    let options = self.heatmap.options_mut();
                    options.show_out_of_range_days = !options.show_out_of_range_days;
                    self.clear_hover();
                }
                _ => {}
            },
            Event::Mouse(mouse) => match mouse.kind {
                MouseEventKind::Moved => self.pointer_moved(mouse.column, mouse.row),
                MouseEventKind::Down(MouseButton::Left) => {
                    self.pointer_clicked(mouse.column, mouse.row)
                }
                _ => {}
            },
            _ => {}
        }
    }

    fn index_at(&self, layout: &Layout<'_, DayValue>, column: u16, row: u16) -> Option<i64> {
        HeatmapGrid::new(layout, self.heatmap.options().horizontal, self.theme).index_at(
            self.grid_area.get(),
            column,
            row,
        )
    }

    /// Fire mouse-leave for the old cell and mouse-over for the new one
    fn pointer_moved(&mut self, column: u16, row: u16) {
        let Ok(layout) = self.heatmap.layout_at(self.now) else {
            return;
        };
        let index = self.index_at(&layout, column, row);
        if index == self.hovered.map(|(i, _)| i) {
            return;
        }

        if let Some((old, _)) = self.hovered {
            let value = layout.square_for_index(old).and_then(|s| s.value);
            self.heatmap.emit(CellEventKind::MouseLeave, value);
        }
        let square = index.and_then(|i| layout.square_for_index(i));
        if let Some(square) = square {
            self.heatmap.emit(CellEventKind::MouseOver, square.value);
        }
        self.hovered = square.map(|s| (s.index, s.date));
    }

    fn pointer_clicked(&mut self, column: u16, row: u16) {
        let Ok(layout) = self.heatmap.layout_at(self.now) else {
            return;
        };
        let square = self
            .index_at(&layout, column, row)
            .and_then(|i| layout.square_for_index(i));
        if let Some(square) = square {
            self.heatmap.emit(CellEventKind::Click, square.value);
            self.selected = Some(square.index);
        }
    }

    /// Squares move when options change, so the hovered cell is stale
    fn clear_hover(&mut self) {
        self.hovered = None;
        self.status.borrow_mut().hovered = None;
    }

    /// Check if app should quit
    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Draw the application
    pub fn draw(&self, frame: &mut Frame) {
        frame.render_widget(self, frame.area());
    }

    fn status_line(&self) -> String {
        let status = self.status.borrow();
        match (&self.hovered, &status.hovered, &status.clicked) {
            (Some((_, date)), Some(text), _) => format!("{}  {}", date.format("%Y-%m-%d"), text),
            (_, _, Some(clicked)) => format!("Selected {}", clicked),
            _ => String::new(),
        }
    }

    fn render_header(&self, layout: &Layout<'_, DayValue>, area: Rect, buf: &mut Buffer) {
        let mut days = layout.squares().filter(|s| s.in_range);
        let title = match days.next() {
            Some(first) => {
                let (last, count) = days.fold((first.date, 1), |(_, n), s| (s.date, n + 1));
                format!(
                    " calheat  {} → {}  ({} days)",
                    first.date.format("%Y-%m-%d"),
                    last.format("%Y-%m-%d"),
                    count
                )
            }
            None => " calheat  (0 days)".to_string(),
        };
        buf.set_stringn(
            area.x,
            area.y,
            title,
            area.width as usize,
            Style::default()
                .fg(self.theme.text())
                .add_modifier(Modifier::BOLD),
        );
    }

    fn render_footer(&self, area: Rect, buf: &mut Buffer) {
        if area.height < 2 {
            return;
        }
        let status_y = area.bottom() - 2;
        buf.set_stringn(
            area.x + 1,
            status_y,
            self.status_line(),
            area.width.saturating_sub(1) as usize,
            Style::default().fg(self.theme.date()),
        );

        let mut x = area.x + 1;
        let hints_y = area.bottom() - 1;
        for (key, label) in KEY_HINTS {
            if x >= area.right() {
                break;
            }
            let room = (area.right() - x) as usize;
            let (after_key, _) =
                buf.set_stringn(x, hints_y, key, room, Style::default().fg(self.theme.accent()));
            let room = area.right().saturating_sub(after_key) as usize;
            let (after_label, _) = buf.set_stringn(
                after_key,
                hints_y,
                format!(" {}  ", label),
                room,
                Style::default().fg(self.theme.muted()),
            );
            x = after_label;
        }
    }
}

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        match self.heatmap.layout_at(self.now) {
            Ok(layout) => {
                self.render_header(&layout, area, buf);

                let grid_area = Rect::new(
                    area.x + 1,
                    area.y + 2,
                    area.width.saturating_sub(2),
                    area.height.saturating_sub(4),
                );
                self.grid_area.set(grid_area);
                HeatmapGrid::new(&layout, self.heatmap.options().horizontal, self.theme)
                    .with_selected(self.selected)
                    .render(grid_area, buf);

                self.render_footer(area, buf);
            }
            Err(e) => {
                let y = area.y + area.height / 2;
                let text = format!("Error: {}", e);
                let x = area.x + (area.width.saturating_sub(text.len() as u16)) / 2;
                buf.set_stringn(
                    x,
                    y,
                    &text,
                    area.width as usize,
                    Style::default().fg(self.theme.error()),
                );
            }
        }
    }
}

/// Run the preview until the user quits
pub fn run(heatmap: Heatmap<DayValue>) -> anyhow::Result<()> {
    // must happen before raw mode
    let theme = Theme::detect();
    let now = Utc::now();
    // deprecation warnings go out now, before stderr shares the alternate screen;
    // range errors are shown inside the preview
    let _ = heatmap.range_at(now);
    let app = App::new(heatmap, theme, now);

    let log_level = log::max_level();
    log::set_max_level(LevelFilter::Off);
    let mut terminal = ratatui::init();
    let result = execute!(io::stdout(), EnableMouseCapture)
        .map_err(anyhow::Error::from)
        .and_then(|()| run_app(&mut terminal, app));
    let _ = execute!(io::stdout(), DisableMouseCapture);
    ratatui::restore();
    log::set_max_level(log_level);
    result
}

fn run_app(terminal: &mut DefaultTerminal, mut app: App) -> anyhow::Result<()> {
    loop {
        terminal.draw(|frame| app.draw(frame))?;

        if app.should_quit() {
            break;
        }

        if event::poll(Duration::from_millis(100))? {
            app.handle_event(event::read()?);
        }
    }

    Ok(())
}
