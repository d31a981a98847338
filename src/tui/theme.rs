//! Terminal theme detection and color definitions

use ratatui::style::Color;

use crate::services::scale::ScaleLevel;

/// Terminal color scheme (dark or light background)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    /// Auto-detect terminal theme from background luminance.
    /// Must be called **before** entering raw mode (ratatui::init).
    /// Falls back to Dark if detection fails.
    pub fn detect() -> Self {
        match terminal_light::luma() {
            Ok(luma) if luma > 0.6 => Self::Light,
            _ => Self::Dark,
        }
    }

    /// Primary text color
    pub fn text(self) -> Color {
        match self {
            Self::Dark => Color::White,
            Self::Light => Color::Black,
        }
    }

    /// Selected cell and keybinding keys
    pub fn accent(self) -> Color {
        match self {
            Self::Dark => Color::Cyan,
            Self::Light => Color::Indexed(25), // dark blue (ANSI 256)
        }
    }

    /// Labels, hints and padding days
    pub fn muted(self) -> Color {
        match self {
            Self::Dark => Color::DarkGray,
            Self::Light => Color::Gray,
        }
    }

    /// Date text color
    pub fn date(self) -> Color {
        match self {
            Self::Dark => Color::Yellow,
            Self::Light => Color::Indexed(130), // dark orange/yellow (ANSI 256)
        }
    }

    /// Cells whose class is not part of the colour scale
    pub fn filled(self) -> Color {
        match self {
            Self::Dark => Color::Green,
            Self::Light => Color::Indexed(22), // dark green (ANSI 256)
        }
    }

    pub fn error(self) -> Color {
        match self {
            Self::Dark => Color::Red,
            Self::Light => Color::Indexed(124), // dark red (ANSI 256)
        }
    }

    /// Scale level color (GitHub-style green gradient using ANSI 256)
    pub fn heatmap_color(self, level: ScaleLevel) -> Color {
        match self {
            Self::Dark => match level {
                ScaleLevel::Empty => Color::Indexed(236),
                ScaleLevel::Zero => Color::Indexed(239),
                ScaleLevel::Low => Color::Indexed(22),
                ScaleLevel::Medium => Color::Indexed(28),
                ScaleLevel::High => Color::Indexed(34),
                ScaleLevel::Max => Color::Indexed(40),
            },
            Self::Light => match level {
                ScaleLevel::Empty => Color::Indexed(254),
                ScaleLevel::Zero => Color::Indexed(250),
                ScaleLevel::Low => Color::Indexed(194),
                ScaleLevel::Medium => Color::Indexed(157),
                ScaleLevel::High => Color::Indexed(71),
                ScaleLevel::Max => Color::Indexed(28),
            },
        }
    }

    /// Color for a cell's class name
    pub fn class_color(self, class_name: &str) -> Color {
        match ScaleLevel::from_class_name(class_name) {
            Some(level) => self.heatmap_color(level),
            None => self.filled(),
        }
    }
}
