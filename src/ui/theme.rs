//! Color themes for the UI.

use ratatui::style::Color;
use serde::{Deserialize, Serialize};

/// Application theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Theme {
    /// Gruvbox dark theme.
    #[default]
    GruvboxDark,
    /// Gruvbox light theme.
    GruvboxLight,
}

impl Theme {
    /// Get the next theme in the cycle.
    pub fn next(self) -> Self {
        match self {
            Theme::GruvboxDark => Theme::GruvboxLight,
            Theme::GruvboxLight => Theme::GruvboxDark,
        }
    }

    /// Get the theme name.
    pub fn name(self) -> &'static str {
        match self {
            Theme::GruvboxDark => "Gruvbox Dark",
            Theme::GruvboxLight => "Gruvbox Light",
        }
    }
}

/// Theme color palette, named after the Gruvbox swatches.
#[derive(Debug, Clone)]
pub struct ThemeColors {
    /// Main background.
    pub bg0: Color,
    /// Raised background (bars, selected tab).
    pub bg1: Color,
    /// Borders.
    pub bg2: Color,
    /// Primary text.
    pub fg0: Color,
    /// Labels.
    pub fg1: Color,
    /// Muted text.
    pub gray: Color,
    /// Errors.
    pub red: Color,
    /// Values.
    pub green: Color,
    /// Cursor and headings.
    pub yellow: Color,
    /// Integer datasets.
    pub blue: Color,
    /// Text datasets.
    pub purple: Color,
    /// Float datasets and titles.
    pub aqua: Color,
    /// Edited cells.
    pub orange: Color,
}

impl ThemeColors {
    /// Create color palette from theme.
    pub fn from_theme(theme: Theme) -> Self {
        match theme {
            Theme::GruvboxDark => Self {
                bg0: Color::Rgb(40, 40, 40),
                bg1: Color::Rgb(60, 56, 54),
                bg2: Color::Rgb(102, 92, 84),
                fg0: Color::Rgb(235, 219, 178),
                fg1: Color::Rgb(213, 196, 161),
                gray: Color::Rgb(146, 131, 116),
                red: Color::Rgb(251, 73, 52),
                green: Color::Rgb(184, 187, 38),
                yellow: Color::Rgb(250, 189, 47),
                blue: Color::Rgb(131, 165, 152),
                purple: Color::Rgb(211, 134, 155),
                aqua: Color::Rgb(142, 192, 124),
                orange: Color::Rgb(254, 128, 25),
            },
            Theme::GruvboxLight => Self {
                bg0: Color::Rgb(251, 241, 199),
                bg1: Color::Rgb(235, 219, 178),
                bg2: Color::Rgb(213, 196, 161),
                fg0: Color::Rgb(60, 56, 54),
                fg1: Color::Rgb(80, 73, 69),
                gray: Color::Rgb(124, 111, 100),
                red: Color::Rgb(157, 0, 6),
                green: Color::Rgb(121, 116, 14),
                yellow: Color::Rgb(181, 118, 20),
                blue: Color::Rgb(7, 102, 120),
                purple: Color::Rgb(143, 63, 113),
                aqua: Color::Rgb(66, 123, 88),
                orange: Color::Rgb(175, 58, 3),
            },
        }
    }
}
