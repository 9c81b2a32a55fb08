//! User interface rendering.

mod bars;
mod browser;
pub mod colormaps;
pub mod formatters;
mod keymap_bar;
mod status_bar;
mod theme;
mod views;

use crate::app::App;
use ratatui::Frame;

pub use colormaps::ColorPalette;
pub use theme::{Theme, ThemeColors};

/// Draw the UI.
pub fn draw(f: &mut Frame<'_>, app: &mut App) {
    browser::draw_browser(f, app);
}
