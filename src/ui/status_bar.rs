//! Status bar UI component.

use crate::app::App;
use crate::ui::ThemeColors;
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

/// Draw the status bar: the message on the left, the dims of the focused
/// tab on the right.
pub(super) fn draw_status(f: &mut Frame<'_>, area: Rect, app: &App, colors: &ThemeColors) {
    let right = app
        .workspace()
        .map(|ws| {
            let tokens = ws.dims().tokens();
            let node = ws.details().path.as_str();
            if tokens.is_empty() {
                format!("{} ", node)
            } else {
                format!("{} ({}) ", node, tokens.join(", "))
            }
        })
        .unwrap_or_default();

    let width = area.width as usize;
    let left = super::formatters::truncate_to_width(&app.status, width.saturating_sub(right.len() + 1));
    let pad = width.saturating_sub(left.chars().count() + right.chars().count());

    let line = Line::from(vec![
        Span::raw(left),
        Span::raw(" ".repeat(pad)),
        Span::styled(right, Style::default().fg(colors.aqua)),
    ]);
    let paragraph = Paragraph::new(line).style(Style::default().fg(colors.fg0).bg(colors.bg1));

    f.render_widget(paragraph, area);
}
