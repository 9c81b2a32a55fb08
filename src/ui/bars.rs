//! File tabs, view tabs and the dims bar.

use super::formatters::truncate_to_width;
use super::ThemeColors;
use crate::workspace::{DimsEditor, FileWorkspace};
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Tabs},
    Frame,
};

/// One tab per open file.
pub(super) fn draw_file_tabs(
    f: &mut Frame<'_>,
    area: Rect,
    files: &[FileWorkspace],
    active: usize,
    colors: &ThemeColors,
) {
    let titles: Vec<String> = files
        .iter()
        .map(|ws| format!(" {} ", truncate_to_width(ws.name(), 24)))
        .collect();
    let tabs = Tabs::new(titles)
        .select(active)
        .style(Style::default().fg(colors.gray).bg(colors.bg1))
        .highlight_style(
            Style::default()
                .fg(colors.bg0)
                .bg(colors.aqua)
                .add_modifier(Modifier::BOLD),
        )
        .divider("|");
    f.render_widget(tabs, area);
}

/// Table / Image / Plot tabs of the shown file.
pub(super) fn draw_view_tabs(f: &mut Frame<'_>, area: Rect, workspace: &FileWorkspace, colors: &ThemeColors) {
    let titles: Vec<String> = workspace.tabs().iter().map(|t| format!(" {} ", t.title())).collect();
    let tabs = Tabs::new(titles)
        .select(workspace.active_index())
        .style(Style::default().fg(colors.fg1).bg(colors.bg0))
        .highlight_style(
            Style::default()
                .fg(colors.yellow)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
        );
    f.render_widget(tabs, area);
}

/// The editable dims cells, one per axis.
pub(super) fn draw_dims(f: &mut Frame<'_>, area: Rect, dims: &DimsEditor, focused: bool, colors: &ThemeColors) {
    let mut spans = Vec::new();
    for (i, token) in dims.tokens().iter().enumerate() {
        let label = dims.labels().get(i).map(String::as_str).unwrap_or("?");
        let extent = dims.limits().get(i).copied().unwrap_or(0);
        let selected = focused && i == dims.selected();
        let text = match dims.input() {
            Some(input) if selected => format!("{}▏", input),
            _ => token.clone(),
        };
        let cell_style = if selected {
            Style::default()
                .fg(colors.bg0)
                .bg(if dims.is_editing() { colors.orange } else { colors.yellow })
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(colors.aqua)
        };
        if i > 0 {
            spans.push(Span::styled(", ", Style::default().fg(colors.gray)));
        }
        spans.push(Span::styled(format!("{}[{}]=", label, extent), Style::default().fg(colors.fg1)));
        spans.push(Span::styled(format!(" {} ", text), cell_style));
    }
    if spans.is_empty() {
        spans.push(Span::styled("(scalar)", Style::default().fg(colors.gray)));
    }

    let paragraph = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .title(" Dims ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(if focused { colors.yellow } else { colors.bg2 }))
            .style(Style::default().bg(colors.bg0)),
    );
    f.render_widget(paragraph, area);
}
