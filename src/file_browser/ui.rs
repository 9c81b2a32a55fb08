//! File browser UI rendering.

use super::{is_data_file, BrowserSource, FileBrowserState, FileEntry};
use crate::ui::ThemeColors;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem},
    Frame,
};

fn entry_label(entry: &FileEntry, recent: bool) -> String {
    let marker = if entry.is_symlink { " →" } else { "" };
    match (entry.is_dir, recent) {
        (true, _) => format!("▸ {}/{}", entry.name, marker),
        (false, true) => {
            let name = entry.path.file_name().map(|n| n.to_string_lossy().to_string());
            format!("  {}{}", name.unwrap_or_else(|| entry.name.clone()), marker)
        },
        (false, false) => format!("  {}{}", entry.name, marker),
    }
}

/// Draw the file browser UI.
pub fn draw_file_browser(
    f: &mut Frame<'_>,
    state: &mut FileBrowserState,
    area: Rect,
    colors: &ThemeColors,
) {
    // Subtract 2 for borders
    let viewport_height = area.height.saturating_sub(2) as usize;
    state.adjust_scroll(viewport_height);

    let recent = state.source == BrowserSource::Recent;
    let items: Vec<ListItem<'_>> = state
        .entries
        .iter()
        .enumerate()
        .skip(state.scroll)
        .take(viewport_height)
        .map(|(idx, entry)| {
            if idx == state.cursor {
                let style = Style::default()
                    .fg(colors.bg0)
                    .bg(colors.yellow)
                    .add_modifier(Modifier::BOLD);
                return ListItem::new(Line::from(entry_label(entry, recent))).style(style);
            }

            let fg = if entry.is_dir {
                colors.aqua
            } else if is_data_file(&entry.path) {
                colors.fg0
            } else {
                colors.gray
            };
            let mut spans = vec![Span::styled(entry_label(entry, recent), Style::default().fg(fg))];
            if recent {
                if let Some(parent) = entry.path.parent() {
                    spans.push(Span::styled(
                        format!("  {}", parent.display()),
                        Style::default().fg(colors.gray),
                    ));
                }
            }
            ListItem::new(Line::from(spans))
        })
        .collect();

    let title = match state.source {
        BrowserSource::Directory => format!(" Open: {} ", state.current_dir.display()),
        BrowserSource::Recent if state.entries.is_empty() => " Recent files (none) ".to_string(),
        BrowserSource::Recent => " Recent files ".to_string(),
    };

    let list = List::new(items).block(
        Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(colors.yellow))
            .style(Style::default().bg(colors.bg0)),
    );

    f.render_widget(list, area);
}
