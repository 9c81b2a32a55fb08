//! Tree panel UI rendering.

use super::ExplorerState;
use crate::data::{ElementKind, Node};
use crate::ui::ThemeColors;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

fn dataset_color(node: &Node, colors: &ThemeColors) -> Color {
    match node.dataset_info().map(|i| &i.element) {
        Some(ElementKind::Float) => colors.aqua,
        Some(ElementKind::Integer | ElementKind::Unsigned | ElementKind::Boolean) => colors.blue,
        Some(ElementKind::Text | ElementKind::Bytes) => colors.purple,
        Some(ElementKind::Compound(_)) => colors.orange,
        Some(ElementKind::Opaque) => colors.gray,
        None => colors.fg0,
    }
}

/// Draw the tree panel UI.
pub fn draw_tree(
    f: &mut Frame<'_>,
    explorer: &mut ExplorerState,
    title: &str,
    focused: bool,
    area: Rect,
    colors: &ThemeColors,
) {
    // Subtract 2 for borders
    let viewport_height = area.height.saturating_sub(2) as usize;
    explorer.adjust_scroll(viewport_height);

    let cursor = explorer.cursor();
    let scroll_offset = explorer.scroll_offset();

    let items: Vec<ListItem<'_>> = explorer
        .visible_items()
        .iter()
        .enumerate()
        .skip(scroll_offset)
        .take(viewport_height)
        .map(|(idx, item)| {
            let indent = "  ".repeat(item.level);
            let expand_icon = match (item.node.is_group(), item.expanded) {
                (true, true) => "▼ ",
                (true, false) => "▶ ",
                (false, _) => "  ",
            };

            let line = if idx == cursor {
                let text = format!("{}{}{}", indent, expand_icon, item.node.display_name());
                Line::from(text).style(
                    Style::default()
                        .fg(colors.bg0)
                        .bg(colors.yellow)
                        .add_modifier(Modifier::BOLD),
                )
            } else if item.node.is_group() {
                let text = format!("{}{}{}", indent, expand_icon, item.node.display_name());
                Line::from(text).style(Style::default().fg(colors.fg0))
            } else {
                let display = item.node.display_name();
                let meta = display.strip_prefix(item.node.name.as_str()).unwrap_or("");
                Line::from(vec![
                    Span::raw(indent),
                    Span::raw(expand_icon),
                    Span::styled(
                        item.node.name.clone(),
                        Style::default()
                            .fg(dataset_color(&item.node, colors))
                            .add_modifier(Modifier::BOLD),
                    ),
                    Span::styled(meta.to_string(), Style::default().fg(colors.gray)),
                ])
            };

            ListItem::new(line)
        })
        .collect();

    let border = if focused { colors.yellow } else { colors.bg2 };
    let list = List::new(items).block(
        Block::default()
            .title(format!(" {} ", title))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border))
            .style(Style::default().bg(colors.bg0)),
    );

    f.render_widget(list, area);
}

/// Draw the welcome screen.
pub fn draw_welcome(f: &mut Frame<'_>, area: Rect, colors: &ThemeColors) {
    let lines = vec![
        Line::from(Span::styled(
            "Welcome to h5lens!",
            Style::default()
                .fg(colors.yellow)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from("Open a netCDF-4 / HDF5 file to get started"),
        Line::from("(or drop one onto the terminal)"),
        Line::from(""),
        Line::from("Usage: h5lens <file.h5> [more files...]"),
        Line::from(""),
        Line::from("Keyboard shortcuts:"),
        Line::from("  o           - Open file browser"),
        Line::from("  r           - Recent files"),
        Line::from("  T           - Cycle theme"),
        Line::from("  q           - Quit"),
    ];

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .title(" h5lens ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(colors.bg2))
                .style(Style::default().bg(colors.bg0)),
        )
        .style(Style::default().fg(colors.fg0));

    f.render_widget(paragraph, area);
}
