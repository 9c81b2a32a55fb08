//! Main screen layout.

use super::bars::{draw_dims, draw_file_tabs, draw_view_tabs};
use super::keymap_bar::draw_keymap;
use super::status_bar::draw_status;
use super::views::draw_view;
use super::ThemeColors;
use crate::app::{App, Focus};
use crate::explorer::tree::{draw_tree, draw_welcome};
use crate::file_browser::ui::draw_file_browser;
use crate::workspace::FileWorkspace;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

/// Draw the whole screen.
pub(super) fn draw_browser(f: &mut Frame<'_>, app: &mut App) {
    let colors = ThemeColors::from_theme(app.theme());

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(f.area());

    draw_file_tabs(f, chunks[0], &app.files, app.active_file, &colors);

    if app.file_browser_mode {
        draw_file_browser(f, &mut app.file_browser, chunks[1], &colors);
    } else {
        let focus = app.focus;
        let scroll = app.view_scroll;
        let palette = app.palette();
        let show_details = app.settings.show_details;
        let tree_width = app.settings.tree_width_percent;
        match app.files.get_mut(app.active_file) {
            Some(ws) => draw_workspace(
                f,
                chunks[1],
                ws,
                WorkspaceLayout {
                    focus,
                    scroll,
                    palette,
                    show_details,
                    tree_width,
                },
                &colors,
            ),
            None => draw_welcome(f, chunks[1], &colors),
        }
    }

    draw_status(f, chunks[2], app, &colors);
    draw_keymap(f, chunks[3], app, &colors);

    if let Some(message) = app.error_message.as_deref() {
        draw_error(f, message, &colors);
    }
}

struct WorkspaceLayout {
    focus: Focus,
    scroll: crate::app::ViewScroll,
    palette: super::ColorPalette,
    show_details: bool,
    tree_width: u16,
}

fn draw_workspace(
    f: &mut Frame<'_>,
    area: Rect,
    ws: &mut FileWorkspace,
    layout: WorkspaceLayout,
    colors: &ThemeColors,
) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(layout.tree_width),
            Constraint::Percentage(100 - layout.tree_width),
        ])
        .split(area);

    let left = if layout.show_details {
        Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
            .split(columns[0])
    } else {
        Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(1)])
            .split(columns[0])
    };

    let title = ws.name().to_string();
    draw_tree(f, ws.explorer_mut(), &title, layout.focus == Focus::Tree, left[0], colors);
    if layout.show_details {
        draw_details(f, left[1], ws, colors);
    }

    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(3), Constraint::Min(3)])
        .split(columns[1]);

    draw_view_tabs(f, right[0], ws, colors);
    draw_dims(f, right[1], ws.dims(), layout.focus == Focus::Dims, colors);
    if let Some(tab) = ws.active_tab() {
        draw_view(
            f,
            right[2],
            &tab.view,
            layout.scroll,
            layout.focus == Focus::View,
            layout.palette,
            colors,
        );
    }
}

fn draw_details(f: &mut Frame<'_>, area: Rect, ws: &FileWorkspace, colors: &ThemeColors) {
    let paragraph = Paragraph::new(ws.details().lines(colors))
        .block(
            Block::default()
                .title(" Details ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(colors.bg2))
                .style(Style::default().bg(colors.bg0)),
        )
        .style(Style::default().fg(colors.fg0))
        .wrap(Wrap { trim: true });

    f.render_widget(paragraph, area);
}

fn draw_error(f: &mut Frame<'_>, message: &str, colors: &ThemeColors) {
    let area = centered_rect(60, 30, f.area());
    f.render_widget(Clear, area);

    let lines = vec![
        Line::from(Span::styled(
            "Error",
            Style::default().fg(colors.red).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(message.to_string(), Style::default().fg(colors.fg0))),
        Line::from(""),
        Line::from(Span::styled("Press any key to continue", Style::default().fg(colors.gray))),
    ];

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(colors.red))
                .style(Style::default().bg(colors.bg1)),
        )
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });

    f.render_widget(paragraph, area);
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
