//! Rendering of the table, image and plot surfaces.

use super::colormaps::{normalize, ColorPalette};
use super::formatters::{format_axis_label, pad_left, truncate_to_width};
use super::ThemeColors;
use crate::app::ViewScroll;
use crate::view::{ImageAdapter, Pixel, PlotAdapter, TableAdapter, ViewAdapter};
use crate::workspace::TabView;
use ratatui::{
    layout::{Alignment, Constraint, Rect},
    style::{Color, Modifier, Style},
    symbols::Marker,
    text::{Line, Span},
    widgets::{
        Axis, Block, Borders, Cell, Chart, Dataset, GraphType, Paragraph, Row, Scrollbar,
        ScrollbarOrientation, ScrollbarState, Table,
    },
    Frame,
};

const COL_WIDTH: usize = 12;
const ROW_HEADER_WIDTH: usize = 8;

fn view_block<'a>(title: String, focused: bool, colors: &ThemeColors) -> Block<'a> {
    Block::default()
        .title(title)
        .title_style(Style::default().fg(colors.yellow))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(if focused { colors.yellow } else { colors.bg2 }))
        .style(Style::default().bg(colors.bg0))
}

fn draw_message(f: &mut Frame<'_>, area: Rect, block: Block<'_>, message: &str, colors: &ThemeColors) {
    let paragraph = Paragraph::new(Line::from(Span::styled(
        message.to_string(),
        Style::default().fg(colors.gray),
    )))
    .alignment(Alignment::Center)
    .block(block);
    f.render_widget(paragraph, area);
}

/// Draw the surface of `view`.
pub(super) fn draw_view(
    f: &mut Frame<'_>,
    area: Rect,
    view: &TabView,
    scroll: ViewScroll,
    focused: bool,
    palette: ColorPalette,
    colors: &ThemeColors,
) {
    match view {
        TabView::Table(table) => draw_table(f, area, table, scroll, focused, colors),
        TabView::Image(image) => draw_image(f, area, image, scroll, focused, palette, colors),
        TabView::Plot(plot) => draw_plot(f, area, plot, focused, palette, colors),
    }
}

/// Returns `true` when a placeholder was drawn instead of the view.
fn draw_placeholder(
    f: &mut Frame<'_>,
    area: Rect,
    bound: bool,
    available: bool,
    block: Block<'_>,
    colors: &ThemeColors,
) -> bool {
    if !bound {
        draw_message(f, area, block, "Select a dataset to view its values", colors);
        true
    } else if !available {
        draw_message(f, area, block, "No view available for these dims", colors);
        true
    } else {
        false
    }
}

fn draw_table(
    f: &mut Frame<'_>,
    area: Rect,
    table: &TableAdapter,
    scroll: ViewScroll,
    focused: bool,
    colors: &ThemeColors,
) {
    let name = table.node().map(|n| n.name.clone()).unwrap_or_default();
    let (total_rows, total_cols) = (table.row_count(), table.column_count());
    let title = format!(" {} | {} x {} ", name, total_rows, total_cols);
    let block = view_block(title, focused, colors);
    let bound = table.node().is_some_and(|n| !n.is_group());
    if draw_placeholder(f, area, bound, table.is_available(), block.clone(), colors) {
        return;
    }

    // Borders plus the header row
    let visible_rows = (area.height as usize).saturating_sub(3);
    let visible_cols = ((area.width as usize).saturating_sub(ROW_HEADER_WIDTH + 2) / COL_WIDTH).max(1);
    let end_row = (scroll.row + visible_rows).min(total_rows);
    let end_col = (scroll.col + visible_cols).min(total_cols);

    let mut header = vec![Cell::from("")];
    for col in scroll.col..end_col {
        let label = table.column_label(col).unwrap_or_else(|| col.to_string());
        header.push(
            Cell::from(pad_left(&label, COL_WIDTH - 1))
                .style(Style::default().fg(colors.green).add_modifier(Modifier::BOLD)),
        );
    }

    let rows: Vec<Row<'_>> = (scroll.row..end_row)
        .map(|row| {
            let label = table.row_label(row).unwrap_or_else(|| row.to_string());
            let mut cells = vec![Cell::from(pad_left(&label, ROW_HEADER_WIDTH - 1))
                .style(Style::default().fg(colors.green))];
            for col in scroll.col..end_col {
                let text = table.value_at(row, col).unwrap_or_default();
                cells.push(
                    Cell::from(pad_left(&text, COL_WIDTH - 1)).style(Style::default().fg(colors.aqua)),
                );
            }
            Row::new(cells)
        })
        .collect();

    let mut widths = vec![Constraint::Length(ROW_HEADER_WIDTH as u16)];
    widths.extend((scroll.col..end_col).map(|_| Constraint::Length(COL_WIDTH as u16)));

    let widget = Table::new(rows, widths)
        .header(Row::new(header))
        .block(block)
        .style(Style::default().fg(colors.fg0));
    f.render_widget(widget, area);

    if total_rows > visible_rows {
        let mut state = ScrollbarState::new(total_rows.saturating_sub(visible_rows)).position(scroll.row);
        f.render_stateful_widget(
            Scrollbar::default()
                .orientation(ScrollbarOrientation::VerticalRight)
                .begin_symbol(Some("^"))
                .end_symbol(Some("v")),
            area,
            &mut state,
        );
    }
}

/// Map colour channels to 0..=255. Data already in 0..=1 is stretched.
fn channel(v: f64, unit_range: bool) -> u8 {
    let v = if unit_range { v * 255.0 } else { v };
    if v.is_finite() {
        v.clamp(0.0, 255.0) as u8
    } else {
        0
    }
}

fn pixel_color(
    pixel: Pixel,
    levels: (f64, f64),
    unit_range: bool,
    palette: ColorPalette,
    colors: &ThemeColors,
) -> Color {
    match pixel {
        Pixel::Gray(v) if !v.is_finite() => colors.gray,
        Pixel::Gray(v) => palette.color(normalize(v, levels.0, levels.1)),
        Pixel::Rgb([r, g, b]) | Pixel::Rgba([r, g, b, _]) => Color::Rgb(
            channel(r, unit_range),
            channel(g, unit_range),
            channel(b, unit_range),
        ),
    }
}

fn draw_image(
    f: &mut Frame<'_>,
    area: Rect,
    image: &ImageAdapter,
    cursor: ViewScroll,
    focused: bool,
    palette: ColorPalette,
    colors: &ThemeColors,
) {
    let name = image.node().map(|n| n.name.clone()).unwrap_or_default();
    let readout = image.describe(cursor.row, cursor.col).unwrap_or_default();
    let block = view_block(format!(" {} | {} ", name, readout), focused, colors);
    let bound = image.node().is_some_and(|n| !n.is_group());
    if draw_placeholder(f, area, bound, image.is_available(), block.clone(), colors) {
        return;
    }

    let inner = block.inner(area);
    f.render_widget(block, area);

    // Leave the last line for the frame scrollbar
    let frame = image.frame();
    let canvas_height = if frame.is_some() { inner.height.saturating_sub(1) } else { inner.height };
    let (rows, cols) = (image.row_count(), image.column_count());
    if rows == 0 || cols == 0 || canvas_height == 0 || inner.width == 0 {
        return;
    }
    let levels = image.levels().unwrap_or((0.0, 1.0));
    let unit_range = image.stretches_channels();

    // Terminal cells are about twice as tall as wide: two columns per pixel
    let pixel_width = 2usize;
    let max_w = inner.width as usize / pixel_width;
    let max_h = canvas_height as usize;
    let scale = (max_h as f64 / rows as f64).min(max_w as f64 / cols as f64);
    let disp_rows = ((rows as f64 * scale).floor() as usize).clamp(1, max_h);
    let disp_cols = ((cols as f64 * scale).floor() as usize).clamp(1, max_w.max(1));
    let row_step = rows as f64 / disp_rows as f64;
    let col_step = cols as f64 / disp_cols as f64;

    for y in 0..disp_rows {
        let row = ((y as f64 * row_step).floor() as usize).min(rows - 1);
        for px in 0..disp_cols {
            let col = ((px as f64 * col_step).floor() as usize).min(cols - 1);
            let Some(pixel) = image.value_at(row, col) else {
                continue;
            };
            let at_cursor = focused && row == cursor.row.min(rows - 1) && col == cursor.col.min(cols - 1);
            let color = pixel_color(pixel, levels, unit_range, palette, colors);
            for i in 0..pixel_width {
                let screen_x = inner.x + (px * pixel_width + i) as u16;
                let screen_y = inner.y + y as u16;
                if let Some(cell) = f.buffer_mut().cell_mut((screen_x, screen_y)) {
                    if at_cursor {
                        cell.set_char('┼').set_fg(colors.yellow).set_bg(color);
                    } else {
                        cell.set_char('█').set_fg(color);
                    }
                }
            }
        }
    }

    if let Some(frame) = frame {
        let bar = Rect::new(inner.x, inner.y + canvas_height, inner.width, 1);
        let mut state = ScrollbarState::new(frame.count).position(frame.index);
        f.render_stateful_widget(
            Scrollbar::default()
                .orientation(ScrollbarOrientation::HorizontalBottom)
                .begin_symbol(Some("["))
                .end_symbol(Some("]")),
            bar,
            &mut state,
        );
        let label = format!(" frame {}/{} ", frame.index, frame.count.saturating_sub(1));
        let label = truncate_to_width(&label, inner.width as usize);
        f.render_widget(
            Paragraph::new(label)
                .style(Style::default().fg(colors.fg1))
                .alignment(Alignment::Center),
            bar,
        );
    }
}

fn bounds(values: impl Iterator<Item = f64>) -> [f64; 2] {
    let (lo, hi) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)));
    if !lo.is_finite() || !hi.is_finite() {
        [0.0, 1.0]
    } else if lo == hi {
        [lo - 0.5, hi + 0.5]
    } else {
        [lo, hi]
    }
}

fn draw_plot(
    f: &mut Frame<'_>,
    area: Rect,
    plot: &PlotAdapter,
    focused: bool,
    palette: ColorPalette,
    colors: &ThemeColors,
) {
    let block = view_block(format!(" {} ", plot.title()), focused, colors);
    let bound = plot.node().is_some_and(|n| !n.is_group());
    if draw_placeholder(f, area, bound, plot.is_available(), block.clone(), colors) {
        return;
    }

    let series = plot.series();
    let x_bounds = bounds(series.iter().map(|p| p.0));
    let y_bounds = bounds(series.iter().map(|p| p.1));
    let labels = |b: [f64; 2]| {
        vec![
            format_axis_label(b[0]),
            format_axis_label((b[0] + b[1]) / 2.0),
            format_axis_label(b[1]),
        ]
    };

    let datasets = vec![Dataset::default()
        .name(plot.y_label().to_string())
        .marker(Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(palette.color(0.6)))
        .data(&series)];

    let chart = Chart::new(datasets)
        .block(block)
        .x_axis(
            Axis::default()
                .title(plot.x_label().to_string())
                .style(Style::default().fg(colors.fg0))
                .bounds(x_bounds)
                .labels(labels(x_bounds)),
        )
        .y_axis(
            Axis::default()
                .title(plot.y_label().to_string())
                .style(Style::default().fg(colors.fg0))
                .bounds(y_bounds)
                .labels(labels(y_bounds)),
        );
    f.render_widget(chart, area);
}
