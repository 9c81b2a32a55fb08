//! Keymap help bar UI component.

use crate::app::{App, Focus};
use crate::ui::ThemeColors;
use ratatui::{layout::Rect, style::Style, widgets::Paragraph, Frame};

fn keymap_text(app: &App) -> &'static str {
    if app.error_message.is_some() {
        return "any key:dismiss";
    }
    if app.file_browser_mode {
        return "jk/↑↓:nav | Enter/l:select | h:parent | r:recent/dir | .:hidden | Esc:back | q:quit";
    }
    let editing = app.workspace().is_some_and(|ws| ws.dims().is_editing());
    match app.focus {
        Focus::Dims if editing => "type index or start:stop:step | Enter:apply | Esc:cancel",
        Focus::Dims => "hl/←→:axis | Enter/e:edit | d/Esc:back",
        Focus::View => "hjkl:scroll | PgUp/PgDn:frame | v/Esc:back | y:copy table",
        Focus::Tree => {
            "q:quit | hjkl:nav | i/p:image/plot tab | x:close tab | Tab:next tab | d:dims | v:view | \
             [/]:frame | o/r:open/recent | ,/.:file | w:close file | y/c:copy node/table | t:details | T/C:theme/palette"
        },
    }
}

/// Draw the keymap help bar.
pub(super) fn draw_keymap(f: &mut Frame<'_>, area: Rect, app: &App, colors: &ThemeColors) {
    let paragraph = Paragraph::new(keymap_text(app)).style(Style::default().fg(colors.fg0).bg(colors.bg0));

    f.render_widget(paragraph, area);
}
