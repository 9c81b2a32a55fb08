//! Application state and logic.

use std::path::{Path, PathBuf};

use crate::clipboard;
use crate::config::Settings;
use crate::data::DataSource;
use crate::file_browser::FileBrowserState;
use crate::ui::{ColorPalette, Theme};
use crate::view::ViewAdapter;
use crate::workspace::{FileWorkspace, TabKind, TabView};

/// Which pane receives navigation keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    /// The node tree.
    #[default]
    Tree,
    /// The dims bar.
    Dims,
    /// The view of the focused tab.
    View,
}

/// Scroll position inside a table or image view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ViewScroll {
    /// First visible row.
    pub row: usize,
    /// First visible column.
    pub col: usize,
}

/// Application state.
#[derive(Debug)]
pub struct App {
    /// Open files, in tab order.
    pub files: Vec<FileWorkspace>,
    /// Index of the file shown.
    pub active_file: usize,
    /// Persisted settings.
    pub settings: Settings,
    settings_path: Option<PathBuf>,
    /// File browser state.
    pub file_browser: FileBrowserState,
    /// Whether the file browser replaces the main view.
    pub file_browser_mode: bool,
    /// Pane receiving navigation keys.
    pub focus: Focus,
    /// Scroll inside the current view.
    pub view_scroll: ViewScroll,
    /// Status message.
    pub status: String,
    /// Error popup text.
    pub error_message: Option<String>,
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

impl App {
    /// Create the application with `settings`, saved back to `settings_path`.
    pub fn new(settings: Settings, settings_path: Option<PathBuf>) -> Self {
        Self {
            files: Vec::new(),
            active_file: 0,
            settings,
            settings_path,
            file_browser: FileBrowserState::new(),
            file_browser_mode: false,
            focus: Focus::Tree,
            view_scroll: ViewScroll::default(),
            status: "Ready".to_string(),
            error_message: None,
        }
    }

    /// Current theme.
    pub fn theme(&self) -> Theme {
        self.settings.theme
    }

    /// Current image palette.
    pub fn palette(&self) -> ColorPalette {
        self.settings.palette
    }

    /// Open a file, or browse a directory.
    pub fn open_path(&mut self, path: &Path) {
        if path.is_dir() {
            self.file_browser.open_dir(path);
            self.file_browser_mode = true;
            self.status = format!("Browsing: {}", path.display());
        } else {
            self.open_file(path);
        }
    }

    /// Open `path` in a new file tab. Failure shows the error popup and
    /// leaves the other files alone.
    pub fn open_file(&mut self, path: &Path) -> bool {
        let path = std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());

        if let Some(index) = self.files.iter().position(|w| w.path() == Some(path.as_path())) {
            self.switch_file(index);
            return true;
        }

        match FileWorkspace::open(&path) {
            Ok(workspace) => {
                tracing::info!("Opened {}", path.display());
                self.files.push(workspace);
                self.switch_file(self.files.len() - 1);
                self.settings.record_open(&path, true);
                self.status = format!("{} loaded", file_label(&path));
                if let Some(parent) = path.parent() {
                    self.file_browser.current_dir = parent.to_path_buf();
                }
                self.file_browser_mode = false;
                self.save_settings();
                true
            },
            Err(e) => {
                tracing::error!("Error opening {}: {}", path.display(), e);
                self.settings.record_open(&path, false);
                self.error_message = Some(format!("Error loading file: {}", e));
                self.status = "Error loading file".to_string();
                self.save_settings();
                false
            },
        }
    }

    /// Show an already opened source, such as the built-in sample.
    pub fn open_source(&mut self, source: Box<dyn DataSource>) {
        let name = source.name().to_string();
        match FileWorkspace::new(source) {
            Ok(workspace) => {
                self.files.push(workspace);
                self.switch_file(self.files.len() - 1);
                self.status = format!("{} loaded", name);
            },
            Err(e) => self.error_message = Some(format!("Error loading {}: {}", name, e)),
        }
    }

    /// Open every pasted line that names an existing file.
    pub fn handle_paste(&mut self, text: &str) -> usize {
        let mut opened = 0;
        for line in text.lines() {
            let trimmed = line.trim().trim_matches(|c| c == '\'' || c == '"');
            let trimmed = trimmed.strip_prefix("file://").unwrap_or(trimmed);
            if trimmed.is_empty() {
                continue;
            }
            let path = PathBuf::from(trimmed);
            if path.is_file() && self.open_file(&path) {
                opened += 1;
            }
        }
        if opened == 0 {
            tracing::debug!("Paste did not name an openable file");
        }
        opened
    }

    /// Close the shown file.
    pub fn close_file(&mut self) {
        if self.files.is_empty() {
            return;
        }
        let workspace = self.files.remove(self.active_file);
        tracing::info!("Closed {}", workspace.name());
        self.status = format!("Closed {}", workspace.name());
        self.active_file = self.active_file.min(self.files.len().saturating_sub(1));
        self.reset_view();
    }

    /// Show file `index`.
    pub fn switch_file(&mut self, index: usize) {
        if index < self.files.len() {
            self.active_file = index;
            self.reset_view();
        }
    }

    /// Show the next file, wrapping around.
    pub fn next_file(&mut self) {
        if !self.files.is_empty() {
            self.switch_file((self.active_file + 1) % self.files.len());
        }
    }

    /// Show the previous file, wrapping around.
    pub fn prev_file(&mut self) {
        if !self.files.is_empty() {
            self.switch_file((self.active_file + self.files.len() - 1) % self.files.len());
        }
    }

    /// The shown file.
    pub fn workspace(&self) -> Option<&FileWorkspace> {
        self.files.get(self.active_file)
    }

    /// The shown file, mutably.
    pub fn workspace_mut(&mut self) -> Option<&mut FileWorkspace> {
        self.files.get_mut(self.active_file)
    }

    fn reset_view(&mut self) {
        self.view_scroll = ViewScroll::default();
        if self.focus == Focus::Dims {
            self.focus = Focus::Tree;
        }
    }

    fn report(&mut self, result: crate::error::Result<()>) {
        if let Err(e) = result {
            self.status = format!("Error: {}", e);
        }
    }

    /// Move the tree cursor.
    pub fn tree_up(&mut self) {
        let result = self.workspace_mut().map(FileWorkspace::cursor_up);
        self.view_scroll = ViewScroll::default();
        self.report(result.unwrap_or(Ok(())));
    }

    /// Move the tree cursor.
    pub fn tree_down(&mut self) {
        let result = self.workspace_mut().map(FileWorkspace::cursor_down);
        self.view_scroll = ViewScroll::default();
        self.report(result.unwrap_or(Ok(())));
    }

    /// Collapse the tree node or move to its parent.
    pub fn tree_collapse(&mut self) {
        let result = self.workspace_mut().map(FileWorkspace::collapse);
        self.report(result.unwrap_or(Ok(())));
    }

    /// Expand the tree node.
    pub fn tree_expand(&mut self) {
        if let Some(ws) = self.workspace_mut() {
            ws.expand();
        }
    }

    /// Jump to the first or last tree row.
    pub fn tree_jump(&mut self, to_end: bool) {
        let result = self.workspace_mut().map(|ws| {
            if to_end {
                ws.explorer_mut().goto_last();
            } else {
                ws.explorer_mut().goto_first();
            }
            ws.select_current()
        });
        self.view_scroll = ViewScroll::default();
        self.report(result.unwrap_or(Ok(())));
    }

    /// Open an Image or Plot tab on the selected dataset.
    pub fn add_tab(&mut self, kind: TabKind) {
        let Some(ws) = self.workspace_mut() else {
            return;
        };
        let added = ws.add_tab(kind).is_some();
        self.status = if added {
            format!("{} tab opened", kind.label())
        } else {
            "Select a dataset first".to_string()
        };
        self.view_scroll = ViewScroll::default();
    }

    /// Close the focused view tab.
    pub fn close_tab(&mut self) {
        let closed = self.workspace_mut().is_some_and(FileWorkspace::close_tab);
        if !closed {
            self.status = "The Table tab cannot be closed".to_string();
        }
        self.view_scroll = ViewScroll::default();
    }

    /// Focus the next or previous view tab.
    pub fn cycle_tab(&mut self, forward: bool) {
        if let Some(ws) = self.workspace_mut() {
            if forward {
                ws.next_tab();
            } else {
                ws.prev_tab();
            }
        }
        self.view_scroll = ViewScroll::default();
    }

    /// Step the image frame.
    pub fn scroll_frame(&mut self, delta: isize) {
        if !self.workspace_mut().is_some_and(|ws| ws.scroll_frame(delta)) {
            self.status = "No frames to step through".to_string();
        }
    }

    /// Enter or leave the dims bar.
    pub fn toggle_dims_focus(&mut self) {
        let has_dims = self.workspace().is_some_and(|ws| !ws.dims().tokens().is_empty());
        self.focus = match self.focus {
            Focus::Dims => Focus::Tree,
            _ if has_dims => Focus::Dims,
            other => other,
        };
    }

    /// Finish typing a dims token.
    pub fn commit_dims(&mut self) {
        let Some(ws) = self.workspace_mut() else {
            return;
        };
        let text = ws.dims().input().unwrap_or_default().to_string();
        if ws.commit_dims_input() {
            self.status = format!("Dims: ({})", ws.dims().tokens().join(", "));
            self.view_scroll = ViewScroll::default();
        } else {
            self.status = format!("Rejected {:?}", text);
        }
    }

    /// Scroll the view by whole cells.
    pub fn scroll_view(&mut self, rows: isize, cols: isize) {
        let (max_rows, max_cols) = self
            .workspace()
            .and_then(|ws| ws.active_tab())
            .map(|tab| tab.view.size())
            .unwrap_or((0, 0));
        self.view_scroll.row = self
            .view_scroll
            .row
            .saturating_add_signed(rows)
            .min(max_rows.saturating_sub(1));
        self.view_scroll.col = self
            .view_scroll
            .col
            .saturating_add_signed(cols)
            .min(max_cols.saturating_sub(1));
    }

    /// Cycle to the next theme.
    pub fn cycle_theme(&mut self) {
        self.settings.theme = self.settings.theme.next();
        self.status = format!("Theme: {}", self.settings.theme.name());
        self.save_settings();
    }

    /// Cycle to the next image palette.
    pub fn cycle_palette(&mut self) {
        self.settings.palette = self.settings.palette.next();
        self.status = format!("Palette: {}", self.settings.palette.name());
        self.save_settings();
    }

    /// Show or hide the details pane.
    pub fn toggle_details(&mut self) {
        self.settings.show_details = !self.settings.show_details;
        self.status = if self.settings.show_details {
            "Details: ON".to_string()
        } else {
            "Details: OFF".to_string()
        };
        self.save_settings();
    }

    /// Widen or narrow the tree pane.
    pub fn resize_tree(&mut self, delta: i16) {
        let width = self.settings.tree_width_percent as i16 + delta;
        self.settings.tree_width_percent = width.clamp(10, 90) as u16;
        self.save_settings();
    }

    /// Copy the selected node's description.
    pub fn copy_details(&mut self) {
        let Some(details) = self.workspace().map(|ws| ws.details().clone()) else {
            self.status = "No file loaded".to_string();
            return;
        };
        self.status = match clipboard::copy_details(&details) {
            Ok(()) => format!("Copied {}", details.path),
            Err(e) => format!("Copy failed: {}", e),
        };
    }

    /// Copy the focused table view as TSV.
    pub fn copy_table(&mut self) {
        let result = match self.workspace().and_then(|ws| ws.active_tab()).map(|t| &t.view) {
            Some(TabView::Table(table)) if table.is_available() => Some(clipboard::copy_table(table)),
            _ => None,
        };
        self.status = match result {
            Some(Ok(())) => "Table copied".to_string(),
            Some(Err(e)) => format!("Copy failed: {}", e),
            None => "Nothing to copy".to_string(),
        };
    }

    /// Open the file browser next to the shown file.
    pub fn open_file_browser(&mut self) {
        let start_dir = self
            .workspace()
            .and_then(|ws| ws.path())
            .and_then(Path::parent)
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.file_browser.current_dir.clone());
        self.file_browser.open_dir(&start_dir);
        self.file_browser_mode = true;
        self.status = format!("File browser: {}", self.file_browser.current_dir.display());
    }

    /// Open the file browser on the recent list.
    pub fn open_recent(&mut self) {
        self.file_browser.show_recent(&self.settings.recent_files);
        self.file_browser_mode = true;
        self.status = "Recent files".to_string();
    }

    /// Switch the browser between the directory and the recent list.
    pub fn toggle_recent(&mut self) {
        let recent = self.settings.recent_files.clone();
        self.file_browser.toggle_recent(&recent);
    }

    /// Open the browser selection.
    pub fn browser_select(&mut self) {
        if let Some(path) = self.file_browser.select_current() {
            self.open_file(&path);
        }
    }

    /// Leave the file browser if a file is open.
    pub fn close_file_browser(&mut self) {
        if !self.files.is_empty() {
            self.file_browser_mode = false;
        }
    }

    /// Dismiss the error popup.
    pub fn dismiss_error(&mut self) {
        self.error_message = None;
    }

    /// Write the settings file, if there is one.
    pub fn save_settings(&self) {
        let Some(path) = self.settings_path.as_ref() else {
            return;
        };
        if let Err(e) = self.settings.save(path) {
            tracing::warn!("Could not save settings to {}: {}", path.display(), e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::MemorySource;

    fn app() -> App {
        let mut app = App::new(Settings::default(), None);
        app.open_source(Box::new(MemorySource::demo()));
        app
    }

    #[test]
    fn failed_open_shows_popup_and_keeps_files() {
        let mut app = app();
        let dir = tempfile::tempdir().unwrap();
        let bogus = dir.path().join("bogus.h5");
        std::fs::write(&bogus, b"not hdf5").unwrap();

        assert!(!app.open_file(&bogus));
        assert!(app.error_message.is_some());
        assert_eq!(app.files.len(), 1);
        assert!(app.settings.recent_files.is_empty());
        app.dismiss_error();
        assert!(app.error_message.is_none());
    }

    #[test]
    fn paste_ignores_lines_that_are_not_files() {
        let mut app = app();
        assert_eq!(app.handle_paste("hello\n/definitely/not/here.h5\n"), 0);
        assert_eq!(app.files.len(), 1);
    }

    #[test]
    fn settings_toggles_update_state() {
        let mut app = app();
        app.cycle_theme();
        assert_eq!(app.theme(), Theme::GruvboxLight);
        app.cycle_palette();
        assert_eq!(app.palette(), ColorPalette::Plasma);
        app.toggle_details();
        assert!(!app.settings.show_details);
        app.resize_tree(100);
        assert_eq!(app.settings.tree_width_percent, 90);
    }

    #[test]
    fn tabs_need_a_dataset_and_table_stays() {
        let mut app = app();
        app.add_tab(TabKind::Image);
        assert_eq!(app.status, "Select a dataset first");
        app.close_tab();
        assert_eq!(app.workspace().map(|ws| ws.tabs().len()), Some(1));

        app.workspace_mut().unwrap().select_node("/fields/temperature").unwrap();
        app.add_tab(TabKind::Image);
        assert_eq!(app.workspace().map(|ws| ws.tabs().len()), Some(2));
        app.scroll_frame(2);
        assert_eq!(app.workspace().unwrap().dims().tokens()[0], "2");
    }

    #[test]
    fn view_scroll_is_clamped_to_the_view() {
        let mut app = app();
        app.workspace_mut().unwrap().select_node("/series/parabola").unwrap();
        app.scroll_view(100, 100);
        assert_eq!(app.view_scroll, ViewScroll { row: 39, col: 1 });
        app.scroll_view(-500, -1);
        assert_eq!(app.view_scroll, ViewScroll::default());
    }

    #[test]
    fn closing_the_last_file_leaves_none() {
        let mut app = app();
        app.close_file();
        assert!(app.workspace().is_none());
        assert_eq!(app.active_file, 0);
    }
}
