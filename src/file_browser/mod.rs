//! File browser: pick a file from a directory or from the recent list.

pub mod ui;

use std::fs;
use std::path::{Path, PathBuf};

/// Extensions of files the viewer can open.
const DATA_EXTENSIONS: &[&str] = &["h5", "hdf5", "he5", "nc", "nc4", "cdf"];

/// Whether `path` has a known HDF5/netCDF extension.
pub fn is_data_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| DATA_EXTENSIONS.iter().any(|d| d.eq_ignore_ascii_case(e)))
}

/// File browser entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    /// Full path to the file or directory.
    pub path: PathBuf,
    /// Display name.
    pub name: String,
    /// Whether the entry is a directory (after following symlinks).
    pub is_dir: bool,
    /// Whether the entry is a symlink.
    pub is_symlink: bool,
}

/// What the browser lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BrowserSource {
    /// Contents of the current directory.
    #[default]
    Directory,
    /// Recently opened files.
    Recent,
}

/// File browser state.
#[derive(Debug)]
pub struct FileBrowserState {
    /// Directory being browsed.
    pub current_dir: PathBuf,
    /// Entries currently listed.
    pub entries: Vec<FileEntry>,
    /// Cursor position.
    pub cursor: usize,
    /// Scroll offset.
    pub scroll: usize,
    /// Show hidden dot-prefixed entries.
    pub show_hidden: bool,
    /// Listing mode.
    pub source: BrowserSource,
}

impl FileBrowserState {
    /// Browser on the working directory.
    pub fn new() -> Self {
        let current_dir = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        Self {
            current_dir,
            entries: Vec::new(),
            cursor: 0,
            scroll: 0,
            show_hidden: false,
            source: BrowserSource::Directory,
        }
    }

    /// Browse `dir`.
    pub fn open_dir(&mut self, dir: &Path) {
        self.current_dir = dir.to_path_buf();
        self.source = BrowserSource::Directory;
        self.load_directory();
    }

    /// Load directory contents.
    pub fn load_directory(&mut self) {
        self.entries.clear();

        if let Some(parent) = self.current_dir.parent() {
            self.entries.push(FileEntry {
                path: parent.to_path_buf(),
                name: "..".to_string(),
                is_dir: true,
                is_symlink: parent.is_symlink(),
            });
        }

        let dir_entries = match fs::read_dir(&self.current_dir) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!("Could not list {}: {}", self.current_dir.display(), e);
                return;
            },
        };

        for entry in dir_entries.flatten() {
            let path = entry.path();
            let name = path
                .file_name()
                .unwrap_or_default()
                .to_string_lossy()
                .to_string();

            if !self.show_hidden && name.starts_with('.') {
                continue;
            }

            let is_symlink = path.is_symlink();
            let is_dir = if is_symlink {
                path.metadata().map(|m| m.is_dir()).unwrap_or(false)
            } else {
                path.is_dir()
            };

            self.entries.push(FileEntry {
                path,
                name,
                is_dir,
                is_symlink,
            });
        }

        // Directories first, then files, both case-insensitively
        self.entries.sort_by(|a, b| {
            if a.name == ".." {
                std::cmp::Ordering::Less
            } else if b.name == ".." {
                std::cmp::Ordering::Greater
            } else {
                match (a.is_dir, b.is_dir) {
                    (true, false) => std::cmp::Ordering::Less,
                    (false, true) => std::cmp::Ordering::Greater,
                    _ => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
                }
            }
        });

        self.cursor = 0;
        self.scroll = 0;
    }

    /// List `recent` instead of the directory. Files that no longer exist
    /// are skipped.
    pub fn show_recent(&mut self, recent: &[PathBuf]) {
        self.source = BrowserSource::Recent;
        self.entries = recent
            .iter()
            .filter(|p| p.is_file())
            .map(|p| FileEntry {
                path: p.clone(),
                name: p.display().to_string(),
                is_dir: false,
                is_symlink: p.is_symlink(),
            })
            .collect();
        self.cursor = 0;
        self.scroll = 0;
    }

    /// Switch between the directory listing and the recent list.
    pub fn toggle_recent(&mut self, recent: &[PathBuf]) {
        match self.source {
            BrowserSource::Directory => self.show_recent(recent),
            BrowserSource::Recent => {
                self.source = BrowserSource::Directory;
                self.load_directory();
            },
        }
    }

    /// Move cursor up.
    pub fn cursor_up(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    /// Move cursor down.
    pub fn cursor_down(&mut self) {
        if self.cursor + 1 < self.entries.len() {
            self.cursor += 1;
        }
    }

    /// Get the currently selected entry.
    pub fn current_entry(&self) -> Option<&FileEntry> {
        self.entries.get(self.cursor)
    }

    /// Enter the selected directory or return the selected file.
    pub fn select_current(&mut self) -> Option<PathBuf> {
        let entry = self.current_entry()?.clone();

        if entry.is_dir {
            self.open_dir(&entry.path);
            None
        } else {
            Some(entry.path)
        }
    }

    /// Navigate to parent directory.
    pub fn go_to_parent(&mut self) {
        if let Some(parent) = self.current_dir.parent().map(Path::to_path_buf) {
            self.open_dir(&parent);
        }
    }

    /// Toggle show hidden files.
    pub fn toggle_hidden(&mut self) {
        self.show_hidden = !self.show_hidden;
        if self.source == BrowserSource::Directory {
            self.load_directory();
        }
    }

    /// Adjust scroll to keep cursor visible.
    pub fn adjust_scroll(&mut self, viewport_height: usize) {
        if viewport_height == 0 {
            return;
        }

        if self.cursor < self.scroll {
            self.scroll = self.cursor;
        }

        if self.cursor >= self.scroll + viewport_height {
            self.scroll = self.cursor.saturating_sub(viewport_height - 1);
        }
    }
}

impl Default for FileBrowserState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(browser: &FileBrowserState) -> Vec<&str> {
        browser.entries.iter().map(|e| e.name.as_str()).collect()
    }

    #[test]
    fn directories_sort_first_and_hidden_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("b.h5"), b"").unwrap();
        fs::write(dir.path().join("A.nc"), b"").unwrap();
        fs::write(dir.path().join(".hidden"), b"").unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();

        let mut browser = FileBrowserState::new();
        browser.open_dir(dir.path());
        assert_eq!(names(&browser), vec!["..", "sub", "A.nc", "b.h5"]);

        browser.toggle_hidden();
        assert!(names(&browser).contains(&".hidden"));
    }

    #[test]
    fn selecting_a_directory_enters_it() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        fs::write(dir.path().join("sub").join("x.h5"), b"").unwrap();

        let mut browser = FileBrowserState::new();
        browser.open_dir(dir.path());
        browser.cursor_down();
        assert_eq!(browser.select_current(), None);
        assert_eq!(browser.current_dir, dir.path().join("sub"));
        browser.cursor_down();
        assert_eq!(browser.select_current(), Some(dir.path().join("sub").join("x.h5")));
    }

    #[test]
    fn recent_list_skips_missing_files() {
        let dir = tempfile::tempdir().unwrap();
        let present = dir.path().join("here.h5");
        fs::write(&present, b"").unwrap();
        let recent = vec![present.clone(), dir.path().join("gone.h5")];

        let mut browser = FileBrowserState::new();
        browser.open_dir(dir.path());
        browser.toggle_recent(&recent);
        assert_eq!(browser.source, BrowserSource::Recent);
        assert_eq!(browser.entries.len(), 1);
        assert_eq!(browser.select_current(), Some(present));

        browser.toggle_recent(&recent);
        assert_eq!(browser.source, BrowserSource::Directory);
        assert_eq!(names(&browser)[0], "..");
    }

    #[test]
    fn data_files_are_recognised_by_extension() {
        assert!(is_data_file(Path::new("run.h5")));
        assert!(is_data_file(Path::new("/tmp/OUT.NC")));
        assert!(!is_data_file(Path::new("notes.txt")));
        assert!(!is_data_file(Path::new("h5")));
    }
}
