//! Persisted user settings.

use crate::error::Result;
use crate::ui::{ColorPalette, Theme};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// How many recent files are remembered.
pub const MAX_RECENT_FILES: usize = 10;

/// Settings saved between sessions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Most recently opened files, newest first.
    pub recent_files: Vec<PathBuf>,
    /// UI theme.
    pub theme: Theme,
    /// Image colour palette.
    pub palette: ColorPalette,
    /// Whether the details pane is shown.
    pub show_details: bool,
    /// Width of the tree pane in percent of the screen.
    pub tree_width_percent: u16,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            recent_files: Vec::new(),
            theme: Theme::default(),
            palette: ColorPalette::default(),
            show_details: true,
            tree_width_percent: 30,
        }
    }
}

impl Settings {
    /// Read settings from `path`. A missing or malformed file yields the
    /// defaults.
    pub fn load(path: &Path) -> Self {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) => {
                if e.kind() != std::io::ErrorKind::NotFound {
                    tracing::warn!("Could not read settings {}: {}", path.display(), e);
                }
                return Self::default();
            },
        };
        match serde_json::from_str::<Settings>(&text) {
            Ok(mut settings) => {
                settings.recent_files.truncate(MAX_RECENT_FILES);
                settings.tree_width_percent = settings.tree_width_percent.clamp(10, 90);
                settings
            },
            Err(e) => {
                tracing::warn!("Ignoring malformed settings {}: {}", path.display(), e);
                Self::default()
            },
        }
    }

    /// Write settings to `path`, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Record an open attempt. The path always leaves its old position and
    /// only comes back, at the top, when the open succeeded.
    pub fn record_open(&mut self, path: &Path, succeeded: bool) {
        self.recent_files.retain(|p| p != path);
        if succeeded {
            self.recent_files.insert(0, path.to_path_buf());
            self.recent_files.truncate(MAX_RECENT_FILES);
        }
    }

    /// Settings file location: `$XDG_CONFIG_HOME/h5lens/settings.json`, else
    /// `$HOME/.config/h5lens/settings.json`.
    pub fn default_path() -> Option<PathBuf> {
        if let Some(xdg) = env::var_os("XDG_CONFIG_HOME").filter(|v| !v.is_empty()) {
            return Some(PathBuf::from(xdg).join("h5lens").join("settings.json"));
        }
        env::var_os("HOME")
            .map(PathBuf::from)
            .map(|home| home.join(".config").join("h5lens").join("settings.json"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings::load(&dir.path().join("nope.json"));
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn malformed_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, "{ not json").unwrap();
        assert_eq!(Settings::load(&path), Settings::default());
    }

    #[test]
    fn save_creates_directories_and_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a").join("b").join("settings.json");
        let mut settings = Settings {
            theme: Theme::GruvboxLight,
            palette: ColorPalette::Rainbow,
            show_details: false,
            ..Settings::default()
        };
        settings.record_open(Path::new("/data/x.h5"), true);
        settings.save(&path).unwrap();
        assert_eq!(Settings::load(&path), settings);
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, r#"{"theme": "GruvboxLight"}"#).unwrap();
        let settings = Settings::load(&path);
        assert_eq!(settings.theme, Theme::GruvboxLight);
        assert!(settings.show_details);
        assert_eq!(settings.tree_width_percent, 30);
    }

    #[test]
    fn recent_files_are_deduplicated_and_capped() {
        let mut settings = Settings::default();
        for i in 0..12 {
            settings.record_open(&PathBuf::from(format!("/f{}.h5", i)), true);
        }
        assert_eq!(settings.recent_files.len(), MAX_RECENT_FILES);
        assert_eq!(settings.recent_files[0], PathBuf::from("/f11.h5"));

        settings.record_open(Path::new("/f5.h5"), true);
        assert_eq!(settings.recent_files[0], PathBuf::from("/f5.h5"));
        assert_eq!(settings.recent_files.iter().filter(|p| p.ends_with("f5.h5")).count(), 1);
    }

    #[test]
    fn failed_open_drops_the_entry() {
        let mut settings = Settings::default();
        settings.record_open(Path::new("/a.h5"), true);
        settings.record_open(Path::new("/b.h5"), true);
        settings.record_open(Path::new("/a.h5"), false);
        assert_eq!(settings.recent_files, vec![PathBuf::from("/b.h5")]);
    }
}
