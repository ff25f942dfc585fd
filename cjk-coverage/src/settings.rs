//! User preferences, persisted as a small JSON file.
//!
//! Changes go through [`SettingsStore::update`], which applies a
//! [`SettingsPatch`] and writes the file in one step.

use core::fmt;
use core::str::FromStr;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::locale::Locale;
use crate::query::CopyMode;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    /// Follow the operating system.
    #[default]
    System,
    Light,
    Dark,
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Theme::System => "system",
            Theme::Light => "light",
            Theme::Dark => "dark",
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("unknown theme '{0}', expected one of: system, light, dark")]
pub struct UnknownTheme(pub String);

impl FromStr for Theme {
    type Err = UnknownTheme;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "system" | "auto" => Ok(Theme::System),
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            _ => Err(UnknownTheme(s.to_owned())),
        }
    }
}

/// Persisted preferences. Missing fields take their default.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub theme: Theme,
    pub language: Locale,
    pub copy_mode: CopyMode,
}

/// A partial update of [`Settings`]; `None` leaves a field unchanged.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SettingsPatch {
    pub theme: Option<Theme>,
    pub language: Option<Locale>,
    pub copy_mode: Option<CopyMode>,
}

impl SettingsPatch {
    pub fn is_empty(&self) -> bool {
        *self == SettingsPatch::default()
    }
}

impl Settings {
    fn apply(&mut self, patch: SettingsPatch) {
        if let Some(theme) = patch.theme {
            self.theme = theme;
        }
        if let Some(language) = patch.language {
            self.language = language;
        }
        if let Some(copy_mode) = patch.copy_mode {
            self.copy_mode = copy_mode;
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("failed to write settings to '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to serialize settings: {0}")]
    Json(#[from] serde_json::Error),
}

/// Settings bound to the file they are saved in.
#[derive(Clone, Debug)]
pub struct SettingsStore {
    path: PathBuf,
    settings: Settings,
}

impl SettingsStore {
    /// `<config dir>/cjk-count/settings.json`, or a file in the working
    /// directory if the platform has no config dir.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("cjk-count")
            .join("settings.json")
    }

    /// Read settings from `path`.
    ///
    /// A missing, unreadable or malformed file yields the defaults; the
    /// latter two are logged.
    pub fn load(path: impl Into<PathBuf>) -> SettingsStore {
        let path = path.into();
        let settings = match std::fs::read_to_string(&path) {
            Ok(contents) => serde_json::from_str(&contents).unwrap_or_else(|e| {
                log::warn!("ignoring malformed settings in {}: {e}", path.display());
                Settings::default()
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::debug!("no settings at {}, using defaults", path.display());
                Settings::default()
            }
            Err(e) => {
                log::warn!("could not read settings from {}: {e}", path.display());
                Settings::default()
            }
        };
        SettingsStore { path, settings }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn settings(&self) -> Settings {
        self.settings
    }

    /// Apply `patch` and save the result.
    ///
    /// The in-memory settings are updated even if saving fails.
    pub fn update(&mut self, patch: SettingsPatch) -> Result<(), SettingsError> {
        self.settings.apply(patch);
        self.save()
    }

    pub fn save(&self) -> Result<(), SettingsError> {
        let io_error = |source| SettingsError::Io {
            path: self.path.clone(),
            source,
        };
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(io_error)?;
        }
        let contents = serde_json::to_string_pretty(&self.settings)?;
        std::fs::write(&self.path, contents).map_err(io_error)?;
        log::debug!("saved settings to {}", self.path.display());
        Ok(())
    }
}
