//! Dark/light preference persisted under the `theme-preference` key.
//!
//! A saved preference always wins. Without one the store follows the
//! terminal's background as reported by `COLORFGBG`, falling back to dark.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{HubError, HubResult};

pub const PREFERENCE_KEY: &str = "theme-preference";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    #[default]
    Dark,
    Light,
}

impl ThemeMode {
    pub fn toggled(self) -> Self {
        match self {
            ThemeMode::Dark => ThemeMode::Light,
            ThemeMode::Light => ThemeMode::Dark,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ThemeMode::Dark => "Dark theme",
            ThemeMode::Light => "Light theme",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ThemeMode::Dark => "dark",
            ThemeMode::Light => "light",
        }
    }
}

impl std::fmt::Display for ThemeMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ThemeMode {
    type Err = HubError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "dark" => Ok(ThemeMode::Dark),
            "light" => Ok(ThemeMode::Light),
            other => Err(HubError::ValidationError(format!(
                "Unknown theme '{}'. Expected 'dark' or 'light'",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ThemeState {
    pub current: ThemeMode,
    pub system: ThemeMode,
    pub user_preference: Option<ThemeMode>,
}

/// Reads the terminal background from a `COLORFGBG` value such as `15;0`.
pub fn system_theme_from_colorfgbg(value: Option<&str>) -> ThemeMode {
    let Some(bg) = value
        .and_then(|v| v.rsplit(';').next())
        .and_then(|bg| bg.trim().parse::<u8>().ok())
    else {
        return ThemeMode::Dark;
    };

    match bg {
        7 | 9..=15 => ThemeMode::Light,
        _ => ThemeMode::Dark,
    }
}

pub fn detect_system_theme() -> ThemeMode {
    system_theme_from_colorfgbg(std::env::var("COLORFGBG").ok().as_deref())
}

pub struct ThemeStore {
    path: PathBuf,
    system: ThemeMode,
    user_preference: Option<ThemeMode>,
}

impl ThemeStore {
    /// Loads the preference file at `path`, detecting the system theme from
    /// the environment.
    pub fn init(path: impl Into<PathBuf>) -> Self {
        Self::with_system(path, detect_system_theme())
    }

    pub fn with_system(path: impl Into<PathBuf>, system: ThemeMode) -> Self {
        let path = path.into();
        let user_preference = read_preference(&path);
        debug!(
            path = %path.display(),
            preference = ?user_preference,
            system = %system,
            "Theme store initialised"
        );

        Self {
            path,
            system,
            user_preference,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn current(&self) -> ThemeMode {
        self.user_preference.unwrap_or(self.system)
    }

    pub fn state(&self) -> ThemeState {
        ThemeState {
            current: self.current(),
            system: self.system,
            user_preference: self.user_preference,
        }
    }

    pub fn set_theme(&mut self, mode: ThemeMode) -> HubResult<()> {
        self.user_preference = Some(mode);
        self.persist()
    }

    pub fn toggle_theme(&mut self) -> HubResult<ThemeMode> {
        let next = self.current().toggled();
        self.set_theme(next)?;
        Ok(next)
    }

    /// Drops the saved preference and follows the system theme again.
    pub fn reset_to_system(&mut self) -> HubResult<()> {
        self.user_preference = None;
        self.persist()
    }

    fn persist(&self) -> HubResult<()> {
        let mut table = read_table(&self.path).unwrap_or_default();
        match self.user_preference {
            Some(mode) => {
                table.insert(
                    PREFERENCE_KEY.to_string(),
                    toml::Value::String(mode.as_str().to_string()),
                );
            }
            None => {
                table.remove(PREFERENCE_KEY);
            }
        }

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| self.store_error(e))?;
            }
        }

        let contents = toml::to_string(&table)?;
        std::fs::write(&self.path, contents).map_err(|e| self.store_error(e))?;
        Ok(())
    }

    fn store_error(&self, err: std::io::Error) -> HubError {
        HubError::PreferenceStore {
            path: self.path.display().to_string(),
            message: err.to_string(),
        }
    }
}

fn read_table(path: &Path) -> Option<toml::Table> {
    let contents = std::fs::read_to_string(path).ok()?;
    match contents.parse::<toml::Table>() {
        Ok(table) => Some(table),
        Err(e) => {
            warn!(path = %path.display(), "Ignoring unreadable preference file: {}", e);
            None
        }
    }
}

fn read_preference(path: &Path) -> Option<ThemeMode> {
    let table = read_table(path)?;
    let value = table.get(PREFERENCE_KEY)?.as_str()?;
    match value.parse() {
        Ok(mode) => Some(mode),
        Err(_) => {
            warn!("Ignoring invalid {} value '{}'", PREFERENCE_KEY, value);
            None
        }
    }
}
