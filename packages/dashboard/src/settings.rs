//! Dashboard preferences persisted as TOML.
//!
//! Settings are an explicit object handed to whatever renders the pages.
//! [`SettingsStore`] loads them once at startup and writes them back
//! whenever they change.

use std::path::{Path, PathBuf};

use hso_listing::DEFAULT_PER_PAGE;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Errors that can occur while loading or saving settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    /// I/O error (file read/write).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Settings file is not valid TOML.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),

    /// Settings could not be encoded.
    #[error("TOML encode error: {0}")]
    Encode(#[from] toml::ser::Error),
}

/// Color scheme.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    /// The other theme.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }
}

/// User-facing dashboard preferences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct DashboardSettings {
    pub theme: Theme,
    pub email_notifications: bool,
    pub push_notifications: bool,
    pub two_factor_auth: bool,
    /// Announcements shown per page.
    pub announcements_per_page: usize,
    /// Programs shown per page.
    pub programs_per_page: usize,
}

impl Default for DashboardSettings {
    fn default() -> Self {
        Self {
            theme: Theme::default(),
            email_notifications: false,
            push_notifications: false,
            two_factor_auth: false,
            announcements_per_page: DEFAULT_PER_PAGE,
            programs_per_page: DEFAULT_PER_PAGE,
        }
    }
}

/// Settings bound to a file on disk.
#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
    current: DashboardSettings,
}

impl SettingsStore {
    /// Loads settings from `path`. A missing file yields the defaults and
    /// is not created until the first save.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError`] if the file exists but cannot be read or
    /// parsed.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, SettingsError> {
        let path = path.into();
        let current = match std::fs::read_to_string(&path) {
            Ok(text) => toml::from_str(&text)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!("no settings at {}, using defaults", path.display());
                DashboardSettings::default()
            }
            Err(e) => return Err(e.into()),
        };
        Ok(Self { path, current })
    }

    /// Current settings.
    #[must_use]
    pub const fn settings(&self) -> &DashboardSettings {
        &self.current
    }

    /// File the settings are saved to.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Writes the current settings, creating parent directories as needed.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError`] if the file cannot be written.
    pub fn save(&self) -> Result<(), SettingsError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, toml::to_string(&self.current)?)?;
        log::debug!("saved settings to {}", self.path.display());
        Ok(())
    }

    /// Applies `change` and saves if anything changed.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError`] if saving fails, in which case the
    /// in-memory settings are rolled back to what they were before.
    pub fn update(
        &mut self,
        change: impl FnOnce(&mut DashboardSettings),
    ) -> Result<&DashboardSettings, SettingsError> {
        let before = self.current.clone();
        change(&mut self.current);
        if self.current == before {
            return Ok(&self.current);
        }
        if let Err(e) = self.save() {
            log::error!("Failed to save settings to {}: {e}", self.path.display());
            self.current = before;
            return Err(e);
        }
        Ok(&self.current)
    }

    /// Replaces all settings and saves if they differ.
    ///
    /// # Errors
    ///
    /// See [`Self::update`].
    pub fn replace(
        &mut self,
        settings: DashboardSettings,
    ) -> Result<&DashboardSettings, SettingsError> {
        self.update(|current| *current = settings)
    }
}
