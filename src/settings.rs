//! User settings, stored as JSON under the platform config directory.
//!
//! Loading never fails: a missing file yields defaults, an unreadable or
//! malformed one yields defaults and a warning.

use crate::constants::{DEFAULT_EXPORT_FILE_NAME, DRAG_ACTIVATION_DISTANCE};
use crate::error::SettingsError;
use crate::mode::EditMode;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Apply rhetorical category colors
    pub show_colors: bool,
    pub default_mode: EditMode,
    pub export_file_name: String,
    /// Directory for file-backed lessons; bundled lessons are used when unset
    pub lessons_dir: Option<PathBuf>,
    /// Pointer travel in pixels before a press becomes a drag
    pub drag_activation_distance: f32,
    /// Restore the pre-drag state when a drag is cancelled
    pub rollback_on_cancel: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            show_colors: true,
            default_mode: EditMode::Sentence,
            export_file_name: DEFAULT_EXPORT_FILE_NAME.to_string(),
            lessons_dir: None,
            drag_activation_distance: DRAG_ACTIVATION_DISTANCE,
            rollback_on_cancel: false,
        }
    }
}

/// `<config dir>/mentorboard/settings.json`
pub fn default_settings_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("mentorboard").join("settings.json"))
}

impl Settings {
    /// Load from the default location.
    pub fn load() -> Self {
        match default_settings_path() {
            Some(path) => Self::load_from(&path),
            None => {
                debug!("No config directory, using default settings");
                Self::default()
            }
        }
    }

    /// Load from `path`, falling back to defaults.
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            debug!(path = %path.display(), "No settings file, using defaults");
            return Self::default();
        }
        match Self::try_load(path) {
            Ok(settings) => settings.sanitized(),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Invalid settings, using defaults");
                Self::default()
            }
        }
    }

    pub fn try_load(path: &Path) -> Result<Self, SettingsError> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), SettingsError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    fn sanitized(mut self) -> Self {
        if !self.drag_activation_distance.is_finite() || self.drag_activation_distance < 0.0 {
            warn!(
                value = self.drag_activation_distance,
                "Invalid drag_activation_distance, using default"
            );
            self.drag_activation_distance = DRAG_ACTIVATION_DISTANCE;
        }
        if self.export_file_name.trim().is_empty() || self.export_file_name.contains(['/', '\\']) {
            warn!(value = %self.export_file_name, "Invalid export_file_name, using default");
            self.export_file_name = DEFAULT_EXPORT_FILE_NAME.to_string();
        }
        self
    }
}
