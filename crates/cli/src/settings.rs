use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use smile_capture_core::session::domain::session_config::SessionConfig;
use smile_capture_core::shared::constants::{APP_DIR_NAME, THUMBNAIL_MAX_EDGE};
use smile_capture_core::shared::orientation::DeviceOrientation;

/// Persisted defaults for the command line. Flags override them per run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub session: SessionConfig,
    /// Playback rate of the frame directory; 0 plays as fast as possible.
    pub fps: f64,
    pub orientation: DeviceOrientation,
    pub store: Option<PathBuf>,
    pub thumbnail_edge: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            session: SessionConfig::default(),
            fps: 30.0,
            orientation: DeviceOrientation::Portrait,
            store: None,
            thumbnail_edge: THUMBNAIL_MAX_EDGE,
        }
    }
}

impl Settings {
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join(APP_DIR_NAME).join("settings.json"))
    }

    /// Reads the settings file, falling back to defaults when it is missing
    /// or unreadable.
    pub fn load() -> Self {
        Self::config_path()
            .and_then(|path| fs::read_to_string(path).ok())
            .and_then(|json| match serde_json::from_str(&json) {
                Ok(settings) => Some(settings),
                Err(e) => {
                    log::warn!("Ignoring invalid settings file: {e}");
                    None
                }
            })
            .unwrap_or_default()
    }

    pub fn save(&self) -> Result<PathBuf, Box<dyn std::error::Error>> {
        let path = Self::config_path().ok_or("No configuration directory on this platform")?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, serde_json::to_string_pretty(self)?)?;
        Ok(path)
    }
}
