//! Navigation tuning, read from `assets/config/navigation.ron`.
//!
//! Every field is optional in the file; missing fields keep their defaults.
//! A missing or broken file never stops the game, it only falls back to
//! [`NavigationConfig::default`].

use crate::navigation::MotionSettings;
use bevy::prelude::*;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File name of the navigation config inside `assets/config/`.
pub const NAVIGATION_CONFIG_FILE: &str = "navigation.ron";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: ron::error::SpannedError,
    },
}

impl ConfigError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Io { source, .. } if source.kind() == std::io::ErrorKind::NotFound)
    }
}

/// Reads and deserializes a RON file.
pub fn load_ron<T: DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_ron(path, &text)
}

/// Deserializes RON text; `origin` only feeds the error message.
pub fn parse_ron<T: DeserializeOwned>(origin: &Path, text: &str) -> Result<T, ConfigError> {
    ron::from_str(text).map_err(|source| ConfigError::Parse {
        path: origin.to_path_buf(),
        source,
    })
}

/// Directory holding the shipped game data (`config/`, `levels.ron`).
pub fn assets_dir() -> PathBuf {
    #[cfg(debug_assertions)]
    {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("assets")
    }
    #[cfg(not(debug_assertions))]
    {
        std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(|dir| dir.join("assets")))
            .unwrap_or_else(|| PathBuf::from("assets"))
    }
}

/// Tuning of the click-to-navigate camera.
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavigationConfig {
    /// Position interpolation rate per second.
    pub moving_speed: f32,
    /// Orientation interpolation rate per second.
    pub rotation_speed: f32,
    /// Arrival distance, scaled by the frame time.
    pub arrival_distance_per_second: f32,
    pub arrival_angle_degrees: f32,
    pub click_button: MouseButton,
    pub reload_key: KeyCode,
}

impl Default for NavigationConfig {
    fn default() -> Self {
        let motion = MotionSettings::default();
        Self {
            moving_speed: motion.moving_speed,
            rotation_speed: motion.rotation_speed,
            arrival_distance_per_second: motion.arrival_distance_per_second,
            arrival_angle_degrees: motion.arrival_angle_degrees,
            click_button: MouseButton::Left,
            reload_key: KeyCode::KeyR,
        }
    }
}

impl NavigationConfig {
    pub fn motion(&self) -> MotionSettings {
        MotionSettings {
            moving_speed: self.moving_speed,
            rotation_speed: self.rotation_speed,
            arrival_distance_per_second: self.arrival_distance_per_second,
            arrival_angle_degrees: self.arrival_angle_degrees,
        }
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        load_ron(path)
    }

    /// Loads the config, falling back to defaults when the file is absent or invalid.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => {
                info!("Loaded navigation config from {}", path.display());
                config
            }
            Err(err) if err.is_not_found() => {
                info!(
                    "No navigation config at {}, using defaults",
                    path.display()
                );
                Self::default()
            }
            Err(err) => {
                warn!("Ignoring navigation config: {err}");
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_default_tuning() {
        let config = NavigationConfig::default();
        assert_eq!(config.moving_speed, 5.0);
        assert_eq!(config.rotation_speed, 3.0);
        assert_eq!(config.arrival_distance_per_second, 5.0);
        assert_eq!(config.arrival_angle_degrees, 1.0);
        assert_eq!(config.click_button, MouseButton::Left);
        assert_eq!(config.reload_key, KeyCode::KeyR);
    }

    #[test]
    fn test_partial_file_overrides_only_given_fields() {
        let file = write_config("(moving_speed: 8.0, reload_key: KeyQ)");
        let config = NavigationConfig::load(file.path()).unwrap();

        assert_eq!(config.moving_speed, 8.0);
        assert_eq!(config.reload_key, KeyCode::KeyQ);
        assert_eq!(config.rotation_speed, 3.0);
        assert_eq!(config.click_button, MouseButton::Left);
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.ron");

        let err = NavigationConfig::load(&path).unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(
            NavigationConfig::load_or_default(&path),
            NavigationConfig::default()
        );
    }

    #[test]
    fn test_invalid_file_is_parse_error() {
        let file = write_config("(moving_speed: \"fast\")");

        let err = NavigationConfig::load(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(!err.is_not_found());
        assert_eq!(
            NavigationConfig::load_or_default(file.path()),
            NavigationConfig::default()
        );
    }

    #[test]
    fn test_shipped_config_parses() {
        let path = assets_dir().join("config").join(NAVIGATION_CONFIG_FILE);
        let config = NavigationConfig::load(&path).unwrap();
        assert_eq!(config.motion(), NavigationConfig::default().motion());
    }
}
