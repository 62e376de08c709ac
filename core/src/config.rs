//! Overlay configuration (~/.config/nanovis/config.toml)
//!
//! Every section and field has a default, so a partial file (or none at all)
//! is always valid. Nothing is ever written back: the overlay keeps no
//! persistent state.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{OverlayError, Result};
use crate::input::PointerButton;

/// Overlay configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct OverlayConfig {
    /// Top-level surface settings
    #[serde(default)]
    pub window: WindowConfig,
    /// Panel grid settings
    #[serde(default)]
    pub layout: LayoutConfig,
    /// Camera controller settings
    #[serde(default)]
    pub camera: CameraConfig,
    /// Time-series graph settings
    #[serde(default)]
    pub graph: GraphConfig,
    /// Image view settings
    #[serde(default)]
    pub image: ImageConfig,
}

/// Top-level surface configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

/// Panel grid configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Widths of the label, spacer and content columns
    pub columns: [u32; 3],
    pub margin: u32,
    /// Height of the separator row inserted between widget rows
    pub separator_height: u32,
}

/// Camera controller configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Initial (roll, yaw, pitch) in degrees
    pub orientation: [f32; 3],
    pub position: [f32; 3],
    pub scale: f32,
    /// Degrees (rotation) or world units (translation) per pixel of drag
    pub drag_sensitivity: f32,
    /// Scale change per scroll unit
    pub scroll_sensitivity: f32,
    pub rotate_button: PointerButton,
    pub translate_button: PointerButton,
}

/// Time-series graph configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
    /// Samples kept by scalar graphs
    pub history_len: usize,
}

/// Image view configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageConfig {
    pub view_size: [u32; 2],
    /// Never release image textures, even on unbind or teardown
    pub retain_textures: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "nanovis".to_string(),
            width: 1280,
            height: 720,
        }
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            columns: [60, 3, 120],
            margin: 5,
            separator_height: 3,
        }
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            orientation: [0.0, -45.0, -42.0],
            position: [-8.0, -8.0, 8.0],
            scale: 1.0,
            drag_sensitivity: 0.1,
            scroll_sensitivity: 0.01,
            rotate_button: PointerButton::Primary,
            translate_button: PointerButton::Secondary,
        }
    }
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self { history_len: 60 }
    }
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            view_size: [240, 180],
            retain_textures: false,
        }
    }
}

/// Returns the platform-specific configuration directory.
///
/// Returns `None` if the home directory cannot be determined.
pub fn config_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from("io.nanovis", "", "nanovis")
        .map(|dirs| dirs.config_dir().to_path_buf())
}

/// Parse a configuration from TOML text.
pub fn from_toml_str(content: &str) -> Result<OverlayConfig> {
    Ok(toml::from_str(content)?)
}

/// Load a configuration file.
///
/// # Errors
///
/// Returns [`OverlayError::ConfigRead`] if the file cannot be read and
/// [`OverlayError::ConfigParse`] if it is not valid.
pub fn load_from(path: &Path) -> Result<OverlayConfig> {
    let content = std::fs::read_to_string(path).map_err(|source| OverlayError::ConfigRead {
        path: path.to_path_buf(),
        source,
    })?;
    from_toml_str(&content)
}

/// Loads `config.toml` from the platform's configuration directory.
///
/// Returns default values if the file doesn't exist or cannot be parsed.
pub fn load() -> OverlayConfig {
    let Some(path) = config_dir().map(|dir| dir.join("config.toml")) else {
        return OverlayConfig::default();
    };
    if !path.exists() {
        return OverlayConfig::default();
    }
    match load_from(&path) {
        Ok(config) => config,
        Err(e) => {
            log::warn!("{}; using defaults", e);
            OverlayConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_source_camera() {
        let config = OverlayConfig::default();
        assert_eq!(config.camera.orientation, [0.0, -45.0, -42.0]);
        assert_eq!(config.camera.position, [-8.0, -8.0, 8.0]);
        assert_eq!(config.camera.scale, 1.0);
        assert_eq!(config.graph.history_len, 60);
        assert_eq!(config.image.view_size, [240, 180]);
        assert!(!config.image.retain_textures);
    }

    #[test]
    fn test_empty_toml_is_default() {
        assert_eq!(from_toml_str("").unwrap(), OverlayConfig::default());
    }

    #[test]
    fn test_partial_section_keeps_other_defaults() {
        let config = from_toml_str(
            r#"
            [camera]
            drag_sensitivity = 0.5
            rotate_button = "secondary"
            translate_button = "primary"

            [image]
            retain_textures = true
            "#,
        )
        .unwrap();

        assert_eq!(config.camera.drag_sensitivity, 0.5);
        assert_eq!(config.camera.rotate_button, PointerButton::Secondary);
        assert_eq!(config.camera.translate_button, PointerButton::Primary);
        assert_eq!(config.camera.scroll_sensitivity, 0.01);
        assert!(config.image.retain_textures);
        assert_eq!(config.image.view_size, [240, 180]);
        assert_eq!(config.layout, LayoutConfig::default());
    }

    #[test]
    fn test_invalid_toml_is_parse_error() {
        assert!(matches!(
            from_toml_str("[window]\nwidth = \"wide\""),
            Err(OverlayError::ConfigParse(_))
        ));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[window]\ntitle = \"probe\"\nwidth = 640\n").unwrap();

        let config = load_from(&path).unwrap();
        assert_eq!(config.window.title, "probe");
        assert_eq!(config.window.width, 640);
        assert_eq!(config.window.height, 720);
    }

    #[test]
    fn test_load_from_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.toml");
        assert!(matches!(
            load_from(&path),
            Err(OverlayError::ConfigRead { .. })
        ));
    }

    #[test]
    fn test_roundtrip_through_toml() {
        let config = OverlayConfig::default();
        let text = toml::to_string_pretty(&config).unwrap();
        assert_eq!(from_toml_str(&text).unwrap(), config);
    }
}
