//! Configuration system

pub use serde::{Deserialize, Serialize};

use crate::foundation::math::Vec3;
use crate::render::camera::RenderSettings;

/// Icon sizes offered by content tools
pub const STANDARD_ICON_SIZES: [u32; 4] = [128, 256, 512, 1024];

/// Configuration trait
pub trait Config: Serialize + for<'de> Deserialize<'de> + Default {
    /// Load configuration from file
    fn load_from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(ConfigError::Io)?;

        // Try different formats
        if path.ends_with(".toml") {
            toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
        } else if path.ends_with(".ron") {
            ron::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
        } else {
            Err(ConfigError::UnsupportedFormat(path.to_string()))
        }
    }

    /// Load configuration from file, or fall back to defaults if it does not exist
    fn load_or_default(path: &str) -> Result<Self, ConfigError> {
        if std::path::Path::new(path).exists() {
            Self::load_from_file(path)
        } else {
            log::info!("No configuration at {path}, using defaults");
            Ok(Self::default())
        }
    }

    /// Save configuration to file
    fn save_to_file(&self, path: &str) -> Result<(), ConfigError> {
        let contents = if path.ends_with(".toml") {
            toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?
        } else if path.ends_with(".ron") {
            ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
                .map_err(|e| ConfigError::Serialize(e.to_string()))?
        } else {
            return Err(ConfigError::UnsupportedFormat(path.to_string()));
        };

        std::fs::write(path, contents).map_err(ConfigError::Io)
    }
}

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// Unsupported format
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
}

/// Persistent settings of the icon generator
///
/// Missing fields fall back to their defaults when loading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IconGeneratorConfig {
    /// Output icon size in pixels
    pub image_size: u32,
    /// Camera Euler angles in degrees (pitch, yaw, roll)
    pub camera_rotation: [f32; 3],
    /// World-space camera offset
    pub camera_offset: [f32; 3],
    /// Fractional margin around each object
    pub padding: f32,
    /// Directory icons are written to
    pub save_path: String,
}

impl Default for IconGeneratorConfig {
    fn default() -> Self {
        Self {
            image_size: 512,
            camera_rotation: [30.0, -135.0, 0.0],
            camera_offset: [0.0, 0.0, 0.0],
            padding: 0.1,
            save_path: "GeneratedIcons".to_string(),
        }
    }
}

impl Config for IconGeneratorConfig {}

impl IconGeneratorConfig {
    /// Restore every setting to its default
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Whether `image_size` is one of [`STANDARD_ICON_SIZES`]
    pub fn is_standard_size(&self) -> bool {
        STANDARD_ICON_SIZES.contains(&self.image_size)
    }

    /// Render settings described by this configuration
    ///
    /// Non-standard sizes are accepted but logged.
    pub fn render_settings(&self) -> RenderSettings {
        if !self.is_standard_size() {
            log::warn!(
                "Icon size {} is not one of the standard sizes {:?}",
                self.image_size,
                STANDARD_ICON_SIZES
            );
        }
        RenderSettings {
            resolution: self.image_size,
            camera_rotation_degrees: Vec3::from(self.camera_rotation),
            camera_position_offset: Vec3::from(self.camera_offset),
            padding: self.padding,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path_in(dir: &tempfile::TempDir, name: &str) -> String {
        dir.path().join(name).to_string_lossy().into_owned()
    }

    #[test]
    fn test_defaults_match_render_settings() {
        let config = IconGeneratorConfig::default();
        assert!(config.is_standard_size());
        assert_eq!(config.render_settings(), RenderSettings::default());
    }

    #[test]
    fn test_reset_restores_defaults() {
        let mut config = IconGeneratorConfig {
            image_size: 100,
            padding: 0.4,
            save_path: "elsewhere".to_string(),
            ..IconGeneratorConfig::default()
        };
        assert!(!config.is_standard_size());
        config.reset();
        assert_eq!(config, IconGeneratorConfig::default());
    }

    #[test]
    fn test_toml_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = path_in(&dir, "icons.toml");
        let config = IconGeneratorConfig {
            image_size: 256,
            camera_rotation: [45.0, 90.0, 0.0],
            ..IconGeneratorConfig::default()
        };

        config.save_to_file(&path).unwrap();
        assert_eq!(IconGeneratorConfig::load_from_file(&path).unwrap(), config);
    }

    #[test]
    fn test_ron_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = path_in(&dir, "icons.ron");
        let config = IconGeneratorConfig {
            padding: 0.25,
            ..IconGeneratorConfig::default()
        };

        config.save_to_file(&path).unwrap();
        assert_eq!(IconGeneratorConfig::load_from_file(&path).unwrap(), config);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = path_in(&dir, "partial.toml");
        std::fs::write(&path, "image_size = 128\n").unwrap();

        let config = IconGeneratorConfig::load_from_file(&path).unwrap();
        assert_eq!(config.image_size, 128);
        assert_eq!(config.save_path, "GeneratedIcons");
    }

    #[test]
    fn test_missing_file_and_unknown_format() {
        let dir = tempfile::tempdir().unwrap();
        let missing = path_in(&dir, "missing.toml");
        assert_eq!(
            IconGeneratorConfig::load_or_default(&missing).unwrap(),
            IconGeneratorConfig::default()
        );

        let json = path_in(&dir, "icons.json");
        assert!(matches!(
            IconGeneratorConfig::default().save_to_file(&json),
            Err(ConfigError::UnsupportedFormat(_))
        ));
    }
}
