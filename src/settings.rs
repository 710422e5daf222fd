//! Sketch settings
//!
//! Persisted as JSON. Missing fields fall back to their defaults so older files
//! keep loading.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::{GeometryError, SettingsError};

/// Sketch configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SketchSettings {
    // === Canvas ===
    pub canvas_width: f64,
    pub canvas_height: f64,
    /// Seed for ball placement and logo scatter
    pub seed: u64,

    // === Balls ===
    pub ball_count: usize,
    pub ball_radius: f64,
    /// Speed range for spawned balls (pixels/frame)
    pub ball_min_speed: f64,
    pub ball_max_speed: f64,

    // === Collision ===
    /// Distance from an endpoint below which contacts reflect off the point
    pub endpoint_tolerance: f64,

    // === Logo/grid ===
    pub triangle_size: f64,

    // === Overlays ===
    pub show_normals: bool,
    pub show_angle_arcs: bool,
    pub show_predictions: bool,
    pub show_labels: bool,

    // === Serial ===
    pub serial_baud_rate: u32,
}

impl Default for SketchSettings {
    fn default() -> Self {
        Self {
            canvas_width: CANVAS_WIDTH,
            canvas_height: CANVAS_HEIGHT,
            seed: 42,

            ball_count: 1,
            ball_radius: BALL_RADIUS,
            ball_min_speed: BALL_MIN_SPEED,
            ball_max_speed: BALL_MAX_SPEED,

            endpoint_tolerance: ENDPOINT_TOLERANCE,

            triangle_size: TRIANGLE_SIZE,

            show_normals: true,
            show_angle_arcs: true,
            show_predictions: false,
            show_labels: true,

            serial_baud_rate: SERIAL_BAUD_RATE,
        }
    }
}

impl SketchSettings {
    /// Check every dimension is usable
    pub fn validate(&self) -> Result<(), GeometryError> {
        GeometryError::check_dimension("canvas_width", self.canvas_width)?;
        GeometryError::check_dimension("canvas_height", self.canvas_height)?;
        GeometryError::check_dimension("ball_radius", self.ball_radius)?;
        GeometryError::check_dimension("ball_min_speed", self.ball_min_speed)?;
        GeometryError::check_dimension("ball_max_speed", self.ball_max_speed)?;
        if self.ball_max_speed < self.ball_min_speed {
            return Err(GeometryError::InvalidDimension {
                name: "ball_max_speed",
                value: self.ball_max_speed,
            });
        }
        GeometryError::check_dimension("endpoint_tolerance", self.endpoint_tolerance)?;
        GeometryError::check_dimension("triangle_size", self.triangle_size)?;
        GeometryError::check_dimension("serial_baud_rate", f64::from(self.serial_baud_rate))?;
        Ok(())
    }

    /// Parse and validate settings from JSON
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: SketchSettings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Load settings, falling back to defaults if the file is missing or invalid
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        match Self::load(path) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("Using default settings: {}", e);
                Self::default()
            }
        }
    }

    /// Save settings to a JSON file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SettingsError> {
        let path = path.as_ref();
        fs::write(path, self.to_json()?).map_err(|source| SettingsError::Io {
            path: path.display().to_string(),
            source,
        })?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let settings = SketchSettings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.endpoint_tolerance, 1.0);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let settings = SketchSettings::from_json(r#"{ "ball_count": 5, "endpoint_tolerance": 2.5 }"#).unwrap();
        assert_eq!(settings.ball_count, 5);
        assert_eq!(settings.endpoint_tolerance, 2.5);
        assert_eq!(settings.canvas_width, CANVAS_WIDTH);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let err = SketchSettings::from_json(r#"{ "triangle_size": 0 }"#).unwrap_err();
        assert!(matches!(
            err,
            SettingsError::Invalid(GeometryError::InvalidDimension {
                name: "triangle_size",
                ..
            })
        ));

        let err = SketchSettings::from_json(r#"{ "ball_min_speed": 5, "ball_max_speed": 2 }"#).unwrap_err();
        assert!(matches!(err, SettingsError::Invalid(_)));

        assert!(matches!(
            SketchSettings::from_json("not json"),
            Err(SettingsError::Json(_))
        ));
    }

    #[test]
    fn test_json_roundtrip() {
        let settings = SketchSettings {
            seed: 7,
            show_predictions: true,
            ..Default::default()
        };
        let json = settings.to_json().unwrap();
        assert_eq!(SketchSettings::from_json(&json).unwrap(), settings);
    }

    #[test]
    fn test_file_roundtrip_and_missing_file() {
        let path = std::env::temp_dir().join(format!("sketchkit-settings-{}.json", std::process::id()));
        let settings = SketchSettings {
            ball_count: 3,
            ..Default::default()
        };
        settings.save(&path).unwrap();
        assert_eq!(SketchSettings::load(&path).unwrap(), settings);
        let _ = fs::remove_file(&path);

        assert!(matches!(SketchSettings::load(&path), Err(SettingsError::Io { .. })));
        assert_eq!(SketchSettings::load_or_default(&path), SketchSettings::default());
    }
}
