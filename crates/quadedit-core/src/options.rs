//! Configuration options for quadedit.

use std::path::Path;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Editor-wide configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Options {
    /// Export settings used when the caller does not supply their own.
    pub export: ExportSettings,

    /// Whether a new session starts with the default cube.
    pub seed_default_scene: bool,

    /// Increment applied by one step of a numeric coordinate edit.
    pub numeric_step: f32,

    /// Largest press/release manhattan distance (pixels) still treated as a click.
    pub click_tolerance: f32,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            export: ExportSettings::default(),
            seed_default_scene: true,
            numeric_step: 0.1,
            click_tolerance: 5.0,
        }
    }
}

impl Options {
    /// Parses options from JSON. Missing fields take their default values.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads options from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let options = Self::from_json_str(&json)?;
        log::info!("loaded options from {}", path.display());
        Ok(options)
    }
}

/// Which faces an export covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ExportScope {
    /// Every face of the model, in model order.
    #[default]
    All,
    /// Only the selected face.
    Selection,
}

/// How exported coordinates are expressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CoordinateMode {
    /// World coordinates, unmodified.
    #[default]
    Absolute,
    /// Coordinates minus a reference point.
    Relative,
}

/// Parameters of one export.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportSettings {
    pub scope: ExportScope,
    pub coordinate_mode: CoordinateMode,
    /// Origin for relative coordinates. Ignored in absolute mode.
    pub reference_point: Option<Vec3>,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            scope: ExportScope::All,
            coordinate_mode: CoordinateMode::Absolute,
            reference_point: Some(Vec3::ZERO),
        }
    }
}

impl ExportSettings {
    /// Settings for a relative export around `reference_point`.
    #[must_use]
    pub fn relative_to(reference_point: Vec3) -> Self {
        Self {
            coordinate_mode: CoordinateMode::Relative,
            reference_point: Some(reference_point),
            ..Self::default()
        }
    }

    /// Sets the scope.
    #[must_use]
    pub fn with_scope(mut self, scope: ExportScope) -> Self {
        self.scope = scope;
        self
    }
}
