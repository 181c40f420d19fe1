//! Export documents.
//!
//! An export is a settings block followed by one model container listing
//! every exported face and its four vertices. The document is a plain serde
//! structure; [`ExportDocument::write_json`] renders it as JSON.

use std::io::Write;

use serde::Serialize;

use quadedit_core::{
    CoordinateMode, ExportScope, ExportSettings, Face, QuadEditError, Result, Vec3,
};

/// Id of the single model container in every export.
pub const EXPORT_MODEL_ID: &str = "main_model";

/// A point written as named coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ExportPoint {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl From<Vec3> for ExportPoint {
    fn from(v: Vec3) -> Self {
        Self {
            x: v.x,
            y: v.y,
            z: v.z,
        }
    }
}

/// Record of the settings an export was made with.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportSettingsBlock {
    pub scope: ExportScope,
    pub coordinate_mode: CoordinateMode,
    /// Present only for relative exports.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference_point: Option<ExportPoint>,
}

/// One exported vertex with its position in the face.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportVertex {
    pub index: usize,
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

/// One exported face with its vertices in face order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportFace {
    pub id: String,
    pub vertices: Vec<ExportVertex>,
}

/// A model container in an export.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportModel {
    pub id: String,
    pub faces: Vec<ExportFace>,
}

/// A complete export.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportDocument {
    pub settings: ExportSettingsBlock,
    pub models: Vec<ExportModel>,
}

impl ExportDocument {
    /// Builds a document from the model's faces and the current selection.
    ///
    /// `faces` must be in model order. With [`ExportScope::Selection`] only
    /// `selected` is exported.
    ///
    /// # Errors
    ///
    /// - [`QuadEditError::NoSelection`] for a selection export with nothing selected.
    /// - [`QuadEditError::MissingReferencePoint`] for a relative export without a
    ///   reference point.
    pub fn build(faces: &[Face], selected: Option<&Face>, settings: &ExportSettings) -> Result<Self> {
        let targets: Vec<&Face> = match settings.scope {
            ExportScope::All => faces.iter().collect(),
            ExportScope::Selection => vec![selected.ok_or(QuadEditError::NoSelection)?],
        };

        let reference = match settings.coordinate_mode {
            CoordinateMode::Absolute => None,
            CoordinateMode::Relative => Some(
                settings
                    .reference_point
                    .ok_or(QuadEditError::MissingReferencePoint)?,
            ),
        };
        let offset = reference.unwrap_or(Vec3::ZERO);

        let faces = targets
            .into_iter()
            .map(|face| ExportFace {
                id: face.id().to_string(),
                vertices: face
                    .positions()
                    .into_iter()
                    .enumerate()
                    .map(|(index, position)| {
                        let p = position - offset;
                        ExportVertex {
                            index,
                            x: p.x,
                            y: p.y,
                            z: p.z,
                        }
                    })
                    .collect(),
            })
            .collect();

        Ok(Self {
            settings: ExportSettingsBlock {
                scope: settings.scope,
                coordinate_mode: settings.coordinate_mode,
                reference_point: reference.map(ExportPoint::from),
            },
            models: vec![ExportModel {
                id: EXPORT_MODEL_ID.to_string(),
                faces,
            }],
        })
    }

    /// Returns the number of exported faces.
    #[must_use]
    pub fn face_count(&self) -> usize {
        self.models.iter().map(|m| m.faces.len()).sum()
    }

    /// Renders the document as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Writes the document as pretty-printed JSON.
    pub fn write_json<W: Write>(&self, writer: W) -> Result<()> {
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }
}
