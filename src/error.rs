//! Error types shared by the model and the renderer.

use std::fmt;

use thiserror::Error;
use uuid::Uuid;

/// Errors raised at the mutation boundary.
///
/// These are recoverable: the GUI shows the message and the edit is rejected,
/// leaving the model as it was before the call.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ModelError {
    /// An accessor or commit was used for a shape kind that is not active.
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// A variant was selected that the zone cannot carry.
    #[error("Incompatible variant: {0}")]
    IncompatibleVariant(String),

    #[error("Invalid value for field `{field}`: {reason}")]
    InvalidField { field: String, reason: String },

    #[error("Missing required field `{0}`")]
    MissingField(String),

    #[error("Zone not found: {0}")]
    ZoneNotFound(Uuid),
}

impl ModelError {
    pub(crate) fn invalid_field(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidField {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// The variant axis of a zone that failed to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderAxis {
    Shape,
    Velocity,
    Density,
    Elevation,
}

impl fmt::Display for RenderAxis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Shape => "shape",
            Self::Velocity => "velocity",
            Self::Density => "density",
            Self::Elevation => "elevation",
        };
        f.write_str(name)
    }
}

/// Errors raised while rendering a configuration.
///
/// An `Inconsistent` error means the model reached the renderer in a state the
/// mutation API never produces. Export must be aborted.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("zone {zone_id}: inconsistent {axis} configuration: {detail}")]
    Inconsistent {
        zone_id: Uuid,
        axis: RenderAxis,
        detail: String,
    },

    #[error("XML write failed: {0}")]
    Xml(#[from] std::io::Error),
}
