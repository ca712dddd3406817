//! Error types for trueno-subplots operations.

use std::io;
use thiserror::Error;

use crate::sharing::Axis;
use crate::strip::StripEdge;

/// Result type alias using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while planning or drawing a subplot layout.
///
/// `InconsistentSharingGroup` and `OrderingViolation` signal a defect in the
/// grouping or drawing logic rather than bad input.
#[derive(Error, Debug)]
pub enum Error {
    /// The panel arrangement is malformed (gaps in numbering, ragged rows, no panels).
    #[error("invalid panel arrangement: {reason}")]
    InvalidArrangement {
        /// What is wrong, including the offending values.
        reason: String,
    },

    /// A per-panel property mapping is malformed or does not cover every panel.
    #[error("invalid `{property}` mapping: {reason}")]
    InvalidPropertySpec {
        /// Name of the property being resolved.
        property: String,
        /// What is wrong, including the offending value.
        reason: String,
        /// 1-based panel ids that received no value.
        missing: Vec<usize>,
    },

    /// Unknown projection name.
    #[error("unsupported projection: {name:?}")]
    UnsupportedProjection {
        /// The rejected name.
        name: String,
    },

    /// A panel was assigned to more than one sharing group on the same axis.
    #[error("panel {panel} belongs to {groups} {axis}-sharing groups")]
    InconsistentSharingGroup {
        /// Axis of the offending groups.
        axis: Axis,
        /// 1-based panel id.
        panel: usize,
        /// Number of groups containing the panel.
        groups: usize,
    },

    /// A panel was wired to a base that had not been drawn yet.
    #[error("panel {panel} requested a shared {axis} axis from panel {base} before it was drawn")]
    OrderingViolation {
        /// Axis being shared.
        axis: Axis,
        /// 1-based id of the dependent panel.
        panel: usize,
        /// 1-based id of the base panel.
        base: usize,
    },

    /// A strip label array does not match the grid edge it runs along.
    #[error("{edge} labels: expected {expected} entries, got {found}")]
    InvalidStrip {
        /// Edge of the strip.
        edge: StripEdge,
        /// Number of main-grid rows or columns along that edge.
        expected: usize,
        /// Number of labels supplied.
        found: usize,
    },

    /// Ratio or spacing lists that do not fit the grid.
    #[error("invalid grid geometry: {0}")]
    InvalidGeometry(String),

    /// Configuration parsing error with line number.
    #[error("configuration error at line {line}: {message}")]
    ConfigParse {
        /// Line number where the error occurred (1-indexed).
        line: usize,
        /// Error message describing the issue.
        message: String,
    },

    /// Configuration file not found.
    #[error("configuration file not found: {0}")]
    ConfigNotFound(String),

    /// Failure reported by a drawing surface.
    #[error("drawing surface error: {0}")]
    Surface(String),

    /// I/O error (file operations, etc.).
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl Error {
    pub(crate) fn arrangement(reason: impl Into<String>) -> Self {
        Self::InvalidArrangement { reason: reason.into() }
    }

    pub(crate) fn property(property: &str, reason: impl Into<String>) -> Self {
        Self::InvalidPropertySpec {
            property: property.to_string(),
            reason: reason.into(),
            missing: Vec::new(),
        }
    }
}
