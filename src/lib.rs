//! # Trueno-Subplots
//!
//! Subplot grid layout with automatic axis sharing.
//!
//! Given a 2-D arrangement of panel ids (irregular spans and empty cells
//! included), trueno-subplots computes each panel's grid rectangle, groups
//! panels whose extents line up into shared-x and shared-y groups, picks one
//! base panel per group, and creates the panels on a [`DrawingSurface`] so
//! that every base exists before the panels that share it.
//!
//! ## Quick Start
//!
//! ```rust
//! use trueno_subplots::prelude::*;
//!
//! let figure = Subplots::new()
//!     .array(vec![vec![1, 1, 2], vec![3, 3, 2]])
//!     .bottom_strips(vec![1, 1, 1])
//!     .draw(RecordingSurface::new())?;
//!
//! assert_eq!(figure.panels().len(), 3);
//! assert_eq!(figure.strip(StripEdge::Bottom).map(PanelList::len), Some(1));
//! # Ok::<(), trueno_subplots::Error>(())
//! ```
//!
//! ## Sharing rules
//!
//! - Panels with identical column extents share the x axis; the bottom-most
//!   member is the base.
//! - Panels with identical row extents share the y axis; the left-most member
//!   is the base.
//! - Ties go to the lowest panel id.
//!
//! ## Feature Flags
//!
//! - `cli`: the `trueno-subplots` binary

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]
// Allow unwrap() in tests only - banned in production code
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Layout Inputs
// ============================================================================

/// Panel arrangements and their canonical grid.
pub mod grid;

/// Per-panel properties: scalars, id mappings and keyword options.
pub mod property;

/// Panel projections.
pub mod projection;

/// Inner panels and colorbars attached to single subplots.
pub mod inner;

/// Layout defaults loaded from YAML.
pub mod config;

// ============================================================================
// Layout Core
// ============================================================================

/// Panel extents on the outer grid.
pub mod extent;

/// Shared-axis groups and their bases.
pub mod sharing;

/// Base-before-dependent drawing.
pub mod draw;

/// Outer strips along the grid edges.
pub mod strip;

// ============================================================================
// Geometry
// ============================================================================

/// Figure-relative points and rectangles.
pub mod geometry;

/// Figure positions from ratios and spacings.
pub mod gridspec;

// ============================================================================
// Surfaces and Requests
// ============================================================================

/// Drawing surface interface and a recording implementation.
pub mod surface;

/// Ordered panel handle collections with broadcasting.
pub mod panels;

/// Layout request builder, plan and figure.
pub mod subplots;

/// Layout requests read from YAML files.
pub mod layout_file;

// ============================================================================
// Error Types
// ============================================================================

/// Error types for trueno-subplots operations.
pub mod error;

pub use error::{Error, Result};

// ============================================================================
// Prelude
// ============================================================================

/// Commonly used types and traits for convenient imports.
///
/// ```rust
/// use trueno_subplots::prelude::*;
/// ```
pub mod prelude {
    pub use crate::config::{layered, LayoutConfig};
    pub use crate::error::{Error, Result};
    pub use crate::extent::{Extent, GridRect};
    pub use crate::geometry::{Point, Rect};
    pub use crate::grid::{Arrangement, Order, PanelLayout};
    pub use crate::gridspec::{GridSpec, Spacing, SpacingHints};
    pub use crate::inner::{InnerPanels, Sides};
    pub use crate::layout_file::LayoutFile;
    pub use crate::panels::{Broadcast, PanelList};
    pub use crate::projection::Projection;
    pub use crate::property::{KeywordSpec, OptionValue, Options, PanelKey, PerPanel};
    pub use crate::sharing::{Axis, Sharing};
    pub use crate::strip::{StripEdge, StripLayout};
    pub use crate::subplots::{Figure, LayoutPlan, Subplots};
    pub use crate::surface::{DrawingSurface, RecordingSurface, RegionId, RegionRequest};
}
