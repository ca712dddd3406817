//! Outer panel strips.
//!
//! Strips run along the bottom, left or right edge of the whole grid and hold
//! figure-wide colorbars or legends. Each edge is addressed by one integer
//! label per main-grid column (bottom) or row (left, right). Cells sharing a
//! nonzero label merge into one strip spanning from the first to the last
//! such cell; `0` leaves a cell without a strip.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::extent::{Extent, GridRect, Offsets};
use crate::panels::PanelList;
use crate::surface::DrawingSurface;

/// Edge of the grid carrying a strip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StripEdge {
    /// Below the main grid.
    Bottom,
    /// Left of the main grid.
    Left,
    /// Right of the main grid.
    Right,
}

impl StripEdge {
    /// Every edge, in allocation order.
    pub const ALL: [StripEdge; 3] = [StripEdge::Bottom, StripEdge::Right, StripEdge::Left];

    /// Name under which the strips are attached to the figure.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            StripEdge::Bottom => "bottompanel",
            StripEdge::Left => "leftpanel",
            StripEdge::Right => "rightpanel",
        }
    }

    /// Edge for an attachment name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|edge| edge.name() == name)
    }
}

impl fmt::Display for StripEdge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One merged strip along an edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StripRun {
    /// Label shared by the merged cells.
    pub label: u32,
    /// Covered rows (left, right) or columns (bottom) on the outer grid.
    pub span: Extent,
}

/// Merge equal nonzero labels into runs, ordered by label.
///
/// A run spans `[offset + first, offset + last + 1)` where `first` and `last`
/// are the lowest and highest positions bearing its label.
#[must_use]
pub fn strip_runs(labels: &[u32], offset: usize) -> Vec<StripRun> {
    let mut bounds: BTreeMap<u32, (usize, usize)> = BTreeMap::new();
    for (i, &label) in labels.iter().enumerate() {
        if label == 0 {
            continue;
        }
        bounds
            .entry(label)
            .and_modify(|(lo, hi)| {
                *lo = (*lo).min(i);
                *hi = (*hi).max(i);
            })
            .or_insert((i, i));
    }
    bounds
        .into_iter()
        .map(|(label, (lo, hi))| StripRun { label, span: Extent::new(offset + lo, offset + hi + 1) })
        .collect()
}

/// Strip labels for every edge. An empty label list means no strips.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StripLayout {
    /// One label per main-grid column.
    #[serde(default)]
    pub bottom: Vec<u32>,
    /// One label per main-grid row.
    #[serde(default)]
    pub left: Vec<u32>,
    /// One label per main-grid row.
    #[serde(default)]
    pub right: Vec<u32>,
}

impl StripLayout {
    /// No strips.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Labels giving every cell along an edge of `n` cells its own strip.
    #[must_use]
    pub fn each(n: usize) -> Vec<u32> {
        (1..=n as u32).collect()
    }

    /// Labels for one strip spanning an edge of `n` cells.
    #[must_use]
    pub fn spanning(n: usize) -> Vec<u32> {
        vec![1; n]
    }

    /// Labels for one edge.
    #[must_use]
    pub fn labels(&self, edge: StripEdge) -> &[u32] {
        match edge {
            StripEdge::Bottom => &self.bottom,
            StripEdge::Left => &self.left,
            StripEdge::Right => &self.right,
        }
    }

    /// Whether an edge has at least one strip.
    #[must_use]
    pub fn has(&self, edge: StripEdge) -> bool {
        self.labels(edge).iter().any(|&l| l != 0)
    }

    /// Check that each non-empty label list matches its grid edge.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidStrip`] on a length mismatch.
    pub fn validate(&self, main_rows: usize, main_cols: usize) -> Result<()> {
        for edge in StripEdge::ALL {
            let labels = self.labels(edge);
            let expected = match edge {
                StripEdge::Bottom => main_cols,
                StripEdge::Left | StripEdge::Right => main_rows,
            };
            if !labels.is_empty() && labels.len() != expected {
                return Err(Error::InvalidStrip { edge, expected, found: labels.len() });
            }
        }
        Ok(())
    }
}

/// The outer grid: the main panel grid plus rows and columns reserved for
/// strips.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OuterGrid {
    /// Main-grid rows.
    pub main_rows: usize,
    /// Main-grid columns.
    pub main_cols: usize,
    /// Leading rows and columns ahead of the main grid.
    pub offsets: Offsets,
    /// Whether a trailing row holds bottom strips.
    pub bottom: bool,
    /// Whether a trailing column holds right strips.
    pub right: bool,
}

impl OuterGrid {
    /// Outer grid for a main grid and its strips. Left strips reserve a
    /// leading column; bottom and right strips a trailing row and column.
    #[must_use]
    pub fn new(main_rows: usize, main_cols: usize, strips: &StripLayout) -> Self {
        Self {
            main_rows,
            main_cols,
            offsets: Offsets { rows: 0, cols: usize::from(strips.has(StripEdge::Left)) },
            bottom: strips.has(StripEdge::Bottom),
            right: strips.has(StripEdge::Right),
        }
    }

    /// Total rows.
    #[must_use]
    pub fn nrows(&self) -> usize {
        self.offsets.rows + self.main_rows + usize::from(self.bottom)
    }

    /// Total columns.
    #[must_use]
    pub fn ncols(&self) -> usize {
        self.offsets.cols + self.main_cols + usize::from(self.right)
    }

    /// Whether an outer row is a main-grid row.
    #[must_use]
    pub fn is_main_row(&self, row: usize) -> bool {
        Extent::new(self.offsets.rows, self.offsets.rows + self.main_rows).contains(row)
    }

    /// Whether an outer column is a main-grid column.
    #[must_use]
    pub fn is_main_col(&self, col: usize) -> bool {
        Extent::new(self.offsets.cols, self.offsets.cols + self.main_cols).contains(col)
    }

    /// Offset applied to strip label positions along an edge.
    #[must_use]
    pub fn strip_offset(&self, edge: StripEdge) -> usize {
        match edge {
            StripEdge::Bottom => self.offsets.cols,
            StripEdge::Left | StripEdge::Right => self.offsets.rows,
        }
    }

    /// Grid rectangle of a strip run.
    #[must_use]
    pub fn strip_rect(&self, edge: StripEdge, span: Extent) -> GridRect {
        match edge {
            StripEdge::Bottom => GridRect::new(Extent::single(self.nrows() - 1), span),
            StripEdge::Left => GridRect::new(span, Extent::single(0)),
            StripEdge::Right => GridRect::new(span, Extent::single(self.ncols() - 1)),
        }
    }
}

/// Create one invisible strip region per run on every edge that has strips.
///
/// # Errors
///
/// Propagates errors from the surface.
pub fn allocate_strips<S: DrawingSurface>(
    surface: &mut S,
    strips: &StripLayout,
    outer: &OuterGrid,
) -> Result<BTreeMap<StripEdge, PanelList<S::Handle>>> {
    let mut attached = BTreeMap::new();
    for edge in StripEdge::ALL {
        let runs = strip_runs(strips.labels(edge), outer.strip_offset(edge));
        if runs.is_empty() {
            continue;
        }
        let mut handles = Vec::with_capacity(runs.len());
        for run in runs {
            let rect = outer.strip_rect(edge, run.span);
            debug!(%edge, label = run.label, %rect, "strip");
            handles.push(surface.create_strip_region(rect, edge, false)?);
        }
        attached.insert(edge, PanelList::new(handles));
    }
    Ok(attached)
}
