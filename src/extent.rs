//! Panel extents on the outer grid.
//!
//! An extent is the half-open range of rows or columns a panel covers, after
//! shifting by the rows and columns reserved for leading strips.

use std::fmt;
use std::ops::Range;

use serde::Serialize;

use crate::grid::Arrangement;

/// Half-open index range `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Extent {
    /// First index covered.
    pub start: usize,
    /// One past the last index covered.
    pub end: usize,
}

impl Extent {
    /// Create an extent.
    #[must_use]
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Extent covering the single index `i`.
    #[must_use]
    pub const fn single(i: usize) -> Self {
        Self::new(i, i + 1)
    }

    /// Number of indices covered.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.end - self.start
    }

    /// Whether the extent covers nothing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    /// Whether `i` falls inside the extent.
    #[must_use]
    pub const fn contains(&self, i: usize) -> bool {
        self.start <= i && i < self.end
    }

    /// Extent moved by `offset`.
    #[must_use]
    pub const fn shifted(self, offset: usize) -> Self {
        Self::new(self.start + offset, self.end + offset)
    }

    /// As a standard range.
    #[must_use]
    pub const fn as_range(&self) -> Range<usize> {
        self.start..self.end
    }
}

impl fmt::Display for Extent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}

/// Rectangle of grid cells on the outer grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct GridRect {
    /// Rows covered.
    pub rows: Extent,
    /// Columns covered.
    pub cols: Extent,
}

impl GridRect {
    /// Create a grid rectangle.
    #[must_use]
    pub const fn new(rows: Extent, cols: Extent) -> Self {
        Self { rows, cols }
    }
}

impl fmt::Display for GridRect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rows {} cols {}", self.rows, self.cols)
    }
}

/// Leading rows and columns reserved ahead of the main grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Offsets {
    /// Rows reserved above the main grid.
    pub rows: usize,
    /// Columns reserved left of the main grid.
    pub cols: usize,
}

/// Row and column extents of every panel, indexed by 0-based panel position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelExtents {
    rows: Vec<Extent>,
    cols: Vec<Extent>,
}

impl PanelExtents {
    /// Bounding boxes of each panel's cells, shifted by `offsets`.
    #[must_use]
    pub fn compute(grid: &Arrangement, offsets: Offsets) -> Self {
        let n = grid.panel_count();
        let mut bounds: Vec<Option<(Extent, Extent)>> = vec![None; n];

        for (row, col, id) in grid.cells() {
            if id == 0 {
                continue;
            }
            let slot = &mut bounds[id as usize - 1];
            *slot = Some(match *slot {
                None => (Extent::single(row), Extent::single(col)),
                Some((r, c)) => (
                    Extent::new(r.start.min(row), r.end.max(row + 1)),
                    Extent::new(c.start.min(col), c.end.max(col + 1)),
                ),
            });
        }

        // A validated arrangement gives every id at least one cell.
        let (rows, cols) = bounds
            .into_iter()
            .flatten()
            .map(|(r, c)| (r.shifted(offsets.rows), c.shifted(offsets.cols)))
            .unzip();
        Self { rows, cols }
    }

    /// Number of panels.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether there are no panels.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Row extent of a panel.
    #[must_use]
    pub fn row(&self, index: usize) -> Extent {
        self.rows[index]
    }

    /// Column extent of a panel.
    #[must_use]
    pub fn col(&self, index: usize) -> Extent {
        self.cols[index]
    }

    /// All row extents.
    #[must_use]
    pub fn rows(&self) -> &[Extent] {
        &self.rows
    }

    /// All column extents.
    #[must_use]
    pub fn cols(&self) -> &[Extent] {
        &self.cols
    }

    /// Grid rectangle of a panel.
    #[must_use]
    pub fn rect(&self, index: usize) -> GridRect {
        GridRect::new(self.rows[index], self.cols[index])
    }
}
