//! Panel arrangements.
//!
//! Turns a user-supplied layout (an explicit 2-D array, a flat list, or row and
//! column counts) into a canonical [`Arrangement`]: a dense grid where every
//! positive value is a panel id in `1..=N` and `0` marks an empty cell.
//!
//! Normalization is a pure pipeline: promote to 2-D, copy, zero the requested
//! rows and columns, validate. The caller's input is never aliased.
//!
//! A panel id may occupy a disconnected set of cells. That is accepted; the
//! panel simply covers the bounding box of all its cells.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Fill order for generated grids and for promoting flat layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Order {
    /// Ids increase along rows; a flat layout becomes a single row.
    #[default]
    RowMajor,
    /// Ids increase down columns; a flat layout becomes a single column.
    ColumnMajor,
}

/// A panel layout as supplied by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelLayout {
    /// Explicit 2-D array of panel ids, one inner vector per row.
    Array(Vec<Vec<u32>>),
    /// 1-D list of panel ids, promoted to a row or column by [`Order`].
    Flat(Vec<u32>),
    /// Sequentially numbered `nrows x ncols` grid.
    Counts {
        /// Number of rows.
        nrows: usize,
        /// Number of columns.
        ncols: usize,
    },
}

impl Default for PanelLayout {
    fn default() -> Self {
        PanelLayout::Counts { nrows: 1, ncols: 1 }
    }
}

/// Canonical panel grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Arrangement {
    nrows: usize,
    ncols: usize,
    /// Row-major cell values.
    cells: Vec<u32>,
    panel_count: usize,
}

impl Arrangement {
    /// Normalize a layout with no blanked rows or columns.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArrangement`] if the layout is empty, ragged, or
    /// its ids are not exactly `1..=N`.
    pub fn new(layout: &PanelLayout, order: Order) -> Result<Self> {
        Self::normalize(layout, order, &[], &[])
    }

    /// Normalize a layout, then blank the given 1-based rows and columns.
    ///
    /// Blanking happens after generation, so blanking an interior row of a
    /// sequential grid leaves a gap in the numbering and is rejected.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArrangement`] for empty or ragged layouts,
    /// out-of-range row/column indices, and ids that are not exactly `1..=N`.
    pub fn normalize(
        layout: &PanelLayout,
        order: Order,
        empty_rows: &[usize],
        empty_cols: &[usize],
    ) -> Result<Self> {
        let (nrows, ncols, mut cells) = promote(layout, order)?;

        for &row in empty_rows {
            if row == 0 || row > nrows {
                return Err(Error::arrangement(format!(
                    "empty row {row} is outside rows 1..={nrows}"
                )));
            }
            cells[(row - 1) * ncols..row * ncols].fill(0);
        }
        for &col in empty_cols {
            if col == 0 || col > ncols {
                return Err(Error::arrangement(format!(
                    "empty column {col} is outside columns 1..={ncols}"
                )));
            }
            for row in 0..nrows {
                cells[row * ncols + col - 1] = 0;
            }
        }

        let panel_count = validate_ids(&cells)?;
        Ok(Self { nrows, ncols, cells, panel_count })
    }

    /// Number of grid rows.
    #[must_use]
    pub fn nrows(&self) -> usize {
        self.nrows
    }

    /// Number of grid columns.
    #[must_use]
    pub fn ncols(&self) -> usize {
        self.ncols
    }

    /// Number of panels `N`.
    #[must_use]
    pub fn panel_count(&self) -> usize {
        self.panel_count
    }

    /// Panel id at a cell, `0` for empty cells.
    #[must_use]
    pub fn get(&self, row: usize, col: usize) -> Option<u32> {
        if row < self.nrows && col < self.ncols {
            Some(self.cells[row * self.ncols + col])
        } else {
            None
        }
    }

    /// Iterate over rows as slices.
    pub fn rows(&self) -> impl Iterator<Item = &[u32]> {
        self.cells.chunks(self.ncols)
    }

    /// Iterate over `(row, col, id)` for every cell, row-major.
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize, u32)> + '_ {
        let ncols = self.ncols;
        self.cells.iter().enumerate().map(move |(i, &id)| (i / ncols, i % ncols, id))
    }

    /// Cells occupied by a 1-based panel id.
    pub fn cells_of(&self, id: u32) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.cells().filter(move |&(_, _, v)| v == id).map(|(r, c, _)| (r, c))
    }
}

/// Promote any layout to `(nrows, ncols, row-major cells)`.
fn promote(layout: &PanelLayout, order: Order) -> Result<(usize, usize, Vec<u32>)> {
    match layout {
        PanelLayout::Counts { nrows, ncols } => {
            let (nrows, ncols) = (*nrows, *ncols);
            if nrows == 0 || ncols == 0 {
                return Err(Error::arrangement(format!("grid of {nrows}x{ncols} has no cells")));
            }
            let count = nrows
                .checked_mul(ncols)
                .filter(|&n| u32::try_from(n).is_ok())
                .ok_or_else(|| {
                    Error::arrangement(format!("grid of {nrows}x{ncols} has too many cells"))
                })?;
            let cells = (0..count)
                .map(|i| {
                    let (row, col) = (i / ncols, i % ncols);
                    let seq = match order {
                        Order::RowMajor => row * ncols + col,
                        Order::ColumnMajor => col * nrows + row,
                    };
                    u32::try_from(seq + 1).map_err(|_| {
                        Error::arrangement(format!("panel {} exceeds the id range", seq + 1))
                    })
                })
                .collect::<Result<Vec<u32>>>()?;
            Ok((nrows, ncols, cells))
        }
        PanelLayout::Flat(values) => {
            if values.is_empty() {
                return Err(Error::arrangement("layout has no cells"));
            }
            match order {
                Order::RowMajor => Ok((1, values.len(), values.clone())),
                Order::ColumnMajor => Ok((values.len(), 1, values.clone())),
            }
        }
        PanelLayout::Array(rows) => {
            let ncols = rows.first().map_or(0, Vec::len);
            if ncols == 0 {
                return Err(Error::arrangement("layout has no cells"));
            }
            if let Some((i, row)) = rows.iter().enumerate().find(|(_, r)| r.len() != ncols) {
                return Err(Error::arrangement(format!(
                    "row {} has {} cells, expected {ncols}",
                    i + 1,
                    row.len()
                )));
            }
            Ok((rows.len(), ncols, rows.concat()))
        }
    }
}

/// Check that the positive values are exactly `1..=N` and return `N`.
fn validate_ids(cells: &[u32]) -> Result<usize> {
    let ids: BTreeSet<u32> = cells.iter().copied().filter(|&v| v > 0).collect();
    if ids.is_empty() {
        return Err(Error::arrangement("layout contains no panels"));
    }
    let count = ids.len();
    let contiguous = ids.iter().zip(1u32..).all(|(&id, expected)| id == expected);
    if !contiguous {
        let found: Vec<u32> = ids.into_iter().collect();
        return Err(Error::arrangement(format!(
            "panel ids must span 1..={count} without gaps, found {found:?}"
        )));
    }
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn array(rows: &[&[u32]]) -> PanelLayout {
        PanelLayout::Array(rows.iter().map(|r| r.to_vec()).collect())
    }

    #[test]
    fn test_counts_row_major() {
        let grid = Arrangement::new(&PanelLayout::Counts { nrows: 2, ncols: 3 }, Order::RowMajor)
            .unwrap();
        let rows: Vec<&[u32]> = grid.rows().collect();
        assert_eq!(rows, vec![&[1, 2, 3][..], &[4, 5, 6][..]]);
        assert_eq!(grid.panel_count(), 6);
    }

    #[test]
    fn test_counts_column_major() {
        let grid =
            Arrangement::new(&PanelLayout::Counts { nrows: 2, ncols: 3 }, Order::ColumnMajor)
                .unwrap();
        let rows: Vec<&[u32]> = grid.rows().collect();
        assert_eq!(rows, vec![&[1, 3, 5][..], &[2, 4, 6][..]]);
    }

    #[test]
    fn test_counts_overflow_rejected() {
        for (nrows, ncols) in [(usize::MAX, 2), (2, usize::MAX), (1 << 20, 1 << 20)] {
            let err = Arrangement::new(&PanelLayout::Counts { nrows, ncols }, Order::RowMajor)
                .unwrap_err();
            assert!(matches!(err, Error::InvalidArrangement { .. }));
            assert!(err.to_string().contains("too many cells"));
        }
    }

    #[test]
    fn test_flat_promotion() {
        let row = Arrangement::new(&PanelLayout::Flat(vec![1, 2, 3]), Order::RowMajor).unwrap();
        assert_eq!((row.nrows(), row.ncols()), (1, 3));

        let col = Arrangement::new(&PanelLayout::Flat(vec![1, 2, 3]), Order::ColumnMajor).unwrap();
        assert_eq!((col.nrows(), col.ncols()), (3, 1));
        assert_eq!(col.get(2, 0), Some(3));
    }

    #[test]
    fn test_array_with_spans_and_empty_cells() {
        let grid = Arrangement::new(&array(&[&[1, 1, 2, 2], &[0, 3, 3, 0]]), Order::RowMajor)
            .unwrap();
        assert_eq!(grid.panel_count(), 3);
        assert_eq!(grid.get(1, 0), Some(0));
        let cells: Vec<_> = grid.cells_of(3).collect();
        assert_eq!(cells, vec![(1, 1), (1, 2)]);
    }

    #[test]
    fn test_gap_in_ids_rejected() {
        let err = Arrangement::new(&array(&[&[1, 3]]), Order::RowMajor).unwrap_err();
        assert!(matches!(err, Error::InvalidArrangement { .. }));
        assert!(err.to_string().contains("[1, 3]"));
    }

    #[test]
    fn test_all_zero_rejected() {
        let err = Arrangement::new(&array(&[&[0, 0]]), Order::RowMajor).unwrap_err();
        assert!(err.to_string().contains("no panels"));
    }

    #[test]
    fn test_ragged_rows_rejected() {
        let err = Arrangement::new(&array(&[&[1, 2], &[3]]), Order::RowMajor).unwrap_err();
        assert!(err.to_string().contains("row 2"));
    }

    #[test]
    fn test_zero_sized_grid_rejected() {
        let layout = PanelLayout::Counts { nrows: 0, ncols: 3 };
        assert!(Arrangement::new(&layout, Order::RowMajor).is_err());
        assert!(Arrangement::new(&PanelLayout::Flat(vec![]), Order::RowMajor).is_err());
        assert!(Arrangement::new(&PanelLayout::Array(vec![]), Order::RowMajor).is_err());
    }

    #[test]
    fn test_empty_trailing_column() {
        let grid = Arrangement::normalize(
            &array(&[&[1, 2, 9], &[3, 4, 9]]),
            Order::RowMajor,
            &[],
            &[3],
        );
        // 9 is blanked, leaving 1..=4.
        let grid = grid.unwrap();
        assert_eq!(grid.panel_count(), 4);
        assert_eq!(grid.get(0, 2), Some(0));
    }

    #[test]
    fn test_empty_interior_row_leaves_gap() {
        let layout = PanelLayout::Counts { nrows: 3, ncols: 1 };
        let err = Arrangement::normalize(&layout, Order::RowMajor, &[2], &[]).unwrap_err();
        assert!(matches!(err, Error::InvalidArrangement { .. }));
    }

    #[test]
    fn test_empty_row_out_of_range() {
        let layout = PanelLayout::Counts { nrows: 2, ncols: 2 };
        let err = Arrangement::normalize(&layout, Order::RowMajor, &[0], &[]).unwrap_err();
        assert!(err.to_string().contains("empty row 0"));
        let err = Arrangement::normalize(&layout, Order::RowMajor, &[], &[3]).unwrap_err();
        assert!(err.to_string().contains("empty column 3"));
    }

    #[test]
    fn test_input_not_aliased() {
        let rows = vec![vec![1, 2], vec![3, 4]];
        let layout = PanelLayout::Array(rows.clone());
        let _ = Arrangement::normalize(&layout, Order::RowMajor, &[], &[2]);
        assert_eq!(layout, PanelLayout::Array(rows));
    }

    #[test]
    fn test_disconnected_panel_accepted() {
        let grid = Arrangement::new(&array(&[&[1, 2, 1]]), Order::RowMajor).unwrap();
        assert_eq!(grid.cells_of(1).count(), 2);
    }

    #[test]
    fn test_get_out_of_bounds() {
        let grid = Arrangement::new(&PanelLayout::default(), Order::RowMajor).unwrap();
        assert_eq!(grid.get(0, 0), Some(1));
        assert_eq!(grid.get(1, 0), None);
    }
}
