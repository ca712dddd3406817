//! Figure-relative positions for grid rectangles.
//!
//! A [`GridSpec`] lays rows and columns out inside the figure margins from
//! their ratios and the gaps between them. Gaps are given relative to the
//! mean ratio along the same axis, so `0.1` leaves a tenth of an average
//! column between two columns.

use serde::{Deserialize, Serialize};

use crate::config::GridspecDefaults;
use crate::error::{Error, Result};
use crate::extent::{Extent, GridRect};
use crate::geometry::Rect;
use crate::strip::OuterGrid;

/// Default gap between rows or columns, relative to the mean ratio.
pub const DEFAULT_SPACE: f32 = 0.1;

/// Gaps between adjacent rows or columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Spacing {
    /// Same gap everywhere.
    Uniform(f32),
    /// One gap per adjacent pair.
    Each(Vec<f32>),
}

impl Spacing {
    /// One gap per adjacent pair of `n` tracks.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidGeometry`] if a list has the wrong length or a
    /// gap is negative.
    pub fn gaps(&self, axis: &str, n: usize) -> Result<Vec<f32>> {
        let expected = n.saturating_sub(1);
        let gaps = match self {
            Spacing::Uniform(s) => vec![*s; expected],
            Spacing::Each(list) => {
                if list.len() != expected {
                    return Err(Error::InvalidGeometry(format!(
                        "{axis} needs {expected} values for {n} tracks, got {}",
                        list.len()
                    )));
                }
                list.clone()
            }
        };
        if let Some(bad) = gaps.iter().find(|g| !g.is_finite() || **g < 0.0) {
            return Err(Error::InvalidGeometry(format!("{axis} contains invalid gap {bad}")));
        }
        Ok(gaps)
    }
}

impl From<f32> for Spacing {
    fn from(s: f32) -> Self {
        Spacing::Uniform(s)
    }
}

impl From<Vec<f32>> for Spacing {
    fn from(list: Vec<f32>) -> Self {
        Spacing::Each(list)
    }
}

/// Ratio and spacing hints for the main grid.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpacingHints {
    /// Relative column widths.
    pub width_ratios: Option<Vec<f32>>,
    /// Relative row heights.
    pub height_ratios: Option<Vec<f32>>,
    /// Gaps between columns.
    pub wspace: Option<Spacing>,
    /// Gaps between rows.
    pub hspace: Option<Spacing>,
}

/// Track boundaries along both axes of a grid.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GridSpec {
    cols: Vec<(f32, f32)>,
    rows: Vec<(f32, f32)>,
}

impl GridSpec {
    /// Lay out tracks from ratios and spacings relative to the mean ratio.
    /// Missing spacings fall back to [`DEFAULT_SPACE`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidGeometry`] for empty or non-positive ratios,
    /// spacing lists of the wrong length, or margins that leave no room.
    pub fn new(
        width_ratios: &[f32],
        height_ratios: &[f32],
        wspace: Option<&Spacing>,
        hspace: Option<&Spacing>,
        margin: f32,
    ) -> Result<Self> {
        let wgaps = relative_gaps("wspace", wspace, width_ratios)?;
        let hgaps = relative_gaps("hspace", hspace, height_ratios)?;
        Self::from_parts(width_ratios, height_ratios, &wgaps, &hgaps, margin)
    }

    /// Lay out tracks from ratios and gaps in ratio units.
    ///
    /// # Errors
    ///
    /// See [`GridSpec::new`].
    pub fn from_parts(
        width_ratios: &[f32],
        height_ratios: &[f32],
        wgaps: &[f32],
        hgaps: &[f32],
        margin: f32,
    ) -> Result<Self> {
        if !(0.0..0.5).contains(&margin) {
            return Err(Error::InvalidGeometry(format!("margin {margin} leaves no room")));
        }
        Ok(Self {
            cols: tracks("width_ratios", width_ratios, wgaps, margin)?,
            rows: tracks("height_ratios", height_ratios, hgaps, margin)?,
        })
    }

    /// Grid spec for an outer grid: main tracks from `hints`, strip tracks
    /// from `defaults`.
    ///
    /// `default_wspace` and `default_hspace` apply to main-grid gaps the
    /// hints leave unset.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidGeometry`] if ratio or spacing lists do not
    /// match the main grid.
    pub fn outer(
        outer: &OuterGrid,
        hints: &SpacingHints,
        default_wspace: f32,
        default_hspace: f32,
        defaults: &GridspecDefaults,
    ) -> Result<Self> {
        let (widths, wgaps) = outer_axis(
            "width_ratios",
            "wspace",
            hints.width_ratios.as_deref(),
            hints.wspace.as_ref(),
            default_wspace,
            outer.main_cols,
            (outer.offsets.cols > 0, outer.right),
            defaults,
        )?;
        let (heights, hgaps) = outer_axis(
            "height_ratios",
            "hspace",
            hints.height_ratios.as_deref(),
            hints.hspace.as_ref(),
            default_hspace,
            outer.main_rows,
            (outer.offsets.rows > 0, outer.bottom),
            defaults,
        )?;
        Self::from_parts(&widths, &heights, &wgaps, &hgaps, defaults.margin)
    }

    /// Number of columns.
    #[must_use]
    pub fn ncols(&self) -> usize {
        self.cols.len()
    }

    /// Number of rows.
    #[must_use]
    pub fn nrows(&self) -> usize {
        self.rows.len()
    }

    /// Figure-relative rectangle covering a grid rectangle, gaps included.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidGeometry`] if the rectangle is empty or falls
    /// outside the grid.
    pub fn position(&self, rect: GridRect) -> Result<Rect> {
        let (left, right) = span("column", &self.cols, rect.cols)?;
        let (top, bottom) = span("row", &self.rows, rect.rows)?;
        Ok(Rect::from_edges(left, top, right, bottom))
    }
}

fn mean(ratios: &[f32]) -> f32 {
    if ratios.is_empty() {
        return 1.0;
    }
    ratios.iter().sum::<f32>() / ratios.len() as f32
}

fn relative_gaps(axis: &str, spacing: Option<&Spacing>, ratios: &[f32]) -> Result<Vec<f32>> {
    let spacing = spacing.cloned().unwrap_or(Spacing::Uniform(DEFAULT_SPACE));
    let scale = mean(ratios);
    Ok(spacing.gaps(axis, ratios.len())?.into_iter().map(|g| g * scale).collect())
}

#[allow(clippy::too_many_arguments)]
fn outer_axis(
    ratio_name: &str,
    space_name: &str,
    ratios: Option<&[f32]>,
    spacing: Option<&Spacing>,
    default_space: f32,
    n: usize,
    (leading, trailing): (bool, bool),
    defaults: &GridspecDefaults,
) -> Result<(Vec<f32>, Vec<f32>)> {
    let main = match ratios {
        Some(r) if r.len() != n => {
            return Err(Error::InvalidGeometry(format!(
                "{ratio_name} needs {n} values, got {}",
                r.len()
            )))
        }
        Some(r) => r.to_vec(),
        None => vec![1.0; n],
    };
    let spacing = spacing.cloned().unwrap_or(Spacing::Uniform(default_space));
    let scale = mean(&main);
    let main_gaps: Vec<f32> =
        spacing.gaps(space_name, n)?.into_iter().map(|g| g * scale).collect();

    let strip = defaults.strip_ratio * scale;
    let strip_gap = defaults.strip_space * scale;

    let mut ratios = Vec::with_capacity(n + 2);
    let mut gaps = Vec::with_capacity(n + 1);
    if leading {
        ratios.push(strip);
        gaps.push(strip_gap);
    }
    ratios.extend(main);
    gaps.extend(main_gaps);
    if trailing {
        ratios.push(strip);
        gaps.push(strip_gap);
    }
    Ok((ratios, gaps))
}

fn tracks(name: &str, ratios: &[f32], gaps: &[f32], margin: f32) -> Result<Vec<(f32, f32)>> {
    if ratios.is_empty() {
        return Err(Error::InvalidGeometry(format!("{name} is empty")));
    }
    if let Some(bad) = ratios.iter().find(|r| !r.is_finite() || **r <= 0.0) {
        return Err(Error::InvalidGeometry(format!("{name} contains non-positive ratio {bad}")));
    }
    if gaps.len() + 1 != ratios.len() {
        return Err(Error::InvalidGeometry(format!(
            "{name}: {} tracks need {} gaps, got {}",
            ratios.len(),
            ratios.len() - 1,
            gaps.len()
        )));
    }

    let total: f32 = ratios.iter().sum::<f32>() + gaps.iter().sum::<f32>();
    let scale = (1.0 - 2.0 * margin) / total;

    let mut bounds = Vec::with_capacity(ratios.len());
    let mut at = margin;
    for (i, ratio) in ratios.iter().enumerate() {
        let end = at + ratio * scale;
        bounds.push((at, end));
        at = end + gaps.get(i).copied().unwrap_or(0.0) * scale;
    }
    Ok(bounds)
}

fn span(what: &str, tracks: &[(f32, f32)], extent: Extent) -> Result<(f32, f32)> {
    if extent.is_empty() || extent.end > tracks.len() {
        return Err(Error::InvalidGeometry(format!(
            "{what} range {extent} outside a grid of {}",
            tracks.len()
        )));
    }
    Ok((tracks[extent.start].0, tracks[extent.end - 1].1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strip::StripLayout;
    use approx::assert_relative_eq;

    #[test]
    fn test_uniform_grid_no_gaps() {
        let spec = GridSpec::new(
            &[1.0, 1.0],
            &[1.0],
            Some(&Spacing::Uniform(0.0)),
            None,
            0.0,
        )
        .unwrap();
        let right = spec.position(GridRect::new(Extent::single(0), Extent::single(1))).unwrap();
        assert_relative_eq!(right.x, 0.5);
        assert_relative_eq!(right.width, 0.5);
        assert_relative_eq!(right.height, 1.0);
    }

    #[test]
    fn test_ratios_and_default_space() {
        // Ratios 1:3, mean 2, default gap 0.2: total 4.2.
        let spec = GridSpec::new(&[1.0, 3.0], &[1.0], None, None, 0.0).unwrap();
        let left = spec.position(GridRect::new(Extent::single(0), Extent::single(0))).unwrap();
        let right = spec.position(GridRect::new(Extent::single(0), Extent::single(1))).unwrap();
        assert_relative_eq!(left.width, 1.0 / 4.2, epsilon = 1e-6);
        assert_relative_eq!(right.x, 1.2 / 4.2, epsilon = 1e-6);
        assert_relative_eq!(right.right(), 1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_spanning_rect_includes_gap() {
        let spec = GridSpec::new(&[1.0, 1.0], &[1.0, 1.0], None, None, 0.05).unwrap();
        let all = spec.position(GridRect::new(Extent::new(0, 2), Extent::new(0, 2))).unwrap();
        assert_relative_eq!(all.x, 0.05);
        assert_relative_eq!(all.right(), 0.95, epsilon = 1e-6);
        assert_relative_eq!(all.bottom(), 0.95, epsilon = 1e-6);
    }

    #[test]
    fn test_spacing_list_length_checked() {
        let err = GridSpec::new(&[1.0, 1.0, 1.0], &[1.0], Some(&vec![0.1].into()), None, 0.0)
            .unwrap_err();
        assert!(matches!(err, Error::InvalidGeometry(_)));
        assert!(err.to_string().contains("wspace"));
    }

    #[test]
    fn test_non_positive_ratio_rejected() {
        assert!(GridSpec::new(&[1.0, 0.0], &[1.0], None, None, 0.0).is_err());
        assert!(GridSpec::new(&[], &[1.0], None, None, 0.0).is_err());
        assert!(GridSpec::new(&[1.0], &[1.0], None, None, 0.5).is_err());
    }

    #[test]
    fn test_position_out_of_range() {
        let spec = GridSpec::new(&[1.0], &[1.0], None, None, 0.0).unwrap();
        assert!(spec.position(GridRect::new(Extent::single(0), Extent::new(0, 2))).is_err());
        assert!(spec.position(GridRect::new(Extent::new(0, 0), Extent::single(0))).is_err());
    }

    #[test]
    fn test_outer_grid_adds_strip_tracks() {
        let strips = StripLayout { left: vec![1], right: vec![1], ..StripLayout::new() };
        let outer = OuterGrid::new(1, 2, &strips);
        let defaults = GridspecDefaults::default();
        let spec =
            GridSpec::outer(&outer, &SpacingHints::default(), 0.1, 0.1, &defaults).unwrap();
        assert_eq!(spec.ncols(), 4);
        assert_eq!(spec.nrows(), 1);

        let strip = spec.position(GridRect::new(Extent::single(0), Extent::single(0))).unwrap();
        let panel = spec.position(GridRect::new(Extent::single(0), Extent::single(1))).unwrap();
        assert_relative_eq!(strip.width * 10.0, panel.width, epsilon = 1e-5);
        assert!(strip.right() < panel.x);
    }

    #[test]
    fn test_outer_ratio_length_checked() {
        let outer = OuterGrid::new(2, 2, &StripLayout::new());
        let hints = SpacingHints { height_ratios: Some(vec![1.0]), ..SpacingHints::default() };
        let err = GridSpec::outer(&outer, &hints, 0.1, 0.1, &GridspecDefaults::default())
            .unwrap_err();
        assert!(err.to_string().contains("height_ratios"));
    }
}
