//! Layout requests read from YAML.
//!
//! ```yaml
//! array:
//!   - [1, 1, 2]
//!   - [3, 3, 2]
//! share_y: true
//! projection:
//!   "1": polar
//!   "2,3": xy
//! strips:
//!   bottom: [1, 1, 2]
//! spacing:
//!   wspace: 0.2
//! ```
//!
//! Per-panel keys are strings naming one id (`"3"`), several (`"2,3"`) or a
//! range (`"1-3"`).

use std::path::Path;

use serde::Deserialize;

use crate::config::LayoutConfig;
use crate::error::{Error, Result};
use crate::grid::{Order, PanelLayout};
use crate::gridspec::SpacingHints;
use crate::inner::Sides;
use crate::property::{KeywordSpec, PerPanel};
use crate::strip::StripLayout;
use crate::subplots::Subplots;

/// A layout request as written in a file.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LayoutFile {
    /// Explicit arrangement, one list per row.
    pub array: Option<Vec<Vec<u32>>>,
    /// Flat arrangement.
    pub flat: Option<Vec<u32>>,
    /// Rows of a generated grid.
    pub nrows: Option<usize>,
    /// Columns of a generated grid.
    pub ncols: Option<usize>,
    /// Fill order.
    pub order: Order,
    /// 1-based rows to leave empty.
    pub empty_rows: Vec<usize>,
    /// 1-based columns to leave empty.
    pub empty_cols: Vec<usize>,
    /// X sharing toggle.
    pub share_x: Option<bool>,
    /// Y sharing toggle.
    pub share_y: Option<bool>,
    /// X label spanning toggle.
    pub span_x: Option<bool>,
    /// Y label spanning toggle.
    pub span_y: Option<bool>,
    /// Projection names.
    pub projection: Option<PerPanel<String>>,
    /// Map package toggle.
    pub basemap: Option<PerPanel<bool>>,
    /// Projection options.
    pub projection_kw: KeywordSpec,
    /// Drawing overrides.
    pub panel_kw: KeywordSpec,
    /// Inner panel sides.
    pub inner_panels: Option<PerPanel<Sides>>,
    /// Inner colorbar sides.
    pub inner_colorbars: Option<PerPanel<Sides>>,
    /// Inner panel options.
    pub inner_panels_kw: KeywordSpec,
    /// Outer strips.
    pub strips: StripLayout,
    /// Ratios and spacings.
    pub spacing: SpacingHints,
}

impl LayoutFile {
    /// Parses a layout request from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns an error with line number if parsing fails.
    pub fn parse(yaml: &str) -> Result<Self> {
        serde_yaml_ng::from_str(yaml).map_err(|e| {
            let line = e.location().map(|l| l.line()).unwrap_or(0);
            Error::ConfigParse { line, message: e.to_string() }
        })
    }

    /// Loads a layout request from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// The arrangement this request names.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArrangement`] if more than one of `array`,
    /// `flat` and `nrows`/`ncols` is given.
    pub fn panel_layout(&self) -> Result<PanelLayout> {
        let counts = self.nrows.is_some() || self.ncols.is_some();
        let given = [self.array.is_some(), self.flat.is_some(), counts];
        if given.iter().filter(|&&g| g).count() > 1 {
            return Err(Error::arrangement("give only one of array, flat, or nrows/ncols"));
        }
        Ok(match (&self.array, &self.flat) {
            (Some(rows), _) => PanelLayout::Array(rows.clone()),
            (_, Some(values)) => PanelLayout::Flat(values.clone()),
            _ => PanelLayout::Counts {
                nrows: self.nrows.unwrap_or(1),
                ncols: self.ncols.unwrap_or(1),
            },
        })
    }

    /// Builder for this request on top of `config`.
    ///
    /// # Errors
    ///
    /// See [`LayoutFile::panel_layout`].
    pub fn to_subplots(&self, config: LayoutConfig) -> Result<Subplots> {
        let mut subplots = Subplots::new()
            .config(config)
            .layout(self.panel_layout()?)
            .order(self.order)
            .empty_rows(self.empty_rows.clone())
            .empty_cols(self.empty_cols.clone())
            .projection_kw(self.projection_kw.clone())
            .panel_kw(self.panel_kw.clone())
            .inner_panels_kw(self.inner_panels_kw.clone())
            .strips(self.strips.clone())
            .spacing(self.spacing.clone());

        let toggles: [(Option<bool>, fn(Subplots, bool) -> Subplots); 4] = [
            (self.share_x, Subplots::share_x),
            (self.share_y, Subplots::share_y),
            (self.span_x, Subplots::span_x),
            (self.span_y, Subplots::span_y),
        ];
        for (value, set) in toggles {
            if let Some(value) = value {
                subplots = set(subplots, value);
            }
        }
        if let Some(projection) = &self.projection {
            subplots = subplots.projection(projection.clone());
        }
        if let Some(basemap) = &self.basemap {
            subplots = subplots.basemap(basemap.clone());
        }
        if let Some(sides) = &self.inner_panels {
            subplots = subplots.inner_panels(sides.clone());
        }
        if let Some(sides) = &self.inner_colorbars {
            subplots = subplots.inner_colorbars(sides.clone());
        }
        Ok(subplots)
    }
}
