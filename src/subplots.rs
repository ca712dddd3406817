//! Subplot layout requests.
//!
//! [`Subplots`] collects an arrangement and per-panel properties, and
//! [`Subplots::plan`] resolves them into a [`LayoutPlan`]: panel extents,
//! sharing groups, resolved properties and figure positions. Drawing a plan
//! into a [`DrawingSurface`] yields a [`Figure`].

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::debug_span;

use crate::config::{layered, LayoutConfig};
use crate::draw::{draw_panels, PanelPlan, Spanning};
use crate::error::Result;
use crate::extent::PanelExtents;
use crate::grid::{Arrangement, Order, PanelLayout};
use crate::gridspec::{GridSpec, Spacing, SpacingHints};
use crate::inner::{InnerPanels, Sides};
use crate::panels::PanelList;
use crate::projection::Projection;
use crate::property::{KeywordSpec, PerPanel};
use crate::sharing::{AxisGroups, Sharing};
use crate::strip::{allocate_strips, OuterGrid, StripEdge, StripLayout};
use crate::surface::DrawingSurface;

/// Builder for a subplot layout.
#[derive(Debug, Clone)]
pub struct Subplots {
    layout: PanelLayout,
    order: Order,
    empty_rows: Vec<usize>,
    empty_cols: Vec<usize>,
    share_x: Option<bool>,
    share_y: Option<bool>,
    span_x: Option<bool>,
    span_y: Option<bool>,
    projection: PerPanel<String>,
    basemap: PerPanel<bool>,
    projection_kw: KeywordSpec,
    panel_kw: KeywordSpec,
    inner_panels: PerPanel<Sides>,
    inner_colorbars: PerPanel<Sides>,
    inner_panels_kw: KeywordSpec,
    strips: StripLayout,
    spacing: SpacingHints,
    config: LayoutConfig,
}

impl Default for Subplots {
    fn default() -> Self {
        Self::new()
    }
}

impl Subplots {
    /// A single Cartesian panel.
    #[must_use]
    pub fn new() -> Self {
        Self {
            layout: PanelLayout::default(),
            order: Order::RowMajor,
            empty_rows: Vec::new(),
            empty_cols: Vec::new(),
            share_x: None,
            share_y: None,
            span_x: None,
            span_y: None,
            projection: PerPanel::all("xy".to_string()),
            basemap: PerPanel::all(false),
            projection_kw: KeywordSpec::new(),
            panel_kw: KeywordSpec::new(),
            inner_panels: PerPanel::all(Sides::NONE),
            inner_colorbars: PerPanel::all(Sides::NONE),
            inner_panels_kw: KeywordSpec::new(),
            strips: StripLayout::new(),
            spacing: SpacingHints::default(),
            config: LayoutConfig::default(),
        }
    }

    /// Sequentially numbered `nrows x ncols` grid.
    #[must_use]
    pub fn grid(mut self, nrows: usize, ncols: usize) -> Self {
        self.layout = PanelLayout::Counts { nrows, ncols };
        self
    }

    /// Explicit arrangement, one vector per row.
    #[must_use]
    pub fn array(mut self, rows: Vec<Vec<u32>>) -> Self {
        self.layout = PanelLayout::Array(rows);
        self
    }

    /// Flat arrangement, promoted to a row or column by the order.
    #[must_use]
    pub fn flat(mut self, values: Vec<u32>) -> Self {
        self.layout = PanelLayout::Flat(values);
        self
    }

    /// Any layout.
    #[must_use]
    pub fn layout(mut self, layout: PanelLayout) -> Self {
        self.layout = layout;
        self
    }

    /// Fill order for generated and flat layouts.
    #[must_use]
    pub fn order(mut self, order: Order) -> Self {
        self.order = order;
        self
    }

    /// 1-based rows to leave empty.
    #[must_use]
    pub fn empty_rows(mut self, rows: Vec<usize>) -> Self {
        self.empty_rows = rows;
        self
    }

    /// 1-based columns to leave empty.
    #[must_use]
    pub fn empty_cols(mut self, cols: Vec<usize>) -> Self {
        self.empty_cols = cols;
        self
    }

    /// Share x axes between panels with equal column extents.
    #[must_use]
    pub fn share_x(mut self, share: bool) -> Self {
        self.share_x = Some(share);
        self
    }

    /// Share y axes between panels with equal row extents.
    #[must_use]
    pub fn share_y(mut self, share: bool) -> Self {
        self.share_y = Some(share);
        self
    }

    /// Set both sharing toggles.
    #[must_use]
    pub fn share(self, share: bool) -> Self {
        self.share_x(share).share_y(share)
    }

    /// Let x labels span shared panels.
    #[must_use]
    pub fn span_x(mut self, span: bool) -> Self {
        self.span_x = Some(span);
        self
    }

    /// Let y labels span shared panels.
    #[must_use]
    pub fn span_y(mut self, span: bool) -> Self {
        self.span_y = Some(span);
        self
    }

    /// Projection names.
    #[must_use]
    pub fn projection(mut self, projection: PerPanel<String>) -> Self {
        self.projection = projection;
        self
    }

    /// Use basemap instead of cartopy for map projections.
    #[must_use]
    pub fn basemap(mut self, basemap: PerPanel<bool>) -> Self {
        self.basemap = basemap;
        self
    }

    /// Projection options.
    #[must_use]
    pub fn projection_kw(mut self, spec: KeywordSpec) -> Self {
        self.projection_kw = spec;
        self
    }

    /// Drawing overrides passed to every region.
    #[must_use]
    pub fn panel_kw(mut self, spec: KeywordSpec) -> Self {
        self.panel_kw = spec;
        self
    }

    /// Sides carrying inner panels.
    #[must_use]
    pub fn inner_panels(mut self, sides: PerPanel<Sides>) -> Self {
        self.inner_panels = sides;
        self
    }

    /// Sides carrying inner colorbars. Replaces the panel sides where set.
    #[must_use]
    pub fn inner_colorbars(mut self, sides: PerPanel<Sides>) -> Self {
        self.inner_colorbars = sides;
        self
    }

    /// Inner panel sizes and sharing.
    #[must_use]
    pub fn inner_panels_kw(mut self, spec: KeywordSpec) -> Self {
        self.inner_panels_kw = spec;
        self
    }

    /// Outer strips on every edge.
    #[must_use]
    pub fn strips(mut self, strips: StripLayout) -> Self {
        self.strips = strips;
        self
    }

    /// Strip labels along the bottom edge.
    #[must_use]
    pub fn bottom_strips(mut self, labels: Vec<u32>) -> Self {
        self.strips.bottom = labels;
        self
    }

    /// Strip labels along the left edge.
    #[must_use]
    pub fn left_strips(mut self, labels: Vec<u32>) -> Self {
        self.strips.left = labels;
        self
    }

    /// Strip labels along the right edge.
    #[must_use]
    pub fn right_strips(mut self, labels: Vec<u32>) -> Self {
        self.strips.right = labels;
        self
    }

    /// Ratio and spacing hints.
    #[must_use]
    pub fn spacing(mut self, spacing: SpacingHints) -> Self {
        self.spacing = spacing;
        self
    }

    /// Gaps between main-grid columns.
    #[must_use]
    pub fn wspace(mut self, wspace: impl Into<Spacing>) -> Self {
        self.spacing.wspace = Some(wspace.into());
        self
    }

    /// Gaps between main-grid rows.
    #[must_use]
    pub fn hspace(mut self, hspace: impl Into<Spacing>) -> Self {
        self.spacing.hspace = Some(hspace.into());
        self
    }

    /// Relative column widths.
    #[must_use]
    pub fn width_ratios(mut self, ratios: Vec<f32>) -> Self {
        self.spacing.width_ratios = Some(ratios);
        self
    }

    /// Relative row heights.
    #[must_use]
    pub fn height_ratios(mut self, ratios: Vec<f32>) -> Self {
        self.spacing.height_ratios = Some(ratios);
        self
    }

    /// Defaults for anything left unset.
    #[must_use]
    pub fn config(mut self, config: LayoutConfig) -> Self {
        self.config = config;
        self
    }

    /// Resolve the request into a layout plan.
    ///
    /// # Errors
    ///
    /// Returns the first arrangement, property, projection, strip or geometry
    /// error found.
    pub fn plan(&self) -> Result<LayoutPlan> {
        let arrangement =
            Arrangement::normalize(&self.layout, self.order, &self.empty_rows, &self.empty_cols)?;
        let n = arrangement.panel_count();

        self.strips.validate(arrangement.nrows(), arrangement.ncols())?;
        let outer = OuterGrid::new(arrangement.nrows(), arrangement.ncols(), &self.strips);
        let extents = PanelExtents::compute(&arrangement, outer.offsets);

        let share = &self.config.share;
        let share_x = layered([self.share_x, Some(share.x)]).unwrap_or_default();
        let share_y = layered([self.share_y, Some(share.y)]).unwrap_or_default();
        let spanning = Spanning {
            x: layered([self.span_x, Some(share.span_x)]).unwrap_or_default(),
            y: layered([self.span_y, Some(share.span_y)]).unwrap_or_default(),
        };
        let sharing = Sharing::detect(&extents, share_x, share_y)?;

        let names = self.projection.resolve("projection", n)?;
        let basemap = self.basemap.resolve("basemap", n)?;
        let projections = names
            .iter()
            .zip(&basemap)
            .map(|(name, &basemap)| Projection::parse(name, basemap))
            .collect::<Result<Vec<_>>>()?;
        let projection_args = self.projection_kw.resolve("projection_kw", n)?;
        let kwargs = self.panel_kw.resolve("panel_kw", n)?;

        let panel_sides = self.inner_panels.resolve("inner_panels", n)?;
        let colorbar_sides = self.inner_colorbars.resolve("inner_colorbars", n)?;
        let inner_options = self.inner_panels_kw.resolve("inner_panels_kw", n)?;
        let defaults = &self.config.gridspec;
        let mut inner = Vec::with_capacity(n);
        for i in 0..n {
            let resolved =
                InnerPanels::resolve(panel_sides[i], colorbar_sides[i], &inner_options[i], defaults)?;
            inner.push(resolved.is_active().then_some(resolved));
        }

        // Colorbars need room for tick labels between main-grid tracks.
        let vertical_cbar = colorbar_sides.iter().any(|s| s.vertical());
        let horizontal_cbar = colorbar_sides.iter().any(|s| s.horizontal());
        let default_wspace =
            layered([vertical_cbar.then_some(defaults.ylab), Some(defaults.wspace)])
                .unwrap_or_default();
        let default_hspace =
            layered([horizontal_cbar.then_some(defaults.xlab), Some(defaults.hspace)])
                .unwrap_or_default();
        let gridspec =
            GridSpec::outer(&outer, &self.spacing, default_wspace, default_hspace, defaults)?;

        let aspect = projections.first().and_then(Projection::aspect_hint);

        let panels = projections
            .into_iter()
            .zip(projection_args)
            .zip(kwargs)
            .zip(inner)
            .enumerate()
            .map(|(i, (((projection, projection_args), kwargs), inner))| PanelPlan {
                number: i + 1,
                rect: extents.rect(i),
                projection,
                projection_args,
                inner,
                kwargs,
            })
            .collect();

        Ok(LayoutPlan {
            arrangement,
            outer,
            extents,
            sharing,
            panels,
            strips: self.strips.clone(),
            spanning,
            gridspec,
            aspect,
        })
    }

    /// Plan and draw in one step.
    ///
    /// # Errors
    ///
    /// See [`Subplots::plan`] and [`LayoutPlan::draw`].
    pub fn draw<S: DrawingSurface>(&self, surface: S) -> Result<Figure<S>> {
        self.plan()?.draw(surface)
    }
}

/// A resolved layout, ready to draw.
#[derive(Debug, Clone)]
pub struct LayoutPlan {
    arrangement: Arrangement,
    outer: OuterGrid,
    extents: PanelExtents,
    sharing: Sharing,
    panels: Vec<PanelPlan>,
    strips: StripLayout,
    spanning: Spanning,
    gridspec: GridSpec,
    aspect: Option<f32>,
}

impl LayoutPlan {
    /// Canonical arrangement.
    #[must_use]
    pub fn arrangement(&self) -> &Arrangement {
        &self.arrangement
    }

    /// Outer grid, strips included.
    #[must_use]
    pub fn outer(&self) -> &OuterGrid {
        &self.outer
    }

    /// Panel extents on the outer grid.
    #[must_use]
    pub fn extents(&self) -> &PanelExtents {
        &self.extents
    }

    /// Sharing groups.
    #[must_use]
    pub fn sharing(&self) -> &Sharing {
        &self.sharing
    }

    /// Resolved panels in id order.
    #[must_use]
    pub fn panels(&self) -> &[PanelPlan] {
        &self.panels
    }

    /// Strip labels.
    #[must_use]
    pub fn strips(&self) -> &StripLayout {
        &self.strips
    }

    /// Label spanning toggles.
    #[must_use]
    pub fn spanning(&self) -> Spanning {
        self.spanning
    }

    /// Figure positions of the outer grid.
    #[must_use]
    pub fn gridspec(&self) -> &GridSpec {
        &self.gridspec
    }

    /// Aspect ratio forced by the first panel's projection, if any.
    #[must_use]
    pub fn aspect(&self) -> Option<f32> {
        self.aspect
    }

    /// Create every panel and strip on `surface`.
    ///
    /// # Errors
    ///
    /// Propagates surface errors and aborts on the first one; no partial
    /// figure is returned.
    pub fn draw<S: DrawingSurface>(&self, mut surface: S) -> Result<Figure<S>> {
        let _span = debug_span!("subplots.draw", panels = self.panels.len()).entered();

        surface.prepare(&self.outer, &self.gridspec)?;
        let panels = draw_panels(&mut surface, &self.panels, &self.sharing, self.spanning)?;
        let strips = allocate_strips(&mut surface, &self.strips, &self.outer)?;

        Ok(Figure { surface, panels, strips })
    }
}

/// A drawn layout: the surface with its panel and strip handles.
pub struct Figure<S: DrawingSurface> {
    surface: S,
    panels: PanelList<S::Handle>,
    strips: BTreeMap<StripEdge, PanelList<S::Handle>>,
}

impl<S: DrawingSurface> Figure<S> {
    /// The surface.
    #[must_use]
    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// The surface, mutably.
    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// Panel handles in id order.
    #[must_use]
    pub fn panels(&self) -> &PanelList<S::Handle> {
        &self.panels
    }

    /// Strip handles along an edge, ordered by label.
    #[must_use]
    pub fn strip(&self, edge: StripEdge) -> Option<&PanelList<S::Handle>> {
        self.strips.get(&edge)
    }

    /// Strip handles by attachment name (`"bottompanel"`, `"leftpanel"`,
    /// `"rightpanel"`).
    #[must_use]
    pub fn strip_by_name(&self, name: &str) -> Option<&PanelList<S::Handle>> {
        StripEdge::from_name(name).and_then(|edge| self.strip(edge))
    }

    /// Split into the surface, panels and strips.
    #[must_use]
    pub fn into_parts(self) -> (S, PanelList<S::Handle>, BTreeMap<StripEdge, PanelList<S::Handle>>) {
        (self.surface, self.panels, self.strips)
    }
}

/// Summary of a plan for reports.
#[derive(Debug, Clone, Serialize)]
pub struct PlanSummary<'a> {
    /// Outer grid.
    pub grid: &'a OuterGrid,
    /// Resolved panels.
    pub panels: &'a [PanelPlan],
    /// X sharing groups, 1-based.
    pub share_x: Vec<GroupSummary>,
    /// Y sharing groups, 1-based.
    pub share_y: Vec<GroupSummary>,
    /// Aspect hint.
    pub aspect: Option<f32>,
}

/// One sharing group with 1-based ids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupSummary {
    /// Member panel ids.
    pub members: Vec<usize>,
    /// Base panel id.
    pub base: usize,
}

impl LayoutPlan {
    /// Serializable summary with 1-based ids.
    #[must_use]
    pub fn summary(&self) -> PlanSummary<'_> {
        let groups = |axis: &AxisGroups| -> Vec<GroupSummary> {
            axis.groups()
                .iter()
                .map(|g| GroupSummary {
                    members: g.members.iter().map(|m| m + 1).collect(),
                    base: g.base + 1,
                })
                .collect()
        };
        PlanSummary {
            grid: &self.outer,
            panels: &self.panels,
            share_x: groups(&self.sharing.x),
            share_y: groups(&self.sharing.y),
            aspect: self.aspect,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::extent::Extent;
    use crate::surface::RecordingSurface;

    #[test]
    fn test_default_single_panel() {
        let plan = Subplots::new().plan().unwrap();
        assert_eq!(plan.panels().len(), 1);
        assert_eq!(plan.panels()[0].projection, Projection::Cartesian);
        assert!(plan.sharing().x.groups().is_empty());
        assert_eq!(plan.aspect(), None);
    }

    #[test]
    fn test_config_defaults_layered_under_call_site() {
        let mut config = LayoutConfig::default();
        config.share.x = false;
        let plan = Subplots::new().grid(2, 1).config(config.clone()).plan().unwrap();
        assert!(plan.sharing().x.groups().is_empty());

        let plan = Subplots::new().grid(2, 1).config(config).share_x(true).plan().unwrap();
        assert_eq!(plan.sharing().x.groups().len(), 1);
    }

    #[test]
    fn test_left_strip_offsets_panels() {
        let plan = Subplots::new().grid(2, 2).left_strips(vec![1, 1]).plan().unwrap();
        assert_eq!(plan.extents().col(0), Extent::new(1, 2));
        assert_eq!(plan.outer().ncols(), 3);
        assert_eq!(plan.gridspec().ncols(), 3);
    }

    #[test]
    fn test_polar_first_panel_sets_aspect() {
        let plan = Subplots::new()
            .grid(1, 2)
            .projection(PerPanel::mapped().with(1, "polar".to_string()).with(2, "xy".to_string()))
            .plan()
            .unwrap();
        assert_eq!(plan.aspect(), Some(1.0));
        assert_eq!(plan.panels()[0].projection, Projection::Polar);
    }

    #[test]
    fn test_unknown_projection() {
        let err = Subplots::new()
            .projection(PerPanel::all("spherical".to_string()))
            .plan()
            .unwrap_err();
        assert!(matches!(err, Error::UnsupportedProjection { .. }));
        assert!(err.to_string().contains("spherical"));
    }

    #[test]
    fn test_inner_colorbar_resolved() {
        let plan = Subplots::new()
            .grid(1, 2)
            .inner_colorbars(PerPanel::mapped().with(1, Sides::NONE).with(2, "r".parse().unwrap()))
            .plan()
            .unwrap();
        assert!(plan.panels()[0].inner.is_none());
        let inner = plan.panels()[1].inner.as_ref().unwrap();
        assert!(inner.sides.right);
        assert!(!inner.share_y_panels);
    }

    #[test]
    fn test_invalid_strip_length() {
        let err = Subplots::new().grid(2, 2).bottom_strips(vec![1]).plan().unwrap_err();
        assert!(matches!(err, Error::InvalidStrip { edge: StripEdge::Bottom, .. }));
    }

    #[test]
    fn test_draw_returns_figure() {
        let figure = Subplots::new()
            .grid(2, 2)
            .bottom_strips(vec![1, 1])
            .draw(RecordingSurface::new())
            .unwrap();
        assert_eq!(figure.panels().len(), 4);
        assert_eq!(figure.strip_by_name("bottompanel").map(PanelList::len), Some(1));
        assert!(figure.strip(StripEdge::Left).is_none());

        let (surface, panels, _) = figure.into_parts();
        let first = surface.region(panels[0]).unwrap();
        assert!(first.position.is_some());
    }

    #[test]
    fn test_summary_uses_panel_ids() {
        let plan = Subplots::new().grid(2, 2).plan().unwrap();
        let summary = plan.summary();
        assert_eq!(summary.share_x[0], GroupSummary { members: vec![1, 3], base: 3 });
        assert_eq!(summary.share_y[1], GroupSummary { members: vec![3, 4], base: 3 });
    }
}
