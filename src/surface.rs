//! Drawing surfaces.
//!
//! The layout engine never draws anything itself. It asks a
//! [`DrawingSurface`] for regions at grid rectangles and wires shared axes
//! between the handles it gets back. [`RecordingSurface`] is an in-memory
//! implementation that records every request.

use serde::Serialize;
use tracing::trace;

use crate::error::{Error, Result};
use crate::extent::GridRect;
use crate::geometry::Rect;
use crate::gridspec::GridSpec;
use crate::inner::InnerPanels;
use crate::projection::Projection;
use crate::property::Options;
use crate::strip::{OuterGrid, StripEdge};

/// Everything a surface needs to create one panel region.
#[derive(Debug)]
pub struct RegionRequest<'a, H> {
    /// Cells covered on the outer grid.
    pub rect: GridRect,
    /// 1-based panel number.
    pub panel: usize,
    /// Projection of the panel.
    pub projection: &'a Projection,
    /// Options for instantiating the projection.
    pub projection_args: &'a Options,
    /// Inner panels to attach, if any.
    pub inner: Option<&'a InnerPanels>,
    /// Whether the x label may span shared panels.
    pub span_x: bool,
    /// Whether the y label may span shared panels.
    pub span_y: bool,
    /// Already-drawn base whose x axis this panel shares.
    pub share_x: Option<&'a H>,
    /// Already-drawn base whose y axis this panel shares.
    pub share_y: Option<&'a H>,
    /// Drawing overrides for the panel.
    pub kwargs: &'a Options,
}

/// Factory for drawable regions.
///
/// Calls arrive in dependency order: a handle passed as a share source has
/// always been returned by an earlier call on the same surface.
///
/// # Example
///
/// ```
/// use trueno_subplots::prelude::*;
///
/// struct Counter(usize);
///
/// impl DrawingSurface for Counter {
///     type Handle = usize;
///
///     fn create_region(&mut self, _request: RegionRequest<'_, usize>) -> Result<usize> {
///         self.0 += 1;
///         Ok(self.0)
///     }
///
///     fn adopt_share_x(&mut self, _handle: &usize, _base: &usize) -> Result<()> {
///         Ok(())
///     }
///
///     fn adopt_share_y(&mut self, _handle: &usize, _base: &usize) -> Result<()> {
///         Ok(())
///     }
///
///     fn create_strip_region(
///         &mut self,
///         _rect: GridRect,
///         _edge: StripEdge,
///         _visible: bool,
///     ) -> Result<usize> {
///         self.0 += 1;
///         Ok(self.0)
///     }
/// }
/// ```
pub trait DrawingSurface {
    /// Handle to a created region.
    type Handle: Clone;

    /// Receives the outer grid and its positions before any region is
    /// created.
    ///
    /// # Errors
    ///
    /// Returns an error if the surface cannot host the grid.
    fn prepare(&mut self, outer: &OuterGrid, gridspec: &GridSpec) -> Result<()> {
        let _ = (outer, gridspec);
        Ok(())
    }

    /// Creates a panel region, sharing axes with the given sources.
    ///
    /// # Errors
    ///
    /// Returns an error if the region cannot be created.
    fn create_region(&mut self, request: RegionRequest<'_, Self::Handle>) -> Result<Self::Handle>;

    /// Makes an existing region share its x axis with `base`.
    ///
    /// # Errors
    ///
    /// Returns an error if either handle is unknown to the surface.
    fn adopt_share_x(&mut self, handle: &Self::Handle, base: &Self::Handle) -> Result<()>;

    /// Makes an existing region share its y axis with `base`.
    ///
    /// # Errors
    ///
    /// Returns an error if either handle is unknown to the surface.
    fn adopt_share_y(&mut self, handle: &Self::Handle, base: &Self::Handle) -> Result<()>;

    /// Creates an auxiliary strip region along an edge of the grid.
    ///
    /// # Errors
    ///
    /// Returns an error if the region cannot be created.
    fn create_strip_region(
        &mut self,
        rect: GridRect,
        edge: StripEdge,
        visible: bool,
    ) -> Result<Self::Handle>;
}

// ============================================================================
// Recording surface
// ============================================================================

/// Handle into a [`RecordingSurface`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct RegionId(pub usize);

/// What a recorded region is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RegionKind {
    /// A subplot.
    Panel {
        /// 1-based panel number.
        number: usize,
    },
    /// An outer strip.
    Strip {
        /// Edge the strip runs along.
        edge: StripEdge,
    },
}

/// One recorded region.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Region {
    /// Handle of the region.
    pub id: RegionId,
    /// Panel or strip.
    pub kind: RegionKind,
    /// Cells covered on the outer grid.
    pub rect: GridRect,
    /// Figure-relative position, once the surface is prepared.
    pub position: Option<Rect>,
    /// Projection, as displayed.
    pub projection: Option<String>,
    /// Projection options.
    pub projection_args: Options,
    /// Attached inner panels.
    pub inner: Option<InnerPanels>,
    /// Label spanning along x.
    pub span_x: bool,
    /// Label spanning along y.
    pub span_y: bool,
    /// Source of the shared x axis.
    pub share_x: Option<RegionId>,
    /// Source of the shared y axis.
    pub share_y: Option<RegionId>,
    /// Drawing overrides.
    pub kwargs: Options,
    /// Whether the region is shown.
    pub visible: bool,
}

/// Ordered record of surface calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SurfaceEvent {
    /// The surface received its grid.
    Prepared {
        /// Outer rows.
        nrows: usize,
        /// Outer columns.
        ncols: usize,
    },
    /// A panel region was created.
    Created {
        /// New region.
        region: RegionId,
        /// 1-based panel number.
        panel: usize,
    },
    /// A strip region was created.
    CreatedStrip {
        /// New region.
        region: RegionId,
        /// Edge of the strip.
        edge: StripEdge,
    },
    /// An existing region adopted a shared x axis.
    AdoptedX {
        /// Adopting region.
        region: RegionId,
        /// Base region.
        base: RegionId,
    },
    /// An existing region adopted a shared y axis.
    AdoptedY {
        /// Adopting region.
        region: RegionId,
        /// Base region.
        base: RegionId,
    },
}

/// In-memory surface that records regions and calls.
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    regions: Vec<Region>,
    events: Vec<SurfaceEvent>,
    gridspec: Option<GridSpec>,
}

impl RecordingSurface {
    /// Creates an empty surface.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Region behind a handle.
    #[must_use]
    pub fn region(&self, id: RegionId) -> Option<&Region> {
        self.regions.get(id.0)
    }

    /// All regions in creation order.
    #[must_use]
    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    /// All calls in order.
    #[must_use]
    pub fn events(&self) -> &[SurfaceEvent] {
        &self.events
    }

    /// Region of a 1-based panel number.
    #[must_use]
    pub fn panel(&self, number: usize) -> Option<&Region> {
        self.regions.iter().find(|r| r.kind == RegionKind::Panel { number })
    }

    /// Panel numbers in creation order.
    #[must_use]
    pub fn creation_order(&self) -> Vec<usize> {
        self.events
            .iter()
            .filter_map(|e| match e {
                SurfaceEvent::Created { panel, .. } => Some(*panel),
                _ => None,
            })
            .collect()
    }

    fn known(&self, id: RegionId) -> Result<()> {
        if id.0 < self.regions.len() {
            Ok(())
        } else {
            Err(Error::Surface(format!("unknown region {}", id.0)))
        }
    }

    fn position(&self, rect: GridRect) -> Result<Option<Rect>> {
        self.gridspec.as_ref().map(|g| g.position(rect)).transpose()
    }

    fn adopt(&mut self, handle: RegionId, base: RegionId, x: bool) -> Result<()> {
        self.known(handle)?;
        self.known(base)?;
        if handle == base {
            return Err(Error::Surface(format!("region {} cannot share with itself", handle.0)));
        }
        let region = &mut self.regions[handle.0];
        if x {
            region.share_x = Some(base);
            self.events.push(SurfaceEvent::AdoptedX { region: handle, base });
        } else {
            region.share_y = Some(base);
            self.events.push(SurfaceEvent::AdoptedY { region: handle, base });
        }
        Ok(())
    }
}

impl DrawingSurface for RecordingSurface {
    type Handle = RegionId;

    fn prepare(&mut self, outer: &OuterGrid, gridspec: &GridSpec) -> Result<()> {
        if gridspec.nrows() != outer.nrows() || gridspec.ncols() != outer.ncols() {
            return Err(Error::Surface(format!(
                "grid spec is {}x{}, grid is {}x{}",
                gridspec.nrows(),
                gridspec.ncols(),
                outer.nrows(),
                outer.ncols()
            )));
        }
        self.gridspec = Some(gridspec.clone());
        self.events.push(SurfaceEvent::Prepared { nrows: outer.nrows(), ncols: outer.ncols() });
        Ok(())
    }

    fn create_region(&mut self, request: RegionRequest<'_, RegionId>) -> Result<RegionId> {
        for source in request.share_x.iter().chain(request.share_y.iter()) {
            self.known(**source)?;
        }
        let id = RegionId(self.regions.len());
        trace!(panel = request.panel, rect = %request.rect, region = id.0, "create region");
        self.regions.push(Region {
            id,
            kind: RegionKind::Panel { number: request.panel },
            rect: request.rect,
            position: self.position(request.rect)?,
            projection: Some(request.projection.to_string()),
            projection_args: request.projection_args.clone(),
            inner: request.inner.cloned(),
            span_x: request.span_x,
            span_y: request.span_y,
            share_x: request.share_x.copied(),
            share_y: request.share_y.copied(),
            kwargs: request.kwargs.clone(),
            visible: true,
        });
        self.events.push(SurfaceEvent::Created { region: id, panel: request.panel });
        Ok(id)
    }

    fn adopt_share_x(&mut self, handle: &RegionId, base: &RegionId) -> Result<()> {
        self.adopt(*handle, *base, true)
    }

    fn adopt_share_y(&mut self, handle: &RegionId, base: &RegionId) -> Result<()> {
        self.adopt(*handle, *base, false)
    }

    fn create_strip_region(
        &mut self,
        rect: GridRect,
        edge: StripEdge,
        visible: bool,
    ) -> Result<RegionId> {
        let id = RegionId(self.regions.len());
        trace!(%edge, %rect, region = id.0, "create strip region");
        self.regions.push(Region {
            id,
            kind: RegionKind::Strip { edge },
            rect,
            position: self.position(rect)?,
            projection: None,
            projection_args: Options::new(),
            inner: None,
            span_x: false,
            span_y: false,
            share_x: None,
            share_y: None,
            kwargs: Options::new(),
            visible,
        });
        self.events.push(SurfaceEvent::CreatedStrip { region: id, edge });
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extent::Extent;

    fn rect(row: usize, col: usize) -> GridRect {
        GridRect::new(Extent::single(row), Extent::single(col))
    }

    fn create(
        surface: &mut RecordingSurface,
        panel: usize,
        share_x: Option<&RegionId>,
    ) -> Result<RegionId> {
        let options = Options::new();
        surface.create_region(RegionRequest {
            rect: rect(0, panel - 1),
            panel,
            projection: &Projection::Cartesian,
            projection_args: &options,
            inner: None,
            span_x: true,
            span_y: true,
            share_x,
            share_y: None,
            kwargs: &options,
        })
    }

    #[test]
    fn test_records_regions_and_events() {
        let mut surface = RecordingSurface::new();
        let base = create(&mut surface, 1, None).unwrap();
        let other = create(&mut surface, 2, Some(&base)).unwrap();

        assert_eq!(surface.regions().len(), 2);
        assert_eq!(surface.region(other).unwrap().share_x, Some(base));
        assert_eq!(surface.panel(1).unwrap().id, base);
        assert_eq!(surface.creation_order(), vec![1, 2]);
        assert_eq!(surface.region(base).unwrap().projection.as_deref(), Some("xy"));
    }

    #[test]
    fn test_unknown_share_source_rejected() {
        let mut surface = RecordingSurface::new();
        let err = create(&mut surface, 1, Some(&RegionId(7))).unwrap_err();
        assert!(matches!(err, Error::Surface(_)));
        assert!(surface.regions().is_empty());
    }

    #[test]
    fn test_adopt_share() {
        let mut surface = RecordingSurface::new();
        let a = create(&mut surface, 1, None).unwrap();
        let b = create(&mut surface, 2, None).unwrap();

        surface.adopt_share_y(&b, &a).unwrap();
        assert_eq!(surface.region(b).unwrap().share_y, Some(a));
        assert_eq!(surface.events().last(), Some(&SurfaceEvent::AdoptedY { region: b, base: a }));

        assert!(surface.adopt_share_x(&a, &a).is_err());
        assert!(surface.adopt_share_x(&a, &RegionId(9)).is_err());
    }

    #[test]
    fn test_prepare_enables_positions() {
        use crate::strip::StripLayout;

        let outer = OuterGrid::new(1, 2, &StripLayout::new());
        let gridspec = GridSpec::new(&[1.0, 1.0], &[1.0], None, None, 0.0).unwrap();
        let mut surface = RecordingSurface::new();
        surface.prepare(&outer, &gridspec).unwrap();

        let id = create(&mut surface, 2, None).unwrap();
        let position = surface.region(id).unwrap().position.unwrap();
        assert!(position.x > 0.5);
        assert_eq!(surface.events()[0], SurfaceEvent::Prepared { nrows: 1, ncols: 2 });
    }

    #[test]
    fn test_prepare_rejects_mismatched_gridspec() {
        use crate::strip::StripLayout;

        let outer = OuterGrid::new(2, 2, &StripLayout::new());
        let gridspec = GridSpec::new(&[1.0], &[1.0], None, None, 0.0).unwrap();
        assert!(RecordingSurface::new().prepare(&outer, &gridspec).is_err());
    }

    #[test]
    fn test_strip_regions_hidden() {
        let mut surface = RecordingSurface::new();
        let id = surface.create_strip_region(rect(1, 0), StripEdge::Bottom, false).unwrap();
        let region = surface.region(id).unwrap();
        assert_eq!(region.kind, RegionKind::Strip { edge: StripEdge::Bottom });
        assert!(!region.visible);
        assert!(surface.creation_order().is_empty());
    }
}
