//! Base-before-dependent panel drawing.
//!
//! Panels are created in two passes. The first creates every sharing-group
//! base without any shared axes. The second walks all panels in id order:
//! panels not yet drawn are created with their bases as share sources, and
//! bases that still need the other axis from a different base adopt it after
//! the fact.

use serde::Serialize;
use tracing::debug;

use crate::error::{Error, Result};
use crate::extent::GridRect;
use crate::inner::InnerPanels;
use crate::panels::PanelList;
use crate::projection::Projection;
use crate::property::Options;
use crate::sharing::{Axis, Sharing};
use crate::surface::{DrawingSurface, RegionRequest};

/// Resolved properties of one panel, ready to draw.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PanelPlan {
    /// 1-based panel number.
    pub number: usize,
    /// Cells covered on the outer grid.
    pub rect: GridRect,
    /// Projection.
    #[serde(serialize_with = "display")]
    pub projection: Projection,
    /// Projection options.
    pub projection_args: Options,
    /// Inner panels, when any side is set.
    pub inner: Option<InnerPanels>,
    /// Drawing overrides.
    pub kwargs: Options,
}

fn display<S>(projection: &Projection, s: S) -> std::result::Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    s.collect_str(projection)
}

/// Label spanning toggles passed with every panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Spanning {
    /// Span x labels.
    pub x: bool,
    /// Span y labels.
    pub y: bool,
}

enum PanelState<H> {
    Unresolved,
    Drawn(H),
}

impl<H> PanelState<H> {
    fn handle(&self) -> Option<&H> {
        match self {
            PanelState::Drawn(h) => Some(h),
            PanelState::Unresolved => None,
        }
    }
}

/// Draw every panel so that each base exists before any panel sharing it.
///
/// Returns the handles in panel-id order.
///
/// # Errors
///
/// Propagates surface errors. Returns [`Error::OrderingViolation`] if a
/// panel would reference a base that has not been drawn, which indicates a
/// defect in the sharing groups.
pub fn draw_panels<S: DrawingSurface>(
    surface: &mut S,
    panels: &[PanelPlan],
    sharing: &Sharing,
    spanning: Spanning,
) -> Result<PanelList<S::Handle>> {
    let mut states: Vec<PanelState<S::Handle>> =
        panels.iter().map(|_| PanelState::Unresolved).collect();

    for base in sharing.base_order() {
        if states[base].handle().is_none() {
            debug!(panel = base + 1, "draw base");
            let handle = create(surface, &panels[base], spanning, None, None)?;
            states[base] = PanelState::Drawn(handle);
        }
    }

    let mut handles = Vec::with_capacity(panels.len());
    for (i, panel) in panels.iter().enumerate() {
        let x_base = sharing.x.base_of(i).filter(|&b| b != i);
        let y_base = sharing.y.base_of(i).filter(|&b| b != i);

        let handle = if let Some(handle) = states[i].handle() {
            for (axis, base) in [(Axis::X, x_base), (Axis::Y, y_base)] {
                let Some(base) = base else {
                    continue;
                };
                let base_handle = drawn(&states, axis, i, base)?;
                debug!(%axis, panel = i + 1, base = base + 1, "adopt shared axis");
                match axis {
                    Axis::X => surface.adopt_share_x(handle, base_handle)?,
                    Axis::Y => surface.adopt_share_y(handle, base_handle)?,
                }
            }
            handle.clone()
        } else {
            let share_x = x_base.map(|b| drawn(&states, Axis::X, i, b)).transpose()?;
            let share_y = y_base.map(|b| drawn(&states, Axis::Y, i, b)).transpose()?;
            let handle = create(surface, panel, spanning, share_x, share_y)?;
            states[i] = PanelState::Drawn(handle.clone());
            handle
        };
        handles.push(handle);
    }

    Ok(PanelList::new(handles))
}

fn drawn<H>(states: &[PanelState<H>], axis: Axis, panel: usize, base: usize) -> Result<&H> {
    states[base].handle().ok_or(Error::OrderingViolation {
        axis,
        panel: panel + 1,
        base: base + 1,
    })
}

fn create<S: DrawingSurface>(
    surface: &mut S,
    panel: &PanelPlan,
    spanning: Spanning,
    share_x: Option<&S::Handle>,
    share_y: Option<&S::Handle>,
) -> Result<S::Handle> {
    surface.create_region(RegionRequest {
        rect: panel.rect,
        panel: panel.number,
        projection: &panel.projection,
        projection_args: &panel.projection_args,
        inner: panel.inner.as_ref(),
        span_x: spanning.x,
        span_y: spanning.y,
        share_x,
        share_y,
        kwargs: &panel.kwargs,
    })
}
