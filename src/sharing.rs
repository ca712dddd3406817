//! Shared-axis detection.
//!
//! Panels whose column extents are identical share their x axis; panels whose
//! row extents are identical share their y axis. Each group of two or more
//! panels gets one base panel whose scale and ticks are authoritative:
//!
//! - x groups: the bottom-most member (largest row-extent end),
//! - y groups: the left-most member (smallest column-extent start).
//!
//! Ties go to the member with the lowest id. Groups also carry a traversal
//! order (bottom-to-top for x, left-to-right for y) whose first entry is
//! always the base.

use std::cmp::Reverse;
use std::fmt;

use serde::Serialize;
use tracing::debug;

use crate::error::{Error, Result};
use crate::extent::{Extent, PanelExtents};

/// Axis being shared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    /// Horizontal axis; grouped by column extent.
    X,
    /// Vertical axis; grouped by row extent.
    Y,
}

impl Axis {
    /// Extent that must match for two panels to share this axis.
    #[must_use]
    pub fn matching_extent(self, extents: &PanelExtents, index: usize) -> Extent {
        match self {
            Axis::X => extents.col(index),
            Axis::Y => extents.row(index),
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Axis::X => "x",
            Axis::Y => "y",
        })
    }
}

/// A set of panels sharing one axis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SharingGroup {
    /// Shared axis.
    pub axis: Axis,
    /// Members as 0-based panel positions, ascending.
    pub members: Vec<usize>,
    /// Base member.
    pub base: usize,
    /// Members bottom-to-top (x) or left-to-right (y).
    pub order: Vec<usize>,
}

impl SharingGroup {
    fn build(axis: Axis, members: Vec<usize>, extents: &PanelExtents) -> Self {
        let mut order = members.clone();
        // Stable sorts keep ascending id order among ties.
        match axis {
            Axis::X => order.sort_by_key(|&i| Reverse(extents.row(i).end)),
            Axis::Y => order.sort_by_key(|&i| extents.col(i).start),
        }

        let mut base = members[0];
        for &i in &members[1..] {
            let better = match axis {
                Axis::X => extents.row(i).end > extents.row(base).end,
                Axis::Y => extents.col(i).start < extents.col(base).start,
            };
            if better {
                base = i;
            }
        }

        Self { axis, members, base, order }
    }

    /// Whether `index` belongs to this group.
    #[must_use]
    pub fn contains(&self, index: usize) -> bool {
        self.members.binary_search(&index).is_ok()
    }
}

/// All sharing groups detected along one axis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AxisGroups {
    axis: Axis,
    groups: Vec<SharingGroup>,
    membership: Vec<Option<usize>>,
}

impl AxisGroups {
    /// No sharing along `axis`.
    #[must_use]
    pub fn disabled(axis: Axis, panel_count: usize) -> Self {
        Self { axis, groups: Vec::new(), membership: vec![None; panel_count] }
    }

    /// Partition panels by identical extent along `axis`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InconsistentSharingGroup`] if a panel ends up in more
    /// than one group. Extent equality is a partition, so this indicates a bug.
    pub fn detect(axis: Axis, extents: &PanelExtents) -> Result<Self> {
        let n = extents.len();
        let mut grouped = vec![false; n];
        let mut groups = Vec::new();

        for i in 0..n {
            if grouped[i] {
                continue;
            }
            let key = axis.matching_extent(extents, i);
            let members: Vec<usize> =
                (0..n).filter(|&j| axis.matching_extent(extents, j) == key).collect();
            for &j in &members {
                grouped[j] = true;
            }
            if members.len() > 1 {
                let group = SharingGroup::build(axis, members, extents);
                debug!(
                    %axis,
                    extent = %key,
                    members = ?ids(&group.members),
                    base = group.base + 1,
                    "sharing group"
                );
                groups.push(group);
            }
        }

        let mut counts = vec![0_usize; n];
        for group in &groups {
            for &m in &group.members {
                counts[m] += 1;
            }
        }
        if let Some((panel, &count)) = counts.iter().enumerate().find(|&(_, &c)| c > 1) {
            return Err(Error::InconsistentSharingGroup { axis, panel: panel + 1, groups: count });
        }

        let mut membership = vec![None; n];
        for (g, group) in groups.iter().enumerate() {
            for &m in &group.members {
                membership[m] = Some(g);
            }
        }
        Ok(Self { axis, groups, membership })
    }

    /// Axis of these groups.
    #[must_use]
    pub fn axis(&self) -> Axis {
        self.axis
    }

    /// Groups in discovery (lowest member id) order.
    #[must_use]
    pub fn groups(&self) -> &[SharingGroup] {
        &self.groups
    }

    /// Group containing a panel.
    #[must_use]
    pub fn group_of(&self, index: usize) -> Option<&SharingGroup> {
        self.membership.get(index).copied().flatten().map(|g| &self.groups[g])
    }

    /// Base of the group containing a panel. A base is its own base.
    #[must_use]
    pub fn base_of(&self, index: usize) -> Option<usize> {
        self.group_of(index).map(|g| g.base)
    }

    /// Bases of every group, in group order.
    pub fn bases(&self) -> impl Iterator<Item = usize> + '_ {
        self.groups.iter().map(|g| g.base)
    }

    /// Whether a panel is the base of its group.
    #[must_use]
    pub fn is_base(&self, index: usize) -> bool {
        self.base_of(index) == Some(index)
    }
}

/// Sharing groups for both axes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sharing {
    /// X-axis groups.
    pub x: AxisGroups,
    /// Y-axis groups.
    pub y: AxisGroups,
}

impl Sharing {
    /// Detect groups for each enabled axis.
    ///
    /// # Errors
    ///
    /// Propagates [`Error::InconsistentSharingGroup`] from [`AxisGroups::detect`].
    pub fn detect(extents: &PanelExtents, share_x: bool, share_y: bool) -> Result<Self> {
        let n = extents.len();
        let x = if share_x {
            AxisGroups::detect(Axis::X, extents)?
        } else {
            AxisGroups::disabled(Axis::X, n)
        };
        let y = if share_y {
            AxisGroups::detect(Axis::Y, extents)?
        } else {
            AxisGroups::disabled(Axis::Y, n)
        };
        Ok(Self { x, y })
    }

    /// Groups for one axis.
    #[must_use]
    pub fn axis(&self, axis: Axis) -> &AxisGroups {
        match axis {
            Axis::X => &self.x,
            Axis::Y => &self.y,
        }
    }

    /// Bases to draw before any dependent: x bases first, then y bases,
    /// without repeats.
    #[must_use]
    pub fn base_order(&self) -> Vec<usize> {
        let mut order: Vec<usize> = Vec::new();
        for base in self.x.bases().chain(self.y.bases()) {
            if !order.contains(&base) {
                order.push(base);
            }
        }
        order
    }
}

fn ids(members: &[usize]) -> Vec<usize> {
    members.iter().map(|m| m + 1).collect()
}
