//! End-to-end layout scenarios through the recording surface.

#![allow(clippy::unwrap_used)]

use trueno_subplots::extent::{Extent, Offsets, PanelExtents};
use trueno_subplots::prelude::*;
use trueno_subplots::strip::strip_runs;
use trueno_subplots::surface::SurfaceEvent;

fn sharing_of(rows: Vec<Vec<u32>>, share_x: bool, share_y: bool) -> Sharing {
    let plan = Subplots::new().array(rows).share_x(share_x).share_y(share_y).plan().unwrap();
    plan.sharing().clone()
}

fn members(groups: &trueno_subplots::sharing::AxisGroups) -> Vec<(Vec<usize>, usize)> {
    groups
        .groups()
        .iter()
        .map(|g| (g.members.iter().map(|m| m + 1).collect(), g.base + 1))
        .collect()
}

// ============================================================================
// Sharing scenarios
// ============================================================================

#[test]
fn test_wide_panels_over_tall_panel() {
    // 1 and 3 cover columns [0, 2); 2 covers column 2 in both rows.
    let rows = vec![vec![1, 1, 2], vec![3, 3, 2]];
    let plan = Subplots::new().array(rows.clone()).plan().unwrap();
    assert_eq!(plan.extents().col(0), Extent::new(0, 2));
    assert_eq!(plan.extents().col(2), Extent::new(0, 2));
    assert_eq!(plan.extents().row(1), Extent::new(0, 2));

    let sharing = sharing_of(rows.clone(), true, true);
    assert_eq!(members(&sharing.x), vec![(vec![1, 3], 3)]);
    // No two panels cover the same rows.
    assert!(sharing.y.groups().is_empty());

    let sharing = sharing_of(rows, false, true);
    assert!(sharing.x.groups().is_empty());
}

#[test]
fn test_tall_panel_beside_stacked_pair() {
    let rows = vec![vec![1, 2], vec![1, 3]];
    let plan = Subplots::new().array(rows.clone()).plan().unwrap();
    assert_eq!(plan.extents().row(0), Extent::new(0, 2));
    assert_eq!(plan.extents().row(1), Extent::new(0, 1));
    assert_eq!(plan.extents().row(2), Extent::new(1, 2));

    let sharing = sharing_of(rows, true, true);
    // 3 sits below 2, so it is the x base.
    assert_eq!(members(&sharing.x), vec![(vec![2, 3], 3)]);
    assert_eq!(sharing.x.groups()[0].order, vec![2, 1]);
    assert!(sharing.y.groups().is_empty());
}

#[test]
fn test_identical_extents_tie_goes_to_lowest_id() {
    let sharing = sharing_of(vec![vec![2, 1], vec![1, 2]], true, true);
    assert_eq!(members(&sharing.x), vec![(vec![1, 2], 1)]);
    assert_eq!(members(&sharing.y), vec![(vec![1, 2], 1)]);
}

#[test]
fn test_grid_groups_and_bases() {
    let sharing = sharing_of(vec![vec![1, 2, 3], vec![4, 5, 6]], true, true);
    assert_eq!(members(&sharing.x), vec![(vec![1, 4], 4), (vec![2, 5], 5), (vec![3, 6], 6)]);
    assert_eq!(members(&sharing.y), vec![(vec![1, 2, 3], 1), (vec![4, 5, 6], 4)]);
}

// ============================================================================
// Drawing
// ============================================================================

#[test]
fn test_bases_drawn_before_dependents() {
    let figure = Subplots::new().grid(2, 3).draw(RecordingSurface::new()).unwrap();
    let surface = figure.surface();

    // x bases 4, 5, 6, then y base 1, then the rest in id order.
    assert_eq!(surface.creation_order(), vec![4, 5, 6, 1, 2, 3]);

    let region = |n: usize| surface.panel(n).unwrap();
    assert_eq!(region(2).share_x, Some(region(5).id));
    assert_eq!(region(2).share_y, Some(region(1).id));
    assert_eq!(region(5).share_y, Some(region(4).id));
    assert_eq!(region(1).share_x, Some(region(4).id));

    let adopted: Vec<_> = surface
        .events()
        .iter()
        .filter(|e| matches!(e, SurfaceEvent::AdoptedX { .. } | SurfaceEvent::AdoptedY { .. }))
        .collect();
    // 1 adopts x from 4; 5 and 6 adopt y from 4.
    assert_eq!(adopted.len(), 3);
}

#[test]
fn test_panel_list_indexed_by_id() {
    let figure = Subplots::new().grid(2, 2).draw(RecordingSurface::new()).unwrap();
    let surface = figure.surface();
    let panels = figure.panels();

    for id in 1..=4 {
        let handle = *panels.get(id).unwrap();
        assert_eq!(surface.panel(id).unwrap().id, handle);
        assert_eq!(panels[id - 1], handle);
    }

    let numbers = panels.broadcast(|h| match surface.region(*h).unwrap().kind {
        trueno_subplots::surface::RegionKind::Panel { number } => Some(number),
        trueno_subplots::surface::RegionKind::Strip { .. } => None,
    });
    assert_eq!(numbers, Broadcast::Many(vec![1, 2, 3, 4]));

    let first = panels.slice(..1).unwrap();
    assert_eq!(first.fields(|h| surface.region(*h).unwrap().visible), Broadcast::One(true));
}

#[test]
fn test_failed_layout_creates_nothing() {
    let err = Subplots::new()
        .grid(2, 2)
        .projection(PerPanel::mapped().with(1..=3, "xy".to_string()))
        .draw(RecordingSurface::new());
    assert!(matches!(err, Err(Error::InvalidPropertySpec { .. })));
}

#[test]
fn test_projection_args_and_kwargs_reach_surface() {
    let mut lambert = Options::new();
    lambert.insert("lon_0".to_string(), OptionValue::Int(-90));
    let figure = Subplots::new()
        .grid(1, 2)
        .projection(
            PerPanel::mapped().with(1, "lcc".to_string()).with(2, "cartesian".to_string()),
        )
        .basemap(PerPanel::all(true))
        .projection_kw(KeywordSpec::new().panel(1, lambert).panel(2, Options::new()))
        .panel_kw(KeywordSpec::new().set("facecolor", "gray"))
        .draw(RecordingSurface::new())
        .unwrap();

    let surface = figure.surface();
    let map = surface.panel(1).unwrap();
    assert_eq!(map.projection.as_deref(), Some("basemap:lcc"));
    assert_eq!(map.projection_args.get("lon_0"), Some(&OptionValue::Int(-90)));
    assert_eq!(surface.panel(2).unwrap().projection.as_deref(), Some("xy"));
    assert!(surface.regions().iter().all(|r| r.kwargs.contains_key("facecolor")));
}

// ============================================================================
// Properties, strips and arrangements
// ============================================================================

#[test]
fn test_property_mapping_expands_groups() {
    let spec = PerPanel::mapped().with(1, "a").with([2, 3], "b");
    assert_eq!(spec.resolve("label", 3).unwrap(), vec!["a", "b", "b"]);

    let partial = PerPanel::mapped().with(1, "a").with(2, "b");
    let err = partial.resolve("label", 3).unwrap_err();
    match &err {
        Error::InvalidPropertySpec { missing, .. } => assert_eq!(missing, &vec![3]),
        other => panic!("unexpected error: {other}"),
    }
    assert!(err.to_string().contains('3'));
}

#[test]
fn test_bottom_strip_runs() {
    let runs = strip_runs(&[1, 1, 0, 2], 0);
    let spans: Vec<_> = runs.iter().map(|r| r.span).collect();
    assert_eq!(spans, vec![Extent::new(0, 2), Extent::new(3, 4)]);
}

#[test]
fn test_strips_attached_by_edge() {
    let figure = Subplots::new()
        .grid(2, 4)
        .bottom_strips(vec![1, 1, 0, 2])
        .left_strips(StripLayout::spanning(2))
        .right_strips(StripLayout::each(2))
        .draw(RecordingSurface::new())
        .unwrap();

    let surface = figure.surface();
    let bottom = figure.strip_by_name("bottompanel").unwrap();
    let spans: Vec<_> = bottom.iter().map(|h| surface.region(*h).unwrap().rect.cols).collect();
    // The left strip column shifts everything by one.
    assert_eq!(spans, vec![Extent::new(1, 3), Extent::new(4, 5)]);

    assert_eq!(figure.strip(StripEdge::Left).unwrap().len(), 1);
    assert_eq!(figure.strip(StripEdge::Right).unwrap().len(), 2);
    assert!(surface
        .regions()
        .iter()
        .filter(|r| matches!(r.kind, trueno_subplots::surface::RegionKind::Strip { .. }))
        .all(|r| !r.visible));

    // Panel 1 moved right by the left strip column.
    assert_eq!(surface.panel(1).unwrap().rect.cols, Extent::new(1, 2));
}

#[test]
fn test_gap_in_ids_rejected() {
    let err = Subplots::new().array(vec![vec![1, 3]]).plan().unwrap_err();
    assert!(matches!(err, Error::InvalidArrangement { .. }));
    assert!(err.to_string().contains('3'));
}

#[test]
fn test_column_major_and_empty_rows() {
    let plan = Subplots::new().grid(2, 3).order(Order::ColumnMajor).plan().unwrap();
    let rows: Vec<Vec<u32>> = plan.arrangement().rows().map(<[u32]>::to_vec).collect();
    assert_eq!(rows, vec![vec![1, 3, 5], vec![2, 4, 6]]);

    let plan = Subplots::new().grid(3, 1).empty_rows(vec![3]).plan().unwrap();
    assert_eq!(plan.panels().len(), 2);

    let err = Subplots::new().grid(3, 1).empty_rows(vec![2]).plan().unwrap_err();
    assert!(matches!(err, Error::InvalidArrangement { .. }));
}

#[test]
fn test_disconnected_panel_accepted() {
    let plan = Subplots::new().array(vec![vec![1, 2, 1]]).plan().unwrap();
    let extents = PanelExtents::compute(plan.arrangement(), Offsets::default());
    assert_eq!(extents.col(0), Extent::new(0, 3));
    assert_eq!(plan.panels().len(), 2);
}

#[test]
fn test_positions_follow_ratios() {
    let figure = Subplots::new()
        .grid(1, 2)
        .width_ratios(vec![1.0, 2.0])
        .wspace(0.0_f32)
        .draw(RecordingSurface::new())
        .unwrap();
    let surface = figure.surface();
    let left = surface.panel(1).unwrap().position.unwrap();
    let right = surface.panel(2).unwrap().position.unwrap();
    approx::assert_relative_eq!(right.width, 2.0 * left.width, epsilon = 1e-5);
    assert!(!left.overlaps(&right));
}
