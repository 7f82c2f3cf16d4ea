use eframe::egui;
use ndarray::Array3;

use super::{
    Arrangement, CompareError, LayoutManager, Preview, PreviewRenderer, ResamplePolicy,
    SelectionController, SelectionState,
};
use crate::model::{
    ImageFormat, ImageMeta, ImageSlot, PixelImage, PixelPoint, PixelRect, SlotId, ZoomBounds,
};

fn gray_image(width: usize, height: usize) -> PixelImage {
    let data = Array3::from_shape_fn((height, width, 1), |(y, x, _)| (x + y) as u8);
    PixelImage::new(data, ImageMeta::new("test.png", ImageFormat::Png, 8)).expect("image")
}

fn slot(width: usize, height: usize) -> ImageSlot {
    ImageSlot::new(gray_image(width, height))
}

fn canvas(width: f32, height: f32) -> egui::Rect {
    egui::Rect::from_min_size(egui::Pos2::ZERO, egui::vec2(width, height))
}

#[test]
fn layout_tiling_is_idempotent() {
    let mut layout = LayoutManager::default();
    layout.set_layout(4, Arrangement::Grid).expect("layout");
    let first = layout.tile(canvas(800.0, 600.0));
    let second = layout.tile(canvas(800.0, 600.0));
    assert_eq!(first, second);
    assert_eq!(first.len(), 4);
}

#[test]
fn layout_viewports_do_not_overlap() {
    let mut layout = LayoutManager::default();
    layout.set_layout(4, Arrangement::Grid).expect("layout");
    let viewports = layout.tile(canvas(800.0, 600.0));
    for (i, a) in viewports.iter().enumerate() {
        for b in viewports.iter().skip(i + 1) {
            assert!(!a.intersects(*b), "{a:?} overlaps {b:?}");
        }
    }
}

#[test]
fn row_layout_splits_the_dominant_axis_evenly() {
    let mut layout = LayoutManager::default();
    layout.set_layout(3, Arrangement::SingleRow).expect("layout");
    let viewports = layout.tile(canvas(640.0, 480.0));
    assert_eq!(viewports.len(), 3);
    let width = viewports[0].width();
    assert!(viewports.iter().all(|v| (v.width() - width).abs() < 1e-3));
    assert!(viewports.iter().all(|v| (v.height() - viewports[0].height()).abs() < 1e-3));
    // 4 margins of 10px across 640px leaves 600px for three cells.
    assert!((width - 200.0).abs() < 1e-3);
}

#[test]
fn invalid_slot_counts_are_rejected_and_previous_layout_retained() {
    let mut layout = LayoutManager::default();
    layout.set_layout(3, Arrangement::SingleColumn).expect("layout");

    let err = layout.set_layout(5, Arrangement::SingleRow).expect_err("must fail");
    assert!(matches!(err, CompareError::InvalidSlotCount { count: 5 }));
    let err = layout.set_layout(1, Arrangement::SingleRow).expect_err("must fail");
    assert!(matches!(err, CompareError::InvalidSlotCount { count: 1 }));
    let err = layout.set_layout(3, Arrangement::Grid).expect_err("must fail");
    assert!(matches!(err, CompareError::UnsupportedArrangement { .. }));

    assert_eq!(layout.slot_count(), 3);
    assert_eq!(layout.arrangement(), Arrangement::SingleColumn);
}

#[test]
fn selection_walks_idle_dragging_finalized() {
    let mut selection = SelectionController::default();
    assert_eq!(selection.state(), SelectionState::Idle);
    assert_eq!(selection.canonical_rect(), None);

    selection.begin_drag(SlotId(0), (200, 200), PixelPoint::new(50.0, 50.0));
    assert_eq!(selection.state(), SelectionState::Dragging);
    assert_eq!(selection.canonical_rect(), Some(PixelRect::new(50, 50, 0, 0)));

    selection.drag_to(PixelPoint::new(100.0, 100.0));
    assert_eq!(selection.canonical_rect(), Some(PixelRect::new(50, 50, 50, 50)));

    selection.finish_drag();
    assert_eq!(selection.state(), SelectionState::Finalized);

    // A finalized rectangle ignores further motion until the next drag.
    selection.drag_to(PixelPoint::new(10.0, 10.0));
    assert_eq!(selection.canonical_rect(), Some(PixelRect::new(50, 50, 50, 50)));

    selection.begin_drag(SlotId(1), (400, 400), PixelPoint::new(0.0, 0.0));
    assert_eq!(selection.state(), SelectionState::Dragging);
    assert_eq!(selection.canonical_rect(), Some(PixelRect::new(0, 0, 0, 0)));
}

#[test]
fn regions_follow_the_documented_three_image_scenario() {
    let mut selection = SelectionController::default();
    selection.begin_drag(SlotId(0), (200, 200), PixelPoint::new(50.0, 50.0));
    selection.drag_to(PixelPoint::new(100.0, 100.0));
    selection.finish_drag();

    let regions = selection.current_regions([
        (SlotId(0), (200, 200)),
        (SlotId(1), (400, 400)),
        (SlotId(2), (100, 100)),
    ]);

    assert_eq!(regions[&SlotId(0)], Some(PixelRect::new(50, 50, 50, 50)));
    assert_eq!(regions[&SlotId(1)], Some(PixelRect::new(100, 100, 100, 100)));
    assert_eq!(regions[&SlotId(2)], Some(PixelRect::new(25, 25, 25, 25)));
}

#[test]
fn regions_are_invariant_under_pan_and_zoom() {
    let mut selection = SelectionController::default();
    selection.begin_drag(SlotId(0), (200, 200), PixelPoint::new(20.0, 20.0));
    selection.drag_to(PixelPoint::new(120.0, 90.0));
    selection.finish_drag();

    let slots = [(SlotId(0), (200, 200)), (SlotId(1), (400, 200))];
    let before = selection.current_regions(slots);

    // Pan/zoom lives on the slots, not in the controller; mutating any
    // slot's transform changes nothing about the pixel-space mapping.
    let mut panned = slot(200, 200);
    panned.pan_by(egui::vec2(500.0, -300.0));
    panned.zoom_about(egui::pos2(10.0, 10.0), 4.0, ZoomBounds::default());

    let after = selection.current_regions(slots);
    assert_eq!(before, after);
}

#[test]
fn drag_points_outside_the_image_are_clamped() {
    let mut selection = SelectionController::default();
    selection.begin_drag(SlotId(0), (100, 100), PixelPoint::new(90.0, 90.0));
    selection.drag_to(PixelPoint::new(500.0, -50.0));
    let rect = selection.canonical_rect().expect("rect");
    assert_eq!(rect, PixelRect::new(90, 0, 9, 90));
}

#[test]
fn empty_projection_is_reported_as_none_not_an_error() {
    let mut selection = SelectionController::default();
    selection.begin_drag(SlotId(0), (1000, 1000), PixelPoint::new(999.0, 999.0));
    selection.drag_to(PixelPoint::new(998.0, 998.0));

    let regions = selection.current_regions([(SlotId(0), (1000, 1000)), (SlotId(1), (3, 3))]);
    assert!(regions[&SlotId(0)].is_some());
    assert_eq!(regions[&SlotId(1)], None);
}

#[test]
fn removing_the_reference_slot_reanchors_to_the_lowest_remaining() {
    let mut selection = SelectionController::default();
    selection.begin_drag(SlotId(1), (200, 200), PixelPoint::new(50.0, 50.0));
    selection.drag_to(PixelPoint::new(100.0, 100.0));

    selection.remove_slot(SlotId(1), &[(SlotId(0), (400, 400)), (SlotId(2), (100, 100))]);

    assert_eq!(selection.reference(), Some(SlotId(0)));
    assert_eq!(selection.state(), SelectionState::Dragging);
    // The carried rectangle covers the same relative region.
    assert_eq!(selection.canonical_rect(), Some(PixelRect::new(100, 100, 100, 100)));
}

#[test]
fn removing_a_non_reference_slot_changes_nothing() {
    let mut selection = SelectionController::default();
    selection.begin_drag(SlotId(0), (200, 200), PixelPoint::new(10.0, 10.0));
    selection.drag_to(PixelPoint::new(20.0, 20.0));
    selection.finish_drag();

    selection.remove_slot(SlotId(2), &[(SlotId(0), (200, 200))]);
    assert_eq!(selection.reference(), Some(SlotId(0)));
    assert_eq!(selection.canonical_rect(), Some(PixelRect::new(10, 10, 10, 10)));
}

#[test]
fn removing_the_last_slot_discards_the_selection() {
    let mut selection = SelectionController::default();
    selection.begin_drag(SlotId(0), (200, 200), PixelPoint::new(10.0, 10.0));
    selection.drag_to(PixelPoint::new(20.0, 20.0));

    selection.remove_slot(SlotId(0), &[]);
    assert_eq!(selection.state(), SelectionState::Idle);
    assert_eq!(selection.canonical_rect(), None);
}

#[test]
fn magnified_previews_use_nearest_and_preserve_samples() {
    let image_slot = slot(16, 16);
    let mut renderer = PreviewRenderer::default();
    let region = PixelRect::new(2, 3, 4, 4);
    let previews = renderer.render_pass(
        &[(SlotId(0), &image_slot, Some(region))],
        64,
        ResamplePolicy::Auto,
    );

    let preview = &previews[&SlotId(0)];
    assert!(!preview.placeholder);
    assert_eq!(preview.dimensions(), (64, 64));
    // 16x magnification: each source sample becomes a 16x16 block.
    assert_eq!(preview.data[[0, 0, 0]], image_slot.image.data[[3, 2, 0]]);
    assert_eq!(preview.data[[63, 63, 0]], image_slot.image.data[[6, 5, 0]]);
}

#[test]
fn preview_output_preserves_region_aspect() {
    let image_slot = slot(100, 100);
    let mut renderer = PreviewRenderer::default();
    let previews = renderer.render_pass(
        &[(SlotId(0), &image_slot, Some(PixelRect::new(0, 0, 50, 25)))],
        128,
        ResamplePolicy::Auto,
    );
    assert_eq!(previews[&SlotId(0)].dimensions(), (128, 64));
}

#[test]
fn one_reducing_slot_switches_the_whole_pass_to_bilinear() {
    let small = slot(16, 16);
    let large = slot(2000, 2000);
    let mut renderer = PreviewRenderer::default();

    // Slot 1 must reduce its 1000px region into a 64px preview, so both
    // slots get the bilinear kernel; a flat image stays flat under it.
    let previews = renderer.render_pass(
        &[
            (SlotId(0), &small, Some(PixelRect::new(0, 0, 8, 8))),
            (SlotId(1), &large, Some(PixelRect::new(0, 0, 1000, 1000))),
        ],
        64,
        ResamplePolicy::Auto,
    );
    assert_eq!(previews.len(), 2);
    assert_eq!(previews[&SlotId(1)].dimensions(), (64, 64));
}

#[test]
fn empty_region_yields_the_placeholder_tile() {
    let image_slot = slot(16, 16);
    let mut renderer = PreviewRenderer::default();
    let previews = renderer.render_pass(
        &[(SlotId(0), &image_slot, None)],
        64,
        ResamplePolicy::Auto,
    );
    let preview = &previews[&SlotId(0)];
    assert!(preview.placeholder);
    assert_eq!(preview.dimensions(), (64, 64));
}

#[test]
fn renders_are_memoized_until_region_or_image_changes() {
    let mut image_slot = slot(16, 16);
    let mut renderer = PreviewRenderer::default();
    let region = Some(PixelRect::new(0, 0, 8, 8));

    let first = renderer.render_pass(&[(SlotId(0), &image_slot, region)], 64, ResamplePolicy::Auto);
    let second = renderer.render_pass(&[(SlotId(0), &image_slot, region)], 64, ResamplePolicy::Auto);
    assert!(std::sync::Arc::ptr_eq(&first[&SlotId(0)], &second[&SlotId(0)]));

    image_slot.replace_image(gray_image(16, 16));
    let third = renderer.render_pass(&[(SlotId(0), &image_slot, region)], 64, ResamplePolicy::Auto);
    assert!(!std::sync::Arc::ptr_eq(&first[&SlotId(0)], &third[&SlotId(0)]));
}

#[test]
fn preview_size_is_clamped_into_the_slider_range() {
    let image_slot = slot(16, 16);
    let mut renderer = PreviewRenderer::default();
    let previews = renderer.render_pass(
        &[(SlotId(0), &image_slot, Some(PixelRect::new(0, 0, 8, 8)))],
        4096,
        ResamplePolicy::Auto,
    );
    assert_eq!(previews[&SlotId(0)].dimensions(), (512, 512));
}

#[test]
fn placeholder_tile_is_a_checkerboard() {
    let image_slot = slot(8, 8);
    let mut renderer = PreviewRenderer::default();
    let previews =
        renderer.render_pass(&[(SlotId(0), &image_slot, None)], 64, ResamplePolicy::Auto);
    let Preview { data, .. } = &*previews[&SlotId(0)];
    assert_ne!(data[[0, 0, 0]], data[[0, 8, 0]]);
    assert_eq!(data[[0, 0, 0]], data[[8, 8, 0]]);
}
