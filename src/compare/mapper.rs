use eframe::egui;

use crate::model::{PixelPoint, PixelRect, ViewTransform};

/// Maps a screen position into a slot's native pixel space:
/// `pixel = (screen - viewport.min - pan) / zoom`, clamped onto the image.
pub fn screen_to_pixel(
    viewport: egui::Rect,
    transform: ViewTransform,
    dimensions: (u32, u32),
    screen: egui::Pos2,
) -> PixelPoint {
    let zoom = transform.zoom.max(f32::EPSILON);
    let offset = screen - viewport.min - transform.pan;
    PixelPoint::new(offset.x / zoom, offset.y / zoom).clamped_to(dimensions.0, dimensions.1)
}

/// Inverse of [`screen_to_pixel`], without clamping.
pub fn pixel_to_screen(
    viewport: egui::Rect,
    transform: ViewTransform,
    point: PixelPoint,
) -> egui::Pos2 {
    viewport.min + transform.pan + egui::vec2(point.x * transform.zoom, point.y * transform.zoom)
}

/// Screen-space footprint of a pixel-space rectangle, for overlay drawing.
pub fn rect_to_screen(
    viewport: egui::Rect,
    transform: ViewTransform,
    rect: PixelRect,
) -> egui::Rect {
    let min = pixel_to_screen(viewport, transform, PixelPoint::new(rect.x as f32, rect.y as f32));
    let max = pixel_to_screen(
        viewport,
        transform,
        PixelPoint::new(rect.right() as f32, rect.bottom() as f32),
    );
    egui::Rect::from_min_max(min, max)
}

/// Carries a rectangle from one image's pixel space into another's by
/// preserving its position and size as fractions of the image bounds.
/// Compared images may differ in resolution, so absolute pixel offsets would
/// land the region on different content; fractions keep it on the same
/// relative spot. Returns `None` when the clamped projection is empty.
pub fn reproject(rect: PixelRect, from: (u32, u32), to: (u32, u32)) -> Option<PixelRect> {
    if rect.is_empty() || from.0 == 0 || from.1 == 0 {
        return None;
    }
    let fx = rect.x as f32 / from.0 as f32;
    let fy = rect.y as f32 / from.1 as f32;
    let fw = rect.width as f32 / from.0 as f32;
    let fh = rect.height as f32 / from.1 as f32;

    let projected = PixelRect::new(
        (fx * to.0 as f32).round() as u32,
        (fy * to.1 as f32).round() as u32,
        (fw * to.0 as f32).round() as u32,
        (fh * to.1 as f32).round() as u32,
    )
    .clamped_to(to.0, to.1);

    (!projected.is_empty()).then_some(projected)
}

#[cfg(test)]
mod tests {
    use eframe::egui;

    use super::{pixel_to_screen, reproject, screen_to_pixel};
    use crate::model::{PixelPoint, PixelRect, ViewTransform};

    #[test]
    fn screen_and_pixel_mappings_are_inverse() {
        let viewport = egui::Rect::from_min_size(egui::pos2(40.0, 30.0), egui::vec2(300.0, 300.0));
        let transform = ViewTransform {
            zoom: 1.5,
            pan: egui::vec2(12.0, -7.0),
        };
        let pixel = screen_to_pixel(viewport, transform, (400, 400), egui::pos2(100.0, 90.0));
        let screen = pixel_to_screen(viewport, transform, pixel);
        assert!((screen.x - 100.0).abs() < 1e-3);
        assert!((screen.y - 90.0).abs() < 1e-3);
    }

    #[test]
    fn screen_mapping_clamps_outside_points_onto_the_image() {
        let viewport = egui::Rect::from_min_size(egui::Pos2::ZERO, egui::vec2(100.0, 100.0));
        let transform = ViewTransform::default();
        let pixel = screen_to_pixel(viewport, transform, (50, 50), egui::pos2(-20.0, 500.0));
        assert_eq!(pixel, PixelPoint::new(0.0, 49.0));
    }

    #[test]
    fn reprojection_preserves_fractions_across_resolutions() {
        // 25% x 25% at offset (10%, 10%) of a 100x100 image.
        let rect = PixelRect::new(10, 10, 25, 25);
        let projected = reproject(rect, (100, 100), (400, 200)).expect("non-empty");
        assert_eq!(projected, PixelRect::new(40, 20, 100, 50));
    }

    #[test]
    fn reprojection_into_a_tiny_image_can_come_back_empty() {
        let rect = PixelRect::new(99, 99, 1, 1);
        assert_eq!(reproject(rect, (100, 100), (2, 2)), None);
    }

    #[test]
    fn reprojection_round_trip_stays_within_a_pixel() {
        let rect = PixelRect::new(30, 40, 55, 70);
        let there = reproject(rect, (200, 200), (777, 333)).expect("non-empty");
        let back = reproject(there, (777, 333), (200, 200)).expect("non-empty");
        assert!(back.x.abs_diff(rect.x) <= 1);
        assert!(back.y.abs_diff(rect.y) <= 1);
        assert!(back.width.abs_diff(rect.width) <= 1);
        assert!(back.height.abs_diff(rect.height) <= 1);
    }
}
