use std::fmt;
use std::sync::Arc;

use eframe::egui;

use super::PixelImage;

/// Stable identifier of one grid position, independent of load order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SlotId(pub usize);

impl fmt::Display for SlotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "slot {}", self.0 + 1)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewTransform {
    pub zoom: f32,
    pub pan: egui::Vec2,
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self {
            zoom: 1.0,
            pan: egui::Vec2::ZERO,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoomBounds {
    pub min: f32,
    pub max: f32,
}

impl Default for ZoomBounds {
    fn default() -> Self {
        Self {
            min: 0.05,
            max: 20.0,
        }
    }
}

impl ZoomBounds {
    pub fn clamp(&self, zoom: f32) -> f32 {
        zoom.clamp(self.min, self.max)
    }
}

/// One loaded image and its display state. Slots are independent; nothing in
/// here refers to any other slot.
#[derive(Debug, Clone)]
pub struct ImageSlot {
    pub image: Arc<PixelImage>,
    pub transform: ViewTransform,
    pub viewport: egui::Rect,
    pub version: u64,
}

impl ImageSlot {
    pub fn new(image: PixelImage) -> Self {
        Self {
            image: Arc::new(image),
            transform: ViewTransform::default(),
            viewport: egui::Rect::ZERO,
            version: 0,
        }
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    /// Swaps in a freshly decoded image, resetting the display transform and
    /// bumping the version so stale derived buffers are not reused.
    pub fn replace_image(&mut self, image: PixelImage) {
        self.image = Arc::new(image);
        self.transform = ViewTransform::default();
        self.version += 1;
    }

    pub fn set_transform(&mut self, zoom: f32, pan: egui::Vec2, bounds: ZoomBounds) {
        self.transform = ViewTransform {
            zoom: bounds.clamp(zoom),
            pan,
        };
    }

    pub fn pan_by(&mut self, delta: egui::Vec2) {
        self.transform.pan += delta;
    }

    /// Multiplies zoom by `factor` while keeping the image point under
    /// `anchor` (a screen position) fixed on screen.
    pub fn zoom_about(&mut self, anchor: egui::Pos2, factor: f32, bounds: ZoomBounds) {
        let old_zoom = self.transform.zoom;
        let new_zoom = bounds.clamp(old_zoom * factor);
        if old_zoom <= 0.0 || new_zoom == old_zoom {
            self.transform.zoom = new_zoom;
            return;
        }
        let offset = anchor - self.viewport.min - self.transform.pan;
        let pan = (anchor - self.viewport.min) - offset * (new_zoom / old_zoom);
        self.transform = ViewTransform {
            zoom: new_zoom,
            pan,
        };
    }

    /// Aspect-preserving fit: the whole image visible and centered in the
    /// current viewport.
    pub fn fit_to_viewport(&mut self, bounds: ZoomBounds) {
        let (width, height) = self.dimensions();
        if self.viewport.width() <= 0.0 || self.viewport.height() <= 0.0 {
            self.transform = ViewTransform::default();
            return;
        }
        let zoom = bounds.clamp(
            (self.viewport.width() / width as f32).min(self.viewport.height() / height as f32),
        );
        let pan = egui::vec2(
            (self.viewport.width() - width as f32 * zoom) / 2.0,
            (self.viewport.height() - height as f32 * zoom) / 2.0,
        );
        self.transform = ViewTransform { zoom, pan };
    }
}
