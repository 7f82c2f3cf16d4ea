use std::collections::BTreeMap;
use std::path::Path;

use eframe::egui;

use crate::compare::{
    Arrangement, LayoutManager, MAX_PREVIEW_SIZE, MAX_SLOTS, MIN_PREVIEW_SIZE, PreviewRenderer,
    SelectionController, screen_to_pixel,
};
use crate::formats;
use crate::model::{CoreError, ImageSlot, PixelImage, SlotId};

use super::{AppError, ConfigError, EventQueue, FrameSnapshot, InputEvent, Result, ViewerConfig};

pub const SLOT_CAPACITY: usize = MAX_SLOTS;

/// The one explicitly constructed comparison context. Owns all mutable
/// state (slots, layout, selection, renderer) and is driven exclusively by
/// the event queue on the input-handling thread; collaborators receive it
/// by reference.
#[derive(Debug)]
pub struct Session {
    slots: Vec<Option<ImageSlot>>,
    layout: LayoutManager,
    selection: SelectionController,
    renderer: PreviewRenderer,
    config: ViewerConfig,
    canvas: egui::Rect,
}

impl Session {
    pub fn new(config: ViewerConfig) -> std::result::Result<Self, ConfigError> {
        config.validate()?;
        let slot_count = if config.arrangement == Arrangement::Grid {
            4
        } else {
            2
        };
        let layout = LayoutManager::new(slot_count, config.arrangement, config.margin)
            .map_err(|error| ConfigError::Invalid(error.to_string()))?;
        Ok(Self {
            slots: vec![None; SLOT_CAPACITY],
            layout,
            selection: SelectionController::default(),
            renderer: PreviewRenderer::default(),
            config,
            canvas: egui::Rect::ZERO,
        })
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    pub fn layout(&self) -> &LayoutManager {
        &self.layout
    }

    pub fn slot(&self, slot: SlotId) -> Option<&ImageSlot> {
        self.slots.get(slot.0).and_then(|entry| entry.as_ref())
    }

    pub fn live_slots(&self) -> impl Iterator<Item = (SlotId, &ImageSlot)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(index, entry)| entry.as_ref().map(|slot| (SlotId(index), slot)))
    }

    fn live_dims(&self) -> Vec<(SlotId, (u32, u32))> {
        self.live_slots()
            .map(|(slot, state)| (slot, state.dimensions()))
            .collect()
    }

    /// Decodes and installs an image. On decode failure nothing changes:
    /// the target slot, its siblings and the selection all keep their
    /// previous state.
    pub fn load_image(&mut self, slot: SlotId, path: impl AsRef<Path>) -> Result<()> {
        let image = formats::decode_image(path)?;
        self.set_image(slot, image)
    }

    /// Installs an already decoded image, replacing the slot's previous
    /// content. Any existing selection is discarded: its canonical
    /// coordinates may not mean anything against the new resolution.
    pub fn set_image(&mut self, slot: SlotId, image: PixelImage) -> Result<()> {
        if slot.0 >= SLOT_CAPACITY {
            return Err(AppError::Core(CoreError::SlotOutOfRange {
                index: slot.0,
                capacity: SLOT_CAPACITY,
            }));
        }
        match &mut self.slots[slot.0] {
            Some(existing) => existing.replace_image(image),
            empty => *empty = Some(ImageSlot::new(image)),
        }
        self.selection.clear();

        // Only the changed slot gets refitted; sibling transforms survive.
        let viewports = self.layout.tile(self.canvas);
        let bounds = self.config.zoom_bounds();
        if let Some(state) = self.slots[slot.0].as_mut() {
            if let Some(viewport) = viewports.get(slot.0) {
                state.viewport = *viewport;
            }
            state.fit_to_viewport(bounds);
        }
        Ok(())
    }

    pub fn clear_slot(&mut self, slot: SlotId) {
        if slot.0 >= SLOT_CAPACITY || self.slots[slot.0].is_none() {
            return;
        }
        self.slots[slot.0] = None;
        let remaining = self.live_dims();
        self.selection.remove_slot(slot, &remaining);
    }

    pub fn clear_all(&mut self) {
        self.slots = vec![None; SLOT_CAPACITY];
        self.selection.clear();
    }

    /// Rejected layouts leave the previous tiling fully intact.
    pub fn set_layout(&mut self, slot_count: usize, arrangement: Arrangement) -> Result<()> {
        self.layout.set_layout(slot_count, arrangement)?;
        self.retile();
        Ok(())
    }

    pub fn set_canvas(&mut self, canvas: egui::Rect) {
        if canvas == self.canvas {
            return;
        }
        self.canvas = canvas;
        self.retile();
    }

    fn retile(&mut self) {
        let viewports = self.layout.tile(self.canvas);
        let bounds = self.config.zoom_bounds();
        for (index, viewport) in viewports.iter().enumerate() {
            if let Some(slot) = self.slots.get_mut(index).and_then(|entry| entry.as_mut()) {
                slot.viewport = *viewport;
                slot.fit_to_viewport(bounds);
            }
        }
    }

    pub fn handle(&mut self, event: InputEvent) -> Result<()> {
        match event {
            InputEvent::DragStart { slot, screen } => {
                let Some((viewport, transform, dims)) = self
                    .slot(slot)
                    .map(|state| (state.viewport, state.transform, state.dimensions()))
                else {
                    return Ok(());
                };
                if !viewport.contains(screen) {
                    return Ok(());
                }
                let point = screen_to_pixel(viewport, transform, dims, screen);
                self.selection.begin_drag(slot, dims, point);
            }
            InputEvent::DragMove { screen } => self.drag_through_reference(screen),
            InputEvent::DragRelease { screen } => {
                self.drag_through_reference(screen);
                self.selection.finish_drag();
            }
            InputEvent::DropFile { slot, path } => self.load_image(slot, path)?,
            InputEvent::Pan { slot, delta } => {
                if let Some(state) = self.slots.get_mut(slot.0).and_then(|entry| entry.as_mut()) {
                    state.pan_by(delta);
                }
            }
            InputEvent::Zoom {
                slot,
                factor,
                anchor,
            } => {
                let bounds = self.config.zoom_bounds();
                if let Some(state) = self.slots.get_mut(slot.0).and_then(|entry| entry.as_mut()) {
                    state.zoom_about(anchor, factor, bounds);
                }
            }
            InputEvent::SetLayout {
                slot_count,
                arrangement,
            } => self.set_layout(slot_count, arrangement)?,
            InputEvent::CanvasResized { canvas } => self.set_canvas(canvas),
            InputEvent::SetPreviewSize { size } => {
                self.config.preview_size = size.clamp(MIN_PREVIEW_SIZE, MAX_PREVIEW_SIZE);
            }
            InputEvent::ClearSlot { slot } => self.clear_slot(slot),
            InputEvent::ClearAll => self.clear_all(),
        }
        Ok(())
    }

    /// Drag motion is always mapped through the reference slot, wherever
    /// the cursor happens to be on screen.
    fn drag_through_reference(&mut self, screen: egui::Pos2) {
        if !self.selection.is_dragging() {
            return;
        }
        let Some((viewport, transform, dims)) = self
            .selection
            .reference()
            .and_then(|slot| self.slot(slot))
            .map(|state| (state.viewport, state.transform, state.dimensions()))
        else {
            return;
        };
        let point = screen_to_pixel(viewport, transform, dims, screen);
        self.selection.drag_to(point);
    }

    /// Drains the queue in arrival order. Each event is handled to
    /// completion before the next; failures are collected rather than
    /// aborting the rest, since every failure leaves valid state behind.
    pub fn pump(&mut self, queue: &mut EventQueue) -> Vec<AppError> {
        let mut errors = Vec::new();
        while let Some(event) = queue.pop() {
            if let Err(error) = self.handle(event) {
                errors.push(error);
            }
        }
        errors
    }

    /// Builds the presentation snapshot for this frame. Everything in it
    /// derives from the state as of this single call; the renderer's
    /// memoization makes unchanged slots (e.g. during pure pan/zoom) free.
    pub fn current_frame(&mut self) -> FrameSnapshot {
        let regions = self.selection.current_regions(
            self.slots
                .iter()
                .enumerate()
                .filter_map(|(index, entry)| {
                    entry.as_ref().map(|slot| (SlotId(index), slot.dimensions()))
                }),
        );
        let items: Vec<_> = self
            .slots
            .iter()
            .enumerate()
            .filter_map(|(index, entry)| {
                entry.as_ref().map(|slot| {
                    let id = SlotId(index);
                    (id, slot, regions.get(&id).copied().flatten())
                })
            })
            .collect();
        let previews =
            self.renderer
                .render_pass(&items, self.config.preview_size, self.config.resample);

        let mut viewports = BTreeMap::new();
        let mut info = BTreeMap::new();
        for (slot, state) in self.live_slots() {
            viewports.insert(slot, state.viewport);
            info.insert(slot, describe_slot(state));
        }

        FrameSnapshot {
            viewports,
            regions,
            previews,
            selection_active: self.selection.is_dragging(),
            info,
        }
    }
}

fn describe_slot(slot: &ImageSlot) -> String {
    let meta = &slot.image.meta;
    let name = meta
        .source
        .as_deref()
        .and_then(|path| path.file_name())
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "unnamed".to_string());
    let (width, height) = slot.dimensions();
    format!(
        "{name}\n{width}x{height} px\n{} {}-bit",
        meta.format.label(),
        meta.bit_depth
    )
}
