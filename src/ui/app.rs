use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use eframe::egui;

use crate::compare::{
    Arrangement, MAX_PREVIEW_SIZE, MIN_PREVIEW_SIZE, Preview, rect_to_screen,
};
use crate::formats::supported_formats;
use crate::model::SlotId;
use crate::runtime::{
    ConfigError, EventQueue, FrameSnapshot, InputEvent, SLOT_CAPACITY, Session, ViewerConfig,
};

const SELECTION_STROKE: egui::Color32 = egui::Color32::from_rgb(0, 120, 215);
const PREVIEW_BORDER: egui::Color32 = egui::Color32::from_rgb(200, 40, 60);
const PREVIEW_INSET: f32 = 10.0;

/// Presentation shell around [`Session`]. Translates egui input into
/// [`InputEvent`]s, uploads textures, and paints whatever the session's
/// frame snapshot says; no comparison logic lives here.
pub struct ViewerApp {
    session: Session,
    queue: EventQueue,
    slot_textures: HashMap<SlotId, (u64, egui::TextureHandle)>,
    preview_textures: HashMap<SlotId, (Arc<Preview>, egui::TextureHandle)>,
    status: String,
    show_info: bool,
}

impl ViewerApp {
    pub fn new(inputs: Vec<PathBuf>, config: Option<ViewerConfig>) -> Result<Self, ConfigError> {
        let mut session = Session::new(config.unwrap_or_default())?;
        let mut status = String::from("Ready");
        if inputs.len() > 2 {
            let arrangement = match (inputs.len(), session.config().arrangement) {
                (4, _) => Arrangement::Grid,
                (_, Arrangement::SingleColumn) => Arrangement::SingleColumn,
                _ => Arrangement::SingleRow,
            };
            if let Err(error) = session.set_layout(inputs.len(), arrangement) {
                status = error.to_string();
            }
        }
        for (index, path) in inputs.into_iter().take(SLOT_CAPACITY).enumerate() {
            if let Err(error) = session.load_image(SlotId(index), &path) {
                status = error.to_string();
            }
        }
        Ok(Self {
            session,
            queue: EventQueue::default(),
            slot_textures: HashMap::new(),
            preview_textures: HashMap::new(),
            status,
            show_info: true,
        })
    }

    fn toolbar(&mut self, ui: &mut egui::Ui) {
        ui.horizontal_wrapped(|ui| {
            let layout = *self.session.layout();
            for count in 2..=4usize {
                if ui
                    .selectable_label(layout.slot_count() == count, format!("{count} images"))
                    .clicked()
                {
                    let arrangement = if count == 4 {
                        Arrangement::Grid
                    } else {
                        Arrangement::SingleRow
                    };
                    self.queue.push(InputEvent::SetLayout {
                        slot_count: count,
                        arrangement,
                    });
                }
            }
            ui.separator();

            for index in 0..self.session.layout().slot_count() {
                if ui.button(format!("Open {}", index + 1)).clicked() {
                    if let Some(path) = rfd::FileDialog::new()
                        .add_filter("Images", supported_formats())
                        .pick_file()
                    {
                        self.queue.push(InputEvent::DropFile {
                            slot: SlotId(index),
                            path,
                        });
                    }
                }
            }
            ui.separator();

            let mut preview_size = self.session.config().preview_size;
            if ui
                .add(
                    egui::Slider::new(&mut preview_size, MIN_PREVIEW_SIZE..=MAX_PREVIEW_SIZE)
                        .text("preview"),
                )
                .changed()
            {
                self.queue.push(InputEvent::SetPreviewSize { size: preview_size });
            }

            ui.checkbox(&mut self.show_info, "Info");
            if ui.button("Reset").clicked() {
                self.queue.push(InputEvent::ClearAll);
            }
        });
    }

    fn forward_pointer_events(&mut self, response: &egui::Response, ui: &egui::Ui) {
        if response.drag_started_by(egui::PointerButton::Primary) {
            if let Some(pos) = response.interact_pointer_pos() {
                if let Some(slot) = self.slot_under(pos) {
                    self.queue.push(InputEvent::DragStart { slot, screen: pos });
                }
            }
        }
        if response.dragged_by(egui::PointerButton::Primary) {
            if let Some(pos) = response.interact_pointer_pos() {
                self.queue.push(InputEvent::DragMove { screen: pos });
            }
        }
        if response.drag_stopped_by(egui::PointerButton::Primary) {
            if let Some(pos) = response.interact_pointer_pos() {
                self.queue.push(InputEvent::DragRelease { screen: pos });
            }
        }

        if response.dragged_by(egui::PointerButton::Secondary) {
            if let Some(pos) = response.interact_pointer_pos() {
                if let Some(slot) = self.slot_under(pos) {
                    self.queue.push(InputEvent::Pan {
                        slot,
                        delta: response.drag_delta(),
                    });
                }
            }
        }

        let scroll = ui.input(|input| input.raw_scroll_delta.y);
        if scroll != 0.0 {
            if let Some(pos) = response.hover_pos() {
                if let Some(slot) = self.slot_under(pos) {
                    self.queue.push(InputEvent::Zoom {
                        slot,
                        factor: (scroll * 0.005).exp(),
                        anchor: pos,
                    });
                }
            }
        }
    }

    fn forward_dropped_files(&mut self, ctx: &egui::Context) {
        let dropped = ctx.input(|input| input.raw.dropped_files.clone());
        for file in dropped {
            let Some(path) = file.path else { continue };
            let hovered = ctx
                .pointer_latest_pos()
                .and_then(|pos| self.slot_under(pos));
            let target = hovered.or_else(|| self.first_free_slot()).unwrap_or(SlotId(0));
            self.queue.push(InputEvent::DropFile { slot: target, path });
        }
    }

    fn slot_under(&self, pos: egui::Pos2) -> Option<SlotId> {
        let count = self.session.layout().slot_count();
        self.session
            .live_slots()
            .find(|(slot, state)| slot.0 < count && state.viewport.contains(pos))
            .map(|(slot, _)| slot)
    }

    fn first_free_slot(&self) -> Option<SlotId> {
        (0..self.session.layout().slot_count())
            .map(SlotId)
            .find(|slot| self.session.slot(*slot).is_none())
    }

    fn slot_texture(&mut self, ctx: &egui::Context, slot: SlotId) -> Option<egui::TextureId> {
        let state = self.session.slot(slot)?;
        match self.slot_textures.get(&slot) {
            Some((version, texture)) if *version == state.version => Some(texture.id()),
            _ => {
                let texture = ctx.load_texture(
                    format!("slot-{}", slot.0),
                    color_image(&state.image.data.view()),
                    egui::TextureOptions::LINEAR,
                );
                let id = texture.id();
                self.slot_textures.insert(slot, (state.version, texture));
                Some(id)
            }
        }
    }

    fn preview_texture(
        &mut self,
        ctx: &egui::Context,
        slot: SlotId,
        preview: &Arc<Preview>,
    ) -> egui::TextureId {
        match self.preview_textures.get(&slot) {
            Some((cached, texture)) if Arc::ptr_eq(cached, preview) => texture.id(),
            _ => {
                let texture = ctx.load_texture(
                    format!("preview-{}", slot.0),
                    color_image(&preview.data.view()),
                    egui::TextureOptions::NEAREST,
                );
                let id = texture.id();
                self.preview_textures.insert(slot, (preview.clone(), texture));
                id
            }
        }
    }

    fn paint_frame(&mut self, ctx: &egui::Context, painter: &egui::Painter, frame: &FrameSnapshot) {
        let empty_viewports: Vec<egui::Rect> = {
            let layout = self.session.layout();
            layout
                .tile(painter.clip_rect())
                .into_iter()
                .enumerate()
                .filter(|(index, _)| self.session.slot(SlotId(*index)).is_none())
                .map(|(_, viewport)| viewport)
                .collect()
        };
        for viewport in empty_viewports {
            painter.rect_stroke(
                viewport,
                2.0,
                egui::Stroke::new(1.0, egui::Color32::GRAY),
                egui::StrokeKind::Inside,
            );
            painter.text(
                viewport.center(),
                egui::Align2::CENTER_CENTER,
                "Drop an image here",
                egui::FontId::proportional(14.0),
                egui::Color32::GRAY,
            );
        }

        let slots: Vec<SlotId> = frame.viewports.keys().copied().collect();
        for slot in slots {
            let viewport = frame.viewports[&slot];
            let Some((transform, (width, height))) = self
                .session
                .slot(slot)
                .map(|state| (state.transform, state.dimensions()))
            else {
                continue;
            };
            let clipped = painter.with_clip_rect(viewport);

            if let Some(texture) = self.slot_texture(ctx, slot) {
                let image_rect = egui::Rect::from_min_size(
                    viewport.min + transform.pan,
                    egui::vec2(width as f32 * transform.zoom, height as f32 * transform.zoom),
                );
                clipped.image(
                    texture,
                    image_rect,
                    egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
                    egui::Color32::WHITE,
                );
            }
            painter.rect_stroke(
                viewport,
                2.0,
                egui::Stroke::new(1.0, egui::Color32::DARK_GRAY),
                egui::StrokeKind::Inside,
            );

            if let Some(region) = frame.regions.get(&slot).copied().flatten() {
                let overlay = rect_to_screen(viewport, transform, region);
                clipped.rect_stroke(
                    overlay,
                    0.0,
                    egui::Stroke::new(2.0, SELECTION_STROKE),
                    egui::StrokeKind::Outside,
                );
            }

            if let Some(preview) = frame.previews.get(&slot) {
                if !preview.placeholder {
                    let texture = self.preview_texture(ctx, slot, preview);
                    let (preview_width, preview_height) = preview.dimensions();
                    let corner = egui::pos2(
                        viewport.max.x - preview_width as f32 - PREVIEW_INSET,
                        viewport.min.y + PREVIEW_INSET,
                    );
                    let preview_rect = egui::Rect::from_min_size(
                        corner,
                        egui::vec2(preview_width as f32, preview_height as f32),
                    );
                    clipped.image(
                        texture,
                        preview_rect,
                        egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
                        egui::Color32::WHITE,
                    );
                    clipped.rect_stroke(
                        preview_rect,
                        0.0,
                        egui::Stroke::new(2.0, PREVIEW_BORDER),
                        egui::StrokeKind::Outside,
                    );
                }
            }

            if self.show_info {
                if let Some(info) = frame.info.get(&slot) {
                    clipped.text(
                        viewport.min + egui::vec2(PREVIEW_INSET, PREVIEW_INSET),
                        egui::Align2::LEFT_TOP,
                        info,
                        egui::FontId::monospace(12.0),
                        egui::Color32::WHITE,
                    );
                }
            }
        }
    }
}

impl eframe::App for ViewerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| self.toolbar(ui));
        egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
            ui.label(&self.status);
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            let (canvas, response) =
                ui.allocate_exact_size(ui.available_size(), egui::Sense::click_and_drag());
            self.queue.push(InputEvent::CanvasResized { canvas });
            self.forward_pointer_events(&response, ui);
            self.forward_dropped_files(ctx);

            let errors = self.session.pump(&mut self.queue);
            if let Some(error) = errors.last() {
                self.status = error.to_string();
            }

            let frame = self.session.current_frame();
            let painter = ui.painter_at(canvas);
            self.paint_frame(ctx, &painter, &frame);
        });
    }
}

fn color_image(data: &ndarray::ArrayView3<'_, u8>) -> egui::ColorImage {
    let (height, width, channels) = data.dim();
    let size = [width, height];
    let samples: Vec<u8> = data.iter().copied().collect();
    match channels {
        1 => egui::ColorImage::from_gray(size, &samples),
        4 => egui::ColorImage::from_rgba_unmultiplied(size, &samples),
        _ => egui::ColorImage::from_rgb(size, &samples),
    }
}
