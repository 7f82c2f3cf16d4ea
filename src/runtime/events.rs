use std::collections::VecDeque;
use std::path::PathBuf;

use eframe::egui;

use crate::compare::Arrangement;
use crate::model::SlotId;

/// Everything the windowing layer can tell the session. Events are queued
/// and consumed in order by the single input-handling thread; there is no
/// callback registration.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    DragStart { slot: SlotId, screen: egui::Pos2 },
    DragMove { screen: egui::Pos2 },
    DragRelease { screen: egui::Pos2 },
    DropFile { slot: SlotId, path: PathBuf },
    Pan { slot: SlotId, delta: egui::Vec2 },
    Zoom { slot: SlotId, factor: f32, anchor: egui::Pos2 },
    SetLayout { slot_count: usize, arrangement: Arrangement },
    CanvasResized { canvas: egui::Rect },
    SetPreviewSize { size: u32 },
    ClearSlot { slot: SlotId },
    ClearAll,
}

#[derive(Debug, Default)]
pub struct EventQueue {
    events: VecDeque<InputEvent>,
}

impl EventQueue {
    pub fn push(&mut self, event: InputEvent) {
        self.events.push_back(event);
    }

    pub fn pop(&mut self) -> Option<InputEvent> {
        self.events.pop_front()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }
}
