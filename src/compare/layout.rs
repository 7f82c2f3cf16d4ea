use eframe::egui;
use serde::{Deserialize, Serialize};

use super::{CompareError, Result};

pub const MIN_SLOTS: usize = 2;
pub const MAX_SLOTS: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum Arrangement {
    #[default]
    SingleRow,
    SingleColumn,
    Grid,
}

/// Assigns each comparison slot a screen-space viewport. Tiling is a pure
/// function of (canvas, slot count, arrangement, margin): the same inputs
/// always produce the same rectangles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutManager {
    slot_count: usize,
    arrangement: Arrangement,
    margin: f32,
}

impl Default for LayoutManager {
    fn default() -> Self {
        Self {
            slot_count: MIN_SLOTS,
            arrangement: Arrangement::default(),
            margin: 10.0,
        }
    }
}

impl LayoutManager {
    pub fn new(slot_count: usize, arrangement: Arrangement, margin: f32) -> Result<Self> {
        Self::validate(slot_count, arrangement)?;
        Ok(Self {
            slot_count,
            arrangement,
            margin: margin.max(0.0),
        })
    }

    pub fn slot_count(&self) -> usize {
        self.slot_count
    }

    pub fn arrangement(&self) -> Arrangement {
        self.arrangement
    }

    /// Switches to a new layout. On rejection the previous layout is kept
    /// untouched.
    pub fn set_layout(&mut self, slot_count: usize, arrangement: Arrangement) -> Result<()> {
        Self::validate(slot_count, arrangement)?;
        self.slot_count = slot_count;
        self.arrangement = arrangement;
        Ok(())
    }

    fn validate(slot_count: usize, arrangement: Arrangement) -> Result<()> {
        if !(MIN_SLOTS..=MAX_SLOTS).contains(&slot_count) {
            return Err(CompareError::InvalidSlotCount { count: slot_count });
        }
        if arrangement == Arrangement::Grid && slot_count != 4 {
            return Err(CompareError::UnsupportedArrangement {
                arrangement,
                required: 4,
                count: slot_count,
            });
        }
        Ok(())
    }

    /// Partitions the canvas into one non-overlapping viewport per slot,
    /// with the margin applied at the edges and between neighbors.
    pub fn tile(&self, canvas: egui::Rect) -> Vec<egui::Rect> {
        match self.arrangement {
            Arrangement::SingleRow => self.tile_strip(canvas, self.slot_count, 1),
            Arrangement::SingleColumn => self.tile_strip(canvas, 1, self.slot_count),
            Arrangement::Grid => self.tile_strip(canvas, 2, 2),
        }
    }

    fn tile_strip(&self, canvas: egui::Rect, columns: usize, rows: usize) -> Vec<egui::Rect> {
        let margin = self.margin;
        let cell_width =
            ((canvas.width() - margin * (columns as f32 + 1.0)) / columns as f32).max(0.0);
        let cell_height =
            ((canvas.height() - margin * (rows as f32 + 1.0)) / rows as f32).max(0.0);

        let mut viewports = Vec::with_capacity(self.slot_count);
        for index in 0..self.slot_count {
            let column = index % columns;
            let row = index / columns;
            let min = egui::pos2(
                canvas.min.x + margin + column as f32 * (cell_width + margin),
                canvas.min.y + margin + row as f32 * (cell_height + margin),
            );
            viewports.push(egui::Rect::from_min_size(
                min,
                egui::vec2(cell_width, cell_height),
            ));
        }
        viewports
    }
}
