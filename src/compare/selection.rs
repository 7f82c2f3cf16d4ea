use std::collections::BTreeMap;

use crate::model::{PixelPoint, PixelRect, SlotId};

use super::mapper;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectionState {
    #[default]
    Idle,
    Dragging,
    Finalized,
}

/// Owns the single selection rectangle, stored once in the reference slot's
/// native pixel coordinates. Every other slot sees the rectangle through
/// fraction-preserving reprojection, never a per-slot copy.
#[derive(Debug, Clone, Default)]
pub struct SelectionController {
    state: SelectionState,
    reference: Option<SlotId>,
    reference_dims: (u32, u32),
    anchor: PixelPoint,
    cursor: PixelPoint,
}

impl SelectionController {
    pub fn state(&self) -> SelectionState {
        self.state
    }

    pub fn is_dragging(&self) -> bool {
        self.state == SelectionState::Dragging
    }

    pub fn reference(&self) -> Option<SlotId> {
        self.reference
    }

    pub fn reference_dims(&self) -> (u32, u32) {
        self.reference_dims
    }

    /// Starts a new drag in `slot`, discarding any previously finalized
    /// rectangle. The rectangle begins zero-sized at the drag point.
    pub fn begin_drag(&mut self, slot: SlotId, dims: (u32, u32), point: PixelPoint) {
        let point = point.clamped_to(dims.0, dims.1);
        self.state = SelectionState::Dragging;
        self.reference = Some(slot);
        self.reference_dims = dims;
        self.anchor = point;
        self.cursor = point;
    }

    /// Moves the far corner of the in-progress rectangle. Ignored outside a
    /// drag.
    pub fn drag_to(&mut self, point: PixelPoint) {
        if self.state != SelectionState::Dragging {
            return;
        }
        self.cursor = point.clamped_to(self.reference_dims.0, self.reference_dims.1);
    }

    /// Freezes the rectangle until the next drag-start.
    pub fn finish_drag(&mut self) {
        if self.state == SelectionState::Dragging {
            self.state = SelectionState::Finalized;
        }
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// The normalized selection rectangle in the reference slot's pixel
    /// space, or `None` before any drag.
    pub fn canonical_rect(&self) -> Option<PixelRect> {
        if self.state == SelectionState::Idle {
            return None;
        }
        Some(PixelRect::from_corners(self.anchor, self.cursor))
    }

    /// Projects the canonical rectangle into every live slot. A slot whose
    /// clamped projection is empty maps to `None`; the remaining slots are
    /// unaffected. The result depends only on native dimensions, so pan and
    /// zoom changes never alter it.
    pub fn current_regions(
        &self,
        slots: impl IntoIterator<Item = (SlotId, (u32, u32))>,
    ) -> BTreeMap<SlotId, Option<PixelRect>> {
        let canonical = self.canonical_rect();
        slots
            .into_iter()
            .map(|(slot, dims)| {
                let region = canonical.and_then(|rect| {
                    if Some(slot) == self.reference {
                        let clamped = rect.clamped_to(dims.0, dims.1);
                        (!clamped.is_empty()).then_some(clamped)
                    } else {
                        mapper::reproject(rect, self.reference_dims, dims)
                    }
                });
                (slot, region)
            })
            .collect()
    }

    /// Reacts to a slot being cleared. If it was the reference, the
    /// selection re-anchors to the lowest remaining live slot, carrying the
    /// rectangle (and an in-progress drag) over by fractions; with nothing
    /// left it drops to idle.
    pub fn remove_slot(&mut self, removed: SlotId, remaining: &[(SlotId, (u32, u32))]) {
        if self.reference != Some(removed) {
            return;
        }
        let Some(&(slot, dims)) = remaining.iter().min_by_key(|(slot, _)| *slot) else {
            self.clear();
            return;
        };
        self.anchor = carry_point(self.anchor, self.reference_dims, dims);
        self.cursor = carry_point(self.cursor, self.reference_dims, dims);
        self.reference = Some(slot);
        self.reference_dims = dims;
    }
}

fn carry_point(point: PixelPoint, from: (u32, u32), to: (u32, u32)) -> PixelPoint {
    if from.0 == 0 || from.1 == 0 {
        return PixelPoint::default();
    }
    PixelPoint::new(
        point.x / from.0 as f32 * to.0 as f32,
        point.y / from.1 as f32 * to.1 as f32,
    )
    .clamped_to(to.0, to.1)
}
