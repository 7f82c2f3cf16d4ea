use std::collections::BTreeMap;
use std::sync::Arc;

use eframe::egui;

use crate::compare::Preview;
use crate::model::{PixelRect, SlotId};

/// What the presentation layer gets per frame: one consistent snapshot of
/// viewports, projected regions, previews and slot info, all derived from
/// the same selection-and-transform state. Never updated piecemeal.
#[derive(Debug, Clone, Default)]
pub struct FrameSnapshot {
    pub viewports: BTreeMap<SlotId, egui::Rect>,
    pub regions: BTreeMap<SlotId, Option<PixelRect>>,
    pub previews: BTreeMap<SlotId, Arc<Preview>>,
    pub selection_active: bool,
    pub info: BTreeMap<SlotId, String>,
}
