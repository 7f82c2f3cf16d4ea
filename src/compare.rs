mod error;
mod layout;
mod mapper;
mod preview;
mod selection;

#[cfg(test)]
mod tests;

pub use error::{CompareError, Result};
pub use layout::{Arrangement, LayoutManager, MAX_SLOTS, MIN_SLOTS};
pub use mapper::{pixel_to_screen, rect_to_screen, reproject, screen_to_pixel};
pub use preview::{
    MAX_PREVIEW_SIZE, MIN_PREVIEW_SIZE, Preview, PreviewRenderer, ResampleKernel, ResamplePolicy,
};
pub use selection::{SelectionController, SelectionState};
