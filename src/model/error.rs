use thiserror::Error;

pub type Result<T> = std::result::Result<T, CoreError>;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("image buffer has zero area: {width}x{height}")]
    EmptyImage { width: usize, height: usize },

    #[error("unsupported channel count {channels}, expected 1, 3 or 4")]
    UnsupportedChannelCount { channels: usize },

    #[error("slot index {index} out of range, capacity is {capacity}")]
    SlotOutOfRange { index: usize, capacity: usize },
}
