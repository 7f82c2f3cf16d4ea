use thiserror::Error;

use super::Arrangement;

pub type Result<T> = std::result::Result<T, CompareError>;

#[derive(Debug, Error)]
pub enum CompareError {
    #[error("unsupported comparison slot count {count}, expected 2 to 4")]
    InvalidSlotCount { count: usize },

    #[error("{arrangement:?} arrangement requires {required} slots, got {count}")]
    UnsupportedArrangement {
        arrangement: Arrangement,
        required: usize,
        count: usize,
    },
}
