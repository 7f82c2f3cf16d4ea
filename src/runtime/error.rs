use thiserror::Error;

use crate::compare::CompareError;
use crate::formats::IoError;
use crate::model::CoreError;

use super::ConfigError;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("image load failed: {0}")]
    Io(#[from] IoError),

    #[error("slot state error: {0}")]
    Core(#[from] CoreError),

    #[error("layout change rejected: {0}")]
    Compare(#[from] CompareError),

    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}
