use std::path::PathBuf;

use ndarray::Array3;
use serde::{Deserialize, Serialize};

use super::{CoreError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImageFormat {
    Png,
    Jpeg,
    Bmp,
    Tiff,
}

impl ImageFormat {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Png => "PNG",
            Self::Jpeg => "JPEG",
            Self::Bmp => "BMP",
            Self::Tiff => "TIFF",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageMeta {
    pub source: Option<PathBuf>,
    pub format: ImageFormat,
    pub bit_depth: u8,
}

impl ImageMeta {
    pub fn new(source: impl Into<PathBuf>, format: ImageFormat, bit_depth: u8) -> Self {
        Self {
            source: Some(source.into()),
            format,
            bit_depth,
        }
    }
}

/// A decoded image: row-major `[height, width, channels]` samples plus the
/// metadata captured at decode time. Immutable after construction.
#[derive(Debug, Clone)]
pub struct PixelImage {
    pub data: Array3<u8>,
    pub meta: ImageMeta,
}

impl PixelImage {
    pub fn new(data: Array3<u8>, meta: ImageMeta) -> Result<Self> {
        let (height, width, channels) = data.dim();
        if height == 0 || width == 0 {
            return Err(CoreError::EmptyImage { width, height });
        }
        if !matches!(channels, 1 | 3 | 4) {
            return Err(CoreError::UnsupportedChannelCount { channels });
        }
        Ok(Self { data, meta })
    }

    pub fn width(&self) -> u32 {
        self.data.dim().1 as u32
    }

    pub fn height(&self) -> u32 {
        self.data.dim().0 as u32
    }

    pub fn channels(&self) -> usize {
        self.data.dim().2
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width(), self.height())
    }
}
