use std::fs::File;
use std::path::Path;

use crate::model::{ImageFormat, ImageMeta, PixelImage};
use ndarray::Array3;
use tiff::ColorType;
use tiff::decoder::{Decoder, DecodingResult};

use super::util::scale_u16_to_u8;
use super::{IoError, Result};

/// Reads the first page of a TIFF file. Gray and RGB(A) pages at 8 or 16
/// bits per sample are supported; 16-bit samples are scaled to 8.
pub(crate) fn read_tiff(path: &Path) -> Result<PixelImage> {
    let file = File::open(path)?;
    let mut decoder = Decoder::new(file)?;
    let (width, height) = decoder.dimensions()?;
    let channels = match decoder.colortype()? {
        ColorType::Gray(_) => 1usize,
        ColorType::RGB(_) => 3,
        ColorType::RGBA(_) => 4,
        other => {
            return Err(IoError::Undecodable(format!(
                "unsupported TIFF color type: {other:?}"
            )));
        }
    };

    let (samples, bit_depth) = match decoder.read_image()? {
        DecodingResult::U8(buffer) => (buffer, 8),
        DecodingResult::U16(buffer) => (
            buffer.into_iter().map(scale_u16_to_u8).collect::<Vec<_>>(),
            16,
        ),
        other => {
            return Err(IoError::Undecodable(format!(
                "unsupported TIFF sample type: {other:?}"
            )));
        }
    };

    let expected = width as usize * height as usize * channels;
    if samples.len() != expected {
        return Err(IoError::Undecodable(format!(
            "TIFF sample count {} does not match {width}x{height}x{channels}",
            samples.len()
        )));
    }

    let data = Array3::from_shape_vec((height as usize, width as usize, channels), samples)
        .expect("shape checked");
    Ok(PixelImage::new(
        data,
        ImageMeta::new(path, ImageFormat::Tiff, bit_depth),
    )?)
}
