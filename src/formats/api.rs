use std::path::Path;

use image::{ImageBuffer, Luma, Rgb, Rgba};
use ndarray::ArrayView3;

use crate::model::{ImageFormat, PixelImage};

use super::raster::read_common_raster;
use super::tiff::read_tiff;
use super::util::extension;
use super::{IoError, Result};

/// Decodes an image file into a [`PixelImage`], dispatching on the file
/// extension. A failed decode leaves no partial state behind.
pub fn decode_image(path: impl AsRef<Path>) -> Result<PixelImage> {
    let path = path.as_ref();
    let extension = extension(path)?;
    match extension.as_str() {
        "png" => read_common_raster(path, ImageFormat::Png),
        "jpg" | "jpeg" => read_common_raster(path, ImageFormat::Jpeg),
        "bmp" => read_common_raster(path, ImageFormat::Bmp),
        "tif" | "tiff" => read_tiff(path),
        other => Err(IoError::UnsupportedFormat(other.to_string())),
    }
}

pub fn supported_formats() -> &'static [&'static str] {
    &["png", "jpg", "jpeg", "bmp", "tif", "tiff"]
}

/// Encodes an interleaved `[height, width, channels]` buffer as PNG.
pub fn write_png(path: impl AsRef<Path>, data: ArrayView3<'_, u8>) -> Result<()> {
    let path = path.as_ref();
    let (height, width, channels) = data.dim();
    let samples = data.iter().copied().collect::<Vec<_>>();
    match channels {
        1 => {
            let image = ImageBuffer::<Luma<u8>, _>::from_vec(width as u32, height as u32, samples)
                .ok_or_else(|| IoError::Undecodable("failed to construct gray image".into()))?;
            image.save(path)?;
        }
        3 => {
            let image = ImageBuffer::<Rgb<u8>, _>::from_vec(width as u32, height as u32, samples)
                .ok_or_else(|| IoError::Undecodable("failed to construct RGB image".into()))?;
            image.save(path)?;
        }
        4 => {
            let image = ImageBuffer::<Rgba<u8>, _>::from_vec(width as u32, height as u32, samples)
                .ok_or_else(|| IoError::Undecodable("failed to construct RGBA image".into()))?;
            image.save(path)?;
        }
        other => {
            return Err(IoError::Undecodable(format!(
                "PNG write expects 1, 3 or 4 channels, found {other}"
            )));
        }
    }
    Ok(())
}
