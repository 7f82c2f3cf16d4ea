use std::path::Path;

use crate::model::{ImageFormat, ImageMeta, PixelImage};
use image::DynamicImage;
use ndarray::Array3;

use super::Result;
use super::util::scale_u16_to_u8;

pub(crate) fn read_common_raster(path: &Path, format: ImageFormat) -> Result<PixelImage> {
    let image = image::open(path)?;
    let (pixels, height, width, channels, bit_depth) = match image {
        DynamicImage::ImageLuma8(buffer) => {
            let (width, height) = buffer.dimensions();
            (buffer.into_raw(), height, width, 1, 8)
        }
        DynamicImage::ImageRgb8(buffer) => {
            let (width, height) = buffer.dimensions();
            (buffer.into_raw(), height, width, 3, 8)
        }
        DynamicImage::ImageRgba8(buffer) => {
            let (width, height) = buffer.dimensions();
            (buffer.into_raw(), height, width, 4, 8)
        }
        DynamicImage::ImageLuma16(buffer) => {
            let (width, height) = buffer.dimensions();
            let samples = buffer.into_raw().into_iter().map(scale_u16_to_u8).collect();
            (samples, height, width, 1, 16)
        }
        DynamicImage::ImageRgb16(buffer) => {
            let (width, height) = buffer.dimensions();
            let samples = buffer.into_raw().into_iter().map(scale_u16_to_u8).collect();
            (samples, height, width, 3, 16)
        }
        DynamicImage::ImageRgba16(buffer) => {
            let (width, height) = buffer.dimensions();
            let samples = buffer.into_raw().into_iter().map(scale_u16_to_u8).collect();
            (samples, height, width, 4, 16)
        }
        other => {
            let buffer = other.to_rgb8();
            let (width, height) = buffer.dimensions();
            (buffer.into_raw(), height, width, 3, 8)
        }
    };

    let data = Array3::from_shape_vec((height as usize, width as usize, channels), pixels)
        .expect("shape checked");
    Ok(PixelImage::new(
        data,
        ImageMeta::new(path, format, bit_depth),
    )?)
}
