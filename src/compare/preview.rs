use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use ndarray::parallel::prelude::*;
use ndarray::{Array3, ArrayView3, ArrayViewMut2, Axis, s};
use serde::{Deserialize, Serialize};

use crate::model::{ImageSlot, PixelImage, PixelRect, SlotId};

pub const MIN_PREVIEW_SIZE: u32 = 64;
pub const MAX_PREVIEW_SIZE: u32 = 512;

const PLACEHOLDER_SQUARE: usize = 8;
const PLACEHOLDER_DARK: u8 = 0x2f;
const PLACEHOLDER_LIGHT: u8 = 0x3d;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum ResamplePolicy {
    /// Nearest when every slot magnifies its region, bilinear otherwise.
    #[default]
    Auto,
    Nearest,
    Bilinear,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResampleKernel {
    Nearest,
    Bilinear,
}

/// A magnified rendering of one slot's projected region, or the placeholder
/// tile when the region is empty. Derived data; recomputed, never persisted.
#[derive(Debug, Clone)]
pub struct Preview {
    pub data: Array3<u8>,
    pub placeholder: bool,
}

impl Preview {
    pub fn dimensions(&self) -> (u32, u32) {
        let (height, width, _) = self.data.dim();
        (width as u32, height as u32)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct CacheKey {
    version: u64,
    region: Option<PixelRect>,
    size: u32,
    kernel: ResampleKernel,
}

/// Crops and resamples every slot's region in one pass. One kernel
/// resolution applies to the whole pass, so all slots are resampled the
/// same way and the side-by-side comparison stays fair.
#[derive(Debug, Default)]
pub struct PreviewRenderer {
    cache: HashMap<SlotId, (CacheKey, Arc<Preview>)>,
}

impl PreviewRenderer {
    pub fn render_pass(
        &mut self,
        slots: &[(SlotId, &ImageSlot, Option<PixelRect>)],
        size: u32,
        policy: ResamplePolicy,
    ) -> BTreeMap<SlotId, Arc<Preview>> {
        let size = size.clamp(MIN_PREVIEW_SIZE, MAX_PREVIEW_SIZE);
        let kernel = resolve_kernel(policy, slots, size);

        let mut previews = BTreeMap::new();
        for (slot, image_slot, region) in slots {
            let key = CacheKey {
                version: image_slot.version,
                region: *region,
                size,
                kernel,
            };
            let preview = match self.cache.get(slot) {
                Some((cached_key, cached)) if *cached_key == key => cached.clone(),
                _ => {
                    let rendered = Arc::new(match region {
                        Some(region) => render_region(&image_slot.image, *region, size, kernel),
                        None => placeholder_tile(size),
                    });
                    self.cache.insert(*slot, (key, rendered.clone()));
                    rendered
                }
            };
            previews.insert(*slot, preview);
        }
        self.cache.retain(|slot, _| previews.contains_key(slot));
        previews
    }
}

fn resolve_kernel(
    policy: ResamplePolicy,
    slots: &[(SlotId, &ImageSlot, Option<PixelRect>)],
    size: u32,
) -> ResampleKernel {
    match policy {
        ResamplePolicy::Nearest => ResampleKernel::Nearest,
        ResamplePolicy::Bilinear => ResampleKernel::Bilinear,
        ResamplePolicy::Auto => {
            for (_, _, region) in slots {
                let Some(region) = region else { continue };
                let (out_width, out_height) = output_dimensions(*region, size);
                if out_width < region.width || out_height < region.height {
                    return ResampleKernel::Bilinear;
                }
            }
            ResampleKernel::Nearest
        }
    }
}

/// Region aspect ratio is preserved; the longest edge gets the full
/// preview size.
fn output_dimensions(region: PixelRect, size: u32) -> (u32, u32) {
    if region.width >= region.height {
        let height = (size as f32 * region.height as f32 / region.width as f32)
            .round()
            .max(1.0) as u32;
        (size, height)
    } else {
        let width = (size as f32 * region.width as f32 / region.height as f32)
            .round()
            .max(1.0) as u32;
        (width, size)
    }
}

fn render_region(image: &PixelImage, region: PixelRect, size: u32, kernel: ResampleKernel) -> Preview {
    let region = region.clamped_to(image.width(), image.height());
    if region.is_empty() {
        return placeholder_tile(size);
    }
    let crop = image.data.slice(s![
        region.y as usize..region.bottom() as usize,
        region.x as usize..region.right() as usize,
        ..
    ]);
    let (out_width, out_height) = output_dimensions(region, size);
    let channels = image.channels();
    let scale_x = region.width as f32 / out_width as f32;
    let scale_y = region.height as f32 / out_height as f32;

    let mut data = Array3::zeros((out_height as usize, out_width as usize, channels));
    data.axis_iter_mut(Axis(0))
        .into_par_iter()
        .enumerate()
        .for_each(|(row_index, mut row)| match kernel {
            ResampleKernel::Nearest => sample_row_nearest(&crop, row_index, scale_x, scale_y, &mut row),
            ResampleKernel::Bilinear => {
                sample_row_bilinear(&crop, row_index, scale_x, scale_y, &mut row)
            }
        });

    Preview {
        data,
        placeholder: false,
    }
}

fn sample_row_nearest(
    crop: &ArrayView3<'_, u8>,
    row_index: usize,
    scale_x: f32,
    scale_y: f32,
    row: &mut ArrayViewMut2<'_, u8>,
) {
    let (crop_height, crop_width, channels) = crop.dim();
    let sy = (((row_index as f32 + 0.5) * scale_y) as usize).min(crop_height - 1);
    for ox in 0..row.dim().0 {
        let sx = (((ox as f32 + 0.5) * scale_x) as usize).min(crop_width - 1);
        for channel in 0..channels {
            row[[ox, channel]] = crop[[sy, sx, channel]];
        }
    }
}

fn sample_row_bilinear(
    crop: &ArrayView3<'_, u8>,
    row_index: usize,
    scale_x: f32,
    scale_y: f32,
    row: &mut ArrayViewMut2<'_, u8>,
) {
    let (crop_height, crop_width, channels) = crop.dim();
    let fy = ((row_index as f32 + 0.5) * scale_y - 0.5).clamp(0.0, (crop_height - 1) as f32);
    let y0 = fy.floor() as usize;
    let y1 = (y0 + 1).min(crop_height - 1);
    let ty = fy - y0 as f32;

    for ox in 0..row.dim().0 {
        let fx = ((ox as f32 + 0.5) * scale_x - 0.5).clamp(0.0, (crop_width - 1) as f32);
        let x0 = fx.floor() as usize;
        let x1 = (x0 + 1).min(crop_width - 1);
        let tx = fx - x0 as f32;

        for channel in 0..channels {
            let top = crop[[y0, x0, channel]] as f32 * (1.0 - tx)
                + crop[[y0, x1, channel]] as f32 * tx;
            let bottom = crop[[y1, x0, channel]] as f32 * (1.0 - tx)
                + crop[[y1, x1, channel]] as f32 * tx;
            row[[ox, channel]] = (top * (1.0 - ty) + bottom * ty).round() as u8;
        }
    }
}

fn placeholder_tile(size: u32) -> Preview {
    let size = size as usize;
    let mut data = Array3::zeros((size, size, 1));
    for y in 0..size {
        for x in 0..size {
            let even = (x / PLACEHOLDER_SQUARE + y / PLACEHOLDER_SQUARE) % 2 == 0;
            data[[y, x, 0]] = if even { PLACEHOLDER_LIGHT } else { PLACEHOLDER_DARK };
        }
    }
    Preview {
        data,
        placeholder: true,
    }
}
