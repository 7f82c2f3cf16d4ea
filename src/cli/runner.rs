use std::fs;
use std::path::{Path, PathBuf};

use clap::Parser;

use crate::compare::{
    MAX_PREVIEW_SIZE, MIN_PREVIEW_SIZE, PreviewRenderer, ResamplePolicy, reproject,
};
use crate::formats::{decode_image, write_png};
use crate::model::{ImageSlot, PixelRect, SlotId};
use crate::runtime::ViewerConfig;

use super::types::{Cli, Commands, ExtractEntry, ExtractReport, ImageInfo, RegionArg};

pub fn run_cli() -> Result<(), String> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Info { input } => {
            let image = decode_image(&input).map_err(|error| error.to_string())?;
            let info = ImageInfo {
                path: input.display().to_string(),
                width: image.width(),
                height: image.height(),
                channels: image.channels(),
                format: image.meta.format.label().to_string(),
                bit_depth: image.meta.bit_depth,
            };
            println!(
                "{}",
                serde_json::to_string_pretty(&info).map_err(|error| error.to_string())?
            );
        }
        Commands::Extract {
            region,
            size,
            out_dir,
            inputs,
        } => {
            let report = run_extract(region, size, &out_dir, &inputs)?;
            println!(
                "{}",
                serde_json::to_string_pretty(&report).map_err(|error| error.to_string())?
            );
        }
        Commands::View { inputs, config } => {
            let config = match config {
                Some(path) => Some(ViewerConfig::load(&path).map_err(|error| error.to_string())?),
                None => None,
            };
            crate::ui::run(inputs, config)?;
        }
    }

    Ok(())
}

fn run_extract(
    region: RegionArg,
    size: u32,
    out_dir: &Path,
    inputs: &[PathBuf],
) -> Result<ExtractReport, String> {
    let size = size.clamp(MIN_PREVIEW_SIZE, MAX_PREVIEW_SIZE);

    let mut slots = Vec::with_capacity(inputs.len());
    for (index, path) in inputs.iter().enumerate() {
        let image = decode_image(path).map_err(|error| format!("{}: {error}", path.display()))?;
        slots.push((SlotId(index), ImageSlot::new(image)));
    }

    let reference_dims = slots[0].1.dimensions();
    let canonical = PixelRect::new(region.x, region.y, region.width, region.height)
        .clamped_to(reference_dims.0, reference_dims.1);
    if canonical.is_empty() {
        return Err(format!(
            "region {},{},{},{} lies outside the reference image",
            region.x, region.y, region.width, region.height
        ));
    }

    let regions: Vec<Option<PixelRect>> = slots
        .iter()
        .map(|(slot, state)| {
            if slot.0 == 0 {
                Some(canonical)
            } else {
                reproject(canonical, reference_dims, state.dimensions())
            }
        })
        .collect();

    fs::create_dir_all(out_dir).map_err(|error| error.to_string())?;

    let items: Vec<_> = slots
        .iter()
        .zip(&regions)
        .map(|((slot, state), region)| (*slot, state, *region))
        .collect();
    let mut renderer = PreviewRenderer::default();
    let previews = renderer.render_pass(&items, size, ResamplePolicy::Auto);

    let mut outputs = Vec::with_capacity(inputs.len());
    for ((slot, _), (path, region)) in slots.iter().zip(inputs.iter().zip(&regions)) {
        let entry = match region {
            Some(rect) => {
                let stem = path
                    .file_stem()
                    .and_then(|stem| stem.to_str())
                    .unwrap_or("image");
                let output = out_dir.join(format!("{:02}_{stem}_region.png", slot.0 + 1));
                write_png(&output, previews[slot].data.view())
                    .map_err(|error| error.to_string())?;
                ExtractEntry {
                    input: path.display().to_string(),
                    region: Some([rect.x, rect.y, rect.width, rect.height]),
                    output: Some(output.display().to_string()),
                }
            }
            None => ExtractEntry {
                input: path.display().to_string(),
                region: None,
                output: None,
            },
        };
        outputs.push(entry);
    }

    Ok(ExtractReport {
        reference: inputs[0].display().to_string(),
        region: [canonical.x, canonical.y, canonical.width, canonical.height],
        preview_size: size,
        outputs,
    })
}
