use std::path::PathBuf;
use std::str::FromStr;

use clap::{Parser, Subcommand};
use serde::Serialize;

#[derive(Debug, Parser)]
#[command(
    name = "gridlens",
    version,
    about = "Side-by-side image comparison with a shared magnified region"
)]
pub(super) struct Cli {
    #[command(subcommand)]
    pub(super) command: Commands,
}

#[derive(Debug, Subcommand)]
pub(super) enum Commands {
    /// Prints decoded image metadata as JSON.
    Info { input: PathBuf },
    /// Projects a region given in the first image's pixel space into every
    /// input and writes one magnified preview PNG per image.
    Extract {
        /// Region as x,y,width,height in the first image's pixels.
        #[arg(long)]
        region: RegionArg,
        /// Preview size for the longest edge, 64-512.
        #[arg(long, default_value_t = 192)]
        size: u32,
        #[arg(long)]
        out_dir: PathBuf,
        #[arg(required = true, num_args = 2..=4)]
        inputs: Vec<PathBuf>,
    },
    /// Launches the comparison window with up to four images preloaded.
    View {
        #[arg(num_args = 0..=4)]
        inputs: Vec<PathBuf>,
        /// Viewer configuration file (YAML or JSON).
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, Copy)]
pub(super) struct RegionArg {
    pub(super) x: u32,
    pub(super) y: u32,
    pub(super) width: u32,
    pub(super) height: u32,
}

impl FromStr for RegionArg {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let parts = value
            .split(',')
            .map(|part| part.trim().parse::<u32>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|error| format!("region must be x,y,width,height: {error}"))?;
        let [x, y, width, height] = parts.as_slice() else {
            return Err(format!(
                "region must have exactly four components, found {}",
                parts.len()
            ));
        };
        Ok(Self {
            x: *x,
            y: *y,
            width: *width,
            height: *height,
        })
    }
}

#[derive(Debug, Serialize)]
pub(super) struct ImageInfo {
    pub(super) path: String,
    pub(super) width: u32,
    pub(super) height: u32,
    pub(super) channels: usize,
    pub(super) format: String,
    pub(super) bit_depth: u8,
}

#[derive(Debug, Serialize)]
pub(super) struct ExtractReport {
    pub(super) reference: String,
    pub(super) region: [u32; 4],
    pub(super) preview_size: u32,
    pub(super) outputs: Vec<ExtractEntry>,
}

#[derive(Debug, Serialize)]
pub(super) struct ExtractEntry {
    pub(super) input: String,
    pub(super) region: Option<[u32; 4]>,
    pub(super) output: Option<String>,
}
