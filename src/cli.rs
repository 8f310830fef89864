//! Defines command-line interface options using `clap` for the climafeed binary.

use clap::Parser;
use std::path::PathBuf;

/// A CLI tool for inspecting and batching NetCDF climate sample directories
#[derive(Parser, Debug)]
#[command(
    version,
    name = "climafeed",
    about = "Load, normalize and batch NetCDF climate samples"
)]
pub struct Args {
    /// Directory containing one .nc sample file per timestep
    #[arg(short, long)]
    pub data_dir: PathBuf,

    /// Path to the JSON configuration with fields and the augmentation flag
    #[arg(short, long)]
    pub config: PathBuf,

    /// Treat the directory as labeled (every file must carry LABELS)
    #[arg(short, long, default_value_t = false)]
    pub labeled: bool,

    /// List the sample files discovered in the directory
    #[arg(long)]
    pub list_files: bool,

    /// Describe the sample file at the given index and check it against the configuration
    #[arg(long)]
    pub describe: Option<usize>,

    /// Load a single sample and print its shape and summary statistics
    #[arg(short, long)]
    pub index: Option<usize>,

    /// Load the first N samples in parallel and collate them into one batch
    #[arg(short, long)]
    pub batch: Option<usize>,

    /// Number of threads to use for parallel batch loading. Defaults to number of CPU cores.
    #[arg(short = 't', long)]
    pub threads: Option<usize>,
}
