//! climafeed: NetCDF climate sample loading and batching
//!
//! A Rust library for preparing gridded climate simulation output for a
//! downstream prediction model. climafeed discovers per-timestep NetCDF
//! files in a directory, extracts a configured set of physical variables,
//! standardizes them per variable, and assembles independently loaded
//! samples into batches along the time axis. Labeled datasets additionally
//! carry a per-pixel class grid that stays aligned with the features under
//! randomized longitude-shift augmentation.
//!
//! ## Key Features
//!
//! - **Canonical axis order**: every sample comes out as
//!   `(time, variable, lat, lon)` regardless of on-disk dimension order
//! - **Per-variable standardization**: `(x - mean) / std` with statistics
//!   validated at configuration time
//! - **Label-synchronized augmentation**: one random longitude shift per
//!   access, applied identically to features and labels
//! - **Parallel batch loading**: sample indices fan out across Rayon
//!   worker threads
//! - **Structured errors**: every failure mode has a typed variant; the
//!   library never logs or recovers silently
//!
//! ## Module Organization
//!
//! - [`config`]: feature variables, normalization statistics, augmentation flag
//! - [`dataset`]: unlabeled and labeled sample datasets with batch collation
//! - [`augment`]: randomized circular longitude shifts
//! - [`netcdf_io`]: sample file reading and axis canonicalization
//! - [`metadata`]: sample file inspection and contract checking
//! - [`parallel`]: parallel processing configuration
//! - [`errors`]: centralized error handling
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use climafeed::prelude::*;
//!
//! let config = Config::from_file("config.json").unwrap();
//! let dataset = ClimateDataset::from_dir("./data/test", config).unwrap();
//!
//! // One normalized sample, shaped (time, variable, lat, lon)
//! let sample = dataset.get(0).unwrap();
//!
//! // A collated batch over the first four samples
//! let batch = dataset.load_batch(&[0, 1, 2, 3]).unwrap();
//! assert_eq!(batch.len_of(ndarray::Axis(1)), sample.len_of(ndarray::Axis(1)));
//! ```
//!
//! The library is designed to keep strict index correspondence between
//! features and labels and to stay safe under concurrent indexed access
//! from an external batching layer.

// Core modules
pub mod augment;
pub mod config;
pub mod dataset;
pub mod errors;
pub mod metadata;
pub mod netcdf_io;
pub mod parallel;

// CLI surface for the binary
pub mod cli;

// Direct re-exports for the public API
pub use augment::*;
pub use config::*;
pub use dataset::*;
pub use errors::*;
pub use metadata::*;
pub use netcdf_io::*;
pub use parallel::*;

// High-level convenience API
pub mod prelude {
    //! Commonly used imports for convenience
    pub use crate::augment::{draw_longitude_shift, shift_features, shift_labels};
    pub use crate::config::{Config, FieldStats};
    pub use crate::dataset::{ClimateDataset, LabeledClimateDataset, LabeledSample, SampleSource};
    pub use crate::errors::{ClimafeedError, Result};
    pub use crate::metadata::check_sample_contract;
    pub use crate::parallel::ParallelConfig;
}
