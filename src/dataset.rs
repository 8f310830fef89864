//! Sample datasets over directories of NetCDF grid files
//!
//! A dataset is a directory holding one grid file per timestep. Construction
//! takes a fixed snapshot of the directory: the `.nc` files are listed,
//! lexicographically sorted, and the resulting list never changes, so sample
//! indices stay stable for the lifetime of the dataset.
//!
//! [`ClimateDataset`] yields normalized feature arrays in canonical
//! `(time, variable, lat, lon)` order. [`LabeledClimateDataset`] wraps it and
//! additionally yields the per-pixel `LABELS` grid, applying the randomized
//! longitude-shift augmentation to both when enabled.
//!
//! Sources hold no mutable state, so one instance can serve concurrent
//! `get` calls from an external batching layer.

use crate::augment::{draw_longitude_shift, shift_features, shift_labels};
use crate::config::Config;
use crate::errors::{ClimafeedError, Result};
use crate::netcdf_io::{open_sample, read_labels, read_variable_grid, SAMPLE_EXTENSION};
use ndarray::{concatenate, stack, Array3, Array4, Axis};
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};

/// A labeled sample: normalized features and the aligned class grid.
pub type LabeledSample = (Array4<f32>, Array3<i32>);

/// Indexed access and batch assembly over independently loaded samples.
///
/// Implementations must be `Send + Sync` so an external loading layer can
/// fan indices out across worker threads against a shared source.
pub trait SampleSource: Send + Sync {
    /// What one indexed access yields.
    type Item: Send;

    /// Number of samples; fixed at construction.
    fn len(&self) -> usize;

    /// Whether the dataset holds no samples.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Load the sample at `index`. Each call produces a fresh value owned by
    /// the caller.
    fn get(&self, index: usize) -> Result<Self::Item>;

    /// Concatenate previously loaded samples along the time axis, in input
    /// order.
    fn collate(&self, batch: Vec<Self::Item>) -> Result<Self::Item>;
}

/// Unlabeled climate dataset: feature extraction and normalization only.
#[derive(Debug, Clone)]
pub struct ClimateDataset {
    dir: PathBuf,
    files: Vec<String>,
    config: Config,
}

impl ClimateDataset {
    /// Snapshot `dir` into a dataset: list it, keep `.nc` files, sort.
    ///
    /// # Errors
    ///
    /// Returns `DirectoryNotFound` if `dir` does not exist or cannot be
    /// listed.
    pub fn from_dir(dir: impl Into<PathBuf>, config: Config) -> Result<Self> {
        let dir = dir.into();
        let entries = fs::read_dir(&dir).map_err(|_| ClimafeedError::DirectoryNotFound {
            path: dir.clone(),
        })?;

        let mut files = Vec::new();
        for entry in entries {
            let entry = entry?;
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            if path.extension().and_then(|e| e.to_str()) != Some(SAMPLE_EXTENSION) {
                continue;
            }
            if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                files.push(name.to_string());
            }
        }
        files.sort();

        Ok(Self { dir, files, config })
    }

    /// Number of sample files.
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Whether the directory held no sample files.
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// The sorted sample file names; index `i` of this list is sample `i`.
    pub fn files(&self) -> &[String] {
        &self.files
    }

    /// The configuration this dataset extracts and normalizes with.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The directory the dataset was constructed over.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Full path of sample `index`, bounds-checked.
    fn sample_path(&self, index: usize) -> Result<PathBuf> {
        let name = self
            .files
            .get(index)
            .ok_or(ClimafeedError::IndexOutOfRange {
                index,
                length: self.files.len(),
            })?;
        Ok(self.dir.join(name))
    }

    /// Standardize a feature array in place: per configured field, in order,
    /// `(x - mean) / std` on that variable's sub-view.
    ///
    /// # Errors
    ///
    /// Returns `ShapeMismatch` if the variable axis extent does not equal
    /// the configured field count.
    pub fn normalize(&self, features: &mut Array4<f32>) -> Result<()> {
        let num_vars = features.len_of(Axis(1));
        if num_vars != self.config.num_fields() {
            return Err(ClimafeedError::ShapeMismatch {
                message: format!(
                    "variable axis has extent {}, expected {} configured fields",
                    num_vars,
                    self.config.num_fields()
                ),
            });
        }

        for (var_index, (_, stats)) in self.config.fields().iter().enumerate() {
            let mean = stats.mean as f32;
            let std = stats.std as f32;
            features
                .index_axis_mut(Axis(1), var_index)
                .mapv_inplace(|x| (x - mean) / std);
        }

        Ok(())
    }

    /// Extract the configured variables from an open sample file as one
    /// normalized `(time, variable, lat, lon)` array.
    ///
    /// The variable axis follows configuration order exactly; variables in
    /// the file but not in the configuration are ignored. The canonical axis
    /// order is enforced regardless of how the file stores its dimensions.
    ///
    /// # Errors
    ///
    /// Returns `VariableNotFound` if a configured variable is absent from
    /// the file and `ShapeMismatch` if the variables disagree on extents.
    pub fn get_features(&self, file: &netcdf::File) -> Result<Array4<f32>> {
        let mut grids: Vec<Array3<f32>> = Vec::with_capacity(self.config.num_fields());
        for (name, _) in self.config.fields() {
            let grid = read_variable_grid(file, name)?;
            if let Some(first) = grids.first() {
                if first.dim() != grid.dim() {
                    return Err(ClimafeedError::ShapeMismatch {
                        message: format!(
                            "variable '{}' has shape {:?}, other variables have {:?}",
                            name,
                            grid.shape(),
                            first.shape()
                        ),
                    });
                }
            }
            grids.push(grid);
        }

        let views: Vec<_> = grids.iter().map(|g| g.view()).collect();
        // (variable, time, lat, lon) -> (time, variable, lat, lon)
        let stacked = stack(Axis(0), &views)?;
        let mut features = stacked
            .permuted_axes([1, 0, 2, 3])
            .as_standard_layout()
            .to_owned();

        self.normalize(&mut features)?;
        Ok(features)
    }

    /// Load sample `index` as a normalized feature array.
    ///
    /// # Errors
    ///
    /// Returns `IndexOutOfRange` for a bad index, `FileLoadError` if the
    /// file cannot be opened, and the [`ClimateDataset::get_features`]
    /// errors otherwise.
    pub fn get(&self, index: usize) -> Result<Array4<f32>> {
        let path = self.sample_path(index)?;
        let file = open_sample(&path)?;
        self.get_features(&file)
    }

    /// Concatenate feature arrays along the time axis, in input order.
    ///
    /// # Errors
    ///
    /// Returns `ShapeMismatch` on an empty batch or if any two samples
    /// disagree on `variable`, `lat` or `lon` extent.
    pub fn collate(batch: &[Array4<f32>]) -> Result<Array4<f32>> {
        let first = batch.first().ok_or_else(|| ClimafeedError::ShapeMismatch {
            message: "cannot collate an empty batch".to_string(),
        })?;

        let (_, vars, lat, lon) = first.dim();
        for sample in &batch[1..] {
            let (_, s_vars, s_lat, s_lon) = sample.dim();
            if (s_vars, s_lat, s_lon) != (vars, lat, lon) {
                return Err(ClimafeedError::ShapeMismatch {
                    message: format!(
                        "sample extents (variable={}, lat={}, lon={}) disagree with (variable={}, lat={}, lon={})",
                        s_vars, s_lat, s_lon, vars, lat, lon
                    ),
                });
            }
        }

        let views: Vec<_> = batch.iter().map(|s| s.view()).collect();
        Ok(concatenate(Axis(0), &views)?)
    }

    /// Load `indices` in parallel with Rayon and collate the results.
    ///
    /// Any single failed load fails the whole batch; nothing is skipped.
    pub fn load_batch(&self, indices: &[usize]) -> Result<Array4<f32>> {
        let samples: Vec<Array4<f32>> = indices
            .par_iter()
            .map(|&index| self.get(index))
            .collect::<Result<_>>()?;
        Self::collate(&samples)
    }
}

impl SampleSource for ClimateDataset {
    type Item = Array4<f32>;

    fn len(&self) -> usize {
        ClimateDataset::len(self)
    }

    fn get(&self, index: usize) -> Result<Self::Item> {
        ClimateDataset::get(self, index)
    }

    fn collate(&self, batch: Vec<Self::Item>) -> Result<Self::Item> {
        ClimateDataset::collate(&batch)
    }
}

/// Labeled climate dataset: features plus the co-located `LABELS` grid.
///
/// Wraps a [`ClimateDataset`]; extraction and normalization are delegated
/// unchanged. When the configuration enables augmentation, every access
/// draws one longitude shift and applies it to both the features and the
/// labels, keeping them pixel-aligned. With augmentation disabled no random
/// draw happens at all, so seeded runs stay reproducible.
#[derive(Debug, Clone)]
pub struct LabeledClimateDataset {
    inner: ClimateDataset,
}

impl LabeledClimateDataset {
    /// Snapshot `dir` into a labeled dataset. See [`ClimateDataset::from_dir`].
    pub fn from_dir(dir: impl Into<PathBuf>, config: Config) -> Result<Self> {
        Ok(Self {
            inner: ClimateDataset::from_dir(dir, config)?,
        })
    }

    /// Number of sample files.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Whether the directory held no sample files.
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// The sorted sample file names.
    pub fn files(&self) -> &[String] {
        self.inner.files()
    }

    /// The configuration this dataset extracts and normalizes with.
    pub fn config(&self) -> &Config {
        self.inner.config()
    }

    /// The underlying unlabeled dataset.
    pub fn as_unlabeled(&self) -> &ClimateDataset {
        &self.inner
    }

    /// Extract normalized features and the label grid, shifted together by
    /// one freshly drawn longitude shift.
    ///
    /// The single draw governs both grids; features and labels can never
    /// desynchronize.
    ///
    /// # Errors
    ///
    /// As [`ClimateDataset::get_features`], plus `VariableNotFound` if the
    /// file carries no `LABELS` variable.
    pub fn get_features_and_labels(&self, file: &netcdf::File) -> Result<LabeledSample> {
        let mut features = self.inner.get_features(file)?;

        let shift = draw_longitude_shift();
        shift_features(&mut features, shift);

        let mut labels = read_labels(file)?;
        shift_labels(&mut labels, shift);

        Ok((features, labels))
    }

    /// Load sample `index` as a `(features, labels)` pair.
    ///
    /// With augmentation enabled this is [`Self::get_features_and_labels`];
    /// with it disabled the raw labels accompany the normalized features and
    /// no shift is drawn.
    pub fn get(&self, index: usize) -> Result<LabeledSample> {
        let path = self.inner.sample_path(index)?;
        let file = open_sample(&path)?;

        if self.inner.config().augment {
            self.get_features_and_labels(&file)
        } else {
            let features = self.inner.get_features(&file)?;
            let labels = read_labels(&file)?;
            Ok((features, labels))
        }
    }

    /// Concatenate `(features, labels)` pairs along the time axis.
    ///
    /// Features and labels are concatenated separately but in the same input
    /// order, so index `i` of the collated features still lines up with
    /// index `i` of the collated labels.
    ///
    /// # Errors
    ///
    /// Returns `ShapeMismatch` on an empty batch or inconsistent extents on
    /// either side of the pairs.
    pub fn collate(batch: &[LabeledSample]) -> Result<LabeledSample> {
        let (first_features, first_labels) =
            batch.first().ok_or_else(|| ClimafeedError::ShapeMismatch {
                message: "cannot collate an empty batch".to_string(),
            })?;

        let (_, vars, lat, lon) = first_features.dim();
        let (_, label_lat, label_lon) = first_labels.dim();
        for (features, labels) in &batch[1..] {
            let (_, s_vars, s_lat, s_lon) = features.dim();
            if (s_vars, s_lat, s_lon) != (vars, lat, lon) {
                return Err(ClimafeedError::ShapeMismatch {
                    message: format!(
                        "feature extents (variable={}, lat={}, lon={}) disagree with (variable={}, lat={}, lon={})",
                        s_vars, s_lat, s_lon, vars, lat, lon
                    ),
                });
            }
            let (_, l_lat, l_lon) = labels.dim();
            if (l_lat, l_lon) != (label_lat, label_lon) {
                return Err(ClimafeedError::ShapeMismatch {
                    message: format!(
                        "label extents (lat={}, lon={}) disagree with (lat={}, lon={})",
                        l_lat, l_lon, label_lat, label_lon
                    ),
                });
            }
        }

        let feature_views: Vec<_> = batch.iter().map(|(f, _)| f.view()).collect();
        let label_views: Vec<_> = batch.iter().map(|(_, l)| l.view()).collect();

        let features = concatenate(Axis(0), &feature_views)?;
        let labels = concatenate(Axis(0), &label_views)?;
        Ok((features, labels))
    }

    /// Load `indices` in parallel with Rayon and collate the pairs.
    ///
    /// Augmentation draws happen on the worker threads, one independent draw
    /// per sample.
    pub fn load_batch(&self, indices: &[usize]) -> Result<LabeledSample> {
        let pairs: Vec<LabeledSample> = indices
            .par_iter()
            .map(|&index| self.get(index))
            .collect::<Result<_>>()?;
        Self::collate(&pairs)
    }
}

impl SampleSource for LabeledClimateDataset {
    type Item = LabeledSample;

    fn len(&self) -> usize {
        LabeledClimateDataset::len(self)
    }

    fn get(&self, index: usize) -> Result<Self::Item> {
        LabeledClimateDataset::get(self, index)
    }

    fn collate(&self, batch: Vec<Self::Item>) -> Result<Self::Item> {
        LabeledClimateDataset::collate(&batch)
    }
}
