//! Centralized error handling for climafeed
//!
//! This module provides structured error types for every failure mode of the
//! loading pipeline, enabling better error context and type safety than a
//! generic `Box<dyn Error>`.

use std::fmt;
use std::path::PathBuf;

/// Main error type for climafeed operations
#[derive(Debug)]
pub enum ClimafeedError {
    /// NetCDF file operation errors
    NetCDFError(netcdf::Error),

    /// I/O operation errors
    IoError(std::io::Error),

    /// Array shape or dimension error
    ArrayError(ndarray::ShapeError),

    /// Sample directory does not exist or cannot be listed
    DirectoryNotFound { path: PathBuf },

    /// Invalid configuration (bad statistics, empty or duplicate fields, malformed file)
    ConfigError { message: String },

    /// A sample file could not be opened or decoded
    FileLoadError {
        path: PathBuf,
        source: netcdf::Error,
    },

    /// Variable not found in a sample file
    VariableNotFound { var: String },

    /// Dimension not found in variable
    DimensionNotFound { var: String, dim: String },

    /// Sample index outside the dataset
    IndexOutOfRange { index: usize, length: usize },

    /// Inconsistent array extents across a batch or within a sample
    ShapeMismatch { message: String },

    /// Thread pool configuration error
    ThreadPoolError(String),
}

impl fmt::Display for ClimafeedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClimafeedError::NetCDFError(e) => write!(f, "NetCDF error: {}", e),
            ClimafeedError::IoError(e) => write!(f, "I/O error: {}", e),
            ClimafeedError::ArrayError(e) => write!(f, "Array error: {}", e),
            ClimafeedError::DirectoryNotFound { path } => {
                write!(f, "Sample directory '{}' not found", path.display())
            }
            ClimafeedError::ConfigError { message } => {
                write!(f, "Configuration error: {}", message)
            }
            ClimafeedError::FileLoadError { path, source } => {
                write!(
                    f,
                    "Failed to load sample file '{}': {}",
                    path.display(),
                    source
                )
            }
            ClimafeedError::VariableNotFound { var } => {
                write!(f, "Variable '{}' not found in file", var)
            }
            ClimafeedError::DimensionNotFound { var, dim } => {
                write!(f, "Dimension '{}' not found in variable '{}'", dim, var)
            }
            ClimafeedError::IndexOutOfRange { index, length } => {
                write!(
                    f,
                    "Sample index {} out of range for dataset of length {}",
                    index, length
                )
            }
            ClimafeedError::ShapeMismatch { message } => {
                write!(f, "Shape mismatch: {}", message)
            }
            ClimafeedError::ThreadPoolError(msg) => write!(f, "Thread pool error: {}", msg),
        }
    }
}

impl std::error::Error for ClimafeedError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ClimafeedError::NetCDFError(e) => Some(e),
            ClimafeedError::IoError(e) => Some(e),
            ClimafeedError::ArrayError(e) => Some(e),
            ClimafeedError::FileLoadError { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<netcdf::Error> for ClimafeedError {
    fn from(error: netcdf::Error) -> Self {
        ClimafeedError::NetCDFError(error)
    }
}

impl From<std::io::Error> for ClimafeedError {
    fn from(error: std::io::Error) -> Self {
        ClimafeedError::IoError(error)
    }
}

impl From<ndarray::ShapeError> for ClimafeedError {
    fn from(error: ndarray::ShapeError) -> Self {
        ClimafeedError::ArrayError(error)
    }
}

/// Result type alias for climafeed operations
pub type Result<T> = std::result::Result<T, ClimafeedError>;
