//! NetCDF sample file I/O
//!
//! This module reads one timestep's grid file into memory: opening the file,
//! pulling a named variable out as a canonical `(time, lat, lon)` array, and
//! reading the co-located label grid. The canonical axis order is enforced
//! here with an explicit permutation, so callers never see the file's native
//! dimension order. Variables stored without a `time` dimension gain a unit
//! time axis.

use crate::errors::{ClimafeedError, Result};
use ndarray::{Array3, ArrayD, Axis, Ix2, Ix3};
use netcdf::File;
use std::path::Path;

/// Name of the label variable required in labeled sample files
pub const LABELS_VARIABLE: &str = "LABELS";

/// Canonical dimension names of a sample grid
pub const TIME_DIM: &str = "time";
pub const LAT_DIM: &str = "lat";
pub const LON_DIM: &str = "lon";

/// File extension marking a sample file
pub const SAMPLE_EXTENSION: &str = "nc";

/// Open one sample file for reading.
///
/// # Errors
///
/// Returns a `FileLoadError` carrying the path if the file is missing,
/// unreadable, or not valid NetCDF.
pub fn open_sample(path: &Path) -> Result<File> {
    netcdf::open(path).map_err(|source| ClimafeedError::FileLoadError {
        path: path.to_path_buf(),
        source,
    })
}

/// Read one feature variable as a `(time, lat, lon)` array of `f32`.
///
/// The variable must have dimensions `(lat, lon)` or some permutation of
/// `(time, lat, lon)`; 2-D variables gain a time axis of extent 1.
///
/// # Errors
///
/// Returns `VariableNotFound` if the variable is absent,
/// `DimensionNotFound` if `lat` or `lon` is missing, and `ShapeMismatch`
/// for any other dimensionality.
pub fn read_variable_grid(file: &File, var_name: &str) -> Result<Array3<f32>> {
    let var = lookup_variable(file, var_name)?;
    let (dim_names, shape) = dims_and_shape(&var);

    let values = var.get_values::<f32, _>(..)?;
    let data = ArrayD::from_shape_vec(shape, values)?;

    to_time_lat_lon(var_name, &dim_names, data)
}

/// Read the label grid as a `(time, lat, lon)` array of integer classes.
///
/// # Errors
///
/// Returns `VariableNotFound` if the file carries no `LABELS` variable;
/// otherwise as [`read_variable_grid`].
pub fn read_labels(file: &File) -> Result<Array3<i32>> {
    let var = lookup_variable(file, LABELS_VARIABLE)?;
    let (dim_names, shape) = dims_and_shape(&var);

    let values = var.get_values::<i32, _>(..)?;
    let data = ArrayD::from_shape_vec(shape, values)?;

    to_time_lat_lon(LABELS_VARIABLE, &dim_names, data)
}

fn lookup_variable<'f>(file: &'f File, var_name: &str) -> Result<netcdf::Variable<'f>> {
    file.variable(var_name)
        .ok_or_else(|| ClimafeedError::VariableNotFound {
            var: var_name.to_string(),
        })
}

fn dims_and_shape(var: &netcdf::Variable<'_>) -> (Vec<String>, Vec<usize>) {
    let dim_names: Vec<String> = var
        .dimensions()
        .iter()
        .map(|d| d.name().to_string())
        .collect();

    let shape: Vec<usize> = var
        .dimensions()
        .iter()
        .map(netcdf::Dimension::len)
        .collect();

    (dim_names, shape)
}

/// Permute an on-disk array into canonical `(time, lat, lon)` order.
fn to_time_lat_lon<T: Clone>(
    var_name: &str,
    dim_names: &[String],
    data: ArrayD<T>,
) -> Result<Array3<T>> {
    let lat = dim_position(var_name, dim_names, LAT_DIM)?;
    let lon = dim_position(var_name, dim_names, LON_DIM)?;
    let time = dim_names.iter().position(|d| d == TIME_DIM);

    match (time, dim_names.len()) {
        (Some(t), 3) => {
            let grid = data
                .permuted_axes(vec![t, lat, lon])
                .into_dimensionality::<Ix3>()?;
            Ok(grid)
        }
        (None, 2) => {
            let grid = data
                .permuted_axes(vec![lat, lon])
                .into_dimensionality::<Ix2>()?;
            Ok(grid.insert_axis(Axis(0)))
        }
        _ => Err(ClimafeedError::ShapeMismatch {
            message: format!(
                "variable '{}' has unsupported dimensions [{}]; expected (lat, lon) with an optional time",
                var_name,
                dim_names.join(", ")
            ),
        }),
    }
}

fn dim_position(var_name: &str, dim_names: &[String], dim: &str) -> Result<usize> {
    dim_names
        .iter()
        .position(|d| d == dim)
        .ok_or_else(|| ClimafeedError::DimensionNotFound {
            var: var_name.to_string(),
            dim: dim.to_string(),
        })
}
