//! Sample file inspection and contract checking
//!
//! A sample file must expose every configured feature variable over `lat`
//! and `lon` dimensions (optionally `time`), and labeled datasets require a
//! `LABELS` variable as well. The functions here let callers verify a file
//! against that contract before committing to a bulk load, and print a
//! human-readable description for inspection.

use crate::config::Config;
use crate::errors::{ClimafeedError, Result};
use crate::netcdf_io::{LABELS_VARIABLE, LAT_DIM, LON_DIM};
use netcdf::File;

/// Prints dimensions and variables of a sample file.
pub fn print_sample_metadata(file: &File) -> Result<()> {
    println!("\n===== Dimensions =====");
    let mut dimensions: Vec<_> = file.dimensions().collect();
    dimensions.sort_by(|a, b| a.name().cmp(&b.name()));
    for dim in dimensions {
        println!("- {} = {}", dim.name(), dim.len());
    }

    println!("\n===== Variables =====");
    let mut variables: Vec<_> = file.variables().collect();
    variables.sort_by(|a, b| a.name().cmp(&b.name()));
    for var in variables {
        let dims: Vec<String> = var
            .dimensions()
            .iter()
            .map(|d| format!("{}[{}]", d.name(), d.len()))
            .collect();
        println!("- {} ({})", var.name(), dims.join(", "));
    }

    Ok(())
}

/// Verify a sample file against the configured field contract.
///
/// Checks that every configured variable exists with `lat` and `lon`
/// dimensions, and that `LABELS` is present when `labeled` is set.
///
/// # Errors
///
/// Returns `VariableNotFound` or `DimensionNotFound` for the first
/// violation encountered.
pub fn check_sample_contract(file: &File, config: &Config, labeled: bool) -> Result<()> {
    for name in config.field_names() {
        check_grid_variable(file, name)?;
    }
    if labeled {
        check_grid_variable(file, LABELS_VARIABLE)?;
    }
    Ok(())
}

fn check_grid_variable(file: &File, var_name: &str) -> Result<()> {
    let var = file
        .variable(var_name)
        .ok_or_else(|| ClimafeedError::VariableNotFound {
            var: var_name.to_string(),
        })?;

    for dim in [LAT_DIM, LON_DIM] {
        if !var.dimensions().iter().any(|d| d.name() == dim) {
            return Err(ClimafeedError::DimensionNotFound {
                var: var_name.to_string(),
                dim: dim.to_string(),
            });
        }
    }

    Ok(())
}
