//! Loader configuration: feature variables, normalization statistics, augmentation flag
//!
//! The configuration names the physical variables to extract from every sample
//! file, in order, together with the per-variable statistics used for
//! standardization. Field order matters: it defines the layout of the
//! `variable` axis in every extracted sample.
//!
//! Configurations are validated at construction so that downstream code can
//! rely on strictly positive standard deviations and unique field names.

use crate::errors::{ClimafeedError, Result};
use serde_json::Value;
use std::fs;
use std::path::Path;

/// Normalization statistics for one feature variable
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldStats {
    pub mean: f64,
    pub std: f64,
}

/// Loader configuration
///
/// `fields` is an ordered list; its order determines the variable axis order
/// of every sample. `augment` controls whether labeled access applies the
/// randomized longitude shift.
#[derive(Debug, Clone)]
pub struct Config {
    fields: Vec<(String, FieldStats)>,
    pub augment: bool,
}

impl Config {
    /// Create a validated configuration from an ordered field list.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the field list is empty, contains an empty
    /// or duplicate name, or carries a non-finite or non-positive `std`.
    pub fn new(fields: Vec<(String, FieldStats)>, augment: bool) -> Result<Self> {
        if fields.is_empty() {
            return Err(ClimafeedError::ConfigError {
                message: "configuration must name at least one field".to_string(),
            });
        }

        for (name, stats) in &fields {
            if name.is_empty() {
                return Err(ClimafeedError::ConfigError {
                    message: "field names must be non-empty".to_string(),
                });
            }
            if !stats.mean.is_finite() || !stats.std.is_finite() {
                return Err(ClimafeedError::ConfigError {
                    message: format!("field '{}' has non-finite statistics", name),
                });
            }
            if stats.std <= 0.0 {
                return Err(ClimafeedError::ConfigError {
                    message: format!(
                        "field '{}' has non-positive std {}; normalization would be undefined",
                        name, stats.std
                    ),
                });
            }
        }

        let mut seen: Vec<&str> = Vec::with_capacity(fields.len());
        for (name, _) in &fields {
            if seen.contains(&name.as_str()) {
                return Err(ClimafeedError::ConfigError {
                    message: format!("duplicate field '{}'", name),
                });
            }
            seen.push(name);
        }

        Ok(Self { fields, augment })
    }

    /// Load a configuration from a JSON file of the form
    /// `{"fields": {"NAME": {"mean": m, "std": s}, ...}, "augment": bool}`.
    ///
    /// JSON key order is preserved and defines the variable axis order.
    /// Unknown top-level keys are ignored; configuration files often carry
    /// model hyperparameters alongside the loader section. A missing
    /// `"augment"` key defaults to `false`.
    ///
    /// # Errors
    ///
    /// Returns an `IoError` if the file cannot be read and a `ConfigError`
    /// on malformed JSON or invalid statistics.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&text)
    }

    /// Parse a configuration from a JSON string. See [`Config::from_file`].
    pub fn from_json_str(text: &str) -> Result<Self> {
        let root: Value = serde_json::from_str(text).map_err(|e| ClimafeedError::ConfigError {
            message: format!("invalid JSON: {}", e),
        })?;

        let fields_value = root
            .get("fields")
            .ok_or_else(|| ClimafeedError::ConfigError {
                message: "missing 'fields' object".to_string(),
            })?;

        let fields_map = fields_value
            .as_object()
            .ok_or_else(|| ClimafeedError::ConfigError {
                message: "'fields' must be an object mapping names to statistics".to_string(),
            })?;

        let mut fields = Vec::with_capacity(fields_map.len());
        for (name, stats_value) in fields_map {
            let mean = extract_stat(stats_value, name, "mean")?;
            let std = extract_stat(stats_value, name, "std")?;
            fields.push((name.clone(), FieldStats { mean, std }));
        }

        let augment = match root.get("augment") {
            None => false,
            Some(Value::Bool(b)) => *b,
            Some(other) => {
                return Err(ClimafeedError::ConfigError {
                    message: format!("'augment' must be a boolean, got {}", other),
                })
            }
        };

        Self::new(fields, augment)
    }

    /// Ordered `(name, stats)` pairs defining the variable axis.
    pub fn fields(&self) -> &[(String, FieldStats)] {
        &self.fields
    }

    /// Ordered field names.
    pub fn field_names(&self) -> Vec<&str> {
        self.fields.iter().map(|(name, _)| name.as_str()).collect()
    }

    /// Number of configured fields, i.e. the variable axis extent.
    pub fn num_fields(&self) -> usize {
        self.fields.len()
    }
}

fn extract_stat(stats_value: &Value, field: &str, key: &str) -> Result<f64> {
    stats_value
        .get(key)
        .and_then(Value::as_f64)
        .ok_or_else(|| ClimafeedError::ConfigError {
            message: format!("field '{}' is missing a numeric '{}'", field, key),
        })
}
