//! Dataset tests over real NetCDF sample files
//!
//! Every test builds a small sample directory in a temp dir with
//! deterministic values, so expected normalized values can be computed by
//! hand.

use climafeed::config::{Config, FieldStats};
use climafeed::dataset::{ClimateDataset, LabeledClimateDataset, SampleSource};
use climafeed::errors::{ClimafeedError, Result};
use ndarray::{Array2, Array3, Axis};
use netcdf::create;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

const LAT: usize = 6;
const LON: usize = 8;

const T_MEAN: f64 = 280.0;
const T_STD: f64 = 10.0;
const U_MEAN: f64 = 0.0;
const U_STD: f64 = 5.0;

/// Offset added to the U variable so the two fields never hold equal values.
const U_OFFSET: f32 = 100.0;

fn test_config(augment: bool) -> Config {
    Config::new(
        vec![
            (
                "T".to_string(),
                FieldStats {
                    mean: T_MEAN,
                    std: T_STD,
                },
            ),
            (
                "U".to_string(),
                FieldStats {
                    mean: U_MEAN,
                    std: U_STD,
                },
            ),
        ],
        augment,
    )
    .expect("valid test config")
}

/// Raw (pre-normalization) value of field T at flat grid position `i`.
fn raw_t(base: f32, i: usize) -> f32 {
    base + i as f32
}

/// Write one sample file with T and U over (time=1, lat, lon), and
/// optionally a 2-D LABELS grid with value `(i % 3)`.
fn write_sample(path: &Path, lat: usize, lon: usize, base: f32, with_labels: bool) {
    let mut file = create(path).expect("Failed to create NetCDF file");

    file.add_dimension("time", 1).expect("add time");
    file.add_dimension("lat", lat).expect("add lat");
    file.add_dimension("lon", lon).expect("add lon");

    for (name, offset) in [("T", 0.0f32), ("U", U_OFFSET)] {
        let values: Vec<f32> = (0..lat * lon).map(|i| base + offset + i as f32).collect();
        let data = Array3::from_shape_vec((1, lat, lon), values).expect("shape data");
        let mut var = file
            .add_variable::<f32>(name, &["time", "lat", "lon"])
            .expect("add variable");
        var.put(data.view(), ..).expect("write data");
    }

    if with_labels {
        let values: Vec<i32> = (0..lat * lon).map(|i| (i % 3) as i32).collect();
        let data = Array2::from_shape_vec((lat, lon), values).expect("shape labels");
        let mut var = file
            .add_variable::<i32>("LABELS", &["lat", "lon"])
            .expect("add LABELS");
        var.put(data.view(), ..).expect("write labels");
    }
}

#[test]
fn test_construction_sorts_and_filters() -> Result<()> {
    let temp_dir = tempdir().expect("Failed to create temp dir");

    // Written out of order; a non-.nc file must be ignored
    write_sample(&temp_dir.path().join("t1.nc"), LAT, LON, 10.0, false);
    write_sample(&temp_dir.path().join("t0.nc"), LAT, LON, 0.0, false);
    fs::write(temp_dir.path().join("notes.txt"), "not a sample")?;

    let dataset = ClimateDataset::from_dir(temp_dir.path(), test_config(false))?;

    assert_eq!(dataset.len(), 2);
    assert!(!dataset.is_empty());
    assert_eq!(dataset.files(), &["t0.nc".to_string(), "t1.nc".to_string()]);

    Ok(())
}

#[test]
fn test_empty_directory_is_a_valid_dataset() -> Result<()> {
    let temp_dir = tempdir().expect("Failed to create temp dir");
    let dataset = ClimateDataset::from_dir(temp_dir.path(), test_config(false))?;

    assert_eq!(dataset.len(), 0);
    assert!(dataset.is_empty());

    match dataset.get(0) {
        Err(ClimafeedError::IndexOutOfRange { index, length }) => {
            assert_eq!(index, 0);
            assert_eq!(length, 0);
        }
        _ => panic!("Expected IndexOutOfRange error"),
    }

    Ok(())
}

#[test]
fn test_missing_directory() {
    let result = ClimateDataset::from_dir("/definitely/not/a/directory", test_config(false));
    match result {
        Err(ClimafeedError::DirectoryNotFound { path }) => {
            assert!(path.ends_with("directory"));
        }
        _ => panic!("Expected DirectoryNotFound error"),
    }
}

#[test]
fn test_sample_shape_and_variable_order() -> Result<()> {
    let temp_dir = tempdir().expect("Failed to create temp dir");
    write_sample(&temp_dir.path().join("t0.nc"), LAT, LON, 0.0, false);

    let dataset = ClimateDataset::from_dir(temp_dir.path(), test_config(false))?;
    let features = dataset.get(0)?;

    assert_eq!(features.shape(), &[1, 2, LAT, LON]);

    // Variable axis order follows configuration order: T then U.
    // T at (0, 0): (0 - 280) / 10; U at (0, 0): (100 - 0) / 5.
    let t00 = features[[0, 0, 0, 0]];
    let u00 = features[[0, 1, 0, 0]];
    assert!((t00 - (0.0 - T_MEAN as f32) / T_STD as f32).abs() < 1e-5);
    assert!((u00 - U_OFFSET / U_STD as f32).abs() < 1e-5);

    Ok(())
}

#[test]
fn test_normalization_round_trip() -> Result<()> {
    let temp_dir = tempdir().expect("Failed to create temp dir");
    let base = 250.0f32;
    write_sample(&temp_dir.path().join("t0.nc"), LAT, LON, base, false);

    let dataset = ClimateDataset::from_dir(temp_dir.path(), test_config(false))?;
    let features = dataset.get(0)?;

    // Inverting the standardization recovers the raw values of T
    for la in 0..LAT {
        for lo in 0..LON {
            let normalized = features[[0, 0, la, lo]];
            let recovered = normalized * T_STD as f32 + T_MEAN as f32;
            let raw = raw_t(base, la * LON + lo);
            assert!(
                (recovered - raw).abs() < 1e-3,
                "round trip at ({}, {}): {} != {}",
                la,
                lo,
                recovered,
                raw
            );
        }
    }

    Ok(())
}

#[test]
fn test_unknown_variable_fails_access() -> Result<()> {
    let temp_dir = tempdir().expect("Failed to create temp dir");
    write_sample(&temp_dir.path().join("t0.nc"), LAT, LON, 0.0, false);

    let config = Config::new(
        vec![(
            "MISSING".to_string(),
            FieldStats {
                mean: 0.0,
                std: 1.0,
            },
        )],
        false,
    )?;
    let dataset = ClimateDataset::from_dir(temp_dir.path(), config)?;

    match dataset.get(0) {
        Err(ClimafeedError::VariableNotFound { var }) => assert_eq!(var, "MISSING"),
        _ => panic!("Expected VariableNotFound error"),
    }

    Ok(())
}

#[test]
fn test_index_out_of_range() -> Result<()> {
    let temp_dir = tempdir().expect("Failed to create temp dir");
    write_sample(&temp_dir.path().join("t0.nc"), LAT, LON, 0.0, false);

    let dataset = ClimateDataset::from_dir(temp_dir.path(), test_config(false))?;

    match dataset.get(5) {
        Err(ClimafeedError::IndexOutOfRange { index, length }) => {
            assert_eq!(index, 5);
            assert_eq!(length, 1);
        }
        _ => panic!("Expected IndexOutOfRange error"),
    }

    Ok(())
}

#[test]
fn test_collate_preserves_order_and_boundaries() -> Result<()> {
    let temp_dir = tempdir().expect("Failed to create temp dir");
    write_sample(&temp_dir.path().join("t0.nc"), LAT, LON, 0.0, false);
    write_sample(&temp_dir.path().join("t1.nc"), LAT, LON, 50.0, false);

    let dataset = ClimateDataset::from_dir(temp_dir.path(), test_config(false))?;
    let a = dataset.get(0)?;
    let b = dataset.get(1)?;

    let batch = ClimateDataset::collate(&[a.clone(), b.clone()])?;
    assert_eq!(batch.shape(), &[2, 2, LAT, LON]);

    // Slicing the batch back at the boundary recovers the inputs exactly
    assert_eq!(batch.index_axis(Axis(0), 0), a.index_axis(Axis(0), 0));
    assert_eq!(batch.index_axis(Axis(0), 1), b.index_axis(Axis(0), 0));

    Ok(())
}

#[test]
fn test_collate_rejects_mismatched_extents() -> Result<()> {
    let temp_dir = tempdir().expect("Failed to create temp dir");
    write_sample(&temp_dir.path().join("t0.nc"), LAT, LON, 0.0, false);
    write_sample(&temp_dir.path().join("t1.nc"), LAT + 2, LON, 0.0, false);

    let dataset = ClimateDataset::from_dir(temp_dir.path(), test_config(false))?;
    let a = dataset.get(0)?;
    let b = dataset.get(1)?;

    match ClimateDataset::collate(&[a, b]) {
        Err(ClimafeedError::ShapeMismatch { message }) => {
            assert!(message.contains("lat"));
        }
        _ => panic!("Expected ShapeMismatch error"),
    }

    Ok(())
}

#[test]
fn test_collate_rejects_empty_batch() {
    match ClimateDataset::collate(&[]) {
        Err(ClimafeedError::ShapeMismatch { message }) => {
            assert!(message.contains("empty"));
        }
        _ => panic!("Expected ShapeMismatch error"),
    }
}

#[test]
fn test_labeled_without_augmentation_matches_unlabeled() -> Result<()> {
    let temp_dir = tempdir().expect("Failed to create temp dir");
    write_sample(&temp_dir.path().join("t0.nc"), LAT, LON, 20.0, true);

    let unlabeled = ClimateDataset::from_dir(temp_dir.path(), test_config(false))?;
    let labeled = LabeledClimateDataset::from_dir(temp_dir.path(), test_config(false))?;

    let plain = unlabeled.get(0)?;
    let (features, labels) = labeled.get(0)?;

    // Augmentation disabled: features identical to the unlabeled path,
    // labels exactly as stored in the file (with a unit time axis).
    assert_eq!(features, plain);
    assert_eq!(labels.shape(), &[1, LAT, LON]);
    for la in 0..LAT {
        for lo in 0..LON {
            assert_eq!(labels[[0, la, lo]], ((la * LON + lo) % 3) as i32);
        }
    }

    Ok(())
}

#[test]
fn test_labeled_missing_labels_variable() -> Result<()> {
    let temp_dir = tempdir().expect("Failed to create temp dir");
    write_sample(&temp_dir.path().join("t0.nc"), LAT, LON, 0.0, false);

    let labeled = LabeledClimateDataset::from_dir(temp_dir.path(), test_config(false))?;

    match labeled.get(0) {
        Err(ClimafeedError::VariableNotFound { var }) => assert_eq!(var, "LABELS"),
        _ => panic!("Expected VariableNotFound error"),
    }

    Ok(())
}

#[test]
fn test_labeled_collate_keeps_pairs_aligned() -> Result<()> {
    let temp_dir = tempdir().expect("Failed to create temp dir");
    write_sample(&temp_dir.path().join("t0.nc"), LAT, LON, 0.0, true);
    write_sample(&temp_dir.path().join("t1.nc"), LAT, LON, 50.0, true);

    let labeled = LabeledClimateDataset::from_dir(temp_dir.path(), test_config(false))?;
    let pair_a = labeled.get(0)?;
    let pair_b = labeled.get(1)?;

    let (features, labels) = LabeledClimateDataset::collate(&[pair_a.clone(), pair_b.clone()])?;
    assert_eq!(features.shape(), &[2, 2, LAT, LON]);
    assert_eq!(labels.shape(), &[2, LAT, LON]);

    // Same input order on both sides of the pairs
    assert_eq!(features.index_axis(Axis(0), 0), pair_a.0.index_axis(Axis(0), 0));
    assert_eq!(features.index_axis(Axis(0), 1), pair_b.0.index_axis(Axis(0), 0));
    assert_eq!(labels.index_axis(Axis(0), 0), pair_a.1.index_axis(Axis(0), 0));
    assert_eq!(labels.index_axis(Axis(0), 1), pair_b.1.index_axis(Axis(0), 0));

    Ok(())
}

#[test]
fn test_parallel_batch_matches_sequential_collate() -> Result<()> {
    let temp_dir = tempdir().expect("Failed to create temp dir");
    write_sample(&temp_dir.path().join("t0.nc"), LAT, LON, 0.0, false);
    write_sample(&temp_dir.path().join("t1.nc"), LAT, LON, 50.0, false);
    write_sample(&temp_dir.path().join("t2.nc"), LAT, LON, 75.0, false);

    let dataset = ClimateDataset::from_dir(temp_dir.path(), test_config(false))?;

    let parallel = dataset.load_batch(&[0, 1, 2])?;
    let sequential =
        ClimateDataset::collate(&[dataset.get(0)?, dataset.get(1)?, dataset.get(2)?])?;

    assert_eq!(parallel, sequential);

    Ok(())
}

#[test]
fn test_native_axis_order_is_canonicalized() -> Result<()> {
    let temp_dir = tempdir().expect("Failed to create temp dir");
    let path = temp_dir.path().join("t0.nc");

    // Variables stored as (lon, lat) with no time dimension; values encode
    // their grid position so a missed transpose cannot go unnoticed.
    {
        let mut file = create(&path).expect("Failed to create NetCDF file");
        file.add_dimension("lat", LAT).expect("add lat");
        file.add_dimension("lon", LON).expect("add lon");

        for name in ["T", "U"] {
            let mut values = vec![0.0f32; LAT * LON];
            for lo in 0..LON {
                for la in 0..LAT {
                    values[lo * LAT + la] = (la * 100 + lo) as f32;
                }
            }
            let data = Array2::from_shape_vec((LON, LAT), values).expect("shape data");
            let mut var = file
                .add_variable::<f32>(name, &["lon", "lat"])
                .expect("add variable");
            var.put(data.view(), ..).expect("write data");
        }
    }

    let config = Config::new(
        vec![
            ("T".to_string(), FieldStats { mean: 0.0, std: 1.0 }),
            ("U".to_string(), FieldStats { mean: 0.0, std: 1.0 }),
        ],
        false,
    )?;
    let dataset = ClimateDataset::from_dir(temp_dir.path(), config)?;
    let features = dataset.get(0)?;

    // 2-D variables gain a unit time axis and come out as (time, variable, lat, lon)
    assert_eq!(features.shape(), &[1, 2, LAT, LON]);
    for la in 0..LAT {
        for lo in 0..LON {
            assert_eq!(features[[0, 0, la, lo]], (la * 100 + lo) as f32);
        }
    }

    Ok(())
}

#[test]
fn test_labels_with_time_dimension() -> Result<()> {
    let temp_dir = tempdir().expect("Failed to create temp dir");
    let path = temp_dir.path().join("t0.nc");

    {
        let mut file = create(&path).expect("Failed to create NetCDF file");
        file.add_dimension("time", 1).expect("add time");
        file.add_dimension("lat", LAT).expect("add lat");
        file.add_dimension("lon", LON).expect("add lon");

        for name in ["T", "U"] {
            let values: Vec<f32> = (0..LAT * LON).map(|i| i as f32).collect();
            let data = Array3::from_shape_vec((1, LAT, LON), values).expect("shape data");
            let mut var = file
                .add_variable::<f32>(name, &["time", "lat", "lon"])
                .expect("add variable");
            var.put(data.view(), ..).expect("write data");
        }

        let values: Vec<i32> = (0..LAT * LON).map(|i| (i % 3) as i32).collect();
        let data = Array3::from_shape_vec((1, LAT, LON), values).expect("shape labels");
        let mut var = file
            .add_variable::<i32>("LABELS", &["time", "lat", "lon"])
            .expect("add LABELS");
        var.put(data.view(), ..).expect("write labels");
    }

    let labeled = LabeledClimateDataset::from_dir(temp_dir.path(), test_config(false))?;
    let (_, labels) = labeled.get(0)?;

    assert_eq!(labels.shape(), &[1, LAT, LON]);
    assert_eq!(labels[[0, 0, 1]], 1);

    Ok(())
}

#[test]
fn test_sample_source_trait_objects() -> Result<()> {
    let temp_dir = tempdir().expect("Failed to create temp dir");
    write_sample(&temp_dir.path().join("t0.nc"), LAT, LON, 0.0, false);
    write_sample(&temp_dir.path().join("t1.nc"), LAT, LON, 50.0, false);

    let dataset = ClimateDataset::from_dir(temp_dir.path(), test_config(false))?;
    let source: &dyn SampleSource<Item = ndarray::Array4<f32>> = &dataset;

    assert_eq!(source.len(), 2);
    let batch = source.collate(vec![source.get(0)?, source.get(1)?])?;
    assert_eq!(batch.shape(), &[2, 2, LAT, LON]);

    Ok(())
}
