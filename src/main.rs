//! Entry point for the climafeed application.
//! Handles CLI parsing, dataset construction, and dispatches operations like
//! sample loading, batching, and file inspection.

use clap::Parser;
use climafeed::cli::Args;
use climafeed::config::Config;
use climafeed::dataset::{ClimateDataset, LabeledClimateDataset};
use climafeed::metadata::{check_sample_contract, print_sample_metadata};
use climafeed::netcdf_io::open_sample;
use climafeed::parallel::ParallelConfig;
use ndarray::Array4;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    println!(
        r#"
------------------------------------------------------------------
         _ _                  __               _
     ___| (_)_ __ ___   __ _ / _| ___  ___  __| |
    / __| | | '_ ` _ \ / _` | |_ / _ \/ _ \/ _` |
   | (__| | | | | | | | (_| |  _|  __/  __/ (_| |
    \___|_|_|_| |_| |_|\__,_|_|  \___|\___|\__,_|
            NetCDF climate sample loader
------------------------------------------------------------------
                        "#
    );

    ParallelConfig::new(args.threads).setup_global_pool()?;

    let config = Config::from_file(&args.config)?;
    println!(
        "Loaded configuration: {} fields {:?}, augment = {}",
        config.num_fields(),
        config.field_names(),
        config.augment
    );

    let dataset = ClimateDataset::from_dir(&args.data_dir, config.clone())?;
    println!(
        "Found {} sample files in {}",
        dataset.len(),
        args.data_dir.display()
    );

    if args.list_files {
        println!("\n===== Sample files =====");
        for (index, name) in dataset.files().iter().enumerate() {
            println!("[{}] {}", index, name);
        }
    }

    if let Some(index) = args.describe {
        let path = args.data_dir.join(
            dataset
                .files()
                .get(index)
                .ok_or_else(|| format!("no sample at index {}", index))?,
        );
        let file = open_sample(&path)?;
        print_sample_metadata(&file)?;
        check_sample_contract(&file, &config, args.labeled)?;
        println!("\n✅ '{}' satisfies the configured contract", path.display());
    }

    if let Some(index) = args.index {
        if args.labeled {
            let labeled = LabeledClimateDataset::from_dir(&args.data_dir, config.clone())?;
            let (features, labels) = labeled.get(index)?;
            print_feature_summary(&features);
            println!("Label shape: {:?}", labels.shape());
        } else {
            let features = dataset.get(index)?;
            print_feature_summary(&features);
        }
    }

    if let Some(count) = args.batch {
        let indices: Vec<usize> = (0..count).collect();
        println!(
            "⚡ Loading {} samples across {} threads",
            count,
            rayon::current_num_threads()
        );
        if args.labeled {
            let labeled = LabeledClimateDataset::from_dir(&args.data_dir, config)?;
            let (features, labels) = labeled.load_batch(&indices)?;
            println!("✅ Batch features: {:?}", features.shape());
            println!("✅ Batch labels: {:?}", labels.shape());
        } else {
            let features = dataset.load_batch(&indices)?;
            println!("✅ Batch features: {:?}", features.shape());
        }
    }

    Ok(())
}

/// Prints shape and quick statistics for a loaded sample.
fn print_feature_summary(features: &Array4<f32>) {
    println!("\nSample shape (time, variable, lat, lon): {:?}", features.shape());

    let valid: Vec<f32> = features.iter().copied().filter(|x| x.is_finite()).collect();
    if valid.is_empty() {
        println!("⚠ No finite values in sample");
        return;
    }

    let min = valid.iter().copied().fold(f32::INFINITY, f32::min);
    let max = valid.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let mean = valid.iter().sum::<f32>() / valid.len() as f32;

    println!("   Min: {:.4}", min);
    println!("   Max: {:.4}", max);
    println!("   Mean: {:.4}", mean);
}
