//! Parallel processing configuration
//!
//! Batch loading fans sample indices out across Rayon worker threads. This
//! module configures the global thread pool for callers that want an
//! explicit thread count instead of Rayon's default.

use crate::errors::{ClimafeedError, Result};
use rayon::ThreadPoolBuilder;

/// Configuration for parallel batch loading
#[derive(Debug, Clone, Default)]
pub struct ParallelConfig {
    pub num_threads: Option<usize>,
}

impl ParallelConfig {
    /// Create a new parallel configuration
    pub fn new(num_threads: Option<usize>) -> Self {
        Self { num_threads }
    }

    /// Create a configuration that uses a specific number of threads
    pub fn with_threads(num_threads: usize) -> Self {
        Self {
            num_threads: Some(num_threads),
        }
    }

    /// Create a configuration that uses all available CPU cores
    pub fn all_cores() -> Self {
        Self {
            num_threads: Some(num_cpus::get()),
        }
    }

    /// Set up the global Rayon thread pool with the specified configuration.
    ///
    /// A `None` thread count leaves Rayon's default pool untouched.
    ///
    /// # Errors
    ///
    /// Returns a `ThreadPoolError` if the global pool was already built with
    /// a different configuration.
    pub fn setup_global_pool(&self) -> Result<()> {
        if let Some(num_threads) = self.num_threads {
            ThreadPoolBuilder::new()
                .num_threads(num_threads)
                .build_global()
                .map_err(|e| {
                    ClimafeedError::ThreadPoolError(format!(
                        "Failed to initialize thread pool with {} threads: {}",
                        num_threads, e
                    ))
                })?;
        }

        Ok(())
    }

    /// Get the current number of threads being used
    pub fn current_threads(&self) -> usize {
        rayon::current_num_threads()
    }
}
