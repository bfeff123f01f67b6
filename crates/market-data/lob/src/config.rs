//! Order book construction parameters

use serde::{Deserialize, Serialize};

/// Sizing knobs applied once at book construction
///
/// `pool_capacity` bounds the number of simultaneously resting orders;
/// the pool never grows. `level_capacity` pre-reserves the sorted side
/// vectors so level churn stays reallocation-free up to that depth.
/// Order linkage is index-based and valid across reallocation either way.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookConfig {
    /// Maximum number of resting orders
    pub pool_capacity: usize,
    /// Price levels to reserve per side up front
    pub level_capacity: usize,
}

impl Default for BookConfig {
    fn default() -> Self {
        Self {
            pool_capacity: 1_000_000,
            level_capacity: 1024,
        }
    }
}
