//! # Mapclean Algorithms
//!
//! Cleanup algorithms for classified maps.
//!
//! ## Available Algorithm Categories
//!
//! - **classfilter**: Multi-radius coverage filtering of class-code grids
//! - **vector**: Spike vertex removal for polygon features

pub mod classfilter;
pub mod vector;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::classfilter::{
        class_filter, coverage_filter, extract_classes, refine, CircleKernel, ClassFilter,
        ClassFilterParams, CoverageThresholds, KernelBank,
    };
    pub use crate::vector::{
        remove_polygon_spikes, remove_ring_spikes, remove_spikes, remove_spikes_features,
        SpikeParams,
    };
    pub use mapclean_core::prelude::*;
}
