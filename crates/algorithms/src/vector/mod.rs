//! Vector geometry cleanup algorithms
//!
//! Geometric cleanup passes on vector features:
//! - Spike removal: drop polygon vertices with very acute interior angles

mod spikes;

pub use spikes::{
    remove_polygon_spikes, remove_ring_spikes, remove_spikes, remove_spikes_features,
    vertex_angle_degrees, SpikeParams,
};
