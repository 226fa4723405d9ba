//! # Mapclean Core
//!
//! Core types and traits for the mapclean class-map cleanup toolkit.
//!
//! This crate provides:
//! - `Grid<T>`: Dense 2D grid type for class maps and masks
//! - `Feature` / `FeatureCollection`: Minimal vector feature model
//! - Algorithm traits for consistent API
//! - Shared error types

pub mod error;
pub mod raster;
pub mod vector;

pub use error::{Error, Result};
pub use raster::{Grid, GridElement};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::raster::{Grid, GridElement};
    pub use crate::vector::{AttributeValue, Feature, FeatureCollection};
    pub use crate::Algorithm;
}

/// Core trait for all algorithms in mapclean.
///
/// Algorithms are pure functions that transform input data according to parameters.
pub trait Algorithm {
    /// Input type for the algorithm
    type Input;
    /// Output type for the algorithm
    type Output;
    /// Parameters controlling algorithm behavior
    type Params: Default;
    /// Error type for algorithm execution
    type Error: std::error::Error;

    /// Returns the algorithm name
    fn name(&self) -> &'static str;

    /// Returns a description of what the algorithm does
    fn description(&self) -> &'static str;

    /// Execute the algorithm
    fn execute(&self, input: Self::Input, params: Self::Params) -> std::result::Result<Self::Output, Self::Error>;

    /// Execute with default parameters
    fn execute_default(&self, input: Self::Input) -> std::result::Result<Self::Output, Self::Error> {
        self.execute(input, Self::Params::default())
    }
}
