//! Error types for mapclean

use thiserror::Error;

/// Main error type for mapclean operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid grid dimensions: {rows}x{cols}")]
    InvalidDimensions { rows: usize, cols: usize },

    #[error("Index out of bounds: ({row}, {col}) in grid of size ({rows}, {cols})")]
    IndexOutOfBounds {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },

    #[error("Grid size mismatch: expected ({er}, {ec}), got ({ar}, {ac})")]
    SizeMismatch { er: usize, ec: usize, ar: usize, ac: usize },

    #[error("No structuring kernel generated for radius {0}")]
    KernelNotGenerated(usize),

    #[error("Invalid parameter: {name} = {value} ({reason})")]
    InvalidParameter {
        name: &'static str,
        value: String,
        reason: String,
    },

    #[error("{0}")]
    Other(String),
}

/// Result type alias for mapclean operations
pub type Result<T> = std::result::Result<T, Error>;
