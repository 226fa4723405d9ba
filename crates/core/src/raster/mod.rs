//! Grid data structures and operations

mod element;
mod grid;

pub use element::GridElement;
pub use grid::Grid;
