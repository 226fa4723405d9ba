//! Grid element trait for generic cell values

use num_traits::Zero;
use std::fmt::Debug;

/// Trait for types that can be stored in a grid cell.
///
/// The cleanup pipeline works on three cell types: class codes (`i32`),
/// boolean masks stored as `u8` with values 0/1, and footprint counts
/// (`u32`). `Zero` supplies the fill value for freshly allocated grids;
/// `Send + Sync` lets row-parallel passes share grids across threads.
pub trait GridElement: Copy + Debug + PartialEq + Zero + Send + Sync + 'static {}

impl<T> GridElement for T where T: Copy + Debug + PartialEq + Zero + Send + Sync + 'static {}
