//! Main Grid type

use crate::error::{Error, Result};
use crate::raster::GridElement;
use ndarray::Array2;

/// A dense 2D grid of cell values.
///
/// `Grid<T>` stores values of type `T` in row-major order. It is the carrier
/// for class-code maps (`Grid<i32>`), boolean masks (`Grid<u8>`, values 0/1)
/// and kernel footprint counts (`Grid<u32>`).
///
/// # Type Parameters
///
/// - `T`: The cell value type, must implement [`GridElement`]
///
/// # Example
///
/// ```
/// use mapclean_core::Grid;
///
/// // Create a 4x5 grid filled with zeros
/// let mut grid: Grid<i32> = Grid::new(4, 5);
///
/// grid.set(1, 2, 7)?;
/// assert_eq!(grid.get(1, 2)?, 7);
/// # Ok::<(), mapclean_core::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Grid<T: GridElement> {
    /// Grid data stored in row-major order (row, col)
    data: Array2<T>,
}

impl<T: GridElement> Grid<T> {
    /// Create a new grid filled with zeros
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            data: Array2::zeros((rows, cols)),
        }
    }

    /// Create a new grid filled with a specific value
    pub fn filled(rows: usize, cols: usize, value: T) -> Self {
        Self {
            data: Array2::from_elem((rows, cols), value),
        }
    }

    /// Create a grid from existing data
    pub fn from_vec(data: Vec<T>, rows: usize, cols: usize) -> Result<Self> {
        if data.len() != rows * cols {
            return Err(Error::InvalidDimensions { rows, cols });
        }

        let array = Array2::from_shape_vec((rows, cols), data)
            .map_err(|e| Error::Other(e.to_string()))?;

        Ok(Self { data: array })
    }

    // Dimensions

    /// Number of rows
    pub fn rows(&self) -> usize {
        self.data.nrows()
    }

    /// Number of columns
    pub fn cols(&self) -> usize {
        self.data.ncols()
    }

    /// Dimensions as (rows, cols)
    pub fn shape(&self) -> (usize, usize) {
        self.data.dim()
    }

    /// Total number of cells
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the grid has zero cells
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    // Data access

    /// Get value at (row, col)
    pub fn get(&self, row: usize, col: usize) -> Result<T> {
        self.data
            .get((row, col))
            .copied()
            .ok_or(Error::IndexOutOfBounds {
                row,
                col,
                rows: self.rows(),
                cols: self.cols(),
            })
    }

    /// Get value at (row, col) without bounds checking
    ///
    /// # Safety
    /// Caller must ensure row < self.rows() and col < self.cols()
    pub unsafe fn get_unchecked(&self, row: usize, col: usize) -> T {
        unsafe { *self.data.uget((row, col)) }
    }

    /// Set value at (row, col)
    pub fn set(&mut self, row: usize, col: usize, value: T) -> Result<()> {
        if row >= self.rows() || col >= self.cols() {
            return Err(Error::IndexOutOfBounds {
                row,
                col,
                rows: self.rows(),
                cols: self.cols(),
            });
        }
        self.data[(row, col)] = value;
        Ok(())
    }

    /// Get a reference to the underlying array
    pub fn data(&self) -> &Array2<T> {
        &self.data
    }
}
