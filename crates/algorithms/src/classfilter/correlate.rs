//! Dense mask correlation and boolean morphology
//!
//! Every stage of the filter pipeline reduces to the same primitive:
//! correlate a boolean mask against a circular kernel with zero-padded
//! boundaries, then threshold the per-cell footprint counts.

use mapclean_core::{Error, Grid, Result};
use rayon::prelude::*;

use super::kernel::CircleKernel;

/// Correlate a boolean mask against a kernel.
///
/// Each output cell holds the number of set mask cells inside the kernel
/// footprint centered there. Cells outside the grid contribute zero, so
/// boundary cells see a clipped footprint and can never reach the full
/// kernel area. Any nonzero mask value counts as set.
pub fn correlate(mask: &Grid<u8>, kernel: &CircleKernel) -> Result<Grid<u32>> {
    if mask.is_empty() {
        return Err(Error::InvalidDimensions {
            rows: mask.rows(),
            cols: mask.cols(),
        });
    }

    let (rows, cols) = mask.shape();
    let offsets = kernel.offsets();

    let data: Vec<u32> = (0..rows)
        .into_par_iter()
        .flat_map(|row| {
            let mut row_data = vec![0u32; cols];

            for (col, row_data_col) in row_data.iter_mut().enumerate() {
                let mut count = 0u32;
                for &(dr, dc) in offsets {
                    let nr = row as isize + dr;
                    let nc = col as isize + dc;
                    if nr < 0 || nc < 0 || nr as usize >= rows || nc as usize >= cols {
                        continue;
                    }
                    let v = unsafe { mask.get_unchecked(nr as usize, nc as usize) };
                    if v != 0 {
                        count += 1;
                    }
                }
                *row_data_col = count;
            }

            row_data
        })
        .collect();

    Grid::from_vec(data, rows, cols)
}

/// Boolean dilation: set where any footprint cell is set.
pub fn dilate(mask: &Grid<u8>, kernel: &CircleKernel) -> Result<Grid<u8>> {
    let counts = correlate(mask, kernel)?;
    threshold_counts(&counts, |c| c > 0)
}

/// Boolean erosion: set where the entire footprint is set.
///
/// With zero-padded correlation a boundary cell never sees the full
/// footprint, so erosion always clears a `radius`-wide frame.
pub fn erode(mask: &Grid<u8>, kernel: &CircleKernel) -> Result<Grid<u8>> {
    let area = kernel.area() as u32;
    let counts = correlate(mask, kernel)?;
    threshold_counts(&counts, |c| c == area)
}

/// Element-wise AND of two masks of identical dimensions.
pub fn mask_and(a: &Grid<u8>, b: &Grid<u8>) -> Result<Grid<u8>> {
    ensure_same_shape(a, b)?;
    let (rows, cols) = a.shape();
    let data = a
        .data()
        .iter()
        .zip(b.data().iter())
        .map(|(&x, &y)| u8::from(x != 0 && y != 0))
        .collect();
    Grid::from_vec(data, rows, cols)
}

/// Element-wise OR of two masks of identical dimensions.
pub fn mask_or(a: &Grid<u8>, b: &Grid<u8>) -> Result<Grid<u8>> {
    ensure_same_shape(a, b)?;
    let (rows, cols) = a.shape();
    let data = a
        .data()
        .iter()
        .zip(b.data().iter())
        .map(|(&x, &y)| u8::from(x != 0 || y != 0))
        .collect();
    Grid::from_vec(data, rows, cols)
}

fn threshold_counts(counts: &Grid<u32>, pred: impl Fn(u32) -> bool) -> Result<Grid<u8>> {
    let (rows, cols) = counts.shape();
    let data = counts.data().iter().map(|&c| u8::from(pred(c))).collect();
    Grid::from_vec(data, rows, cols)
}

fn ensure_same_shape(a: &Grid<u8>, b: &Grid<u8>) -> Result<()> {
    if a.shape() != b.shape() {
        let (er, ec) = a.shape();
        let (ar, ac) = b.shape();
        return Err(Error::SizeMismatch { er, ec, ar, ac });
    }
    Ok(())
}
