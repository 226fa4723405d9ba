//! Pass-mask refinement
//!
//! Coverage voting is deliberately strict and clips the edges of accepted
//! areas. Refinement grows the pass mask one step back into the class
//! membership, then optionally smooths the result and absorbs touching
//! class pixels.

use mapclean_core::{Error, Grid, Result};
use tracing::debug;

use super::correlate::{dilate, erode, mask_and, mask_or};
use super::kernel::KernelBank;

/// Refine the coverage pass mask.
///
/// Always applied: a radius-1 dilation of the pass mask, clipped to the
/// class membership, unioned back in. Growth can only reclaim pixels that
/// belong to the target classes; it never invents new ones.
///
/// With `final_smoothing`, the grown mask is dilated and then eroded with
/// the radius-3 kernel, keeping only cells whose entire radius-3
/// neighborhood stays within reach of the grown mask. Zero padding makes
/// the erosion clear a 3-cell frame at the grid boundary.
///
/// With `absorb_adjacent`, class pixels touched by a radius-1 dilation of
/// the smoothed mask are unioned in, recovering single-pixel fringes of the
/// original class areas.
pub fn refine(
    class_mask: &Grid<u8>,
    pass_mask: &Grid<u8>,
    bank: &KernelBank,
    final_smoothing: bool,
    absorb_adjacent: bool,
) -> Result<Grid<u8>> {
    if class_mask.shape() != pass_mask.shape() {
        let (er, ec) = class_mask.shape();
        let (ar, ac) = pass_mask.shape();
        return Err(Error::SizeMismatch { er, ec, ar, ac });
    }

    let c1 = bank.get(1)?;

    let grown = mask_and(&dilate(pass_mask, c1)?, class_mask)?;
    let mut result = mask_or(pass_mask, &grown)?;

    if final_smoothing {
        let c3 = bank.get(3)?;
        let reach = dilate(&result, c3)?;
        result = erode(&reach, c3)?;
        debug!("final smoothing applied");
    }

    if absorb_adjacent {
        let touching = mask_and(&dilate(&result, c1)?, class_mask)?;
        result = mask_or(&result, &touching)?;
        debug!("adjacent class pixels absorbed");
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn refine_bank() -> KernelBank {
        KernelBank::with_radii(&[1, 3]).unwrap()
    }

    fn block_mask(rows: usize, cols: usize, r0: usize, r1: usize, c0: usize, c1: usize) -> Grid<u8> {
        let mut mask = Grid::new(rows, cols);
        for row in r0..r1 {
            for col in c0..c1 {
                mask.set(row, col, 1).unwrap();
            }
        }
        mask
    }

    #[test]
    fn test_shape_mismatch() {
        let class_mask: Grid<u8> = Grid::new(4, 4);
        let pass_mask: Grid<u8> = Grid::new(4, 5);
        assert!(refine(&class_mask, &pass_mask, &refine_bank(), false, false).is_err());
    }

    #[test]
    fn test_growth_clipped_to_class() {
        // Class covers a 2-wide column band; the pass mask is a single
        // pixel inside it. Growth reclaims class neighbors only.
        let class_mask = block_mask(5, 5, 0, 5, 1, 3);
        let mut pass_mask: Grid<u8> = Grid::new(5, 5);
        pass_mask.set(2, 2, 1).unwrap();

        let result = refine(&class_mask, &pass_mask, &refine_bank(), false, false).unwrap();

        assert_eq!(result.get(2, 2).unwrap(), 1);
        assert_eq!(result.get(1, 2).unwrap(), 1);
        assert_eq!(result.get(3, 2).unwrap(), 1);
        assert_eq!(result.get(2, 1).unwrap(), 1);
        // (2, 3) is reachable by the dilation but outside the class band.
        assert_eq!(result.get(2, 3).unwrap(), 0);
        // Growth is a single radius-1 step.
        assert_eq!(result.get(0, 2).unwrap(), 0);
    }

    #[test]
    fn test_growth_never_leaves_class() {
        let class_mask = block_mask(9, 9, 2, 7, 2, 7);
        let pass_mask = block_mask(9, 9, 3, 6, 3, 6);

        let result = refine(&class_mask, &pass_mask, &refine_bank(), false, false).unwrap();
        for row in 0..9 {
            for col in 0..9 {
                if result.get(row, col).unwrap() != 0 {
                    assert_eq!(
                        class_mask.get(row, col).unwrap(),
                        1,
                        "grown cell ({}, {}) must lie inside the class",
                        row,
                        col
                    );
                }
            }
        }
    }

    #[test]
    fn test_smoothing_keeps_compact_interior() {
        // A compact block well clear of the boundary survives the
        // dilate/erode round trip unchanged.
        let class_mask = block_mask(21, 21, 6, 15, 6, 15);
        let pass_mask = class_mask.clone();

        let smoothed = refine(&class_mask, &pass_mask, &refine_bank(), true, false).unwrap();
        let plain = refine(&class_mask, &pass_mask, &refine_bank(), false, false).unwrap();
        assert_eq!(smoothed, plain);
    }

    #[test]
    fn test_smoothing_clears_boundary_frame() {
        // Zero-padded erosion cannot keep anything within 3 cells of the
        // grid edge.
        let class_mask: Grid<u8> = Grid::filled(9, 9, 1);
        let pass_mask = class_mask.clone();

        let result = refine(&class_mask, &pass_mask, &refine_bank(), true, false).unwrap();
        for col in 0..9 {
            assert_eq!(result.get(0, col).unwrap(), 0);
            assert_eq!(result.get(2, col).unwrap(), 0);
        }
    }

    #[test]
    fn test_absorb_extends_growth_by_one_step() {
        // A chain of class pixels leading away from the pass pixel: growth
        // reclaims the first neighbor, absorption one more, the rest stay out.
        let mut class_mask: Grid<u8> = Grid::new(9, 9);
        for col in 2..8 {
            class_mask.set(4, col, 1).unwrap();
        }
        let mut pass_mask: Grid<u8> = Grid::new(9, 9);
        pass_mask.set(4, 3, 1).unwrap();

        let without = refine(&class_mask, &pass_mask, &refine_bank(), false, false).unwrap();
        assert_eq!(without.get(4, 4).unwrap(), 1, "growth step");
        assert_eq!(without.get(4, 5).unwrap(), 0);

        let with = refine(&class_mask, &pass_mask, &refine_bank(), false, true).unwrap();
        assert_eq!(with.get(4, 5).unwrap(), 1, "absorption step");
        assert_eq!(with.get(4, 6).unwrap(), 0, "absorption is a single step");
    }

    #[test]
    fn test_flags_off_is_growth_only() {
        let class_mask = block_mask(7, 7, 2, 5, 2, 5);
        let pass_mask = block_mask(7, 7, 3, 4, 3, 4);

        let result = refine(&class_mask, &pass_mask, &refine_bank(), false, false).unwrap();
        // Single pass pixel at (3, 3) grows a plus inside the class block.
        let set: usize = result.data().iter().map(|&v| v as usize).sum();
        assert_eq!(set, 5);
    }
}
