//! Class extraction and multi-radius coverage voting
//!
//! The coverage stage turns a class-code grid into a pass mask: a pixel
//! survives when, at any of the four filter radii, enough of its circular
//! neighborhood belongs to the target classes.

use mapclean_core::{Error, Grid, Result};
use rayon::prelude::*;
use tracing::debug;

use super::correlate::correlate;
use super::kernel::KernelBank;

/// Coverage percentages for the four filter radii, each in `[0, 100]`.
#[derive(Debug, Clone)]
pub struct CoverageThresholds {
    /// Minimum neighborhood coverage at radius 2
    pub radius2: f64,
    /// Minimum neighborhood coverage at radius 3
    pub radius3: f64,
    /// Minimum neighborhood coverage at radius 4
    pub radius4: f64,
    /// Minimum neighborhood coverage at radius 5
    pub radius5: f64,
}

impl Default for CoverageThresholds {
    fn default() -> Self {
        Self {
            radius2: 50.0,
            radius3: 50.0,
            radius4: 50.0,
            radius5: 50.0,
        }
    }
}

impl CoverageThresholds {
    /// The `(radius, percentage)` pairs in ascending radius order
    pub fn per_radius(&self) -> [(usize, f64); 4] {
        [
            (2, self.radius2),
            (3, self.radius3),
            (4, self.radius4),
            (5, self.radius5),
        ]
    }

    /// Validate that all four percentages lie within `[0, 100]`
    pub fn validate(&self) -> Result<()> {
        for (radius, pct) in self.per_radius() {
            if !pct.is_finite() || !(0.0..=100.0).contains(&pct) {
                return Err(Error::InvalidParameter {
                    name: "coverage",
                    value: format!("{} (radius {})", pct, radius),
                    reason: "coverage percentage must be within [0, 100]".to_string(),
                });
            }
        }
        Ok(())
    }
}

/// Build the class membership mask: 1 where the grid's class code is in `classes`.
///
/// An empty class list is not an error; it yields an all-false mask, and the
/// rest of the pipeline degrades to all-false with it.
pub fn extract_classes(grid: &Grid<i32>, classes: &[i32]) -> Result<Grid<u8>> {
    if grid.is_empty() {
        return Err(Error::InvalidDimensions {
            rows: grid.rows(),
            cols: grid.cols(),
        });
    }

    let (rows, cols) = grid.shape();
    let data: Vec<u8> = (0..rows)
        .into_par_iter()
        .flat_map(|row| {
            let mut row_data = vec![0u8; cols];
            for (col, row_data_col) in row_data.iter_mut().enumerate() {
                let code = unsafe { grid.get_unchecked(row, col) };
                if classes.contains(&code) {
                    *row_data_col = 1;
                }
            }
            row_data
        })
        .collect();

    Grid::from_vec(data, rows, cols)
}

/// Threshold footprint counts against a coverage percentage.
///
/// A cell passes when `count > kernel_area * pct / 100`, strictly greater:
/// at 100% no cell can ever pass, and at 0% any nonzero coverage passes.
pub fn coverage_mask(counts: &Grid<u32>, kernel_area: usize, pct: f64) -> Result<Grid<u8>> {
    if !pct.is_finite() || !(0.0..=100.0).contains(&pct) {
        return Err(Error::InvalidParameter {
            name: "coverage",
            value: pct.to_string(),
            reason: "coverage percentage must be within [0, 100]".to_string(),
        });
    }

    let bar = kernel_area as f64 * pct / 100.0;
    let (rows, cols) = counts.shape();
    let data = counts
        .data()
        .iter()
        .map(|&c| u8::from(f64::from(c) > bar))
        .collect();
    Grid::from_vec(data, rows, cols)
}

/// Combine the per-radius coverage verdicts into a single pass mask.
///
/// The membership mask is correlated against the radius-2..5 kernels and
/// each result is thresholded with its own percentage. Verdicts are folded
/// into a 4-bit vote code (bit 0 = radius 2, bit 3 = radius 5); a pixel
/// passes when any vote bit is set, so one generous radius is enough.
pub fn coverage_filter(
    class_mask: &Grid<u8>,
    bank: &KernelBank,
    thresholds: &CoverageThresholds,
) -> Result<Grid<u8>> {
    thresholds.validate()?;

    let mut votes = vec![0u8; class_mask.len()];
    for (bit, (radius, pct)) in thresholds.per_radius().into_iter().enumerate() {
        let kernel = bank.get(radius)?;
        let counts = correlate(class_mask, kernel)?;
        let passed = coverage_mask(&counts, kernel.area(), pct)?;

        let weight = 1u8 << bit;
        let mut set = 0usize;
        for (vote, &p) in votes.iter_mut().zip(passed.data().iter()) {
            if p != 0 {
                *vote |= weight;
                set += 1;
            }
        }
        debug!(radius, pct, passing = set, "coverage vote");
    }

    let (rows, cols) = class_mask.shape();
    let data = votes.into_iter().map(|w| u8::from(w > 0)).collect();
    Grid::from_vec(data, rows, cols)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_classes() {
        let grid = Grid::from_vec(vec![3, 5, 4, 3], 2, 2).unwrap();
        let mask = extract_classes(&grid, &[3, 4]).unwrap();
        assert_eq!(
            mask.data().iter().copied().collect::<Vec<_>>(),
            vec![1, 0, 1, 1]
        );
    }

    #[test]
    fn test_extract_classes_empty_list() {
        let grid = Grid::from_vec(vec![3, 5, 4, 3], 2, 2).unwrap();
        let mask = extract_classes(&grid, &[]).unwrap();
        assert!(mask.data().iter().all(|&v| v == 0));
    }

    #[test]
    fn test_extract_classes_empty_grid() {
        let grid: Grid<i32> = Grid::new(0, 0);
        assert!(extract_classes(&grid, &[1]).is_err());
    }

    #[test]
    fn test_coverage_mask_strictly_greater() {
        // Area 21 at 50% puts the bar at 10.5: 11 passes, 10 does not.
        let counts = Grid::from_vec(vec![5u32, 11, 10, 0], 2, 2).unwrap();
        let mask = coverage_mask(&counts, 21, 50.0).unwrap();
        assert_eq!(
            mask.data().iter().copied().collect::<Vec<_>>(),
            vec![0, 1, 0, 0]
        );
    }

    #[test]
    fn test_coverage_mask_extremes() {
        let counts = Grid::from_vec(vec![21u32, 1, 0, 20], 2, 2).unwrap();

        // 0%: any nonzero count passes.
        let mask = coverage_mask(&counts, 21, 0.0).unwrap();
        assert_eq!(
            mask.data().iter().copied().collect::<Vec<_>>(),
            vec![1, 1, 0, 1]
        );

        // 100%: even a full footprint fails the strict comparison.
        let mask = coverage_mask(&counts, 21, 100.0).unwrap();
        assert!(mask.data().iter().all(|&v| v == 0));
    }

    #[test]
    fn test_coverage_mask_invalid_pct() {
        let counts: Grid<u32> = Grid::new(2, 2);
        assert!(coverage_mask(&counts, 21, -1.0).is_err());
        assert!(coverage_mask(&counts, 21, 100.1).is_err());
        assert!(coverage_mask(&counts, 21, f64::NAN).is_err());
    }

    #[test]
    fn test_thresholds_validate() {
        assert!(CoverageThresholds::default().validate().is_ok());

        let bad = CoverageThresholds {
            radius3: 150.0,
            ..CoverageThresholds::default()
        };
        assert!(bad.validate().is_err());
    }

    fn filter_bank() -> KernelBank {
        KernelBank::with_radii(&[2, 3, 4, 5]).unwrap()
    }

    #[test]
    fn test_isolated_pixel_filtered_out() {
        let mut class_mask: Grid<u8> = Grid::new(11, 11);
        class_mask.set(5, 5, 1).unwrap();

        let passed =
            coverage_filter(&class_mask, &filter_bank(), &CoverageThresholds::default()).unwrap();
        assert!(
            passed.data().iter().all(|&v| v == 0),
            "a lone pixel never reaches 50% coverage at any radius"
        );
    }

    #[test]
    fn test_dense_grid_passes_everywhere() {
        // At 30% even corner cells pass radius 2 despite the clipped
        // footprint (8 of 21 cells visible > 6.3).
        let class_mask: Grid<u8> = Grid::filled(11, 11, 1);
        let thresholds = CoverageThresholds {
            radius2: 30.0,
            radius3: 30.0,
            radius4: 30.0,
            radius5: 30.0,
        };

        let passed = coverage_filter(&class_mask, &filter_bank(), &thresholds).unwrap();
        assert!(passed.data().iter().all(|&v| v == 1));
    }

    #[test]
    fn test_single_generous_radius_is_enough() {
        // A 7x7 block inside a 21x21 grid: its center covers all 49 cells of
        // the radius-5 footprint clipped to the block, which clears a 40%
        // bar (38.8) while the tight radius-2..4 bars at 100% never pass.
        let mut class_mask: Grid<u8> = Grid::new(21, 21);
        for row in 7..14 {
            for col in 7..14 {
                class_mask.set(row, col, 1).unwrap();
            }
        }

        let thresholds = CoverageThresholds {
            radius2: 100.0,
            radius3: 100.0,
            radius4: 100.0,
            radius5: 40.0,
        };

        let passed = coverage_filter(&class_mask, &filter_bank(), &thresholds).unwrap();
        assert_eq!(passed.get(10, 10).unwrap(), 1, "radius-5 vote should pass");
        assert_eq!(passed.get(0, 0).unwrap(), 0);
    }
}
