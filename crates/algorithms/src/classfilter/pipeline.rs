//! End-to-end class filtering pipeline

use mapclean_core::{Algorithm, Error, Grid, Result};
use tracing::debug;

use super::coverage::{coverage_filter, extract_classes, CoverageThresholds};
use super::kernel::KernelBank;
use super::refine::refine;

/// Radii needed by the full pipeline: 1 for the refinement growth steps,
/// 2..5 for the coverage votes, 3 for smoothing.
const PIPELINE_RADII: [usize; 5] = [1, 2, 3, 4, 5];

/// Parameters for the class filtering pipeline
#[derive(Debug, Clone)]
pub struct ClassFilterParams {
    /// Class codes to keep from the input grid
    pub classes: Vec<i32>,
    /// Coverage percentage per filter radius
    pub coverage: CoverageThresholds,
    /// Keep only cells whose entire radius-3 neighborhood stays covered
    pub final_smoothing: bool,
    /// Reclaim class pixels immediately touching the accepted area
    pub absorb_adjacent: bool,
}

impl Default for ClassFilterParams {
    fn default() -> Self {
        Self {
            classes: Vec::new(),
            coverage: CoverageThresholds::default(),
            final_smoothing: true,
            absorb_adjacent: true,
        }
    }
}

/// Class filtering algorithm
#[derive(Debug, Clone, Default)]
pub struct ClassFilter;

impl Algorithm for ClassFilter {
    type Input = Grid<i32>;
    type Output = Grid<u8>;
    type Params = ClassFilterParams;
    type Error = Error;

    fn name(&self) -> &'static str {
        "ClassFilter"
    }

    fn description(&self) -> &'static str {
        "Multi-radius coverage filter producing a cleaned boolean mask of the target classes"
    }

    fn execute(&self, input: Self::Input, params: Self::Params) -> Result<Self::Output> {
        class_filter(&input, &params)
    }
}

/// Run the full class filtering pipeline on a classification grid.
///
/// The stages run in order: class extraction, coverage voting at radii
/// 2..5, then refinement. The result is a boolean mask (values 0/1) with
/// the input's dimensions. The input grid is never modified.
///
/// # Errors
/// Returns an error for a zero-sized grid or coverage percentages outside
/// `[0, 100]`.
pub fn class_filter(grid: &Grid<i32>, params: &ClassFilterParams) -> Result<Grid<u8>> {
    if grid.is_empty() {
        return Err(Error::InvalidDimensions {
            rows: grid.rows(),
            cols: grid.cols(),
        });
    }
    params.coverage.validate()?;

    let bank = KernelBank::with_radii(&PIPELINE_RADII)?;

    debug!(classes = ?params.classes, rows = grid.rows(), cols = grid.cols(), "class filter start");
    let class_mask = extract_classes(grid, &params.classes)?;
    let pass_mask = coverage_filter(&class_mask, &bank, &params.coverage)?;

    refine(
        &class_mask,
        &pass_mask,
        &bank,
        params.final_smoothing,
        params.absorb_adjacent,
    )
}
