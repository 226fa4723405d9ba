//! Multi-radius coverage filtering for classified grids
//!
//! Cleans a noisy per-pixel classification into a compact boolean mask:
//! - **Kernels**: discretized circular structuring kernels per radius
//! - **Correlation**: zero-padded footprint counts, plus boolean dilate/erode
//! - **Coverage**: per-radius coverage votes over the class membership mask
//! - **Refinement**: class-clipped growth, optional smoothing and absorption
//!
//! The stage functions are public so callers can run stages individually;
//! [`class_filter`] chains them with a shared kernel bank.

mod correlate;
mod coverage;
mod kernel;
mod pipeline;
mod refine;

pub use correlate::{correlate, dilate, erode, mask_and, mask_or};
pub use coverage::{coverage_filter, coverage_mask, extract_classes, CoverageThresholds};
pub use kernel::{CircleKernel, KernelBank};
pub use pipeline::{class_filter, ClassFilter, ClassFilterParams};
pub use refine::refine;
