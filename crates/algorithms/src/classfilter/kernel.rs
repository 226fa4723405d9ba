//! Circular structuring kernels for coverage filtering
//!
//! The filter pipeline correlates class masks against discretized disks of
//! several radii. Kernels are pure functions of the radius, generated once
//! and shared read-only across the pipeline stages.

use mapclean_core::{Error, Result};
use ndarray::Array2;
use std::collections::BTreeMap;

/// A discretized circular structuring kernel of odd side `2 * radius + 1`.
///
/// A cell at quadrant position `(i, j)` (both counted from 1) is active when
/// `sqrt(i^2 + j^2) <= radius + 0.4`, mirrored into all four quadrants. The
/// four axis-aligned arms and the center cell are always active, so the
/// kernel is connected at every radius. The pattern is symmetric under 90°
/// rotation, which makes correlation and convolution interchangeable.
#[derive(Debug, Clone, PartialEq)]
pub struct CircleKernel {
    radius: usize,
    cells: Array2<bool>,
    offsets: Vec<(isize, isize)>,
}

impl CircleKernel {
    /// Generate the kernel for the given radius.
    ///
    /// A radius of zero would degenerate to a single-cell kernel that makes
    /// every coverage test trivially pass, so it is rejected.
    pub fn new(radius: usize) -> Result<Self> {
        if radius == 0 {
            return Err(Error::InvalidParameter {
                name: "radius",
                value: "0".to_string(),
                reason: "structuring kernel radius must be at least 1".to_string(),
            });
        }

        let r = radius;
        let side = 2 * r + 1;
        let mut cells = Array2::from_elem((side, side), false);

        // Disk cells, mirrored into all four quadrants.
        for i in 1..=r {
            for j in 1..=r {
                let dist = ((i * i + j * j) as f64).sqrt();
                if dist <= r as f64 + 0.4 {
                    cells[[r - i, r - j]] = true;
                    cells[[r - i, r + j]] = true;
                    cells[[r + i, r - j]] = true;
                    cells[[r + i, r + j]] = true;
                }
            }
        }

        // Axis-aligned arms and the center.
        for d in 1..=r {
            cells[[r, r - d]] = true;
            cells[[r, r + d]] = true;
            cells[[r - d, r]] = true;
            cells[[r + d, r]] = true;
        }
        cells[[r, r]] = true;

        let mut offsets = Vec::new();
        for row in 0..side {
            for col in 0..side {
                if cells[[row, col]] {
                    offsets.push((row as isize - r as isize, col as isize - r as isize));
                }
            }
        }

        Ok(Self {
            radius,
            cells,
            offsets,
        })
    }

    /// Kernel radius
    pub fn radius(&self) -> usize {
        self.radius
    }

    /// Side length of the kernel window (`2 * radius + 1`, always odd)
    pub fn side(&self) -> usize {
        2 * self.radius + 1
    }

    /// Number of active cells (the footprint area)
    pub fn area(&self) -> usize {
        self.offsets.len()
    }

    /// `(dr, dc)` offsets of all active cells relative to the center
    pub fn offsets(&self) -> &[(isize, isize)] {
        &self.offsets
    }

    /// Whether the cell at offset `(dr, dc)` from the center is active
    pub fn contains(&self, dr: isize, dc: isize) -> bool {
        let r = self.radius as isize;
        if dr.abs() > r || dc.abs() > r {
            return false;
        }
        self.cells[[(dr + r) as usize, (dc + r) as usize]]
    }
}

/// Read-only lookup of generated kernels, keyed by radius.
///
/// Built once per filter run and never mutated afterwards, so it can be
/// shared freely between concurrent pipeline invocations.
#[derive(Debug, Clone)]
pub struct KernelBank {
    kernels: BTreeMap<usize, CircleKernel>,
}

impl KernelBank {
    /// Generate kernels for every radius in `radii`. Duplicates are generated once.
    pub fn with_radii(radii: &[usize]) -> Result<Self> {
        let mut kernels = BTreeMap::new();
        for &radius in radii {
            if !kernels.contains_key(&radius) {
                kernels.insert(radius, CircleKernel::new(radius)?);
            }
        }
        Ok(Self { kernels })
    }

    /// Look up the kernel for a radius.
    ///
    /// Requesting a radius the bank was not built with is an error, never a
    /// silent fallback to some other kernel.
    pub fn get(&self, radius: usize) -> Result<&CircleKernel> {
        self.kernels
            .get(&radius)
            .ok_or(Error::KernelNotGenerated(radius))
    }

    /// Radii available in this bank, in ascending order
    pub fn radii(&self) -> impl Iterator<Item = usize> + '_ {
        self.kernels.keys().copied()
    }
}
