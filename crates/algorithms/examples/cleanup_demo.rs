//! Example: Cleaning a noisy classification
//!
//! This example demonstrates the mapclean workflow:
//! 1. Create a noisy class map (in real use, load from your raster stack)
//! 2. Filter the target class with multi-radius coverage voting
//! 3. Despike the traced stand outlines

use geo::{Geometry, LineString, Polygon};
use mapclean_algorithms::classfilter::{class_filter, ClassFilterParams};
use mapclean_algorithms::vector::{remove_spikes, SpikeParams};
use mapclean_core::Grid;

const TARGET_CLASS: i32 = 4;

fn main() {
    // Stage 1: raster cleanup
    let grid = create_noisy_class_map(40, 40);
    let class_pixels = grid.data().iter().filter(|&&v| v == TARGET_CLASS).count();
    println!("Class map: {} x {}", grid.rows(), grid.cols());
    println!("Raw class-{} pixels: {}", TARGET_CLASS, class_pixels);

    let params = ClassFilterParams {
        classes: vec![TARGET_CLASS],
        ..ClassFilterParams::default()
    };
    let mask = class_filter(&grid, &params).unwrap();

    let kept = mask.data().iter().filter(|&&v| v != 0).count();
    println!(
        "Cleaned mask: {} pixels kept, {} filtered as noise\n",
        kept,
        class_pixels.saturating_sub(kept)
    );
    render(&mask);

    // Stage 2: vector cleanup on a traced outline
    let outline = Polygon::new(
        LineString::from(vec![
            (8.0, 8.0),
            (30.0, 8.0),
            (30.0, 30.0),
            (19.0, 95.0), // digitizing needle
            (8.0, 30.0),
            (8.0, 8.0),
        ]),
        vec![],
    );
    let before = outline.exterior().0.len();
    let (cleaned, removed) =
        remove_spikes(&Geometry::Polygon(outline), &SpikeParams::default()).unwrap();

    if let Geometry::Polygon(p) = &cleaned {
        println!(
            "\nOutline despiked: {} -> {} vertices ({} spike removed)",
            before,
            p.exterior().0.len(),
            removed
        );
    }

    println!("\n✓ Cleanup complete!");
}

/// A block of the target class with salt-and-pepper noise around it
fn create_noisy_class_map(rows: usize, cols: usize) -> Grid<i32> {
    let mut grid = Grid::filled(rows, cols, 1);

    for row in 8..30 {
        for col in 8..30 {
            grid.set(row, col, TARGET_CLASS).unwrap();
        }
    }

    // Deterministic speckle outside the block
    for row in 0..rows {
        for col in 0..cols {
            let outside = !(8..30).contains(&row) || !(8..30).contains(&col);
            if outside && (row * 31 + col * 17) % 41 == 0 {
                grid.set(row, col, TARGET_CLASS).unwrap();
            }
        }
    }

    grid
}

/// Print the mask as ASCII art, one character per cell
fn render(mask: &Grid<u8>) {
    for row in 0..mask.rows() {
        let line: String = (0..mask.cols())
            .map(|col| {
                if mask.get(row, col).unwrap() != 0 {
                    '#'
                } else {
                    '.'
                }
            })
            .collect();
        println!("{}", line);
    }
}
