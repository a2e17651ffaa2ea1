//! Grid and TIN contours over a synthetic hill
//!
//! Run with `RUST_LOG=debug cargo run --example contour_demo` to see stage
//! timings.

use elevation_surface::*;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

fn hill_samples(count: usize, seed: u64) -> PointSet {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..count)
        .map(|_| {
            let x: f64 = rng.gen_range(0.0..100.0);
            let y: f64 = rng.gen_range(0.0..100.0);
            let d2 = (x - 50.0).powi(2) + (y - 45.0).powi(2);
            SamplePoint::new(x, y, 80.0 * (-d2 / 900.0).exp() + 5.0)
        })
        .collect()
}

fn main() -> Result<()> {
    env_logger::init();

    println!("=== elevation_surface Contour Demo ===\n");

    let points = hill_samples(150, 2024);
    println!("Samples: {}", points.len());
    if let Some(bbox) = points.bounding_box() {
        println!("  Bounding box: {:?} .. {:?}", bbox.min, bbox.max);
    }

    for algorithm in [
        AlgorithmMode::InverseDistance,
        AlgorithmMode::DirectionalWeighted,
        AlgorithmMode::TriangulatedIrregularNetwork,
    ] {
        let config = SurfaceConfigBuilder::new()
            .algorithm(algorithm)
            .density(4.0, 4.0)?
            .contours(true)
            .contour_count(6)?
            .smooth_contours(true)
            .build()?;

        let model = ElevationModel::generate(&points, config)?;
        println!("\n{}:", algorithm.name());
        match model.surface() {
            Surface::Grid(grid) => {
                println!("  Grid: {} x {} cells", grid.columns, grid.rows);
                if let Some((lo, hi)) = grid.value_range() {
                    println!("  Values: {:.2} .. {:.2}", lo, hi);
                }
            }
            Surface::Tin(triangles) => println!("  Triangles: {}", triangles.len()),
        }

        let closed = model.contours().iter().filter(|c| c.is_closed()).count();
        println!("  Contours: {} ({} closed)", model.contours().len(), closed);
        for line in model.contours().iter().take(4) {
            println!(
                "    level {:>6.2}: {:>3} points, length {:.1}",
                line.level,
                line.points.len(),
                line.length()
            );
        }
    }

    println!("\n=== Demo Complete ===");
    Ok(())
}
