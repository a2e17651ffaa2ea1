//! Topology regions from TIN contours
//!
//! With the `geojson` feature the regions and network are also printed as
//! GeoJSON: `cargo run --example topology_demo --features geojson`.

use elevation_surface::*;

fn main() -> Result<()> {
    env_logger::init();

    println!("=== elevation_surface Topology Demo ===\n");

    let points = PointSet::from_xyz(&[
        (0.0, 0.0, 12.0),
        (30.0, 2.0, 18.0),
        (60.0, 0.0, 25.0),
        (5.0, 28.0, 20.0),
        (32.0, 30.0, 48.0),
        (58.0, 27.0, 33.0),
        (0.0, 60.0, 15.0),
        (29.0, 57.0, 27.0),
        (60.0, 60.0, 40.0),
    ]);

    let config = SurfaceConfigBuilder::new()
        .algorithm(AlgorithmMode::TriangulatedIrregularNetwork)
        .contours(true)
        .contour_count(5)?
        .topology(true)
        .color_seed(7)
        .build()?;

    let model = ElevationModel::generate(&points, config)?;
    println!("Triangles: {}", model.surface().len());
    println!("Contours: {}", model.contours().len());

    if let Some(topology) = model.topology() {
        println!("Network lines: {}", topology.network.len());
        println!("Regions: {}", topology.regions.len());
        for (i, region) in topology.regions.iter().enumerate().take(10) {
            println!(
                "  #{:<2} {} area {:>7.2} ({} vertices, {} holes)",
                i,
                region.color,
                region.polygon.area(),
                region.polygon.exterior.len() - 1,
                region.polygon.holes.len()
            );
        }

        #[cfg(feature = "geojson")]
        {
            let (regions, network) = topology_to_geojson(topology);
            let regions = serde_json::to_string_pretty(&regions).unwrap_or_default();
            let network = serde_json::to_string(&network).unwrap_or_default();
            println!("\nRegions as GeoJSON:\n{}", regions);
            println!("\nNetwork as GeoJSON:\n{}", network);
        }
    }

    println!("\n=== Demo Complete ===");
    Ok(())
}
