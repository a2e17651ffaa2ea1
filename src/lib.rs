//! Elevation surfaces from scattered samples
//!
//! Turns a sparse set of irregular elevation samples into a continuous
//! surface: an interpolated grid or a Delaunay TIN, contour lines at equally
//! spaced breaks, and a planar topology of regions cut by the contours and a
//! fixed frame over the data.
//!
//! # Quick Start
//!
//! ```rust
//! use elevation_surface::*;
//!
//! let points = PointSet::from_xyz(&[
//!     (0.0, 0.0, 12.0),
//!     (40.0, 5.0, 30.0),
//!     (10.0, 35.0, 18.0),
//!     (45.0, 40.0, 55.0),
//!     (22.0, 20.0, 41.0),
//! ]);
//!
//! let config = SurfaceConfigBuilder::new()
//!     .algorithm(AlgorithmMode::TriangulatedIrregularNetwork)
//!     .contours(true)
//!     .contour_count(4).unwrap()
//!     .smooth_contours(true)
//!     .topology(true)
//!     .build().unwrap();
//!
//! let model = ElevationModel::generate(&points, config).unwrap();
//! println!("{} triangles", model.surface().len());
//! for line in model.contours() {
//!     println!("contour {:.1} with {} points", line.level, line.points.len());
//! }
//! ```
//!
//! Every stage is also available on its own: [`interpolate_grid`],
//! [`triangulate`], [`contours_from_grid`], [`contours_from_tin`],
//! [`smooth_contours`] and [`build_topology`].
//!
//! # Features
//!
//! - `serde`: Enables serialization support for configuration and outputs
//! - `geojson`: Conversions from point feature collections and into feature
//!   collections for every output

// Modules
pub mod error;
pub mod config;
pub mod point;
pub mod geometry;
pub mod interpolation;
pub mod tin;
pub mod contour;
pub mod topology;
pub mod model;

#[cfg(feature = "geojson")]
pub mod geojson;

// Re-export core types for convenience
pub use error::{Result, SurfaceError};
pub use config::{AlgorithmMode, GridDensity, SurfaceConfig, SurfaceConfigBuilder};
pub use point::{BoundingBox, PointSet, SamplePoint};
pub use interpolation::{
    directional_weighted_average, interpolate_grid, inverse_distance_weighting,
    DirectionalSectors, Grid, GridCell, InverseDistance, Interpolator, MAX_GRID_CELLS,
};
pub use tin::{triangulate, Corner, Triangle};
pub use contour::{
    contours_from_grid, contours_from_tin, equal_interval_breaks, smooth_contours,
    smooth_polyline, ContourLine,
};
pub use topology::{
    build_line_network, build_topology, LineNetwork, PaletteColorizer, Polygon, RandomColorizer,
    Region, RegionColor, RegionColorizer, Topology,
};
pub use model::{ElevationModel, Surface};

#[cfg(feature = "geojson")]
pub use crate::geojson::{
    contours_to_geojson, network_to_geojson, surface_to_geojson, topology_to_geojson,
};

// Re-export glam::DVec2 for convenience
pub use glam::DVec2;
