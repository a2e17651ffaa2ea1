//! ElevationModel: the whole pipeline behind one call

use std::time::Instant;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::config::{AlgorithmMode, SurfaceConfig};
use crate::contour::{contours_from_grid, contours_from_tin, smooth_contours, ContourLine};
use crate::error::Result;
use crate::interpolation::{interpolate_grid, DirectionalSectors, Grid, InverseDistance};
use crate::point::{BoundingBox, PointSet};
use crate::tin::{triangulate, Triangle};
use crate::topology::{build_topology, RandomColorizer, RegionColorizer, Topology};

/// The surface built from the samples, depending on the algorithm mode
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub enum Surface {
    /// Interpolated grid (both weighting modes)
    Grid(Grid),
    /// Triangulated irregular network
    Tin(Vec<Triangle>),
}

impl Surface {
    /// The grid, if this is a grid surface
    pub fn as_grid(&self) -> Option<&Grid> {
        match self {
            Surface::Grid(grid) => Some(grid),
            Surface::Tin(_) => None,
        }
    }

    /// The triangles, if this is a TIN
    pub fn as_triangles(&self) -> Option<&[Triangle]> {
        match self {
            Surface::Grid(_) => None,
            Surface::Tin(triangles) => Some(triangles),
        }
    }

    /// Number of cells or triangles
    pub fn len(&self) -> usize {
        match self {
            Surface::Grid(grid) => grid.cell_count(),
            Surface::Tin(triangles) => triangles.len(),
        }
    }

    /// Whether there are no cells or triangles
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Every output of one pipeline run
///
/// A model holds owned data only; running the pipeline again with new
/// parameters simply produces a new model that replaces the old one.
///
/// # Examples
///
/// ```
/// use elevation_surface::*;
///
/// let points = PointSet::from_xyz(&[
///     (0.0, 0.0, 10.0),
///     (10.0, 0.0, 20.0),
///     (0.0, 10.0, 30.0),
///     (10.0, 10.0, 15.0),
/// ]);
/// let config = SurfaceConfigBuilder::new()
///     .algorithm(AlgorithmMode::InverseDistance)
///     .density(1.0, 1.0)
///     .unwrap()
///     .contours(true)
///     .topology(true)
///     .build()
///     .unwrap();
///
/// let model = ElevationModel::generate(&points, config).unwrap();
/// assert_eq!(model.surface().len(), 100);
/// assert!(!model.contours().is_empty());
/// assert!(model.topology().is_some());
/// ```
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct ElevationModel {
    config: SurfaceConfig,
    bounding_box: Option<BoundingBox>,
    surface: Surface,
    contours: Vec<ContourLine>,
    topology: Option<Topology>,
}

impl ElevationModel {
    /// Run the pipeline with seeded random region colours
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if `config` fails validation and
    /// `InvalidInput` if a sample has a non-finite position. Nothing is
    /// computed in either case.
    pub fn generate(points: &PointSet, config: SurfaceConfig) -> Result<Self> {
        let mut colorizer = RandomColorizer::new(config.color_seed);
        Self::generate_with_colorizer(points, config, &mut colorizer)
    }

    /// Run the pipeline with a custom region colorizer
    ///
    /// # Example
    ///
    /// ```
    /// use elevation_surface::*;
    ///
    /// let points = PointSet::from_xyz(&[(0.0, 0.0, 1.0), (4.0, 0.0, 2.0), (0.0, 4.0, 3.0)]);
    /// let config = SurfaceConfigBuilder::new().topology(true).build().unwrap();
    /// let mut grey = |_: &[DVec2]| RegionColor::new(128, 128, 128);
    ///
    /// let model = ElevationModel::generate_with_colorizer(&points, config, &mut grey).unwrap();
    /// let topology = model.topology().unwrap();
    /// assert!(topology.regions.iter().all(|r| r.color.to_hex() == "#808080"));
    /// ```
    pub fn generate_with_colorizer<C>(
        points: &PointSet,
        config: SurfaceConfig,
        colorizer: &mut C,
    ) -> Result<Self>
    where
        C: RegionColorizer + ?Sized,
    {
        config.validate()?;
        points.validate()?;

        let start = Instant::now();
        let property = config.property.as_str();
        let surface = match config.algorithm {
            AlgorithmMode::InverseDistance => {
                let interpolator = InverseDistance {
                    power: config.idw_power,
                };
                Surface::Grid(interpolate_grid(points, config.density, &interpolator, property)?)
            }
            AlgorithmMode::DirectionalWeighted => {
                let interpolator = DirectionalSectors {
                    sector_count: config.sector_count,
                };
                Surface::Grid(interpolate_grid(points, config.density, &interpolator, property)?)
            }
            AlgorithmMode::TriangulatedIrregularNetwork => {
                Surface::Tin(triangulate(points, property))
            }
        };

        let mut contours = Vec::new();
        if config.contours {
            contours = match &surface {
                Surface::Grid(grid) => contours_from_grid(grid, config.contour_count),
                Surface::Tin(triangles) => contours_from_tin(triangles, config.contour_count),
            };
            if config.smooth_contours {
                contours = smooth_contours(&contours);
            }
        }

        let bounding_box = points.bounding_box();
        let topology = match (config.topology, &bounding_box) {
            (true, Some(frame)) => Some(build_topology(&contours, frame, colorizer)),
            (true, None) => Some(Topology::default()),
            (false, _) => None,
        };

        log::debug!(
            "{} pipeline: {} samples -> {} surface elements, {} contours, {} regions in {:.2?}",
            config.algorithm.name(),
            points.len(),
            surface.len(),
            contours.len(),
            topology.as_ref().map_or(0, |t| t.regions.len()),
            start.elapsed()
        );

        Ok(Self {
            config,
            bounding_box,
            surface,
            contours,
            topology,
        })
    }

    /// Get the configuration used for this run
    #[inline]
    pub fn config(&self) -> &SurfaceConfig {
        &self.config
    }

    /// Bounding box of the input samples, `None` when there were none
    #[inline]
    pub fn bounding_box(&self) -> Option<&BoundingBox> {
        self.bounding_box.as_ref()
    }

    /// The grid or triangles built for this run
    #[inline]
    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    /// Contour lines, empty unless contours were requested
    #[inline]
    pub fn contours(&self) -> &[ContourLine] {
        &self.contours
    }

    /// Regions and line network, when topology was requested
    #[inline]
    pub fn topology(&self) -> Option<&Topology> {
        self.topology.as_ref()
    }

    /// Take the outputs apart
    pub fn into_parts(self) -> (Surface, Vec<ContourLine>, Option<Topology>) {
        (self.surface, self.contours, self.topology)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SurfaceConfigBuilder;
    use crate::error::SurfaceError;
    use crate::point::SamplePoint;
    use glam::DVec2;
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;

    fn hill(count: usize, seed: u64) -> PointSet {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        (0..count)
            .map(|_| {
                let x: f64 = rng.gen_range(0.0..20.0);
                let y: f64 = rng.gen_range(0.0..20.0);
                let z = 100.0 - (x - 10.0).powi(2) - (y - 10.0).powi(2);
                SamplePoint::new(x, y, z)
            })
            .collect()
    }

    fn config(algorithm: AlgorithmMode) -> SurfaceConfig {
        SurfaceConfigBuilder::new()
            .algorithm(algorithm)
            .density(2.0, 2.0)
            .unwrap()
            .contours(true)
            .contour_count(4)
            .unwrap()
            .topology(true)
            .build()
            .unwrap()
    }

    #[test]
    fn test_model_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ElevationModel>();
    }

    #[test]
    fn test_grid_modes_produce_grids() {
        let points = hill(40, 1);
        for mode in [AlgorithmMode::InverseDistance, AlgorithmMode::DirectionalWeighted] {
            let model = ElevationModel::generate(&points, config(mode)).unwrap();
            let grid = model.surface().as_grid().expect("grid surface");
            assert!(grid.columns >= 5 && grid.rows >= 5);
            assert!(model.surface().as_triangles().is_none());
            assert!(!model.contours().is_empty());
            assert!(model.contours().iter().all(|c| c.points.len() >= 2));
        }
    }

    #[test]
    fn test_tin_mode_produces_triangles() {
        let points = hill(40, 2);
        let model =
            ElevationModel::generate(&points, config(AlgorithmMode::TriangulatedIrregularNetwork))
                .unwrap();
        let triangles = model.surface().as_triangles().expect("triangle surface");
        assert!(!triangles.is_empty());
        assert!(model.topology().is_some());
    }

    #[test]
    fn test_contour_levels_lie_inside_value_range() {
        let points = hill(30, 3);
        let model = ElevationModel::generate(&points, config(AlgorithmMode::InverseDistance))
            .unwrap();
        let (lo, hi) = model.surface().as_grid().unwrap().value_range().unwrap();
        assert!(model.contours().iter().all(|c| c.level > lo && c.level < hi));
    }

    #[test]
    fn test_optional_stages_are_skipped() {
        let points = hill(20, 4);
        let config = SurfaceConfigBuilder::new().density(2.0, 2.0).unwrap().build().unwrap();
        let model = ElevationModel::generate(&points, config).unwrap();
        assert!(model.contours().is_empty());
        assert!(model.topology().is_none());
    }

    #[test]
    fn test_topology_without_contours_uses_frame_only() {
        let points = hill(20, 5);
        let config = SurfaceConfigBuilder::new()
            .density(2.0, 2.0)
            .unwrap()
            .topology(true)
            .build()
            .unwrap();
        let model = ElevationModel::generate(&points, config).unwrap();
        let topology = model.topology().unwrap();
        assert_eq!(topology.network.len(), 8);
        assert_eq!(topology.regions.len(), 7);
    }

    #[test]
    fn test_smoothing_keeps_line_count_and_endpoints() {
        let points = hill(40, 6);
        let mut rough_config = config(AlgorithmMode::DirectionalWeighted);
        rough_config.topology = false;
        let mut smooth_config = rough_config.clone();
        smooth_config.smooth_contours = true;

        let rough = ElevationModel::generate(&points, rough_config).unwrap();
        let smooth = ElevationModel::generate(&points, smooth_config).unwrap();
        assert_eq!(rough.contours().len(), smooth.contours().len());
        for (a, b) in rough.contours().iter().zip(smooth.contours()) {
            assert_eq!(a.points.first(), b.points.first());
            assert_eq!(a.points.last(), b.points.last());
        }
    }

    #[test]
    fn test_runs_are_reproducible() {
        let points = hill(30, 7);
        let first = ElevationModel::generate(&points, config(AlgorithmMode::InverseDistance));
        let second = ElevationModel::generate(&points, config(AlgorithmMode::InverseDistance));
        assert_eq!(first.unwrap(), second.unwrap());
    }

    #[test]
    fn test_invalid_config_is_rejected_before_running() {
        let bad = SurfaceConfig {
            contour_count: 0,
            ..Default::default()
        };
        let result = ElevationModel::generate(&hill(5, 8), bad);
        assert!(matches!(result, Err(SurfaceError::InvalidConfig(_))));
    }

    #[test]
    fn test_non_finite_sample_is_rejected() {
        let points = PointSet::new(vec![
            SamplePoint::new(0.0, 0.0, 1.0),
            SamplePoint::at(DVec2::new(f64::NAN, 1.0)),
        ]);
        let result = ElevationModel::generate(&points, SurfaceConfig::default());
        assert!(matches!(result, Err(SurfaceError::InvalidInput(_))));
    }

    #[test]
    fn test_nan_tin_value_gives_no_contour_there() {
        let points = PointSet::from_xyz(&[
            (0.0, 0.0, f64::NAN),
            (10.0, 0.0, 0.0),
            (0.0, 10.0, 10.0),
            (11.0, 11.0, 10.0),
        ]);
        let config = SurfaceConfigBuilder::new()
            .algorithm(AlgorithmMode::TriangulatedIrregularNetwork)
            .contours(true)
            .contour_count(1)
            .unwrap()
            .build()
            .unwrap();
        let model = ElevationModel::generate(&points, config).unwrap();
        assert_eq!(model.surface().len(), 2);
        // Only the triangle with three known corners is contoured
        assert_eq!(model.contours().len(), 1);
        assert!(model.contours().iter().all(|c| c.points.iter().all(|p| p.is_finite())));
    }

    #[test]
    fn test_empty_input_gives_empty_outputs() {
        let empty = PointSet::default();
        let model =
            ElevationModel::generate(&empty, config(AlgorithmMode::InverseDistance)).unwrap();
        assert!(model.surface().is_empty());
        assert!(model.contours().is_empty());
        assert!(model.bounding_box().is_none());
        assert!(model.topology().unwrap().regions.is_empty());

        let single = PointSet::from_xyz(&[(1.0, 1.0, 1.0)]);
        let model =
            ElevationModel::generate(&single, config(AlgorithmMode::TriangulatedIrregularNetwork))
                .unwrap();
        assert!(model.surface().is_empty());
    }
}
