//! Surface Configuration and Builder
//!
//! Every parameter of a pipeline run lives here and is passed explicitly into
//! each stage. Nothing is read from ambient state.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Result, SurfaceError};

/// Which surface representation a run builds from the samples
///
/// Only one branch executes per run: the two grid modes interpolate a regular
/// grid of cells, the TIN mode triangulates the samples directly.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AlgorithmMode {
    /// Grid cells valued by inverse-distance weighting
    InverseDistance,
    /// Grid cells valued by nearest-sample-per-sector weighting
    #[default]
    DirectionalWeighted,
    /// Triangulated irregular network over the raw samples
    TriangulatedIrregularNetwork,
}

impl AlgorithmMode {
    /// Whether this mode produces a grid (as opposed to a TIN)
    #[inline]
    pub fn is_grid(self) -> bool {
        !matches!(self, AlgorithmMode::TriangulatedIrregularNetwork)
    }

    /// Get a human-readable name for this mode
    pub fn name(self) -> &'static str {
        match self {
            AlgorithmMode::InverseDistance => "inverse distance",
            AlgorithmMode::DirectionalWeighted => "directional weighted",
            AlgorithmMode::TriangulatedIrregularNetwork => "triangulated irregular network",
        }
    }
}

/// Cell width and height of an interpolation grid, in the samples' linear units
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridDensity {
    /// Cell width (step along x)
    pub horizontal: f64,
    /// Cell height (step along y)
    pub vertical: f64,
}

impl GridDensity {
    /// Create a density, rejecting zero, negative and non-finite steps
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if either step is not a positive finite number
    pub fn new(horizontal: f64, vertical: f64) -> Result<Self> {
        let density = Self { horizontal, vertical };
        density.validate()?;
        Ok(density)
    }

    /// Same step in both directions
    pub fn square(step: f64) -> Result<Self> {
        Self::new(step, step)
    }

    pub(crate) fn validate(&self) -> Result<()> {
        for (axis, step) in [("horizontal", self.horizontal), ("vertical", self.vertical)] {
            if !(step.is_finite() && step > 0.0) {
                return Err(SurfaceError::InvalidConfig(format!(
                    "{} density must be positive (got {})",
                    axis, step
                )));
            }
        }
        Ok(())
    }
}

impl Default for GridDensity {
    fn default() -> Self {
        Self {
            horizontal: 0.5,
            vertical: 0.5,
        }
    }
}

/// Configuration for one run of the surface pipeline
///
/// The same configuration applied to the same samples always produces the
/// same surface, contours and topology (including region colours, which are
/// drawn from `color_seed`).
///
/// # Example
///
/// ```rust
/// use elevation_surface::*;
///
/// let config = SurfaceConfigBuilder::new()
///     .algorithm(AlgorithmMode::InverseDistance)
///     .density(10.0, 10.0)
///     .unwrap()
///     .contours(true)
///     .build()
///     .unwrap();
///
/// # #[cfg(feature = "serde")]
/// # {
/// let json = serde_json::to_string(&config).unwrap();
/// let restored: SurfaceConfig = serde_json::from_str(&json).unwrap();
/// assert_eq!(config, restored);
/// # }
/// ```
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceConfig {
    /// Surface representation to build
    pub algorithm: AlgorithmMode,

    /// Grid cell size (ignored in TIN mode)
    pub density: GridDensity,

    /// Name of the sample value to interpolate
    pub property: String,

    /// Distance exponent for inverse-distance weighting
    pub idw_power: f64,

    /// Sectors per quadrant for directional weighting
    ///
    /// The full circle is split into `4 * sector_count` sectors.
    pub sector_count: usize,

    /// Extract contour lines from the surface
    pub contours: bool,

    /// Apply the 3-point moving average to every contour line
    pub smooth_contours: bool,

    /// Number of equally spaced breaks strictly between the value extremes
    pub contour_count: usize,

    /// Polygonize contours and the bounding frame into regions
    pub topology: bool,

    /// Seed for the region display colours
    pub color_seed: u64,
}

impl SurfaceConfig {
    /// Check every parameter, as the pipeline does before it starts
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` for a non-positive density, power, sector count
    /// or contour count, or an empty property name
    pub fn validate(&self) -> Result<()> {
        self.density.validate()?;
        validate_power(self.idw_power)?;
        validate_count("sector count", self.sector_count)?;
        validate_count("contour count", self.contour_count)?;
        validate_property(&self.property)?;
        Ok(())
    }
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self {
            algorithm: AlgorithmMode::default(),
            density: GridDensity::default(),
            property: "z".to_string(),
            idw_power: 2.0,
            sector_count: 2,
            contours: false,
            smooth_contours: false,
            contour_count: 5,
            topology: false,
            color_seed: 0,
        }
    }
}

fn validate_power(power: f64) -> Result<()> {
    if !(power.is_finite() && power > 0.0) {
        return Err(SurfaceError::InvalidConfig(format!(
            "inverse distance power must be positive (got {})",
            power
        )));
    }
    Ok(())
}

fn validate_count(what: &str, count: usize) -> Result<()> {
    if count == 0 {
        return Err(SurfaceError::InvalidConfig(format!(
            "{} must be at least 1",
            what
        )));
    }
    Ok(())
}

fn validate_property(property: &str) -> Result<()> {
    if property.is_empty() {
        return Err(SurfaceError::InvalidConfig(
            "property name must not be empty".to_string(),
        ));
    }
    Ok(())
}

/// Builder for creating SurfaceConfig with validation
///
/// # Example
///
/// ```rust
/// use elevation_surface::*;
///
/// // Use defaults
/// let config = SurfaceConfigBuilder::new().build().unwrap();
/// assert_eq!(config.contour_count, 5);
///
/// // Customize
/// let config = SurfaceConfigBuilder::new()
///     .algorithm(AlgorithmMode::TriangulatedIrregularNetwork)
///     .contours(true)
///     .contour_count(10)
///     .unwrap()
///     .smooth_contours(true)
///     .topology(true)
///     .build()
///     .unwrap();
/// assert!(config.topology);
/// ```
#[derive(Debug, Clone)]
pub struct SurfaceConfigBuilder {
    config: SurfaceConfig,
}

impl SurfaceConfigBuilder {
    /// Create a new builder with default values
    ///
    /// Defaults:
    /// - algorithm: directional weighted
    /// - density: 0.5 x 0.5
    /// - property: "z"
    /// - idw_power: 2
    /// - sector_count: 2 (8 sectors)
    /// - contours, smoothing and topology: off
    /// - contour_count: 5
    /// - color_seed: 0
    pub fn new() -> Self {
        Self {
            config: SurfaceConfig::default(),
        }
    }

    /// Set the surface algorithm
    pub fn algorithm(mut self, algorithm: AlgorithmMode) -> Self {
        self.config.algorithm = algorithm;
        self
    }

    /// Set the grid cell width and height
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if either value is zero, negative or not finite
    pub fn density(mut self, horizontal: f64, vertical: f64) -> Result<Self> {
        self.config.density = GridDensity::new(horizontal, vertical)?;
        Ok(self)
    }

    /// Set the name of the sample value to interpolate
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if the name is empty
    pub fn property(mut self, property: impl Into<String>) -> Result<Self> {
        let property = property.into();
        validate_property(&property)?;
        self.config.property = property;
        Ok(self)
    }

    /// Set the inverse-distance exponent
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if the power is not a positive finite number
    pub fn idw_power(mut self, power: f64) -> Result<Self> {
        validate_power(power)?;
        self.config.idw_power = power;
        Ok(self)
    }

    /// Set the number of directional sectors per quadrant
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if `count` is 0
    pub fn sector_count(mut self, count: usize) -> Result<Self> {
        validate_count("sector count", count)?;
        self.config.sector_count = count;
        Ok(self)
    }

    /// Enable or disable contour extraction
    pub fn contours(mut self, enabled: bool) -> Self {
        self.config.contours = enabled;
        self
    }

    /// Enable or disable contour smoothing
    pub fn smooth_contours(mut self, enabled: bool) -> Self {
        self.config.smooth_contours = enabled;
        self
    }

    /// Set the number of contour breaks
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if `count` is 0
    pub fn contour_count(mut self, count: usize) -> Result<Self> {
        validate_count("contour count", count)?;
        self.config.contour_count = count;
        Ok(self)
    }

    /// Enable or disable the topology stage
    pub fn topology(mut self, enabled: bool) -> Self {
        self.config.topology = enabled;
        self
    }

    /// Set the seed used for region display colours
    pub fn color_seed(mut self, seed: u64) -> Self {
        self.config.color_seed = seed;
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<SurfaceConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

impl Default for SurfaceConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let config = SurfaceConfigBuilder::new().build().unwrap();
        assert_eq!(config.algorithm, AlgorithmMode::DirectionalWeighted);
        assert_eq!(config.density, GridDensity::default());
        assert_eq!(config.property, "z");
        assert_eq!(config.idw_power, 2.0);
        assert_eq!(config.sector_count, 2);
        assert_eq!(config.contour_count, 5);
        assert!(!config.contours);
        assert!(!config.smooth_contours);
        assert!(!config.topology);
    }

    #[test]
    fn test_builder_custom() {
        let config = SurfaceConfigBuilder::new()
            .algorithm(AlgorithmMode::InverseDistance)
            .density(2.0, 3.0)
            .unwrap()
            .property("depth")
            .unwrap()
            .idw_power(3.0)
            .unwrap()
            .sector_count(4)
            .unwrap()
            .contours(true)
            .smooth_contours(true)
            .contour_count(12)
            .unwrap()
            .topology(true)
            .color_seed(7)
            .build()
            .unwrap();

        assert_eq!(config.algorithm, AlgorithmMode::InverseDistance);
        assert_eq!(config.density.horizontal, 2.0);
        assert_eq!(config.density.vertical, 3.0);
        assert_eq!(config.property, "depth");
        assert_eq!(config.idw_power, 3.0);
        assert_eq!(config.sector_count, 4);
        assert_eq!(config.contour_count, 12);
        assert_eq!(config.color_seed, 7);
        assert!(config.contours && config.smooth_contours && config.topology);
    }

    #[test]
    fn test_invalid_density() {
        assert!(SurfaceConfigBuilder::new().density(0.0, 1.0).is_err());
        assert!(SurfaceConfigBuilder::new().density(1.0, -2.0).is_err());
        assert!(SurfaceConfigBuilder::new().density(f64::NAN, 1.0).is_err());
        assert!(GridDensity::square(f64::INFINITY).is_err());
    }

    #[test]
    fn test_invalid_counts() {
        assert!(SurfaceConfigBuilder::new().sector_count(0).is_err());
        assert!(SurfaceConfigBuilder::new().contour_count(0).is_err());
        assert!(SurfaceConfigBuilder::new().idw_power(0.0).is_err());
        assert!(SurfaceConfigBuilder::new().property("").is_err());
    }

    #[test]
    fn test_validate_catches_literal_configs() {
        let config = SurfaceConfig {
            density: GridDensity {
                horizontal: -1.0,
                vertical: 1.0,
            },
            ..SurfaceConfig::default()
        };
        let err = config.validate().unwrap_err();
        assert!(matches!(err, SurfaceError::InvalidConfig(_)));
        assert!(err.to_string().contains("horizontal density"));
    }

    #[test]
    fn test_mode_kind() {
        assert!(AlgorithmMode::InverseDistance.is_grid());
        assert!(AlgorithmMode::DirectionalWeighted.is_grid());
        assert!(!AlgorithmMode::TriangulatedIrregularNetwork.is_grid());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_config_serialization() {
        let config = SurfaceConfigBuilder::new()
            .algorithm(AlgorithmMode::TriangulatedIrregularNetwork)
            .contour_count(8)
            .unwrap()
            .build()
            .unwrap();

        let json = serde_json::to_string(&config).unwrap();
        let restored: SurfaceConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, restored);
    }
}
