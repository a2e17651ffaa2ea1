//! Display colours for topology regions
//!
//! The colours carry no meaning; they only tell neighbouring regions apart.

use std::fmt;

use glam::DVec2;
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Result, SurfaceError};

/// 8-bit RGB colour
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct RegionColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl RegionColor {
    /// Create a colour from its channels
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// `#rrggbb`, lowercase
    pub fn to_hex(self) -> String {
        self.to_string()
    }
}

impl fmt::Display for RegionColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Trait for assigning display colours to regions
pub trait RegionColorizer {
    /// Colour for the next region, given its outer ring
    fn region_color(&mut self, exterior: &[DVec2]) -> RegionColor;
}

/// Seeded random colours, each channel uniform in `0..255`
#[derive(Debug, Clone)]
pub struct RandomColorizer {
    rng: ChaCha8Rng,
}

impl RandomColorizer {
    /// Create a colorizer whose sequence is fixed by `seed`
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomColorizer {
    fn default() -> Self {
        Self::new(0)
    }
}

impl RegionColorizer for RandomColorizer {
    fn region_color(&mut self, _exterior: &[DVec2]) -> RegionColor {
        RegionColor::new(
            self.rng.gen_range(0..255),
            self.rng.gen_range(0..255),
            self.rng.gen_range(0..255),
        )
    }
}

/// Cycles through a fixed palette in region order
#[derive(Debug, Clone)]
pub struct PaletteColorizer {
    palette: Vec<RegionColor>,
    next: usize,
}

impl PaletteColorizer {
    /// Create a colorizer over `palette`
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if the palette is empty
    pub fn new(palette: Vec<RegionColor>) -> Result<Self> {
        if palette.is_empty() {
            return Err(SurfaceError::InvalidConfig(
                "palette must hold at least one colour".into(),
            ));
        }
        Ok(Self { palette, next: 0 })
    }
}

impl RegionColorizer for PaletteColorizer {
    fn region_color(&mut self, _exterior: &[DVec2]) -> RegionColor {
        let color = self.palette[self.next % self.palette.len()];
        self.next += 1;
        color
    }
}

impl<F> RegionColorizer for F
where
    F: FnMut(&[DVec2]) -> RegionColor,
{
    fn region_color(&mut self, exterior: &[DVec2]) -> RegionColor {
        self(exterior)
    }
}
