//! Planar topology from contours and a bounding frame
//!
//! Contour lines are combined with a fixed frame over the samples' bounding
//! box (both bisectors, both diagonals and the four borders), noded, and
//! polygonized into coloured regions.

mod colors;
mod noding;
mod polygonize;

pub use colors::{PaletteColorizer, RandomColorizer, RegionColor, RegionColorizer};
pub use noding::{node_lines, NodedSegments};
pub use polygonize::{polygonize, Polygon};

use std::time::Instant;

use glam::DVec2;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::contour::ContourLine;
use crate::point::BoundingBox;

/// The lines a topology is built from
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LineNetwork {
    /// Contour polylines first, then the eight frame lines
    pub lines: Vec<Vec<DVec2>>,
}

impl LineNetwork {
    /// Number of lines
    #[inline]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Whether the network has no lines
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Frame lines over a bounding box: horizontal and vertical bisectors, the
/// lower-left to upper-right and upper-left to lower-right diagonals, then
/// the left, right, bottom and top borders
pub fn frame_lines(frame: &BoundingBox) -> [[DVec2; 2]; 8] {
    let (min, max) = (frame.min, frame.max);
    let center = frame.center();
    [
        [DVec2::new(min.x, center.y), DVec2::new(max.x, center.y)],
        [DVec2::new(center.x, min.y), DVec2::new(center.x, max.y)],
        [min, max],
        [DVec2::new(min.x, max.y), DVec2::new(max.x, min.y)],
        [min, DVec2::new(min.x, max.y)],
        [DVec2::new(max.x, min.y), max],
        [min, DVec2::new(max.x, min.y)],
        [DVec2::new(min.x, max.y), max],
    ]
}

/// Contour lines followed by the frame lines of `frame`
pub fn build_line_network(contours: &[ContourLine], frame: &BoundingBox) -> LineNetwork {
    let mut lines: Vec<Vec<DVec2>> = contours.iter().map(|c| c.points.clone()).collect();
    lines.extend(frame_lines(frame).iter().map(|line| line.to_vec()));
    LineNetwork { lines }
}

/// One polygonized region with its display colour
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    pub polygon: Polygon,
    pub color: RegionColor,
}

/// Regions plus the network they were cut from
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Topology {
    pub regions: Vec<Region>,
    pub network: LineNetwork,
}

/// Polygonize contours together with the frame of `frame`
///
/// Every polygon gets a colour from `colorizer` in output order, then the
/// last polygon is removed as the outer face. A frame of zero width or
/// height produces no regions.
///
/// # Example
///
/// ```
/// use elevation_surface::*;
///
/// let frame = BoundingBox::new(DVec2::new(0.0, 0.0), DVec2::new(10.0, 10.0));
/// let topology = build_topology(&[], &frame, &mut RandomColorizer::new(1));
///
/// // Bisectors and diagonals cut the frame into 8 triangles; one is dropped
/// assert_eq!(topology.regions.len(), 7);
/// assert_eq!(topology.network.len(), 8);
/// ```
pub fn build_topology<C>(
    contours: &[ContourLine],
    frame: &BoundingBox,
    colorizer: &mut C,
) -> Topology
where
    C: RegionColorizer + ?Sized,
{
    let start = Instant::now();
    let network = build_line_network(contours, frame);
    let noded = node_lines(&network.lines);
    let mut regions: Vec<Region> = polygonize(&noded)
        .into_iter()
        .map(|polygon| {
            let color = colorizer.region_color(&polygon.exterior);
            Region { polygon, color }
        })
        .collect();
    regions.pop();

    log::debug!(
        "polygonized {} lines ({} noded edges) into {} regions in {:.2?}",
        network.len(),
        noded.edges.len(),
        regions.len(),
        start.elapsed()
    );
    Topology { regions, network }
}
