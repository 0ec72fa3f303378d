#![doc = include_str!("../README.md")]

// Public modules (stable-ish surface)
pub mod camera;
pub mod cloud;
pub mod config;
pub mod error;
pub mod extractor;
pub mod types;

// “Expert” modules – still public, but considered unstable internals.
// (You can tighten or feature-gate these later.)
pub mod merge;
pub mod refine;
pub mod thresholds;
pub mod tiles;

// --- High-level re-exports -------------------------------------------------

// Main entry points: extractor + results.
pub use crate::extractor::{ExtractorWorkspace, PlaneExtractor, TileParams, TilePlaneExtractor};
pub use crate::types::{Plane, PlaneId, SegmentationResult};

// Input containers and camera geometry.
pub use crate::camera::CameraIntrinsics;
pub use crate::cloud::{LabelGrid, NormalCloud, OrganizedCloud};
pub use crate::error::PlaneError;

// --- Prelude ---------------------------------------------------------------

/// Small prelude for quick experiments.
///
/// ```no_run
/// use plane_detector::prelude::*;
///
/// # fn main() {
/// let cloud = OrganizedCloud::new(640, 480);
///
/// let mut extractor =
///     TilePlaneExtractor::new(TileParams::default(), CameraIntrinsics::default()).unwrap();
///
/// let result = extractor.process(&cloud, None).unwrap();
/// println!(
///     "planes={} latency_ms={:.3}",
///     result.planes.len(),
///     result.latency_ms
/// );
/// # }
/// ```
pub mod prelude {
    pub use crate::camera::CameraIntrinsics;
    pub use crate::cloud::{LabelGrid, NormalCloud, OrganizedCloud};
    pub use crate::{Plane, PlaneExtractor, SegmentationResult, TileParams, TilePlaneExtractor};
}
