//! Tile-based plane extractor orchestrating the per-frame pipeline.
//!
//! Overview
//! - Partitions the organized cloud into `patch_dim × patch_dim` tiles and
//!   accumulates additive moment records per tile (parallel across tiles).
//! - Fits one plane per tile from the smallest-eigenvalue eigenvector of the
//!   scatter matrix and validates it against an inlier-ratio gate.
//! - Merges adjacent compatible tiles with a disjoint-set forest, refitting
//!   merged planes from summed moment records, then canonicalizes the class
//!   ids into a dense `1..=K` range.
//! - Grows the merged regions to pixel resolution with forward/reverse
//!   raster sweeps under depth-adaptive tolerances; with the z-test a
//!   contested pixel goes to the plane with the smallest residual.
//!
//! Modules
//! - [`params`] – configuration for all stages.
//! - `pipeline` – the main [`TilePlaneExtractor`] implementation.
//! - `workspace` – reusable per-frame buffers that amortise allocations
//!   across frames.
//!
//! All per-frame state is recomputed from scratch; only the configuration
//! and the sized buffers persist between frames.

pub mod params;
mod pipeline;
mod workspace;

pub use params::TileParams;
pub use pipeline::TilePlaneExtractor;
pub use workspace::ExtractorWorkspace;

use crate::cloud::{NormalCloud, OrganizedCloud};
use crate::error::PlaneError;
use crate::types::SegmentationResult;

/// Capability-tagged interface shared by plane-extraction strategies.
///
/// Lets the surrounding pipeline query required inputs uniformly without
/// knowing the concrete strategy, and decide whether to run normal
/// estimation before segmentation.
pub trait PlaneExtractor {
    /// Whether [`PlaneExtractor::segment`] needs a normal grid for this
    /// configuration.
    fn requires_normals(&self) -> bool;

    /// Segment one frame into planar regions.
    fn segment(
        &mut self,
        cloud: &OrganizedCloud,
        normals: Option<&NormalCloud>,
    ) -> Result<SegmentationResult, PlaneError>;
}
