//! Parameter types configuring the extractor stages.
//!
//! Defaults follow values proven on VGA-class RGB-D input. For tuning, start
//! with `patch_dim` (tile side length) and the two distance gates.

use crate::error::PlaneError;
use crate::thresholds::{ThresholdProfile, Thresholds};
use serde::{Deserialize, Serialize};

/// Extractor-wide parameters controlling the tile pipeline.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct TileParams {
    /// Minimum number of tiles a merged class needs to spawn a plane.
    pub min_nr_patches: usize,
    /// Tile side length in pixels.
    pub patch_dim: usize,
    /// Minimum fraction of a tile's samples on the fitted plane before the
    /// tile is discarded.
    pub min_block_inlier_ratio: f32,
    /// Gate individual pixels on their estimated normal as well as residual
    /// distance. Requires a normal grid at `process` time.
    pub pointwise_normal_check: bool,
    /// Samples beyond this range (metres) are ignored entirely.
    pub max_distance: f32,
    /// Maximum step size assumed by upstream normal estimation; carried in
    /// the configuration for pipeline compatibility, not consumed here.
    pub max_step_size: f32,
    /// Maximum residual distance for a pixel inlier.
    pub max_inlier_dist: f32,
    /// Widen tolerances with depth to model range-dependent sensor noise.
    pub use_variable_thresholds: bool,
    /// Maximum centroid-to-plane distance between adjacent tiles.
    pub max_inlier_block_dist: f32,
    /// Maximum angle (radians) between a pixel normal and its plane.
    pub max_angle: f32,
    /// Maximum angle (radians) between two adjacent tiles' normals.
    pub max_block_angle: f32,
    /// Contested pixels go to the closest plane during refinement.
    pub do_z_test: bool,
    /// Hard cap on refinement sweep pairs.
    pub max_sweep_pairs: usize,
}

impl Default for TileParams {
    fn default() -> Self {
        Self {
            min_nr_patches: 5,
            patch_dim: 10,
            min_block_inlier_ratio: 0.95,
            pointwise_normal_check: false,
            max_distance: 4.0,
            max_step_size: 0.05,
            max_inlier_dist: 0.01,
            use_variable_thresholds: true,
            max_inlier_block_dist: 0.005,
            max_angle: 0.5,
            max_block_angle: 0.5,
            do_z_test: true,
            max_sweep_pairs: 8,
        }
    }
}

impl TileParams {
    /// Validate once at setup, before any frame processing.
    pub fn validate(&self) -> Result<(), PlaneError> {
        if self.patch_dim == 0 {
            return Err(PlaneError::InvalidConfig("patch_dim must be >= 1".into()));
        }
        if self.min_nr_patches == 0 {
            return Err(PlaneError::InvalidConfig(
                "min_nr_patches must be >= 1".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.min_block_inlier_ratio) {
            return Err(PlaneError::InvalidConfig(format!(
                "min_block_inlier_ratio must be in [0, 1], got {}",
                self.min_block_inlier_ratio
            )));
        }
        for (name, v) in [
            ("max_distance", self.max_distance),
            ("max_inlier_dist", self.max_inlier_dist),
            ("max_inlier_block_dist", self.max_inlier_block_dist),
        ] {
            if !(v.is_finite() && v > 0.0) {
                return Err(PlaneError::InvalidConfig(format!(
                    "{name} must be positive, got {v}"
                )));
            }
        }
        for (name, a) in [
            ("max_angle", self.max_angle),
            ("max_block_angle", self.max_block_angle),
        ] {
            if !(a > 0.0 && a < std::f32::consts::FRAC_PI_2) {
                return Err(PlaneError::InvalidConfig(format!(
                    "{name} must be in (0, π/2) radians, got {a}"
                )));
            }
        }
        if self.max_sweep_pairs == 0 {
            return Err(PlaneError::InvalidConfig(
                "max_sweep_pairs must be >= 1".into(),
            ));
        }
        Ok(())
    }

    /// Threshold strategy implied by this configuration. Scaling is
    /// normalized at 1 m, the range the distance gates are specified for.
    pub fn threshold_profile(&self) -> ThresholdProfile {
        let base = Thresholds {
            min_cos_angle: self.max_angle.cos(),
            min_cos_block_angle: self.max_block_angle.cos(),
            max_inlier_dist: self.max_inlier_dist,
            max_block_dist: self.max_inlier_block_dist,
        };
        if self.use_variable_thresholds {
            ThresholdProfile::DepthScaled {
                base,
                reference_depth: 1.0,
            }
        } else {
            ThresholdProfile::Constant(base)
        }
    }

    /// Minimum pixel coverage a plane must keep after refinement.
    pub fn min_plane_pixels(&self) -> usize {
        self.min_nr_patches * self.patch_dim * self.patch_dim
    }
}
