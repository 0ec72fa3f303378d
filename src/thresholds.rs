//! Depth-dependent tolerance policy.
//!
//! A [`ThresholdProfile`] is a pure mapping from measured depth to the four
//! gates used across the pipeline. The constant profile applies the
//! configured values everywhere; the depth-scaled profile widens them with
//! range to model increasing sensor noise. The profile is queried per sample,
//! never cached per tile, since depth varies within a tile.

/// Tolerances applied at one depth.
#[derive(Clone, Copy, Debug)]
pub struct Thresholds {
    /// Pointwise normal gate: cos(angle between pixel normal and plane normal).
    pub min_cos_angle: f32,
    /// Tile-to-tile normal gate during merging.
    pub min_cos_block_angle: f32,
    /// Maximum point-to-plane residual for an inlier.
    pub max_inlier_dist: f32,
    /// Maximum centroid-to-plane distance between adjacent tiles.
    pub max_block_dist: f32,
}

/// Strategy selected at configuration time.
#[derive(Clone, Copy, Debug)]
pub enum ThresholdProfile {
    /// Same tolerances at every depth.
    Constant(Thresholds),
    /// Tolerances widen with depth beyond `reference_depth` (metres):
    /// distance gates grow quadratically with range, angular gates linearly.
    DepthScaled {
        base: Thresholds,
        reference_depth: f32,
    },
}

// Angular relaxation saturates so the gates never open completely.
const MAX_DIST_SCALE: f32 = 16.0;
const MAX_ANGLE_SCALE: f32 = 4.0;

impl ThresholdProfile {
    /// Tolerances for a sample measured at `depth`.
    #[inline]
    pub fn at(&self, depth: f32) -> Thresholds {
        match *self {
            Self::Constant(t) => t,
            Self::DepthScaled {
                base,
                reference_depth,
            } => {
                let r = if reference_depth > 0.0 && depth.is_finite() {
                    (depth / reference_depth).max(1.0)
                } else {
                    1.0
                };
                let dist_scale = (r * r).min(MAX_DIST_SCALE);
                let angle_scale = r.min(MAX_ANGLE_SCALE);
                Thresholds {
                    min_cos_angle: relax_cos(base.min_cos_angle, angle_scale),
                    min_cos_block_angle: relax_cos(base.min_cos_block_angle, angle_scale),
                    max_inlier_dist: base.max_inlier_dist * dist_scale,
                    max_block_dist: base.max_block_dist * dist_scale,
                }
            }
        }
    }
}

/// Lower a cosine floor by scaling its complement; keeps the gate in (0, 1].
#[inline]
fn relax_cos(min_cos: f32, scale: f32) -> f32 {
    (1.0 - (1.0 - min_cos) * scale).max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Thresholds {
        Thresholds {
            min_cos_angle: 0.9,
            min_cos_block_angle: 0.95,
            max_inlier_dist: 0.01,
            max_block_dist: 0.005,
        }
    }

    #[test]
    fn constant_profile_ignores_depth() {
        let profile = ThresholdProfile::Constant(base());
        for depth in [0.3, 1.0, 4.0] {
            let t = profile.at(depth);
            assert_eq!(t.max_inlier_dist, 0.01);
            assert_eq!(t.min_cos_block_angle, 0.95);
        }
    }

    #[test]
    fn depth_scaled_is_base_at_or_below_reference() {
        let profile = ThresholdProfile::DepthScaled {
            base: base(),
            reference_depth: 1.0,
        };
        for depth in [0.2, 0.8, 1.0] {
            let t = profile.at(depth);
            assert!((t.max_inlier_dist - 0.01).abs() < 1e-9);
            assert!((t.min_cos_angle - 0.9).abs() < 1e-6);
        }
    }

    #[test]
    fn depth_scaled_widens_monotonically() {
        let profile = ThresholdProfile::DepthScaled {
            base: base(),
            reference_depth: 1.0,
        };
        let mut last = profile.at(1.0);
        for depth in [1.5, 2.0, 3.0, 4.0] {
            let t = profile.at(depth);
            assert!(t.max_inlier_dist >= last.max_inlier_dist);
            assert!(t.max_block_dist >= last.max_block_dist);
            assert!(t.min_cos_angle <= last.min_cos_angle);
            last = t;
        }
    }

    #[test]
    fn relaxation_saturates() {
        let profile = ThresholdProfile::DepthScaled {
            base: base(),
            reference_depth: 1.0,
        };
        let far = profile.at(100.0);
        assert!((far.max_inlier_dist - 0.01 * MAX_DIST_SCALE).abs() < 1e-9);
        assert!(far.min_cos_angle >= 0.0);
    }
}
