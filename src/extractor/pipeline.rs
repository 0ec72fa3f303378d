//! Extractor pipeline driving tile-based plane segmentation end-to-end.
//!
//! The [`TilePlaneExtractor`] exposes a simple API: feed an organized cloud
//! (and optionally normals) and get a per-pixel label grid plus the fitted
//! planes. Internally it sequences tile accumulation, union-merge and pixel
//! refinement over workspace-owned buffers.
//!
//! Typical usage:
//! ```no_run
//! use plane_detector::{CameraIntrinsics, OrganizedCloud, TileParams, TilePlaneExtractor};
//!
//! # fn example(cloud: OrganizedCloud) {
//! let mut extractor =
//!     TilePlaneExtractor::new(TileParams::default(), CameraIntrinsics::default()).unwrap();
//! let result = extractor.process(&cloud, None).unwrap();
//! for (i, plane) in result.planes.iter().enumerate() {
//!     println!("plane {}: n={:?} d={}", i + 1, plane.normal, plane.offset);
//! }
//! # }
//! ```
use super::params::TileParams;
use super::workspace::ExtractorWorkspace;
use super::PlaneExtractor;
use crate::camera::CameraIntrinsics;
use crate::cloud::{NormalCloud, OrganizedCloud};
use crate::error::PlaneError;
use crate::merge::TileMerger;
use crate::refine::{prune_small_planes, GrowOptions, RegionGrower};
use crate::thresholds::ThresholdProfile;
use crate::tiles::{build_tiles, TileOptions};
use crate::types::SegmentationResult;
use log::debug;
use std::time::Instant;

/// Tile-based plane extractor orchestrating moment accumulation, tile
/// merging and pixel-level region growing.
pub struct TilePlaneExtractor {
    params: TileParams,
    /// Not consumed by the labelling math; kept for cloud synthesis and
    /// future depth-map input.
    camera: CameraIntrinsics,
    profile: ThresholdProfile,
    merger: TileMerger,
    workspace: ExtractorWorkspace,
}

impl TilePlaneExtractor {
    /// Create an extractor with the supplied configuration.
    ///
    /// Configuration errors are reported here, before any frame processing.
    pub fn new(params: TileParams, camera: CameraIntrinsics) -> Result<Self, PlaneError> {
        params.validate()?;
        if !camera.is_valid() {
            return Err(PlaneError::InvalidConfig(
                "camera focal lengths must be positive and finite".into(),
            ));
        }
        let profile = params.threshold_profile();
        Ok(Self {
            params,
            camera,
            profile,
            merger: TileMerger::new(),
            workspace: ExtractorWorkspace::new(),
        })
    }

    /// Segment one frame. `normals` is required iff `pointwise_normal_check`
    /// is enabled and must match the cloud dimensions when present.
    pub fn process(
        &mut self,
        cloud: &OrganizedCloud,
        normals: Option<&NormalCloud>,
    ) -> Result<SegmentationResult, PlaneError> {
        if self.params.pointwise_normal_check && normals.is_none() {
            return Err(PlaneError::MissingInput(
                "normal grid (pointwise_normal_check is enabled)",
            ));
        }
        if let Some(n) = normals {
            if n.w != cloud.w || n.h != cloud.h {
                return Err(PlaneError::DimensionMismatch {
                    expected_w: cloud.w,
                    expected_h: cloud.h,
                    got_w: n.w,
                    got_h: n.h,
                });
            }
        }

        let total_start = Instant::now();
        let layout = self
            .workspace
            .reset(cloud.w, cloud.h, self.params.patch_dim);
        debug!(
            "TilePlaneExtractor::process start w={} h={} tiles={}x{}",
            cloud.w, cloud.h, layout.cols, layout.rows
        );
        let ws = &mut self.workspace;

        let tiles_start = Instant::now();
        let tile_opts = TileOptions {
            min_inlier_ratio: self.params.min_block_inlier_ratio,
            max_distance: self.params.max_distance,
            normal_check: self.params.pointwise_normal_check,
        };
        build_tiles(
            cloud,
            normals,
            &layout,
            &self.profile,
            &tile_opts,
            &mut ws.tile_records,
            &mut ws.tile_planes,
        );
        let accepted = ws.tile_planes.iter().filter(|p| p.is_some()).count();
        debug!(
            "tiles: accepted={}/{} in {:.3} ms",
            accepted,
            layout.tile_count(),
            tiles_start.elapsed().as_secs_f64() * 1000.0
        );

        let merge_start = Instant::now();
        let planes = self.merger.merge(
            &layout,
            &ws.tile_records,
            &ws.tile_planes,
            &self.profile,
            self.params.min_nr_patches,
            &mut ws.tile_labels,
        );
        debug!(
            "merge: classes={} in {:.3} ms",
            planes.len(),
            merge_start.elapsed().as_secs_f64() * 1000.0
        );

        let refine_start = Instant::now();
        let grow_opts = GrowOptions {
            do_z_test: self.params.do_z_test,
            normal_check: self.params.pointwise_normal_check,
            max_sweep_pairs: self.params.max_sweep_pairs,
            max_distance: self.params.max_distance,
        };
        let grower = RegionGrower::new(cloud, normals, &planes, &self.profile, grow_opts);
        let summary = grower.run(&layout, &ws.tile_labels, &mut ws.labels, &mut ws.residual);
        let planes = prune_small_planes(&mut ws.labels, &planes, self.params.min_plane_pixels());
        debug!(
            "refine: sweep_pairs={} relabeled={} surviving={} in {:.3} ms",
            summary.sweep_pairs,
            summary.relabeled,
            planes.len(),
            refine_start.elapsed().as_secs_f64() * 1000.0
        );

        Ok(SegmentationResult {
            labels: ws.labels.clone(),
            planes,
            latency_ms: total_start.elapsed().as_secs_f64() * 1000.0,
        })
    }

    pub fn params(&self) -> &TileParams {
        &self.params
    }

    pub fn camera(&self) -> &CameraIntrinsics {
        &self.camera
    }

    /// Update the pointwise normal gate (radians) and rebuild the profile.
    pub fn set_max_angle(&mut self, angle: f32) {
        self.params.max_angle = angle;
        self.profile = self.params.threshold_profile();
    }

    /// Update the tile-to-tile normal gate (radians) and rebuild the profile.
    pub fn set_max_block_angle(&mut self, angle: f32) {
        self.params.max_block_angle = angle;
        self.profile = self.params.threshold_profile();
    }
}

impl PlaneExtractor for TilePlaneExtractor {
    fn requires_normals(&self) -> bool {
        self.params.pointwise_normal_check
    }

    fn segment(
        &mut self,
        cloud: &OrganizedCloud,
        normals: Option<&NormalCloud>,
    ) -> Result<SegmentationResult, PlaneError> {
        self.process(cloud, normals)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_normals_rejects_the_frame() {
        let params = TileParams {
            pointwise_normal_check: true,
            ..Default::default()
        };
        let mut extractor = TilePlaneExtractor::new(params, CameraIntrinsics::default()).unwrap();
        let cloud = OrganizedCloud::new(20, 20);
        let err = extractor.process(&cloud, None).unwrap_err();
        assert!(matches!(err, PlaneError::MissingInput(_)), "got {err:?}");
    }

    #[test]
    fn mismatched_normal_grid_rejects_the_frame() {
        let mut extractor =
            TilePlaneExtractor::new(TileParams::default(), CameraIntrinsics::default()).unwrap();
        let cloud = OrganizedCloud::new(20, 20);
        let normals = NormalCloud::new(10, 20);
        let err = extractor.process(&cloud, Some(&normals)).unwrap_err();
        assert!(
            matches!(err, PlaneError::DimensionMismatch { .. }),
            "got {err:?}"
        );
    }

    #[test]
    fn invalid_patch_dim_fails_at_setup() {
        let params = TileParams {
            patch_dim: 0,
            ..Default::default()
        };
        assert!(TilePlaneExtractor::new(params, CameraIntrinsics::default()).is_err());
    }

    #[test]
    fn all_invalid_frame_yields_empty_result() {
        let mut extractor =
            TilePlaneExtractor::new(TileParams::default(), CameraIntrinsics::default()).unwrap();
        let cloud = OrganizedCloud::new(40, 40);
        let result = extractor.process(&cloud, None).unwrap();
        assert!(result.planes.is_empty());
        assert!(result.labels.labels.iter().all(|&l| l == 0));
    }

    #[test]
    fn requires_normals_follows_configuration() {
        let on = TilePlaneExtractor::new(
            TileParams {
                pointwise_normal_check: true,
                ..Default::default()
            },
            CameraIntrinsics::default(),
        )
        .unwrap();
        let off =
            TilePlaneExtractor::new(TileParams::default(), CameraIntrinsics::default()).unwrap();
        assert!(on.requires_normals());
        assert!(!off.requires_normals());
    }
}
