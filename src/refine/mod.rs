//! Pixel-level refinement of the merged tile labels.
//!
//! Starting from the canonical tile-level label grid, labels are extended to
//! individual pixels with directional raster sweeps. A residual buffer holds
//! each pixel's signed perpendicular distance to the plane of its current
//! label; with the z-test enabled a contested pixel goes to the candidate
//! plane with the smallest absolute residual ("closest plane wins"), ties to
//! the smaller plane id.
//!
//! Convergence rule: sweep pairs (one forward raster, one reverse raster)
//! repeat until a full pair changes no pixel, capped at
//! [`GrowOptions::max_sweep_pairs`]. The cap bounds worst-case latency; the
//! final fixpoint under the closest-wins rule does not depend on sweep
//! direction.
use crate::cloud::{LabelGrid, NormalCloud, OrganizedCloud};
use crate::thresholds::ThresholdProfile;
use crate::tiles::TileLayout;
use crate::types::{Plane, PlaneId};

/// Refinement policy, derived from the extractor parameters.
#[derive(Clone, Copy, Debug)]
pub struct GrowOptions {
    /// Contested pixels go to the plane with the smallest residual.
    pub do_z_test: bool,
    /// Also gate candidates on per-pixel normals.
    pub normal_check: bool,
    /// Hard cap on forward+reverse sweep pairs.
    pub max_sweep_pairs: usize,
    /// Samples deeper than this stay unassigned.
    pub max_distance: f32,
}

/// Outcome of the growth pass, mainly for logging.
#[derive(Clone, Copy, Debug, Default)]
pub struct RefineSummary {
    pub sweep_pairs: usize,
    pub relabeled: usize,
}

/// Grows merged tile regions into individual pixels.
pub struct RegionGrower<'a> {
    cloud: &'a OrganizedCloud,
    normals: Option<&'a NormalCloud>,
    planes: &'a [Plane],
    profile: &'a ThresholdProfile,
    opts: GrowOptions,
}

impl<'a> RegionGrower<'a> {
    pub fn new(
        cloud: &'a OrganizedCloud,
        normals: Option<&'a NormalCloud>,
        planes: &'a [Plane],
        profile: &'a ThresholdProfile,
        opts: GrowOptions,
    ) -> Self {
        Self {
            cloud,
            normals,
            planes,
            profile,
            opts,
        }
    }

    /// Seed pixel labels from the tile grid, then sweep to the fixpoint.
    ///
    /// `residual` is the per-pixel signed distance buffer; it is resized and
    /// rewritten here.
    pub fn run(
        &self,
        layout: &TileLayout,
        tile_labels: &[PlaneId],
        labels: &mut LabelGrid,
        residual: &mut Vec<f32>,
    ) -> RefineSummary {
        labels.reset(self.cloud.w, self.cloud.h);
        residual.clear();
        residual.resize(self.cloud.w * self.cloud.h, f32::INFINITY);

        self.seed(layout, tile_labels, labels, residual);

        let mut summary = RefineSummary::default();
        for _ in 0..self.opts.max_sweep_pairs {
            let changed = self.sweep(true, labels, residual) + self.sweep(false, labels, residual);
            summary.sweep_pairs += 1;
            summary.relabeled += changed;
            if changed == 0 {
                break;
            }
        }
        summary
    }

    /// Assign each pixel of a labeled tile that passes its own inlier test.
    fn seed(
        &self,
        layout: &TileLayout,
        tile_labels: &[PlaneId],
        labels: &mut LabelGrid,
        residual: &mut [f32],
    ) {
        for y in 0..self.cloud.h {
            for x in 0..self.cloud.w {
                let id = tile_labels[layout.tile_of_pixel(x, y)];
                if id == 0 {
                    continue;
                }
                if let Some(r) = self.candidate_residual(x, y, id) {
                    labels.set(x, y, id);
                    residual[self.cloud.idx(x, y)] = r;
                }
            }
        }
    }

    /// One raster sweep; `forward` scans top-left → bottom-right and examines
    /// the left/up neighbours, the reverse scan examines right/down. Returns
    /// the number of relabeled pixels.
    fn sweep(&self, forward: bool, labels: &mut LabelGrid, residual: &mut [f32]) -> usize {
        let (w, h) = (self.cloud.w, self.cloud.h);
        let mut changed = 0usize;
        if forward {
            for y in 0..h {
                for x in 0..w {
                    let neighbours = [(x > 0).then(|| (x - 1, y)), (y > 0).then(|| (x, y - 1))];
                    if self.relabel(x, y, neighbours, labels, residual) {
                        changed += 1;
                    }
                }
            }
        } else {
            for y in (0..h).rev() {
                for x in (0..w).rev() {
                    let neighbours = [
                        (x + 1 < w).then_some((x + 1, y)),
                        (y + 1 < h).then_some((x, y + 1)),
                    ];
                    if self.relabel(x, y, neighbours, labels, residual) {
                        changed += 1;
                    }
                }
            }
        }
        changed
    }

    /// Examine the given neighbours of `(x, y)` and adopt the best admissible
    /// candidate plane. Returns true when the pixel changed label.
    fn relabel(
        &self,
        x: usize,
        y: usize,
        neighbours: [Option<(usize, usize)>; 2],
        labels: &mut LabelGrid,
        residual: &mut [f32],
    ) -> bool {
        if !self.cloud.is_valid(x, y) {
            return false;
        }
        let current = labels.get(x, y);
        let current_res = residual[self.cloud.idx(x, y)];

        let mut best: Option<(f32, PlaneId)> = None;
        for n in neighbours.into_iter().flatten() {
            let id = labels.get(n.0, n.1);
            if id == 0 || id == current {
                continue;
            }
            let Some(r) = self.candidate_residual(x, y, id) else {
                continue;
            };
            let better = match best {
                None => true,
                Some((br, bid)) => r.abs() < br.abs() || (r.abs() == br.abs() && id < bid),
            };
            if better {
                best = Some((r, id));
            }
        }
        let Some((r, id)) = best else {
            return false;
        };

        let adopt = if current == 0 {
            true
        } else if self.opts.do_z_test {
            r.abs() < current_res.abs() || (r.abs() == current_res.abs() && id < current)
        } else {
            false
        };
        if adopt {
            labels.set(x, y, id);
            residual[self.cloud.idx(x, y)] = r;
        }
        adopt
    }

    /// Signed residual of pixel `(x, y)` against plane `id`, if the pixel is
    /// an admissible inlier of that plane at its own depth.
    fn candidate_residual(&self, x: usize, y: usize, id: PlaneId) -> Option<f32> {
        if !self.cloud.is_valid(x, y) {
            return None;
        }
        let p = self.cloud.get(x, y);
        if p.z > self.opts.max_distance {
            return None;
        }
        let plane = &self.planes[(id - 1) as usize];
        let thr = self.profile.at(p.z);
        let r = plane.signed_distance(&p);
        if r.abs() > thr.max_inlier_dist {
            return None;
        }
        if self.opts.normal_check {
            if let Some(normals) = self.normals {
                if !normals.is_valid(x, y)
                    || normals.get(x, y).dot(&plane.normal).abs() < thr.min_cos_angle
                {
                    return None;
                }
            }
        }
        Some(r)
    }
}

/// Drop planes whose final pixel coverage falls below `min_pixels`, reset
/// their pixels to unassigned, and re-densify the surviving ids. Returns the
/// surviving planes with `point_count` set to their pixel coverage.
pub fn prune_small_planes(
    labels: &mut LabelGrid,
    planes: &[Plane],
    min_pixels: usize,
) -> Vec<Plane> {
    let counts = labels.coverage(planes.len());
    let mut remap = vec![0 as PlaneId; planes.len() + 1];
    let mut survivors = Vec::with_capacity(planes.len());
    for (idx, plane) in planes.iter().enumerate() {
        let id = idx + 1;
        if counts[id] >= min_pixels {
            let mut kept = plane.clone();
            kept.point_count = counts[id];
            survivors.push(kept);
            remap[id] = survivors.len() as PlaneId;
        }
    }
    if survivors.len() != planes.len() {
        for label in labels.labels.iter_mut() {
            *label = remap[*label as usize];
        }
    }
    survivors
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::thresholds::{ThresholdProfile, Thresholds};
    use nalgebra::Vector3;

    fn profile() -> ThresholdProfile {
        ThresholdProfile::Constant(Thresholds {
            min_cos_angle: 0.9,
            min_cos_block_angle: 0.95,
            max_inlier_dist: 0.01,
            max_block_dist: 0.005,
        })
    }

    fn opts() -> GrowOptions {
        GrowOptions {
            do_z_test: true,
            normal_check: false,
            max_sweep_pairs: 8,
            max_distance: 4.0,
        }
    }

    fn flat_plane(offset: f32) -> Plane {
        Plane {
            normal: Vector3::new(0.0, 0.0, -1.0),
            offset,
            point_count: 0,
        }
    }

    #[test]
    fn growth_fills_unlabeled_tiles() {
        // Left tile labeled, right tile invalid at the tile level, but its
        // pixels lie on the same plane and must be claimed by growth.
        let cloud = OrganizedCloud::from_fn(20, 10, |x, y| {
            Vector3::new(x as f32 * 0.01, y as f32 * 0.01, 1.0)
        });
        let layout = TileLayout::new(20, 10, 10);
        let planes = vec![flat_plane(1.0)];
        let tile_labels = vec![1, 0];
        let mut labels = LabelGrid::new(20, 10);
        let mut residual = Vec::new();
        let profile = profile();
        let grower = RegionGrower::new(&cloud, None, &planes, &profile, opts());
        let summary = grower.run(&layout, &tile_labels, &mut labels, &mut residual);

        assert!(labels.labels.iter().all(|&l| l == 1), "all pixels claimed");
        assert!(summary.relabeled >= 100, "right tile pixels were grown");
        assert!(summary.sweep_pairs <= 8);
    }

    #[test]
    fn closest_plane_wins_contested_pixels() {
        // Middle tile unlabeled; its samples are closer to the right plane.
        let cloud = OrganizedCloud::from_fn(30, 10, |x, y| {
            let z = match x / 10 {
                0 => 1.0,
                1 => 1.0015,
                _ => 1.002,
            };
            Vector3::new(x as f32 * 0.01, y as f32 * 0.01, z)
        });
        let layout = TileLayout::new(30, 10, 10);
        let planes = vec![flat_plane(1.0), flat_plane(1.002)];
        let tile_labels = vec![1, 0, 2];
        let mut labels = LabelGrid::new(30, 10);
        let mut residual = Vec::new();
        let profile = profile();
        let grower = RegionGrower::new(&cloud, None, &planes, &profile, opts());
        grower.run(&layout, &tile_labels, &mut labels, &mut residual);

        for y in 0..10 {
            for x in 10..20 {
                assert_eq!(
                    labels.get(x, y),
                    2,
                    "pixel ({x},{y}) should adopt the closer plane"
                );
            }
        }
    }

    #[test]
    fn invalid_pixels_stay_unassigned() {
        let mut cloud = OrganizedCloud::from_fn(20, 10, |x, y| {
            Vector3::new(x as f32 * 0.01, y as f32 * 0.01, 1.0)
        });
        cloud.invalidate(5, 5);
        cloud.invalidate(6, 5);
        let layout = TileLayout::new(20, 10, 10);
        let planes = vec![flat_plane(1.0)];
        let tile_labels = vec![1, 1];
        let mut labels = LabelGrid::new(20, 10);
        let mut residual = Vec::new();
        RegionGrower::new(&cloud, None, &planes, &profile(), opts()).run(
            &layout,
            &tile_labels,
            &mut labels,
            &mut residual,
        );
        assert_eq!(labels.get(5, 5), 0);
        assert_eq!(labels.get(6, 5), 0);
        assert_eq!(labels.get(7, 5), 1);
    }

    #[test]
    fn prune_drops_and_redensifies() {
        let mut labels = LabelGrid::new(10, 1);
        for x in 0..8 {
            labels.set(x, 0, 1);
        }
        labels.set(8, 0, 2);
        labels.set(9, 0, 3);
        let planes = vec![flat_plane(1.0), flat_plane(2.0), flat_plane(3.0)];

        let survivors = prune_small_planes(&mut labels, &planes, 2);
        assert_eq!(survivors.len(), 1);
        assert_eq!(survivors[0].point_count, 8);
        assert_eq!(labels.get(0, 0), 1);
        assert_eq!(labels.get(8, 0), 0, "pruned plane pixels reset");
        assert_eq!(labels.get(9, 0), 0);
    }
}
