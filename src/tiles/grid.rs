use super::accumulator::MomentRecord;
use super::fit::fit_plane;
use crate::cloud::{NormalCloud, OrganizedCloud};
use crate::thresholds::ThresholdProfile;
use crate::types::Plane;
use rayon::prelude::*;

/// Tile partition of a pixel grid. Border tiles may be partial.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TileLayout {
    pub patch_dim: usize,
    pub cols: usize,
    pub rows: usize,
    width: usize,
    height: usize,
}

impl TileLayout {
    pub fn new(width: usize, height: usize, patch_dim: usize) -> Self {
        debug_assert!(patch_dim >= 1);
        Self {
            patch_dim,
            cols: width.div_ceil(patch_dim),
            rows: height.div_ceil(patch_dim),
            width,
            height,
        }
    }

    #[inline]
    pub fn tile_count(&self) -> usize {
        self.cols * self.rows
    }

    #[inline]
    pub fn tile_index(&self, tile_row: usize, tile_col: usize) -> usize {
        tile_row * self.cols + tile_col
    }

    #[inline]
    pub fn tile_of_pixel(&self, x: usize, y: usize) -> usize {
        self.tile_index(y / self.patch_dim, x / self.patch_dim)
    }

    /// Half-open pixel bounds `(x0, y0, x1, y1)` of tile `t`, clipped to the
    /// grid for partial border tiles.
    #[inline]
    pub fn tile_bounds(&self, t: usize) -> (usize, usize, usize, usize) {
        let tile_row = t / self.cols;
        let tile_col = t % self.cols;
        let x0 = tile_col * self.patch_dim;
        let y0 = tile_row * self.patch_dim;
        let x1 = (x0 + self.patch_dim).min(self.width);
        let y1 = (y0 + self.patch_dim).min(self.height);
        (x0, y0, x1, y1)
    }
}

/// Tile acceptance policy.
#[derive(Clone, Copy, Debug)]
pub struct TileOptions {
    /// Minimum fraction of a tile's valid samples that must lie on the fit.
    pub min_inlier_ratio: f32,
    /// Samples deeper than this are ignored entirely.
    pub max_distance: f32,
    /// Gate inliers on per-pixel normals as well as residual distance.
    pub normal_check: bool,
}

/// Accumulate, fit and validate every tile of the grid.
///
/// `records[t]` receives the moment sums of tile `t` and `planes[t]` the
/// accepted fit, or `None` for invalid tiles (too few samples, degenerate
/// scatter, or inlier ratio below the gate). Buffers are resized in place so
/// repeated frames at a fixed resolution do not reallocate.
///
/// Tiles are independent, so the pass runs in parallel over tiles.
pub fn build_tiles(
    cloud: &OrganizedCloud,
    normals: Option<&NormalCloud>,
    layout: &TileLayout,
    profile: &ThresholdProfile,
    opts: &TileOptions,
    records: &mut Vec<MomentRecord>,
    planes: &mut Vec<Option<Plane>>,
) {
    let n = layout.tile_count();
    records.resize(n, MomentRecord::default());
    planes.resize(n, None);

    records
        .par_iter_mut()
        .zip(planes.par_iter_mut())
        .enumerate()
        .for_each(|(t, (record, plane))| {
            record.reset();
            let (x0, y0, x1, y1) = layout.tile_bounds(t);
            for y in y0..y1 {
                for x in x0..x1 {
                    let p = cloud.get(x, y);
                    if !cloud.is_valid(x, y) || p.z > opts.max_distance {
                        continue;
                    }
                    record.push(&p);
                }
            }
            *plane = fit_plane(record).filter(|fit| {
                tile_inlier_ratio(cloud, normals, (x0, y0, x1, y1), fit, profile, opts)
                    >= opts.min_inlier_ratio
            });
        });
}

/// Fraction of a tile's accumulated samples lying within the fitted plane's
/// depth-dependent inlier band.
fn tile_inlier_ratio(
    cloud: &OrganizedCloud,
    normals: Option<&NormalCloud>,
    bounds: (usize, usize, usize, usize),
    fit: &Plane,
    profile: &ThresholdProfile,
    opts: &TileOptions,
) -> f32 {
    let (x0, y0, x1, y1) = bounds;
    let mut total = 0usize;
    let mut inliers = 0usize;
    for y in y0..y1 {
        for x in x0..x1 {
            let p = cloud.get(x, y);
            if !cloud.is_valid(x, y) || p.z > opts.max_distance {
                continue;
            }
            total += 1;
            let thr = profile.at(p.z);
            if fit.signed_distance(&p).abs() > thr.max_inlier_dist {
                continue;
            }
            if opts.normal_check {
                if let Some(nrm) = normals {
                    if !nrm.is_valid(x, y)
                        || nrm.get(x, y).dot(&fit.normal).abs() < thr.min_cos_angle
                    {
                        continue;
                    }
                }
            }
            inliers += 1;
        }
    }
    if total == 0 {
        0.0
    } else {
        inliers as f32 / total as f32
    }
}
