//! Tile-level region merging.
//!
//! Valid, accepted tile planes are connected over the 4-neighbour tile grid
//! into equivalence classes whenever two classes are geometrically
//! compatible: normals agree within the block-angle gate and each class
//! centroid lies within the block-distance gate of the other class plane.
//! Classes live in a disjoint-set forest; a union sums the moment records
//! (the additive invariant) and refits the combined plane in O(1) relative
//! to region size.
//!
//! After all adjacencies are processed, classes with at least
//! `min_nr_patches` member tiles receive dense canonical ids `1..=K`,
//! ordered by their smallest member tile index so the labelling is
//! independent of traversal order. Smaller classes demote to unassigned.
mod dsu;

pub use dsu::DisjointSet;

use crate::thresholds::ThresholdProfile;
use crate::tiles::{fit_plane, MomentRecord, TileLayout};
use crate::types::{Plane, PlaneId};
use nalgebra::Vector3;

/// Merges adjacent compatible tiles and canonicalizes class ids.
///
/// Owns its scratch buffers so repeated frames at a fixed tile count do not
/// reallocate.
#[derive(Clone, Debug, Default)]
pub struct TileMerger {
    dsu: DisjointSet,
    class_records: Vec<MomentRecord>,
    class_planes: Vec<Option<Plane>>,
    root_ids: Vec<PlaneId>,
}

impl TileMerger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run the merge phase over one frame's tile grid.
    ///
    /// `tile_labels[t]` receives the canonical id of tile `t` (0 for invalid
    /// or demoted tiles). Returns the surviving planes in canonical order.
    pub fn merge(
        &mut self,
        layout: &TileLayout,
        records: &[MomentRecord],
        tile_planes: &[Option<Plane>],
        profile: &ThresholdProfile,
        min_nr_patches: usize,
        tile_labels: &mut Vec<PlaneId>,
    ) -> Vec<Plane> {
        let n = layout.tile_count();
        debug_assert_eq!(records.len(), n);
        debug_assert_eq!(tile_planes.len(), n);

        self.dsu.reset(n);
        self.class_records.clear();
        self.class_records.extend_from_slice(records);
        self.class_planes.clear();
        self.class_planes.extend_from_slice(tile_planes);

        for tile_row in 0..layout.rows {
            for tile_col in 0..layout.cols {
                let t = layout.tile_index(tile_row, tile_col);
                if tile_planes[t].is_none() {
                    continue;
                }
                if tile_col + 1 < layout.cols {
                    let right = layout.tile_index(tile_row, tile_col + 1);
                    if tile_planes[right].is_some() {
                        self.try_union(t, right, profile);
                    }
                }
                if tile_row + 1 < layout.rows {
                    let down = layout.tile_index(tile_row + 1, tile_col);
                    if tile_planes[down].is_some() {
                        self.try_union(t, down, profile);
                    }
                }
            }
        }

        self.canonicalize(n, tile_planes, min_nr_patches, tile_labels)
    }

    /// Union the classes of tiles `a` and `b` when their planes are
    /// compatible, refitting the combined plane from the summed records.
    fn try_union(&mut self, a: usize, b: usize, profile: &ThresholdProfile) {
        let ra = self.dsu.find(a);
        let rb = self.dsu.find(b);
        if ra == rb {
            return;
        }
        let (Some(pa), Some(pb)) = (
            self.class_planes[ra].as_ref(),
            self.class_planes[rb].as_ref(),
        ) else {
            return;
        };
        let (Some(ca), Some(cb)) = (
            self.class_records[ra].centroid(),
            self.class_records[rb].centroid(),
        ) else {
            return;
        };
        let ca = Vector3::new(ca.x as f32, ca.y as f32, ca.z as f32);
        let cb = Vector3::new(cb.x as f32, cb.y as f32, cb.z as f32);

        let thr = profile.at(0.5 * (ca.z + cb.z));
        if pa.normal.dot(&pb.normal) < thr.min_cos_block_angle {
            return;
        }
        if pa.signed_distance(&cb).abs() > thr.max_block_dist
            || pb.signed_distance(&ca).abs() > thr.max_block_dist
        {
            return;
        }

        let merged = self.class_records[ra] + self.class_records[rb];
        let root = self.dsu.union(ra, rb);
        // Keep the larger class's plane if the refit ever degenerates.
        if let Some(refit) = fit_plane(&merged) {
            self.class_planes[root] = Some(refit);
        }
        self.class_records[root] = merged;
    }

    /// Assign dense ids `1..=K` to classes meeting the minimum-size policy,
    /// ordered by smallest member tile index.
    fn canonicalize(
        &mut self,
        n: usize,
        tile_planes: &[Option<Plane>],
        min_nr_patches: usize,
        tile_labels: &mut Vec<PlaneId>,
    ) -> Vec<Plane> {
        self.root_ids.clear();
        self.root_ids.resize(n, 0);
        tile_labels.clear();
        tile_labels.resize(n, 0);

        let mut planes = Vec::new();
        for t in 0..n {
            if tile_planes[t].is_none() {
                continue;
            }
            // The smallest member visits first in ascending tile order.
            if self.dsu.class_min(t) != t {
                continue;
            }
            if self.dsu.class_size(t) < min_nr_patches {
                continue;
            }
            let root = self.dsu.find(t);
            let Some(plane) = self.class_planes[root].clone() else {
                continue;
            };
            planes.push(plane);
            self.root_ids[root] = planes.len() as PlaneId;
        }

        for (t, label) in tile_labels.iter_mut().enumerate() {
            if tile_planes[t].is_some() {
                let root = self.dsu.find(t);
                *label = self.root_ids[root];
            }
        }
        planes
    }
}
