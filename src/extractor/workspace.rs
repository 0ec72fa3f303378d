//! Per-frame extractor workspace.
//!
//! The extractor reuses all dense buffers across frames to avoid repeated
//! allocations in hot paths; when the resolution is unchanged a frame only
//! clears them. No algorithmic state survives a frame.
use crate::cloud::LabelGrid;
use crate::tiles::{MomentRecord, TileLayout};
use crate::types::{Plane, PlaneId};

/// Reusable buffers owned by the extractor, passed by exclusive mutable
/// access into each phase.
pub struct ExtractorWorkspace {
    pub(crate) tile_records: Vec<MomentRecord>,
    pub(crate) tile_planes: Vec<Option<Plane>>,
    pub(crate) tile_labels: Vec<PlaneId>,
    pub(crate) labels: LabelGrid,
    pub(crate) residual: Vec<f32>,
    layout: Option<TileLayout>,
}

impl ExtractorWorkspace {
    pub fn new() -> Self {
        Self::default()
    }

    /// Prepare buffers for a `w × h` frame; returns the tile layout.
    ///
    /// Resizes only when the resolution changed since the last frame.
    pub(crate) fn reset(&mut self, w: usize, h: usize, patch_dim: usize) -> TileLayout {
        let layout = TileLayout::new(w, h, patch_dim);
        if self.layout != Some(layout) {
            let n = layout.tile_count();
            self.tile_records.resize(n, MomentRecord::default());
            self.tile_planes.resize(n, None);
            self.tile_labels.resize(n, 0);
            self.residual.resize(w * h, f32::INFINITY);
            self.layout = Some(layout);
        }
        self.labels.reset(w, h);
        layout
    }
}

impl Default for ExtractorWorkspace {
    fn default() -> Self {
        Self {
            tile_records: Vec::new(),
            tile_planes: Vec::new(),
            tile_labels: Vec::new(),
            labels: LabelGrid::new(0, 0),
            residual: Vec::new(),
            layout: None,
        }
    }
}
