use crate::cloud::LabelGrid;
use nalgebra::Vector3;
use serde::Serialize;

/// Dense per-pixel plane label. `0` means unassigned/background; labels
/// `1..=K` index [`SegmentationResult::planes`] 1-based.
pub type PlaneId = u32;

/// Label value for pixels not claimed by any plane.
pub const UNASSIGNED: PlaneId = 0;

/// Fitted plane in Hessian normal form `n·x + d = 0` with unit normal.
#[derive(Clone, Debug, Serialize)]
pub struct Plane {
    pub normal: Vector3<f32>,
    pub offset: f32,
    /// Number of samples backing the plane. After refinement this is the
    /// final pixel coverage.
    pub point_count: usize,
}

impl Plane {
    /// Signed perpendicular distance from `p` to the plane.
    #[inline]
    pub fn signed_distance(&self, p: &Vector3<f32>) -> f32 {
        self.normal.dot(p) + self.offset
    }
}

/// Per-frame segmentation output.
///
/// `planes` is ordered by canonical id: the label `k` in `labels` refers to
/// `planes[k - 1]`.
#[derive(Clone, Debug, Serialize)]
pub struct SegmentationResult {
    pub labels: LabelGrid,
    pub planes: Vec<Plane>,
    pub latency_ms: f64,
}
