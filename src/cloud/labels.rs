//! Per-pixel plane label grid, the primary segmentation output.
use super::traits::{GridView, GridViewMut};
use crate::types::PlaneId;
use serde::Serialize;

#[derive(Clone, Debug, Serialize)]
pub struct LabelGrid {
    pub w: usize,
    pub h: usize,
    pub stride: usize,
    /// `0` = unassigned, `1..=K` index the plane list 1-based.
    pub labels: Vec<PlaneId>,
}

impl LabelGrid {
    /// Construct a zeroed (all-unassigned) grid of size `w × h`.
    pub fn new(w: usize, h: usize) -> Self {
        Self {
            w,
            h,
            stride: w,
            labels: vec![0; w * h],
        }
    }

    /// Resize if needed and reset every pixel to unassigned.
    pub fn reset(&mut self, w: usize, h: usize) {
        if self.w != w || self.h != h {
            self.w = w;
            self.h = h;
            self.stride = w;
            self.labels.resize(w * h, 0);
        }
        self.labels.fill(0);
    }

    #[inline]
    pub fn idx(&self, x: usize, y: usize) -> usize {
        y * self.stride + x
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> PlaneId {
        self.labels[self.idx(x, y)]
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, id: PlaneId) {
        let i = self.idx(x, y);
        self.labels[i] = id;
    }

    /// Pixel count per label, indexed by label value (`counts[0]` is the
    /// unassigned count). `num_planes` is the highest expected label.
    pub fn coverage(&self, num_planes: usize) -> Vec<usize> {
        let mut counts = vec![0usize; num_planes + 1];
        for &l in &self.labels {
            counts[l as usize] += 1;
        }
        counts
    }
}

impl GridView for LabelGrid {
    type Cell = PlaneId;

    #[inline]
    fn width(&self) -> usize {
        self.w
    }
    #[inline]
    fn height(&self) -> usize {
        self.h
    }
    #[inline]
    fn stride(&self) -> usize {
        self.stride
    }
    #[inline]
    fn row(&self, y: usize) -> &[PlaneId] {
        let start = y * self.stride;
        &self.labels[start..start + self.w]
    }
    #[inline]
    fn as_slice(&self) -> Option<&[PlaneId]> {
        (self.stride == self.w).then_some(&self.labels[..self.w * self.h])
    }
}

impl GridViewMut for LabelGrid {
    #[inline]
    fn row_mut(&mut self, y: usize) -> &mut [PlaneId] {
        let start = y * self.stride;
        let end = start + self.w;
        &mut self.labels[start..end]
    }
}
