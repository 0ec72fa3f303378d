//! Owned organized point buffer in row-major layout (stride == width).
//!
//! Each cell holds a 3-D position in the camera frame; missing depth is
//! encoded as NaN components. Validity is a per-sample property, not a
//! separate mask.
use super::traits::{GridView, GridViewMut};
use nalgebra::Vector3;

#[derive(Clone, Debug)]
pub struct OrganizedCloud {
    /// Grid width in pixels
    pub w: usize,
    /// Grid height in pixels
    pub h: usize,
    /// Number of elements between consecutive rows (equals `w`)
    pub stride: usize,
    /// Backing storage in row-major order
    pub points: Vec<Vector3<f32>>,
}

/// Sentinel used for missing samples.
#[inline]
pub(crate) fn invalid_point() -> Vector3<f32> {
    Vector3::new(f32::NAN, f32::NAN, f32::NAN)
}

impl OrganizedCloud {
    /// Construct a buffer of size `w × h` with every sample marked invalid.
    pub fn new(w: usize, h: usize) -> Self {
        Self {
            w,
            h,
            stride: w,
            points: vec![invalid_point(); w * h],
        }
    }

    /// Fill the grid from a per-pixel generator. Handy for synthetic scenes.
    pub fn from_fn<F: FnMut(usize, usize) -> Vector3<f32>>(w: usize, h: usize, mut f: F) -> Self {
        let mut cloud = Self::new(w, h);
        for y in 0..h {
            for x in 0..w {
                let i = cloud.idx(x, y);
                cloud.points[i] = f(x, y);
            }
        }
        cloud
    }

    #[inline]
    /// Convert (x, y) to a linear index into `points`.
    pub fn idx(&self, x: usize, y: usize) -> usize {
        y * self.stride + x
    }

    #[inline]
    /// Get the sample at (x, y).
    pub fn get(&self, x: usize, y: usize) -> Vector3<f32> {
        self.points[self.idx(x, y)]
    }

    #[inline]
    /// Set the sample at (x, y).
    pub fn set(&mut self, x: usize, y: usize, p: Vector3<f32>) {
        let i = self.idx(x, y);
        self.points[i] = p;
    }

    #[inline]
    /// Mark the sample at (x, y) as missing.
    pub fn invalidate(&mut self, x: usize, y: usize) {
        let i = self.idx(x, y);
        self.points[i] = invalid_point();
    }

    #[inline]
    /// A sample is valid when all components are finite.
    pub fn is_valid(&self, x: usize, y: usize) -> bool {
        let p = self.get(x, y);
        p.x.is_finite() && p.y.is_finite() && p.z.is_finite()
    }
}

impl GridView for OrganizedCloud {
    type Cell = Vector3<f32>;

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
    fn row(&self, y: usize) -> &[Vector3<f32>] {
        let start = y * self.stride;
        &self.points[start..start + self.w]
    }
    #[inline]
    fn as_slice(&self) -> Option<&[Vector3<f32>]> {
        (self.stride == self.w).then_some(&self.points[..self.w * self.h])
    }
}

impl GridViewMut for OrganizedCloud {
    #[inline]
    fn row_mut(&mut self, y: usize) -> &mut [Vector3<f32>] {
        let start = y * self.stride;
        let end = start + self.w;
        &mut self.points[start..end]
    }
}
