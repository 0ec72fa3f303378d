//! Optional per-sample unit-normal buffer, same layout as the point grid.
//!
//! Produced upstream by normal estimation; only consumed when the pointwise
//! normal check is enabled.
use super::traits::GridView;
use nalgebra::Vector3;

#[derive(Clone, Debug)]
pub struct NormalCloud {
    pub w: usize,
    pub h: usize,
    pub stride: usize,
    /// One unit normal per sample, NaN where estimation failed.
    pub normals: Vec<Vector3<f32>>,
}

impl NormalCloud {
    /// Construct a buffer of size `w × h` with every normal marked invalid.
    pub fn new(w: usize, h: usize) -> Self {
        Self {
            w,
            h,
            stride: w,
            normals: vec![Vector3::new(f32::NAN, f32::NAN, f32::NAN); w * h],
        }
    }

    /// Fill the grid from a per-pixel generator.
    pub fn from_fn<F: FnMut(usize, usize) -> Vector3<f32>>(w: usize, h: usize, mut f: F) -> Self {
        let mut cloud = Self::new(w, h);
        for y in 0..h {
            for x in 0..w {
                let i = cloud.idx(x, y);
                cloud.normals[i] = f(x, y);
            }
        }
        cloud
    }

    #[inline]
    pub fn idx(&self, x: usize, y: usize) -> usize {
        y * self.stride + x
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> Vector3<f32> {
        self.normals[self.idx(x, y)]
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, n: Vector3<f32>) {
        let i = self.idx(x, y);
        self.normals[i] = n;
    }

    #[inline]
    pub fn is_valid(&self, x: usize, y: usize) -> bool {
        let n = self.get(x, y);
        n.x.is_finite() && n.y.is_finite() && n.z.is_finite()
    }
}

impl GridView for NormalCloud {
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
        &self.normals[start..start + self.w]
    }
    #[inline]
    fn as_slice(&self) -> Option<&[Vector3<f32>]> {
        (self.stride == self.w).then_some(&self.normals[..self.w * self.h])
    }
}
