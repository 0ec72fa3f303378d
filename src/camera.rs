//! Pinhole camera intrinsics.
//!
//! The segmentation itself works on 3-D samples directly and reads depth
//! straight from each sample's z component. Intrinsics are kept alongside
//! the extractor for synthesizing organized clouds from depth maps and for
//! future raw depth-map input; they do not enter the labelling math.
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct CameraIntrinsics {
    pub fx: f32,
    pub fy: f32,
    pub cx: f32,
    pub cy: f32,
}

impl Default for CameraIntrinsics {
    fn default() -> Self {
        // Kinect-style VGA defaults.
        Self {
            fx: 525.0,
            fy: 525.0,
            cx: 319.5,
            cy: 239.5,
        }
    }
}

impl CameraIntrinsics {
    /// Project a camera-frame point to pixel coordinates.
    #[inline]
    pub fn project(&self, p: &Vector3<f32>) -> (f32, f32) {
        (
            self.fx * p.x / p.z + self.cx,
            self.fy * p.y / p.z + self.cy,
        )
    }

    /// Back-project pixel `(x, y)` at `depth` into the camera frame.
    #[inline]
    pub fn backproject(&self, x: f32, y: f32, depth: f32) -> Vector3<f32> {
        Vector3::new(
            (x - self.cx) * depth / self.fx,
            (y - self.cy) * depth / self.fy,
            depth,
        )
    }

    pub fn is_valid(&self) -> bool {
        self.fx > 0.0 && self.fy > 0.0 && self.fx.is_finite() && self.fy.is_finite()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backproject_project_roundtrip() {
        let cam = CameraIntrinsics::default();
        let p = cam.backproject(120.0, 88.0, 2.5);
        let (u, v) = cam.project(&p);
        assert!((u - 120.0).abs() < 1e-3, "u={u}");
        assert!((v - 88.0).abs() < 1e-3, "v={v}");
        assert!((p.z - 2.5).abs() < 1e-6);
    }
}
