#![allow(dead_code)]
use nalgebra::Vector3;
use plane_detector::OrganizedCloud;

const GRID_STEP: f32 = 0.01;

/// All samples on the plane `z = depth` (normal along the optical axis).
pub fn flat_cloud(w: usize, h: usize, depth: f32) -> OrganizedCloud {
    OrganizedCloud::from_fn(w, h, |x, y| {
        Vector3::new(x as f32 * GRID_STEP, y as f32 * GRID_STEP, depth)
    })
}

/// Left half on `z = 1`, right half on the orthogonal plane `x = 0.5`.
/// The seam sits on a tile boundary for `patch_dim = 10`.
pub fn corner_cloud(w: usize, h: usize) -> OrganizedCloud {
    let split = w / 2;
    OrganizedCloud::from_fn(w, h, |x, y| {
        if x < split {
            Vector3::new(x as f32 * GRID_STEP, y as f32 * GRID_STEP, 1.0)
        } else {
            Vector3::new(
                0.5,
                y as f32 * GRID_STEP,
                1.0 + (x - split) as f32 * GRID_STEP,
            )
        }
    })
}

/// Flat cloud with a rectangular hole of invalid samples.
pub fn holed_cloud(
    w: usize,
    h: usize,
    depth: f32,
    hole_x: std::ops::Range<usize>,
    hole_y: std::ops::Range<usize>,
) -> OrganizedCloud {
    let mut cloud = flat_cloud(w, h, depth);
    for y in hole_y {
        for x in hole_x.clone() {
            cloud.invalidate(x, y);
        }
    }
    cloud
}

/// Flat cloud with deterministic pseudo-random depth jitter in
/// `[-amplitude, amplitude]`.
pub fn noisy_flat_cloud(w: usize, h: usize, depth: f32, amplitude: f32) -> OrganizedCloud {
    OrganizedCloud::from_fn(w, h, |x, y| {
        Vector3::new(
            x as f32 * GRID_STEP,
            y as f32 * GRID_STEP,
            depth + amplitude * hash_noise(x, y),
        )
    })
}

/// Hash-based noise in [-1, 1], reproducible across runs and platforms.
fn hash_noise(x: usize, y: usize) -> f32 {
    let mut s = (x as u32).wrapping_mul(73_856_093) ^ (y as u32).wrapping_mul(19_349_663);
    s ^= s >> 13;
    s = s.wrapping_mul(0x45d9_f3b5);
    s ^= s >> 16;
    (s as f32 / u32::MAX as f32) * 2.0 - 1.0
}
