use nalgebra::{Matrix3, Vector3};
use std::ops::{Add, AddAssign};

/// Minimum valid samples for a well-posed plane fit.
pub const MIN_TILE_SAMPLES: usize = 3;

/// Additive second-order statistics of a point set.
///
/// Sums are kept in f64 so that tiles far from the origin do not lose the
/// fractional part that carries the plane curvature signal. Adding two
/// records is equivalent to accumulating the union of their samples.
#[derive(Clone, Copy, Debug, Default)]
pub struct MomentRecord {
    pub sum: Vector3<f64>,
    pub xx: f64,
    pub xy: f64,
    pub xz: f64,
    pub yy: f64,
    pub yz: f64,
    pub zz: f64,
    pub count: usize,
}

impl MomentRecord {
    #[inline]
    pub fn push(&mut self, p: &Vector3<f32>) {
        let x = p.x as f64;
        let y = p.y as f64;
        let z = p.z as f64;
        self.sum += Vector3::new(x, y, z);
        self.xx += x * x;
        self.xy += x * y;
        self.xz += x * z;
        self.yy += y * y;
        self.yz += y * z;
        self.zz += z * z;
        self.count += 1;
    }

    #[inline]
    pub fn is_well_posed(&self) -> bool {
        self.count >= MIN_TILE_SAMPLES
    }

    /// Mean position, `None` for an empty record.
    pub fn centroid(&self) -> Option<Vector3<f64>> {
        if self.count == 0 {
            return None;
        }
        Some(self.sum / self.count as f64)
    }

    /// Symmetric scatter matrix `C_ij = Σij/n − (Σi/n)(Σj/n)`.
    ///
    /// `None` when the record holds fewer than [`MIN_TILE_SAMPLES`] points.
    pub fn covariance(&self) -> Option<Matrix3<f64>> {
        if !self.is_well_posed() {
            return None;
        }
        let n = self.count as f64;
        let m = self.sum / n;
        let cxx = self.xx / n - m.x * m.x;
        let cxy = self.xy / n - m.x * m.y;
        let cxz = self.xz / n - m.x * m.z;
        let cyy = self.yy / n - m.y * m.y;
        let cyz = self.yz / n - m.y * m.z;
        let czz = self.zz / n - m.z * m.z;
        Some(Matrix3::new(
            cxx, cxy, cxz, //
            cxy, cyy, cyz, //
            cxz, cyz, czz,
        ))
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

impl AddAssign<&MomentRecord> for MomentRecord {
    fn add_assign(&mut self, b: &MomentRecord) {
        self.sum += b.sum;
        self.xx += b.xx;
        self.xy += b.xy;
        self.xz += b.xz;
        self.yy += b.yy;
        self.yz += b.yz;
        self.zz += b.zz;
        self.count += b.count;
    }
}

impl Add for MomentRecord {
    type Output = MomentRecord;

    fn add(mut self, b: MomentRecord) -> MomentRecord {
        self += &b;
        self
    }
}
