use super::accumulator::MomentRecord;
use crate::types::Plane;
use nalgebra::{SymmetricEigen, Vector3};

/// Relative tolerance under which two smallest eigenvalues count as repeated.
const EIGEN_TIE_TOL: f64 = 1e-12;

/// Fit a plane to the accumulated moments of a tile or merged region.
///
/// The normal is the eigenvector of the smallest eigenvalue of the scatter
/// matrix, the offset `−n·centroid`. The normal is oriented toward the
/// sensor origin (`n·centroid ≤ 0`), which makes the sign deterministic.
///
/// Degenerate inputs (fewer than 3 samples, or a scatter matrix whose
/// eigenvector collapses numerically) yield `None`. Repeated smallest
/// eigenvalues are not an error: among eigenvalues within [`EIGEN_TIE_TOL`]
/// of the minimum, the lowest column index wins, so collinear tiles still
/// produce a reproducible normal.
pub fn fit_plane(record: &MomentRecord) -> Option<Plane> {
    let cov = record.covariance()?;
    let centroid = record.centroid()?;

    let eig = SymmetricEigen::new(cov);
    let mut min_idx = 0usize;
    for i in 1..3 {
        if eig.eigenvalues[i] < eig.eigenvalues[min_idx] {
            min_idx = i;
        }
    }
    // Deterministic tie-break: lowest index among (near-)repeated minima.
    let min_val = eig.eigenvalues[min_idx];
    let tol = EIGEN_TIE_TOL * min_val.abs().max(1.0);
    for i in 0..3 {
        if eig.eigenvalues[i] - min_val <= tol {
            min_idx = i;
            break;
        }
    }

    let v = eig.eigenvectors.column(min_idx);
    let mut normal = Vector3::new(v[0], v[1], v[2]);
    let norm = normal.norm();
    if !norm.is_finite() || norm < 1e-9 {
        return None;
    }
    normal /= norm;

    // Face the camera origin.
    if normal.dot(&centroid) > 0.0 {
        normal = -normal;
    }
    let offset = -normal.dot(&centroid);
    if !offset.is_finite() {
        return None;
    }

    Some(Plane {
        normal: Vector3::new(normal.x as f32, normal.y as f32, normal.z as f32),
        offset: offset as f32,
        point_count: record.count,
    })
}
