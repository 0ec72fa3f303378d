//! Organized-grid containers for points, normals and labels.
//!
//! All buffers are row-major with `stride == width`, addressed by `(x, y)`
//! pixel coordinates that preserve the sensor layout. Missing depth is
//! encoded as NaN components in the point buffer.
mod labels;
mod normals;
mod points;
pub mod traits;

pub use labels::LabelGrid;
pub use normals::NormalCloud;
pub use points::OrganizedCloud;
pub use traits::{GridView, GridViewMut};
