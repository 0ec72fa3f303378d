//! Per-tile moment accumulation and closed-form plane fitting.
//!
//! The grid is partitioned into `patch_dim × patch_dim` tiles (border tiles
//! may be partial). Each tile accumulates an additive [`MomentRecord`] over
//! its valid samples; the tile plane is the smallest-eigenvalue eigenvector
//! of the scatter matrix derived from that record. Because moment records are
//! additive, merging two tiles later is a constant-time sum.
mod accumulator;
mod fit;
mod grid;


pub use accumulator::{MomentRecord, MIN_TILE_SAMPLES};
pub use fit::fit_plane;
pub use grid::{build_tiles, TileLayout, TileOptions};
