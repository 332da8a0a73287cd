#![deny(missing_docs)]
//! Sample grid types and neighborhood extraction for integer kernels

/// sample grid representation.
pub mod grid;

/// neighborhood windows and border policies.
pub mod neighborhood;

/// Error types for the image module.
pub mod error;

pub use crate::error::ImageError;
pub use crate::grid::{merge_planes, split_planes, ImageSize, SampleGrid};
pub use crate::neighborhood::{BorderMode, Neighborhood, NeighborhoodSource};
