//! Filter operations
//!
//! This module provides the integer kernels applied to sample grids.

/// Weight matrices and their generators
pub mod kernels;

/// Kernel configuration
pub mod config;

/// Process-wide named kernels
pub mod registry;

mod kernel;
pub use kernel::*;
