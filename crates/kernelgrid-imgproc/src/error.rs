use kernelgrid_image::ImageError;

use crate::parallel::ParallelError;

/// Errors raised while building kernels or applying them.
#[derive(thiserror::Error, Debug, PartialEq)]
pub enum KernelError {
    /// Kernels only come in odd sizes, and generated weights must fit in `i32`.
    #[error("unsupported kernel size {0}, expected an odd size >= 1")]
    UnsupportedSize(usize),

    /// A weight matrix disagrees with the declared kernel size.
    #[error("weight matrix shape mismatch: expected {expected}x{expected}, got {actual}")]
    ShapeMismatch {
        /// The declared kernel size.
        expected: usize,
        /// A description of the shape that was found.
        actual: String,
    },

    /// Weights that would make the normalization meaningless.
    #[error("invalid weights: {0}")]
    InvalidWeights(String),

    /// A reduction produced a value that is not a valid sample.
    #[error("convolution result {0} does not fit in a u8 sample")]
    SampleOutOfRange(f64),

    /// A neighborhood handed to `convolve` has the wrong size.
    #[error("neighborhood size mismatch: expected {expected}x{expected}, got {actual}x{actual}")]
    NeighborhoodShapeMismatch {
        /// The kernel size.
        expected: usize,
        /// The neighborhood size.
        actual: usize,
    },

    /// The sub-kernels of a composite kernel are not of the expected kinds.
    #[error("invalid composite kernel: {0}")]
    InvalidComposite(String),

    /// The operation has no meaning for this kernel.
    #[error("unsupported operation: {0}")]
    UnsupportedOperation(&'static str),

    /// No registered kernel has the requested name.
    #[error("unknown kernel: {0}")]
    UnknownKernel(String),

    /// Error from the image collaborator.
    #[error(transparent)]
    Image(#[from] ImageError),

    /// Error from the parallel executor.
    #[error(transparent)]
    Parallel(#[from] ParallelError),
}
