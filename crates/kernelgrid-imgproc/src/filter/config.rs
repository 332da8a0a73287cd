use std::sync::Arc;

use kernelgrid_image::{BorderMode, SampleGrid};
use serde::{Deserialize, Serialize};

use super::{registry, Kernel};
use crate::error::KernelError;
use crate::parallel::ExecutionStrategy;

/// Describes a kernel to build.
///
/// # Examples
///
/// ```
/// use kernelgrid_imgproc::filter::config::KernelConfig;
///
/// let kernel = KernelConfig::Mean { size: 5 }.build().unwrap();
/// assert_eq!(kernel.size(), 5);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum KernelConfig {
    /// An identity kernel.
    Identity {
        /// The odd kernel size.
        size: usize,
    },
    /// A box blur kernel.
    Mean {
        /// The odd kernel size.
        size: usize,
    },
    /// A power-of-two weighted blur kernel.
    Gaussian {
        /// The odd kernel size.
        size: usize,
    },
    /// The 3x3 sobel gradient kernel.
    Sobel,
    /// A blur followed by the sobel gradient.
    SobelGaussian {
        /// The odd size of the blur.
        gaussian_size: usize,
    },
    /// A kernel from the process-wide registry.
    Named {
        /// The registered name, see [`registry::names`].
        name: String,
    },
}

impl KernelConfig {
    /// Build the described kernel.
    pub fn build(&self) -> Result<Arc<Kernel>, KernelError> {
        let kernel = match self {
            KernelConfig::Identity { size } => Kernel::identity(*size)?,
            KernelConfig::Mean { size } => Kernel::mean(*size)?,
            KernelConfig::Gaussian { size } => Kernel::gaussian(*size)?,
            KernelConfig::Sobel => Kernel::sobel()?,
            KernelConfig::SobelGaussian { gaussian_size } => Kernel::sobel_gaussian(
                registry::SOBEL.clone(),
                Arc::new(Kernel::gaussian(*gaussian_size)?),
            )?,
            KernelConfig::Named { name } => {
                return registry::by_name(name)
                    .ok_or_else(|| KernelError::UnknownKernel(name.clone()))
            }
        };
        Ok(Arc::new(kernel))
    }
}

/// The border policy used to extract neighborhoods.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", content = "value", rename_all = "snake_case")]
pub enum BorderConfig {
    /// Fill with a constant value.
    Constant(u8),
    /// Repeat the edge sample.
    #[default]
    Replicate,
    /// Mirror including the edge sample.
    Reflect,
    /// Mirror excluding the edge sample.
    Reflect101,
    /// Wrap around to the opposite edge.
    Wrap,
}

impl From<BorderConfig> for BorderMode {
    fn from(config: BorderConfig) -> Self {
        match config {
            BorderConfig::Constant(v) => BorderMode::Constant(v),
            BorderConfig::Replicate => BorderMode::Replicate,
            BorderConfig::Reflect => BorderMode::Reflect,
            BorderConfig::Reflect101 => BorderMode::Reflect101,
            BorderConfig::Wrap => BorderMode::Wrap,
        }
    }
}

fn default_parallel() -> bool {
    true
}

/// A complete filtering setup: the kernel, the border policy and threading.
///
/// ```json
/// { "kernel": { "type": "gaussian", "size": 7 }, "border": { "mode": "wrap" } }
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterConfig {
    /// The kernel to apply.
    pub kernel: KernelConfig,
    /// How neighborhoods are completed at the grid edges.
    #[serde(default)]
    pub border: BorderConfig,
    /// Whether rows are processed on the rayon thread pool.
    #[serde(default = "default_parallel")]
    pub parallel: bool,
}

impl FilterConfig {
    /// Build the configured kernel and apply it to `src`.
    pub fn run(&self, src: &SampleGrid) -> Result<SampleGrid, KernelError> {
        let kernel = self.kernel.build()?;
        let strategy = if self.parallel {
            ExecutionStrategy::AutoRows(src.cols())
        } else {
            ExecutionStrategy::Serial
        };
        kernel.convolve_image_with(src, &BorderMode::from(self.border), strategy)
    }
}
