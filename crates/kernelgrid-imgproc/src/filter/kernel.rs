use std::sync::Arc;

use kernelgrid_image::{Neighborhood, NeighborhoodSource, SampleGrid};
use num_traits::ToPrimitive;

use super::kernels::{self, WeightMatrix};
use crate::error::KernelError;
use crate::parallel::{self, ExecutionStrategy};

/// The reduction rule of a kernel together with the weights it needs.
#[derive(Clone, Debug)]
pub enum KernelKind {
    /// Returns the center sample; the weights are kept for representation only.
    Identity(WeightMatrix),
    /// Weighted sum divided by `size^2`.
    Mean(WeightMatrix),
    /// Weighted sum divided by the sum of the weights.
    Gaussian(WeightMatrix),
    /// Gradient magnitude `sqrt(gx^2 + gy^2) / 8`.
    Sobel {
        /// Weights of the x derivative.
        x: WeightMatrix,
        /// Weights of the y derivative.
        y: WeightMatrix,
    },
    /// A gaussian pass over the whole grid followed by a sobel pass.
    SobelGaussian {
        /// The blur applied first.
        gaussian: Arc<Kernel>,
        /// The gradient applied to the blurred grid.
        sobel: Arc<Kernel>,
    },
}

impl KernelKind {
    fn label(&self) -> &'static str {
        match self {
            KernelKind::Identity(_) => "identity",
            KernelKind::Mean(_) => "mean",
            KernelKind::Gaussian(_) => "gaussian",
            KernelKind::Sobel { .. } => "sobel",
            KernelKind::SobelGaussian { .. } => "sobel-gaussian",
        }
    }
}

/// A named square filter reducing a neighborhood of samples to one sample.
///
/// Kernels are immutable once built and can be shared freely between threads.
///
/// # Examples
///
/// ```
/// use kernelgrid_image::Neighborhood;
/// use kernelgrid_imgproc::filter::Kernel;
///
/// let mean = Kernel::mean(3).unwrap();
/// let n = Neighborhood::new(3, vec![1, 2, 3, 4, 5, 6, 7, 8, 9]).unwrap();
/// assert_eq!(mean.convolve(&n).unwrap(), 5);
/// ```
#[derive(Clone, Debug)]
pub struct Kernel {
    name: String,
    size: usize,
    kind: KernelKind,
}

impl Kernel {
    /// Create a kernel, checking its weights against the declared size.
    ///
    /// # Errors
    ///
    /// * [`KernelError::UnsupportedSize`] if `size` is even.
    /// * [`KernelError::ShapeMismatch`] if a weight matrix is not `size x size`.
    /// * [`KernelError::InvalidWeights`] if mean or gaussian weights are negative,
    ///   or gaussian weights sum to zero.
    /// * [`KernelError::InvalidComposite`] if a composite is not built from a
    ///   gaussian and a sobel kernel, or its size differs from the sobel's.
    pub fn new(
        name: impl Into<String>,
        size: usize,
        kind: KernelKind,
    ) -> Result<Self, KernelError> {
        if size % 2 == 0 {
            return Err(KernelError::UnsupportedSize(size));
        }

        match &kind {
            KernelKind::Identity(w) => check_shape(size, w)?,
            KernelKind::Mean(w) => {
                check_shape(size, w)?;
                check_non_negative(w)?;
            }
            KernelKind::Gaussian(w) => {
                check_shape(size, w)?;
                check_non_negative(w)?;
                if w.sum() == 0 {
                    return Err(KernelError::InvalidWeights(
                        "gaussian weights sum to zero".to_string(),
                    ));
                }
            }
            KernelKind::Sobel { x, y } => {
                check_shape(size, x)?;
                check_shape(size, y)?;
            }
            KernelKind::SobelGaussian { gaussian, sobel } => {
                if !matches!(gaussian.kind, KernelKind::Gaussian(_)) {
                    return Err(KernelError::InvalidComposite(format!(
                        "first pass must be a gaussian kernel, got {}",
                        gaussian.kind.label()
                    )));
                }
                if !matches!(sobel.kind, KernelKind::Sobel { .. }) {
                    return Err(KernelError::InvalidComposite(format!(
                        "second pass must be a sobel kernel, got {}",
                        sobel.kind.label()
                    )));
                }
                if sobel.size != size {
                    return Err(KernelError::InvalidComposite(format!(
                        "composite size {} differs from sobel size {}",
                        size, sobel.size
                    )));
                }
            }
        }

        let kernel = Self {
            name: name.into(),
            size,
            kind,
        };
        log::debug!("built {kernel}");
        Ok(kernel)
    }

    /// Wrap weights that are valid for `size` by construction.
    pub(crate) fn from_trusted(name: &str, size: usize, kind: KernelKind) -> Self {
        let kernel = Self {
            name: name.to_string(),
            size,
            kind,
        };
        log::debug!("built {kernel}");
        kernel
    }

    /// Create an identity kernel of the given odd size.
    pub fn identity(size: usize) -> Result<Self, KernelError> {
        Self::new(
            "id",
            size,
            KernelKind::Identity(kernels::identity_kernel_2d(size)?),
        )
    }

    /// Create a box blur kernel of the given odd size.
    pub fn mean(size: usize) -> Result<Self, KernelError> {
        Self::new("mean", size, KernelKind::Mean(kernels::mean_kernel_2d(size)?))
    }

    /// Create a power-of-two weighted blur kernel of the given odd size.
    ///
    /// See [`kernels::gaussian_kernel_2d`] for the weight layout.
    pub fn gaussian(size: usize) -> Result<Self, KernelError> {
        Self::new(
            "gaussian",
            size,
            KernelKind::Gaussian(kernels::gaussian_kernel_2d(size)?),
        )
    }

    /// Create the 3x3 sobel gradient magnitude kernel.
    pub fn sobel() -> Result<Self, KernelError> {
        let (x, y) = kernels::sobel_kernel_2d();
        Self::new("sobel", 3, KernelKind::Sobel { x, y })
    }

    /// Chain a gaussian blur into a sobel gradient.
    ///
    /// The composite takes the size of `sobel`.
    pub fn sobel_gaussian(sobel: Arc<Kernel>, gaussian: Arc<Kernel>) -> Result<Self, KernelError> {
        let size = sobel.size;
        Self::new(
            "sobel-gaussian",
            size,
            KernelKind::SobelGaussian { gaussian, sobel },
        )
    }

    /// Human readable name of the kernel.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Side length of the neighborhoods the kernel reduces.
    pub fn size(&self) -> usize {
        self.size
    }

    /// The reduction rule and weights of the kernel.
    pub fn kind(&self) -> &KernelKind {
        &self.kind
    }

    /// Reduce one neighborhood to an output sample.
    ///
    /// A neighborhood whose samples all equal its center is returned unchanged,
    /// except by the sobel kernel which yields `0` for it. Otherwise the weighted
    /// sum is normalized per kernel kind and rounded half to even.
    ///
    /// # Errors
    ///
    /// * [`KernelError::SampleOutOfRange`] if the normalized value does not fit
    ///   in a `u8`, e.g. for mean weights that do not sum to `size^2`.
    /// * [`KernelError::NeighborhoodShapeMismatch`] if the neighborhood size
    ///   differs from the kernel size.
    /// * [`KernelError::UnsupportedOperation`] for the composite kernel, which
    ///   only operates on whole grids.
    pub fn convolve(&self, neighborhood: &Neighborhood) -> Result<u8, KernelError> {
        if neighborhood.size() != self.size {
            return Err(KernelError::NeighborhoodShapeMismatch {
                expected: self.size,
                actual: neighborhood.size(),
            });
        }

        let samples = neighborhood.as_slice();
        let value = match &self.kind {
            KernelKind::Identity(_) => return Ok(neighborhood.center()),
            KernelKind::SobelGaussian { .. } => {
                return Err(KernelError::UnsupportedOperation(
                    "the sobel-gaussian kernel only convolves whole grids",
                ))
            }
            KernelKind::Sobel { x, y } => {
                if neighborhood.is_flat() {
                    return Ok(0);
                }
                let gx = x.weighted_sum(samples) as f64;
                let gy = y.weighted_sum(samples) as f64;
                (gx * gx + gy * gy).sqrt() / 8.0
            }
            KernelKind::Mean(w) => {
                if neighborhood.is_flat() {
                    return Ok(neighborhood.center());
                }
                w.weighted_sum(samples) as f64 / (self.size * self.size) as f64
            }
            KernelKind::Gaussian(w) => {
                if neighborhood.is_flat() {
                    return Ok(neighborhood.center());
                }
                w.weighted_sum(samples) as f64 / w.sum() as f64
            }
        };

        round_to_sample(value)
    }

    /// Apply the kernel to every sample of a grid.
    ///
    /// Runs rows in parallel; see [`Kernel::convolve_image_with`].
    pub fn convolve_image(
        &self,
        src: &SampleGrid,
        source: &impl NeighborhoodSource,
    ) -> Result<SampleGrid, KernelError> {
        self.convolve_image_with(src, source, ExecutionStrategy::AutoRows(src.cols()))
    }

    /// Apply the kernel to every sample of a grid with an execution strategy.
    ///
    /// The output is a new grid with the size and plane count of `src`; each
    /// output sample is the reduction of the neighborhood `source` extracts
    /// around the same coordinate of `src`. The composite kernel fully
    /// materializes its blurred grid before taking gradients of it.
    ///
    /// # Arguments
    ///
    /// * `src` - The source grid, never modified.
    /// * `source` - The neighborhood extraction policy.
    /// * `strategy` - How the cells are distributed over threads.
    pub fn convolve_image_with(
        &self,
        src: &SampleGrid,
        source: &impl NeighborhoodSource,
        strategy: ExecutionStrategy,
    ) -> Result<SampleGrid, KernelError> {
        if let KernelKind::SobelGaussian { gaussian, sobel } = &self.kind {
            let blurred = gaussian.convolve_image_with(src, source, strategy)?;
            return sobel.convolve_image_with(&blurred, source, strategy);
        }

        log::debug!(
            "applying kernel {:?} ({}x{}) to {}",
            self.name,
            self.size,
            self.size,
            src.size()
        );

        let mut dst = SampleGrid::from_size_val(src.size(), 0)?.with_planes(src.num_planes())?;
        parallel::par_iter_cells(dst.as_slice_mut(), src.cols(), strategy, |row, col| {
            let neighborhood = source.extract(src, row, col, self.size)?;
            self.convolve(&neighborhood)
        })?;

        Ok(dst)
    }
}

impl std::fmt::Display for Kernel {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "Kernel {:?}, size {}x{}", self.name, self.size, self.size)
    }
}

/// Apply a kernel to each plane grid of an image.
pub fn convolve_planes(
    kernel: &Kernel,
    planes: &[SampleGrid],
    source: &impl NeighborhoodSource,
) -> Result<Vec<SampleGrid>, KernelError> {
    planes
        .iter()
        .map(|plane| kernel.convolve_image(plane, source))
        .collect()
}

fn check_shape(size: usize, weights: &WeightMatrix) -> Result<(), KernelError> {
    if weights.size() != size {
        return Err(KernelError::ShapeMismatch {
            expected: size,
            actual: format!("{0}x{0}", weights.size()),
        });
    }
    Ok(())
}

fn check_non_negative(weights: &WeightMatrix) -> Result<(), KernelError> {
    if let Some(w) = weights.as_slice().iter().find(|&&w| w < 0) {
        return Err(KernelError::InvalidWeights(format!(
            "negative weight {w} in a blur kernel"
        )));
    }
    Ok(())
}

fn round_to_sample(value: f64) -> Result<u8, KernelError> {
    value
        .round_ties_even()
        .to_u8()
        .ok_or(KernelError::SampleOutOfRange(value))
}
