use std::sync::{Arc, LazyLock};

use super::kernels;
use super::{Kernel, KernelKind};

// Registry sizes are odd and within the gaussian limit, so the weights are
// built without the fallible generators.
fn register(name: &str, size: usize, kind: KernelKind) -> Arc<Kernel> {
    let kernel = Kernel::from_trusted(name, size, kind);
    log::info!("registered {kernel}");
    Arc::new(kernel)
}

/// The 3x3 identity kernel.
pub static IDENTITY: LazyLock<Arc<Kernel>> =
    LazyLock::new(|| register("id", 3, KernelKind::Identity(kernels::identity_weights(3))));

/// The 7x7 box blur kernel.
pub static MEAN: LazyLock<Arc<Kernel>> =
    LazyLock::new(|| register("mean", 7, KernelKind::Mean(kernels::mean_weights(7))));

/// The 7x7 power-of-two weighted blur kernel.
pub static GAUSSIAN: LazyLock<Arc<Kernel>> = LazyLock::new(|| {
    register(
        "gaussian",
        7,
        KernelKind::Gaussian(kernels::gaussian_weights(7)),
    )
});

/// The 3x3 sobel gradient magnitude kernel.
pub static SOBEL: LazyLock<Arc<Kernel>> = LazyLock::new(|| {
    let (x, y) = kernels::sobel_kernel_2d();
    register("sobel", 3, KernelKind::Sobel { x, y })
});

/// The 7x7 blur followed by the 3x3 sobel gradient.
pub static SOBEL_GAUSSIAN: LazyLock<Arc<Kernel>> = LazyLock::new(|| {
    register(
        "sobel-gaussian",
        SOBEL.size(),
        KernelKind::SobelGaussian {
            gaussian: GAUSSIAN.clone(),
            sobel: SOBEL.clone(),
        },
    )
});

/// Names of the registered kernels.
pub fn names() -> [&'static str; 5] {
    ["id", "mean", "gaussian", "sobel", "sobel-gaussian"]
}

/// Look up a registered kernel by name.
///
/// # Examples
///
/// ```
/// use kernelgrid_imgproc::filter::registry;
///
/// let sobel = registry::by_name("sobel").unwrap();
/// assert_eq!(sobel.size(), 3);
/// assert!(registry::by_name("median").is_none());
/// ```
pub fn by_name(name: &str) -> Option<Arc<Kernel>> {
    let kernel = match name {
        "id" => &*IDENTITY,
        "mean" => &*MEAN,
        "gaussian" => &*GAUSSIAN,
        "sobel" => &*SOBEL,
        "sobel-gaussian" => &*SOBEL_GAUSSIAN,
        _ => return None,
    };
    Some(Arc::clone(kernel))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::KernelError;

    #[test]
    fn registry_sizes() {
        assert_eq!(IDENTITY.size(), 3);
        assert_eq!(MEAN.size(), 7);
        assert_eq!(GAUSSIAN.size(), 7);
        assert_eq!(SOBEL.size(), 3);
        assert_eq!(SOBEL_GAUSSIAN.size(), 3);
    }

    #[test]
    fn registry_names_resolve() {
        for name in names() {
            let kernel = by_name(name);
            assert_eq!(kernel.map(|k| k.name().to_string()), Some(name.to_string()));
        }
    }

    #[test]
    fn registry_weights_match_generators() -> Result<(), KernelError> {
        let KernelKind::Identity(w) = IDENTITY.kind() else {
            panic!("expected an identity kernel");
        };
        assert_eq!(w, &kernels::identity_kernel_2d(3)?);

        let KernelKind::Mean(w) = MEAN.kind() else {
            panic!("expected a mean kernel");
        };
        assert_eq!(w, &kernels::mean_kernel_2d(7)?);

        let KernelKind::Gaussian(w) = GAUSSIAN.kind() else {
            panic!("expected a gaussian kernel");
        };
        assert_eq!(w, &kernels::gaussian_kernel_2d(7)?);

        // the checked constructors accept what the registry builds
        assert_eq!(Kernel::new("mean", 7, MEAN.kind().clone())?.size(), 7);
        assert_eq!(
            Kernel::new("sobel-gaussian", 3, SOBEL_GAUSSIAN.kind().clone())?.size(),
            3
        );
        Ok(())
    }

    #[test]
    fn composite_shares_sub_kernels() {
        let KernelKind::SobelGaussian { gaussian, sobel } = SOBEL_GAUSSIAN.kind() else {
            panic!("expected a composite kernel");
        };
        assert!(Arc::ptr_eq(gaussian, &*GAUSSIAN));
        assert!(Arc::ptr_eq(sobel, &*SOBEL));
    }
}
