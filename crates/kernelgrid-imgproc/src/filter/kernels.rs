use crate::error::KernelError;

/// Largest size whose generated gaussian weights still fit in an `i32`.
pub const MAX_GAUSSIAN_SIZE: usize = 31;

/// An immutable `size x size` matrix of integer weights stored row-major.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WeightMatrix {
    size: usize,
    data: Vec<i32>,
}

impl WeightMatrix {
    /// Create a weight matrix from `size * size` row-major weights.
    ///
    /// # Errors
    ///
    /// Returns [`KernelError::UnsupportedSize`] for an even size and
    /// [`KernelError::ShapeMismatch`] when the data length is not `size * size`.
    pub fn new(size: usize, data: Vec<i32>) -> Result<Self, KernelError> {
        check_odd(size)?;
        if data.len() != size * size {
            return Err(KernelError::ShapeMismatch {
                expected: size,
                actual: format!("{} weights", data.len()),
            });
        }
        Ok(Self { size, data })
    }

    /// Create a weight matrix from its rows.
    ///
    /// # Examples
    ///
    /// ```
    /// use kernelgrid_imgproc::filter::kernels::WeightMatrix;
    ///
    /// let w = WeightMatrix::from_rows(&[[0, 1, 0], [1, 4, 1], [0, 1, 0]]).unwrap();
    /// assert_eq!(w.size(), 3);
    /// assert_eq!(w.sum(), 8);
    /// ```
    pub fn from_rows<R: AsRef<[i32]>>(rows: &[R]) -> Result<Self, KernelError> {
        let size = rows.len();
        let mut data = Vec::with_capacity(size * size);
        for row in rows {
            let row = row.as_ref();
            if row.len() != size {
                return Err(KernelError::ShapeMismatch {
                    expected: size,
                    actual: format!("{}x{}", size, row.len()),
                });
            }
            data.extend_from_slice(row);
        }
        Self::new(size, data)
    }

    /// Side length of the matrix.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Get the weight at `(row, col)`.
    pub fn get(&self, row: usize, col: usize) -> Option<i32> {
        if row >= self.size || col >= self.size {
            return None;
        }
        Some(self.data[row * self.size + col])
    }

    /// Get the weights as a row-major slice.
    pub fn as_slice(&self) -> &[i32] {
        &self.data
    }

    /// Sum of all the weights.
    pub fn sum(&self) -> i64 {
        self.data.iter().map(|&w| w as i64).sum()
    }

    /// Element-wise product sum of the weights and `samples`.
    ///
    /// `samples` must hold `size * size` values in row-major order.
    pub(crate) fn weighted_sum(&self, samples: &[u8]) -> i64 {
        self.data
            .iter()
            .zip(samples)
            .map(|(&w, &s)| w as i64 * s as i64)
            .sum()
    }
}

fn check_odd(size: usize) -> Result<(), KernelError> {
    if size % 2 == 0 {
        return Err(KernelError::UnsupportedSize(size));
    }
    Ok(())
}

/// Create an identity kernel: zeros with a single one at the center.
///
/// # Arguments
///
/// * `kernel_size` - The size of the kernel, must be odd.
pub fn identity_kernel_2d(kernel_size: usize) -> Result<WeightMatrix, KernelError> {
    check_odd(kernel_size)?;
    Ok(identity_weights(kernel_size))
}

// kernel_size must be odd.
pub(crate) fn identity_weights(kernel_size: usize) -> WeightMatrix {
    let mut data = vec![0; kernel_size * kernel_size];
    let half = kernel_size / 2;
    data[half * kernel_size + half] = 1;
    WeightMatrix {
        size: kernel_size,
        data,
    }
}

/// Create a box blur kernel of all ones.
///
/// The normalization by `kernel_size^2` happens when the kernel is applied.
///
/// # Arguments
///
/// * `kernel_size` - The size of the kernel, must be odd.
pub fn mean_kernel_2d(kernel_size: usize) -> Result<WeightMatrix, KernelError> {
    check_odd(kernel_size)?;
    Ok(mean_weights(kernel_size))
}

// kernel_size must be odd.
pub(crate) fn mean_weights(kernel_size: usize) -> WeightMatrix {
    WeightMatrix {
        size: kernel_size,
        data: vec![1; kernel_size * kernel_size],
    }
}

/// Create a power-of-two gaussian-like kernel.
///
/// With `m = kernel_size / 2`, each axis index folds onto its distance from
/// the nearest edge (`d = i` for `i <= m`, `kernel_size - i - 1` otherwise)
/// and the weight at `(i, j)` is `2^(di + dj)`. Corners weigh 1 and the
/// center weighs `2^(2m)`.
///
/// # Arguments
///
/// * `kernel_size` - The size of the kernel, odd and at most [`MAX_GAUSSIAN_SIZE`].
pub fn gaussian_kernel_2d(kernel_size: usize) -> Result<WeightMatrix, KernelError> {
    check_odd(kernel_size)?;
    if kernel_size > MAX_GAUSSIAN_SIZE {
        return Err(KernelError::UnsupportedSize(kernel_size));
    }
    Ok(gaussian_weights(kernel_size))
}

// kernel_size must be odd and at most MAX_GAUSSIAN_SIZE.
pub(crate) fn gaussian_weights(kernel_size: usize) -> WeightMatrix {
    let half = kernel_size / 2;
    let fold = |i: usize| if i <= half { i } else { kernel_size - i - 1 };

    let mut data = Vec::with_capacity(kernel_size * kernel_size);
    for i in 0..kernel_size {
        for j in 0..kernel_size {
            data.push(1i32 << (fold(i) + fold(j)));
        }
    }
    WeightMatrix {
        size: kernel_size,
        data,
    }
}

/// Create the 3x3 sobel kernels for the x and y derivatives.
pub fn sobel_kernel_2d() -> (WeightMatrix, WeightMatrix) {
    let kernel_x = WeightMatrix {
        size: 3,
        data: vec![-1, 0, 1, -2, 0, 2, -1, 0, 1],
    };
    let kernel_y = WeightMatrix {
        size: 3,
        data: vec![-1, -2, -1, 0, 0, 0, 1, 2, 1],
    };
    (kernel_x, kernel_y)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean_kernel_2d() -> Result<(), KernelError> {
        for size in [1, 3, 5, 7, 9] {
            let kernel = mean_kernel_2d(size)?;
            assert_eq!(kernel.size(), size);
            assert_eq!(kernel.as_slice().len(), size * size);
            assert!(kernel.as_slice().iter().all(|&w| w == 1));
        }
        for size in [0, 2, 4, 8] {
            assert_eq!(mean_kernel_2d(size), Err(KernelError::UnsupportedSize(size)));
        }
        Ok(())
    }

    #[test]
    fn test_gaussian_kernel_2d_3() -> Result<(), KernelError> {
        let kernel = gaussian_kernel_2d(3)?;
        assert_eq!(kernel.as_slice(), &[1, 2, 1, 2, 4, 2, 1, 2, 1]);
        assert_eq!(kernel.sum(), 16);
        Ok(())
    }

    #[test]
    fn test_gaussian_kernel_2d_7() -> Result<(), KernelError> {
        let kernel = gaussian_kernel_2d(7)?;
        let axis = [1, 2, 4, 8, 4, 2, 1];
        for i in 0..7 {
            for j in 0..7 {
                assert_eq!(kernel.get(i, j), Some(axis[i] * axis[j]));
            }
        }
        assert_eq!(kernel.sum(), 22 * 22);
        Ok(())
    }

    #[test]
    fn test_gaussian_kernel_2d_symmetry() -> Result<(), KernelError> {
        for size in [1, 3, 5, 7, 11, MAX_GAUSSIAN_SIZE] {
            let kernel = gaussian_kernel_2d(size)?;
            let last = size - 1;
            for i in 0..size {
                for j in 0..size {
                    let w = kernel.get(i, j);
                    assert_eq!(w, kernel.get(last - i, j));
                    assert_eq!(w, kernel.get(i, last - j));
                }
            }
            let half = size / 2;
            assert_eq!(kernel.get(0, 0), Some(1));
            assert_eq!(kernel.get(half, half), Some(1 << (2 * half)));
            let max = kernel.as_slice().iter().max().copied();
            assert_eq!(kernel.get(half, half), max);
        }
        Ok(())
    }

    #[test]
    fn test_gaussian_kernel_2d_unsupported() {
        assert_eq!(gaussian_kernel_2d(4), Err(KernelError::UnsupportedSize(4)));
        assert_eq!(gaussian_kernel_2d(33), Err(KernelError::UnsupportedSize(33)));
    }

    #[test]
    fn test_identity_kernel_2d() -> Result<(), KernelError> {
        let kernel = identity_kernel_2d(3)?;
        assert_eq!(kernel.as_slice(), &[0, 0, 0, 0, 1, 0, 0, 0, 0]);
        assert_eq!(kernel.sum(), 1);
        assert!(identity_kernel_2d(2).is_err());
        Ok(())
    }

    #[test]
    fn test_sobel_kernel_2d() {
        let (kernel_x, kernel_y) = sobel_kernel_2d();
        assert_eq!(kernel_x.as_slice(), &[-1, 0, 1, -2, 0, 2, -1, 0, 1]);
        assert_eq!(kernel_y.as_slice(), &[-1, -2, -1, 0, 0, 0, 1, 2, 1]);
        assert_eq!(kernel_x.sum(), 0);
        assert_eq!(kernel_y.sum(), 0);
    }

    #[test]
    fn test_weight_matrix_shape() {
        let res = WeightMatrix::from_rows(&[vec![1, 1, 1], vec![1, 1], vec![1, 1, 1]]);
        assert!(matches!(
            res,
            Err(KernelError::ShapeMismatch { expected: 3, .. })
        ));
        assert!(matches!(
            WeightMatrix::new(3, vec![1; 8]),
            Err(KernelError::ShapeMismatch { expected: 3, .. })
        ));
        assert_eq!(
            WeightMatrix::new(2, vec![1; 4]),
            Err(KernelError::UnsupportedSize(2))
        );
    }

    #[test]
    fn test_weighted_sum() -> Result<(), KernelError> {
        let kernel = gaussian_kernel_2d(3)?;
        let samples = [255u8; 9];
        assert_eq!(kernel.weighted_sum(&samples), 16 * 255);
        Ok(())
    }
}
