use crate::error::ImageError;

/// Image size in pixels
///
/// A struct to represent the size of a sample grid in pixels.
///
/// # Examples
///
/// ```
/// use kernelgrid_image::ImageSize;
///
/// let image_size = ImageSize {
///   width: 10,
///   height: 20,
/// };
///
/// assert_eq!(image_size.width, 10);
/// assert_eq!(image_size.height, 20);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ImageSize {
    /// Width of the image in pixels
    pub width: usize,
    /// Height of the image in pixels
    pub height: usize,
}

impl std::fmt::Display for ImageSize {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "ImageSize {{ width: {}, height: {} }}",
            self.width, self.height
        )
    }
}

impl From<[usize; 2]> for ImageSize {
    fn from(size: [usize; 2]) -> Self {
        ImageSize {
            width: size[0],
            height: size[1],
        }
    }
}

/// A single plane of `u8` samples stored row-major.
///
/// The grid keeps the plane count of the image it was taken from. The count is
/// informational only: every operation on a [`SampleGrid`] works on the one
/// plane of samples it holds.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SampleGrid {
    size: ImageSize,
    planes: usize,
    data: Vec<u8>,
}

impl SampleGrid {
    /// Create a new grid from sample data.
    ///
    /// # Arguments
    ///
    /// * `size` - The size of the grid in pixels.
    /// * `data` - The samples of the grid in row-major order.
    ///
    /// # Errors
    ///
    /// If the length of the data does not match the grid size, an error is returned.
    ///
    /// # Examples
    ///
    /// ```
    /// use kernelgrid_image::{ImageSize, SampleGrid};
    ///
    /// let grid = SampleGrid::new(
    ///     ImageSize {
    ///         width: 10,
    ///         height: 20,
    ///     },
    ///     vec![0u8; 10 * 20],
    /// ).unwrap();
    ///
    /// assert_eq!(grid.width(), 10);
    /// assert_eq!(grid.height(), 20);
    /// assert_eq!(grid.num_planes(), 1);
    /// ```
    pub fn new(size: ImageSize, data: Vec<u8>) -> Result<Self, ImageError> {
        if data.len() != size.width * size.height {
            return Err(ImageError::InvalidChannelShape(
                data.len(),
                size.width * size.height,
            ));
        }

        Ok(Self {
            size,
            planes: 1,
            data,
        })
    }

    /// Create a new grid with every sample set to `val`.
    pub fn from_size_val(size: ImageSize, val: u8) -> Result<Self, ImageError> {
        Self::new(size, vec![val; size.width * size.height])
    }

    /// Set the informational plane count carried by the grid.
    ///
    /// # Errors
    ///
    /// A plane count of zero is rejected.
    pub fn with_planes(mut self, planes: usize) -> Result<Self, ImageError> {
        if planes == 0 {
            return Err(ImageError::InvalidPlaneCount(planes));
        }
        self.planes = planes;
        Ok(self)
    }

    /// Get the size of the grid in pixels.
    pub fn size(&self) -> ImageSize {
        self.size
    }

    /// Get the number of columns of the grid.
    pub fn cols(&self) -> usize {
        self.size.width
    }

    /// Get the number of rows of the grid.
    pub fn rows(&self) -> usize {
        self.size.height
    }

    /// Get the width of the grid in pixels.
    pub fn width(&self) -> usize {
        self.size.width
    }

    /// Get the height of the grid in pixels.
    pub fn height(&self) -> usize {
        self.size.height
    }

    /// Get the plane count of the image this grid belongs to.
    pub fn num_planes(&self) -> usize {
        self.planes
    }

    /// Get the sample at `(row, col)`, or `None` when out of bounds.
    pub fn get(&self, row: usize, col: usize) -> Option<u8> {
        if row >= self.rows() || col >= self.cols() {
            return None;
        }
        Some(self.data[row * self.cols() + col])
    }

    /// Overwrite the sample at `(row, col)`.
    pub fn set(&mut self, row: usize, col: usize, val: u8) -> Result<(), ImageError> {
        if row >= self.rows() || col >= self.cols() {
            return Err(ImageError::PixelIndexOutOfBounds(
                col,
                row,
                self.cols(),
                self.rows(),
            ));
        }
        let cols = self.cols();
        self.data[row * cols + col] = val;
        Ok(())
    }

    /// Borrow one row of samples.
    ///
    /// # Panics
    ///
    /// Panics if `row` is out of bounds.
    pub fn row(&self, row: usize) -> &[u8] {
        let cols = self.cols();
        &self.data[row * cols..(row + 1) * cols]
    }

    /// Get the samples as a slice.
    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    /// Get the samples as a mutable slice.
    pub fn as_slice_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }
}

/// Split interleaved multi-plane samples into one grid per plane.
///
/// Each returned grid carries the original plane count.
///
/// # Arguments
///
/// * `size` - The size of the image in pixels.
/// * `planes` - The number of interleaved planes.
/// * `data` - The samples laid out as `(H, W, planes)`.
pub fn split_planes(
    size: ImageSize,
    planes: usize,
    data: &[u8],
) -> Result<Vec<SampleGrid>, ImageError> {
    if planes == 0 {
        return Err(ImageError::InvalidPlaneCount(planes));
    }

    let num_pixels = size.width * size.height;
    if data.len() != num_pixels * planes {
        return Err(ImageError::InvalidChannelShape(
            data.len(),
            num_pixels * planes,
        ));
    }

    (0..planes)
        .map(|p| {
            let plane = data.iter().skip(p).step_by(planes).copied().collect();
            SampleGrid::new(size, plane)?.with_planes(planes)
        })
        .collect()
}

/// Interleave per-plane grids back into `(H, W, planes)` samples.
///
/// # Errors
///
/// Fails if no grid is given or the grids disagree in size.
pub fn merge_planes(grids: &[SampleGrid]) -> Result<Vec<u8>, ImageError> {
    let Some(first) = grids.first() else {
        return Err(ImageError::InvalidPlaneCount(0));
    };

    let size = first.size();
    if let Some(other) = grids.iter().find(|g| g.size() != size) {
        return Err(ImageError::InvalidImageSize(
            size.width,
            size.height,
            other.width(),
            other.height(),
        ));
    }

    let planes = grids.len();
    let mut data = vec![0u8; size.width * size.height * planes];
    for (p, grid) in grids.iter().enumerate() {
        data.iter_mut()
            .skip(p)
            .step_by(planes)
            .zip(grid.as_slice())
            .for_each(|(dst, &src)| *dst = src);
    }

    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::{merge_planes, split_planes, ImageSize, SampleGrid};
    use crate::ImageError;

    #[test]
    fn grid_smoke() -> Result<(), ImageError> {
        let grid = SampleGrid::new(
            ImageSize {
                width: 2,
                height: 3,
            },
            vec![0, 1, 2, 3, 4, 5],
        )?;
        assert_eq!(grid.cols(), 2);
        assert_eq!(grid.rows(), 3);
        assert_eq!(grid.num_planes(), 1);
        assert_eq!(grid.get(2, 1), Some(5));
        assert_eq!(grid.get(3, 0), None);
        assert_eq!(grid.row(1), &[2, 3]);

        Ok(())
    }

    #[test]
    fn grid_wrong_length() {
        let res = SampleGrid::new([3, 3].into(), vec![0; 8]);
        assert_eq!(res, Err(ImageError::InvalidChannelShape(8, 9)));
    }

    #[test]
    fn grid_set() -> Result<(), ImageError> {
        let mut grid = SampleGrid::from_size_val([2, 2].into(), 7)?;
        grid.set(1, 0, 9)?;
        assert_eq!(grid.as_slice(), &[7, 7, 9, 7]);
        assert!(grid.set(2, 0, 1).is_err());

        Ok(())
    }

    #[test]
    fn grid_zero_planes() -> Result<(), ImageError> {
        let grid = SampleGrid::from_size_val([1, 1].into(), 0)?;
        assert_eq!(grid.with_planes(0), Err(ImageError::InvalidPlaneCount(0)));

        Ok(())
    }

    #[test]
    fn split_and_merge_planes() -> Result<(), ImageError> {
        let size = ImageSize {
            width: 2,
            height: 1,
        };
        let data = [10u8, 20, 30, 11, 21, 31];

        let planes = split_planes(size, 3, &data)?;
        assert_eq!(planes.len(), 3);
        assert_eq!(planes[0].as_slice(), &[10, 11]);
        assert_eq!(planes[2].as_slice(), &[30, 31]);
        assert!(planes.iter().all(|p| p.num_planes() == 3));

        assert_eq!(merge_planes(&planes)?, data);

        Ok(())
    }

    #[test]
    fn merge_planes_size_mismatch() -> Result<(), ImageError> {
        let a = SampleGrid::from_size_val([2, 2].into(), 0)?;
        let b = SampleGrid::from_size_val([3, 2].into(), 0)?;
        assert_eq!(
            merge_planes(&[a, b]),
            Err(ImageError::InvalidImageSize(2, 2, 3, 2))
        );
        assert_eq!(merge_planes(&[]), Err(ImageError::InvalidPlaneCount(0)));

        Ok(())
    }
}
