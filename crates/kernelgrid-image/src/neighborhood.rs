use crate::{error::ImageError, grid::SampleGrid};

/// A square window of samples centered on one grid coordinate.
///
/// Neighborhoods are produced fresh for every reduction and own their samples,
/// so they never alias the grid they were taken from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Neighborhood {
    size: usize,
    data: Vec<u8>,
}

impl Neighborhood {
    /// Create a neighborhood from `size * size` row-major samples.
    ///
    /// # Errors
    ///
    /// The size must be odd and the data length must be `size * size`.
    ///
    /// # Examples
    ///
    /// ```
    /// use kernelgrid_image::Neighborhood;
    ///
    /// let n = Neighborhood::new(3, vec![0, 0, 0, 0, 9, 0, 0, 0, 0]).unwrap();
    /// assert_eq!(n.center(), 9);
    /// assert!(!n.is_flat());
    /// ```
    pub fn new(size: usize, data: Vec<u8>) -> Result<Self, ImageError> {
        if size % 2 == 0 {
            return Err(ImageError::InvalidWindowSize(size));
        }
        if data.len() != size * size {
            return Err(ImageError::InvalidChannelShape(data.len(), size * size));
        }
        Ok(Self { size, data })
    }

    /// Create a neighborhood from its rows.
    pub fn from_rows<R: AsRef<[u8]>>(rows: &[R]) -> Result<Self, ImageError> {
        let size = rows.len();
        let mut data = Vec::with_capacity(size * size);
        for row in rows {
            let row = row.as_ref();
            if row.len() != size {
                return Err(ImageError::InvalidChannelShape(row.len(), size));
            }
            data.extend_from_slice(row);
        }
        Self::new(size, data)
    }

    /// Side length of the window.
    pub fn size(&self) -> usize {
        self.size
    }

    /// The sample the window is centered on.
    pub fn center(&self) -> u8 {
        let half = self.size / 2;
        self.data[half * self.size + half]
    }

    /// Get the sample at `(row, col)` inside the window.
    pub fn get(&self, row: usize, col: usize) -> Option<u8> {
        if row >= self.size || col >= self.size {
            return None;
        }
        Some(self.data[row * self.size + col])
    }

    /// Get the samples as a row-major slice.
    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    /// Whether every sample equals the center sample.
    pub fn is_flat(&self) -> bool {
        let center = self.center();
        self.data.iter().all(|&v| v == center)
    }
}

/// Provides the window around a grid coordinate.
///
/// Implementors own the edge policy: what a window reaching past the border
/// of the grid contains is up to them.
pub trait NeighborhoodSource: Send + Sync {
    /// Extract the `size x size` window centered at `(row, col)`.
    ///
    /// # Errors
    ///
    /// Implementors fail when `size` is even or the center lies outside the grid.
    fn extract(
        &self,
        grid: &SampleGrid,
        row: usize,
        col: usize,
        size: usize,
    ) -> Result<Neighborhood, ImageError>;
}

/// A border type for windows that reach past the edge of the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BorderMode {
    /// This border type fills the border with a single, constant value.
    ///
    /// Example: ...d c b a | v v v v...
    Constant(u8),

    /// This border type takes the outermost row or column of samples and repeats it.
    ///
    /// Example: ...d c b a | a a a a...
    #[default]
    Replicate,

    /// This border type reflects the samples at the boundary, starting with the edge sample itself.
    ///
    /// Example: ...d c b a | a b c d...
    Reflect,

    /// This border type reflects the samples at the boundary, starting with the sample 'next' to the edge.
    ///
    /// Example: ...d c b a | b c d e...
    Reflect101,

    /// This border type wraps the content from the opposite side.
    ///
    /// Example: ...d c b a | w x y z...
    Wrap,
}

impl BorderMode {
    #[inline]
    fn reflect(i: isize, len: usize) -> usize {
        if len == 1 {
            return 0;
        }
        let len = len as isize;
        let mut i = i;
        while i < 0 || i >= len {
            if i < 0 {
                i = -i - 1;
            } else {
                i = 2 * len - i - 1;
            }
        }
        i as usize
    }

    #[inline]
    fn reflect101(i: isize, len: usize) -> usize {
        if len == 1 {
            return 0;
        }
        let len = len as isize;
        let mut i = i;
        while i < 0 || i >= len {
            if i < 0 {
                i = -i;
            } else {
                i = 2 * len - i - 2;
            }
        }
        i as usize
    }

    #[inline]
    fn wrap(i: isize, len: usize) -> usize {
        i.rem_euclid(len as isize) as usize
    }

    /// Maps index `i` to a valid index within `[0, len)`.
    ///
    /// Returns `None` for [`BorderMode::Constant`] when `i` is out of range,
    /// meaning the fill value is used instead. `len` must be non-zero.
    #[inline]
    pub fn map_index(&self, i: isize, len: usize) -> Option<usize> {
        if i >= 0 && (i as usize) < len {
            return Some(i as usize);
        }
        match self {
            BorderMode::Constant(_) => None,
            BorderMode::Replicate => Some(i.clamp(0, len as isize - 1) as usize),
            BorderMode::Reflect => Some(Self::reflect(i, len)),
            BorderMode::Reflect101 => Some(Self::reflect101(i, len)),
            BorderMode::Wrap => Some(Self::wrap(i, len)),
        }
    }
}

impl NeighborhoodSource for BorderMode {
    fn extract(
        &self,
        grid: &SampleGrid,
        row: usize,
        col: usize,
        size: usize,
    ) -> Result<Neighborhood, ImageError> {
        if size % 2 == 0 {
            return Err(ImageError::InvalidWindowSize(size));
        }
        if row >= grid.rows() || col >= grid.cols() {
            return Err(ImageError::PixelIndexOutOfBounds(
                col,
                row,
                grid.cols(),
                grid.rows(),
            ));
        }

        let fill = match self {
            BorderMode::Constant(v) => *v,
            _ => 0,
        };
        let half = (size / 2) as isize;
        let samples = grid.as_slice();

        let mut data = Vec::with_capacity(size * size);
        for dy in -half..=half {
            let y = self.map_index(row as isize + dy, grid.rows());
            for dx in -half..=half {
                let x = self.map_index(col as isize + dx, grid.cols());
                let val = match (y, x) {
                    (Some(y), Some(x)) => samples[y * grid.cols() + x],
                    _ => fill,
                };
                data.push(val);
            }
        }

        Neighborhood::new(size, data)
    }
}
