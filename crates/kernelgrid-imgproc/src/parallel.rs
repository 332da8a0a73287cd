use rayon::prelude::*;
use thiserror::Error;

/// Reasons a cell fill could not be scheduled.
#[derive(Error, Debug, PartialEq)]
pub enum ParallelError {
    /// Rayon could not create the dedicated pool of [`ExecutionStrategy::Fixed`].
    #[error("failed to build thread pool: {0}")]
    BuildError(String),

    /// [`ExecutionStrategy::Fixed`] was given zero threads.
    #[error("thread count must be > 0, got {0}")]
    InvalidThreadCount(usize),

    /// [`ExecutionStrategy::AutoRows`] was given a zero row length.
    #[error("row stride must be > 0 for AutoRows strategy")]
    InvalidRowStride(usize),
}

/// How the cells of an output grid are spread over threads.
///
/// Every strategy writes the same values; only scheduling differs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExecutionStrategy {
    /// One rayon task per cell on the global pool.
    #[default]
    ParallelElements,

    /// One rayon task per chunk of `stride` consecutive cells on the global pool.
    ///
    /// Passing the grid width makes each task a full output row, so a task
    /// reads overlapping neighborhoods of the same few source rows.
    AutoRows(usize),

    /// Cells in row-major order on the calling thread.
    Serial,

    /// One rayon task per cell on a pool of `n` threads owned by the call.
    ///
    /// The pool is built and torn down on every fill.
    Fixed(usize),
}

/// Fill every cell of a row-major buffer with `f(row, col)`.
///
/// Cells are computed independently, so the result does not depend on the
/// strategy. The first error returned by `f` aborts the fill.
///
/// # Arguments
///
/// * `dst` - The destination buffer with `rows * cols` cells.
/// * `cols` - The number of columns of the buffer.
/// * `strategy` - The execution strategy.
/// * `f` - The function producing the value of one cell.
pub fn par_iter_cells<T, E, F>(
    dst: &mut [T],
    cols: usize,
    strategy: ExecutionStrategy,
    f: F,
) -> Result<(), E>
where
    T: Send,
    E: From<ParallelError> + Send,
    F: Fn(usize, usize) -> Result<T, E> + Send + Sync,
{
    if dst.is_empty() || cols == 0 {
        return Ok(());
    }

    let cell = |idx: usize, out: &mut T| -> Result<(), E> {
        *out = f(idx / cols, idx % cols)?;
        Ok(())
    };

    match strategy {
        ExecutionStrategy::Serial => {
            for (idx, out) in dst.iter_mut().enumerate() {
                cell(idx, out)?;
            }
        }
        ExecutionStrategy::ParallelElements => {
            dst.par_iter_mut()
                .enumerate()
                .try_for_each(|(idx, out)| cell(idx, out))?;
        }
        ExecutionStrategy::AutoRows(stride) => {
            if stride == 0 {
                return Err(ParallelError::InvalidRowStride(stride).into());
            }
            dst.par_chunks_mut(stride)
                .enumerate()
                .try_for_each(|(chunk_idx, chunk)| {
                    chunk
                        .iter_mut()
                        .enumerate()
                        .try_for_each(|(i, out)| cell(chunk_idx * stride + i, out))
                })?;
        }
        ExecutionStrategy::Fixed(n) => {
            if n == 0 {
                return Err(ParallelError::InvalidThreadCount(n).into());
            }
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(n)
                .build()
                .map_err(|e| ParallelError::BuildError(e.to_string()))?;

            pool.install(|| {
                dst.par_iter_mut()
                    .enumerate()
                    .try_for_each(|(idx, out)| cell(idx, out))
            })?;
        }
    }

    Ok(())
}
