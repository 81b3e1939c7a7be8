//! History of processed actions.
use crate::pick_from_dim;
use border_core::{error::BorderError, EnvIds};
use ndarray::{s, Array2, Array3, ArrayView1, ArrayView2, ArrayView3, Axis, Ix2};

/// Sliding window of the last `max_delay + 1` actions of each environment.
///
/// The buffer is `N × (max_delay + 1) × A`. Slot `k` along the depth axis holds the
/// action pushed `k` steps ago, so slot `0` is always the most recent one.
#[derive(Debug, Clone)]
pub struct DelayBuffer {
    buffer: Array3<f32>,
}

impl DelayBuffer {
    /// Allocates a zero-filled buffer.
    ///
    /// `num_envs` and `action_dim` must be positive and `max_delay + 1` must not overflow.
    pub fn new(num_envs: usize, action_dim: usize, max_delay: usize) -> Result<Self, BorderError> {
        if num_envs == 0 || action_dim == 0 {
            return Err(BorderError::DimensionError(format!(
                "num_envs and action_dim must be positive, got ({}, {})",
                num_envs, action_dim
            )));
        }

        let depth = max_delay.checked_add(1).ok_or_else(|| {
            BorderError::DimensionError(format!("max_delay too large: {}", max_delay))
        })?;

        Ok(Self {
            buffer: Array3::zeros((num_envs, depth, action_dim)),
        })
    }

    /// The number of environments.
    pub fn num_envs(&self) -> usize {
        self.buffer.shape()[0]
    }

    /// The maximum delay, i.e., the deepest slot of the history.
    pub fn max_delay(&self) -> usize {
        self.buffer.shape()[1] - 1
    }

    /// The dimension of actions.
    pub fn action_dim(&self) -> usize {
        self.buffer.shape()[2]
    }

    /// The whole history, `N × (max_delay + 1) × A`.
    pub fn history(&self) -> ArrayView3<'_, f32> {
        self.buffer.view()
    }

    /// Shifts the history one slot deeper and writes `batch` into slot `0`.
    ///
    /// The deepest slot is evicted. Nothing is modified when `batch` is not `N × A`.
    pub fn push(&mut self, batch: ArrayView2<'_, f32>) -> Result<(), BorderError> {
        let expected = [self.num_envs(), self.action_dim()];
        if batch.shape() != &expected[..] {
            return Err(BorderError::shape(&expected, batch.shape()));
        }

        // Shift slot(j) <- slot(j - 1) for j = max_delay, ..., 1
        for j in (1..=self.max_delay()).rev() {
            let (mut dst, src) = self
                .buffer
                .multi_slice_mut((s![.., j, ..], s![.., j - 1, ..]));
            dst.assign(&src);
        }
        self.buffer.slice_mut(s![.., 0, ..]).assign(&batch);

        Ok(())
    }

    /// Returns, for each environment `e`, the action pushed `delay[e]` steps ago.
    ///
    /// # Errors
    ///
    /// [`BorderError::ShapeError`] if `delay.len() != N`, [`BorderError::DimensionError`]
    /// if a delay exceeds [`DelayBuffer::max_delay`]. Clamping is up to the caller.
    pub fn fetch(&self, delay: ArrayView1<'_, usize>) -> Result<Array2<f32>, BorderError> {
        if delay.len() != self.num_envs() {
            return Err(BorderError::shape(&[self.num_envs()], delay.shape()));
        }

        pick_from_dim(&self.buffer, 0, 1, &delay)?
            .into_dimensionality::<Ix2>()
            .map_err(|e| BorderError::DimensionError(e.to_string()))
    }

    /// Clears the history of the given environments.
    ///
    /// Environment indices out of range are ignored.
    pub fn reset(&mut self, env_ids: EnvIds<'_>) {
        match env_ids {
            None => self.buffer.fill(0.0),
            Some(ids) => {
                let n = self.num_envs();
                for &i in ids.iter().filter(|&&i| i < n) {
                    self.buffer.index_axis_mut(Axis(0), i).fill(0.0);
                }
            }
        }
    }
}
