//! Affine transform of raw joint actions.
use border_core::error::BorderError;
use ndarray::{Array2, ArrayView2};

/// Maps raw actions to joint position targets, `raw * scale + offset`.
#[derive(Debug, Clone)]
pub struct JointPositionTransform {
    scale: f32,

    // N × A
    offset: Array2<f32>,
}

impl JointPositionTransform {
    /// Constructs a transform with a per-environment, per-joint offset.
    pub fn new(scale: f32, offset: Array2<f32>) -> Self {
        Self { scale, offset }
    }

    /// Constructs a transform with the same offset for every element.
    pub fn uniform(num_envs: usize, action_dim: usize, scale: f32, offset: f32) -> Self {
        Self::new(scale, Array2::from_elem((num_envs, action_dim), offset))
    }

    /// The scale.
    pub fn scale(&self) -> f32 {
        self.scale
    }

    /// The offset, `N × A`.
    pub fn offset(&self) -> ArrayView2<'_, f32> {
        self.offset.view()
    }

    /// Applies the transform to `raw`, which must have the shape of the offset.
    pub fn apply(&self, raw: ArrayView2<'_, f32>) -> Result<Array2<f32>, BorderError> {
        if raw.shape() != self.offset.shape() {
            return Err(BorderError::shape(self.offset.shape(), raw.shape()));
        }
        Ok(&raw * self.scale + &self.offset)
    }
}
