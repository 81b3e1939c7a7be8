//! Action term.
use super::Scene;
use crate::{error::BorderError, record::Record};
use ndarray::ArrayView2;

/// Indices of environments, `None` meaning all of them.
pub type EnvIds<'a> = Option<&'a [usize]>;

/// Transforms a slice of the batched action and sends it to an asset of the scene.
///
/// The environment loop calls [`ActionTerm::process_actions`] once per control step and
/// [`ActionTerm::apply_actions`] once per physics sub-step. The command sent by
/// `apply_actions` must not change between two calls of `process_actions`.
pub trait ActionTerm<S: Scene> {
    /// The number of action components consumed by this term.
    fn action_dim(&self) -> usize;

    /// The actions received in the last call of [`ActionTerm::process_actions`].
    fn raw_actions(&self) -> ArrayView2<'_, f32>;

    /// The actions after the term's transformation, before they are sent to the asset.
    fn processed_actions(&self) -> ArrayView2<'_, f32>;

    /// Consumes the `N × action_dim` actions of the current control step.
    fn process_actions(&mut self, actions: ArrayView2<'_, f32>) -> Result<Record, BorderError>;

    /// Sends the command computed in the last call of [`ActionTerm::process_actions`].
    fn apply_actions(&self, scene: &mut S) -> Result<(), BorderError>;

    /// Resets the internal state of the given environments.
    fn reset(&mut self, env_ids: EnvIds<'_>);
}
