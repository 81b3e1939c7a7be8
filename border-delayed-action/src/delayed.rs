//! Joint position action with actuation delay.
use crate::{
    ConstantDelay, DelayBuffer, DelayContext, DelayPolicy, DelayedJointPositionActionConfig,
    JointPositionTransform, VariableDelay,
};
use anyhow::Result;
use border_core::{
    error::BorderError,
    record::{Record, RecordValue},
    ActionTerm, Articulation, EnvContext, EnvIds, Scene,
};
use log::{debug, info, trace};
use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};

/// Sends joint position targets to an articulation with a delay of some control steps.
///
/// Every call of [`ActionTerm::process_actions`] scales and offsets the raw actions,
/// pushes them into a [`DelayBuffer`] and picks, for each environment, the processed
/// action of `delay[e]` steps before, with `delay` given by a [`DelayPolicy`].
/// [`ActionTerm::apply_actions`] sends that delayed action, so calling it several times
/// within a control step, once per physics sub-step, always sends the same targets.
///
/// ```
/// use border_core::{ActionTerm, Articulation, EnvContext};
/// use border_delayed_action::{
///     ConstantDelayConfig, DelayedJointPositionAction, DelayedJointPositionActionConfig,
/// };
/// use ndarray::{Array2, ArrayView2};
/// use std::collections::HashMap;
///
/// struct Robot {
///     names: Vec<String>,
///     default_pos: Array2<f32>,
///     target: Array2<f32>,
/// }
///
/// impl Articulation for Robot {
///     fn joint_names(&self) -> &[String] {
///         &self.names
///     }
///     fn default_joint_pos(&self) -> ArrayView2<'_, f32> {
///         self.default_pos.view()
///     }
///     fn set_joint_position_target(&mut self, target: ArrayView2<'_, f32>, _: &[usize]) {
///         self.target.assign(&target);
///     }
/// }
///
/// let robot = Robot {
///     names: vec!["knee".to_string()],
///     default_pos: Array2::zeros((2, 1)),
///     target: Array2::zeros((2, 1)),
/// };
/// let mut scene = HashMap::from([("robot".to_string(), robot)]);
/// let config = DelayedJointPositionActionConfig::default()
///     .const_delay(ConstantDelayConfig::Fixed { steps: 1 });
/// let mut term = DelayedJointPositionAction::build(&config, &EnvContext::new(2), &scene).unwrap();
///
/// for t in 1..=2 {
///     let raw = Array2::from_elem((2, 1), t as f32);
///     term.process_actions(raw.view()).unwrap();
///     term.apply_actions(&mut scene).unwrap();
/// }
/// // Targets lag one step behind
/// assert_eq!(scene["robot"].target, Array2::from_elem((2, 1), 1.0f32));
/// ```
pub struct DelayedJointPositionAction {
    asset_name: String,
    joint_ids: Vec<usize>,
    joint_names: Vec<String>,
    transform: JointPositionTransform,
    raw_actions: Array2<f32>,
    processed_actions: Array2<f32>,
    delayed_actions: Array2<f32>,
    delay: Array1<usize>,
    buffer: DelayBuffer,
    policy: DelayPolicy,
    step: usize,
}

impl DelayedJointPositionAction {
    /// Builds the action term for the articulation `config.asset_name` of `scene`.
    pub fn build<S: Scene>(
        config: &DelayedJointPositionActionConfig,
        context: &EnvContext,
        scene: &S,
    ) -> Result<Self> {
        let num_envs = context.num_envs;
        let asset = scene
            .articulation(&config.asset_name)
            .ok_or_else(|| BorderError::AssetNotFound(config.asset_name.clone()))?;
        let (joint_ids, joint_names) = asset.find_joints(&config.joint_names)?;
        let action_dim = joint_ids.len();

        let transform = if config.use_default_offset {
            let default_pos = asset.default_joint_pos();
            let expected = [num_envs, asset.num_joints()];
            if default_pos.shape() != &expected[..] {
                return Err(BorderError::shape(&expected, default_pos.shape()).into());
            }
            let offset = default_pos.select(Axis(1), &joint_ids);
            JointPositionTransform::new(config.scale, offset)
        } else {
            JointPositionTransform::uniform(num_envs, action_dim, config.scale, config.offset)
        };

        let buffer = DelayBuffer::new(num_envs, action_dim, config.max_delay)?;
        let mut policy = DelayPolicy::new(
            num_envs,
            config.max_delay,
            config.const_delay.clone().into(),
            config.seed,
        )?;
        policy.set_variable_delay(config.variable_delay.clone().map(VariableDelay::from))?;

        info!(
            "Delayed joint position action on {:?}: {} joints, max_delay = {}, constant delay = {:?}",
            config.asset_name,
            action_dim,
            config.max_delay,
            policy.constant_term()
        );

        Ok(Self {
            asset_name: config.asset_name.clone(),
            joint_ids,
            joint_names,
            transform,
            raw_actions: Array2::zeros((num_envs, action_dim)),
            processed_actions: Array2::zeros((num_envs, action_dim)),
            delayed_actions: Array2::zeros((num_envs, action_dim)),
            delay: Array1::zeros(num_envs),
            buffer,
            policy,
            step: 0,
        })
    }

    /// Replaces the constant delay term, e.g., with a sampler given by the caller.
    pub fn with_const_delay(mut self, constant: ConstantDelay) -> Result<Self> {
        self.policy.set_constant_delay(constant)?;
        info!("Constant delay replaced: {:?}", self.policy.constant_term());
        Ok(self)
    }

    /// Sets the variable delay term, replacing the configured one.
    pub fn with_variable_delay(mut self, variable: VariableDelay) -> Result<Self> {
        self.policy.set_variable_delay(Some(variable))?;
        debug!("Variable delay term set on {:?}", self.asset_name);
        Ok(self)
    }

    /// Name of the articulation.
    pub fn asset_name(&self) -> &str {
        &self.asset_name
    }

    /// Indices of the controlled joints.
    pub fn joint_ids(&self) -> &[usize] {
        &self.joint_ids
    }

    /// Names of the controlled joints.
    pub fn joint_names(&self) -> &[String] {
        &self.joint_names
    }

    /// The constant delay term of each environment, before clamping.
    pub fn constant_delay(&self) -> ArrayView1<'_, i64> {
        self.policy.constant_term()
    }

    /// The delay used in the last control step.
    pub fn delay(&self) -> ArrayView1<'_, usize> {
        self.delay.view()
    }

    /// The targets sent by [`ActionTerm::apply_actions`].
    pub fn delayed_actions(&self) -> ArrayView2<'_, f32> {
        self.delayed_actions.view()
    }

    /// The history of processed actions.
    pub fn buffer(&self) -> &DelayBuffer {
        &self.buffer
    }

    /// The number of action components, one per controlled joint.
    pub fn action_dim(&self) -> usize {
        self.joint_ids.len()
    }

    /// Processes the raw actions of the current control step.
    ///
    /// Returns the delay of each environment (`delay`) and its mean (`delay_mean`).
    pub fn process_actions(&mut self, actions: ArrayView2<'_, f32>) -> Result<Record, BorderError> {
        // Fails on shape mismatch before any state is modified
        let processed = self.transform.apply(actions)?;
        let context = DelayContext {
            num_envs: self.buffer.num_envs(),
            step: self.step,
        };
        let delay = self.policy.effective_delay(&context)?;

        self.raw_actions.assign(&actions);
        self.processed_actions = processed;
        self.buffer.push(self.processed_actions.view())?;
        self.delayed_actions = self.buffer.fetch(delay.view())?;
        self.delay = delay;
        self.step += 1;
        trace!("step = {}, delay = {:?}", self.step, self.delay);

        Ok(self.record())
    }

    /// Clears the action history and the raw actions of the given environments.
    ///
    /// The constant delay term is kept.
    pub fn reset(&mut self, env_ids: EnvIds<'_>) {
        self.buffer.reset(env_ids);
        match env_ids {
            None => self.raw_actions.fill(0.0),
            Some(ids) => {
                let n = self.raw_actions.nrows();
                for &i in ids.iter().filter(|&&i| i < n) {
                    self.raw_actions.row_mut(i).fill(0.0);
                }
            }
        }
    }

    fn record(&self) -> Record {
        let delay = self.delay.iter().map(|&d| d as f32).collect::<Vec<_>>();
        let delay_mean = delay.iter().sum::<f32>() / delay.len() as f32;
        Record::from_slice(&[
            ("delay", RecordValue::Array1(delay)),
            ("delay_mean", RecordValue::Scalar(delay_mean)),
        ])
    }
}

impl<S: Scene> ActionTerm<S> for DelayedJointPositionAction {
    fn action_dim(&self) -> usize {
        DelayedJointPositionAction::action_dim(self)
    }

    fn raw_actions(&self) -> ArrayView2<'_, f32> {
        self.raw_actions.view()
    }

    fn processed_actions(&self) -> ArrayView2<'_, f32> {
        self.processed_actions.view()
    }

    fn process_actions(&mut self, actions: ArrayView2<'_, f32>) -> Result<Record, BorderError> {
        DelayedJointPositionAction::process_actions(self, actions)
    }

    fn apply_actions(&self, scene: &mut S) -> Result<(), BorderError> {
        let asset = scene
            .articulation_mut(&self.asset_name)
            .ok_or_else(|| BorderError::AssetNotFound(self.asset_name.clone()))?;
        asset.set_joint_position_target(self.delayed_actions.view(), &self.joint_ids);
        Ok(())
    }

    fn reset(&mut self, env_ids: EnvIds<'_>) {
        DelayedJointPositionAction::reset(self, env_ids)
    }
}
