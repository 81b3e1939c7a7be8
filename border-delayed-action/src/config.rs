//! Configuration of [`DelayedJointPositionAction`](crate::DelayedJointPositionAction).
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

/// Constant delay term, sampled once per environment when the action term is built.
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub enum ConstantDelayConfig {
    /// Every environment is delayed by `steps` control steps.
    Fixed {
        /// Delay in control steps.
        steps: i64,
    },

    /// Each environment is delayed by a value drawn uniformly from `low..=high`.
    Uniform {
        /// Lower bound, inclusive.
        low: i64,

        /// Upper bound, inclusive.
        high: i64,
    },
}

impl Default for ConstantDelayConfig {
    /// A random one-step delay: each environment is delayed by 0 or 1 step.
    fn default() -> Self {
        Self::Uniform { low: 0, high: 1 }
    }
}

/// Variable delay term, sampled per environment at every control step.
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub enum VariableDelayConfig {
    /// A delay drawn uniformly from `low..=high`.
    Uniform {
        /// Lower bound, inclusive.
        low: i64,

        /// Upper bound, inclusive.
        high: i64,
    },
}

/// Configuration of [`DelayedJointPositionAction`](crate::DelayedJointPositionAction).
///
/// Processed actions are `raw * scale + offset`. The offset is either the scalar
/// `offset` or, if `use_default_offset` is `true`, the default joint positions of the
/// articulation. The action applied to the joints at a step is the processed action of
/// `delay` steps before, where `delay = clamp(const + variable, 0, max_delay)`.
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct DelayedJointPositionActionConfig {
    /// Name of the articulation in the scene.
    pub asset_name: String,

    /// Names of the controlled joints. `".*"` selects every joint.
    pub joint_names: Vec<String>,

    /// Scale applied to raw actions.
    pub scale: f32,

    /// Offset added to scaled actions, ignored if `use_default_offset` is `true`.
    pub offset: f32,

    /// Use the default joint positions as the offset.
    pub use_default_offset: bool,

    /// The maximum number of control steps an action may be delayed.
    pub max_delay: usize,

    /// Constant delay term.
    pub const_delay: ConstantDelayConfig,

    /// Variable delay term, none by default.
    pub variable_delay: Option<VariableDelayConfig>,

    /// Seed of the random number generator of delay sampling.
    pub seed: u64,
}

impl Default for DelayedJointPositionActionConfig {
    fn default() -> Self {
        Self {
            asset_name: "robot".to_string(),
            joint_names: vec![".*".to_string()],
            scale: 1.0,
            offset: 0.0,
            use_default_offset: false,
            max_delay: 1,
            const_delay: ConstantDelayConfig::default(),
            variable_delay: None,
            seed: 42,
        }
    }
}

impl DelayedJointPositionActionConfig {
    /// Sets the name of the articulation.
    pub fn asset_name(mut self, v: impl Into<String>) -> Self {
        self.asset_name = v.into();
        self
    }

    /// Sets the names of the controlled joints.
    pub fn joint_names(mut self, v: Vec<String>) -> Self {
        self.joint_names = v;
        self
    }

    /// Sets the scale of raw actions.
    pub fn scale(mut self, v: f32) -> Self {
        self.scale = v;
        self
    }

    /// Sets the scalar offset.
    pub fn offset(mut self, v: f32) -> Self {
        self.offset = v;
        self
    }

    /// Uses the default joint positions as the offset.
    pub fn use_default_offset(mut self, v: bool) -> Self {
        self.use_default_offset = v;
        self
    }

    /// Sets the maximum delay.
    pub fn max_delay(mut self, v: usize) -> Self {
        self.max_delay = v;
        self
    }

    /// Sets the constant delay term.
    pub fn const_delay(mut self, v: ConstantDelayConfig) -> Self {
        self.const_delay = v;
        self
    }

    /// Sets the variable delay term.
    pub fn variable_delay(mut self, v: Option<VariableDelayConfig>) -> Self {
        self.variable_delay = v;
        self
    }

    /// Sets the random seed.
    pub fn seed(mut self, v: u64) -> Self {
        self.seed = v;
        self
    }

    /// Constructs [`DelayedJointPositionActionConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        Ok(b)
    }

    /// Saves [`DelayedJointPositionActionConfig`] to YAML file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        Ok(())
    }
}
