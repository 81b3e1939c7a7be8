//! Environment context.
use serde::{Deserialize, Serialize};

/// Describes the batch of environments an action term is built for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvContext {
    /// The number of environments simulated in parallel.
    pub num_envs: usize,
}

impl EnvContext {
    /// Constructs a context for `num_envs` environments.
    pub fn new(num_envs: usize) -> Self {
        Self { num_envs }
    }
}
