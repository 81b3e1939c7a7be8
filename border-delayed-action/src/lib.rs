#![warn(missing_docs)]
//! Action terms simulating actuation latency of robots in vectorized environments.
//!
//! A policy trained in simulation sees its command take effect immediately, whereas on
//! hardware the command reaches the actuators one or more control steps later.
//! [`DelayedJointPositionAction`] reproduces this by keeping the recent processed actions
//! of each environment in a [`DelayBuffer`] and sending, at each control step, the action
//! of `delay[e]` steps before, with `delay` given by a [`DelayPolicy`].
//!
//! The per-step protocol is the one of [`ActionManager`]:
//!
//! 1. [`ActionManager::process_action`] once per control step, which transforms the raw
//!    actions, pushes them into the buffer, samples the delays and caches the delayed
//!    actions.
//! 2. [`ActionManager::apply_action`] once per physics sub-step, which sends the cached
//!    actions to the articulation.
//!
//! [`pick_from_dim`] is the batched indexed gather used to read the buffer.
mod buffer;
mod config;
mod delayed;
mod gather;
mod manager;
mod policy;
mod transform;
pub use buffer::DelayBuffer;
pub use config::{ConstantDelayConfig, DelayedJointPositionActionConfig, VariableDelayConfig};
pub use delayed::DelayedJointPositionAction;
pub use gather::{gather, pick_from_dim};
pub use manager::ActionManager;
pub use policy::{ConstantDelay, DelayContext, DelayPolicy, DelaySampler, VariableDelay};
pub use transform::JointPositionTransform;
