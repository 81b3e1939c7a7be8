#![warn(missing_docs)]
//! Core traits and types shared by action terms of vectorized environments.
//!
//! An environment holds `N` copies of the same robot that are simulated in lockstep.
//! Actions are batched along the first axis, so that a control command for the whole
//! batch is an `N × A` array. Action terms transform such commands and hand them over
//! to an [`Articulation`], which stands for the actuated asset in the physics scene.
pub mod error;
pub mod record;

mod base;
pub use base::{ActionTerm, Articulation, EnvContext, EnvIds, Scene};
