//! Collaborator traits of action terms.
mod action_term;
mod articulation;
mod context;
pub use action_term::{ActionTerm, EnvIds};
pub use articulation::{Articulation, Scene};
pub use context::EnvContext;
