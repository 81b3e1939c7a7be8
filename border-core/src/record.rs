//! Per-step diagnostics of action terms.
//!
//! Action terms return a [`Record`] every control step, in the same way as observation
//! and action filters of environments do. Callers may merge records of several terms
//! and forward them to whatever logging backend they use.
//!
//! ```rust
//! use border_core::record::{Record, RecordValue};
//!
//! let mut record = Record::empty();
//! record.insert("delay_mean", RecordValue::Scalar(0.5));
//! record.insert("delay", RecordValue::Array1(vec![0.0, 1.0]));
//! assert_eq!(record.get_scalar("delay_mean").unwrap(), 0.5);
//! ```
mod base;
pub use base::{Record, RecordValue};
