//! Errors in the library.
use thiserror::Error;

/// Errors in the library.
///
/// All variants are contract violations detected at a call boundary. They are surfaced
/// immediately and nothing is partially applied before they are returned.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BorderError {
    /// An array does not have the shape configured for the receiver.
    #[error("Shape error: expected {expected:?}, got {actual:?}")]
    ShapeError {
        /// The shape the receiver was configured with.
        expected: Vec<usize>,

        /// The shape that was passed in.
        actual: Vec<usize>,
    },

    /// Malformed axis or index arguments of an indexing primitive.
    #[error("Dimension error: {0}")]
    DimensionError(String),

    /// The scene has no articulation with the given name.
    #[error("Asset not found: {0}")]
    AssetNotFound(String),

    /// The articulation has no joint with the given name.
    #[error("Joint not found: {0}")]
    JointNotFound(String),

    /// Record key error.
    #[error("Record key error: {0}")]
    RecordKeyError(String),

    /// Record value type error.
    #[error("Record value type error: {0}")]
    RecordValueTypeError(String),
}

impl BorderError {
    /// Shorthand for [`BorderError::ShapeError`].
    pub fn shape(expected: &[usize], actual: &[usize]) -> Self {
        Self::ShapeError {
            expected: expected.to_vec(),
            actual: actual.to_vec(),
        }
    }
}
