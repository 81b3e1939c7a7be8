//! Key-value records.
use crate::error::BorderError;
use std::collections::HashMap;

/// Represents possible types of values that can be stored in a [`Record`].
#[derive(Debug, Clone, PartialEq)]
pub enum RecordValue {
    /// A single floating-point value.
    Scalar(f32),

    /// A 1-dimensional array, e.g., a value per environment.
    Array1(Vec<f32>),
}

/// A container for storing key-value pairs of various data types.
#[derive(Debug, Clone, Default)]
pub struct Record(HashMap<String, RecordValue>);

impl Record {
    /// Creates an empty record.
    pub fn empty() -> Self {
        Self(HashMap::new())
    }

    /// Creates a record containing a single scalar value.
    pub fn from_scalar(name: impl Into<String>, value: f32) -> Self {
        Self(HashMap::from([(name.into(), RecordValue::Scalar(value))]))
    }

    /// Creates a record from a slice of key-value pairs.
    pub fn from_slice<K: Into<String> + Clone>(s: &[(K, RecordValue)]) -> Self {
        Self(
            s.iter()
                .map(|(k, v)| (k.clone().into(), v.clone()))
                .collect(),
        )
    }

    /// Inserts a key-value pair into the record.
    pub fn insert(&mut self, k: impl Into<String>, v: RecordValue) {
        self.0.insert(k.into(), v);
    }

    /// Merges two records, consuming both.
    ///
    /// If both records contain the same key, the value of `record` is kept.
    pub fn merge(self, record: Record) -> Self {
        Record(self.0.into_iter().chain(record.0).collect())
    }

    /// Merges another record into this one in place.
    pub fn merge_inplace(&mut self, record: Record) {
        self.0.extend(record.0);
    }

    /// Returns a copy of the record with every key prefixed by `prefix` and `/`.
    ///
    /// Used to keep the records of several action terms apart when they are merged.
    pub fn with_prefix(self, prefix: &str) -> Self {
        Record(
            self.0
                .into_iter()
                .map(|(k, v)| (format!("{}/{}", prefix, k), v))
                .collect(),
        )
    }

    /// Gets a scalar value from the record.
    pub fn get_scalar(&self, k: &str) -> Result<f32, BorderError> {
        match self.0.get(k) {
            Some(RecordValue::Scalar(v)) => Ok(*v),
            Some(_) => Err(BorderError::RecordValueTypeError("Scalar".to_string())),
            None => Err(BorderError::RecordKeyError(k.to_string())),
        }
    }

    /// Gets a 1-dimensional array from the record.
    pub fn get_array1(&self, k: &str) -> Result<Vec<f32>, BorderError> {
        match self.0.get(k) {
            Some(RecordValue::Array1(v)) => Ok(v.clone()),
            Some(_) => Err(BorderError::RecordValueTypeError("Array1".to_string())),
            None => Err(BorderError::RecordKeyError(k.to_string())),
        }
    }

    /// Returns the number of key-value pairs in the record.
    pub fn len(&self) -> usize {
        self.0.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_typed_access() {
        let record = Record::from_slice(&[
            ("delay_mean", RecordValue::Scalar(0.5)),
            ("delay", RecordValue::Array1(vec![0.0, 1.0])),
        ]);

        assert_eq!(record.get_scalar("delay_mean"), Ok(0.5));
        assert_eq!(record.get_array1("delay"), Ok(vec![0.0, 1.0]));
        assert_eq!(
            record.get_scalar("delay"),
            Err(BorderError::RecordValueTypeError("Scalar".to_string()))
        );
        assert_eq!(
            record.get_array1("missing"),
            Err(BorderError::RecordKeyError("missing".to_string()))
        );
    }

    #[test]
    fn test_merge_with_prefix() {
        let a = Record::from_scalar("delay_mean", 1.0).with_prefix("joint_pos");
        let b = Record::from_scalar("delay_mean", 0.0).with_prefix("gripper");
        let merged = a.merge(b);

        assert_eq!(merged.len(), 2);
        assert_eq!(merged.get_scalar("joint_pos/delay_mean"), Ok(1.0));
        assert_eq!(merged.get_scalar("gripper/delay_mean"), Ok(0.0));
    }
}
