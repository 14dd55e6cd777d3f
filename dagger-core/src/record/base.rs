//! Base implementation of records for logging.
use crate::error::RecordError;
use std::collections::HashMap;

/// Values that can be stored in a [`Record`].
#[derive(Debug, Clone, PartialEq)]
pub enum RecordValue {
    /// A single floating-point value, typically used for metrics like loss or return.
    Scalar(f32),
}

/// A container of named values logged at an iteration.
///
/// # Examples
///
/// ```rust
/// use dagger_core::record::{Record, RecordValue};
///
/// let mut record = Record::from_scalar("loss", 0.5);
/// record.insert("accuracy", RecordValue::Scalar(0.95));
///
/// let loss = record.get_scalar("loss").unwrap();
/// assert_eq!(loss, 0.5);
/// ```
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

    /// Inserts a key-value pair into the record.
    pub fn insert(&mut self, k: impl Into<String>, v: RecordValue) {
        self.0.insert(k.into(), v);
    }

    /// Merges another record into this one in place.
    ///
    /// Values of `record` overwrite those with the same key.
    pub fn merge_inplace(&mut self, record: Record) {
        self.0.extend(record.0);
    }

    /// Gets a scalar value from the record.
    pub fn get_scalar(&self, k: &str) -> Result<f32, RecordError> {
        match self.0.get(k) {
            Some(RecordValue::Scalar(v)) => Ok(*v),
            None => Err(RecordError::RecordKeyError(k.to_string())),
        }
    }

    /// Returns the scalar entries sorted by key.
    pub fn scalars(&self) -> Vec<(&str, f32)> {
        let mut scalars = self
            .0
            .iter()
            .map(|(k, RecordValue::Scalar(v))| (k.as_str(), *v))
            .collect::<Vec<_>>();
        scalars.sort_by(|a, b| a.0.cmp(b.0));
        scalars
    }

    /// Returns the number of entries.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Checks if the record is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_inplace_overwrites_existing_keys() {
        let mut a = Record::from_scalar("loss", 1.0);
        a.insert("return", RecordValue::Scalar(5.0));
        a.merge_inplace(Record::from_scalar("loss", 2.0));
        assert_eq!(a.len(), 2);
        assert_eq!(a.get_scalar("loss").unwrap(), 2.0);
        assert_eq!(a.get_scalar("return").unwrap(), 5.0);
    }

    #[test]
    fn test_missing_key_is_an_error() {
        let record = Record::empty();
        assert!(record.is_empty());
        assert!(matches!(
            record.get_scalar("loss"),
            Err(RecordError::RecordKeyError(k)) if k == "loss"
        ));
    }

    #[test]
    fn test_scalars_are_sorted() {
        let mut record = Record::from_scalar("b", 2.0);
        record.insert("a", RecordValue::Scalar(1.0));
        record.insert("c", RecordValue::Scalar(3.0));
        assert_eq!(record.scalars(), vec![("a", 1.0), ("b", 2.0), ("c", 3.0)]);
    }
}
