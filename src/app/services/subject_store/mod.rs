//! Persistence sink for subjects, attributes and values
//!
//! Importers write through the [`SubjectStore`] trait. Writes are upserts:
//! a subject or attribute is created once per key and later writes for the
//! same key are absorbed, so re-running an importer against the same data
//! leaves the store unchanged. Values must reference a subject and an
//! attribute that already exist.
//!
//! [`MemoryStore`] is the bundled implementation; its read-side queries
//! live in [`query`].

use crate::app::models::{
    Attribute, AttributeKey, FixedValue, Provider, Subject, SubjectKey, SubjectType,
    SubjectTypeKey, TimedValue,
};
use crate::error::Result;
use std::collections::HashSet;

pub mod memory;
pub mod query;

#[cfg(test)]
pub mod tests;

pub use memory::MemoryStore;

/// Write and lookup operations importers need from a store
pub trait SubjectStore {
    fn upsert_provider(&mut self, provider: &Provider) -> Result<()>;

    fn upsert_subject_type(&mut self, subject_type: &SubjectType) -> Result<()>;

    /// Create the subject if its key is new; otherwise only attach geometry
    fn upsert_subject(&mut self, subject: Subject) -> Result<()>;

    fn upsert_attribute(&mut self, attribute: &Attribute) -> Result<()>;

    /// Insert a timed value, replacing any value with the same
    /// (subject, attribute, timestamp) key
    fn append_timed_value(&mut self, value: TimedValue) -> Result<()>;

    /// Insert or replace the fixed value for (subject, attribute)
    fn set_fixed_value(&mut self, value: FixedValue) -> Result<()>;

    fn subject_type(&self, key: &SubjectTypeKey) -> Option<&SubjectType>;

    fn subject(&self, key: &SubjectKey) -> Option<&Subject>;

    fn attribute(&self, key: &AttributeKey) -> Option<&Attribute>;

    /// Flush a buffer of subjects, returning how many distinct subjects it held
    fn upsert_subjects(&mut self, subjects: Vec<Subject>) -> Result<usize> {
        let mut keys = HashSet::with_capacity(subjects.len());
        for subject in subjects {
            keys.insert(subject.key());
            self.upsert_subject(subject)?;
        }
        Ok(keys.len())
    }

    fn append_timed_values(&mut self, values: Vec<TimedValue>) -> Result<usize> {
        let count = values.len();
        for value in values {
            self.append_timed_value(value)?;
        }
        Ok(count)
    }

    fn set_fixed_values(&mut self, values: Vec<FixedValue>) -> Result<usize> {
        let count = values.len();
        for value in values {
            self.set_fixed_value(value)?;
        }
        Ok(count)
    }
}
