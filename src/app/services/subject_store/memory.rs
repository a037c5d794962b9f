//! In-memory subject store
//!
//! All collections are ordered maps keyed by the model keys, so listings
//! and exports come out in a deterministic order and the latest timed
//! value for a (subject, attribute) pair is the last entry of a range.

use super::SubjectStore;
use crate::app::models::{
    Attribute, AttributeKey, FixedValue, Provider, Subject, SubjectKey, SubjectType,
    SubjectTypeKey, TimedValue,
};
use crate::error::{ImporterError, Result};
use chrono::NaiveDateTime;
use std::collections::BTreeMap;
use tracing::debug;

pub(crate) type TimedValueKey = (SubjectKey, AttributeKey, NaiveDateTime);
pub(crate) type FixedValueKey = (SubjectKey, AttributeKey);

/// Subject store held entirely in memory
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    pub(crate) providers: BTreeMap<String, Provider>,
    pub(crate) subject_types: BTreeMap<SubjectTypeKey, SubjectType>,
    pub(crate) subjects: BTreeMap<SubjectKey, Subject>,
    pub(crate) attributes: BTreeMap<AttributeKey, Attribute>,
    pub(crate) timed_values: BTreeMap<TimedValueKey, f64>,
    pub(crate) fixed_values: BTreeMap<FixedValueKey, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn ensure_subject(&self, key: &SubjectKey) -> Result<()> {
        if self.subjects.contains_key(key) {
            Ok(())
        } else {
            Err(ImporterError::DanglingReference {
                kind: "subject",
                key: key.to_string(),
            })
        }
    }

    fn ensure_attribute(&self, key: &AttributeKey) -> Result<()> {
        if self.attributes.contains_key(key) {
            Ok(())
        } else {
            Err(ImporterError::DanglingReference {
                kind: "attribute",
                key: key.to_string(),
            })
        }
    }
}

impl SubjectStore for MemoryStore {
    fn upsert_provider(&mut self, provider: &Provider) -> Result<()> {
        self.providers
            .entry(provider.label.clone())
            .or_insert_with(|| provider.clone());
        Ok(())
    }

    fn upsert_subject_type(&mut self, subject_type: &SubjectType) -> Result<()> {
        self.subject_types
            .entry(subject_type.key())
            .or_insert_with(|| subject_type.clone());
        Ok(())
    }

    fn upsert_subject(&mut self, subject: Subject) -> Result<()> {
        if !self.subject_types.contains_key(&subject.subject_type) {
            return Err(ImporterError::DanglingReference {
                kind: "subject type",
                key: subject.subject_type.to_string(),
            });
        }

        let key = subject.key();
        match self.subjects.get_mut(&key) {
            Some(existing) => {
                if subject.geometry.is_some() && existing.geometry != subject.geometry {
                    debug!("Attaching geometry to existing subject {}", key);
                    existing.geometry = subject.geometry;
                }
            }
            None => {
                self.subjects.insert(key, subject);
            }
        }
        Ok(())
    }

    fn upsert_attribute(&mut self, attribute: &Attribute) -> Result<()> {
        self.attributes
            .entry(attribute.key())
            .or_insert_with(|| attribute.clone());
        Ok(())
    }

    fn append_timed_value(&mut self, value: TimedValue) -> Result<()> {
        self.ensure_subject(&value.subject)?;
        self.ensure_attribute(&value.attribute)?;

        self.timed_values
            .insert((value.subject, value.attribute, value.timestamp), value.value);
        Ok(())
    }

    fn set_fixed_value(&mut self, value: FixedValue) -> Result<()> {
        self.ensure_subject(&value.subject)?;
        self.ensure_attribute(&value.attribute)?;

        self.fixed_values
            .insert((value.subject, value.attribute), value.value);
        Ok(())
    }

    fn subject_type(&self, key: &SubjectTypeKey) -> Option<&SubjectType> {
        self.subject_types.get(key)
    }

    fn subject(&self, key: &SubjectKey) -> Option<&Subject> {
        self.subjects.get(key)
    }

    fn attribute(&self, key: &AttributeKey) -> Option<&Attribute> {
        self.attributes.get(key)
    }
}
