//! Read-side queries over a [`MemoryStore`]
//!
//! Lookups by subject type, label pattern and (subject, attribute) pair,
//! plus the counters used in import summaries.

use super::MemoryStore;
use crate::app::models::{
    Attribute, AttributeKey, FixedValue, Provider, Subject, SubjectKey, SubjectType,
    SubjectTypeKey, TimedValue,
};
use crate::error::Result;
use chrono::NaiveDateTime;

impl MemoryStore {
    pub fn provider(&self, label: &str) -> Option<&Provider> {
        self.providers.get(label)
    }

    pub fn subject_types(&self) -> impl Iterator<Item = &SubjectType> {
        self.subject_types.values()
    }

    /// All subjects, ordered by subject type then label
    pub fn subjects(&self) -> impl Iterator<Item = &Subject> {
        self.subjects.values()
    }

    pub fn attributes(&self) -> impl Iterator<Item = &Attribute> {
        self.attributes.values()
    }

    /// Look up an attribute by provider label and attribute label
    pub fn attribute_by_provider_and_label(
        &self,
        provider_label: &str,
        label: &str,
    ) -> Option<&Attribute> {
        self.attributes.get(&AttributeKey {
            provider_label: provider_label.to_string(),
            label: label.to_string(),
        })
    }

    /// Subjects of one subject type, ordered by label
    pub fn subjects_by_type(&self, subject_type: &SubjectTypeKey) -> Vec<&Subject> {
        self.subjects
            .values()
            .filter(|subject| &subject.subject_type == subject_type)
            .collect()
    }

    /// Subjects of one type whose label matches a glob pattern
    ///
    /// # Examples
    /// ```
    /// # use geodata_importer::app::services::subject_store::MemoryStore;
    /// # use geodata_importer::app::models::SubjectTypeKey;
    /// let store = MemoryStore::new();
    /// let key = SubjectTypeKey {
    ///     provider_label: "uk.gov.ons".to_string(),
    ///     label: "lsoa".to_string(),
    /// };
    /// let london = store.subjects_by_type_and_label_pattern(&key, "E0100000*").unwrap();
    /// assert!(london.is_empty());
    /// ```
    pub fn subjects_by_type_and_label_pattern(
        &self,
        subject_type: &SubjectTypeKey,
        pattern: &str,
    ) -> Result<Vec<&Subject>> {
        let pattern = glob::Pattern::new(pattern)?;
        Ok(self
            .subjects_by_type(subject_type)
            .into_iter()
            .filter(|subject| pattern.matches(&subject.label))
            .collect())
    }

    /// All timed values for a (subject, attribute) pair, oldest first
    pub fn timed_values(&self, subject: &SubjectKey, attribute: &AttributeKey) -> Vec<TimedValue> {
        let start = (subject.clone(), attribute.clone(), NaiveDateTime::MIN);
        let end = (subject.clone(), attribute.clone(), NaiveDateTime::MAX);

        self.timed_values
            .range(start..=end)
            .map(|((subject, attribute, timestamp), value)| TimedValue {
                subject: subject.clone(),
                attribute: attribute.clone(),
                timestamp: *timestamp,
                value: *value,
            })
            .collect()
    }

    /// The timed value with the greatest timestamp for a (subject, attribute) pair
    pub fn latest_timed_value(
        &self,
        subject: &SubjectKey,
        attribute: &AttributeKey,
    ) -> Option<TimedValue> {
        let start = (subject.clone(), attribute.clone(), NaiveDateTime::MIN);
        let end = (subject.clone(), attribute.clone(), NaiveDateTime::MAX);

        self.timed_values
            .range(start..=end)
            .next_back()
            .map(|((subject, attribute, timestamp), value)| TimedValue {
                subject: subject.clone(),
                attribute: attribute.clone(),
                timestamp: *timestamp,
                value: *value,
            })
    }

    pub fn fixed_value(&self, subject: &SubjectKey, attribute: &AttributeKey) -> Option<FixedValue> {
        self.fixed_values
            .get(&(subject.clone(), attribute.clone()))
            .map(|value| FixedValue {
                subject: subject.clone(),
                attribute: attribute.clone(),
                value: value.clone(),
            })
    }

    /// Every timed value in key order
    pub fn all_timed_values(&self) -> impl Iterator<Item = TimedValue> + '_ {
        self.timed_values
            .iter()
            .map(|((subject, attribute, timestamp), value)| TimedValue {
                subject: subject.clone(),
                attribute: attribute.clone(),
                timestamp: *timestamp,
                value: *value,
            })
    }

    /// Every fixed value in key order
    pub fn all_fixed_values(&self) -> impl Iterator<Item = FixedValue> + '_ {
        self.fixed_values
            .iter()
            .map(|((subject, attribute), value)| FixedValue {
                subject: subject.clone(),
                attribute: attribute.clone(),
                value: value.clone(),
            })
    }

    pub fn subject_count(&self) -> usize {
        self.subjects.len()
    }

    pub fn attribute_count(&self) -> usize {
        self.attributes.len()
    }

    pub fn timed_value_count(&self) -> usize {
        self.timed_values.len()
    }

    pub fn fixed_value_count(&self) -> usize {
        self.fixed_values.len()
    }
}
