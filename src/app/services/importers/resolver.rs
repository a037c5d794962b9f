//! Schema declaration and subject lookup
//!
//! Importers declare a datasource's provider, subject types and
//! attributes before any value is written, then resolve source codes
//! against subjects that already exist in the store. Resolution never
//! creates a subject.

use crate::app::models::{Datasource, Subject, SubjectKey, SubjectTypeKey};
use crate::app::services::subject_store::SubjectStore;
use crate::error::{ImporterError, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// What to do with a row whose subject code is not in the store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MissingSubjectPolicy {
    /// Count the row as skipped and carry on
    Skip,
    /// Abort the import with an `UnresolvedSubject` error
    Fail,
}

/// Upsert the provider, subject types and every attribute of a datasource
pub fn declare_datasource<S: SubjectStore>(datasource: &Datasource, store: &mut S) -> Result<()> {
    store.upsert_provider(&datasource.provider)?;

    for subject_type in &datasource.subject_types {
        store.upsert_subject_type(subject_type)?;
    }

    for attribute in datasource.attributes() {
        store.upsert_attribute(attribute)?;
    }

    debug!(
        "Declared datasource {}: {} subject types, {} attributes",
        datasource.id,
        datasource.subject_types.len(),
        datasource.attributes().count()
    );

    Ok(())
}

/// Looks up existing subjects of one subject type by label
pub struct SubjectResolver<'a, S: SubjectStore> {
    store: &'a S,
    subject_type: SubjectTypeKey,
    policy: MissingSubjectPolicy,
}

impl<'a, S: SubjectStore> SubjectResolver<'a, S> {
    pub fn new(store: &'a S, subject_type: SubjectTypeKey, policy: MissingSubjectPolicy) -> Self {
        Self {
            store,
            subject_type,
            policy,
        }
    }

    /// Resolve a label; `Ok(None)` means the row should be skipped
    pub fn resolve(&self, label: &str) -> Result<Option<&'a Subject>> {
        let key = SubjectKey {
            subject_type: self.subject_type.clone(),
            label: label.to_string(),
        };

        match (self.store.subject(&key), self.policy) {
            (Some(subject), _) => Ok(Some(subject)),
            (None, MissingSubjectPolicy::Skip) => Ok(None),
            (None, MissingSubjectPolicy::Fail) => Err(ImporterError::UnresolvedSubject {
                subject_type: self.subject_type.to_string(),
                label: label.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::models::{Attribute, Provider, SubjectType};
    use crate::app::services::subject_store::MemoryStore;

    fn datasource() -> Datasource {
        let provider = Provider::new("uk.gov.ons", "Office for National Statistics");
        Datasource::new("claimantsCount", &provider, "Claimants", "Claimant count")
            .with_subject_type(SubjectType::new(&provider, "lsoa", "Lower Layer Super Output Areas"))
            .with_timed_value_attributes(vec![
                Attribute::new(&provider, "claimantsCount", "Claimant count"),
                Attribute::new(&provider, "ESAclaimants", "ESA claimants"),
            ])
    }

    #[test]
    fn test_declare_datasource_is_idempotent() {
        let mut store = MemoryStore::new();
        let datasource = datasource();

        declare_datasource(&datasource, &mut store).unwrap();
        declare_datasource(&datasource, &mut store).unwrap();

        assert_eq!(store.attribute_count(), 2);
        assert_eq!(store.subject_types().count(), 1);
        assert!(store.provider("uk.gov.ons").is_some());
    }

    #[test]
    fn test_resolver_policies() {
        let mut store = MemoryStore::new();
        let datasource = datasource();
        declare_datasource(&datasource, &mut store).unwrap();

        let lsoa = datasource.unique_subject_type().unwrap().clone();
        store
            .upsert_subject(Subject::new(&lsoa, "E01000001", "City of London 001A"))
            .unwrap();

        let skipping = SubjectResolver::new(&store, lsoa.key(), MissingSubjectPolicy::Skip);
        assert_eq!(
            skipping.resolve("E01000001").unwrap().map(|s| s.name.as_str()),
            Some("City of London 001A")
        );
        assert!(skipping.resolve("E92000001").unwrap().is_none());

        let failing = SubjectResolver::new(&store, lsoa.key(), MissingSubjectPolicy::Fail);
        assert!(matches!(
            failing.resolve("E92000001"),
            Err(ImporterError::UnresolvedSubject { .. })
        ));
        assert_eq!(store.subject_count(), 1);
    }
}
