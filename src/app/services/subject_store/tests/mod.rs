//! Test utilities for subject store testing
//!
//! Provides a small ONS-flavoured fixture shared by the memory and query tests.

use crate::app::models::{Attribute, Provider, Subject, SubjectType, TimedValue};
use crate::app::services::subject_store::{MemoryStore, SubjectStore};
use chrono::{NaiveDate, NaiveDateTime};


pub fn ons() -> Provider {
    Provider::new("uk.gov.ons", "Office for National Statistics")
}

pub fn lsoa() -> SubjectType {
    SubjectType::new(&ons(), "lsoa", "Lower Layer Super Output Areas")
}

pub fn claimants() -> Attribute {
    Attribute::new(&ons(), "claimantsCount", "Claimant count").with_unit("people")
}

/// Last second of the given month
pub fn end_of_month(year: i32, month: u32) -> NaiveDateTime {
    let (next_year, next_month) = if month == 12 { (year + 1, 1) } else { (year, month + 1) };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
        - chrono::Duration::seconds(1)
}

/// Store with the LSOA type, three City of London subjects and the claimants attribute
pub fn seeded_store() -> MemoryStore {
    let mut store = MemoryStore::new();
    store.upsert_provider(&ons()).unwrap();
    store.upsert_subject_type(&lsoa()).unwrap();
    store.upsert_attribute(&claimants()).unwrap();

    store
        .upsert_subjects(vec![
            Subject::new(&lsoa(), "E01000001", "City of London 001A"),
            Subject::new(&lsoa(), "E01000002", "City of London 001B"),
            Subject::new(&lsoa(), "E01000003", "City of London 001C"),
        ])
        .unwrap();
    store
}

pub fn claimants_value(label: &str, timestamp: NaiveDateTime, value: f64) -> TimedValue {
    TimedValue {
        subject: Subject::new(&lsoa(), label, "").key(),
        attribute: claimants().key(),
        timestamp,
        value,
    }
}
