//! Tests for the Nomisweb employment importer

use super::*;
use crate::app::models::{AttributeKey, SubjectKey, SubjectTypeKey};
use crate::app::services::importers::{
    ImportContext, Importer, OnsBoundariesImporter, OnsEmploymentImporter,
};
use crate::app::services::subject_store::MemoryStore;
use crate::constants::{
    APS_EMPLOYMENT_RATE_URL, APS_UNEMPLOYMENT_RATE_URL, CLAIMANTS_COUNT_URL, ESA_CLAIMANTS_URL,
    JSA_CLAIMANTS_COUNT_URL, JSA_CLAIMANTS_PROPORTION_URL, LOCAL_AUTHORITY_BOUNDARIES_URL,
    LSOA_BOUNDARIES_URL, ONS_GROSS_ANNUAL_INCOME_URL, ONS_JOBS_DENSITY_URL, ONS_PROVIDER_LABEL,
    ONS_TOTAL_JOBS_URL,
};
use crate::error::ImporterError;

fn subject(subject_type: &str, label: &str) -> SubjectKey {
    SubjectKey {
        subject_type: SubjectTypeKey {
            provider_label: ONS_PROVIDER_LABEL.to_string(),
            label: subject_type.to_string(),
        },
        label: label.to_string(),
    }
}

fn attribute(label: &str) -> AttributeKey {
    AttributeKey {
        provider_label: ONS_PROVIDER_LABEL.to_string(),
        label: label.to_string(),
    }
}

/// Store holding the LSOA and local authority fixture boundaries
async fn store_with_boundaries(context: &ImportContext) -> MemoryStore {
    seed_fixture(context, LSOA_BOUNDARIES_URL, ONS_PROVIDER_LABEL, "json", "lsoa_boundaries.geojson");
    seed_fixture(
        context,
        LOCAL_AUTHORITY_BOUNDARIES_URL,
        ONS_PROVIDER_LABEL,
        "json",
        "local_authority_boundaries.geojson",
    );

    let boundaries = OnsBoundariesImporter::new();
    let mut store = MemoryStore::new();
    for datasource_id in ["lsoa", "localAuthority"] {
        boundaries
            .import_datasource(datasource_id, context, &mut store)
            .await
            .unwrap();
    }
    store
}

#[tokio::test]
async fn test_import_claimants_count() {
    let (_temp_dir, context) = offline_context();
    let mut store = store_with_boundaries(&context).await;
    seed_fixture(&context, CLAIMANTS_COUNT_URL, ONS_PROVIDER_LABEL, "csv", "claimants_count.csv");

    let stats = OnsEmploymentImporter::new()
        .import_datasource("claimantsCount", &context, &mut store)
        .await
        .unwrap();

    assert_eq!(stats.records_read, 11);
    assert_eq!(stats.timed_values_saved, 9);
    // England aggregate row and one suppressed cell
    assert_eq!(stats.records_skipped, 2);

    let claimants = attribute("claimantsCount");
    let expected = [
        ("E01000001", 5.0),
        ("E01000002", 0.0),
        ("E01000003", 15.0),
        ("E01025542", 10.0),
        ("E01025613", 5.0),
    ];
    for (label, value) in expected {
        let latest = store
            .latest_timed_value(&subject("lsoa", label), &claimants)
            .unwrap();
        assert_eq!(latest.timestamp, at("2017-12-31T23:59:59"), "{label}");
        assert!((latest.value - value).abs() < 0.1, "{label}");
    }

    let history = store.timed_values(&subject("lsoa", "E01000001"), &claimants);
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].timestamp, at("2016-01-31T23:59:59"));

    // Aggregate geographies never become subjects
    assert_eq!(store.subject_count(), 7);
}

#[tokio::test]
async fn test_import_jsa_claimants_proportion() {
    let (_temp_dir, context) = offline_context();
    let mut store = store_with_boundaries(&context).await;
    seed_fixture(
        &context,
        JSA_CLAIMANTS_PROPORTION_URL,
        ONS_PROVIDER_LABEL,
        "csv",
        "jsa_claimants_proportion.csv",
    );

    OnsEmploymentImporter::new()
        .import_datasource("JSAclaimantsProportion", &context, &mut store)
        .await
        .unwrap();

    let proportion = attribute("JSAclaimantsProportion");

    let london = store
        .latest_timed_value(&subject("localAuthority", "E09000001"), &proportion)
        .unwrap();
    assert_eq!(london.timestamp, at("2018-01-31T23:59:59"));
    assert!((london.value - 0.4).abs() < 0.01);

    let barking = store
        .latest_timed_value(&subject("localAuthority", "E09000002"), &proportion)
        .unwrap();
    assert!((barking.value - 1.8).abs() < 0.01);

    // Only the datasource's own attribute receives values
    assert!(
        store
            .latest_timed_value(&subject("localAuthority", "E09000001"), &attribute("JSAclaimantsCount"))
            .is_none()
    );
    assert_eq!(store.attribute_count(), 9);
}

#[tokio::test]
async fn test_year_ending_and_year_periods() {
    let (_temp_dir, context) = offline_context();
    let mut store = store_with_boundaries(&context).await;
    seed_fixture(&context, APS_EMPLOYMENT_RATE_URL, ONS_PROVIDER_LABEL, "csv", "aps_employment_rate.csv");
    seed_fixture(
        &context,
        ONS_GROSS_ANNUAL_INCOME_URL,
        ONS_PROVIDER_LABEL,
        "csv",
        "ons_gross_annual_income.csv",
    );

    let importer = OnsEmploymentImporter::new();
    let aps = importer
        .import_datasource("APSEmploymentRate", &context, &mut store)
        .await
        .unwrap();
    assert_eq!(aps.timed_values_saved, 2);
    assert_eq!(aps.records_skipped, 1);

    importer
        .import_datasource("ONSGrossAnnualIncome", &context, &mut store)
        .await
        .unwrap();

    let barking = subject("localAuthority", "E09000002");

    let rate = store
        .latest_timed_value(&barking, &attribute("APSEmploymentRate"))
        .unwrap();
    assert_eq!(rate.timestamp, at("2017-09-30T23:59:59"));
    assert!((rate.value - 67.0).abs() < 0.1);

    let income = store
        .latest_timed_value(&barking, &attribute("ONSGrossAnnualIncome"))
        .unwrap();
    assert_eq!(income.timestamp, at("2017-12-31T23:59:59"));
    assert!((income.value - 30167.0).abs() < 0.01);
}

#[tokio::test]
async fn test_remaining_local_authority_datasources() {
    let (_temp_dir, context) = offline_context();
    let mut store = store_with_boundaries(&context).await;

    // (datasource, source url, fixture, subject, latest period end, latest value)
    let cases = [
        (
            "JSAclaimantsCount",
            JSA_CLAIMANTS_COUNT_URL,
            "jsa_claimants_count.csv",
            "E09000002",
            "2018-01-31T23:59:59",
            2355.0,
        ),
        (
            "ESAclaimants",
            ESA_CLAIMANTS_URL,
            "esa_claimants.csv",
            "E09000001",
            "2017-08-31T23:59:59",
            140.0,
        ),
        (
            "APSUnemploymentRate",
            APS_UNEMPLOYMENT_RATE_URL,
            "aps_unemployment_rate.csv",
            "E09000002",
            "2017-09-30T23:59:59",
            9.4,
        ),
        (
            "ONSJobsDensity",
            ONS_JOBS_DENSITY_URL,
            "ons_jobs_density.csv",
            "E09000002",
            "2016-12-31T23:59:59",
            0.49,
        ),
        (
            "ONSTotalJobs",
            ONS_TOTAL_JOBS_URL,
            "ons_total_jobs.csv",
            "E09000002",
            "2016-12-31T23:59:59",
            64000.0,
        ),
    ];

    let importer = OnsEmploymentImporter::new();
    for (datasource_id, url, fixture_name, label, timestamp, value) in cases {
        seed_fixture(&context, url, ONS_PROVIDER_LABEL, "csv", fixture_name);

        let stats = importer
            .import_datasource(datasource_id, &context, &mut store)
            .await
            .unwrap();
        // Every fixture carries one London region row
        assert_eq!(stats.records_skipped, 1, "{datasource_id}");

        let latest = store
            .latest_timed_value(&subject("localAuthority", label), &attribute(datasource_id))
            .unwrap();
        assert_eq!(latest.timestamp, at(timestamp), "{datasource_id}");
        assert!((latest.value - value).abs() < 1e-6, "{datasource_id}");
    }

    let barking = subject("localAuthority", "E09000002");
    assert_eq!(store.timed_values(&barking, &attribute("JSAclaimantsCount")).len(), 2);
    assert_eq!(store.timed_values(&barking, &attribute("ONSJobsDensity")).len(), 2);
    assert_eq!(store.subject_count(), 7);
}

#[tokio::test]
async fn test_reimport_overwrites_instead_of_duplicating() {
    let (_temp_dir, context) = offline_context();
    let mut store = store_with_boundaries(&context).await;
    seed_fixture(&context, CLAIMANTS_COUNT_URL, ONS_PROVIDER_LABEL, "csv", "claimants_count.csv");

    let importer = OnsEmploymentImporter::new();
    for _ in 0..2 {
        importer
            .import_datasource("claimantsCount", &context, &mut store)
            .await
            .unwrap();
    }

    assert_eq!(store.timed_value_count(), 9);
    assert_eq!(store.subject_count(), 7);
}

#[tokio::test]
async fn test_missing_column_is_fatal() {
    let (_temp_dir, context) = offline_context();
    let mut store = store_with_boundaries(&context).await;
    let csv = "\"DATE_NAME\",\"GEOGRAPHY_NAME\",\"GEOGRAPHY_CODE\"\n\"Jan-18\",\"City of London\",\"E09000001\"\n";
    seed_cache(&context, JSA_CLAIMANTS_PROPORTION_URL, ONS_PROVIDER_LABEL, "csv", csv.as_bytes());

    let result = OnsEmploymentImporter::new()
        .import_datasource("JSAclaimantsProportion", &context, &mut store)
        .await;

    assert!(matches!(
        result,
        Err(ImporterError::MissingColumn { ref column, .. }) if column == "OBS_VALUE"
    ));
}

#[tokio::test]
async fn test_unparseable_period_is_fatal() {
    let (_temp_dir, context) = offline_context();
    let mut store = store_with_boundaries(&context).await;
    let csv = "\"DATE_NAME\",\"GEOGRAPHY_CODE\",\"OBS_VALUE\"\n\"2018 Q1\",\"E09000001\",0.4\n";
    seed_cache(&context, JSA_CLAIMANTS_PROPORTION_URL, ONS_PROVIDER_LABEL, "csv", csv.as_bytes());

    let result = OnsEmploymentImporter::new()
        .import_datasource("JSAclaimantsProportion", &context, &mut store)
        .await;

    assert!(matches!(result, Err(ImporterError::InvalidPeriod { .. })));
    assert_eq!(store.timed_value_count(), 0);
}

#[tokio::test]
async fn test_unknown_datasource_id() {
    let (_temp_dir, context) = offline_context();
    let mut store = MemoryStore::new();

    let result = OnsEmploymentImporter::new()
        .import_datasource("claimants", &context, &mut store)
        .await;

    match result {
        Err(ImporterError::InvalidDatasource { datasource_id, .. }) => {
            assert_eq!(datasource_id, "claimants")
        }
        other => panic!("expected InvalidDatasource, got {other:?}"),
    }
}
