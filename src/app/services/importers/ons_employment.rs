//! ONS employment statistics importer (Nomisweb CSV extracts)
//!
//! Each datasource is a Nomis query returning one observation per
//! (period, geography) row. Geography codes are resolved against subjects
//! already loaded by the boundary importer; rows for geographies that are
//! not loaded (regions, countries) and suppressed cells are skipped.

use super::column_mapping::{ColumnMapping, field, numeric_field};
use super::{
    ImportContext, ImportStats, Importer, MissingSubjectPolicy, PeriodRule, RemoteSource,
    SubjectResolver,
};
use crate::app::models::{Attribute, Datasource, Provider, SubjectType, TimedValue};
use crate::app::services::subject_store::SubjectStore;
use crate::constants::{
    APS_EMPLOYMENT_RATE_URL, APS_UNEMPLOYMENT_RATE_URL, CLAIMANTS_COUNT_URL, ESA_CLAIMANTS_URL,
    JSA_CLAIMANTS_COUNT_URL, JSA_CLAIMANTS_PROPORTION_URL, LOCAL_AUTHORITY_SUBJECT_TYPE,
    LSOA_SUBJECT_TYPE, ONS_EMPLOYMENT_IMPORTER, ONS_GROSS_ANNUAL_INCOME_URL,
    ONS_JOBS_DENSITY_URL, ONS_PROVIDER_LABEL, ONS_PROVIDER_NAME, ONS_TOTAL_JOBS_URL,
    nomis_columns,
};
use crate::error::{ImporterError, Result};
use std::fs::File;
use std::path::Path;
use tracing::{debug, info, warn};

/// Static shape of one Nomis dataset
#[derive(Debug, Clone, Copy)]
pub struct EmploymentDataset {
    pub id: &'static str,
    pub description: &'static str,
    pub unit: &'static str,
    pub url: &'static str,
    /// Subject type geography codes resolve against
    pub subject_type: &'static str,
    pub period_rule: PeriodRule,
    pub missing_subjects: MissingSubjectPolicy,
}

/// Every dataset of the importer, in catalog order
pub const EMPLOYMENT_DATASETS: &[EmploymentDataset] = &[
    EmploymentDataset {
        id: "claimantsCount",
        description: "Number of people claiming unemployment related benefits",
        unit: "people",
        url: CLAIMANTS_COUNT_URL,
        subject_type: LSOA_SUBJECT_TYPE,
        period_rule: PeriodRule::Month,
        missing_subjects: MissingSubjectPolicy::Skip,
    },
    EmploymentDataset {
        id: "JSAclaimantsCount",
        description: "Number of people claiming Jobseeker's Allowance",
        unit: "people",
        url: JSA_CLAIMANTS_COUNT_URL,
        subject_type: LOCAL_AUTHORITY_SUBJECT_TYPE,
        period_rule: PeriodRule::Month,
        missing_subjects: MissingSubjectPolicy::Skip,
    },
    EmploymentDataset {
        id: "JSAclaimantsProportion",
        description: "Jobseeker's Allowance claimants as a proportion of residents aged 16-64",
        unit: "percent",
        url: JSA_CLAIMANTS_PROPORTION_URL,
        subject_type: LOCAL_AUTHORITY_SUBJECT_TYPE,
        period_rule: PeriodRule::Month,
        missing_subjects: MissingSubjectPolicy::Skip,
    },
    EmploymentDataset {
        id: "ESAclaimants",
        description: "Number of people claiming Employment and Support Allowance",
        unit: "people",
        url: ESA_CLAIMANTS_URL,
        subject_type: LOCAL_AUTHORITY_SUBJECT_TYPE,
        period_rule: PeriodRule::Month,
        missing_subjects: MissingSubjectPolicy::Skip,
    },
    EmploymentDataset {
        id: "APSEmploymentRate",
        description: "Employment rate of residents aged 16-64 (Annual Population Survey)",
        unit: "percent",
        url: APS_EMPLOYMENT_RATE_URL,
        subject_type: LOCAL_AUTHORITY_SUBJECT_TYPE,
        period_rule: PeriodRule::YearEnding,
        missing_subjects: MissingSubjectPolicy::Skip,
    },
    EmploymentDataset {
        id: "APSUnemploymentRate",
        description: "Unemployment rate of residents aged 16-64 (Annual Population Survey)",
        unit: "percent",
        url: APS_UNEMPLOYMENT_RATE_URL,
        subject_type: LOCAL_AUTHORITY_SUBJECT_TYPE,
        period_rule: PeriodRule::YearEnding,
        missing_subjects: MissingSubjectPolicy::Skip,
    },
    EmploymentDataset {
        id: "ONSJobsDensity",
        description: "Jobs per resident aged 16-64",
        unit: "ratio",
        url: ONS_JOBS_DENSITY_URL,
        subject_type: LOCAL_AUTHORITY_SUBJECT_TYPE,
        period_rule: PeriodRule::Year,
        missing_subjects: MissingSubjectPolicy::Skip,
    },
    EmploymentDataset {
        id: "ONSTotalJobs",
        description: "Total number of jobs",
        unit: "jobs",
        url: ONS_TOTAL_JOBS_URL,
        subject_type: LOCAL_AUTHORITY_SUBJECT_TYPE,
        period_rule: PeriodRule::Year,
        missing_subjects: MissingSubjectPolicy::Skip,
    },
    EmploymentDataset {
        id: "ONSGrossAnnualIncome",
        description: "Median gross annual pay of residents",
        unit: "GBP",
        url: ONS_GROSS_ANNUAL_INCOME_URL,
        subject_type: LOCAL_AUTHORITY_SUBJECT_TYPE,
        period_rule: PeriodRule::Year,
        missing_subjects: MissingSubjectPolicy::Skip,
    },
];

impl EmploymentDataset {
    pub fn find(datasource_id: &str) -> Option<&'static EmploymentDataset> {
        EMPLOYMENT_DATASETS
            .iter()
            .find(|dataset| dataset.id == datasource_id)
    }

    pub fn attribute(&self, provider: &Provider) -> Attribute {
        Attribute::new(provider, self.id, self.description).with_unit(self.unit)
    }
}

/// Subject type names as published by the boundary importer
fn subject_type_name(label: &str) -> &'static str {
    match label {
        LSOA_SUBJECT_TYPE => "Lower Layer Super Output Areas",
        _ => "Local Authority",
    }
}

/// Imports Nomisweb employment and benefit statistics as timed values
#[derive(Debug, Clone, Default)]
pub struct OnsEmploymentImporter;

impl OnsEmploymentImporter {
    pub fn new() -> Self {
        Self
    }

    fn dataset(&self, datasource_id: &str) -> Result<&'static EmploymentDataset> {
        EmploymentDataset::find(datasource_id)
            .ok_or_else(|| ImporterError::invalid_datasource(self.name(), datasource_id))
    }

    /// The full attribute catalog, declared by every datasource
    fn attribute_catalog(&self, provider: &Provider) -> Vec<Attribute> {
        EMPLOYMENT_DATASETS
            .iter()
            .map(|dataset| dataset.attribute(provider))
            .collect()
    }
}

impl Importer for OnsEmploymentImporter {
    fn name(&self) -> &'static str {
        ONS_EMPLOYMENT_IMPORTER
    }

    fn provider(&self) -> Provider {
        Provider::new(ONS_PROVIDER_LABEL, ONS_PROVIDER_NAME)
    }

    fn datasource_ids(&self) -> Vec<&'static str> {
        EMPLOYMENT_DATASETS.iter().map(|dataset| dataset.id).collect()
    }

    fn datasource(&self, datasource_id: &str) -> Result<Datasource> {
        let dataset = self.dataset(datasource_id)?;
        let provider = self.provider();
        let subject_type = SubjectType::new(
            &provider,
            dataset.subject_type,
            subject_type_name(dataset.subject_type),
        );

        Ok(Datasource::new(dataset.id, &provider, dataset.id, dataset.description)
            .with_url(dataset.url)
            .with_subject_type(subject_type)
            .with_timed_value_attributes(self.attribute_catalog(&provider)))
    }

    fn remote_source(&self, datasource: &Datasource) -> Result<RemoteSource> {
        let dataset = self.dataset(&datasource.id)?;
        Ok(RemoteSource {
            url: dataset.url.to_string(),
            extension: "csv",
        })
    }

    fn load<S: SubjectStore>(
        &self,
        datasource: &Datasource,
        path: &Path,
        _context: &ImportContext,
        store: &mut S,
    ) -> Result<ImportStats> {
        let dataset = self.dataset(&datasource.id)?;
        let subject_type = datasource.unique_subject_type()?;
        let attribute = datasource
            .timed_value_attribute(dataset.id)
            .ok_or_else(|| ImporterError::invalid_datasource(self.name(), dataset.id))?
            .key();

        info!("Reading {} rows from {}", dataset.id, path.display());

        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(File::open(path)?);

        let mapping = ColumnMapping::analyze(csv_reader.headers()?, path.display().to_string());
        let period_index = mapping.require(nomis_columns::DATE_NAME)?;
        let code_index = mapping.require(nomis_columns::GEOGRAPHY_CODE)?;
        let value_index = mapping.require(nomis_columns::OBS_VALUE)?;
        let name_index = mapping.get_index(nomis_columns::GEOGRAPHY_NAME);
        debug!("{} columns in {}", mapping.column_count(), mapping.source_name);

        let mut stats = ImportStats::new(dataset.id);
        let mut values = Vec::new();
        {
            let resolver = SubjectResolver::new(&*store, subject_type.key(), dataset.missing_subjects);

            for (row, record) in csv_reader.records().enumerate() {
                let record = record?;
                stats.records_read += 1;

                let period = field(&record, period_index).unwrap_or_default();
                let timestamp = dataset.period_rule.to_timestamp(period)?;

                let Some(code) = field(&record, code_index) else {
                    stats.skip(format!("row {}: no geography code", row + 1));
                    continue;
                };

                let Some(subject) = resolver.resolve(code)? else {
                    let name = name_index.and_then(|index| field(&record, index)).unwrap_or("");
                    debug!("Skipping {} {} ({}): subject not loaded", dataset.id, code, name);
                    stats.skip(format!("row {}: unknown subject {}", row + 1, code));
                    continue;
                };

                let Some(value) = numeric_field(&record, value_index) else {
                    stats.skip(format!("row {}: no numeric value for {}", row + 1, code));
                    continue;
                };

                values.push(TimedValue {
                    subject: subject.key(),
                    attribute: attribute.clone(),
                    timestamp,
                    value,
                });
            }
        }

        if stats.records_skipped > 0 {
            warn!(
                "{}: skipped {} of {} rows",
                dataset.id, stats.records_skipped, stats.records_read
            );
        }

        stats.timed_values_saved = store.append_timed_values(values)?;
        Ok(stats)
    }
}
