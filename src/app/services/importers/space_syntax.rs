//! Space Syntax OpenMapping importer
//!
//! The OpenMapping release is a zip of CSV tables, one row per street
//! segment. Each row becomes a `space_syntax` subject with its angular
//! analysis measures as timed values and its Meridian 2 road attributes
//! as fixed values. The tables carry no observation date, so timed values
//! are stamped with the run timestamp.

use super::column_mapping::{ColumnMapping, field, numeric_field};
use super::{ImportContext, ImportStats, Importer, RemoteSource};
use crate::app::models::{
    Attribute, AttributeKey, Datasource, FixedValue, Provider, Subject, SubjectType, TimedValue,
};
use crate::app::services::subject_store::SubjectStore;
use crate::constants::{
    SPACE_SYNTAX_ARCHIVE_URL, SPACE_SYNTAX_DATASOURCE, SPACE_SYNTAX_ID_COLUMN,
    SPACE_SYNTAX_IMPORTER, SPACE_SYNTAX_NUMERIC_COLUMNS, SPACE_SYNTAX_PROVIDER_LABEL,
    SPACE_SYNTAX_PROVIDER_NAME, SPACE_SYNTAX_STRING_COLUMNS, SPACE_SYNTAX_SUBJECT_TYPE,
};
use crate::error::{ImporterError, Result};
use chrono::NaiveDateTime;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use tracing::{debug, info, warn};
use zip::ZipArchive;

/// Imports street segment measures from the OpenMapping archive
#[derive(Debug, Clone, Default)]
pub struct SpaceSyntaxImporter;

impl SpaceSyntaxImporter {
    pub fn new() -> Self {
        Self
    }

    fn check_datasource(&self, datasource_id: &str) -> Result<()> {
        if datasource_id == SPACE_SYNTAX_DATASOURCE {
            Ok(())
        } else {
            Err(ImporterError::invalid_datasource(self.name(), datasource_id))
        }
    }
}

/// Subject label for a segment id
pub fn segment_label(segment_id: &str) -> String {
    format!("{}_{}", SPACE_SYNTAX_PROVIDER_LABEL, segment_id)
}

/// Buffers filled while reading archive entries
struct SegmentBuffers {
    subjects: Vec<Subject>,
    timed_values: Vec<TimedValue>,
    fixed_values: Vec<FixedValue>,
}

/// Declared columns resolved against one table's header
struct SegmentColumns {
    id: usize,
    numeric: Vec<(usize, AttributeKey)>,
    string: Vec<(usize, AttributeKey)>,
}

impl SegmentColumns {
    fn resolve(mapping: &ColumnMapping, datasource: &Datasource) -> Result<Self> {
        let id = mapping.require(SPACE_SYNTAX_ID_COLUMN)?;
        let numeric = Self::present(mapping, &datasource.timed_value_attributes);
        let string = Self::present(mapping, &datasource.fixed_value_attributes);

        Ok(Self { id, numeric, string })
    }

    fn present(mapping: &ColumnMapping, attributes: &[Attribute]) -> Vec<(usize, AttributeKey)> {
        attributes
            .iter()
            .filter_map(|attribute| match mapping.get_index(&attribute.label) {
                Some(index) => Some((index, attribute.key())),
                None => {
                    warn!(
                        "Column {} not found in {}, skipping",
                        attribute.label, mapping.source_name
                    );
                    None
                }
            })
            .collect()
    }
}

impl Importer for SpaceSyntaxImporter {
    fn name(&self) -> &'static str {
        SPACE_SYNTAX_IMPORTER
    }

    fn provider(&self) -> Provider {
        Provider::new(SPACE_SYNTAX_PROVIDER_LABEL, SPACE_SYNTAX_PROVIDER_NAME)
    }

    fn datasource_ids(&self) -> Vec<&'static str> {
        vec![SPACE_SYNTAX_DATASOURCE]
    }

    fn datasource(&self, datasource_id: &str) -> Result<Datasource> {
        self.check_datasource(datasource_id)?;
        let provider = self.provider();

        let timed = SPACE_SYNTAX_NUMERIC_COLUMNS
            .iter()
            .map(|(column, description)| Attribute::new(&provider, *column, *description))
            .collect();
        let fixed = SPACE_SYNTAX_STRING_COLUMNS
            .iter()
            .map(|(column, description)| Attribute::new(&provider, *column, *description))
            .collect();

        Ok(Datasource::new(
            SPACE_SYNTAX_DATASOURCE,
            &provider,
            "Space Syntax OpenMapping",
            "Angular segment analysis of the Great Britain street network",
        )
        .with_url(SPACE_SYNTAX_ARCHIVE_URL)
        .with_subject_type(SubjectType::new(
            &provider,
            SPACE_SYNTAX_SUBJECT_TYPE,
            "Street segment",
        ))
        .with_timed_value_attributes(timed)
        .with_fixed_value_attributes(fixed))
    }

    fn remote_source(&self, datasource: &Datasource) -> Result<RemoteSource> {
        self.check_datasource(&datasource.id)?;
        Ok(RemoteSource {
            url: SPACE_SYNTAX_ARCHIVE_URL.to_string(),
            extension: "zip",
        })
    }

    fn load<S: SubjectStore>(
        &self,
        datasource: &Datasource,
        path: &Path,
        context: &ImportContext,
        store: &mut S,
    ) -> Result<ImportStats> {
        let subject_type = datasource.unique_subject_type()?;
        let mut stats = ImportStats::new(&datasource.id);
        let mut buffers = SegmentBuffers {
            subjects: Vec::new(),
            timed_values: Vec::new(),
            fixed_values: Vec::new(),
        };

        info!("Reading Space Syntax archive {}", path.display());
        let mut archive = ZipArchive::new(BufReader::new(File::open(path)?))?;

        for index in 0..archive.len() {
            let entry = archive.by_index(index)?;
            let entry_name = entry.name().to_string();

            if entry.is_dir() || !entry_name.to_lowercase().ends_with(".csv") {
                debug!("Skipping archive entry {}", entry_name);
                continue;
            }

            debug!("Reading archive entry {}", entry_name);
            read_segment_table(
                entry,
                &entry_name,
                datasource,
                subject_type,
                context.run_timestamp,
                &mut buffers,
                &mut stats,
            )?;
        }

        stats.subjects_saved = store.upsert_subjects(buffers.subjects)?;
        stats.timed_values_saved = store.append_timed_values(buffers.timed_values)?;
        stats.fixed_values_saved = store.set_fixed_values(buffers.fixed_values)?;

        Ok(stats)
    }
}

fn read_segment_table<R: Read>(
    reader: R,
    entry_name: &str,
    datasource: &Datasource,
    subject_type: &SubjectType,
    timestamp: NaiveDateTime,
    buffers: &mut SegmentBuffers,
    stats: &mut ImportStats,
) -> Result<()> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let mapping = ColumnMapping::analyze(csv_reader.headers()?, entry_name);
    let columns = SegmentColumns::resolve(&mapping, datasource)?;
    debug!(
        "{}: {} columns, {} numeric and {} string attributes mapped",
        entry_name,
        mapping.column_count(),
        columns.numeric.len(),
        columns.string.len()
    );

    for (row, record) in csv_reader.records().enumerate() {
        let record = record?;
        stats.records_read += 1;

        let Some(segment_id) = field(&record, columns.id) else {
            stats.skip(format!("{} row {}: no segment id", entry_name, row + 1));
            continue;
        };

        let subject = Subject::new(subject_type, segment_label(segment_id), segment_id);
        let subject_key = subject.key();
        buffers.subjects.push(subject);

        for (index, attribute) in &columns.numeric {
            if let Some(value) = numeric_field(&record, *index) {
                buffers.timed_values.push(TimedValue {
                    subject: subject_key.clone(),
                    attribute: attribute.clone(),
                    timestamp,
                    value,
                });
            }
        }

        for (index, attribute) in &columns.string {
            if let Some(value) = field(&record, *index) {
                buffers.fixed_values.push(FixedValue {
                    subject: subject_key.clone(),
                    attribute: attribute.clone(),
                    value: value.to_string(),
                });
            }
        }
    }

    Ok(())
}
