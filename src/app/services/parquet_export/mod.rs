//! Parquet export of a subject store snapshot
//!
//! Writes three files into an output directory:
//!
//! - `subjects.parquet` - subject type, label, name, SRID and geometry as GeoJSON text
//! - `timed_values.parquet` - subject, attribute, millisecond timestamp and value
//! - `fixed_values.parquet` - subject, attribute and string value
//!
//! Rows come out in store key order, so repeated exports of the same store
//! are byte-for-byte comparable.

use crate::app::models::{Subject, SubjectKey};
use crate::app::services::subject_store::MemoryStore;
use crate::error::Result;
use polars::prelude::{
    Column, DataFrame, DataType, NamedFrom, ParquetCompression, ParquetWriter, Series, TimeUnit,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub const SUBJECTS_FILE: &str = "subjects.parquet";
pub const TIMED_VALUES_FILE: &str = "timed_values.parquet";
pub const FIXED_VALUES_FILE: &str = "fixed_values.parquet";

/// Rows written per file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportSummary {
    pub subjects: usize,
    pub timed_values: usize,
    pub fixed_values: usize,
    pub files: Vec<PathBuf>,
}

/// Writes store snapshots as Snappy-compressed Parquet files
#[derive(Debug, Clone)]
pub struct ParquetExporter {
    output_dir: PathBuf,
}

impl ParquetExporter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Export every subject and value in the store
    pub fn export(&self, store: &MemoryStore) -> Result<ExportSummary> {
        std::fs::create_dir_all(&self.output_dir)?;
        info!("Exporting store to {}", self.output_dir.display());

        let mut summary = ExportSummary::default();

        let mut subjects = subjects_frame(store)?;
        summary.subjects = subjects.height();
        summary.files.push(self.write(SUBJECTS_FILE, &mut subjects)?);

        let mut timed_values = timed_values_frame(store)?;
        summary.timed_values = timed_values.height();
        summary.files.push(self.write(TIMED_VALUES_FILE, &mut timed_values)?);

        let mut fixed_values = fixed_values_frame(store)?;
        summary.fixed_values = fixed_values.height();
        summary.files.push(self.write(FIXED_VALUES_FILE, &mut fixed_values)?);

        info!(
            "Exported {} subjects, {} timed values, {} fixed values",
            summary.subjects, summary.timed_values, summary.fixed_values
        );
        Ok(summary)
    }

    fn write(&self, file_name: &str, df: &mut DataFrame) -> Result<PathBuf> {
        let path = self.output_dir.join(file_name);
        let file = std::fs::File::create(&path)?;

        let bytes = ParquetWriter::new(file)
            .with_compression(ParquetCompression::Snappy)
            .finish(df)?;

        debug!("Wrote {} rows ({} bytes) to {}", df.height(), bytes, path.display());
        Ok(path)
    }
}

/// Subject identity columns shared by all three frames
struct SubjectColumns {
    provider_label: Vec<String>,
    subject_type: Vec<String>,
    subject_label: Vec<String>,
}

impl SubjectColumns {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            provider_label: Vec::with_capacity(capacity),
            subject_type: Vec::with_capacity(capacity),
            subject_label: Vec::with_capacity(capacity),
        }
    }

    fn push(&mut self, key: &SubjectKey) {
        self.provider_label.push(key.subject_type.provider_label.clone());
        self.subject_type.push(key.subject_type.label.clone());
        self.subject_label.push(key.label.clone());
    }

    fn into_columns(self) -> Vec<Column> {
        vec![
            Column::new("provider_label".into(), self.provider_label),
            Column::new("subject_type".into(), self.subject_type),
            Column::new("subject_label".into(), self.subject_label),
        ]
    }
}

fn geometry_text(subject: &Subject) -> Result<Option<String>> {
    subject
        .geometry
        .as_ref()
        .map(|geometry| geometry.to_geojson_string())
        .transpose()
}

pub fn subjects_frame(store: &MemoryStore) -> Result<DataFrame> {
    let count = store.subject_count();
    let mut ids = SubjectColumns::with_capacity(count);
    let mut names = Vec::with_capacity(count);
    let mut srids: Vec<Option<u32>> = Vec::with_capacity(count);
    let mut geometries = Vec::with_capacity(count);

    for subject in store.subjects() {
        ids.push(&subject.key());
        names.push(subject.name.clone());
        srids.push(subject.geometry.as_ref().map(|geometry| geometry.srid));
        geometries.push(geometry_text(subject)?);
    }

    let mut columns = ids.into_columns();
    columns.push(Column::new("name".into(), names));
    columns.push(Column::new("srid".into(), srids));
    columns.push(Column::new("geometry".into(), geometries));

    Ok(DataFrame::new(columns)?)
}

pub fn timed_values_frame(store: &MemoryStore) -> Result<DataFrame> {
    let count = store.timed_value_count();
    let mut ids = SubjectColumns::with_capacity(count);
    let mut attributes = Vec::with_capacity(count);
    let mut timestamps = Vec::with_capacity(count);
    let mut values = Vec::with_capacity(count);

    for timed_value in store.all_timed_values() {
        ids.push(&timed_value.subject);
        attributes.push(timed_value.attribute.label);
        timestamps.push(timed_value.timestamp.and_utc().timestamp_millis());
        values.push(timed_value.value);
    }

    let timestamp = Series::new("timestamp".into(), timestamps)
        .cast(&DataType::Datetime(TimeUnit::Milliseconds, None))?;

    let mut columns = ids.into_columns();
    columns.push(Column::new("attribute".into(), attributes));
    columns.push(Column::from(timestamp));
    columns.push(Column::new("value".into(), values));

    Ok(DataFrame::new(columns)?)
}

pub fn fixed_values_frame(store: &MemoryStore) -> Result<DataFrame> {
    let count = store.fixed_value_count();
    let mut ids = SubjectColumns::with_capacity(count);
    let mut attributes = Vec::with_capacity(count);
    let mut values = Vec::with_capacity(count);

    for fixed_value in store.all_fixed_values() {
        ids.push(&fixed_value.subject);
        attributes.push(fixed_value.attribute.label);
        values.push(fixed_value.value);
    }

    let mut columns = ids.into_columns();
    columns.push(Column::new("attribute".into(), attributes));
    columns.push(Column::new("value".into(), values));

    Ok(DataFrame::new(columns)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::models::{
        Attribute, FixedValue, Provider, SpatialGeometry, SubjectType, TimedValue,
    };
    use crate::app::services::subject_store::SubjectStore;
    use chrono::NaiveDate;
    use polars::prelude::{ParquetReader, SerReader};
    use tempfile::TempDir;

    fn populated_store() -> MemoryStore {
        let provider = Provider::new("com.spacesyntax", "Space Syntax");
        let segment_type = SubjectType::new(&provider, "space_syntax", "Street segment");
        let choice = Attribute::new(&provider, "choice2km", "Angular choice, 2km radius");
        let road = Attribute::new(&provider, "meridian_number", "Road number");

        let mut store = MemoryStore::new();
        store.upsert_provider(&provider).unwrap();
        store.upsert_subject_type(&segment_type).unwrap();
        store.upsert_attribute(&choice).unwrap();
        store.upsert_attribute(&road).unwrap();

        let point = geojson::Geometry::new(geojson::Value::Point(vec![1.08, 51.27]));
        let segment = Subject::new(&segment_type, "com.spacesyntax_57927", "57927")
            .with_geometry(SpatialGeometry::with_subject_srid(point));
        let bare = Subject::new(&segment_type, "com.spacesyntax_57928", "57928");
        let key = segment.key();
        store.upsert_subjects(vec![segment, bare]).unwrap();

        store
            .append_timed_value(TimedValue {
                subject: key.clone(),
                attribute: choice.key(),
                timestamp: NaiveDate::from_ymd_opt(2018, 3, 1)
                    .unwrap()
                    .and_hms_opt(0, 0, 0)
                    .unwrap(),
                value: 7340.0,
            })
            .unwrap();
        store
            .set_fixed_value(FixedValue {
                subject: key,
                attribute: road.key(),
                value: "A2".to_string(),
            })
            .unwrap();
        store
    }

    #[test]
    fn test_frames_follow_store_contents() {
        let store = populated_store();

        let subjects = subjects_frame(&store).unwrap();
        assert_eq!(subjects.height(), 2);
        assert_eq!(subjects.column("geometry").unwrap().null_count(), 1);

        let timed = timed_values_frame(&store).unwrap();
        assert_eq!(timed.height(), 1);
        assert_eq!(
            timed.column("timestamp").unwrap().dtype(),
            &DataType::Datetime(TimeUnit::Milliseconds, None)
        );

        let fixed = fixed_values_frame(&store).unwrap();
        assert_eq!(fixed.height(), 1);
    }

    #[test]
    fn test_export_writes_three_files() {
        let temp_dir = TempDir::new().unwrap();
        let output_dir = temp_dir.path().join("export");
        let store = populated_store();

        let exporter = ParquetExporter::new(&output_dir);
        let summary = exporter.export(&store).unwrap();

        assert!(summary.files.iter().all(|file| file.parent() == Some(exporter.output_dir())));
        assert_eq!(summary.subjects, 2);
        assert_eq!(summary.timed_values, 1);
        assert_eq!(summary.fixed_values, 1);
        assert_eq!(summary.files.len(), 3);

        let file = std::fs::File::open(output_dir.join(TIMED_VALUES_FILE)).unwrap();
        let df = ParquetReader::new(file).finish().unwrap();
        assert_eq!(df.height(), 1);
        assert_eq!(
            df.column("attribute").unwrap().str().unwrap().get(0),
            Some("choice2km")
        );
    }

    #[test]
    fn test_export_empty_store() {
        let temp_dir = TempDir::new().unwrap();
        let summary = ParquetExporter::new(temp_dir.path())
            .export(&MemoryStore::new())
            .unwrap();

        assert_eq!(summary.subjects, 0);
        assert!(temp_dir.path().join(SUBJECTS_FILE).exists());
    }
}
