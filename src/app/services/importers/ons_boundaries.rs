//! ONS geoportal boundary importer
//!
//! Reads a GeoJSON feature collection and turns every feature into a
//! subject of the datasource's area level. Foreign members such as a
//! top-level `bbox` or `crs` may appear anywhere in the document. Labels and names are read from
//! the first property whose upper-cased key ends in "CD" or "NM"
//! (e.g. `LSOA11CD` / `LSOA11NM`), so the importer keeps working when ONS
//! bumps the census year in property names.

use super::{ImportContext, ImportStats, Importer, RemoteSource};
use crate::app::models::{Datasource, Provider, SpatialGeometry, Subject, SubjectType};
use crate::app::services::subject_store::SubjectStore;
use crate::constants::{
    FEATURE_LABEL_SUFFIX, FEATURE_NAME_SUFFIX, LOCAL_AUTHORITY_BOUNDARIES_URL,
    LOCAL_AUTHORITY_SUBJECT_TYPE, LSOA_BOUNDARIES_URL, LSOA_SUBJECT_TYPE, MSOA_BOUNDARIES_URL,
    MSOA_SUBJECT_TYPE, ONS_BOUNDARIES_IMPORTER, ONS_PROVIDER_LABEL, ONS_PROVIDER_NAME,
};
use crate::error::{ImporterError, Result};
use geojson::{Feature, FeatureCollection};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::{debug, info};

/// Area level of a boundary datasource
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundaryLevel {
    Lsoa,
    Msoa,
    LocalAuthority,
}

impl BoundaryLevel {
    pub const ALL: [BoundaryLevel; 3] = [Self::Lsoa, Self::Msoa, Self::LocalAuthority];

    pub fn from_id(datasource_id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|level| level.id() == datasource_id)
    }

    /// Datasource id, also used as the subject type label
    pub fn id(&self) -> &'static str {
        match self {
            Self::Lsoa => LSOA_SUBJECT_TYPE,
            Self::Msoa => MSOA_SUBJECT_TYPE,
            Self::LocalAuthority => LOCAL_AUTHORITY_SUBJECT_TYPE,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Lsoa => "LSOA",
            Self::Msoa => "MSOA",
            Self::LocalAuthority => "Local Authority",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Lsoa => "Lower Layer Super Output Areas",
            Self::Msoa => "Middle Layer Super Output Areas",
            Self::LocalAuthority => "Local Authority",
        }
    }

    pub fn url(&self) -> &'static str {
        match self {
            Self::Lsoa => LSOA_BOUNDARIES_URL,
            Self::Msoa => MSOA_BOUNDARIES_URL,
            Self::LocalAuthority => LOCAL_AUTHORITY_BOUNDARIES_URL,
        }
    }

    pub fn subject_type(&self, provider: &Provider) -> SubjectType {
        SubjectType::new(provider, self.id(), self.description())
    }
}

/// Imports LSOA, MSOA and local authority boundaries as subjects
#[derive(Debug, Clone, Default)]
pub struct OnsBoundariesImporter;

impl OnsBoundariesImporter {
    pub fn new() -> Self {
        Self
    }
}

impl Importer for OnsBoundariesImporter {
    fn name(&self) -> &'static str {
        ONS_BOUNDARIES_IMPORTER
    }

    fn provider(&self) -> Provider {
        Provider::new(ONS_PROVIDER_LABEL, ONS_PROVIDER_NAME)
    }

    fn datasource_ids(&self) -> Vec<&'static str> {
        BoundaryLevel::ALL.iter().map(BoundaryLevel::id).collect()
    }

    fn datasource(&self, datasource_id: &str) -> Result<Datasource> {
        let level = BoundaryLevel::from_id(datasource_id)
            .ok_or_else(|| ImporterError::invalid_datasource(self.name(), datasource_id))?;
        let provider = self.provider();

        Ok(Datasource::new(level.id(), &provider, level.name(), level.description())
            .with_url(level.url())
            .with_subject_type(level.subject_type(&provider)))
    }

    fn remote_source(&self, datasource: &Datasource) -> Result<RemoteSource> {
        let level = BoundaryLevel::from_id(&datasource.id)
            .ok_or_else(|| ImporterError::invalid_datasource(self.name(), &datasource.id))?;

        Ok(RemoteSource {
            url: level.url().to_string(),
            extension: "json",
        })
    }

    fn load<S: SubjectStore>(
        &self,
        datasource: &Datasource,
        path: &Path,
        _context: &ImportContext,
        store: &mut S,
    ) -> Result<ImportStats> {
        let subject_type = datasource.unique_subject_type()?;
        let mut stats = ImportStats::new(&datasource.id);

        info!("Reading {} boundaries from {}", datasource.id, path.display());

        let collection: FeatureCollection =
            serde_json::from_reader(BufReader::new(File::open(path)?))?;
        let mut subjects = Vec::with_capacity(collection.features.len());

        for (feature_index, feature) in collection.features.iter().enumerate() {
            stats.records_read += 1;
            subjects.push(feature_to_subject(subject_type, feature, feature_index)?);
        }

        debug!("Flushing {} {} subjects", subjects.len(), datasource.id);
        stats.subjects_saved = store.upsert_subjects(subjects)?;

        Ok(stats)
    }
}

/// Map one boundary feature onto a subject carrying an SRID-tagged geometry
pub fn feature_to_subject(
    subject_type: &SubjectType,
    feature: &Feature,
    feature_index: usize,
) -> Result<Subject> {
    let label = property_by_suffix(feature, FEATURE_LABEL_SUFFIX, feature_index)?;
    let name = property_by_suffix(feature, FEATURE_NAME_SUFFIX, feature_index)?;

    let geometry = feature
        .geometry
        .clone()
        .ok_or_else(|| ImporterError::MissingGeometry {
            feature_index,
            label: label.clone(),
        })?;

    Ok(Subject::new(subject_type, label, name).with_geometry(SpatialGeometry::with_subject_srid(geometry)))
}

/// Value of the first property, in document order, whose upper-cased key ends in `suffix`
pub fn property_by_suffix(feature: &Feature, suffix: &str, feature_index: usize) -> Result<String> {
    let missing = || ImporterError::MissingProperty {
        suffix: suffix.to_string(),
        feature_index,
    };

    let value = feature
        .properties
        .as_ref()
        .and_then(|properties| {
            properties
                .iter()
                .find(|(key, _)| key.to_uppercase().ends_with(suffix))
        })
        .map(|(_, value)| value)
        .ok_or_else(missing)?;

    match value {
        serde_json::Value::String(text) => Ok(text.clone()),
        serde_json::Value::Null => Err(missing()),
        other => Ok(other.to_string()),
    }
}
