//! Data models for imported subjects and observations
//!
//! This module contains the common target schema every importer maps onto:
//! providers, subject types, subjects with optional geometry, attributes,
//! and the two kinds of facts (timed numeric values and fixed string values).

use crate::constants::SUBJECT_SRID;
use crate::error::{ImporterError, Result};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

// =============================================================================
// Providers and Subject Types
// =============================================================================

/// Publisher of one or more datasources
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Provider {
    /// Reverse-domain label, e.g. "uk.gov.ons"
    pub label: String,

    /// Human-readable name
    pub name: String,
}

impl Provider {
    pub fn new(label: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            name: name.into(),
        }
    }
}

/// Key identifying a subject type: (provider label, subject type label)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SubjectTypeKey {
    pub provider_label: String,
    pub label: String,
}

impl std::fmt::Display for SubjectTypeKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.provider_label, self.label)
    }
}

/// Named category of subjects owned by a provider
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SubjectType {
    pub provider_label: String,
    pub label: String,
    pub name: String,
}

impl SubjectType {
    pub fn new(provider: &Provider, label: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            provider_label: provider.label.clone(),
            label: label.into(),
            name: name.into(),
        }
    }

    pub fn key(&self) -> SubjectTypeKey {
        SubjectTypeKey {
            provider_label: self.provider_label.clone(),
            label: self.label.clone(),
        }
    }
}

// =============================================================================
// Subjects
// =============================================================================

/// Geometry tagged with the spatial reference it is expressed in
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpatialGeometry {
    pub srid: u32,
    pub geometry: geojson::Geometry,
}

impl SpatialGeometry {
    /// Tag a geometry with the SRID used for all stored subjects
    pub fn with_subject_srid(geometry: geojson::Geometry) -> Self {
        Self {
            srid: SUBJECT_SRID,
            geometry,
        }
    }

    /// GeoJSON type name of the wrapped geometry ("Point", "Polygon", ...)
    pub fn kind(&self) -> &'static str {
        use geojson::Value;
        match &self.geometry.value {
            Value::Point(_) => "Point",
            Value::MultiPoint(_) => "MultiPoint",
            Value::LineString(_) => "LineString",
            Value::MultiLineString(_) => "MultiLineString",
            Value::Polygon(_) => "Polygon",
            Value::MultiPolygon(_) => "MultiPolygon",
            Value::GeometryCollection(_) => "GeometryCollection",
        }
    }

    /// Serialize the geometry as a GeoJSON string
    pub fn to_geojson_string(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.geometry)?)
    }
}

/// Key identifying a subject: its subject type plus its label
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SubjectKey {
    pub subject_type: SubjectTypeKey,
    pub label: String,
}

impl std::fmt::Display for SubjectKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.subject_type, self.label)
    }
}

/// Geographic or conceptual entity observations are attached to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subject {
    pub subject_type: SubjectTypeKey,

    /// Unique within the subject type (e.g. "E01000001")
    pub label: String,

    /// Display name (e.g. "City of London 001A")
    pub name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub geometry: Option<SpatialGeometry>,
}

impl Subject {
    pub fn new(subject_type: &SubjectType, label: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            subject_type: subject_type.key(),
            label: label.into(),
            name: name.into(),
            geometry: None,
        }
    }

    pub fn with_geometry(mut self, geometry: SpatialGeometry) -> Self {
        self.geometry = Some(geometry);
        self
    }

    pub fn key(&self) -> SubjectKey {
        SubjectKey {
            subject_type: self.subject_type.clone(),
            label: self.label.clone(),
        }
    }
}

// =============================================================================
// Attributes and Values
// =============================================================================

/// Key identifying an attribute: (provider label, attribute label)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AttributeKey {
    pub provider_label: String,
    pub label: String,
}

impl std::fmt::Display for AttributeKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.provider_label, self.label)
    }
}

/// Provider-scoped observation dimension
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    pub provider_label: String,
    pub label: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
}

impl Attribute {
    pub fn new(provider: &Provider, label: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            provider_label: provider.label.clone(),
            label: label.into(),
            description: description.into(),
            unit: None,
        }
    }

    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self
    }

    pub fn key(&self) -> AttributeKey {
        AttributeKey {
            provider_label: self.provider_label.clone(),
            label: self.label.clone(),
        }
    }
}

/// Numeric fact for a subject and attribute at a point in time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimedValue {
    pub subject: SubjectKey,
    pub attribute: AttributeKey,
    pub timestamp: NaiveDateTime,
    pub value: f64,
}

/// Non-temporal string fact for a subject and attribute
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixedValue {
    pub subject: SubjectKey,
    pub attribute: AttributeKey,
    pub value: String,
}

// =============================================================================
// Datasource Descriptors
// =============================================================================

/// Everything an importer declares about one of its datasources
///
/// Callers use the descriptor to predeclare subject types and attributes
/// before any values are written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Datasource {
    pub id: String,
    pub name: String,
    pub description: String,
    pub provider: Provider,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub subject_types: Vec<SubjectType>,
    pub timed_value_attributes: Vec<Attribute>,
    pub fixed_value_attributes: Vec<Attribute>,
}

impl Datasource {
    pub fn new(
        id: impl Into<String>,
        provider: &Provider,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: description.into(),
            provider: provider.clone(),
            url: None,
            subject_types: Vec::new(),
            timed_value_attributes: Vec::new(),
            fixed_value_attributes: Vec::new(),
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn with_subject_type(mut self, subject_type: SubjectType) -> Self {
        self.subject_types.push(subject_type);
        self
    }

    pub fn with_timed_value_attributes(mut self, attributes: Vec<Attribute>) -> Self {
        self.timed_value_attributes = attributes;
        self
    }

    pub fn with_fixed_value_attributes(mut self, attributes: Vec<Attribute>) -> Self {
        self.fixed_value_attributes = attributes;
        self
    }

    /// The single subject type this datasource produces or refers to
    pub fn unique_subject_type(&self) -> Result<&SubjectType> {
        match self.subject_types.as_slice() {
            [subject_type] => Ok(subject_type),
            other => Err(ImporterError::AmbiguousSubjectType {
                datasource_id: self.id.clone(),
                count: other.len(),
            }),
        }
    }

    /// All declared attributes, timed first
    pub fn attributes(&self) -> impl Iterator<Item = &Attribute> {
        self.timed_value_attributes
            .iter()
            .chain(self.fixed_value_attributes.iter())
    }

    pub fn timed_value_attribute(&self, label: &str) -> Option<&Attribute> {
        self.timed_value_attributes.iter().find(|a| a.label == label)
    }

    /// Summary used by catalog listings
    pub fn describe(&self) -> DatasourceDescription {
        DatasourceDescription {
            datasource_id: self.id.clone(),
            provider_label: self.provider.label.clone(),
            subject_type_labels: self.subject_types.iter().map(|st| st.label.clone()).collect(),
            attributes: self.attributes().map(|a| a.label.clone()).collect(),
        }
    }
}

/// Catalog view of a datasource
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasourceDescription {
    pub datasource_id: String,
    pub provider_label: String,
    pub subject_type_labels: Vec<String>,
    pub attributes: Vec<String>,
}
