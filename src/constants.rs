//! Application constants for the geodata importers
//!
//! This module contains the static catalogs used by the importers:
//! providers, remote source URLs, subject type names and the spatial
//! reference every stored geometry is tagged with.

// =============================================================================
// Spatial reference
// =============================================================================

/// SRID attached to every stored subject geometry (WGS 84)
pub const SUBJECT_SRID: u32 = 4326;

// =============================================================================
// Providers
// =============================================================================

/// Office for National Statistics provider label and name
pub const ONS_PROVIDER_LABEL: &str = "uk.gov.ons";
pub const ONS_PROVIDER_NAME: &str = "Office for National Statistics";

/// Space Syntax provider label and name
pub const SPACE_SYNTAX_PROVIDER_LABEL: &str = "com.spacesyntax";
pub const SPACE_SYNTAX_PROVIDER_NAME: &str = "Space Syntax";

// =============================================================================
// Importer names (CLI)
// =============================================================================

pub const ONS_BOUNDARIES_IMPORTER: &str = "ons-boundaries";
pub const ONS_EMPLOYMENT_IMPORTER: &str = "ons-employment";
pub const SPACE_SYNTAX_IMPORTER: &str = "space-syntax";

/// All importer names in the order they should run
pub const IMPORTER_NAMES: &[&str] = &[
    ONS_BOUNDARIES_IMPORTER,
    ONS_EMPLOYMENT_IMPORTER,
    SPACE_SYNTAX_IMPORTER,
];

// =============================================================================
// ONS boundary datasets
// =============================================================================

/// Subject type labels shared between the boundary and employment importers
pub const LSOA_SUBJECT_TYPE: &str = "lsoa";
pub const MSOA_SUBJECT_TYPE: &str = "msoa";
pub const LOCAL_AUTHORITY_SUBJECT_TYPE: &str = "localAuthority";

/// Lower Layer Super Output Area boundaries
pub const LSOA_BOUNDARIES_URL: &str =
    "https://geoportal.statistics.gov.uk/datasets/da831f80764346889837c72508f046fa_2.geojson";

/// Middle Layer Super Output Area boundaries
pub const MSOA_BOUNDARIES_URL: &str =
    "https://geoportal.statistics.gov.uk/datasets/826dc85fb600440889480f4d9dbb1a24_2.geojson";

/// Local authority district boundaries
pub const LOCAL_AUTHORITY_BOUNDARIES_URL: &str =
    "https://geoportal.statistics.gov.uk/datasets/3943c2114d764294a7c0079c4020d558_4.geojson";

/// Property name suffixes used to locate label and name on boundary features
pub const FEATURE_LABEL_SUFFIX: &str = "CD";
pub const FEATURE_NAME_SUFFIX: &str = "NM";

// =============================================================================
// Nomisweb employment datasets
// =============================================================================

/// Column names of Nomis CSV extracts (headers are upper case)
pub mod nomis_columns {
    pub const DATE_NAME: &str = "DATE_NAME";
    pub const GEOGRAPHY_NAME: &str = "GEOGRAPHY_NAME";
    pub const GEOGRAPHY_CODE: &str = "GEOGRAPHY_CODE";
    pub const OBS_VALUE: &str = "OBS_VALUE";
}

pub const CLAIMANTS_COUNT_URL: &str = "https://www.nomisweb.co.uk/api/v01/dataset/NM_162_1.data.csv?\
    geography=1249902593...1249937345&date=latest&gender=0&age=0&measure=1&measures=20100&\
    select=date_name,geography_name,geography_code,gender_name,age_name,measure_name,measures_name,obs_value,obs_status_name";

pub const JSA_CLAIMANTS_COUNT_URL: &str = "https://www.nomisweb.co.uk/api/v01/dataset/NM_18_1.data.csv?\
    geography=TYPE463&date=latest&sex=7&age=0&duration=0&measures=20100&\
    select=date_name,geography_name,geography_code,measures_name,duration_name,sex_name,obs_value,obs_status_name";

pub const JSA_CLAIMANTS_PROPORTION_URL: &str = "https://www.nomisweb.co.uk/api/v01/dataset/NM_18_1.data.csv?\
    geography=TYPE463&date=latest&sex=7&age=0&duration=0&measures=20206&\
    select=date_name,geography_name,geography_code,measures_name,duration_name,sex_name,obs_value,obs_status_name";

pub const ESA_CLAIMANTS_URL: &str = "https://www.nomisweb.co.uk/api/v01/dataset/NM_134_1.data.csv?\
    geography=TYPE463&date=latest&sex=7&age=0&esa_phase=0&payment_type=0&icdgp_condition=0&\
    duration=0&ethnic_group=0&measures=20100&\
    select=date_name,geography_name,geography_code,measures_name,duration_name,sex_name,obs_value,obs_status_name";

pub const APS_EMPLOYMENT_RATE_URL: &str = "https://www.nomisweb.co.uk/api/v01/dataset/NM_17_5.data.csv?\
    geography=TYPE463&date=latest&variable=45&measures=20599&\
    select=date_name,geography_name,geography_code,variable_name,measures_name,obs_value,obs_status_name";

pub const APS_UNEMPLOYMENT_RATE_URL: &str = "https://www.nomisweb.co.uk/api/v01/dataset/NM_17_5.data.csv?\
    geography=TYPE463&date=latest&variable=83&measures=20599&\
    select=date_name,geography_name,geography_code,variable_name,measures_name,obs_value,obs_status_name";

pub const ONS_JOBS_DENSITY_URL: &str = "https://www.nomisweb.co.uk/api/v01/dataset/NM_57_1.data.csv?\
    geography=TYPE463&date=latest&item=3&measures=20100&\
    select=date_name,geography_name,geography_code,item_name,measures_name,obs_value,obs_status_name";

pub const ONS_TOTAL_JOBS_URL: &str = "https://www.nomisweb.co.uk/api/v01/dataset/NM_57_1.data.csv?\
    geography=TYPE463&date=latest&item=1&measures=20100&\
    select=date_name,geography_name,geography_code,item_name,measures_name,obs_value,obs_status_name";

pub const ONS_GROSS_ANNUAL_INCOME_URL: &str = "https://www.nomisweb.co.uk/api/v01/dataset/NM_30_1.data.csv?\
    geography=TYPE463&date=latest&sex=8&item=2&pay=7&measures=20100&\
    select=date_name,geography_name,geography_code,sex_name,pay_name,item_name,measures_name,obs_value,obs_status_name";

// =============================================================================
// Space Syntax OpenMapping
// =============================================================================

pub const SPACE_SYNTAX_DATASOURCE: &str = "SpaceSyntaxOpenMapping";
pub const SPACE_SYNTAX_SUBJECT_TYPE: &str = "space_syntax";
pub const SPACE_SYNTAX_ARCHIVE_URL: &str =
    "https://www.spacesyntax.online/downloads/ssx_openmapping_gb_v1_csv.zip";

/// Column holding the street segment identifier
pub const SPACE_SYNTAX_ID_COLUMN: &str = "id";

/// Numeric segment measures stored as timed values: (column, description)
pub const SPACE_SYNTAX_NUMERIC_COLUMNS: &[(&str, &str)] = &[
    ("choice2km", "Angular choice, 2km radius"),
    ("choice2kmrank", "Rank of angular choice, 2km radius"),
    ("choice2kmlog", "Log of angular choice, 2km radius"),
    ("choice10km", "Angular choice, 10km radius"),
    ("choice10kmrank", "Rank of angular choice, 10km radius"),
    ("choice10kmlog", "Log of angular choice, 10km radius"),
    ("choice100km", "Angular choice, 100km radius"),
    ("choice100kmrank", "Rank of angular choice, 100km radius"),
    ("choice100kmlog", "Log of angular choice, 100km radius"),
    ("nodecount2km", "Segments reachable within 2km"),
    ("nodecount10km", "Segments reachable within 10km"),
    ("nodecount100km", "Segments reachable within 100km"),
    ("integration2km", "Angular integration, 2km radius"),
    ("integration10km", "Angular integration, 10km radius"),
    ("integration100km", "Angular integration, 100km radius"),
];

/// Categorical Meridian 2 road attributes stored as fixed values: (column, description)
pub const SPACE_SYNTAX_STRING_COLUMNS: &[(&str, &str)] = &[
    ("meridian_id", "Meridian 2 road identifier"),
    ("meridian_gid", "Meridian 2 global identifier"),
    ("meridian_code", "Meridian 2 feature code"),
    ("meridian_osodr", "Ordnance Survey road reference"),
    ("meridian_number", "Road number"),
    ("meridian_road_name", "Road name"),
    ("meridian_indicator", "Meridian 2 road indicator"),
    ("meridian_class", "Road class"),
    ("meridian_class_scale", "Road class scale"),
];

// =============================================================================
// Download cache
// =============================================================================

/// Directory name under the platform cache directory
pub const CACHE_DIR_NAME: &str = "geodata-importer";

/// Environment variable overriding the cache directory
pub const CACHE_DIR_ENV: &str = "GEODATA_IMPORTER_CACHE";

/// Default HTTP timeout for downloads
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 300;

/// Maximum number of skip reasons kept in import statistics
pub const MAX_RECORDED_SKIPS: usize = 100;
