//! Normalization of expanded version records into [`ComposerRelease`]

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::debug;

use crate::schema::error::SchemaError;
use crate::schema::minified::{DecodedRecord, expand_minified};

/// Composer's implicit package type
pub const DEFAULT_PACKAGE_TYPE: &str = "library";

/// The `source` object of a release, kept as served
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ComposerSource(Map<String, Value>);

impl ComposerSource {
    /// Repository URL, when the registry provided one as a string
    pub fn url(&self) -> Option<&str> {
        self.0.get("url").and_then(Value::as_str)
    }

    /// VCS type (`git`, `hg`, ...)
    pub fn kind(&self) -> Option<&str> {
        self.0.get("type").and_then(Value::as_str)
    }

    /// Commit or tag the release was built from
    pub fn reference(&self) -> Option<&str> {
        self.0.get("reference").and_then(Value::as_str)
    }
}

/// One normalized package version
///
/// `homepage` and `source` distinguish "not provided" (`None`) from
/// "provided but unusable" (`Some(None)`), which serializes as `null`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComposerRelease {
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version_normalized: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub package_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub license: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub homepage: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<Option<ComposerSource>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub require: Option<IndexMap<String, String>>,
    /// Fields without dedicated handling (`scripts`, `dist`, `autoload`, ...)
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ComposerRelease {
    /// Normalize an arbitrary JSON value
    pub fn parse(value: &Value) -> Result<Self, SchemaError> {
        match value {
            Value::Object(record) => Self::from_record(record.clone()),
            _ => Err(SchemaError::NotAnObject),
        }
    }

    /// Normalize one expanded record
    ///
    /// Only a missing or non-string `version` is rejected. Malformed
    /// optional fields are coerced to their absent or null form.
    pub fn from_record(mut record: DecodedRecord) -> Result<Self, SchemaError> {
        let version = match record.shift_remove("version") {
            Some(Value::String(version)) => version,
            _ => return Err(SchemaError::MissingVersion),
        };

        Ok(Self {
            version,
            version_normalized: record.shift_remove("version_normalized").and_then(string),
            name: record.shift_remove("name").and_then(string),
            package_type: record.shift_remove("type").and_then(string),
            license: record.shift_remove("license").and_then(license),
            homepage: record.shift_remove("homepage").map(string),
            source: record.shift_remove("source").map(source),
            time: record.shift_remove("time").and_then(string),
            require: record.shift_remove("require").and_then(require),
            extra: record,
        })
    }

    /// Package type, falling back to Composer's default
    pub fn package_type(&self) -> &str {
        self.package_type.as_deref().unwrap_or(DEFAULT_PACKAGE_TYPE)
    }

    /// Homepage if the registry provided a usable one
    pub fn homepage(&self) -> Option<&str> {
        self.homepage.as_ref()?.as_deref()
    }

    /// Source repository URL if the registry provided a usable one
    pub fn source_url(&self) -> Option<&str> {
        self.source.as_ref()?.as_ref()?.url()
    }
}

/// Expand and normalize a minified version array
///
/// Records that cannot be normalized are dropped.
pub fn parse_releases(value: &Value) -> Vec<ComposerRelease> {
    expand_minified(value)
        .into_iter()
        .filter_map(|record| match ComposerRelease::from_record(record) {
            Ok(release) => Some(release),
            Err(e) => {
                debug!("Skipping release record: {}", e);
                None
            }
        })
        .collect()
}

fn string(value: Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s),
        _ => None,
    }
}

fn source(value: Value) -> Option<ComposerSource> {
    match value {
        Value::Object(fields) => Some(ComposerSource(fields)),
        _ => None,
    }
}

fn license(value: Value) -> Option<Vec<String>> {
    match value {
        Value::String(s) => Some(vec![s]),
        Value::Array(items) => Some(items.into_iter().filter_map(string).collect()),
        _ => None,
    }
}

fn require(value: Value) -> Option<IndexMap<String, String>> {
    match value {
        Value::Object(fields) => Some(
            fields
                .into_iter()
                .filter_map(|(name, constraint)| string(constraint).map(|c| (name, c)))
                .collect(),
        ),
        // PHP encodes an empty map as `[]`
        Value::Array(items) if items.is_empty() => Some(IndexMap::new()),
        _ => None,
    }
}
