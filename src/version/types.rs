//! Release list types handed to the dependency resolution pipeline

use indexmap::IndexMap;
use serde::Serialize;

/// All known releases of one package
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReleaseResult {
    /// Package homepage, taken from the first release
    pub homepage: Option<String>,
    /// Source repository URL, taken from the first release
    pub source_url: Option<String>,
    /// Releases in registry order
    pub releases: Vec<Release>,
}

/// A single published version
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Release {
    /// Version without a leading `v`
    pub version: String,
    /// Version exactly as published, usable as a VCS ref
    pub git_ref: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub release_timestamp: Option<String>,
    /// Dependency name to the constraints this release requires
    #[serde(skip_serializing_if = "Option::is_none")]
    pub constraints: Option<IndexMap<String, Vec<String>>>,
}

impl ReleaseResult {
    /// Versions in registry order
    pub fn versions(&self) -> Vec<String> {
        self.releases.iter().map(|r| r.version.clone()).collect()
    }
}
