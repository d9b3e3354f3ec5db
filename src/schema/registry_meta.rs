//! Registry root document (`packages.json`)
//!
//! Every field falls back to an empty or `null` default when missing or of
//! the wrong type. The camelCase names are accepted as well as the Composer
//! wire names (`provider-includes`, `providers-url`, ...); the camelCase key
//! wins when both are present.

use serde::Serialize;
use serde_json::{Map, Value};

/// Placeholder Composer uses for a file's content hash in include paths
const HASH_PLACEHOLDER: &str = "%hash%";

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistryMeta {
    /// Provider include files with their hash substituted
    pub files: Vec<String>,
    /// Legacy `includes` files
    pub includes_files: Vec<String>,
    /// Inline package metadata
    pub packages: Map<String, Value>,
    /// Package name to provider file hash
    pub provider_packages: Map<String, Value>,
    pub providers_lazy_url: Option<String>,
    pub providers_url: Option<String>,
    /// Composer v2 per-package metadata URL template (`%package%`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata_url: Option<String>,
}

impl RegistryMeta {
    /// Read a registry root document, never failing
    pub fn parse(value: &Value) -> Self {
        let Some(root) = value.as_object() else {
            return Self::default();
        };

        Self {
            files: string_list(root.get("files"))
                .or_else(|| provider_include_files(root.get("provider-includes")))
                .unwrap_or_default(),
            includes_files: string_list(root.get("includesFiles"))
                .or_else(|| object_keys(root.get("includes")))
                .unwrap_or_default(),
            packages: object(root.get("packages")).unwrap_or_default(),
            provider_packages: object(root.get("providerPackages"))
                .or_else(|| provider_hashes(root.get("providers")))
                .unwrap_or_default(),
            providers_lazy_url: string(root.get("providersLazyUrl"))
                .or_else(|| string(root.get("providers-lazy-url"))),
            providers_url: string(root.get("providersUrl"))
                .or_else(|| string(root.get("providers-url"))),
            metadata_url: string(root.get("metadataUrl"))
                .or_else(|| string(root.get("metadata-url"))),
        }
    }
}

fn string(value: Option<&Value>) -> Option<String> {
    value?.as_str().map(str::to_string)
}

fn object(value: Option<&Value>) -> Option<Map<String, Value>> {
    value?.as_object().cloned()
}

fn string_list(value: Option<&Value>) -> Option<Vec<String>> {
    value?
        .as_array()?
        .iter()
        .map(|item| item.as_str().map(str::to_string))
        .collect()
}

fn object_keys(value: Option<&Value>) -> Option<Vec<String>> {
    Some(value?.as_object()?.keys().cloned().collect())
}

/// `{ "p/provider-2024$%hash%.json": { "sha256": "abc" } }` becomes
/// `["p/provider-2024$abc.json"]`
fn provider_include_files(value: Option<&Value>) -> Option<Vec<String>> {
    let includes = value?.as_object()?;
    Some(
        includes
            .iter()
            .map(|(path, entry)| match entry.get("sha256").and_then(Value::as_str) {
                Some(hash) => path.replace(HASH_PLACEHOLDER, hash),
                None => path.clone(),
            })
            .collect(),
    )
}

/// `{ "foo/bar": { "sha256": "abc" } }` becomes `{ "foo/bar": "abc" }`;
/// entries without a hash are skipped
fn provider_hashes(value: Option<&Value>) -> Option<Map<String, Value>> {
    let providers = value?.as_object()?;
    Some(
        providers
            .iter()
            .filter_map(|(name, entry)| {
                let hash = entry.get("sha256")?.as_str()?;
                Some((name.clone(), Value::String(hash.to_string())))
            })
            .collect(),
    )
}
