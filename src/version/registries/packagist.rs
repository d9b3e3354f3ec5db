//! Packagist (Composer v2) registry implementation

use futures::future::join;
use serde_json::Value;
use tracing::{debug, warn};

use crate::schema::packages::parse_packages_responses;
use crate::schema::registry_meta::RegistryMeta;
use crate::version::error::RegistryError;
use crate::version::registry::Registry;
use crate::version::types::ReleaseResult;

/// Default base URL for the Packagist repository
pub const DEFAULT_BASE_URL: &str = "https://repo.packagist.org";

/// Metadata URL template used when the registry root does not announce one
const DEFAULT_METADATA_URL: &str = "/p2/%package%.json";

const PACKAGE_PLACEHOLDER: &str = "%package%";

/// Registry implementation for Composer v2 repositories
#[derive(Clone)]
pub struct PackagistRegistry {
    client: reqwest::Client,
    base_url: String,
    include_dev: bool,
}

impl PackagistRegistry {
    /// Creates a new PackagistRegistry with a custom base URL
    pub fn new(base_url: &str) -> Self {
        Self {
            client: reqwest::Client::builder()
                .user_agent("packagist-meta")
                .build()
                .expect("Failed to create HTTP client"),
            base_url: base_url.trim_end_matches('/').to_string(),
            include_dev: true,
        }
    }

    /// Whether `~dev` metadata (branches) is fetched alongside tagged releases
    pub fn with_dev(mut self, include_dev: bool) -> Self {
        self.include_dev = include_dev;
        self
    }

    /// GET a JSON document, `None` on 404
    async fn fetch_document(&self, url: &str) -> Result<Option<Value>, RegistryError> {
        debug!("Fetching Composer metadata: {}", url);

        let response = self.client.get(url).send().await?;

        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }

        if !status.is_success() {
            warn!("Packagist returned status {}: {}", status, url);
            return Err(RegistryError::InvalidResponse(format!(
                "Unexpected status: {}",
                status
            )));
        }

        let document = response.json().await.map_err(|e| {
            warn!("Failed to parse Packagist response: {}", e);
            RegistryError::InvalidResponse(e.to_string())
        })?;

        Ok(Some(document))
    }

    /// Metadata URL template announced by `packages.json`
    async fn metadata_url_template(&self) -> String {
        let url = format!("{}/packages.json", self.base_url);

        let announced = match self.fetch_document(&url).await {
            Ok(Some(root)) => RegistryMeta::parse(&root).metadata_url,
            Ok(None) => None,
            Err(e) => {
                warn!("Failed to read registry root {}: {}", url, e);
                None
            }
        };

        announced.unwrap_or_else(|| DEFAULT_METADATA_URL.to_string())
    }

    fn metadata_url(&self, template: &str, package_name: &str) -> String {
        let path = template.replace(PACKAGE_PLACEHOLDER, package_name);
        if path.starts_with("http://") || path.starts_with("https://") {
            path
        } else {
            format!("{}/{}", self.base_url, path.trim_start_matches('/'))
        }
    }
}

impl Default for PackagistRegistry {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

#[async_trait::async_trait]
impl Registry for PackagistRegistry {
    async fn fetch_releases(&self, package_name: &str) -> Result<ReleaseResult, RegistryError> {
        // Composer package names are case-insensitive and served lowercase
        let package_name = package_name.to_lowercase();
        let template = self.metadata_url_template().await;

        let stable_url = self.metadata_url(&template, &package_name);
        let dev_url = self.metadata_url(&template, &format!("{}~dev", package_name));

        let (stable, dev) = if self.include_dev {
            let (stable, dev) = join(
                self.fetch_document(&stable_url),
                self.fetch_document(&dev_url),
            )
            .await;
            (stable?, dev?)
        } else {
            (self.fetch_document(&stable_url).await?, None)
        };

        let Some(stable) = stable else {
            return Err(RegistryError::NotFound(package_name));
        };

        let documents: Vec<Value> = std::iter::once(stable).chain(dev).collect();

        let result = parse_packages_responses(&package_name, &documents).ok_or_else(|| {
            warn!("Malformed Composer metadata for {}", package_name);
            RegistryError::InvalidResponse(format!(
                "No valid release metadata for {}",
                package_name
            ))
        })?;

        debug!(
            "Found {} releases for package {}",
            result.releases.len(),
            package_name
        );

        Ok(result)
    }
}
