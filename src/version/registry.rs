//! Registry trait for fetching package releases from a Composer repository

use crate::version::error::RegistryError;
use crate::version::types::ReleaseResult;

/// Trait for fetching package releases from a registry
#[async_trait::async_trait]
pub trait Registry: Send + Sync {
    /// Fetches and merges all release metadata of a package
    ///
    /// # Arguments
    /// * `package_name` - Composer package name (e.g., "monolog/monolog")
    ///
    /// # Returns
    /// * `Ok(ReleaseResult)` - Releases in registry order
    /// * `Err(RegistryError)` - If the fetch fails or the metadata is malformed
    async fn fetch_releases(&self, package_name: &str) -> Result<ReleaseResult, RegistryError>;
}
