//! Composer registry metadata schema layer
//!
//! Turns raw `serde_json::Value` documents served by a Composer registry
//! into normalized release data. Nothing in this module performs I/O.
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │  minified   │────▶│   release   │────▶│  packages   │
//! │  (expand)   │     │ (normalize) │     │ (aggregate) │
//! └─────────────┘     └─────────────┘     └─────────────┘
//! ```
//!
//! # Modules
//!
//! - [`minified`]: expands delta-encoded ("minified") version arrays
//! - [`release`]: normalizes one expanded record into a [`ComposerRelease`]
//! - [`packages`]: extracts and merges releases from `packages` documents
//! - [`registry_meta`]: defaults the registry root (`packages.json`) shape
//! - [`error`]: error type for release normalization

pub mod error;
pub mod minified;
pub mod packages;
pub mod registry_meta;
pub mod release;

pub use error::SchemaError;
pub use minified::{DecodedRecord, UNSET_MARKER, expand_minified};
pub use packages::{extract_release_result, parse_packages_response, parse_packages_responses};
pub use registry_meta::RegistryMeta;
pub use release::{ComposerRelease, ComposerSource, parse_releases};
