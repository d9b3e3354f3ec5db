//! Release retrieval layer
//!
//! Fetches Composer metadata documents and hands them to [`crate::schema`]
//! for decoding.
//!
//! # Modules
//!
//! - [`registry`]: Registry trait for fetching releases from remote sources
//! - [`registries`]: Concrete registry implementations (Packagist)
//! - [`error`]: Error types for registry operations
//! - [`types`]: `ReleaseResult` and `Release`

pub mod error;
pub mod registries;
pub mod registry;
pub mod types;
