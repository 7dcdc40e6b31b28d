//! # emuboot-core
//!
//! Core library for emuboot providing:
//! - Layered configuration (embedded defaults, user file, environment, flags)
//! - The resolved, immutable [`SetupConfig`] every stage receives
//! - Shared types for packages, releases and asset filters
//! - The installed-version catalog

pub mod catalog;
pub mod config;
pub mod error;
pub mod types;

pub use catalog::{FileVersionStore, InMemoryVersionStore, VersionStore};
pub use config::{ConfigLoader, ConfigOverrides, Settings, SetupConfig};
pub use error::{Error, Result};
pub use types::{
    AssetFilter, EnsureOutcome, EnsureReport, PackageDescriptor, ReleaseMetadata, SystemEntry,
};
