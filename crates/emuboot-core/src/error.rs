//! Error types for emuboot-core

use thiserror::Error;

/// Result type alias using emuboot-core's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while provisioning a package
///
/// Nothing is recovered locally: every variant ends the run with a
/// non-zero exit status.
#[derive(Error, Debug)]
pub enum Error {
    /// A required path variable is missing or empty
    #[error("Required variable is not set: {name}")]
    RequiredVariableUnset { name: String },

    /// Invalid configuration value
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// Registry request failed or returned a non-success status
    #[error("Release registry unavailable ({url}): {message}")]
    RegistryUnavailable { url: String, message: String },

    /// Registry answered with a body we cannot decode
    #[error("Invalid registry response from {url}: {message}")]
    InvalidRegistryResponse { url: String, message: String },

    /// No release asset matched the name filter
    #[error("No asset matching '{prefix}*{suffix}' in release {tag}")]
    AssetNotFound {
        tag: String,
        prefix: String,
        suffix: String,
    },

    /// Archive download failed
    #[error("Download of {url} failed: {message}")]
    DownloadFailed { url: String, message: String },

    /// Archive extraction failed
    #[error("Failed to extract {archive}: {message}")]
    ExtractionFailed { archive: String, message: String },

    /// Install directory could not be entered
    #[error("Install directory unavailable: {path}: {source}")]
    InstallDirUnavailable {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Package catalog could not be written
    #[error("Failed to write package catalog {path}: {source}")]
    CatalogWrite {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Any other filesystem operation
    #[error("Failed to {op} {path}: {source}")]
    Filesystem {
        op: &'static str,
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    YamlParse(#[from] serde_yaml_ng::Error),

    /// JSON parsing error
    #[error("JSON parsing error: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// Template rendering error
    #[error("Template error: {0}")]
    Template(String),
}

impl Error {
    /// Create a required variable error
    pub fn required_variable(name: impl Into<String>) -> Self {
        Self::RequiredVariableUnset { name: name.into() }
    }

    /// Create an invalid config error
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Create a registry unavailable error
    pub fn registry_unavailable(url: impl Into<String>, message: impl ToString) -> Self {
        Self::RegistryUnavailable {
            url: url.into(),
            message: message.to_string(),
        }
    }

    /// Create an invalid registry response error
    pub fn invalid_registry_response(url: impl Into<String>, message: impl ToString) -> Self {
        Self::InvalidRegistryResponse {
            url: url.into(),
            message: message.to_string(),
        }
    }

    /// Create a download failure error
    pub fn download_failed(url: impl Into<String>, message: impl ToString) -> Self {
        Self::DownloadFailed {
            url: url.into(),
            message: message.to_string(),
        }
    }

    /// Create an extraction failure error
    pub fn extraction_failed(archive: impl Into<String>, message: impl ToString) -> Self {
        Self::ExtractionFailed {
            archive: archive.into(),
            message: message.to_string(),
        }
    }

    /// Create an install directory error
    pub fn install_dir_unavailable(path: impl Into<String>, source: std::io::Error) -> Self {
        Self::InstallDirUnavailable {
            path: path.into(),
            source,
        }
    }

    /// Wrap an I/O error with the operation and path it came from
    pub fn fs(op: &'static str, path: impl ToString, source: std::io::Error) -> Self {
        Self::Filesystem {
            op,
            path: path.to_string(),
            source,
        }
    }
}
