//! Error types for the fallible edges of the crate.
//!
//! The editor core itself never fails: stale ids and malformed tokens degrade
//! to no-ops or plain text. These types cover layout queries, configuration,
//! settings storage and the rewrite service.

use std::path::PathBuf;

use crate::editable::SegmentId;

/// Layout query failures. Callers fall back to the segment bounding box.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GeometryError {
    /// The segment has no rendered node (removed or not yet laid out)
    #[error("segment {0} is not rendered")]
    Detached(SegmentId),

    /// The offset lies outside the rendered text
    #[error("offset {offset} out of range for segment {id} (length {len})")]
    OffsetOutOfRange {
        id: SegmentId,
        offset: usize,
        len: usize,
    },
}

/// Configuration load/save failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("no config directory available")]
    NoConfigDir,

    #[error("failed to access config at '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config at '{path}': {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("failed to serialize config: {0}")]
    Serialize(#[source] serde_yaml::Error),
}

/// Settings store failures.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("failed to access settings at '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("settings file '{path}' is malformed: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Failures of the hosted rewrite service.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RewriteError {
    #[error("nothing to rewrite")]
    EmptyInput,

    #[error("no API key configured for provider '{0}'")]
    MissingApiKey(String),

    #[error("rewrite provider failed: {0}")]
    Provider(String),
}
