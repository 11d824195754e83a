//! Error types surfaced by the conversion pipeline.
//!
//! Only [`ConvertError`] aborts a run. Per-item problems are recovered locally
//! and reported as [`Warning`](crate::Warning)s instead.

use std::path::PathBuf;

use thiserror::Error;

/// Fatal conversion failures.
#[derive(Debug, Error)]
pub enum ConvertError {
    /// A required input document was not supplied; nothing was processed.
    #[error("required input missing: {0}")]
    ConfigMissing(&'static str),
    /// The output sink rejected a clip. Remaining clips were not emitted.
    #[error("sink rejected clip '{clip}': {source}")]
    Sink {
        clip: String,
        #[source]
        source: SinkError,
    },
}

/// Atlas lookups.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AtlasError {
    #[error("no atlas slice named '{0}'")]
    MissingSlice(String),
}

/// Failures while deserializing export or atlas JSON into documents.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("export json parse error: {0}")]
    Export(#[source] serde_json::Error),
    #[error("atlas json parse error: {0}")]
    Atlas(#[source] serde_json::Error),
}

/// Errors produced by [`ClipSink`](crate::ClipSink) implementations.
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("serialize clip: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("{0}")]
    Rejected(String),
}
