//! Error types for metaops-tagger
//!
//! Fatal errors surface through [`TagError`]. The two recoverable step
//! failures, [`MetadataReadFailure`] and [`CoverEmbedFailure`], are separate
//! types so callers can only downgrade what is meant to be downgraded.

use crate::format::ContainerFormat;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for public tagger operations
pub type TagResult<T> = std::result::Result<T, TagError>;

/// Tagger operation errors
#[derive(Debug, Error)]
pub enum TagError {
    /// Target file does not exist (checked before any I/O)
    #[error("Audio file not found: {}", .0.display())]
    NotFound(PathBuf),

    /// File extension is not one of the supported containers
    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    /// The mutation/persist sequence failed
    #[error(transparent)]
    WriteFailed(#[from] WriteFailure),
}

/// Failure reported by a container collaborator
#[derive(Debug, Error)]
pub enum ContainerError {
    /// ID3v2 parse or write error
    #[error("ID3 error: {0}")]
    Id3(#[from] id3::Error),

    /// Ogg/MP4 parse or write error
    #[error("Container error: {0}")]
    Lofty(#[from] lofty::error::LoftyError),

    /// I/O error (file open)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Unrecoverable failure while writing tags to one file
#[derive(Debug, Error)]
#[error("Failed to add metadata to {format} file: {source}")]
pub struct WriteFailure {
    pub format: ContainerFormat,
    #[source]
    pub source: ContainerError,
}

impl WriteFailure {
    pub fn new(format: ContainerFormat, source: impl Into<ContainerError>) -> Self {
        Self {
            format,
            source: source.into(),
        }
    }
}

/// Recoverable failure while reading tags (corrupt or unsupported tag data)
#[derive(Debug, Error)]
#[error("Could not extract metadata from {format} file: {source}")]
pub struct MetadataReadFailure {
    pub format: ContainerFormat,
    #[source]
    pub source: ContainerError,
}

impl MetadataReadFailure {
    pub fn new(format: ContainerFormat, source: impl Into<ContainerError>) -> Self {
        Self {
            format,
            source: source.into(),
        }
    }
}

/// Recoverable failure while preparing cover art
#[derive(Debug, Error)]
pub enum CoverEmbedFailure {
    /// Cover file could not be read
    #[error("Failed to read cover image {}: {source}", path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Cover file holds no image data
    #[error("Cover image {} is empty", path.display())]
    Empty { path: PathBuf },
}
