//! Public tagging operations
//!
//! [`Tagger`] carries the write settings; the free functions use defaults.
//! Dispatch is by file extension only (see [`ContainerFormat::from_path`]).

use crate::adapters::WriteReport;
use crate::cover::StoredCover;
use crate::error::{TagError, TagResult};
use crate::format::ContainerFormat;
use crate::types::{ExtractedMetadata, MetadataRecord};
use metaops_common::config::TomlConfig;
use std::path::Path;
use tracing::{debug, info, warn};

/// Settings applied to every write
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaggerSettings {
    /// ID3v2 revision written to MP3 files
    pub id3_version: id3::Version,
}

impl Default for TaggerSettings {
    fn default() -> Self {
        Self {
            id3_version: id3::Version::Id3v24,
        }
    }
}

impl TaggerSettings {
    /// Map the `[tagger]` config section
    pub fn from_config(config: &TomlConfig) -> metaops_common::Result<Self> {
        let id3_version = match config.tagger.id3_version.trim() {
            "2.4" => id3::Version::Id3v24,
            "2.3" => id3::Version::Id3v23,
            other => {
                return Err(metaops_common::Error::Config(format!(
                    "Unsupported tagger.id3_version '{}' (expected \"2.4\" or \"2.3\")",
                    other
                )))
            }
        };
        Ok(Self { id3_version })
    }
}

/// Tag reader/writer
#[derive(Debug, Clone, Default)]
pub struct Tagger {
    settings: TaggerSettings,
}

impl Tagger {
    /// Create a tagger with default settings
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(settings: TaggerSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &TaggerSettings {
        &self.settings
    }

    /// Read descriptive metadata.
    ///
    /// Only a missing file is an error. Unsupported extensions and
    /// unreadable tags produce a warning and the empty record.
    pub fn extract_metadata(&self, path: &Path) -> TagResult<ExtractedMetadata> {
        ensure_exists(path)?;

        let Some(format) = ContainerFormat::from_path(path) else {
            warn!(
                file = %path.display(),
                extension = %ContainerFormat::extension_label(path),
                "Unsupported file format, returning empty metadata"
            );
            return Ok(ExtractedMetadata::default());
        };

        match format.adapter().read(path) {
            Ok(meta) => {
                debug!(
                    file = %path.display(),
                    format = %format,
                    title = %meta.title,
                    artist = %meta.artist,
                    "Extracted metadata"
                );
                Ok(meta)
            }
            Err(e) => {
                warn!(file = %path.display(), error = %e, "Returning empty metadata");
                Ok(ExtractedMetadata::default())
            }
        }
    }

    /// Write a record into the file's tags and persist it.
    ///
    /// The target is checked before anything is opened: a missing file is
    /// [`TagError::NotFound`], an unknown extension
    /// [`TagError::UnsupportedFormat`]. A failed cover does not fail the
    /// call; see [`WriteReport::cover`].
    pub fn add_metadata(&self, path: &Path, record: &MetadataRecord) -> TagResult<WriteReport> {
        ensure_exists(path)?;

        let format = ContainerFormat::from_path(path)
            .ok_or_else(|| TagError::UnsupportedFormat(ContainerFormat::extension_label(path)))?;

        let report = format.adapter().write(path, record, &self.settings)?;

        info!(
            file = %path.display(),
            format = %format,
            fields = report.fields.len(),
            cover = report.cover.is_embedded(),
            "Added metadata"
        );
        Ok(report)
    }

    /// Read the stored front cover, if any.
    ///
    /// Unsupported or unreadable files yield `None` with a warning.
    pub fn extract_cover(&self, path: &Path) -> TagResult<Option<StoredCover>> {
        ensure_exists(path)?;

        let Some(format) = ContainerFormat::from_path(path) else {
            warn!(file = %path.display(), "Unsupported file format, no cover");
            return Ok(None);
        };

        match format.adapter().read_cover(path) {
            Ok(cover) => Ok(cover),
            Err(e) => {
                warn!(file = %path.display(), error = %e, "Could not read cover art");
                Ok(None)
            }
        }
    }

    /// Extract metadata from multiple files
    pub fn extract_batch(
        &self,
        paths: &[impl AsRef<Path>],
    ) -> Vec<TagResult<ExtractedMetadata>> {
        paths
            .iter()
            .map(|path| self.extract_metadata(path.as_ref()))
            .collect()
    }
}

fn ensure_exists(path: &Path) -> TagResult<()> {
    if path.exists() {
        Ok(())
    } else {
        Err(TagError::NotFound(path.to_path_buf()))
    }
}

/// [`Tagger::extract_metadata`] with default settings
pub fn extract_metadata(path: &Path) -> TagResult<ExtractedMetadata> {
    Tagger::new().extract_metadata(path)
}

/// [`Tagger::add_metadata`] with default settings
pub fn add_metadata(path: &Path, record: &MetadataRecord) -> TagResult<WriteReport> {
    Tagger::new().add_metadata(path, record)
}

/// [`Tagger::extract_cover`] with default settings
pub fn extract_cover(path: &Path) -> TagResult<Option<StoredCover>> {
    Tagger::new().extract_cover(path)
}

/// [`Tagger::extract_batch`] with default settings
pub fn extract_batch(paths: &[impl AsRef<Path>]) -> Vec<TagResult<ExtractedMetadata>> {
    Tagger::new().extract_batch(paths)
}
