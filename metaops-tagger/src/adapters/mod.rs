//! Container adapters
//!
//! Each adapter owns one container's key vocabulary. The shared part of the
//! write sequence (artist reconciliation, year normalization, skipping
//! absent fields) happens once in [`FieldPlan::from_record`]; adapters only
//! translate the planned values into their own keys.

pub mod id3;
pub mod mp4;
pub mod opus;

use crate::cover::{CoverArt, CoverMime, StoredCover};
use crate::error::{CoverEmbedFailure, MetadataReadFailure, WriteFailure};
use crate::format::ContainerFormat;
use crate::normalize::{normalize_year, reconcile_artist};
use crate::tagger::TaggerSettings;
use crate::types::{present, ExtractedMetadata, Field, MetadataRecord};
use lofty::config::{ParseOptions, ParsingMode};
use std::path::Path;
use tracing::{debug, warn};

/// Capability interface implemented once per container
pub trait MetadataAdapter: Send + Sync {
    /// Container handled by this adapter
    fn format(&self) -> ContainerFormat;

    /// Read the supported fields. Absent keys stay empty.
    fn read(&self, path: &Path) -> Result<ExtractedMetadata, MetadataReadFailure>;

    /// Read the stored front cover (or first picture), if any
    fn read_cover(&self, path: &Path) -> Result<Option<StoredCover>, MetadataReadFailure>;

    /// Apply a record and persist it.
    ///
    /// Cover art problems are reported in [`WriteReport::cover`] and never
    /// fail the write.
    fn write(
        &self,
        path: &Path,
        record: &MetadataRecord,
        settings: &TaggerSettings,
    ) -> Result<WriteReport, WriteFailure>;
}

/// Summary of one successful write
#[derive(Debug)]
pub struct WriteReport {
    pub format: ContainerFormat,
    /// Logical fields stored, in write order
    pub fields: Vec<Field>,
    pub cover: CoverOutcome,
}

impl WriteReport {
    pub fn wrote(&self, field: Field) -> bool {
        self.fields.contains(&field)
    }
}

/// What happened to the requested cover
#[derive(Debug)]
pub enum CoverOutcome {
    /// No cover path in the record
    NotRequested,
    /// Front cover stored with this MIME type
    Embedded(CoverMime),
    /// Cover could not be prepared; the rest of the write went ahead
    Skipped(CoverEmbedFailure),
}

impl CoverOutcome {
    pub fn is_embedded(&self) -> bool {
        matches!(self, CoverOutcome::Embedded(_))
    }
}

/// Values to write, after normalization, in write order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldPlan {
    entries: Vec<(Field, String)>,
}

impl FieldPlan {
    pub fn from_record(record: &MetadataRecord, format: ContainerFormat) -> Self {
        let mut entries = Vec::new();

        if let Some(title) = present(&record.title) {
            entries.push((Field::Title, title.to_string()));
        }
        if let Some(album) = present(&record.album) {
            entries.push((Field::Album, album.to_string()));
        }

        debug!(
            format = %format,
            artist = %record.artist,
            album_artist = ?record.album_artist,
            "Processing artist"
        );

        // Album artist comes from the unsplit string, so it is planned first
        let reconciled = reconcile_artist(&record.artist, record.album_artist.as_deref());
        if let Some(album_artist) = reconciled.album_artist {
            debug!(format = %format, album_artist = %album_artist, "Setting album artist");
            entries.push((Field::AlbumArtist, album_artist));
        }
        if !reconciled.artist.is_empty() {
            debug!(format = %format, artist = %reconciled.artist, "Setting artist");
            entries.push((Field::Artist, reconciled.artist));
        }

        if let Some(date) = present(&record.date) {
            entries.push((Field::Date, normalize_year(date)));
        }

        let rest = [
            (Field::Genre, &record.genre),
            (Field::TrackNumber, &record.track_number),
            (Field::TotalTracks, &record.total_tracks),
            (Field::DiscNumber, &record.disc_number),
            (Field::TotalDiscs, &record.total_discs),
            (Field::Composer, &record.composer),
            (Field::Performer, &record.performer),
        ];
        for (field, value) in rest {
            if let Some(value) = present(value) {
                entries.push((field, value.to_string()));
            }
        }

        Self { entries }
    }

    pub fn get(&self, field: Field) -> Option<&str> {
        self.entries
            .iter()
            .find(|(f, _)| *f == field)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, &str)> {
        self.entries.iter().map(|(f, v)| (*f, v.as_str()))
    }
}

/// Load the record's cover, downgrading failures to a warning.
///
/// `Ok(None)`: no cover requested. `Err`: requested but unusable.
pub(crate) fn prepare_cover(
    record: &MetadataRecord,
    format: ContainerFormat,
) -> Result<Option<CoverArt>, CoverEmbedFailure> {
    let Some(cover_path) = record.cover_path.as_deref() else {
        return Ok(None);
    };

    CoverArt::load(cover_path).map(Some).map_err(|e| {
        warn!(format = %format, error = %e, "Failed to add cover art, continuing without it");
        e
    })
}

/// Parse options for container reads; audio properties are never needed
pub(crate) fn parse_options() -> ParseOptions {
    ParseOptions::new()
        .read_properties(false)
        .parsing_mode(ParsingMode::BestAttempt)
}

/// Store a value in an [`ExtractedMetadata`] slot, normalizing dates
pub(crate) fn fill(meta: &mut ExtractedMetadata, field: Field, value: Option<String>) {
    let Some(value) = value.filter(|v| !v.is_empty()) else {
        return;
    };
    *meta.slot_mut(field) = match field {
        Field::Date => normalize_year(&value),
        _ => value,
    };
}
