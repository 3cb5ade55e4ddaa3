//! Canonical metadata types shared by all adapters

use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

/// Logical tag fields, independent of any container vocabulary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Title,
    Artist,
    Album,
    AlbumArtist,
    Date,
    Genre,
    TrackNumber,
    TotalTracks,
    DiscNumber,
    TotalDiscs,
    Composer,
    Performer,
}

impl Field {
    pub const ALL: [Field; 12] = [
        Field::Title,
        Field::Artist,
        Field::Album,
        Field::AlbumArtist,
        Field::Date,
        Field::Genre,
        Field::TrackNumber,
        Field::TotalTracks,
        Field::DiscNumber,
        Field::TotalDiscs,
        Field::Composer,
        Field::Performer,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Field::Title => "title",
            Field::Artist => "artist",
            Field::Album => "album",
            Field::AlbumArtist => "album_artist",
            Field::Date => "date",
            Field::Genre => "genre",
            Field::TrackNumber => "track_number",
            Field::TotalTracks => "total_tracks",
            Field::DiscNumber => "disc_number",
            Field::TotalDiscs => "total_discs",
            Field::Composer => "composer",
            Field::Performer => "performer",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Canonical metadata record consumed by one write
///
/// `None` means "leave the field alone". An empty string is treated the
/// same way; writers never store blank values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetadataRecord {
    pub title: Option<String>,
    /// May hold several comma-separated names
    pub artist: String,
    pub album: Option<String>,
    /// Derived from `artist` when absent
    pub album_artist: Option<String>,
    /// Free-form; reduced to a year on write
    pub date: Option<String>,
    pub genre: Option<String>,
    /// `"N"` or `"N/M"`
    pub track_number: Option<String>,
    pub total_tracks: Option<String>,
    /// `"N"` or `"N/M"`
    pub disc_number: Option<String>,
    pub total_discs: Option<String>,
    pub composer: Option<String>,
    pub performer: Option<String>,
    /// Cover image file; MIME type follows its extension
    pub cover_path: Option<PathBuf>,
}

impl MetadataRecord {
    pub fn new(
        title: impl Into<String>,
        artist: impl Into<String>,
        album: impl Into<String>,
    ) -> Self {
        Self {
            title: Some(title.into()),
            artist: artist.into(),
            album: Some(album.into()),
            ..Self::default()
        }
    }
}

/// Metadata read back from a file
///
/// Every field defaults to the empty string when the container lacks it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExtractedMetadata {
    pub title: String,
    pub artist: String,
    pub album: String,
    pub album_artist: String,
    /// Year-normalized
    pub date: String,
    pub genre: String,
    pub track_number: String,
    pub total_tracks: String,
    pub disc_number: String,
    pub total_discs: String,
    pub composer: String,
    pub performer: String,
}

impl ExtractedMetadata {
    /// Mutable slot for a logical field
    pub fn slot_mut(&mut self, field: Field) -> &mut String {
        match field {
            Field::Title => &mut self.title,
            Field::Artist => &mut self.artist,
            Field::Album => &mut self.album,
            Field::AlbumArtist => &mut self.album_artist,
            Field::Date => &mut self.date,
            Field::Genre => &mut self.genre,
            Field::TrackNumber => &mut self.track_number,
            Field::TotalTracks => &mut self.total_tracks,
            Field::DiscNumber => &mut self.disc_number,
            Field::TotalDiscs => &mut self.total_discs,
            Field::Composer => &mut self.composer,
            Field::Performer => &mut self.performer,
        }
    }

    /// Value of a logical field ("" when absent)
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Title => &self.title,
            Field::Artist => &self.artist,
            Field::Album => &self.album,
            Field::AlbumArtist => &self.album_artist,
            Field::Date => &self.date,
            Field::Genre => &self.genre,
            Field::TrackNumber => &self.track_number,
            Field::TotalTracks => &self.total_tracks,
            Field::DiscNumber => &self.disc_number,
            Field::TotalDiscs => &self.total_discs,
            Field::Composer => &self.composer,
            Field::Performer => &self.performer,
        }
    }
}

/// Track or disc position as stored in an MP4 `trkn`/`disk` atom
///
/// A stored total of zero means "unknown" and is kept as `None`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NumberPair {
    pub number: Option<u32>,
    pub total: Option<u32>,
}

impl NumberPair {
    /// Parse a `(number, total)` pair from record strings.
    ///
    /// - `"3"` with total `"12"` -> (3, 12); absent total -> (3, none)
    /// - `"3/12"` -> (3, 12); any separate total is ignored
    /// - anything else -> `None`
    ///
    /// A separate total that is present but not numeric also yields `None`.
    pub fn parse(number: &str, total: Option<&str>) -> Option<Self> {
        let number = number.trim();

        if let Ok(n) = number.parse::<u16>() {
            let total = match total.map(str::trim).filter(|t| !t.is_empty()) {
                None => None,
                Some(t) => Some(t.parse::<u16>().ok()?),
            };
            return Some(Self::from_parts(n, total.unwrap_or(0)));
        }

        let (n, t) = number.split_once('/')?;
        let n = n.trim().parse::<u16>().ok()?;
        let t = t.trim().parse::<u16>().ok()?;
        Some(Self::from_parts(n, t))
    }

    fn from_parts(number: u16, total: u16) -> Self {
        Self {
            number: Some(u32::from(number)),
            total: Some(u32::from(total)).filter(|t| *t > 0),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.number.is_none() && self.total.is_none()
    }
}

/// The value of an optional field if it should be written
pub(crate) fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}
