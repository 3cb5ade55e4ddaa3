//! metaops-tagger - audio tag mapping and normalization
//!
//! Reads and writes descriptive metadata in three containers:
//! - `.mp3`: ID3v2 frames (via `id3`)
//! - `.opus`: Vorbis comments in Ogg Opus (via `lofty`)
//! - `.m4a`: MPEG-4 `ilst` atoms (via `lofty`)
//!
//! One canonical [`MetadataRecord`] is translated into each container's key
//! vocabulary. Dates are reduced to a four-digit year and multi-artist
//! strings are split into a primary artist and an album artist on the way in.

pub mod adapters;
pub mod cover;
pub mod error;
pub mod format;
pub mod normalize;
pub mod tagger;
pub mod types;

pub use crate::adapters::{CoverOutcome, MetadataAdapter, WriteReport};
pub use crate::cover::{CoverArt, CoverMime, StoredCover};
pub use crate::error::{
    ContainerError, CoverEmbedFailure, MetadataReadFailure, TagError, TagResult, WriteFailure,
};
pub use crate::format::ContainerFormat;
pub use crate::normalize::{normalize_year, reconcile_artist, ReconciledArtist};
pub use crate::tagger::{
    add_metadata, extract_batch, extract_cover, extract_metadata, Tagger, TaggerSettings,
};
pub use crate::types::{ExtractedMetadata, Field, MetadataRecord, NumberPair};
