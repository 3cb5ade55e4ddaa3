//! MP3 adapter: ID3v2 frames via the `id3` crate
//!
//! Fields without a standard text frame (`tracktotal`, `disctotal`,
//! `performer`) are stored as `TXXX` user text frames.

use super::{fill, prepare_cover, CoverOutcome, FieldPlan, MetadataAdapter, WriteReport};
use crate::cover::{id3_picture, StoredCover};
use crate::error::{MetadataReadFailure, WriteFailure};
use crate::format::ContainerFormat;
use crate::tagger::TaggerSettings;
use crate::types::{ExtractedMetadata, Field, MetadataRecord};
use id3::frame::{ExtendedText, PictureType};
use id3::{ErrorKind, Tag, TagLike, Version};
use std::path::Path;
use tracing::debug;

/// Where a logical field lives in an ID3v2 tag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FrameKey {
    /// Standard text frame
    Text(&'static str),
    /// `TXXX` frame with this description
    UserText(&'static str),
}

fn frame_key(field: Field) -> FrameKey {
    match field {
        Field::Title => FrameKey::Text("TIT2"),
        Field::Artist => FrameKey::Text("TPE1"),
        Field::Album => FrameKey::Text("TALB"),
        Field::AlbumArtist => FrameKey::Text("TPE2"),
        Field::Date => FrameKey::Text("TDRC"),
        Field::Genre => FrameKey::Text("TCON"),
        Field::TrackNumber => FrameKey::Text("TRCK"),
        Field::TotalTracks => FrameKey::UserText("TRACKTOTAL"),
        Field::DiscNumber => FrameKey::Text("TPOS"),
        Field::TotalDiscs => FrameKey::UserText("DISCTOTAL"),
        Field::Composer => FrameKey::Text("TCOM"),
        Field::Performer => FrameKey::UserText("PERFORMER"),
    }
}

/// ID3v2.3 has no `TDRC`; the year goes to `TYER` instead
fn date_frame(version: Version) -> &'static str {
    match version {
        Version::Id3v24 => "TDRC",
        _ => "TYER",
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct Id3Adapter;

impl Id3Adapter {
    /// Existing tag, or an empty one if the file carries none
    fn open_tag(path: &Path) -> Result<Option<Tag>, id3::Error> {
        match Tag::read_from_path(path) {
            Ok(tag) => Ok(Some(tag)),
            Err(e) if matches!(e.kind, ErrorKind::NoTag) => Ok(None),
            Err(e) => Err(e),
        }
    }
}

/// First value of a text frame (multi-value frames are NUL separated)
fn text_value(tag: &Tag, id: &str) -> Option<String> {
    let text = tag.get(id)?.content().text()?;
    let first = text.split('\0').next().unwrap_or_default();
    Some(first.to_string())
}

fn user_text_value(tag: &Tag, description: &str) -> Option<String> {
    tag.extended_texts()
        .find(|t| t.description.eq_ignore_ascii_case(description))
        .map(|t| t.value.clone())
}

impl MetadataAdapter for Id3Adapter {
    fn format(&self) -> ContainerFormat {
        ContainerFormat::Mp3
    }

    fn read(&self, path: &Path) -> Result<ExtractedMetadata, MetadataReadFailure> {
        let mut meta = ExtractedMetadata::default();
        let tag = Self::open_tag(path).map_err(|e| MetadataReadFailure::new(self.format(), e))?;
        let Some(tag) = tag else {
            debug!(file = %path.display(), "No ID3 tag present");
            return Ok(meta);
        };

        for field in Field::ALL {
            let value = match (field, frame_key(field)) {
                (Field::Date, _) => text_value(&tag, "TDRC").or_else(|| text_value(&tag, "TYER")),
                (_, FrameKey::Text(id)) => text_value(&tag, id),
                (_, FrameKey::UserText(description)) => user_text_value(&tag, description),
            };
            fill(&mut meta, field, value);
        }

        Ok(meta)
    }

    fn read_cover(&self, path: &Path) -> Result<Option<StoredCover>, MetadataReadFailure> {
        let tag = Self::open_tag(path).map_err(|e| MetadataReadFailure::new(self.format(), e))?;
        let Some(tag) = tag else {
            return Ok(None);
        };

        let picture = tag
            .pictures()
            .find(|p| p.picture_type == PictureType::CoverFront)
            .or_else(|| tag.pictures().next());

        Ok(picture.map(|p| StoredCover {
            data: p.data.clone(),
            mime_type: p.mime_type.clone(),
        }))
    }

    fn write(
        &self,
        path: &Path,
        record: &MetadataRecord,
        settings: &TaggerSettings,
    ) -> Result<WriteReport, WriteFailure> {
        let format = self.format();
        let mut tag = Self::open_tag(path)
            .map_err(|e| WriteFailure::new(format, e))?
            .unwrap_or_else(Tag::new);

        let plan = FieldPlan::from_record(record, format);
        let mut fields = Vec::new();

        for (field, value) in plan.iter() {
            match (field, frame_key(field)) {
                (Field::Date, _) => {
                    // Drop a stale date frame of the other revision
                    tag.remove("TDRC");
                    tag.remove("TYER");
                    tag.set_text(date_frame(settings.id3_version), value);
                }
                (_, FrameKey::Text(id)) => tag.set_text(id, value),
                (_, FrameKey::UserText(description)) => {
                    tag.remove_extended_text(Some(description), None);
                    tag.add_frame(ExtendedText {
                        description: description.to_string(),
                        value: value.to_string(),
                    });
                }
            }
            fields.push(field);
        }

        let cover = match prepare_cover(record, format) {
            Ok(None) => CoverOutcome::NotRequested,
            Ok(Some(art)) => {
                tag.remove_picture_by_type(PictureType::CoverFront);
                tag.add_frame(id3_picture(&art));
                CoverOutcome::Embedded(art.mime)
            }
            Err(failure) => CoverOutcome::Skipped(failure),
        };

        tag.write_to_path(path, settings.id3_version)
            .map_err(|e| WriteFailure::new(format, e))?;

        debug!(file = %path.display(), fields = fields.len(), "Saved ID3 tag");
        Ok(WriteReport {
            format,
            fields,
            cover,
        })
    }
}
