//! Ogg Opus adapter: Vorbis comments via `lofty`

use super::{fill, parse_options, prepare_cover, CoverOutcome, FieldPlan, MetadataAdapter, WriteReport};
use crate::cover::{BlockPicture, StoredCover, BLOCK_PICTURE_KEY};
use crate::error::{ContainerError, MetadataReadFailure, WriteFailure};
use crate::format::ContainerFormat;
use crate::tagger::TaggerSettings;
use crate::types::{ExtractedMetadata, Field, MetadataRecord};
use lofty::config::WriteOptions;
use lofty::file::AudioFile;
use lofty::ogg::{OggPictureStorage, OpusFile, VorbisComments};
use lofty::picture::PictureType;
use lofty::tag::TagExt;
use std::fs::File;
use std::path::Path;
use tracing::debug;

fn comment_key(field: Field) -> &'static str {
    match field {
        Field::Title => "title",
        Field::Artist => "artist",
        Field::Album => "album",
        Field::AlbumArtist => "albumartist",
        Field::Date => "date",
        Field::Genre => "genre",
        Field::TrackNumber => "tracknumber",
        Field::TotalTracks => "tracktotal",
        Field::DiscNumber => "discnumber",
        Field::TotalDiscs => "disctotal",
        Field::Composer => "composer",
        Field::Performer => "performer",
    }
}

/// Comment value by key (lofty matches keys case-insensitively)
fn comment_value(comments: &VorbisComments, key: &str) -> Option<String> {
    comments.get(key).map(str::to_string)
}

#[derive(Debug, Default, Clone, Copy)]
pub struct OpusAdapter;

impl OpusAdapter {
    fn open(path: &Path) -> Result<OpusFile, ContainerError> {
        let mut file = File::open(path)?;
        Ok(OpusFile::read_from(&mut file, parse_options())?)
    }
}

impl MetadataAdapter for OpusAdapter {
    fn format(&self) -> ContainerFormat {
        ContainerFormat::Opus
    }

    fn read(&self, path: &Path) -> Result<ExtractedMetadata, MetadataReadFailure> {
        let opus = Self::open(path).map_err(|e| MetadataReadFailure::new(self.format(), e))?;
        let comments = opus.vorbis_comments();

        let mut meta = ExtractedMetadata::default();
        for field in Field::ALL {
            fill(&mut meta, field, comment_value(comments, comment_key(field)));
        }
        Ok(meta)
    }

    fn read_cover(&self, path: &Path) -> Result<Option<StoredCover>, MetadataReadFailure> {
        let opus = Self::open(path).map_err(|e| MetadataReadFailure::new(self.format(), e))?;
        let comments = opus.vorbis_comments();

        let pictures = comments.pictures();
        let parsed = pictures
            .iter()
            .find(|(p, _)| p.pic_type() == PictureType::CoverFront)
            .or_else(|| pictures.first())
            .map(|(p, _)| StoredCover {
                data: p.data().to_vec(),
                mime_type: p.mime_type().map(|m| m.as_str().to_string()).unwrap_or_default(),
            });
        if parsed.is_some() {
            return Ok(parsed);
        }

        // Block lofty could not parse into a picture
        Ok(comments
            .get(BLOCK_PICTURE_KEY)
            .and_then(BlockPicture::from_base64)
            .map(|block| StoredCover {
                data: block.data,
                mime_type: block.mime_type,
            }))
    }

    fn write(
        &self,
        path: &Path,
        record: &MetadataRecord,
        _settings: &TaggerSettings,
    ) -> Result<WriteReport, WriteFailure> {
        let format = self.format();
        let mut opus = Self::open(path).map_err(|e| WriteFailure::new(format, e))?;
        let comments = opus.vorbis_comments_mut();

        let plan = FieldPlan::from_record(record, format);
        let mut fields = Vec::new();
        for (field, value) in plan.iter() {
            comments.insert(comment_key(field).to_string(), value.to_string());
            fields.push(field);
        }

        let cover = match prepare_cover(record, format) {
            Ok(None) => CoverOutcome::NotRequested,
            Ok(Some(art)) => {
                comments.remove_picture_type(PictureType::CoverFront);
                comments.insert(
                    BLOCK_PICTURE_KEY.to_string(),
                    BlockPicture::front_cover(&art).to_base64(),
                );
                CoverOutcome::Embedded(art.mime)
            }
            Err(failure) => CoverOutcome::Skipped(failure),
        };

        comments
            .save_to_path(path, WriteOptions::default())
            .map_err(|e| WriteFailure::new(format, e))?;

        debug!(file = %path.display(), fields = fields.len(), "Saved Vorbis comments");
        Ok(WriteReport {
            format,
            fields,
            cover,
        })
    }
}
