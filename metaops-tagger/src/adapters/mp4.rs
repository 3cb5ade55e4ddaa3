//! MPEG-4 adapter: `ilst` atoms via `lofty`
//!
//! Track and disc numbers are `(number, total)` integer pairs in the `trkn`
//! and `disk` atoms; the separate totals of the record fold into them.

use super::{fill, parse_options, prepare_cover, CoverOutcome, FieldPlan, MetadataAdapter, WriteReport};
use crate::cover::{mp4_picture, CoverArt, StoredCover};
use crate::error::{ContainerError, MetadataReadFailure, WriteFailure};
use crate::format::ContainerFormat;
use crate::tagger::TaggerSettings;
use crate::types::{ExtractedMetadata, Field, MetadataRecord, NumberPair};
use lofty::config::WriteOptions;
use lofty::file::AudioFile;
use lofty::mp4::{Atom, AtomData, AtomIdent, Ilst, Mp4File};
use lofty::picture::Picture;
use lofty::tag::{Accessor, TagExt};
use std::fs::File;
use std::path::Path;
use tracing::{debug, warn};

const COVER_ATOM: [u8; 4] = *b"covr";

/// Fourcc of a string-valued field; `None` for the number pairs
fn string_atom(field: Field) -> Option<[u8; 4]> {
    match field {
        Field::Title => Some(*b"\xa9nam"),
        Field::Artist => Some(*b"\xa9ART"),
        Field::Album => Some(*b"\xa9alb"),
        Field::AlbumArtist => Some(*b"aART"),
        Field::Date => Some(*b"\xa9day"),
        Field::Genre => Some(*b"\xa9gen"),
        Field::Composer => Some(*b"\xa9wrt"),
        Field::Performer => Some(*b"\xa9prf"),
        Field::TrackNumber | Field::TotalTracks | Field::DiscNumber | Field::TotalDiscs => None,
    }
}

fn string_value(ilst: &Ilst, code: [u8; 4]) -> Option<String> {
    ilst.get(&AtomIdent::Fourcc(code))?
        .data()
        .find_map(|data| match data {
            AtomData::UTF8(text) => Some(text.clone()),
            _ => None,
        })
}

/// Store a single-value UTF-8 atom, dropping any previous values
fn set_string(ilst: &mut Ilst, code: [u8; 4], value: &str) {
    ilst.replace_atom(Atom::new(
        AtomIdent::Fourcc(code),
        AtomData::UTF8(value.to_string()),
    ));
}

/// `covr` ends up holding only this picture
fn set_cover(ilst: &mut Ilst, art: &CoverArt) {
    ilst.remove_pictures();
    ilst.replace_atom(Atom::new(
        AtomIdent::Fourcc(COVER_ATOM),
        AtomData::Picture(mp4_picture(art)),
    ));
}

fn cover_picture(ilst: &Ilst) -> Option<&Picture> {
    ilst.get(&AtomIdent::Fourcc(COVER_ATOM))?
        .data()
        .find_map(|data| match data {
            AtomData::Picture(picture) => Some(picture),
            _ => None,
        })
}

/// The two `ilst` integer pairs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PairAtom {
    Track,
    Disc,
}

impl PairAtom {
    fn fields(self) -> (Field, Field) {
        match self {
            PairAtom::Track => (Field::TrackNumber, Field::TotalTracks),
            PairAtom::Disc => (Field::DiscNumber, Field::TotalDiscs),
        }
    }

    fn store(self, ilst: &mut Ilst, pair: NumberPair) {
        let number = pair.number.unwrap_or(0);
        match (self, pair.total) {
            (PairAtom::Track, Some(total)) => {
                ilst.set_track(number);
                ilst.set_track_total(total);
            }
            (PairAtom::Track, None) => {
                ilst.set_track(number);
                ilst.remove_track_total();
            }
            (PairAtom::Disc, Some(total)) => {
                ilst.set_disk(number);
                ilst.set_disk_total(total);
            }
            (PairAtom::Disc, None) => {
                ilst.set_disk(number);
                ilst.remove_disk_total();
            }
        }
    }

    fn load(self, ilst: &Ilst) -> NumberPair {
        let (number, total) = match self {
            PairAtom::Track => (ilst.track(), ilst.track_total()),
            PairAtom::Disc => (ilst.disk(), ilst.disk_total()),
        };
        NumberPair {
            number: number.filter(|n| *n > 0),
            total: total.filter(|t| *t > 0),
        }
    }
}

/// Fold a planned number and total into one pair atom.
///
/// Unparseable input writes nothing and is only logged.
fn apply_pair(ilst: &mut Ilst, plan: &FieldPlan, atom: PairAtom, fields: &mut Vec<Field>) {
    let (number_field, total_field) = atom.fields();
    let Some(number) = plan.get(number_field) else {
        if plan.get(total_field).is_some() {
            debug!(field = %total_field, "Total without a number, not written");
        }
        return;
    };
    let total = plan.get(total_field);

    match NumberPair::parse(number, total) {
        Some(pair) => {
            atom.store(ilst, pair);
            fields.push(number_field);
            if pair.total.is_some() {
                fields.push(total_field);
            }
        }
        None => {
            warn!(
                field = %number_field,
                number = %number,
                total = ?total,
                "Unparseable number pair, field not written"
            );
        }
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct Mp4Adapter;

impl Mp4Adapter {
    /// Item list of the file; empty when the file has none yet
    fn open(path: &Path) -> Result<Ilst, ContainerError> {
        let mut file = File::open(path)?;
        let mp4 = Mp4File::read_from(&mut file, parse_options())?;
        Ok(mp4.ilst().cloned().unwrap_or_default())
    }
}

impl MetadataAdapter for Mp4Adapter {
    fn format(&self) -> ContainerFormat {
        ContainerFormat::M4a
    }

    fn read(&self, path: &Path) -> Result<ExtractedMetadata, MetadataReadFailure> {
        let ilst = Self::open(path).map_err(|e| MetadataReadFailure::new(self.format(), e))?;

        let mut meta = ExtractedMetadata::default();
        for field in Field::ALL {
            if let Some(code) = string_atom(field) {
                fill(&mut meta, field, string_value(&ilst, code));
            }
        }

        for atom in [PairAtom::Track, PairAtom::Disc] {
            let (number_field, total_field) = atom.fields();
            let pair = atom.load(&ilst);
            fill(&mut meta, number_field, pair.number.map(|n| n.to_string()));
            fill(&mut meta, total_field, pair.total.map(|t| t.to_string()));
        }

        Ok(meta)
    }

    fn read_cover(&self, path: &Path) -> Result<Option<StoredCover>, MetadataReadFailure> {
        let ilst = Self::open(path).map_err(|e| MetadataReadFailure::new(self.format(), e))?;
        Ok(cover_picture(&ilst).map(|p| StoredCover {
            data: p.data().to_vec(),
            mime_type: p.mime_type().map(|m| m.as_str().to_string()).unwrap_or_default(),
        }))
    }

    fn write(
        &self,
        path: &Path,
        record: &MetadataRecord,
        _settings: &TaggerSettings,
    ) -> Result<WriteReport, WriteFailure> {
        let format = self.format();
        let mut ilst = Self::open(path).map_err(|e| WriteFailure::new(format, e))?;

        let plan = FieldPlan::from_record(record, format);
        let mut fields = Vec::new();
        for (field, value) in plan.iter() {
            if let Some(code) = string_atom(field) {
                set_string(&mut ilst, code, value);
                fields.push(field);
            }
        }
        apply_pair(&mut ilst, &plan, PairAtom::Track, &mut fields);
        apply_pair(&mut ilst, &plan, PairAtom::Disc, &mut fields);

        let cover = match prepare_cover(record, format) {
            Ok(None) => CoverOutcome::NotRequested,
            Ok(Some(art)) => {
                set_cover(&mut ilst, &art);
                CoverOutcome::Embedded(art.mime)
            }
            Err(failure) => CoverOutcome::Skipped(failure),
        };

        ilst.save_to_path(path, WriteOptions::default())
            .map_err(|e| WriteFailure::new(format, e))?;

        debug!(file = %path.display(), fields = fields.len(), "Saved MP4 item list");
        Ok(WriteReport {
            format,
            fields,
            cover,
        })
    }
}
