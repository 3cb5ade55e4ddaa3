//! Cover art loading and per-container picture representations
//!
//! - ID3: `APIC` frame
//! - Vorbis comments: base64 FLAC picture block in `METADATA_BLOCK_PICTURE`
//! - MP4: `covr` atom

use crate::error::CoverEmbedFailure;
use base64::{engine::general_purpose, Engine as _};
use std::path::Path;
use tracing::debug;

/// Description stored with every embedded cover
pub const COVER_DESCRIPTION: &str = "Cover";

/// Vorbis comment key holding a base64 picture block
pub const BLOCK_PICTURE_KEY: &str = "METADATA_BLOCK_PICTURE";

/// APIC / FLAC picture type for the front cover
pub const FRONT_COVER_TYPE: u32 = 3;

/// Image formats a cover is embedded as
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoverMime {
    Jpeg,
    Png,
}

impl CoverMime {
    /// `.png` (any case) is PNG, everything else is assumed to be JPEG
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("png") => Self::Png,
            _ => Self::Jpeg,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
        }
    }
}

/// Cover image ready to embed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoverArt {
    pub data: Vec<u8>,
    pub mime: CoverMime,
}

impl CoverArt {
    /// Read a cover file. The handle is released before returning.
    pub fn load(path: &Path) -> Result<Self, CoverEmbedFailure> {
        let data = std::fs::read(path).map_err(|source| CoverEmbedFailure::Unreadable {
            path: path.to_path_buf(),
            source,
        })?;

        if data.is_empty() {
            return Err(CoverEmbedFailure::Empty {
                path: path.to_path_buf(),
            });
        }

        let mime = CoverMime::from_path(path);
        debug!(
            cover = %path.display(),
            mime = mime.as_str(),
            bytes = data.len(),
            "Loaded cover image"
        );

        Ok(Self { data, mime })
    }
}

/// Cover image read back from a file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredCover {
    pub data: Vec<u8>,
    pub mime_type: String,
}

/// ID3 `APIC` front cover frame
pub fn id3_picture(art: &CoverArt) -> id3::frame::Picture {
    id3::frame::Picture {
        mime_type: art.mime.as_str().to_string(),
        picture_type: id3::frame::PictureType::CoverFront,
        description: COVER_DESCRIPTION.to_string(),
        data: art.data.clone(),
    }
}

/// MP4 `covr` picture
pub fn mp4_picture(art: &CoverArt) -> lofty::picture::Picture {
    let mime = match art.mime {
        CoverMime::Jpeg => lofty::picture::MimeType::Jpeg,
        CoverMime::Png => lofty::picture::MimeType::Png,
    };
    lofty::picture::Picture::new_unchecked(
        lofty::picture::PictureType::CoverFront,
        Some(mime),
        None,
        art.data.clone(),
    )
}

/// FLAC `METADATA_BLOCK_PICTURE` structure
///
/// Wire form, all integers big-endian u32:
/// type, mime length, mime, description length, description,
/// width, height, color depth, color count, data length, data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockPicture {
    pub picture_type: u32,
    pub mime_type: String,
    pub description: String,
    pub width: u32,
    pub height: u32,
    pub color_depth: u32,
    pub color_count: u32,
    pub data: Vec<u8>,
}

impl BlockPicture {
    /// Front cover block with unknown dimensions
    pub fn front_cover(art: &CoverArt) -> Self {
        Self {
            picture_type: FRONT_COVER_TYPE,
            mime_type: art.mime.as_str().to_string(),
            description: COVER_DESCRIPTION.to_string(),
            width: 0,
            height: 0,
            color_depth: 0,
            color_count: 0,
            data: art.data.clone(),
        }
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(
            32 + self.mime_type.len() + self.description.len() + self.data.len(),
        );
        out.extend_from_slice(&self.picture_type.to_be_bytes());
        push_sized(&mut out, self.mime_type.as_bytes());
        push_sized(&mut out, self.description.as_bytes());
        out.extend_from_slice(&self.width.to_be_bytes());
        out.extend_from_slice(&self.height.to_be_bytes());
        out.extend_from_slice(&self.color_depth.to_be_bytes());
        out.extend_from_slice(&self.color_count.to_be_bytes());
        push_sized(&mut out, &self.data);
        out
    }

    /// Parse the wire form; `None` on truncated or malformed input
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        let mut reader = BlockReader { bytes };
        let picture_type = reader.u32()?;
        let mime_type = String::from_utf8(reader.sized()?.to_vec()).ok()?;
        let description = String::from_utf8(reader.sized()?.to_vec()).ok()?;
        let width = reader.u32()?;
        let height = reader.u32()?;
        let color_depth = reader.u32()?;
        let color_count = reader.u32()?;
        let data = reader.sized()?.to_vec();

        Some(Self {
            picture_type,
            mime_type,
            description,
            width,
            height,
            color_depth,
            color_count,
            data,
        })
    }

    /// Comment value: base64 of the wire form
    pub fn to_base64(&self) -> String {
        general_purpose::STANDARD.encode(self.to_bytes())
    }

    pub fn from_base64(text: &str) -> Option<Self> {
        let bytes = general_purpose::STANDARD.decode(text.trim()).ok()?;
        Self::from_bytes(&bytes)
    }
}

fn push_sized(out: &mut Vec<u8>, bytes: &[u8]) {
    // Truncated at u32::MAX
    let len = u32::try_from(bytes.len()).unwrap_or(u32::MAX);
    out.extend_from_slice(&len.to_be_bytes());
    out.extend_from_slice(&bytes[..len as usize]);
}

struct BlockReader<'a> {
    bytes: &'a [u8],
}

impl<'a> BlockReader<'a> {
    fn take(&mut self, n: usize) -> Option<&'a [u8]> {
        if self.bytes.len() < n {
            return None;
        }
        let (head, tail) = self.bytes.split_at(n);
        self.bytes = tail;
        Some(head)
    }

    fn u32(&mut self) -> Option<u32> {
        let raw: [u8; 4] = self.take(4)?.try_into().ok()?;
        Some(u32::from_be_bytes(raw))
    }

    fn sized(&mut self) -> Option<&'a [u8]> {
        let len = usize::try_from(self.u32()?).ok()?;
        self.take(len)
    }
}
