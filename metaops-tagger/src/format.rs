//! Container format dispatch by file extension

use crate::adapters::{id3::Id3Adapter, mp4::Mp4Adapter, opus::OpusAdapter, MetadataAdapter};
use std::fmt;
use std::path::Path;

static ID3_ADAPTER: Id3Adapter = Id3Adapter;
static OPUS_ADAPTER: OpusAdapter = OpusAdapter;
static MP4_ADAPTER: Mp4Adapter = Mp4Adapter;

/// Supported audio containers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContainerFormat {
    /// MPEG audio with an ID3v2 tag (`.mp3`)
    Mp3,
    /// Ogg Opus with Vorbis comments (`.opus`)
    Opus,
    /// MPEG-4 audio with an `ilst` atom (`.m4a`)
    M4a,
}

impl ContainerFormat {
    /// Select the container for a path by its lowercased extension.
    ///
    /// No content sniffing: a mislabelled file is handed to the wrong
    /// adapter and fails there.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "mp3" => Some(Self::Mp3),
            "opus" => Some(Self::Opus),
            "m4a" => Some(Self::M4a),
            _ => None,
        }
    }

    /// Lowercased extension of a path including the dot, or "" if none
    pub fn extension_label(path: &Path) -> String {
        path.extension()
            .map(|e| format!(".{}", e.to_string_lossy().to_lowercase()))
            .unwrap_or_default()
    }

    /// The adapter implementing this container's key vocabulary
    pub fn adapter(self) -> &'static dyn MetadataAdapter {
        match self {
            Self::Mp3 => &ID3_ADAPTER,
            Self::Opus => &OPUS_ADAPTER,
            Self::M4a => &MP4_ADAPTER,
        }
    }
}

impl fmt::Display for ContainerFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Mp3 => "MP3",
            Self::Opus => "Opus",
            Self::M4a => "M4A",
        };
        f.write_str(name)
    }
}
