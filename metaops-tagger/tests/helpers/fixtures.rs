//! Minimal container files for tagging tests
//!
//! Each builder writes the smallest file the container parser accepts. No
//! fixture carries tags, so tests always start from an untagged file.

use anyhow::Result;
use std::path::{Path, PathBuf};

/// MPEG-1 Layer III, 128 kbps, 44.1 kHz frame header
const MP3_FRAME_HEADER: [u8; 4] = [0xFF, 0xFB, 0x90, 0x00];
const MP3_FRAME_LEN: usize = 417;

/// Several silent MP3 frames, no ID3 tag
pub fn write_mp3(dir: &Path, name: &str) -> Result<PathBuf> {
    let mut data = Vec::with_capacity(MP3_FRAME_LEN * 4);
    for _ in 0..4 {
        data.extend_from_slice(&MP3_FRAME_HEADER);
        data.resize(data.len() + MP3_FRAME_LEN - MP3_FRAME_HEADER.len(), 0);
    }
    let path = dir.join(name);
    std::fs::write(&path, data)?;
    Ok(path)
}

// Ogg

const OGG_SERIAL: u32 = 0x4D45_5441;

const PAGE_FIRST: u8 = 0x02;
const PAGE_LAST: u8 = 0x04;

/// CRC-32 used by Ogg (poly 0x04c11db7, no reflection, zero init)
fn ogg_crc(data: &[u8]) -> u32 {
    let mut crc = 0u32;
    for byte in data {
        crc ^= u32::from(*byte) << 24;
        for _ in 0..8 {
            crc = if crc & 0x8000_0000 != 0 {
                (crc << 1) ^ 0x04C1_1DB7
            } else {
                crc << 1
            };
        }
    }
    crc
}

/// One Ogg page holding one complete packet (< 255 bytes)
fn ogg_page(header_type: u8, granule: u64, sequence: u32, packet: &[u8]) -> Vec<u8> {
    assert!(packet.len() < 255, "fixture packets fit one segment");

    let mut page = Vec::with_capacity(28 + packet.len());
    page.extend_from_slice(b"OggS");
    page.push(0); // version
    page.push(header_type);
    page.extend_from_slice(&granule.to_le_bytes());
    page.extend_from_slice(&OGG_SERIAL.to_le_bytes());
    page.extend_from_slice(&sequence.to_le_bytes());
    page.extend_from_slice(&[0; 4]); // checksum
    page.push(1);
    page.push(packet.len() as u8);
    page.extend_from_slice(packet);

    let crc = ogg_crc(&page);
    page[22..26].copy_from_slice(&crc.to_le_bytes());
    page
}

fn opus_head() -> Vec<u8> {
    let mut head = Vec::with_capacity(19);
    head.extend_from_slice(b"OpusHead");
    head.push(1); // version
    head.push(2); // channels
    head.extend_from_slice(&312u16.to_le_bytes()); // pre-skip
    head.extend_from_slice(&48_000u32.to_le_bytes());
    head.extend_from_slice(&0i16.to_le_bytes()); // output gain
    head.push(0); // mapping family
    head
}

fn opus_tags() -> Vec<u8> {
    let vendor = b"metaops fixtures";
    let mut tags = Vec::new();
    tags.extend_from_slice(b"OpusTags");
    tags.extend_from_slice(&(vendor.len() as u32).to_le_bytes());
    tags.extend_from_slice(vendor);
    tags.extend_from_slice(&0u32.to_le_bytes()); // no comments
    tags
}

/// Ogg Opus stream: identification, empty comment header, one audio packet
pub fn write_opus(dir: &Path, name: &str) -> Result<PathBuf> {
    // CELT-only 20 ms stereo frame, code 0
    let audio = [0xFC, 0xFF, 0xFE];

    let mut data = ogg_page(PAGE_FIRST, 0, 0, &opus_head());
    data.extend(ogg_page(0, 0, 1, &opus_tags()));
    data.extend(ogg_page(PAGE_LAST, 960, 2, &audio));

    let path = dir.join(name);
    std::fs::write(&path, data)?;
    Ok(path)
}

// MP4

fn mp4_box(kind: &[u8; 4], payload: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(8 + payload.len());
    out.extend_from_slice(&((8 + payload.len()) as u32).to_be_bytes());
    out.extend_from_slice(kind);
    out.extend_from_slice(payload);
    out
}

fn mvhd() -> Vec<u8> {
    let mut payload = Vec::with_capacity(100);
    payload.extend_from_slice(&[0; 4]); // version + flags
    payload.extend_from_slice(&0u32.to_be_bytes()); // creation
    payload.extend_from_slice(&0u32.to_be_bytes()); // modification
    payload.extend_from_slice(&1000u32.to_be_bytes()); // timescale
    payload.extend_from_slice(&1000u32.to_be_bytes()); // duration
    payload.extend_from_slice(&0x0001_0000u32.to_be_bytes()); // rate
    payload.extend_from_slice(&0x0100u16.to_be_bytes()); // volume
    payload.extend_from_slice(&[0; 10]);
    for value in [0x0001_0000u32, 0, 0, 0, 0x0001_0000, 0, 0, 0, 0x4000_0000] {
        payload.extend_from_slice(&value.to_be_bytes());
    }
    payload.extend_from_slice(&[0; 24]);
    payload.extend_from_slice(&2u32.to_be_bytes()); // next track id
    mp4_box(b"mvhd", &payload)
}

/// `ftyp` + `moov` (movie header only) + a small `mdat`
pub fn write_m4a(dir: &Path, name: &str) -> Result<PathBuf> {
    let mut ftyp = Vec::new();
    ftyp.extend_from_slice(b"M4A ");
    ftyp.extend_from_slice(&0u32.to_be_bytes());
    ftyp.extend_from_slice(b"M4A mp42isom");

    let mut data = mp4_box(b"ftyp", &ftyp);
    data.extend(mp4_box(b"moov", &mvhd()));
    data.extend(mp4_box(b"mdat", &[0; 16]));

    let path = dir.join(name);
    std::fs::write(&path, data)?;
    Ok(path)
}

// Images

/// 1x1 transparent PNG
pub const PNG_1X1: [u8; 67] = [
    0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44,
    0x52, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x06, 0x00, 0x00, 0x00, 0x1F,
    0x15, 0xC4, 0x89, 0x00, 0x00, 0x00, 0x0A, 0x49, 0x44, 0x41, 0x54, 0x78, 0x9C, 0x63, 0x00,
    0x01, 0x00, 0x00, 0x05, 0x00, 0x01, 0x0D, 0x0A, 0x2D, 0xB4, 0x00, 0x00, 0x00, 0x00, 0x49,
    0x45, 0x4E, 0x44, 0xAE, 0x42, 0x60, 0x82,
];

/// JPEG start/end markers around an empty APP0; enough for a MIME check
pub const JPEG_STUB: [u8; 20] = [
    0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, 0x4A, 0x46, 0x49, 0x46, 0x00, 0x01, 0x01, 0x00, 0x00,
    0x01, 0x00, 0x01, 0xFF, 0xD9,
];

pub fn write_image(dir: &Path, name: &str, bytes: &[u8]) -> Result<PathBuf> {
    let path = dir.join(name);
    std::fs::write(&path, bytes)?;
    Ok(path)
}

#[test]
fn test_ogg_crc_matches_reference() {
    // Known value for the ASCII string "123456789"
    assert_eq!(ogg_crc(b"123456789"), 0x89A1_897F);
}
