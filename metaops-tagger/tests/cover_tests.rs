//! Cover art embedding across containers

mod helpers;

use helpers::{capture_logs, write_image, write_m4a, write_mp3, write_opus, JPEG_STUB, PNG_1X1};
use metaops_tagger::{
    add_metadata, extract_cover, extract_metadata, CoverEmbedFailure, CoverMime, CoverOutcome,
    MetadataRecord,
};
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tracing::Level;

type FixtureFn = fn(&Path, &str) -> anyhow::Result<PathBuf>;

const CONTAINERS: [(FixtureFn, &str); 3] = [
    (write_mp3, "song.mp3"),
    (write_opus, "song.opus"),
    (write_m4a, "song.m4a"),
];

fn record_with_cover(cover: PathBuf) -> MetadataRecord {
    MetadataRecord {
        cover_path: Some(cover),
        ..MetadataRecord::new("Song", "Alice", "Album")
    }
}

#[test]
fn test_png_cover_is_embedded_in_every_container() {
    for (fixture, name) in CONTAINERS {
        let temp_dir = TempDir::new().unwrap();
        let path = fixture(temp_dir.path(), name).unwrap();
        let cover = write_image(temp_dir.path(), "cover.png", &PNG_1X1).unwrap();

        let report = add_metadata(&path, &record_with_cover(cover)).unwrap();
        assert!(
            matches!(report.cover, CoverOutcome::Embedded(CoverMime::Png)),
            "{}: {:?}",
            name,
            report.cover
        );

        let stored = extract_cover(&path).unwrap().expect("cover stored");
        assert_eq!(stored.mime_type, "image/png", "{}", name);
        assert_eq!(stored.data, PNG_1X1.to_vec(), "{}", name);
    }
}

#[test]
fn test_non_png_extension_is_stored_as_jpeg() {
    for (fixture, name) in CONTAINERS {
        let temp_dir = TempDir::new().unwrap();
        let path = fixture(temp_dir.path(), name).unwrap();
        let cover = write_image(temp_dir.path(), "folder.jpg", &JPEG_STUB).unwrap();

        add_metadata(&path, &record_with_cover(cover)).unwrap();

        let stored = extract_cover(&path).unwrap().expect("cover stored");
        assert_eq!(stored.mime_type, "image/jpeg", "{}", name);
        assert_eq!(stored.data, JPEG_STUB.to_vec(), "{}", name);
    }
}

#[test]
fn test_no_cover_path_leaves_picture_unset() {
    for (fixture, name) in CONTAINERS {
        let temp_dir = TempDir::new().unwrap();
        let path = fixture(temp_dir.path(), name).unwrap();

        let report = add_metadata(&path, &MetadataRecord::new("Song", "Alice", "Album")).unwrap();
        assert!(matches!(report.cover, CoverOutcome::NotRequested));
        assert!(extract_cover(&path).unwrap().is_none(), "{}", name);
    }
}

#[test]
fn test_missing_cover_still_persists_other_fields() {
    for (fixture, name) in CONTAINERS {
        let temp_dir = TempDir::new().unwrap();
        let path = fixture(temp_dir.path(), name).unwrap();
        let cover = temp_dir.path().join("does-not-exist.jpg");

        let (report, logs) = capture_logs(|| add_metadata(&path, &record_with_cover(cover)));
        let report = report.unwrap();

        assert!(
            matches!(
                report.cover,
                CoverOutcome::Skipped(CoverEmbedFailure::Unreadable { .. })
            ),
            "{}: {:?}",
            name,
            report.cover
        );
        logs.assert_logged(Level::WARN, "Failed to add cover art");

        let meta = extract_metadata(&path).unwrap();
        assert_eq!(meta.title, "Song", "{}", name);
        assert_eq!(meta.album, "Album", "{}", name);
        assert!(extract_cover(&path).unwrap().is_none(), "{}", name);
    }
}

#[test]
fn test_empty_cover_file_is_skipped() {
    let temp_dir = TempDir::new().unwrap();
    let path = write_opus(temp_dir.path(), "song.opus").unwrap();
    let cover = write_image(temp_dir.path(), "cover.png", &[]).unwrap();

    let report = add_metadata(&path, &record_with_cover(cover)).unwrap();
    assert!(matches!(
        report.cover,
        CoverOutcome::Skipped(CoverEmbedFailure::Empty { .. })
    ));
    assert!(extract_cover(&path).unwrap().is_none());
}

#[test]
fn test_new_front_cover_replaces_old_one() {
    for (fixture, name) in CONTAINERS {
        let temp_dir = TempDir::new().unwrap();
        let path = fixture(temp_dir.path(), name).unwrap();
        let jpeg = write_image(temp_dir.path(), "old.jpg", &JPEG_STUB).unwrap();
        let png = write_image(temp_dir.path(), "new.png", &PNG_1X1).unwrap();

        add_metadata(&path, &record_with_cover(jpeg)).unwrap();
        add_metadata(&path, &record_with_cover(png)).unwrap();

        let stored = extract_cover(&path).unwrap().expect("cover stored");
        assert_eq!(stored.mime_type, "image/png", "{}", name);
    }
}
