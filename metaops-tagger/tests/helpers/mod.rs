//! Test helper utilities
//!
//! Shared utilities for testing metaops-tagger

#![allow(dead_code)]

pub mod fixtures;
pub mod log_capture;

pub use fixtures::{write_image, write_m4a, write_mp3, write_opus, JPEG_STUB, PNG_1X1};
pub use log_capture::{capture_logs, LogCapture};
