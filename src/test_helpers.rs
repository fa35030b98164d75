//! Shared test utilities for the photo-indexer test suite.
//!
//! Synthetic inputs are generated on the fly instead of shipping fixture
//! photos: [`create_test_jpeg`] encodes a gradient of any size, and
//! [`scaled_targets`] mirrors the standard output layout with small bounds so
//! end-to-end tests stay fast.

use crate::types::{DerivativeKind, ResizeTarget};
use image::{ExtendedColorType, ImageEncoder, RgbImage};
use std::path::Path;

// =========================================================================
// Fixture files
// =========================================================================

/// Create a valid baseline JPEG with the given dimensions.
pub fn create_test_jpeg(path: &Path, width: u32, height: u32) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    let img = RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([(x % 256) as u8, (y % 256) as u8, 128])
    });
    let file = std::fs::File::create(path).unwrap();
    let writer = std::io::BufWriter::new(file);
    image::codecs::jpeg::JpegEncoder::new(writer)
        .write_image(img.as_raw(), width, height, ExtendedColorType::Rgb8)
        .unwrap();
}

/// Write a file with arbitrary content, creating parent directories.
pub fn write_file(path: &Path, content: impl AsRef<[u8]>) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(path, content).unwrap();
}

// =========================================================================
// Targets
// =========================================================================

/// Same directories as `standard_targets`, bounds 60/30/10.
pub fn scaled_targets(output_dir: &Path) -> [ResizeTarget; 3] {
    let target = |kind, bound, destination| ResizeTarget {
        kind,
        bound_width: bound,
        bound_height: bound,
        destination,
        suffix: String::new(),
    };
    [
        target(DerivativeKind::Full, 60, output_dir.to_path_buf()),
        target(DerivativeKind::Medium, 30, output_dir.join("med")),
        target(DerivativeKind::Small, 10, output_dir.join("small")),
    ]
}

/// Every file under `root`, relative to it, sorted. Directories are not listed.
pub fn list_files(root: &Path) -> Vec<String> {
    let mut files: Vec<String> = walkdir::WalkDir::new(root)
        .into_iter()
        .map(|e| e.unwrap())
        .filter(|e| e.file_type().is_file())
        .map(|e| {
            e.path()
                .strip_prefix(root)
                .unwrap()
                .to_string_lossy()
                .replace('\\', "/")
        })
        .collect();
    files.sort();
    files
}
