//! End-to-end runs of `index_folder` with the real image backend.
//!
//! The full-size scenario writes 3000px derivatives and takes a while in debug
//! builds. Run it with: cargo test --test index_folder -- --ignored

use image::codecs::jpeg::JpegEncoder;
use image::{ExtendedColorType, ImageEncoder, ImageReader, RgbImage};
use photo_indexer::index::{FileOutcome, IndexError, IndexOptions, index_folder};
use std::path::Path;
use tempfile::TempDir;

fn write_jpeg(path: &Path, width: u32, height: u32) {
    let img = RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([(x / 16 % 256) as u8, (y / 16 % 256) as u8, 96])
    });
    let file = std::io::BufWriter::new(std::fs::File::create(path).unwrap());
    JpegEncoder::new_with_quality(file, 70)
        .write_image(img.as_raw(), width, height, ExtendedColorType::Rgb8)
        .unwrap();
}

fn dimensions(path: &Path) -> (u32, u32) {
    ImageReader::open(path)
        .unwrap()
        .with_guessed_format()
        .unwrap()
        .into_dimensions()
        .unwrap()
}

#[test]
#[ignore]
fn full_size_landscape_portrait_and_text() {
    let tmp = TempDir::new().unwrap();
    let input = tmp.path().join("photos");
    let out = tmp.path().join("out");
    std::fs::create_dir_all(&input).unwrap();
    write_jpeg(&input.join("landscape.jpg"), 4000, 2667);
    write_jpeg(&input.join("portrait.jpg"), 2667, 4000);
    std::fs::write(input.join("notes.txt"), "shot list\n").unwrap();

    let summary = index_folder(&input, &out, &IndexOptions::default(), None).unwrap();

    assert_eq!(summary.processed, 2);
    assert_eq!(summary.indexed(), 2);
    assert_eq!(summary.skipped(), 1);
    assert!(summary.is_success());

    for dir in [out.clone(), out.join("med"), out.join("small")] {
        let mut names: Vec<String> = std::fs::read_dir(&dir)
            .unwrap()
            .map(|e| e.unwrap())
            .filter(|e| e.file_type().unwrap().is_file())
            .map(|e| e.file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        assert_eq!(names, vec!["landscape.jpg", "portrait.jpg"], "in {}", dir.display());
    }

    assert_eq!(dimensions(&out.join("landscape.jpg")), (4499, 3000));
    assert_eq!(dimensions(&out.join("portrait.jpg")), (3000, 4499));
    assert_eq!(dimensions(&out.join("med/landscape.jpg")), (1500, 1000));
    assert_eq!(dimensions(&out.join("med/portrait.jpg")), (1000, 1500));
    assert_eq!(dimensions(&out.join("small/landscape.jpg")), (300, 200));
    assert_eq!(dimensions(&out.join("small/portrait.jpg")), (200, 300));
}

#[test]
fn folder_without_photos_writes_nothing() {
    let tmp = TempDir::new().unwrap();
    let input = tmp.path().join("photos");
    let out = tmp.path().join("out");
    std::fs::create_dir_all(input.join("raw")).unwrap();
    std::fs::write(input.join("notes.txt"), "shot list\n").unwrap();
    std::fs::write(input.join("fake.jpg"), "<html><body>not a photo</body></html>").unwrap();

    let summary = index_folder(&input, &out, &IndexOptions::default(), None).unwrap();

    assert_eq!(summary.processed, 0);
    assert_eq!(summary.skipped(), 3);
    assert!(
        summary
            .files
            .iter()
            .all(|f| matches!(f.outcome, FileOutcome::Skipped { .. }))
    );
    assert!(!out.exists());
}

#[test]
fn missing_input_is_an_error() {
    let tmp = TempDir::new().unwrap();
    let err = index_folder(
        &tmp.path().join("absent"),
        &tmp.path().join("out"),
        &IndexOptions::default(),
        None,
    )
    .unwrap_err();
    assert!(matches!(err, IndexError::ReadDir { .. }));
}
