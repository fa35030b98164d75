//! Pure Rust image processing backend.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Identify | `image::ImageReader::into_dimensions` (header only) |
//! | Decode (JPEG) | EOI check, then `image::ImageReader::decode` |
//! | Resize | `image::DynamicImage::resize_exact` with `Lanczos3` |
//! | Encode → JPEG | `image::codecs::jpeg::JpegEncoder::new_with_quality` |
//!
//! The format is always sniffed from content, never from the extension, so a
//! JPEG named `photo.dat` decodes the same as `photo.jpg`.
//!
//! The `image` JPEG decoder fills a truncated scan with gray instead of
//! failing, so a JPEG payload must end with the EOI marker (`FF D9`, trailing
//! padding aside) before it is decoded.

use super::backend::{BackendError, Dimensions, ImageBackend};
use super::params::ResizeParams;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{ColorType, DynamicImage, ImageFormat, ImageReader};
use std::fs::File;
use std::io::{BufReader, BufWriter, Cursor, Write};
use std::path::Path;

/// Pure Rust backend using the `image` crate.
///
/// See the [module docs](self) for the crate-to-operation mapping.
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

fn open_reader(path: &Path) -> std::io::Result<ImageReader<BufReader<File>>> {
    ImageReader::open(path)?.with_guessed_format()
}

/// Whether a JPEG stream ends with the EOI marker.
///
/// Trailing `0x00`/`0xFF` padding is ignored. Entropy-coded data never
/// contains `FF D9`, so a cut inside the scan cannot pass.
fn has_end_of_image(data: &[u8]) -> bool {
    match data.iter().rposition(|&b| b != 0x00 && b != 0xFF) {
        Some(last) => last > 0 && data[last] == 0xD9 && data[last - 1] == 0xFF,
        None => false,
    }
}

/// Load and decode an image from disk.
fn load_image(path: &Path) -> Result<DynamicImage, BackendError> {
    let decode_error = |message: String| BackendError::Decode {
        path: path.to_path_buf(),
        message,
    };
    let data = std::fs::read(path).map_err(|e| decode_error(e.to_string()))?;
    let reader = ImageReader::new(Cursor::new(data.as_slice()))
        .with_guessed_format()
        .map_err(|e| decode_error(e.to_string()))?;
    if reader.format() == Some(ImageFormat::Jpeg) && !has_end_of_image(&data) {
        return Err(decode_error("truncated JPEG: missing end-of-image marker".into()));
    }
    reader.decode().map_err(|e| decode_error(e.to_string()))
}

/// Encode as JPEG and write to `path`, replacing any existing file.
fn save_jpeg(img: &DynamicImage, path: &Path, quality: u8) -> Result<(), BackendError> {
    let write_error = |source| BackendError::Write {
        path: path.to_path_buf(),
        source,
    };

    // JPEG carries no alpha channel
    let converted;
    let img = match img.color() {
        ColorType::L8 | ColorType::Rgb8 => img,
        _ => {
            converted = DynamicImage::ImageRgb8(img.to_rgb8());
            &converted
        }
    };

    let file = File::create(path).map_err(write_error)?;
    let mut writer = BufWriter::new(file);
    let encoder = JpegEncoder::new_with_quality(&mut writer, quality);
    img.write_with_encoder(encoder)
        .map_err(|e| BackendError::Encode {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
    writer.flush().map_err(write_error)
}

impl ImageBackend for RustBackend {
    type Image = DynamicImage;

    fn identify(&self, path: &Path) -> Result<Dimensions, BackendError> {
        let identify_error = |message: String| BackendError::Identify {
            path: path.to_path_buf(),
            message,
        };
        let (width, height) = open_reader(path)
            .map_err(|e| identify_error(e.to_string()))?
            .into_dimensions()
            .map_err(|e| identify_error(e.to_string()))?;
        Ok(Dimensions { width, height })
    }

    fn decode(&self, path: &Path) -> Result<DynamicImage, BackendError> {
        load_image(path)
    }

    fn resize(&self, img: &DynamicImage, params: &ResizeParams) -> Result<(), BackendError> {
        let resized = img.resize_exact(params.width, params.height, FilterType::Lanczos3);
        save_jpeg(&resized, &params.output, params.quality.value())
    }
}
