//! The resize engine: one source image, one bounding box, one derivative.
//!
//! ```text
//! identify → decode → classify/plan size → ensure destination dir → resize/encode/write
//! ```
//!
//! Each step fails with its own [`ResizeError`] so callers can report the
//! stage. There are no retries. Nothing touches the destination until the
//! source has fully decoded.

use super::backend::{BackendError, ImageBackend};
use super::calculations::{Orientation, plan_dimensions};
use super::params::{DERIVATIVE_QUALITY, ResizeParams};
use crate::types::Stage;
use serde::Serialize;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum ResizeError {
    #[error(transparent)]
    Backend(#[from] BackendError),
    #[error("Image {path} has zero width or height")]
    EmptyImage { path: PathBuf },
    #[error("Source path {path} has no file name")]
    NoFileName { path: PathBuf },
    #[error("Failed to create directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl ResizeError {
    pub fn stage(&self) -> Stage {
        match self {
            ResizeError::Backend(e) => e.stage(),
            ResizeError::EmptyImage { .. } | ResizeError::NoFileName { .. } => Stage::Identify,
            ResizeError::CreateDir { .. } => Stage::CreateDir,
        }
    }
}

/// What a resize was asked to do.
///
/// `bound_width`/`bound_height` echo the requested box, not the pixel size of
/// the written file; `width`/`height` are the planned output size.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResizeReceipt {
    pub bound_width: u32,
    pub bound_height: u32,
    pub orientation: Orientation,
    pub width: u32,
    pub height: u32,
    pub output: PathBuf,
}

/// Compose `<stem><suffix><.ext>` from a source path.
///
/// ```
/// # use std::path::Path;
/// # use photo_indexer::imaging::output_file_name;
/// assert_eq!(output_file_name(Path::new("/in/dawn.jpg"), "-med").unwrap(), "dawn-med.jpg");
/// assert_eq!(output_file_name(Path::new("/in/README"), "").unwrap(), "README");
/// ```
pub fn output_file_name(source: &Path, suffix: &str) -> Option<OsString> {
    let mut name = source.file_stem()?.to_os_string();
    name.push(suffix);
    if let Some(ext) = source.extension() {
        name.push(".");
        name.push(ext);
    }
    Some(name)
}

/// Produce one derivative of `source` inside `destination`.
///
/// Landscape sources are scaled so the output height equals `bound_height`;
/// portrait and square sources so the output width equals `bound_width`. The
/// other side follows the source aspect ratio. `destination` is created once
/// the source has decoded, and an existing output file is replaced.
pub fn resize_image(
    backend: &impl ImageBackend,
    source: &Path,
    destination: &Path,
    suffix: &str,
    bound_width: u32,
    bound_height: u32,
) -> Result<ResizeReceipt, ResizeError> {
    let dims = backend.identify(source)?;
    if dims.width == 0 || dims.height == 0 {
        return Err(ResizeError::EmptyImage {
            path: source.to_path_buf(),
        });
    }

    let image = backend.decode(source)?;

    let (orientation, width, height) =
        plan_dimensions((dims.width, dims.height), (bound_width, bound_height));
    debug!(
        source = %source.display(),
        original = %format!("{}x{}", dims.width, dims.height),
        %orientation,
        planned = %format!("{width}x{height}"),
        "planned resize"
    );

    let file_name = output_file_name(source, suffix).ok_or_else(|| ResizeError::NoFileName {
        path: source.to_path_buf(),
    })?;
    std::fs::create_dir_all(destination).map_err(|e| ResizeError::CreateDir {
        path: destination.to_path_buf(),
        source: e,
    })?;
    let output = destination.join(file_name);

    backend.resize(
        &image,
        &ResizeParams {
            source: source.to_path_buf(),
            output: output.clone(),
            width,
            height,
            quality: DERIVATIVE_QUALITY,
        },
    )?;
    debug!(output = %output.display(), "wrote derivative");

    Ok(ResizeReceipt {
        bound_width,
        bound_height,
        orientation,
        width,
        height,
        output,
    })
}
