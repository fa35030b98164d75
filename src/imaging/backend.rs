//! Image processing backend trait and shared types.
//!
//! The [`ImageBackend`] trait defines the three operations the resize engine
//! needs, in the order it calls them: identify (read dimensions from the
//! header), decode (read and check the full payload) and resize (resample,
//! encode, write). The engine creates the destination directory between
//! decode and resize, so a corrupt source leaves nothing behind.
//!
//! The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend), built on the `image`
//! crate. Tests use the recording `MockBackend` below.

use super::params::ResizeParams;
use crate::types::Stage;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Backend failures, one variant per stage of the decode → encode pipeline.
#[derive(Error, Debug)]
pub enum BackendError {
    #[error("Failed to read dimensions of {path}: {message}")]
    Identify { path: PathBuf, message: String },
    #[error("Failed to decode {path}: {message}")]
    Decode { path: PathBuf, message: String },
    #[error("Failed to encode {path}: {message}")]
    Encode { path: PathBuf, message: String },
    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl BackendError {
    pub fn stage(&self) -> Stage {
        match self {
            BackendError::Identify { .. } => Stage::Identify,
            BackendError::Decode { .. } => Stage::Decode,
            BackendError::Encode { .. } => Stage::Encode,
            BackendError::Write { .. } => Stage::Write,
        }
    }
}

/// Result of an identify operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

/// Trait for image processing backends.
///
/// `Sync` because the fan-out calls one backend from three worker threads.
pub trait ImageBackend: Sync {
    /// A fully decoded source image.
    type Image;

    /// Get image dimensions without decoding the payload.
    fn identify(&self, path: &Path) -> Result<Dimensions, BackendError>;

    /// Decode the whole payload of `path`. Truncated or corrupt data is a
    /// [`BackendError::Decode`].
    fn decode(&self, path: &Path) -> Result<Self::Image, BackendError>;

    /// Resample `image` to exactly `width`x`height` and write the encoded
    /// result to `params.output`, replacing any existing file. The parent
    /// directory must exist.
    fn resize(&self, image: &Self::Image, params: &ResizeParams) -> Result<(), BackendError>;
}
