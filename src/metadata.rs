//! EXIF metadata extraction and JSON sidecars.
//!
//! Disabled by default. When enabled, the indexer calls [`write_sidecar`]
//! once per admitted file, before its derivatives are produced:
//!
//! ```text
//! <output>/landscape.jpg.json
//! {
//!   "model": "X-T5",
//!   "description": "Morning fog over the lake",
//!   "capture_time": "2024:05:01 06:12:44"
//! }
//! ```
//!
//! Only the EXIF fields named in the configured field set are read. A JPEG
//! with no EXIF segment produces a record with every field `null`.

use exif::{In, Reader, Tag, Value};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MetadataError {
    #[error("Failed to open {path}: {source}")]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to read EXIF from {path}: {message}")]
    Exif { path: PathBuf, message: String },
    #[error("Failed to write sidecar {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// EXIF field names understood by the extractor.
pub const KNOWN_FIELDS: &[&str] = &["Model", "ImageDescription", "DateTimeOriginal"];

/// The default field set: everything the record can hold.
pub fn default_fields() -> Vec<String> {
    KNOWN_FIELDS.iter().map(|f| f.to_string()).collect()
}

/// Metadata record written next to the derivatives.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhotoMetadata {
    /// EXIF `Model`
    pub model: Option<String>,
    /// EXIF `ImageDescription`
    pub description: Option<String>,
    /// EXIF `DateTimeOriginal`, falling back to `DateTime`
    pub capture_time: Option<String>,
}

fn wants(fields: &[String], name: &str) -> bool {
    fields.iter().any(|f| f == name)
}

/// First ASCII component of a field, trimmed of padding and NULs.
fn ascii_field(exif: &exif::Exif, tag: Tag) -> Option<String> {
    let field = exif.get_field(tag, In::PRIMARY)?;
    match &field.value {
        Value::Ascii(parts) => parts
            .first()
            .map(|bytes| String::from_utf8_lossy(bytes).trim_matches(['\0', ' ']).to_string())
            .filter(|s| !s.is_empty()),
        _ => None,
    }
}

/// Extract the requested fields from `path`.
pub fn extract_metadata(path: &Path, fields: &[String]) -> Result<PhotoMetadata, MetadataError> {
    let file = File::open(path).map_err(|source| MetadataError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let mut reader = BufReader::new(file);

    let exif = match Reader::new().read_from_container(&mut reader) {
        Ok(exif) => exif,
        Err(exif::Error::NotFound(_)) => return Ok(PhotoMetadata::default()),
        Err(e) => {
            return Err(MetadataError::Exif {
                path: path.to_path_buf(),
                message: e.to_string(),
            });
        }
    };

    Ok(PhotoMetadata {
        model: wants(fields, "Model")
            .then(|| ascii_field(&exif, Tag::Model))
            .flatten(),
        description: wants(fields, "ImageDescription")
            .then(|| ascii_field(&exif, Tag::ImageDescription))
            .flatten(),
        capture_time: wants(fields, "DateTimeOriginal")
            .then(|| {
                ascii_field(&exif, Tag::DateTimeOriginal)
                    .or_else(|| ascii_field(&exif, Tag::DateTime))
            })
            .flatten(),
    })
}

/// Sidecar location: `<output_dir>/<original file name>.json`.
pub fn sidecar_path(source: &Path, output_dir: &Path) -> Option<PathBuf> {
    let mut name = source.file_name()?.to_os_string();
    name.push(".json");
    Some(output_dir.join(name))
}

/// Extract metadata from `source` and write it as indented JSON into `output_dir`.
///
/// Returns the sidecar path.
pub fn write_sidecar(
    source: &Path,
    output_dir: &Path,
    fields: &[String],
) -> Result<PathBuf, MetadataError> {
    let metadata = extract_metadata(source, fields)?;
    let path = sidecar_path(source, output_dir).ok_or_else(|| MetadataError::Exif {
        path: source.to_path_buf(),
        message: "source has no file name".to_string(),
    })?;

    std::fs::create_dir_all(output_dir).map_err(|e| MetadataError::Write {
        path: output_dir.to_path_buf(),
        source: e,
    })?;
    let json = serde_json::to_string_pretty(&metadata)?;
    std::fs::write(&path, json).map_err(|e| MetadataError::Write {
        path: path.clone(),
        source: e,
    })?;
    Ok(path)
}
