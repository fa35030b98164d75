//! Shared types used across the indexing pipeline.
//!
//! These are plain data: they flow from the resize engine through the fan-out
//! into the run summary, and are serialized to JSON with `--summary`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Which of the three derivatives a target produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DerivativeKind {
    Full,
    Medium,
    Small,
}

impl DerivativeKind {
    pub fn label(self) -> &'static str {
        match self {
            DerivativeKind::Full => "full",
            DerivativeKind::Medium => "medium",
            DerivativeKind::Small => "small",
        }
    }
}

impl fmt::Display for DerivativeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One derivative to produce: a bounding box, a destination and a filename suffix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResizeTarget {
    pub kind: DerivativeKind,
    pub bound_width: u32,
    pub bound_height: u32,
    pub destination: PathBuf,
    pub suffix: String,
}

/// Bounding box of the full-size derivative.
pub const FULL_BOUND: u32 = 3000;
/// Bounding box of the `med/` derivative.
pub const MEDIUM_BOUND: u32 = 1000;
/// Bounding box of the `small/` derivative.
pub const SMALL_BOUND: u32 = 200;

/// The three fixed targets for an output directory.
///
/// ```text
/// <output>/<name>.jpg          3000x3000
/// <output>/med/<name>.jpg      1000x1000
/// <output>/small/<name>.jpg     200x200
/// ```
pub fn standard_targets(output_dir: &Path) -> [ResizeTarget; 3] {
    let target = |kind, bound, destination: PathBuf| ResizeTarget {
        kind,
        bound_width: bound,
        bound_height: bound,
        destination,
        suffix: String::new(),
    };
    [
        target(DerivativeKind::Full, FULL_BOUND, output_dir.to_path_buf()),
        target(DerivativeKind::Medium, MEDIUM_BOUND, output_dir.join("med")),
        target(DerivativeKind::Small, SMALL_BOUND, output_dir.join("small")),
    ]
}

/// The pipeline stage a failure happened in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Stage {
    Sniff,
    Identify,
    Decode,
    CreateDir,
    Encode,
    Write,
    Metadata,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Sniff => "sniff",
            Stage::Identify => "identify",
            Stage::Decode => "decode",
            Stage::CreateDir => "create-dir",
            Stage::Encode => "encode",
            Stage::Write => "write",
            Stage::Metadata => "metadata",
        };
        f.write_str(name)
    }
}
