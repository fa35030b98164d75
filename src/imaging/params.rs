//! Parameter types for image operations.
//!
//! These structs describe *what* to do, not *how* to do it. They are the
//! interface between the resize engine in [`operations`](super::operations)
//! (which decides the output size and location) and the
//! [`backend`](super::backend) (which does the pixel work), so the engine can
//! be exercised against a mock backend.

use std::path::PathBuf;

/// Quality setting for lossy image encoding (1-100).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quality(pub u8);

impl Quality {
    pub fn new(value: u8) -> Self {
        Self(value.clamp(1, 100))
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

/// Every derivative is encoded at this quality.
pub const DERIVATIVE_QUALITY: Quality = Quality(80);

impl Default for Quality {
    fn default() -> Self {
        DERIVATIVE_QUALITY
    }
}

/// Parameters for a single resize: exact output size, already planned.
#[derive(Debug, Clone, PartialEq)]
pub struct ResizeParams {
    pub source: PathBuf,
    pub output: PathBuf,
    pub width: u32,
    pub height: u32,
    pub quality: Quality,
}
