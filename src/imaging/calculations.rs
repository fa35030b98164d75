//! Pure calculation functions for orientation and derivative dimensions.
//!
//! All functions here are pure and testable without any I/O or images.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Orientation of an image, decided purely by comparing width and height.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    Portrait,
    Landscape,
    Square,
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Orientation::Portrait => "portrait",
            Orientation::Landscape => "landscape",
            Orientation::Square => "square",
        })
    }
}

/// Classify an image by its pixel dimensions.
///
/// # Examples
/// ```
/// # use photo_indexer::imaging::{classify, Orientation};
/// assert_eq!(classify(4000, 2667), Orientation::Landscape);
/// assert_eq!(classify(2667, 4000), Orientation::Portrait);
/// assert_eq!(classify(1, 1), Orientation::Square);
/// ```
pub fn classify(width: u32, height: u32) -> Orientation {
    use std::cmp::Ordering;

    match width.cmp(&height) {
        Ordering::Greater => Orientation::Landscape,
        Ordering::Less => Orientation::Portrait,
        Ordering::Equal => Orientation::Square,
    }
}

/// Which side of the bounding box a resize is pinned to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Constraint {
    /// Output width equals the bound width; height follows the aspect ratio.
    Width(u32),
    /// Output height equals the bound height; width follows the aspect ratio.
    Height(u32),
}

/// Pick the constrained side for an orientation.
///
/// Landscape images are pinned on height, portrait and square images on width.
pub fn constraint_for(orientation: Orientation, bound_width: u32, bound_height: u32) -> Constraint {
    match orientation {
        Orientation::Landscape => Constraint::Height(bound_height),
        Orientation::Portrait | Orientation::Square => Constraint::Width(bound_width),
    }
}

/// Calculate output dimensions for a constraint, preserving aspect ratio.
///
/// The free side is rounded to the nearest pixel and never collapses below 1.
///
/// # Arguments
/// * `source` - Original image dimensions (width, height), both non-zero
/// * `constraint` - The pinned side and its length
///
/// # Returns
/// * `(width, height)` - Exact output dimensions
pub fn constrained_dimensions(source: (u32, u32), constraint: Constraint) -> (u32, u32) {
    let (src_w, src_h) = source;

    match constraint {
        Constraint::Width(w) => {
            let h = (w as f64 * src_h as f64 / src_w as f64).round() as u32;
            (w, h.max(1))
        }
        Constraint::Height(h) => {
            let w = (h as f64 * src_w as f64 / src_h as f64).round() as u32;
            (w.max(1), h)
        }
    }
}

/// Classify `source` and compute the derivative size for a bounding box.
pub fn plan_dimensions(source: (u32, u32), bound: (u32, u32)) -> (Orientation, u32, u32) {
    let orientation = classify(source.0, source.1);
    let (w, h) = constrained_dimensions(source, constraint_for(orientation, bound.0, bound.1));
    (orientation, w, h)
}
