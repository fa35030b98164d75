//! CLI output formatting for indexing runs.
//!
//! # Information-First Display
//!
//! Output lists the photos that were indexed, not the files that were written.
//! Each admitted photo leads with its positional index (its ProcessedCount
//! value) and file name, with one indented line per derivative. Skipped
//! entries get one line without an index, so the numbering shows only the
//! photos that passed the content gate.
//!
//! # Output Format
//!
//! ```text
//! Indexing photos → out
//! 001 landscape.jpg
//!     full: 4499x3000 (landscape)
//!     medium: 1500x1000 (landscape)
//!     small: 300x200 (landscape)
//!     Metadata: out/landscape.jpg.json
//! --- notes.txt: skipped (text/plain; charset=utf-8)
//! 002 broken.jpg
//!     full: FAILED at decode: Failed to decode photos/broken.jpg: ...
//!
//! Processed 2 photos: 1 indexed, 1 failed, 1 skipped
//! ```
//!
//! # Architecture
//!
//! Each display has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure: no I/O, no side effects.

use crate::fanout::{Derivative, DerivativeFailure};
use crate::index::{FileOutcome, FileReport, IndexEvent, IndexSummary, SkipReason};
use std::path::Path;

// ============================================================================
// Shared display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// File name of an entry, falling back to the full path.
fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|f| f.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn derivative_line(derivative: &Derivative) -> String {
    let receipt = &derivative.receipt;
    format!(
        "{}{}: {}x{} ({})",
        indent(1),
        derivative.kind,
        receipt.width,
        receipt.height,
        receipt.orientation
    )
}

fn failure_line(failure: &DerivativeFailure) -> String {
    format!(
        "{}{}: FAILED at {}: {}",
        indent(1),
        failure.kind,
        failure.stage,
        failure.message
    )
}

fn skip_detail(reason: &SkipReason) -> String {
    match reason {
        SkipReason::Directory => "directory".to_string(),
        SkipReason::NotJpeg(content_type) => content_type.to_string(),
        SkipReason::Unreadable(message) => format!("unreadable: {message}"),
    }
}

fn plural(n: usize, word: &str) -> String {
    if n == 1 {
        format!("{n} {word}")
    } else {
        format!("{n} {word}s")
    }
}

// ============================================================================
// Progress events
// ============================================================================

/// Format one entry report as display lines.
pub fn format_report(report: &FileReport) -> Vec<String> {
    let name = display_name(&report.path);
    let mut lines = Vec::new();

    let (derivatives, failures) = match &report.outcome {
        FileOutcome::Skipped { reason } => {
            return vec![format!("--- {}: skipped ({})", name, skip_detail(reason))];
        }
        FileOutcome::Indexed { derivatives } => (derivatives.as_slice(), &[][..]),
        FileOutcome::Failed {
            derivatives,
            failures,
        } => (derivatives.as_slice(), failures.as_slice()),
    };

    let header = match report.number {
        Some(n) => format!("{} {}", format_index(n), name),
        None => name,
    };
    lines.push(header);

    lines.extend(derivatives.iter().map(derivative_line));
    lines.extend(failures.iter().map(failure_line));

    if let Some(sidecar) = &report.sidecar {
        lines.push(format!("{}Metadata: {}", indent(1), sidecar.display()));
    }
    if let Some(error) = &report.metadata_error {
        lines.push(format!("{}Metadata: FAILED: {}", indent(1), error));
    }
    lines
}

/// Format a single progress event as display lines.
pub fn format_event(event: &IndexEvent) -> Vec<String> {
    match event {
        IndexEvent::Started { input, output } => {
            vec![format!(
                "Indexing {} \u{2192} {}",
                input.display(),
                output.display()
            )]
        }
        IndexEvent::Entry(report) => format_report(report),
    }
}

/// Print a progress event to stdout.
pub fn print_event(event: &IndexEvent) {
    for line in format_event(event) {
        println!("{}", line);
    }
}

// ============================================================================
// Summary
// ============================================================================

/// Format the closing summary of a run.
pub fn format_summary(summary: &IndexSummary) -> Vec<String> {
    let mut lines = vec![
        String::new(),
        format!(
            "Processed {}: {} indexed, {} failed, {} skipped",
            plural(summary.processed, "photo"),
            summary.indexed(),
            summary.failed(),
            summary.skipped()
        ),
    ];
    let unreadable = summary.unreadable();
    if unreadable > 0 {
        lines.push(format!(
            "{}{} could not be read",
            indent(1),
            if unreadable == 1 {
                "1 entry".to_string()
            } else {
                format!("{unreadable} entries")
            }
        ));
    }
    let metadata_failures = summary
        .files
        .iter()
        .filter(|f| f.metadata_error.is_some())
        .count();
    if metadata_failures > 0 {
        lines.push(format!(
            "{}{} without metadata",
            indent(1),
            plural(metadata_failures, "photo")
        ));
    }
    lines
}

/// Print the closing summary to stdout.
pub fn print_summary(summary: &IndexSummary) {
    for line in format_summary(summary) {
        println!("{}", line);
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::{Orientation, ResizeReceipt};
    use crate::sniff::ContentType;
    use crate::types::{DerivativeKind, Stage};
    use std::path::PathBuf;

    fn derivative(kind: DerivativeKind, bound: u32, width: u32, height: u32) -> Derivative {
        let orientation = if width > height {
            Orientation::Landscape
        } else {
            Orientation::Portrait
        };
        Derivative {
            kind,
            receipt: ResizeReceipt {
                bound_width: bound,
                bound_height: bound,
                orientation,
                width,
                height,
                output: PathBuf::from("out/landscape.jpg"),
            },
        }
    }

    fn indexed_report() -> FileReport {
        FileReport {
            path: PathBuf::from("photos/landscape.jpg"),
            number: Some(1),
            outcome: FileOutcome::Indexed {
                derivatives: vec![
                    derivative(DerivativeKind::Full, 3000, 4499, 3000),
                    derivative(DerivativeKind::Medium, 1000, 1500, 1000),
                    derivative(DerivativeKind::Small, 200, 300, 200),
                ],
            },
            sidecar: None,
            metadata_error: None,
        }
    }

    fn summary(files: Vec<FileReport>, processed: usize) -> IndexSummary {
        IndexSummary {
            input_dir: PathBuf::from("photos"),
            output_dir: PathBuf::from("out"),
            processed,
            files,
        }
    }

    // =========================================================================
    // Helper tests
    // =========================================================================

    #[test]
    fn format_index_pads_to_three_digits() {
        assert_eq!(format_index(1), "001");
        assert_eq!(format_index(42), "042");
        assert_eq!(format_index(1234), "1234");
    }

    #[test]
    fn indent_levels() {
        assert_eq!(indent(0), "");
        assert_eq!(indent(1), "    ");
        assert_eq!(indent(2), "        ");
    }

    #[test]
    fn plural_forms() {
        assert_eq!(plural(1, "photo"), "1 photo");
        assert_eq!(plural(0, "photo"), "0 photos");
        assert_eq!(plural(3, "photo"), "3 photos");
    }

    // =========================================================================
    // Event formatting tests
    // =========================================================================

    #[test]
    fn format_started() {
        let event = IndexEvent::Started {
            input: PathBuf::from("photos"),
            output: PathBuf::from("out"),
        };
        assert_eq!(format_event(&event), vec!["Indexing photos \u{2192} out"]);
    }

    #[test]
    fn format_indexed_photo() {
        let lines = format_event(&IndexEvent::Entry(indexed_report()));
        assert_eq!(
            lines,
            vec![
                "001 landscape.jpg",
                "    full: 4499x3000 (landscape)",
                "    medium: 1500x1000 (landscape)",
                "    small: 300x200 (landscape)",
            ]
        );
    }

    #[test]
    fn format_indexed_photo_with_sidecar() {
        let mut report = indexed_report();
        report.sidecar = Some(PathBuf::from("out/landscape.jpg.json"));
        let lines = format_report(&report);
        assert_eq!(lines.last().unwrap(), "    Metadata: out/landscape.jpg.json");
    }

    #[test]
    fn format_skipped_entries() {
        let report = FileReport {
            path: PathBuf::from("photos/notes.txt"),
            number: None,
            outcome: FileOutcome::Skipped {
                reason: SkipReason::NotJpeg(ContentType::TextUtf8),
            },
            sidecar: None,
            metadata_error: None,
        };
        assert_eq!(
            format_report(&report),
            vec!["--- notes.txt: skipped (text/plain; charset=utf-8)"]
        );

        let dir = FileReport {
            path: PathBuf::from("photos/raw"),
            outcome: FileOutcome::Skipped {
                reason: SkipReason::Directory,
            },
            ..report
        };
        assert_eq!(format_report(&dir), vec!["--- raw: skipped (directory)"]);
    }

    #[test]
    fn format_partial_failure() {
        let report = FileReport {
            path: PathBuf::from("photos/p.jpg"),
            number: Some(7),
            outcome: FileOutcome::Failed {
                derivatives: vec![
                    derivative(DerivativeKind::Full, 3000, 3000, 4499),
                    derivative(DerivativeKind::Small, 200, 200, 300),
                ],
                failures: vec![DerivativeFailure {
                    kind: DerivativeKind::Medium,
                    stage: Stage::Encode,
                    message: "disk full".to_string(),
                }],
            },
            sidecar: None,
            metadata_error: Some("bad EXIF".to_string()),
        };
        assert_eq!(
            format_report(&report),
            vec![
                "007 p.jpg",
                "    full: 3000x4499 (portrait)",
                "    small: 200x300 (portrait)",
                "    medium: FAILED at encode: disk full",
                "    Metadata: FAILED: bad EXIF",
            ]
        );
    }

    // =========================================================================
    // Summary formatting tests
    // =========================================================================

    #[test]
    fn format_clean_summary() {
        let skipped = FileReport {
            path: PathBuf::from("photos/notes.txt"),
            number: None,
            outcome: FileOutcome::Skipped {
                reason: SkipReason::NotJpeg(ContentType::TextUtf8),
            },
            sidecar: None,
            metadata_error: None,
        };
        let lines = format_summary(&summary(vec![indexed_report(), skipped], 1));
        assert_eq!(
            lines,
            vec!["", "Processed 1 photo: 1 indexed, 0 failed, 1 skipped"]
        );
    }

    #[test]
    fn format_summary_with_problems() {
        let unreadable = |name: &str| FileReport {
            path: PathBuf::from(name),
            number: None,
            outcome: FileOutcome::Skipped {
                reason: SkipReason::Unreadable("permission denied".to_string()),
            },
            sidecar: None,
            metadata_error: None,
        };
        let mut no_meta = indexed_report();
        no_meta.metadata_error = Some("bad EXIF".to_string());

        let lines = format_summary(&summary(vec![unreadable("a"), unreadable("b"), no_meta], 1));
        assert_eq!(
            lines,
            vec![
                "",
                "Processed 1 photo: 1 indexed, 0 failed, 2 skipped",
                "    2 entries could not be read",
                "    1 photo without metadata",
            ]
        );
    }
}
