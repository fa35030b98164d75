//! Directory indexing: the loop that drives everything else.
//!
//! For every immediate entry of the input directory, in listing order:
//!
//! ```text
//! directory?            → skipped
//! sniff first 512 bytes → unreadable: skipped (warning) | not JPEG: skipped
//! processed += 1
//! metadata sidecar      (only when enabled)
//! fan-out full/med/small, wait for all three
//! ```
//!
//! Files are strictly sequential. Only the three derivatives of the current
//! file run concurrently, so at most three decode/encode pipelines are alive
//! at any time.
//!
//! ## Failures
//!
//! Every entry ends up in the [`IndexSummary`] as indexed, skipped or failed.
//! With [`ErrorPolicy::Continue`] the loop always runs to the end; with
//! [`ErrorPolicy::Abort`] the first unreadable entry, failed derivative or
//! failed sidecar ends the run with [`IndexError::Aborted`]. A missing or
//! unreadable input directory always ends the run.

use crate::config::{ErrorPolicy, IndexerConfig};
use crate::fanout::{Derivative, DerivativeFailure, FanOut};
use crate::imaging::{ImageBackend, RustBackend};
use crate::metadata::write_sidecar;
use crate::sniff::{ContentType, sniff_file};
use crate::types::{ResizeTarget, Stage, standard_targets};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use thiserror::Error;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum IndexError {
    #[error("Failed to read input directory {path}: {source}")]
    ReadDir {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Input {path} is not a directory")]
    NotADirectory { path: PathBuf },
    #[error("Failed to start resize workers: {0}")]
    Workers(#[from] rayon::ThreadPoolBuildError),
    #[error("Aborted at {path} ({stage}): {message}")]
    Aborted {
        path: PathBuf,
        stage: Stage,
        message: String,
    },
}

/// Options for one indexing run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IndexOptions {
    /// EXIF fields for sidecars; `None` disables sidecars.
    pub metadata_fields: Option<Vec<String>>,
    pub on_error: ErrorPolicy,
}

impl IndexOptions {
    pub fn from_config(config: &IndexerConfig) -> Self {
        Self {
            metadata_fields: config
                .metadata
                .enabled
                .then(|| config.metadata.fields.clone()),
            on_error: config.processing.on_error,
        }
    }
}

/// Why an entry produced no derivatives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case", tag = "reason", content = "detail")]
pub enum SkipReason {
    Directory,
    NotJpeg(ContentType),
    /// The entry could not be opened or read for sniffing.
    Unreadable(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case", tag = "status")]
pub enum FileOutcome {
    /// All derivatives written.
    Indexed { derivatives: Vec<Derivative> },
    Skipped { reason: SkipReason },
    /// At least one derivative failed; `derivatives` holds the ones written.
    Failed {
        derivatives: Vec<Derivative>,
        failures: Vec<DerivativeFailure>,
    },
}

/// Per-entry result of an indexing run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileReport {
    pub path: PathBuf,
    /// 1-based position among admitted files; `None` for skipped entries.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number: Option<usize>,
    pub outcome: FileOutcome,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sidecar: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata_error: Option<String>,
}

impl FileReport {
    fn skipped(path: &Path, reason: SkipReason) -> Self {
        Self {
            path: path.to_path_buf(),
            number: None,
            outcome: FileOutcome::Skipped { reason },
            sidecar: None,
            metadata_error: None,
        }
    }
}

/// Result of a full run over one input directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IndexSummary {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    /// Entries admitted by the content gate.
    pub processed: usize,
    pub files: Vec<FileReport>,
}

impl IndexSummary {
    fn count(&self, pred: impl Fn(&FileOutcome) -> bool) -> usize {
        self.files.iter().filter(|f| pred(&f.outcome)).count()
    }

    pub fn indexed(&self) -> usize {
        self.count(|o| matches!(o, FileOutcome::Indexed { .. }))
    }

    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, FileOutcome::Skipped { .. }))
    }

    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, FileOutcome::Failed { .. }))
    }

    /// Entries skipped because they could not be read.
    pub fn unreadable(&self) -> usize {
        self.count(|o| {
            matches!(
                o,
                FileOutcome::Skipped {
                    reason: SkipReason::Unreadable(_)
                }
            )
        })
    }

    /// No failed derivative, unreadable entry or failed sidecar.
    pub fn is_success(&self) -> bool {
        self.failed() == 0
            && self.unreadable() == 0
            && self.files.iter().all(|f| f.metadata_error.is_none())
    }
}

/// Progress events, sent as they happen.
#[derive(Debug, Clone)]
pub enum IndexEvent {
    Started { input: PathBuf, output: PathBuf },
    Entry(FileReport),
}

/// Index `input` into `output` with the pure Rust backend.
pub fn index_folder(
    input: &Path,
    output: &Path,
    options: &IndexOptions,
    events: Option<Sender<IndexEvent>>,
) -> Result<IndexSummary, IndexError> {
    index_folder_with_backend(&RustBackend::new(), input, output, options, events)
}

/// Index using a specific backend (allows testing with mock).
pub fn index_folder_with_backend(
    backend: &impl ImageBackend,
    input: &Path,
    output: &Path,
    options: &IndexOptions,
    events: Option<Sender<IndexEvent>>,
) -> Result<IndexSummary, IndexError> {
    let targets = standard_targets(output);
    Indexer::new(backend, output, &targets, options, events)?.run(input)
}

struct Indexer<'a, B: ImageBackend> {
    backend: &'a B,
    fanout: FanOut,
    output: &'a Path,
    targets: &'a [ResizeTarget],
    options: &'a IndexOptions,
    events: Option<Sender<IndexEvent>>,
}

impl<'a, B: ImageBackend> Indexer<'a, B> {
    fn new(
        backend: &'a B,
        output: &'a Path,
        targets: &'a [ResizeTarget],
        options: &'a IndexOptions,
        events: Option<Sender<IndexEvent>>,
    ) -> Result<Self, IndexError> {
        Ok(Self {
            backend,
            fanout: FanOut::new()?,
            output,
            targets,
            options,
            events,
        })
    }

    fn emit(&self, event: IndexEvent) {
        if let Some(tx) = &self.events {
            // A gone receiver only means nobody is printing
            tx.send(event).ok();
        }
    }

    fn aborts(&self) -> bool {
        self.options.on_error == ErrorPolicy::Abort
    }

    fn run(self, input: &Path) -> Result<IndexSummary, IndexError> {
        let read_dir_error = |source| IndexError::ReadDir {
            path: input.to_path_buf(),
            source,
        };
        let meta = std::fs::metadata(input).map_err(read_dir_error)?;
        if !meta.is_dir() {
            return Err(IndexError::NotADirectory {
                path: input.to_path_buf(),
            });
        }

        info!(input = %input.display(), output = %self.output.display(), "indexing folder");
        self.emit(IndexEvent::Started {
            input: input.to_path_buf(),
            output: self.output.to_path_buf(),
        });

        let mut summary = IndexSummary {
            input_dir: input.to_path_buf(),
            output_dir: self.output.to_path_buf(),
            processed: 0,
            files: Vec::new(),
        };

        for entry in WalkDir::new(input).min_depth(1).max_depth(1) {
            let entry = entry.map_err(|e| read_dir_error(e.into()))?;
            let path = entry.path();

            // Follows symlinks, so a link to a directory is skipped too
            let report = if path.is_dir() {
                debug!(path = %path.display(), "skipping directory");
                FileReport::skipped(path, SkipReason::Directory)
            } else {
                match sniff_file(path) {
                    Err(e) => {
                        warn!(path = %path.display(), error = %e, "skipping unreadable entry");
                        let reason = SkipReason::Unreadable(e.to_string());
                        let report = FileReport::skipped(path, reason);
                        if self.aborts() {
                            self.emit(IndexEvent::Entry(report));
                            return Err(IndexError::Aborted {
                                path: path.to_path_buf(),
                                stage: Stage::Sniff,
                                message: e.to_string(),
                            });
                        }
                        report
                    }
                    Ok(content_type) if !content_type.is_jpeg() => {
                        debug!(path = %path.display(), %content_type, "skipping non-JPEG entry");
                        FileReport::skipped(path, SkipReason::NotJpeg(content_type))
                    }
                    Ok(_) => {
                        summary.processed += 1;
                        let report = self.index_file(path, summary.processed)?;
                        summary.files.push(report);
                        continue;
                    }
                }
            };

            self.emit(IndexEvent::Entry(report.clone()));
            summary.files.push(report);
        }

        info!(
            processed = summary.processed,
            indexed = summary.indexed(),
            skipped = summary.skipped(),
            failed = summary.failed(),
            "indexing finished"
        );
        Ok(summary)
    }

    /// Sidecar + fan-out for one admitted file. Emits the entry event.
    fn index_file(&self, path: &Path, number: usize) -> Result<FileReport, IndexError> {
        let mut report = FileReport {
            path: path.to_path_buf(),
            number: Some(number),
            outcome: FileOutcome::Indexed {
                derivatives: Vec::new(),
            },
            sidecar: None,
            metadata_error: None,
        };

        if let Some(fields) = &self.options.metadata_fields {
            match write_sidecar(path, self.output, fields) {
                Ok(sidecar) => report.sidecar = Some(sidecar),
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "metadata extraction failed");
                    if self.aborts() {
                        return Err(IndexError::Aborted {
                            path: path.to_path_buf(),
                            stage: Stage::Metadata,
                            message: e.to_string(),
                        });
                    }
                    report.metadata_error = Some(e.to_string());
                }
            }
        }

        let mut derivatives = Vec::new();
        let mut failures = Vec::new();
        for outcome in self.fanout.run(self.backend, path, self.targets) {
            match outcome.result {
                Ok(receipt) => derivatives.push(Derivative {
                    kind: outcome.kind,
                    receipt,
                }),
                Err(e) => {
                    warn!(
                        path = %path.display(),
                        kind = %outcome.kind,
                        stage = %e.stage(),
                        error = %e,
                        "derivative failed"
                    );
                    failures.push(DerivativeFailure::new(outcome.kind, &e));
                }
            }
        }

        report.outcome = if failures.is_empty() {
            FileOutcome::Indexed { derivatives }
        } else {
            FileOutcome::Failed {
                derivatives,
                failures,
            }
        };
        self.emit(IndexEvent::Entry(report.clone()));

        if let (true, FileOutcome::Failed { failures, .. }) = (self.aborts(), &report.outcome) {
            let first = &failures[0];
            return Err(IndexError::Aborted {
                path: path.to_path_buf(),
                stage: first.stage,
                message: first.message.clone(),
            });
        }
        Ok(report)
    }
}
