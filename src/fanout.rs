//! Concurrent production of one file's derivatives.
//!
//! A [`FanOut`] owns a dedicated rayon pool with exactly [`FanOut::WORKERS`]
//! threads. [`FanOut::run`] spawns one task per target inside a
//! `ThreadPool::scope`, and the scope is the barrier: it returns only after
//! every task has finished, successfully or not. Tasks share nothing mutable;
//! each writes its own slot and its own destination directory, and each
//! decodes the source independently.
//!
//! The pool is separate from rayon's global pool so the per-file parallelism
//! stays at three regardless of core count, and the coordinating thread (the
//! indexer) never runs resize work itself.

use crate::imaging::{ImageBackend, ResizeError, ResizeReceipt, resize_image};
use crate::types::{DerivativeKind, ResizeTarget, Stage};
use serde::Serialize;
use std::path::Path;
use tracing::debug;

/// The result of one derivative task.
#[derive(Debug)]
pub struct DerivativeOutcome {
    pub kind: DerivativeKind,
    pub result: Result<ResizeReceipt, ResizeError>,
}

/// A written derivative and which target it was made for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Derivative {
    pub kind: DerivativeKind,
    #[serde(flatten)]
    pub receipt: ResizeReceipt,
}

/// A failed derivative, flattened to plain data for reports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DerivativeFailure {
    pub kind: DerivativeKind,
    pub stage: Stage,
    pub message: String,
}

impl DerivativeFailure {
    pub fn new(kind: DerivativeKind, error: &ResizeError) -> Self {
        Self {
            kind,
            stage: error.stage(),
            message: error.to_string(),
        }
    }
}

/// Fixed-size worker group for per-file fan-out.
pub struct FanOut {
    pool: rayon::ThreadPool,
}

impl FanOut {
    /// One worker per derivative.
    pub const WORKERS: usize = 3;

    pub fn new() -> Result<Self, rayon::ThreadPoolBuildError> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(Self::WORKERS)
            .thread_name(|i| format!("fanout-{i}"))
            .build()?;
        Ok(Self { pool })
    }

    /// Resize `source` into every target concurrently and wait for all of them.
    ///
    /// Outcomes come back in target order. Completion order between targets is
    /// unspecified.
    pub fn run<B: ImageBackend>(
        &self,
        backend: &B,
        source: &Path,
        targets: &[ResizeTarget],
    ) -> Vec<DerivativeOutcome> {
        let mut slots: Vec<Option<DerivativeOutcome>> = targets.iter().map(|_| None).collect();

        self.pool.scope(|scope| {
            for (slot, target) in slots.iter_mut().zip(targets) {
                scope.spawn(move |_| {
                    debug!(source = %source.display(), kind = %target.kind, "derivative started");
                    let result = resize_image(
                        backend,
                        source,
                        &target.destination,
                        &target.suffix,
                        target.bound_width,
                        target.bound_height,
                    );
                    *slot = Some(DerivativeOutcome {
                        kind: target.kind,
                        result,
                    });
                });
            }
        });

        // Every slot is filled once the scope has returned
        slots.into_iter().flatten().collect()
    }
}
