//! # Photo Indexer
//!
//! Batch-produces three resized JPEG derivatives for every JPEG in a folder.
//! An input file is admitted by its content, never its extension, and each
//! admitted photo is scaled into three bounding boxes:
//!
//! ```text
//! <output>/<name>            3000 x 3000   full
//! <output>/med/<name>        1000 x 1000   medium
//! <output>/small/<name>       200 x  200   small
//! ```
//!
//! Landscapes are pinned to the box height and portraits (and squares) to the
//! box width, so the other side may exceed the box. Aspect ratio is preserved.
//!
//! # Pipeline
//!
//! ```text
//! index      list input dir → for each entry, in listing order
//!   sniff    first 512 bytes → image/jpeg?          (everything else skipped)
//!   metadata optional <output>/<name>.json EXIF sidecar
//!   fanout   full | medium | small in parallel, joined before the next file
//!     resize identify → decode → classify → plan → mkdir → Lanczos3 → JPEG q80
//! ```
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`index`] | Directory loop, ProcessedCount, per-file reports and run summary |
//! | [`sniff`] | Content-type detection from the leading bytes of a file |
//! | [`fanout`] | Three-worker pool that runs one file's derivatives concurrently |
//! | [`imaging`] | Orientation rules, size planning, the resize engine and its backend trait |
//! | [`metadata`] | EXIF extraction into JSON sidecars |
//! | [`config`] | Optional TOML config: metadata, failure policy, logging |
//! | [`types`] | Derivative kinds, resize targets, failure stages |
//! | [`output`] | CLI progress and summary formatting |
//! | [`logging`] | `tracing` subscriber setup |
//!
//! # Design Decisions
//!
//! ## Bounded Parallelism
//!
//! Files are indexed one at a time. Only the three derivatives of the current
//! file run concurrently, on a dedicated three-thread pool, so there are never
//! more than three decoded images in memory.
//!
//! ## Failures Are Data
//!
//! A failed derivative never panics and never silently disappears: it is
//! recorded in the run's [`index::IndexSummary`] with the stage it failed at.
//! Whether the run continues past it is a config choice
//! ([`config::ErrorPolicy`]).
//!
//! ## Pure-Rust Imaging
//!
//! The [`imaging`] module uses the `image` crate for decoding, Lanczos3
//! resampling and JPEG encoding. There are no system dependencies.

pub mod config;
pub mod fanout;
pub mod imaging;
pub mod index;
pub mod logging;
pub mod metadata;
pub mod output;
pub mod sniff;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
