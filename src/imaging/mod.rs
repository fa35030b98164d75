//! Image processing: pure Rust, no system libraries.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Identify** | `image::ImageReader::into_dimensions` |
//! | **Classify** | [`classify`] (width vs height) |
//! | **Resize → JPEG** | Lanczos3 + `JpegEncoder` at quality 80 |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for orientation and dimension math (unit testable)
//! - **Parameters**: Data structures describing image operations
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]
//! - **Operations**: The resize engine combining calculations + backend

pub mod backend;
mod calculations;
pub mod operations;
mod params;
pub mod rust_backend;

pub use backend::{BackendError, Dimensions, ImageBackend};
pub use calculations::{
    Constraint, Orientation, classify, constrained_dimensions, constraint_for, plan_dimensions,
};
pub use operations::{ResizeError, ResizeReceipt, output_file_name, resize_image};
pub use params::{DERIVATIVE_QUALITY, Quality, ResizeParams};
pub use rust_backend::RustBackend;
