//! Gala Uploader
//!
//! Client-side orchestration of the direct-to-storage upload flow:
//! validate the whole batch locally, extract capture metadata, request
//! one upload credential per file, PUT every file straight to storage
//! concurrently, then confirm the batch in a single call.

mod batch;
mod error;
pub mod progress;

pub use batch::Uploader;
pub use error::UploadError;
pub use progress::BatchProgress;
