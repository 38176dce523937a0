//! Upload Client Errors
//!
//! Every failure names the step and, where it applies, the file — the
//! whole batch aborts on the first error and the caller may retry it as
//! a unit.

use thiserror::Error;

/// Errors from the batch upload flow.
#[derive(Debug, Error)]
pub enum UploadError {
    /// A file could not be read from disk.
    #[error("Failed to read {name}: {source}")]
    Read {
        /// The offending file.
        name: String,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// A file's MIME type is outside the allow-list.
    #[error("File type not allowed: {mime_type} ({name})")]
    InvalidMimeType {
        /// The offending file.
        name: String,
        /// The rejected MIME type.
        mime_type: String,
    },

    /// A file exceeds the size cap.
    #[error("File too large: {name}. Maximum is {max_size} bytes")]
    TooLarge {
        /// The offending file.
        name: String,
        /// Maximum allowed size in bytes.
        max_size: u64,
    },

    /// No files were given.
    #[error("No files to upload")]
    NoFiles,

    /// The presign request failed.
    #[error("Credential request failed: {0}")]
    Presign(String),

    /// The server issued fewer credentials than files.
    #[error("Server issued {got} credentials for {expected} files")]
    CredentialMismatch {
        /// Credentials received.
        got: usize,
        /// Files announced.
        expected: usize,
    },

    /// A direct storage transfer failed.
    #[error("Transfer failed for {name}: {message}")]
    Transfer {
        /// The offending file.
        name: String,
        /// What went wrong.
        message: String,
    },

    /// The confirm call failed. Transferred bytes stay orphaned in
    /// storage; no compensating cleanup exists.
    #[error("Confirmation failed: {0}")]
    Confirm(String),
}
