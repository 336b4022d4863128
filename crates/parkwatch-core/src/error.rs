//! Error types module
//!
//! Selection problems are `ValidationError`s. Everything that can go wrong while
//! submitting is a `SubmitError`, which keeps the distinction between a local
//! guard (missing media, busy), an unreachable server (transport), a server that
//! answered with a failure status, and a response body that could not be read.

use std::path::PathBuf;

use crate::models::MediaKind;

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like guard violations
    Debug,
    /// Warning level - for rejected user input
    Warn,
    /// Error level - for failed submissions
    Error,
}

/// Rejection of a selected file.
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("Content type '{content_type}' is not valid for the {kind} slot (expected {kind}/*)")]
    ContentTypeMismatch {
        kind: MediaKind,
        content_type: String,
    },

    #[error("Empty file: {file_name}")]
    EmptyFile { file_name: String },

    #[error("File too large: {size} bytes (max: {max} bytes)")]
    FileTooLarge { size: usize, max: usize },

    #[error("Invalid filename: {0}")]
    InvalidFilename(String),

    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Missing media: {}", join_kinds(.missing))]
    MissingMedia { missing: Vec<MediaKind> },

    #[error("A submission is already in progress")]
    Busy,

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },

    #[error("Failed to decode response: {0}")]
    Decode(String),
}

fn join_kinds(kinds: &[MediaKind]) -> String {
    kinds
        .iter()
        .map(|k| k.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// A notifier could not deliver a message to the user.
#[derive(Debug, thiserror::Error)]
#[error("Notification failed: {0}")]
pub struct NotifyError(pub String);

/// (error_code, recoverable, log_level) for each variant.
fn submit_error_static_metadata(err: &SubmitError) -> (&'static str, bool, LogLevel) {
    match err {
        SubmitError::Validation(_) => ("VALIDATION_ERROR", false, LogLevel::Warn),
        SubmitError::MissingMedia { .. } => ("MISSING_MEDIA", false, LogLevel::Debug),
        SubmitError::Busy => ("SUBMISSION_IN_PROGRESS", false, LogLevel::Debug),
        SubmitError::Transport(_) => ("TRANSPORT_ERROR", true, LogLevel::Error),
        SubmitError::Server { status, .. } if *status >= 500 => {
            ("SERVER_ERROR", true, LogLevel::Error)
        }
        SubmitError::Server { .. } => ("SERVER_REJECTED", false, LogLevel::Error),
        SubmitError::Decode(_) => ("DECODE_ERROR", false, LogLevel::Error),
    }
}

impl SubmitError {
    /// Machine-readable error code (e.g., "TRANSPORT_ERROR")
    pub fn error_code(&self) -> &'static str {
        submit_error_static_metadata(self).0
    }

    /// Whether resubmitting the same files may succeed
    pub fn is_recoverable(&self) -> bool {
        submit_error_static_metadata(self).1
    }

    /// Level a failed or refused submission is logged at
    pub fn log_level(&self) -> LogLevel {
        submit_error_static_metadata(self).2
    }

    /// Message shown to the user
    pub fn client_message(&self) -> String {
        match self {
            SubmitError::Validation(e) => e.to_string(),
            SubmitError::MissingMedia { missing } => format!(
                "Please select both an image and a video (missing: {}).",
                join_kinds(missing)
            ),
            SubmitError::Busy => "Media is already being processed. Please wait.".to_string(),
            SubmitError::Transport(_) => {
                "Failed to process media: server unreachable. Please try again.".to_string()
            }
            SubmitError::Server { message, .. } => {
                format!("Failed to process media: {}. Please try again.", message)
            }
            SubmitError::Decode(_) => {
                "Failed to process media: unexpected server response. Please try again."
                    .to_string()
            }
        }
    }
}
