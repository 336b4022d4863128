//! Parkwatch Core Library
//!
//! This crate provides the domain models, submission state machine, validation,
//! configuration and error types shared by the parkwatch API client and CLI.

pub mod config;
pub mod error;
pub mod form;
pub mod models;
pub mod notify;
pub mod processor;
pub mod state;
pub mod validation;

// Re-export commonly used types
pub use config::ClientConfig;
pub use error::{LogLevel, NotifyError, SubmitError, ValidationError};
pub use form::{FormSnapshot, SlotSnapshot, SubmissionForm};
pub use models::{
    MediaFile, MediaKind, MediaSlot, MediaUpload, PreviewHandle, PreviewRegistry,
    ProcessMediaResponse,
};
pub use notify::{Notification, NotificationLevel, Notifier, TracingNotifier};
pub use processor::MediaProcessor;
pub use state::{Settlement, SubmissionEvent, SubmissionPhase, SubmissionState};
pub use validation::MediaValidator;
