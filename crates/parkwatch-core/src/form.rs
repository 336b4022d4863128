//! Media submission form
//!
//! `SubmissionForm` holds the image and video slots, validates selections,
//! and sends both files to a [`MediaProcessor`] in one request. The state lock
//! is never held across the request, so a second `submit` while one is in
//! flight observes `busy` and is rejected instead of sending a duplicate.

use std::sync::{Arc, Mutex, MutexGuard};

use serde::Serialize;

use crate::error::{LogLevel, SubmitError};
use crate::models::{
    MediaFile, MediaKind, MediaSlot, MediaUpload, PreviewRegistry, ProcessMediaResponse,
};
use crate::notify::{Notification, Notifier, TracingNotifier};
use crate::processor::MediaProcessor;
use crate::state::{Settlement, SubmissionEvent, SubmissionPhase, SubmissionState};
use crate::validation::MediaValidator;

const COMPLETED_MESSAGE: &str = "Media processing completed";

/// Display view of one slot
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SlotSnapshot {
    pub kind: MediaKind,
    pub file_name: String,
    pub content_type: String,
    pub size_bytes: usize,
    pub preview_url: String,
}

impl SlotSnapshot {
    fn of(slot: &MediaSlot) -> Self {
        Self {
            kind: slot.kind(),
            file_name: slot.file().file_name().to_string(),
            content_type: slot.content_type().to_string(),
            size_bytes: slot.file().size(),
            preview_url: slot.preview().url(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormSnapshot {
    pub image: Option<SlotSnapshot>,
    pub video: Option<SlotSnapshot>,
    pub busy: bool,
    pub can_submit: bool,
}

pub struct SubmissionForm {
    state: Mutex<SubmissionState>,
    previews: PreviewRegistry,
    validator: MediaValidator,
    processor: Arc<dyn MediaProcessor>,
    notifier: Arc<dyn Notifier>,
}

impl SubmissionForm {
    pub fn new(processor: Arc<dyn MediaProcessor>) -> Self {
        Self {
            state: Mutex::new(SubmissionState::new()),
            previews: PreviewRegistry::new(),
            validator: MediaValidator::default(),
            processor,
            notifier: Arc::new(TracingNotifier),
        }
    }

    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    pub fn with_validator(mut self, validator: MediaValidator) -> Self {
        self.validator = validator;
        self
    }

    pub fn with_previews(mut self, previews: PreviewRegistry) -> Self {
        self.previews = previews;
        self
    }

    fn lock(&self) -> MutexGuard<'_, SubmissionState> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn apply(state: &mut SubmissionState, event: SubmissionEvent) {
        let current = std::mem::take(state);
        *state = current.reduce(event);
        tracing::debug!(
            phase = ?state.phase(),
            image = state.image().is_some(),
            video = state.video().is_some(),
            "Submission state updated"
        );
    }

    fn notify(&self, notification: Notification) {
        if let Err(e) = self.notifier.notify(&notification) {
            tracing::warn!(error = %e, message = %notification.message, "Failed to notify user");
        }
    }

    fn settle(&self, settlement: Settlement) {
        Self::apply(&mut self.lock(), SubmissionEvent::SubmitSettled(settlement));
    }

    pub fn previews(&self) -> &PreviewRegistry {
        &self.previews
    }

    pub fn is_busy(&self) -> bool {
        self.lock().is_busy()
    }

    pub fn phase(&self) -> SubmissionPhase {
        self.lock().phase()
    }

    /// Whether the submit control is enabled
    pub fn can_submit(&self) -> bool {
        self.lock().is_ready()
    }

    pub fn snapshot(&self) -> FormSnapshot {
        let state = self.lock();
        FormSnapshot {
            image: state.image().map(SlotSnapshot::of),
            video: state.video().map(SlotSnapshot::of),
            busy: state.is_busy(),
            can_submit: state.is_ready(),
        }
    }

    /// Validate a picked file and place it in the slot for `kind`.
    ///
    /// A rejected file leaves the slot as it was.
    pub fn select_file(&self, kind: MediaKind, file: MediaFile) -> Result<(), SubmitError> {
        let mut state = self.lock();
        if state.is_busy() {
            drop(state);
            log_submit_error(&SubmitError::Busy, None);
            self.notify(Notification::warn(SubmitError::Busy.client_message()));
            return Err(SubmitError::Busy);
        }

        let file_name = file.file_name().to_string();
        match MediaSlot::select(kind, file, &self.validator, &self.previews) {
            Ok(slot) => {
                tracing::info!(
                    kind = %kind,
                    file_name = %file_name,
                    content_type = %slot.content_type(),
                    size_bytes = slot.file().size(),
                    "Media selected"
                );
                Self::apply(&mut state, SubmissionEvent::FileSelected(slot));
                Ok(())
            }
            Err(e) => {
                drop(state);
                let e = SubmitError::from(e);
                tracing::warn!(
                    kind = %kind,
                    file_name = %file_name,
                    error = %e,
                    error_code = e.error_code(),
                    "Selection rejected"
                );
                self.notify(Notification::warn(e.client_message()));
                Err(e)
            }
        }
    }

    /// Send both selected files for processing.
    ///
    /// Requires both slots and no submission in flight; otherwise nothing is
    /// sent. On success the slots are reset, on failure they are kept so the
    /// same files can be resubmitted. `busy` is false again on every return,
    /// and also when this future is dropped before it completes.
    pub async fn submit(&self) -> Result<ProcessMediaResponse, SubmitError> {
        let upload = match self.start() {
            Ok(upload) => upload,
            Err(e) => {
                log_submit_error(&e, None);
                self.notify(Notification::warn(e.client_message()));
                return Err(e);
            }
        };

        let mut pending = PendingSubmission { form: self, armed: true };

        tracing::info!(
            image = upload.image.as_ref().map(|f| f.file_name()).unwrap_or_default(),
            video = upload.video.as_ref().map(|f| f.file_name()).unwrap_or_default(),
            total_bytes = upload.total_bytes(),
            "Submitting media for processing"
        );
        let start = std::time::Instant::now();

        let result = self.processor.process(upload).await;
        let duration_ms = start.elapsed().as_secs_f64() * 1000.0;

        match result {
            Ok(response) => {
                pending.settle(Settlement::Succeeded);
                tracing::info!(
                    duration_ms,
                    total_spots = ?response.total_spots,
                    response = %response.raw,
                    "Media processing succeeded"
                );
                let message = response
                    .message
                    .clone()
                    .unwrap_or_else(|| COMPLETED_MESSAGE.to_string());
                self.notify(Notification::info(message));
                Ok(response)
            }
            Err(e) => {
                pending.settle(Settlement::Failed);
                log_submit_error(&e, Some(duration_ms));
                self.notify(Notification::error(e.client_message()));
                Err(e)
            }
        }
    }

    /// Check the guards and move to `Submitting`, returning the files to send.
    fn start(&self) -> Result<MediaUpload, SubmitError> {
        let mut state = self.lock();
        if state.is_busy() {
            return Err(SubmitError::Busy);
        }
        let missing = state.missing();
        if !missing.is_empty() {
            return Err(SubmitError::MissingMedia { missing });
        }
        Self::apply(&mut state, SubmissionEvent::SubmitStarted);
        Ok(state.upload())
    }

    /// Empty both slots and release their previews. Refused while submitting.
    pub fn clear(&self) -> Result<(), SubmitError> {
        let mut state = self.lock();
        if state.is_busy() {
            return Err(SubmitError::Busy);
        }
        Self::apply(&mut state, SubmissionEvent::Cleared);
        Ok(())
    }
}

fn log_submit_error(error: &SubmitError, duration_ms: Option<f64>) {
    let error_code = error.error_code();
    let recoverable = error.is_recoverable();
    match error.log_level() {
        LogLevel::Debug => {
            tracing::debug!(error = %error, error_code, recoverable, duration_ms, "Request refused");
        }
        LogLevel::Warn => {
            tracing::warn!(error = %error, error_code, recoverable, duration_ms, "Request refused");
        }
        LogLevel::Error => {
            tracing::error!(error = %error, error_code, recoverable, duration_ms, "Media processing failed");
        }
    }
}

/// Settles an in-flight submission as failed if it is dropped unsettled.
struct PendingSubmission<'a> {
    form: &'a SubmissionForm,
    armed: bool,
}

impl PendingSubmission<'_> {
    fn settle(&mut self, settlement: Settlement) {
        self.armed = false;
        self.form.settle(settlement);
    }
}

impl Drop for PendingSubmission<'_> {
    fn drop(&mut self) {
        if self.armed {
            tracing::warn!("Submission abandoned before settlement, keeping selected media");
            self.form.settle(Settlement::Failed);
        }
    }
}
