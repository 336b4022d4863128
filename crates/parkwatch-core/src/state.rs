//! Submission state machine
//!
//! `SubmissionState::reduce` is a pure transition function over the events a
//! form goes through: `Idle -> Submitting -> Idle(reset) | Idle(preserved)`.
//! Events that do not apply in the current phase leave the state as it is.

use crate::models::{MediaKind, MediaSlot, MediaUpload};

#[derive(Debug)]
pub enum SubmissionEvent {
    /// A validated file was picked; replaces the slot of the same kind.
    FileSelected(MediaSlot),
    SubmitStarted,
    SubmitSettled(Settlement),
    /// Empty both slots (teardown or explicit reset).
    Cleared,
}

/// Final outcome of an in-flight request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Settlement {
    /// Slots are reset
    Succeeded,
    /// Slots are kept for a retry
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionPhase {
    Idle,
    Submitting,
}

#[derive(Debug, Default)]
pub struct SubmissionState {
    image: Option<MediaSlot>,
    video: Option<MediaSlot>,
    busy: bool,
}

impl SubmissionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn slot(&self, kind: MediaKind) -> Option<&MediaSlot> {
        match kind {
            MediaKind::Image => self.image.as_ref(),
            MediaKind::Video => self.video.as_ref(),
        }
    }

    pub fn image(&self) -> Option<&MediaSlot> {
        self.image.as_ref()
    }

    pub fn video(&self) -> Option<&MediaSlot> {
        self.video.as_ref()
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub fn phase(&self) -> SubmissionPhase {
        if self.busy {
            SubmissionPhase::Submitting
        } else {
            SubmissionPhase::Idle
        }
    }

    /// Kinds that still need a file before submitting
    pub fn missing(&self) -> Vec<MediaKind> {
        MediaKind::ALL
            .into_iter()
            .filter(|kind| self.slot(*kind).is_none())
            .collect()
    }

    /// Both slots populated and nothing in flight
    pub fn is_ready(&self) -> bool {
        !self.busy && self.image.is_some() && self.video.is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.image.is_none() && self.video.is_none()
    }

    /// Snapshot of the selected files for a request.
    pub fn upload(&self) -> MediaUpload {
        MediaUpload {
            image: self.image.as_ref().map(|s| s.file().clone()),
            video: self.video.as_ref().map(|s| s.file().clone()),
        }
    }

    pub fn reduce(mut self, event: SubmissionEvent) -> Self {
        match event {
            SubmissionEvent::FileSelected(slot) => {
                if self.busy {
                    tracing::debug!(kind = %slot.kind(), "Selection ignored while submitting");
                    return self;
                }
                // Assigning drops the previous slot, which releases its preview.
                match slot.kind() {
                    MediaKind::Image => self.image = Some(slot),
                    MediaKind::Video => self.video = Some(slot),
                }
            }
            SubmissionEvent::SubmitStarted => {
                if !self.is_ready() {
                    return self;
                }
                self.busy = true;
            }
            SubmissionEvent::SubmitSettled(settlement) => {
                if !self.busy {
                    return self;
                }
                self.busy = false;
                if settlement == Settlement::Succeeded {
                    self.image = None;
                    self.video = None;
                }
            }
            SubmissionEvent::Cleared => {
                if !self.busy {
                    self.image = None;
                    self.video = None;
                }
            }
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MediaFile, PreviewRegistry};
    use crate::validation::MediaValidator;

    fn slot(kind: MediaKind, previews: &PreviewRegistry) -> MediaSlot {
        let file = match kind {
            MediaKind::Image => MediaFile::new("photo.png", "image/png", &b"png"[..]),
            MediaKind::Video => MediaFile::new("clip.mp4", "video/mp4", &b"mp4"[..]),
        };
        MediaSlot::select(kind, file, &MediaValidator::default(), previews).unwrap()
    }

    fn ready_state(previews: &PreviewRegistry) -> SubmissionState {
        SubmissionState::new()
            .reduce(SubmissionEvent::FileSelected(slot(MediaKind::Image, previews)))
            .reduce(SubmissionEvent::FileSelected(slot(MediaKind::Video, previews)))
    }

    #[test]
    fn test_select_fills_slots() {
        let previews = PreviewRegistry::new();
        let state = SubmissionState::new()
            .reduce(SubmissionEvent::FileSelected(slot(MediaKind::Image, &previews)));
        assert!(state.image().is_some());
        assert!(state.video().is_none());
        assert_eq!(state.missing(), vec![MediaKind::Video]);
        assert!(!state.is_ready());

        let state =
            state.reduce(SubmissionEvent::FileSelected(slot(MediaKind::Video, &previews)));
        assert!(state.is_ready());
        assert!(state.missing().is_empty());
    }

    #[test]
    fn test_reselect_releases_previous_preview() {
        let previews = PreviewRegistry::new();
        let first = slot(MediaKind::Image, &previews);
        let first_id = first.preview().id();
        let state = SubmissionState::new().reduce(SubmissionEvent::FileSelected(first));

        let state = state.reduce(SubmissionEvent::FileSelected(slot(MediaKind::Image, &previews)));
        assert!(!previews.is_live(first_id));
        assert_eq!(previews.live_count(), 1);
        assert!(state.image().is_some());
    }

    #[test]
    fn test_start_requires_both_slots() {
        let previews = PreviewRegistry::new();
        let state = SubmissionState::new()
            .reduce(SubmissionEvent::FileSelected(slot(MediaKind::Video, &previews)))
            .reduce(SubmissionEvent::SubmitStarted);
        assert!(!state.is_busy());
        assert_eq!(state.phase(), SubmissionPhase::Idle);
    }

    #[test]
    fn test_success_resets_slots() {
        let previews = PreviewRegistry::new();
        let state = ready_state(&previews).reduce(SubmissionEvent::SubmitStarted);
        assert!(state.is_busy());
        assert_eq!(state.phase(), SubmissionPhase::Submitting);
        assert!(!state.is_ready());

        let state = state.reduce(SubmissionEvent::SubmitSettled(Settlement::Succeeded));
        assert!(!state.is_busy());
        assert!(state.is_empty());
        assert_eq!(previews.live_count(), 0);
    }

    #[test]
    fn test_failure_preserves_slots() {
        let previews = PreviewRegistry::new();
        let state = ready_state(&previews)
            .reduce(SubmissionEvent::SubmitStarted)
            .reduce(SubmissionEvent::SubmitSettled(Settlement::Failed));
        assert!(!state.is_busy());
        assert!(state.is_ready());
        assert_eq!(previews.live_count(), 2);
    }

    #[test]
    fn test_selection_ignored_while_busy() {
        let previews = PreviewRegistry::new();
        let state = ready_state(&previews).reduce(SubmissionEvent::SubmitStarted);
        let before = state.image().map(|s| s.preview().id());

        let state = state.reduce(SubmissionEvent::FileSelected(slot(MediaKind::Image, &previews)));
        assert_eq!(state.image().map(|s| s.preview().id()), before);
        assert_eq!(previews.live_count(), 2);
    }

    #[test]
    fn test_settle_without_start_is_noop() {
        let previews = PreviewRegistry::new();
        let state = ready_state(&previews)
            .reduce(SubmissionEvent::SubmitSettled(Settlement::Succeeded));
        assert!(state.is_ready());
    }

    #[test]
    fn test_clear_refused_while_busy() {
        let previews = PreviewRegistry::new();
        let state = ready_state(&previews)
            .reduce(SubmissionEvent::SubmitStarted)
            .reduce(SubmissionEvent::Cleared);
        assert!(!state.is_empty());

        let state = state
            .reduce(SubmissionEvent::SubmitSettled(Settlement::Failed))
            .reduce(SubmissionEvent::Cleared);
        assert!(state.is_empty());
        assert_eq!(previews.live_count(), 0);
    }

    #[test]
    fn test_upload_snapshot_has_both_files() {
        let previews = PreviewRegistry::new();
        let upload = ready_state(&previews).upload();
        assert_eq!(upload.image.unwrap().file_name(), "photo.png");
        assert_eq!(upload.video.unwrap().file_name(), "clip.mp4");
    }
}
