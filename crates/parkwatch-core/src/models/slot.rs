use super::{MediaFile, MediaKind, PreviewHandle, PreviewRegistry};
use crate::error::ValidationError;
use crate::validation::MediaValidator;

/// One validated file held for a purpose, together with its preview.
///
/// Only constructed through [`MediaSlot::select`], so a slot always holds a
/// non-empty file within the size limit whose declared type matches its kind.
#[derive(Debug)]
pub struct MediaSlot {
    kind: MediaKind,
    file: MediaFile,
    preview: PreviewHandle,
}

impl MediaSlot {
    pub fn select(
        kind: MediaKind,
        file: MediaFile,
        validator: &MediaValidator,
        previews: &PreviewRegistry,
    ) -> Result<Self, ValidationError> {
        validator.validate(kind, &file)?;

        Ok(Self {
            kind,
            file,
            preview: previews.issue(),
        })
    }

    pub fn kind(&self) -> MediaKind {
        self.kind
    }

    pub fn file(&self) -> &MediaFile {
        &self.file
    }

    pub fn preview(&self) -> &PreviewHandle {
        &self.preview
    }

    pub fn content_type(&self) -> &str {
        self.file.content_type()
    }
}
