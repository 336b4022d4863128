//! Media file validation
//!
//! A file is accepted into a slot when its declared type matches the slot's
//! kind, it is not empty, and it fits the configured size limit for that kind.

use std::path::Path;

use crate::error::ValidationError;
use crate::models::{MediaFile, MediaKind};

/// Default maximum image (mask) size: 50 MiB
pub const DEFAULT_MAX_IMAGE_SIZE_BYTES: usize = 50 * 1024 * 1024;
/// Default maximum video size: 2 GiB
pub const DEFAULT_MAX_VIDEO_SIZE_BYTES: usize = 2 * 1024 * 1024 * 1024;

const OCTET_STREAM: &str = "application/octet-stream";

/// Content type declared for a file extension (case-insensitive).
pub fn content_type_for_extension(extension: &str) -> Option<&'static str> {
    let content_type = match extension.to_ascii_lowercase().as_str() {
        // Images
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "avif" => "image/avif",
        "svg" => "image/svg+xml",
        "bmp" => "image/bmp",
        "tif" | "tiff" => "image/tiff",
        // Videos
        "mp4" => "video/mp4",
        "webm" => "video/webm",
        "mov" => "video/quicktime",
        "avi" => "video/x-msvideo",
        "mkv" => "video/x-matroska",
        "m4v" => "video/x-m4v",
        _ => return None,
    };
    Some(content_type)
}

/// Content type declared for a path; unknown extensions are `application/octet-stream`.
pub fn content_type_for_path(path: &Path) -> &'static str {
    path.extension()
        .and_then(|e| e.to_str())
        .and_then(content_type_for_extension)
        .unwrap_or(OCTET_STREAM)
}

/// Check that a declared type fits the intended slot.
pub fn validate_content_type(kind: MediaKind, content_type: &str) -> Result<(), ValidationError> {
    if !kind.accepts(content_type) {
        return Err(ValidationError::ContentTypeMismatch {
            kind,
            content_type: content_type.to_string(),
        });
    }
    Ok(())
}

pub fn validate_not_empty(file: &MediaFile) -> Result<(), ValidationError> {
    if file.size() == 0 {
        return Err(ValidationError::EmptyFile {
            file_name: file.file_name().to_string(),
        });
    }
    Ok(())
}

/// Size limits per media kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MediaValidator {
    max_image_size: usize,
    max_video_size: usize,
}

impl Default for MediaValidator {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_IMAGE_SIZE_BYTES, DEFAULT_MAX_VIDEO_SIZE_BYTES)
    }
}

impl MediaValidator {
    pub fn new(max_image_size: usize, max_video_size: usize) -> Self {
        Self {
            max_image_size,
            max_video_size,
        }
    }

    pub fn max_size(&self, kind: MediaKind) -> usize {
        match kind {
            MediaKind::Image => self.max_image_size,
            MediaKind::Video => self.max_video_size,
        }
    }

    /// Validate file size
    pub fn validate_file_size(&self, kind: MediaKind, size: usize) -> Result<(), ValidationError> {
        let max = self.max_size(kind);
        if size > max {
            return Err(ValidationError::FileTooLarge { size, max });
        }
        Ok(())
    }

    /// Validate all aspects of a file for the given slot
    pub fn validate(&self, kind: MediaKind, file: &MediaFile) -> Result<(), ValidationError> {
        validate_content_type(kind, file.content_type())?;
        validate_not_empty(file)?;
        self.validate_file_size(kind, file.size())
    }
}
