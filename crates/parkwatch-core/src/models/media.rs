use std::fmt;
use std::path::Path;

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::validation::content_type_for_path;

/// Purpose a file is selected for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Video,
}

impl MediaKind {
    pub const ALL: [MediaKind; 2] = [MediaKind::Image, MediaKind::Video];

    pub fn as_str(&self) -> &'static str {
        match self {
            MediaKind::Image => "image",
            MediaKind::Video => "video",
        }
    }

    /// MIME prefix a declared content type must start with
    pub fn mime_prefix(&self) -> &'static str {
        match self {
            MediaKind::Image => "image/",
            MediaKind::Video => "video/",
        }
    }

    /// Multipart field name on the `/process_media` request.
    /// The image is the parking-lot mask read by the detector.
    pub fn form_field(&self) -> &'static str {
        match self {
            MediaKind::Image => "mask",
            MediaKind::Video => "video",
        }
    }

    /// Whether a declared content type matches this kind (case-insensitive)
    pub fn accepts(&self, content_type: &str) -> bool {
        content_type
            .trim()
            .to_ascii_lowercase()
            .starts_with(self.mime_prefix())
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A user-selected file held in memory.
///
/// `data` is reference counted, so cloning a file for an upload does not copy
/// the content.
#[derive(Debug, Clone)]
pub struct MediaFile {
    file_name: String,
    content_type: String,
    data: Bytes,
}

impl MediaFile {
    pub fn new(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        data: impl Into<Bytes>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            data: data.into(),
        }
    }

    /// Load a file from disk, declaring its content type from the extension.
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self, ValidationError> {
        Self::from_path_with_type(path, None, usize::MAX).await
    }

    /// Load a file from disk. `content_type` overrides the extension lookup.
    ///
    /// The on-disk size is checked against `max_size` before the content is
    /// read, so an oversized file is never loaded into memory.
    pub async fn from_path_with_type(
        path: impl AsRef<Path>,
        content_type: Option<&str>,
        max_size: usize,
    ) -> Result<Self, ValidationError> {
        let path = path.as_ref();
        let io_error = |source: std::io::Error| ValidationError::Io {
            path: path.to_path_buf(),
            source,
        };

        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| ValidationError::InvalidFilename(path.display().to_string()))?
            .to_string();

        let metadata = tokio::fs::metadata(path).await.map_err(io_error)?;
        let size = usize::try_from(metadata.len()).unwrap_or(usize::MAX);
        if size > max_size {
            return Err(ValidationError::FileTooLarge {
                size,
                max: max_size,
            });
        }

        let data = tokio::fs::read(path).await.map_err(io_error)?;

        let content_type = content_type
            .map(str::to_string)
            .unwrap_or_else(|| content_type_for_path(path).to_string());

        tracing::debug!(
            path = %path.display(),
            content_type = %content_type,
            size_bytes = data.len(),
            "Loaded media file"
        );

        Ok(Self::new(file_name, content_type, data))
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    pub fn data(&self) -> &Bytes {
        &self.data
    }

    pub fn size(&self) -> usize {
        self.data.len()
    }
}
