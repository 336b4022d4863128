//! Domain methods for the detection service client.

use crate::{ApiClient, PROCESS_MEDIA_PATH};
use async_trait::async_trait;
use parkwatch_core::{MediaFile, MediaProcessor, MediaUpload, ProcessMediaResponse, SubmitError};
use reqwest::multipart::{Form, Part};

impl ApiClient {
    /// Send the selected video and mask image in one multipart POST.
    ///
    /// Only parts that are present are sent; the service itself answers 400
    /// when either is missing.
    pub async fn process_media(
        &self,
        upload: MediaUpload,
    ) -> Result<ProcessMediaResponse, SubmitError> {
        let form = build_form(&upload);
        self.post_multipart(PROCESS_MEDIA_PATH, form).await
    }
}

#[async_trait]
impl MediaProcessor for ApiClient {
    async fn process(&self, upload: MediaUpload) -> Result<ProcessMediaResponse, SubmitError> {
        self.process_media(upload).await
    }
}

/// Multipart body: `video` then `mask`, each with file name and content type.
pub fn build_form(upload: &MediaUpload) -> Form {
    upload
        .parts()
        .into_iter()
        .fold(Form::new(), |form, (kind, file)| {
            form.part(kind.form_field(), file_part(file))
        })
}

fn file_part(file: &MediaFile) -> Part {
    let part = || {
        Part::stream_with_length(file.data().clone(), file.size() as u64)
            .file_name(file.file_name().to_string())
    };
    part().mime_str(file.content_type()).unwrap_or_else(|e| {
        tracing::warn!(
            file_name = %file.file_name(),
            content_type = %file.content_type(),
            error = %e,
            "Declared content type is not a valid MIME type, sending part without it"
        );
        part()
    })
}
