//! Media processor trait for the submission form.
//!
//! Implementations send one upload to the detection service and return its
//! parsed response. The HTTP implementation lives in `parkwatch-api-client`.

use async_trait::async_trait;

use crate::error::SubmitError;
use crate::models::{MediaUpload, ProcessMediaResponse};

/// Remote endpoint that processes an image/video pair.
///
/// Called at most once per submission; implementations must not retry.
#[async_trait]
pub trait MediaProcessor: Send + Sync {
    async fn process(&self, upload: MediaUpload) -> Result<ProcessMediaResponse, SubmitError>;
}
