use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value as JsonValue;

use super::{MediaFile, MediaKind};

/// Files sent in a single `/process_media` request.
#[derive(Debug, Clone, Default)]
pub struct MediaUpload {
    pub image: Option<MediaFile>,
    pub video: Option<MediaFile>,
}

impl MediaUpload {
    pub fn new(image: MediaFile, video: MediaFile) -> Self {
        Self {
            image: Some(image),
            video: Some(video),
        }
    }

    /// Present parts in wire order: video first, then the mask image.
    pub fn parts(&self) -> Vec<(MediaKind, &MediaFile)> {
        let mut parts = Vec::with_capacity(2);
        if let Some(video) = &self.video {
            parts.push((MediaKind::Video, video));
        }
        if let Some(image) = &self.image {
            parts.push((MediaKind::Image, image));
        }
        parts
    }

    pub fn total_bytes(&self) -> usize {
        self.parts().iter().map(|(_, f)| f.size()).sum()
    }
}

/// Body of a successful `/process_media` response.
///
/// Any JSON is accepted; the detector's usual fields are picked out when
/// present and the full value is kept in `raw`.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessMediaResponse {
    pub message: Option<String>,
    pub total_spots: Option<u64>,
    pub raw: JsonValue,
}

impl ProcessMediaResponse {
    pub fn from_json(raw: JsonValue) -> Self {
        let message = raw
            .get("message")
            .and_then(JsonValue::as_str)
            .map(str::to_string);
        let total_spots = raw.get("total_spots").and_then(JsonValue::as_u64);
        Self {
            message,
            total_spots,
            raw,
        }
    }
}

impl Serialize for ProcessMediaResponse {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.raw.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for ProcessMediaResponse {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        JsonValue::deserialize(deserializer).map(Self::from_json)
    }
}
