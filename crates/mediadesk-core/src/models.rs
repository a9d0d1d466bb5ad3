//! Domain models
//!
//! Webhook envelope types mirror the messaging platform's JSON payloads.
//! `ArtifactMeta` describes a downloaded attachment and travels from capture
//! through promotion; its `relative_path` is always relative to the staging
//! root until promotion rewrites it to the public form.

use serde::{Deserialize, Serialize};

/// Declared message kind from the platform payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    Text,
    Image,
    Video,
    Audio,
    File,
    Sticker,
    Location,
    #[serde(other)]
    Other,
}

impl MessageKind {
    /// Whether the platform hosts downloadable content for this kind.
    pub fn has_content(&self) -> bool {
        matches!(
            self,
            MessageKind::Image | MessageKind::Video | MessageKind::Audio | MessageKind::File
        )
    }
}

/// A message from the webhook payload, read-only.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InboundMessage {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: MessageKind,
    #[serde(default)]
    pub file_name: Option<String>,
    /// Optional MIME hint; the content probe is authoritative.
    #[serde(default)]
    pub content_type: Option<String>,
}

/// Metadata for a captured attachment.
///
/// Created by the ingestor with a staging-relative path; the promoter
/// rewrites the path to its public form. `category` is a free-form label
/// because metadata round-trips through JSON between capture and promotion;
/// the promoter re-validates it before any file moves.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactMeta {
    pub original_name: String,
    pub relative_path: String,
    pub content_type: String,
    pub size_bytes: u64,
    pub extension: String,
    pub category: String,
}

/// Sender identity attached to a webhook event.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventSource {
    #[serde(default)]
    pub user_id: Option<String>,
}

/// A single webhook event.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookEvent {
    #[serde(rename = "type")]
    pub event_type: String,
    #[serde(default)]
    pub message: Option<InboundMessage>,
    #[serde(default)]
    pub source: Option<EventSource>,
    #[serde(default)]
    pub reply_token: Option<String>,
    #[serde(default)]
    pub timestamp: Option<i64>,
}

/// Top-level webhook delivery envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct WebhookPayload {
    #[serde(default)]
    pub destination: Option<String>,
    #[serde(default)]
    pub events: Vec<WebhookEvent>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_image_event() {
        let payload: WebhookPayload = serde_json::from_str(
            r#"{
                "destination": "U1234",
                "events": [{
                    "type": "message",
                    "replyToken": "abc",
                    "timestamp": 1700000000000,
                    "source": {"userId": "Uabcdef"},
                    "message": {"id": "100001", "type": "image"}
                }]
            }"#,
        )
        .unwrap();

        assert_eq!(payload.events.len(), 1);
        let event = &payload.events[0];
        assert_eq!(event.event_type, "message");
        let message = event.message.as_ref().unwrap();
        assert_eq!(message.kind, MessageKind::Image);
        assert!(message.kind.has_content());
        assert!(message.file_name.is_none());
    }

    #[test]
    fn test_deserialize_file_event_with_name() {
        let message: InboundMessage = serde_json::from_str(
            r#"{"id": "100002", "type": "file", "fileName": "report.pdf"}"#,
        )
        .unwrap();
        assert_eq!(message.kind, MessageKind::File);
        assert_eq!(message.file_name.as_deref(), Some("report.pdf"));
    }

    #[test]
    fn test_unknown_message_kind_maps_to_other() {
        let message: InboundMessage =
            serde_json::from_str(r#"{"id": "100003", "type": "postback-ish"}"#).unwrap();
        assert_eq!(message.kind, MessageKind::Other);
        assert!(!message.kind.has_content());
    }

    #[test]
    fn test_text_kind_has_no_content() {
        assert!(!MessageKind::Text.has_content());
        assert!(!MessageKind::Sticker.has_content());
        assert!(MessageKind::Audio.has_content());
    }

    #[test]
    fn test_artifact_meta_round_trips_json() {
        let meta = ArtifactMeta {
            original_name: "photo.jpg".to_string(),
            relative_path: "image/ticket_42_20250101_120000000_ab12.jpg".to_string(),
            content_type: "image/jpeg".to_string(),
            size_bytes: 51200,
            extension: "jpg".to_string(),
            category: "image".to_string(),
        };
        let json = serde_json::to_string(&meta).unwrap();
        let back: ArtifactMeta = serde_json::from_str(&json).unwrap();
        assert_eq!(back.category, "image");
        assert_eq!(back.relative_path, meta.relative_path);
    }
}
