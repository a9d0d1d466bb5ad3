//! Webhook receiver
//!
//! The platform delivers batches of events and expects a 2xx acknowledgement
//! regardless of how individual events fare, so per-event failures are
//! logged and swallowed. The body arrives already signature-verified; the
//! middleware rebuilt the request from the exact bytes it checked.

use axum::{body::Bytes, extract::State, response::IntoResponse, Json};
use serde_json::json;

use mediadesk_core::{AppError, WebhookEvent, WebhookPayload};
use mediadesk_services::MediaIngestor;

use crate::error::HttpAppError;

/// Capture key for an event: the sender when known, otherwise a fixed
/// bucket. Promotion later re-files attachments under their real ticket.
fn capture_key(event: &WebhookEvent) -> &str {
    event
        .source
        .as_ref()
        .and_then(|s| s.user_id.as_deref())
        .unwrap_or("unassigned")
}

pub async fn receive_webhook(
    State(ingestor): State<MediaIngestor>,
    body: Bytes,
) -> Result<impl IntoResponse, HttpAppError> {
    let payload: WebhookPayload =
        serde_json::from_slice(&body).map_err(AppError::from)?;

    tracing::debug!(events = payload.events.len(), "Webhook delivery received");

    for event in &payload.events {
        if event.event_type != "message" {
            continue;
        }
        let Some(message) = &event.message else {
            continue;
        };
        if !message.kind.has_content() {
            continue;
        }

        match ingestor.capture(message, capture_key(event)).await {
            Ok(meta) => {
                tracing::info!(
                    message_id = %message.id,
                    path = %meta.relative_path,
                    category = %meta.category,
                    size_bytes = meta.size_bytes,
                    "Attachment captured"
                );
            }
            Err(e) => {
                tracing::warn!(
                    message_id = %message.id,
                    error = %e,
                    "Failed to capture attachment, continuing with remaining events"
                );
            }
        }
    }

    Ok(Json(json!({ "status": "ok" })))
}
