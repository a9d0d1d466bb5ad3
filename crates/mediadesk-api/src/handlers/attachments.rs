//! Attachment lifecycle endpoints
//!
//! Internal endpoints for the business flow around staged attachments:
//! promote them into a ticket's permanent tree, discard staged leftovers,
//! or drop a ticket's whole tree.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::json;

use mediadesk_core::ArtifactMeta;
use mediadesk_services::{AttachmentCleaner, MediaPromoter};

use crate::error::{HttpAppError, ValidatedJson};

/// Move staged attachments into `<storage-root>/<ticketId>/<category>/`.
/// Files already moved before a mid-batch failure stay moved; the staged
/// leftovers fall to the reaper.
pub async fn promote_attachments(
    State(promoter): State<MediaPromoter>,
    Path(ticket_id): Path<String>,
    ValidatedJson(files): ValidatedJson<Vec<ArtifactMeta>>,
) -> Result<Json<Vec<ArtifactMeta>>, HttpAppError> {
    let promoted = promoter.promote_all(&files, &ticket_id).await?;
    Ok(Json(promoted))
}

/// Best-effort deletion of staged files whose flow was abandoned.
pub async fn discard_staged(
    State(cleaner): State<AttachmentCleaner>,
    ValidatedJson(files): ValidatedJson<Vec<ArtifactMeta>>,
) -> impl IntoResponse {
    cleaner.clean_pending(&files).await;
    Json(json!({ "status": "ok" }))
}

/// Remove a ticket's whole permanent attachment tree.
pub async fn delete_ticket_attachments(
    State(cleaner): State<AttachmentCleaner>,
    Path(ticket_id): Path<String>,
) -> impl IntoResponse {
    cleaner.delete_ticket_tree(&ticket_id).await;
    StatusCode::NO_CONTENT
}
