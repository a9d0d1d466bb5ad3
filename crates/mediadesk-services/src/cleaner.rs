//! Attachment cleanup
//!
//! Best-effort removal paths for the two ends of an attachment's life:
//! staged files whose flow was abandoned, and the whole permanent tree of
//! a deleted ticket. Neither operation ever fails the caller; problems are
//! logged and left for the reaper or an operator.

use mediadesk_core::ArtifactMeta;
use mediadesk_storage::{PermanentStore, StagingArea};

/// Best-effort deleter for staged leftovers and ticket trees.
#[derive(Clone)]
pub struct AttachmentCleaner {
    staging: StagingArea,
    store: PermanentStore,
}

impl AttachmentCleaner {
    pub fn new(staging: StagingArea, store: PermanentStore) -> Self {
        Self { staging, store }
    }

    /// Delete the staged files tracked by `files`. Each failure is logged
    /// and the loop continues; nothing propagates.
    #[tracing::instrument(skip(self, files), fields(count = files.len()))]
    pub async fn clean_pending(&self, files: &[ArtifactMeta]) {
        for meta in files {
            if let Err(e) = self.staging.remove_file(&meta.relative_path).await {
                tracing::warn!(
                    path = %meta.relative_path,
                    error = %e,
                    "Failed to delete staged attachment"
                );
            }
        }
    }

    /// Remove a ticket's whole permanent attachment tree. A missing tree
    /// counts as removed; a failed removal is logged and swallowed.
    #[tracing::instrument(skip(self))]
    pub async fn delete_ticket_tree(&self, ticket_id: &str) {
        if let Err(e) = self.store.remove_entity_tree(ticket_id).await {
            tracing::warn!(
                ticket_id = %ticket_id,
                error = %e,
                "Failed to remove ticket attachment tree"
            );
        }
    }
}
