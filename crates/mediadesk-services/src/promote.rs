//! Attachment promotion
//!
//! Moves a staged attachment into the permanent per-ticket tree once the
//! business flow accepts it. The recorded category label is re-validated
//! here because metadata may have round-tripped through JSON since capture.

use mediadesk_core::{media, AppError, ArtifactMeta};
use mediadesk_storage::{PermanentStore, StagingArea};

/// Moves accepted attachments from staging into the permanent store.
#[derive(Clone)]
pub struct MediaPromoter {
    staging: StagingArea,
    store: PermanentStore,
}

impl MediaPromoter {
    pub fn new(staging: StagingArea, store: PermanentStore) -> Self {
        Self { staging, store }
    }

    /// Promote one staged attachment into `<storage-root>/<ticketId>/<category>/`.
    ///
    /// The move is an atomic rename, so the staged copy never survives a
    /// successful promotion. Returns the metadata with `relative_path`
    /// rewritten to its public form.
    #[tracing::instrument(skip(self, meta), fields(path = %meta.relative_path, ticket_id = %ticket_id))]
    pub async fn promote(
        &self,
        meta: &ArtifactMeta,
        ticket_id: &str,
    ) -> Result<ArtifactMeta, AppError> {
        let category = media::normalize_label(&meta.category).map_err(|label| {
            tracing::error!(
                label = %label,
                ticket_id = %ticket_id,
                "Attachment metadata carries an unknown category label"
            );
            AppError::InvalidCategory(label)
        })?;

        let src = self.staging.resolve(&meta.relative_path)?;
        let dest = self.store.accept(&src, ticket_id, category).await?;

        let basename = dest
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| {
                AppError::Internal(format!(
                    "Promoted path {} has no valid filename",
                    dest.display()
                ))
            })?
            .to_string();

        Ok(ArtifactMeta {
            relative_path: self.store.public_path(ticket_id, category, &basename),
            category: category.as_str().to_string(),
            ..meta.clone()
        })
    }

    /// Promote a batch in order, stopping at the first failure. Files already
    /// moved stay moved; the caller decides what to do with the rest.
    pub async fn promote_all(
        &self,
        metas: &[ArtifactMeta],
        ticket_id: &str,
    ) -> Result<Vec<ArtifactMeta>, AppError> {
        let mut promoted = Vec::with_capacity(metas.len());
        for meta in metas {
            promoted.push(self.promote(meta, ticket_id).await?);
        }
        Ok(promoted)
    }
}
