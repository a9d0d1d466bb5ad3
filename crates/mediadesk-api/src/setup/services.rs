//! Service construction

use std::sync::Arc;

use anyhow::Result;

use mediadesk_core::Config;
use mediadesk_services::{
    AttachmentCleaner, ContentClient, MediaIngestor, MediaPromoter, TempReaper,
};
use mediadesk_storage::{PermanentStore, StagingArea};

use crate::state::AppState;

const CONTENT_API_TIMEOUT_SECS: u64 = 30;

/// Build the storage roots and all services, wired the way the handlers
/// expect them. The reaper is returned unstarted.
pub async fn initialize_services(config: &Config) -> Result<(AppState, Arc<TempReaper>)> {
    let config = Arc::new(config.clone());

    let staging = StagingArea::new(&config.staging_root).await?;
    let public_base = format!("/{}", config.storage_root.trim_start_matches('/'));
    let store = PermanentStore::new(config.storage_root.clone(), public_base).await?;

    let client = ContentClient::new(
        config.content_api_base.clone(),
        config.channel_access_token.clone(),
        CONTENT_API_TIMEOUT_SECS,
    )?;

    let ingestor = MediaIngestor::new(config.clone(), client, staging.clone());
    let promoter = MediaPromoter::new(staging.clone(), store.clone());
    let cleaner = AttachmentCleaner::new(staging.clone(), store);
    let reaper = Arc::new(TempReaper::new(
        staging,
        config.reaper_interval_secs,
        config.staging_max_age_minutes,
    ));

    tracing::info!(
        staging_root = %config.staging_root,
        storage_root = %config.storage_root,
        "Services initialized"
    );

    Ok((
        AppState {
            config,
            ingestor,
            promoter,
            cleaner,
        },
        reaper,
    ))
}
