//! Application state and sub-state extractors.
//!
//! AppState carries the shared services; `FromRef` impls let handlers and
//! middleware extract only the piece they need instead of the whole state.

use std::sync::Arc;

use axum::extract::FromRef;

use mediadesk_core::Config;
use mediadesk_services::{AttachmentCleaner, MediaIngestor, MediaPromoter};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub ingestor: MediaIngestor,
    pub promoter: MediaPromoter,
    pub cleaner: AttachmentCleaner,
}

impl FromRef<AppState> for Arc<Config> {
    fn from_ref(state: &AppState) -> Self {
        state.config.clone()
    }
}

impl FromRef<AppState> for MediaIngestor {
    fn from_ref(state: &AppState) -> Self {
        state.ingestor.clone()
    }
}

impl FromRef<AppState> for MediaPromoter {
    fn from_ref(state: &AppState) -> Self {
        state.promoter.clone()
    }
}

impl FromRef<AppState> for AttachmentCleaner {
    fn from_ref(state: &AppState) -> Self {
        state.cleaner.clone()
    }
}
