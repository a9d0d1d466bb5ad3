//! Mediadesk Services Library
//!
//! Business services for the ingestion pipeline: webhook signature
//! verification, the platform content client, media capture and promotion,
//! and the background reaper and cleaner.

pub mod cleaner;
pub mod content_client;
pub mod ingest;
pub mod promote;
pub mod reaper;
pub mod signature;

// Re-export commonly used types
pub use cleaner::AttachmentCleaner;
pub use content_client::{ContentClient, ContentProbe};
pub use ingest::MediaIngestor;
pub use promote::MediaPromoter;
pub use reaper::TempReaper;
pub use signature::verify_signature;
