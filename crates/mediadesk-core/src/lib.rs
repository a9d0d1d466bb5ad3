//! Mediadesk Core Library
//!
//! This crate provides the domain models, error types, configuration, and
//! media classification shared across all Mediadesk components.

pub mod config;
pub mod error;
pub mod media;
pub mod models;

// Re-export commonly used types
pub use config::Config;
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use media::MediaCategory;
pub use models::{ArtifactMeta, InboundMessage, MessageKind, WebhookEvent, WebhookPayload};
