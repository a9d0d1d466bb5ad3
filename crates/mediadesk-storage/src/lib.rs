//! Mediadesk Storage Library
//!
//! This crate provides the two filesystem roots attachments move through:
//! the staging area (short-lived downloads pending a keep/discard decision)
//! and the permanent store (per-entity attachment trees).
//!
//! # Path layout
//!
//! - **Staging**: `<staging-root>/<category>/<filename>` with exactly four
//!   category subdirectories (`image`, `video`, `file`, `others`).
//! - **Permanent**: `<storage-root>/<entityId>/<category>/<filename>`.
//!
//! Relative paths recorded in artifact metadata are resolved against these
//! roots. Leading separators are stripped and `..` components rejected so a
//! path can never escape its root.

pub mod error;
pub mod permanent;
pub mod staging;

// Re-export commonly used types
pub use error::{StorageError, StorageResult};
pub use permanent::PermanentStore;
pub use staging::{StagingArea, SweepStats};
