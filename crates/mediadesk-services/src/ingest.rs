//! Media capture
//!
//! Pulls an attachment referenced by a webhook message into the staging
//! area. The HEAD probe runs first so the size ceiling is enforced before
//! any byte is transferred; the body is then streamed straight to disk.

use std::sync::Arc;

use chrono::Utc;
use rand::Rng;

use mediadesk_core::{media, AppError, ArtifactMeta, Config, InboundMessage, MediaCategory};
use mediadesk_storage::StagingArea;

use crate::content_client::ContentClient;

/// Captures platform attachments into the staging area.
#[derive(Clone)]
pub struct MediaIngestor {
    config: Arc<Config>,
    client: ContentClient,
    staging: StagingArea,
}

impl MediaIngestor {
    pub fn new(config: Arc<Config>, client: ContentClient, staging: StagingArea) -> Self {
        Self {
            config,
            client,
            staging,
        }
    }

    /// Download one attachment into staging and return its metadata.
    ///
    /// Probe, classify, and enforce the category ceiling before the GET;
    /// oversized attachments are rejected without transferring the body.
    #[tracing::instrument(skip(self, message), fields(message_id = %message.id, ticket_id = %ticket_id))]
    pub async fn capture(
        &self,
        message: &InboundMessage,
        ticket_id: &str,
    ) -> Result<ArtifactMeta, AppError> {
        if !message.kind.has_content() {
            return Err(AppError::InvalidInput(format!(
                "Message {} has no downloadable content",
                message.id
            )));
        }

        let probe = self.client.probe(&message.id).await?;

        let category = media::classify(
            Some(&probe.content_type),
            Some(message.kind),
            message.file_name.as_deref(),
        );

        let limit = self.config.limit_for(category);
        if probe.size_bytes > limit {
            tracing::warn!(
                size_bytes = probe.size_bytes,
                limit_bytes = limit,
                category = %category,
                "Attachment exceeds size ceiling, skipping download"
            );
            return Err(AppError::SizeLimitExceeded {
                size: probe.size_bytes,
                limit,
            });
        }

        let extension = derive_extension(
            message.file_name.as_deref(),
            &probe.content_type,
            category,
        );
        let filename = build_filename(ticket_id, &extension);

        let reader = self.client.fetch(&message.id).await?;
        let written = self.staging.store_stream(category, &filename, reader).await?;
        if written != probe.size_bytes {
            tracing::warn!(
                probed_bytes = probe.size_bytes,
                written_bytes = written,
                "Downloaded size differs from probed size"
            );
        }

        let original_name = message.file_name.clone().unwrap_or_else(|| filename.clone());

        Ok(ArtifactMeta {
            original_name,
            relative_path: format!("{}/{}", category, filename),
            content_type: probe.content_type,
            size_bytes: probe.size_bytes,
            extension,
            category: category.as_str().to_string(),
        })
    }
}

fn extension_from_name(filename: &str) -> Option<String> {
    let (_, ext) = filename.rsplit_once('.')?;
    if ext.is_empty() || ext.contains('/') || ext.contains('\\') {
        return None;
    }
    Some(ext.to_lowercase())
}

fn extension_from_mime(content_type: &str) -> Option<&'static str> {
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_lowercase();

    let ext = match essence.as_str() {
        "image/jpeg" => "jpg",
        "image/png" => "png",
        "image/gif" => "gif",
        "image/webp" => "webp",
        "image/bmp" => "bmp",
        "image/heic" => "heic",
        "image/heif" => "heif",
        "video/mp4" => "mp4",
        "video/quicktime" => "mov",
        "video/webm" => "webm",
        "video/x-msvideo" => "avi",
        "video/x-matroska" => "mkv",
        "audio/mpeg" => "mp3",
        "audio/mp4" | "audio/x-m4a" | "audio/aac" => "m4a",
        "audio/ogg" => "ogg",
        "audio/wav" | "audio/x-wav" => "wav",
        "application/pdf" => "pdf",
        "application/zip" => "zip",
        "text/plain" => "txt",
        "text/csv" => "csv",
        _ => return None,
    };
    Some(ext)
}

fn fallback_extension(category: MediaCategory, content_type: &str) -> &'static str {
    if content_type.to_lowercase().starts_with("audio/") {
        return "m4a";
    }
    match category {
        MediaCategory::Video => "mp4",
        MediaCategory::Image => "jpeg",
        _ => "bin",
    }
}

/// Pick the staged file's extension: filename extension first, then the
/// content-type table, then a per-category fallback. A bare `bin` from the
/// earlier steps also falls through to the category fallback.
fn derive_extension(filename: Option<&str>, content_type: &str, category: MediaCategory) -> String {
    let candidate = filename
        .and_then(extension_from_name)
        .or_else(|| extension_from_mime(content_type).map(str::to_string));

    match candidate {
        Some(ext) if ext != "bin" => ext,
        _ => fallback_extension(category, content_type).to_string(),
    }
}

fn sanitize_component(raw: &str) -> String {
    let cleaned: String = raw
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_'))
        .collect();
    if cleaned.is_empty() {
        "unknown".to_string()
    } else {
        cleaned
    }
}

/// `ticket_{ticketId}_{YYYYMMDD_HHmmssSSS}_{4 random chars}.{ext}`. The
/// millisecond timestamp plus the random suffix keeps concurrent captures
/// for the same ticket from colliding.
fn build_filename(ticket_id: &str, extension: &str) -> String {
    let stamp = Utc::now().format("%Y%m%d_%H%M%S%3f");

    let mut rng = rand::rng();
    let suffix: String = (0..4)
        .map(|_| {
            const CHARSET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";
            CHARSET[rng.random_range(0..CHARSET.len())] as char
        })
        .collect();

    format!(
        "ticket_{}_{}_{}.{}",
        sanitize_component(ticket_id),
        stamp,
        suffix,
        extension
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filename_extension_wins() {
        assert_eq!(
            derive_extension(Some("photo.PNG"), "image/jpeg", MediaCategory::Image),
            "png"
        );
    }

    #[test]
    fn test_mime_table_when_no_filename_extension() {
        assert_eq!(
            derive_extension(None, "video/quicktime", MediaCategory::Video),
            "mov"
        );
        assert_eq!(
            derive_extension(Some("noext"), "image/webp", MediaCategory::Image),
            "webp"
        );
        assert_eq!(
            derive_extension(None, "audio/mp4; codecs=mp4a", MediaCategory::File),
            "m4a"
        );
    }

    #[test]
    fn test_category_fallback_for_unknown_type() {
        assert_eq!(
            derive_extension(None, "application/octet-stream", MediaCategory::Video),
            "mp4"
        );
        assert_eq!(
            derive_extension(None, "application/octet-stream", MediaCategory::Image),
            "jpeg"
        );
        assert_eq!(
            derive_extension(None, "application/octet-stream", MediaCategory::File),
            "bin"
        );
    }

    #[test]
    fn test_bin_extension_falls_through() {
        assert_eq!(
            derive_extension(Some("clip.bin"), "application/octet-stream", MediaCategory::Video),
            "mp4"
        );
    }

    #[test]
    fn test_unknown_audio_falls_back_to_m4a() {
        assert_eq!(
            derive_extension(None, "audio/amr", MediaCategory::File),
            "m4a"
        );
    }

    #[test]
    fn test_build_filename_shape() {
        let name = build_filename("42", "jpg");
        assert!(name.starts_with("ticket_42_"));
        assert!(name.ends_with(".jpg"));
        // ticket, id, date, time, suffix.ext
        assert_eq!(name.split('_').count(), 5);
    }

    #[test]
    fn test_build_filename_sanitizes_ticket_id() {
        let name = build_filename("../evil/42", "bin");
        assert!(!name.contains('/'));
        assert!(!name.contains(".."));
        assert!(name.starts_with("ticket_evil42_"));
    }

    #[test]
    fn test_build_filename_empty_ticket_id() {
        let name = build_filename("***", "bin");
        assert!(name.starts_with("ticket_unknown_"));
    }
}
