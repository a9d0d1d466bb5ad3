//! Media classification
//!
//! Attachments arrive with noisy, partial signals: a declared message kind,
//! an optional MIME type, an optional filename, and sometimes a free-text
//! label typed by the sender. Classification happens in two stages:
//!
//! - Stage A ([`classify`]) runs at capture time and decides the category
//!   from MIME, kind, and filename, in that precedence order.
//! - Stage B ([`normalize_label`]) runs at promotion time and re-validates a
//!   stored category label, folding synonyms, plurals, and Thai spellings
//!   into the canonical set.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::models::MessageKind;

/// Closed set of media categories. Assigned once per attachment at capture
/// time; drives size limits and storage layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaCategory {
    Image,
    Video,
    File,
    Others,
}

impl MediaCategory {
    pub const ALL: [MediaCategory; 4] = [
        MediaCategory::Image,
        MediaCategory::Video,
        MediaCategory::File,
        MediaCategory::Others,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MediaCategory::Image => "image",
            MediaCategory::Video => "video",
            MediaCategory::File => "file",
            MediaCategory::Others => "others",
        }
    }
}

impl fmt::Display for MediaCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MediaCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "image" => Ok(MediaCategory::Image),
            "video" => Ok(MediaCategory::Video),
            "file" => Ok(MediaCategory::File),
            "others" => Ok(MediaCategory::Others),
            other => Err(other.to_string()),
        }
    }
}

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp", "bmp", "heic", "heif"];
const VIDEO_EXTENSIONS: &[&str] = &["mp4", "mov", "m4v", "webm", "avi", "mkv"];

fn has_extension(filename: &str, extensions: &[&str]) -> bool {
    filename
        .rsplit_once('.')
        .is_some_and(|(_, ext)| extensions.contains(&ext))
}

/// Stage A: decide the category at capture time.
///
/// Precedence: MIME prefix, then declared message kind, then filename
/// extension, then a generic-file default. Audio is treated as a generic
/// file throughout.
pub fn classify(
    mime_type: Option<&str>,
    kind: Option<MessageKind>,
    filename: Option<&str>,
) -> MediaCategory {
    let mt = mime_type.unwrap_or_default().to_lowercase();
    let fname = filename.unwrap_or_default().to_lowercase();

    if mt.starts_with("image/") {
        return MediaCategory::Image;
    }
    if mt.starts_with("video/") {
        return MediaCategory::Video;
    }
    if mt.starts_with("audio/") {
        return MediaCategory::File;
    }

    match kind {
        Some(MessageKind::Image) => return MediaCategory::Image,
        Some(MessageKind::Video) => return MediaCategory::Video,
        Some(MessageKind::File) | Some(MessageKind::Audio) => return MediaCategory::File,
        _ => {}
    }

    if has_extension(&fname, IMAGE_EXTENSIONS) {
        return MediaCategory::Image;
    }
    if has_extension(&fname, VIDEO_EXTENSIONS) {
        return MediaCategory::Video;
    }

    MediaCategory::File
}

/// Stage B: normalize a stored category label back into the canonical set.
///
/// Trims and lowercases, folds Thai spellings and English plurals. Labels
/// outside the canonical set are returned verbatim in the `Err` so the
/// caller can reject them with the original value intact.
pub fn normalize_label(raw: &str) -> Result<MediaCategory, String> {
    let label = raw.trim().to_lowercase();

    let canonical = match label.as_str() {
        "ภาพ" | "รูป" | "รูปภาพ" => "image",
        "วิดีโอ" | "วีดีโอ" | "วิดิโอ" => "video",
        "ไฟล์" | "เอกสาร" => "file",
        "images" => "image",
        "videos" => "video",
        "files" => "file",
        other => other,
    };

    MediaCategory::from_str(canonical).map_err(|_| label)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_mime_takes_precedence() {
        // MIME wins over kind and filename
        assert_eq!(
            classify(Some("image/png"), Some(MessageKind::Video), Some("a.mp4")),
            MediaCategory::Image
        );
        assert_eq!(
            classify(Some("video/mp4"), Some(MessageKind::Image), None),
            MediaCategory::Video
        );
    }

    #[test]
    fn test_classify_audio_mime_is_generic_file() {
        assert_eq!(
            classify(Some("audio/mpeg"), Some(MessageKind::Audio), None),
            MediaCategory::File
        );
    }

    #[test]
    fn test_classify_kind_when_mime_absent() {
        assert_eq!(
            classify(None, Some(MessageKind::Image), None),
            MediaCategory::Image
        );
        assert_eq!(
            classify(Some(""), Some(MessageKind::File), None),
            MediaCategory::File
        );
        assert_eq!(
            classify(None, Some(MessageKind::Audio), None),
            MediaCategory::File
        );
    }

    #[test]
    fn test_classify_filename_fallback() {
        assert_eq!(classify(None, None, Some("a.mp4")), MediaCategory::Video);
        assert_eq!(
            classify(None, None, Some("photo.HEIC")),
            MediaCategory::Image
        );
        assert_eq!(
            classify(Some("application/octet-stream"), None, Some("clip.webm")),
            MediaCategory::Video
        );
    }

    #[test]
    fn test_classify_default_is_file() {
        assert_eq!(classify(None, None, None), MediaCategory::File);
        assert_eq!(
            classify(Some("application/pdf"), Some(MessageKind::Text), Some("doc.pdf")),
            MediaCategory::File
        );
    }

    #[test]
    fn test_normalize_canonical_passes() {
        assert_eq!(normalize_label("image"), Ok(MediaCategory::Image));
        assert_eq!(normalize_label("  Video "), Ok(MediaCategory::Video));
        assert_eq!(normalize_label("others"), Ok(MediaCategory::Others));
    }

    #[test]
    fn test_normalize_plurals() {
        assert_eq!(normalize_label("images"), Ok(MediaCategory::Image));
        assert_eq!(normalize_label("videos"), Ok(MediaCategory::Video));
        assert_eq!(normalize_label("files"), Ok(MediaCategory::File));
    }

    #[test]
    fn test_normalize_thai_synonyms() {
        assert_eq!(normalize_label("รูปภาพ"), Ok(MediaCategory::Image));
        assert_eq!(normalize_label("ภาพ"), Ok(MediaCategory::Image));
        assert_eq!(normalize_label("วิดีโอ"), Ok(MediaCategory::Video));
        assert_eq!(normalize_label("เอกสาร"), Ok(MediaCategory::File));
    }

    #[test]
    fn test_normalize_unknown_returned_verbatim() {
        assert_eq!(normalize_label(" Sticker "), Err("sticker".to_string()));
        assert_eq!(normalize_label(""), Err(String::new()));
    }
}
