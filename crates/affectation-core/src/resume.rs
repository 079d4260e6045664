//! Résumé blobs: binary files owned by at most one profile at a time.

use bytes::Bytes;
use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};
use uuid::Uuid;

/// Media types accepted for résumé uploads: PDF, legacy and modern Word.
pub const ALLOWED_MEDIA_TYPES: &[&str] = &[
  "application/pdf",
  "application/msword",
  "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
];

/// Fallback when a stored blob carries no media type.
pub const DEFAULT_MEDIA_TYPE: &str = "application/octet-stream";

/// Whether `media_type` may be stored as a résumé. Parameters such as
/// `; charset=...` are ignored.
pub fn is_allowed_media_type(media_type: &str) -> bool {
  let essence = media_type.split(';').next().unwrap_or_default().trim();
  ALLOWED_MEDIA_TYPES
    .iter()
    .any(|allowed| allowed.eq_ignore_ascii_case(essence))
}

/// A blob about to be written.
#[derive(Debug, Clone)]
pub struct NewResumeBlob {
  pub content:      Bytes,
  pub media_type:   String,
  pub filename:     String,
  /// SHA-256 hex digest of `content`.
  pub content_hash: String,
}

impl NewResumeBlob {
  pub fn new(content: Bytes, filename: String, media_type: String) -> Self {
    let content_hash = hex::encode(Sha256::digest(&content));
    Self { content, media_type, filename, content_hash }
  }
}

/// A stored blob.
#[derive(Debug, Clone)]
pub struct ResumeBlob {
  pub blob_id:      Uuid,
  pub content:      Bytes,
  pub media_type:   String,
  pub filename:     String,
  pub content_hash: String,
  pub uploaded_at:  DateTime<Utc>,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn pdf_and_word_are_allowed() {
    assert!(is_allowed_media_type("application/pdf"));
    assert!(is_allowed_media_type("application/msword"));
    assert!(is_allowed_media_type(
      "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
    ));
    assert!(is_allowed_media_type("Application/PDF; name=cv.pdf"));
  }

  #[test]
  fn other_types_are_rejected() {
    assert!(!is_allowed_media_type("image/png"));
    assert!(!is_allowed_media_type("text/plain"));
    assert!(!is_allowed_media_type(""));
  }

  #[test]
  fn hash_is_stable_over_content() {
    let a = NewResumeBlob::new(Bytes::from_static(b"%PDF-1.4"), "a.pdf".into(), "application/pdf".into());
    let b = NewResumeBlob::new(Bytes::from_static(b"%PDF-1.4"), "b.pdf".into(), "application/pdf".into());
    assert_eq!(a.content_hash, b.content_hash);
    assert_eq!(a.content_hash.len(), 64);
  }
}
