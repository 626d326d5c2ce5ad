//! Uploaded profile images.
//!
//! Only the format is inspected, from the leading magic bytes; the payload is
//! otherwise opaque and handed to the blob store untouched.

/// Largest accepted upload, in bytes (2048 KiB).
pub const MAX_IMAGE_BYTES: usize = 2048 * 1024;

/// Accepted image formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
  Jpeg,
  Png,
  Gif,
}

impl ImageKind {
  /// Detect the format from the first bytes of the payload.
  pub fn sniff(bytes: &[u8]) -> Option<Self> {
    if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
      Some(Self::Jpeg)
    } else if bytes.starts_with(b"\x89PNG\r\n\x1a\n") {
      Some(Self::Png)
    } else if bytes.starts_with(b"GIF87a") || bytes.starts_with(b"GIF89a") {
      Some(Self::Gif)
    } else {
      None
    }
  }

  /// File extension used for the stored blob key.
  pub fn extension(self) -> &'static str {
    match self {
      Self::Jpeg => "jpg",
      Self::Png => "png",
      Self::Gif => "gif",
    }
  }
}

/// An accepted upload, ready to be handed to a
/// [`BlobStore`](crate::store::BlobStore).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUpload {
  pub bytes: Vec<u8>,
  pub kind:  ImageKind,
}

impl ImageUpload {
  /// Wrap `bytes` if they look like a supported image.
  pub fn sniff(bytes: Vec<u8>) -> Option<Self> {
    let kind = ImageKind::sniff(&bytes)?;
    Some(Self { bytes, kind })
  }
}
