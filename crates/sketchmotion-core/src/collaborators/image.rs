//! Uploaded background images.
//!
//! The core never decodes pixels. A loader turns the raw bytes of a selected
//! file into an opaque [`ImageHandle`] the presentation layer can display.

use super::BoxFuture;
use base64::{Engine, engine::general_purpose::STANDARD};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Upload errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UploadError {
    #[error("No file selected")]
    NoFile,
    #[error("File is empty")]
    Empty,
    #[error("Unsupported image format")]
    UnsupportedFormat,
}

/// Result type for upload operations.
pub type UploadResult<T> = Result<T, UploadError>;

/// Image format of uploaded data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImageFormat {
    Png,
    Jpeg,
    WebP,
    Gif,
}

impl ImageFormat {
    /// Get MIME type for this format.
    pub fn mime_type(&self) -> &'static str {
        match self {
            ImageFormat::Png => "image/png",
            ImageFormat::Jpeg => "image/jpeg",
            ImageFormat::WebP => "image/webp",
            ImageFormat::Gif => "image/gif",
        }
    }

    /// Detect format from magic bytes.
    pub fn from_magic_bytes(data: &[u8]) -> Option<Self> {
        if data.len() < 4 {
            return None;
        }

        // PNG: 89 50 4E 47
        if data.starts_with(&[0x89, 0x50, 0x4E, 0x47]) {
            return Some(ImageFormat::Png);
        }

        // JPEG: FF D8 FF
        if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
            return Some(ImageFormat::Jpeg);
        }

        // WebP: RIFF....WEBP
        if data.len() >= 12 && &data[0..4] == b"RIFF" && &data[8..12] == b"WEBP" {
            return Some(ImageFormat::WebP);
        }

        if data.starts_with(b"GIF87a") || data.starts_with(b"GIF89a") {
            return Some(ImageFormat::Gif);
        }

        None
    }
}

/// An uploaded image, held as a data URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageHandle {
    pub format: ImageFormat,
    /// Size of the original file in bytes.
    pub byte_len: usize,
    /// `data:<mime>;base64,<payload>`
    pub data_url: String,
}

impl ImageHandle {
    /// Wrap raw bytes of a known format.
    pub fn from_bytes(format: ImageFormat, data: &[u8]) -> Self {
        Self {
            format,
            byte_len: data.len(),
            data_url: format!("data:{};base64,{}", format.mime_type(), STANDARD.encode(data)),
        }
    }

    /// Get the raw image data (decoded from the data URL).
    pub fn data(&self) -> Option<Vec<u8>> {
        let (_, payload) = self.data_url.split_once(";base64,")?;
        STANDARD.decode(payload).ok()
    }
}

/// Reads a selected file into an image handle.
///
/// Implementations may complete asynchronously (a browser file reader, a
/// worker thread). Failure must not have side effects.
pub trait ImageLoader {
    fn load<'a>(&'a self, data: &'a [u8]) -> BoxFuture<'a, UploadResult<ImageHandle>>;
}

/// Loader that sniffs the format and encodes the bytes as a data URL.
#[derive(Debug, Clone, Copy, Default)]
pub struct DataUrlLoader;

impl ImageLoader for DataUrlLoader {
    fn load<'a>(&'a self, data: &'a [u8]) -> BoxFuture<'a, UploadResult<ImageHandle>> {
        Box::pin(async move {
            if data.is_empty() {
                return Err(UploadError::Empty);
            }
            let format = ImageFormat::from_magic_bytes(data).ok_or(UploadError::UnsupportedFormat)?;
            Ok(ImageHandle::from_bytes(format, data))
        })
    }
}
