//! Image URL resolution and upload payloads.

use crate::error::ValidationError;

/// Upper bound accepted by the upload endpoint.
pub const MAX_IMAGE_BYTES: usize = 20 * 1024 * 1024;

/// Builds public image URLs from stored filenames. The base URL is process
/// configuration and is fixed once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUrls {
    base: String,
}

impl ImageUrls {
    pub fn new(base: impl Into<String>) -> Self {
        let base = base.into();
        Self {
            base: base.trim_end_matches('/').to_string(),
        }
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    pub fn url_for(&self, filename: Option<&str>) -> Option<String> {
        let filename = filename.map(str::trim).filter(|name| !name.is_empty())?;
        Some(format!("{}/{filename}", self.base))
    }
}

/// A locally selected image file waiting to be uploaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUpload {
    pub filename: String,
    pub mime_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl ImageUpload {
    pub fn new(filename: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            filename: filename.into(),
            mime_type: None,
            bytes,
        }
    }

    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = Some(mime_type.into());
        self
    }

    /// Declared mime type, or one guessed from the filename extension.
    pub fn resolved_mime_type(&self) -> String {
        self.mime_type.clone().unwrap_or_else(|| {
            mime_guess::from_path(&self.filename)
                .first_or_octet_stream()
                .essence_str()
                .to_string()
        })
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.bytes.len() > MAX_IMAGE_BYTES {
            return Err(ValidationError::ImageTooLarge {
                size: self.bytes.len(),
                max: MAX_IMAGE_BYTES,
            });
        }
        let mime = self.resolved_mime_type();
        if !mime.starts_with("image/") {
            return Err(ValidationError::UnsupportedImageType { mime });
        }
        Ok(())
    }
}
