//! Uploaded proof images.
//!
//! Images are kept in memory and addressed by an opaque `upload://<uuid>`
//! reference, which is what log entries store as `returnedImageUrl`.

use std::collections::HashMap;
use std::sync::RwLock;

use thiserror::Error;
use uuid::Uuid;

pub const IMAGE_URL_SCHEME: &str = "upload://";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ImageError {
    #[error("uploaded image is empty")]
    Empty,
    #[error("unsupported content type '{0}', expected an image")]
    UnsupportedType(String),
    #[error("image store lock poisoned")]
    Poisoned,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredImage {
    pub content_type: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Default)]
pub struct ImageStore {
    images: RwLock<HashMap<Uuid, StoredImage>>,
}

impl ImageStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `bytes` and return the reference to put on the log entry.
    pub fn upload(&self, content_type: &str, bytes: Vec<u8>) -> Result<String, ImageError> {
        if !is_image_type(content_type) {
            return Err(ImageError::UnsupportedType(content_type.to_string()));
        }
        if bytes.is_empty() {
            return Err(ImageError::Empty);
        }

        let id = Uuid::now_v7();
        let size = bytes.len();
        let mut images = self.images.write().map_err(|_| ImageError::Poisoned)?;
        images.insert(
            id,
            StoredImage {
                content_type: content_type.to_string(),
                bytes,
            },
        );

        tracing::info!(image_id = %id, size, "image uploaded");
        Ok(format!("{IMAGE_URL_SCHEME}{id}"))
    }

    /// Look up an image by its bare id, as found after the `upload://` scheme.
    pub fn get_by_id(&self, id: &str) -> Option<StoredImage> {
        self.get(&format!("{IMAGE_URL_SCHEME}{id}"))
    }

    /// Look up an image by the reference `upload` returned.
    pub fn get(&self, image_url: &str) -> Option<StoredImage> {
        let id = image_url
            .strip_prefix(IMAGE_URL_SCHEME)
            .and_then(|raw| Uuid::parse_str(raw).ok())?;
        let images = self.images.read().ok()?;
        images.get(&id).cloned()
    }
}

/// `image/*`, ignoring parameters and case.
fn is_image_type(content_type: &str) -> bool {
    content_type
        .split(';')
        .next()
        .map(str::trim)
        .and_then(|essence| essence.split_once('/'))
        .is_some_and(|(kind, sub)| kind.eq_ignore_ascii_case("image") && !sub.is_empty())
}
