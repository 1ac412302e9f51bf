use std::sync::Arc;

use mime::Mime;
use shared::{domain::MAX_IMAGE_BYTES, error::ValidationError};

/// A file as the user picked it, before any checks.
///
/// `size_bytes` and `media_type` are the declared metadata; validation only
/// ever looks at this snapshot.
#[derive(Debug, Clone)]
pub struct CandidateFile {
    pub name: String,
    pub media_type: Option<String>,
    pub size_bytes: u64,
    pub bytes: Vec<u8>,
}

impl CandidateFile {
    pub fn new(name: impl Into<String>, media_type: Option<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            media_type,
            size_bytes: bytes.len() as u64,
            bytes,
        }
    }
}

/// An image that passed validation. Cheap to clone.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectedFile {
    name: String,
    media_type: String,
    size_bytes: u64,
    bytes: Arc<[u8]>,
}

impl SelectedFile {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn media_type(&self) -> &str {
        &self.media_type
    }

    pub fn size_bytes(&self) -> u64 {
        self.size_bytes
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    #[cfg(test)]
    pub(crate) fn unchecked(name: &str, media_type: &str, bytes: &[u8]) -> Self {
        Self {
            name: name.to_string(),
            media_type: media_type.to_string(),
            size_bytes: bytes.len() as u64,
            bytes: bytes.into(),
        }
    }
}

/// Parses the declared type and keeps its essence (`image/png`) only when the
/// top-level type is `image`.
fn image_essence(media_type: &str) -> Option<String> {
    let media_type = media_type.trim();
    let essence = media_type.split(';').next().unwrap_or_default();
    if essence.chars().any(char::is_whitespace) {
        return None;
    }
    let parsed: Mime = media_type.parse().ok()?;
    if parsed.type_() != mime::IMAGE || parsed.subtype().as_str().is_empty() {
        return None;
    }
    Some(parsed.essence_str().to_string())
}

/// Accepts image files up to [`MAX_IMAGE_BYTES`]. The type check runs first,
/// so a non-image is always reported as such whatever its size.
pub fn validate(file: CandidateFile) -> Result<SelectedFile, ValidationError> {
    let Some(media_type) = file.media_type.as_deref().and_then(image_essence) else {
        return Err(ValidationError::UnsupportedType {
            media_type: file.media_type,
        });
    };

    if file.size_bytes > MAX_IMAGE_BYTES {
        return Err(ValidationError::TooLarge {
            size_bytes: file.size_bytes,
            limit_bytes: MAX_IMAGE_BYTES,
        });
    }

    Ok(SelectedFile {
        name: file.name,
        media_type,
        size_bytes: file.size_bytes,
        bytes: file.bytes.into(),
    })
}
