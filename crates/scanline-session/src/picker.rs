//! Platform image picker seam.
//!
//! The host implements [`ImagePicker`] over the OS photo library; the session
//! only needs a single photo with its base64 payload.

use async_trait::async_trait;
use scanline_core::ImageRef;

/// What to ask the platform picker for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PickRequest {
    /// Restrict the library to photos.
    pub photo: bool,
    /// Return the file contents as base64.
    pub include_base64: bool,
}

impl PickRequest {
    /// A single photo with its base64 payload.
    pub const fn photo_with_base64() -> Self {
        PickRequest {
            photo: true,
            include_base64: true,
        }
    }
}

/// The image the user selected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickedImage {
    pub base64: String,
    /// e.g. `image/png`. Missing on some platforms.
    pub mime_type: Option<String>,
}

impl PickedImage {
    pub fn new(base64: impl Into<String>, mime_type: Option<&str>) -> Self {
        PickedImage {
            base64: base64.into(),
            mime_type: mime_type.map(str::to_string),
        }
    }

    /// The picked file as a data URI.
    pub fn display_image(&self) -> ImageRef {
        ImageRef::from_picked(&self.base64, self.mime_type.as_deref())
    }
}

/// Outcome of one pick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickResponse {
    Cancelled,
    Failed { code: String, message: String },
    Picked(PickedImage),
}

/// Platform photo-library access.
#[async_trait]
pub trait ImagePicker: Send + Sync {
    async fn pick(&self, request: PickRequest) -> PickResponse;
}
