//! Image layer content.

use kurbo::Size;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Width of an image layer's envelope before scaling.
pub const IMAGE_BASE_WIDTH: f64 = 250.0;

/// Opaque handle to a pixel buffer owned by the shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageHandle(Uuid);

impl ImageHandle {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for ImageHandle {
    fn default() -> Self {
        Self::new()
    }
}

/// A resolved image: the handle plus the pixel dimensions of the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageSource {
    pub handle: ImageHandle,
    /// Original image width in pixels.
    pub source_width: u32,
    /// Original image height in pixels.
    pub source_height: u32,
}

impl ImageSource {
    pub fn new(handle: ImageHandle, source_width: u32, source_height: u32) -> Self {
        Self {
            handle,
            source_width,
            source_height,
        }
    }

    /// Height over width. Degenerate sources are treated as square.
    pub fn aspect_ratio(&self) -> f64 {
        if self.source_width == 0 || self.source_height == 0 {
            return 1.0;
        }
        self.source_height as f64 / self.source_width as f64
    }

    /// Untransformed frame: fixed width, height following the source aspect ratio.
    pub fn envelope(&self) -> Size {
        Size::new(IMAGE_BASE_WIDTH, IMAGE_BASE_WIDTH * self.aspect_ratio())
    }
}
