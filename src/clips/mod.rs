//! Clip extraction collaborator.
//!
//! The engine only decides *how long* the next clip is. Producing playable
//! audio from a preview locator is delegated to a `ClipExtractor`.
//! Extraction failures are recoverable: the guessing team may ask again
//! without penalty.

mod bitrate;

pub use bitrate::{BitrateClipper, PreviewFetcher, DEFAULT_BITRATE_BPS};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::tracks::PreviewRef;

/// Playable audio trimmed to a requested duration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AudioClip {
    /// Encoded audio bytes.
    pub bytes: Vec<u8>,
    /// Duration that was requested.
    pub duration_secs: u32,
    /// MIME type of `bytes`.
    pub mime_type: String,
}

impl AudioClip {
    /// Size of the encoded clip.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Check if the clip has no audio data.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Failure to produce a clip.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClipError {
    #[error("failed to fetch preview {preview}: {reason}")]
    Fetch { preview: String, reason: String },

    #[error("preview {0} contained no audio")]
    EmptyPreview(String),

    #[error("failed to decode preview audio: {0}")]
    Decode(String),
}

/// Clip extraction collaborator.
pub trait ClipExtractor {
    fn extract(&mut self, preview: &PreviewRef, duration_secs: u32) -> Result<AudioClip, ClipError>;
}

impl<T: ClipExtractor + ?Sized> ClipExtractor for &mut T {
    fn extract(&mut self, preview: &PreviewRef, duration_secs: u32) -> Result<AudioClip, ClipError> {
        (**self).extract(preview, duration_secs)
    }
}

impl<T: ClipExtractor + ?Sized> ClipExtractor for Box<T> {
    fn extract(&mut self, preview: &PreviewRef, duration_secs: u32) -> Result<AudioClip, ClipError> {
        (**self).extract(preview, duration_secs)
    }
}
