//! Constant-bitrate clip extraction.
//!
//! Preview recordings are constant-bitrate MPEG audio, so the first
//! `seconds * bitrate / 8` bytes are (approximately) the first `seconds`
//! of audio. Decoders tolerate the cut at an arbitrary frame boundary.

use super::{AudioClip, ClipError, ClipExtractor};
use crate::tracks::PreviewRef;

/// Bitrate of the preview recordings served by the lookup service.
pub const DEFAULT_BITRATE_BPS: u32 = 128_000;

const MPEG_MIME: &str = "audio/mpeg";

/// Source of raw preview bytes (HTTP client, cache, local files).
pub trait PreviewFetcher {
    fn fetch(&mut self, preview: &PreviewRef) -> Result<Vec<u8>, ClipError>;
}

/// Extracts clips by truncating the full preview at the byte offset that
/// corresponds to the requested duration.
#[derive(Clone, Debug)]
pub struct BitrateClipper<F> {
    fetcher: F,
    bitrate_bps: u32,
}

impl<F: PreviewFetcher> BitrateClipper<F> {
    /// Create a clipper assuming `DEFAULT_BITRATE_BPS`.
    pub fn new(fetcher: F) -> Self {
        Self {
            fetcher,
            bitrate_bps: DEFAULT_BITRATE_BPS,
        }
    }

    /// Override the assumed bitrate.
    #[must_use]
    pub fn with_bitrate(mut self, bitrate_bps: u32) -> Self {
        self.bitrate_bps = bitrate_bps;
        self
    }

    /// Byte offset at which a clip of `duration_secs` ends.
    #[must_use]
    pub fn end_byte(&self, duration_secs: u32) -> usize {
        let bytes_per_sec = u64::from(self.bitrate_bps / 8);
        (u64::from(duration_secs) * bytes_per_sec) as usize
    }

    /// Access the underlying fetcher.
    pub fn fetcher_mut(&mut self) -> &mut F {
        &mut self.fetcher
    }
}

impl<F: PreviewFetcher> ClipExtractor for BitrateClipper<F> {
    fn extract(&mut self, preview: &PreviewRef, duration_secs: u32) -> Result<AudioClip, ClipError> {
        let mut bytes = self.fetcher.fetch(preview)?;
        if bytes.is_empty() {
            return Err(ClipError::EmptyPreview(preview.to_string()));
        }

        // Shorter previews play in full.
        bytes.truncate(self.end_byte(duration_secs));

        Ok(AudioClip {
            bytes,
            duration_secs,
            mime_type: MPEG_MIME.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedBytes(Vec<u8>);

    impl PreviewFetcher for FixedBytes {
        fn fetch(&mut self, _preview: &PreviewRef) -> Result<Vec<u8>, ClipError> {
            Ok(self.0.clone())
        }
    }

    struct Offline;

    impl PreviewFetcher for Offline {
        fn fetch(&mut self, preview: &PreviewRef) -> Result<Vec<u8>, ClipError> {
            Err(ClipError::Fetch {
                preview: preview.to_string(),
                reason: "offline".into(),
            })
        }
    }

    fn preview() -> PreviewRef {
        PreviewRef("https://cdn/p.mp3".into())
    }

    #[test]
    fn test_end_byte_at_default_bitrate() {
        let clipper = BitrateClipper::new(Offline);
        assert_eq!(clipper.end_byte(1), 16_000);
        assert_eq!(clipper.end_byte(30), 480_000);
    }

    #[test]
    fn test_truncates_to_duration() {
        let mut clipper = BitrateClipper::new(FixedBytes(vec![7u8; 100])).with_bitrate(80);

        // 80 bit/s = 10 bytes per second
        let clip = clipper.extract(&preview(), 3).unwrap();
        assert_eq!(clip.len(), 30);
        assert_eq!(clip.duration_secs, 3);
        assert_eq!(clip.mime_type, "audio/mpeg");
    }

    #[test]
    fn test_short_preview_plays_in_full() {
        let mut clipper = BitrateClipper::new(FixedBytes(vec![1u8; 12])).with_bitrate(80);

        let clip = clipper.extract(&preview(), 30).unwrap();
        assert_eq!(clip.len(), 12);
    }

    #[test]
    fn test_empty_preview_is_an_error() {
        let mut clipper = BitrateClipper::new(FixedBytes(vec![]));
        assert_eq!(
            clipper.extract(&preview(), 1),
            Err(ClipError::EmptyPreview("https://cdn/p.mp3".into()))
        );
    }

    #[test]
    fn test_fetch_failure_propagates() {
        let mut clipper = BitrateClipper::new(Offline);
        assert!(matches!(
            clipper.extract(&preview(), 1),
            Err(ClipError::Fetch { .. })
        ));
    }
}
