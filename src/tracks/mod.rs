//! Track model and the track lookup collaborator.
//!
//! The engine never searches by itself. It emits `Effect::Search` and the
//! host answers through a `TrackLookup` implementation. A track is an
//! opaque value to the engine apart from its preview locator, which is
//! what clip extraction needs.

mod catalog;

pub use catalog::StaticCatalog;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Track identifier assigned by the lookup service.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TrackId(pub u64);

impl std::fmt::Display for TrackId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Track({})", self.0)
    }
}

/// Locator of a short preview recording (typically a URL).
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PreviewRef(pub String);

impl PreviewRef {
    /// Wrap a locator. Blank locators are treated as missing.
    #[must_use]
    pub fn new(locator: impl Into<String>) -> Option<Self> {
        let locator = locator.into();
        if locator.trim().is_empty() {
            None
        } else {
            Some(Self(locator))
        }
    }

    /// The raw locator.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PreviewRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A candidate track returned by the lookup service.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Track {
    pub id: TrackId,
    pub title: String,
    pub artist_name: String,
    #[serde(default)]
    pub cover_image_ref: Option<String>,
    #[serde(default)]
    pub preview: Option<PreviewRef>,
}

impl Track {
    /// Create a track with no cover art and no preview.
    pub fn new(id: u64, title: impl Into<String>, artist_name: impl Into<String>) -> Self {
        Self {
            id: TrackId(id),
            title: title.into(),
            artist_name: artist_name.into(),
            cover_image_ref: None,
            preview: None,
        }
    }

    /// Attach a preview locator. Blank locators leave the track unplayable.
    #[must_use]
    pub fn with_preview(mut self, locator: impl Into<String>) -> Self {
        self.preview = PreviewRef::new(locator);
        self
    }

    /// Attach a cover art reference.
    #[must_use]
    pub fn with_cover(mut self, cover: impl Into<String>) -> Self {
        self.cover_image_ref = Some(cover.into());
        self
    }

    /// A track can be used for a round only if it has a preview.
    #[must_use]
    pub fn is_playable(&self) -> bool {
        self.preview.is_some()
    }
}

/// Result of one lookup as reported back to the engine.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SearchOutcome {
    /// Candidates in relevance order. May be empty.
    Matches(Vec<Track>),
    /// The lookup failed; the message is for logs and display only.
    Failed(String),
}

impl From<Result<Vec<Track>, LookupError>> for SearchOutcome {
    fn from(result: Result<Vec<Track>, LookupError>) -> Self {
        match result {
            Ok(tracks) => SearchOutcome::Matches(tracks),
            Err(err) => SearchOutcome::Failed(err.to_string()),
        }
    }
}

/// Failure of the lookup service.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LookupError {
    #[error("track lookup unavailable: {0}")]
    Unavailable(String),

    #[error("malformed lookup response: {0}")]
    InvalidResponse(String),
}

/// Track lookup collaborator.
///
/// Returns candidates ordered by relevance. An empty list is a valid
/// "no matches" outcome, not an error.
pub trait TrackLookup {
    fn search(&mut self, query: &str) -> Result<Vec<Track>, LookupError>;
}

impl<T: TrackLookup + ?Sized> TrackLookup for &mut T {
    fn search(&mut self, query: &str) -> Result<Vec<Track>, LookupError> {
        (**self).search(query)
    }
}

impl<T: TrackLookup + ?Sized> TrackLookup for Box<T> {
    fn search(&mut self, query: &str) -> Result<Vec<Track>, LookupError> {
        (**self).search(query)
    }
}

/// Trim a user query. Blank queries are never sent to the lookup service.
#[must_use]
pub fn normalize_query(query: &str) -> Option<&str> {
    let trimmed = query.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}
