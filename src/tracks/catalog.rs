//! In-memory track catalog.
//!
//! `StaticCatalog` answers lookups from a fixed list of tracks. Useful for
//! offline play, demos and tests.

use rustc_hash::FxHashMap;

use super::{LookupError, Track, TrackId, TrackLookup};

/// Track lookup over a fixed list.
///
/// Matches are case-insensitive substrings of the title or artist name,
/// returned in insertion order.
///
/// ## Example
///
/// ```
/// use clip_crush::tracks::{StaticCatalog, Track, TrackLookup};
///
/// let mut catalog = StaticCatalog::new();
/// catalog.insert(Track::new(1, "Dancing Queen", "ABBA").with_preview("dq.mp3"));
/// catalog.insert(Track::new(2, "Waterloo", "ABBA").with_preview("w.mp3"));
///
/// let found = catalog.search("abba").unwrap();
/// assert_eq!(found.len(), 2);
/// assert_eq!(found[0].title, "Dancing Queen");
/// ```
#[derive(Clone, Debug, Default)]
pub struct StaticCatalog {
    tracks: Vec<Track>,
    by_id: FxHashMap<TrackId, usize>,
    limit: Option<usize>,
}

impl StaticCatalog {
    /// Create an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Cap the number of results per search.
    #[must_use]
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Add a track, replacing any track with the same id in place.
    pub fn insert(&mut self, track: Track) {
        if let Some(&index) = self.by_id.get(&track.id) {
            self.tracks[index] = track;
        } else {
            self.by_id.insert(track.id, self.tracks.len());
            self.tracks.push(track);
        }
    }

    /// Look up a track by id.
    #[must_use]
    pub fn get(&self, id: TrackId) -> Option<&Track> {
        self.by_id.get(&id).map(|&index| &self.tracks[index])
    }

    /// Number of tracks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    /// Check if the catalog is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }
}

impl FromIterator<Track> for StaticCatalog {
    fn from_iter<I: IntoIterator<Item = Track>>(iter: I) -> Self {
        let mut catalog = Self::new();
        for track in iter {
            catalog.insert(track);
        }
        catalog
    }
}

impl TrackLookup for StaticCatalog {
    fn search(&mut self, query: &str) -> Result<Vec<Track>, LookupError> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Ok(Vec::new());
        }

        let matches = self
            .tracks
            .iter()
            .filter(|t| {
                t.title.to_lowercase().contains(&needle)
                    || t.artist_name.to_lowercase().contains(&needle)
            })
            .take(self.limit.unwrap_or(usize::MAX))
            .cloned()
            .collect();

        Ok(matches)
    }
}
