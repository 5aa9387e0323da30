//! Core type bindings for Python.

use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

use crate::core::{TeamId, Trial};
use crate::tracks::Track;

/// Python wrapper for TeamId.
#[pyclass(name = "TeamId")]
#[derive(Clone, Debug)]
pub struct PyTeamId(pub TeamId);

#[pymethods]
impl PyTeamId {
    /// Create a team from its label ("A" or "B").
    #[new]
    fn new(label: &str) -> PyResult<Self> {
        TeamId::from_label(label)
            .map(Self)
            .ok_or_else(|| PyValueError::new_err(format!("unknown team label: {label:?}")))
    }

    /// The opposing team.
    fn other(&self) -> Self {
        Self(self.0.other())
    }

    /// Get the team index (0-based).
    fn index(&self) -> usize {
        self.0.index()
    }

    #[getter]
    fn label(&self) -> &'static str {
        self.0.label()
    }

    fn __repr__(&self) -> String {
        format!("TeamId({})", self.0.label())
    }

    fn __str__(&self) -> String {
        self.0.to_string()
    }

    fn __eq__(&self, other: &Self) -> bool {
        self.0 == other.0
    }

    fn __hash__(&self) -> u64 {
        self.0.index() as u64
    }
}

/// Python wrapper for Track.
#[pyclass(name = "Track")]
#[derive(Clone, Debug)]
pub struct PyTrack(pub Track);

#[pymethods]
impl PyTrack {
    /// Create a track. Without a preview the track cannot be played.
    #[new]
    #[pyo3(signature = (id, title, artist_name, preview=None, cover=None))]
    fn new(
        id: u64,
        title: String,
        artist_name: String,
        preview: Option<String>,
        cover: Option<String>,
    ) -> Self {
        let mut track = Track::new(id, title, artist_name);
        if let Some(preview) = preview {
            track = track.with_preview(preview);
        }
        if let Some(cover) = cover {
            track = track.with_cover(cover);
        }
        Self(track)
    }

    #[getter]
    fn id(&self) -> u64 {
        self.0.id.0
    }

    #[getter]
    fn title(&self) -> &str {
        &self.0.title
    }

    #[getter]
    fn artist_name(&self) -> &str {
        &self.0.artist_name
    }

    #[getter]
    fn preview(&self) -> Option<&str> {
        self.0.preview.as_ref().map(|p| p.as_str())
    }

    #[getter]
    fn cover(&self) -> Option<&str> {
        self.0.cover_image_ref.as_deref()
    }

    /// Whether the track has a preview to clip from.
    fn is_playable(&self) -> bool {
        self.0.is_playable()
    }

    fn __repr__(&self) -> String {
        format!(
            "Track(id={}, title={:?}, artist={:?})",
            self.0.id.0, self.0.title, self.0.artist_name
        )
    }

    fn __eq__(&self, other: &Self) -> bool {
        self.0 == other.0
    }

    fn __hash__(&self) -> u64 {
        self.0.id.0
    }
}

/// Python wrapper for one rung of the trial ladder.
#[pyclass(name = "Trial")]
#[derive(Clone, Debug)]
pub struct PyTrial(pub Trial);

#[pymethods]
impl PyTrial {
    #[new]
    #[pyo3(signature = (level, clip_duration_secs, penalty, reward=0))]
    fn new(level: u32, clip_duration_secs: u32, penalty: i64, reward: i64) -> Self {
        Self(Trial::new(level, clip_duration_secs, penalty).with_reward(reward))
    }

    #[getter]
    fn level(&self) -> u32 {
        self.0.level
    }

    #[getter]
    fn clip_duration_secs(&self) -> u32 {
        self.0.clip_duration_secs
    }

    #[getter]
    fn penalty(&self) -> i64 {
        self.0.penalty
    }

    #[getter]
    fn reward(&self) -> i64 {
        self.0.reward
    }

    fn __repr__(&self) -> String {
        format!(
            "Trial(level={}, secs={}, penalty={}, reward={})",
            self.0.level, self.0.clip_duration_secs, self.0.penalty, self.0.reward
        )
    }

    fn __eq__(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}
