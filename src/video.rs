use crate::error::VideoError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// One playable episode.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoEntry {
    pub url: String,
    pub title: String,
    pub episode: u32,
}

impl VideoEntry {
    /// Caption of the episode's selection button.
    pub fn button_label(&self) -> String {
        format!("第{}集", self.episode)
    }
}

/// The fixed, ordered episode list shown on the player page.
///
/// Loaded once at startup and never modified. The media URLs are treated as
/// opaque configuration; signed links expiring is not handled here.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoCatalog {
    pub title: String,
    #[serde(default)]
    pub synopsis: String,
    pub episodes: Vec<VideoEntry>,
}

impl VideoCatalog {
    /// Parses a catalog from JSON.
    ///
    /// # Errors
    /// * `VideoError::Json` for malformed input
    /// * `VideoError::EmptyCatalog` when no episodes are listed
    pub fn from_json_str(json: &str) -> Result<Self, VideoError> {
        let catalog: VideoCatalog = serde_json::from_str(json)?;
        if catalog.episodes.is_empty() {
            return Err(VideoError::EmptyCatalog);
        }
        Ok(catalog)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, VideoError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn len(&self) -> usize {
        self.episodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.episodes.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&VideoEntry> {
        self.episodes.get(index)
    }
}

/// Which episode a session is watching.
///
/// Starts at index 0; the only transition is [`PlayerState::select`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerState {
    index: usize,
}

impl PlayerState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// Switches to episode `index` of `catalog`.
    ///
    /// # Errors
    /// * `VideoError::OutOfRange` when `index` is past the end of the catalog;
    ///   the current selection is left as it was
    pub fn select(&mut self, index: usize, catalog: &VideoCatalog) -> Result<(), VideoError> {
        if index >= catalog.len() {
            return Err(VideoError::OutOfRange {
                index,
                len: catalog.len(),
            });
        }
        self.index = index;
        Ok(())
    }

    /// The entry to render.
    pub fn current<'a>(&self, catalog: &'a VideoCatalog) -> Option<&'a VideoEntry> {
        catalog.get(self.index)
    }
}
