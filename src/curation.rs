//! Like/dislike bookkeeping over one generation cycle.
//!
//! A [`CurationState`] belongs to a single caller session. Replacing the
//! candidates (new seed, or regenerating) clears every like.

use crate::track::{Candidate, Track};
use indexmap::IndexSet;
use log::{debug, trace};

/// Candidates plus the ids the caller has liked, in first-liked order.
#[derive(Debug, Clone, Default)]
pub struct CurationState {
    candidates: Vec<Candidate>,
    liked: IndexSet<String>,
}

impl CurationState {
    #[must_use]
    pub fn new(candidates: Vec<Candidate>) -> Self {
        Self {
            candidates,
            liked: IndexSet::new(),
        }
    }

    /// Swaps in a fresh candidate list and forgets all likes.
    pub fn replace_candidates(&mut self, candidates: Vec<Candidate>) {
        self.candidates = candidates;
        self.liked.clear();
    }

    #[must_use]
    pub fn candidates(&self) -> &[Candidate] {
        &self.candidates
    }

    /// Flips membership. Newly liked ids go to the end of the like order.
    ///
    /// Ids that are not current candidates are ignored, so every liked id
    /// always resolves to a song. Returns whether the id is liked afterwards.
    pub fn toggle_like(&mut self, song_id: &str) -> bool {
        if self.liked.shift_remove(song_id) {
            trace!("Unliked {song_id}");
            false
        } else if self.candidates.iter().any(|c| c.id() == song_id) {
            self.liked.insert(song_id.to_string());
            trace!("Liked {song_id}");
            true
        } else {
            debug!("Ignoring like for {song_id}, not a current candidate");
            false
        }
    }

    /// Removes the id from the liked set if present. Candidates stay visible.
    pub fn dislike(&mut self, song_id: &str) {
        self.liked.shift_remove(song_id);
    }

    #[must_use]
    pub fn is_liked(&self, song_id: &str) -> bool {
        self.liked.contains(song_id)
    }

    /// Likes the candidate at `index` unless it is already liked.
    ///
    /// Returns `false` when the index is out of range.
    pub fn like_index(&mut self, index: usize) -> bool {
        let Some(id) = self.candidates.get(index).map(|c| c.id().to_string()) else {
            return false;
        };
        if !self.liked.contains(&id) {
            self.liked.insert(id);
        }
        true
    }

    #[must_use]
    pub fn liked_count(&self) -> usize {
        self.liked.len()
    }

    /// Liked tracks in like order, reasons dropped.
    #[must_use]
    pub fn liked_songs(&self) -> Vec<Track> {
        self.liked
            .iter()
            .filter_map(|id| self.candidates.iter().find(|c| c.id() == id))
            .map(|c| c.track.clone())
            .collect()
    }
}
