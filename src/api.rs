//! # Request/Response Surface
//!
//! The JSON contract the presentation layer talks to. Field names match the
//! wire format exactly (`spotify_user_id`, `mixId`, ...), so these records can
//! be handed to any HTTP layer unchanged.
//!
//! Each handler returns an HTTP-equivalent status next to the body:
//!
//! | Outcome                     | Status | Body                                  |
//! |-----------------------------|--------|---------------------------------------|
//! | success                     | 200    | `{"ok":true, ...}`                    |
//! | missing field / no songs    | 400    | `{"ok":false,"error":"Missing fields"}` |
//! | non-numeric mix id          | 400    | `{"ok":false,"error":"Invalid mix id"}` |
//! | store failure               | 500    | `{"ok":false,"error":"Failed to ..."}` |
//!
//! Errors are logged here, with the operation and identifiers, and never
//! leak internal detail into the body.

use crate::db::{Mix, MixSong, MixStore, NewMix, DEFAULT_LIST_LIMIT};
use crate::error::MixError;
use crate::track::{MoodVector, Track};
use log::{error, warn};
use serde::{Deserialize, Serialize};

/// Song entry of a save request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SongPayload {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub artist: String,
}

impl From<&Track> for SongPayload {
    fn from(track: &Track) -> Self {
        Self {
            id: track.id.clone(),
            title: track.title.clone(),
            artist: track.artist.clone(),
        }
    }
}

impl From<SongPayload> for Track {
    fn from(song: SongPayload) -> Self {
        Track::new(song.id, song.title, song.artist)
    }
}

/// Body of "create mix".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SaveMixRequest {
    #[serde(default)]
    pub spotify_user_id: String,
    #[serde(default)]
    pub seed_track_id: String,
    #[serde(default)]
    pub seed_track_name: String,
    #[serde(default = "centre")]
    pub energy: f64,
    #[serde(default = "centre")]
    pub danceability: f64,
    #[serde(default = "centre")]
    pub valence: f64,
    #[serde(default)]
    pub songs: Vec<SongPayload>,
}

fn centre() -> f64 {
    0.5
}

impl SaveMixRequest {
    /// Mood of the request, clamped into range.
    #[must_use]
    pub fn mood(&self) -> MoodVector {
        MoodVector::new(self.energy, self.danceability, self.valence)
    }
}

/// Row of "list mixes".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MixSummary {
    pub id: i64,
    pub seed_track_id: String,
    pub seed_track_name: String,
    pub energy: f64,
    pub danceability: f64,
    pub valence: f64,
}

impl From<Mix> for MixSummary {
    fn from(mix: Mix) -> Self {
        Self {
            id: mix.id,
            seed_track_id: mix.seed_track_id,
            seed_track_name: mix.seed_track_name,
            energy: mix.mood.energy,
            danceability: mix.mood.danceability,
            valence: mix.mood.valence,
        }
    }
}

/// Row of "list songs".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MixSongRow {
    pub spotify_track_id: String,
    pub title: String,
    pub artist: String,
}

impl From<MixSong> for MixSongRow {
    fn from(song: MixSong) -> Self {
        Self {
            spotify_track_id: song.track_id,
            title: song.title,
            artist: song.artist,
        }
    }
}

/// Response body of every operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ApiResponse {
    Saved {
        ok: bool,
        #[serde(rename = "mixId")]
        mix_id: i64,
    },
    Mixes {
        ok: bool,
        mixes: Vec<MixSummary>,
    },
    Songs {
        ok: bool,
        songs: Vec<MixSongRow>,
    },
    Failed {
        ok: bool,
        error: String,
    },
}

impl ApiResponse {
    fn failed(message: &str) -> Self {
        ApiResponse::Failed {
            ok: false,
            error: message.to_string(),
        }
    }

    #[must_use]
    pub fn is_ok(&self) -> bool {
        match self {
            ApiResponse::Saved { ok, .. }
            | ApiResponse::Mixes { ok, .. }
            | ApiResponse::Songs { ok, .. }
            | ApiResponse::Failed { ok, .. } => *ok,
        }
    }
}

/// Status plus body, as returned by every handler.
pub type Reply = (u16, ApiResponse);

/// "create mix".
pub fn save_mix(store: &MixStore, request: SaveMixRequest) -> Reply {
    let mood = request.mood();
    let user_id = request.spotify_user_id.clone();
    let songs: Vec<Track> = request.songs.into_iter().map(Track::from).collect();

    let new_mix = NewMix {
        user_id: &user_id,
        seed_track_id: &request.seed_track_id,
        seed_track_name: &request.seed_track_name,
        mood,
        songs: &songs,
    };

    match store.create(&new_mix) {
        Ok(mix_id) => (
            200,
            ApiResponse::Saved {
                ok: true,
                mix_id,
            },
        ),
        Err(e @ MixError::Validation(_)) => {
            warn!(
                "save_mix rejected for user {user_id:?} seed {:?}: {e}",
                request.seed_track_id
            );
            (e.status(), ApiResponse::failed("Missing fields"))
        }
        Err(e) => {
            error!(
                "save_mix failed for user {user_id:?} seed {:?} [{}]: {e}",
                request.seed_track_id,
                e.code()
            );
            (e.status(), ApiResponse::failed("Failed to save mix"))
        }
    }
}

/// "list mixes": ten most recent mixes of `user_id`.
pub fn list_mixes(store: &MixStore, user_id: &str) -> Reply {
    list_mixes_limited(store, user_id, DEFAULT_LIST_LIMIT)
}

/// "list mixes" with an explicit page size. Same body shape as [`list_mixes`].
pub fn list_mixes_limited(store: &MixStore, user_id: &str, limit: usize) -> Reply {
    match store.list_for_user(user_id, limit) {
        Ok(mixes) => (
            200,
            ApiResponse::Mixes {
                ok: true,
                mixes: mixes.into_iter().map(MixSummary::from).collect(),
            },
        ),
        Err(e) => {
            error!("list_mixes failed for user {user_id:?} [{}]: {e}", e.code());
            (500, ApiResponse::failed("Failed to load mixes"))
        }
    }
}

/// "list songs". The id arrives as text, as it would from a URL path.
///
/// An id that parses but names no mix answers with an empty song list.
pub fn list_songs(store: &MixStore, mix_id: &str) -> Reply {
    let Ok(mix_id) = mix_id.trim().parse::<i64>() else {
        warn!("list_songs called with invalid mix id {mix_id:?}");
        return (400, ApiResponse::failed("Invalid mix id"));
    };

    match store.songs_for(mix_id) {
        Ok(songs) => (
            200,
            ApiResponse::Songs {
                ok: true,
                songs: songs.into_iter().map(MixSongRow::from).collect(),
            },
        ),
        Err(e) => {
            error!("list_songs failed for mix {mix_id} [{}]: {e}", e.code());
            (500, ApiResponse::failed("Failed to load mix songs"))
        }
    }
}
