//! # Track and Mood Model
//!
//! Plain data shared by every other module: the tracks a listener picks and
//! curates, the three mood dials, and the candidates a recommender proposes.
//!
//! All types are serde-serializable so the CLI can print them as JSON.

use serde::{Deserialize, Serialize};

/// Fallback display name when a seed track carries no title.
pub const UNNAMED_SEED: &str = "your selected track";

/// A track as seen by this crate. Read-only; owned by the streaming service.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Track {
    pub id: String,
    pub title: String,
    pub artist: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub album_image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
}

impl Track {
    /// Convenience constructor for the three fields every track has.
    pub fn new(id: impl Into<String>, title: impl Into<String>, artist: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            artist: artist.into(),
            ..Default::default()
        }
    }

    /// Name used when a reason string refers back to this track as a seed.
    #[must_use]
    pub fn display_name(&self) -> &str {
        if self.title.trim().is_empty() {
            UNNAMED_SEED
        } else {
            &self.title
        }
    }
}

/// The three mood dials. Every axis lives in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MoodVector {
    pub energy: f64,
    pub danceability: f64,
    pub valence: f64,
}

impl Default for MoodVector {
    /// Sliders start centred.
    fn default() -> Self {
        Self {
            energy: 0.5,
            danceability: 0.5,
            valence: 0.5,
        }
    }
}

impl MoodVector {
    /// Builds a mood vector, clamping each axis into `[0, 1]`.
    ///
    /// NaN is not a position on a slider, so it maps to the centre.
    #[must_use]
    pub fn new(energy: f64, danceability: f64, valence: f64) -> Self {
        Self {
            energy: clamp_unit(energy),
            danceability: clamp_unit(danceability),
            valence: clamp_unit(valence),
        }
    }

    /// Same vector with every axis clamped.
    #[must_use]
    pub fn clamped(self) -> Self {
        Self::new(self.energy, self.danceability, self.valence)
    }

    /// True when all three axes are finite and within `[0, 1]`.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        [self.energy, self.danceability, self.valence]
            .iter()
            .all(|v| v.is_finite() && (0.0..=1.0).contains(v))
    }
}

/// Clamp into the unit interval. NaN becomes 0.5.
#[must_use]
pub fn clamp_unit(value: f64) -> f64 {
    if value.is_nan() {
        0.5
    } else {
        value.clamp(0.0, 1.0)
    }
}

/// Perturbed mood estimate attached to synthesized candidates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MoodEstimate {
    pub energy: f64,
    pub valence: f64,
}

/// A proposed track, not yet curated or persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    #[serde(flatten)]
    pub track: Track,
    pub album: String,
    /// Human-readable explanation of why this track matched.
    pub reason: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimate: Option<MoodEstimate>,
}

impl Candidate {
    #[must_use]
    pub fn id(&self) -> &str {
        &self.track.id
    }

    /// Drops the recommendation metadata, keeping the track.
    #[must_use]
    pub fn into_track(self) -> Track {
        self.track
    }

    /// `m:ss` rendering of the duration, empty when unknown.
    #[must_use]
    pub fn duration_label(&self) -> String {
        self.track.duration_ms.map(format_duration).unwrap_or_default()
    }
}

/// Renders milliseconds as `m:ss`.
#[must_use]
pub fn format_duration(ms: u64) -> String {
    let total_seconds = ms / 1000;
    format!("{}:{:02}", total_seconds / 60, total_seconds % 60)
}

/// Parses an `m:ss` label back into milliseconds.
#[must_use]
pub fn parse_duration(label: &str) -> Option<u64> {
    let (minutes, seconds) = label.split_once(':')?;
    let minutes: u64 = minutes.trim().parse().ok()?;
    let seconds: u64 = seconds.trim().parse().ok()?;
    if seconds >= 60 {
        return None;
    }
    Some((minutes * 60 + seconds) * 1000)
}
