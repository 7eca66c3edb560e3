//! # Recommendation Gateway
//!
//! Turns a seed track and a mood vector into an ordered list of candidates.
//!
//! Strategy selection is explicit and happens per call:
//!
//! ```text
//! live source configured? ── no ──▶ mock::synthesize
//!          │
//!         yes ──▶ one request ── Ok(tracks) ──▶ normalized candidates
//!                      │
//!                      └── Err(reason) ──▶ warn! + mock::synthesize
//! ```
//!
//! There are no retries: the mock fallback replaces them, so a call costs at
//! most one failed request plus the (pure) synthesis.
//!
//! Upstream payloads are decoded into records where every field is optional,
//! then normalized here before a [`Candidate`] is built.

use crate::config::RuntimeConfig;
use crate::error::TransportError;
use crate::mock;
use crate::track::{Candidate, MoodVector, Track};
use log::{debug, info, warn};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;

/// Upper bound on live results per request.
pub const RESULT_LIMIT: u32 = 10;

/// Parameters of one live recommendation request.
#[derive(Debug, Clone, PartialEq)]
pub struct RecommendationRequest {
    pub seed_track_id: String,
    pub target_energy: f64,
    pub target_danceability: f64,
    pub target_valence: f64,
    pub limit: u32,
}

impl RecommendationRequest {
    /// Single-seed request with the standard result cap.
    #[must_use]
    pub fn new(seed: &Track, mood: &MoodVector) -> Self {
        Self {
            seed_track_id: seed.id.clone(),
            target_energy: mood.energy,
            target_danceability: mood.danceability,
            target_valence: mood.valence,
            limit: RESULT_LIMIT,
        }
    }

    fn query_pairs(&self) -> Vec<(&'static str, String)> {
        vec![
            ("seed_tracks", self.seed_track_id.clone()),
            ("target_energy", self.target_energy.to_string()),
            ("target_danceability", self.target_danceability.to_string()),
            ("target_valence", self.target_valence.to_string()),
            ("limit", self.limit.to_string()),
        ]
    }
}

/// Anything that can answer recommendation and search requests.
pub trait RecommendationSource {
    /// One attempt, no retries.
    ///
    /// # Errors
    ///
    /// Returns a [`TransportError`] if the request fails or the answer cannot be decoded.
    fn recommend(&self, request: &RecommendationRequest) -> Result<Vec<ApiTrack>, TransportError>;

    /// Track search by free-text query.
    ///
    /// # Errors
    ///
    /// Returns a [`TransportError`] if the request fails or the answer cannot be decoded.
    fn search(&self, query: &str) -> Result<Vec<ApiTrack>, TransportError>;
}

// --- upstream payloads -------------------------------------------------------

/// `GET /v1/recommendations` body.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RecommendationsResponse {
    pub tracks: Option<Vec<ApiTrack>>,
}

/// `GET /v1/search` body.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchResponse {
    pub tracks: Option<SearchPage>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchPage {
    pub items: Option<Vec<ApiTrack>>,
}

/// Track object as the streaming service sends it. Nothing is guaranteed.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiTrack {
    pub id: Option<String>,
    pub name: Option<String>,
    pub artists: Option<Vec<ApiArtist>>,
    pub album: Option<ApiAlbum>,
    pub duration_ms: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiArtist {
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiAlbum {
    pub name: Option<String>,
    pub images: Option<Vec<ApiImage>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiImage {
    pub url: Option<String>,
}

impl ApiTrack {
    /// Normalizes into a [`Track`] plus album name.
    ///
    /// Returns `None` for items without an id, which can be neither curated nor saved.
    #[must_use]
    pub fn normalize(self) -> Option<(Track, String)> {
        let id = self.id.filter(|id| !id.trim().is_empty())?;

        let artist = self
            .artists
            .unwrap_or_default()
            .into_iter()
            .filter_map(|a| a.name)
            .filter(|name| !name.is_empty())
            .collect::<Vec<_>>()
            .join(", ");

        let album = self.album.unwrap_or_default();
        let album_image_url = album
            .images
            .unwrap_or_default()
            .into_iter()
            .next()
            .and_then(|image| image.url)
            .filter(|url| !url.is_empty());

        let track = Track {
            id,
            title: self.name.unwrap_or_default(),
            artist,
            album_image_url,
            duration_ms: self.duration_ms,
        };
        Some((track, album.name.unwrap_or_default()))
    }
}

/// Reason attached to every live candidate.
#[must_use]
pub fn live_reason(seed: &Track) -> String {
    format!("Recommended based on \"{}\".", seed.display_name())
}

fn normalize_all(items: Vec<ApiTrack>) -> Vec<(Track, String)> {
    let total = items.len();
    let normalized: Vec<_> = items.into_iter().filter_map(ApiTrack::normalize).collect();
    if normalized.len() < total {
        debug!("Dropped {} upstream tracks without an id", total - normalized.len());
    }
    normalized
}

// --- strategy ---------------------------------------------------------------

/// Produces candidates for `seed` at `mood`, live when possible.
///
/// Never fails: a missing source or a failed call yields the mock list.
pub fn generate(
    seed: &Track,
    mood: &MoodVector,
    live: Option<&dyn RecommendationSource>,
) -> Vec<Candidate> {
    let mood = mood.clamped();

    let Some(source) = live else {
        debug!("No live source, synthesizing mock candidates for seed {}", seed.id);
        return mock::synthesize(seed, &mood);
    };

    match generate_live(source, seed, &mood) {
        Ok(candidates) => {
            info!("Live source returned {} candidates for seed {}", candidates.len(), seed.id);
            candidates
        }
        Err(e) => {
            warn!("Recommendation request for seed {} failed, using mock candidates: {e}", seed.id);
            mock::synthesize(seed, &mood)
        }
    }
}

/// The live branch on its own, with the failure kept as a value.
///
/// # Errors
///
/// Returns the source's [`TransportError`] unchanged.
pub fn generate_live(
    source: &dyn RecommendationSource,
    seed: &Track,
    mood: &MoodVector,
) -> Result<Vec<Candidate>, TransportError> {
    let request = RecommendationRequest::new(seed, mood);
    let items = source.recommend(&request)?;
    let reason = live_reason(seed);

    Ok(normalize_all(items)
        .into_iter()
        .map(|(track, album)| Candidate {
            track,
            album,
            reason: reason.clone(),
            estimate: None,
        })
        .collect())
}

/// Seed-track search with the same live-or-mock policy as [`generate`].
pub fn search_tracks(query: &str, live: Option<&dyn RecommendationSource>) -> Vec<Track> {
    if query.trim().is_empty() {
        return Vec::new();
    }

    let Some(source) = live else {
        return mock::search_mock(query);
    };

    match source.search(query) {
        Ok(items) => normalize_all(items).into_iter().map(|(track, _)| track).collect(),
        Err(e) => {
            warn!("Track search for {query:?} failed, using mock results: {e}");
            mock::search_mock(query)
        }
    }
}

// --- live client ------------------------------------------------------------

/// Blocking client for the streaming service's Web API.
#[derive(Debug, Clone)]
pub struct SpotifyClient {
    http: reqwest::blocking::Client,
    base_url: String,
    token: String,
}

impl SpotifyClient {
    /// # Errors
    ///
    /// Fails with [`TransportError::MissingToken`] for a blank token, or if the
    /// HTTP client cannot be built.
    pub fn new(
        base_url: impl Into<String>,
        token: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, TransportError> {
        let token = token.into();
        if token.trim().is_empty() {
            return Err(TransportError::MissingToken);
        }

        let http = reqwest::blocking::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token,
        })
    }

    fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&'static str, String)],
    ) -> Result<T, TransportError> {
        let url = format!("{}{path}", self.base_url);
        debug!("GET {url}");

        let response = self
            .http
            .get(&url)
            .bearer_auth(&self.token)
            .query(query)
            .send()?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(TransportError::Status {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json::<T>()
            .map_err(|e| TransportError::Decode(e.to_string()))
    }
}

impl RecommendationSource for SpotifyClient {
    fn recommend(&self, request: &RecommendationRequest) -> Result<Vec<ApiTrack>, TransportError> {
        let body: RecommendationsResponse =
            self.get("/v1/recommendations", &request.query_pairs())?;
        Ok(body.tracks.unwrap_or_default())
    }

    fn search(&self, query: &str) -> Result<Vec<ApiTrack>, TransportError> {
        let body: SearchResponse = self.get(
            "/v1/search",
            &[("q", query.to_string()), ("type", "track".to_string())],
        )?;
        Ok(body.tracks.and_then(|page| page.items).unwrap_or_default())
    }
}

/// Owns the optional live source and applies the fallback policy.
pub struct RecommendationGateway {
    live: Option<Box<dyn RecommendationSource>>,
}

impl RecommendationGateway {
    /// Gateway that always synthesizes.
    #[must_use]
    pub fn mock_only() -> Self {
        Self { live: None }
    }

    /// Gateway backed by an explicit source.
    #[must_use]
    pub fn with_source(source: Box<dyn RecommendationSource>) -> Self {
        Self { live: Some(source) }
    }

    /// Builds a live client only when an access token is configured.
    ///
    /// A client that cannot be constructed counts as absent.
    #[must_use]
    pub fn from_config(config: &RuntimeConfig) -> Self {
        let Some(token) = config.access_token.as_deref() else {
            info!("No access token configured, recommendations will be synthesized");
            return Self::mock_only();
        };

        match SpotifyClient::new(&config.api_base_url, token, config.timeout) {
            Ok(client) => Self::with_source(Box::new(client)),
            Err(e) => {
                warn!("Could not build recommendation client, falling back to mock: {e}");
                Self::mock_only()
            }
        }
    }

    #[must_use]
    pub fn has_live_client(&self) -> bool {
        self.live.is_some()
    }

    /// See [`generate`].
    #[must_use]
    pub fn generate(&self, seed: &Track, mood: &MoodVector) -> Vec<Candidate> {
        generate(seed, mood, self.live.as_deref())
    }

    /// See [`search_tracks`].
    #[must_use]
    pub fn search(&self, query: &str) -> Vec<Track> {
        search_tracks(query, self.live.as_deref())
    }
}
