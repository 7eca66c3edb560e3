//! Mood-driven mix generation and mix history.
//!
//! A listener picks a seed track, sets three mood dials (energy,
//! danceability, valence) and gets a list of candidate tracks. They like or
//! dislike candidates, and the liked ones can be saved as a *mix* for later
//! recall.
//!
//! Core modules:
//! - [`gateway`] - Candidate generation, live or synthesized
//! - [`mock`] - Deterministic candidate synthesis
//! - [`curation`] - Like/dislike state for one generation cycle
//! - [`db`] - Transactional mix persistence
//! - [`api`] - JSON request/response surface
//!
//! ### Supporting Modules
//!
//! - [`track`] - Track, mood and candidate types
//! - [`error`] - Typed errors
//! - [`config`] - Data directory and runtime settings
//! - [`cli`] - Command-line interface definitions
//! - [`completion`] - Shell completion generation
//!
//! ## Quick Start Example
//!
//! ```no_run
//! use moodmix::curation::CurationState;
//! use moodmix::db::{MixStore, NewMix};
//! use moodmix::gateway::RecommendationGateway;
//! use moodmix::track::{MoodVector, Track};
//!
//! let gateway = RecommendationGateway::mock_only();
//! let seed = Track::new("t1", "Song A", "Artist A");
//! let mood = MoodVector::new(0.8, 0.3, 0.6);
//!
//! let mut curation = CurationState::new(gateway.generate(&seed, &mood));
//! curation.toggle_like("g1");
//! curation.toggle_like("g3");
//!
//! let store = MixStore::open(&moodmix::config::get_db_path()?)?;
//! let songs = curation.liked_songs();
//! let mix_id = store.create(&NewMix {
//!     user_id: "u1",
//!     seed_track_id: &seed.id,
//!     seed_track_name: &seed.title,
//!     mood,
//!     songs: &songs,
//! })?;
//! println!("saved mix {mix_id} with {} songs", store.songs_for(mix_id)?.len());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Error Handling
//!
//! Library seams return typed errors from [`error`]. Generation never fails:
//! a failed live call is logged and replaced with synthesized candidates.
//! Configuration and the binary use `anyhow`.
//!
//! ## Logging
//!
//! Everything logs through the `log` facade. The binary installs
//! `env_logger`, so `RUST_LOG=moodmix=debug` shows gateway and store activity.

pub mod api;
pub mod cli;
pub mod completion;
pub mod config;
pub mod curation;
pub mod db;
pub mod error;
pub mod gateway;
pub mod mock;
pub mod track;
