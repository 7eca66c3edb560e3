//! # Moodmix
//!
//! Command-line front end: search a seed, generate candidates, curate them,
//! save mixes and look them up again.
//!
//! ## Usage
//!
//! ```bash
//! moodmix search "weeknd"
//! moodmix generate --seed-id s1 --seed-name "Blinding Lights" --energy 0.8 --valence 0.6
//! moodmix mix --user me --seed-id s1 --seed-name "Blinding Lights" --like 0 --like 2
//! moodmix mixes me
//! moodmix songs 3
//! ```

use anyhow::{bail, Context, Result};
use clap::{CommandFactory, Parser};
use log::{debug, info};
use moodmix::api::{self, ApiResponse, SaveMixRequest, SongPayload};
use moodmix::cli::{self, Command, MoodArgs, SeedArgs};
use moodmix::completion;
use moodmix::config::{self, RuntimeConfig};
use moodmix::curation::CurationState;
use moodmix::db::MixStore;
use moodmix::gateway::RecommendationGateway;
use moodmix::track::{Candidate, Track};
use std::time::Duration;

/// Main entry point for the Moodmix application.
///
/// Initializes logging, parses command-line arguments, and routes commands.
///
/// # Logging
///
/// Controlled via `RUST_LOG`:
/// - `RUST_LOG=debug moodmix generate ...` - Enable debug logging
/// - `RUST_LOG=moodmix::gateway=trace moodmix mix ...` - Module-specific logging
fn main() -> Result<()> {
    env_logger::init();

    let args = cli::Args::parse();
    let runtime = runtime_config(&args)?;
    debug!("Runtime configuration: {runtime:?}");

    match args.command {
        Command::Search { query, json } => {
            let gateway = RecommendationGateway::from_config(&runtime);
            let tracks = gateway.search(&query);
            if json {
                println!("{}", serde_json::to_string_pretty(&tracks)?);
            } else if tracks.is_empty() {
                println!("No tracks found for {query:?}");
            } else {
                for track in &tracks {
                    println!("{:<24} {} - {}", track.id, track.title, track.artist);
                }
            }
        }
        Command::Generate { seed, mood, json } => {
            let gateway = RecommendationGateway::from_config(&runtime);
            let candidates = gateway.generate(&seed_track(&seed), &mood.mood());
            if json {
                println!("{}", serde_json::to_string_pretty(&candidates)?);
            } else {
                print_candidates(&candidates);
            }
        }
        Command::Mix {
            user,
            seed,
            mood,
            likes,
            json,
        } => {
            let gateway = RecommendationGateway::from_config(&runtime);
            let mut curation = CurationState::new(gateway.generate(&seed_track(&seed), &mood.mood()));

            for index in likes {
                if !curation.like_index(index) {
                    bail!(
                        "No candidate at index {index}; only {} were generated",
                        curation.candidates().len()
                    );
                }
            }

            let songs: Vec<SongPayload> = curation.liked_songs().iter().map(SongPayload::from).collect();
            info!("Saving {} liked songs for user {user}", songs.len());
            let store = open_store(&runtime)?;
            finish(api::save_mix(&store, save_request(user, &seed, mood, songs)), json)?;
        }
        Command::Save {
            user,
            seed,
            mood,
            songs,
            json,
        } => {
            let store = open_store(&runtime)?;
            finish(api::save_mix(&store, save_request(user, &seed, mood, songs)), json)?;
        }
        Command::Mixes { user, limit, json } => {
            let store = open_store(&runtime)?;
            if json {
                finish(api::list_mixes_limited(&store, &user, limit), true)?;
            } else {
                let mixes = store
                    .list_for_user(&user, limit)
                    .with_context(|| format!("Failed to load mixes for {user}"))?;
                if mixes.is_empty() {
                    println!("No mixes saved for {user}");
                }
                for mix in mixes {
                    println!(
                        "#{:<5} {} ({})  energy {:.2}  danceability {:.2}  valence {:.2}",
                        mix.id,
                        mix.seed_track_name,
                        mix.seed_track_id,
                        mix.mood.energy,
                        mix.mood.danceability,
                        mix.mood.valence
                    );
                }
            }
        }
        Command::Songs { mix_id, json } => {
            let store = open_store(&runtime)?;
            finish(api::list_songs(&store, &mix_id), json)?;
        }
        Command::Completion { shell } => {
            let mut cmd = cli::Args::command();
            completion::generate_completions(completion::shell_to_completion_shell(shell), &mut cmd);
        }
        Command::CompleteUsers => {
            completion::print_user_completions(&runtime.db_path)?;
        }
    }

    Ok(())
}

fn runtime_config(args: &cli::Args) -> Result<RuntimeConfig> {
    let db_path = match &args.db {
        Some(path) => path.clone(),
        None => config::get_db_path()?,
    };

    Ok(RuntimeConfig::with_db_path(db_path)
        .with_access_token(args.token.clone())
        .with_api_base_url(args.api_base.clone())
        .with_timeout(Duration::from_secs(args.timeout)))
}

fn open_store(runtime: &RuntimeConfig) -> Result<MixStore> {
    MixStore::open(&runtime.db_path)
        .with_context(|| format!("Failed to open mix database at {}", runtime.db_path.display()))
}

fn seed_track(seed: &SeedArgs) -> Track {
    Track::new(seed.seed_id.clone(), seed.seed_name.clone(), "")
}

fn save_request(user: String, seed: &SeedArgs, mood: MoodArgs, songs: Vec<SongPayload>) -> SaveMixRequest {
    let mood = mood.mood();
    SaveMixRequest {
        spotify_user_id: user,
        seed_track_id: seed.seed_id.clone(),
        seed_track_name: seed.seed_name.clone(),
        energy: mood.energy,
        danceability: mood.danceability,
        valence: mood.valence,
        songs,
    }
}

fn print_candidates(candidates: &[Candidate]) {
    for (index, candidate) in candidates.iter().enumerate() {
        let duration = candidate.duration_label();
        if duration.is_empty() {
            println!("{index:>2}. {} - {}", candidate.track.title, candidate.track.artist);
        } else {
            println!(
                "{index:>2}. {} - {} ({duration})",
                candidate.track.title, candidate.track.artist
            );
        }
        println!("    {}", candidate.reason);
    }
}

/// Prints a handler reply and turns failures into a non-zero exit.
fn finish((status, response): api::Reply, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(&response)?);
    } else {
        match &response {
            ApiResponse::Saved { mix_id, .. } => println!("Saved mix #{mix_id}"),
            ApiResponse::Mixes { mixes, .. } => {
                for mix in mixes {
                    println!("#{:<5} {} ({})", mix.id, mix.seed_track_name, mix.seed_track_id);
                }
            }
            ApiResponse::Songs { songs, .. } => {
                if songs.is_empty() {
                    println!("No songs");
                }
                for (index, song) in songs.iter().enumerate() {
                    println!("{:>2}. {} - {} [{}]", index + 1, song.title, song.artist, song.spotify_track_id);
                }
            }
            ApiResponse::Failed { .. } => {}
        }
    }

    if let ApiResponse::Failed { error, .. } = response {
        bail!("{error} (status {status})");
    }
    Ok(())
}
