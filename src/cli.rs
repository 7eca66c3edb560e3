//! # Command-Line Interface Module
//!
//! Clap derive definitions for the `moodmix` binary.
//!
//! ## Commands
//!
//! - `search`: find a seed track
//! - `generate`: propose candidates for a seed and mood
//! - `mix`: generate, like candidates by index, and save the result in one go
//! - `save`: save an explicit song list as a mix
//! - `mixes`: list a user's recent mixes
//! - `songs`: list the songs of one mix
//!
//! ## Examples
//!
//! ```bash
//! moodmix search "blinding"
//! moodmix generate --seed-id s1 --seed-name "Blinding Lights" --energy 0.8
//! moodmix mix --user me --seed-id s1 --seed-name "Blinding Lights" --like 0 --like 2
//! moodmix mixes me
//! ```

use crate::api::SongPayload;
use crate::db::DEFAULT_LIST_LIMIT;
use crate::track::MoodVector;
use clap::{Args as ClapArgs, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Shell types supported for completion generation
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug)]
#[allow(clippy::enum_variant_names)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

/// Main application arguments.
#[derive(Parser, Debug)]
#[command(name = "moodmix")]
#[command(about = "Moodmix: seed a track, tune the mood, curate and keep the mix")]
#[command(version)]
pub struct Args {
    /// Mix database file (defaults to the platform data directory)
    #[arg(long, global = true, env = "MOODMIX_DB", value_hint = clap::ValueHint::FilePath)]
    pub db: Option<PathBuf>,

    /// Access token for live recommendations; without one, results are synthesized
    #[arg(long, global = true, env = "SPOTIFY_ACCESS_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Web API root
    #[arg(long, global = true, env = "MOODMIX_API_BASE", default_value = crate::config::DEFAULT_API_BASE_URL)]
    pub api_base: String,

    /// Timeout of the live request, in seconds
    #[arg(long, global = true, default_value = "10")]
    pub timeout: u64,

    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

/// The three mood dials. Out-of-range values are clamped.
#[derive(ClapArgs, Debug, Clone, Copy)]
pub struct MoodArgs {
    /// Target energy, 0.0 to 1.0
    #[arg(long, default_value = "0.5", allow_negative_numbers = true)]
    pub energy: f64,

    /// Target danceability, 0.0 to 1.0
    #[arg(long, default_value = "0.5", allow_negative_numbers = true)]
    pub danceability: f64,

    /// Target valence (musical positiveness), 0.0 to 1.0
    #[arg(long, default_value = "0.5", allow_negative_numbers = true)]
    pub valence: f64,
}

impl MoodArgs {
    #[must_use]
    pub fn mood(&self) -> MoodVector {
        MoodVector::new(self.energy, self.danceability, self.valence)
    }
}

/// The seed track a generation is based on.
#[derive(ClapArgs, Debug, Clone)]
pub struct SeedArgs {
    /// Seed track id
    #[arg(long)]
    pub seed_id: String,

    /// Seed track display name
    #[arg(long)]
    pub seed_name: String,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Search for a seed track
    Search {
        /// Title or artist to look for
        query: String,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Generate candidate tracks for a seed and mood
    Generate {
        #[command(flatten)]
        seed: SeedArgs,

        #[command(flatten)]
        mood: MoodArgs,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Generate candidates, like some by index, and save them as a mix
    ///
    /// Indices refer to the order printed by `generate`. Likes are kept in the
    /// order given.
    Mix {
        /// Owner of the mix
        #[arg(long)]
        user: String,

        #[command(flatten)]
        seed: SeedArgs,

        #[command(flatten)]
        mood: MoodArgs,

        /// Candidate index to like (repeat for more)
        #[arg(long = "like", value_name = "INDEX", required = true)]
        likes: Vec<usize>,

        /// Print JSON instead of a summary
        #[arg(long)]
        json: bool,
    },

    /// Save an explicit list of songs as a mix
    Save {
        /// Owner of the mix
        #[arg(long)]
        user: String,

        #[command(flatten)]
        seed: SeedArgs,

        #[command(flatten)]
        mood: MoodArgs,

        /// Song as `id:title:artist` (repeat for more, kept in order)
        #[arg(long = "song", value_name = "ID:TITLE:ARTIST", value_parser = parse_song)]
        songs: Vec<SongPayload>,

        /// Print JSON instead of a summary
        #[arg(long)]
        json: bool,
    },

    /// List the most recent mixes of a user
    Mixes {
        /// Owner of the mixes
        #[arg(value_hint = clap::ValueHint::Other)]
        user: String,

        /// Maximum number of mixes
        #[arg(long, default_value_t = DEFAULT_LIST_LIMIT)]
        limit: usize,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// List the songs of a saved mix
    Songs {
        /// Mix id
        mix_id: String,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Generate shell completions
    ///
    /// Usage: moodmix completion bash > ~/.local/share/bash-completion/completions/moodmix
    Completion {
        /// Shell to generate completions for
        shell: Shell,
    },

    /// List known user ids for completion (hidden command)
    #[command(hide = true)]
    CompleteUsers,
}

/// Parses `id:title:artist`. Title and artist may be empty; the id may not.
///
/// # Errors
///
/// Returns a message for clap when the id is missing.
pub fn parse_song(raw: &str) -> Result<SongPayload, String> {
    let mut parts = raw.splitn(3, ':');
    let id = parts.next().unwrap_or_default().trim();
    if id.is_empty() {
        return Err(format!("song `{raw}` has no id, expected ID:TITLE:ARTIST"));
    }

    Ok(SongPayload {
        id: id.to_string(),
        title: parts.next().unwrap_or_default().trim().to_string(),
        artist: parts.next().unwrap_or_default().trim().to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_parse_song() {
        let song = parse_song("sp1:Midnight Dreams:Luna Wave").unwrap();
        assert_eq!(song.id, "sp1");
        assert_eq!(song.title, "Midnight Dreams");
        assert_eq!(song.artist, "Luna Wave");

        let bare = parse_song("sp2").unwrap();
        assert_eq!(bare.title, "");

        let colons = parse_song("sp3:A: B:C").unwrap();
        assert_eq!(colons.title, "A");
        assert_eq!(colons.artist, "B:C");

        assert!(parse_song(":title:artist").is_err());
    }

    #[test]
    fn test_mix_command_parses_likes_in_order() {
        let args = Args::try_parse_from([
            "moodmix", "mix", "--user", "u1", "--seed-id", "t1", "--seed-name", "Song A",
            "--energy", "0.8", "--like", "2", "--like", "0",
        ])
        .unwrap();

        match args.command {
            Command::Mix { likes, mood, .. } => {
                assert_eq!(likes, [2, 0]);
                assert_eq!(mood.mood().energy, 0.8);
                assert_eq!(mood.mood().valence, 0.5);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_mood_args_clamp() {
        let args = Args::try_parse_from([
            "moodmix", "generate", "--seed-id", "t1", "--seed-name", "A", "--energy", "-3",
        ])
        .unwrap();

        let Command::Generate { mood, .. } = args.command else {
            panic!("expected generate");
        };
        assert_eq!(mood.mood().energy, 0.0);
    }
}
