//! # Shell Completion Module
//!
//! Static completion scripts via `clap_complete`, plus a dynamic list of user
//! ids (taken from saved mixes) for the `mixes` command.
//!
//! ```bash
//! moodmix completion bash > ~/.local/share/bash-completion/completions/moodmix
//! moodmix completion zsh > ~/.config/zsh/completions/_moodmix
//! ```

use crate::cli::Shell;
use crate::db::MixStore;
use anyhow::Result;
use clap::Command;
use clap_complete::{generate, Generator, Shell as CompletionShell};
use std::io;
use std::path::Path;

/// Generate shell completions for the given shell
pub fn generate_completions<G: Generator>(gen: G, cmd: &mut Command) {
    generate(gen, cmd, cmd.get_name().to_string(), &mut io::stdout());
}

/// Convert our Shell enum to clap_complete's Shell enum
#[must_use]
pub fn shell_to_completion_shell(shell: Shell) -> CompletionShell {
    match shell {
        Shell::Bash => CompletionShell::Bash,
        Shell::Zsh => CompletionShell::Zsh,
        Shell::Fish => CompletionShell::Fish,
        Shell::PowerShell => CompletionShell::PowerShell,
        Shell::Elvish => CompletionShell::Elvish,
    }
}

/// User ids with saved mixes. Empty if the database is missing or unreadable,
/// since completion must never fail loudly.
#[must_use]
pub fn get_user_completions(db_path: &Path) -> Vec<String> {
    if !db_path.exists() {
        return Vec::new();
    }

    MixStore::open(db_path)
        .and_then(|store| store.user_ids())
        .unwrap_or_default()
}

/// Print user ids one per line, quoting those with whitespace
pub fn print_user_completions(db_path: &Path) -> Result<()> {
    for user in get_user_completions(db_path) {
        if user.contains(char::is_whitespace) {
            println!("\"{}\"", user.replace('"', "\\\""));
        } else {
            println!("{user}");
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::NewMix;
    use crate::track::{MoodVector, Track};

    #[test]
    fn test_shell_conversion() {
        assert_eq!(shell_to_completion_shell(Shell::Bash), CompletionShell::Bash);
        assert_eq!(shell_to_completion_shell(Shell::Zsh), CompletionShell::Zsh);
    }

    #[test]
    fn test_missing_database_completes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        assert!(get_user_completions(&dir.path().join("absent.db")).is_empty());
    }

    #[test]
    fn test_user_completions_from_saved_mixes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mixes.db");
        let store = MixStore::open(&path).unwrap();
        let songs = [Track::new("a", "A", "X")];
        store
            .create(&NewMix {
                user_id: "listener",
                seed_track_id: "t1",
                seed_track_name: "Song A",
                mood: MoodVector::default(),
                songs: &songs,
            })
            .unwrap();
        drop(store);

        assert_eq!(get_user_completions(&path), ["listener"]);
    }
}
