//! # Mix Store
//!
//! SQLite persistence for finalized mixes.
//!
//! ## Schema
//!
//! ```text
//! mixes     (id, spotify_user_id, seed_track_id, seed_track_name,
//!            energy, danceability, valence, created)
//! mix_songs (id, mix_id → mixes.id, spotify_track_id, title, artist)
//! ```
//!
//! A mix header never exists without its songs: [`MixStore::create`] validates
//! first, then writes the header and every song row inside one `IMMEDIATE`
//! transaction. Any failure rolls the whole thing back.
//!
//! Reads take the same connection lock but no transaction; a mix becomes
//! visible once its transaction commits.

use crate::error::{MixError, ValidationError};
use crate::track::{MoodVector, Track};
use log::{debug, error, info};
use rusqlite::{params, Connection, OptionalExtension, TransactionBehavior};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

/// Default page size of [`MixStore::list_for_user`].
pub const DEFAULT_LIST_LIMIT: usize = 10;

const SCHEMA: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS mixes (
        id              INTEGER PRIMARY KEY AUTOINCREMENT,
        spotify_user_id TEXT    NOT NULL,
        seed_track_id   TEXT    NOT NULL,
        seed_track_name TEXT    NOT NULL,
        energy          REAL    NOT NULL,
        danceability    REAL    NOT NULL,
        valence         REAL    NOT NULL,
        created         INTEGER DEFAULT (cast(strftime('%s','now') as int))
    )",
    "CREATE TABLE IF NOT EXISTS mix_songs (
        id               INTEGER PRIMARY KEY AUTOINCREMENT,
        mix_id           INTEGER NOT NULL,
        spotify_track_id TEXT    NOT NULL,
        title            TEXT    NOT NULL,
        artist           TEXT    NOT NULL,
        FOREIGN KEY (mix_id) REFERENCES mixes(id) ON DELETE CASCADE
    )",
    "CREATE INDEX IF NOT EXISTS idx_mixes_user ON mixes(spotify_user_id)",
    "CREATE INDEX IF NOT EXISTS idx_mix_songs_mix ON mix_songs(mix_id)",
];

/// Persisted mix header.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mix {
    pub id: i64,
    pub user_id: String,
    pub seed_track_id: String,
    pub seed_track_name: String,
    pub mood: MoodVector,
    /// Unix seconds.
    pub created: Option<i64>,
}

/// Persisted song row of a mix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MixSong {
    pub id: i64,
    pub mix_id: i64,
    pub track_id: String,
    pub title: String,
    pub artist: String,
}

/// Everything needed to create a mix.
#[derive(Debug, Clone, Copy)]
pub struct NewMix<'a> {
    pub user_id: &'a str,
    pub seed_track_id: &'a str,
    pub seed_track_name: &'a str,
    pub mood: MoodVector,
    pub songs: &'a [Track],
}

impl NewMix<'_> {
    /// Checks every constraint before anything is written.
    ///
    /// # Errors
    ///
    /// Returns the first violated constraint.
    pub fn validate(&self) -> Result<(), ValidationError> {
        for (field, value) in [
            ("spotify_user_id", self.user_id),
            ("seed_track_id", self.seed_track_id),
            ("seed_track_name", self.seed_track_name),
        ] {
            if value.trim().is_empty() {
                return Err(ValidationError::EmptyField(field));
            }
        }

        if self.songs.is_empty() {
            return Err(ValidationError::NoSongs);
        }

        if let Some(position) = self.songs.iter().position(|s| s.id.trim().is_empty()) {
            return Err(ValidationError::SongMissingId(position));
        }

        for (axis, value) in [
            ("energy", self.mood.energy),
            ("danceability", self.mood.danceability),
            ("valence", self.mood.valence),
        ] {
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(ValidationError::MoodOutOfRange(axis));
            }
        }

        Ok(())
    }
}

/// Mix persistence over one SQLite connection.
#[derive(Debug)]
pub struct MixStore {
    conn: Mutex<Connection>,
}

impl MixStore {
    /// Opens (or creates) the database at `path` and ensures the schema.
    ///
    /// # Errors
    ///
    /// Fails with [`MixError::Directory`] if the parent directory cannot be
    /// created, otherwise if the file cannot be opened or the schema cannot be created.
    pub fn open(path: &Path) -> Result<Self, MixError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|source| {
                error!("Could not create database directory {}: {source}", parent.display());
                MixError::Directory {
                    path: parent.to_path_buf(),
                    source,
                }
            })?;
        }

        debug!("Opening mix store at {}", path.display());
        Self::from_connection(Connection::open(path)?)
    }

    /// Private in-memory store. Handy for tests.
    ///
    /// # Errors
    ///
    /// Fails if the schema cannot be created.
    pub fn open_in_memory() -> Result<Self, MixError> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self, MixError> {
        conn.execute("PRAGMA foreign_keys = ON", [])?;
        for statement in SCHEMA {
            conn.execute(statement, [])?;
        }

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> MutexGuard<'_, Connection> {
        // A panic mid-transaction drops the transaction, which rolls back.
        self.conn.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    /// Persists a mix header and its songs atomically. Returns the new mix id.
    ///
    /// # Errors
    ///
    /// [`MixError::Validation`] if the input breaks a constraint (nothing is
    /// written); [`MixError::Persistence`] if SQLite fails (everything is rolled back).
    pub fn create(&self, mix: &NewMix<'_>) -> Result<i64, MixError> {
        mix.validate()?;

        let mut conn = self.lock();
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        tx.execute(
            "INSERT INTO mixes
                (spotify_user_id, seed_track_id, seed_track_name, energy, danceability, valence)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                mix.user_id,
                mix.seed_track_id,
                mix.seed_track_name,
                mix.mood.energy,
                mix.mood.danceability,
                mix.mood.valence,
            ],
        )?;
        let mix_id = tx.last_insert_rowid();

        {
            let mut stmt = tx.prepare(
                "INSERT INTO mix_songs (mix_id, spotify_track_id, title, artist)
                 VALUES (?1, ?2, ?3, ?4)",
            )?;

            for song in mix.songs {
                stmt.execute(params![mix_id, song.id, song.title, song.artist])?;
            }
        }

        // Dropping `tx` on any `?` above rolls back.
        tx.commit()?;

        info!(
            "Saved mix {mix_id} for user {} with {} songs",
            mix.user_id,
            mix.songs.len()
        );
        Ok(mix_id)
    }

    /// Most recent mixes of `user_id` first, at most `limit`.
    ///
    /// # Errors
    ///
    /// Fails on SQLite errors.
    pub fn list_for_user(&self, user_id: &str, limit: usize) -> Result<Vec<Mix>, MixError> {
        let conn = self.lock();
        let mut stmt = conn.prepare(
            "SELECT id, spotify_user_id, seed_track_id, seed_track_name,
                    energy, danceability, valence, created
             FROM mixes
             WHERE spotify_user_id = ?1
             ORDER BY id DESC
             LIMIT ?2",
        )?;

        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let mixes = stmt
            .query_map(params![user_id, limit], row_to_mix)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(mixes)
    }

    /// Songs of `mix_id` in insertion order.
    ///
    /// An unknown id yields an empty list rather than an error.
    ///
    /// # Errors
    ///
    /// Fails on SQLite errors.
    pub fn songs_for(&self, mix_id: i64) -> Result<Vec<MixSong>, MixError> {
        let conn = self.lock();
        let mut stmt = conn.prepare(
            "SELECT id, mix_id, spotify_track_id, title, artist
             FROM mix_songs
             WHERE mix_id = ?1
             ORDER BY id ASC",
        )?;

        let songs = stmt
            .query_map([mix_id], |row| {
                Ok(MixSong {
                    id: row.get(0)?,
                    mix_id: row.get(1)?,
                    track_id: row.get(2)?,
                    title: row.get(3)?,
                    artist: row.get(4)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(songs)
    }

    /// Single mix header by id.
    ///
    /// # Errors
    ///
    /// Fails on SQLite errors.
    pub fn mix(&self, mix_id: i64) -> Result<Option<Mix>, MixError> {
        let conn = self.lock();
        let mix = conn
            .query_row(
                "SELECT id, spotify_user_id, seed_track_id, seed_track_name,
                        energy, danceability, valence, created
                 FROM mixes WHERE id = ?1",
                [mix_id],
                row_to_mix,
            )
            .optional()?;
        Ok(mix)
    }

    /// Distinct user ids that own at least one mix, sorted.
    ///
    /// # Errors
    ///
    /// Fails on SQLite errors.
    pub fn user_ids(&self) -> Result<Vec<String>, MixError> {
        let conn = self.lock();
        let mut stmt =
            conn.prepare("SELECT DISTINCT spotify_user_id FROM mixes ORDER BY spotify_user_id")?;
        let ids = stmt
            .query_map([], |row| row.get(0))?
            .collect::<Result<Vec<String>, _>>()?;
        Ok(ids)
    }
}

fn row_to_mix(row: &rusqlite::Row<'_>) -> rusqlite::Result<Mix> {
    Ok(Mix {
        id: row.get(0)?,
        user_id: row.get(1)?,
        seed_track_id: row.get(2)?,
        seed_track_name: row.get(3)?,
        mood: MoodVector {
            energy: row.get(4)?,
            danceability: row.get(5)?,
            valence: row.get(6)?,
        },
        created: row.get(7)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn songs(n: usize) -> Vec<Track> {
        (1..=n)
            .map(|i| Track::new(format!("sp{i}"), format!("Song {i}"), format!("Artist {i}")))
            .collect()
    }

    fn new_mix<'a>(user: &'a str, songs: &'a [Track]) -> NewMix<'a> {
        NewMix {
            user_id: user,
            seed_track_id: "t1",
            seed_track_name: "Song A",
            mood: MoodVector::new(0.8, 0.3, 0.6),
            songs,
        }
    }

    fn count(store: &MixStore, table: &str) -> i64 {
        store
            .lock()
            .query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| row.get(0))
            .unwrap()
    }

    #[test]
    fn test_create_persists_header_and_songs_in_order() {
        let store = MixStore::open_in_memory().unwrap();
        let submitted = songs(4);

        let mix_id = store.create(&new_mix("u1", &submitted)).unwrap();

        assert_eq!(count(&store, "mixes"), 1);
        assert_eq!(count(&store, "mix_songs"), 4);

        let stored: Vec<String> = store
            .songs_for(mix_id)
            .unwrap()
            .into_iter()
            .map(|s| s.track_id)
            .collect();
        assert_eq!(stored, ["sp1", "sp2", "sp3", "sp4"]);

        let header = store.mix(mix_id).unwrap().expect("mix exists");
        assert_eq!(header.user_id, "u1");
        assert_eq!(header.mood, MoodVector::new(0.8, 0.3, 0.6));
        assert!(header.created.is_some());
    }

    #[test]
    fn test_empty_song_list_is_rejected_without_writes() {
        let store = MixStore::open_in_memory().unwrap();

        let err = store.create(&new_mix("u1", &[])).unwrap_err();

        assert!(matches!(err, MixError::Validation(ValidationError::NoSongs)));
        assert_eq!(count(&store, "mixes"), 0);
        assert_eq!(count(&store, "mix_songs"), 0);
    }

    #[test]
    fn test_blank_required_fields_are_rejected() {
        let store = MixStore::open_in_memory().unwrap();
        let submitted = songs(1);

        let mut mix = new_mix(" ", &submitted);
        assert!(matches!(
            store.create(&mix),
            Err(MixError::Validation(ValidationError::EmptyField("spotify_user_id")))
        ));

        mix.user_id = "u1";
        mix.seed_track_name = "";
        assert!(matches!(
            store.create(&mix),
            Err(MixError::Validation(ValidationError::EmptyField("seed_track_name")))
        ));
        assert_eq!(count(&store, "mixes"), 0);
    }

    #[test]
    fn test_song_without_id_is_rejected() {
        let store = MixStore::open_in_memory().unwrap();
        let mut submitted = songs(3);
        submitted[1].id.clear();

        let err = store.create(&new_mix("u1", &submitted)).unwrap_err();
        assert!(matches!(err, MixError::Validation(ValidationError::SongMissingId(1))));
        assert_eq!(count(&store, "mix_songs"), 0);
    }

    #[test]
    fn test_unclamped_mood_is_rejected() {
        let store = MixStore::open_in_memory().unwrap();
        let submitted = songs(1);
        let mut mix = new_mix("u1", &submitted);
        mix.mood.valence = 1.5;

        let err = store.create(&mix).unwrap_err();
        assert!(matches!(err, MixError::Validation(ValidationError::MoodOutOfRange("valence"))));
    }

    #[test]
    fn test_failure_mid_songs_rolls_back_everything() {
        let store = MixStore::open_in_memory().unwrap();
        store
            .lock()
            .execute_batch(
                "CREATE TRIGGER fail_third BEFORE INSERT ON mix_songs
                 WHEN NEW.spotify_track_id = 'sp3'
                 BEGIN SELECT RAISE(ABORT, 'simulated failure'); END;",
            )
            .unwrap();

        let err = store.create(&new_mix("u1", &songs(5))).unwrap_err();

        assert!(matches!(err, MixError::Persistence(_)));
        assert_eq!(err.code(), "persistence_error");
        assert_eq!(count(&store, "mixes"), 0);
        assert_eq!(count(&store, "mix_songs"), 0);

        // The store stays usable afterwards.
        let ok = store.create(&new_mix("u1", &songs(2))).unwrap();
        assert_eq!(store.songs_for(ok).unwrap().len(), 2);
    }

    #[test]
    fn test_list_for_user_is_recent_first_and_limited() {
        let store = MixStore::open_in_memory().unwrap();
        let submitted = songs(1);

        let mut ids = Vec::new();
        for _ in 0..12 {
            ids.push(store.create(&new_mix("u1", &submitted)).unwrap());
        }
        store.create(&new_mix("someone-else", &submitted)).unwrap();

        let listed = store.list_for_user("u1", DEFAULT_LIST_LIMIT).unwrap();
        assert_eq!(listed.len(), 10);

        let listed_ids: Vec<i64> = listed.iter().map(|m| m.id).collect();
        let expected: Vec<i64> = ids.iter().rev().take(10).copied().collect();
        assert_eq!(listed_ids, expected);
        assert!(listed_ids.windows(2).all(|w| w[0] > w[1]));
        assert!(listed.iter().all(|m| m.user_id == "u1"));
    }

    #[test]
    fn test_unknown_mix_has_no_songs() {
        // Documented contract: a missing mix reads as an empty song list.
        let store = MixStore::open_in_memory().unwrap();
        assert!(store.songs_for(999).unwrap().is_empty());
        assert!(store.mix(999).unwrap().is_none());
    }

    #[test]
    fn test_open_reports_unusable_directory() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("not-a-dir");
        std::fs::write(&blocker, b"file").unwrap();

        let err = MixStore::open(&blocker.join("nested").join("mixes.db")).unwrap_err();

        match &err {
            MixError::Directory { path, .. } => assert_eq!(path, &blocker.join("nested")),
            other => panic!("expected a directory error, got {other:?}"),
        }
        assert_eq!(err.status(), 500);
        assert!(err.to_string().contains("nested"));
    }

    #[test]
    fn test_user_ids_are_distinct() {
        let store = MixStore::open_in_memory().unwrap();
        let submitted = songs(1);
        store.create(&new_mix("bob", &submitted)).unwrap();
        store.create(&new_mix("alice", &submitted)).unwrap();
        store.create(&new_mix("bob", &submitted)).unwrap();

        assert_eq!(store.user_ids().unwrap(), ["alice", "bob"]);
    }
}
