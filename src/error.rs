//! Error taxonomy for the library seams.
//!
//! - [`ValidationError`]: bad input, rejected before anything touches the store.
//! - [`MixError`]: what [`crate::db::MixStore`] returns.
//! - [`TransportError`]: a live recommendation call failed. The gateway recovers
//!   from these locally, so they only ever show up in logs.

use std::path::PathBuf;
use thiserror::Error;

/// Input rejected before any persistence attempt.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("required field `{0}` is empty")]
    EmptyField(&'static str),

    #[error("a mix needs at least one song")]
    NoSongs,

    #[error("song at position {0} has no track id")]
    SongMissingId(usize),

    #[error("mood axis `{0}` is outside [0, 1]")]
    MoodOutOfRange(&'static str),
}

/// Failure of a [`crate::db::MixStore`] operation.
#[derive(Debug, Error)]
pub enum MixError {
    #[error("invalid mix: {0}")]
    Validation(#[from] ValidationError),

    #[error("mix store failure: {0}")]
    Persistence(#[from] rusqlite::Error),

    #[error("could not create database directory {}: {source}", .path.display())]
    Directory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl MixError {
    /// Stable machine-readable code.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            MixError::Validation(_) => "validation_error",
            MixError::Persistence(_) | MixError::Directory { .. } => "persistence_error",
        }
    }

    /// HTTP-equivalent status class: 4xx for caller mistakes, 5xx otherwise.
    #[must_use]
    pub fn status(&self) -> u16 {
        match self {
            MixError::Validation(_) => 400,
            MixError::Persistence(_) | MixError::Directory { .. } => 500,
        }
    }
}

/// Failure of a single call to the live recommendation source.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("no access token configured")]
    MissingToken,

    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("upstream answered {status}: {body}")]
    Status { status: u16, body: String },

    #[error("could not decode upstream payload: {0}")]
    Decode(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_stable() {
        let validation = MixError::from(ValidationError::NoSongs);
        assert_eq!(validation.code(), "validation_error");
        assert_eq!(validation.status(), 400);

        let persistence = MixError::from(rusqlite::Error::InvalidQuery);
        assert_eq!(persistence.code(), "persistence_error");
        assert_eq!(persistence.status(), 500);
    }

    #[test]
    fn test_directory_failure_is_a_server_error() {
        let err = MixError::Directory {
            path: PathBuf::from("/data/moodmix"),
            source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
        };
        assert_eq!(err.code(), "persistence_error");
        assert_eq!(err.status(), 500);
        assert!(err.to_string().contains("/data/moodmix"));
    }

    #[test]
    fn test_validation_messages_name_the_field() {
        let err = ValidationError::EmptyField("seed_track_id");
        assert!(err.to_string().contains("seed_track_id"));
        assert!(ValidationError::SongMissingId(3).to_string().contains('3'));
    }
}
