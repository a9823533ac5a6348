use std::path::PathBuf;
use thiserror::Error;

use crate::state::data::EntryId;

/// A draft or entry that cannot enter the catalog.
///
/// Reported synchronously to whoever submitted it; the catalog is
/// left untouched.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvalidEntry {
    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("unknown category `{0}`")]
    UnknownCategory(String),

    #[error("thumbnail rejected: {0}")]
    Thumbnail(String),

    #[error("an entry with id {0} already exists")]
    DuplicateId(EntryId),
}

/// A modal session command that does not apply in the current mode
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("cannot {action} while the session is {state}")]
    InvalidTransition {
        action: &'static str,
        state: &'static str,
    },
}

/// A UI command that could not be applied; state is unchanged
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    #[error(transparent)]
    Entry(#[from] InvalidEntry),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error("no entry with id {0}")]
    UnknownEntry(EntryId),

    #[error("unknown category filter `{0}`")]
    UnknownCategory(String),

    #[error("{0}")]
    Blocked(&'static str),
}

/// Failure reading an image from disk at the UI boundary
#[derive(Error, Debug)]
pub enum ThumbnailError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{path} is {size} bytes, larger than the {limit} byte limit")]
    TooLarge { path: PathBuf, size: u64, limit: u64 },
}

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("export cancelled")]
    Cancelled,
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
