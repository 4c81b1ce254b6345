use std::{fmt::Display, io, path::PathBuf};

use thiserror::Error;

use crate::user::UserId;

/// Which party of a request could not be found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Subject {
    /// The user making the request, identified by id.
    Requester,

    /// The user the requester wants to connect with, identified by name.
    Target,
}

impl Display for Subject {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Subject::Requester => write!(f, "requester"),
            Subject::Target => write!(f, "target"),
        }
    }
}

/// Errors the directory may answer a request with.
#[derive(Debug, Error)]
pub enum Error {
    /// A required field was missing or the request body was not understood.
    #[error("{0}")]
    Validation(String),

    /// Another user already has this name.
    #[error("The name `{0}` is already taken")]
    DuplicateName(String),

    /// A user referenced by the request does not exist.
    #[error("The {subject} `{key}` was not found")]
    NotFound {
        /// Which user was missing.
        subject: Subject,

        /// The id or name that did not resolve.
        key: String,
    },

    /// The user is not allowed to do this.
    #[error("The user `{0}` is not an admin")]
    Unauthorized(String),

    /// Storage failed.
    #[error("Storage problem")]
    Storage(#[source] StoreError),
}

impl Error {
    pub(crate) fn requester_not_found(key: impl Into<String>) -> Self {
        Self::NotFound {
            subject: Subject::Requester,
            key: key.into(),
        }
    }

    pub(crate) fn target_not_found(key: impl Into<String>) -> Self {
        Self::NotFound {
            subject: Subject::Target,
            key: key.into(),
        }
    }

    /// The subject which was not found, if this is a not found error.
    pub fn not_found_subject(&self) -> Option<Subject> {
        if let Self::NotFound { subject, .. } = self {
            Some(*subject)
        } else {
            None
        }
    }
}

impl From<StoreError> for Error {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::DuplicateName(name) => Self::DuplicateName(name),
            other => Self::Storage(other),
        }
    }
}

/// Errors raised by user storage.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The unique name constraint was violated.
    #[error("Duplicate name `{0}`")]
    DuplicateName(String),

    /// Tried to save a user which was never created.
    #[error("No stored user has the id `{0}`")]
    UnknownUser(UserId),

    /// The snapshot file breaks the store's guarantees.
    #[error("Snapshot is not usable: {0}")]
    CorruptSnapshot(String),

    /// Reading or writing the snapshot file failed.
    #[error("Underlying IO problem")]
    Io(#[from] io::Error),

    /// The snapshot file could not be parsed.
    #[error("Snapshot could not be decoded")]
    Decode(#[from] ron::error::SpannedError),

    /// The snapshot could not be produced.
    #[error("Snapshot could not be encoded")]
    Encode(#[from] ron::Error),
}

/// Errors which stop the server from starting, or make it stop.
#[derive(Debug, Error)]
pub enum StartupError {
    /// The configuration is not usable.
    #[error("Bad configuration: {0}")]
    BadConfig(String),

    /// The configuration file could not be read.
    #[error("Could not read the configuration file {path:?}")]
    ReadConfig {
        /// Where we looked.
        path: PathBuf,

        /// Why it failed.
        #[source]
        source: io::Error,
    },

    /// The configuration file is not valid RON.
    #[error("Could not parse the configuration")]
    ParseConfig(#[from] ron::error::SpannedError),

    /// Log files can't be written where asked.
    #[error("Could not set up logging to file")]
    Logging(#[from] tracing_appender::rolling::InitError),

    /// Opening the user store failed.
    #[error("Could not open the user store")]
    Store(#[from] StoreError),

    /// The HTTP server failed.
    #[error("Server error: {0}")]
    Serve(String),
}

impl StartupError {
    /// Get the message of a bad config error.
    pub fn try_into_bad_config(self) -> Result<String, Self> {
        if let Self::BadConfig(v) = self {
            Ok(v)
        } else {
            Err(self)
        }
    }
}
