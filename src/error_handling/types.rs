//! Error type definitions.
//!
//! This module defines all error types used throughout the application.

use std::time::Duration;

use log::SetLoggerError;
use strum_macros::EnumIter as EnumIterMacro;
use thiserror::Error;

/// Error types for initialization failures.
#[derive(Error, Debug)]
#[allow(clippy::enum_variant_names)] // All variants end with "Error" by convention
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),
}

/// Error types for database operations.
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Error creating the database file or its directory.
    #[error("Database file creation error: {0}")]
    FileCreationError(String),

    /// SQL execution error.
    #[error("SQL error: {0}")]
    SqlError(#[from] sqlx::Error),

    /// Schema migration error.
    #[error("Migration error: {0}")]
    MigrationError(#[from] sqlx::migrate::MigrateError),

    /// The sink refused the write.
    #[error("Write rejected: {0}")]
    WriteRejected(String),
}

/// Error types for reading the site and selector lists.
#[derive(Error, Debug)]
pub enum InputError {
    /// A list file could not be read.
    #[error("Failed to read {path}: {source}")]
    Io {
        /// File that failed
        path: String,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The top-sites CSV could not be parsed.
    #[error("Failed to parse top-sites CSV {path}: {source}")]
    Csv {
        /// File that failed
        path: String,
        /// Underlying CSV error
        #[source]
        source: csv::Error,
    },

    /// The background loading task failed.
    #[error("Site list loading task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    /// All sources were read but yielded nothing.
    #[error("{0} is empty")]
    Empty(&'static str),

    /// An earlier load of the site list failed; the sources are not re-read.
    #[error("site list unavailable after earlier failure: {0}")]
    Unavailable(String),
}

/// Why a single DNS probe produced no answer.
///
/// All of these count as "no record" for the domain; they are kept apart so
/// they can be counted and logged.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProbeFailure {
    /// The query did not complete within the per-probe timeout.
    #[error("DNS query timed out after {0:?}")]
    Timeout(Duration),

    /// The name exists but has no TXT records.
    #[error("no TXT records found")]
    NoRecords,

    /// The name does not exist.
    #[error("domain does not exist (NXDOMAIN)")]
    NxDomain,

    /// Network or resolver transport error.
    #[error("DNS transport error: {0}")]
    Transport(String),

    /// The query name or the resolver's response could not be processed.
    #[error("malformed DNS query or response: {0}")]
    Malformed(String),
}

impl ProbeFailure {
    /// Returns the kind of this failure, used as a statistics key.
    pub fn kind(&self) -> ProbeFailureKind {
        match self {
            ProbeFailure::Timeout(_) => ProbeFailureKind::Timeout,
            ProbeFailure::NoRecords => ProbeFailureKind::NoRecords,
            ProbeFailure::NxDomain => ProbeFailureKind::NxDomain,
            ProbeFailure::Transport(_) => ProbeFailureKind::Transport,
            ProbeFailure::Malformed(_) => ProbeFailureKind::Malformed,
        }
    }
}

/// Kinds of probe failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, EnumIterMacro)]
pub enum ProbeFailureKind {
    /// See `ProbeFailure::Timeout`
    Timeout,
    /// See `ProbeFailure::NoRecords`
    NoRecords,
    /// See `ProbeFailure::NxDomain`
    NxDomain,
    /// See `ProbeFailure::Transport`
    Transport,
    /// See `ProbeFailure::Malformed`
    Malformed,
}

impl std::fmt::Display for ProbeFailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ProbeFailureKind {
    /// Human-readable label used in logs and reports.
    pub fn as_str(&self) -> &'static str {
        match self {
            ProbeFailureKind::Timeout => "timeout",
            ProbeFailureKind::NoRecords => "no TXT records",
            ProbeFailureKind::NxDomain => "NXDOMAIN",
            ProbeFailureKind::Transport => "transport error",
            ProbeFailureKind::Malformed => "malformed query/response",
        }
    }
}
