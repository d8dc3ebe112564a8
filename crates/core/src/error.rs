//! Error types shared by every Pebble crate.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for Pebble operations.
pub type PebbleResult<T> = Result<T, PebbleError>;

/// Broad failure category, used by callers to decide how to report a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Missing or malformed project metadata, invalid input paths, locked project
    Precondition,
    /// Nothing to do (nothing staged, no earlier throw, no history)
    EmptyInput,
    /// The history is inconsistent or an invariant could not be upheld
    Integrity,
    /// Filesystem failure
    Io,
}

/// Errors that can occur in the snapshot engine.
#[derive(Debug, Error)]
pub enum PebbleError {
    /// The project root has no `.pebble` control directory
    #[error("not a pebble project: {} (no .pebble directory)", .0.display())]
    NotInitialized(PathBuf),

    /// The project root already has a control directory
    #[error("pebble project already initialized at {}", .0.display())]
    AlreadyInitialized(PathBuf),

    /// A required control document is missing
    #[error("missing control file: {}", .0.display())]
    MissingControlFile(PathBuf),

    /// A persisted document failed to parse or validate
    #[error("malformed {file}: {reason}")]
    MalformedDocument { file: String, reason: String },

    /// A path handed to the engine escapes the project root or is otherwise unusable
    #[error("invalid path '{path}': {reason}")]
    InvalidPath { path: String, reason: String },

    /// Another process holds the project lock
    #[error("project is locked by another pebble process ({})", .0.display())]
    Locked(PathBuf),

    /// Registry lookups
    #[error("project '{0}' is not registered")]
    UnknownProject(String),

    #[error("project '{0}' is already registered")]
    ProjectExists(String),

    #[error("invalid project name '{0}'")]
    InvalidProjectName(String),

    #[error("destination {} is not empty", .0.display())]
    DestinationNotEmpty(PathBuf),

    /// The staging state (or its fresh re-check) holds no changes
    #[error("no files are staged for commit")]
    NothingStaged,

    #[error("no previous throw to reset to")]
    NoPreviousThrow,

    #[error("project has no throws yet")]
    NoHistory,

    /// Zero or several roots, duplicate ids or a parent cycle
    #[error("malformed history: {0}")]
    MalformedHistory(String),

    /// The target throw is unknown or cannot be reached from the root
    #[error("broken chain: throw {0} is not reachable from the root throw")]
    BrokenChain(String),

    #[error("could not generate a unique throw id after {0} attempts")]
    IdSpaceExhausted(usize),

    /// IO error on a specific path
    #[error("failed to access {}: {source}", path.display())]
    Path {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// IO error without path context
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl PebbleError {
    /// Create a malformed document error.
    pub fn malformed(file: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        Self::MalformedDocument {
            file: file.into(),
            reason: reason.to_string(),
        }
    }

    /// Create an invalid path error.
    pub fn invalid_path(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidPath {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Attach a path to an IO error.
    pub fn at(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Path {
            path: path.into(),
            source,
        }
    }

    /// Category of this error.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::NotInitialized(_)
            | Self::AlreadyInitialized(_)
            | Self::MissingControlFile(_)
            | Self::MalformedDocument { .. }
            | Self::InvalidPath { .. }
            | Self::Locked(_)
            | Self::UnknownProject(_)
            | Self::ProjectExists(_)
            | Self::InvalidProjectName(_)
            | Self::DestinationNotEmpty(_) => ErrorCategory::Precondition,
            Self::NothingStaged | Self::NoPreviousThrow | Self::NoHistory => {
                ErrorCategory::EmptyInput
            }
            Self::MalformedHistory(_) | Self::BrokenChain(_) | Self::IdSpaceExhausted(_) => {
                ErrorCategory::Integrity
            }
            Self::Path { .. } | Self::Io(_) => ErrorCategory::Io,
        }
    }
}
