//! Repository layer: the flat-file roster store.
//!
//! # Responsibility
//! - Convert between the sectioned text file and the typed roster table.
//! - Isolate file I/O from service/business orchestration.
//!
//! # Invariants
//! - Load returns a complete table or an error, never a partial table.
//! - Save is durable only after the written file reloads successfully.

use crate::repo::roster_codec::CodecError;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub mod roster_codec;
pub mod roster_repo;

pub type StoreResult<T> = Result<T, StoreError>;

/// Store error for roster load/save operations.
#[derive(Debug)]
pub enum StoreError {
    /// Backing file does not exist.
    NotFound(PathBuf),
    /// The `[USUARIOS]` marker is absent.
    MissingSection { path: PathBuf },
    /// Malformed rows, strict-policy numeric failures or duplicate ids.
    Parse { path: PathBuf, source: CodecError },
    /// Nothing to save.
    EmptyTable,
    /// A new row reused an id already in the table.
    DuplicateId(i64),
    /// The largest id is `i64::MAX`; no id is left for a new row.
    IdsExhausted,
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    /// The file was written but could not be read back.
    ReloadFailed(Box<StoreError>),
}

impl StoreError {
    pub(crate) fn from_codec(path: PathBuf, err: CodecError) -> Self {
        match err {
            CodecError::MissingSection => Self::MissingSection { path },
            other => Self::Parse {
                path,
                source: other,
            },
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(path) => write!(f, "roster file not found: {}", path.display()),
            Self::MissingSection { path } => write!(
                f,
                "section {} not found in {}",
                roster_codec::SECTION_MARKER,
                path.display()
            ),
            Self::Parse { path, source } => {
                write!(f, "cannot read roster file {}: {source}", path.display())
            }
            Self::EmptyTable => write!(f, "roster is empty or not loaded; nothing to save"),
            Self::DuplicateId(id) => write!(f, "record id {id} is already in use"),
            Self::IdsExhausted => write!(f, "no free record id left"),
            Self::Io { path, source } => write!(f, "{}: {source}", path.display()),
            Self::ReloadFailed(err) => write!(f, "saved roster could not be reloaded: {err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Parse { source, .. } => Some(source),
            Self::Io { source, .. } => Some(source),
            Self::ReloadFailed(err) => Some(err.as_ref()),
            Self::NotFound(_)
            | Self::MissingSection { .. }
            | Self::EmptyTable
            | Self::DuplicateId(_)
            | Self::IdsExhausted => None,
        }
    }
}
