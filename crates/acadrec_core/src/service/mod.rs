//! Session-scoped use cases.
//!
//! # Responsibility
//! - Orchestrate access checks, validation and repository calls.
//! - Keep callers decoupled from the file format and role branching.
//!
//! # Invariants
//! - Every mutation checks the caller's capability before touching data.
//! - Every input is validated before any field changes.

use crate::access::AccessDenied;
use crate::model::validation::ValidationError;
use crate::repo::StoreError;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub mod auth;
pub mod consent;
pub mod coursework;
pub mod roster_service;

pub use auth::AuthError;

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Service error returned to the presentation layer as a notice.
#[derive(Debug)]
pub enum ServiceError {
    PermissionDenied(AccessDenied),
    Validation(ValidationError),
    /// No row with this id in the full table.
    RecordNotFound(i64),
    Store(StoreError),
    Auth(AuthError),
    /// Coursework or consent file I/O failure.
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl ServiceError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PermissionDenied(err) => write!(f, "{err}"),
            Self::Validation(err) => write!(f, "{err}"),
            Self::RecordNotFound(id) => write!(f, "record not found: {id}"),
            Self::Store(err) => write!(f, "{err}"),
            Self::Auth(err) => write!(f, "{err}"),
            Self::Io { path, source } => write!(f, "{}: {source}", path.display()),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::PermissionDenied(err) => Some(err),
            Self::Validation(err) => Some(err),
            Self::Store(err) => Some(err),
            Self::Auth(err) => Some(err),
            Self::Io { source, .. } => Some(source),
            Self::RecordNotFound(_) => None,
        }
    }
}

impl From<AccessDenied> for ServiceError {
    fn from(value: AccessDenied) -> Self {
        Self::PermissionDenied(value)
    }
}

impl From<ValidationError> for ServiceError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<StoreError> for ServiceError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

impl From<AuthError> for ServiceError {
    fn from(value: AuthError) -> Self {
        Self::Auth(value)
    }
}
