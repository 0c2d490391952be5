//! Login against the resident roster.
//!
//! # Invariants
//! - Passwords are compared verbatim and never logged.
//! - Only the four person roles can open a session.

use crate::access::Session;
use crate::model::column::Column;
use crate::model::record::Role;
use crate::model::table::RosterTable;
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

const LOGIN_COLUMNS: [Column; 4] = [Column::Name, Column::Email, Column::Password, Column::Role];

/// Login failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Roster is empty or failed to load.
    RosterUnavailable,
    /// Roster lacks one of the login columns.
    MissingColumns(Vec<Column>),
    UserNotFound,
    WrongPassword,
    /// Matched row is a class placeholder or has an unknown role.
    RoleNotPermitted(String),
}

impl Display for AuthError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::RosterUnavailable => write!(f, "user data could not be loaded"),
            Self::MissingColumns(columns) => {
                let names: Vec<&str> = columns.iter().map(|c| c.disk_name()).collect();
                write!(f, "roster is missing login columns: {}", names.join(", "))
            }
            Self::UserNotFound => write!(f, "user not found"),
            Self::WrongPassword => write!(f, "wrong password"),
            Self::RoleNotPermitted(role) => write!(f, "role `{role}` cannot sign in"),
        }
    }
}

impl Error for AuthError {}

/// Finds the user by email (case-insensitive) or name and checks the
/// password.
///
/// The first row whose email equals the lower-cased login, or whose name
/// equals the upper-cased login, is the candidate.
pub fn authenticate(table: &RosterTable, login: &str, password: &str) -> Result<Session, AuthError> {
    if table.is_empty() {
        warn!("event=auth_login module=service status=error error_code=roster_unavailable");
        return Err(AuthError::RosterUnavailable);
    }
    let missing: Vec<Column> = LOGIN_COLUMNS
        .into_iter()
        .filter(|column| !table.has_column(*column))
        .collect();
    if !missing.is_empty() {
        warn!("event=auth_login module=service status=error error_code=missing_columns");
        return Err(AuthError::MissingColumns(missing));
    }

    let login = login.trim();
    if login.is_empty() {
        return Err(AuthError::UserNotFound);
    }
    let as_email = login.to_lowercase();
    let as_name = login.to_uppercase();
    let user = table
        .records()
        .iter()
        .find(|record| record.email == as_email || record.name == as_name)
        .ok_or_else(|| {
            warn!("event=auth_login module=service status=error error_code=user_not_found");
            AuthError::UserNotFound
        })?;

    if user.password != password {
        warn!(
            "event=auth_login module=service status=error error_code=wrong_password user_id={}",
            user.id
        );
        return Err(AuthError::WrongPassword);
    }
    if matches!(user.role, Role::Placeholder | Role::Other(_)) {
        warn!(
            "event=auth_login module=service status=error error_code=role_not_permitted user_id={}",
            user.id
        );
        return Err(AuthError::RoleNotPermitted(user.role.as_str().to_string()));
    }

    info!(
        "event=auth_login module=service status=ok user_id={} role={}",
        user.id,
        user.role.as_str()
    );
    Ok(Session::new(user.clone()))
}
