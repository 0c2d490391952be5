//! Role-scoped roster projection.
//!
//! # Responsibility
//! - Derive the table a given caller may see from the full roster.
//! - Apply the optional status and free-text filters.
//!
//! # Invariants
//! - Projection is idempotent for the same session and filter.
//! - Hidden fields are blanked in the projected rows, not only unlisted.
//! - A filter on a column outside the projected column set yields no rows.

use crate::access::{AccessDenied, Capability, Session};
use crate::model::column::Column;
use crate::model::record::{EnrollmentStatus, Record, Role};
use crate::model::table::RosterTable;
use log::debug;

/// Case-insensitive substring match on one caller-chosen column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMatch {
    /// In-memory column name as shown in the table header.
    pub column: String,
    pub text: String,
}

/// Optional filters layered on top of the role projection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewFilter {
    /// Exact enrollment status match.
    pub status: Option<EnrollmentStatus>,
    pub column_match: Option<ColumnMatch>,
}

impl ViewFilter {
    pub fn by_status(status: EnrollmentStatus) -> Self {
        Self {
            status: Some(status),
            column_match: None,
        }
    }

    pub fn by_column(column: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            status: None,
            column_match: Some(ColumnMatch {
                column: column.into(),
                text: text.into(),
            }),
        }
    }

    /// True when no filter would be applied.
    pub fn is_empty(&self) -> bool {
        self.status.is_none()
            && self
                .column_match
                .as_ref()
                .map_or(true, |matcher| matcher.text.trim().is_empty())
    }
}

/// Projects `table` for the caller in `session`, then applies `filter`.
///
/// # Errors
/// - `AccessDenied` when a non-empty filter is supplied by a role without
///   `Capability::FilterRoster`.
pub fn project(
    table: &RosterTable,
    session: &Session,
    filter: &ViewFilter,
) -> Result<RosterTable, AccessDenied> {
    if !filter.is_empty() {
        session.require(Capability::FilterRoster)?;
    }

    let policy = session.policy();
    let caller_id = session.user_id();
    let mut view = table.clone();
    view.retain(|record| policy.rows.admits(caller_id, record.id, &record.role));
    view.hide_columns(policy.hidden_columns);

    if let Some(status) = &filter.status {
        if view.has_column(Column::EnrollmentStatus) {
            view.retain(|record| record.status == *status);
        } else {
            view.retain(|_| false);
        }
    }

    if let Some(matcher) = &filter.column_match {
        let needle = matcher.text.trim().to_lowercase();
        if !needle.is_empty() {
            match Column::lookup(&matcher.column).filter(|column| view.has_column(*column)) {
                Some(column) => view.retain(|record| {
                    record.cell_text(column).to_lowercase().contains(&needle)
                }),
                None => view.retain(|_| false),
            }
        }
    }

    debug!(
        "event=roster_project module=view status=ok role={} rows={} columns={}",
        session.role().as_str(),
        view.len(),
        view.columns().len()
    );
    Ok(view)
}

/// Pass/fail flag a student sees on their own row.
///
/// `None` unless the viewer is a student and `view` carries the average.
pub fn pass_flag(view: &RosterTable, session: &Session, record: &Record) -> Option<bool> {
    if *session.role() != Role::Student || !view.has_column(Column::Average) {
        return None;
    }
    Some(record.passed())
}
