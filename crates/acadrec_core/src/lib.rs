//! Core domain logic for the academic records manager.
//! This crate is the single source of truth for roster invariants.

pub mod access;
pub mod config;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod view;

pub use access::{policy_for, AccessDenied, Capability, RolePolicy, RowScope, Session};
pub use config::AppConfig;
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::column::{Column, ColumnKind};
pub use model::record::{weighted_average, EnrollmentStatus, Record, Role};
pub use model::table::RosterTable;
pub use model::validation::ValidationError;
pub use repo::roster_codec::{parse_roster, serialize_roster, CodecError, InvalidNumberPolicy};
pub use repo::roster_repo::{FlatFileRosterRepository, RosterRepository};
pub use repo::{StoreError, StoreResult};
pub use service::auth::authenticate;
pub use service::consent::ConsentMarker;
pub use service::coursework::CourseworkStore;
pub use service::roster_service::{GradeForm, RecordForm, RosterService};
pub use service::{AuthError, ServiceError, ServiceResult};
pub use view::{
    class_summaries, known_classes, pass_flag, profile_card, project, student_classes,
    ClassSummary, ViewFilter,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
