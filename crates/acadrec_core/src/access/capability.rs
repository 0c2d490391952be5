//! Role capability table.
//!
//! # Responsibility
//! - Map every role to one policy: visible rows, hidden columns and the
//!   set of permitted operations.
//! - Serve as the only place that branches on role for access decisions.
//!
//! # Invariants
//! - Roles outside the four person roles get no rows and no capabilities.

use crate::model::column::Column;
use crate::model::record::Role;
use std::fmt::{Display, Formatter};

/// Operation gated by role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Capability {
    /// Status and free-text filters on the roster view.
    FilterRoster,
    /// Write the in-memory roster back to the backing file.
    SaveRoster,
    /// Activate/deactivate enrollment.
    ToggleStatus,
    CreateRecord,
    /// Edit any field of an existing row.
    EditProfile,
    /// Set the three grade inputs of a student row.
    EditGrades,
    DeleteRecord,
    /// Register a new class name.
    CreateClass,
    /// Create subject folders under a class folder.
    ManageSubjects,
    /// Copy coursework into a class folder.
    PublishCoursework,
    /// Hand in own coursework.
    SubmitCoursework,
    BackupRoster,
    /// See own grade fields on the profile card.
    ViewOwnGrades,
}

impl Capability {
    /// Stable identifier used in logs and error text.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::FilterRoster => "filter_roster",
            Self::SaveRoster => "save_roster",
            Self::ToggleStatus => "toggle_status",
            Self::CreateRecord => "create_record",
            Self::EditProfile => "edit_profile",
            Self::EditGrades => "edit_grades",
            Self::DeleteRecord => "delete_record",
            Self::CreateClass => "create_class",
            Self::ManageSubjects => "manage_subjects",
            Self::PublishCoursework => "publish_coursework",
            Self::SubmitCoursework => "submit_coursework",
            Self::BackupRoster => "backup_roster",
            Self::ViewOwnGrades => "view_own_grades",
        }
    }
}

impl Display for Capability {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which rows a role may see.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowScope {
    /// Only the row whose id equals the caller's id.
    OwnRecord,
    /// Rows whose role is STUDENT.
    Students,
    /// Rows whose role is STUDENT, TEACHER or COORDINATOR.
    StudentsAndStaff,
    All,
    Nothing,
}

impl RowScope {
    /// Whether a row with `row_role`/`row_id` is visible to `caller_id`.
    pub fn admits(self, caller_id: i64, row_id: i64, row_role: &Role) -> bool {
        match self {
            Self::OwnRecord => row_id == caller_id,
            Self::Students => *row_role == Role::Student,
            Self::StudentsAndStaff => matches!(
                row_role,
                Role::Student | Role::Teacher | Role::Coordinator
            ),
            Self::All => true,
            Self::Nothing => false,
        }
    }
}

/// Access policy of one role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RolePolicy {
    pub rows: RowScope,
    pub hidden_columns: &'static [Column],
    pub capabilities: &'static [Capability],
}

impl RolePolicy {
    pub fn allows(&self, capability: Capability) -> bool {
        self.capabilities.contains(&capability)
    }
}

const STUDENT_POLICY: RolePolicy = RolePolicy {
    rows: RowScope::OwnRecord,
    hidden_columns: &[
        Column::EnrollmentStatus,
        Column::Password,
        Column::ClassId,
        Column::Email,
        Column::Age,
        Column::Role,
    ],
    capabilities: &[Capability::SubmitCoursework, Capability::ViewOwnGrades],
};

const TEACHER_POLICY: RolePolicy = RolePolicy {
    rows: RowScope::Students,
    hidden_columns: &[Column::Password, Column::ClassId],
    capabilities: &[
        Capability::FilterRoster,
        Capability::SaveRoster,
        Capability::EditGrades,
        Capability::ManageSubjects,
        Capability::PublishCoursework,
        Capability::ViewOwnGrades,
    ],
};

const COORDINATOR_POLICY: RolePolicy = RolePolicy {
    rows: RowScope::StudentsAndStaff,
    hidden_columns: &[
        Column::Password,
        Column::Score1,
        Column::Score2,
        Column::ProjectScore,
        Column::ClassId,
    ],
    capabilities: &[
        Capability::FilterRoster,
        Capability::SaveRoster,
        Capability::ToggleStatus,
        Capability::CreateRecord,
        Capability::CreateClass,
        Capability::ManageSubjects,
        Capability::PublishCoursework,
    ],
};

const ADMINISTRATOR_POLICY: RolePolicy = RolePolicy {
    rows: RowScope::All,
    hidden_columns: &[Column::Password],
    capabilities: &[
        Capability::FilterRoster,
        Capability::SaveRoster,
        Capability::ToggleStatus,
        Capability::CreateRecord,
        Capability::EditProfile,
        Capability::DeleteRecord,
        Capability::CreateClass,
        Capability::ManageSubjects,
        Capability::PublishCoursework,
        Capability::BackupRoster,
        Capability::ViewOwnGrades,
    ],
};

const NO_ACCESS_POLICY: RolePolicy = RolePolicy {
    rows: RowScope::Nothing,
    hidden_columns: &[],
    capabilities: &[],
};

/// Looks up the policy of `role`.
pub fn policy_for(role: &Role) -> &'static RolePolicy {
    match role {
        Role::Student => &STUDENT_POLICY,
        Role::Teacher => &TEACHER_POLICY,
        Role::Coordinator => &COORDINATOR_POLICY,
        Role::Administrator => &ADMINISTRATOR_POLICY,
        Role::Placeholder | Role::Other(_) => &NO_ACCESS_POLICY,
    }
}

#[cfg(test)]
mod tests {
    use super::{policy_for, Capability, RowScope};
    use crate::model::column::Column;
    use crate::model::record::Role;

    #[test]
    fn only_administrator_deletes_and_edits_profiles() {
        for role in [Role::Student, Role::Teacher, Role::Coordinator] {
            assert!(!policy_for(&role).allows(Capability::DeleteRecord));
            assert!(!policy_for(&role).allows(Capability::EditProfile));
        }
        assert!(policy_for(&Role::Administrator).allows(Capability::DeleteRecord));
    }

    #[test]
    fn save_is_limited_to_staff() {
        assert!(!policy_for(&Role::Student).allows(Capability::SaveRoster));
        assert!(policy_for(&Role::Teacher).allows(Capability::SaveRoster));
        assert!(policy_for(&Role::Coordinator).allows(Capability::SaveRoster));
        assert!(policy_for(&Role::Administrator).allows(Capability::SaveRoster));
    }

    #[test]
    fn grades_are_edited_by_teachers_only() {
        assert!(policy_for(&Role::Teacher).allows(Capability::EditGrades));
        assert!(!policy_for(&Role::Administrator).allows(Capability::EditGrades));
    }

    #[test]
    fn unknown_roles_get_nothing() {
        let policy = policy_for(&Role::Other("MONITOR".to_string()));
        assert_eq!(policy.rows, RowScope::Nothing);
        assert!(policy.capabilities.is_empty());
        assert!(policy_for(&Role::Placeholder).capabilities.is_empty());
    }

    #[test]
    fn coordinator_hides_grade_inputs_but_not_average() {
        let hidden = policy_for(&Role::Coordinator).hidden_columns;
        assert!(hidden.contains(&Column::Score1));
        assert!(!hidden.contains(&Column::Average));
    }

    #[test]
    fn row_scope_rules() {
        assert!(RowScope::OwnRecord.admits(4, 4, &Role::Student));
        assert!(!RowScope::OwnRecord.admits(4, 5, &Role::Student));
        assert!(!RowScope::Students.admits(1, 2, &Role::Teacher));
        assert!(RowScope::StudentsAndStaff.admits(1, 2, &Role::Coordinator));
        assert!(!RowScope::StudentsAndStaff.admits(1, 2, &Role::Administrator));
    }
}
