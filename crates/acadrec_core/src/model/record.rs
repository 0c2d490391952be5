//! Roster record domain model.
//!
//! # Responsibility
//! - Define the canonical row shared by every role-scoped view.
//! - Own the weighted-average formula and field normalization rules.
//!
//! # Invariants
//! - `average` is derived: it equals `weighted_average(score1, score2,
//!   project_score)` after load, creation and every grade edit.
//! - `name` and `role` are upper-case, `email` is lower-case.
//! - `password` is kept verbatim.

use crate::model::column::Column;
use serde::{Deserialize, Serialize};

/// Lowest accepted grade.
pub const GRADE_MIN: f64 = 0.0;
/// Highest accepted grade.
pub const GRADE_MAX: f64 = 10.0;
/// Lowest average that counts as passing.
pub const PASSING_AVERAGE: f64 = 7.0;

const ROLE_STUDENT: &str = "ALUNO";
const ROLE_TEACHER: &str = "PROFESSOR";
const ROLE_COORDINATOR: &str = "COORDENADOR";
const ROLE_ADMINISTRATOR: &str = "ADMINISTRADOR";
const ROLE_PLACEHOLDER: &str = "DUMMY";

const STATUS_ACTIVE: &str = "ATIVO";
const STATUS_INACTIVE: &str = "INATIVO";

/// Access level of one roster row.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Student,
    Teacher,
    Coordinator,
    Administrator,
    /// Synthetic row that only reserves a class name.
    Placeholder,
    /// Unrecognized role text, kept upper-cased so it survives a save.
    Other(String),
}

impl Role {
    /// Parses stored role text. Never fails; unknown text becomes `Other`.
    pub fn parse(raw: &str) -> Self {
        let upper = raw.to_uppercase();
        match upper.trim() {
            ROLE_STUDENT => Self::Student,
            ROLE_TEACHER => Self::Teacher,
            ROLE_COORDINATOR => Self::Coordinator,
            ROLE_ADMINISTRATOR => Self::Administrator,
            ROLE_PLACEHOLDER => Self::Placeholder,
            _ => Self::Other(upper),
        }
    }

    /// Parses role text typed into a form: only the four person roles.
    pub fn parse_person(raw: &str) -> Option<Self> {
        match Self::parse(raw) {
            Self::Other(_) | Self::Placeholder => None,
            role => Some(role),
        }
    }

    /// Stored (on-disk) spelling.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Student => ROLE_STUDENT,
            Self::Teacher => ROLE_TEACHER,
            Self::Coordinator => ROLE_COORDINATOR,
            Self::Administrator => ROLE_ADMINISTRATOR,
            Self::Placeholder => ROLE_PLACEHOLDER,
            Self::Other(value) => value.as_str(),
        }
    }
}

/// Enrollment state of one roster row.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnrollmentStatus {
    Active,
    Inactive,
    /// Blank or unrecognized stored text, kept verbatim.
    Other(String),
}

impl EnrollmentStatus {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_uppercase().as_str() {
            STATUS_ACTIVE => Self::Active,
            STATUS_INACTIVE => Self::Inactive,
            _ => Self::Other(raw.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Active => STATUS_ACTIVE,
            Self::Inactive => STATUS_INACTIVE,
            Self::Other(value) => value.as_str(),
        }
    }
}

/// One roster row: a person, or a class placeholder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Role,
    pub course: String,
    pub class_id: String,
    pub age: i64,
    pub score1: f64,
    pub score2: f64,
    pub project_score: f64,
    /// Derived; see `Record::recompute_average`.
    pub average: f64,
    pub status: EnrollmentStatus,
}

impl Record {
    /// Creates an empty row with the given id.
    ///
    /// Text fields are blank, numbers are zero, role and status are blank
    /// `Other` values. Loaders fill fields column by column from here.
    pub fn blank(id: i64) -> Self {
        Self {
            id,
            name: String::new(),
            email: String::new(),
            password: String::new(),
            role: Role::Other(String::new()),
            course: String::new(),
            class_id: String::new(),
            age: 0,
            score1: 0.0,
            score2: 0.0,
            project_score: 0.0,
            average: 0.0,
            status: EnrollmentStatus::Other(String::new()),
        }
    }

    /// Re-derives `average` from the three grade inputs.
    pub fn recompute_average(&mut self) {
        self.average = weighted_average(self.score1, self.score2, self.project_score);
    }

    /// Whether the average reaches [`PASSING_AVERAGE`].
    pub fn passed(&self) -> bool {
        self.average >= PASSING_AVERAGE
    }

    /// Whether this row is a class placeholder rather than a person.
    pub fn is_placeholder(&self) -> bool {
        self.role == Role::Placeholder
    }

    /// Display text of one field, as shown in tables and matched by filters.
    ///
    /// Grades render with two decimals and a decimal point.
    pub fn cell_text(&self, column: Column) -> String {
        match column {
            Column::Id => self.id.to_string(),
            Column::Name => self.name.clone(),
            Column::Email => self.email.clone(),
            Column::Password => self.password.clone(),
            Column::Role => self.role.as_str().to_string(),
            Column::Course => self.course.clone(),
            Column::ClassId => self.class_id.clone(),
            Column::Age => self.age.to_string(),
            Column::Score1 => format_grade(self.score1),
            Column::Score2 => format_grade(self.score2),
            Column::ProjectScore => format_grade(self.project_score),
            Column::Average => format_grade(self.average),
            Column::EnrollmentStatus => self.status.as_str().to_string(),
        }
    }

    /// Resets one field to its blank value.
    ///
    /// Used by projection so hidden fields do not leak through cloned rows.
    /// `id` is never cleared.
    pub fn clear(&mut self, column: Column) {
        match column {
            Column::Id => {}
            Column::Name => self.name.clear(),
            Column::Email => self.email.clear(),
            Column::Password => self.password.clear(),
            Column::Role => self.role = Role::Other(String::new()),
            Column::Course => self.course.clear(),
            Column::ClassId => self.class_id.clear(),
            Column::Age => self.age = 0,
            Column::Score1 => self.score1 = 0.0,
            Column::Score2 => self.score2 = 0.0,
            Column::ProjectScore => self.project_score = 0.0,
            Column::Average => self.average = 0.0,
            Column::EnrollmentStatus => self.status = EnrollmentStatus::Other(String::new()),
        }
    }
}

/// Weighted final grade: both exams weigh 4, the project weighs 2.
pub fn weighted_average(score1: f64, score2: f64, project_score: f64) -> f64 {
    round2((score1 * 4.0 + score2 * 4.0 + project_score * 2.0) / 10.0)
}

/// Rounds to two decimal places, ties to even (`0.125` -> `0.12`).
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}

/// Whether a grade lies inside `[GRADE_MIN, GRADE_MAX]`.
pub fn is_valid_grade(value: f64) -> bool {
    (GRADE_MIN..=GRADE_MAX).contains(&value)
}

fn format_grade(value: f64) -> String {
    if value.is_finite() {
        format!("{value:.2}")
    } else {
        String::new()
    }
}

#[cfg(test)]
mod tests {
    use super::{is_valid_grade, round2, weighted_average, EnrollmentStatus, Record, Role};
    use crate::model::column::Column;

    #[test]
    fn weighted_average_uses_four_four_two_weights() {
        assert_eq!(weighted_average(8.0, 6.0, 10.0), 7.6);
        assert_eq!(weighted_average(0.0, 0.0, 0.0), 0.0);
        assert_eq!(weighted_average(10.0, 10.0, 10.0), 10.0);
        assert_eq!(weighted_average(7.33, 5.17, 9.0), 6.8);
    }

    #[test]
    fn role_parse_is_case_insensitive_and_keeps_unknown_text() {
        assert_eq!(Role::parse("aluno"), Role::Student);
        assert_eq!(Role::parse("Administrador"), Role::Administrator);
        assert_eq!(Role::parse("dummy"), Role::Placeholder);
        assert_eq!(Role::parse("monitor"), Role::Other("MONITOR".to_string()));
        assert_eq!(Role::parse_person("dummy"), None);
        assert_eq!(Role::parse_person("professor"), Some(Role::Teacher));
    }

    #[test]
    fn status_parse_keeps_unrecognized_text_verbatim() {
        assert_eq!(EnrollmentStatus::parse("Ativo"), EnrollmentStatus::Active);
        assert_eq!(EnrollmentStatus::parse("INATIVO"), EnrollmentStatus::Inactive);
        assert_eq!(
            EnrollmentStatus::parse("trancado"),
            EnrollmentStatus::Other("trancado".to_string())
        );
    }

    #[test]
    fn cell_text_formats_grades_with_two_decimals() {
        let mut record = Record::blank(3);
        record.score1 = 8.0;
        record.average = 7.6;
        assert_eq!(record.cell_text(Column::Score1), "8.00");
        assert_eq!(record.cell_text(Column::Average), "7.60");
        assert_eq!(record.cell_text(Column::Id), "3");
    }

    #[test]
    fn round2_breaks_exact_ties_to_even() {
        assert_eq!(round2(0.125), 0.12);
        assert_eq!(round2(0.375), 0.38);
        assert_eq!(round2(2.675), 2.67);
        assert_eq!(round2(7.6049), 7.6);
    }

    #[test]
    fn passing_starts_at_seven() {
        let mut record = Record::blank(1);
        record.average = 7.0;
        assert!(record.passed());
        record.average = 6.99;
        assert!(!record.passed());
    }

    #[test]
    fn grade_bounds_are_inclusive() {
        assert!(is_valid_grade(0.0));
        assert!(is_valid_grade(10.0));
        assert!(!is_valid_grade(10.01));
        assert!(!is_valid_grade(-0.5));
    }
}
