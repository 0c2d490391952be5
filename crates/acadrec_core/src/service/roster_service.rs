//! Roster use-case service.
//!
//! # Responsibility
//! - Hold the resident full table and the caller's visible projection.
//! - Apply status, grade, profile, creation, deletion and class mutations.
//! - Persist through the repository and adopt the reloaded table.
//!
//! # Invariants
//! - Mutations are staged on a copy; the resident table changes only after
//!   the repository save and reload succeed.
//! - A failed save leaves the resident table untouched.
//! - Status toggles change memory only; every other mutation persists
//!   immediately.

use crate::access::{Capability, Session};
use crate::model::column::Column;
use crate::model::record::{EnrollmentStatus, Record, Role};
use crate::model::table::RosterTable;
use crate::model::validation::{
    parse_form_grade, parse_form_integer, require_text, validate_class_name, validate_email,
    ValidationError,
};
use crate::repo::roster_repo::{FlatFileRosterRepository, RosterRepository};
use crate::repo::StoreError;
use crate::service::{ServiceError, ServiceResult};
use crate::view::{project, ViewFilter};
use log::{info, warn};
use std::path::{Path, PathBuf};

const PLACEHOLDER_NAME_PREFIX: &str = "REGISTRO_";
const PLACEHOLDER_EMAIL_DOMAIN: &str = "sys.com";
const PLACEHOLDER_COURSE: &str = "N/A";

/// Fields written by a grade edit.
const GRADE_COLUMNS: [Column; 4] = [
    Column::Score1,
    Column::Score2,
    Column::ProjectScore,
    Column::Average,
];

/// Fields written by a profile edit.
const FORM_COLUMNS: [Column; 11] = [
    Column::Name,
    Column::Email,
    Column::Password,
    Column::Role,
    Column::Course,
    Column::ClassId,
    Column::Age,
    Column::Score1,
    Column::Score2,
    Column::ProjectScore,
    Column::Average,
];

/// Raw text of the three grade inputs, as typed into the grade form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GradeForm {
    pub score1: String,
    pub score2: String,
    pub project_score: String,
}

/// Raw text of the user form shared by creation and profile edit.
///
/// Blank numeric fields mean zero. A blank role means STUDENT on creation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordForm {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: String,
    pub course: String,
    pub class_id: String,
    pub age: String,
    pub score1: String,
    pub score2: String,
    pub project_score: String,
}

/// Fully validated form values.
struct ValidatedForm {
    name: String,
    email: String,
    password: String,
    role: Role,
    course: String,
    class_id: String,
    age: i64,
    score1: f64,
    score2: f64,
    project_score: f64,
}

impl ValidatedForm {
    fn apply_to(self, record: &mut Record) {
        record.name = self.name;
        record.email = self.email;
        record.password = self.password;
        record.role = self.role;
        record.course = self.course;
        record.class_id = self.class_id;
        record.age = self.age;
        record.score1 = self.score1;
        record.score2 = self.score2;
        record.project_score = self.project_score;
        record.recompute_average();
    }
}

/// Session-facing roster service over a repository implementation.
pub struct RosterService<R: RosterRepository> {
    repo: R,
    full: RosterTable,
    visible: RosterTable,
    filter: ViewFilter,
}

impl<R: RosterRepository> RosterService<R> {
    /// Creates a service with nothing loaded yet.
    pub fn new(repo: R) -> Self {
        Self {
            repo,
            full: RosterTable::default(),
            visible: RosterTable::default(),
            filter: ViewFilter::default(),
        }
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    /// The authoritative in-memory table.
    pub fn full_table(&self) -> &RosterTable {
        &self.full
    }

    /// The last projection computed for a caller.
    pub fn visible_table(&self) -> &RosterTable {
        &self.visible
    }

    /// Reloads the full table from the repository.
    ///
    /// On failure both tables are emptied, so callers never keep a stale or
    /// partial table.
    pub fn reload(&mut self) -> ServiceResult<&RosterTable> {
        match self.repo.load() {
            Ok(table) => {
                self.full = table;
                Ok(&self.full)
            }
            Err(err) => {
                self.full = RosterTable::default();
                self.visible = RosterTable::default();
                Err(err.into())
            }
        }
    }

    /// Re-projects the full table for `session` with `filter` and keeps the
    /// filter for later re-projections.
    pub fn refresh_view(
        &mut self,
        session: &Session,
        filter: ViewFilter,
    ) -> ServiceResult<&RosterTable> {
        self.visible = project(&self.full, session, &filter)?;
        self.filter = filter;
        Ok(&self.visible)
    }

    /// Replaces `session`'s user snapshot with the current row, if any.
    pub fn refresh_session(&self, session: &mut Session) {
        if let Some(user) = self.full.find(session.user_id()) {
            session.refresh(user.clone());
        }
    }

    /// Writes the full table back and adopts the reloaded table.
    ///
    /// # Errors
    /// - `PermissionDenied` for roles without `Capability::SaveRoster`.
    /// - `Store(EmptyTable)` when nothing is loaded.
    pub fn save(&mut self, session: &Session) -> ServiceResult<()> {
        session.require(Capability::SaveRoster)?;
        let staged = self.full.clone();
        self.commit(session, staged)
    }

    /// Sets the enrollment status of one row in memory only.
    ///
    /// The target must be inside the caller's row scope. Both the full and
    /// the visible table change; nothing is written until `save`.
    pub fn set_enrollment_status(
        &mut self,
        session: &Session,
        id: i64,
        status: EnrollmentStatus,
    ) -> ServiceResult<()> {
        session.require(Capability::ToggleStatus)?;
        let scope = session.policy().rows;
        let record = self
            .full
            .find_mut(id)
            .filter(|record| scope.admits(session.user_id(), record.id, &record.role))
            .ok_or(ServiceError::RecordNotFound(id))?;
        record.status = status.clone();

        if self.visible.has_column(Column::EnrollmentStatus) {
            if let Some(row) = self.visible.find_mut(id) {
                row.status = status.clone();
            }
        }
        info!(
            "event=roster_status_set module=service status=ok id={} value={} persisted=false",
            id,
            status.as_str()
        );
        Ok(())
    }

    pub fn activate(&mut self, session: &Session, id: i64) -> ServiceResult<()> {
        self.set_enrollment_status(session, id, EnrollmentStatus::Active)
    }

    pub fn deactivate(&mut self, session: &Session, id: i64) -> ServiceResult<()> {
        self.set_enrollment_status(session, id, EnrollmentStatus::Inactive)
    }

    /// Sets the three grades of a student row and persists.
    ///
    /// # Errors
    /// - `Validation` naming the first offending field; nothing changes.
    /// - `Validation(NotAStudent)` when the target is not a student row.
    ///
    /// Grade columns missing from the loaded file are added on save.
    pub fn update_grades(
        &mut self,
        session: &Session,
        id: i64,
        form: &GradeForm,
    ) -> ServiceResult<Record> {
        session.require(Capability::EditGrades)?;
        let target = self.full.find(id).ok_or(ServiceError::RecordNotFound(id))?;
        if target.role != Role::Student {
            return Err(ValidationError::NotAStudent(id).into());
        }

        let score1 = parse_form_grade(Column::Score1, &form.score1)?;
        let score2 = parse_form_grade(Column::Score2, &form.score2)?;
        let project_score = parse_form_grade(Column::ProjectScore, &form.project_score)?;

        let mut staged = self.full.clone();
        staged.add_columns(&GRADE_COLUMNS);
        let record = staged
            .find_mut(id)
            .ok_or(ServiceError::RecordNotFound(id))?;
        record.score1 = score1;
        record.score2 = score2;
        record.project_score = project_score;
        record.recompute_average();

        self.commit(session, staged)?;
        info!("event=roster_grades_set module=service status=ok id={id}");
        self.reloaded_record(id)
    }

    /// Adds a new row from the user form and persists. Returns the new id.
    ///
    /// Only name, email and password are required. The id is
    /// `max(id) + 1`, status is ACTIVE and the average is computed from the
    /// supplied grades.
    pub fn create_record(&mut self, session: &Session, form: &RecordForm) -> ServiceResult<i64> {
        session.require(Capability::CreateRecord)?;
        let role = if form.role.trim().is_empty() {
            Role::Student
        } else {
            Role::parse_person(&form.role)
                .ok_or_else(|| ValidationError::UnknownRole(form.role.trim().to_string()))?
        };
        let values = self.validate_form(form, role, None)?;

        let mut staged = self.full.clone();
        staged.add_columns(&Column::ALL);
        let id = staged
            .next_id()
            .ok_or(ServiceError::Store(StoreError::IdsExhausted))?;
        let mut record = Record::blank(id);
        values.apply_to(&mut record);
        record.status = EnrollmentStatus::Active;
        staged
            .push(record)
            .map_err(|record| ServiceError::Store(StoreError::DuplicateId(record.id)))?;

        self.commit(session, staged)?;
        info!("event=roster_record_create module=service status=ok id={id}");
        Ok(id)
    }

    /// Replaces the editable fields of one row and persists.
    ///
    /// Every field is validated before any is applied. The role must be a
    /// known role; class placeholders may keep `DUMMY`.
    pub fn edit_profile(
        &mut self,
        session: &Session,
        id: i64,
        form: &RecordForm,
    ) -> ServiceResult<Record> {
        session.require(Capability::EditProfile)?;
        self.full.find(id).ok_or(ServiceError::RecordNotFound(id))?;
        let role = match Role::parse(&form.role) {
            Role::Other(_) => {
                return Err(ValidationError::UnknownRole(form.role.trim().to_string()).into())
            }
            role => role,
        };
        let values = self.validate_form(form, role, Some(id))?;

        let mut staged = self.full.clone();
        staged.add_columns(&FORM_COLUMNS);
        let record = staged
            .find_mut(id)
            .ok_or(ServiceError::RecordNotFound(id))?;
        values.apply_to(record);

        self.commit(session, staged)?;
        info!("event=roster_profile_edit module=service status=ok id={id}");
        self.reloaded_record(id)
    }

    /// Removes exactly one row and persists. Files already uploaded for the
    /// person stay on disk.
    pub fn delete_record(&mut self, session: &Session, id: i64) -> ServiceResult<Record> {
        session.require(Capability::DeleteRecord)?;
        let mut staged = self.full.clone();
        let removed = staged.remove(id).ok_or(ServiceError::RecordNotFound(id))?;

        self.commit(session, staged)?;
        info!("event=roster_record_delete module=service status=ok id={id}");
        Ok(removed)
    }

    /// Registers a class name by adding its placeholder row, and persists.
    ///
    /// Returns the normalized (trimmed, upper-cased) class id.
    pub fn create_class(&mut self, session: &Session, name: &str) -> ServiceResult<String> {
        session.require(Capability::CreateClass)?;
        let class_id = validate_class_name(name)?.to_uppercase();
        let taken = self
            .full
            .records()
            .iter()
            .any(|record| record.class_id.trim().to_uppercase() == class_id);
        if taken {
            return Err(ValidationError::DuplicateClass(class_id).into());
        }

        let mut staged = self.full.clone();
        staged.add_columns(&Column::ALL);
        let id = staged
            .next_id()
            .ok_or(ServiceError::Store(StoreError::IdsExhausted))?;
        let mut record = Record::blank(id);
        record.name = format!("{PLACEHOLDER_NAME_PREFIX}{class_id}");
        record.email = format!(
            "turma_{}@{PLACEHOLDER_EMAIL_DOMAIN}",
            class_id.to_lowercase()
        );
        record.role = Role::Placeholder;
        record.course = PLACEHOLDER_COURSE.to_string();
        record.class_id = class_id.clone();
        record.status = EnrollmentStatus::Inactive;
        record.recompute_average();
        staged
            .push(record)
            .map_err(|record| ServiceError::Store(StoreError::DuplicateId(record.id)))?;

        self.commit(session, staged)?;
        info!("event=roster_class_create module=service status=ok class={class_id}");
        Ok(class_id)
    }

    fn validate_form(
        &self,
        form: &RecordForm,
        role: Role,
        editing: Option<i64>,
    ) -> Result<ValidatedForm, ValidationError> {
        let name = require_text(Column::Name, &form.name)?.to_uppercase();
        let email = require_text(Column::Email, &form.email)?.to_lowercase();
        validate_email(&email)?;
        let in_use = self
            .full
            .records()
            .iter()
            .any(|record| Some(record.id) != editing && record.email == email);
        if in_use {
            return Err(ValidationError::DuplicateEmail(email));
        }
        let password = require_text(Column::Password, &form.password)?;

        Ok(ValidatedForm {
            name,
            email,
            password,
            role,
            course: form.course.trim().to_uppercase(),
            class_id: form.class_id.trim().to_string(),
            age: parse_form_integer(Column::Age, &form.age)?,
            score1: parse_form_grade(Column::Score1, &form.score1)?,
            score2: parse_form_grade(Column::Score2, &form.score2)?,
            project_score: parse_form_grade(Column::ProjectScore, &form.project_score)?,
        })
    }

    /// Saves `staged`, adopts the reloaded table and re-projects the view.
    fn commit(&mut self, session: &Session, staged: RosterTable) -> ServiceResult<()> {
        match self.repo.save(&staged) {
            Ok(reloaded) => {
                self.full = reloaded;
                self.reproject(session);
                Ok(())
            }
            Err(err) => {
                warn!(
                    "event=roster_commit module=service status=error user_id={} error={}",
                    session.user_id(),
                    err
                );
                Err(err.into())
            }
        }
    }

    fn reproject(&mut self, session: &Session) {
        self.visible = match project(&self.full, session, &self.filter) {
            Ok(view) => view,
            Err(_) => {
                self.filter = ViewFilter::default();
                project(&self.full, session, &self.filter).unwrap_or_default()
            }
        };
    }

    fn reloaded_record(&self, id: i64) -> ServiceResult<Record> {
        self.full
            .find(id)
            .cloned()
            .ok_or(ServiceError::RecordNotFound(id))
    }
}

impl RosterService<FlatFileRosterRepository> {
    /// Copies the backing file into `dir` with a timestamped name.
    pub fn backup(&self, session: &Session, dir: &Path) -> ServiceResult<PathBuf> {
        session.require(Capability::BackupRoster)?;
        Ok(self.repo.backup_to(dir)?)
    }
}
