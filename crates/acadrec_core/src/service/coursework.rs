//! Coursework folders and uploads.
//!
//! # Responsibility
//! - Create subject folders under a class folder.
//! - Copy staff-published and student-submitted files into class folders.
//!
//! # Invariants
//! - Files are copied unmodified; no manifest is kept, the directory
//!   listing is the record.
//! - Every path segment derived from user text is sanitized or rejected.

use crate::access::{Capability, Session};
use crate::model::validation::{validate_class_name, ValidationError};
use crate::service::{ServiceError, ServiceResult};
use log::info;
use std::path::{Path, PathBuf};

/// Keeps alphanumerics and `_` of a trimmed subject name.
pub fn sanitize_subject(raw: &str) -> String {
    raw.trim()
        .chars()
        .filter(|ch| ch.is_alphanumeric() || *ch == '_')
        .collect()
}

/// File-name safe form of a person name: spaces and `-` become `_`, then
/// only alphanumerics and `_` are kept.
pub fn sanitize_person_name(raw: &str) -> String {
    raw.chars()
        .map(|ch| if ch == ' ' || ch == '-' { '_' } else { ch })
        .filter(|ch| ch.is_alphanumeric() || *ch == '_')
        .collect()
}

/// Name a student submission is stored under:
/// `<subject with _ as space>_<sanitized name>_<id><.ext>`.
pub fn submission_file_name(subject: &str, person_name: &str, id: i64, source: &Path) -> String {
    let extension = source
        .extension()
        .and_then(|value| value.to_str())
        .map(|value| format!(".{value}"))
        .unwrap_or_default();
    format!(
        "{}_{}_{}{}",
        subject.replace('_', " "),
        sanitize_person_name(person_name),
        id,
        extension
    )
}

/// Coursework tree rooted at one directory: `<root>/<class>/<subject>/`.
#[derive(Debug, Clone)]
pub struct CourseworkStore {
    root: PathBuf,
}

impl CourseworkStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Creates `<root>/<class>/<subject>` and returns it.
    ///
    /// Creating an existing folder succeeds.
    pub fn create_subject_folder(
        &self,
        session: &Session,
        class_id: &str,
        subject: &str,
    ) -> ServiceResult<PathBuf> {
        session.require(Capability::ManageSubjects)?;
        let class_dir = self.class_dir(class_id)?;
        let safe_subject = sanitize_subject(subject);
        if safe_subject.is_empty() {
            return Err(ValidationError::InvalidSubject(subject.trim().to_string()).into());
        }

        let target = class_dir.join(&safe_subject);
        std::fs::create_dir_all(&target).map_err(|err| ServiceError::io(&target, err))?;
        info!(
            "event=subject_folder_create module=coursework status=ok path={}",
            target.display()
        );
        Ok(target)
    }

    /// Sorted subject folder names of a class. A missing class folder has
    /// no subjects.
    pub fn list_subjects(&self, class_id: &str) -> ServiceResult<Vec<String>> {
        let class_dir = self.class_dir(class_id)?;
        if !class_dir.is_dir() {
            return Ok(Vec::new());
        }

        let entries =
            std::fs::read_dir(&class_dir).map_err(|err| ServiceError::io(&class_dir, err))?;
        let mut subjects = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|err| ServiceError::io(&class_dir, err))?;
            if entry.path().is_dir() {
                if let Some(name) = entry.file_name().to_str() {
                    subjects.push(name.to_string());
                }
            }
        }
        subjects.sort();
        Ok(subjects)
    }

    /// Copies `source` under its own file name into the class folder, or
    /// into one of its existing subject folders.
    pub fn publish(
        &self,
        session: &Session,
        class_id: &str,
        subject: Option<&str>,
        source: &Path,
    ) -> ServiceResult<PathBuf> {
        session.require(Capability::PublishCoursework)?;
        let file_name = source_file_name(source)?;
        let mut target_dir = self.class_dir(class_id)?;
        if let Some(subject) = subject {
            let safe_subject = sanitize_subject(subject);
            let subject_dir = target_dir.join(&safe_subject);
            if safe_subject.is_empty() || !subject_dir.is_dir() {
                return Err(ValidationError::UnknownSubject(subject.trim().to_string()).into());
            }
            target_dir = subject_dir;
        }

        let target = self.copy_into(source, &target_dir, file_name)?;
        info!(
            "event=coursework_publish module=coursework status=ok user_id={} path={}",
            session.user_id(),
            target.display()
        );
        Ok(target)
    }

    /// Hands in a student's file for one of their class's subjects.
    ///
    /// The copy lands in the class folder under `submission_file_name`.
    pub fn submit(&self, session: &Session, subject: &str, source: &Path) -> ServiceResult<PathBuf> {
        session.require(Capability::SubmitCoursework)?;
        source_file_name(source)?;
        let user = session.user();
        let subject = subject.trim();
        if !self.list_subjects(&user.class_id)?.iter().any(|name| name == subject) {
            return Err(ValidationError::UnknownSubject(subject.to_string()).into());
        }

        let class_dir = self.class_dir(&user.class_id)?;
        let file_name = submission_file_name(subject, &user.name, user.id, source);
        let target = self.copy_into(source, &class_dir, file_name)?;
        info!(
            "event=coursework_submit module=coursework status=ok user_id={} path={}",
            user.id,
            target.display()
        );
        Ok(target)
    }

    fn class_dir(&self, class_id: &str) -> Result<PathBuf, ValidationError> {
        Ok(self.root.join(validate_class_name(class_id)?))
    }

    fn copy_into(&self, source: &Path, dir: &Path, file_name: String) -> ServiceResult<PathBuf> {
        std::fs::create_dir_all(dir).map_err(|err| ServiceError::io(dir, err))?;
        let target = dir.join(file_name);
        std::fs::copy(source, &target).map_err(|err| ServiceError::io(&target, err))?;
        Ok(target)
    }
}

fn source_file_name(source: &Path) -> Result<String, ValidationError> {
    if !source.is_file() {
        return Err(ValidationError::MissingSource(source.to_path_buf()));
    }
    source
        .file_name()
        .and_then(|value| value.to_str())
        .map(str::to_string)
        .ok_or_else(|| ValidationError::MissingSource(source.to_path_buf()))
}
