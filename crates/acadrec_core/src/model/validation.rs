//! Form-input validation for roster mutations.
//!
//! # Responsibility
//! - Parse raw form text into typed field values.
//! - Name the offending field in every rejection.
//!
//! # Invariants
//! - Validation never mutates a record; callers validate every input
//!   before applying any of them.

use crate::model::column::Column;
use crate::model::record::is_valid_grade;
use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^@\s]+@[^@\s.][^@\s]*\.[^@\s]+$").expect("valid email regex")
});

/// Rejected user input.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// A required field was left blank.
    EmptyField(Column),
    /// Numeric field text is not a number.
    NotANumber { field: Column, value: String },
    /// Grade outside `[0, 10]`.
    GradeOutOfRange { field: Column, value: f64 },
    /// Integer field below zero.
    Negative { field: Column, value: i64 },
    InvalidEmail(String),
    DuplicateEmail(String),
    /// Role text is not one of the four person roles.
    UnknownRole(String),
    /// Grades may only be set on student rows.
    NotAStudent(i64),
    EmptyClassName,
    /// Class id cannot be used as a single folder name.
    InvalidClassName(String),
    DuplicateClass(String),
    /// Subject name is empty after sanitizing.
    InvalidSubject(String),
    /// Subject folder does not exist for the class.
    UnknownSubject(String),
    /// Upload source file does not exist.
    MissingSource(PathBuf),
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyField(field) => write!(f, "field `{field}` must not be empty"),
            Self::NotANumber { field, value } => {
                write!(f, "field `{field}` must be a number, got `{value}`")
            }
            Self::GradeOutOfRange { field, value } => {
                write!(f, "grade `{field}` must be between 0 and 10, got {value}")
            }
            Self::Negative { field, value } => {
                write!(f, "field `{field}` must not be negative, got {value}")
            }
            Self::InvalidEmail(value) => write!(f, "invalid email: `{value}`"),
            Self::DuplicateEmail(value) => write!(f, "email already registered: `{value}`"),
            Self::UnknownRole(value) => write!(f, "unknown role: `{value}`"),
            Self::NotAStudent(id) => write!(f, "record {id} is not a student"),
            Self::EmptyClassName => write!(f, "class name must not be empty"),
            Self::InvalidClassName(value) => write!(f, "invalid class name: `{value}`"),
            Self::DuplicateClass(value) => write!(f, "class already exists: `{value}`"),
            Self::InvalidSubject(value) => write!(f, "invalid subject name: `{value}`"),
            Self::UnknownSubject(value) => write!(f, "subject folder not found: `{value}`"),
            Self::MissingSource(path) => {
                write!(f, "upload source not found: {}", path.display())
            }
        }
    }
}

impl Error for ValidationError {}

/// Parses a numeric form field. Blank input means zero.
///
/// Only a decimal point is accepted, as in the edit forms.
pub fn parse_form_number(field: Column, raw: &str) -> Result<f64, ValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(0.0);
    }
    match trimmed.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(ValidationError::NotANumber {
            field,
            value: trimmed.to_string(),
        }),
    }
}

/// Parses a grade form field and checks the `[0, 10]` range.
pub fn parse_form_grade(field: Column, raw: &str) -> Result<f64, ValidationError> {
    let value = parse_form_number(field, raw)?;
    if !is_valid_grade(value) {
        return Err(ValidationError::GradeOutOfRange { field, value });
    }
    Ok(value)
}

/// Parses a non-negative integer form field (truncating decimals). Blank
/// means zero.
pub fn parse_form_integer(field: Column, raw: &str) -> Result<i64, ValidationError> {
    let value = parse_form_number(field, raw)?.trunc() as i64;
    if value < 0 {
        return Err(ValidationError::Negative { field, value });
    }
    Ok(value)
}

/// Trims a required text field and rejects blank input.
pub fn require_text(field: Column, raw: &str) -> Result<String, ValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyField(field));
    }
    Ok(trimmed.to_string())
}

/// Trims a class id and checks it can name one folder.
pub fn validate_class_name(raw: &str) -> Result<String, ValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyClassName);
    }
    if trimmed == "." || trimmed == ".." || trimmed.contains(['/', '\\']) {
        return Err(ValidationError::InvalidClassName(trimmed.to_string()));
    }
    Ok(trimmed.to_string())
}

/// Checks the `local@domain.tld` shape.
pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    if EMAIL_RE.is_match(email) {
        Ok(())
    } else {
        Err(ValidationError::InvalidEmail(email.to_string()))
    }
}
