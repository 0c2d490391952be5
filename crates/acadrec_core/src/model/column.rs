//! Typed column schema for the roster table.
//!
//! # Responsibility
//! - Enumerate the known roster fields and their on-disk/in-memory names.
//! - Provide the single lookup point for free-form column names.
//!
//! # Invariants
//! - `Column::ALL` is the fixed on-disk column order used by save.
//! - On-disk names are lower-case; in-memory names are upper-case, with
//!   `turma` and `atividade` renamed to `ID_TURMAS` and `STATUS DO ALUNO`.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Value kind of one column, used for coercion and back-fill defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    /// Parsed as a number and truncated (`id`, `idade`).
    Integer,
    /// Decimal comma on disk, two decimals on write (`np1`, `np2`, `pim`, `media`).
    Decimal,
    /// Free text.
    Text,
}

/// Known roster field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Column {
    Id,
    Name,
    Email,
    Password,
    Role,
    Course,
    ClassId,
    Age,
    Score1,
    Score2,
    ProjectScore,
    Average,
    EnrollmentStatus,
}

impl Column {
    /// Fixed on-disk column order.
    pub const ALL: [Column; 13] = [
        Column::Id,
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
        Column::EnrollmentStatus,
    ];

    /// The three weighted grade inputs.
    pub const GRADES: [Column; 3] = [Column::Score1, Column::Score2, Column::ProjectScore];

    /// Lower-case header name written to the backing file.
    pub fn disk_name(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Name => "nome",
            Self::Email => "email",
            Self::Password => "senha",
            Self::Role => "nivel",
            Self::Course => "curso",
            Self::ClassId => "turma",
            Self::Age => "idade",
            Self::Score1 => "np1",
            Self::Score2 => "np2",
            Self::ProjectScore => "pim",
            Self::Average => "media",
            Self::EnrollmentStatus => "atividade",
        }
    }

    /// Upper-case name used by the in-memory table and the UI.
    pub fn internal_name(self) -> &'static str {
        match self {
            Self::Id => "ID",
            Self::Name => "NOME",
            Self::Email => "EMAIL",
            Self::Password => "SENHA",
            Self::Role => "NIVEL",
            Self::Course => "CURSO",
            Self::ClassId => "ID_TURMAS",
            Self::Age => "IDADE",
            Self::Score1 => "NP1",
            Self::Score2 => "NP2",
            Self::ProjectScore => "PIM",
            Self::Average => "MEDIA",
            Self::EnrollmentStatus => "STATUS DO ALUNO",
        }
    }

    pub fn kind(self) -> ColumnKind {
        match self {
            Self::Id | Self::Age => ColumnKind::Integer,
            Self::Score1 | Self::Score2 | Self::ProjectScore | Self::Average => {
                ColumnKind::Decimal
            }
            _ => ColumnKind::Text,
        }
    }

    pub fn is_numeric(self) -> bool {
        self.kind() != ColumnKind::Text
    }

    /// Resolves an in-memory column name chosen by a caller.
    ///
    /// Matching is whitespace- and case-insensitive against internal names.
    /// Returns `None` for anything outside the schema.
    pub fn lookup(name: &str) -> Option<Column> {
        let normalized = name.trim().to_uppercase();
        Self::ALL
            .into_iter()
            .find(|column| column.internal_name() == normalized)
    }

    /// Resolves one raw header cell read from the backing file.
    ///
    /// Applies the load-time normalization: trim, upper-case, then map the
    /// on-disk class and status names onto their in-memory names.
    pub fn from_header(raw: &str) -> Option<Column> {
        match raw.trim().to_uppercase().as_str() {
            "TURMA" => Some(Self::ClassId),
            "ATIVIDADE" => Some(Self::EnrollmentStatus),
            other => Self::lookup(other),
        }
    }
}

impl Display for Column {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.internal_name())
    }
}
