//! Text codec for the sectioned roster file.
//!
//! # Responsibility
//! - Locate the `[USUARIOS]` section and parse it into a typed table.
//! - Serialize a table back to the fixed on-disk layout.
//!
//! # Invariants
//! - Parsing yields either a complete table or an error, never a partial one.
//! - `average` is recomputed on load whenever all three grade columns exist.
//! - Written decimals use two digits and a decimal comma; lines end in CRLF.

use crate::model::column::{Column, ColumnKind};
use crate::model::record::{EnrollmentStatus, Record, Role};
use crate::model::table::RosterTable;
use log::warn;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Section header that delimits the roster block.
pub const SECTION_MARKER: &str = "[USUARIOS]";
/// Line terminator used on write.
pub const LINE_END: &str = "\r\n";

const FIELD_SEPARATOR: char = ';';
const DEFAULT_HEADER: &str =
    "id;nome;email;senha;nivel;curso;turma;idade;np1;np2;pim;media;atividade";
const QUOTE: char = '"';

/// What to do with a non-blank numeric cell that does not parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InvalidNumberPolicy {
    /// Replace the value with zero. Lenient; can hide data-entry mistakes.
    #[default]
    CoerceToZero,
    /// Fail the whole load with `CodecError::InvalidNumber`.
    Reject,
}

/// Decode failures. Line numbers are 1-based positions in the file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    MissingSection,
    MalformedRow {
        line: usize,
        message: String,
    },
    InvalidNumber {
        line: usize,
        column: Column,
        value: String,
    },
    DuplicateId {
        line: usize,
        id: i64,
    },
}

impl Display for CodecError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingSection => write!(f, "section {SECTION_MARKER} not found"),
            Self::MalformedRow { line, message } => write!(f, "line {line}: {message}"),
            Self::InvalidNumber {
                line,
                column,
                value,
            } => write!(f, "line {line}: `{value}` is not a number in column {column}"),
            Self::DuplicateId { line, id } => write!(f, "line {line}: duplicate id {id}"),
        }
    }
}

impl Error for CodecError {}

/// Parses the roster section out of the full file text.
pub fn parse_roster(text: &str, policy: InvalidNumberPolicy) -> Result<RosterTable, CodecError> {
    let lines = text.lines().collect::<Vec<_>>();
    let start = lines
        .iter()
        .position(|line| line.trim().to_uppercase() == SECTION_MARKER)
        .map(|index| index + 1)
        .ok_or(CodecError::MissingSection)?;
    let end = lines[start..]
        .iter()
        .position(|line| line.trim().starts_with('['))
        .map_or(lines.len(), |offset| start + offset);

    let body = (start..end)
        .filter(|index| !lines[*index].trim().is_empty())
        .map(|index| (index + 1, lines[index]))
        .collect::<Vec<_>>();

    let header_line = body.first().map_or(DEFAULT_HEADER, |(_, line)| *line);
    let raw_header = header_line
        .split(FIELD_SEPARATOR)
        .map(|name| name.trim().to_string())
        .collect::<Vec<_>>();

    if body.len() <= 1 {
        return Ok(RosterTable::header_only(raw_header));
    }

    let layout = resolve_layout(&raw_header);
    let columns = layout.iter().map(|(_, column)| *column).collect::<Vec<_>>();
    let has_id = columns.contains(&Column::Id);

    let mut records: Vec<Record> = Vec::with_capacity(body.len() - 1);
    for (position, (line_no, line)) in body[1..].iter().enumerate() {
        let fields = split_fields(line).map_err(|message| CodecError::MalformedRow {
            line: *line_no,
            message,
        })?;
        if fields.len() > raw_header.len() {
            return Err(CodecError::MalformedRow {
                line: *line_no,
                message: format!(
                    "expected at most {} fields, found {}",
                    raw_header.len(),
                    fields.len()
                ),
            });
        }

        let mut record = Record::blank(position as i64 + 1);
        for (index, column) in &layout {
            let raw = fields.get(*index).map_or("", String::as_str);
            apply_cell(&mut record, *column, raw, *line_no, policy)?;
        }

        if has_id && records.iter().any(|existing| existing.id == record.id) {
            return Err(CodecError::DuplicateId {
                line: *line_no,
                id: record.id,
            });
        }
        records.push(record);
    }

    let mut table = RosterTable::new(columns, records);
    if table.has_columns(&Column::GRADES) {
        recompute_averages(&mut table);
    }
    Ok(table)
}

/// Serializes a table to the on-disk layout.
///
/// Always writes the full fixed column order; columns the table does not
/// carry are written as empty fields.
pub fn serialize_roster(table: &RosterTable) -> String {
    let mut out = String::new();
    out.push_str(SECTION_MARKER);
    out.push_str(LINE_END);

    let header = Column::ALL
        .iter()
        .map(|column| column.disk_name())
        .collect::<Vec<_>>()
        .join(";");
    out.push_str(&header);
    out.push_str(LINE_END);

    for record in table.records() {
        let row = Column::ALL
            .iter()
            .map(|column| {
                if table.has_column(*column) {
                    format_field(record, *column)
                } else {
                    String::new()
                }
            })
            .collect::<Vec<_>>()
            .join(";");
        out.push_str(&row);
        out.push_str(LINE_END);
    }
    out
}

/// Formats a decimal the way the file stores it: `7.6` -> `7,60`.
///
/// Non-finite values are written as an empty field.
pub fn format_decimal(value: f64) -> String {
    if value.is_finite() {
        format!("{value:.2}").replace('.', ",")
    } else {
        String::new()
    }
}

fn resolve_layout(raw_header: &[String]) -> Vec<(usize, Column)> {
    let mut layout: Vec<(usize, Column)> = Vec::with_capacity(raw_header.len());
    for (index, name) in raw_header.iter().enumerate() {
        match Column::from_header(name) {
            Some(column) if layout.iter().any(|(_, seen)| *seen == column) => {
                warn!("event=roster_parse module=repo status=skip reason=duplicate_column column={name}");
            }
            Some(column) => layout.push((index, column)),
            None => {
                warn!("event=roster_parse module=repo status=skip reason=unknown_column column={name}");
            }
        }
    }
    layout
}

fn apply_cell(
    record: &mut Record,
    column: Column,
    raw: &str,
    line: usize,
    policy: InvalidNumberPolicy,
) -> Result<(), CodecError> {
    match column.kind() {
        ColumnKind::Integer => {
            let value = coerce_number(raw, line, column, policy)?.trunc() as i64;
            match column {
                Column::Id => record.id = value,
                _ => record.age = value,
            }
        }
        ColumnKind::Decimal => {
            let value = coerce_number(&raw.replace(',', "."), line, column, policy)?;
            match column {
                Column::Score1 => record.score1 = value,
                Column::Score2 => record.score2 = value,
                Column::ProjectScore => record.project_score = value,
                _ => record.average = value,
            }
        }
        ColumnKind::Text => match column {
            Column::Name => record.name = raw.to_uppercase(),
            Column::Email => record.email = raw.to_lowercase(),
            Column::Password => record.password = raw.to_string(),
            Column::Role => record.role = Role::parse(raw),
            Column::Course => record.course = raw.to_string(),
            Column::ClassId => record.class_id = raw.to_string(),
            _ => record.status = EnrollmentStatus::parse(raw),
        },
    }
    Ok(())
}

// Blank cells are missing values and always read as zero; the policy only
// governs non-blank text that is not a number.
fn coerce_number(
    raw: &str,
    line: usize,
    column: Column,
    policy: InvalidNumberPolicy,
) -> Result<f64, CodecError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(0.0);
    }
    match trimmed.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => match policy {
            InvalidNumberPolicy::CoerceToZero => {
                warn!("event=roster_parse module=repo status=coerced line={line} column={column}");
                Ok(0.0)
            }
            InvalidNumberPolicy::Reject => Err(CodecError::InvalidNumber {
                line,
                column,
                value: trimmed.to_string(),
            }),
        },
    }
}

fn recompute_averages(table: &mut RosterTable) {
    let ids = table
        .records()
        .iter()
        .map(|record| record.id)
        .collect::<Vec<_>>();
    for id in ids {
        if let Some(record) = table.find_mut(id) {
            record.recompute_average();
        }
    }
}

fn format_field(record: &Record, column: Column) -> String {
    match column {
        Column::Score1 => format_decimal(record.score1),
        Column::Score2 => format_decimal(record.score2),
        Column::ProjectScore => format_decimal(record.project_score),
        Column::Average => format_decimal(record.average),
        Column::Id | Column::Age => record.cell_text(column),
        _ => quote_text(&record.cell_text(column)),
    }
}

fn quote_text(value: &str) -> String {
    let flattened = value.replace(['\r', '\n'], " ");
    if flattened.contains(FIELD_SEPARATOR) || flattened.starts_with(QUOTE) {
        format!("\"{}\"", flattened.replace('"', "\"\""))
    } else {
        flattened
    }
}

fn split_fields(line: &str) -> Result<Vec<String>, String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut at_field_start = true;
    let mut chars = line.chars().peekable();

    while let Some(ch) = chars.next() {
        if in_quotes {
            if ch == QUOTE {
                if chars.peek() == Some(&QUOTE) {
                    chars.next();
                    current.push(QUOTE);
                } else {
                    in_quotes = false;
                }
            } else {
                current.push(ch);
            }
            continue;
        }
        match ch {
            QUOTE if at_field_start => {
                in_quotes = true;
                at_field_start = false;
            }
            FIELD_SEPARATOR => {
                fields.push(std::mem::take(&mut current));
                at_field_start = true;
            }
            other => {
                current.push(other);
                at_field_start = false;
            }
        }
    }

    if in_quotes {
        return Err("unterminated quoted field".to_string());
    }
    fields.push(current);
    Ok(fields)
}

#[cfg(test)]
mod tests {
    use super::{
        format_decimal, parse_roster, serialize_roster, split_fields, CodecError,
        InvalidNumberPolicy,
    };
    use crate::model::column::Column;
    use crate::model::record::{EnrollmentStatus, Role};

    const HEADER: &str = "id;nome;email;senha;nivel;curso;turma;idade;np1;np2;pim;media;atividade";

    fn file(rows: &[&str]) -> String {
        let mut text = format!("[USUARIOS]\r\n{HEADER}\r\n");
        for row in rows {
            text.push_str(row);
            text.push_str("\r\n");
        }
        text
    }

    #[test]
    fn parses_and_normalizes_rows() {
        let text = file(&["7;ana souza;Ana@Escola.BR;Pw1;aluno;ads;T1;20;8;6;10;0;ATIVO"]);
        let table = parse_roster(&text, InvalidNumberPolicy::CoerceToZero).expect("parse");

        assert!(table.is_normalized());
        assert_eq!(table.columns(), Column::ALL);
        let record = table.find(7).expect("record 7");
        assert_eq!(record.name, "ANA SOUZA");
        assert_eq!(record.email, "ana@escola.br");
        assert_eq!(record.password, "Pw1");
        assert_eq!(record.role, Role::Student);
        assert_eq!(record.status, EnrollmentStatus::Active);
        assert_eq!(record.average, 7.6);
    }

    #[test]
    fn section_is_found_case_insensitively_and_ends_at_next_bracket() {
        let text = format!(
            "[config]\nx=1\n  [usuarios]  \n{HEADER}\n\n1;A;a@b.c;p;ALUNO;c;T;1;1;1;1;1;ATIVO\n[OUTRA]\n2;B;b@b.c;p;ALUNO;c;T;1;1;1;1;1;ATIVO\n"
        );
        let table = parse_roster(&text, InvalidNumberPolicy::CoerceToZero).expect("parse");
        assert_eq!(table.len(), 1);
        assert!(table.find(2).is_none());
    }

    #[test]
    fn missing_marker_is_reported() {
        let text = format!("{HEADER}\n1;A;a@b.c;p;ALUNO;c;T;1;1;1;1;1;ATIVO\n");
        let err = parse_roster(&text, InvalidNumberPolicy::CoerceToZero).expect_err("no marker");
        assert_eq!(err, CodecError::MissingSection);
    }

    #[test]
    fn header_only_section_keeps_raw_header_without_normalizing() {
        let text = "[USUARIOS]\n id ; nome ;turma;atividade\n\n";
        let table = parse_roster(text, InvalidNumberPolicy::CoerceToZero).expect("parse");
        assert!(table.records().is_empty());
        assert_eq!(table.header(), ["id", "nome", "turma", "atividade"]);
        assert!(!table.is_normalized());
    }

    #[test]
    fn empty_section_yields_default_raw_header() {
        let table =
            parse_roster("[USUARIOS]\n\n", InvalidNumberPolicy::CoerceToZero).expect("parse");
        assert_eq!(table.header().join(";"), HEADER);
        assert_eq!(table.columns(), Column::ALL);
        assert!(table.is_empty());
    }

    #[test]
    fn invalid_numbers_follow_policy() {
        let text = file(&["1;A;a@b.c;p;ALUNO;c;T;vinte;abc;6,5;10;0;ATIVO"]);

        let lenient = parse_roster(&text, InvalidNumberPolicy::CoerceToZero).expect("lenient");
        let record = lenient.find(1).expect("record");
        assert_eq!(record.age, 0);
        assert_eq!(record.score1, 0.0);
        assert_eq!(record.score2, 6.5);

        let err = parse_roster(&text, InvalidNumberPolicy::Reject).expect_err("strict");
        assert_eq!(
            err,
            CodecError::InvalidNumber {
                line: 3,
                column: Column::Age,
                value: "vinte".to_string()
            }
        );
    }

    #[test]
    fn integer_columns_truncate_and_ignore_decimal_comma() {
        let text = file(&["4.9;A;a@b.c;p;ALUNO;c;T;19,5;1;1;1;1;ATIVO"]);
        let table = parse_roster(&text, InvalidNumberPolicy::CoerceToZero).expect("parse");
        let record = &table.records()[0];
        assert_eq!(record.id, 4);
        assert_eq!(record.age, 0);
    }

    #[test]
    fn stored_average_is_overwritten_when_grades_present() {
        let text = file(&["1;A;a@b.c;p;ALUNO;c;T;1;10;10;10;3,33;ATIVO"]);
        let table = parse_roster(&text, InvalidNumberPolicy::CoerceToZero).expect("parse");
        assert_eq!(table.records()[0].average, 10.0);
    }

    #[test]
    fn stored_average_is_kept_when_a_grade_column_is_missing() {
        let text = "[USUARIOS]\nid;nome;np1;media\n1;A;9;3,5\n";
        let table = parse_roster(text, InvalidNumberPolicy::CoerceToZero).expect("parse");
        assert_eq!(table.records()[0].average, 3.5);
    }

    #[test]
    fn extra_fields_and_duplicate_ids_are_rejected() {
        let wide = file(&["1;A;a@b.c;p;ALUNO;c;T;1;1;1;1;1;ATIVO;extra"]);
        assert!(matches!(
            parse_roster(&wide, InvalidNumberPolicy::CoerceToZero),
            Err(CodecError::MalformedRow { line: 3, .. })
        ));

        let dup = file(&[
            "1;A;a@b.c;p;ALUNO;c;T;1;1;1;1;1;ATIVO",
            "1;B;b@b.c;p;ALUNO;c;T;1;1;1;1;1;ATIVO",
        ]);
        assert_eq!(
            parse_roster(&dup, InvalidNumberPolicy::CoerceToZero),
            Err(CodecError::DuplicateId { line: 4, id: 1 })
        );
    }

    #[test]
    fn short_rows_read_missing_fields_as_blank() {
        let text = file(&["5;A;a@b.c"]);
        let table = parse_roster(&text, InvalidNumberPolicy::CoerceToZero).expect("parse");
        let record = table.find(5).expect("record");
        assert_eq!(record.password, "");
        assert_eq!(record.score1, 0.0);
        assert_eq!(record.status, EnrollmentStatus::Other(String::new()));
    }

    #[test]
    fn serialize_writes_marker_header_and_comma_decimals() {
        let text = file(&["1;ANA;ana@b.c;p;ALUNO;ads;T1;20;8;6;10;7,6;ATIVO"]);
        let table = parse_roster(&text, InvalidNumberPolicy::CoerceToZero).expect("parse");
        let out = serialize_roster(&table);
        assert_eq!(
            out,
            format!("[USUARIOS]\r\n{HEADER}\r\n1;ANA;ana@b.c;p;ALUNO;ads;T1;20;8,00;6,00;10,00;7,60;ATIVO\r\n")
        );
    }

    #[test]
    fn serialize_blanks_absent_columns() {
        let text = "[USUARIOS]\nid;nome\n1;ana\n";
        let table = parse_roster(text, InvalidNumberPolicy::CoerceToZero).expect("parse");
        let out = serialize_roster(&table);
        assert!(out.ends_with("1;ANA;;;;;;;;;;;\r\n"));
    }

    #[test]
    fn text_with_separator_is_quoted_and_read_back() {
        let fields = split_fields("1;\"a;b\";\"say \"\"hi\"\"\";c").expect("split");
        assert_eq!(fields, ["1", "a;b", "say \"hi\"", "c"]);
        assert!(split_fields("1;\"open").is_err());
    }

    #[test]
    fn decimals_use_comma_and_non_finite_is_blank() {
        assert_eq!(format_decimal(7.6), "7,60");
        assert_eq!(format_decimal(0.0), "0,00");
        assert_eq!(format_decimal(f64::NAN), "");
    }
}
