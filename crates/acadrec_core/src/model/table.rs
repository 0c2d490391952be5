//! In-memory roster table.
//!
//! # Responsibility
//! - Hold the typed column set and the rows loaded from the backing file.
//! - Offer id-keyed lookup, insertion and removal for service callers.
//!
//! # Invariants
//! - `id` is unique across `records`; `push` rejects duplicates.
//! - `columns` never contains the same column twice.

use crate::model::column::Column;
use crate::model::record::Record;

/// Typed, column-aware roster table.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RosterTable {
    header: Vec<String>,
    columns: Vec<Column>,
    records: Vec<Record>,
}

impl RosterTable {
    /// Builds a normalized table. The header mirrors the internal names.
    pub fn new(columns: Vec<Column>, records: Vec<Record>) -> Self {
        let columns = dedup_columns(columns);
        let header = columns
            .iter()
            .map(|column| column.internal_name().to_string())
            .collect();
        Self {
            header,
            columns,
            records,
        }
    }

    /// Builds a row-less table that keeps the raw header names verbatim.
    ///
    /// This is what loading a header-only section yields: the header text is
    /// not upper-cased or renamed, but the typed column set is still resolved
    /// so later inserts know which fields the file carries.
    pub fn header_only(raw_header: Vec<String>) -> Self {
        let columns = dedup_columns(
            raw_header
                .iter()
                .filter_map(|name| Column::from_header(name))
                .collect(),
        );
        Self {
            header: raw_header,
            columns,
            records: Vec::new(),
        }
    }

    /// Table with the full schema and no rows.
    pub fn with_all_columns() -> Self {
        Self::new(Column::ALL.to_vec(), Vec::new())
    }

    /// True when there is nothing to show or save: no rows or no columns.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty() || self.columns.is_empty()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Column names as displayed (internal names, or raw header text for a
    /// header-only load).
    pub fn header(&self) -> &[String] {
        &self.header
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn has_column(&self, column: Column) -> bool {
        self.columns.contains(&column)
    }

    pub fn has_columns(&self, columns: &[Column]) -> bool {
        columns.iter().all(|column| self.has_column(*column))
    }

    /// Whether the header is in normalized (internal name) form.
    pub fn is_normalized(&self) -> bool {
        self.header.len() == self.columns.len()
            && self
                .header
                .iter()
                .zip(&self.columns)
                .all(|(name, column)| name == column.internal_name())
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn find(&self, id: i64) -> Option<&Record> {
        self.records.iter().find(|record| record.id == id)
    }

    pub fn find_mut(&mut self, id: i64) -> Option<&mut Record> {
        self.records.iter_mut().find(|record| record.id == id)
    }

    /// Next free id: `max(id) + 1`, or 1 for an empty table. `None` once the
    /// largest id is `i64::MAX`.
    pub fn next_id(&self) -> Option<i64> {
        match self.records.iter().map(|record| record.id).max() {
            Some(max) => max.checked_add(1),
            None => Some(1),
        }
    }

    /// Adds the `columns` the table does not carry yet.
    pub fn add_columns(&mut self, columns: &[Column]) {
        for column in columns {
            if !self.has_column(*column) {
                self.columns.push(*column);
                self.header.push(column.internal_name().to_string());
            }
        }
    }

    /// Appends one row. Returns the row back when its id is already taken.
    pub fn push(&mut self, record: Record) -> Result<(), Record> {
        if self.find(record.id).is_some() {
            return Err(record);
        }
        self.records.push(record);
        Ok(())
    }

    /// Removes the row with `id`, returning it.
    pub fn remove(&mut self, id: i64) -> Option<Record> {
        let index = self.records.iter().position(|record| record.id == id)?;
        Some(self.records.remove(index))
    }

    /// Keeps only the rows matching `keep`.
    pub fn retain(&mut self, keep: impl FnMut(&Record) -> bool) {
        self.records.retain(keep);
    }

    /// Drops `hidden` columns and blanks those fields in every row.
    pub fn hide_columns(&mut self, hidden: &[Column]) {
        if hidden.is_empty() {
            return;
        }
        let mut kept_header = Vec::with_capacity(self.header.len());
        for name in self.header.drain(..) {
            let is_hidden =
                Column::from_header(&name).is_some_and(|column| hidden.contains(&column));
            if !is_hidden {
                kept_header.push(name);
            }
        }
        self.header = kept_header;
        self.columns.retain(|column| !hidden.contains(column));
        for record in &mut self.records {
            for column in hidden {
                record.clear(*column);
            }
        }
    }
}

fn dedup_columns(columns: Vec<Column>) -> Vec<Column> {
    let mut unique = Vec::with_capacity(columns.len());
    for column in columns {
        if !unique.contains(&column) {
            unique.push(column);
        }
    }
    unique
}
