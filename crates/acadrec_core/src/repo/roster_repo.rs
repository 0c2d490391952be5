//! Roster repository contract and flat-file implementation.
//!
//! # Responsibility
//! - Load the roster table from the backing file.
//! - Overwrite the backing file from a table and reload it.
//! - Copy the backing file into a timestamped backup.
//!
//! # Invariants
//! - Save never appends; the file is rewritten in full.
//! - Save refuses an empty table and never touches the file in that case.
//! - A save is reported successful only after the reload succeeds.

use crate::model::table::RosterTable;
use crate::repo::roster_codec::{parse_roster, serialize_roster, InvalidNumberPolicy};
use crate::repo::{StoreError, StoreResult};
use chrono::Local;
use log::{error, info};
use std::path::{Path, PathBuf};
use std::time::Instant;

const BACKUP_STAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Repository interface for whole-table roster persistence.
pub trait RosterRepository {
    /// Reads the whole roster.
    fn load(&self) -> StoreResult<RosterTable>;
    /// Overwrites the roster and returns the reloaded, canonical table.
    fn save(&self, table: &RosterTable) -> StoreResult<RosterTable>;
}

/// Roster repository backed by one sectioned text file.
#[derive(Debug, Clone)]
pub struct FlatFileRosterRepository {
    path: PathBuf,
    number_policy: InvalidNumberPolicy,
}

impl FlatFileRosterRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            number_policy: InvalidNumberPolicy::default(),
        }
    }

    /// Overrides how non-numeric text in numeric columns is handled.
    pub fn with_number_policy(mut self, policy: InvalidNumberPolicy) -> Self {
        self.number_policy = policy;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn number_policy(&self) -> InvalidNumberPolicy {
        self.number_policy
    }

    /// Copies the backing file to `<dir>/<stem>_backup_<YYYYmmdd_HHMMSS>.<ext>`.
    ///
    /// Returns the backup path.
    pub fn backup_to(&self, dir: &Path) -> StoreResult<PathBuf> {
        if !self.path.exists() {
            return Err(StoreError::NotFound(self.path.clone()));
        }
        std::fs::create_dir_all(dir).map_err(|err| StoreError::io(dir, err))?;

        let stem = self
            .path
            .file_stem()
            .and_then(|value| value.to_str())
            .unwrap_or("roster");
        let stamp = Local::now().format(BACKUP_STAMP_FORMAT);
        let file_name = match self.path.extension().and_then(|value| value.to_str()) {
            Some(ext) => format!("{stem}_backup_{stamp}.{ext}"),
            None => format!("{stem}_backup_{stamp}"),
        };
        let target = dir.join(file_name);

        std::fs::copy(&self.path, &target).map_err(|err| StoreError::io(&target, err))?;
        info!(
            "event=roster_backup module=repo status=ok target={}",
            target.display()
        );
        Ok(target)
    }

    fn read_text(&self) -> StoreResult<String> {
        let bytes = std::fs::read(&self.path).map_err(|err| StoreError::io(&self.path, err))?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

impl RosterRepository for FlatFileRosterRepository {
    fn load(&self) -> StoreResult<RosterTable> {
        let started_at = Instant::now();
        if !self.path.exists() {
            error!(
                "event=roster_load module=repo status=error error_code=not_found path={}",
                self.path.display()
            );
            return Err(StoreError::NotFound(self.path.clone()));
        }

        let result = self.read_text().and_then(|text| {
            parse_roster(&text, self.number_policy)
                .map_err(|err| StoreError::from_codec(self.path.clone(), err))
        });

        match &result {
            Ok(table) => info!(
                "event=roster_load module=repo status=ok rows={} duration_ms={}",
                table.len(),
                started_at.elapsed().as_millis()
            ),
            Err(err) => error!(
                "event=roster_load module=repo status=error duration_ms={} error={}",
                started_at.elapsed().as_millis(),
                err
            ),
        }
        result
    }

    fn save(&self, table: &RosterTable) -> StoreResult<RosterTable> {
        let started_at = Instant::now();
        if table.is_empty() {
            error!("event=roster_save module=repo status=error error_code=empty_table");
            return Err(StoreError::EmptyTable);
        }

        if let Some(parent) = self.path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|err| StoreError::io(parent, err))?;
        }
        let text = serialize_roster(table);
        if let Err(err) = std::fs::write(&self.path, text) {
            error!(
                "event=roster_save module=repo status=error error_code=write_failed error={}",
                err
            );
            return Err(StoreError::io(&self.path, err));
        }

        let reloaded = self
            .load()
            .map_err(|err| StoreError::ReloadFailed(Box::new(err)))?;
        info!(
            "event=roster_save module=repo status=ok rows={} duration_ms={}",
            reloaded.len(),
            started_at.elapsed().as_millis()
        );
        Ok(reloaded)
    }
}
