//! Fixed file locations.
//!
//! There is no environment or command-line configuration; every path is a
//! constant relative to the working directory, or to an explicit base
//! directory via `AppConfig::rooted_at`.

use crate::repo::roster_repo::FlatFileRosterRepository;
use crate::service::consent::ConsentMarker;
use crate::service::coursework::CourseworkStore;
use std::path::{Path, PathBuf};

pub const DATA_FILE: &str = "Output/SistemaAcademico.csv";
pub const COURSEWORK_DIR: &str = "atividades";
pub const CONSENT_FILE: &str = "lgpd_consent.txt";
pub const BACKUP_DIR: &str = "backups";

/// Resolved locations of every file the application touches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub data_file: PathBuf,
    pub coursework_dir: PathBuf,
    pub consent_file: PathBuf,
    pub backup_dir: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_file: PathBuf::from(DATA_FILE),
            coursework_dir: PathBuf::from(COURSEWORK_DIR),
            consent_file: PathBuf::from(CONSENT_FILE),
            backup_dir: PathBuf::from(BACKUP_DIR),
        }
    }
}

impl AppConfig {
    /// The default layout placed under `base`.
    pub fn rooted_at(base: &Path) -> Self {
        Self {
            data_file: base.join(DATA_FILE),
            coursework_dir: base.join(COURSEWORK_DIR),
            consent_file: base.join(CONSENT_FILE),
            backup_dir: base.join(BACKUP_DIR),
        }
    }

    pub fn roster_repository(&self) -> FlatFileRosterRepository {
        FlatFileRosterRepository::new(&self.data_file)
    }

    pub fn coursework_store(&self) -> CourseworkStore {
        CourseworkStore::new(&self.coursework_dir)
    }

    pub fn consent_marker(&self) -> ConsentMarker {
        ConsentMarker::new(&self.consent_file)
    }
}

#[cfg(test)]
mod tests {
    use super::AppConfig;
    use std::path::Path;

    #[test]
    fn defaults_are_relative_constants() {
        let config = AppConfig::default();
        assert_eq!(config.data_file, Path::new("Output/SistemaAcademico.csv"));
        assert_eq!(config.backup_dir, Path::new("backups"));
    }

    #[test]
    fn rooted_config_joins_base() {
        let config = AppConfig::rooted_at(Path::new("/srv/escola"));
        assert_eq!(
            config.data_file,
            Path::new("/srv/escola/Output/SistemaAcademico.csv")
        );
        assert_eq!(config.coursework_store().root(), Path::new("/srv/escola/atividades"));
        assert_eq!(
            config.consent_marker().path(),
            Path::new("/srv/escola/lgpd_consent.txt")
        );
    }
}
