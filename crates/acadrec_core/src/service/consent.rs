//! One-time data-protection notice marker.

use crate::service::{ServiceError, ServiceResult};
use log::info;
use std::path::{Path, PathBuf};

const ACCEPTED_CONTENT: &str = "accepted";

/// Sentinel file whose existence records that the notice was accepted.
#[derive(Debug, Clone)]
pub struct ConsentMarker {
    path: PathBuf,
}

impl ConsentMarker {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the notice was already accepted. Content is ignored.
    pub fn is_granted(&self) -> bool {
        self.path.exists()
    }

    /// Records acceptance. Granting twice is harmless.
    pub fn grant(&self) -> ServiceResult<()> {
        if let Some(parent) = self.path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|err| ServiceError::io(parent, err))?;
        }
        std::fs::write(&self.path, ACCEPTED_CONTENT)
            .map_err(|err| ServiceError::io(&self.path, err))?;
        info!(
            "event=consent_grant module=service status=ok path={}",
            self.path.display()
        );
        Ok(())
    }
}
