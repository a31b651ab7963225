//! Undo log for file placement

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::error::{ClassifierError, Result};
use crate::placement::{move_file, MoveRecord};

/// Outcome of a rollback
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollbackResult {
    pub success_count: usize,
    pub failed_count: usize,
    /// Paths that could not be restored
    pub failed_files: Vec<PathBuf>,
}

/// Records moves and created folders so they can be reverted
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RollbackManager {
    records: Vec<MoveRecord>,
    created_folders: Vec<PathBuf>,
}

impl RollbackManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_move(&mut self, record: MoveRecord) {
        self.records.push(record);
    }

    pub fn record_folder_creation(&mut self, folder: impl Into<PathBuf>) {
        let folder = folder.into();
        if !self.created_folders.contains(&folder) {
            self.created_folders.push(folder);
        }
    }

    pub fn records(&self) -> &[MoveRecord] {
        &self.records
    }

    pub fn created_folders(&self) -> &[PathBuf] {
        &self.created_folders
    }

    pub fn has_records(&self) -> bool {
        !self.records.is_empty()
    }

    pub fn record_count(&self) -> usize {
        self.records.len()
    }

    pub fn clear(&mut self) {
        self.records.clear();
        self.created_folders.clear();
    }

    /// Move every recorded file back, newest move first.
    ///
    /// A record fails when its moved file is gone or something already
    /// occupies its original location. Created folders left empty are then
    /// removed deepest first. The manager is empty afterwards.
    pub fn rollback(&mut self) -> RollbackResult {
        let mut result = RollbackResult::default();

        let mut records: Vec<&MoveRecord> = self.records.iter().rev().collect();
        records.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));

        for record in records {
            match restore(record) {
                Ok(()) => result.success_count += 1,
                Err(failed) => {
                    warn!(path = %failed.display(), "cannot restore file");
                    result.failed_count += 1;
                    result.failed_files.push(failed);
                }
            }
        }

        let mut folders: Vec<&PathBuf> = self.created_folders.iter().collect();
        folders.sort_by_key(|folder| std::cmp::Reverse(folder.components().count()));
        for folder in folders {
            remove_if_empty(folder);
        }

        info!(
            restored = result.success_count,
            failed = result.failed_count,
            "rollback finished"
        );

        self.clear();
        result
    }

    /// Write the log as JSON
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| ClassifierError::config("cannot serialize undo log", e))?;
        std::fs::write(path, json).map_err(|e| {
            ClassifierError::file_operation(format!("cannot write {}", path.display()), e)
        })
    }

    /// Read a log written by [`RollbackManager::save`]
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ClassifierError::file_operation(format!("cannot read {}", path.display()), e)
        })?;
        serde_json::from_str(&content).map_err(|e| {
            ClassifierError::config(format!("cannot parse undo log {}", path.display()), e)
        })
    }
}

/// Restore one move, returning the offending path on failure
fn restore(record: &MoveRecord) -> std::result::Result<(), PathBuf> {
    if !record.destination.exists() {
        return Err(record.destination.clone());
    }

    if let Some(parent) = record.source.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent).map_err(|_| record.destination.clone())?;
        }
    }

    if record.source.exists() {
        return Err(record.source.clone());
    }

    move_file(&record.destination, &record.source).map_err(|_| record.destination.clone())
}

fn remove_if_empty(folder: &Path) {
    let is_empty = std::fs::read_dir(folder)
        .map(|mut entries| entries.next().is_none())
        .unwrap_or(false);
    if is_empty {
        if let Err(e) = std::fs::remove_dir(folder) {
            warn!(path = %folder.display(), error = %e, "cannot remove folder");
        }
    }
}
