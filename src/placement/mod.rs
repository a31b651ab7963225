//! Moving classified images into category folders, and undoing it
//!
//! [`CategoryManager`] performs the moves and reports a [`MoveRecord`] for
//! each; [`RollbackManager`] keeps those records (and the folders created
//! for them) so a run can be reverted, including from a saved undo log.

pub mod category_manager;
pub mod rollback;

pub use category_manager::CategoryManager;
pub use rollback::{RollbackManager, RollbackResult};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{ClassifierError, Result};

/// One file move
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveRecord {
    /// Where the file was before the move
    pub source: PathBuf,
    /// Where the file is now
    pub destination: PathBuf,
    pub timestamp: DateTime<Utc>,
}

/// Rename `from` to `to`, falling back to copy and delete when the rename
/// is refused (e.g. across file systems).
pub(crate) fn move_file(from: &Path, to: &Path) -> Result<()> {
    match std::fs::rename(from, to) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() != ErrorKind::NotFound && from.is_file() => {
            debug!(from = %from.display(), error = %e, "rename failed, copying instead");
            std::fs::copy(from, to).map_err(|e| {
                ClassifierError::file_operation(
                    format!("cannot copy {} to {}", from.display(), to.display()),
                    e,
                )
            })?;
            std::fs::remove_file(from).map_err(|e| {
                ClassifierError::file_operation(format!("cannot remove {}", from.display()), e)
            })
        }
        Err(e) => Err(ClassifierError::file_operation(
            format!("cannot move {} to {}", from.display(), to.display()),
            e,
        )),
    }
}
