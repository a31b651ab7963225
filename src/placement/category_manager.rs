use chrono::Utc;
use std::ffi::OsStr;
use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{ClassifierError, Result};
use crate::placement::{move_file, MoveRecord};

/// Creates category folders under a base directory and moves images into them
#[derive(Debug, Clone)]
pub struct CategoryManager {
    base_path: PathBuf,
    created_folders: Vec<PathBuf>,
}

impl CategoryManager {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
            created_folders: Vec::new(),
        }
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Folders this manager created, in creation order
    pub fn created_folders(&self) -> &[PathBuf] {
        &self.created_folders
    }

    /// Folder of `category` under the base path
    pub fn category_path(&self, category: &str) -> PathBuf {
        self.base_path.join(category)
    }

    /// Create one folder per category, returning the ones that did not exist
    pub fn create_category_folders<S: AsRef<str>>(&mut self, categories: &[S]) -> Result<Vec<PathBuf>> {
        let mut created = Vec::new();
        for category in categories {
            if let Some(folder) = self.ensure_folder(category.as_ref())? {
                created.push(folder);
            }
        }
        Ok(created)
    }

    /// Move `source` into the folder of `category`.
    ///
    /// An existing file of the same name is never overwritten; the moved file
    /// becomes `stem_1.ext`, `stem_2.ext`, ... instead.
    pub fn move_image(&mut self, source: &Path, category: &str) -> Result<MoveRecord> {
        if !source.is_file() {
            return Err(ClassifierError::file_operation(
                format!("source file missing: {}", source.display()),
                io::Error::new(ErrorKind::NotFound, "source file missing"),
            ));
        }

        self.ensure_folder(category)?;

        let file_name = source.file_name().ok_or_else(|| {
            ClassifierError::invalid("source", source.display())
        })?;
        let destination = resolve_conflict(self.category_path(category).join(file_name));

        move_file(source, &destination)?;
        debug!(from = %source.display(), to = %destination.display(), "moved image");

        Ok(MoveRecord {
            source: source.to_path_buf(),
            destination,
            timestamp: Utc::now(),
        })
    }

    fn ensure_folder(&mut self, category: &str) -> Result<Option<PathBuf>> {
        let folder = self.category_path(category);
        if folder.exists() {
            return Ok(None);
        }

        std::fs::create_dir_all(&folder).map_err(|e| {
            ClassifierError::file_operation(format!("cannot create {}", folder.display()), e)
        })?;
        self.created_folders.push(folder.clone());
        Ok(Some(folder))
    }
}

/// First of `path`, `stem_1.ext`, `stem_2.ext`, ... that does not exist
fn resolve_conflict(path: PathBuf) -> PathBuf {
    if !path.exists() {
        return path;
    }

    let stem = path.file_stem().unwrap_or_default().to_os_string();
    let extension = path.extension().map(OsStr::to_os_string);
    let parent = path.parent().map(Path::to_path_buf).unwrap_or_default();

    (1..)
        .map(|counter| {
            let mut name = stem.clone();
            name.push(format!("_{counter}"));
            if let Some(extension) = &extension {
                name.push(".");
                name.push(extension);
            }
            parent.join(name)
        })
        .find(|candidate| !candidate.exists())
        .unwrap_or(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_create_category_folders() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir(dir.path().join("existing")).unwrap();
        let mut manager = CategoryManager::new(dir.path());

        let created = manager
            .create_category_folders(&["existing", "high-key-warm-vivid"])
            .unwrap();

        assert_eq!(created, vec![dir.path().join("high-key-warm-vivid")]);
        assert_eq!(manager.created_folders(), created.as_slice());
        assert!(dir.path().join("high-key-warm-vivid").is_dir());
    }

    #[test]
    fn test_move_image_into_category() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("photo.jpg");
        std::fs::write(&source, b"jpeg").unwrap();
        let mut manager = CategoryManager::new(dir.path().join("sorted"));

        let record = manager.move_image(&source, "low-key-cool-muted").unwrap();

        assert_eq!(record.source, source);
        assert_eq!(record.destination, dir.path().join("sorted/low-key-cool-muted/photo.jpg"));
        assert!(!source.exists());
        assert!(record.destination.exists());
        assert_eq!(manager.created_folders().len(), 1);
    }

    #[test]
    fn test_name_collisions_get_suffixes() {
        let dir = TempDir::new().unwrap();
        let mut manager = CategoryManager::new(dir.path().join("sorted"));

        let mut destinations = Vec::new();
        for sub in ["a", "b", "c"] {
            std::fs::create_dir(dir.path().join(sub)).unwrap();
            let source = dir.path().join(sub).join("photo.jpg");
            std::fs::write(&source, sub).unwrap();
            destinations.push(manager.move_image(&source, "cat").unwrap().destination);
        }

        let folder = dir.path().join("sorted/cat");
        assert_eq!(
            destinations,
            vec![folder.join("photo.jpg"), folder.join("photo_1.jpg"), folder.join("photo_2.jpg")]
        );
        assert_eq!(std::fs::read_to_string(folder.join("photo_2.jpg")).unwrap(), "c");
    }

    #[cfg(unix)]
    #[test]
    fn test_collision_keeps_non_utf8_stem() {
        use std::os::unix::ffi::OsStrExt;

        let dir = TempDir::new().unwrap();
        let folder = dir.path().join("cat");
        std::fs::create_dir(&folder).unwrap();
        let name = OsStr::from_bytes(b"ph\xf6to.jpg");
        std::fs::write(folder.join(name), "first").unwrap();

        let resolved = resolve_conflict(folder.join(name));
        assert_eq!(resolved.file_name(), Some(OsStr::from_bytes(b"ph\xf6to_1.jpg")));
    }

    #[test]
    fn test_missing_source_fails() {
        let dir = TempDir::new().unwrap();
        let mut manager = CategoryManager::new(dir.path());
        let err = manager.move_image(&dir.path().join("nope.jpg"), "cat").unwrap_err();
        assert!(matches!(err, ClassifierError::FileOperationError { .. }));
        assert!(manager.created_folders().is_empty());
    }

    #[test]
    fn test_resolve_conflict_without_extension() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("README");
        std::fs::write(&path, "x").unwrap();
        assert_eq!(resolve_conflict(path), dir.path().join("README_1"));
    }
}
