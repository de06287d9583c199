//! Runtime working directories.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;

/// Directories the API writes into, relative to the project root.
#[derive(Debug, Clone)]
pub struct DirectoryScaffold {
    root: PathBuf,
    directories: Vec<PathBuf>,
}

/// What [`DirectoryScaffold::ensure`] did.
#[derive(Debug, Clone, Default)]
pub struct ScaffoldOutcome {
    /// Directories created by this call.
    pub created: Vec<PathBuf>,
    /// Directories that were already there.
    pub existing: Vec<PathBuf>,
    /// Directories that could not be created, with the reason.
    pub failed: Vec<(PathBuf, String)>,
}

/// Whether one scaffold directory is present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DirectoryStatus {
    pub path: PathBuf,
    pub present: bool,
}

impl DirectoryScaffold {
    pub fn new(root: &Path, directories: &[PathBuf]) -> Self {
        Self {
            root: root.to_path_buf(),
            directories: directories.to_vec(),
        }
    }

    /// Create every missing directory. Failures are collected, not returned.
    pub fn ensure(&self) -> ScaffoldOutcome {
        let mut outcome = ScaffoldOutcome::default();
        for dir in &self.directories {
            let absolute = self.root.join(dir);
            if absolute.is_dir() {
                outcome.existing.push(dir.clone());
                continue;
            }
            match fs::create_dir_all(&absolute) {
                Ok(()) => {
                    tracing::debug!("Created {}", absolute.display());
                    outcome.created.push(dir.clone());
                }
                Err(e) => {
                    tracing::debug!("Could not create {}: {}", absolute.display(), e);
                    outcome.failed.push((dir.clone(), e.to_string()));
                }
            }
        }
        outcome
    }

    /// Presence of each directory, without creating anything.
    pub fn status(&self) -> Vec<DirectoryStatus> {
        self.directories
            .iter()
            .map(|dir| DirectoryStatus {
                path: dir.clone(),
                present: self.root.join(dir).is_dir(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn dirs() -> Vec<PathBuf> {
        vec!["uploads".into(), "outputs".into(), "temp".into()]
    }

    #[test]
    fn creates_missing_directories() {
        let temp = TempDir::new().unwrap();
        let outcome = DirectoryScaffold::new(temp.path(), &dirs()).ensure();

        assert_eq!(outcome.created.len(), 3);
        assert!(outcome.failed.is_empty());
        assert!(temp.path().join("uploads").is_dir());
        assert!(temp.path().join("temp").is_dir());
    }

    #[test]
    fn second_ensure_creates_nothing() {
        let temp = TempDir::new().unwrap();
        let scaffold = DirectoryScaffold::new(temp.path(), &dirs());
        scaffold.ensure();
        let outcome = scaffold.ensure();

        assert!(outcome.created.is_empty());
        assert_eq!(outcome.existing.len(), 3);
    }

    #[test]
    fn file_in_the_way_is_reported_as_failure() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("uploads"), "not a directory").unwrap();

        let outcome = DirectoryScaffold::new(temp.path(), &dirs()).ensure();
        assert_eq!(outcome.failed.len(), 1);
        assert_eq!(outcome.failed[0].0, PathBuf::from("uploads"));
        assert_eq!(outcome.created.len(), 2);
    }

    #[test]
    fn status_reports_presence() {
        let temp = TempDir::new().unwrap();
        fs::create_dir(temp.path().join("outputs")).unwrap();

        let status = DirectoryScaffold::new(temp.path(), &dirs()).status();
        assert!(!status[0].present);
        assert!(status[1].present);
        assert!(!temp.path().join("uploads").exists());
    }
}
