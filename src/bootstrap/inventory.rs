//! Model weight inventory.
//!
//! Counts weight files directly under `<root>/<category>`. Subdirectories
//! are not searched and the count never gates the run.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::config::ModelConfig;
use crate::error::Result;

/// Weight files found for one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryCount {
    /// Category name (`summer`, `winter`).
    pub category: String,
    /// Directory, relative to the project root.
    pub directory: PathBuf,
    /// Whether the directory exists.
    pub present: bool,
    /// Number of weight files directly inside it.
    pub count: usize,
    /// Why the directory could not be created or read.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CategoryCount {
    fn new(category: &str, directory: PathBuf) -> Self {
        Self {
            category: category.to_string(),
            directory,
            present: false,
            count: 0,
            error: None,
        }
    }

    fn counted(mut self, absolute: &Path, extension: &str) -> Self {
        self.present = absolute.is_dir();
        if self.present {
            match count_weights(absolute, extension) {
                Ok(count) => self.count = count,
                Err(e) => self.error = Some(e.to_string()),
            }
        }
        self
    }
}

/// Per-category weight file counts.
///
/// Failures are kept per category so one unreadable directory never hides
/// the others.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ModelInventory {
    pub categories: Vec<CategoryCount>,
}

impl ModelInventory {
    /// Count weight files without touching the filesystem layout.
    pub fn scan(project_root: &Path, config: &ModelConfig) -> Self {
        let categories = config
            .categories
            .iter()
            .map(|category| {
                let directory = config.root.join(category);
                let absolute = project_root.join(&directory);
                CategoryCount::new(category, directory).counted(&absolute, &config.extension)
            })
            .collect();
        Self { categories }
    }

    /// Create any missing category directories, then count.
    pub fn ensure(project_root: &Path, config: &ModelConfig) -> Self {
        let categories = config
            .categories
            .iter()
            .map(|category| {
                let directory = config.root.join(category);
                let absolute = project_root.join(&directory);
                let entry = CategoryCount::new(category, directory);
                if absolute.is_dir() {
                    return entry.counted(&absolute, &config.extension);
                }
                match fs::create_dir_all(&absolute) {
                    Ok(()) => {
                        tracing::debug!("Created {}", absolute.display());
                        entry.counted(&absolute, &config.extension)
                    }
                    Err(e) => {
                        tracing::debug!("Could not create {}: {}", absolute.display(), e);
                        CategoryCount {
                            error: Some(e.to_string()),
                            ..entry
                        }
                    }
                }
            })
            .collect();
        Self { categories }
    }

    /// Categories that could not be created or read.
    pub fn failed(&self) -> impl Iterator<Item = &CategoryCount> {
        self.categories.iter().filter(|c| c.error.is_some())
    }

    /// Categories with no weight files.
    pub fn empty(&self) -> impl Iterator<Item = &CategoryCount> {
        self.categories.iter().filter(|c| c.count == 0)
    }

    /// Weight files across all categories.
    pub fn total(&self) -> usize {
        self.categories.iter().map(|c| c.count).sum()
    }

    /// Count for one category.
    pub fn count(&self, category: &str) -> Option<usize> {
        self.categories
            .iter()
            .find(|c| c.category == category)
            .map(|c| c.count)
    }
}

fn count_weights(dir: &Path, extension: &str) -> Result<usize> {
    let mut count = 0;
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        let matches = path
            .extension()
            .map(|ext| ext == extension)
            .unwrap_or(false);
        if matches && path.is_file() {
            count += 1;
        }
    }
    Ok(count)
}

/// Shell command that puts a weight file where the API looks for it.
pub fn copy_hint(category: &CategoryCount, extension: &str) -> String {
    format!(
        "cp /path/to/your/model.{ext} {}/best.{ext}",
        category.directory.display(),
        ext = extension
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn ensure_creates_category_directories() {
        let temp = TempDir::new().unwrap();
        let inventory = ModelInventory::ensure(temp.path(), &ModelConfig::default());

        assert!(temp.path().join("models/summer").is_dir());
        assert!(temp.path().join("models/winter").is_dir());
        assert_eq!(inventory.total(), 0);
        assert_eq!(inventory.empty().count(), 2);
    }

    #[test]
    fn scan_does_not_create_directories() {
        let temp = TempDir::new().unwrap();
        let inventory = ModelInventory::scan(temp.path(), &ModelConfig::default());

        assert!(!temp.path().join("models").exists());
        assert!(inventory.categories.iter().all(|c| !c.present));
    }

    #[test]
    fn counts_only_matching_files_at_top_level() {
        let temp = TempDir::new().unwrap();
        let summer = temp.path().join("models/summer");
        fs::create_dir_all(summer.join("archive")).unwrap();
        fs::write(summer.join("best.pt"), "").unwrap();
        fs::write(summer.join("last.pt"), "").unwrap();
        fs::write(summer.join("notes.txt"), "").unwrap();
        fs::write(summer.join("archive/old.pt"), "").unwrap();

        let inventory = ModelInventory::ensure(temp.path(), &ModelConfig::default());
        assert_eq!(inventory.count("summer"), Some(2));
        assert_eq!(inventory.count("winter"), Some(0));
        assert_eq!(inventory.count("autumn"), None);
    }

    #[test]
    fn blocked_category_does_not_stop_the_others() {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("models")).unwrap();
        fs::write(temp.path().join("models/summer"), "not a directory").unwrap();

        let inventory = ModelInventory::ensure(temp.path(), &ModelConfig::default());

        assert!(temp.path().join("models/winter").is_dir());
        let failed: Vec<_> = inventory.failed().map(|c| c.category.as_str()).collect();
        assert_eq!(failed, vec!["summer"]);
        assert_eq!(inventory.count("summer"), Some(0));
        assert_eq!(inventory.empty().count(), 2);
    }

    #[test]
    fn directory_named_like_weight_is_not_counted() {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("models/winter/fake.pt")).unwrap();

        let inventory = ModelInventory::scan(temp.path(), &ModelConfig::default());
        assert_eq!(inventory.count("winter"), Some(0));
    }

    #[test]
    fn copy_hint_targets_category_directory() {
        let category = CategoryCount {
            category: "summer".into(),
            directory: PathBuf::from("models").join("summer"),
            present: true,
            count: 0,
            error: None,
        };
        let hint = copy_hint(&category, "pt");
        assert!(hint.starts_with("cp /path/to/your/model.pt "));
        assert!(hint.ends_with("best.pt"));
        assert!(hint.contains("summer"));
    }
}
