//! Configuration file discovery and loading.
//!
//! The config file is optional. When no path is given explicitly, the
//! project root is searched for `.treeboot.yml`; if it is absent, defaults
//! are used.

use crate::config::schema::BootstrapConfig;
use crate::config::validator::validate;
use crate::error::{BootstrapError, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// File name of the project config.
pub const CONFIG_FILE_NAME: &str = ".treeboot.yml";

/// Find the project config at `<project_root>/.treeboot.yml`.
pub fn find_project_config(project_root: &Path) -> Option<PathBuf> {
    let path = project_root.join(CONFIG_FILE_NAME);
    if path.is_file() {
        Some(path)
    } else {
        None
    }
}

/// Load a single config file and parse it into BootstrapConfig.
///
/// # Errors
///
/// Returns `ConfigNotFound` if the file doesn't exist.
/// Returns `ConfigParseError` if the YAML is invalid.
pub fn load_config_file(path: &Path) -> Result<BootstrapConfig> {
    let content = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            BootstrapError::ConfigNotFound {
                path: path.to_path_buf(),
            }
        } else {
            BootstrapError::Io(e)
        }
    })?;

    parse_config(&content, path)
}

/// Parse YAML content into BootstrapConfig.
///
/// An empty document yields the defaults.
pub fn parse_config(content: &str, source_path: &Path) -> Result<BootstrapConfig> {
    if content.trim().is_empty() {
        return Ok(BootstrapConfig::default());
    }

    serde_yaml::from_str(content).map_err(|e| BootstrapError::ConfigParseError {
        path: source_path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Load and validate the configuration for a project.
///
/// An explicit path must exist. Without one, `.treeboot.yml` in the project
/// root is used when present and defaults otherwise.
pub fn load_config(project_root: &Path, explicit: Option<&Path>) -> Result<BootstrapConfig> {
    let path = match explicit {
        Some(p) if p.is_absolute() => Some(p.to_path_buf()),
        Some(p) => Some(project_root.join(p)),
        None => find_project_config(project_root),
    };

    let config = match path {
        Some(path) => {
            tracing::debug!("Loading config from {}", path.display());
            load_config_file(&path)?
        }
        None => {
            tracing::debug!("No {} found, using defaults", CONFIG_FILE_NAME);
            BootstrapConfig::default()
        }
    };

    validate(&config)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_project_config_uses_defaults() {
        let temp = TempDir::new().unwrap();
        let config = load_config(temp.path(), None).unwrap();
        assert_eq!(config, BootstrapConfig::default());
    }

    #[test]
    fn project_config_is_discovered() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join(CONFIG_FILE_NAME),
            "environment:\n  name: trees\n",
        )
        .unwrap();

        let config = load_config(temp.path(), None).unwrap();
        assert_eq!(config.environment.name, "trees");
    }

    #[test]
    fn explicit_missing_config_is_an_error() {
        let temp = TempDir::new().unwrap();
        let result = load_config(temp.path(), Some(Path::new("nope.yml")));
        assert!(matches!(result, Err(BootstrapError::ConfigNotFound { .. })));
    }

    #[test]
    fn explicit_relative_path_resolves_against_project_root() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("custom.yml"), "tool:\n  executable: mamba\n").unwrap();

        let config = load_config(temp.path(), Some(Path::new("custom.yml"))).unwrap();
        assert_eq!(config.tool.executable, "mamba");
    }

    #[test]
    fn invalid_yaml_reports_path() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "environment: [unclosed").unwrap();

        match load_config(temp.path(), None) {
            Err(BootstrapError::ConfigParseError { path: p, .. }) => assert_eq!(p, path),
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn empty_file_yields_defaults() {
        let config = parse_config("  \n", Path::new("x.yml")).unwrap();
        assert_eq!(config, BootstrapConfig::default());
    }

    #[test]
    fn invalid_values_fail_validation() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join(CONFIG_FILE_NAME),
            "environment:\n  name: \"\"\n",
        )
        .unwrap();

        let result = load_config(temp.path(), None);
        assert!(matches!(
            result,
            Err(BootstrapError::ConfigValidationError { .. })
        ));
    }
}
