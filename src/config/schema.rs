//! Configuration schema definitions for treeboot.
//!
//! This module contains the struct definitions that map to the optional
//! `.treeboot.yml` file. Every field has a default, so an absent file or a
//! partial file both produce a complete configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure for `.treeboot.yml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BootstrapConfig {
    /// Environment-management tool settings
    pub tool: ToolConfig,

    /// The isolated environment to provision
    pub environment: EnvironmentConfig,

    /// Import smoke tests run inside the environment
    pub dependencies: DependencyConfig,

    /// Model weight layout
    pub models: ModelConfig,

    /// Working directories the API writes into
    pub scaffold: Vec<PathBuf>,

    /// Values shown in the completion banner
    pub server: ServerConfig,
}

impl Default for BootstrapConfig {
    fn default() -> Self {
        Self {
            tool: ToolConfig::default(),
            environment: EnvironmentConfig::default(),
            dependencies: DependencyConfig::default(),
            models: ModelConfig::default(),
            scaffold: default_scaffold(),
            server: ServerConfig::default(),
        }
    }
}

/// Environment-management tool settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolConfig {
    /// Executable name looked up on PATH
    pub executable: String,

    /// Script suggested when the tool is missing
    pub fallback_script: String,
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            executable: "conda".to_string(),
            fallback_script: "setup_pip.sh".to_string(),
        }
    }
}

/// The isolated environment to provision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvironmentConfig {
    /// Environment name
    pub name: String,

    /// Declarative spec file, relative to the project root
    pub spec_file: PathBuf,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            name: "tree-detection".to_string(),
            spec_file: PathBuf::from("environment.yml"),
        }
    }
}

/// Import smoke tests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DependencyConfig {
    /// Library whose failure aborts with a spec-file hint
    pub critical: CriticalDependency,

    /// Modules imported together as one batch
    pub secondary: Vec<String>,
}

impl Default for DependencyConfig {
    fn default() -> Self {
        Self {
            critical: CriticalDependency::default(),
            secondary: ["flask", "torch", "ultralytics", "rasterio"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

/// The critical (geospatial) dependency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CriticalDependency {
    /// Display name
    pub label: String,

    /// Python import statement
    pub import: String,

    /// Python expression evaluating to the version string
    pub version_expr: String,
}

impl Default for CriticalDependency {
    fn default() -> Self {
        Self {
            label: "GDAL".to_string(),
            import: "from osgeo import gdal".to_string(),
            version_expr: "gdal.__version__".to_string(),
        }
    }
}

impl CriticalDependency {
    /// Python snippet that imports the library and prints its version.
    pub fn probe_script(&self) -> String {
        format!("{}; print({})", self.import, self.version_expr)
    }
}

/// Model weight layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Root directory holding one subdirectory per category
    pub root: PathBuf,

    /// Seasonal categories
    pub categories: Vec<String>,

    /// Weight file extension, without the dot
    pub extension: String,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("models"),
            categories: vec!["summer".to_string(), "winter".to_string()],
            extension: "pt".to_string(),
        }
    }
}

/// Values shown in the completion banner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Script that starts the API
    pub entrypoint: String,

    /// Local port the API listens on
    pub port: u16,

    /// Health endpoint path
    pub health_path: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            entrypoint: "run.py".to_string(),
            port: 5003,
            health_path: "/health".to_string(),
        }
    }
}

impl ServerConfig {
    /// URL of the health endpoint on localhost.
    pub fn health_url(&self) -> String {
        format!("http://localhost:{}{}", self.port, self.health_path)
    }
}

fn default_scaffold() -> Vec<PathBuf> {
    ["uploads", "outputs", "temp"]
        .iter()
        .map(PathBuf::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_api_layout() {
        let config = BootstrapConfig::default();
        assert_eq!(config.tool.executable, "conda");
        assert_eq!(config.environment.name, "tree-detection");
        assert_eq!(config.environment.spec_file, PathBuf::from("environment.yml"));
        assert_eq!(config.models.categories, vec!["summer", "winter"]);
        assert_eq!(config.models.extension, "pt");
        assert_eq!(config.server.port, 5003);
    }

    #[test]
    fn default_scaffold_has_three_directories() {
        let config = BootstrapConfig::default();
        assert_eq!(
            config.scaffold,
            vec![
                PathBuf::from("uploads"),
                PathBuf::from("outputs"),
                PathBuf::from("temp")
            ]
        );
    }

    #[test]
    fn partial_yaml_keeps_defaults() {
        let yaml = "environment:\n  name: trees-dev\n";
        let config: BootstrapConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.environment.name, "trees-dev");
        assert_eq!(config.environment.spec_file, PathBuf::from("environment.yml"));
        assert_eq!(config.scaffold.len(), 3);
        assert_eq!(config.dependencies.secondary.len(), 4);
    }

    #[test]
    fn critical_probe_script_prints_version() {
        let dep = CriticalDependency::default();
        assert_eq!(
            dep.probe_script(),
            "from osgeo import gdal; print(gdal.__version__)"
        );
    }

    #[test]
    fn health_url_uses_port_and_path() {
        let server = ServerConfig::default();
        assert_eq!(server.health_url(), "http://localhost:5003/health");
    }
}
