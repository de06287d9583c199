//! Configuration loading, parsing, and validation for treeboot.
//!
//! - Schema definitions in [`schema`]
//! - File discovery and loading in [`loader`]
//! - Validation in [`validator`]
//!
//! # Example
//!
//! ```
//! use treeboot::config::load_config;
//! use tempfile::TempDir;
//! use std::fs;
//!
//! let temp = TempDir::new().unwrap();
//! fs::write(temp.path().join(".treeboot.yml"), "environment:\n  name: trees\n").unwrap();
//!
//! let config = load_config(temp.path(), None).unwrap();
//! assert_eq!(config.environment.name, "trees");
//! assert_eq!(config.tool.executable, "conda");
//! ```

pub mod loader;
pub mod schema;
pub mod validator;

pub use loader::{
    find_project_config, load_config, load_config_file, parse_config, CONFIG_FILE_NAME,
};
pub use schema::{
    BootstrapConfig, CriticalDependency, DependencyConfig, EnvironmentConfig, ModelConfig,
    ServerConfig, ToolConfig,
};
pub use validator::{validate, validate_config, ValidationError};
