//! treeboot - Environment provisioning for the tree-detection API.
//!
//! treeboot checks for a conda-compatible tool, creates or updates the
//! project's isolated environment from `environment.yml`, smoke-tests the
//! geospatial stack inside it, and lays out the model and working
//! directories the API expects.
//!
//! # Modules
//!
//! - [`bootstrap`] - The provisioning pipeline and its reports
//! - [`cli`] - Command-line interface and argument parsing
//! - [`config`] - Configuration loading, parsing, and validation
//! - [`error`] - Error types and result aliases
//! - [`manager`] - Environment-management tool integration and activation
//! - [`shell`] - Process execution, PATH lookup, and shell detection
//! - [`ui`] - Interactive prompts, spinners, and terminal output
//!
//! # Example
//!
//! ```
//! use treeboot::config::BootstrapConfig;
//! use treeboot::bootstrap::completion_lines;
//!
//! let config = BootstrapConfig::default();
//! let banner = completion_lines(&config);
//! assert!(banner.contains(&"  conda activate tree-detection".to_string()));
//! ```

pub mod bootstrap;
pub mod cli;
pub mod config;
pub mod error;
pub mod manager;
pub mod shell;
pub mod ui;

pub use error::{BootstrapError, Result};
