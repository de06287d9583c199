//! Error types for treeboot operations.
//!
//! This module defines [`BootstrapError`], the primary error type used
//! throughout the crate, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Use `BootstrapError` for failures that end a run with a specific exit code
//! - Use `anyhow::Error` (via `BootstrapError::Other`) for unexpected errors
//! - Missing model files are never errors; they surface as warnings
//! - All errors should tell the operator what to fix before rerunning

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for treeboot operations.
#[derive(Debug, Error)]
pub enum BootstrapError {
    /// The environment-management tool is not on PATH.
    #[error("'{tool}' was not found on PATH. Install Miniconda or Miniforge (https://docs.conda.io/en/latest/miniconda.html), or use {fallback_script} for a pip-based setup")]
    ToolNotFound {
        tool: String,
        fallback_script: String,
    },

    /// An external command exited unsuccessfully.
    #[error("Command failed with exit code {code:?}: {command}")]
    CommandFailed {
        command: String,
        code: Option<i32>,
        stderr: String,
    },

    /// The environment could not be activated for child processes.
    #[error("Could not activate environment '{name}': {message}")]
    ActivationFailed { name: String, message: String },

    /// The geospatial library failed to import inside the environment.
    #[error("{library} could not be imported. Check that {spec_file} lists it and that the environment was created from it")]
    CriticalDependency {
        library: String,
        spec_file: PathBuf,
    },

    /// One of the secondary packages failed to import.
    #[error("Some dependencies failed to import")]
    SecondaryDependency,

    /// Configuration file not found at an explicitly requested location.
    #[error("Configuration not found: {path}")]
    ConfigNotFound { path: PathBuf },

    /// Failed to parse configuration file.
    #[error("Failed to parse config at {path}: {message}")]
    ConfigParseError { path: PathBuf, message: String },

    /// Invalid configuration structure or values.
    #[error("Invalid configuration: {message}")]
    ConfigValidationError { message: String },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl BootstrapError {
    /// Process exit code for this error.
    ///
    /// Tool failures propagate the tool's own exit code; configuration
    /// problems use 2; everything else is 1.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::CommandFailed { code, .. } => match code {
                Some(c) if *c != 0 => *c,
                _ => 1,
            },
            Self::ConfigNotFound { .. }
            | Self::ConfigParseError { .. }
            | Self::ConfigValidationError { .. } => 2,
            _ => 1,
        }
    }
}

/// Result type alias for treeboot operations.
pub type Result<T> = std::result::Result<T, BootstrapError>;
