//! Explicit environment activation.
//!
//! A child process cannot change its parent shell, so activation here means
//! computing the variables `conda activate` would set and passing them to
//! every command that must run inside the environment.

use std::collections::HashMap;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::error::{BootstrapError, Result};
use crate::shell::parse_system_path;

/// An environment activated for child processes.
#[derive(Debug, Clone, PartialEq)]
pub struct Activation {
    /// Environment name.
    pub name: String,

    /// Environment prefix directory.
    pub prefix: PathBuf,

    /// Python interpreter inside the prefix.
    pub python: PathBuf,

    /// Variables applied to child processes.
    pub env: HashMap<String, String>,
}

impl Activation {
    /// Activate the environment at `prefix` on top of the system PATH.
    pub fn for_prefix(name: &str, prefix: &Path) -> Result<Self> {
        Self::with_base_path(name, prefix, &parse_system_path())
    }

    /// Activate on top of an explicit base PATH.
    ///
    /// Fails if the prefix is missing or has no Python interpreter, so smoke
    /// tests never run against the wrong interpreter.
    pub fn with_base_path(name: &str, prefix: &Path, base_path: &[PathBuf]) -> Result<Self> {
        if !prefix.is_dir() {
            return Err(BootstrapError::ActivationFailed {
                name: name.to_string(),
                message: format!("prefix {} does not exist", prefix.display()),
            });
        }

        let python = python_path(prefix);
        if !python.is_file() {
            return Err(BootstrapError::ActivationFailed {
                name: name.to_string(),
                message: format!("no Python interpreter at {}", python.display()),
            });
        }

        let mut entries = bin_dirs(prefix);
        let rest: Vec<PathBuf> = base_path
            .iter()
            .filter(|p| !entries.contains(*p))
            .cloned()
            .collect();
        entries.extend(rest);
        let joined: OsString =
            std::env::join_paths(&entries).map_err(|e| BootstrapError::ActivationFailed {
                name: name.to_string(),
                message: e.to_string(),
            })?;

        let mut env = HashMap::new();
        env.insert("PATH".to_string(), joined.to_string_lossy().to_string());
        env.insert(
            "CONDA_PREFIX".to_string(),
            prefix.to_string_lossy().to_string(),
        );
        env.insert("CONDA_DEFAULT_ENV".to_string(), name.to_string());
        env.insert("CONDA_SHLVL".to_string(), "1".to_string());

        // GDAL and PROJ packages export their data dirs from activate.d scripts.
        for (var, sub) in [("GDAL_DATA", "gdal"), ("PROJ_DATA", "proj")] {
            let dir = share_dir(prefix).join(sub);
            if dir.is_dir() {
                env.insert(var.to_string(), dir.to_string_lossy().to_string());
            }
        }

        tracing::debug!("Activated {} at {}", name, prefix.display());

        Ok(Self {
            name: name.to_string(),
            prefix: prefix.to_path_buf(),
            python,
            env,
        })
    }
}

#[cfg(windows)]
fn python_path(prefix: &Path) -> PathBuf {
    prefix.join("python.exe")
}

#[cfg(not(windows))]
fn python_path(prefix: &Path) -> PathBuf {
    prefix.join("bin").join("python")
}

#[cfg(windows)]
fn bin_dirs(prefix: &Path) -> Vec<PathBuf> {
    vec![
        prefix.to_path_buf(),
        prefix.join("Library").join("mingw-w64").join("bin"),
        prefix.join("Library").join("usr").join("bin"),
        prefix.join("Library").join("bin"),
        prefix.join("Scripts"),
        prefix.join("bin"),
    ]
}

#[cfg(not(windows))]
fn bin_dirs(prefix: &Path) -> Vec<PathBuf> {
    vec![prefix.join("bin")]
}

#[cfg(windows)]
fn share_dir(prefix: &Path) -> PathBuf {
    prefix.join("Library").join("share")
}

#[cfg(not(windows))]
fn share_dir(prefix: &Path) -> PathBuf {
    prefix.join("share")
}
