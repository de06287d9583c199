//! Environment-management tool integration.
//!
//! [`EnvironmentManager`] is the seam between the bootstrap pipeline and the
//! external tool. [`CondaManager`] drives `conda` (or a CLI-compatible tool
//! such as `mamba`); tests substitute a scripted implementation.
//!
//! Activation is explicit: instead of sourcing a shell hook into the current
//! process, [`EnvironmentManager::activate`] returns an [`Activation`] whose
//! environment overlay is applied to every command run inside the
//! environment.

pub mod activation;
pub mod conda;

pub use activation::Activation;
pub use conda::{extract_version, parse_env_list, CondaManager};

use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::shell::{CommandResult, ShellType};

/// Operations the bootstrapper needs from an environment-management tool.
pub trait EnvironmentManager {
    /// Executable name, for messages.
    fn tool_name(&self) -> &str;

    /// Resolve the tool on PATH.
    fn locate(&self) -> Option<PathBuf>;

    /// Version string reported by the tool.
    fn version(&self) -> Result<String>;

    /// Initialize the tool's shell integration for `shell`.
    fn shell_hook(&self, shell: ShellType) -> Result<()>;

    /// Prefix directory of the named environment, if it exists.
    fn find_environment(&self, name: &str) -> Result<Option<PathBuf>>;

    /// Create the named environment from a spec file.
    fn create(&self, name: &str, spec_file: &Path) -> Result<()>;

    /// Re-apply a spec file to an existing environment, pruning packages it
    /// no longer lists.
    fn update(&self, name: &str, spec_file: &Path) -> Result<()>;

    /// Remove the named environment.
    fn remove(&self, name: &str) -> Result<()>;

    /// Activate the named environment for child processes.
    fn activate(&self, name: &str) -> Result<Activation>;

    /// Run a Python snippet inside an activated environment.
    fn run_python(&self, activation: &Activation, code: &str) -> Result<CommandResult>;
}
