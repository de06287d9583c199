//! Import smoke tests run inside the activated environment.

use crate::config::CriticalDependency;
use crate::error::Result;
use crate::manager::{Activation, EnvironmentManager};

/// Outcome of one import check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyCheckResult {
    /// Group label (library name, or the joined module list).
    pub group: String,
    /// Whether every import succeeded.
    pub success: bool,
    /// Version printed by the check, if it prints one.
    pub version: Option<String>,
    /// Interpreter stderr, for diagnostics.
    pub stderr: String,
}

/// Python statement importing all `modules` at once.
pub fn batch_import_script(modules: &[String]) -> String {
    format!("import {}", modules.join(", "))
}

/// Import the critical library and read its version.
///
/// Only a failure to start the interpreter is an `Err`; a failed import is a
/// result with `success == false`.
pub fn check_critical<M: EnvironmentManager + ?Sized>(
    manager: &M,
    activation: &Activation,
    dependency: &CriticalDependency,
) -> Result<DependencyCheckResult> {
    let result = manager.run_python(activation, &dependency.probe_script())?;
    let version = result
        .stdout
        .lines()
        .map(str::trim)
        .rfind(|l| !l.is_empty())
        .map(str::to_string);

    if !result.success {
        tracing::debug!("{} import failed: {}", dependency.label, result.stderr.trim());
    }

    Ok(DependencyCheckResult {
        group: dependency.label.clone(),
        success: result.success,
        version: if result.success { version } else { None },
        stderr: result.stderr,
    })
}

/// Import the secondary modules in one batch.
///
/// A single interpreter run covers the whole group, so a failure does not
/// say which module is missing.
pub fn check_secondary<M: EnvironmentManager + ?Sized>(
    manager: &M,
    activation: &Activation,
    modules: &[String],
) -> Result<DependencyCheckResult> {
    let result = manager.run_python(activation, &batch_import_script(modules))?;

    if !result.success {
        tracing::debug!("Batch import failed: {}", result.stderr.trim());
    }

    Ok(DependencyCheckResult {
        group: modules.join(", "),
        success: result.success,
        version: None,
        stderr: result.stderr,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn batch_script_joins_modules() {
        let modules: Vec<String> = ["flask", "torch", "ultralytics", "rasterio"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(
            batch_import_script(&modules),
            "import flask, torch, ultralytics, rasterio"
        );
    }

    #[test]
    fn single_module_batch() {
        assert_eq!(batch_import_script(&["numpy".to_string()]), "import numpy");
    }
}
