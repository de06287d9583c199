//! Pipeline stages and their outcomes.

use std::fmt;

use crate::ui::StatusKind;

/// The fixed provisioning stages, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    /// Locate the environment-management tool on PATH.
    ToolCheck,
    /// Ask the tool for its version.
    ToolVersion,
    /// Initialize the tool's shell integration.
    ShellHook,
    /// Look for an existing environment.
    EnvironmentCheck,
    /// Create or update the environment from the spec file.
    CreateOrUpdate,
    /// Activate the environment for child processes.
    Activation,
    /// Import the geospatial library and read its version.
    CriticalDependency,
    /// Import the remaining packages in one batch.
    SecondaryDependencies,
    /// Ensure model directories exist and count weight files.
    ModelInventory,
    /// Ensure the runtime working directories exist.
    Scaffold,
    /// Print next steps.
    Banner,
}

impl Stage {
    /// All stages in execution order.
    pub const ALL: [Stage; 11] = [
        Stage::ToolCheck,
        Stage::ToolVersion,
        Stage::ShellHook,
        Stage::EnvironmentCheck,
        Stage::CreateOrUpdate,
        Stage::Activation,
        Stage::CriticalDependency,
        Stage::SecondaryDependencies,
        Stage::ModelInventory,
        Stage::Scaffold,
        Stage::Banner,
    ];

    /// Human-readable stage name.
    pub fn name(&self) -> &'static str {
        match self {
            Stage::ToolCheck => "Tool check",
            Stage::ToolVersion => "Tool version",
            Stage::ShellHook => "Shell integration",
            Stage::EnvironmentCheck => "Environment check",
            Stage::CreateOrUpdate => "Create or update",
            Stage::Activation => "Activation",
            Stage::CriticalDependency => "Geospatial library",
            Stage::SecondaryDependencies => "Dependencies",
            Stage::ModelInventory => "Model inventory",
            Stage::Scaffold => "Directories",
            Stage::Banner => "Next steps",
        }
    }

    /// 1-based position in the pipeline.
    pub fn number(&self) -> usize {
        Stage::ALL
            .iter()
            .position(|s| s == self)
            .map(|i| i + 1)
            .unwrap_or(0)
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// How a stage that did not abort the run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageOutcome {
    /// Ran and succeeded.
    Completed,
    /// Did not run, or had nothing to do.
    Skipped,
    /// Ran with a non-fatal problem.
    Warned,
}

impl From<StageOutcome> for StatusKind {
    fn from(outcome: StageOutcome) -> Self {
        match outcome {
            StageOutcome::Completed => StatusKind::Completed,
            StageOutcome::Skipped => StatusKind::Skipped,
            StageOutcome::Warned => StatusKind::Warned,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stages_are_numbered_in_order() {
        assert_eq!(Stage::ToolCheck.number(), 1);
        assert_eq!(Stage::EnvironmentCheck.number(), 4);
        assert_eq!(Stage::Banner.number(), 11);
    }

    #[test]
    fn outcome_maps_to_status_kind() {
        assert_eq!(StatusKind::from(StageOutcome::Warned), StatusKind::Warned);
        assert_eq!(StatusKind::from(StageOutcome::Skipped), StatusKind::Skipped);
    }

    #[test]
    fn display_uses_name() {
        assert_eq!(Stage::Activation.to_string(), "Activation");
    }
}
