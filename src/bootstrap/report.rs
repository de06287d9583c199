//! Run and status reports.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Serialize;

use crate::config::BootstrapConfig;
use crate::manager::EnvironmentManager;
use crate::ui::{RunSummary, StageSummary};

use super::inventory::{CategoryCount, ModelInventory};
use super::scaffold::{DirectoryScaffold, DirectoryStatus};
use super::stage::{Stage, StageOutcome};

/// What happened to the environment during a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvironmentAction {
    /// Did not exist; created from the spec file.
    Created,
    /// Existed; removed and created again.
    Recreated,
    /// Existed; spec file re-applied.
    Updated,
    /// Existed; left alone.
    Kept,
}

impl fmt::Display for EnvironmentAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            EnvironmentAction::Created => "created",
            EnvironmentAction::Recreated => "recreated",
            EnvironmentAction::Updated => "updated",
            EnvironmentAction::Kept => "kept",
        };
        write!(f, "{}", s)
    }
}

/// One finished stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageRecord {
    pub stage: Stage,
    pub outcome: StageOutcome,
    pub detail: Option<String>,
}

/// Everything a successful run did.
#[derive(Debug, Clone, Default)]
pub struct BootstrapReport {
    /// Stage outcomes in execution order.
    pub stages: Vec<StageRecord>,
    /// Resolved tool executable.
    pub tool_path: Option<PathBuf>,
    /// Tool version, if it could be read.
    pub tool_version: Option<String>,
    /// What happened to the environment.
    pub environment_action: Option<EnvironmentAction>,
    /// Version printed by the critical dependency check.
    pub critical_version: Option<String>,
    /// Model inventory, once that stage has run.
    pub inventory: Option<ModelInventory>,
    /// Directories created by the scaffold stage.
    pub created_dirs: Vec<PathBuf>,
    /// Wall-clock duration.
    pub duration: Duration,
}

impl BootstrapReport {
    /// Record a stage outcome.
    pub fn record(&mut self, stage: Stage, outcome: StageOutcome, detail: Option<String>) {
        self.stages.push(StageRecord {
            stage,
            outcome,
            detail,
        });
    }

    /// Outcome of a stage, if it finished.
    pub fn outcome(&self, stage: Stage) -> Option<StageOutcome> {
        self.stages
            .iter()
            .find(|r| r.stage == stage)
            .map(|r| r.outcome)
    }

    /// Number of stages that ended with a warning.
    pub fn warnings(&self) -> usize {
        self.stages
            .iter()
            .filter(|r| r.outcome == StageOutcome::Warned)
            .count()
    }

    /// Summary rows for the UI.
    pub fn to_summary(&self) -> RunSummary {
        RunSummary {
            stages: self
                .stages
                .iter()
                .map(|r| StageSummary {
                    name: r.stage.name().to_string(),
                    status: r.outcome.into(),
                    detail: r.detail.clone(),
                })
                .collect(),
            total_duration: self.duration,
            success: true,
        }
    }
}

/// Read-only snapshot of the provisioning state.
#[derive(Debug, Clone, Serialize)]
pub struct StatusReport {
    pub tool: String,
    pub tool_path: Option<PathBuf>,
    pub tool_version: Option<String>,
    pub environment: String,
    pub environment_prefix: Option<PathBuf>,
    pub spec_file: PathBuf,
    pub spec_file_present: bool,
    pub models: Vec<CategoryCount>,
    pub directories: Vec<DirectoryStatus>,
}

impl StatusReport {
    /// Gather status without creating or changing anything.
    ///
    /// Tool and filesystem errors degrade to "unknown" fields.
    pub fn collect<M: EnvironmentManager + ?Sized>(
        manager: &M,
        config: &BootstrapConfig,
        project_root: &Path,
    ) -> Self {
        let tool_path = manager.locate();

        let (tool_version, environment_prefix) = if tool_path.is_some() {
            let version = manager
                .version()
                .inspect_err(|e| tracing::debug!("Version lookup failed: {}", e))
                .ok();
            let prefix = manager
                .find_environment(&config.environment.name)
                .inspect_err(|e| tracing::debug!("Environment lookup failed: {}", e))
                .ok()
                .flatten();
            (version, prefix)
        } else {
            (None, None)
        };

        let models = ModelInventory::scan(project_root, &config.models).categories;

        Self {
            tool: manager.tool_name().to_string(),
            tool_path,
            tool_version,
            environment: config.environment.name.clone(),
            environment_prefix,
            spec_file: config.environment.spec_file.clone(),
            spec_file_present: project_root.join(&config.environment.spec_file).is_file(),
            models,
            directories: DirectoryScaffold::new(project_root, &config.scaffold).status(),
        }
    }

    /// Whether the tool was found.
    pub fn tool_present(&self) -> bool {
        self.tool_path.is_some()
    }

    /// Whether the environment exists.
    pub fn environment_exists(&self) -> bool {
        self.environment_prefix.is_some()
    }
}
