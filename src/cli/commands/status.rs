//! Status command implementation.
//!
//! The `treeboot status` command reports what is already provisioned,
//! without creating or changing anything.

use std::path::{Path, PathBuf};

use crate::bootstrap::{copy_hint, StatusReport};
use crate::cli::args::StatusArgs;
use crate::config::BootstrapConfig;
use crate::error::{BootstrapError, Result};
use crate::manager::{CondaManager, EnvironmentManager};
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};

/// The status command implementation.
pub struct StatusCommand {
    project_root: PathBuf,
    config: BootstrapConfig,
    args: StatusArgs,
}

impl StatusCommand {
    /// Create a new status command.
    pub fn new(project_root: &Path, config: BootstrapConfig, args: StatusArgs) -> Self {
        Self {
            project_root: project_root.to_path_buf(),
            config,
            args,
        }
    }

    /// Get the project root path.
    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    /// Report status using a specific manager.
    pub fn report_with<M: EnvironmentManager + ?Sized>(
        &self,
        manager: &M,
        ui: &mut dyn UserInterface,
    ) -> Result<CommandResult> {
        let report = StatusReport::collect(manager, &self.config, &self.project_root);

        if self.args.json {
            let json =
                serde_json::to_string_pretty(&report).map_err(|e| BootstrapError::Other(e.into()))?;
            ui.message(&json);
        } else {
            self.show(ui, &report);
        }

        if report.tool_present() {
            Ok(CommandResult::success())
        } else {
            Ok(CommandResult::failure(1))
        }
    }

    fn show(&self, ui: &mut dyn UserInterface, report: &StatusReport) {
        ui.show_header(&format!("Environment '{}' - Status", report.environment));

        match &report.tool_path {
            Some(path) => {
                let version = report.tool_version.as_deref().unwrap_or("version unknown");
                ui.success(&format!("{} {} ({})", report.tool, version, path.display()));
            }
            None => {
                ui.error(&format!("{} not found on PATH", report.tool));
                ui.show_hint(&format!(
                    "Install Miniconda or Miniforge, or run ./{}",
                    self.config.tool.fallback_script
                ));
            }
        }

        match &report.environment_prefix {
            Some(prefix) => ui.success(&format!(
                "Environment '{}' at {}",
                report.environment,
                prefix.display()
            )),
            None if report.tool_present() => {
                ui.warning(&format!("Environment '{}' does not exist", report.environment));
                ui.show_hint("Run `treeboot run` to create it");
            }
            None => {}
        }

        if report.spec_file_present {
            ui.success(&format!("Spec file {}", report.spec_file.display()));
        } else {
            ui.warning(&format!("Spec file {} is missing", report.spec_file.display()));
        }

        for category in &report.models {
            if let Some(reason) = &category.error {
                ui.warning(&format!(
                    "Cannot read {}: {}",
                    category.directory.display(),
                    reason
                ));
            } else if category.count > 0 {
                ui.success(&format!(
                    "{} model(s) in {}",
                    category.count,
                    category.directory.display()
                ));
            } else {
                ui.warning(&format!(
                    "No .{} files in {}",
                    self.config.models.extension,
                    category.directory.display()
                ));
                ui.show_hint(&copy_hint(category, &self.config.models.extension));
            }
        }

        let missing: Vec<String> = report
            .directories
            .iter()
            .filter(|d| !d.present)
            .map(|d| d.path.display().to_string())
            .collect();
        if missing.is_empty() {
            ui.success("Working directories present");
        } else {
            ui.warning(&format!("Missing directories: {}", missing.join(", ")));
        }
    }
}

impl Command for StatusCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let manager = CondaManager::new(&self.config.tool, &self.project_root);
        self.report_with(&manager, ui)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::MockUI;
    use tempfile::TempDir;

    fn missing_tool_config() -> BootstrapConfig {
        let mut config = BootstrapConfig::default();
        config.tool.executable = "treeboot-test-no-such-conda".to_string();
        config
    }

    #[test]
    fn status_command_creation() {
        let temp = TempDir::new().unwrap();
        let cmd = StatusCommand::new(temp.path(), BootstrapConfig::default(), StatusArgs::default());
        assert_eq!(cmd.project_root(), temp.path());
    }

    #[test]
    fn status_without_tool_exits_one() {
        let temp = TempDir::new().unwrap();
        let cmd = StatusCommand::new(temp.path(), missing_tool_config(), StatusArgs::default());
        let mut ui = MockUI::new();

        let result = cmd.execute(&mut ui).unwrap();

        assert!(!result.success);
        assert_eq!(result.exit_code, 1);
        assert!(ui.has_error("not found on PATH"));
        assert!(ui.has_warning("Missing directories"));
    }

    #[test]
    fn status_does_not_create_directories() {
        let temp = TempDir::new().unwrap();
        let cmd = StatusCommand::new(temp.path(), missing_tool_config(), StatusArgs::default());
        let mut ui = MockUI::new();
        cmd.execute(&mut ui).unwrap();

        assert!(!temp.path().join("models").exists());
        assert!(!temp.path().join("uploads").exists());
    }

    #[test]
    fn status_json_is_parseable() {
        let temp = TempDir::new().unwrap();
        let cmd = StatusCommand::new(
            temp.path(),
            missing_tool_config(),
            StatusArgs { json: true },
        );
        let mut ui = MockUI::new();
        cmd.execute(&mut ui).unwrap();

        let value: serde_json::Value = serde_json::from_str(&ui.messages()[0]).unwrap();
        assert_eq!(value["tool"], "treeboot-test-no-such-conda");
        assert_eq!(value["environment"], "tree-detection");
        assert!(value["tool_path"].is_null());
        assert_eq!(value["models"].as_array().unwrap().len(), 2);
    }
}
