//! The provisioning pipeline.

use std::path::Path;
use std::time::Instant;

use crate::config::BootstrapConfig;
use crate::error::{BootstrapError, Result};
use crate::manager::{Activation, EnvironmentManager};
use crate::shell::{detect_shell, ShellInfo};
use crate::ui::{Prompt, UserInterface};

use super::banner::show_banner;
use super::deps::{check_critical, check_secondary};
use super::inventory::{copy_hint, ModelInventory};
use super::report::{BootstrapReport, EnvironmentAction};
use super::scaffold::DirectoryScaffold;
use super::stage::{Stage, StageOutcome};

/// Prompt key for the recreate question.
pub const RECREATE_PROMPT_KEY: &str = "recreate";

/// How to treat an environment that already exists.
#[derive(Debug, Clone, Copy, Default)]
pub struct BootstrapOptions {
    /// Remove and recreate without asking.
    pub recreate: bool,
    /// Re-apply the spec file without asking.
    pub update: bool,
}

/// Runs the provisioning stages in order, stopping at the first hard failure.
pub struct Bootstrapper<'a, M: EnvironmentManager + ?Sized> {
    manager: &'a M,
    config: &'a BootstrapConfig,
    project_root: &'a Path,
    options: BootstrapOptions,
    shell: Option<ShellInfo>,
}

impl<'a, M: EnvironmentManager + ?Sized> Bootstrapper<'a, M> {
    /// Create a bootstrapper for the project at `project_root`.
    pub fn new(manager: &'a M, config: &'a BootstrapConfig, project_root: &'a Path) -> Self {
        Self {
            manager,
            config,
            project_root,
            options: BootstrapOptions::default(),
            shell: None,
        }
    }

    /// Set how an existing environment is handled.
    pub fn with_options(mut self, options: BootstrapOptions) -> Self {
        self.options = options;
        self
    }

    /// Use a fixed shell instead of detecting it from `SHELL`.
    pub fn with_shell(mut self, shell: ShellInfo) -> Self {
        self.shell = Some(shell);
        self
    }

    /// Run every stage.
    ///
    /// On success the report lists each stage's outcome. A hard failure
    /// returns the error after its diagnostics have been shown.
    pub fn run(&self, ui: &mut dyn UserInterface) -> Result<BootstrapReport> {
        let start = Instant::now();
        let mut report = BootstrapReport::default();
        let name = self.config.environment.name.as_str();

        ui.show_header(&format!("Setting up environment '{}'", name));

        self.check_tool(ui, &mut report)?;
        self.identify_tool(ui, &mut report);
        self.hook_shell(ui, &mut report);

        let exists = self.check_environment(ui, &mut report)?;
        self.provision(ui, &mut report, exists)?;

        let activation = self.activate(ui, &mut report)?;
        self.smoke_test_critical(ui, &mut report, &activation)?;
        self.smoke_test_secondary(ui, &mut report, &activation)?;

        self.take_inventory(ui, &mut report);
        self.scaffold(ui, &mut report);

        progress(ui, Stage::Banner);
        show_banner(ui, self.config);
        report.record(Stage::Banner, StageOutcome::Completed, None);

        report.duration = start.elapsed();
        Ok(report)
    }

    fn check_tool(&self, ui: &mut dyn UserInterface, report: &mut BootstrapReport) -> Result<()> {
        progress(ui, Stage::ToolCheck);
        let tool = self.manager.tool_name();
        let Some(path) = self.manager.locate() else {
            ui.show_hint(&format!(
                "Install Miniconda or Miniforge, or run ./{} for a pip-based setup",
                self.config.tool.fallback_script
            ));
            return Err(BootstrapError::ToolNotFound {
                tool: tool.to_string(),
                fallback_script: self.config.tool.fallback_script.clone(),
            });
        };

        ui.success(&format!("{} found at {}", tool, path.display()));
        report.record(
            Stage::ToolCheck,
            StageOutcome::Completed,
            Some(path.display().to_string()),
        );
        report.tool_path = Some(path);
        Ok(())
    }

    fn identify_tool(&self, ui: &mut dyn UserInterface, report: &mut BootstrapReport) {
        progress(ui, Stage::ToolVersion);
        match self.manager.version() {
            Ok(version) => {
                ui.message(&format!("{} {}", self.manager.tool_name(), version));
                report.record(
                    Stage::ToolVersion,
                    StageOutcome::Completed,
                    Some(version.clone()),
                );
                report.tool_version = Some(version);
            }
            Err(e) => {
                tracing::warn!("Could not read {} version: {}", self.manager.tool_name(), e);
                ui.warning(&format!(
                    "Could not determine the {} version",
                    self.manager.tool_name()
                ));
                report.record(Stage::ToolVersion, StageOutcome::Warned, None);
            }
        }
    }

    fn hook_shell(&self, ui: &mut dyn UserInterface, report: &mut BootstrapReport) {
        progress(ui, Stage::ShellHook);
        let shell = self.shell.clone().unwrap_or_else(detect_shell);

        let Some(profile) = shell.existing_profile() else {
            tracing::debug!("No profile found for {:?}", shell.name);
            report.record(
                Stage::ShellHook,
                StageOutcome::Skipped,
                Some("no shell profile".to_string()),
            );
            return;
        };

        match self.manager.shell_hook(shell.name) {
            Ok(()) => {
                tracing::debug!("Shell hook ran for {}", profile.display());
                report.record(
                    Stage::ShellHook,
                    StageOutcome::Completed,
                    Some(profile.display().to_string()),
                );
            }
            Err(e) => {
                tracing::debug!("Shell hook failed: {}", e);
                report.record(
                    Stage::ShellHook,
                    StageOutcome::Skipped,
                    Some("hook unavailable".to_string()),
                );
            }
        }
    }

    fn check_environment(
        &self,
        ui: &mut dyn UserInterface,
        report: &mut BootstrapReport,
    ) -> Result<bool> {
        progress(ui, Stage::EnvironmentCheck);
        let name = &self.config.environment.name;
        let exists = self.manager.find_environment(name)?.is_some();

        if exists {
            ui.message(&format!("Environment '{}' already exists", name));
        } else {
            ui.message(&format!("Environment '{}' not found", name));
        }
        report.record(
            Stage::EnvironmentCheck,
            StageOutcome::Completed,
            Some(if exists { "found" } else { "not found" }.to_string()),
        );
        Ok(exists)
    }

    fn choose_action(&self, ui: &mut dyn UserInterface, exists: bool) -> Result<EnvironmentAction> {
        if !exists {
            return Ok(EnvironmentAction::Created);
        }
        if self.options.recreate {
            return Ok(EnvironmentAction::Recreated);
        }
        if self.options.update {
            return Ok(EnvironmentAction::Updated);
        }

        let prompt = Prompt::confirm(
            RECREATE_PROMPT_KEY,
            &format!(
                "Environment '{}' already exists. Remove and recreate it?",
                self.config.environment.name
            ),
            false,
        );
        if !ui.is_interactive() {
            tracing::debug!("Answering '{}' without a terminal", RECREATE_PROMPT_KEY);
        }
        if ui.confirm(&prompt)? {
            Ok(EnvironmentAction::Recreated)
        } else {
            Ok(EnvironmentAction::Kept)
        }
    }

    fn provision(
        &self,
        ui: &mut dyn UserInterface,
        report: &mut BootstrapReport,
        exists: bool,
    ) -> Result<()> {
        let action = self.choose_action(ui, exists)?;
        progress(ui, Stage::CreateOrUpdate);
        report.environment_action = Some(action);

        let name = self.config.environment.name.as_str();
        if action == EnvironmentAction::Kept {
            ui.message(&format!("Keeping existing environment '{}'", name));
            report.record(
                Stage::CreateOrUpdate,
                StageOutcome::Skipped,
                Some("kept existing".to_string()),
            );
            return Ok(());
        }

        // Checked before removal so a bad path never costs the old environment.
        let spec_file = self.project_root.join(&self.config.environment.spec_file);
        if !spec_file.is_file() {
            ui.show_hint(&format!(
                "Run from the project root, or set environment.spec_file in {}",
                crate::config::CONFIG_FILE_NAME
            ));
            return Err(BootstrapError::ConfigNotFound { path: spec_file });
        }

        if action == EnvironmentAction::Recreated {
            let mut spinner = ui.start_spinner(&format!("Removing environment '{}'", name));
            if let Err(e) = self.manager.remove(name) {
                spinner.finish_error(&format!("Could not remove '{}'", name));
                show_command_failure(ui, &e);
                return Err(e);
            }
            spinner.finish_success(&format!("Removed '{}'", name));
        }

        let spec_display = self.config.environment.spec_file.display();
        let (working, done) = if action == EnvironmentAction::Updated {
            (
                format!("Updating '{}' from {}", name, spec_display),
                format!("Updated '{}'", name),
            )
        } else {
            (
                format!(
                    "Creating '{}' from {} (this can take several minutes)",
                    name, spec_display
                ),
                format!("Created '{}'", name),
            )
        };

        let mut spinner = ui.start_spinner(&working);
        let outcome = if action == EnvironmentAction::Updated {
            self.manager.update(name, &spec_file)
        } else {
            self.manager.create(name, &spec_file)
        };
        if let Err(e) = outcome {
            spinner.finish_error(&format!("Could not provision '{}'", name));
            show_command_failure(ui, &e);
            return Err(e);
        }
        spinner.finish_success(&done);

        report.record(
            Stage::CreateOrUpdate,
            StageOutcome::Completed,
            Some(action.to_string()),
        );
        Ok(())
    }

    fn activate(
        &self,
        ui: &mut dyn UserInterface,
        report: &mut BootstrapReport,
    ) -> Result<Activation> {
        progress(ui, Stage::Activation);
        let name = &self.config.environment.name;
        let activation = match self.manager.activate(name) {
            Ok(activation) => activation,
            Err(e) => {
                ui.show_hint(&format!(
                    "Check `{} env list` and rerun with --recreate",
                    self.manager.tool_name()
                ));
                return Err(e);
            }
        };

        ui.success(&format!("Activated '{}'", name));
        report.record(
            Stage::Activation,
            StageOutcome::Completed,
            Some(activation.prefix.display().to_string()),
        );
        Ok(activation)
    }

    fn smoke_test_critical(
        &self,
        ui: &mut dyn UserInterface,
        report: &mut BootstrapReport,
        activation: &Activation,
    ) -> Result<()> {
        progress(ui, Stage::CriticalDependency);
        let dependency = &self.config.dependencies.critical;
        let check = check_critical(self.manager, activation, dependency)?;

        if !check.success {
            if !check.stderr.trim().is_empty() {
                ui.show_error_block(&dependency.probe_script(), check.stderr.trim(), None);
            }
            return Err(BootstrapError::CriticalDependency {
                library: dependency.label.clone(),
                spec_file: self.config.environment.spec_file.clone(),
            });
        }

        let version = check.version.unwrap_or_else(|| "unknown".to_string());
        ui.success(&format!("{} {}", dependency.label, version));
        report.record(
            Stage::CriticalDependency,
            StageOutcome::Completed,
            Some(version.clone()),
        );
        report.critical_version = Some(version);
        Ok(())
    }

    fn smoke_test_secondary(
        &self,
        ui: &mut dyn UserInterface,
        report: &mut BootstrapReport,
        activation: &Activation,
    ) -> Result<()> {
        progress(ui, Stage::SecondaryDependencies);
        let modules = &self.config.dependencies.secondary;
        if modules.is_empty() {
            report.record(
                Stage::SecondaryDependencies,
                StageOutcome::Skipped,
                Some("none configured".to_string()),
            );
            return Ok(());
        }

        let check = check_secondary(self.manager, activation, modules)?;
        if !check.success {
            return Err(BootstrapError::SecondaryDependency);
        }

        ui.success(&format!("Imported {}", check.group));
        report.record(
            Stage::SecondaryDependencies,
            StageOutcome::Completed,
            Some(format!("{} modules", modules.len())),
        );
        Ok(())
    }

    fn take_inventory(&self, ui: &mut dyn UserInterface, report: &mut BootstrapReport) {
        progress(ui, Stage::ModelInventory);
        let models = &self.config.models;

        let inventory = ModelInventory::ensure(self.project_root, models);

        for category in &inventory.categories {
            if let Some(reason) = &category.error {
                ui.warning(&format!(
                    "Could not prepare {}: {}",
                    category.directory.display(),
                    reason
                ));
                ui.show_hint(&copy_hint(category, &models.extension));
            } else if category.count == 0 {
                ui.warning(&format!(
                    "No .{} files in {}",
                    models.extension,
                    category.directory.display()
                ));
                ui.show_hint(&copy_hint(category, &models.extension));
            } else {
                ui.success(&format!(
                    "{} model(s) in {}",
                    category.count,
                    category.directory.display()
                ));
            }
        }

        let detail = format!(
            "{} total ({})",
            inventory.total(),
            inventory
                .categories
                .iter()
                .map(|c| format!("{} {}", c.count, c.category))
                .collect::<Vec<_>>()
                .join(", ")
        );
        let outcome = if inventory.empty().next().is_some() {
            StageOutcome::Warned
        } else {
            StageOutcome::Completed
        };
        report.record(Stage::ModelInventory, outcome, Some(detail));
        report.inventory = Some(inventory);
    }

    fn scaffold(&self, ui: &mut dyn UserInterface, report: &mut BootstrapReport) {
        progress(ui, Stage::Scaffold);
        let outcome = DirectoryScaffold::new(self.project_root, &self.config.scaffold).ensure();

        for (dir, reason) in &outcome.failed {
            ui.warning(&format!("Could not create {}: {}", dir.display(), reason));
        }
        if !outcome.created.is_empty() {
            let names: Vec<String> = outcome
                .created
                .iter()
                .map(|d| d.display().to_string())
                .collect();
            ui.success(&format!("Created {}", names.join(", ")));
        }

        let result = if outcome.failed.is_empty() {
            StageOutcome::Completed
        } else {
            StageOutcome::Warned
        };
        report.record(
            Stage::Scaffold,
            result,
            Some(format!("{} created", outcome.created.len())),
        );
        report.created_dirs = outcome.created;
    }
}

fn progress(ui: &mut dyn UserInterface, stage: Stage) {
    ui.show_progress(stage.number(), Stage::ALL.len());
}

fn show_command_failure(ui: &mut dyn UserInterface, err: &BootstrapError) {
    if let BootstrapError::CommandFailed {
        command, stderr, ..
    } = err
    {
        ui.show_error_block(command, stderr.trim(), None);
    }
}
