//! Run command implementation.
//!
//! The `treeboot run` command provisions the environment.

use std::path::{Path, PathBuf};

use crate::bootstrap::{BootstrapOptions, Bootstrapper};
use crate::cli::args::RunArgs;
use crate::config::BootstrapConfig;
use crate::error::Result;
use crate::manager::{CondaManager, EnvironmentManager};
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};

/// The run command implementation.
pub struct RunCommand {
    project_root: PathBuf,
    config: BootstrapConfig,
    args: RunArgs,
}

impl RunCommand {
    /// Create a new run command.
    pub fn new(project_root: &Path, config: BootstrapConfig, args: RunArgs) -> Self {
        Self {
            project_root: project_root.to_path_buf(),
            config,
            args,
        }
    }

    fn options(&self) -> BootstrapOptions {
        BootstrapOptions {
            recreate: self.args.recreate,
            update: self.args.update,
        }
    }

    /// Run the pipeline against a specific manager.
    ///
    /// Pipeline failures are reported through `ui` and turned into the
    /// matching exit code.
    pub fn run_with<M: EnvironmentManager + ?Sized>(
        &self,
        manager: &M,
        ui: &mut dyn UserInterface,
    ) -> Result<CommandResult> {
        let bootstrapper = Bootstrapper::new(manager, &self.config, &self.project_root)
            .with_options(self.options());

        match bootstrapper.run(ui) {
            Ok(report) => {
                ui.show_summary(&report.to_summary());
                let warnings = report.warnings();
                if warnings == 0 {
                    ui.success("Environment ready");
                } else {
                    let label = if warnings == 1 { "warning" } else { "warnings" };
                    ui.success(&format!("Environment ready ({} {})", warnings, label));
                }
                Ok(CommandResult::success())
            }
            Err(e) => {
                tracing::debug!("Bootstrap failed: {:?}", e);
                ui.error(&e.to_string());
                Ok(CommandResult::failure(e.exit_code()))
            }
        }
    }
}

impl Command for RunCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let manager = CondaManager::new(&self.config.tool, &self.project_root)
            .with_streaming(ui.output_mode().shows_command_output());
        self.run_with(&manager, ui)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::MockUI;
    use tempfile::TempDir;

    #[test]
    fn missing_tool_fails_with_exit_one() {
        let temp = TempDir::new().unwrap();
        let mut config = BootstrapConfig::default();
        config.tool.executable = "treeboot-test-no-such-conda".to_string();

        let cmd = RunCommand::new(temp.path(), config, RunArgs::default());
        let mut ui = MockUI::new();
        let result = cmd.execute(&mut ui).unwrap();

        assert!(!result.success);
        assert_eq!(result.exit_code, 1);
        assert!(ui.has_error("treeboot-test-no-such-conda"));
        assert!(ui.has_hint("setup_pip.sh"));
        assert!(ui.summaries().is_empty());
        assert!(!temp.path().join("models").exists());
    }

    #[test]
    fn options_follow_args() {
        let args = RunArgs {
            update: true,
            ..Default::default()
        };
        let cmd = RunCommand::new(Path::new("."), BootstrapConfig::default(), args);
        let options = cmd.options();
        assert!(options.update);
        assert!(!options.recreate);
    }
}
