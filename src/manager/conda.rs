//! `conda` command-line driver.

use std::cell::OnceCell;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;

use crate::config::ToolConfig;
use crate::error::{BootstrapError, Result};
use crate::shell::{display_command, execute, which, CommandOptions, CommandResult, ShellType};

use super::{Activation, EnvironmentManager};

/// Shape of `conda env list --json`.
#[derive(Debug, Deserialize)]
struct EnvList {
    #[serde(default)]
    envs: Vec<PathBuf>,
}

/// Parse `conda env list --json` output into environment prefixes.
pub fn parse_env_list(json: &str) -> Result<Vec<PathBuf>> {
    let list: EnvList = serde_json::from_str(json)
        .map_err(|e| anyhow::anyhow!("could not parse environment list: {}", e))?;
    Ok(list.envs)
}

/// Pick the prefix whose final component is `name`.
fn match_environment(prefixes: &[PathBuf], name: &str) -> Option<PathBuf> {
    prefixes
        .iter()
        .find(|p| p.file_name().map(|f| f == name).unwrap_or(false))
        .cloned()
}

static VERSION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+\.\d+(?:\.\d+)?(?:[.\-+][0-9A-Za-z]+)*)").unwrap());

/// Extract a dotted version number from tool output like `conda 24.1.2`.
pub fn extract_version(output: &str) -> Option<String> {
    VERSION
        .captures(output)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}

/// Drives a conda-compatible executable.
pub struct CondaManager {
    executable: String,
    fallback_script: String,
    project_root: PathBuf,
    stream_output: bool,
    resolved: OnceCell<Option<PathBuf>>,
}

impl CondaManager {
    /// Create a driver for the configured tool, running commands from
    /// `project_root`.
    pub fn new(tool: &ToolConfig, project_root: &Path) -> Self {
        Self {
            executable: tool.executable.clone(),
            fallback_script: tool.fallback_script.clone(),
            project_root: project_root.to_path_buf(),
            stream_output: false,
            resolved: OnceCell::new(),
        }
    }

    /// Let long-running commands write straight to the terminal.
    pub fn with_streaming(mut self, stream_output: bool) -> Self {
        self.stream_output = stream_output;
        self
    }

    fn program(&self) -> Result<PathBuf> {
        self.locate().ok_or_else(|| BootstrapError::ToolNotFound {
            tool: self.executable.clone(),
            fallback_script: self.fallback_script.clone(),
        })
    }

    fn run(&self, args: &[&str], options: &CommandOptions) -> Result<CommandResult> {
        let program = self.program()?;
        let rendered = display_command(&program, args);
        execute(&program, args, &options.clone().in_dir(&self.project_root))?
            .into_checked(&rendered)
    }

    fn run_captured(&self, args: &[&str]) -> Result<CommandResult> {
        self.run(args, &CommandOptions::captured())
    }

    fn run_long(&self, args: &[&str]) -> Result<CommandResult> {
        if self.stream_output {
            self.run(args, &CommandOptions::default())
        } else {
            self.run_captured(args)
        }
    }

    /// All environment prefixes the tool knows about.
    pub fn list_environments(&self) -> Result<Vec<PathBuf>> {
        let result = self.run_captured(&["env", "list", "--json"])?;
        parse_env_list(&result.stdout)
    }
}

impl EnvironmentManager for CondaManager {
    fn tool_name(&self) -> &str {
        &self.executable
    }

    fn locate(&self) -> Option<PathBuf> {
        self.resolved.get_or_init(|| which(&self.executable)).clone()
    }

    fn version(&self) -> Result<String> {
        let result = self.run_captured(&["--version"])?;
        // Older releases print the version on stderr.
        let text = format!("{}{}", result.stdout, result.stderr);
        Ok(extract_version(&text).unwrap_or_else(|| text.trim().to_string()))
    }

    fn shell_hook(&self, shell: ShellType) -> Result<()> {
        let name = shell.hook_name().ok_or_else(|| {
            anyhow::anyhow!("no {} shell integration for {:?}", self.executable, shell)
        })?;
        let subcommand = format!("shell.{}", name);
        self.run_captured(&[subcommand.as_str(), "hook"])?;
        Ok(())
    }

    fn find_environment(&self, name: &str) -> Result<Option<PathBuf>> {
        let prefixes = self.list_environments()?;
        tracing::debug!("{} knows {} environments", self.executable, prefixes.len());
        Ok(match_environment(&prefixes, name))
    }

    fn create(&self, name: &str, spec_file: &Path) -> Result<()> {
        let spec = spec_file.to_string_lossy().into_owned();
        self.run_long(&["env", "create", "-n", name, "-f", spec.as_str()])?;
        Ok(())
    }

    fn update(&self, name: &str, spec_file: &Path) -> Result<()> {
        let spec = spec_file.to_string_lossy().into_owned();
        self.run_long(&["env", "update", "-n", name, "-f", spec.as_str(), "--prune"])?;
        Ok(())
    }

    fn remove(&self, name: &str) -> Result<()> {
        self.run_long(&["env", "remove", "-n", name, "-y"])?;
        Ok(())
    }

    fn activate(&self, name: &str) -> Result<Activation> {
        let prefix =
            self.find_environment(name)?
                .ok_or_else(|| BootstrapError::ActivationFailed {
                    name: name.to_string(),
                    message: format!("{} does not list it", self.executable),
                })?;
        Activation::for_prefix(name, &prefix)
    }

    fn run_python(&self, activation: &Activation, code: &str) -> Result<CommandResult> {
        let options = CommandOptions::captured()
            .in_dir(&self.project_root)
            .with_env(&activation.env);
        execute(&activation.python, &["-c", code], &options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_env_list_json() {
        let json = r#"{"envs": ["/opt/conda", "/opt/conda/envs/tree-detection"]}"#;
        let envs = parse_env_list(json).unwrap();
        assert_eq!(envs.len(), 2);
        assert_eq!(envs[1], PathBuf::from("/opt/conda/envs/tree-detection"));
    }

    #[test]
    fn empty_env_list_is_ok() {
        assert!(parse_env_list("{}").unwrap().is_empty());
    }

    #[test]
    fn malformed_env_list_is_an_error() {
        assert!(parse_env_list("# conda environments:").is_err());
    }

    #[test]
    fn matches_exact_environment_name() {
        let prefixes = vec![
            PathBuf::from("/opt/conda"),
            PathBuf::from("/opt/conda/envs/tree-detection-old"),
            PathBuf::from("/opt/conda/envs/tree-detection"),
        ];
        assert_eq!(
            match_environment(&prefixes, "tree-detection"),
            Some(PathBuf::from("/opt/conda/envs/tree-detection"))
        );
        assert_eq!(match_environment(&prefixes, "tree"), None);
    }

    #[test]
    fn extracts_versions() {
        assert_eq!(extract_version("conda 24.1.2\n"), Some("24.1.2".to_string()));
        assert_eq!(extract_version("mamba 1.5.8"), Some("1.5.8".to_string()));
        assert_eq!(
            extract_version("micromamba 2.0.0rc1"),
            Some("2.0.0".to_string())
        );
        assert_eq!(extract_version("no version here"), None);
    }

    #[test]
    fn missing_executable_is_not_located() {
        let tool = ToolConfig {
            executable: "definitely-not-a-conda-binary".to_string(),
            ..Default::default()
        };
        let manager = CondaManager::new(&tool, Path::new("."));
        assert!(manager.locate().is_none());
        assert!(matches!(
            manager.version(),
            Err(BootstrapError::ToolNotFound { .. })
        ));
    }

    #[test]
    fn tool_name_is_executable() {
        let tool = ToolConfig {
            executable: "mamba".to_string(),
            ..Default::default()
        };
        let manager = CondaManager::new(&tool, Path::new("."));
        assert_eq!(manager.tool_name(), "mamba");
    }
}
