//! Platform-specific shell detection.

use std::path::{Path, PathBuf};

/// Information about the current shell environment.
#[derive(Debug, Clone)]
pub struct ShellInfo {
    /// Shell executable path.
    pub executable: PathBuf,

    /// Shell name (bash, zsh, fish, powershell, cmd).
    pub name: ShellType,

    /// Profile files that affect this shell.
    pub config_files: Vec<PathBuf>,
}

impl ShellInfo {
    /// First profile file that exists on disk.
    pub fn existing_profile(&self) -> Option<&Path> {
        self.config_files
            .iter()
            .find(|p| p.is_file())
            .map(|p| p.as_path())
    }
}

/// Known shell types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellType {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Cmd,
    Unknown,
}

impl ShellType {
    /// Parse shell type from executable name.
    pub fn from_executable(exe: &str) -> Self {
        let name = Path::new(exe)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("")
            .to_lowercase();

        match name.as_str() {
            "bash" => ShellType::Bash,
            "zsh" => ShellType::Zsh,
            "fish" => ShellType::Fish,
            "powershell" | "pwsh" => ShellType::PowerShell,
            "cmd" => ShellType::Cmd,
            _ => ShellType::Unknown,
        }
    }

    /// Name conda uses for this shell in `shell.<name> hook`.
    pub fn hook_name(&self) -> Option<&'static str> {
        match self {
            ShellType::Bash => Some("bash"),
            ShellType::Zsh => Some("zsh"),
            ShellType::Fish => Some("fish"),
            ShellType::PowerShell => Some("powershell"),
            ShellType::Cmd | ShellType::Unknown => None,
        }
    }
}

/// Detect the current shell environment.
pub fn detect_shell() -> ShellInfo {
    shell_info(get_shell_executable(), dirs::home_dir().as_deref())
}

/// Describe a shell. Without a home directory there are no profile files.
pub fn shell_info(executable: PathBuf, home: Option<&Path>) -> ShellInfo {
    let shell_type = ShellType::from_executable(&executable.to_string_lossy());
    let config_files = match home {
        Some(home) => profile_files(shell_type, home),
        None => {
            tracing::debug!("No home directory; skipping shell profiles");
            Vec::new()
        }
    };

    ShellInfo {
        executable,
        name: shell_type,
        config_files,
    }
}

fn get_shell_executable() -> PathBuf {
    if cfg!(target_os = "windows") {
        std::env::var("COMSPEC")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("cmd.exe"))
    } else {
        std::env::var("SHELL")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/bin/sh"))
    }
}

/// Profile files a shell reads at startup, relative to `home`.
pub fn profile_files(shell_type: ShellType, home: &Path) -> Vec<PathBuf> {
    match shell_type {
        ShellType::Bash => vec![
            home.join(".bashrc"),
            home.join(".bash_profile"),
            home.join(".profile"),
        ],
        ShellType::Zsh => vec![home.join(".zshrc"), home.join(".zprofile")],
        ShellType::Fish => vec![home.join(".config/fish/config.fish")],
        ShellType::PowerShell => {
            if let Some(docs) = dirs::document_dir() {
                vec![
                    docs.join("PowerShell/Microsoft.PowerShell_profile.ps1"),
                    docs.join("WindowsPowerShell/Microsoft.PowerShell_profile.ps1"),
                ]
            } else {
                vec![]
            }
        }
        ShellType::Cmd | ShellType::Unknown => vec![],
    }
}

/// Check if running in a CI environment.
///
/// Used to force non-interactive mode in `main()`. Checks common CI
/// environment variables: `CI`, `GITHUB_ACTIONS`, `GITLAB_CI`, `CIRCLECI`,
/// `TRAVIS`, `JENKINS_URL`.
pub fn is_ci() -> bool {
    ["CI", "GITHUB_ACTIONS", "GITLAB_CI", "CIRCLECI", "TRAVIS", "JENKINS_URL"]
        .iter()
        .any(|var| std::env::var(var).is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn shell_type_from_executable() {
        assert_eq!(ShellType::from_executable("/bin/bash"), ShellType::Bash);
        assert_eq!(ShellType::from_executable("/usr/bin/zsh"), ShellType::Zsh);
        assert_eq!(ShellType::from_executable("fish"), ShellType::Fish);
        assert_eq!(ShellType::from_executable("pwsh"), ShellType::PowerShell);
        assert_eq!(ShellType::from_executable("cmd.exe"), ShellType::Cmd);
        assert_eq!(ShellType::from_executable("/bin/sh"), ShellType::Unknown);
    }

    #[test]
    fn hook_names() {
        assert_eq!(ShellType::Bash.hook_name(), Some("bash"));
        assert_eq!(ShellType::Zsh.hook_name(), Some("zsh"));
        assert_eq!(ShellType::Unknown.hook_name(), None);
    }

    #[test]
    fn bash_profiles_are_under_home() {
        let files = profile_files(ShellType::Bash, Path::new("/home/op"));
        assert_eq!(files[0], PathBuf::from("/home/op/.bashrc"));
        assert_eq!(files.len(), 3);
    }

    #[test]
    fn missing_home_yields_no_profiles() {
        let info = shell_info(PathBuf::from("/bin/bash"), None);
        assert_eq!(info.name, ShellType::Bash);
        assert!(info.config_files.is_empty());
        assert!(info.existing_profile().is_none());
    }

    #[test]
    fn shell_info_uses_home_profiles() {
        let info = shell_info(PathBuf::from("/bin/zsh"), Some(Path::new("/home/op")));
        assert_eq!(info.config_files[0], PathBuf::from("/home/op/.zshrc"));
    }

    #[test]
    fn unknown_shell_has_no_profiles() {
        assert!(profile_files(ShellType::Unknown, Path::new("/home/op")).is_empty());
    }

    #[test]
    fn existing_profile_finds_first_present_file() {
        let home = TempDir::new().unwrap();
        fs::write(home.path().join(".zprofile"), "").unwrap();

        let info = ShellInfo {
            executable: PathBuf::from("/bin/zsh"),
            name: ShellType::Zsh,
            config_files: profile_files(ShellType::Zsh, home.path()),
        };
        assert_eq!(info.existing_profile(), Some(home.path().join(".zprofile").as_path()));
    }

    #[test]
    fn existing_profile_none_when_absent() {
        let home = TempDir::new().unwrap();
        let info = ShellInfo {
            executable: PathBuf::from("/bin/bash"),
            name: ShellType::Bash,
            config_files: profile_files(ShellType::Bash, home.path()),
        };
        assert!(info.existing_profile().is_none());
    }
}
