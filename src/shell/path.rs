//! Executable lookup on PATH.
//!
//! Lookups scan PATH entries directly instead of shelling out to `which`,
//! whose behavior varies across systems and is sometimes a shell builtin.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

/// Check whether a file has executable permission bits set.
#[cfg(unix)]
pub fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .map(|m| m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

/// On Windows, executability is determined by file extension, not permission bits.
#[cfg(not(unix))]
pub fn is_executable(_path: &Path) -> bool {
    true
}

/// File names to try for a tool in a single directory.
#[cfg(windows)]
fn candidate_names(tool: &str) -> Vec<String> {
    if Path::new(tool).extension().is_some() {
        return vec![tool.to_string()];
    }
    ["exe", "bat", "cmd"]
        .iter()
        .map(|ext| format!("{}.{}", tool, ext))
        .chain(std::iter::once(tool.to_string()))
        .collect()
}

#[cfg(not(windows))]
fn candidate_names(tool: &str) -> Vec<String> {
    vec![tool.to_string()]
}

/// Resolve a tool's binary path by iterating over PATH entries.
///
/// Returns the first match that exists and is executable. A tool given as a
/// path (containing a separator) is checked directly.
pub fn resolve_tool_path(tool: &str, path_entries: &[PathBuf]) -> Option<PathBuf> {
    let direct = Path::new(tool);
    if direct.components().count() > 1 {
        return (direct.is_file() && is_executable(direct)).then(|| direct.to_path_buf());
    }

    for dir in path_entries {
        for name in candidate_names(tool) {
            let candidate = dir.join(name);
            if candidate.is_file() && is_executable(&candidate) {
                return Some(candidate);
            }
        }
    }
    None
}

/// Split a PATH-style value into directories.
pub fn split_path(value: &OsStr) -> Vec<PathBuf> {
    std::env::split_paths(value).collect()
}

/// Parse the system PATH environment variable into a list of directories.
pub fn parse_system_path() -> Vec<PathBuf> {
    std::env::var_os("PATH")
        .map(|path| split_path(&path))
        .unwrap_or_default()
}

/// Locate a tool on the system PATH.
pub fn which(tool: &str) -> Option<PathBuf> {
    let found = resolve_tool_path(tool, &parse_system_path());
    tracing::debug!("Lookup of '{}' on PATH: {:?}", tool, found);
    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[cfg(unix)]
    fn make_executable(path: &Path) {
        use std::os::unix::fs::PermissionsExt;
        fs::write(path, "#!/bin/sh\n").unwrap();
        fs::set_permissions(path, fs::Permissions::from_mode(0o755)).unwrap();
    }

    #[cfg(unix)]
    #[test]
    fn resolves_first_matching_entry() {
        let first = TempDir::new().unwrap();
        let second = TempDir::new().unwrap();
        make_executable(&second.path().join("conda"));

        let entries = vec![first.path().to_path_buf(), second.path().to_path_buf()];
        let found = resolve_tool_path("conda", &entries).unwrap();
        assert_eq!(found, second.path().join("conda"));
    }

    #[cfg(unix)]
    #[test]
    fn skips_non_executable_files() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("conda"), "not executable").unwrap();

        let entries = vec![dir.path().to_path_buf()];
        assert!(resolve_tool_path("conda", &entries).is_none());
    }

    #[cfg(unix)]
    #[test]
    fn accepts_explicit_path() {
        let dir = TempDir::new().unwrap();
        let tool = dir.path().join("micromamba");
        make_executable(&tool);

        let found = resolve_tool_path(tool.to_str().unwrap(), &[]).unwrap();
        assert_eq!(found, tool);
    }

    #[test]
    fn missing_tool_returns_none() {
        let dir = TempDir::new().unwrap();
        let entries = vec![dir.path().to_path_buf()];
        assert!(resolve_tool_path("conda", &entries).is_none());
    }

    #[test]
    fn empty_path_returns_none() {
        assert!(resolve_tool_path("conda", &[]).is_none());
    }

    #[cfg(unix)]
    #[test]
    fn split_path_splits_on_colon() {
        let entries = split_path(OsStr::new("/usr/bin:/opt/conda/bin"));
        assert_eq!(
            entries,
            vec![PathBuf::from("/usr/bin"), PathBuf::from("/opt/conda/bin")]
        );
    }
}
