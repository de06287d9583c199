//! Process execution, PATH lookup, and shell detection.

pub mod command;
pub mod path;
pub mod platform;

pub use command::{display_command, execute, CommandOptions, CommandResult};
pub use path::{is_executable, parse_system_path, resolve_tool_path, split_path, which};
pub use platform::{detect_shell, is_ci, profile_files, shell_info, ShellInfo, ShellType};
