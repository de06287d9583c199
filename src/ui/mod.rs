//! Interactive user interface components.
//!
//! This module provides:
//! - [`UserInterface`] trait for UI abstraction
//! - [`TerminalUI`] for interactive terminal usage
//! - [`NonInteractiveUI`] for CI/headless environments
//! - [`MockUI`] for tests
//! - Prompts, spinners, and the run summary
//!
//! # Example
//!
//! ```
//! use treeboot::ui::{create_ui, OutputMode};
//!
//! // Use non-interactive mode for testability
//! let mut ui = create_ui(false, OutputMode::Quiet);
//! ui.show_header("Tree Detection API");
//! ui.success("Environment ready");
//! ```

pub mod mock;
pub mod non_interactive;
pub mod output;
pub mod progress;
pub mod prompts;
pub mod spinner;
pub mod terminal;
pub mod theme;

pub use mock::{MockSpinner, MockUI};
pub use non_interactive::NonInteractiveUI;
pub use output::OutputMode;
pub use progress::format_duration;
pub use prompts::confirm_user;
pub use spinner::ProgressSpinner;
pub use terminal::{create_ui, TerminalUI};
pub use theme::{should_use_colors, TreebootTheme};

use std::time::Duration;

use crate::error::Result;

/// Trait for user interface interactions.
///
/// This trait allows mocking the UI in tests.
pub trait UserInterface {
    /// Get the current output mode.
    fn output_mode(&self) -> OutputMode;

    /// Display a message to the user.
    fn message(&mut self, msg: &str);

    /// Display a success message.
    fn success(&mut self, msg: &str);

    /// Display a warning message.
    fn warning(&mut self, msg: &str);

    /// Display an error message.
    fn error(&mut self, msg: &str);

    /// Ask a yes/no question.
    fn confirm(&mut self, prompt: &Prompt) -> Result<bool>;

    /// Start a spinner for an operation.
    fn start_spinner(&mut self, message: &str) -> Box<dyn SpinnerHandle>;

    /// Show a header/banner.
    fn show_header(&mut self, title: &str);

    /// Show progress (e.g., "Step 3 of 11").
    fn show_progress(&mut self, current: usize, total: usize);

    /// Show a contextual hint.
    fn show_hint(&mut self, hint: &str);

    /// Show a failed command with its output.
    fn show_error_block(&mut self, command: &str, output: &str, hint: Option<&str>);

    /// Show the end-of-run summary.
    fn show_summary(&mut self, summary: &RunSummary);

    /// Check if running in interactive mode.
    fn is_interactive(&self) -> bool;
}

/// Handle for controlling a spinner.
pub trait SpinnerHandle {
    /// Update the spinner message.
    fn set_message(&mut self, msg: &str);

    /// Mark the operation as successful.
    fn finish_success(&mut self, msg: &str);

    /// Mark the operation as failed.
    fn finish_error(&mut self, msg: &str);

    /// Mark as skipped.
    fn finish_skipped(&mut self, msg: &str);
}

/// A yes/no question to show to the user.
#[derive(Debug, Clone)]
pub struct Prompt {
    /// Unique key for the prompt (used for non-interactive overrides).
    pub key: String,
    /// The question to display.
    pub question: String,
    /// Answer used when the user just presses enter.
    pub default: bool,
}

impl Prompt {
    /// Create a confirm prompt.
    pub fn confirm(key: &str, question: &str, default: bool) -> Self {
        Self {
            key: key.to_string(),
            question: question.to_string(),
            default,
        }
    }
}

/// Parse a textual yes/no answer.
pub fn parse_answer(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "y" | "yes" | "true" | "1" => Some(true),
        "n" | "no" | "false" | "0" => Some(false),
        _ => None,
    }
}

/// Outcome of one pipeline stage, as shown in the summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    /// Stage ran and succeeded.
    Completed,
    /// Stage finished with a non-fatal warning.
    Warned,
    /// Stage did not run.
    Skipped,
    /// Stage failed.
    Failed,
}

impl StatusKind {
    /// Plain icon for this status.
    pub fn icon(&self) -> &'static str {
        match self {
            Self::Completed => "✓",
            Self::Warned => "⚠",
            Self::Skipped => "○",
            Self::Failed => "✗",
        }
    }
}

/// One row of the run summary.
#[derive(Debug, Clone)]
pub struct StageSummary {
    /// Stage name.
    pub name: String,
    /// Outcome.
    pub status: StatusKind,
    /// Extra detail (version, counts, reason for skipping).
    pub detail: Option<String>,
}

/// End-of-run summary.
#[derive(Debug, Clone)]
pub struct RunSummary {
    /// Per-stage rows in pipeline order.
    pub stages: Vec<StageSummary>,
    /// Wall-clock duration of the run.
    pub total_duration: Duration,
    /// Whether the run succeeded.
    pub success: bool,
}

impl RunSummary {
    /// Number of stages with the given status.
    pub fn count(&self, status: StatusKind) -> usize {
        self.stages.iter().filter(|s| s.status == status).count()
    }
}
