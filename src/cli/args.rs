//! CLI argument definitions.
//!
//! This module defines all CLI arguments using clap's derive macros.
//! The main entry point is the [`Cli`] struct.

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

/// treeboot - Provision the tree-detection API environment.
#[derive(Debug, Parser)]
#[command(name = "treeboot")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to config file (overrides default .treeboot.yml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Path to project root (overrides current directory)
    #[arg(short, long, global = true)]
    pub project: Option<PathBuf>,

    /// Show verbose output, including tool output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Minimal output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Provision the environment (default if no command specified)
    Run(RunArgs),

    /// Show tool, environment, model and directory status
    Status(StatusArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Arguments for the `run` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct RunArgs {
    /// Remove and recreate an existing environment without asking
    #[arg(long, conflicts_with = "update")]
    pub recreate: bool,

    /// Re-apply the spec file to an existing environment
    #[arg(long)]
    pub update: bool,

    /// Use defaults, no prompts
    #[arg(long)]
    pub non_interactive: bool,
}

/// Arguments for the `status` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct StatusArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `completions` command.
#[derive(Debug, Clone, clap::Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn no_subcommand_defaults_to_none() {
        let cli = Cli::try_parse_from(["treeboot"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn run_flags_parse() {
        let cli = Cli::try_parse_from(["treeboot", "run", "--recreate", "--non-interactive"])
            .unwrap();
        match cli.command {
            Some(Commands::Run(args)) => {
                assert!(args.recreate);
                assert!(args.non_interactive);
                assert!(!args.update);
            }
            other => panic!("expected run, got {:?}", other),
        }
    }

    #[test]
    fn recreate_conflicts_with_update() {
        let result = Cli::try_parse_from(["treeboot", "run", "--recreate", "--update"]);
        assert!(result.is_err());
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["treeboot", "status", "--json", "--project", "/srv/api"])
            .unwrap();
        assert_eq!(cli.project, Some(PathBuf::from("/srv/api")));
        assert!(matches!(cli.command, Some(Commands::Status(StatusArgs { json: true }))));
    }
}
