//! Environment provisioning pipeline.
//!
//! [`Bootstrapper`] runs the fixed sequence of stages in [`Stage::ALL`]:
//! tool check, environment create/update, activation, import smoke tests,
//! model inventory, directory scaffold, and the completion banner. Every
//! stage is idempotent, so rerunning after fixing a failure is safe.
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use treeboot::bootstrap::Bootstrapper;
//! use treeboot::config::BootstrapConfig;
//! use treeboot::manager::CondaManager;
//! use treeboot::ui::{create_ui, OutputMode};
//!
//! let config = BootstrapConfig::default();
//! let root = Path::new(".");
//! let manager = CondaManager::new(&config.tool, root);
//! let mut ui = create_ui(true, OutputMode::Normal);
//!
//! let report = Bootstrapper::new(&manager, &config, root).run(ui.as_mut())?;
//! println!("{} warnings", report.warnings());
//! # Ok::<(), treeboot::BootstrapError>(())
//! ```

pub mod banner;
pub mod deps;
pub mod inventory;
pub mod pipeline;
pub mod report;
pub mod scaffold;
pub mod stage;

pub use banner::{completion_lines, show_banner};
pub use deps::{batch_import_script, check_critical, check_secondary, DependencyCheckResult};
pub use inventory::{copy_hint, CategoryCount, ModelInventory};
pub use pipeline::{BootstrapOptions, Bootstrapper, RECREATE_PROMPT_KEY};
pub use report::{BootstrapReport, EnvironmentAction, StageRecord, StatusReport};
pub use scaffold::{DirectoryScaffold, DirectoryStatus, ScaffoldOutcome};
pub use stage::{Stage, StageOutcome};
