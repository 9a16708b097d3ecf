//! Tusk Core Library
//!
//! This is the core library for the Tusk task runner. It provides the namespace
//! tree tasks are declared in, pattern-based task selection, and the execution
//! engine that runs a task's dependency closure concurrently before the task
//! itself, multiplexing every task's output with a `[fqdn]: ` prefix.
//!
//! ## Architecture
//!
//! The core library is organized into several modules:
//!
//! - [`manager`] - High-level interface: load a definition file, list, select, run
//! - [`tree`] - Namespace tree arena, fully-qualified names and pattern search
//! - [`task`] - Task configuration, dependencies and memoized completion state
//! - [`execution`] - Execution engine, process launching and output multiplexing
//! - [`graph`] - Resolved dependency graph and cycle detection
//! - [`configs`] - Definition file parsing
//! - [`color`] - Per-task prefix colors
//! - [`results`] - Result types for listings, graphs and runs
//! - [`types`] - Common error types and type aliases
//!
//! ## Usage
//!
//! Tasks can be declared directly in code:
//!
//! ```rust,no_run
//! use tusk_core::task::TaskConfig;
//! use tusk_core::tree::{NamespaceConfig, TaskTree};
//!
//! # async fn example() -> tusk_core::types::TuskResult<()> {
//! let mut tree = TaskTree::new();
//! let root = tree.create_namespace(NamespaceConfig::new("app"))?;
//! let install = tree.register_task(root, TaskConfig::new("install").command(["npm", "install"]))?;
//! let web = tree.add_namespace(root, NamespaceConfig::new("web"))?;
//! tree.register_task(web, TaskConfig::new("build").command(["npm", "run", "build"]).depends_on(install))?;
//! let all = tree.register_task(root, TaskConfig::new("all").depends_on_pattern(":build$"))?;
//!
//! let code = tree.spawn(all).await;
//! # Ok(())
//! # }
//! ```

pub mod color;
pub mod configs;
pub mod execution;
pub mod graph;
pub mod manager;
pub mod results;
pub mod task;
pub mod tree;
pub mod types;

// Re-export the main types for easier usage
pub use manager::{TaskManager, TaskManagerConfig};
pub use task::{Task, TaskConfig, TaskId};
pub use tree::{Namespace, NamespaceConfig, NamespaceId, TaskTree};
pub use types::{TuskError, TuskResult};
