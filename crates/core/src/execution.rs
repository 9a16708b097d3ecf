//! Task execution module
//!
//! This module handles the actual execution of tasks: dependency fan-out,
//! memoized command launches, and multiplexing of each task's output.

pub mod command;
pub mod engine;
pub mod output;

pub use command::{build_command, exit_code, SPAWN_FAILURE_CODE};
pub use engine::Executor;
pub use output::{CapturedOutput, ConsoleSink, LineBuffer, OutputSink, Stream};
