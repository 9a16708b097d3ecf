//! Process launching
//!
//! Builds the OS command for a task and normalizes its exit status into the
//! non-negative codes the engine aggregates.

use std::process::{ExitStatus, Stdio};

use tokio::process::Command;

use crate::task::{Task, TaskId};
use crate::tree::TaskTree;

/// Code reported when a task's command cannot be started
pub const SPAWN_FAILURE_CODE: i32 = 127;

/// Build the command for a task with captured output streams.
/// Returns `None` for meta-tasks.
pub fn build_command(tree: &TaskTree, id: TaskId) -> Option<Command> {
    let task: &Task = tree.task(id);
    let (program, args) = task.command()?.split_first()?;

    let mut command = Command::new(program);
    command
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

    if let Some(directory) = tree.working_directory(id) {
        command.current_dir(directory);
    }
    // Inherited environment, overridden key by key
    if let Some(environment) = task.environment() {
        command.envs(environment);
    }

    Some(command)
}

/// Convert an exit status into a non-negative code so sums never cancel out
pub fn exit_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return non_negative(code);
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }

    1
}

/// Windows reports NTSTATUS failures as negative codes
fn non_negative(code: i32) -> i32 {
    if code >= 0 {
        code
    } else {
        code.unsigned_abs().min(i32::MAX as u32) as i32
    }
}
