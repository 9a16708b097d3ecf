//! Execution engine
//!
//! [`Executor::spawn`] walks the dependency graph lazily: dependencies are
//! resolved fresh on every call, started together, and must all succeed before
//! the task's own command runs. The command itself runs at most once per task;
//! every later or concurrent caller awaits the same recorded exit code.
//!
//! Cycles are not detected here. A cyclic graph never completes.

use futures::future::{join_all, BoxFuture, FutureExt};
use tracing::{debug, error, info, warn};

use crate::execution::command::{build_command, exit_code, SPAWN_FAILURE_CODE};
use crate::execution::output::{pump, ConsoleSink, OutputSink, Stream};
use crate::results::{RunReport, TaskOutcome};
use crate::task::TaskId;
use crate::tree::TaskTree;

static CONSOLE: ConsoleSink = ConsoleSink;

/// Runs tasks of a tree, writing their output to a sink
#[derive(Clone, Copy)]
pub struct Executor<'a> {
    tree: &'a TaskTree,
    sink: &'a dyn OutputSink,
}

impl<'a> Executor<'a> {
    pub fn new(tree: &'a TaskTree, sink: &'a dyn OutputSink) -> Self {
        Self { tree, sink }
    }

    /// Executor writing to the process's stdout and stderr
    pub fn console(tree: &'a TaskTree) -> Self {
        Self::new(tree, &CONSOLE)
    }

    /// Run a task after its dependencies and return its exit code.
    ///
    /// A nonzero code from any dependency is returned as the summed code of
    /// all dependencies without starting the task's own command.
    pub fn spawn(self, id: TaskId) -> BoxFuture<'a, i32> {
        async move {
            let task = self.tree.task(id);
            let dependencies = self.tree.resolve_dependencies(id);
            debug!(task = %task.fqdn(), count = dependencies.len(), "Resolved dependencies");

            let codes = join_all(dependencies.iter().map(|&dep| self.spawn(dep))).await;
            let code = codes.into_iter().fold(0i32, i32::saturating_add);
            if code != 0 {
                warn!(task = %task.fqdn(), code, "Skipping task, a dependency failed");
                return code;
            }
            if task.is_meta() {
                return code;
            }

            if task.completion.initialized() {
                debug!(task = %task.fqdn(), "Command already ran, reusing its exit code");
            }
            *task.completion.get_or_init(|| self.launch(id)).await
        }
        .boxed()
    }

    /// Start every target together and collect their codes in request order
    pub async fn run(self, targets: &[TaskId]) -> RunReport {
        let codes = join_all(targets.iter().map(|&id| self.spawn(id))).await;
        let outcomes = targets
            .iter()
            .zip(codes)
            .map(|(&id, code)| TaskOutcome {
                fqdn: self.tree.task(id).fqdn().to_string(),
                code,
            })
            .collect();
        RunReport { outcomes }
    }

    async fn launch(self, id: TaskId) -> i32 {
        let task = self.tree.task(id);
        let spawned = match build_command(self.tree, id) {
            Some(mut command) => {
                debug!(task = %task.fqdn(), command = ?task.command(), "Starting command");
                command.spawn()
            }
            None => return 0,
        };

        let mut child = match spawned {
            Ok(child) => child,
            Err(e) => {
                error!(task = %task.fqdn(), "Failed to start command: {}", e);
                return SPAWN_FAILURE_CODE;
            }
        };

        let stdout = child.stdout.take();
        let stderr = child.stderr.take();
        let sink = self.sink;
        let drain_stdout = async move {
            if let Some(stdout) = stdout {
                pump(stdout, task, Stream::Stdout, sink).await;
            }
        };
        let drain_stderr = async move {
            if let Some(stderr) = stderr {
                pump(stderr, task, Stream::Stderr, sink).await;
            }
        };

        let (_, _, status) = tokio::join!(drain_stdout, drain_stderr, child.wait());
        let code = match status {
            Ok(status) => exit_code(status),
            Err(e) => {
                error!(task = %task.fqdn(), "Failed to wait for command: {}", e);
                1
            }
        };

        if code == 0 {
            info!(task = %task.fqdn(), "Task completed");
        } else {
            warn!(task = %task.fqdn(), code, "Task failed");
        }
        code
    }
}

impl TaskTree {
    /// Run a task with its output sent to the console
    pub async fn spawn(&self, id: TaskId) -> i32 {
        Executor::console(self).spawn(id).await
    }
}
