//! Result types for task tree operations
//!
//! This module contains the result types returned by [`TaskManager`](crate::manager::TaskManager)
//! and the execution engine, providing a centralized location for output structures.

use crate::color::TaskColor;

/// One row of the task listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskInfo {
    pub fqdn: String,
    pub description: Option<String>,
    pub color: TaskColor,
    pub is_meta: bool,
}

/// Result of listing every task in the tree
#[derive(Debug, Default)]
pub struct TaskListResult {
    pub tasks: Vec<TaskInfo>,
}

/// Result of building the resolved dependency graph
#[derive(Debug)]
pub struct DependencyGraphResult {
    /// Edges point from a task to the tasks it depends on
    pub graph: petgraph::Graph<String, ()>,
    pub cycles: Vec<Vec<String>>,
}

/// Final code of one directly requested task
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskOutcome {
    pub fqdn: String,
    pub code: i32,
}

/// Result of running a set of requested tasks
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub outcomes: Vec<TaskOutcome>,
}

impl RunReport {
    pub fn is_success(&self) -> bool {
        self.outcomes.iter().all(|outcome| outcome.code == 0)
    }

    /// Aggregated code of all requested tasks
    pub fn total_code(&self) -> i32 {
        self.outcomes
            .iter()
            .fold(0i32, |acc, outcome| acc.saturating_add(outcome.code))
    }

    /// Process exit status for the run, clamped to what an OS accepts
    pub fn exit_code(&self) -> i32 {
        if self.is_success() {
            0
        } else {
            self.total_code().clamp(1, 255)
        }
    }

    pub fn failures(&self) -> impl Iterator<Item = &TaskOutcome> {
        self.outcomes.iter().filter(|outcome| outcome.code != 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome(fqdn: &str, code: i32) -> TaskOutcome {
        TaskOutcome {
            fqdn: fqdn.to_string(),
            code,
        }
    }

    #[test]
    fn test_empty_report_succeeds() {
        let report = RunReport::default();
        assert!(report.is_success());
        assert_eq!(report.exit_code(), 0);
    }

    #[test]
    fn test_exit_code_is_clamped() {
        let report = RunReport {
            outcomes: vec![outcome("a:x", 0), outcome("a:y", 200), outcome("a:z", 200)],
        };
        assert!(!report.is_success());
        assert_eq!(report.total_code(), 400);
        assert_eq!(report.exit_code(), 255);
        let failed: Vec<_> = report.failures().map(|o| o.fqdn.as_str()).collect();
        assert_eq!(failed, vec!["a:y", "a:z"]);
    }
}
