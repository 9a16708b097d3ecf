//! Resolved dependency graph
//!
//! A static snapshot of the edges [`Executor::spawn`](crate::execution::Executor::spawn)
//! would follow right now, used for display and for refusing to start runs
//! that could never finish.

use std::collections::{HashMap, HashSet, VecDeque};

use petgraph::algo::kosaraju_scc;
use petgraph::prelude::*;

use crate::results::DependencyGraphResult;
use crate::task::TaskId;
use crate::tree::{NamespaceId, TaskTree};

/// Build the dependency graph of every task under `root`
pub fn build_dependency_graph(tree: &TaskTree, root: NamespaceId) -> DependencyGraphResult {
    let mut graph = DiGraph::<String, ()>::new();
    let mut node_indices = HashMap::new();

    let tasks = tree.all_tasks(root);
    for &task in &tasks {
        let node_index = graph.add_node(tree.task(task).fqdn().to_string());
        node_indices.insert(task, node_index);
    }

    for &task in &tasks {
        let from_node = node_indices[&task];
        for dep in tree.resolve_dependencies(task) {
            // Direct references may point outside this subtree
            let to_node = *node_indices
                .entry(dep)
                .or_insert_with(|| graph.add_node(tree.task(dep).fqdn().to_string()));
            if !graph.contains_edge(from_node, to_node) {
                graph.add_edge(from_node, to_node, ());
            }
        }
    }

    let mut cycles: Vec<Vec<String>> = kosaraju_scc(&graph)
        .into_iter()
        .filter_map(|component| {
            if component.len() > 1 {
                let mut cycle = component
                    .iter()
                    .map(|node| graph[*node].clone())
                    .collect::<Vec<_>>();
                cycle.sort();
                Some(cycle)
            } else {
                let node = component[0];
                if graph.contains_edge(node, node) {
                    Some(vec![graph[node].clone()])
                } else {
                    None
                }
            }
        })
        .collect();

    cycles.sort();

    DependencyGraphResult { graph, cycles }
}

/// Render a cycle as a closed path, `a -> b -> a`
pub fn cycle_path(cycle: &[String]) -> String {
    match cycle.first() {
        Some(first) => {
            let mut path: Vec<&str> = cycle.iter().map(String::as_str).collect();
            path.push(first);
            path.join(" -> ")
        }
        None => String::new(),
    }
}

/// Cycles reachable from `targets`, as `a -> b -> a` paths
pub fn reachable_cycles(tree: &TaskTree, targets: &[TaskId]) -> Vec<String> {
    let mut reachable = HashSet::new();
    let mut queue: VecDeque<TaskId> = targets.iter().copied().collect();
    while let Some(task) = queue.pop_front() {
        if !reachable.insert(task) {
            continue;
        }
        queue.extend(tree.resolve_dependencies(task));
    }

    let reachable_names: HashSet<&str> = reachable
        .iter()
        .map(|&task| tree.task(task).fqdn())
        .collect();

    let roots: HashSet<NamespaceId> = targets
        .iter()
        .map(|&task| tree.root(tree.task(task).namespace()))
        .collect();

    let mut relevant = Vec::new();
    for root in roots {
        for cycle in build_dependency_graph(tree, root).cycles {
            if cycle.iter().any(|name| reachable_names.contains(name.as_str())) {
                relevant.push(cycle_path(&cycle));
            }
        }
    }
    relevant.sort();
    relevant.dedup();
    relevant
}
