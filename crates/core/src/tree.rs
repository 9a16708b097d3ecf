//! Namespace tree
//!
//! The [`TaskTree`] is an arena owning every namespace and task declared for a
//! run. Namespaces point at their parent through a plain [`NamespaceId`]; the
//! parent's child list is the only owning edge. The tree is only mutated while
//! tasks are being declared and is read-only once execution starts.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use regex::Regex;
use tokio::sync::OnceCell;

use crate::color::TaskColor;
use crate::task::{DeclaredDependency, Dependency, Task, TaskConfig, TaskId};
use crate::types::{EntryKind, TuskError, TuskResult};

/// Handle to a namespace stored in a [`TaskTree`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NamespaceId(pub(crate) usize);

/// Settings for a new namespace
#[derive(Debug, Clone, Default)]
pub struct NamespaceConfig {
    pub name: String,
    pub directory: Option<PathBuf>,
}

impl NamespaceConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            directory: None,
        }
    }

    pub fn directory(mut self, directory: impl Into<PathBuf>) -> Self {
        self.directory = Some(directory.into());
        self
    }
}

/// A node of the tree grouping tasks and child namespaces
#[derive(Debug)]
pub struct Namespace {
    name: String,
    directory: Option<PathBuf>,
    parent: Option<NamespaceId>,
    children: Vec<NamespaceId>,
    child_names: HashMap<String, NamespaceId>,
    tasks: Vec<TaskId>,
    task_names: HashMap<String, TaskId>,
}

impl Namespace {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn directory(&self) -> Option<&Path> {
        self.directory.as_deref()
    }

    pub fn parent(&self) -> Option<NamespaceId> {
        self.parent
    }

    /// Child namespaces in insertion order
    pub fn children(&self) -> &[NamespaceId] {
        &self.children
    }

    /// Tasks declared directly under this namespace, in insertion order
    pub fn tasks(&self) -> &[TaskId] {
        &self.tasks
    }

    pub fn child(&self, name: &str) -> Option<NamespaceId> {
        self.child_names.get(name).copied()
    }

    pub fn task(&self, name: &str) -> Option<TaskId> {
        self.task_names.get(name).copied()
    }
}

/// Arena holding namespaces and tasks
#[derive(Debug, Default)]
pub struct TaskTree {
    namespaces: Vec<Namespace>,
    tasks: Vec<Task>,
}

fn validate_name(name: &str) -> TuskResult<()> {
    if name.is_empty() || name.contains(':') {
        return Err(TuskError::InvalidName(name.to_string()));
    }
    Ok(())
}

impl TaskTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a detached namespace. Attach it with [`TaskTree::adopt_child`]
    /// before registering tasks under it, since task names are qualified with
    /// the namespace path at registration time.
    pub fn create_namespace(&mut self, config: NamespaceConfig) -> TuskResult<NamespaceId> {
        validate_name(&config.name)?;
        let id = NamespaceId(self.namespaces.len());
        self.namespaces.push(Namespace {
            name: config.name,
            directory: config.directory,
            parent: None,
            children: Vec::new(),
            child_names: HashMap::new(),
            tasks: Vec::new(),
            task_names: HashMap::new(),
        });
        Ok(id)
    }

    /// Attach `child` under `parent`. Returns the child for chaining.
    pub fn adopt_child(
        &mut self,
        parent: NamespaceId,
        child: NamespaceId,
    ) -> TuskResult<NamespaceId> {
        let child_name = self.namespace(child).name.clone();

        if self.namespace(child).parent.is_some() {
            return Err(TuskError::AlreadyAttached(self.fqdn(child)));
        }
        // A detached child is always the root of its own subtree
        if self.root(parent) == child {
            return Err(TuskError::CyclicNamespace {
                child: self.fqdn(child),
                parent: self.fqdn(parent),
            });
        }
        if self.namespace(parent).child_names.contains_key(&child_name) {
            return Err(TuskError::NameCollision {
                kind: EntryKind::Namespace,
                name: child_name,
                namespace: self.fqdn(parent),
            });
        }

        let node = &mut self.namespaces[parent.0];
        node.children.push(child);
        node.child_names.insert(child_name, child);
        self.namespaces[child.0].parent = Some(parent);
        Ok(child)
    }

    /// Create a namespace and attach it under `parent` in one step
    pub fn add_namespace(
        &mut self,
        parent: NamespaceId,
        config: NamespaceConfig,
    ) -> TuskResult<NamespaceId> {
        if self.namespace(parent).child_names.contains_key(&config.name) {
            return Err(TuskError::NameCollision {
                kind: EntryKind::Namespace,
                name: config.name,
                namespace: self.fqdn(parent),
            });
        }
        let child = self.create_namespace(config)?;
        self.adopt_child(parent, child)
    }

    /// Construct a task bound to `namespace`
    pub fn register_task(
        &mut self,
        namespace: NamespaceId,
        config: TaskConfig,
    ) -> TuskResult<TaskId> {
        validate_name(&config.name)?;
        if self.namespace(namespace).task_names.contains_key(&config.name) {
            return Err(TuskError::NameCollision {
                kind: EntryKind::Task,
                name: config.name,
                namespace: self.fqdn(namespace),
            });
        }

        let fqdn = format!("{}:{}", self.fqdn(namespace), config.name);

        if matches!(&config.command, Some(argv) if argv.is_empty()) {
            return Err(TuskError::InvalidTask {
                task: fqdn,
                reason: "command must not be empty".to_string(),
            });
        }

        let mut dependencies = Vec::with_capacity(config.dependencies.len());
        for declared in config.dependencies {
            match declared {
                DeclaredDependency::Task(id) => {
                    if id.0 >= self.tasks.len() {
                        return Err(TuskError::UnknownTask(format!("#{}", id.0)));
                    }
                    dependencies.push(Dependency::Task(id));
                }
                DeclaredDependency::Pattern(pattern) => {
                    let regex = Regex::new(&pattern)
                        .map_err(|source| TuskError::InvalidPattern { pattern, source })?;
                    dependencies.push(Dependency::Pattern(regex));
                }
            }
        }

        let id = TaskId(self.tasks.len());
        let color = config.color.unwrap_or_else(|| TaskColor::for_name(&fqdn));
        self.tasks.push(Task {
            name: config.name.clone(),
            fqdn,
            namespace,
            command: config.command,
            dependencies,
            directory: config.directory,
            environment: config.environment,
            description: config.description,
            color,
            completion: OnceCell::new(),
        });

        let node = &mut self.namespaces[namespace.0];
        node.tasks.push(id);
        node.task_names.insert(config.name, id);
        Ok(id)
    }

    /// Look up a namespace. Ids are only handed out by this tree, so indexing
    /// with a foreign id is a caller bug.
    pub fn namespace(&self, id: NamespaceId) -> &Namespace {
        &self.namespaces[id.0]
    }

    pub fn task(&self, id: TaskId) -> &Task {
        &self.tasks[id.0]
    }

    /// Colon-joined path of names from the root to `id`
    pub fn fqdn(&self, id: NamespaceId) -> String {
        let namespace = self.namespace(id);
        match namespace.parent {
            Some(parent) => format!("{}:{}", self.fqdn(parent), namespace.name),
            None => namespace.name.clone(),
        }
    }

    pub fn root(&self, id: NamespaceId) -> NamespaceId {
        let mut current = id;
        while let Some(parent) = self.namespace(current).parent {
            current = parent;
        }
        current
    }

    /// `id` and all of its descendants, pre-order
    pub fn collect_all(&self, id: NamespaceId) -> Vec<NamespaceId> {
        let mut namespaces = Vec::new();
        self.collect_into(id, &mut namespaces);
        namespaces
    }

    fn collect_into(&self, id: NamespaceId, namespaces: &mut Vec<NamespaceId>) {
        namespaces.push(id);
        for &child in &self.namespace(id).children {
            self.collect_into(child, namespaces);
        }
    }

    /// Every task in the subtree of `id`, pre-order
    pub fn all_tasks(&self, id: NamespaceId) -> Vec<TaskId> {
        self.collect_all(id)
            .into_iter()
            .flat_map(|namespace| self.namespace(namespace).tasks.iter().copied())
            .collect()
    }

    /// Tasks in the subtree of `id` whose fqdn matches `pattern`. The pattern is
    /// used as given, with no implicit anchoring. Each namespace's own tasks are
    /// visited before its children.
    pub fn select(&self, id: NamespaceId, pattern: &Regex) -> Vec<TaskId> {
        let mut tasks = Vec::new();
        self.select_into(id, pattern, &mut tasks);
        tasks
    }

    fn select_into(&self, id: NamespaceId, pattern: &Regex, tasks: &mut Vec<TaskId>) {
        let namespace = self.namespace(id);
        tasks.extend(
            namespace
                .tasks
                .iter()
                .copied()
                .filter(|&task| pattern.is_match(&self.task(task).fqdn)),
        );
        for &child in &namespace.children {
            self.select_into(child, pattern, tasks);
        }
    }

    /// Find a task by its exact fqdn anywhere in the tree
    pub fn find_task(&self, fqdn: &str) -> Option<TaskId> {
        self.tasks
            .iter()
            .position(|task| task.fqdn == fqdn)
            .map(TaskId)
    }

    /// Resolve the dependencies of `id` against the tree as it is right now.
    /// Patterns are matched from the root of the task's tree and never resolve
    /// to the task itself.
    pub fn resolve_dependencies(&self, id: TaskId) -> Vec<TaskId> {
        let task = self.task(id);
        let root = self.root(task.namespace);
        let mut resolved = Vec::new();
        for dependency in &task.dependencies {
            match dependency {
                Dependency::Task(dep) => resolved.push(*dep),
                Dependency::Pattern(pattern) => resolved.extend(
                    self.select(root, pattern)
                        .into_iter()
                        .filter(|&dep| dep != id),
                ),
            }
        }
        resolved
    }

    /// Working directory a task's command runs in, if any override applies
    pub fn working_directory(&self, id: TaskId) -> Option<&Path> {
        let task = self.task(id);
        task.directory
            .as_deref()
            .or_else(|| self.namespace(task.namespace).directory.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree_abc() -> (TaskTree, NamespaceId, NamespaceId, NamespaceId) {
        let mut tree = TaskTree::new();
        let a = tree.create_namespace(NamespaceConfig::new("a")).unwrap();
        let b = tree.add_namespace(a, NamespaceConfig::new("b")).unwrap();
        let c = tree.add_namespace(b, NamespaceConfig::new("c")).unwrap();
        (tree, a, b, c)
    }

    fn names(tree: &TaskTree, ids: &[TaskId]) -> Vec<String> {
        let mut names: Vec<String> = ids.iter().map(|&id| tree.task(id).fqdn.clone()).collect();
        names.sort();
        names
    }

    #[test]
    fn test_fqdn_joins_path_from_root() {
        let (tree, a, b, c) = tree_abc();
        assert_eq!(tree.fqdn(a), "a");
        assert_eq!(tree.fqdn(b), "a:b");
        assert_eq!(tree.fqdn(c), "a:b:c");
    }

    #[test]
    fn test_task_fqdn_includes_namespace() {
        let (mut tree, _, _, c) = tree_abc();
        let task = tree.register_task(c, TaskConfig::new("build")).unwrap();
        assert_eq!(tree.task(task).fqdn(), "a:b:c:build");
        assert_eq!(tree.task(task).name(), "build");
    }

    #[test]
    fn test_duplicate_child_is_rejected() {
        let (mut tree, a, b, _) = tree_abc();
        let twin = tree.create_namespace(NamespaceConfig::new("b")).unwrap();
        let err = tree.adopt_child(a, twin).unwrap_err();
        assert!(matches!(
            err,
            TuskError::NameCollision {
                kind: EntryKind::Namespace,
                ..
            }
        ));
        assert_eq!(tree.namespace(a).child("b"), Some(b));
        assert_eq!(tree.namespace(a).children(), &[b]);
        assert!(tree.namespace(twin).parent().is_none());
    }

    #[test]
    fn test_duplicate_task_is_rejected() {
        let (mut tree, a, _, _) = tree_abc();
        let first = tree
            .register_task(a, TaskConfig::new("lint").command(["true"]))
            .unwrap();
        let err = tree
            .register_task(a, TaskConfig::new("lint").command(["false"]))
            .unwrap_err();
        assert!(matches!(
            err,
            TuskError::NameCollision {
                kind: EntryKind::Task,
                ..
            }
        ));
        assert_eq!(tree.namespace(a).task("lint"), Some(first));
        assert_eq!(tree.task(first).command(), Some(&["true".to_string()][..]));
        assert_eq!(tree.namespace(a).tasks().len(), 1);
    }

    #[test]
    fn test_adopt_child_returns_child_and_sets_parent() {
        let mut tree = TaskTree::new();
        let root = tree.create_namespace(NamespaceConfig::new("root")).unwrap();
        let child = tree.create_namespace(NamespaceConfig::new("child")).unwrap();
        assert_eq!(tree.adopt_child(root, child).unwrap(), child);
        assert_eq!(tree.namespace(child).parent(), Some(root));
        assert_eq!(tree.root(child), root);
    }

    #[test]
    fn test_adopting_attached_namespace_fails() {
        let (mut tree, a, _, c) = tree_abc();
        let other = tree.create_namespace(NamespaceConfig::new("other")).unwrap();
        assert!(matches!(
            tree.adopt_child(other, c),
            Err(TuskError::AlreadyAttached(_))
        ));
        assert_eq!(tree.root(c), a);
    }

    #[test]
    fn test_adopting_own_root_fails() {
        let (mut tree, a, _, c) = tree_abc();
        assert!(matches!(
            tree.adopt_child(c, a),
            Err(TuskError::CyclicNamespace { .. })
        ));
        assert!(matches!(
            tree.adopt_child(a, a),
            Err(TuskError::CyclicNamespace { .. })
        ));
    }

    #[test]
    fn test_invalid_names_are_rejected() {
        let mut tree = TaskTree::new();
        assert!(matches!(
            tree.create_namespace(NamespaceConfig::new("")),
            Err(TuskError::InvalidName(_))
        ));
        let root = tree.create_namespace(NamespaceConfig::new("root")).unwrap();
        assert!(matches!(
            tree.register_task(root, TaskConfig::new("a:b")),
            Err(TuskError::InvalidName(_))
        ));
    }

    #[test]
    fn test_empty_command_is_rejected() {
        let mut tree = TaskTree::new();
        let root = tree.create_namespace(NamespaceConfig::new("root")).unwrap();
        let err = tree
            .register_task(root, TaskConfig::new("noop").command(Vec::<String>::new()))
            .unwrap_err();
        assert!(matches!(err, TuskError::InvalidTask { .. }));
    }

    #[test]
    fn test_invalid_pattern_is_rejected() {
        let mut tree = TaskTree::new();
        let root = tree.create_namespace(NamespaceConfig::new("root")).unwrap();
        let err = tree
            .register_task(root, TaskConfig::new("broken").depends_on_pattern("("))
            .unwrap_err();
        assert!(matches!(err, TuskError::InvalidPattern { .. }));
        assert!(tree.namespace(root).task("broken").is_none());
    }

    #[test]
    fn test_unknown_direct_reference_is_rejected() {
        let mut tree = TaskTree::new();
        let root = tree.create_namespace(NamespaceConfig::new("root")).unwrap();
        let err = tree
            .register_task(root, TaskConfig::new("a").depends_on(TaskId(42)))
            .unwrap_err();
        assert!(matches!(err, TuskError::UnknownTask(_)));
    }

    #[test]
    fn test_collect_all_is_preorder() {
        let mut tree = TaskTree::new();
        let root = tree.create_namespace(NamespaceConfig::new("r")).unwrap();
        let x = tree.add_namespace(root, NamespaceConfig::new("x")).unwrap();
        let y = tree.add_namespace(root, NamespaceConfig::new("y")).unwrap();
        let x1 = tree.add_namespace(x, NamespaceConfig::new("x1")).unwrap();
        assert_eq!(tree.collect_all(root), vec![root, x, x1, y]);
        assert_eq!(tree.collect_all(x), vec![x, x1]);
    }

    #[test]
    fn test_select_matches_whole_subtree_at_any_depth() {
        let (mut tree, a, b, c) = tree_abc();
        tree.register_task(a, TaskConfig::new("build")).unwrap();
        tree.register_task(b, TaskConfig::new("build")).unwrap();
        tree.register_task(c, TaskConfig::new("build")).unwrap();
        tree.register_task(c, TaskConfig::new("test")).unwrap();

        let build = Regex::new("build$").unwrap();
        assert_eq!(
            names(&tree, &tree.select(a, &build)),
            vec!["a:b:build", "a:b:c:build", "a:build"]
        );
        assert_eq!(
            names(&tree, &tree.select(b, &build)),
            vec!["a:b:build", "a:b:c:build"]
        );

        let everything = Regex::new("").unwrap();
        assert_eq!(tree.select(c, &everything).len(), 2);
    }

    #[test]
    fn test_select_does_not_anchor_implicitly() {
        let (mut tree, a, b, _) = tree_abc();
        tree.register_task(b, TaskConfig::new("check")).unwrap();
        assert_eq!(tree.select(a, &Regex::new("b:ch").unwrap()).len(), 1);
        assert!(tree.select(a, &Regex::new("^b:ch").unwrap()).is_empty());
    }

    #[test]
    fn test_select_visits_own_tasks_before_children() {
        let (mut tree, a, b, _) = tree_abc();
        let nested = tree.register_task(b, TaskConfig::new("t")).unwrap();
        let top = tree.register_task(a, TaskConfig::new("t")).unwrap();
        assert_eq!(tree.select(a, &Regex::new("t$").unwrap()), vec![top, nested]);
    }

    #[test]
    fn test_pattern_dependency_excludes_self() {
        let mut tree = TaskTree::new();
        let root = tree.create_namespace(NamespaceConfig::new("r")).unwrap();
        let one = tree.register_task(root, TaskConfig::new("one")).unwrap();
        let all = tree
            .register_task(root, TaskConfig::new("all").depends_on_pattern("^r:"))
            .unwrap();
        assert_eq!(tree.resolve_dependencies(all), vec![one]);
    }

    #[test]
    fn test_pattern_dependency_resolves_against_current_tree() {
        let mut tree = TaskTree::new();
        let root = tree.create_namespace(NamespaceConfig::new("r")).unwrap();
        let release = tree
            .register_task(root, TaskConfig::new("release").depends_on_pattern(":dist:"))
            .unwrap();
        assert!(tree.resolve_dependencies(release).is_empty());

        let dist = tree.add_namespace(root, NamespaceConfig::new("dist")).unwrap();
        let linux = tree.register_task(dist, TaskConfig::new("linux")).unwrap();
        assert_eq!(tree.resolve_dependencies(release), vec![linux]);
    }

    #[test]
    fn test_pattern_dependency_searches_from_root() {
        let (mut tree, a, _, c) = tree_abc();
        let install = tree.register_task(a, TaskConfig::new("install")).unwrap();
        let deep = tree
            .register_task(c, TaskConfig::new("deep").depends_on_pattern("install$"))
            .unwrap();
        assert_eq!(tree.resolve_dependencies(deep), vec![install]);
    }

    #[test]
    fn test_working_directory_prefers_task_override() {
        let mut tree = TaskTree::new();
        let root = tree
            .create_namespace(NamespaceConfig::new("r").directory("/ns"))
            .unwrap();
        let inherited = tree.register_task(root, TaskConfig::new("a")).unwrap();
        let overridden = tree
            .register_task(root, TaskConfig::new("b").directory("/task"))
            .unwrap();
        assert_eq!(tree.working_directory(inherited), Some(Path::new("/ns")));
        assert_eq!(tree.working_directory(overridden), Some(Path::new("/task")));
    }

    #[test]
    fn test_find_task_by_fqdn() {
        let (mut tree, _, b, _) = tree_abc();
        let id = tree.register_task(b, TaskConfig::new("x")).unwrap();
        assert_eq!(tree.find_task("a:b:x"), Some(id));
        assert_eq!(tree.find_task("a:x"), None);
    }
}
