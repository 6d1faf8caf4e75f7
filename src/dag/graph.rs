// src/dag/graph.rs

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::errors::{Result, TaskdagError};
use crate::exec::Action;

/// Public type alias for task names throughout the engine.
pub type TaskName = String;

/// What kind of target a task is.
#[derive(Debug, Clone)]
pub enum TaskKind {
    /// Completion is evidenced by a filesystem artifact at `produces`.
    File { produces: PathBuf },
    /// No artifact; runs every time it is reached.
    Action,
}

/// A single registered task: name, kind, ordered dependency list, and the
/// opaque action invoked when the task is stale.
#[derive(Clone)]
pub struct TaskSpec {
    pub name: TaskName,
    pub kind: TaskKind,
    /// Direct dependencies, in declaration order. Order carries no semantics
    /// but is preserved so resolution is deterministic.
    pub deps: Vec<TaskName>,
    pub action: Arc<dyn Action>,
    /// Human-readable description, shown by `--list`.
    pub desc: Option<String>,
}

impl TaskSpec {
    /// A file-producing task: skipped when its artifact is up to date.
    pub fn file(
        name: impl Into<TaskName>,
        produces: impl Into<PathBuf>,
        deps: Vec<TaskName>,
        action: Arc<dyn Action>,
    ) -> Self {
        Self {
            name: name.into(),
            kind: TaskKind::File {
                produces: produces.into(),
            },
            deps,
            action,
            desc: None,
        }
    }

    /// A pure action task: runs whenever it is reached.
    pub fn action(
        name: impl Into<TaskName>,
        deps: Vec<TaskName>,
        action: Arc<dyn Action>,
    ) -> Self {
        Self {
            name: name.into(),
            kind: TaskKind::Action,
            deps,
            action,
            desc: None,
        }
    }

    pub fn with_desc(mut self, desc: impl Into<String>) -> Self {
        self.desc = Some(desc.into());
        self
    }
}

impl fmt::Debug for TaskSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskSpec")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("deps", &self.deps)
            .field("desc", &self.desc)
            .finish_non_exhaustive()
    }
}

/// The declarative task registry: a mapping from task name to [`TaskSpec`].
///
/// Built once per invocation during the registration phase and immutable
/// afterwards; the scheduler only queries it.
#[derive(Debug, Default)]
pub struct TaskGraph {
    tasks: HashMap<TaskName, TaskSpec>,
}

impl TaskGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a task. Fails with [`TaskdagError::DuplicateTask`] if the name is
    /// already registered; dependency names are not checked here (they are
    /// resolved lazily, so registration order doesn't matter).
    pub fn register(&mut self, spec: TaskSpec) -> Result<()> {
        if self.tasks.contains_key(&spec.name) {
            return Err(TaskdagError::DuplicateTask(spec.name.clone()));
        }
        self.tasks.insert(spec.name.clone(), spec);
        Ok(())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tasks.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&TaskSpec> {
        self.tasks.get(name)
    }

    /// Ordered dependency names declared for `name`.
    pub fn dependencies_of(&self, name: &str) -> Result<&[TaskName]> {
        self.tasks
            .get(name)
            .map(|t| t.deps.as_slice())
            .ok_or_else(|| TaskdagError::UnknownTask(name.to_string()))
    }

    pub fn kind_of(&self, name: &str) -> Result<&TaskKind> {
        self.tasks
            .get(name)
            .map(|t| &t.kind)
            .ok_or_else(|| TaskdagError::UnknownTask(name.to_string()))
    }

    /// Artifact path of a file task; `None` for action tasks and unknown
    /// names.
    pub fn artifact_path_of(&self, name: &str) -> Option<&Path> {
        match self.tasks.get(name).map(|t| &t.kind) {
            Some(TaskKind::File { produces }) => Some(produces.as_path()),
            _ => None,
        }
    }

    pub fn tasks(&self) -> impl Iterator<Item = &TaskSpec> {
        self.tasks.values()
    }

    pub fn task_names(&self) -> impl Iterator<Item = &str> {
        self.tasks.keys().map(|s| s.as_str())
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}
