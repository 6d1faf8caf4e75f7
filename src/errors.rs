// src/errors.rs

//! Crate-wide error types.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TaskdagError {
    #[error("duplicate task '{0}'")]
    DuplicateTask(String),

    #[error("unknown task '{0}'")]
    UnknownTask(String),

    #[error("task '{task}' depends on unknown task '{dependency}'")]
    MissingDependency { task: String, dependency: String },

    #[error("cycle detected in task graph: {}", .cycle.join(" -> "))]
    CyclicDependency { cycle: Vec<String> },

    #[error("task '{task}' failed with exit code {code}")]
    ActionFailed { task: String, code: i32 },

    #[error("task '{task}' could not run: {source}")]
    ActionError {
        task: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl TaskdagError {
    /// The task name this error points at, where there is one.
    pub fn task_name(&self) -> Option<&str> {
        match self {
            TaskdagError::DuplicateTask(name)
            | TaskdagError::UnknownTask(name) => Some(name),
            TaskdagError::MissingDependency { task, .. }
            | TaskdagError::ActionFailed { task, .. }
            | TaskdagError::ActionError { task, .. } => Some(task),
            TaskdagError::CyclicDependency { cycle } => {
                cycle.first().map(|s| s.as_str())
            }
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, TaskdagError>;
