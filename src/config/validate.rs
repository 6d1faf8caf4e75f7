// src/config/validate.rs

use anyhow::anyhow;
use petgraph::algo::toposort;
use petgraph::graphmap::DiGraphMap;

use crate::config::model::ConfigFile;
use crate::errors::{Result, TaskdagError};

/// Run semantic validation against a loaded configuration.
///
/// This checks:
/// - there is at least one task
/// - all `deps` refer to existing tasks (and no task depends on itself)
/// - `default_task`, if set, refers to an existing task
/// - the task graph has no cycles
///
/// The engine repeats the unknown-dependency and cycle checks during
/// resolution, so library users building a [`crate::dag::TaskGraph`] by hand
/// get the same errors without going through this module.
pub fn validate_config(cfg: &ConfigFile) -> Result<()> {
    ensure_has_tasks(cfg)?;
    validate_default_task(cfg)?;
    validate_task_dependencies(cfg)?;
    validate_dag(cfg)?;
    Ok(())
}

fn ensure_has_tasks(cfg: &ConfigFile) -> Result<()> {
    if cfg.task.is_empty() {
        return Err(anyhow!(
            "config must contain at least one [task.<name>] section"
        )
        .into());
    }
    Ok(())
}

fn validate_default_task(cfg: &ConfigFile) -> Result<()> {
    if let Some(name) = &cfg.config.default_task {
        if !cfg.task.contains_key(name) {
            return Err(TaskdagError::UnknownTask(name.clone()));
        }
    }
    Ok(())
}

fn validate_task_dependencies(cfg: &ConfigFile) -> Result<()> {
    for (name, task) in cfg.task.iter() {
        for dep in task.deps.iter() {
            if !cfg.task.contains_key(dep) {
                return Err(TaskdagError::MissingDependency {
                    task: name.clone(),
                    dependency: dep.clone(),
                });
            }
            if dep == name {
                return Err(TaskdagError::CyclicDependency {
                    cycle: vec![name.clone(), name.clone()],
                });
            }
        }
    }
    Ok(())
}

fn validate_dag(cfg: &ConfigFile) -> Result<()> {
    // Build a petgraph graph from the tasks and their dependencies.
    //
    // Edge direction: dep -> task. For:
    //   [task.B]
    //   deps = ["A"]
    // we add edge A -> B.
    let mut graph: DiGraphMap<&str, ()> = DiGraphMap::new();

    for name in cfg.task.keys() {
        graph.add_node(name.as_str());
    }

    for (name, task) in cfg.task.iter() {
        for dep in task.deps.iter() {
            graph.add_edge(dep.as_str(), name.as_str(), ());
        }
    }

    // A topological sort will fail if there is a cycle.
    match toposort(&graph, None) {
        Ok(_order) => Ok(()),
        Err(cycle) => {
            let node = cycle.node_id();
            Err(TaskdagError::CyclicDependency {
                cycle: vec![node.to_string()],
            })
        }
    }
}
