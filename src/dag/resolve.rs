// src/dag/resolve.rs

use std::collections::HashMap;

use tracing::debug;

use crate::dag::graph::{TaskGraph, TaskName};
use crate::errors::{Result, TaskdagError};

/// Per-task resolution marker.
///
/// `Visiting` means the task is on the current DFS path; revisiting such a
/// node is the cycle-failure transition. `Done` means the task has been
/// placed in the order and further visits are no-ops.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    Visiting,
    Done,
}

/// Resolve `target` into a deduplicated topological order over its
/// transitive dependency closure.
///
/// The traversal is left-to-right depth-first post-order following each
/// task's declared dependency list, so every dependency lands strictly
/// before its dependents and a task reachable via multiple paths appears
/// exactly once, at its first completed resolution.
pub fn resolve(graph: &TaskGraph, target: &str) -> Result<Vec<TaskName>> {
    if !graph.contains(target) {
        return Err(TaskdagError::UnknownTask(target.to_string()));
    }

    let mut resolver = Resolver {
        graph,
        marks: HashMap::new(),
        path: Vec::new(),
        order: Vec::new(),
    };
    resolver.visit(target)?;

    debug!(target = %target, order = ?resolver.order, "resolved execution order");
    Ok(resolver.order)
}

struct Resolver<'a> {
    graph: &'a TaskGraph,
    marks: HashMap<TaskName, Mark>,
    /// Current DFS path, kept only so cycles can be reported by name.
    path: Vec<TaskName>,
    order: Vec<TaskName>,
}

impl Resolver<'_> {
    fn visit(&mut self, name: &str) -> Result<()> {
        match self.marks.get(name) {
            Some(Mark::Done) => return Ok(()),
            Some(Mark::Visiting) => {
                return Err(TaskdagError::CyclicDependency {
                    cycle: self.cycle_through(name),
                });
            }
            None => {}
        }

        self.marks.insert(name.to_string(), Mark::Visiting);
        self.path.push(name.to_string());

        let deps = self.graph.dependencies_of(name)?.to_vec();
        for dep in deps {
            if !self.graph.contains(&dep) {
                return Err(TaskdagError::MissingDependency {
                    task: name.to_string(),
                    dependency: dep,
                });
            }
            self.visit(&dep)?;
        }

        self.path.pop();
        self.marks.insert(name.to_string(), Mark::Done);
        self.order.push(name.to_string());
        Ok(())
    }

    /// The current DFS path from the first occurrence of `name`, closed with
    /// `name` again: `A -> B -> C -> A`.
    fn cycle_through(&self, name: &str) -> Vec<TaskName> {
        let start = self.path.iter().position(|n| n == name).unwrap_or(0);
        let mut cycle: Vec<TaskName> = self.path[start..].to_vec();
        cycle.push(name.to_string());
        cycle
    }
}
