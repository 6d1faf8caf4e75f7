// src/dag/scheduler.rs

use std::collections::HashSet;
use std::time::SystemTime;

use tracing::{debug, info, warn};

use crate::dag::graph::{TaskGraph, TaskKind, TaskName};
use crate::dag::resolve::resolve;
use crate::errors::{Result, TaskdagError};
use crate::exec::ActionOutcome;
use crate::fs::ArtifactStore;

/// Knobs for a scheduling pass.
#[derive(Debug, Clone, Copy, Default)]
pub struct SchedulerOptions {
    /// Treat equal artifact timestamps as stale.
    ///
    /// Off by default: equal timestamps count as up to date. Turn on for
    /// filesystems with coarse mtime resolution.
    pub rebuild_on_equal_mtime: bool,
}

/// Terminal status of a task in a completed pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskStatus {
    /// Up to date; action not invoked.
    Skipped,
    /// Action invoked and reported success.
    Executed,
}

/// What happened during a pass, in execution order.
///
/// A report only exists for passes that ran to completion; a failed pass
/// surfaces as an error naming the failing task instead.
#[derive(Debug, Clone, Default)]
pub struct RunReport {
    entries: Vec<(TaskName, TaskStatus)>,
}

impl RunReport {
    pub fn entries(&self) -> &[(TaskName, TaskStatus)] {
        &self.entries
    }

    pub fn executed(&self) -> impl Iterator<Item = &str> {
        self.entries
            .iter()
            .filter(|(_, s)| *s == TaskStatus::Executed)
            .map(|(n, _)| n.as_str())
    }

    pub fn skipped(&self) -> impl Iterator<Item = &str> {
        self.entries
            .iter()
            .filter(|(_, s)| *s == TaskStatus::Skipped)
            .map(|(n, _)| n.as_str())
    }

    pub fn status_of(&self, name: &str) -> Option<TaskStatus> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, s)| *s)
    }

    fn push(&mut self, name: TaskName, status: TaskStatus) {
        self.entries.push((name, status));
    }
}

/// Resolves a target and drives its actions in dependency order.
///
/// Holds the immutable graph plus the artifact store; all per-pass state
/// (the ran-this-pass set, the report) lives inside the pass itself, so
/// independent passes over the same graph don't interfere.
pub struct Scheduler<'a, S: ArtifactStore> {
    graph: &'a TaskGraph,
    store: S,
    options: SchedulerOptions,
}

impl<'a, S: ArtifactStore> Scheduler<'a, S> {
    pub fn new(graph: &'a TaskGraph, store: S) -> Self {
        Self {
            graph,
            store,
            options: SchedulerOptions::default(),
        }
    }

    pub fn with_options(mut self, options: SchedulerOptions) -> Self {
        self.options = options;
        self
    }

    /// Resolve `target`, then execute every stale task at most once, in
    /// topological order, halting on the first action failure.
    ///
    /// Artifacts already produced when a failure hits stay on disk; a later
    /// pass re-evaluates staleness from current filesystem state and picks
    /// up where this one stopped.
    pub async fn resolve_and_run(&self, target: &str) -> Result<RunReport> {
        let order = resolve(self.graph, target)?;
        info!(target = %target, tasks = order.len(), "starting run");

        let mut ran: HashSet<TaskName> = HashSet::new();
        let mut report = RunReport::default();

        for name in &order {
            if self.must_run(name, &ran)? {
                self.execute(name).await?;
                ran.insert(name.clone());
                report.push(name.clone(), TaskStatus::Executed);
            } else {
                debug!(task = %name, "up to date; skipping");
                report.push(name.clone(), TaskStatus::Skipped);
            }
        }

        info!(
            target = %target,
            executed = ran.len(),
            skipped = order.len() - ran.len(),
            "run finished"
        );
        Ok(report)
    }

    /// Dry-run twin of [`resolve_and_run`](Self::resolve_and_run): same
    /// staleness decisions, no execution. Every would-run task is assumed to
    /// have run for cascade purposes, which is what a real pass would do.
    pub fn plan(&self, target: &str) -> Result<RunReport> {
        let order = resolve(self.graph, target)?;

        let mut ran: HashSet<TaskName> = HashSet::new();
        let mut report = RunReport::default();

        for name in &order {
            if self.must_run(name, &ran)? {
                ran.insert(name.clone());
                report.push(name.clone(), TaskStatus::Executed);
            } else {
                report.push(name.clone(), TaskStatus::Skipped);
            }
        }

        Ok(report)
    }

    /// Staleness check for one node, given which tasks already ran this pass.
    fn must_run(&self, name: &str, ran: &HashSet<TaskName>) -> Result<bool> {
        let produces = match self.graph.kind_of(name)? {
            // Pure actions have no artifact to compare against; they run
            // whenever they are reached.
            TaskKind::Action => return Ok(true),
            TaskKind::File { produces } => produces,
        };

        let own_mtime = match self.store.modified_time(produces)? {
            None => {
                debug!(task = %name, artifact = ?produces, "artifact missing; must run");
                return Ok(true);
            }
            Some(t) => t,
        };

        for dep in self.graph.dependencies_of(name)? {
            // A dependency that ran this pass forces its dependents,
            // whatever the timestamps say.
            if ran.contains(dep) {
                debug!(task = %name, dep = %dep, "dependency ran this pass; must run");
                return Ok(true);
            }

            if let Some(dep_path) = self.graph.artifact_path_of(dep) {
                if let Some(dep_mtime) = self.store.modified_time(dep_path)? {
                    if self.newer(dep_mtime, own_mtime) {
                        debug!(
                            task = %name,
                            dep = %dep,
                            "dependency artifact newer; must run"
                        );
                        return Ok(true);
                    }
                }
            }
        }

        Ok(false)
    }

    fn newer(&self, dep: SystemTime, own: SystemTime) -> bool {
        if self.options.rebuild_on_equal_mtime {
            dep >= own
        } else {
            dep > own
        }
    }

    async fn execute(&self, name: &str) -> Result<()> {
        let spec = self
            .graph
            .get(name)
            .ok_or_else(|| TaskdagError::UnknownTask(name.to_string()))?;

        info!(task = %name, "executing task");

        match spec.action.run().await {
            Ok(ActionOutcome::Success) => Ok(()),
            Ok(ActionOutcome::Failed(code)) => {
                warn!(task = %name, exit_code = code, "task action failed");
                Err(TaskdagError::ActionFailed {
                    task: name.to_string(),
                    code,
                })
            }
            Err(err) => {
                warn!(task = %name, error = %err, "task action errored");
                Err(TaskdagError::ActionError {
                    task: name.to_string(),
                    source: err.into(),
                })
            }
        }
    }
}
