// src/dag/mod.rs

//! Task graph and the resolution/execution engine.
//!
//! - [`graph`] holds the registered tasks and their dependency edges.
//! - [`resolve`] turns a requested target into a deduplicated topological
//!   order, detecting cycles and missing dependencies on the way.
//! - [`scheduler`] evaluates staleness per node and drives actions in that
//!   order, failing fast on the first action failure.

pub mod graph;
pub mod resolve;
pub mod scheduler;

pub use graph::{TaskGraph, TaskKind, TaskName, TaskSpec};
pub use resolve::resolve;
pub use scheduler::{RunReport, Scheduler, SchedulerOptions, TaskStatus};
