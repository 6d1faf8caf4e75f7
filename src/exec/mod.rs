// src/exec/mod.rs

//! The action layer: what actually happens when a task runs.
//!
//! The engine treats every action as a black box. It calls [`Action::run`]
//! with no arguments and awaits a success/failure signal; process spawning,
//! IO, and anything else is the action's business.
//!
//! - [`command`] owns the production implementation which runs a command
//!   line through the platform shell via `tokio::process::Command`.

pub mod command;

use std::future::Future;
use std::pin::Pin;

use crate::errors::Result;

/// Result of invoking a task's action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionOutcome {
    Success,
    Failed(i32), // exit code
}

/// The opaque callable attached to a task at registration time.
///
/// Supplied as a value rather than assumed ambient shell access, so tests
/// can substitute fakes that record invocations without touching the
/// filesystem.
pub trait Action: Send + Sync {
    fn run(&self) -> Pin<Box<dyn Future<Output = Result<ActionOutcome>> + Send + '_>>;
}

/// Adapter so a closure can be used as an [`Action`].
pub struct FnAction<F>(pub F);

impl<F, Fut> Action for FnAction<F>
where
    F: Fn() -> Fut + Send + Sync,
    Fut: Future<Output = Result<ActionOutcome>> + Send + 'static,
{
    fn run(&self) -> Pin<Box<dyn Future<Output = Result<ActionOutcome>> + Send + '_>> {
        Box::pin((self.0)())
    }
}

pub use command::CommandAction;
