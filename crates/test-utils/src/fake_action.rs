use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use taskdag::errors::Result;
use taskdag::exec::{Action, ActionOutcome};
use taskdag::fs::mock::MockFileSystem;

/// Shared invocation log for a graph of [`FakeAction`]s.
pub type InvocationLog = Arc<Mutex<Vec<String>>>;

pub fn shared_log() -> InvocationLog {
    Arc::new(Mutex::new(Vec::new()))
}

/// A fake action that:
/// - records its invocation into a shared log
/// - returns a pre-configured outcome
/// - optionally stamps an artifact into a [`MockFileSystem`] on success,
///   the way a real file task would leave a fresh artifact behind.
pub struct FakeAction {
    name: String,
    log: InvocationLog,
    outcome: ActionOutcome,
    touch: Option<(MockFileSystem, PathBuf, u64)>,
}

impl FakeAction {
    /// Succeeds, records the invocation, touches nothing.
    pub fn ok(name: &str, log: &InvocationLog) -> Arc<Self> {
        Arc::new(Self {
            name: name.to_string(),
            log: Arc::clone(log),
            outcome: ActionOutcome::Success,
            touch: None,
        })
    }

    /// Fails with the given exit code.
    pub fn failing(name: &str, log: &InvocationLog, code: i32) -> Arc<Self> {
        Arc::new(Self {
            name: name.to_string(),
            log: Arc::clone(log),
            outcome: ActionOutcome::Failed(code),
            touch: None,
        })
    }

    /// Succeeds and stamps `path` into `fs` with an mtime of
    /// `UNIX_EPOCH + secs`.
    pub fn touching(
        name: &str,
        log: &InvocationLog,
        fs: &MockFileSystem,
        path: impl Into<PathBuf>,
        secs: u64,
    ) -> Arc<Self> {
        Arc::new(Self {
            name: name.to_string(),
            log: Arc::clone(log),
            outcome: ActionOutcome::Success,
            touch: Some((fs.clone(), path.into(), secs)),
        })
    }
}

impl Action for FakeAction {
    fn run(&self) -> Pin<Box<dyn Future<Output = Result<ActionOutcome>> + Send + '_>> {
        Box::pin(async move {
            self.log.lock().unwrap().push(self.name.clone());

            if let Some((fs, path, secs)) = &self.touch {
                fs.touch_at(path, *secs);
            }

            Ok(self.outcome)
        })
    }
}
