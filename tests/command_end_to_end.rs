// tests/command_end_to_end.rs

//! Drives the engine with real shell commands against a real temp directory,
//! the way the CLI front end does.

#![cfg(unix)]

use std::error::Error;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use tempfile::TempDir;

use taskdag::dag::{Scheduler, TaskGraph, TaskSpec, TaskStatus};
use taskdag::errors::TaskdagError;
use taskdag::exec::CommandAction;
use taskdag::fs::RealFileSystem;
use taskdag_test_utils::init_tracing;

type TestResult = Result<(), Box<dyn Error>>;

fn file_task(name: &str, produces: &Path, cmd: &str, deps: Vec<String>) -> TaskSpec {
    TaskSpec::file(name, produces, deps, Arc::new(CommandAction::new(name, cmd)))
}

#[tokio::test]
async fn shell_pipeline_builds_then_skips() -> TestResult {
    init_tracing();

    let dir = TempDir::new()?;
    let a = dir.path().join("a.txt");
    let b = dir.path().join("b.txt");

    let mut g = TaskGraph::new();
    g.register(file_task(
        "A",
        &a,
        &format!("echo one > {}", a.display()),
        vec![],
    ))?;
    g.register(file_task(
        "B",
        &b,
        &format!("cat {} > {}", a.display(), b.display()),
        vec!["A".into()],
    ))?;

    let scheduler = Scheduler::new(&g, RealFileSystem);

    let first = scheduler.resolve_and_run("B").await?;
    assert_eq!(first.executed().count(), 2);
    assert_eq!(fs::read_to_string(&b)?.trim(), "one");

    // Nothing changed on disk, so a second pass is a no-op.
    let second = scheduler.resolve_and_run("B").await?;
    assert_eq!(second.executed().count(), 0);
    assert_eq!(second.skipped().count(), 2);
    Ok(())
}

#[tokio::test]
async fn touching_an_input_rebuilds_dependents_only() -> TestResult {
    let dir = TempDir::new()?;
    let a = dir.path().join("a.txt");
    let b = dir.path().join("b.txt");

    let mut g = TaskGraph::new();
    g.register(file_task(
        "A",
        &a,
        &format!("echo one > {}", a.display()),
        vec![],
    ))?;
    g.register(file_task(
        "B",
        &b,
        &format!("cat {} > {}", a.display(), b.display()),
        vec!["A".into()],
    ))?;

    let scheduler = Scheduler::new(&g, RealFileSystem);
    scheduler.resolve_and_run("B").await?;

    // Step past coarse mtime resolution before rewriting the input.
    tokio::time::sleep(Duration::from_millis(1100)).await;
    fs::write(&a, "two\n")?;

    let report = scheduler.resolve_and_run("B").await?;
    assert_eq!(report.status_of("A"), Some(TaskStatus::Skipped));
    assert_eq!(report.status_of("B"), Some(TaskStatus::Executed));
    assert_eq!(fs::read_to_string(&b)?.trim(), "two");
    Ok(())
}

#[tokio::test]
async fn failing_command_surfaces_its_exit_code() -> TestResult {
    let mut g = TaskGraph::new();
    g.register(TaskSpec::action(
        "bad",
        vec![],
        Arc::new(CommandAction::new("bad", "exit 3")),
    ))?;

    let err = Scheduler::new(&g, RealFileSystem)
        .resolve_and_run("bad")
        .await
        .unwrap_err();

    match err {
        TaskdagError::ActionFailed { task, code } => {
            assert_eq!(task, "bad");
            assert_eq!(code, 3);
        }
        other => panic!("expected ActionFailed, got: {other:?}"),
    }
    Ok(())
}

#[tokio::test]
async fn failed_producer_leaves_dependents_untouched() -> TestResult {
    let dir = TempDir::new()?;
    let a = dir.path().join("a.txt");
    let b = dir.path().join("b.txt");

    let mut g = TaskGraph::new();
    g.register(file_task("A", &a, "false", vec![]))?;
    g.register(file_task(
        "B",
        &b,
        &format!("echo never > {}", b.display()),
        vec!["A".into()],
    ))?;

    let result = Scheduler::new(&g, RealFileSystem).resolve_and_run("B").await;
    assert!(result.is_err());
    assert!(!b.exists(), "B must not run after its producer failed");
    Ok(())
}
