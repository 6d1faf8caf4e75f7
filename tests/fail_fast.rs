// tests/fail_fast.rs

use std::error::Error;

use taskdag::dag::{Scheduler, TaskGraph, TaskSpec};
use taskdag::errors::TaskdagError;
use taskdag::exec::{ActionOutcome, FnAction};
use taskdag::fs::mock::MockFileSystem;
use taskdag_test_utils::{shared_log, FakeAction};

type TestResult = Result<(), Box<dyn Error>>;

#[tokio::test]
async fn failure_halts_the_pass_and_names_the_task() -> TestResult {
    let fs = MockFileSystem::new();

    let log = shared_log();
    let mut g = TaskGraph::new();
    g.register(TaskSpec::action("A", vec![], FakeAction::ok("A", &log)))?;
    g.register(TaskSpec::action(
        "B",
        vec!["A".into()],
        FakeAction::failing("B", &log, 2),
    ))?;
    g.register(TaskSpec::action(
        "C",
        vec!["B".into()],
        FakeAction::ok("C", &log),
    ))?;

    let err = Scheduler::new(&g, fs)
        .resolve_and_run("C")
        .await
        .unwrap_err();

    assert_eq!(err.task_name(), Some("B"));
    match err {
        TaskdagError::ActionFailed { task, code } => {
            assert_eq!(task, "B");
            assert_eq!(code, 2);
        }
        other => panic!("expected ActionFailed, got: {other:?}"),
    }

    // A ran, B ran and failed, C never started.
    assert_eq!(*log.lock().unwrap(), vec!["A".to_string(), "B".into()]);
    Ok(())
}

#[tokio::test]
async fn artifacts_from_before_the_failure_stay_in_place() -> TestResult {
    let fs = MockFileSystem::new();

    let log = shared_log();
    let mut g = TaskGraph::new();
    g.register(TaskSpec::file(
        "A",
        "out/a",
        vec![],
        FakeAction::touching("A", &log, &fs, "out/a", 100),
    ))?;
    g.register(TaskSpec::file(
        "B",
        "out/b",
        vec!["A".into()],
        FakeAction::failing("B", &log, 1),
    ))?;

    let result = Scheduler::new(&g, fs.clone()).resolve_and_run("B").await;
    assert!(result.is_err());

    // No rollback: A's artifact survives, so a later pass resumes from it.
    use taskdag::fs::ArtifactStore;
    assert!(fs.exists(std::path::Path::new("out/a")));

    let second = Scheduler::new(&g, fs.clone()).resolve_and_run("B").await;
    assert!(second.is_err());
    // A was skipped the second time round; only B re-ran.
    assert_eq!(
        *log.lock().unwrap(),
        vec!["A".to_string(), "B".into(), "B".into()]
    );
    Ok(())
}

#[tokio::test]
async fn cycle_aborts_before_any_action_runs() -> TestResult {
    let fs = MockFileSystem::new();

    let log = shared_log();
    let mut g = TaskGraph::new();
    g.register(TaskSpec::action(
        "A",
        vec!["C".into()],
        FakeAction::ok("A", &log),
    ))?;
    g.register(TaskSpec::action(
        "B",
        vec!["A".into()],
        FakeAction::ok("B", &log),
    ))?;
    g.register(TaskSpec::action(
        "C",
        vec!["B".into()],
        FakeAction::ok("C", &log),
    ))?;

    for start in ["A", "B", "C"] {
        let err = Scheduler::new(&g, fs.clone())
            .resolve_and_run(start)
            .await
            .unwrap_err();
        assert!(matches!(err, TaskdagError::CyclicDependency { .. }));
    }

    assert!(log.lock().unwrap().is_empty(), "no action may run on a cyclic graph");
    Ok(())
}

#[tokio::test]
async fn unknown_target_aborts_before_any_action_runs() -> TestResult {
    let fs = MockFileSystem::new();

    let log = shared_log();
    let mut g = TaskGraph::new();
    g.register(TaskSpec::action("A", vec![], FakeAction::ok("A", &log)))?;

    let err = Scheduler::new(&g, fs)
        .resolve_and_run("missing")
        .await
        .unwrap_err();

    assert!(matches!(err, TaskdagError::UnknownTask(name) if name == "missing"));
    assert!(log.lock().unwrap().is_empty());
    Ok(())
}

#[tokio::test]
async fn shared_dependency_executes_at_most_once() -> TestResult {
    let fs = MockFileSystem::new();

    let log = shared_log();
    let mut g = TaskGraph::new();
    g.register(TaskSpec::action("A", vec![], FakeAction::ok("A", &log)))?;
    g.register(TaskSpec::action(
        "B",
        vec!["A".into()],
        FakeAction::ok("B", &log),
    ))?;
    g.register(TaskSpec::action(
        "C",
        vec!["A".into()],
        FakeAction::ok("C", &log),
    ))?;
    g.register(TaskSpec::action(
        "D",
        vec!["B".into(), "C".into()],
        FakeAction::ok("D", &log),
    ))?;

    Scheduler::new(&g, fs).resolve_and_run("D").await?;

    let log = log.lock().unwrap();
    assert_eq!(log.iter().filter(|n| n.as_str() == "A").count(), 1);
    assert_eq!(log.len(), 4);
    Ok(())
}

#[tokio::test]
async fn action_errors_are_wrapped_with_the_task_name() -> TestResult {
    let fs = MockFileSystem::new();

    let mut g = TaskGraph::new();
    g.register(TaskSpec::action(
        "broken",
        vec![],
        std::sync::Arc::new(FnAction(|| async {
            let err: TaskdagError = anyhow::anyhow!("spawn blew up").into();
            Err::<ActionOutcome, _>(err)
        })),
    ))?;

    let err = Scheduler::new(&g, fs)
        .resolve_and_run("broken")
        .await
        .unwrap_err();

    match err {
        TaskdagError::ActionError { task, .. } => assert_eq!(task, "broken"),
        other => panic!("expected ActionError, got: {other:?}"),
    }
    Ok(())
}

#[tokio::test]
async fn closures_work_as_actions() -> TestResult {
    let fs = MockFileSystem::new();

    let mut g = TaskGraph::new();
    g.register(TaskSpec::action(
        "inline",
        vec![],
        std::sync::Arc::new(FnAction(|| async {
            Ok::<_, TaskdagError>(ActionOutcome::Success)
        })),
    ))?;

    let report = Scheduler::new(&g, fs).resolve_and_run("inline").await?;
    assert_eq!(report.executed().count(), 1);
    Ok(())
}
