// src/lib.rs

pub mod cli;
pub mod config;
pub mod dag;
pub mod errors;
pub mod exec;
pub mod fs;
pub mod logging;

use std::path::PathBuf;
use std::sync::Arc;

use tracing::info;

use crate::cli::CliArgs;
use crate::config::loader::load_and_validate;
use crate::config::model::ConfigFile;
use crate::dag::{RunReport, Scheduler, SchedulerOptions, TaskGraph, TaskSpec, TaskStatus};
use crate::errors::Result;
use crate::exec::CommandAction;
use crate::fs::RealFileSystem;

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading + validation
/// - graph construction
/// - the scheduler over the real filesystem
/// - list / dry-run front-end behaviour
pub async fn run(args: CliArgs) -> Result<()> {
    let config_path = PathBuf::from(&args.config);
    let cfg = load_and_validate(&config_path)?;

    if args.list {
        print_task_list(&cfg);
        return Ok(());
    }

    let target = match args.target.clone().or_else(|| cfg.config.default_task.clone()) {
        Some(t) => t,
        None => {
            // No target requested and no default configured: list instead.
            print_task_list(&cfg);
            return Ok(());
        }
    };

    let graph = build_graph(&cfg)?;
    let options = SchedulerOptions {
        rebuild_on_equal_mtime: cfg.config.rebuild_on_equal_mtime,
    };
    let scheduler = Scheduler::new(&graph, RealFileSystem).with_options(options);

    if args.dry_run {
        let report = scheduler.plan(&target)?;
        print_plan(&target, &report);
        return Ok(());
    }

    let report = scheduler.resolve_and_run(&target).await?;
    info!(
        target = %target,
        executed = report.executed().count(),
        skipped = report.skipped().count(),
        "target up to date"
    );
    Ok(())
}

/// Turn a validated config into a registered task graph whose actions run
/// the configured commands through the platform shell.
pub fn build_graph(cfg: &ConfigFile) -> Result<TaskGraph> {
    let mut graph = TaskGraph::new();

    for (name, tc) in cfg.task.iter() {
        let action = Arc::new(CommandAction::new(name, &tc.cmd));

        let mut spec = match &tc.produces {
            Some(path) => TaskSpec::file(name, path, tc.deps.clone(), action),
            None => TaskSpec::action(name, tc.deps.clone(), action),
        };
        if let Some(desc) = &tc.desc {
            spec = spec.with_desc(desc);
        }

        graph.register(spec)?;
    }

    Ok(graph)
}

/// `--list` output: tasks with their commands, artifacts and dependencies.
fn print_task_list(cfg: &ConfigFile) {
    println!("tasks ({}):", cfg.task.len());
    for (name, task) in cfg.task.iter() {
        println!("  - {name}");
        if let Some(ref desc) = task.desc {
            println!("      desc: {desc}");
        }
        println!("      cmd: {}", task.cmd);
        if let Some(ref produces) = task.produces {
            println!("      produces: {produces}");
        }
        if !task.deps.is_empty() {
            println!("      deps: {:?}", task.deps);
        }
    }

    if let Some(ref default) = cfg.config.default_task {
        println!();
        println!("default task: {default}");
    }
}

/// Dry-run output: execution order with the run/skip decision per task.
fn print_plan(target: &str, report: &RunReport) {
    println!("taskdag dry-run for '{target}'");
    for (name, status) in report.entries() {
        let what = match status {
            TaskStatus::Executed => "run ",
            TaskStatus::Skipped => "skip",
        };
        println!("  {what}  {name}");
    }
}
