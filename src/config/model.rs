// src/config/model.rs

use std::collections::BTreeMap;

use serde::Deserialize;

/// Top-level configuration as read from a TOML file.
///
/// ```toml
/// [config]
/// rebuild_on_equal_mtime = false
/// default_task = "report"
///
/// [task.fetch_ids]
/// desc = "download the current id list"
/// cmd = "scripts/fetch_ids.sh"
/// produces = "data/ids.csv"
///
/// [task.report]
/// cmd = "scripts/report.sh"
/// produces = "data/report.md"
/// deps = ["fetch_ids"]
/// ```
///
/// All sections are optional and have reasonable defaults, except that a
/// usable config needs at least one `[task.<name>]`.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct ConfigFile {
    /// Global behaviour config from `[config]`.
    #[serde(default)]
    pub config: ConfigSection,

    /// All tasks from `[task.<name>]`, keyed by task name.
    #[serde(default)]
    pub task: BTreeMap<String, TaskConfig>,
}

/// `[config]` section.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct ConfigSection {
    /// Treat equal artifact timestamps as stale (rebuild on mtime ties).
    ///
    /// Default `false`: an artifact with the same mtime as its dependency
    /// counts as up to date.
    #[serde(default)]
    pub rebuild_on_equal_mtime: bool,

    /// Task to run when the CLI is invoked without a target.
    ///
    /// When unset, a target-less invocation prints the task list instead.
    #[serde(default)]
    pub default_task: Option<String>,
}

/// `[task.<name>]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct TaskConfig {
    /// The command to execute when the task is stale.
    pub cmd: String,

    /// Artifact path this task produces.
    ///
    /// Present: file task, skipped when the artifact is up to date.
    /// Absent: plain action, runs every time it is reached.
    #[serde(default)]
    pub produces: Option<String>,

    /// Dependency list: tasks that must be brought up to date before this
    /// one. Order is preserved for deterministic scheduling.
    #[serde(default)]
    pub deps: Vec<String>,

    /// Human-readable description, shown by `--list`.
    #[serde(default)]
    pub desc: Option<String>,
}
