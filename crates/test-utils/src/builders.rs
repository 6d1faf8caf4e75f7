#![allow(dead_code)]

use std::collections::BTreeMap;

use taskdag::config::{ConfigFile, ConfigSection, TaskConfig};

/// Builder for `ConfigFile` to simplify test setup.
pub struct ConfigFileBuilder {
    config: ConfigFile,
}

impl ConfigFileBuilder {
    pub fn new() -> Self {
        Self {
            config: ConfigFile {
                config: ConfigSection::default(),
                task: BTreeMap::new(),
            },
        }
    }

    pub fn with_task(mut self, name: &str, task: TaskConfig) -> Self {
        self.config.task.insert(name.to_string(), task);
        self
    }

    pub fn with_default_task(mut self, name: &str) -> Self {
        self.config.config.default_task = Some(name.to_string());
        self
    }

    pub fn with_rebuild_on_equal_mtime(mut self, val: bool) -> Self {
        self.config.config.rebuild_on_equal_mtime = val;
        self
    }

    pub fn build(self) -> ConfigFile {
        self.config
    }
}

impl Default for ConfigFileBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for `TaskConfig`.
pub struct TaskConfigBuilder {
    task: TaskConfig,
}

impl TaskConfigBuilder {
    pub fn new(cmd: &str) -> Self {
        Self {
            task: TaskConfig {
                cmd: cmd.to_string(),
                produces: None,
                deps: vec![],
                desc: None,
            },
        }
    }

    pub fn produces(mut self, path: &str) -> Self {
        self.task.produces = Some(path.to_string());
        self
    }

    pub fn dep(mut self, name: &str) -> Self {
        self.task.deps.push(name.to_string());
        self
    }

    pub fn desc(mut self, desc: &str) -> Self {
        self.task.desc = Some(desc.to_string());
        self
    }

    pub fn build(self) -> TaskConfig {
        self.task
    }
}
