use std::collections::BTreeMap;

use reconflow::config::{ConfigFile, FlowSection, RawConfigFile, TaskConfig};

/// Assembles flow files in code, either as a validated [`ConfigFile`] or as
/// TOML text for loader tests.
#[derive(Debug, Clone, Default)]
pub struct ConfigFileBuilder {
    flow: FlowSection,
    tasks: BTreeMap<String, TaskConfig>,
}

impl ConfigFileBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_name(mut self, name: &str) -> Self {
        self.flow.name = name.to_string();
        self
    }

    pub fn with_concurrency(mut self, limit: usize) -> Self {
        self.flow.concurrency = Some(limit);
        self
    }

    pub fn with_task(mut self, name: &str, task: TaskConfig) -> Self {
        self.tasks.insert(name.to_string(), task);
        self
    }

    /// Unvalidated form, for exercising validation errors.
    pub fn raw(self) -> RawConfigFile {
        RawConfigFile {
            flow: self.flow,
            task: self.tasks,
        }
    }

    /// Validated form. Panics if the flow is invalid.
    pub fn build(self) -> ConfigFile {
        ConfigFile::try_from(self.raw()).unwrap_or_else(|e| panic!("invalid test flow: {e}"))
    }

    /// Render as flow-file text.
    pub fn to_toml(&self) -> String {
        toml::to_string(&self.clone().raw())
            .unwrap_or_else(|e| panic!("test flow does not serialize: {e}"))
    }
}

/// One `[task.<name>]` entry.
#[derive(Debug, Clone)]
pub struct TaskConfigBuilder {
    cmd: String,
    after: Vec<String>,
    description: Option<String>,
}

impl TaskConfigBuilder {
    pub fn new(cmd: &str) -> Self {
        Self {
            cmd: cmd.to_string(),
            after: Vec::new(),
            description: None,
        }
    }

    pub fn after(mut self, dep: &str) -> Self {
        self.after.push(dep.to_string());
        self
    }

    pub fn description(mut self, text: &str) -> Self {
        self.description = Some(text.to_string());
        self
    }

    pub fn build(self) -> TaskConfig {
        TaskConfig {
            cmd: self.cmd,
            after: self.after,
            description: self.description,
        }
    }
}
