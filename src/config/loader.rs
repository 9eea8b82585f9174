// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::Result;

/// Flow file looked up in the working directory when `--config` is absent.
pub const DEFAULT_FLOW_FILE: &str = "Reconflow.toml";

/// Read and deserialize a flow file. No semantic checks.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawConfigFile> {
    let contents = fs::read_to_string(path.as_ref())?;
    parse_raw(&contents)
}

/// Deserialize flow-file text. No semantic checks.
pub fn parse_raw(contents: &str) -> Result<RawConfigFile> {
    Ok(toml::from_str(contents)?)
}

/// Read, deserialize and validate a flow file.
///
/// On success every `after` entry names a task in the same file and the
/// tasks form a DAG; see [`ConfigFile::order`].
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<ConfigFile> {
    let path = path.as_ref();
    let config = ConfigFile::try_from(load_from_path(path)?)?;

    debug!(
        path = %path.display(),
        flow = %config.flow.name,
        tasks = config.task.len(),
        "flow file loaded"
    );

    Ok(config)
}

pub fn default_config_path() -> PathBuf {
    PathBuf::from(DEFAULT_FLOW_FILE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_sections_take_defaults() {
        let raw = parse_raw("[task.only]\ncmd = \"true\"\n").unwrap();
        assert_eq!(raw.flow.name, "flow");
        assert_eq!(raw.flow.concurrency, None);
        assert!(raw.task["only"].after.is_empty());
    }

    #[test]
    fn task_without_cmd_does_not_parse() {
        assert!(parse_raw("[task.only]\nafter = []\n").is_err());
    }
}
