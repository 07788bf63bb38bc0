//! Project configuration module.
//!
//! Handles loading, validating, and merging `doc-tasks.toml`. Stock defaults
//! reproduce a Poetry + MkDocs project; a config file in the project root
//! overrides only the keys it names.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [paths]
//! site = "site"                 # Where the doc generator writes the built site
//! assistant = "assistant"       # Flat folder that receives copied pages
//! clean = ["site", ".cache"]    # Removed by `clean` and `reset`
//!
//! [commands]
//! install = ["poetry", "install"]
//! build = ["poetry", "run", "mkdocs", "build"]
//! serve = ["poetry", "run", "mkdocs", "serve"]
//! deploy = ["poetry", "run", "mkdocs", "gh-deploy"]
//! ```
//!
//! ## Partial Configuration
//!
//! Config files are sparse. Override just the values you want:
//!
//! ```toml
//! # Build with plain mkdocs instead of through poetry
//! [commands]
//! build = ["mkdocs", "build", "--strict"]
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Component, Path, PathBuf};
use thiserror::Error;

/// Config file looked up in the project root.
pub const CONFIG_FILE: &str = "doc-tasks.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Project configuration loaded from `doc-tasks.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TaskConfig {
    /// Directories the tasks read from and write to.
    pub paths: PathsConfig,
    /// External command lines, one per pass-through task.
    pub commands: CommandsConfig,
}

impl TaskConfig {
    /// Validate that every path and command is usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.paths.site.trim().is_empty() {
            return Err(ConfigError::Validation("paths.site must not be empty".into()));
        }
        if self.paths.assistant.trim().is_empty() {
            return Err(ConfigError::Validation(
                "paths.assistant must not be empty".into(),
            ));
        }
        if normalize(&self.paths.assistant).starts_with(normalize(&self.paths.site)) {
            return Err(ConfigError::Validation(
                "paths.assistant must not be paths.site or inside it".into(),
            ));
        }
        for entry in &self.paths.clean {
            if !is_contained(entry) {
                return Err(ConfigError::Validation(format!(
                    "paths.clean entry '{entry}' must be a relative path inside the project"
                )));
            }
        }
        for (name, argv) in self.commands.iter() {
            match argv.first() {
                None => {
                    return Err(ConfigError::Validation(format!(
                        "commands.{name} must not be empty"
                    )));
                }
                Some(program) if program.trim().is_empty() => {
                    return Err(ConfigError::Validation(format!(
                        "commands.{name} must start with a program name"
                    )));
                }
                Some(_) => {}
            }
        }
        Ok(())
    }
}

/// Lexically normalized form of a configured path: `.` dropped, `..` folded.
///
/// `"./site/"`, `"site"` and `"docs/../site"` all normalize to `site`.
fn normalize(path: &str) -> PathBuf {
    let mut out = PathBuf::new();
    for component in Path::new(path).components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if matches!(out.components().next_back(), Some(Component::Normal(_))) {
                    out.pop();
                } else {
                    out.push("..");
                }
            }
            other => out.push(other),
        }
    }
    out
}

/// Whether `entry` is a non-empty relative path that cannot escape the root.
fn is_contained(entry: &str) -> bool {
    let path = Path::new(entry);
    !entry.trim().is_empty()
        && path
            .components()
            .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
        && path.components().any(|c| matches!(c, Component::Normal(_)))
}

/// Directory layout, relative to the project root.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PathsConfig {
    /// Output directory of the documentation build.
    pub site: String,
    /// Flat directory receiving copied pages for the assistant.
    pub assistant: String,
    /// Files and directories removed by `clean`.
    pub clean: Vec<String>,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            site: "site".into(),
            assistant: "assistant".into(),
            clean: vec!["site".into(), ".cache".into()],
        }
    }
}

/// Command lines (`[program, args...]`) for the pass-through tasks.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CommandsConfig {
    pub install: Vec<String>,
    pub build: Vec<String>,
    pub serve: Vec<String>,
    pub deploy: Vec<String>,
}

impl CommandsConfig {
    /// `(task name, command line)` for every configured command.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &[String])> {
        [
            ("install", self.install.as_slice()),
            ("build", self.build.as_slice()),
            ("serve", self.serve.as_slice()),
            ("deploy", self.deploy.as_slice()),
        ]
        .into_iter()
    }
}

fn argv(parts: &[&str]) -> Vec<String> {
    parts.iter().map(|s| s.to_string()).collect()
}

impl Default for CommandsConfig {
    fn default() -> Self {
        Self {
            install: argv(&["poetry", "install"]),
            build: argv(&["poetry", "run", "mkdocs", "build"]),
            serve: argv(&["poetry", "run", "mkdocs", "serve"]),
            deploy: argv(&["poetry", "run", "mkdocs", "gh-deploy"]),
        }
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(TaskConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely, so a command
///   line or the clean list is always replaced, never appended to.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Parse a config file as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<TaskConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: TaskConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load `doc-tasks.toml` from the project root, falling back to defaults.
pub fn load_config(root: &Path) -> Result<TaskConfig, ConfigError> {
    let overlay = load_raw_config(&root.join(CONFIG_FILE))?;
    resolve_config(stock_defaults_value(), overlay)
}

/// Load an explicitly named config file. Unlike [`load_config`], a missing
/// file is an error.
pub fn load_config_file(path: &Path) -> Result<TaskConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let overlay: toml::Value = toml::from_str(&content)?;
    resolve_config(stock_defaults_value(), Some(overlay))
}

/// Returns a fully-commented stock `doc-tasks.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# doc-tasks Configuration
# =======================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
#
# Paths are relative to the project root (--root, default: current directory).
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Paths
# ---------------------------------------------------------------------------
[paths]
# Directory the documentation generator builds into.
site = "site"

# Flat directory that `assist` fills with copies of every built page.
# Nested pages are renamed "<parent> - <page>.html".
assistant = "assistant"

# Files and directories removed by `clean` (and by `reset` before reinstalling).
clean = ["site", ".cache"]

# ---------------------------------------------------------------------------
# External commands
# ---------------------------------------------------------------------------
# Each command is [program, args...]. Extra arguments given on the command
# line after the task name are appended.
[commands]
install = ["poetry", "install"]
build = ["poetry", "run", "mkdocs", "build"]
serve = ["poetry", "run", "mkdocs", "serve"]
deploy = ["poetry", "run", "mkdocs", "gh-deploy"]
"##
}
