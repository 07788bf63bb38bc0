//! Pass-through tasks and workspace cleanup.
//!
//! `install`, `build`, `serve` and `deploy` each run one configured external
//! command (the dependency manager or the documentation generator) with
//! inherited stdio. Nothing here interprets their output: success is exit
//! status zero, and any other status is returned as
//! [`TaskError::CommandFailed`] so the CLI can exit with the same code.
//!
//! `clean` is done natively rather than through a shell: each configured path
//! is removed if present, recursively for directories.

use serde::Serialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TaskError {
    #[error("Empty command line")]
    EmptyCommand,
    #[error("Failed to start '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },
    #[error("'{command}' exited with {}", describe_code(.code))]
    CommandFailed { command: String, code: Option<i32> },
    #[error("Cannot remove {path}: {source}")]
    Remove {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

fn describe_code(code: &Option<i32>) -> String {
    match code {
        Some(c) => format!("status {c}"),
        None => "no status (terminated by signal)".to_string(),
    }
}

impl TaskError {
    /// Process exit code to report for this error.
    ///
    /// A failed external command passes its own code through; everything else
    /// (including a command killed by a signal) is 1.
    pub fn exit_code(&self) -> i32 {
        match self {
            TaskError::CommandFailed { code: Some(c), .. } if *c != 0 => *c,
            _ => 1,
        }
    }
}

/// Run `argv` (program followed by its arguments) with `extra_args` appended.
///
/// The child runs in `cwd` and shares this process's stdin/stdout/stderr, so
/// interactive commands like `serve` behave as if launched directly.
pub fn run(argv: &[String], extra_args: &[String], cwd: &Path) -> Result<(), TaskError> {
    run_with_stdout(argv, extra_args, cwd, Stdio::inherit())
}

/// Like [`run`], with the child's stdout sent to `stdout` instead.
///
/// Used when this process's own stdout carries machine-readable output
/// (`assist --json`) and the build's chatter must go elsewhere.
pub fn run_with_stdout(
    argv: &[String],
    extra_args: &[String],
    cwd: &Path,
    stdout: Stdio,
) -> Result<(), TaskError> {
    let (program, args) = argv
        .split_first()
        .ok_or(TaskError::EmptyCommand)?;

    let status = Command::new(program)
        .args(args)
        .args(extra_args)
        .current_dir(cwd)
        .stdout(stdout)
        .status()
        .map_err(|source| TaskError::Spawn {
            program: program.clone(),
            source,
        })?;

    check_status(status, &command_line(argv, extra_args))
}

fn check_status(status: ExitStatus, command: &str) -> Result<(), TaskError> {
    if status.success() {
        Ok(())
    } else {
        Err(TaskError::CommandFailed {
            command: command.to_string(),
            code: status.code(),
        })
    }
}

/// The command as a user would type it, for banners and error messages.
pub fn command_line(argv: &[String], extra_args: &[String]) -> String {
    argv.iter()
        .chain(extra_args)
        .map(|part| {
            if part.is_empty() || part.contains(char::is_whitespace) {
                format!("{part:?}")
            } else {
                part.clone()
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// What `clean` did with one configured path.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum CleanOutcome {
    RemovedDir,
    RemovedFile,
    Missing,
}

#[derive(Debug, Default, Serialize)]
pub struct CleanReport {
    pub entries: Vec<(PathBuf, CleanOutcome)>,
}

/// Remove every path in `paths` (relative to `root`) that exists.
///
/// Missing paths are recorded, not treated as errors. Symlinks are removed
/// themselves; their targets are left alone.
pub fn clean(root: &Path, paths: &[String]) -> Result<CleanReport, TaskError> {
    let mut report = CleanReport::default();
    for rel in paths {
        let path = root.join(rel);
        let outcome = match fs::symlink_metadata(&path) {
            Err(e) if e.kind() == io::ErrorKind::NotFound => CleanOutcome::Missing,
            Err(source) => return Err(TaskError::Remove { path, source }),
            Ok(meta) if meta.is_dir() => {
                fs::remove_dir_all(&path).map_err(|source| TaskError::Remove {
                    path: path.clone(),
                    source,
                })?;
                CleanOutcome::RemovedDir
            }
            Ok(_) => {
                fs::remove_file(&path).map_err(|source| TaskError::Remove {
                    path: path.clone(),
                    source,
                })?;
                CleanOutcome::RemovedFile
            }
        };
        report.entries.push((path, outcome));
    }
    Ok(report)
}
