//! CLI output formatting for all tasks.
//!
//! # Output Format
//!
//! ## Assist
//!
//! ```text
//! ==> assist: site → assistant
//!     removed assistant/old - page.html
//!     site/index.html → assistant/index.html
//!     site/guide/intro.html → assistant/guide - intro.html
//! Copied 2 pages, removed 1 stale page
//! ```
//!
//! ## Clean
//!
//! ```text
//! Removed site/
//! Removed build.log
//! Skipped .cache (not present)
//! ```
//!
//! # Architecture
//!
//! Every piece of output has a `format_*` function for testability and a
//! `print_*` wrapper that writes to stdout. Format functions are pure: no
//! I/O, no side effects. Per-page assist lines are printed by a thread
//! draining [`FlattenEvent`]s while the copy runs, so they appear as each page
//! lands rather than after the whole run.

use crate::flatten::{FlattenEvent, FlattenReport};
use crate::tasks::{CleanOutcome, CleanReport};
use std::path::Path;

// ============================================================================
// Shared helpers
// ============================================================================

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// `"1 page"`, `"3 pages"`.
fn plural(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("{count} {noun}")
    } else {
        format!("{count} {noun}s")
    }
}

/// Show `path` relative to `root` when it lives under it.
fn display_under(path: &Path, root: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .display()
        .to_string()
}

// ============================================================================
// Banners
// ============================================================================

/// Stage banner, e.g. `==> build: poetry run mkdocs build`.
pub fn format_banner(task: &str, detail: &str) -> String {
    format!("==> {task}: {detail}")
}

pub fn print_banner(task: &str, detail: &str) {
    println!("{}", format_banner(task, detail));
}

/// [`print_banner`] on stderr, for when stdout is reserved for JSON.
pub fn eprint_banner(task: &str, detail: &str) {
    eprintln!("{}", format_banner(task, detail));
}

// ============================================================================
// Assist output
// ============================================================================

/// Format a single flatten progress event as one display line.
pub fn format_flatten_event(event: &FlattenEvent) -> String {
    match event {
        FlattenEvent::Removed(path) => format!("{}removed {}", indent(1), path.display()),
        FlattenEvent::Copied(mapping) => format!(
            "{}{} \u{2192} {}",
            indent(1),
            mapping.source.display(),
            mapping.destination.display()
        ),
    }
}

/// One-line totals, e.g. `Copied 12 pages, removed 3 stale pages`.
pub fn format_flatten_summary(report: &FlattenReport) -> String {
    let copied = plural(report.copied.len(), "page");
    match report.removed.len() {
        0 => format!("Copied {copied}"),
        n => format!("Copied {copied}, removed {}", plural(n, "stale page")),
    }
}

pub fn print_flatten_summary(report: &FlattenReport) {
    println!("{}", format_flatten_summary(report));
}

// ============================================================================
// Clean output
// ============================================================================

/// Format clean results, paths shown relative to the project root.
pub fn format_clean_output(report: &CleanReport, root: &Path) -> Vec<String> {
    if report.entries.is_empty() {
        return vec!["Nothing to clean".to_string()];
    }
    report
        .entries
        .iter()
        .map(|(path, outcome)| {
            let shown = display_under(path, root);
            match outcome {
                CleanOutcome::RemovedDir => format!("Removed {shown}/"),
                CleanOutcome::RemovedFile => format!("Removed {shown}"),
                CleanOutcome::Missing => format!("Skipped {shown} (not present)"),
            }
        })
        .collect()
}

pub fn print_clean_output(report: &CleanReport, root: &Path) {
    for line in format_clean_output(report, root) {
        println!("{}", line);
    }
}
