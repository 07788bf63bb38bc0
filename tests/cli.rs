//! End-to-end tests driving the `doc-tasks` binary.
//!
//! External commands are configured as small `sh -c` scripts, so these tests
//! need a POSIX shell but no Poetry or MkDocs installation.

#![cfg(unix)]

use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

// ===========================================================================
// Harness
// ===========================================================================

fn doc_tasks(root: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_doc-tasks"))
        .arg("--root")
        .arg(root)
        .args(args)
        .output()
        .expect("failed to run doc-tasks")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

/// Project root with `doc-tasks.toml` set to `config`.
fn project(config: &str) -> TempDir {
    let tmp = TempDir::new().unwrap();
    fs::write(tmp.path().join("doc-tasks.toml"), config).unwrap();
    tmp
}

fn write(root: &Path, rel: &str, contents: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

fn names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

// ===========================================================================
// assist
// ===========================================================================

#[test]
fn assist_skip_build_flattens_existing_site() {
    let tmp = project("");
    write(tmp.path(), "site/index.html", "home");
    write(tmp.path(), "site/guide/intro.html", "intro");
    write(tmp.path(), "site/assets/main.css", "css");

    let out = doc_tasks(tmp.path(), &["assist", "--skip-build"]);

    assert!(out.status.success(), "stderr: {}", stderr(&out));
    let assistant = tmp.path().join("assistant");
    assert_eq!(names(&assistant), vec!["guide - intro.html", "index.html"]);
    assert_eq!(
        fs::read_to_string(assistant.join("guide - intro.html")).unwrap(),
        "intro"
    );
    let text = stdout(&out);
    assert!(text.contains("intro.html \u{2192} "), "stdout: {text}");
    assert!(text.contains("Copied 2 pages"), "stdout: {text}");
}

#[test]
fn assist_builds_first() {
    let tmp = project(
        r#"
[commands]
build = ["sh", "-c", "mkdir -p site/guide && echo built > site/guide/intro.html"]
"#,
    );

    let out = doc_tasks(tmp.path(), &["assist"]);

    assert!(out.status.success(), "stderr: {}", stderr(&out));
    assert_eq!(
        names(&tmp.path().join("assistant")),
        vec!["guide - intro.html"]
    );
    assert!(stdout(&out).contains("==> build: sh -c"));
}

#[test]
fn assist_failed_build_keeps_exit_code_and_destination() {
    let tmp = project(
        r#"
[commands]
build = ["sh", "-c", "exit 7"]
"#,
    );
    write(tmp.path(), "site/index.html", "new");
    write(tmp.path(), "assistant/index.html", "old");

    let out = doc_tasks(tmp.path(), &["assist"]);

    assert_eq!(out.status.code(), Some(7));
    assert_eq!(
        fs::read_to_string(tmp.path().join("assistant/index.html")).unwrap(),
        "old"
    );
}

#[test]
fn assist_missing_site_fails_without_deleting() {
    let tmp = project("");
    write(tmp.path(), "assistant/index.html", "old");

    let out = doc_tasks(tmp.path(), &["assist", "--skip-build"]);

    assert_eq!(out.status.code(), Some(1));
    assert!(stderr(&out).contains("Source directory not found"));
    assert_eq!(names(&tmp.path().join("assistant")), vec!["index.html"]);
}

#[test]
fn assist_uses_configured_paths() {
    let tmp = project(
        r#"
[paths]
site = "public"
assistant = "flat"
"#,
    );
    write(tmp.path(), "public/api/v1/users.html", "users");

    let out = doc_tasks(tmp.path(), &["assist", "--skip-build"]);

    assert!(out.status.success(), "stderr: {}", stderr(&out));
    assert_eq!(names(&tmp.path().join("flat")), vec!["api-v1 - users.html"]);
}

#[test]
fn assist_explicit_source_and_destination() {
    let tmp = project("");
    write(tmp.path(), "elsewhere/index.html", "home");
    let source = tmp.path().join("elsewhere");
    let destination = tmp.path().join("out");

    let out = doc_tasks(
        tmp.path(),
        &[
            "assist",
            "--skip-build",
            "--source",
            source.to_str().unwrap(),
            "--destination",
            destination.to_str().unwrap(),
        ],
    );

    assert!(out.status.success(), "stderr: {}", stderr(&out));
    assert_eq!(names(&destination), vec!["index.html"]);
}

#[test]
fn assist_json_report() {
    let tmp = project("");
    write(tmp.path(), "site/guide/intro.html", "intro");
    write(tmp.path(), "assistant/stale.html", "stale");

    let out = doc_tasks(tmp.path(), &["assist", "--skip-build", "--json"]);

    assert!(out.status.success(), "stderr: {}", stderr(&out));
    let report: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(report["removed"].as_array().unwrap().len(), 1);
    let copied = report["copied"].as_array().unwrap();
    assert_eq!(copied.len(), 1);
    assert!(
        copied[0]["destination"]
            .as_str()
            .unwrap()
            .ends_with("guide - intro.html")
    );
}

#[test]
fn assist_json_with_build_keeps_stdout_clean() {
    let tmp = project(
        r#"
[commands]
build = ["sh", "-c", "mkdir -p site && echo built > site/index.html && echo INFO building"]
"#,
    );

    let out = doc_tasks(tmp.path(), &["assist", "--json"]);

    assert!(out.status.success(), "stderr: {}", stderr(&out));
    let report: serde_json::Value = serde_json::from_slice(&out.stdout)
        .unwrap_or_else(|e| panic!("stdout is not JSON ({e}): {}", stdout(&out)));
    assert_eq!(report["copied"].as_array().unwrap().len(), 1);
    let err = stderr(&out);
    assert!(err.contains("==> build"), "stderr: {err}");
    assert!(err.contains("INFO building"), "stderr: {err}");
}

#[test]
fn assist_rejects_assistant_aliasing_site() {
    let tmp = project(
        r#"
[paths]
assistant = "./site"
"#,
    );
    write(tmp.path(), "site/index.html", "home");

    let out = doc_tasks(tmp.path(), &["assist", "--skip-build"]);

    assert_eq!(out.status.code(), Some(1));
    assert!(stderr(&out).contains("paths.assistant"), "stderr: {}", stderr(&out));
    assert!(tmp.path().join("site/index.html").exists());
}

#[test]
fn assist_rejects_destination_flag_aliasing_source() {
    let tmp = project("");
    write(tmp.path(), "site/index.html", "home");
    write(tmp.path(), "site/guide/intro.html", "intro");
    let alias = tmp.path().join("site/../site/");

    let out = doc_tasks(
        tmp.path(),
        &["assist", "--skip-build", "--destination", alias.to_str().unwrap()],
    );

    assert_eq!(out.status.code(), Some(1));
    assert!(stderr(&out).contains("inside the source"), "stderr: {}", stderr(&out));
    assert!(tmp.path().join("site/index.html").exists());
    assert_eq!(names(&tmp.path().join("site")), vec!["guide", "index.html"]);
}

// ===========================================================================
// Pass-through tasks
// ===========================================================================

#[test]
fn build_forwards_extra_args() {
    let tmp = project(
        r#"
[commands]
build = ["sh", "-c", "echo \"$@\" > args.txt", "sh"]
"#,
    );

    let out = doc_tasks(tmp.path(), &["build", "--", "--strict", "-v"]);

    assert!(out.status.success(), "stderr: {}", stderr(&out));
    let args = fs::read_to_string(tmp.path().join("args.txt")).unwrap();
    assert_eq!(args.trim(), "--strict -v");
}

#[test]
fn failing_command_exit_code_propagates() {
    let tmp = project(
        r#"
[commands]
deploy = ["sh", "-c", "exit 42"]
"#,
    );

    let out = doc_tasks(tmp.path(), &["deploy"]);

    assert_eq!(out.status.code(), Some(42));
    assert!(stderr(&out).contains("exited with status 42"));
}

#[test]
fn missing_tool_fails() {
    let tmp = project(
        r#"
[commands]
serve = ["doc-tasks-test-missing-tool", "serve"]
"#,
    );

    let out = doc_tasks(tmp.path(), &["serve"]);

    assert_eq!(out.status.code(), Some(1));
    assert!(stderr(&out).contains("Failed to start 'doc-tasks-test-missing-tool'"));
}

// ===========================================================================
// clean / reset
// ===========================================================================

#[test]
fn clean_removes_configured_paths() {
    let tmp = project("");
    write(tmp.path(), "site/index.html", "home");
    write(tmp.path(), "mkdocs.yml", "site_name: docs");

    let out = doc_tasks(tmp.path(), &["clean"]);

    assert!(out.status.success(), "stderr: {}", stderr(&out));
    assert!(!tmp.path().join("site").exists());
    assert!(tmp.path().join("mkdocs.yml").exists());
    let text = stdout(&out);
    assert!(text.contains("Removed site/"), "stdout: {text}");
    assert!(text.contains("Skipped .cache (not present)"), "stdout: {text}");
}

#[test]
fn reset_cleans_then_installs() {
    let tmp = project(
        r#"
[commands]
install = ["sh", "-c", "test ! -e site && touch installed"]
"#,
    );
    write(tmp.path(), "site/index.html", "home");

    let out = doc_tasks(tmp.path(), &["reset"]);

    assert!(out.status.success(), "stderr: {}", stderr(&out));
    assert!(tmp.path().join("installed").exists());
}

// ===========================================================================
// Config
// ===========================================================================

#[test]
fn gen_config_prints_valid_toml() {
    let tmp = TempDir::new().unwrap();
    let out = doc_tasks(tmp.path(), &["gen-config"]);

    assert!(out.status.success());
    let parsed: toml::Value = toml::from_str(&stdout(&out)).unwrap();
    assert_eq!(parsed["paths"]["assistant"].as_str(), Some("assistant"));
}

#[test]
fn gen_config_ignores_broken_config() {
    let tmp = project("not toml [[[");
    let out = doc_tasks(tmp.path(), &["gen-config"]);
    assert!(out.status.success());
}

#[test]
fn invalid_config_is_reported() {
    let tmp = project("[paths]\nsitee = \"typo\"\n");

    let out = doc_tasks(tmp.path(), &["clean"]);

    assert_eq!(out.status.code(), Some(1));
    assert!(stderr(&out).starts_with("Error:"));
}

#[test]
fn explicit_config_file() {
    let tmp = TempDir::new().unwrap();
    let config = tmp.path().join("custom.toml");
    fs::write(&config, "[paths]\nclean = [\"build\"]\n").unwrap();
    write(tmp.path(), "build/out.txt", "x");
    write(tmp.path(), "site/index.html", "home");

    let out = doc_tasks(
        tmp.path(),
        &["--config", config.to_str().unwrap(), "clean"],
    );

    assert!(out.status.success(), "stderr: {}", stderr(&out));
    assert!(!tmp.path().join("build").exists());
    assert!(tmp.path().join("site").exists());
}
