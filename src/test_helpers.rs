//! Shared test utilities for the doc-tasks test suite.
//!
//! Builds throwaway generated-site trees in a temp directory and provides
//! small readers for asserting on the flattened destination.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let (_tmp, site, assistant) = setup_site(&[("guide/intro.html", "intro")]);
//! flatten(&site, &assistant).unwrap();
//! assert_eq!(file_names(&assistant), vec!["guide - intro.html"]);
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

// =========================================================================
// Fixture setup
// =========================================================================

/// Create `site/` populated with `files` and an empty `assistant/` in a temp dir.
///
/// Each entry is `(path relative to site/, contents)`; parent directories are
/// created as needed.
pub fn setup_site(files: &[(&str, &str)]) -> (TempDir, PathBuf, PathBuf) {
    let tmp = TempDir::new().unwrap();
    let site = tmp.path().join("site");
    let assistant = tmp.path().join("assistant");
    fs::create_dir_all(&site).unwrap();
    fs::create_dir_all(&assistant).unwrap();
    write_files(&site, files);
    (tmp, site, assistant)
}

/// A small but realistic generated site: top-level pages, one- and two-level
/// nesting, and the non-page assets a doc generator leaves next to them.
pub fn setup_docs_site() -> (TempDir, PathBuf, PathBuf) {
    setup_site(&[
        ("index.html", "<h1>Home</h1>"),
        ("404.html", "<h1>Not found</h1>"),
        ("guide/intro.html", "<h1>Intro</h1>"),
        ("guide/setup/linux.html", "<h1>Linux</h1>"),
        ("api/reference.html", "<h1>API</h1>"),
        ("assets/stylesheets/main.css", "body { margin: 0 }"),
        ("search/search_index.json", "{\"docs\": []}"),
        ("sitemap.xml", "<urlset/>"),
    ])
}

/// Write `(relative path, contents)` pairs under `root`.
pub fn write_files(root: &Path, files: &[(&str, &str)]) {
    for (rel, contents) in files {
        let path = root.join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, contents).unwrap();
    }
}

// =========================================================================
// Readers
// =========================================================================

/// Sorted entry names directly inside `dir` (files and directories).
pub fn file_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

/// Read a file as UTF-8. Panics with the path on failure.
pub fn read(path: &Path) -> String {
    fs::read_to_string(path).unwrap_or_else(|e| panic!("reading {}: {e}", path.display()))
}

/// Name → bytes for every regular file directly inside `dir`.
pub fn snapshot(dir: &Path) -> BTreeMap<String, Vec<u8>> {
    fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().path())
        .filter(|p| p.is_file())
        .map(|p| {
            let name = p.file_name().unwrap().to_string_lossy().into_owned();
            (name, fs::read(&p).unwrap())
        })
        .collect()
}
