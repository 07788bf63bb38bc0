//! Flattened filename mapping for generated pages.
//!
//! The assistant folder is flat, so a page's position in the site tree has to
//! be carried in its filename. Pages directly under the site root keep their
//! name; nested pages are prefixed with their parent path:
//!
//! ```text
//! site/index.html                → index.html
//! site/guide/intro.html          → guide - intro.html
//! site/guide/setup/linux.html    → guide-setup - linux.html
//! ```
//!
//! Multi-component parents are joined with `-` so the result is always a
//! single path component. Distinct trees can therefore collide
//! (`a/b/x.html` and `a-b/x.html` both map to `a-b - x.html`); the copier
//! lets the last write win.

use std::ffi::{OsStr, OsString};
use std::path::{Component, Path};

/// Placed between the parent path and the page's own filename.
pub const SEPARATOR: &str = " - ";

/// Joins parent directory components when a page is nested more than one level.
pub const PARENT_JOINER: &str = "-";

/// Extension (with dot) that marks a generated page.
pub const PAGE_SUFFIX: &str = ".html";

/// Whether a path names a generated page.
///
/// Literal, case-sensitive suffix match on the file name: `INDEX.HTML` and
/// `page.htm` are not pages. Names that are not valid UTF-8 still match on
/// their raw bytes.
pub fn is_page(path: &Path) -> bool {
    path.file_name()
        .map(|name| name.as_encoded_bytes().ends_with(PAGE_SUFFIX.as_bytes()))
        .unwrap_or(false)
}

/// The parent path of `relative`, flattened to one name.
///
/// Returns `None` for files at the top of the source root.
///
/// - `"index.html"` → `None`
/// - `"guide/intro.html"` → `Some("guide")`
/// - `"guide/setup/linux.html"` → `Some("guide-setup")`
pub fn relative_parent(relative: &Path) -> Option<OsString> {
    let parent = relative.parent()?;
    let mut joined: Option<OsString> = None;
    for part in parent.components().filter_map(|c| match c {
        Component::Normal(part) => Some(part),
        _ => None,
    }) {
        match joined.as_mut() {
            Some(name) => {
                name.push(PARENT_JOINER);
                name.push(part);
            }
            None => joined = Some(part.to_os_string()),
        }
    }
    joined
}

/// Map a path relative to the source root to its flattened filename.
///
/// The bytes of every component are kept as they are, so a top-level page
/// keeps exactly its original name even when that name is not UTF-8.
///
/// Returns `None` only when `relative` has no file name (e.g. `""` or `".."`).
pub fn flattened_name(relative: &Path) -> Option<OsString> {
    let file_name: &OsStr = relative.file_name()?;
    match relative_parent(relative) {
        Some(mut name) => {
            name.push(SEPARATOR);
            name.push(file_name);
            Some(name)
        }
        None => Some(file_name.to_os_string()),
    }
}
