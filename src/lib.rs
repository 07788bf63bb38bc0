//! # doc-tasks
//!
//! Task runner for a documentation site built with a dependency manager and a
//! static documentation generator (Poetry and MkDocs by default).
//!
//! Most tasks are thin: `install`, `build`, `serve` and `deploy` each run one
//! configured external command and pass its exit status straight through.
//! The one task with logic of its own is `assist`, which rebuilds the site and
//! then copies every generated page into a single flat folder that an
//! assistant or indexing tool can ingest without walking a tree.
//!
//! ```text
//! site/                               assistant/
//! ├── index.html              →       ├── index.html
//! ├── guide/                          ├── guide - intro.html
//! │   ├── intro.html          →       ├── guide-setup - linux.html
//! │   └── setup/                      └── api - reference.html
//! │       └── linux.html      →
//! ├── api/
//! │   └── reference.html      →
//! └── assets/…                        (non-page files are not copied)
//! ```
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`naming`] | Pure mapping from a page's path under the site to its flattened filename |
//! | [`flatten`] | The copier: purge stale pages, walk the site, copy pages flat |
//! | [`tasks`] | External command runner (with exit-code pass-through) and native `clean` |
//! | [`config`] | `doc-tasks.toml` loading: stock defaults, sparse overrides, validation |
//! | [`output`] | CLI output formatting: pure `format_*` functions, `print_*` wrappers |
//!
//! # Design Decisions
//!
//! ## External Tools Stay Opaque
//!
//! The runner never parses the output of the dependency manager or the doc
//! generator. A task succeeds when its command exits zero; otherwise the CLI
//! exits with the command's own status code so scripts and CI see exactly
//! what the tool reported. Extra arguments after the task name are appended
//! verbatim, so every flag the tool accepts is available without this crate
//! knowing about it.
//!
//! ## Purge Then Copy, Not Sync
//!
//! The assistant folder is rebuilt from scratch on every run: stale pages are
//! deleted, then every current page is copied. There is no diffing and no
//! cross-run state, which keeps the folder an exact image of the latest build.
//! Only `.html` files directly in the folder are ever deleted, so notes or
//! subdirectories kept alongside them are safe.
//!
//! ## Collisions Are Accepted
//!
//! Flattening is lossy: `a/b/x.html` and `a-b/x.html` map to the same name.
//! The copier walks siblings in name order and the last page written wins.
//! Doc generators rarely produce such trees, and refusing to run would be
//! worse than the collision.

pub mod config;
pub mod flatten;
pub mod naming;
pub mod output;
pub mod tasks;

#[cfg(test)]
pub(crate) mod test_helpers;
