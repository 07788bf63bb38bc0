//! Flattening copier for the `assist` task.
//!
//! Copies every generated page under the site directory into a single flat
//! destination directory, encoding each page's location in its filename (see
//! [`crate::naming`]).
//!
//! ## Run Order
//!
//! ```text
//! 1. Check     source root and destination exist and do not overlap
//! 2. Collect   every *.html under the source root (recursive, sorted)
//! 3. Purge     every *.html directly in the destination
//! 4. Copy      each collected page to destination/<flattened name>
//! ```
//!
//! Collecting happens before purging so a missing or unreadable source tree
//! aborts the run with the destination untouched. Once the purge has started
//! the run is not transactional: an interrupted copy leaves some pages missing
//! but never leaves a partially written directory structure, since the
//! destination only ever receives plain files.
//!
//! Only `.html` entries in the destination are touched. Subdirectories and
//! other files survive every run.
//!
//! The destination may not be the source root or lie anywhere inside it,
//! however the two paths are spelled (`site` vs `./site/`, symlinks, absolute
//! aliases). Both are resolved to canonical paths before anything is deleted.

use crate::naming;
use serde::Serialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum FlattenError {
    #[error("Source directory not found: {0}")]
    SourceNotFound(PathBuf),
    #[error("Destination directory not found: {0}")]
    DestinationNotFound(PathBuf),
    #[error("Destination {destination} is inside the source directory {site}")]
    Overlap { site: PathBuf, destination: PathBuf },
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),
    #[error("Cannot map page to a flat filename: {0}")]
    Unmappable(PathBuf),
    #[error("Failed to walk source tree: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

impl FlattenError {
    /// Classify an I/O failure on `path`, surfacing permission problems by path.
    fn at(path: &Path) -> impl FnOnce(io::Error) -> FlattenError + '_ {
        move |err| match err.kind() {
            io::ErrorKind::PermissionDenied => FlattenError::PermissionDenied(path.to_path_buf()),
            _ => FlattenError::Io(err),
        }
    }
}

/// One page copied into the destination.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Mapping {
    pub source: PathBuf,
    pub destination: PathBuf,
}

/// Everything a flatten run changed in the destination.
#[derive(Debug, Default, Serialize)]
pub struct FlattenReport {
    /// Stale pages deleted from the destination before copying.
    pub removed: Vec<PathBuf>,
    /// Pages copied, in collection order.
    pub copied: Vec<Mapping>,
}

/// Progress events streamed while a run is in flight.
#[derive(Debug, Clone)]
pub enum FlattenEvent {
    Removed(PathBuf),
    Copied(Mapping),
}

pub fn flatten(source_root: &Path, destination: &Path) -> Result<FlattenReport, FlattenError> {
    flatten_with_events(source_root, destination, None)
}

/// Run the copier, sending each removal and copy to `events` as it happens.
///
/// The sender is dropped when the run finishes (successfully or not), so a
/// printer thread draining the receiver terminates on its own.
pub fn flatten_with_events(
    source_root: &Path,
    destination: &Path,
    events: Option<Sender<FlattenEvent>>,
) -> Result<FlattenReport, FlattenError> {
    if !source_root.is_dir() {
        return Err(FlattenError::SourceNotFound(source_root.to_path_buf()));
    }
    if !destination.is_dir() {
        return Err(FlattenError::DestinationNotFound(destination.to_path_buf()));
    }
    check_disjoint(source_root, destination)?;

    let pages = collect_pages(source_root)?;

    let mut report = FlattenReport {
        removed: purge_pages(destination)?,
        copied: Vec::with_capacity(pages.len()),
    };
    if let Some(tx) = &events {
        for path in &report.removed {
            tx.send(FlattenEvent::Removed(path.clone())).ok();
        }
    }

    for relative in &pages {
        let name = naming::flattened_name(relative)
            .ok_or_else(|| FlattenError::Unmappable(relative.clone()))?;
        let mapping = Mapping {
            source: source_root.join(relative),
            destination: destination.join(name),
        };
        // Collisions overwrite: the last page mapped to a name wins.
        fs::copy(&mapping.source, &mapping.destination)
            .map_err(|err| copy_error(&mapping, err))?;

        if let Some(tx) = &events {
            tx.send(FlattenEvent::Copied(mapping.clone())).ok();
        }
        report.copied.push(mapping);
    }

    Ok(report)
}

/// Every page under `source_root`, as paths relative to it.
///
/// Entries are sorted by file name within each directory, so the order (and
/// the winner of any name collision) is stable across runs.
pub fn collect_pages(source_root: &Path) -> Result<Vec<PathBuf>, FlattenError> {
    if !source_root.is_dir() {
        return Err(FlattenError::SourceNotFound(source_root.to_path_buf()));
    }

    let mut pages = Vec::new();
    for entry in WalkDir::new(source_root).sort_by_file_name() {
        let entry = entry?;
        if !entry.file_type().is_file() || !naming::is_page(entry.path()) {
            continue;
        }
        let Ok(relative) = entry.path().strip_prefix(source_root) else {
            continue;
        };
        pages.push(relative.to_path_buf());
    }
    Ok(pages)
}

/// Blame the side of a failed copy that is actually broken.
fn copy_error(mapping: &Mapping, err: io::Error) -> FlattenError {
    if fs::File::open(&mapping.source).is_err() {
        FlattenError::at(&mapping.source)(err)
    } else {
        FlattenError::at(&mapping.destination)(err)
    }
}

/// Fail with [`FlattenError::Overlap`] when `destination` is `site` or lies inside it.
///
/// Purging such a destination would delete pages from the site being copied.
/// `destination` need not exist yet; its nearest existing ancestor is resolved.
pub fn check_disjoint(site: &Path, destination: &Path) -> Result<(), FlattenError> {
    let site_abs = resolve(site).map_err(FlattenError::at(site))?;
    let destination_abs = resolve(destination).map_err(FlattenError::at(destination))?;
    if destination_abs.starts_with(&site_abs) {
        return Err(FlattenError::Overlap {
            site: site.to_path_buf(),
            destination: destination.to_path_buf(),
        });
    }
    Ok(())
}

/// Canonical form of `path`, with any not-yet-existing tail appended as given.
fn resolve(path: &Path) -> io::Result<PathBuf> {
    let mut missing = Vec::new();
    let mut existing = path;
    loop {
        match existing.canonicalize() {
            Ok(base) => {
                return Ok(missing.iter().rev().fold(base, |acc, part| acc.join(part)));
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                let (Some(parent), Some(name)) = (existing.parent(), existing.file_name()) else {
                    return Err(err);
                };
                missing.push(name.to_os_string());
                existing = if parent.as_os_str().is_empty() {
                    Path::new(".")
                } else {
                    parent
                };
            }
            Err(err) => return Err(err),
        }
    }
}

/// Delete every page directly inside `destination` (non-recursive).
///
/// Any entry that cannot be inspected fails the run, so a stale page is never
/// silently left behind. Returns the deleted paths in name order.
pub fn purge_pages(destination: &Path) -> Result<Vec<PathBuf>, FlattenError> {
    let mut stale = Vec::new();
    for entry in fs::read_dir(destination).map_err(FlattenError::at(destination))? {
        let entry = entry.map_err(FlattenError::at(destination))?;
        let path = entry.path();
        let file_type = entry.file_type().map_err(FlattenError::at(&path))?;
        if !file_type.is_dir() && naming::is_page(&path) {
            stale.push(path);
        }
    }
    stale.sort();

    for path in &stale {
        fs::remove_file(path).map_err(FlattenError::at(path))?;
    }
    Ok(stale)
}
