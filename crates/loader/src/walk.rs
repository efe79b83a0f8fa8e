//! Breadth-first discovery of source files below a path.

use std::collections::{HashSet, VecDeque};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Metadata of `path` without following symlinks. `Ok(None)` when access
/// is denied, which callers treat as "skip".
fn metadata(path: &Path) -> io::Result<Option<fs::Metadata>> {
    match fs::symlink_metadata(path) {
        Ok(m) => Ok(Some(m)),
        Err(e) if e.kind() == io::ErrorKind::PermissionDenied => {
            debug!(path = %path.display(), "Permission denied");
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

/// Calls `callback` for every regular file at or below `root`.
///
/// Symlinks are never followed and paths for which `excludes` returns true
/// are pruned together with everything below them. Files are reported in
/// breadth-first order, sorted by name within a directory.
pub fn visit<F, C>(root: &Path, excludes: &F, callback: &mut C) -> anyhow::Result<()>
where
    F: Fn(&Path) -> bool,
    C: FnMut(&Path) -> anyhow::Result<()>,
{
    let mut pending = VecDeque::from([root.to_path_buf()]);
    let mut visited: HashSet<PathBuf> = HashSet::new();

    while let Some(current) = pending.pop_front() {
        if !visited.insert(current.clone()) {
            continue;
        }
        if excludes(&current) {
            debug!(path = %current.display(), "Path excluded");
            continue;
        }
        let Some(meta) = metadata(&current)? else {
            continue;
        };
        let file_type = meta.file_type();
        if file_type.is_symlink() {
            debug!(path = %current.display(), "Symlink skipped");
        } else if file_type.is_file() {
            callback(&current)?;
        } else if file_type.is_dir() {
            let entries = match fs::read_dir(&current) {
                Ok(e) => e,
                Err(e) if e.kind() == io::ErrorKind::PermissionDenied => {
                    debug!(path = %current.display(), "Permission denied");
                    continue;
                }
                Err(e) => return Err(e.into()),
            };
            let mut children = Vec::new();
            for entry in entries {
                match entry {
                    Ok(entry) => children.push(entry.path()),
                    Err(e) if e.kind() == io::ErrorKind::PermissionDenied => continue,
                    Err(e) => return Err(e.into()),
                }
            }
            children.sort();
            pending.extend(children);
        }
    }

    Ok(())
}
