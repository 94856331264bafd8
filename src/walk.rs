use std::fs;
use std::path::{Path, PathBuf};

use walkdir::{self, WalkDir};

use crate::config::DiffConfig;
use crate::error::DiffError;
use crate::util::FnvHashSet;

/// Checks that `root` exists and is a directory.
pub fn check_root_exists(root: &Path) -> Result<(), DiffError> {
    if !root.is_dir() {
        return Err(DiffError::RootNotFound(root.to_path_buf()));
    }
    Ok(())
}

/// A lazy traversal of every file below a root.
///
/// Yields paths relative to the root. Directories are descended into but never yielded.
/// Symlinked directories are skipped unless `follow_links` is set in the config; any other
/// symlink is yielded as if it were a file.
pub struct TreeWalk<'a> {
    root: PathBuf,
    inner: walkdir::IntoIter,
    config: &'a DiffConfig,
}

/// Starts walking `root`.
pub fn walk<'a>(root: &Path, config: &'a DiffConfig) -> Result<TreeWalk<'a>, DiffError> {
    check_root_exists(root)?;

    let mut walker = WalkDir::new(root).follow_links(config.follow_links);
    if config.sort_entries {
        walker = walker.sort_by(|a, b| a.file_name().cmp(b.file_name()));
    }

    Ok(TreeWalk {
        root: root.to_path_buf(),
        inner: walker.into_iter(),
        config,
    })
}

/// Collects every relative file path below `root`.
pub fn list_files(root: &Path, config: &DiffConfig) -> Result<FnvHashSet<PathBuf>, DiffError> {
    walk(root, config)?.collect()
}

impl<'a> Iterator for TreeWalk<'a> {
    type Item = Result<PathBuf, DiffError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let entry = match self.inner.next()? {
                Ok(entry) => entry,
                Err(e) => return Some(Err(e.into())),
            };

            // the root itself
            if entry.depth() == 0 {
                continue;
            }

            let relative_path = match entry.path().strip_prefix(&self.root) {
                Ok(path) => path.to_path_buf(),
                Err(_) => continue,
            };

            let file_type = entry.file_type();
            if self.config.ignore.is_ignored(&relative_path) {
                debug!("Ignoring entry {:?}", relative_path);
                if file_type.is_dir() {
                    self.inner.skip_current_dir();
                }
                continue;
            }

            if file_type.is_dir() {
                trace!("Entering {:?}", relative_path);
                continue;
            }

            if file_type.is_symlink() {
                if let Ok(target) = fs::metadata(entry.path()) {
                    if target.is_dir() {
                        debug!("Not following symlinked directory {:?}", relative_path);
                        continue;
                    }
                }
            }

            trace!("Found file {:?}", relative_path);
            return Some(Ok(relative_path));
        }
    }
}
