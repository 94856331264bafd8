use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::compare_files::file_contents_differ;
use crate::config::DiffConfig;
use crate::error::DiffError;
use crate::util::FnvHashSet;
use crate::walk::{check_root_exists, list_files, walk};

/// The result of comparing a local tree against a remote one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DirectoryDiffResults {
    /// Paths present in both trees whose contents are not byte-identical.
    pub different: FnvHashSet<PathBuf>,
    /// Paths present in the remote tree but not the local one.
    pub missing_local: FnvHashSet<PathBuf>,
    pub local_root: PathBuf,
    pub remote_root: PathBuf,
    /// The number of local files that no remote file matched.
    ///
    /// Despite the name this is *not* the total number of local files scanned. The
    /// unmatched count is what has always been reported here, so it is kept as is.
    pub scanned_local: usize,
    /// The number of remote files visited.
    pub scanned_remote: usize,
}

impl DirectoryDiffResults {
    /// Returns true if nothing needs the user's attention.
    pub fn is_empty(&self) -> bool {
        self.different.is_empty() && self.missing_local.is_empty()
    }

    /// The `different` paths, sorted.
    pub fn different_sorted(&self) -> Vec<&Path> {
        sorted(&self.different)
    }

    /// The `missing_local` paths, sorted.
    pub fn missing_local_sorted(&self) -> Vec<&Path> {
        sorted(&self.missing_local)
    }
}

fn sorted(set: &FnvHashSet<PathBuf>) -> Vec<&Path> {
    let mut paths: Vec<&Path> = set.iter().map(PathBuf::as_path).collect();
    paths.sort();
    paths
}

/// Progress reporting for the diff.
pub trait ProgressCallback {
    /// Called once the local tree has been listed.
    fn local_listed(&self, files: usize);
    /// Called for every remote file, before it is compared.
    fn checking_remote(&self, path: &Path, scanned_remote: usize);
}

/// An empty implementation of `ProgressCallback`
pub struct EmptyProgressCallback;

impl ProgressCallback for EmptyProgressCallback {
    fn local_listed(&self, _: usize) {}
    fn checking_remote(&self, _: &Path, _: usize) {}
}

/// Compares the files of `local_root` against those of `remote_root`.
///
/// The whole local tree is listed up front, then the remote tree is walked one file at a
/// time. Each remote file is either matched against its local counterpart (and reported
/// in `different` if the bytes differ) or reported in `missing_local`. Files that only
/// exist locally are not reported, see [`find_missing_remote`].
///
/// Any I/O failure aborts the whole diff; no partial result is returned.
pub fn diff_directories<P>(
    local_root: &Path,
    remote_root: &Path,
    config: &DiffConfig,
    progress: &P,
) -> Result<DirectoryDiffResults, DiffError>
where
    P: ProgressCallback,
{
    info!("Diffing {:?} (local) against {:?} (remote)", local_root, remote_root);

    // warn about non-existent roots before doing any work
    check_root_exists(local_root)?;
    check_root_exists(remote_root)?;

    let mut local = list_files(local_root, config)?;
    debug!("Listed {} local files", local.len());
    progress.local_listed(local.len());

    let mut different = FnvHashSet::default();
    let mut missing_local = FnvHashSet::default();
    let mut scanned_remote = 0;

    for relative_path in walk(remote_root, config)? {
        let relative_path = relative_path?;
        scanned_remote += 1;
        progress.checking_remote(&relative_path, scanned_remote);

        // removing it means the path can't be matched twice
        if local.remove(&relative_path) {
            let local_path = local_root.join(&relative_path);
            let remote_path = remote_root.join(&relative_path);
            if file_contents_differ(&local_path, &remote_path)? {
                warn!("Difference at {:?} - file contents not equal", relative_path);
                different.insert(relative_path);
            }
        } else {
            debug!("{:?} is missing locally", relative_path);
            missing_local.insert(relative_path);
        }
    }

    info!(
        "Diff complete: {} different, {} missing locally, {} remote files scanned, {} local files unmatched",
        different.len(),
        missing_local.len(),
        scanned_remote,
        local.len()
    );

    Ok(DirectoryDiffResults {
        different,
        missing_local,
        local_root: local_root.to_path_buf(),
        remote_root: remote_root.to_path_buf(),
        scanned_local: local.len(),
        scanned_remote,
    })
}

/// Finds the local files that have no counterpart in the remote tree.
///
/// This is the third category of difference, which `diff_directories` does not report.
pub fn find_missing_remote(
    results: &DirectoryDiffResults,
    config: &DiffConfig,
) -> Result<FnvHashSet<PathBuf>, DiffError> {
    let mut missing_remote = FnvHashSet::default();
    for relative_path in walk(&results.local_root, config)? {
        let relative_path = relative_path?;
        if !results.remote_root.join(&relative_path).is_file() {
            trace!("{:?} is missing remotely", relative_path);
            missing_remote.insert(relative_path);
        }
    }
    Ok(missing_remote)
}
