//! Copies remote files into the local tree once every conflict has been resolved.

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use crate::conflict::{check_all_resolved, ConflictDisposition, ConflictEntry};
use crate::diff::DirectoryDiffResults;
use crate::error::{ConflictError, DescribeIoError};

/// Brings the local tree up to date with the remote one.
///
/// Every file missing locally is copied in, followed by every conflict resolved as
/// `AcceptRemote`. Returns the local paths that were written.
pub fn perform_retrieve(
    results: &DirectoryDiffResults,
    entries: &[ConflictEntry],
) -> Result<Vec<PathBuf>, ConflictError> {
    check_all_resolved(entries)?;

    let mut written = Vec::new();
    for relative_path in results.missing_local_sorted() {
        let source = results.remote_root.join(relative_path);
        let dest = results.local_root.join(relative_path);
        transfer_file(&source, &dest)?;
        written.push(dest);
    }
    written.extend(accept_remote(entries)?);
    Ok(written)
}

/// Makes the local tree match the org for every `AcceptRemote` conflict, so the
/// following deploy doesn't overwrite those changes. `AcceptLocal` files are left alone.
pub fn prepare_deploy(entries: &[ConflictEntry]) -> Result<Vec<PathBuf>, ConflictError> {
    check_all_resolved(entries)?;
    accept_remote(entries)
}

fn accept_remote(entries: &[ConflictEntry]) -> Result<Vec<PathBuf>, ConflictError> {
    let mut written = Vec::new();
    for entry in entries {
        if entry.disposition() == ConflictDisposition::AcceptRemote {
            let dest = entry.local_path();
            transfer_file(&entry.remote_path(), &dest)?;
            written.push(dest);
        } else {
            trace!("Keeping local {:?}", entry.relative_path);
        }
    }
    Ok(written)
}

fn transfer_file(source: &Path, dest: &Path) -> Result<(), ConflictError> {
    if let Some(parent) = dest.parent() {
        if !parent.exists() {
            info!("Creating parent directory {:?}", parent);
            fs::create_dir_all(parent).describe_write(parent)?;
        }
    }
    info!("Copying file {:?} to {:?}", source, dest);
    let mut reader = File::open(source).describe_read(source)?;
    let mut writer = File::create(dest).describe_write(dest)?;
    io::copy(&mut reader, &mut writer).describe_write(dest)?;
    Ok(())
}
