use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::classify::SourceClassifier;
use crate::diff::DirectoryDiffResults;
use crate::error::ConflictError;

/// How the user chose to resolve a conflict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConflictDisposition {
    Unresolved,
    /// keep the local file
    AcceptLocal,
    /// overwrite the local file with the remote one
    AcceptRemote,
}

impl Default for ConflictDisposition {
    fn default() -> Self {
        ConflictDisposition::Unresolved
    }
}

/// A file whose contents differ between the local and remote trees.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConflictEntry {
    /// Relative to both roots, unique within one diff.
    pub relative_path: PathBuf,
    pub file_name: String,
    pub local_root: PathBuf,
    pub remote_root: PathBuf,
    /// The metadata type the file belongs to, when it could be worked out.
    pub type_name: Option<String>,
    disposition: ConflictDisposition,
}

impl ConflictEntry {
    pub fn new(relative_path: PathBuf, local_root: PathBuf, remote_root: PathBuf) -> Self {
        let file_name = relative_path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        ConflictEntry {
            relative_path,
            file_name,
            local_root,
            remote_root,
            type_name: None,
            disposition: ConflictDisposition::default(),
        }
    }

    pub fn disposition(&self) -> ConflictDisposition {
        self.disposition
    }

    pub fn is_resolved(&self) -> bool {
        self.disposition != ConflictDisposition::Unresolved
    }

    /// Records the user's choice. Either side may be picked, and picked again, but an entry
    /// never goes back to `Unresolved`.
    pub fn resolve(&mut self, disposition: ConflictDisposition) -> Result<(), ConflictError> {
        if disposition == ConflictDisposition::Unresolved {
            return Err(ConflictError::InvalidDisposition(self.relative_path.clone()));
        }
        debug!("Resolving {:?} as {:?}", self.relative_path, disposition);
        self.disposition = disposition;
        Ok(())
    }

    pub fn local_path(&self) -> PathBuf {
        self.local_root.join(&self.relative_path)
    }

    pub fn remote_path(&self) -> PathBuf {
        self.remote_root.join(&self.relative_path)
    }

    pub fn path(&self) -> &Path {
        &self.relative_path
    }
}

/// Creates one unresolved entry for every path in `results.different`, sorted by path.
pub fn build_entries(results: &DirectoryDiffResults) -> Vec<ConflictEntry> {
    results
        .different_sorted()
        .into_iter()
        .map(|path| {
            ConflictEntry::new(
                path.to_path_buf(),
                results.local_root.clone(),
                results.remote_root.clone(),
            )
        })
        .collect()
}

/// Like `build_entries`, but also records each entry's metadata type.
///
/// Files the classifier rejects are still reported, just without a type.
pub fn build_entries_with(results: &DirectoryDiffResults, classifier: &SourceClassifier) -> Vec<ConflictEntry> {
    let mut entries = build_entries(results);
    for entry in &mut entries {
        match classifier.classify(&entry.local_path()) {
            Ok(component) => entry.type_name = Some(component.metadata_type.name.clone()),
            Err(e) => debug!("No metadata type for {:?}: {}", entry.relative_path, e),
        }
    }
    entries
}

/// True once no entry is left `Unresolved`. Nothing may be copied until this holds.
pub fn all_resolved(entries: &[ConflictEntry]) -> bool {
    entries.iter().all(ConflictEntry::is_resolved)
}

/// Fails with the number of entries still waiting on the user.
pub fn check_all_resolved(entries: &[ConflictEntry]) -> Result<(), ConflictError> {
    let remaining = entries.iter().filter(|entry| !entry.is_resolved()).count();
    if remaining > 0 {
        return Err(ConflictError::Unresolved { remaining });
    }
    Ok(())
}
