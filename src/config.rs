use std::fs;
use std::path::{Path, PathBuf};

use regex::Regex;

use crate::diff::{diff_directories, DirectoryDiffResults, ProgressCallback};
use crate::error::{DescribeIoError, DiffError};
use crate::manifest::Manifest;

/// The configuration for walking and diffing the two trees.
#[derive(Debug)]
pub struct DiffConfig {
    pub ignore: Ignore,
    /// Walk each directory in file name order, so output is reproducible.
    pub sort_entries: bool,
    /// Descend into symlinked directories. A link back up the tree then fails the walk
    /// with a loop error.
    pub follow_links: bool,
}

impl DiffConfig {
    pub fn new() -> Self {
        DiffConfig {
            ignore: Ignore::nothing(),
            sort_entries: true,
            follow_links: false,
        }
    }
}

impl Default for DiffConfig {
    fn default() -> Self {
        DiffConfig::new()
    }
}

#[derive(Debug)]
/// Determines which files should be skipped when walking a tree.
pub struct Ignore {
    pub regexes: Vec<Regex>,
    /// Relative paths; anything inside them is ignored too.
    pub paths: Vec<PathBuf>,
}

impl Ignore {
    /// An `Ignore` struct that ignores nothing
    pub fn nothing() -> Self {
        Ignore {
            regexes: Vec::new(),
            paths: Vec::new(),
        }
    }

    /// checks if the relative path is on the ignore list
    pub fn is_ignored(&self, path: &Path) -> bool {
        if self.paths.iter().any(|ignore| path.starts_with(ignore)) {
            return true;
        }
        let path = path.to_string_lossy();
        self.regexes.iter().any(|ignore| ignore.is_match(&path))
    }
}

const TOOLS_DIR: [&str; 2] = [".sfdx", "tools"];

/// Where the local source and the retrieved org source live inside a project.
#[derive(Debug, Clone)]
pub struct ProjectLayout {
    pub project_root: PathBuf,
    /// The package directory holding local source, relative to `project_root`.
    pub output_dir: PathBuf,
}

impl ProjectLayout {
    pub fn new<P: Into<PathBuf>, O: Into<PathBuf>>(project_root: P, output_dir: O) -> Self {
        ProjectLayout {
            project_root: project_root.into(),
            output_dir: output_dir.into(),
        }
    }

    fn tools_path(&self) -> PathBuf {
        TOOLS_DIR.iter().fold(self.project_root.clone(), |path, part| path.join(part))
    }

    /// The local side of a diff.
    pub fn local_source_path(&self) -> PathBuf {
        self.project_root.join(&self.output_dir)
    }

    /// Scratch directory that retrieved org metadata is unpacked into.
    pub fn metadata_temp_path(&self) -> PathBuf {
        self.tools_path().join("conflicts")
    }

    pub fn package_xml_path(&self) -> PathBuf {
        self.metadata_temp_path().join("package.xml")
    }

    /// The remote side of a diff: org source converted to the project format.
    pub fn remote_source_path(&self) -> PathBuf {
        self.metadata_temp_path().join("converted")
    }

    /// Writes `manifest` to `package.xml` in the scratch directory, creating it first.
    /// An empty manifest is replaced by [`Manifest::default_retrieve`].
    pub fn write_retrieve_manifest(&self, manifest: &Manifest, api_version: Option<&str>) -> Result<PathBuf, DiffError> {
        let xml = if manifest.is_empty() {
            debug!("No components selected, retrieving the default types");
            Manifest::default_retrieve().to_xml(api_version)
        } else {
            manifest.to_xml(api_version)
        };
        let package_xml = self.prepare_package_xml()?;
        info!("Writing retrieve manifest {:?}", package_xml);
        fs::write(&package_xml, xml).describe_write(&package_xml)?;
        Ok(package_xml)
    }

    /// Uses a manifest the user already has, copying it into the scratch directory.
    pub fn copy_retrieve_manifest(&self, manifest_file: &Path) -> Result<PathBuf, DiffError> {
        let xml = fs::read(manifest_file).describe_read(manifest_file)?;
        let package_xml = self.prepare_package_xml()?;
        info!("Copying retrieve manifest {:?} to {:?}", manifest_file, package_xml);
        fs::write(&package_xml, xml).describe_write(&package_xml)?;
        Ok(package_xml)
    }

    fn prepare_package_xml(&self) -> Result<PathBuf, DiffError> {
        let temp = self.metadata_temp_path();
        fs::create_dir_all(&temp).describe_write(&temp)?;
        Ok(self.package_xml_path())
    }

    /// Diffs the local source against the converted org source.
    pub fn diff<P: ProgressCallback>(&self, config: &DiffConfig, progress: &P) -> Result<DirectoryDiffResults, DiffError> {
        diff_directories(&self.local_source_path(), &self.remote_source_path(), config, progress)
    }

    /// Removes the scratch directory and everything retrieved into it.
    pub fn cleanup(&self) -> Result<(), DiffError> {
        let temp = self.metadata_temp_path();
        if temp.exists() {
            info!("Removing {:?}", temp);
            fs::remove_dir_all(&temp).describe_write(&temp)?;
        }
        Ok(())
    }
}
