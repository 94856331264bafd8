use std::error::Error;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use walkdir::Error as WalkDirError;

/// Failures while walking or comparing the two trees.
#[derive(Debug)]
pub enum DiffError {
    /// A tree root does not exist or is not a directory.
    RootNotFound(PathBuf),
    /// A file could not be read, usually because it vanished after being listed.
    ReadError { path: PathBuf, error: io::Error },
    /// A file or directory could not be created or written.
    WriteError { path: PathBuf, error: io::Error },
    WalkDirError(WalkDirError),
}

impl From<WalkDirError> for DiffError {
    fn from(e: WalkDirError) -> Self {
        DiffError::WalkDirError(e)
    }
}

impl fmt::Display for DiffError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            DiffError::RootNotFound(ref root) => write!(f, "root does not exist or is not a directory: {:?}", root),
            DiffError::ReadError { ref path, ref error } => write!(f, "couldn't read {:?}: {}", path, error),
            DiffError::WriteError { ref path, ref error } => write!(f, "couldn't write {:?}: {}", path, error),
            DiffError::WalkDirError(ref e) => write!(f, "walk dir error: {}", e),
        }
    }
}

impl Error for DiffError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match *self {
            DiffError::ReadError { ref error, .. } | DiffError::WriteError { ref error, .. } => Some(error),
            DiffError::WalkDirError(ref e) => Some(e),
            DiffError::RootNotFound(_) => None,
        }
    }
}

/// Attaches the offending path to an `io::Error`.
pub trait DescribeIoError<T> {
    fn describe_read(self, path: &Path) -> Result<T, DiffError>;
    fn describe_write(self, path: &Path) -> Result<T, DiffError>;
}

impl<T> DescribeIoError<T> for io::Result<T> {
    fn describe_read(self, path: &Path) -> Result<T, DiffError> {
        self.map_err(|error| DiffError::ReadError {
            path: path.to_path_buf(),
            error,
        })
    }

    fn describe_write(self, path: &Path) -> Result<T, DiffError> {
        self.map_err(|error| DiffError::WriteError {
            path: path.to_path_buf(),
            error,
        })
    }
}

/// Reasons a single file couldn't be turned into a metadata component.
#[derive(Debug)]
pub enum ClassifyError {
    FileNotFound(PathBuf),
    /// The file name has no extension to classify by.
    MalformedFileName(PathBuf),
    /// Neither the extension nor a `<suffix>-meta.xml` pattern matched a known suffix.
    UnsupportedType(PathBuf),
    /// A content file was found without its `-meta.xml` descriptor.
    MissingDescriptor { path: PathBuf, descriptor: PathBuf },
    /// A suffix resolved to a type id with no definition in the registry.
    UnknownType(String),
}

impl fmt::Display for ClassifyError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            ClassifyError::FileNotFound(ref path) => write!(f, "file not found: {:?}", path),
            ClassifyError::MalformedFileName(ref path) => write!(f, "file name has no extension: {:?}", path),
            ClassifyError::UnsupportedType(ref path) => {
                write!(f, "types missing a defined suffix are currently unsupported: {:?}", path)
            }
            ClassifyError::MissingDescriptor { ref path, ref descriptor } => {
                write!(f, "metadata xml file {:?} missing for {:?}", descriptor, path)
            }
            ClassifyError::UnknownType(ref id) => write!(f, "missing metadata type definition for {}", id),
        }
    }
}

impl Error for ClassifyError {}

/// Failures while loading the metadata type registry.
#[derive(Debug)]
pub enum RegistryError {
    Io(io::Error),
    Parse(serde_json::Error),
    /// A suffix points at a type id that has no definition.
    DanglingSuffix { suffix: String, type_id: String },
}

impl From<io::Error> for RegistryError {
    fn from(e: io::Error) -> Self {
        RegistryError::Io(e)
    }
}

impl From<serde_json::Error> for RegistryError {
    fn from(e: serde_json::Error) -> Self {
        RegistryError::Parse(e)
    }
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            RegistryError::Io(ref e) => write!(f, "io error: {}", e),
            RegistryError::Parse(ref e) => write!(f, "invalid registry data: {}", e),
            RegistryError::DanglingSuffix { ref suffix, ref type_id } => {
                write!(f, "suffix {:?} maps to undefined type {:?}", suffix, type_id)
            }
        }
    }
}

impl Error for RegistryError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match *self {
            RegistryError::Io(ref e) => Some(e),
            RegistryError::Parse(ref e) => Some(e),
            RegistryError::DanglingSuffix { .. } => None,
        }
    }
}

/// Failures around conflict resolution and applying the chosen dispositions.
#[derive(Debug)]
pub enum ConflictError {
    /// Some entries still have no disposition, so nothing may be copied.
    Unresolved { remaining: usize },
    /// An entry can't be moved back to `Unresolved`.
    InvalidDisposition(PathBuf),
    Diff(DiffError),
}

impl From<DiffError> for ConflictError {
    fn from(e: DiffError) -> Self {
        ConflictError::Diff(e)
    }
}

impl fmt::Display for ConflictError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            ConflictError::Unresolved { remaining } => write!(f, "{} conflict(s) are still unresolved", remaining),
            ConflictError::InvalidDisposition(ref path) => {
                write!(f, "the conflict at {:?} can't be marked unresolved again", path)
            }
            ConflictError::Diff(ref e) => write!(f, "{}", e),
        }
    }
}

impl Error for ConflictError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match *self {
            ConflictError::Diff(ref e) => Some(e),
            _ => None,
        }
    }
}
