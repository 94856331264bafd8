use std::path::{Path, PathBuf, MAIN_SEPARATOR};

use crate::error::ClassifyError;
use crate::registry::{MetadataRegistry, MetadataType};

/// Tail of the descriptor file that accompanies each content file.
pub const META_XML_SUFFIX: &str = "-meta.xml";

/// Source information about a single metadata component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataComponent<'r> {
    /// `folder/name` for types stored in folders, otherwise just `name`.
    pub full_name: String,
    pub metadata_type: &'r MetadataType,
    /// Path to the `-meta.xml` descriptor.
    pub xml_path: PathBuf,
    /// Content files, if any exist next to the descriptor.
    pub sources: Vec<PathBuf>,
}

/// Works out which metadata component a file belongs to, by its suffix.
///
/// Only types with a registered file suffix are handled. Bundle types, whose files are
/// recognised by directory rather than by extension, are rejected as unsupported.
#[derive(Debug, Clone, Copy)]
pub struct SourceClassifier<'r> {
    registry: &'r MetadataRegistry,
}

impl<'r> SourceClassifier<'r> {
    pub fn new(registry: &'r MetadataRegistry) -> Self {
        SourceClassifier { registry }
    }

    pub fn registry(&self) -> &'r MetadataRegistry {
        self.registry
    }

    /// Classifies a single file, which may be either a content file or its descriptor.
    pub fn classify(&self, path: &Path) -> Result<MetadataComponent<'r>, ClassifyError> {
        let path_str = path
            .to_str()
            .ok_or_else(|| ClassifyError::MalformedFileName(path.to_path_buf()))?;
        let mut parts = path_str.rsplit(|c: char| c == '/' || c == MAIN_SEPARATOR);
        let file = parts.next().unwrap_or(path_str);
        let folder = parts.next().filter(|folder| !folder.is_empty());

        if !path.exists() {
            return Err(ClassifyError::FileNotFound(path.to_path_buf()));
        }

        let extension_index = file
            .find('.')
            .ok_or_else(|| ClassifyError::MalformedFileName(path.to_path_buf()))?;
        let base_name = &file[..extension_index];
        let extension = &file[extension_index + 1..];

        let type_id;
        let xml_path;
        let mut sources = Vec::new();

        if let Some(id) = self.registry.type_id_for_suffix(extension) {
            // a content file, which must have a descriptor next to it
            let descriptor = PathBuf::from(format!("{}{}", path_str, META_XML_SUFFIX));
            if !descriptor.exists() {
                return Err(ClassifyError::MissingDescriptor {
                    path: path.to_path_buf(),
                    descriptor,
                });
            }
            type_id = Some(id);
            xml_path = descriptor;
            sources.push(path.to_path_buf());
        } else if let Some(suffix) = descriptor_suffix(extension) {
            // the descriptor itself; the content file is optional
            let source = PathBuf::from(&path_str[..path_str.len() - META_XML_SUFFIX.len()]);
            if source.exists() {
                sources.push(source);
            }
            type_id = self.registry.type_id_for_suffix(suffix);
            xml_path = path.to_path_buf();
        } else {
            type_id = None;
            xml_path = PathBuf::new();
        }

        let type_id = type_id.ok_or_else(|| ClassifyError::UnsupportedType(path.to_path_buf()))?;
        let metadata_type = self.registry.type_by_id(type_id)?;

        let full_name = match folder {
            Some(folder) if metadata_type.in_folder => format!("{}/{}", folder, base_name),
            _ => base_name.to_owned(),
        };
        debug!("Classified {:?} as {} {:?}", path, metadata_type.name, full_name);

        Ok(MetadataComponent {
            full_name,
            metadata_type,
            xml_path,
            sources,
        })
    }
}

/// `cls-meta.xml` gives `cls`.
fn descriptor_suffix(extension: &str) -> Option<&str> {
    if extension.len() > META_XML_SUFFIX.len() && extension.ends_with(META_XML_SUFFIX) {
        Some(&extension[..extension.len() - META_XML_SUFFIX.len()])
    } else {
        None
    }
}
