//! The table of known metadata types.
//!
//! A registry is loaded once and then only read. It hands out shared references, so a
//! single instance can back any number of classifiers, across threads if need be.

use std::io;

use serde::{Deserialize, Serialize};

use crate::error::{ClassifyError, RegistryError};
use crate::util::FnvHashMap;

const BUNDLED_REGISTRY: &str = include_str!("../data/registry.json");

/// Properties of a metadata type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetadataType {
    pub name: String,
    /// Name of the directory where components are located in a package
    pub directory_name: String,
    /// Whether components are stored in named folders (reports, documents, ...).
    pub in_folder: bool,
    /// Absent for types made up of varying file extensions, such as bundles.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suffix: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub child_xml_names: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetadataRegistry {
    /// Type id (lower-cased type name) to definition.
    types: FnvHashMap<String, MetadataType>,
    /// File suffix to type id.
    suffixes: FnvHashMap<String, String>,
    /// Directory name to type id, for types without a single suffix.
    #[serde(default)]
    mixed_content: FnvHashMap<String, String>,
}

impl MetadataRegistry {
    /// The registry shipped with this crate.
    pub fn bundled() -> Result<Self, RegistryError> {
        let registry = MetadataRegistry::from_json(BUNDLED_REGISTRY)?;
        registry.validate()?;
        Ok(registry)
    }

    pub fn from_json(data: &str) -> Result<Self, RegistryError> {
        Ok(serde_json::from_str(data)?)
    }

    pub fn from_reader<R: io::Read>(reader: R) -> Result<Self, RegistryError> {
        Ok(serde_json::from_reader(reader)?)
    }

    /// Checks that every suffix and directory maps to a defined type.
    pub fn validate(&self) -> Result<(), RegistryError> {
        for (suffix, type_id) in self.suffixes.iter().chain(self.mixed_content.iter()) {
            if !self.types.contains_key(type_id) {
                return Err(RegistryError::DanglingSuffix {
                    suffix: suffix.clone(),
                    type_id: type_id.clone(),
                });
            }
        }
        Ok(())
    }

    /// Looks up a type by name, ignoring case and spaces (`"Apex Class"` finds `apexclass`).
    pub fn type_from_name(&self, name: &str) -> Result<&MetadataType, ClassifyError> {
        let id: String = name.chars().filter(|c| *c != ' ').collect::<String>().to_lowercase();
        self.type_by_id(&id)
    }

    pub fn type_by_id(&self, id: &str) -> Result<&MetadataType, ClassifyError> {
        self.types
            .get(id)
            .ok_or_else(|| ClassifyError::UnknownType(id.to_owned()))
    }

    /// The type id registered for a file suffix, if any.
    pub fn type_id_for_suffix(&self, suffix: &str) -> Option<&str> {
        self.suffixes.get(suffix).map(String::as_str)
    }

    pub fn type_for_suffix(&self, suffix: &str) -> Option<&MetadataType> {
        self.type_id_for_suffix(suffix).and_then(|id| self.types.get(id))
    }

    /// The mixed-content type stored under `directory_name`, if any.
    pub fn type_for_directory(&self, directory_name: &str) -> Option<&MetadataType> {
        self.mixed_content
            .get(directory_name)
            .and_then(|id| self.types.get(id))
    }

    pub fn types(&self) -> impl Iterator<Item = &MetadataType> {
        self.types.values()
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}
