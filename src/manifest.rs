//! Builds the `package.xml` manifest used to retrieve components from an org.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use crate::classify::{MetadataComponent, SourceClassifier};
use crate::config::DiffConfig;
use crate::error::DiffError;
use crate::walk::walk;

const PACKAGE_XMLNS: &str = "http://soap.sforce.com/2006/04/metadata";

/// Retrieved when the caller doesn't name any components.
const DEFAULT_RETRIEVE_TYPES: [&str; 10] = [
    "ApexClass",
    "ApexTrigger",
    "AuraDefinitionBundle",
    "LightningComponentBundle",
    "FlexiPage",
    "Layout",
    "CustomObject",
    "PermissionSet",
    "StaticResource",
    "CustomTab",
];

/// Component names grouped by metadata type name, both kept sorted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Manifest {
    types: BTreeMap<String, BTreeSet<String>>,
}

impl Manifest {
    pub fn new() -> Self {
        Manifest::default()
    }

    /// Every component of the commonly edited types.
    pub fn default_retrieve() -> Self {
        let mut manifest = Manifest::new();
        for type_name in DEFAULT_RETRIEVE_TYPES.iter() {
            manifest.add(type_name, "*");
        }
        manifest
    }

    pub fn from_components<'a, 'r: 'a, I>(components: I) -> Self
    where
        I: IntoIterator<Item = &'a MetadataComponent<'r>>,
    {
        let mut manifest = Manifest::new();
        for component in components {
            manifest.add_component(component);
        }
        manifest
    }

    pub fn add(&mut self, type_name: &str, member: &str) {
        self.types
            .entry(type_name.to_owned())
            .or_insert_with(BTreeSet::new)
            .insert(member.to_owned());
    }

    pub fn add_component(&mut self, component: &MetadataComponent) {
        self.add(&component.metadata_type.name, &component.full_name);
    }

    pub fn members(&self, type_name: &str) -> Option<&BTreeSet<String>> {
        self.types.get(type_name)
    }

    pub fn type_names(&self) -> impl Iterator<Item = &str> {
        self.types.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Renders the manifest as `package.xml`.
    pub fn to_xml(&self, api_version: Option<&str>) -> String {
        let mut xml = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
        xml.push_str(&format!("<Package xmlns=\"{}\">\n", PACKAGE_XMLNS));
        for (type_name, members) in &self.types {
            xml.push_str("  <types>\n");
            for member in members {
                xml.push_str(&format!("    <members>{}</members>\n", escape(member)));
            }
            xml.push_str(&format!("    <name>{}</name>\n", escape(type_name)));
            xml.push_str("  </types>\n");
        }
        if let Some(version) = api_version {
            xml.push_str(&format!("  <version>{}</version>\n", escape(version)));
        }
        xml.push_str("</Package>\n");
        xml
    }
}

/// Classifies every file below `root` into a manifest.
///
/// Files the classifier can't handle are skipped with a warning. A content file and its
/// descriptor name the same component, so it is only listed once.
pub fn create_manifest_from_path(
    root: &Path,
    classifier: &SourceClassifier,
    config: &DiffConfig,
) -> Result<Manifest, DiffError> {
    let mut manifest = Manifest::new();
    for relative_path in walk(root, config)? {
        let relative_path = relative_path?;
        match classifier.classify(&root.join(&relative_path)) {
            Ok(component) => manifest.add_component(&component),
            Err(e) => warn!("Skipping {:?} - {}", relative_path, e),
        }
    }
    info!("Manifest for {:?} lists {} type(s)", root, manifest.types.len());
    Ok(manifest)
}

fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            c => escaped.push(c),
        }
    }
    escaped
}
