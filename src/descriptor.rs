//! # Build Descriptor Model
//!
//! This module defines the tree-shaped build descriptor that the composite
//! assembly engine reads, merges and returns. Descriptors are stored as YAML
//! (`pom.yaml` by convention) and deserialized with `serde_yaml`; field names
//! use the familiar camelCase spelling (`groupId`, `artifactId`,
//! `dependencyManagement`, ...).
//!
//! Only the fields the inheritance merge understands are modelled. The
//! properties map doubles as the place where fragments are declared.
//!
//! Descriptors are plain values. Each one carries an [`AssemblyRecord`] of the
//! fragments already merged into it; the record is never serialized.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::coordinate::Coordinate;
use crate::error::{Error, Result};

/// Link to the single parent descriptor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Parent {
    pub group_id: String,
    pub artifact_id: String,
    pub version: String,
    /// Path of the parent descriptor relative to the child's directory
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relative_path: Option<String>,
}

impl Parent {
    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(&self.group_id, &self.artifact_id, &self.version)
    }

    pub fn gav(&self) -> String {
        format!("{}:{}:{}", self.group_id, self.artifact_id, self.version)
    }
}

/// A declared dependency
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dependency {
    pub group_id: String,
    pub artifact_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub r#type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub classifier: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
}

impl Dependency {
    /// Management key: two dependencies with the same key are the same entry
    pub fn management_key(&self) -> String {
        format!(
            "{}:{}:{}:{}",
            self.group_id,
            self.artifact_id,
            self.r#type.as_deref().unwrap_or("jar"),
            self.classifier.as_deref().unwrap_or("")
        )
    }
}

/// A remote artifact repository declaration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Repository {
    pub id: String,
    pub url: String,
}

/// A plugin execution bound to a lifecycle phase
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginExecution {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phase: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub goals: Vec<String>,
}

fn default_inherited() -> bool {
    true
}

fn is_true(value: &bool) -> bool {
    *value
}

/// A build plugin
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Plugin {
    #[serde(default = "default_plugin_group")]
    pub group_id: String,
    pub artifact_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// Whether children (and composing descriptors) inherit this plugin
    #[serde(default = "default_inherited", skip_serializing_if = "is_true")]
    pub inherited: bool,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub configuration: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub executions: Vec<PluginExecution>,
}

fn default_plugin_group() -> String {
    "org.apache.maven.plugins".to_string()
}

impl Plugin {
    pub fn key(&self) -> String {
        format!("{}:{}", self.group_id, self.artifact_id)
    }
}

/// Build section
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Build {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub final_name: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub plugins: Vec<Plugin>,
}

impl Build {
    pub fn is_empty(&self) -> bool {
        self.final_name.is_none() && self.plugins.is_empty()
    }
}

/// Fragment keys already merged into a descriptor
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssemblyRecord {
    applied: BTreeSet<String>,
}

impl AssemblyRecord {
    pub fn contains(&self, fragment_key: &str) -> bool {
        self.applied.contains(fragment_key)
    }

    /// Record a fragment together with everything already merged into it
    pub fn record(&mut self, fragment_key: &str, fragment_record: &AssemblyRecord) {
        self.applied.insert(fragment_key.to_string());
        self.applied
            .extend(fragment_record.applied.iter().cloned());
    }

    pub fn len(&self) -> usize {
        self.applied.len()
    }

    pub fn is_empty(&self) -> bool {
        self.applied.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.applied.iter().map(String::as_str)
    }
}

/// The build descriptor of one module
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildDescriptor {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<Parent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artifact_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub packaging: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub properties: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub modules: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dependency_management: Vec<Dependency>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dependencies: Vec<Dependency>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub repositories: Vec<Repository>,
    #[serde(default, skip_serializing_if = "Build::is_empty")]
    pub build: Build,
    #[serde(skip)]
    pub assembly: AssemblyRecord,
}

impl BuildDescriptor {
    /// Parse a descriptor from YAML
    pub fn from_yaml(content: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// Read a descriptor file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(Error::Io)?;
        Self::from_yaml(&content)
    }

    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| Error::Serialization {
            message: e.to_string(),
        })
    }

    /// Group id, falling back to the parent link
    pub fn effective_group_id(&self) -> Option<&str> {
        self.group_id
            .as_deref()
            .or_else(|| self.parent.as_ref().map(|p| p.group_id.as_str()))
    }

    /// Version, falling back to the parent link
    pub fn effective_version(&self) -> Option<&str> {
        self.version
            .as_deref()
            .or_else(|| self.parent.as_ref().map(|p| p.version.as_str()))
    }

    /// `group:artifact:version` with parent fallbacks; missing parts stay empty
    pub fn gav(&self) -> String {
        format!(
            "{}:{}:{}",
            self.effective_group_id().unwrap_or_default(),
            self.artifact_id.as_deref().unwrap_or_default(),
            self.effective_version().unwrap_or_default()
        )
    }

    /// Whether this descriptor is the artifact named by `coordinate`
    pub fn matches(&self, coordinate: &Coordinate) -> bool {
        self.effective_group_id() == Some(coordinate.group_id.as_str())
            && self.artifact_id.as_deref() == Some(coordinate.artifact_id.as_str())
            && self.effective_version() == Some(coordinate.version.as_str())
    }

    /// Properties whose key starts with one of `prefixes`, in key order
    pub fn fragment_declarations<'a>(
        &'a self,
        prefixes: &'a [String],
    ) -> impl Iterator<Item = (&'a str, &'a str)> + 'a {
        self.properties
            .iter()
            .filter(move |(key, _)| prefixes.iter().any(|prefix| key.starts_with(prefix.as_str())))
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const APP: &str = r#"
parent:
  groupId: com.x
  artifactId: corp-parent
  version: "3"
artifactId: app
packaging: jar
properties:
  maven-compose.a: com.x:frag:1.0
  maven.compose.b: com.x:other:2.0@../other
  java.version: "17"
dependencies:
  - groupId: org.slf4j
    artifactId: slf4j-api
    version: "2.0.9"
build:
  plugins:
    - artifactId: maven-compiler-plugin
      configuration:
        release: "17"
"#;

    #[test]
    fn test_parse_descriptor() {
        let descriptor = BuildDescriptor::from_yaml(APP).unwrap();
        assert_eq!(descriptor.artifact_id.as_deref(), Some("app"));
        assert_eq!(descriptor.properties.len(), 3);
        assert_eq!(descriptor.build.plugins[0].group_id, "org.apache.maven.plugins");
        assert!(descriptor.build.plugins[0].inherited);
        assert!(descriptor.assembly.is_empty());
    }

    #[test]
    fn test_effective_coordinates_fall_back_to_parent() {
        let descriptor = BuildDescriptor::from_yaml(APP).unwrap();
        assert_eq!(descriptor.gav(), "com.x:app:3");
        assert!(descriptor.matches(&Coordinate::new("com.x", "app", "3")));
        assert!(!descriptor.matches(&Coordinate::new("com.x", "app", "4")));
    }

    #[test]
    fn test_fragment_declarations_in_key_order() {
        let descriptor = BuildDescriptor::from_yaml(APP).unwrap();
        let prefixes = vec!["maven-compose.".to_string(), "maven.compose.".to_string()];
        let declared: Vec<_> = descriptor.fragment_declarations(&prefixes).collect();
        assert_eq!(
            declared,
            vec![
                ("maven-compose.a", "com.x:frag:1.0"),
                ("maven.compose.b", "com.x:other:2.0@../other"),
            ]
        );
    }

    #[test]
    fn test_yaml_omits_defaults_and_assembly() {
        let mut descriptor = BuildDescriptor::from_yaml(APP).unwrap();
        descriptor
            .assembly
            .record("com.x:frag:1.0:compile:pom:", &AssemblyRecord::default());
        let yaml = descriptor.to_yaml().unwrap();
        assert!(!yaml.contains("inherited"));
        assert!(!yaml.contains("assembly"));
        assert!(!yaml.contains("modules"));
        let reparsed = BuildDescriptor::from_yaml(&yaml).unwrap();
        assert_eq!(reparsed.properties, descriptor.properties);
    }

    #[test]
    fn test_assembly_record_absorbs_nested_record() {
        let mut nested = AssemblyRecord::default();
        nested.record("c", &AssemblyRecord::default());

        let mut record = AssemblyRecord::default();
        record.record("a", &nested);
        assert!(record.contains("a"));
        assert!(record.contains("c"));
        assert_eq!(record.len(), 2);
    }

    #[test]
    fn test_dependency_management_key_defaults() {
        let dependency = Dependency {
            group_id: "org.slf4j".to_string(),
            artifact_id: "slf4j-api".to_string(),
            version: None,
            r#type: None,
            classifier: None,
            scope: None,
        };
        assert_eq!(dependency.management_key(), "org.slf4j:slf4j-api:jar:");
    }
}
