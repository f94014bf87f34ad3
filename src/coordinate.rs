//! Fragment coordinates and their textual declarations
//!
//! A fragment is declared as a property value of the form
//! `group:artifact:version[:type[:classifier]][@relativePath]`. Parsing is
//! purely textual; whether a local override points at a file or a directory
//! is decided later, during resolution.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Default artifact type of a fragment
pub const DEFAULT_TYPE: &str = "pom";

/// Default scope of a fragment
pub const DEFAULT_SCOPE: &str = "compile";

/// Separator between the coordinate and the local override path
const LOCATION_SEPARATOR: char = '@';

/// Fully qualified artifact coordinate
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Coordinate {
    pub group_id: String,
    pub artifact_id: String,
    pub version: String,
    pub r#type: String,
    pub classifier: String,
    pub scope: String,
}

impl Coordinate {
    /// Create a coordinate with the default type, classifier and scope
    pub fn new(group_id: &str, artifact_id: &str, version: &str) -> Self {
        Self {
            group_id: group_id.to_string(),
            artifact_id: artifact_id.to_string(),
            version: version.to_string(),
            r#type: DEFAULT_TYPE.to_string(),
            classifier: String::new(),
            scope: DEFAULT_SCOPE.to_string(),
        }
    }

    /// Override the artifact type
    pub fn with_type(mut self, r#type: &str) -> Self {
        self.r#type = r#type.to_string();
        self
    }

    /// Override the classifier
    pub fn with_classifier(mut self, classifier: &str) -> Self {
        self.classifier = classifier.to_string();
        self
    }

    /// Canonical cache key over all six fields
    ///
    /// Format: `group:artifact:version:scope:type:classifier`
    pub fn key(&self) -> String {
        format!(
            "{}:{}:{}:{}:{}:{}",
            self.group_id, self.artifact_id, self.version, self.scope, self.r#type, self.classifier
        )
    }

    /// `group:artifact:version`, used in messages and for matching descriptors
    pub fn gav(&self) -> String {
        format!("{}:{}:{}", self.group_id, self.artifact_id, self.version)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.group_id, self.artifact_id, self.version)?;
        if self.r#type != DEFAULT_TYPE || !self.classifier.is_empty() {
            write!(f, ":{}", self.r#type)?;
        }
        if !self.classifier.is_empty() {
            write!(f, ":{}", self.classifier)?;
        }
        Ok(())
    }
}

/// A parsed fragment declaration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FragmentReference {
    pub coordinate: Coordinate,
    /// Local override, already joined to the requesting descriptor's directory
    pub location: Option<PathBuf>,
}

impl FragmentReference {
    /// Parse a fragment declaration relative to `base_dir`
    ///
    /// # Examples
    ///
    /// ```
    /// use std::path::Path;
    /// use maven_compose::coordinate::FragmentReference;
    ///
    /// let reference = FragmentReference::parse("com.x:frag:1.0@../frag", Path::new("/work/app")).unwrap();
    /// assert_eq!(reference.coordinate.gav(), "com.x:frag:1.0");
    /// assert_eq!(reference.coordinate.r#type, "pom");
    /// assert_eq!(reference.location.unwrap(), Path::new("/work/app/../frag"));
    /// ```
    pub fn parse(value: &str, base_dir: &Path) -> Result<Self> {
        let (coords, location) = match value.split_once(LOCATION_SEPARATOR) {
            Some((coords, location)) => (coords, Some(location.trim())),
            None => (value, None),
        };

        let coordinate = parse_coordinate(coords).map_err(|message| Error::InvalidCoordinate {
            value: value.to_string(),
            message,
        })?;

        let location = match location {
            Some("") => {
                return Err(Error::InvalidCoordinate {
                    value: value.to_string(),
                    message: "empty location after '@'".to_string(),
                })
            }
            Some(relative) => Some(base_dir.join(relative)),
            None => None,
        };

        Ok(Self {
            coordinate,
            location,
        })
    }
}

fn parse_coordinate(coords: &str) -> std::result::Result<Coordinate, String> {
    let fields: Vec<&str> = coords.split(':').map(str::trim).collect();

    if fields.len() < 3 {
        return Err(format!(
            "expected group:artifact:version[:type[:classifier]], found {} field(s)",
            fields.len()
        ));
    }
    if fields.len() > 5 {
        return Err(format!("too many fields ({}), at most 5 allowed", fields.len()));
    }
    if let Some(name) = ["group", "artifact", "version"]
        .iter()
        .zip(&fields)
        .find(|(_, field)| field.is_empty())
        .map(|(name, _)| name)
    {
        return Err(format!("{} must not be empty", name));
    }

    let mut coordinate = Coordinate::new(fields[0], fields[1], fields[2]);
    if let Some(r#type) = fields.get(3).filter(|t| !t.is_empty()) {
        coordinate.r#type = r#type.to_string();
    }
    if let Some(classifier) = fields.get(4) {
        coordinate.classifier = classifier.to_string();
    }
    Ok(coordinate)
}
