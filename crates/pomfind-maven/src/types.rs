//! Domain types for Maven dependencies.

use crate::error::{MavenError, Result};
use crate::version;
use std::fmt;
use std::str::FromStr;

/// A dependency edge as found in input text or in a pom.xml.
///
/// Everything except `version` is fixed once the value is created; the
/// version of a node with an unknown version is replaced by the one picked
/// from repository metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dependency {
    pub group_id: String,
    pub artifact_id: String,
    /// Declared version specifier: exact, range, placeholder or empty.
    pub version: String,
    /// Raw `<scope>` text, empty when not declared.
    pub scope: String,
    pub optional: bool,
    /// Set for entries coming from `<dependencyManagement>`.
    pub transitive: bool,
}

impl Dependency {
    pub fn new(
        group_id: impl Into<String>,
        artifact_id: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            group_id: group_id.into(),
            artifact_id: artifact_id.into(),
            version: version.into(),
            ..Self::default()
        }
    }

    /// Deduplication key: `groupId:artifactId:version`.
    pub fn id(&self) -> String {
        format!(
            "{}:{}:{}",
            self.group_id,
            self.artifact_id,
            self.concrete_version()
        )
    }

    /// True if the descriptor path can be computed without metadata.
    pub fn has_version(&self) -> bool {
        version::is_known(&self.version)
    }

    /// The single version used to build the descriptor path.
    pub fn concrete_version(&self) -> &str {
        version::select_from_range(&self.version)
    }

    /// Group ID with dots turned into path segments.
    pub fn group_path(&self) -> String {
        self.group_id.replace('.', "/")
    }

    /// Relative path of `maven-metadata.xml` for this artifact.
    pub fn metadata_path(&self) -> String {
        format!("{}/{}/maven-metadata.xml", self.group_path(), self.artifact_id)
    }

    /// Relative path of the `.pom` descriptor for this artifact version.
    pub fn pom_path(&self) -> String {
        let version = self.concrete_version();
        format!(
            "{group}/{artifact}/{version}/{artifact}-{version}.pom",
            group = self.group_path(),
            artifact = self.artifact_id,
        )
    }
}

impl FromStr for Dependency {
    type Err = MavenError;

    /// Parses `groupId:artifactId:version[:...]`; extra fields are ignored.
    fn from_str(s: &str) -> Result<Self> {
        let invalid = || MavenError::InvalidCoordinates {
            coordinates: s.to_string(),
        };

        let mut tokens = s.trim().split(':');
        let (Some(group_id), Some(artifact_id), Some(version)) =
            (tokens.next(), tokens.next(), tokens.next())
        else {
            return Err(invalid());
        };

        if group_id.is_empty() || artifact_id.is_empty() {
            return Err(invalid());
        }

        Ok(Self::new(group_id, artifact_id, version))
    }
}

impl fmt::Display for Dependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.group_id, self.artifact_id, self.version)?;
        if !self.scope.is_empty() {
            write!(f, " (scope={})", self.scope)?;
        }
        if self.optional {
            f.write_str(" (optional)")?;
        }
        Ok(())
    }
}
