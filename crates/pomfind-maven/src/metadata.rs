//! maven-metadata.xml: the list of published versions of an artifact.

use crate::error::Result;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Versioning {
    pub latest: String,
    pub release: String,
    pub versions: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Metadata {
    pub group_id: String,
    pub artifact_id: String,
    pub version: String,
    pub versioning: Versioning,
}

impl Metadata {
    /// Parses a downloaded maven-metadata.xml body.
    pub fn from_bytes(content: &[u8]) -> Result<Self> {
        crate::parser::parse_metadata(content)
    }

    /// The version to resolve an unversioned dependency to.
    ///
    /// Prefers `<latest>`, then `<release>`, then the top-level `<version>`.
    /// Empty when the document lists none of them.
    pub fn latest(&self) -> &str {
        [
            &self.versioning.latest,
            &self.versioning.release,
            &self.version,
        ]
        .into_iter()
        .find(|v| !v.is_empty())
        .map_or("", String::as_str)
    }
}
