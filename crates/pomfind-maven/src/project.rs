//! Parsed pom.xml descriptor and placeholder resolution.

use crate::error::Result;
use crate::types::Dependency;
use std::collections::HashMap;

/// Properties may reference other properties; give up after this many rounds.
const MAX_EXPANSION_DEPTH: usize = 8;

/// Root object of a pom.xml file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Project {
    pub group_id: String,
    pub artifact_id: String,
    pub name: String,
    pub version: String,
    pub parent: Option<Dependency>,
    pub properties: HashMap<String, String>,
    pub dependencies: Vec<Dependency>,
    /// Entries of `<dependencyManagement>`, all flagged transitive.
    pub dependency_management: Vec<Dependency>,
    pub plugins: Vec<Dependency>,
}

impl Project {
    /// Parses a downloaded pom.xml body.
    pub fn from_bytes(content: &[u8]) -> Result<Self> {
        crate::parser::parse_pom(content)
    }

    /// Group ID, inherited from the parent when the project omits it.
    pub fn effective_group_id(&self) -> &str {
        if !self.group_id.is_empty() {
            return &self.group_id;
        }
        self.parent.as_ref().map_or("", |p| p.group_id.as_str())
    }

    /// Version, inherited from the parent when the project omits it.
    pub fn effective_version(&self) -> &str {
        if !self.version.is_empty() {
            return &self.version;
        }
        self.parent.as_ref().map_or("", |p| p.version.as_str())
    }

    /// Every dependency edge of this project, placeholders resolved.
    ///
    /// Order: parent, direct dependencies, dependency management entries,
    /// build plugins.
    pub fn all_dependencies(&self) -> Vec<Dependency> {
        let parent = self.parent.iter().filter(|p| !p.artifact_id.is_empty());

        parent
            .chain(&self.dependencies)
            .chain(&self.dependency_management)
            .chain(&self.plugins)
            .map(|dep| self.interpolate(dep))
            .collect()
    }

    /// Resolves `${...}` placeholders in the group and version of `dep`.
    pub fn interpolate(&self, dep: &Dependency) -> Dependency {
        Dependency {
            group_id: self.expand(&dep.group_id),
            version: self.expand(&dep.version),
            ..dep.clone()
        }
    }

    /// Expands placeholders until the value stops changing.
    ///
    /// Unknown placeholders are kept verbatim.
    pub fn expand(&self, value: &str) -> String {
        let mut current = value.to_string();
        for _ in 0..MAX_EXPANSION_DEPTH {
            if !current.contains("${") {
                break;
            }
            let next = self.substitute(&current);
            if next == current {
                break;
            }
            current = next;
        }
        current
    }

    fn substitute(&self, value: &str) -> String {
        let mut out = String::with_capacity(value.len());
        let mut rest = value;

        while let Some(start) = rest.find("${") {
            out.push_str(&rest[..start]);
            let after = &rest[start + 2..];
            let Some(end) = after.find('}') else {
                out.push_str(&rest[start..]);
                return out;
            };
            match self.lookup(&after[..end]) {
                Some(resolved) => out.push_str(resolved),
                None => out.push_str(&rest[start..start + end + 3]),
            }
            rest = &after[end + 1..];
        }

        out.push_str(rest);
        out
    }

    fn lookup(&self, key: &str) -> Option<&str> {
        let parent = self.parent.as_ref();
        let value: &str = match key {
            "project.groupId" | "pom.groupId" | "groupId" => self.effective_group_id(),
            "project.artifactId" | "pom.artifactId" | "artifactId" => &self.artifact_id,
            "project.version" | "pom.version" | "version" => self.effective_version(),
            "project.parent.groupId" | "parent.groupId" => parent.map_or("", |p| p.group_id.as_str()),
            "project.parent.version" | "parent.version" => parent.map_or("", |p| p.version.as_str()),
            other => self.properties.get(other).map_or("", String::as_str),
        };
        (!value.is_empty()).then_some(value)
    }
}
