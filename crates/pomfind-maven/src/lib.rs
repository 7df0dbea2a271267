//! Maven coordinate and document model.
//!
//! Parses `groupId:artifactId:version` coordinates, pom.xml descriptors and
//! maven-metadata.xml documents, and exposes the rules that turn them into
//! repository paths: version selection from metadata, the version range
//! heuristic and placeholder resolution of dependency entries.

pub mod error;
pub mod metadata;
pub mod parser;
pub mod project;
pub mod types;
pub mod version;

pub use error::{MavenError, Result};
pub use metadata::{Metadata, Versioning};
pub use parser::{parse_metadata, parse_pom};
pub use project::Project;
pub use types::Dependency;
