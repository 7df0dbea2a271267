//! Errors specific to Maven coordinates and documents.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum MavenError {
    #[error("Failed to parse XML document: {message}")]
    ParseError { message: String },

    #[error("Invalid Maven coordinates '{coordinates}': expected 'groupId:artifactId:version'")]
    InvalidCoordinates { coordinates: String },
}

pub type Result<T> = std::result::Result<T, MavenError>;

impl MavenError {
    /// Attaches the URL of the offending document to a parse failure.
    pub fn in_document(self, document: &str) -> pomfind_core::Error {
        match self {
            Self::ParseError { message } => pomfind_core::Error::DocumentFormat {
                document: document.to_string(),
                message,
            },
            other => other.into(),
        }
    }
}

impl From<MavenError> for pomfind_core::Error {
    fn from(err: MavenError) -> Self {
        match err {
            MavenError::ParseError { message } => Self::DocumentFormat {
                document: "XML document".into(),
                message,
            },
            MavenError::InvalidCoordinates { coordinates } => Self::InvalidCoordinate {
                input: coordinates,
            },
        }
    }
}
