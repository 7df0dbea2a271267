pub mod config;
pub mod driver;
pub mod options;
pub mod output;
pub mod pending;
pub mod resolver;

// Re-export from pomfind-core
pub use pomfind_core::{DEFAULT_REPOSITORIES, Error, FetchConfig, Fetcher, Result};

// Re-export from pomfind-maven
pub use pomfind_maven::{Dependency, MavenError, Metadata, Project};

pub use config::Cli;
pub use driver::Outcome;
pub use options::ResolveOptions;
pub use output::{CollectSink, StdoutSink, UrlSink};
pub use resolver::Resolver;
