//! Command line and environment configuration.
//!
//! Every option can also be set through a `POMFIND_*` environment variable;
//! the command line wins when both are present.

use crate::options::{ResolveOptions, parse_scope_list};
use clap::{ArgAction, Parser};
use pomfind_core::{DEFAULT_REPOSITORIES, Error, FetchConfig, Result};
use std::path::{Path, PathBuf};
use std::time::Duration;

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("POMFIND_GIT_HASH"),
    ")"
);

/// Reads `groupId:artifactId:version` lines from stdin and prints the URL of
/// every pom.xml in their dependency trees.
#[derive(Debug, Parser)]
#[command(name = "pomfind", version, long_version = LONG_VERSION)]
pub struct Cli {
    /// Number of concurrent HTTP fetch workers
    #[arg(long, env = "POMFIND_WORKERS", default_value_t = 50)]
    pub workers: usize,

    /// Extra attempts after a failed request (404 is never retried)
    #[arg(long, env = "POMFIND_RETRIES", default_value_t = 2)]
    pub retries: u32,

    /// Per-request HTTP timeout in seconds
    #[arg(long, env = "POMFIND_TIMEOUT", default_value_t = 2)]
    pub timeout: u64,

    /// Delay between attempts in milliseconds
    #[arg(long, env = "POMFIND_RETRY_DELAY_MS", default_value_t = 500)]
    pub retry_delay_ms: u64,

    /// File with one repository base URL per line
    #[arg(long, env = "POMFIND_REPOS_FILE", value_name = "PATH")]
    pub repos_file: Option<PathBuf>,

    /// Comma separated scopes whose dependencies are not followed
    #[arg(long, env = "POMFIND_IGNORE_SCOPES", default_value = "provided,system,test")]
    pub ignore_scopes: String,

    /// Skip optional dependencies
    #[arg(long, env = "POMFIND_IGNORE_OPTIONAL", default_value_t = true, action = ArgAction::Set)]
    pub ignore_optional: bool,

    /// Skip entries from <dependencyManagement>
    #[arg(long, env = "POMFIND_IGNORE_TRANSITIVE", default_value_t = true, action = ArgAction::Set)]
    pub ignore_transitive: bool,

    /// Follow dependencies of resolved poms
    #[arg(long, env = "POMFIND_RECURSIVE", default_value_t = true, action = ArgAction::Set)]
    pub recursive: bool,

    /// Exit with status 1 if any dependency failed to resolve
    #[arg(long, env = "POMFIND_EXIT_CODE", default_value_t = true, action = ArgAction::Set)]
    pub exit_code: bool,

    /// Enable debug diagnostics on stderr
    #[arg(long, short = 'v', env = "POMFIND_VERBOSE")]
    pub verbose: bool,
}

impl Cli {
    pub fn resolve_options(&self) -> ResolveOptions {
        ResolveOptions {
            ignore_scopes: parse_scope_list(&self.ignore_scopes),
            ignore_optional: self.ignore_optional,
            ignore_transitive: self.ignore_transitive,
            recursive: self.recursive,
        }
    }

    /// Builds the fetch pool settings, reading `--repos-file` if given.
    ///
    /// # Errors
    ///
    /// Fails if the repository file cannot be read or lists no repository.
    pub async fn fetch_config(&self) -> Result<FetchConfig> {
        let repositories = match &self.repos_file {
            Some(path) => read_repo_list(path).await?,
            None => DEFAULT_REPOSITORIES
                .iter()
                .map(|r| (*r).to_string())
                .collect(),
        };

        Ok(FetchConfig {
            workers: self.workers,
            timeout: Duration::from_secs(self.timeout),
            retries: self.retries,
            retry_delay: Duration::from_millis(self.retry_delay_ms),
            repositories,
        })
    }
}

/// Reads a repository list file.
///
/// # Errors
///
/// Returns [`Error::Io`] if the file cannot be read and [`Error::Config`] if
/// it names no repository.
pub async fn read_repo_list(path: &Path) -> Result<Vec<String>> {
    let content = tokio::fs::read_to_string(path).await?;
    let repos = parse_repo_list(&content);
    if repos.is_empty() {
        return Err(Error::Config(format!(
            "no repositories listed in {}",
            path.display()
        )));
    }
    tracing::debug!("Loaded {} repositories from {}", repos.len(), path.display());
    Ok(repos)
}

/// One base URL per line; blank and `#` lines are skipped.
fn parse_repo_list(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(|line| line.trim_end_matches('/').to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_repo_list() {
        let content = "\
# internal mirrors
https://repo.example/maven2/

  https://mirror.example/m2
";
        assert_eq!(
            parse_repo_list(content),
            ["https://repo.example/maven2", "https://mirror.example/m2"]
        );
    }

    #[tokio::test]
    async fn test_read_repo_list_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("repos.txt");
        std::fs::write(&path, "https://a.example\nhttps://b.example/\n").unwrap();

        let repos = read_repo_list(&path).await.unwrap();
        assert_eq!(repos, ["https://a.example", "https://b.example"]);
    }

    #[tokio::test]
    async fn test_read_repo_list_missing_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let result = read_repo_list(&temp_dir.path().join("missing.txt")).await;
        assert!(matches!(result, Err(Error::Io(_))));
    }

    #[tokio::test]
    async fn test_read_repo_list_without_entries() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("repos.txt");
        std::fs::write(&path, "# nothing here\n\n").unwrap();

        let result = read_repo_list(&path).await;
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[tokio::test]
    async fn test_cli_defaults() {
        let cli = Cli::try_parse_from(["pomfind"]).unwrap();
        assert_eq!(cli.workers, 50);
        assert_eq!(cli.retries, 2);
        assert!(cli.exit_code);
        assert!(!cli.verbose);

        let opts = cli.resolve_options();
        assert_eq!(opts.ignore_scopes, ["provided", "system", "test"]);
        assert!(opts.ignore_optional);
        assert!(opts.ignore_transitive);
        assert!(opts.recursive);

        let config = cli.fetch_config().await.unwrap();
        assert_eq!(config.timeout, Duration::from_secs(2));
        assert_eq!(config.retry_delay, Duration::from_millis(500));
        assert_eq!(config.repositories.len(), DEFAULT_REPOSITORIES.len());
    }

    #[test]
    fn test_cli_toggles_take_values() {
        let cli = Cli::try_parse_from([
            "pomfind",
            "--recursive",
            "false",
            "--ignore-optional=false",
            "--ignore-scopes",
            "",
            "--workers",
            "4",
        ])
        .unwrap();

        assert_eq!(cli.workers, 4);
        let opts = cli.resolve_options();
        assert!(!opts.recursive);
        assert!(!opts.ignore_optional);
        assert!(opts.ignore_scopes.is_empty());
    }

    #[tokio::test]
    async fn test_cli_repos_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("repos.txt");
        std::fs::write(&path, "https://only.example\n").unwrap();

        let cli = Cli::try_parse_from(["pomfind", "--repos-file", path.to_str().unwrap()]).unwrap();
        let config = cli.fetch_config().await.unwrap();
        assert_eq!(config.repositories, ["https://only.example"]);
    }
}
