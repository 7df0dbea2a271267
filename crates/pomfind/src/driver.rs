//! Feeds input coordinates to a [`Resolver`] and turns the run into an exit status.

use crate::resolver::Resolver;
use pomfind_maven::Dependency;
use std::process::ExitCode;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    /// At least one branch failed and failures are propagated.
    Failed,
    /// The input stream could not be read.
    Unreadable,
}

impl Outcome {
    pub fn exit_code(self) -> ExitCode {
        match self {
            Self::Success => ExitCode::SUCCESS,
            Self::Failed => ExitCode::from(1),
            Self::Unreadable => ExitCode::from(2),
        }
    }
}

/// Resolves every coordinate line of `input`, then waits for the whole run.
///
/// Blank lines are skipped. Lines that are not UTF-8 or not a coordinate are
/// reported and skipped. A read error stops the run at once with
/// [`Outcome::Unreadable`]. With `propagate_failure` off, failed branches
/// still end in [`Outcome::Success`].
pub async fn run<R>(mut input: R, resolver: &Resolver, propagate_failure: bool) -> Outcome
where
    R: AsyncBufRead + Unpin,
{
    let mut buf = Vec::new();
    let mut line_no = 0usize;

    loop {
        buf.clear();
        match input.read_until(b'\n', &mut buf).await {
            Ok(0) => break,
            Ok(_) => line_no += 1,
            Err(e) => {
                tracing::error!("Failed to read input: {}", e);
                return Outcome::Unreadable;
            }
        }

        let Ok(line) = std::str::from_utf8(&buf) else {
            tracing::error!(
                "Skipping input line {}: not valid UTF-8: {}",
                line_no,
                String::from_utf8_lossy(&buf).trim_end()
            );
            continue;
        };

        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match line.parse::<Dependency>() {
            Ok(dep) => resolver.resolve(dep),
            Err(e) => tracing::error!("Skipping input line {}: {}", line_no, e),
        }
    }

    resolver.wait().await;

    if propagate_failure && resolver.failed() {
        Outcome::Failed
    } else {
        Outcome::Success
    }
}
