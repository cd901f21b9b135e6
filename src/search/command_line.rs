//! `gcloud` CLI searcher.

use futures::future::{BoxFuture, FutureExt};
use std::fmt;
use std::future::Future;
use std::io;
use std::path::PathBuf;
use std::process::Stdio;
use std::sync::Arc;
use tokio::process::Command;
use tracing::debug;

/// Name of the Google Cloud CLI executable.
const GCLOUD: &str = "gcloud";

/// Arguments that print the configured default project.
pub const GCLOUD_ARGS: [&str; 3] = ["config", "get-value", "project"];

/// Runs a prepared command and returns its standard output.
///
/// A launch failure or an unsuccessful exit is reported as an error.
pub type OutputFn = Arc<dyn Fn(Command) -> BoxFuture<'static, io::Result<Vec<u8>>> + Send + Sync>;

/// Candidate `gcloud` executables, in the order they are tried.
///
/// 1. The executable found in PATH, if any
/// 2. The bare name, resolved by the OS at launch
/// 3. The default SDK install location under the home directory
pub fn common_gcloud_paths() -> Vec<PathBuf> {
    let mut paths = Vec::with_capacity(3);
    if let Ok(path) = which::which(GCLOUD) {
        paths.push(path);
    }
    paths.push(PathBuf::from(GCLOUD));
    if let Some(home) = dirs::home_dir() {
        paths.push(home.join("google-cloud-sdk").join("bin").join(GCLOUD));
    }
    paths
}

/// Reads the default project from the `gcloud` CLI configuration.
///
/// Every candidate executable is tried in turn. Failing to run one, a
/// non-zero exit or empty output all just move on to the next candidate;
/// this searcher never reports a hard error.
#[derive(Clone)]
pub struct CommandLineSearcher {
    executables: Vec<PathBuf>,
    output: OutputFn,
}

impl CommandLineSearcher {
    /// Search the [`common_gcloud_paths`].
    pub fn new() -> Self {
        Self::with_executables(common_gcloud_paths())
    }

    /// Search the given executables, in order.
    pub fn with_executables<I, P>(executables: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            executables: executables.into_iter().map(Into::into).collect(),
            output: Arc::new(|command| command_output(command).boxed()),
        }
    }

    /// Replace the function that runs each candidate command.
    pub fn with_output<F, Fut>(mut self, output: F) -> Self
    where
        F: Fn(Command) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = io::Result<Vec<u8>>> + Send + 'static,
    {
        self.output = Arc::new(move |command| output(command).boxed());
        self
    }

    /// The candidate executables, in order.
    pub fn executables(&self) -> &[PathBuf] {
        &self.executables
    }

    /// The default project reported by the first candidate that has one.
    pub async fn project_id(&self) -> Option<String> {
        for executable in &self.executables {
            let mut command = Command::new(executable);
            command
                .args(GCLOUD_ARGS)
                .stdin(Stdio::null())
                .stderr(Stdio::null())
                .kill_on_drop(true);

            let stdout = match (self.output)(command).await {
                Ok(stdout) => stdout,
                Err(e) => {
                    debug!(path = %executable.display(), "gcloud candidate failed: {}", e);
                    continue;
                }
            };

            let id = String::from_utf8_lossy(&stdout).trim().to_string();
            if !id.is_empty() {
                debug!(path = %executable.display(), "Found project ID in gcloud config");
                return Some(id);
            }
            debug!(path = %executable.display(), "gcloud has no default project");
        }
        None
    }
}

impl Default for CommandLineSearcher {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for CommandLineSearcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandLineSearcher")
            .field("executables", &self.executables)
            .finish_non_exhaustive()
    }
}

async fn command_output(mut command: Command) -> io::Result<Vec<u8>> {
    let output = command.output().await?;
    if !output.status.success() {
        return Err(io::Error::other(format!("exited with {}", output.status)));
    }
    Ok(output.stdout)
}
