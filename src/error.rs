//! Error types for project ID resolution.

use crate::{SearchError, SearcherKind};
use std::time::Duration;
use thiserror::Error;

/// Message returned in strict mode when no searcher finds a project ID.
pub const NOT_FOUND_MESSAGE: &str = "Google Cloud project ID not found; check your credentials \
     file, set the GCP_PROJECT environment variable or install the `gcloud` CLI and run \
     `gcloud init` to configure your project.";

/// Errors that can occur while resolving the project ID.
///
/// [`ProjectError::Search`] means a searcher found a misconfiguration part
/// way through the chain. [`ProjectError::NotFound`] means every searcher
/// ran and none had a project ID, which is only an error in strict mode.
///
/// # Example
///
/// ```rust
/// use gcp_project_id::ProjectError;
///
/// fn handle_error(error: ProjectError) {
///     eprintln!("Could not resolve project: {}", error);
///     eprintln!("To fix: {}", error.fix_suggestion());
/// }
/// ```
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProjectError {
    /// A searcher failed; later searchers were not tried.
    #[error("{searcher} searcher failed: {source}")]
    Search {
        /// The searcher that failed.
        searcher: SearcherKind,
        /// What went wrong.
        #[source]
        source: SearchError,
    },

    /// No searcher found a project ID and strict mode is on.
    #[error("{}", NOT_FOUND_MESSAGE)]
    NotFound,

    /// The chain did not finish within the configured timeout.
    #[error("project ID resolution timed out after {duration:?}")]
    Timeout {
        /// The timeout that elapsed.
        duration: Duration,
    },

    /// The runtime for a blocking call could not be started, or the
    /// blocking call was made from inside an async runtime.
    #[error("failed to start async runtime: {0}")]
    Runtime(#[source] std::io::Error),
}

impl ProjectError {
    /// Get an actionable suggestion for fixing this error.
    ///
    /// # Example
    ///
    /// ```rust
    /// use gcp_project_id::ProjectError;
    ///
    /// assert!(ProjectError::NotFound.fix_suggestion().contains("GCP_PROJECT"));
    /// ```
    pub fn fix_suggestion(&self) -> &'static str {
        match self {
            Self::Search { .. } => {
                "Check the file named by GOOGLE_APPLICATION_CREDENTIALS, or run \
                 `gcloud auth application-default login`"
            }
            Self::NotFound => {
                "Set the GCP_PROJECT environment variable or run `gcloud init`"
            }
            Self::Timeout { .. } => "Retry with a longer timeout or check network connectivity",
            Self::Runtime(_) => "Call the async API from an existing runtime instead",
        }
    }

    /// Whether this is the strict-mode "nothing found" outcome rather than
    /// a failure.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CredentialsError;

    #[test]
    fn test_not_found_display() {
        let error = ProjectError::NotFound;
        assert_eq!(error.to_string(), NOT_FOUND_MESSAGE);
        assert!(error.to_string().contains("GCP_PROJECT"));
        assert!(error.to_string().contains("gcloud init"));
        assert!(error.is_not_found());
    }

    #[test]
    fn test_search_display() {
        let error = ProjectError::Search {
            searcher: SearcherKind::Credentials,
            source: SearchError::FindCredentials(CredentialsError::NotFound),
        };
        assert!(error.to_string().starts_with("credentials searcher failed: find credentials"));
        assert!(!error.is_not_found());
    }

    #[test]
    fn test_timeout_display() {
        let error = ProjectError::Timeout {
            duration: Duration::from_secs(30),
        };
        assert!(error.to_string().contains("30s"));
    }

    #[test]
    fn test_fix_suggestion_points_at_the_cause() {
        let search = ProjectError::Search {
            searcher: SearcherKind::Credentials,
            source: SearchError::FindCredentials(CredentialsError::NotFound),
        };
        assert!(search.fix_suggestion().contains("GOOGLE_APPLICATION_CREDENTIALS"));

        assert!(ProjectError::NotFound.fix_suggestion().contains("gcloud init"));

        let timeout = ProjectError::Timeout {
            duration: Duration::from_secs(1),
        };
        assert!(timeout.fix_suggestion().contains("longer timeout"));

        let runtime = ProjectError::Runtime(std::io::Error::other("nested runtime"));
        assert!(runtime.fix_suggestion().contains("async API"));
    }
}
