//! Project ID search strategies.
//!
//! Each searcher looks for a project ID in one place and reports one of
//! three outcomes:
//!
//! - `Ok(Some(id))`: found
//! - `Ok(None)`: nothing here, try the next searcher
//! - `Err(SearchError)`: misconfiguration that aborts the whole resolution
//!
//! The set of strategies is closed; [`Searcher`] enumerates them.

mod command_line;
mod credentials;
mod environment;

pub use command_line::{common_gcloud_paths, CommandLineSearcher, OutputFn, GCLOUD_ARGS};
pub use credentials::{CredentialsSearcher, FindCredentialsFn};
pub use environment::{EnvironmentSearcher, DEFAULT_ENV_KEYS};

use crate::CredentialsError;
use thiserror::Error;

/// Identifies a searcher in errors and logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, strum::EnumIter)]
#[strum(serialize_all = "kebab-case")]
pub enum SearcherKind {
    /// [`EnvironmentSearcher`]
    Environment,
    /// [`CredentialsSearcher`]
    Credentials,
    /// [`CommandLineSearcher`]
    CommandLine,
}

/// A hard failure reported by a searcher.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SearchError {
    /// Default credentials discovery failed.
    #[error("find credentials: {0}")]
    FindCredentials(#[from] CredentialsError),
}

/// One project ID search strategy.
///
/// Searchers are immutable once built and cheap to clone, so one chain can
/// serve concurrent resolutions.
#[derive(Debug, Clone)]
pub enum Searcher {
    /// Well-known environment variables.
    Environment(EnvironmentSearcher),
    /// Application default credentials.
    Credentials(CredentialsSearcher),
    /// The `gcloud` CLI configuration.
    CommandLine(CommandLineSearcher),
}

impl Searcher {
    /// Which strategy this is.
    pub fn kind(&self) -> SearcherKind {
        match self {
            Self::Environment(_) => SearcherKind::Environment,
            Self::Credentials(_) => SearcherKind::Credentials,
            Self::CommandLine(_) => SearcherKind::CommandLine,
        }
    }

    /// Look for a project ID.
    ///
    /// `scopes` is only used by credential discovery; the other strategies
    /// accept it for a uniform signature.
    pub async fn project_id(&self, scopes: &[String]) -> Result<Option<String>, SearchError> {
        match self {
            Self::Environment(s) => Ok(s.project_id()),
            Self::Credentials(s) => s.project_id(scopes).await,
            Self::CommandLine(s) => Ok(s.project_id().await),
        }
    }
}

impl From<EnvironmentSearcher> for Searcher {
    fn from(s: EnvironmentSearcher) -> Self {
        Self::Environment(s)
    }
}

impl From<CredentialsSearcher> for Searcher {
    fn from(s: CredentialsSearcher) -> Self {
        Self::Credentials(s)
    }
}

impl From<CommandLineSearcher> for Searcher {
    fn from(s: CommandLineSearcher) -> Self {
        Self::CommandLine(s)
    }
}

/// The standard search chain, in precedence order.
///
/// 1. Environment variables. Set by some runtimes (Cloud Functions) and
///    by on-premises deployments.
/// 2. Application default credentials: a credentials file in a well-known
///    location, or the metadata server when running on Google Cloud.
/// 3. The `gcloud` CLI. On a development machine this is often the only
///    source, since user-level credentials carry no project.
pub fn default_searchers() -> Vec<Searcher> {
    vec![
        EnvironmentSearcher::default().into(),
        CredentialsSearcher::new().into(),
        CommandLineSearcher::new().into(),
    ]
}
