//! Application default credentials searcher.

use super::SearchError;
use crate::{find_default_credentials, Credentials, CredentialsError};
use futures::future::{BoxFuture, FutureExt};
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use tracing::debug;

/// A credentials discovery function: scopes in, credentials out.
pub type FindCredentialsFn =
    Arc<dyn Fn(Vec<String>) -> BoxFuture<'static, Result<Credentials, CredentialsError>> + Send + Sync>;

/// Reads the project ID from application default credentials.
///
/// A discovery failure is a hard error: it usually means a credentials file
/// is configured but broken, which is worth surfacing instead of silently
/// falling back to `gcloud`. Credentials without a project (user
/// credentials) are not an error and let the chain continue.
#[derive(Clone)]
pub struct CredentialsSearcher {
    find_credentials: FindCredentialsFn,
}

impl CredentialsSearcher {
    /// Search using [`find_default_credentials`].
    pub fn new() -> Self {
        Self::with_finder(find_default_credentials)
    }

    /// Search using a custom discovery function.
    ///
    /// # Example
    ///
    /// ```rust
    /// use gcp_project_id::{CredentialsError, CredentialsSearcher};
    ///
    /// // Never find anything
    /// let searcher = CredentialsSearcher::with_finder(|_scopes| async {
    ///     Err(CredentialsError::NotFound)
    /// });
    /// ```
    pub fn with_finder<F, Fut>(find: F) -> Self
    where
        F: Fn(Vec<String>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Credentials, CredentialsError>> + Send + 'static,
    {
        Self {
            find_credentials: Arc::new(move |scopes| find(scopes).boxed()),
        }
    }

    /// The project ID of the discovered credentials, if any.
    pub async fn project_id(&self, scopes: &[String]) -> Result<Option<String>, SearchError> {
        let credentials = (self.find_credentials)(scopes.to_vec()).await?;
        debug!(
            kind = ?credentials.kind,
            has_project = !credentials.project_id.is_empty(),
            "Found default credentials"
        );
        Ok(Some(credentials.project_id).filter(|id| !id.is_empty()))
    }
}

impl Default for CredentialsSearcher {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for CredentialsSearcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialsSearcher").finish_non_exhaustive()
    }
}
