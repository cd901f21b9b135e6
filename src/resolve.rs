//! Project ID resolution.

use crate::options::get_options;
use crate::search::default_searchers;
use crate::{ProjectError, ResolveOptions, Searcher};
use tokio::time::timeout;
use tracing::debug;

/// Runs an ordered chain of searchers.
///
/// The first searcher to find a project ID wins. A searcher error stops the
/// chain immediately; only an empty result moves on to the next searcher.
///
/// # Example
///
/// ```rust
/// use gcp_project_id::{EnvironmentSearcher, ProjectResolver, ResolveOptions};
///
/// #[tokio::main(flavor = "current_thread")]
/// async fn main() {
///     // Only look at one variable
///     let resolver = ProjectResolver::new(vec![
///         EnvironmentSearcher::new(["MY_APP_PROJECT"]).into(),
///     ]);
///     let id = resolver.resolve(&ResolveOptions::default()).await.unwrap();
///     println!("project: {:?}", id);
/// }
/// ```
#[derive(Debug, Clone)]
pub struct ProjectResolver {
    searchers: Vec<Searcher>,
}

impl ProjectResolver {
    /// Resolve with the given searchers, in precedence order.
    ///
    /// An empty chain is allowed and never finds anything.
    pub fn new(searchers: Vec<Searcher>) -> Self {
        Self { searchers }
    }

    /// The searchers, in precedence order.
    pub fn searchers(&self) -> &[Searcher] {
        &self.searchers
    }

    /// Resolve the project ID.
    ///
    /// The whole chain shares `options.timeout`; whichever searcher is
    /// running when it elapses is cancelled.
    ///
    /// # Returns
    ///
    /// - `Ok(id)` from the first searcher that found one
    /// - `Ok("")` if none did and `options.strict` is off
    /// - `Err(ProjectError::NotFound)` if none did and `options.strict` is on
    /// - `Err(ProjectError::Search { .. })` if a searcher failed
    /// - `Err(ProjectError::Timeout { .. })` if the timeout elapsed
    pub async fn resolve(&self, options: &ResolveOptions) -> Result<String, ProjectError> {
        let found = timeout(options.timeout, self.search(&options.scopes))
            .await
            .map_err(|_| ProjectError::Timeout {
                duration: options.timeout,
            })??;

        match found {
            Some(id) => Ok(id),
            None if options.strict => Err(ProjectError::NotFound),
            None => {
                debug!("No project ID found");
                Ok(String::new())
            }
        }
    }

    async fn search(&self, scopes: &[String]) -> Result<Option<String>, ProjectError> {
        for searcher in &self.searchers {
            let kind = searcher.kind();
            debug!(searcher = %kind, "Searching for project ID");

            let found = searcher
                .project_id(scopes)
                .await
                .map_err(|source| ProjectError::Search {
                    searcher: kind,
                    source,
                })?;
            if let Some(id) = found {
                debug!(searcher = %kind, project_id = %id, "Found project ID");
                return Ok(Some(id));
            }
        }
        Ok(None)
    }
}

impl Default for ProjectResolver {
    /// The environment, credentials and `gcloud` searchers, in that order.
    fn default() -> Self {
        Self::new(default_searchers())
    }
}

/// Resolve the current Google Cloud project ID.
///
/// Searches, in order:
///
/// 1. The `GCP_PROJECT`, `GCLOUD_PROJECT` and `GOOGLE_CLOUD_PROJECT`
///    environment variables.
/// 2. Application default credentials (credentials file or metadata server).
/// 3. The default project configured in the `gcloud` CLI.
///
/// `None` uses [`ResolveOptions::default`]. Results are not cached; every
/// call searches again.
///
/// # Example
///
/// ```rust,no_run
/// use gcp_project_id::{project_id, ResolveOptions};
///
/// #[tokio::main(flavor = "current_thread")]
/// async fn main() {
///     let opts = ResolveOptions { strict: true, ..Default::default() };
///     match project_id(Some(opts)).await {
///         Ok(id) => println!("project: {id}"),
///         Err(e) => eprintln!("{e}\nTo fix: {}", e.fix_suggestion()),
///     }
/// }
/// ```
pub async fn project_id(options: Option<ResolveOptions>) -> Result<String, ProjectError> {
    let options = get_options(options);
    ProjectResolver::default().resolve(&options).await
}

/// Blocking version of [`project_id`].
///
/// Runs the resolution on a private current-thread runtime. Called from
/// within an async runtime it returns [`ProjectError::Runtime`]; use
/// [`project_id`] there.
pub fn project_id_blocking(options: Option<ResolveOptions>) -> Result<String, ProjectError> {
    if tokio::runtime::Handle::try_current().is_ok() {
        return Err(ProjectError::Runtime(std::io::Error::other(
            "project_id_blocking called from within an async runtime",
        )));
    }
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(ProjectError::Runtime)?;
    runtime.block_on(project_id(options))
}
