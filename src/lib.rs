//! # gcp-project-id
//!
//! Resolve the current Google Cloud project ID, on a development machine or
//! inside Google Cloud, without knowing in advance which one it is.
//!
//! Resolution tries a fixed chain of searchers and returns the first project
//! ID found:
//!
//! 1. `GCP_PROJECT`, `GCLOUD_PROJECT`, `GOOGLE_CLOUD_PROJECT`
//! 2. Application default credentials (credentials file or metadata server)
//! 3. `gcloud config get-value project`
//!
//! ## Features
//!
//! - `project_id()` async function resolving with the default chain
//! - `project_id_blocking()` for synchronous callers
//! - `ProjectResolver` for custom searcher chains
//! - `ProjectError` separating a broken configuration (`Search`) from an
//!   empty search in strict mode (`NotFound`)
//!
//! ## Example
//!
//! ```rust,no_run
//! use gcp_project_id::{project_id, ResolveOptions};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     // Empty string if nothing is configured
//!     let id = project_id(None).await.unwrap();
//!     println!("project: {:?}", id);
//!
//!     // Error if nothing is configured
//!     let strict = ResolveOptions { strict: true, ..Default::default() };
//!     if let Err(e) = project_id(Some(strict)).await {
//!         eprintln!("{e}");
//!     }
//! }
//! ```

mod credentials;
mod error;
mod options;
mod resolve;
mod search;

pub use credentials::{
    find_default_credentials, Credentials, CredentialsError, CredentialsKind, CredentialsLocator,
    CredentialsSource,
};
pub use error::{ProjectError, NOT_FOUND_MESSAGE};
pub use options::{ResolveOptions, DEFAULT_TIMEOUT};
pub use resolve::{project_id, project_id_blocking, ProjectResolver};
pub use search::{
    common_gcloud_paths, default_searchers, CommandLineSearcher, CredentialsSearcher,
    EnvironmentSearcher, FindCredentialsFn, OutputFn, SearchError, Searcher, SearcherKind,
    DEFAULT_ENV_KEYS, GCLOUD_ARGS,
};
