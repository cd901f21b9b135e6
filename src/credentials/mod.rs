//! Application default credentials discovery.
//!
//! This module locates the credentials a Google Cloud client library would
//! pick up by default and exposes the project they are bound to. It provides:
//!
//! - `Credentials`: the discovered credentials and their project ID
//! - `find_default_credentials`: the standard lookup order
//! - `CredentialsLocator`: the same lookup with explicit inputs
//!
//! # Lookup Order
//!
//! 1. The file named by `GOOGLE_APPLICATION_CREDENTIALS`
//! 2. The well-known file written by `gcloud auth application-default login`
//! 3. The GCE metadata server

mod file;
mod metadata;

use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

use file::parse_credentials_file;

/// Environment variable pointing at an explicit credentials file.
const CREDENTIALS_ENV: &str = "GOOGLE_APPLICATION_CREDENTIALS";

/// Environment variable overriding the gcloud configuration directory.
const CLOUDSDK_CONFIG_ENV: &str = "CLOUDSDK_CONFIG";

/// Environment variable overriding the metadata server host.
const METADATA_HOST_ENV: &str = "GCE_METADATA_HOST";

/// Metadata server address used when no override is set.
const DEFAULT_METADATA_HOST: &str = "169.254.169.254";

/// Time allowed for the metadata server to answer before assuming we are
/// not running on Google Cloud.
const METADATA_PROBE_TIMEOUT: Duration = Duration::from_secs(3);

const WELL_KNOWN_FILE: &str = "application_default_credentials.json";

/// The type of a credentials file, from its `type` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CredentialsKind {
    /// A service account key file.
    ServiceAccount,
    /// End-user credentials from `gcloud auth application-default login`.
    AuthorizedUser,
    /// Workload identity federation.
    ExternalAccount,
    /// Workforce identity federation with a user refresh token.
    ExternalAccountAuthorizedUser,
    /// Service account impersonation.
    ImpersonatedServiceAccount,
    /// Google Distributed Cloud Hosted service account.
    GdchServiceAccount,
    /// Credentials served by the GCE metadata server.
    ComputeMetadata,
}

impl CredentialsKind {
    /// Map a credentials file `type` value to its kind.
    ///
    /// Returns `None` for unsupported types. `ComputeMetadata` has no file
    /// form and is never returned.
    pub fn from_file_type(value: &str) -> Option<Self> {
        match value {
            "service_account" => Some(Self::ServiceAccount),
            "authorized_user" => Some(Self::AuthorizedUser),
            "external_account" => Some(Self::ExternalAccount),
            "external_account_authorized_user" => Some(Self::ExternalAccountAuthorizedUser),
            "impersonated_service_account" => Some(Self::ImpersonatedServiceAccount),
            "gdch_service_account" => Some(Self::GdchServiceAccount),
            _ => None,
        }
    }
}

/// Where credentials were found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialsSource {
    /// A JSON credentials file.
    File(PathBuf),
    /// The metadata server at the given host.
    MetadataServer(String),
}

/// Discovered default credentials.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    /// The credentials type.
    pub kind: CredentialsKind,

    /// The project the credentials belong to.
    ///
    /// Empty for credentials without an associated project, such as
    /// user-level credentials.
    pub project_id: String,

    /// Project billed for quota, if the file declares one.
    ///
    /// This is never used as the project ID.
    pub quota_project_id: Option<String>,

    /// Where the credentials were loaded from.
    pub source: CredentialsSource,

    /// OAuth scopes requested for these credentials.
    pub scopes: Vec<String>,
}

/// Errors that can occur while discovering default credentials.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CredentialsError {
    /// A credentials file exists (or was named explicitly) but could not be read.
    #[error("failed to read credentials file {path}: {source}")]
    Read {
        /// The file that could not be read.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A credentials file is not valid JSON or misses required fields.
    #[error("failed to parse credentials file {path}: {source}")]
    Parse {
        /// The malformed file.
        path: PathBuf,
        /// The underlying JSON error.
        #[source]
        source: serde_json::Error,
    },

    /// A credentials file declares an unsupported `type`.
    #[error("unknown credentials type {kind:?} in {path}")]
    UnknownType {
        /// The file with the unsupported type.
        path: PathBuf,
        /// The value of its `type` field.
        kind: String,
    },

    /// The metadata server could not be queried.
    #[error("metadata server error: {message}")]
    Metadata {
        /// Description of the failure.
        message: String,
    },

    /// No credentials source is available.
    #[error(
        "could not find default credentials; see \
         https://cloud.google.com/docs/authentication/external/set-up-adc for more information"
    )]
    NotFound,
}

/// Find application default credentials using the process environment.
///
/// This is the discovery function used by
/// [`CredentialsSearcher::new`](crate::CredentialsSearcher::new).
///
/// # Errors
///
/// Any failure is returned as a [`CredentialsError`]; in particular
/// [`CredentialsError::NotFound`] when no source is available at all.
///
/// # Example
///
/// ```rust,no_run
/// use gcp_project_id::find_default_credentials;
///
/// #[tokio::main(flavor = "current_thread")]
/// async fn main() {
///     match find_default_credentials(Vec::new()).await {
///         Ok(creds) => println!("{:?} project={:?}", creds.kind, creds.project_id),
///         Err(e) => eprintln!("{e}"),
///     }
/// }
/// ```
pub async fn find_default_credentials(scopes: Vec<String>) -> Result<Credentials, CredentialsError> {
    CredentialsLocator::from_env().find(scopes).await
}

/// The inputs of default credentials discovery.
///
/// [`CredentialsLocator::from_env`] fills these from the environment;
/// building one by hand allows discovery against other files or hosts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialsLocator {
    /// Explicit credentials file. Must exist when set.
    pub explicit_file: Option<PathBuf>,

    /// Well-known credentials file. Skipped when missing.
    pub well_known_file: Option<PathBuf>,

    /// Metadata server host (and optional port). `None` skips the probe.
    pub metadata_host: Option<String>,
}

impl CredentialsLocator {
    /// Build a locator from the process environment.
    pub fn from_env() -> Self {
        let explicit_file = non_empty_var(CREDENTIALS_ENV).map(PathBuf::from);
        let metadata_host =
            non_empty_var(METADATA_HOST_ENV).unwrap_or_else(|| DEFAULT_METADATA_HOST.to_string());

        Self {
            explicit_file,
            well_known_file: well_known_file(),
            metadata_host: Some(metadata_host),
        }
    }

    /// Run discovery in order: explicit file, well-known file, metadata server.
    pub async fn find(&self, scopes: Vec<String>) -> Result<Credentials, CredentialsError> {
        if let Some(path) = &self.explicit_file {
            debug!(path = %path.display(), "Loading credentials from {}", CREDENTIALS_ENV);
            return load_file(path, scopes).await;
        }

        if let Some(path) = &self.well_known_file {
            if tokio::fs::try_exists(path).await.unwrap_or(false) {
                debug!(path = %path.display(), "Loading well-known credentials file");
                return load_file(path, scopes).await;
            }
        }

        if let Some(host) = &self.metadata_host {
            if let Some(project_id) = metadata::project_id(host, METADATA_PROBE_TIMEOUT).await? {
                debug!(host = %host, "Using metadata server credentials");
                return Ok(Credentials {
                    kind: CredentialsKind::ComputeMetadata,
                    project_id,
                    quota_project_id: None,
                    source: CredentialsSource::MetadataServer(host.clone()),
                    scopes,
                });
            }
        }

        Err(CredentialsError::NotFound)
    }
}

async fn load_file(path: &Path, scopes: Vec<String>) -> Result<Credentials, CredentialsError> {
    let contents = tokio::fs::read(path).await.map_err(|source| CredentialsError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_credentials_file(path, &contents, scopes)
}

/// Location of the file written by `gcloud auth application-default login`.
fn well_known_file() -> Option<PathBuf> {
    if let Some(dir) = non_empty_var(CLOUDSDK_CONFIG_ENV) {
        return Some(PathBuf::from(dir).join(WELL_KNOWN_FILE));
    }
    gcloud_config_dir().map(|dir| dir.join(WELL_KNOWN_FILE))
}

#[cfg(windows)]
fn gcloud_config_dir() -> Option<PathBuf> {
    // %APPDATA%
    dirs::config_dir().map(|dir| dir.join("gcloud"))
}

#[cfg(not(windows))]
fn gcloud_config_dir() -> Option<PathBuf> {
    // gcloud uses ~/.config on every Unix, macOS included.
    dirs::home_dir().map(|home| home.join(".config").join("gcloud"))
}

fn non_empty_var(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}
