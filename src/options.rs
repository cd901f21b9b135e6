//! Resolution options configuration.
//!
//! This module provides the [`ResolveOptions`] struct for configuring
//! project ID resolution: the overall timeout, the OAuth scopes handed to
//! credential discovery and the strict-mode policy.

use std::time::Duration;

/// Default timeout for a whole resolution call.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Configuration options for project ID resolution.
///
/// # Default Behavior
///
/// The default timeout is 30 seconds and covers the entire searcher chain,
/// not each searcher individually. A slow credential lookup therefore leaves
/// less time for the `gcloud` fallback.
///
/// By default no scopes are requested and strict mode is off, so an
/// unresolvable project yields an empty string instead of an error.
///
/// # Example
///
/// ```rust
/// use gcp_project_id::ResolveOptions;
/// use std::time::Duration;
///
/// // Use default options (30 second timeout, not strict)
/// let opts = ResolveOptions::default();
///
/// // Fail with `ProjectError::NotFound` when nothing is found
/// let opts = ResolveOptions {
///     strict: true,
///     ..Default::default()
/// };
///
/// // Shorter budget and an explicit scope
/// let opts = ResolveOptions {
///     timeout: Duration::from_secs(5),
///     scopes: vec!["https://www.googleapis.com/auth/cloud-platform".to_string()],
///     ..Default::default()
/// };
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolveOptions {
    /// Deadline shared by every searcher in the chain.
    ///
    /// Default: 30 seconds
    pub timeout: Duration,

    /// OAuth scope URIs passed to credential discovery.
    pub scopes: Vec<String>,

    /// Return [`ProjectError::NotFound`](crate::ProjectError::NotFound) when
    /// no searcher finds a project ID.
    ///
    /// Default: `false` (an empty string is returned instead)
    pub strict: bool,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            scopes: Vec::new(),
            strict: false,
        }
    }
}

/// Pick the effective options for a call.
///
/// Only the first supplied value is used; anything after it is ignored.
/// With nothing supplied the defaults apply.
pub(crate) fn get_options<I>(opts: I) -> ResolveOptions
where
    I: IntoIterator<Item = ResolveOptions>,
{
    opts.into_iter().next().unwrap_or_default()
}
