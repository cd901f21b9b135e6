//! Environment variable searcher.

use tracing::trace;

/// Variables checked by default, in precedence order.
pub const DEFAULT_ENV_KEYS: [&str; 3] = ["GCP_PROJECT", "GCLOUD_PROJECT", "GOOGLE_CLOUD_PROJECT"];

/// Reads the project ID from environment variables.
///
/// Keys are checked in order and the first non-empty value wins, so earlier
/// keys take precedence when several are set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvironmentSearcher {
    keys: Vec<String>,
}

impl EnvironmentSearcher {
    /// Search the given variables, in order.
    pub fn new<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            keys: keys.into_iter().map(Into::into).collect(),
        }
    }

    /// The variables searched, in precedence order.
    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    /// First non-empty value among the keys. Never fails.
    pub fn project_id(&self) -> Option<String> {
        for key in &self.keys {
            match std::env::var(key) {
                Ok(id) if !id.is_empty() => {
                    trace!(key = %key, "Found project ID in environment");
                    return Some(id);
                }
                _ => trace!(key = %key, "Environment variable not set"),
            }
        }
        None
    }
}

impl Default for EnvironmentSearcher {
    fn default() -> Self {
        Self::new(DEFAULT_ENV_KEYS)
    }
}
