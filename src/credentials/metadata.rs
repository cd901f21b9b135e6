//! GCE metadata server project lookup.

use super::CredentialsError;
use std::time::Duration;
use tracing::{debug, warn};

const PROJECT_ID_PATH: &str = "computeMetadata/v1/project/project-id";
const FLAVOR_HEADER: &str = "Metadata-Flavor";
const FLAVOR_VALUE: &str = "Google";

/// Ask the metadata server at `host` for the project ID.
///
/// Returns `Ok(None)` when no metadata server answers, meaning the process
/// is not running on Google Cloud. Once a server has identified itself, a
/// failed project lookup yields `Ok(Some(""))`: the credentials exist but
/// carry no project, so later searchers still get a chance.
pub(super) async fn project_id(
    host: &str,
    probe_timeout: Duration,
) -> Result<Option<String>, CredentialsError> {
    let client = reqwest::Client::builder()
        .timeout(probe_timeout)
        .no_proxy()
        .build()
        .map_err(|e| CredentialsError::Metadata {
            message: format!("failed to build HTTP client: {e}"),
        })?;

    let url = format!("http://{}/{}", host.trim_end_matches('/'), PROJECT_ID_PATH);
    let response = match client.get(&url).header(FLAVOR_HEADER, FLAVOR_VALUE).send().await {
        Ok(response) => response,
        Err(e) => {
            debug!(url = %url, "Metadata server not reachable: {}", e);
            return Ok(None);
        }
    };

    // Anything else listening on that address is not a metadata server.
    let is_google = response
        .headers()
        .get(FLAVOR_HEADER)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == FLAVOR_VALUE);
    if !is_google {
        warn!(url = %url, "Ignoring response without {}: {}", FLAVOR_HEADER, FLAVOR_VALUE);
        return Ok(None);
    }

    let status = response.status();
    if !status.is_success() {
        warn!(url = %url, status = %status, "Metadata server has no project ID");
        return Ok(Some(String::new()));
    }

    match response.text().await {
        Ok(body) => Ok(Some(body.trim().to_string())),
        Err(e) => {
            warn!(url = %url, "Failed to read project ID from metadata server: {}", e);
            Ok(Some(String::new()))
        }
    }
}
