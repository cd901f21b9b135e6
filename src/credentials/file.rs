//! Credentials JSON file parsing.

use super::{Credentials, CredentialsError, CredentialsKind, CredentialsSource};
use serde::Deserialize;
use std::path::Path;

/// The fields of a credentials file that discovery cares about.
///
/// Everything else (keys, tokens, client secrets) is ignored.
#[derive(Debug, Deserialize)]
struct CredentialsFile {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    project_id: Option<String>,
    #[serde(default)]
    quota_project_id: Option<String>,
}

/// Parse the contents of a credentials file read from `path`.
///
/// Only the file's own `project_id` becomes the project; user credentials
/// carry none and yield an empty project ID.
pub(crate) fn parse_credentials_file(
    path: &Path,
    contents: &[u8],
    scopes: Vec<String>,
) -> Result<Credentials, CredentialsError> {
    let file: CredentialsFile =
        serde_json::from_slice(contents).map_err(|source| CredentialsError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

    let kind = CredentialsKind::from_file_type(&file.kind).ok_or_else(|| CredentialsError::UnknownType {
        path: path.to_path_buf(),
        kind: file.kind.clone(),
    })?;

    Ok(Credentials {
        kind,
        project_id: file.project_id.unwrap_or_default(),
        quota_project_id: file.quota_project_id.filter(|q| !q.is_empty()),
        source: CredentialsSource::File(path.to_path_buf()),
        scopes,
    })
}
