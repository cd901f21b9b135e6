//! Integration tests for project ID resolution.
//!
//! These tests drive the public API with substituted searchers, so they
//! pass whether or not gcloud or credentials are present on the machine.

use gcp_project_id::{
    project_id_blocking, CommandLineSearcher, CredentialsError, CredentialsLocator,
    CredentialsSearcher, EnvironmentSearcher, ProjectError, ProjectResolver, ResolveOptions,
    Searcher, SearcherKind,
};
use std::io::Write;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// A credentials searcher backed by a locator that never leaves the machine.
fn file_credentials(path: Option<std::path::PathBuf>) -> Searcher {
    let locator = CredentialsLocator {
        explicit_file: path,
        well_known_file: None,
        metadata_host: None,
    };
    CredentialsSearcher::with_finder(move |scopes| {
        let locator = locator.clone();
        async move { locator.find(scopes).await }
    })
    .into()
}

/// A local stand-in for the metadata server that answers one request.
async fn metadata_server(response: &'static str) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut buf = [0u8; 4096];
        let _ = socket.read(&mut buf).await;
        socket.write_all(response.as_bytes()).await.unwrap();
        socket.shutdown().await.ok();
    });
    addr.to_string()
}

fn metadata_credentials(host: String) -> Searcher {
    let locator = CredentialsLocator {
        explicit_file: None,
        well_known_file: None,
        metadata_host: Some(host),
    };
    CredentialsSearcher::with_finder(move |scopes| {
        let locator = locator.clone();
        async move { locator.find(scopes).await }
    })
    .into()
}

fn gcloud_printing(output: &'static str, calls: &Arc<AtomicUsize>) -> Searcher {
    let calls = calls.clone();
    CommandLineSearcher::with_executables(["gcloud"])
        .with_output(move |_| {
            calls.fetch_add(1, Ordering::SeqCst);
            async move { Ok(output.as_bytes().to_vec()) }
        })
        .into()
}

#[tokio::test]
async fn test_service_account_file_wins_over_gcloud() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, r#"{{"type": "service_account", "project_id": "sa-project"}}"#).unwrap();

    let calls = Arc::new(AtomicUsize::new(0));
    let resolver = ProjectResolver::new(vec![
        EnvironmentSearcher::new(["__GCP_IT_UNSET_1__"]).into(),
        file_credentials(Some(file.path().to_path_buf())),
        gcloud_printing("gcloud-project\n", &calls),
    ]);

    let id = resolver.resolve(&ResolveOptions::default()).await.unwrap();
    assert_eq!(id, "sa-project");
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_user_credentials_fall_back_to_gcloud() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"{{"type": "authorized_user", "client_id": "id", "refresh_token": "t"}}"#
    )
    .unwrap();

    let calls = Arc::new(AtomicUsize::new(0));
    let resolver = ProjectResolver::new(vec![
        EnvironmentSearcher::new(["__GCP_IT_UNSET_2__"]).into(),
        file_credentials(Some(file.path().to_path_buf())),
        gcloud_printing("  gcloud-project\n", &calls),
    ]);

    let id = resolver.resolve(&ResolveOptions::default()).await.unwrap();
    assert_eq!(id, "gcloud-project");
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_metadata_project_wins_over_gcloud() {
    let host = metadata_server(
        "HTTP/1.1 200 OK\r\nMetadata-Flavor: Google\r\nContent-Length: 13\r\nConnection: close\r\n\r\ngce-project\r\n",
    )
    .await;

    let calls = Arc::new(AtomicUsize::new(0));
    let resolver = ProjectResolver::new(vec![
        metadata_credentials(host),
        gcloud_printing("cli-project\n", &calls),
    ]);

    let id = resolver.resolve(&ResolveOptions::default()).await.unwrap();
    assert_eq!(id, "gce-project");
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_metadata_without_project_falls_back_to_gcloud() {
    let host = metadata_server(
        "HTTP/1.1 404 Not Found\r\nMetadata-Flavor: Google\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
    )
    .await;

    let calls = Arc::new(AtomicUsize::new(0));
    let resolver = ProjectResolver::new(vec![
        EnvironmentSearcher::new(["__GCP_IT_UNSET_5__"]).into(),
        metadata_credentials(host),
        gcloud_printing("cli-project\n", &calls),
    ]);

    let id = resolver.resolve(&ResolveOptions::default()).await.unwrap();
    assert_eq!(id, "cli-project");
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_no_credentials_aborts_before_gcloud() {
    let calls = Arc::new(AtomicUsize::new(0));
    let resolver = ProjectResolver::new(vec![
        EnvironmentSearcher::new(["__GCP_IT_UNSET_3__"]).into(),
        file_credentials(None),
        gcloud_printing("gcloud-project\n", &calls),
    ]);

    let err = resolver.resolve(&ResolveOptions::default()).await.unwrap_err();
    match err {
        ProjectError::Search { searcher, ref source } => {
            assert_eq!(searcher, SearcherKind::Credentials);
            assert!(source.to_string().contains("could not find default credentials"));
        }
        other => panic!("expected Search error, got {:?}", other),
    }
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_broken_credentials_file_is_surfaced() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "not json").unwrap();

    let resolver = ProjectResolver::new(vec![file_credentials(Some(file.path().to_path_buf()))]);
    let err = resolver.resolve(&ResolveOptions::default()).await.unwrap_err();
    assert!(matches!(err, ProjectError::Search { .. }));
    assert!(std::error::Error::source(&err).is_some());
}

#[tokio::test]
async fn test_strict_mode_exhaustion() {
    let calls = Arc::new(AtomicUsize::new(0));
    let resolver = ProjectResolver::new(vec![
        EnvironmentSearcher::new(["__GCP_IT_UNSET_4__"]).into(),
        CommandLineSearcher::with_executables(["/bad/path"]).into(),
        gcloud_printing("\n", &calls),
    ]);

    let lenient = resolver.resolve(&ResolveOptions::default()).await.unwrap();
    assert_eq!(lenient, "");

    let strict = ResolveOptions {
        strict: true,
        ..Default::default()
    };
    let err = resolver.resolve(&strict).await.unwrap_err();
    assert!(err.is_not_found());
    assert!(err.to_string().contains("gcloud init"));
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_concurrent_resolutions_share_resolver() {
    std::env::set_var("__GCP_IT_SHARED__", "shared-project");
    let resolver = Arc::new(ProjectResolver::new(vec![EnvironmentSearcher::new([
        "__GCP_IT_SHARED__",
    ])
    .into()]));

    let mut handles = Vec::new();
    for _ in 0..4 {
        let resolver = resolver.clone();
        handles.push(tokio::spawn(async move {
            resolver.resolve(&ResolveOptions::default()).await
        }));
    }
    for handle in handles {
        assert_eq!(handle.await.unwrap().unwrap(), "shared-project");
    }
}

#[tokio::test]
async fn test_slow_searcher_starves_later_ones() {
    let calls = Arc::new(AtomicUsize::new(0));
    let slow: Searcher = CredentialsSearcher::with_finder(|_| async {
        tokio::time::sleep(Duration::from_secs(60)).await;
        Err(CredentialsError::NotFound)
    })
    .into();
    let resolver = ProjectResolver::new(vec![slow, gcloud_printing("late\n", &calls)]);

    let opts = ResolveOptions {
        timeout: Duration::from_millis(20),
        ..Default::default()
    };
    let err = resolver.resolve(&opts).await.unwrap_err();
    assert!(matches!(err, ProjectError::Timeout { .. }));
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[test]
fn test_blocking_resolution_from_environment() {
    // Only the first searcher runs when the variable is set.
    std::env::set_var("GCP_PROJECT", "blocking-project");
    let id = project_id_blocking(None).unwrap();
    assert_eq!(id, "blocking-project");
}
