//! Offline shell worker: install / activate / fetch routing.
//!
//! Two-tier policy mirroring the shell's needs: the volatile forecast
//! endpoint is network-first with the last stored copy as fallback, while
//! static shell assets are cache-first with network fallback.

use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use std::time::Duration;

use crate::store::{ShellStore, StoreError, StoredResponse};

/// Build-time base-path substitution token in shell asset paths.
pub const BASE_URL_TOKEN: &str = "%BASE_URL%";

const FORECAST_PATH: &str = "/v1/forecast";
const REQUEST_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, thiserror::Error)]
pub enum OfflineError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("HTTP {status} for {url}")]
    Status { url: String, status: u16 },
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// True when the request path indicates the volatile forecast endpoint.
pub fn is_forecast_request(request_url: &str) -> bool {
    match url::Url::parse(request_url) {
        Ok(parsed) => parsed.path().contains(FORECAST_PATH),
        Err(_) => request_url.contains(FORECAST_PATH),
    }
}

pub struct ShellWorker {
    store: ShellStore,
    client: Client,
    scope: String,
    assets: Vec<String>,
}

impl ShellWorker {
    pub fn new(store: ShellStore, scope: &str, assets: Vec<String>) -> Result<Self, OfflineError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            store,
            client,
            scope: scope.to_string(),
            assets,
        })
    }

    pub fn store(&self) -> &ShellStore {
        &self.store
    }

    /// Resolve the base-path token against the worker scope.
    pub fn resolve_base(&self, path: &str) -> String {
        path.replace(BASE_URL_TOKEN, &self.scope)
    }

    /// Pre-populate the store with the shell assets.
    pub async fn install(&self) -> Result<(), OfflineError> {
        for asset in &self.assets {
            let asset_url = self.resolve_base(asset);
            let response = self.fetch(&asset_url).await?;
            if !response.is_success() {
                return Err(OfflineError::Status {
                    url: asset_url,
                    status: response.status,
                });
            }
            self.store.put(&response)?;
        }
        tracing::info!("Installed {} shell assets into {}", self.assets.len(), self.store.name());
        Ok(())
    }

    /// Drop stores left behind by previous cache versions.
    pub fn activate(&self) -> usize {
        let removed = ShellStore::purge_stale_versions(self.store.root(), self.store.name());
        if removed > 0 {
            tracing::info!("Activated {}, removed {} stale cache(s)", self.store.name(), removed);
        }
        removed
    }

    /// Route one request through the two-tier policy.
    pub async fn handle(&self, request_url: &str) -> Result<StoredResponse, OfflineError> {
        if is_forecast_request(request_url) {
            // Network-first; the last stored copy answers when the network
            // cannot. Only successful responses are stored.
            match self.fetch(request_url).await {
                Ok(response) => {
                    if response.is_success() {
                        if let Err(e) = self.store.put(&response) {
                            tracing::warn!("Could not store forecast response: {}", e);
                        }
                    }
                    Ok(response)
                }
                Err(e) => match self.store.lookup(request_url) {
                    Some(stored) => {
                        tracing::info!("Serving stored forecast response for {}", request_url);
                        Ok(stored)
                    }
                    None => Err(e),
                },
            }
        } else {
            // Cache-first; misses go to the network and are not stored.
            match self.store.lookup(request_url) {
                Some(stored) => Ok(stored),
                None => self.fetch(request_url).await,
            }
        }
    }

    async fn fetch(&self, request_url: &str) -> Result<StoredResponse, OfflineError> {
        let response = self.client.get(request_url).send().await?;
        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(String::from);
        let body = response.bytes().await?.to_vec();

        Ok(StoredResponse {
            url: request_url.to_string(),
            status,
            content_type,
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn shell_assets() -> Vec<String> {
        vec![
            "%BASE_URL%index.html".to_string(),
            "%BASE_URL%manifest.webmanifest".to_string(),
        ]
    }

    async fn mount_assets(mock_server: &MockServer) {
        Mock::given(method("GET"))
            .and(path("/index.html"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html></html>"))
            .mount(mock_server)
            .await;
        Mock::given(method("GET"))
            .and(path("/manifest.webmanifest"))
            .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
            .mount(mock_server)
            .await;
    }

    #[test]
    fn forecast_requests_are_recognized_by_path() {
        assert!(is_forecast_request(
            "https://api.open-meteo.com/v1/forecast?latitude=-6.2349&longitude=106.9896"
        ));
        assert!(!is_forecast_request("https://example.com/index.html"));
    }

    #[tokio::test]
    async fn install_precaches_shell_assets() {
        let mock_server = MockServer::start().await;
        mount_assets(&mock_server).await;

        let dir = tempfile::tempdir().unwrap();
        let store = ShellStore::open(dir.path(), "shell-v2").unwrap();
        let scope = format!("{}/", mock_server.uri());
        let worker = ShellWorker::new(store, &scope, shell_assets()).unwrap();

        worker.install().await.unwrap();
        assert_eq!(worker.store().keys().len(), 2);
    }

    #[tokio::test]
    async fn install_fails_on_missing_asset() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/index.html"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&mock_server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let store = ShellStore::open(dir.path(), "shell-v2").unwrap();
        let scope = format!("{}/", mock_server.uri());
        let worker =
            ShellWorker::new(store, &scope, vec!["%BASE_URL%index.html".to_string()]).unwrap();

        let err = worker.install().await.unwrap_err();
        assert!(matches!(err, OfflineError::Status { status: 404, .. }));
    }

    #[tokio::test]
    async fn shell_asset_is_served_from_store_without_network() {
        let mock_server = MockServer::start().await;
        mount_assets(&mock_server).await;

        let dir = tempfile::tempdir().unwrap();
        let store = ShellStore::open(dir.path(), "shell-v2").unwrap();
        let scope = format!("{}/", mock_server.uri());
        let worker = ShellWorker::new(store, &scope, shell_assets()).unwrap();
        worker.install().await.unwrap();

        let asset_url = format!("{}/index.html", mock_server.uri());
        // Kill the network; the precached asset must still resolve.
        drop(mock_server);

        let response = worker.handle(&asset_url).await.unwrap();
        assert_eq!(response.body, b"<html></html>");
    }

    #[tokio::test]
    async fn forecast_is_network_first_and_stored() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/forecast"))
            .respond_with(ResponseTemplate::new(200).set_body_string("{\"hourly\":{}}"))
            .mount(&mock_server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let store = ShellStore::open(dir.path(), "shell-v2").unwrap();
        let worker = ShellWorker::new(store, "/", Vec::new()).unwrap();

        let forecast_url = format!("{}/v1/forecast?latitude=1&longitude=2", mock_server.uri());
        let response = worker.handle(&forecast_url).await.unwrap();
        assert!(response.is_success());
        assert_eq!(worker.store().lookup(&forecast_url).map(|r| r.body), Some(response.body));
    }

    #[tokio::test]
    async fn offline_forecast_falls_back_to_last_stored_response() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/forecast"))
            .respond_with(ResponseTemplate::new(200).set_body_string("stored-copy"))
            .mount(&mock_server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let forecast_url = format!("{}/v1/forecast?latitude=1&longitude=2", mock_server.uri());

        {
            let store = ShellStore::open(dir.path(), "shell-v2").unwrap();
            let worker = ShellWorker::new(store, "/", Vec::new()).unwrap();
            worker.handle(&forecast_url).await.unwrap();
        }

        // Network goes away; a fresh worker over the same store serves the
        // stored copy for that exact request.
        drop(mock_server);
        let store = ShellStore::open(dir.path(), "shell-v2").unwrap();
        let worker = ShellWorker::new(store, "/", Vec::new()).unwrap();

        let response = worker.handle(&forecast_url).await.unwrap();
        assert_eq!(response.body, b"stored-copy");
    }

    #[tokio::test]
    async fn offline_forecast_without_stored_copy_is_an_error() {
        let mock_server = MockServer::start().await;
        let forecast_url = format!("{}/v1/forecast?latitude=1&longitude=2", mock_server.uri());
        drop(mock_server);

        let dir = tempfile::tempdir().unwrap();
        let store = ShellStore::open(dir.path(), "shell-v2").unwrap();
        let worker = ShellWorker::new(store, "/", Vec::new()).unwrap();

        let err = worker.handle(&forecast_url).await.unwrap_err();
        assert!(matches!(err, OfflineError::Network(_)));
    }

    #[tokio::test]
    async fn non_success_forecast_passes_through_unstored() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/forecast"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&mock_server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let store = ShellStore::open(dir.path(), "shell-v2").unwrap();
        let worker = ShellWorker::new(store, "/", Vec::new()).unwrap();

        let forecast_url = format!("{}/v1/forecast?latitude=1", mock_server.uri());
        let response = worker.handle(&forecast_url).await.unwrap();
        assert_eq!(response.status, 503);
        assert!(worker.store().lookup(&forecast_url).is_none());
    }

    #[tokio::test]
    async fn activate_purges_previous_versions() {
        let dir = tempfile::tempdir().unwrap();
        ShellStore::open(dir.path(), "shell-v1").unwrap();

        let store = ShellStore::open(dir.path(), "shell-v2").unwrap();
        let worker = ShellWorker::new(store, "/", Vec::new()).unwrap();

        assert_eq!(worker.activate(), 1);
        assert!(!dir.path().join("shell-v1.sqlite").exists());
    }

    #[test]
    fn base_url_token_resolves_against_scope() {
        let dir = tempfile::tempdir().unwrap();
        let store = ShellStore::open(dir.path(), "shell-v2").unwrap();
        let worker = ShellWorker::new(store, "https://example.com/app/", Vec::new()).unwrap();

        assert_eq!(
            worker.resolve_base("%BASE_URL%index.html"),
            "https://example.com/app/index.html"
        );
        assert_eq!(worker.resolve_base("%BASE_URL%"), "https://example.com/app/");
    }
}
