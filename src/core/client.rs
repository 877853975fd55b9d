// src/core/client.rs

use crate::core::models::{CreatedScan, NewScanRequest, Scan, ScanDetail, StatsSnapshot};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, error, info, warn};
use url::Url;

/// Message shown when the service rejects a request without saying why.
pub const GENERIC_REJECTION: &str = "Unknown error";

/// Every way a call to the scanning service can fail.
#[derive(Debug, Error)]
pub enum RemoteError {
    /// The request never produced a usable HTTP response.
    #[error("transport error: {0}")]
    Transport(#[source] reqwest::Error),

    /// The response body was not the JSON shape we expected.
    #[error("malformed payload from {endpoint}: {source}")]
    Parse {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },

    /// A required field was missing; no request was issued.
    #[error("{0}")]
    Validation(String),

    /// The service answered with a non-success status.
    #[error("{message}")]
    ServerRejection { status: u16, message: String },
}

impl RemoteError {
    /// Whether this failure should leave the previous state in place and wait
    /// for the next poll tick.
    pub fn is_transient(&self) -> bool {
        matches!(self, RemoteError::Transport(_) | RemoteError::Parse { .. })
    }
}

/// Shape of the service's error body.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

/// The remote operations the dashboard depends on.
///
/// `HttpScanClient` talks to the real service; tests substitute in-memory
/// implementations.
#[async_trait]
pub trait ScanApi: Send + Sync {
    async fn fetch_stats(&self) -> Result<StatsSnapshot, RemoteError>;
    async fn fetch_scans(&self) -> Result<Vec<Scan>, RemoteError>;
    async fn fetch_scan_detail(&self, id: u64) -> Result<ScanDetail, RemoteError>;
    async fn create_scan(&self, request: &NewScanRequest) -> Result<CreatedScan, RemoteError>;
    async fn delete_scan(&self, id: u64) -> Result<(), RemoteError>;
}

/// Rejects a request locally when its target URL is blank.
pub fn validate_new_scan(request: &NewScanRequest) -> Result<(), RemoteError> {
    if request.url.trim().is_empty() {
        return Err(RemoteError::Validation("URL required".to_string()));
    }
    Ok(())
}

/// JSON-over-HTTP client for the scanning service's `/api` endpoints.
#[derive(Debug, Clone)]
pub struct HttpScanClient {
    client: Client,
    base: Url,
}

impl HttpScanClient {
    /// Builds a client for `base` (e.g. `http://localhost:5000/api`).
    ///
    /// Every request made through the client is bounded by `timeout`.
    pub fn new(base: Url, timeout: Duration) -> Result<Self, RemoteError> {
        let client = Client::builder()
            .user_agent(concat!("vulnscan-dashboard/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .map_err(RemoteError::Transport)?;

        // `Url::join` drops the last path segment unless it ends with '/'.
        let mut base = base;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        Ok(Self { client, base })
    }

    fn endpoint(&self, path: &str) -> String {
        match self.base.join(path) {
            Ok(url) => url.to_string(),
            Err(_) => format!("{}{}", self.base, path),
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, RemoteError> {
        let url = self.endpoint(path);
        debug!(url = %url, "GET");
        let response = self.client.get(&url).send().await.map_err(|e| {
            warn!(url = %url, error = %e, "Request failed.");
            RemoteError::Transport(e)
        })?;
        Self::decode(&url, response).await
    }

    /// Turns a response into `T`, or into a rejection carrying the server's
    /// message when the status is not a success.
    async fn decode<T: DeserializeOwned>(
        url: &str,
        response: reqwest::Response,
    ) -> Result<T, RemoteError> {
        let status = response.status();
        let body = response.text().await.map_err(RemoteError::Transport)?;

        if !status.is_success() {
            return Err(Self::rejection(status, &body));
        }

        serde_json::from_str(&body).map_err(|source| {
            error!(url, error = %source, "Malformed payload.");
            RemoteError::Parse { endpoint: url.to_string(), source }
        })
    }

    fn rejection(status: StatusCode, body: &str) -> RemoteError {
        let message = serde_json::from_str::<ErrorBody>(body)
            .ok()
            .and_then(|b| b.error)
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| GENERIC_REJECTION.to_string());
        warn!(status = %status, message = %message, "Service rejected request.");
        RemoteError::ServerRejection { status: status.as_u16(), message }
    }
}

#[async_trait]
impl ScanApi for HttpScanClient {
    async fn fetch_stats(&self) -> Result<StatsSnapshot, RemoteError> {
        self.get_json("stats").await
    }

    async fn fetch_scans(&self) -> Result<Vec<Scan>, RemoteError> {
        self.get_json("scans").await
    }

    async fn fetch_scan_detail(&self, id: u64) -> Result<ScanDetail, RemoteError> {
        self.get_json(&format!("scans/{id}")).await
    }

    async fn create_scan(&self, request: &NewScanRequest) -> Result<CreatedScan, RemoteError> {
        validate_new_scan(request)?;

        let url = self.endpoint("scans");
        info!(target_url = %request.url, profile = %request.profile, "Submitting new scan.");
        let response = self
            .client
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(RemoteError::Transport)?;
        let created: CreatedScan = Self::decode(&url, response).await?;
        info!(scan_id = created.scan_id, "Scan accepted.");
        Ok(created)
    }

    async fn delete_scan(&self, id: u64) -> Result<(), RemoteError> {
        let url = self.endpoint(&format!("scans/{id}"));
        let response = self
            .client
            .delete(&url)
            .send()
            .await
            .map_err(RemoteError::Transport)?;
        let _: serde_json::Value = Self::decode(&url, response).await?;
        info!(scan_id = id, "Scan deleted.");
        Ok(())
    }
}
