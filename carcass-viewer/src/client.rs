//! HTTP client for the carcass-server API
//!
//! Every request carries a bounded timeout. Failures are folded into three
//! outcomes the views care about: the record does not exist, the request
//! timed out, or the data is unavailable for any other reason.

use std::time::Duration;

use async_trait::async_trait;
use carcass_common::{CarcassRecord, ImageAvailability};
use reqwest::{StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, error};

use crate::gallery::ImageLoader;

/// Client errors
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ClientError {
    /// No record with this identifier
    #[error("Carcass not found: {0}")]
    NotFound(String),

    /// The server did not answer within the configured timeout
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    /// Network, server or decoding failure
    #[error("Data unavailable: {0}")]
    DataUnavailable(String),

    /// Client could not be constructed (bad base URL, TLS setup, ...)
    #[error("Client configuration error: {0}")]
    Config(String),
}

/// Health check response
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub timestamp: String,
}

/// carcass-server API client
#[derive(Debug, Clone)]
pub struct ApiClient {
    http_client: reqwest::Client,
    /// `http://host:port/api`; endpoints are appended as path segments
    api_url: Url,
    timeout: Duration,
}

impl ApiClient {
    /// Create a client for `api_url` (e.g. `http://127.0.0.1:5000/api`)
    pub fn new(api_url: &str, timeout: Duration) -> Result<Self, ClientError> {
        let api_url = api_url.trim_end_matches('/');
        let api_url = Url::parse(api_url)
            .map_err(|e| ClientError::Config(format!("Invalid API URL {}: {}", api_url, e)))?;
        if api_url.cannot_be_a_base() {
            return Err(ClientError::Config(format!("API URL {} cannot take a path", api_url)));
        }

        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ClientError::Config(e.to_string()))?;

        debug!("Using API URL: {}", api_url);
        Ok(Self {
            http_client,
            api_url,
            timeout,
        })
    }

    pub fn api_url(&self) -> &str {
        self.api_url.as_str()
    }

    /// GET /api/carcass
    pub async fn list_records(&self) -> Result<Vec<CarcassRecord>, ClientError> {
        self.get_json(&["carcass"]).await.map_err(|e| {
            error!("Error fetching carcass data: {}", e);
            e
        })
    }

    /// GET /api/carcass/:id
    pub async fn get_record(&self, id: &str) -> Result<CarcassRecord, ClientError> {
        match self.get_json(&["carcass", id]).await {
            Err(ClientError::NotFound(_)) => Err(ClientError::NotFound(id.to_string())),
            Err(e) => {
                error!("Error fetching carcass detail for ID {}: {}", id, e);
                Err(e)
            }
            ok => ok,
        }
    }

    /// GET /api/check-images/:id
    ///
    /// "No images" is a normal result; a 404 here means the endpoint itself
    /// is missing and is reported as unavailable data.
    pub async fn check_images(&self, id: &str) -> Result<ImageAvailability, ClientError> {
        self.get_json(&["check-images", id]).await.map_err(|e| {
            error!("Error checking images for ID {}: {}", id, e);
            match e {
                ClientError::NotFound(what) => ClientError::DataUnavailable(what),
                other => other,
            }
        })
    }

    /// GET /api/health
    pub async fn health(&self) -> Result<HealthStatus, ClientError> {
        self.get_json(&["health"]).await.map_err(|e| {
            error!("Health check failed: {}", e);
            match e {
                ClientError::NotFound(what) => ClientError::DataUnavailable(what),
                other => other,
            }
        })
    }

    /// Absolute URL of an image path such as `/images/legacy_images/7.png`
    pub fn image_url(&self, url_path: &str) -> Result<Url, ClientError> {
        self.api_url
            .join(url_path)
            .map_err(|e| ClientError::Config(format!("Invalid image path {}: {}", url_path, e)))
    }

    /// API URL with `segments` appended, each percent-encoded as one segment
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ClientError> {
        // `.` and `..` cannot be sent as literal segments; no record has such an id
        if segments.iter().any(|s| matches!(*s, "." | "..")) {
            return Err(ClientError::NotFound(segments.join("/")));
        }
        let mut url = self.api_url.clone();
        url.path_segments_mut()
            .map_err(|_| ClientError::Config(format!("API URL {} cannot take a path", self.api_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<T, ClientError> {
        let url = self.endpoint(segments)?;
        let path = url.path().to_string();
        debug!("GET {}", url);

        let response = self
            .http_client
            .get(url)
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        match response.status() {
            status if status.is_success() => {
                response.json::<T>().await.map_err(|e| self.classify(e))
            }
            StatusCode::NOT_FOUND => Err(ClientError::NotFound(path)),
            status => Err(ClientError::DataUnavailable(format!(
                "Server returned {} for {}",
                status, path
            ))),
        }
    }

    fn classify(&self, e: reqwest::Error) -> ClientError {
        if e.is_timeout() {
            ClientError::Timeout(self.timeout)
        } else {
            ClientError::DataUnavailable(e.to_string())
        }
    }
}

#[async_trait]
impl ImageLoader for ApiClient {
    async fn load(&self, url_path: &str) -> bool {
        let url = match self.image_url(url_path) {
            Ok(url) => url,
            Err(e) => {
                debug!("Image load skipped: {}", e);
                return false;
            }
        };

        match self.http_client.get(url).send().await {
            Ok(response) if response.status().is_success() => {
                // Loaded means the bytes arrived, not just the headers
                response.bytes().await.map(|b| !b.is_empty()).unwrap_or(false)
            }
            Ok(response) => {
                debug!("Image {} failed to load: {}", url_path, response.status());
                false
            }
            Err(e) => {
                debug!("Image {} failed to load: {}", url_path, e);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_url_uses_server_origin() {
        let client = ApiClient::new("http://127.0.0.1:5000/api/", Duration::from_secs(10)).unwrap();
        assert_eq!(client.api_url(), "http://127.0.0.1:5000/api");
        assert_eq!(
            client.image_url("/images/legacy_images/7.png").unwrap().as_str(),
            "http://127.0.0.1:5000/images/legacy_images/7.png"
        );
    }

    #[test]
    fn test_invalid_api_url() {
        let err = ApiClient::new("not a url", Duration::from_secs(1)).unwrap_err();
        assert!(matches!(err, ClientError::Config(_)));
    }

    #[test]
    fn test_endpoint_encodes_identifier_as_one_segment() {
        let client = ApiClient::new("http://127.0.0.1:5000/api", Duration::from_secs(10)).unwrap();
        assert_eq!(
            client.endpoint(&["carcass", "123"]).unwrap().as_str(),
            "http://127.0.0.1:5000/api/carcass/123"
        );
        assert_eq!(
            client.endpoint(&["check-images", "a/b c"]).unwrap().as_str(),
            "http://127.0.0.1:5000/api/check-images/a%2Fb%20c"
        );
        assert_eq!(
            client.endpoint(&["carcass", "50%"]).unwrap().as_str(),
            "http://127.0.0.1:5000/api/carcass/50%25"
        );
    }

    #[test]
    fn test_dot_segments_are_not_found() {
        let client = ApiClient::new("http://127.0.0.1:5000/api", Duration::from_secs(10)).unwrap();
        assert!(matches!(
            client.endpoint(&["carcass", ".."]),
            Err(ClientError::NotFound(_))
        ));
    }

    #[test]
    fn test_api_url_without_path_takes_segments() {
        let client = ApiClient::new("http://127.0.0.1:5000", Duration::from_secs(10)).unwrap();
        assert_eq!(
            client.endpoint(&["health"]).unwrap().as_str(),
            "http://127.0.0.1:5000/health"
        );
    }
}
