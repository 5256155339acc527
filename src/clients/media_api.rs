use crate::config::ApiConfig;
use crate::models::media::{DownloadRequest, FormatsResponse, MediaFormat, MediaInfo, MediaResult};
use bytes::Bytes;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;
use url::Url;

/// Every variant except `InvalidUrl` is a failed remote request; the client
/// never retries.
#[derive(Debug, Error)]
pub enum MediaApiError {
    #[error("Invalid media API URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Media API {endpoint} returned {status}")]
    Status {
        endpoint: &'static str,
        status: StatusCode,
    },

    #[error("Media API request to {endpoint} failed: {source}")]
    Request {
        endpoint: &'static str,
        #[source]
        source: reqwest::Error,
    },
}

impl MediaApiError {
    #[must_use]
    pub const fn is_remote_failure(&self) -> bool {
        matches!(self, Self::Status { .. } | Self::Request { .. })
    }
}

#[derive(Clone)]
pub struct MediaApiClient {
    client: Client,
    base_url: Url,
}

impl MediaApiClient {
    /// Builds a client for the configured backend.
    ///
    /// # Errors
    /// Returns an error if the base URL does not parse or the HTTP client cannot be built.
    pub fn new(config: &ApiConfig) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to build HTTP client: {e}"))?;

        Ok(Self::with_shared_client(client, parse_base_url(&config.base_url)?))
    }

    #[must_use]
    pub const fn with_shared_client(client: Client, base_url: Url) -> Self {
        Self { client, base_url }
    }

    pub async fn search(&self, query: &str) -> Result<Vec<MediaResult>, MediaApiError> {
        let mut url = self.base_url.join("media/search")?;
        url.query_pairs_mut().append_pair("query", query);

        debug!("Searching media API for: {}", query);
        self.get_json("search", url).await
    }

    pub async fn info(&self, media_url: &str) -> Result<MediaInfo, MediaApiError> {
        let mut url = self.base_url.join("media/info")?;
        url.query_pairs_mut().append_pair("url", media_url);

        debug!("Fetching media info for: {}", media_url);
        self.get_json("info", url).await
    }

    pub async fn formats(&self, media_url: &str) -> Result<Vec<MediaFormat>, MediaApiError> {
        let mut url = self.base_url.join("media/formats")?;
        url.query_pairs_mut().append_pair("url", media_url);

        let response: FormatsResponse = self.get_json("formats", url).await?;
        Ok(response.formats)
    }

    pub async fn download(&self, request: &DownloadRequest) -> Result<Bytes, MediaApiError> {
        const ENDPOINT: &str = "download";
        let url = self.base_url.join("media/download")?;

        debug!(
            "Requesting {} ({}) for {}",
            request.format, request.quality, request.url
        );

        let response = self
            .client
            .post(url)
            .json(request)
            .send()
            .await
            .map_err(|source| MediaApiError::Request {
                endpoint: ENDPOINT,
                source,
            })?;

        check_status(ENDPOINT, response)?
            .bytes()
            .await
            .map_err(|source| MediaApiError::Request {
                endpoint: ENDPOINT,
                source,
            })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &'static str,
        url: Url,
    ) -> Result<T, MediaApiError> {
        let response = self
            .client
            .get(url)
            .header(CONTENT_TYPE, "application/json")
            .send()
            .await
            .map_err(|source| MediaApiError::Request { endpoint, source })?;

        check_status(endpoint, response)?
            .json()
            .await
            .map_err(|source| MediaApiError::Request { endpoint, source })
    }
}

fn check_status(endpoint: &'static str, response: Response) -> Result<Response, MediaApiError> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(MediaApiError::Status { endpoint, status })
    }
}

/// Endpoints are joined relative to the base, so it must end with a slash.
pub fn parse_base_url(base_url: &str) -> Result<Url, url::ParseError> {
    let trimmed = base_url.trim();
    if trimmed.ends_with('/') {
        Url::parse(trimmed)
    } else {
        Url::parse(&format!("{trimmed}/"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_keeps_path_prefix() {
        let base = parse_base_url("http://localhost:4000/api").unwrap();
        assert_eq!(
            base.join("media/search").unwrap().as_str(),
            "http://localhost:4000/api/media/search"
        );

        let root = parse_base_url("http://localhost:4000").unwrap();
        assert_eq!(
            root.join("media/info").unwrap().as_str(),
            "http://localhost:4000/media/info"
        );
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        assert!(parse_base_url("not a url").is_err());
    }

    #[test]
    fn only_remote_errors_count_as_request_failures() {
        let err = MediaApiError::Status {
            endpoint: "search",
            status: StatusCode::BAD_GATEWAY,
        };
        assert!(err.is_remote_failure());
        assert_eq!(err.to_string(), "Media API search returned 502 Bad Gateway");

        let err: MediaApiError = Url::parse("::").unwrap_err().into();
        assert!(!err.is_remote_failure());
    }
}
