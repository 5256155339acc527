//! Domain service for the media flows: search, open, convert.
//!
//! Each flow talks to the remote media API first and then records the
//! outcome in the local history. Recording is best effort: a history write
//! that fails is logged and never fails the flow itself.

use crate::clients::MediaApiError;
use crate::models::media::{ConversionPreset, MediaFormat, MediaInfo, MediaResult};
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MediaError {
    #[error("Remote request failed: {0}")]
    RemoteRequestFailed(#[from] MediaApiError),

    #[error("Unknown conversion preset: {0}")]
    UnknownPreset(String),

    #[error("Failed to save download: {0}")]
    Io(#[from] std::io::Error),
}

/// Looks up a conversion preset by id.
///
/// # Errors
///
/// Returns [`MediaError::UnknownPreset`] if no preset has that id.
pub fn preset(id: &str) -> Result<&'static ConversionPreset, MediaError> {
    ConversionPreset::find(id).ok_or_else(|| MediaError::UnknownPreset(id.to_string()))
}

#[async_trait::async_trait]
pub trait MediaService: Send + Sync {
    /// Searches the backend. A blank query returns no results without a request.
    ///
    /// # Errors
    ///
    /// Returns [`MediaError::RemoteRequestFailed`] if the backend call fails.
    async fn search(&self, query: &str) -> Result<Vec<MediaResult>, MediaError>;

    /// Fetches metadata for one media URL and records it as viewed.
    ///
    /// # Errors
    ///
    /// Returns [`MediaError::RemoteRequestFailed`] if the backend call fails.
    async fn open(&self, url: &str) -> Result<MediaInfo, MediaError>;

    /// Lists the formats currently offered for a media URL.
    ///
    /// # Errors
    ///
    /// Returns [`MediaError::RemoteRequestFailed`] if the backend call fails.
    async fn formats(&self, url: &str) -> Result<Vec<MediaFormat>, MediaError>;

    /// Downloads `info` converted with `preset`, saves it and records the
    /// conversion. Returns the path of the saved file.
    ///
    /// # Errors
    ///
    /// - Returns [`MediaError::RemoteRequestFailed`] if the download fails
    /// - Returns [`MediaError::Io`] if the file cannot be written
    async fn convert(
        &self,
        info: &MediaInfo,
        preset: &ConversionPreset,
    ) -> Result<PathBuf, MediaError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_errors_convert_to_remote_failures() {
        let api_err = MediaApiError::Status {
            endpoint: "info",
            status: reqwest::StatusCode::NOT_FOUND,
        };
        let err: MediaError = api_err.into();
        assert!(matches!(err, MediaError::RemoteRequestFailed(_)));
    }

    #[test]
    fn unknown_preset_is_reported() {
        assert!(preset("mp4-720").is_ok());
        let err = preset("wav").unwrap_err();
        assert_eq!(err.to_string(), "Unknown conversion preset: wav");
    }
}
