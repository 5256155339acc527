//! HTTP + history-store implementation of [`MediaService`].

use crate::clients::MediaApiClient;
use crate::db::HistoryStore;
use crate::models::history::{NewConversion, NewViewedMedia};
use crate::models::media::{ConversionPreset, MediaFormat, MediaInfo, MediaResult};
use crate::services::media_service::{MediaError, MediaService};
use std::path::PathBuf;
use tracing::{info, warn};

pub struct HttpMediaService {
    client: MediaApiClient,
    store: HistoryStore,
    download_dir: PathBuf,
}

impl HttpMediaService {
    #[must_use]
    pub const fn new(client: MediaApiClient, store: HistoryStore, download_dir: PathBuf) -> Self {
        Self {
            client,
            store,
            download_dir,
        }
    }
}

#[async_trait::async_trait]
impl MediaService for HttpMediaService {
    async fn search(&self, query: &str) -> Result<Vec<MediaResult>, MediaError> {
        if query.trim().is_empty() {
            return Ok(vec![]);
        }

        let results = self.client.search(query).await?;

        if let Err(e) = self.store.add_search(query, &results).await {
            warn!("Failed to record search '{}': {}", query, e);
        }

        Ok(results)
    }

    async fn open(&self, url: &str) -> Result<MediaInfo, MediaError> {
        let info = self.client.info(url).await?;

        if let Err(e) = self.store.add_metadata(NewViewedMedia::from(&info)).await {
            warn!("Failed to record viewed media {}: {}", info.id, e);
        }

        Ok(info)
    }

    async fn formats(&self, url: &str) -> Result<Vec<MediaFormat>, MediaError> {
        Ok(self.client.formats(url).await?)
    }

    async fn convert(
        &self,
        info: &MediaInfo,
        preset: &ConversionPreset,
    ) -> Result<PathBuf, MediaError> {
        let payload = self.client.download(&preset.request_for(&info.url)).await?;

        tokio::fs::create_dir_all(&self.download_dir).await?;
        let path = self.download_dir.join(preset.file_name(&info.title));
        tokio::fs::write(&path, &payload).await?;

        info!(
            "Saved {} ({} bytes) to {}",
            info.title,
            payload.len(),
            path.display()
        );

        let conversion = NewConversion {
            video_id: info.id.clone(),
            title: info.title.clone(),
            format: preset.format().to_string(),
            quality: preset.quality.to_string(),
        };
        if let Err(e) = self.store.add_conversion(conversion).await {
            warn!("Failed to record conversion of {}: {}", info.id, e);
        }

        Ok(path)
    }
}
