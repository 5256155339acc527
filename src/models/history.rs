//! Records kept by the history store and the drafts callers submit.
//!
//! Drafts carry only the snapshot fields; `id` and `timestamp` are always
//! assigned by the store.

use super::media::{MediaInfo, MediaResult};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRecord {
    pub id: i64,
    pub query: String,
    pub results: Vec<MediaResult>,
    pub timestamp: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct AuthorSnapshot {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewedMediaRecord {
    pub id: i64,
    pub video_id: String,
    pub url: String,
    pub title: String,
    pub duration: f64,
    pub thumbnail: String,
    pub author: AuthorSnapshot,
    pub timestamp: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversionRecord {
    pub id: i64,
    pub video_id: String,
    pub title: String,
    pub format: String,
    pub quality: String,
    pub timestamp: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewSearch {
    pub query: String,
    pub results: Vec<MediaResult>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewViewedMedia {
    pub video_id: String,
    pub url: String,
    pub title: String,
    pub duration: f64,
    pub thumbnail: String,
    pub author: AuthorSnapshot,
}

impl From<&MediaInfo> for NewViewedMedia {
    fn from(info: &MediaInfo) -> Self {
        Self {
            video_id: info.id.clone(),
            url: info.url.clone(),
            title: info.title.clone(),
            duration: info.duration,
            thumbnail: info.thumbnail.clone(),
            author: AuthorSnapshot {
                name: info.author.name.clone(),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewConversion {
    pub video_id: String,
    pub title: String,
    pub format: String,
    pub quality: String,
}
