use super::collection::HistoryCollection;
use crate::entities::metadata;
use crate::models::history::{AuthorSnapshot, NewViewedMedia, ViewedMediaRecord};
use anyhow::Result;
use sea_orm::Set;

pub struct ViewedMedia;

impl HistoryCollection for ViewedMedia {
    const NAME: &'static str = "metadata";

    type Entity = metadata::Entity;
    type ActiveModel = metadata::ActiveModel;
    type Draft = NewViewedMedia;
    type Record = ViewedMediaRecord;

    fn id_column() -> metadata::Column {
        metadata::Column::Id
    }

    fn timestamp_column() -> metadata::Column {
        metadata::Column::Timestamp
    }

    fn active_model(draft: NewViewedMedia, timestamp: i64) -> Result<metadata::ActiveModel> {
        Ok(metadata::ActiveModel {
            video_id: Set(draft.video_id),
            url: Set(draft.url),
            title: Set(draft.title),
            duration: Set(draft.duration),
            thumbnail: Set(draft.thumbnail),
            author_name: Set(draft.author.name),
            timestamp: Set(timestamp),
            ..Default::default()
        })
    }

    fn record(model: metadata::Model) -> Result<ViewedMediaRecord> {
        Ok(ViewedMediaRecord {
            id: model.id,
            video_id: model.video_id,
            url: model.url,
            title: model.title,
            duration: model.duration,
            thumbnail: model.thumbnail,
            author: AuthorSnapshot {
                name: model.author_name,
            },
            timestamp: model.timestamp,
        })
    }
}
