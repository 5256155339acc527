use super::collection::HistoryCollection;
use crate::entities::conversions;
use crate::models::history::{ConversionRecord, NewConversion};
use anyhow::Result;
use sea_orm::Set;

pub struct Conversions;

impl HistoryCollection for Conversions {
    const NAME: &'static str = "conversions";

    type Entity = conversions::Entity;
    type ActiveModel = conversions::ActiveModel;
    type Draft = NewConversion;
    type Record = ConversionRecord;

    fn id_column() -> conversions::Column {
        conversions::Column::Id
    }

    fn timestamp_column() -> conversions::Column {
        conversions::Column::Timestamp
    }

    fn active_model(draft: NewConversion, timestamp: i64) -> Result<conversions::ActiveModel> {
        Ok(conversions::ActiveModel {
            video_id: Set(draft.video_id),
            title: Set(draft.title),
            format: Set(draft.format),
            quality: Set(draft.quality),
            timestamp: Set(timestamp),
            ..Default::default()
        })
    }

    fn record(model: conversions::Model) -> Result<ConversionRecord> {
        Ok(ConversionRecord {
            id: model.id,
            video_id: model.video_id,
            title: model.title,
            format: model.format,
            quality: model.quality,
            timestamp: model.timestamp,
        })
    }
}
