use super::collection::HistoryCollection;
use crate::entities::searches;
use crate::models::history::{NewSearch, SearchRecord};
use anyhow::{Context, Result};
use sea_orm::Set;

pub struct Searches;

impl HistoryCollection for Searches {
    const NAME: &'static str = "searches";

    type Entity = searches::Entity;
    type ActiveModel = searches::ActiveModel;
    type Draft = NewSearch;
    type Record = SearchRecord;

    fn id_column() -> searches::Column {
        searches::Column::Id
    }

    fn timestamp_column() -> searches::Column {
        searches::Column::Timestamp
    }

    fn active_model(draft: NewSearch, timestamp: i64) -> Result<searches::ActiveModel> {
        let results_json =
            serde_json::to_string(&draft.results).context("Failed to encode search results")?;

        Ok(searches::ActiveModel {
            query: Set(draft.query),
            results_json: Set(results_json),
            timestamp: Set(timestamp),
            ..Default::default()
        })
    }

    fn record(model: searches::Model) -> Result<SearchRecord> {
        let results = serde_json::from_str(&model.results_json)
            .with_context(|| format!("Corrupt results snapshot for search {}", model.id))?;

        Ok(SearchRecord {
            id: model.id,
            query: model.query,
            results,
            timestamp: model.timestamp,
        })
    }
}
