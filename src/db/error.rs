use thiserror::Error;

/// Failures surfaced by [`super::HistoryStore`]. The store never retries.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum HistoryError {
    #[error("History storage unavailable: {0}")]
    StorageUnavailable(String),

    #[error("Failed to write {collection} history: {message}")]
    WriteFailed {
        collection: &'static str,
        message: String,
    },

    #[error("Failed to read {collection} history: {message}")]
    ReadFailed {
        collection: &'static str,
        message: String,
    },
}

impl HistoryError {
    pub(crate) fn write(collection: &'static str, err: &anyhow::Error) -> Self {
        Self::WriteFailed {
            collection,
            message: format!("{err:#}"),
        }
    }

    pub(crate) fn read(collection: &'static str, err: &anyhow::Error) -> Self {
        Self::ReadFailed {
            collection,
            message: format!("{err:#}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_the_whole_error_chain() {
        let err = anyhow::anyhow!("disk full").context("insert failed");
        let history_err = HistoryError::write("searches", &err);
        assert_eq!(
            history_err.to_string(),
            "Failed to write searches history: insert failed: disk full"
        );
    }

    #[test]
    fn db_errors_map_by_operation() {
        let err: anyhow::Error = sea_orm::DbErr::Custom("cursor aborted".to_string()).into();
        assert!(matches!(
            HistoryError::read("metadata", &err),
            HistoryError::ReadFailed { collection: "metadata", .. }
        ));
    }
}
