//! Integration tests for the local history store.
//!
//! Each test runs against its own SQLite file under the system temp dir.

use sea_orm::{ConnectionTrait, Database};
use setube::db::{DEFAULT_LIMIT, HistoryError, HistoryStore, StoreState};
use setube::models::history::{AuthorSnapshot, NewConversion, NewViewedMedia};
use setube::models::media::{MediaAuthor, MediaResult};
use std::path::PathBuf;

fn temp_db_url(label: &str) -> (String, PathBuf) {
    let db_path =
        std::env::temp_dir().join(format!("setube-{label}-test-{}.db", uuid::Uuid::new_v4()));
    (format!("sqlite:{}", db_path.display()), db_path)
}

fn spawn_store() -> HistoryStore {
    let (url, _) = temp_db_url("history");
    HistoryStore::new(&url)
}

fn result(video_id: &str) -> MediaResult {
    MediaResult {
        video_id: video_id.to_string(),
        url: format!("https://example.com/watch?v={video_id}"),
        title: format!("Video {video_id}"),
        description: "A description".to_string(),
        thumbnail: format!("https://example.com/{video_id}.jpg"),
        duration: Some(212.0),
        kind: "video".to_string(),
        author: MediaAuthor {
            name: "Channel".to_string(),
            url: "https://example.com/@channel".to_string(),
        },
        extra: serde_json::Map::new(),
    }
}

fn viewed(video_id: &str, title: &str) -> NewViewedMedia {
    NewViewedMedia {
        video_id: video_id.to_string(),
        url: format!("https://example.com/watch?v={video_id}"),
        title: title.to_string(),
        duration: 93.5,
        thumbnail: format!("https://example.com/{video_id}.jpg"),
        author: AuthorSnapshot {
            name: "Author".to_string(),
        },
    }
}

fn conversion(video_id: &str, format: &str, quality: &str) -> NewConversion {
    NewConversion {
        video_id: video_id.to_string(),
        title: format!("Video {video_id}"),
        format: format.to_string(),
        quality: quality.to_string(),
    }
}

#[tokio::test]
async fn fresh_store_returns_empty_history() {
    let store = spawn_store();

    assert!(store.get_searches(DEFAULT_LIMIT).await.unwrap().is_empty());
    assert!(store.get_metadata(DEFAULT_LIMIT).await.unwrap().is_empty());
    assert!(store.get_conversions(DEFAULT_LIMIT).await.unwrap().is_empty());
}

#[tokio::test]
async fn first_operation_initializes_lazily() {
    let store = spawn_store();
    assert_eq!(store.state(), StoreState::Uninitialized);
    assert_eq!(store.open_attempts(), 0);

    store.add_search("lofi", &[result("a")]).await.unwrap();

    assert_eq!(store.state(), StoreState::Ready);
    assert_eq!(store.open_attempts(), 1);
}

#[tokio::test]
async fn concurrent_init_runs_one_schema_pass() {
    let store = spawn_store();

    let (first, second) = tokio::join!(store.init(), store.init());
    first.unwrap();
    second.unwrap();

    assert_eq!(store.state(), StoreState::Ready);
    assert_eq!(store.open_attempts(), 1);

    store.init().await.unwrap();
    assert_eq!(store.open_attempts(), 1);
}

#[tokio::test]
async fn concurrent_operations_share_initialization() {
    let store = spawn_store();
    let other = store.clone();

    let (searches, metadata, added) = tokio::join!(
        store.get_searches(10),
        other.get_metadata(10),
        store.add_conversion(conversion("v1", "mp3", "high"))
    );
    searches.unwrap();
    metadata.unwrap();
    added.unwrap();

    assert_eq!(store.open_attempts(), 1);
    assert_eq!(other.get_conversions(10).await.unwrap().len(), 1);
}

#[tokio::test]
async fn searches_come_back_newest_first() {
    let store = spawn_store();

    let mut ids = Vec::new();
    for i in 0..7 {
        let id = store
            .add_search(&format!("query {i}"), &[result(&i.to_string())])
            .await
            .unwrap();
        ids.push(id);
    }

    let three = store.get_searches(3).await.unwrap();
    assert_eq!(three.len(), 3);
    assert_eq!(three[0].query, "query 6");
    assert_eq!(three[2].query, "query 4");

    let all = store.get_searches(u64::MAX).await.unwrap();
    assert_eq!(all.len(), 7);
    assert!(all.windows(2).all(|w| w[0].timestamp > w[1].timestamp));

    let returned: Vec<i64> = all.iter().map(|r| r.id).collect();
    let mut expected = ids.clone();
    expected.reverse();
    assert_eq!(returned, expected);
}

#[tokio::test]
async fn repeated_queries_are_not_deduplicated() {
    let store = spawn_store();

    store.add_search("same", &[]).await.unwrap();
    store.add_search("same", &[result("x")]).await.unwrap();

    let searches = store.get_searches(DEFAULT_LIMIT).await.unwrap();
    assert_eq!(searches.len(), 2);
    assert!(searches.iter().all(|s| s.query == "same"));
    assert_eq!(searches[0].results, vec![result("x")]);
    assert!(searches[1].results.is_empty());
}

#[tokio::test]
async fn search_snapshot_keeps_backend_payload() {
    let store = spawn_store();

    let payload = serde_json::json!([{
        "video_id": "live1",
        "url": "https://example.com/watch?v=live1",
        "title": "Live now",
        "description": "",
        "thumbnail": "https://example.com/live1.jpg",
        "duration": null,
        "type": "video",
        "author": {"name": "Station", "url": "https://example.com/@station"},
        "views": 123,
        "chapters": [{"start": 0, "title": "Intro"}]
    }]);
    let results: Vec<MediaResult> = serde_json::from_value(payload.clone()).unwrap();

    store.add_search("live", &results).await.unwrap();

    let searches = store.get_searches(DEFAULT_LIMIT).await.unwrap();
    assert_eq!(searches[0].results, results);
    assert_eq!(serde_json::to_value(&searches[0].results).unwrap(), payload);
}

#[tokio::test]
async fn delete_removes_only_that_record() {
    let store = spawn_store();

    let first = store.add_search("first", &[]).await.unwrap();
    let second = store.add_search("second", &[]).await.unwrap();

    store.delete_search(first).await.unwrap();

    let remaining = store.get_searches(u64::MAX).await.unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].id, second);

    // Unknown ids and repeated deletes are no-ops.
    store.delete_search(first).await.unwrap();
    store.delete_search(9_999).await.unwrap();
    store.delete_metadata(9_999).await.unwrap();
    store.delete_conversion(9_999).await.unwrap();
    assert_eq!(store.get_searches(u64::MAX).await.unwrap().len(), 1);
}

#[tokio::test]
async fn clear_touches_one_collection_only() {
    let store = spawn_store();

    store.add_search("q", &[]).await.unwrap();
    store.add_metadata(viewed("abc", "T")).await.unwrap();
    store.add_metadata(viewed("abc", "T")).await.unwrap();
    store
        .add_conversion(conversion("abc", "mp4", "720"))
        .await
        .unwrap();

    store.clear_searches().await.unwrap();

    let counts = store.counts().await.unwrap();
    assert_eq!(counts.searches, 0);
    assert_eq!(counts.metadata, 2);
    assert_eq!(counts.conversions, 1);
}

#[tokio::test]
async fn clear_all_empties_every_collection() {
    let store = spawn_store();

    store.add_search("q", &[result("a")]).await.unwrap();
    store.add_metadata(viewed("a", "A")).await.unwrap();
    store
        .add_conversion(conversion("a", "mp3", "medium"))
        .await
        .unwrap();

    store.clear_all().await.unwrap();

    assert!(store.get_searches(DEFAULT_LIMIT).await.unwrap().is_empty());
    assert!(store.get_metadata(DEFAULT_LIMIT).await.unwrap().is_empty());
    assert!(store.get_conversions(DEFAULT_LIMIT).await.unwrap().is_empty());
}

#[tokio::test]
async fn metadata_round_trips_snapshot_fields() {
    let store = spawn_store();

    let draft = viewed("abc", "T");
    let id = store.add_metadata(draft.clone()).await.unwrap();

    let records = store.get_metadata(50).await.unwrap();
    assert_eq!(records.len(), 1);

    let record = &records[0];
    assert_eq!(record.id, id);
    assert!(record.timestamp > 0);
    assert_eq!(record.video_id, draft.video_id);
    assert_eq!(record.url, draft.url);
    assert_eq!(record.title, draft.title);
    assert!((record.duration - draft.duration).abs() < f64::EPSILON);
    assert_eq!(record.thumbnail, draft.thumbnail);
    assert_eq!(record.author, draft.author);
}

#[tokio::test]
async fn conversions_are_listed_by_recency() {
    let store = spawn_store();

    store
        .add_conversion(conversion("v1", "mp3", "high"))
        .await
        .unwrap();
    store
        .add_conversion(conversion("v2", "mp4", "1080"))
        .await
        .unwrap();

    let latest = store.get_conversions(1).await.unwrap();
    assert_eq!(latest.len(), 1);
    assert_eq!(latest[0].video_id, "v2");
    assert_eq!(latest[0].format, "mp4");
    assert_eq!(latest[0].quality, "1080");

    let all = store.get_conversions(50).await.unwrap();
    let video_ids: Vec<&str> = all.iter().map(|c| c.video_id.as_str()).collect();
    assert_eq!(video_ids, ["v2", "v1"]);
}

#[tokio::test]
async fn ids_are_not_reused_after_clear() {
    let store = spawn_store();

    let first = store.add_metadata(viewed("a", "A")).await.unwrap();
    store.clear_metadata().await.unwrap();
    let second = store.add_metadata(viewed("a", "A")).await.unwrap();

    assert!(second > first);
}

#[tokio::test]
async fn history_survives_reopening() {
    let (url, _) = temp_db_url("reopen");

    let store = HistoryStore::new(&url);
    store.add_search("persisted", &[result("p")]).await.unwrap();
    drop(store);

    let reopened = HistoryStore::new(&url);
    let searches = reopened.get_searches(DEFAULT_LIMIT).await.unwrap();
    assert_eq!(searches.len(), 1);
    assert_eq!(searches[0].query, "persisted");
    assert_eq!(searches[0].results, vec![result("p")]);
}

#[tokio::test]
async fn failed_open_rejects_until_reinitialized() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("blocker");
    std::fs::write(&blocker, b"not a directory").unwrap();

    let url = format!("sqlite:{}", blocker.join("history.db").display());
    let store = HistoryStore::new(&url);

    let err = store.get_searches(DEFAULT_LIMIT).await.unwrap_err();
    assert!(matches!(err, HistoryError::StorageUnavailable(_)));
    assert_eq!(store.state(), StoreState::Failed);

    let err = store.add_search("q", &[]).await.unwrap_err();
    assert!(matches!(err, HistoryError::StorageUnavailable(_)));
    assert_eq!(store.open_attempts(), 1);

    std::fs::remove_file(&blocker).unwrap();
    std::fs::create_dir(&blocker).unwrap();

    store.init().await.unwrap();
    assert_eq!(store.state(), StoreState::Ready);
    assert_eq!(store.open_attempts(), 2);
    store.add_search("q", &[]).await.unwrap();
}

#[tokio::test]
async fn corrupt_snapshot_is_a_read_failure() {
    let (url, _) = temp_db_url("corrupt");
    let store = HistoryStore::new(&url);
    store.init().await.unwrap();

    let raw = Database::connect(url.as_str()).await.unwrap();
    raw.execute_unprepared(
        "INSERT INTO searches (query, results_json, timestamp) VALUES ('broken', 'not json', 1)",
    )
    .await
    .unwrap();

    let err = store.get_searches(DEFAULT_LIMIT).await.unwrap_err();
    assert!(matches!(
        err,
        HistoryError::ReadFailed {
            collection: "searches",
            ..
        }
    ));

    // Other collections are unaffected.
    assert!(store.get_metadata(DEFAULT_LIMIT).await.unwrap().is_empty());
}

#[tokio::test]
async fn failed_insert_keeps_existing_records() {
    let (url, _) = temp_db_url("write-failure");
    let store = HistoryStore::new(&url);
    store.add_metadata(viewed("keep", "Keep")).await.unwrap();

    let raw = Database::connect(url.as_str()).await.unwrap();
    raw.execute_unprepared(
        "CREATE TRIGGER reject_metadata BEFORE INSERT ON metadata \
         BEGIN SELECT RAISE(ABORT, 'quota'); END",
    )
    .await
    .unwrap();

    let err = store.add_metadata(viewed("new", "New")).await.unwrap_err();
    match &err {
        HistoryError::WriteFailed {
            collection,
            message,
        } => {
            assert_eq!(*collection, "metadata");
            assert!(message.contains("quota"));
        }
        other => panic!("unexpected error: {other}"),
    }

    let remaining = store.get_metadata(DEFAULT_LIMIT).await.unwrap();
    let video_ids: Vec<&str> = remaining.iter().map(|m| m.video_id.as_str()).collect();
    assert_eq!(video_ids, ["keep"]);
}

#[tokio::test]
async fn failed_delete_and_clear_keep_records() {
    let (url, _) = temp_db_url("delete-failure");
    let store = HistoryStore::new(&url);
    let id = store.add_search("kept", &[result("k")]).await.unwrap();
    store
        .add_conversion(conversion("k", "mp3", "high"))
        .await
        .unwrap();

    let raw = Database::connect(url.as_str()).await.unwrap();
    raw.execute_unprepared(
        "CREATE TRIGGER protect_searches BEFORE DELETE ON searches \
         BEGIN SELECT RAISE(ABORT, 'locked'); END",
    )
    .await
    .unwrap();

    let err = store.delete_search(id).await.unwrap_err();
    assert!(matches!(
        err,
        HistoryError::WriteFailed {
            collection: "searches",
            ..
        }
    ));

    let err = store.clear_all().await.unwrap_err();
    assert!(matches!(
        err,
        HistoryError::WriteFailed {
            collection: "searches",
            ..
        }
    ));

    // The other collections are cleared regardless.
    let counts = store.counts().await.unwrap();
    assert_eq!(counts.searches, 1);
    assert_eq!(counts.conversions, 0);
}
