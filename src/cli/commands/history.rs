use crate::cli::{ClearTarget, HistoryKind};
use crate::db::HistoryStore;
use crate::models::media::format_duration;
use chrono::{DateTime, Local, TimeZone, Utc};

pub async fn cmd_history_list(
    store: &HistoryStore,
    kind: HistoryKind,
    limit: u64,
    json: bool,
) -> anyhow::Result<()> {
    let now = Utc::now().timestamp_millis();

    match kind {
        HistoryKind::Searches => {
            let entries = store.get_searches(limit).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&entries)?);
            } else if entries.is_empty() {
                println!("No search history.");
            } else {
                println!("Recent Searches (last {}):", entries.len());
                println!("{:-<70}", "");
                for entry in entries {
                    println!(
                        "[{}] \"{}\" - {} results | {}",
                        entry.id,
                        entry.query,
                        entry.results.len(),
                        format_age(entry.timestamp, now)
                    );
                }
            }
        }
        HistoryKind::Media => {
            let entries = store.get_metadata(limit).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&entries)?);
            } else if entries.is_empty() {
                println!("No viewed media.");
            } else {
                println!("Recently Viewed (last {}):", entries.len());
                println!("{:-<70}", "");
                for entry in entries {
                    println!(
                        "[{}] {} ({}) | {}",
                        entry.id,
                        entry.title,
                        format_duration(entry.duration),
                        format_age(entry.timestamp, now)
                    );
                    println!("    {} | {}", entry.author.name, entry.url);
                }
            }
        }
        HistoryKind::Conversions => {
            let entries = store.get_conversions(limit).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&entries)?);
            } else if entries.is_empty() {
                println!("No conversions.");
            } else {
                println!("Recent Conversions (last {}):", entries.len());
                println!("{:-<70}", "");
                for entry in entries {
                    println!(
                        "[{}] {} - {} {} | {}",
                        entry.id,
                        entry.title,
                        entry.format.to_uppercase(),
                        entry.quality,
                        format_age(entry.timestamp, now)
                    );
                }
            }
        }
    }

    Ok(())
}

pub async fn cmd_history_delete(
    store: &HistoryStore,
    kind: HistoryKind,
    id: i64,
) -> anyhow::Result<()> {
    match kind {
        HistoryKind::Searches => store.delete_search(id).await?,
        HistoryKind::Media => store.delete_metadata(id).await?,
        HistoryKind::Conversions => store.delete_conversion(id).await?,
    }

    println!("✓ Deleted entry {id}");
    Ok(())
}

pub async fn cmd_history_clear(store: &HistoryStore, target: ClearTarget) -> anyhow::Result<()> {
    match target {
        ClearTarget::Searches => store.clear_searches().await?,
        ClearTarget::Media => store.clear_metadata().await?,
        ClearTarget::Conversions => store.clear_conversions().await?,
        ClearTarget::All => store.clear_all().await?,
    }

    println!("✓ History cleared");
    Ok(())
}

pub async fn cmd_history_stats(store: &HistoryStore) -> anyhow::Result<()> {
    let counts = store.counts().await?;

    println!("Searches:    {}", counts.searches);
    println!("Viewed:      {}", counts.metadata);
    println!("Conversions: {}", counts.conversions);
    Ok(())
}

/// Short age of a history entry: "just now", "5m ago", "3h ago", "2d ago",
/// then the local date.
#[must_use]
pub fn format_age(timestamp: i64, now: i64) -> String {
    let elapsed = (now - timestamp).max(0);
    let minutes = elapsed / 60_000;
    let hours = elapsed / 3_600_000;
    let days = elapsed / 86_400_000;

    if minutes < 1 {
        "just now".to_string()
    } else if minutes < 60 {
        format!("{minutes}m ago")
    } else if hours < 24 {
        format!("{hours}h ago")
    } else if days < 7 {
        format!("{days}d ago")
    } else {
        Utc.timestamp_millis_opt(timestamp)
            .single()
            .map_or_else(
                || timestamp.to_string(),
                |t: DateTime<Utc>| t.with_timezone(&Local).format("%Y-%m-%d").to_string(),
            )
    }
}
