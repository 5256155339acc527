use crate::models::media::format_duration;
use crate::services::MediaService;

pub async fn cmd_search(service: &dyn MediaService, query: &str, json: bool) -> anyhow::Result<()> {
    let results = service.search(query).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&results)?);
        return Ok(());
    }

    if results.is_empty() {
        println!("No media found matching '{query}'");
        return Ok(());
    }

    println!("Search Results:");
    println!("{:-<60}", "");

    for (i, item) in results.iter().enumerate() {
        println!(
            "[{}] {} ({})",
            i + 1,
            item.title,
            item.duration.map_or_else(|| "live".to_string(), format_duration)
        );
        if !item.author.name.is_empty() {
            println!("    By: {}", item.author.name);
        }
        println!("    {}", item.url);
        println!();
    }

    println!("To see formats: setube info <url>");

    Ok(())
}
