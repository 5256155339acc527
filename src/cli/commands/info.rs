use crate::models::media::{MediaFormat, format_duration};
use crate::services::MediaService;

pub async fn cmd_info(service: &dyn MediaService, url: &str, json: bool) -> anyhow::Result<()> {
    let info = service.open(url).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&info)?);
        return Ok(());
    }

    println!("{}", info.title);
    println!("{:-<60}", "");
    println!("ID:       {}", info.id);
    println!("Author:   {}", info.author.name);
    println!("Duration: {}", format_duration(info.duration));
    println!("URL:      {}", info.url);

    if !info.formats.is_empty() {
        println!();
        print_formats(&info.formats);
    }

    println!();
    println!("To download: setube download \"{}\" --preset <id>", info.url);

    Ok(())
}

pub async fn cmd_formats(service: &dyn MediaService, url: &str) -> anyhow::Result<()> {
    let formats = service.formats(url).await?;

    if formats.is_empty() {
        println!("No formats available.");
        return Ok(());
    }

    print_formats(&formats);
    Ok(())
}

fn print_formats(formats: &[MediaFormat]) {
    println!("{:<12} {:<6} {:<14} {:>12}", "FORMAT", "EXT", "RESOLUTION", "SIZE");
    for format in formats {
        println!(
            "{:<12} {:<6} {:<14} {:>12}",
            format.format_id,
            format.ext,
            format.resolution.as_deref().unwrap_or("audio only"),
            format.size_str()
        );
    }
}
