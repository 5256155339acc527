use crate::models::media::PRESETS;
use crate::services::{MediaService, preset};

pub async fn cmd_download(
    service: &dyn MediaService,
    url: &str,
    preset_id: &str,
) -> anyhow::Result<()> {
    let preset = preset(preset_id)?;

    let info = service.open(url).await?;
    println!("Converting: {} ({})", info.title, preset.label);

    let path = service.convert(&info, preset).await?;
    println!("✓ Saved to {}", path.display());

    Ok(())
}

pub fn cmd_presets() {
    println!("{:<10} {:<14} {:<6} QUALITY", "ID", "LABEL", "KIND");
    for preset in PRESETS {
        println!(
            "{:<10} {:<14} {:<6} {}",
            preset.id, preset.label, preset.kind, preset.quality
        );
    }
}
