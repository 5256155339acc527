use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct MediaAuthor {
    pub name: String,

    #[serde(default)]
    pub url: String,
}

/// One entry of a `/media/search` response.
///
/// Keys this type does not name are kept in `extra`, so a stored snapshot
/// re-encodes to what the backend sent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaResult {
    pub video_id: String,

    pub url: String,

    pub title: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub thumbnail: String,

    /// Seconds. `None` for live streams.
    #[serde(default)]
    pub duration: Option<f64>,

    #[serde(rename = "type", default, deserialize_with = "null_as_default")]
    pub kind: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub author: MediaAuthor,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaFormat {
    pub format_id: String,

    #[serde(default)]
    pub ext: String,

    #[serde(default)]
    pub resolution: Option<String>,

    #[serde(default)]
    pub filesize: Option<i64>,
}

impl MediaFormat {
    #[must_use]
    pub fn is_audio_only(&self) -> bool {
        self.resolution
            .as_deref()
            .is_none_or(|r| r.eq_ignore_ascii_case("audio only"))
    }

    #[must_use]
    pub fn size_str(&self) -> String {
        self.filesize.map_or_else(|| "?".to_string(), format_size)
    }
}

/// Response of `/media/info`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaInfo {
    pub id: String,

    pub url: String,

    pub title: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub duration: f64,

    #[serde(default, deserialize_with = "null_as_default")]
    pub thumbnail: String,

    #[serde(default, deserialize_with = "null_as_default")]
    pub author: MediaAuthor,

    #[serde(default)]
    pub formats: Vec<MediaFormat>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Deserialize)]
pub(crate) struct FormatsResponse {
    #[serde(default)]
    pub formats: Vec<MediaFormat>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DownloadRequest {
    pub url: String,
    pub format: String,
    pub quality: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Audio,
    Video,
}

impl MediaKind {
    /// Container requested from the backend.
    #[must_use]
    pub const fn format(self) -> &'static str {
        match self {
            Self::Audio => "mp3",
            Self::Video => "mp4",
        }
    }

    /// Extension of the saved file. The backend delivers audio as an m4a stream.
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Audio => "m4a",
            Self::Video => "mp4",
        }
    }
}

impl std::fmt::Display for MediaKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Audio => write!(f, "audio"),
            Self::Video => write!(f, "video"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConversionPreset {
    pub id: &'static str,
    pub label: &'static str,
    pub kind: MediaKind,
    pub quality: &'static str,
}

pub const PRESETS: &[ConversionPreset] = &[
    ConversionPreset {
        id: "mp3-320",
        label: "MP3 Maestro",
        kind: MediaKind::Audio,
        quality: "high",
    },
    ConversionPreset {
        id: "mp3-128",
        label: "MP3 Standard",
        kind: MediaKind::Audio,
        quality: "medium",
    },
    ConversionPreset {
        id: "mp4-1080",
        label: "Video Ultra",
        kind: MediaKind::Video,
        quality: "1080",
    },
    ConversionPreset {
        id: "mp4-720",
        label: "Video HD",
        kind: MediaKind::Video,
        quality: "720",
    },
];

impl ConversionPreset {
    #[must_use]
    pub fn find(id: &str) -> Option<&'static Self> {
        PRESETS.iter().find(|p| p.id.eq_ignore_ascii_case(id))
    }

    #[must_use]
    pub const fn format(&self) -> &'static str {
        self.kind.format()
    }

    #[must_use]
    pub fn request_for(&self, url: &str) -> DownloadRequest {
        DownloadRequest {
            url: url.to_string(),
            format: self.format().to_string(),
            quality: self.quality.to_string(),
        }
    }

    #[must_use]
    pub fn file_name(&self, title: &str) -> String {
        format!("{}.{}", sanitize_filename(title), self.kind.extension())
    }
}

#[must_use]
pub fn sanitize_filename(name: &str) -> String {
    let cleaned = name
        .replace(['/', '\\', ':', '*', '?', '"', '<', '>', '|'], " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");

    if cleaned.is_empty() {
        "download".to_string()
    } else {
        cleaned
    }
}

#[must_use]
pub fn format_size(bytes: i64) -> String {
    const KB: i64 = 1024;
    const MB: i64 = KB * 1024;
    const GB: i64 = MB * 1024;

    #[allow(clippy::cast_precision_loss)]
    if bytes >= GB {
        format!("{:.2} GiB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MiB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KiB", bytes as f64 / KB as f64)
    } else {
        format!("{bytes} B")
    }
}

#[must_use]
pub fn format_duration(seconds: f64) -> String {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let total = seconds.max(0.0).round() as u64;
    let (h, m, s) = (total / 3600, (total % 3600) / 60, total % 60);
    if h > 0 {
        format!("{h}:{m:02}:{s:02}")
    } else {
        format!("{m}:{s:02}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preset_lookup() {
        let preset = ConversionPreset::find("mp3-320").unwrap();
        assert_eq!(preset.kind, MediaKind::Audio);
        assert_eq!(preset.format(), "mp3");
        assert_eq!(preset.quality, "high");

        assert!(ConversionPreset::find("MP4-720").is_some());
        assert!(ConversionPreset::find("flac").is_none());
    }

    #[test]
    fn test_preset_file_name() {
        let audio = ConversionPreset::find("mp3-128").unwrap();
        assert_eq!(audio.file_name("Song: Live"), "Song Live.m4a");

        let video = ConversionPreset::find("mp4-1080").unwrap();
        assert_eq!(video.file_name("a/b"), "a b.mp4");
        assert_eq!(video.file_name("???"), "download.mp4");
    }

    #[test]
    fn test_download_request_body() {
        let preset = ConversionPreset::find("mp4-720").unwrap();
        let body = serde_json::to_value(preset.request_for("https://x/y")).unwrap();
        assert_eq!(
            body,
            serde_json::json!({"url": "https://x/y", "format": "mp4", "quality": "720"})
        );
    }

    #[test]
    fn test_search_result_deserialization() {
        let json = r#"{
            "video_id": "abc",
            "url": "https://example.com/watch?v=abc",
            "title": "Title",
            "description": "",
            "thumbnail": "https://example.com/t.jpg",
            "duration": 212,
            "type": "video",
            "author": {"name": "Someone", "url": "https://example.com/@someone"}
        }"#;

        let result: MediaResult = serde_json::from_str(json).unwrap();
        assert_eq!(result.video_id, "abc");
        assert_eq!(result.kind, "video");
        assert_eq!(result.duration, Some(212.0));
        assert_eq!(result.author.name, "Someone");
        assert!(result.extra.is_empty());
    }

    #[test]
    fn test_search_result_keeps_unknown_keys_and_null_duration() {
        let json = serde_json::json!({
            "video_id": "live1",
            "url": "https://example.com/watch?v=live1",
            "title": "Live now",
            "description": null,
            "thumbnail": "https://example.com/live1.jpg",
            "duration": null,
            "type": "video",
            "author": {"name": "Station", "url": "https://example.com/@station"},
            "views": 123,
            "badges": ["LIVE"]
        });

        let result: MediaResult = serde_json::from_value(json.clone()).unwrap();
        assert_eq!(result.duration, None);
        assert_eq!(result.description, "");
        assert_eq!(result.extra["views"], 123);

        let encoded = serde_json::to_value(&result).unwrap();
        assert_eq!(encoded["views"], json["views"]);
        assert_eq!(encoded["badges"], json["badges"]);
        assert!(encoded["duration"].is_null());
    }

    #[test]
    fn test_media_info_null_duration() {
        let info: MediaInfo = serde_json::from_value(serde_json::json!({
            "id": "live1",
            "url": "https://example.com/watch?v=live1",
            "title": "Live now",
            "duration": null
        }))
        .unwrap();
        assert!(info.duration.abs() < f64::EPSILON);
        assert!(info.formats.is_empty());
    }

    #[test]
    fn test_format_helpers() {
        let audio = MediaFormat {
            format_id: "140".to_string(),
            ext: "m4a".to_string(),
            resolution: Some("audio only".to_string()),
            filesize: Some(3_145_728),
        };
        assert!(audio.is_audio_only());
        assert_eq!(audio.size_str(), "3.00 MiB");

        assert_eq!(format_size(500), "500 B");
        assert_eq!(format_duration(65.0), "1:05");
        assert_eq!(format_duration(3725.4), "1:02:05");
    }
}
