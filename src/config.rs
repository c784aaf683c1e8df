use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::warn;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageType {
    Greeting,
    Quote,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeDisplay {
    None,
    Time,
    Date,
    Both,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageSource {
    Picsum,
    #[serde(rename = "CustomURL")]
    CustomUrl,
}

/// Per-generation settings, loaded once and read-only afterwards.
///
/// Every field carries a default so a partial or empty document loads
/// cleanly; unknown keys in the file are ignored.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct WallpaperConfig {
    #[serde(default = "default_show_message")]
    pub show_message: bool,

    #[serde(default = "default_message_type")]
    pub message_type: MessageType,

    #[serde(default = "default_time_display")]
    pub time_display: TimeDisplay,

    #[serde(default = "default_show_weather")]
    pub show_weather: bool,

    #[serde(default = "default_weather_location")]
    pub weather_location: String,

    #[serde(default = "default_image_source")]
    pub image_source: ImageSource,

    /// Only consulted when `image_source` is `CustomURL`.
    #[serde(default)]
    pub custom_url: String,

    #[serde(default = "default_overlay_enabled")]
    pub overlay_enabled: bool,

    /// Hex color like "#000000"; unparsable values render as black.
    #[serde(default = "default_overlay_color")]
    pub overlay_color: String,

    /// Overlay alpha, 0 (invisible) to 255 (opaque).
    #[serde(default = "default_overlay_opacity")]
    pub overlay_opacity: u8,

    /// Optional URL of a TTF to download per generation.
    #[serde(default)]
    pub google_font_url: String,

    #[serde(default = "default_font_size_message")]
    pub font_size_message: u32,

    #[serde(default = "default_font_size_weather")]
    pub font_size_weather: u32,

    #[serde(default = "default_font_size_time")]
    pub font_size_time: u32,
}

fn default_show_message() -> bool {
    true
}
fn default_message_type() -> MessageType {
    MessageType::Greeting
}
fn default_time_display() -> TimeDisplay {
    TimeDisplay::Time
}
fn default_show_weather() -> bool {
    true
}
fn default_weather_location() -> String {
    "Phoenix,AZ".to_string()
}
fn default_image_source() -> ImageSource {
    ImageSource::Picsum
}
fn default_overlay_enabled() -> bool {
    true
}
fn default_overlay_color() -> String {
    "#000000".to_string()
}
fn default_overlay_opacity() -> u8 {
    80
}
fn default_font_size_message() -> u32 {
    80
}
fn default_font_size_weather() -> u32 {
    60
}
fn default_font_size_time() -> u32 {
    80
}

impl Default for WallpaperConfig {
    fn default() -> Self {
        Self {
            show_message: default_show_message(),
            message_type: default_message_type(),
            time_display: default_time_display(),
            show_weather: default_show_weather(),
            weather_location: default_weather_location(),
            image_source: default_image_source(),
            custom_url: String::new(),
            overlay_enabled: default_overlay_enabled(),
            overlay_color: default_overlay_color(),
            overlay_opacity: default_overlay_opacity(),
            google_font_url: String::new(),
            font_size_message: default_font_size_message(),
            font_size_weather: default_font_size_weather(),
            font_size_time: default_font_size_time(),
        }
    }
}

impl WallpaperConfig {
    /// Default location of the configuration document.
    pub fn config_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("com", "wallforge", "wallforge")
            .ok_or_else(|| anyhow!("could not resolve a home directory"))?;
        Ok(dirs.config_dir().join("config.json"))
    }

    /// Load the configuration from `path`.
    ///
    /// Missing keys are backfilled with defaults. An absent file is created
    /// with defaults; a malformed or unreadable file falls back to defaults
    /// in memory. Only the wallpaper artifact write is allowed to fail a
    /// generation, so none of these paths return an error.
    pub fn load(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(raw) => match serde_json::from_str::<Self>(&raw) {
                Ok(config) => config.clamped(),
                Err(err) => {
                    warn!(path = %path.display(), %err, "config file is malformed, using defaults");
                    Self::default()
                }
            },
            Err(err) if err.kind() == ErrorKind::NotFound => {
                let config = Self::default();
                if let Err(err) = config.store(path) {
                    warn!(path = %path.display(), %err, "could not create config file");
                }
                config
            }
            Err(err) => {
                warn!(path = %path.display(), %err, "could not read config file, using defaults");
                Self::default()
            }
        }
    }

    /// Write the configuration as pretty-printed JSON, creating parent
    /// directories as needed.
    pub fn store(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating config directory {}", parent.display()))?;
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json).with_context(|| format!("writing config to {}", path.display()))
    }

    // A zero font size would make every fitting step degenerate.
    fn clamped(mut self) -> Self {
        for size in [
            &mut self.font_size_message,
            &mut self.font_size_weather,
            &mut self.font_size_time,
        ] {
            if *size == 0 {
                warn!("font size of 0 in config, clamping to 1");
                *size = 1;
            }
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_documented_values() {
        let config = WallpaperConfig::default();
        assert!(config.show_message);
        assert_eq!(config.message_type, MessageType::Greeting);
        assert_eq!(config.time_display, TimeDisplay::Time);
        assert!(config.show_weather);
        assert_eq!(config.weather_location, "Phoenix,AZ");
        assert_eq!(config.image_source, ImageSource::Picsum);
        assert!(config.overlay_enabled);
        assert_eq!(config.overlay_color, "#000000");
        assert_eq!(config.overlay_opacity, 80);
        assert_eq!(config.font_size_message, 80);
        assert_eq!(config.font_size_weather, 60);
        assert_eq!(config.font_size_time, 80);
    }

    #[test]
    fn test_missing_key_backfilled_others_preserved() {
        let raw = r##"{
            "show_message": false,
            "message_type": "Quote",
            "time_display": "Both",
            "show_weather": false,
            "weather_location": "Reykjavik",
            "image_source": "CustomURL",
            "custom_url": "https://example.com/bg.jpg",
            "overlay_enabled": false,
            "overlay_color": "#112233",
            "overlay_opacity": 40,
            "google_font_url": "",
            "font_size_message": 90,
            "font_size_weather": 55
        }"##;
        let config: WallpaperConfig = serde_json::from_str(raw).unwrap();
        assert_eq!(config.font_size_time, 80);
        assert_eq!(config.weather_location, "Reykjavik");
        assert_eq!(config.image_source, ImageSource::CustomUrl);
        assert_eq!(config.custom_url, "https://example.com/bg.jpg");
        assert_eq!(config.font_size_message, 90);
        assert_eq!(config.font_size_weather, 55);
    }

    #[test]
    fn test_empty_document_loads_all_defaults() {
        let config: WallpaperConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.overlay_opacity, 80);
        assert_eq!(config.time_display, TimeDisplay::Time);
        assert!(config.custom_url.is_empty());
    }

    #[test]
    fn test_absent_file_created_with_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let config = WallpaperConfig::load(&path);
        assert_eq!(config.weather_location, "Phoenix,AZ");
        assert!(path.exists());

        let reloaded: WallpaperConfig =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(reloaded.overlay_opacity, 80);
    }

    #[test]
    fn test_malformed_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{ not json").unwrap();

        let config = WallpaperConfig::load(&path);
        assert_eq!(config.font_size_time, 80);
    }

    #[test]
    fn test_zero_font_size_clamped() {
        let config = WallpaperConfig::load_from_str(r#"{"font_size_message": 0}"#);
        assert_eq!(config.font_size_message, 1);
    }

    impl WallpaperConfig {
        fn load_from_str(raw: &str) -> Self {
            serde_json::from_str::<Self>(raw).unwrap().clamped()
        }
    }
}
