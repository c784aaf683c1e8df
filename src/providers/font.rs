//! Font resolution: optional per-generation download, then built-in faces.

use crate::providers::Transport;
use anyhow::{Context, Result};
use fontdue::{Font, FontSettings};
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

/// Built-in faces tried in order when no custom font is usable.
const BUILTIN_FONTS: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/TTF/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/liberation/LiberationSans-Regular.ttf",
    "/System/Library/Fonts/Helvetica.ttc",
    "/Library/Fonts/Arial.ttf",
    "C:\\Windows\\Fonts\\segoeui.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

/// Resolve the face used for every text block of one generation.
///
/// A configured HTTP(S) URL gets one fetch; the bytes are persisted to
/// `download_path` (cleaned up with the other stale artifacts later) and
/// parsed. Any failure along that path falls back to the built-in list.
/// `None` means no face parsed anywhere and text layers are skipped.
pub fn resolve_font(
    transport: &dyn Transport,
    font_url: &str,
    download_path: &Path,
) -> Option<Font> {
    let url = font_url.trim();
    if url.starts_with("http") {
        match download(transport, url, download_path) {
            Ok(font) => {
                debug!(url, "using downloaded font");
                return Some(font);
            }
            Err(err) => warn!(%err, url, "custom font unavailable, trying built-in faces"),
        }
    }
    builtin_font()
}

fn download(transport: &dyn Transport, url: &str, download_path: &Path) -> Result<Font> {
    let bytes = transport.fetch(url)?;
    if let Some(parent) = download_path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating {}", parent.display()))?;
    }
    fs::write(download_path, &bytes)
        .with_context(|| format!("persisting font to {}", download_path.display()))?;
    parse(bytes)
}

fn parse(bytes: Vec<u8>) -> Result<Font> {
    Font::from_bytes(bytes, FontSettings::default())
        .map_err(|err| anyhow::anyhow!("parsing font: {err}"))
}

fn builtin_font() -> Option<Font> {
    for path in BUILTIN_FONTS {
        let Ok(bytes) = fs::read(path) else {
            continue;
        };
        match parse(bytes) {
            Ok(font) => {
                debug!(path, "using built-in font");
                return Some(font);
            }
            Err(err) => warn!(path, %err, "built-in font failed to parse"),
        }
    }
    warn!("no usable font found");
    None
}
