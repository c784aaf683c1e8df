//! Wallpaper artifact persistence and stale-file cleanup.

use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use image::{DynamicImage, RgbaImage};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

const WALLPAPER_PREFIX: &str = "wallpaper_";
const FONT_PREFIX: &str = "font_";

/// Owns the output directory. Writing the artifact is the one fatal
/// operation of a generation; cleanup is best-effort.
///
/// Cleanup deletes by filename match without locking, so two concurrent
/// invocations can delete each other's just-written artifact. Accepted
/// limitation.
pub struct ArtifactStore {
    dir: PathBuf,
}

impl ArtifactStore {
    /// Store under the user data directory.
    pub fn open_default() -> Result<Self> {
        let dirs = ProjectDirs::from("com", "wallforge", "wallforge")
            .ok_or_else(|| anyhow!("could not resolve a home directory"))?;
        Ok(Self {
            dir: dirs.data_dir().join("wallpapers"),
        })
    }

    /// Store rooted at an explicit directory.
    pub fn at(dir: PathBuf) -> Self {
        Self { dir }
    }

    /// Where this generation's downloaded font lives, if one is fetched.
    pub fn font_path(&self, timestamp: &str) -> PathBuf {
        self.dir.join(format!("{FONT_PREFIX}{timestamp}.ttf"))
    }

    /// Flatten to RGB and write `wallpaper_<timestamp>.png`, creating the
    /// directory if absent. Failure here aborts the generation.
    pub fn save(&self, image: RgbaImage, timestamp: &str) -> Result<PathBuf> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("creating wallpaper directory {}", self.dir.display()))?;

        let path = self.dir.join(format!("{WALLPAPER_PREFIX}{timestamp}.png"));
        DynamicImage::ImageRgba8(image)
            .into_rgb8()
            .save(&path)
            .with_context(|| format!("writing wallpaper to {}", path.display()))?;
        Ok(path)
    }

    /// Delete every previously generated wallpaper (and downloaded font)
    /// that does not belong to `current`. Individual deletion failures are
    /// logged and skipped; nothing here affects the generation result.
    pub fn cleanup(&self, current: &Path) {
        let current_name = current
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or_default();
        let timestamp = current_name
            .strip_prefix(WALLPAPER_PREFIX)
            .and_then(|rest| rest.strip_suffix(".png"))
            .unwrap_or_default();
        let current_font = format!("{FONT_PREFIX}{timestamp}.ttf");

        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(err) => {
                warn!(%err, dir = %self.dir.display(), "could not scan wallpaper directory");
                return;
            }
        };

        for entry in entries.flatten() {
            let name = entry.file_name();
            let Some(name) = name.to_str() else {
                continue;
            };
            let stale = (name.starts_with(WALLPAPER_PREFIX) && name != current_name)
                || (name.starts_with(FONT_PREFIX) && name != current_font);
            if !stale {
                continue;
            }
            match fs::remove_file(entry.path()) {
                Ok(()) => debug!(file = name, "removed stale artifact"),
                Err(err) => warn!(%err, file = name, "could not delete stale artifact"),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn canvas() -> RgbaImage {
        RgbaImage::from_pixel(8, 8, Rgba([20, 40, 60, 255]))
    }

    #[test]
    fn test_save_creates_directory_and_writes_png() {
        let dir = tempfile::tempdir().unwrap();
        let store = ArtifactStore::at(dir.path().join("nested").join("wallpapers"));

        let path = store.save(canvas(), "20240102_000000").unwrap();
        assert!(path.ends_with("wallpaper_20240102_000000.png"));

        let written = image::open(&path).unwrap().to_rgb8();
        assert_eq!(written.get_pixel(0, 0).0, [20, 40, 60]);
    }

    #[test]
    fn test_cleanup_keeps_only_the_current_wallpaper() {
        let dir = tempfile::tempdir().unwrap();
        let store = ArtifactStore::at(dir.path().to_path_buf());
        let old = dir.path().join("wallpaper_20240101_000000.png");
        fs::write(&old, b"old").unwrap();

        let current = store.save(canvas(), "20240102_000000").unwrap();
        store.cleanup(&current);

        assert!(!old.exists());
        assert!(current.exists());
    }

    #[test]
    fn test_cleanup_sweeps_stale_fonts_but_keeps_this_generations() {
        let dir = tempfile::tempdir().unwrap();
        let store = ArtifactStore::at(dir.path().to_path_buf());
        let stale_font = dir.path().join("font_20240101_000000.ttf");
        let current_font = store.font_path("20240102_000000");
        fs::write(&stale_font, b"stale").unwrap();
        fs::write(&current_font, b"current").unwrap();

        let current = store.save(canvas(), "20240102_000000").unwrap();
        store.cleanup(&current);

        assert!(!stale_font.exists());
        assert!(current_font.exists());
    }

    #[test]
    fn test_cleanup_ignores_unrelated_files() {
        let dir = tempfile::tempdir().unwrap();
        let store = ArtifactStore::at(dir.path().to_path_buf());
        let unrelated = dir.path().join("notes.txt");
        fs::write(&unrelated, b"keep me").unwrap();

        let current = store.save(canvas(), "20240102_000000").unwrap();
        store.cleanup(&current);

        assert!(unrelated.exists());
    }

    #[test]
    fn test_cleanup_of_missing_directory_is_harmless() {
        let store = ArtifactStore::at(PathBuf::from("/nonexistent/wallforge-test"));
        store.cleanup(Path::new(
            "/nonexistent/wallforge-test/wallpaper_20240102_000000.png",
        ));
    }
}
