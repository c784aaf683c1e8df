//! OS-specific desktop background application.

use anyhow::Result;
use std::path::Path;

/// Applies an already-persisted image as the desktop background. The
/// compositor core never sees which implementation is bound.
pub trait WallpaperSetter {
    fn apply(&self, path: &Path) -> Result<()>;
}

/// Pick the setter for the platform this binary was built for.
pub fn detect() -> Box<dyn WallpaperSetter> {
    #[cfg(target_os = "macos")]
    return Box::new(MacosSetter);

    #[cfg(target_os = "windows")]
    return Box::new(WindowsSetter);

    #[cfg(not(any(target_os = "macos", target_os = "windows")))]
    Box::new(GnomeSetter)
}

/// GNOME desktop via `gsettings`. Both the light and dark keys are set;
/// GNOME 42+ reads `picture-uri-dark` when the dark style is active.
#[cfg(not(any(target_os = "macos", target_os = "windows")))]
struct GnomeSetter;

#[cfg(not(any(target_os = "macos", target_os = "windows")))]
impl WallpaperSetter for GnomeSetter {
    fn apply(&self, path: &Path) -> Result<()> {
        use anyhow::{Context, bail};
        use std::process::Command;

        let uri = format!("file://{}", path.display());
        for key in ["picture-uri", "picture-uri-dark"] {
            let status = Command::new("gsettings")
                .args(["set", "org.gnome.desktop.background", key, &uri])
                .status()
                .context("running gsettings")?;
            if !status.success() {
                bail!("gsettings set {key} exited with {status}");
            }
        }
        Ok(())
    }
}

/// macOS via a System Events AppleScript.
#[cfg(target_os = "macos")]
struct MacosSetter;

#[cfg(target_os = "macos")]
impl WallpaperSetter for MacosSetter {
    fn apply(&self, path: &Path) -> Result<()> {
        use anyhow::{Context, bail};
        use std::process::Command;

        let script = format!(
            "tell application \"System Events\"\n  tell every desktop\n    set picture to \"{}\"\n  end tell\nend tell",
            path.display()
        );
        let status = Command::new("osascript")
            .args(["-e", &script])
            .status()
            .context("running osascript")?;
        if !status.success() {
            bail!("osascript exited with {status}");
        }
        Ok(())
    }
}

/// Windows via the SystemParametersInfo API.
#[cfg(target_os = "windows")]
struct WindowsSetter;

#[cfg(target_os = "windows")]
impl WallpaperSetter for WindowsSetter {
    fn apply(&self, path: &Path) -> Result<()> {
        use anyhow::anyhow;

        let path = path
            .to_str()
            .ok_or_else(|| anyhow!("artifact path is not valid UTF-8"))?;
        wallpaper::set_from_path(path).map_err(|err| anyhow!("setting wallpaper: {err}"))
    }
}
