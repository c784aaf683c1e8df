mod artifact;
mod compose;
mod config;
mod platform;
mod providers;
mod textfit;

use crate::artifact::ArtifactStore;
use crate::compose::Compositor;
use crate::config::WallpaperConfig;
use crate::providers::HttpTransport;
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "wallforge")]
#[command(
    about = "Generate desktop wallpapers from remote photos, with a message, weather, and the time"
)]
#[command(version)]
struct Cli {
    /// Configuration file path (defaults to the user config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compose a wallpaper and print the artifact path
    Generate,

    /// Compose a wallpaper and apply it as the desktop background
    Set,

    /// Show the resolved configuration
    Config {
        /// Rewrite the configuration file with defaults
        #[arg(long)]
        reset: bool,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let cli = Cli::parse();
    if let Err(err) = run(cli) {
        eprintln!("Error: {err:#}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config_path = match cli.config {
        Some(path) => path,
        None => WallpaperConfig::config_path()?,
    };

    match cli.command {
        Commands::Generate => {
            let config = WallpaperConfig::load(&config_path);
            let path = generate(&config)?;
            println!("{}", path.display());
        }

        Commands::Set => {
            let config = WallpaperConfig::load(&config_path);
            let path = generate(&config)?;
            println!("Wallpaper generated: {}", path.display());
            platform::detect()
                .apply(&path)
                .context("applying wallpaper")?;
            println!("Wallpaper set successfully");
        }

        Commands::Config { reset } => {
            if reset {
                let config = WallpaperConfig::default();
                config.store(&config_path)?;
                println!("Wrote defaults to {}", config_path.display());
            } else {
                let config = WallpaperConfig::load(&config_path);
                println!("# {}", config_path.display());
                println!("{}", serde_json::to_string_pretty(&config)?);
            }
        }
    }

    Ok(())
}

fn generate(config: &WallpaperConfig) -> Result<PathBuf> {
    let transport = HttpTransport::new().context("building HTTP client")?;
    let store = ArtifactStore::open_default()?;
    Compositor::new(config, &transport, store).generate()
}
