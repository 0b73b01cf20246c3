use anyhow::Result;
use std::path::Path;
use yodel_core::config::Config;

pub async fn run(config_path: Option<&Path>) -> Result<()> {
    let config = Config::load(config_path)?;

    println!("yodel configuration\n");
    println!("{}", config.to_toml()?);

    if config.paths.vlc.is_none() || config.paths.ffmpeg.is_none() {
        println!("# Unset tool paths are auto-detected on PATH.");
    }

    println!("\nConfig sources (later ones override earlier ones):");
    if let Some(config_dir) = dirs::config_dir() {
        println!("  1. {}/yodel/config.toml", config_dir.display());
    }
    if let Some(p) = config_path {
        println!("  2. {} (specified)", p.display());
    }
    println!("  3. Environment variables (YODEL_*, nested keys joined with __)");

    Ok(())
}
