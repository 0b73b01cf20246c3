use anyhow::Result;
use std::path::{Path, PathBuf};
use std::process::Command;
use which::which;
use yodel_core::config::Config;

pub async fn run(config_path: Option<&Path>) -> Result<()> {
    let config = Config::load(config_path)?;

    println!("yodel dependency check\n");

    let vlc_ok = check_tool(
        "vlc",
        config.paths.vlc.as_deref(),
        "--version",
        |out| out.lines().next().map(|l| l.trim_start_matches("VLC version ").to_string()),
        "brew install --cask vlc",
    );

    let ffmpeg_ok = check_tool(
        "ffmpeg",
        config.paths.ffmpeg.as_deref(),
        "-version",
        // "ffmpeg version 6.1.1 Copyright ..." -> "6.1.1"
        |out| {
            out.lines()
                .next()
                .and_then(|l| l.split_whitespace().nth(2))
                .map(str::to_string)
        },
        "brew install ffmpeg",
    );

    println!();
    if vlc_ok && ffmpeg_ok {
        println!("All dependencies OK!");
    } else {
        println!("Some dependencies are missing. See above for installation instructions.");
    }

    Ok(())
}

fn check_tool(
    name: &str,
    configured: Option<&Path>,
    version_flag: &str,
    parse_version: impl Fn(&str) -> Option<String>,
    install_hint: &str,
) -> bool {
    print!("{:<8} ", format!("{}:", name));

    let path: Option<PathBuf> = match configured {
        Some(path) if path.is_file() => Some(path.to_path_buf()),
        Some(path) => {
            println!("CONFIGURED PATH MISSING ({})", path.display());
            return false;
        }
        None => which(name).ok(),
    };

    let Some(path) = path else {
        println!("NOT FOUND");
        println!("         Install with: {}", install_hint);
        return false;
    };

    match Command::new(&path).arg(version_flag).output() {
        Ok(out) => {
            let version = parse_version(&String::from_utf8_lossy(&out.stdout))
                .unwrap_or_else(|| "unknown version".to_string());
            println!("OK ({}, {})", version.trim(), path.display());
            true
        }
        Err(_) => {
            println!("FOUND but failed to get version ({})", path.display());
            false
        }
    }
}
