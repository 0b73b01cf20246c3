//! Configuration management for yodel

use crate::error::{ConfigError, StartupError};
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    pub paths: PathsConfig,
    pub output: OutputConfig,
    pub extract: ExtractConfig,
    pub process: ProcessConfig,
    pub temp: TempConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Path to VLC binary (auto-detected if not set)
    pub vlc: Option<PathBuf>,
    /// Path to FFmpeg binary (auto-detected if not set)
    pub ffmpeg: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Directory the finished MP3 is moved into
    pub directory: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractConfig {
    /// Add `hd=1` to query-parameterized source URLs
    pub hd_hint: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProcessConfig {
    /// Kill an external tool that runs longer than this (unbounded if not set)
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TempConfig {
    /// Custom parent for job workspaces (uses system temp if not set)
    pub directory: Option<PathBuf>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("."),
        }
    }
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self { hd_hint: true }
    }
}

impl Config {
    /// Load configuration from file and environment
    pub fn load(config_file: Option<&Path>) -> Result<Self, ConfigError> {
        let mut figment = Figment::new().merge(Serialized::defaults(Config::default()));

        if let Some(config_dir) = dirs::config_dir() {
            let default_config = config_dir.join("yodel/config.toml");
            if default_config.exists() {
                figment = figment.merge(Toml::file(&default_config));
            }
        }

        if let Some(path) = config_file {
            figment = figment.merge(Toml::file(path));
        }

        // YODEL_PROCESS__TIMEOUT_SECS=600
        figment = figment.merge(Env::prefixed("YODEL_").split("__"));

        figment.extract().map_err(|e| ConfigError::LoadError(e.to_string()))
    }

    /// Render the effective configuration as TOML
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.process.timeout_secs.map(Duration::from_secs)
    }

    /// Get temp directory
    pub fn temp_dir(&self) -> PathBuf {
        self.temp.directory.clone().unwrap_or_else(std::env::temp_dir)
    }
}

/// External tool locations, resolved once at startup and handed to the runners.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolPaths {
    pub vlc: PathBuf,
    pub ffmpeg: PathBuf,
}

impl ToolPaths {
    pub fn new(vlc: impl Into<PathBuf>, ffmpeg: impl Into<PathBuf>) -> Self {
        Self {
            vlc: vlc.into(),
            ffmpeg: ffmpeg.into(),
        }
    }

    /// Resolve both tools, preferring configured paths over a PATH search.
    pub fn resolve(paths: &PathsConfig) -> Result<Self, StartupError> {
        let vlc = resolve_tool(
            "vlc",
            paths.vlc.as_deref(),
            "Install with: brew install --cask vlc",
        )?;
        let ffmpeg = resolve_tool(
            "ffmpeg",
            paths.ffmpeg.as_deref(),
            "Install with: brew install ffmpeg",
        )?;
        Ok(Self { vlc, ffmpeg })
    }
}

fn resolve_tool(
    tool: &'static str,
    configured: Option<&Path>,
    hint: &'static str,
) -> Result<PathBuf, StartupError> {
    if let Some(path) = configured {
        if !path.is_file() {
            return Err(StartupError::ConfiguredToolMissing {
                tool,
                path: path.to_path_buf(),
            });
        }
        debug!("Using configured {}: {}", tool, path.display());
        return Ok(path.to_path_buf());
    }

    let found = which::which(tool).map_err(|_| StartupError::ToolNotFound { tool, hint })?;
    debug!("Found {} on PATH: {}", tool, found.display());
    Ok(found)
}
