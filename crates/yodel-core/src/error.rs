//! Error types for yodel-core

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, YodelError>;

#[derive(Error, Debug)]
pub enum YodelError {
    #[error("Startup failed: {0}")]
    Startup(#[from] StartupError),

    #[error("Extraction failed: {0}")]
    Extract(#[from] ExtractError),

    #[error("Transcode failed: {0}")]
    Transcode(#[from] TranscodeError),

    #[error("Title lookup failed: {0}")]
    Scrape(#[from] ScrapeError),

    #[error("Invalid job: {0}")]
    Job(#[from] JobError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Error, Debug)]
pub enum StartupError {
    #[error("{tool} not found on PATH. {hint}")]
    ToolNotFound {
        tool: &'static str,
        hint: &'static str,
    },

    #[error("Configured {tool} path does not exist: {}", .path.display())]
    ConfiguredToolMissing { tool: &'static str, path: PathBuf },
}

#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("VLC exited with code: {0:?}")]
    ExtractionFailed(Option<i32>),

    #[error("VLC produced no audio at {}", .0.display())]
    NoOutput(PathBuf),

    #[error("VLC did not finish within {0:?}")]
    TimedOut(Duration),

    #[error("Destination has no parent directory: {}", .0.display())]
    InvalidDestination(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Error, Debug)]
pub enum TranscodeError {
    #[error("FFmpeg exited with code: {0:?}")]
    TranscodeFailed(Option<i32>),

    #[error("FFmpeg produced no output at {}", .0.display())]
    NoOutput(PathBuf),

    #[error("FFmpeg did not finish within {0:?}")]
    TimedOut(Duration),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Error, Debug)]
pub enum ScrapeError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Server answered {status} for {url}")]
    Status { status: u16, url: String },
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum JobError {
    #[error("End offset {end}s is before start offset {start}s")]
    InvalidTimeRange { start: u32, end: u32 },

    #[error("End offset {0}s is out of range")]
    EndOutOfRange(u32),

    #[error("{0} must not be empty")]
    EmptyField(&'static str),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load config: {0}")]
    LoadError(String),

    #[error("Failed to render config: {0}")]
    RenderError(#[from] toml::ser::Error),
}
