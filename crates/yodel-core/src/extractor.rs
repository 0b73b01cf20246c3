//! Raw audio capture using VLC

use crate::error::ExtractError;
use crate::process::{self, Outcome};
use reqwest::Url;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::process::Command;
use tracing::{debug, info};

#[derive(Debug)]
pub struct Extractor {
    vlc_path: PathBuf,
    timeout: Option<Duration>,
}

impl Extractor {
    pub fn new(vlc_path: PathBuf, timeout: Option<Duration>) -> Self {
        Self { vlc_path, timeout }
    }

    /// Capture the audio of `url` into `output`, blocking until VLC exits.
    ///
    /// VLC runs inside `output`'s parent directory and is handed only the
    /// file name, so the sout chain never has to quote a full path.
    pub async fn extract(&self, url: &Url, output: &Path) -> Result<(), ExtractError> {
        info!("Downloading raw audio from: {}", url);

        let (dir, file) = match (output.parent(), output.file_name()) {
            (Some(dir), Some(file)) => (dir, file),
            _ => return Err(ExtractError::InvalidDestination(output.to_path_buf())),
        };

        let args = Self::build_args(url, &file.to_string_lossy());
        debug!("vlc args: {:?}", args);

        let mut cmd = Command::new(&self.vlc_path);
        cmd.args(&args).current_dir(dir);

        match process::run(cmd, "vlc", self.timeout).await? {
            Outcome::TimedOut(limit) => return Err(ExtractError::TimedOut(limit)),
            Outcome::Exited(status) if !status.success() => {
                return Err(ExtractError::ExtractionFailed(status.code()));
            }
            Outcome::Exited(_) => {}
        }

        // VLC exits cleanly even when the source could not be opened.
        if !tokio::fs::try_exists(output).await? {
            return Err(ExtractError::NoOutput(output.to_path_buf()));
        }

        debug!("Raw audio written to: {}", output.display());
        Ok(())
    }

    pub fn build_args(url: &Url, file_name: &str) -> Vec<OsString> {
        let sout = format!(
            "--sout=#transcode{{vcodec=none,acodec=s32l}}:file{{dst='{}'}}",
            file_name
        );

        [
            url.as_str(),
            "-vvv",
            "-I",
            "dummy",
            "--dummy-quiet",
            "--verbose=2",
            "--logmode=text",
            &sout,
            "vlc://quit",
        ]
        .into_iter()
        .map(OsString::from)
        .collect()
    }
}
