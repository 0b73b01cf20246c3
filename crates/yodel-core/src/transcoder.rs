//! MP3 transcoding and ID3 tagging using FFmpeg

use crate::error::TranscodeError;
use crate::job::AudioJob;
use crate::process::{self, Outcome};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::process::Command;
use tracing::{debug, info};

/// Fixed output profile: stereo 256 kbps MP3 at 48 kHz.
const PROFILE: [&str; 9] = [
    "-vn",
    "-ab", "256k",
    "-ac", "2",
    "-ar", "48000",
    "-acodec", "mp3",
];

#[derive(Debug)]
pub struct Transcoder {
    ffmpeg_path: PathBuf,
    timeout: Option<Duration>,
}

impl Transcoder {
    pub fn new(ffmpeg_path: PathBuf, timeout: Option<Duration>) -> Self {
        Self {
            ffmpeg_path,
            timeout,
        }
    }

    /// Encode the window of `input` selected by `job` into a tagged MP3.
    pub async fn transcode(
        &self,
        input: &Path,
        output: &Path,
        job: &AudioJob,
    ) -> Result<(), TranscodeError> {
        info!("Transcoding to MP3: {} - {}", job.artist(), job.title());

        let args = Self::build_args(input, output, job);
        debug!("ffmpeg args: {:?}", args);

        let mut cmd = Command::new(&self.ffmpeg_path);
        cmd.args(&args);

        match process::run(cmd, "ffmpeg", self.timeout).await? {
            Outcome::TimedOut(limit) => return Err(TranscodeError::TimedOut(limit)),
            Outcome::Exited(status) if !status.success() => {
                return Err(TranscodeError::TranscodeFailed(status.code()));
            }
            Outcome::Exited(_) => {}
        }

        if !tokio::fs::try_exists(output).await? {
            return Err(TranscodeError::NoOutput(output.to_path_buf()));
        }

        debug!("Encoded to: {}", output.display());
        Ok(())
    }

    pub fn build_args(input: &Path, output: &Path, job: &AudioJob) -> Vec<OsString> {
        // Input-side seek: -ss must come before -i
        let mut args: Vec<OsString> = vec![
            "-ss".into(),
            job.start().to_string().into(),
            "-i".into(),
            input.into(),
        ];
        args.extend(PROFILE.iter().map(OsString::from));

        if let Some(duration) = job.duration() {
            args.push("-t".into());
            args.push(duration.to_string().into());
        }

        for (key, value) in job.tags() {
            args.push("-metadata".into());
            args.push(format!("{}={}", key, value).into());
        }

        // ID3v2.3 plus a v1 trailer for older players
        args.extend(
            ["-id3v2_version", "3", "-write_id3v1", "1", "-y"]
                .iter()
                .map(OsString::from),
        );
        args.push(output.into());
        args
    }
}
