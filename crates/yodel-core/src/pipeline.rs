//! Pipeline orchestration: extract, transcode, place

use crate::config::{Config, ToolPaths};
use crate::error::YodelError;
use crate::extractor::Extractor;
use crate::job::AudioJob;
use crate::output::{self, output_file_name};
use crate::transcoder::Transcoder;

use std::fmt::Display;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

const RAW_AUDIO: &str = "out.wav";
const ENCODED_AUDIO: &str = "out.mp3";

/// Pipeline configuration
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub output_dir: PathBuf,
    pub temp_dir: PathBuf,
    pub hd_hint: bool,
    pub timeout: Option<Duration>,
}

impl PipelineConfig {
    pub fn from_config(config: &Config) -> Self {
        Self {
            output_dir: config.output.directory.clone(),
            temp_dir: config.temp_dir(),
            hd_hint: config.extract.hd_hint,
            timeout: config.timeout(),
        }
    }
}

/// Pipeline progress stages
#[derive(Debug, Clone)]
pub enum PipelineStage {
    Preparing { workspace: PathBuf },
    Extracting { url: String },
    Transcoding { artist: String, title: String },
    Placing { output: PathBuf },
    Complete { output: PathBuf, duration: Duration },
    Failed { stage: String, error: String },
}

/// Runs one [`AudioJob`] inside a private workspace that is removed on
/// every exit path.
pub struct Pipeline {
    tools: ToolPaths,
    config: PipelineConfig,
    progress_tx: mpsc::Sender<PipelineStage>,
}

impl Pipeline {
    pub fn new(
        tools: ToolPaths,
        config: PipelineConfig,
        progress_tx: mpsc::Sender<PipelineStage>,
    ) -> Self {
        Self {
            tools,
            config,
            progress_tx,
        }
    }

    pub async fn run(&self, job: &AudioJob) -> Result<PathBuf, YodelError> {
        let start_time = Instant::now();

        let workspace = tempfile::Builder::new()
            .prefix("yodel-")
            .tempdir_in(&self.config.temp_dir)?;
        let workspace_path = workspace.path().to_path_buf();

        info!("Starting pipeline for: {}", job.url());
        debug!("Workspace: {}", workspace_path.display());

        let _ = self.progress_tx.send(PipelineStage::Preparing {
            workspace: workspace_path.clone(),
        }).await;

        // 1. Extract raw audio
        let url = job.source_url(self.config.hd_hint);
        let _ = self.progress_tx.send(PipelineStage::Extracting {
            url: url.to_string(),
        }).await;

        let raw_audio = workspace_path.join(RAW_AUDIO);
        let extractor = Extractor::new(self.tools.vlc.clone(), self.config.timeout);
        extractor
            .extract(&url, &raw_audio)
            .await
            .map_err(|e| self.failed("extract", e))?;

        // 2. Transcode and tag
        let _ = self.progress_tx.send(PipelineStage::Transcoding {
            artist: job.artist().to_string(),
            title: job.title().to_string(),
        }).await;

        let encoded = workspace_path.join(ENCODED_AUDIO);
        let transcoder = Transcoder::new(self.tools.ffmpeg.clone(), self.config.timeout);
        transcoder
            .transcode(&raw_audio, &encoded, job)
            .await
            .map_err(|e| self.failed("transcode", e))?;

        // 3. Move into place
        tokio::fs::create_dir_all(&self.config.output_dir).await?;
        let final_path = self.config.output_dir.join(output_file_name(job));

        let _ = self.progress_tx.send(PipelineStage::Placing {
            output: final_path.clone(),
        }).await;

        let final_path = output::place(&encoded, &final_path)
            .await
            .map_err(|e| self.failed("place", e))?;

        if let Err(e) = workspace.close() {
            warn!("Failed to remove workspace {}: {}", workspace_path.display(), e);
        }

        let duration = start_time.elapsed();
        info!("Pipeline complete: {} ({:.1}s)", final_path.display(), duration.as_secs_f32());

        let _ = self.progress_tx.send(PipelineStage::Complete {
            output: final_path.clone(),
            duration,
        }).await;

        Ok(final_path)
    }

    fn failed<E: Display>(&self, stage: &str, error: E) -> E {
        let _ = self.progress_tx.try_send(PipelineStage::Failed {
            stage: stage.to_string(),
            error: error.to_string(),
        });
        error
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::error::{ExtractError, TranscodeError};
    use std::os::unix::fs::PermissionsExt;
    use std::path::Path;

    const GOOD_VLC: &str = "touch out.wav";
    const GOOD_FFMPEG: &str = r#"for last; do :; done
echo mp3 > "$last""#;

    struct Harness {
        _tools: tempfile::TempDir,
        temp: tempfile::TempDir,
        out: tempfile::TempDir,
        pipeline: Pipeline,
        rx: mpsc::Receiver<PipelineStage>,
    }

    fn script(dir: &Path, name: &str, body: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    fn harness(vlc: &str, ffmpeg: &str) -> Harness {
        let tools = tempfile::tempdir().unwrap();
        let temp = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();

        let tool_paths = ToolPaths::new(
            script(tools.path(), "vlc", vlc),
            script(tools.path(), "ffmpeg", ffmpeg),
        );
        let config = PipelineConfig {
            output_dir: out.path().to_path_buf(),
            temp_dir: temp.path().to_path_buf(),
            hd_hint: true,
            timeout: Some(Duration::from_secs(30)),
        };
        let (tx, rx) = mpsc::channel(32);

        Harness {
            _tools: tools,
            temp,
            out,
            pipeline: Pipeline::new(tool_paths, config, tx),
            rx,
        }
    }

    fn job() -> AudioJob {
        AudioJob::new(
            "https://www.youtube.com/watch?v=abc",
            Some(65),
            Some(185),
            "Artist Name",
            "Cool Song",
        )
        .unwrap()
    }

    fn drain_stages(rx: &mut mpsc::Receiver<PipelineStage>) -> Vec<PipelineStage> {
        let mut stages = Vec::new();
        while let Ok(stage) = rx.try_recv() {
            stages.push(stage);
        }
        stages
    }

    fn workspace_of(stages: &[PipelineStage]) -> PathBuf {
        stages
            .iter()
            .find_map(|s| match s {
                PipelineStage::Preparing { workspace } => Some(workspace.clone()),
                _ => None,
            })
            .expect("workspace announced")
    }

    fn is_empty_dir(dir: &Path) -> bool {
        std::fs::read_dir(dir).unwrap().next().is_none()
    }

    #[tokio::test]
    async fn test_success_places_file_and_removes_workspace() {
        let mut h = harness(GOOD_VLC, GOOD_FFMPEG);

        let output = h.pipeline.run(&job()).await.unwrap();
        assert_eq!(output, h.out.path().join("Artist Name - Cool Song.mp3"));
        assert_eq!(std::fs::read_to_string(&output).unwrap(), "mp3\n");

        let stages = drain_stages(&mut h.rx);
        assert!(!workspace_of(&stages).exists());
        assert!(is_empty_dir(h.temp.path()));
        assert!(matches!(stages.last(), Some(PipelineStage::Complete { .. })));
    }

    #[tokio::test]
    async fn test_quality_hint_reaches_extractor() {
        // VLC "captures" the URL it was given; FFmpeg passes its input through.
        let h = harness(
            r#"echo "$1" > out.wav"#,
            r#"for last; do :; done
cp "$4" "$last""#,
        );

        let output = h.pipeline.run(&job()).await.unwrap();
        assert_eq!(
            std::fs::read_to_string(output).unwrap(),
            "https://www.youtube.com/watch?v=abc&hd=1\n"
        );
    }

    #[tokio::test]
    async fn test_extract_failure_removes_workspace() {
        let mut h = harness("touch out.wav; exit 2", GOOD_FFMPEG);

        let err = h.pipeline.run(&job()).await.unwrap_err();
        assert!(matches!(
            err,
            YodelError::Extract(ExtractError::ExtractionFailed(Some(2)))
        ));

        let stages = drain_stages(&mut h.rx);
        assert!(!workspace_of(&stages).exists());
        assert!(is_empty_dir(h.temp.path()));
        assert!(is_empty_dir(h.out.path()));
        assert!(matches!(
            stages.last(),
            Some(PipelineStage::Failed { stage, .. }) if stage == "extract"
        ));
    }

    #[tokio::test]
    async fn test_transcode_failure_removes_workspace() {
        // Leave a partial output behind, as a crashing encoder would.
        let mut h = harness(GOOD_VLC, r#"for last; do :; done
echo partial > "$last"; exit 1"#);

        let err = h.pipeline.run(&job()).await.unwrap_err();
        assert!(matches!(
            err,
            YodelError::Transcode(TranscodeError::TranscodeFailed(Some(1)))
        ));

        let stages = drain_stages(&mut h.rx);
        assert!(!workspace_of(&stages).exists());
        assert!(is_empty_dir(h.temp.path()));
        assert!(is_empty_dir(h.out.path()));
    }
}
