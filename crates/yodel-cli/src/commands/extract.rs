use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{BufRead, Write};
use std::path::Path;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::args::ExtractOptions;
use crate::prompt::Prompter;
use yodel_core::{
    config::{Config, ToolPaths},
    guess_title,
    job::{parse_offset, AudioJob},
    pipeline::{Pipeline, PipelineConfig, PipelineStage},
    scrape, TitleGuess,
};

pub async fn run(url: Option<&str>, options: &ExtractOptions, config_path: Option<&Path>) -> Result<()> {
    let config = Config::load(config_path)?;

    // Both tools must exist before anything else happens.
    let tools = ToolPaths::resolve(&config.paths)?;

    let mut prompter = Prompter::stdio();

    let url = match url {
        Some(url) => url.to_string(),
        None => prompter.ask("Video URL: ")?,
    };

    let guess = lookup_title(&url).await;
    if let Some(ref guess) = guess {
        println!("Video title: {}", guess.raw);
    }

    let job = collect_job(&url, guess.as_ref(), options, &mut prompter)?;

    let mut pipeline_config = PipelineConfig::from_config(&config);
    if let Some(ref dir) = options.output {
        pipeline_config.output_dir = dir.clone();
    }

    let (tx, mut rx) = mpsc::channel(32);

    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::with_template("{spinner:.cyan} [{elapsed_precise}] {msg}")?);
    pb.enable_steady_tick(Duration::from_millis(120));

    let progress_handle = tokio::spawn(async move {
        while let Some(stage) = rx.recv().await {
            match stage {
                PipelineStage::Preparing { .. } => {
                    pb.set_message("Preparing workspace...");
                }
                PipelineStage::Extracting { url } => {
                    pb.set_message(format!("Downloading raw audio from {}", truncate(&url, 50)));
                }
                PipelineStage::Transcoding { artist, title } => {
                    pb.set_message(format!("Transcoding {} - {}", artist, title));
                }
                PipelineStage::Placing { output } => {
                    pb.set_message(format!("Writing {}", output.display()));
                }
                PipelineStage::Complete { output, duration } => {
                    pb.finish_with_message(format!(
                        "Done: {} ({:.1}s)",
                        output.display(),
                        duration.as_secs_f32()
                    ));
                }
                PipelineStage::Failed { stage, error } => {
                    pb.abandon_with_message(format!("Failed at {}: {}", stage, error));
                }
            }
        }
    });

    let pipeline = Pipeline::new(tools, pipeline_config, tx);
    let result = pipeline.run(&job).await;

    // Closing the channel ends the progress task.
    drop(pipeline);
    progress_handle.await?;

    let output = result?;
    println!("\nmp3 written to {}", output.display());
    Ok(())
}

/// Scrape the page title and run the heuristic. Any failure just means
/// there are no defaults to offer.
async fn lookup_title(url: &str) -> Option<TitleGuess> {
    let client = match scrape::http_client() {
        Ok(client) => client,
        Err(e) => {
            warn!("Could not build HTTP client: {}", e);
            return None;
        }
    };

    match scrape::fetch_page_title(&client, url).await {
        Ok(Some(raw)) => Some(guess_title(&raw)),
        Ok(None) => {
            info!("Page has no og:title; no defaults available");
            None
        }
        Err(e) => {
            warn!("Could not read page title: {}", e);
            None
        }
    }
}

/// Merge flags, prompted answers and guessed defaults into a validated job.
fn collect_job<R: BufRead, W: Write>(
    url: &str,
    guess: Option<&TitleGuess>,
    options: &ExtractOptions,
    prompter: &mut Prompter<R, W>,
) -> Result<AudioJob> {
    let default_artist = guess.map(|g| g.artist.as_str()).filter(|a| !a.is_empty());
    let default_title = guess.and_then(|g| g.title.as_deref()).filter(|t| !t.is_empty());

    let artist = match (&options.artist, options.yes) {
        (Some(artist), _) => Some(artist.clone()),
        (None, true) => default_artist.map(str::to_string),
        (None, false) => prompter.ask_or("Artist", default_artist)?,
    };

    let title = match (&options.title, options.yes) {
        (Some(title), _) => Some(title.clone()),
        (None, true) => default_title.map(str::to_string),
        (None, false) => prompter.ask_or("Title", default_title)?,
    };

    let start = match (&options.start, options.yes) {
        (Some(start), _) => parse_offset(start),
        (None, true) => None,
        (None, false) => parse_offset(&prompter.ask("Song start (mm:ss): ")?),
    };

    let end = match (&options.end, options.yes) {
        (Some(end), _) => parse_offset(end),
        (None, true) => None,
        (None, false) => parse_offset(&prompter.ask("Song end (mm:ss): ")?),
    };

    let job = AudioJob::new(
        url,
        start,
        end,
        artist.unwrap_or_default(),
        title.unwrap_or_default(),
    )
    .context("Cannot start extraction")?;
    Ok(job)
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_len - 3).collect();
        format!("{}...", head)
    }
}
