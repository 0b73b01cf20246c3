//! Final file naming and placement

use crate::job::AudioJob;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Sanitize filename for filesystem
pub fn sanitize_filename(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            _ => c,
        })
        .collect::<String>()
        .trim()
        .to_string()
}

/// `"<artist> - <title>.mp3"`, sanitized.
pub fn output_file_name(job: &AudioJob) -> String {
    sanitize_filename(&format!("{} - {}.mp3", job.artist(), job.title()))
}

/// Move `from` to `to`, replacing any existing file. Falls back to a copy
/// when a rename is impossible (e.g. workspace on another filesystem).
pub async fn place(from: &Path, to: &Path) -> io::Result<PathBuf> {
    if tokio::fs::try_exists(to).await? {
        warn!("Overwriting existing file: {}", to.display());
    }

    if let Err(e) = tokio::fs::rename(from, to).await {
        debug!("Rename failed ({}), copying instead", e);
        copy_into_place(from, to).await?;
        tokio::fs::remove_file(from).await?;
    }

    Ok(to.to_path_buf())
}

/// Copy next to `to` first, then rename over it. An existing `to` is only
/// replaced by a complete copy.
async fn copy_into_place(from: &Path, to: &Path) -> io::Result<()> {
    let staging = staging_path(to);

    let copied = match tokio::fs::copy(from, &staging).await {
        Ok(_) => tokio::fs::rename(&staging, to).await,
        Err(e) => Err(e),
    };

    if copied.is_err() {
        let _ = tokio::fs::remove_file(&staging).await;
    }
    copied
}

/// `dir/.name.part` beside the final file, so the last rename stays on one
/// filesystem.
fn staging_path(to: &Path) -> PathBuf {
    let name = to
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    to.with_file_name(format!(".{}.part", name))
}
