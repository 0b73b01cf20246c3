//! Child process supervision shared by the extractor and transcoder

use std::process::{ExitStatus, Stdio};
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Command;
use tracing::{trace, warn};

/// How a supervised child ended.
#[derive(Debug)]
pub(crate) enum Outcome {
    Exited(ExitStatus),
    TimedOut(Duration),
}

/// Spawn `cmd`, drain both output streams until EOF while waiting on the
/// child, and kill it if `timeout` elapses first.
pub(crate) async fn run(
    mut cmd: Command,
    tool: &'static str,
    timeout: Option<Duration>,
) -> std::io::Result<Outcome> {
    cmd.stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let mut child = cmd.spawn()?;
    let stdout = child.stdout.take();
    let stderr = child.stderr.take();

    let supervised = async {
        let (status, _, _) = tokio::join!(child.wait(), drain(stdout, tool), drain(stderr, tool));
        status
    };

    match timeout {
        None => Ok(Outcome::Exited(supervised.await?)),
        Some(limit) => {
            let waited = tokio::time::timeout(limit, supervised).await;
            match waited {
                Ok(status) => Ok(Outcome::Exited(status?)),
                Err(_) => {
                    warn!("{} exceeded {:?}, killing it", tool, limit);
                    child.kill().await?;
                    Ok(Outcome::TimedOut(limit))
                }
            }
        }
    }
}

async fn drain<R>(stream: Option<R>, tool: &'static str)
where
    R: AsyncRead + Unpin,
{
    let Some(stream) = stream else {
        return;
    };

    // Split on raw newlines: tool output is not guaranteed to be UTF-8.
    let mut lines = BufReader::new(stream).split(b'\n');
    loop {
        match lines.next_segment().await {
            Ok(Some(line)) => trace!(target: "yodel::tool", "{}: {}", tool, String::from_utf8_lossy(&line).trim_end()),
            Ok(None) => break,
            Err(e) => {
                warn!("Lost {} output stream: {}", tool, e);
                break;
            }
        }
    }
}
