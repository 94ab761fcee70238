//! Capture runner - reads bit-row captures from stdin, a file or a
//! demodulator subprocess and forwards them to the device manager

use anyhow::{Context, Result};
use std::path::PathBuf;
use std::process::Stdio;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use tokio::fs::File;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::process::Command;
use tokio::sync::mpsc;
use tokio_stream::wrappers::LinesStream;
use tokio_stream::StreamExt;
use tracing::{debug, error, info, warn};

use crate::bitbuffer::{BitBufferError, Capture};

/// Where capture lines come from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSource {
    Stdin,
    File(PathBuf),
    /// Demodulator process printing one capture per line on stdout
    Command { program: String, args: Vec<String> },
}

/// Capture runner that manages the input source
pub struct CaptureRunner {
    source: InputSource,
    running: Arc<AtomicBool>,
    lines_read: Arc<AtomicU64>,
    parse_errors: Arc<AtomicU64>,
}

impl CaptureRunner {
    pub fn new(source: InputSource) -> Self {
        Self {
            source,
            running: Arc::new(AtomicBool::new(false)),
            lines_read: Arc::new(AtomicU64::new(0)),
            parse_errors: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Read captures from the configured source until it closes
    pub async fn run(&self, tx: mpsc::Sender<Capture>) -> Result<()> {
        match &self.source {
            InputSource::Stdin => {
                info!("Reading captures from stdin");
                self.read_lines(BufReader::new(tokio::io::stdin()), &tx).await
            }
            InputSource::File(path) => {
                let file = File::open(path)
                    .await
                    .with_context(|| format!("Failed to open capture file {}", path.display()))?;
                info!("Reading captures from {}", path.display());
                self.read_lines(BufReader::new(file), &tx).await
            }
            InputSource::Command { program, args } => self.run_command(program, args, &tx).await,
        }
    }

    async fn run_command(
        &self,
        program: &str,
        args: &[String],
        tx: &mpsc::Sender<Capture>,
    ) -> Result<()> {
        info!("Starting capture source: {} {}", program, args.join(" "));

        let mut child = Command::new(program)
            .args(args)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .with_context(|| format!("Failed to spawn {}", program))?;

        let stdout = child
            .stdout
            .take()
            .context("Failed to capture source stdout")?;

        let stderr = child
            .stderr
            .take()
            .context("Failed to capture source stderr")?;

        // Demodulators report status on stderr
        let stderr_handle = tokio::spawn(async move {
            let mut lines = BufReader::new(stderr).lines();
            while let Ok(Some(line)) = lines.next_line().await {
                if !line.is_empty() {
                    info!("source: {}", line);
                }
            }
        });

        let result = self.read_lines(BufReader::new(stdout), tx).await;

        let _ = child.kill().await;
        let _ = stderr_handle.await;

        result
    }

    /// Parse every capture line from `reader` and send it down `tx`
    pub async fn read_lines<R>(&self, reader: R, tx: &mpsc::Sender<Capture>) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
    {
        self.running.store(true, Ordering::SeqCst);

        let mut lines = LinesStream::new(reader.lines());
        let mut first_capture = true;

        while self.running.load(Ordering::SeqCst) {
            match lines.next().await {
                Some(Ok(line)) => {
                    self.lines_read.fetch_add(1, Ordering::Relaxed);
                    match parse_capture_line(&line) {
                        Some(Ok(capture)) => {
                            if first_capture {
                                info!("First capture received");
                                first_capture = false;
                            }
                            if tx.send(capture).await.is_err() {
                                warn!("Channel closed, stopping runner");
                                break;
                            }
                        }
                        Some(Err(e)) => {
                            self.parse_errors.fetch_add(1, Ordering::Relaxed);
                            debug!("Failed to parse line {:?}: {}", line, e);
                        }
                        None => {}
                    }
                }
                Some(Err(e)) => {
                    error!("Error reading capture input: {}", e);
                    break;
                }
                None => {
                    info!("Capture input closed");
                    break;
                }
            }
        }

        self.running.store(false, Ordering::SeqCst);

        info!(
            "Runner stopped. Lines: {}, Parse errors: {}",
            self.lines_read(),
            self.parse_errors()
        );

        Ok(())
    }

    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    pub fn lines_read(&self) -> u64 {
        self.lines_read.load(Ordering::Relaxed)
    }

    pub fn parse_errors(&self) -> u64 {
        self.parse_errors.load(Ordering::Relaxed)
    }
}

/// Parse one input line: `{65}55aade.../{65}...`, optionally prefixed
/// with `codes :` as rtl_433 prints it.
///
/// Returns `None` for blank lines, `#` comments and other `key : value`
/// output.
pub fn parse_capture_line(line: &str) -> Option<Result<Capture, BitBufferError>> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return None;
    }

    let body = match line.strip_prefix("codes") {
        Some(rest) => rest.trim_start().strip_prefix(':')?.trim(),
        None if line.contains(':') => return None,
        None => line,
    };

    Some(body.parse())
}
