use std::time::Duration;

use anyhow::Result;
use serde::Deserialize;
use tokio::select;
use tokio::sync::mpsc::Sender;
use tokio::time::{Instant, interval_at};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

use crate::events::{Notification, UploadEvent, files_phrase};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct UploadOptions {
    /// Delay between progress updates.
    #[serde(with = "humantime_serde")]
    pub tick: Duration,
    /// Percentage points added per tick.
    pub step: u8,
}

impl UploadOptions {
    const fn default_tick() -> Duration {
        Duration::from_millis(200)
    }

    const fn default_step() -> u8 {
        5
    }
}

impl Default for UploadOptions {
    fn default() -> Self {
        Self {
            tick: Self::default_tick(),
            step: Self::default_step(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedFile {
    pub name: String,
    pub mime: String,
    pub size: u64,
}

impl StagedFile {
    pub fn new(name: impl Into<String>, mime: impl Into<String>, size: u64) -> Self {
        Self {
            name: name.into(),
            mime: mime.into(),
            size,
        }
    }

    pub fn is_media(&self) -> bool {
        self.mime.starts_with("image/") || self.mime.starts_with("video/")
    }
}

/// Files waiting for upload. Only images and videos are accepted.
#[derive(Debug, Clone, Default)]
pub struct UploadQueue {
    files: Vec<StagedFile>,
}

impl UploadQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stage `files`, silently skipping anything that is not media. Returns how many were kept.
    pub fn stage<I>(&mut self, files: I) -> usize
    where
        I: IntoIterator<Item = StagedFile>,
    {
        let before = self.files.len();
        for file in files {
            if file.is_media() {
                self.files.push(file);
            } else {
                debug!(name = %file.name, mime = %file.mime, "skipping non-media file");
            }
        }
        self.files.len() - before
    }

    pub fn remove(&mut self, index: usize) -> Option<StagedFile> {
        (index < self.files.len()).then(|| self.files.remove(index))
    }

    pub fn clear(&mut self) {
        self.files.clear();
    }

    pub fn files(&self) -> &[StagedFile] {
        &self.files
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn total_bytes(&self) -> u64 {
        self.files.iter().map(|f| f.size).sum()
    }

    /// Hand the staged files to [`run`] and empty the queue.
    pub fn take(&mut self) -> Vec<StagedFile> {
        std::mem::take(&mut self.files)
    }
}

/// Simulated upload: progress every `tick` until 100, then one completion notice.
///
/// An empty batch sends nothing. Cancellation stops without a completion notice.
#[instrument(skip_all, fields(files = files.len()))]
pub async fn run(
    files: Vec<StagedFile>,
    options: UploadOptions,
    to_ui: Sender<UploadEvent>,
    cancel: CancellationToken,
) -> Result<()> {
    if files.is_empty() {
        debug!("nothing to upload");
        return Ok(());
    }
    let step = options.step.clamp(1, 100);
    let period = options.tick.max(Duration::from_millis(1));
    let mut ticker = interval_at(Instant::now() + period, period);
    let mut progress: u8 = 0;

    while progress < 100 {
        select! {
            _ = cancel.cancelled() => {
                info!(progress, "upload cancelled");
                return Ok(());
            }
            _ = ticker.tick() => {
                progress = progress.saturating_add(step).min(100);
                if to_ui.send(UploadEvent::Progress(progress)).await.is_err() {
                    warn!("upload listener dropped");
                    return Ok(());
                }
            }
        }
    }

    let count = files.len();
    let bytes: u64 = files.iter().map(|f| f.size).sum();
    info!(count, bytes, "upload complete");
    let done = Notification::info(
        "Upload complete",
        format!("Successfully uploaded {}", files_phrase(count)),
    );
    if to_ui.send(UploadEvent::Finished(done)).await.is_err() {
        warn!("upload listener dropped before completion");
    }
    Ok(())
}
