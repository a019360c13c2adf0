use std::path::Path;
use std::time::Duration;

use anyhow::{Result, ensure};
use chrono_tz::Tz;
use serde::Deserialize;

use crate::dataset::DatasetOptions;
use crate::error::Error;
use crate::library::DEFAULT_TRASH_RETENTION;
use crate::query::DEFAULT_RECENT_WINDOW;
use crate::tasks::slideshow::SlideshowOptions;
use crate::tasks::upload::UploadOptions;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct Configuration {
    /// Viewer timezone used for calendar math (date display, month grouping).
    pub timezone: Tz,
    /// How far back the "recent" filter reaches.
    #[serde(with = "humantime_serde")]
    pub recent_window: Duration,
    /// Minimum time in the trash before `purge` deletes a photo.
    #[serde(with = "humantime_serde")]
    pub trash_retention: Duration,
    /// Sample collection the CLI operates on.
    pub dataset: DatasetOptions,
    pub slideshow: SlideshowOptions,
    pub upload: UploadOptions,
}

impl Configuration {
    /// # Errors
    /// [`Error::Io`] if the file cannot be read, [`Error::Config`] if it is not valid YAML.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, Error> {
        let s = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&s)
    }

    /// # Errors
    /// [`Error::Config`] if `s` is not a valid configuration document.
    pub fn from_yaml_str(s: &str) -> Result<Self, Error> {
        // An empty document means "all defaults".
        if s.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(s)?)
    }

    /// Validate runtime invariants that cannot be expressed via serde defaults alone.
    pub fn validated(self) -> Result<Self> {
        ensure!(
            self.dataset.photo_count > 0,
            "dataset.photo-count must be greater than zero"
        );
        ensure!(
            (1..=9999).contains(&self.dataset.year),
            "dataset.year must be between 1 and 9999"
        );
        ensure!(
            !self.recent_window.is_zero(),
            "recent-window must be positive"
        );
        ensure!(
            !self.trash_retention.is_zero(),
            "trash-retention must be positive"
        );
        ensure!(
            !self.slideshow.interval.is_zero(),
            "slideshow.interval must be positive"
        );
        ensure!(!self.upload.tick.is_zero(), "upload.tick must be positive");
        ensure!(
            (1..=100).contains(&self.upload.step),
            "upload.step must be between 1 and 100"
        );
        Ok(self)
    }
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            timezone: Tz::UTC,
            recent_window: DEFAULT_RECENT_WINDOW,
            trash_retention: DEFAULT_TRASH_RETENTION,
            dataset: DatasetOptions::default(),
            slideshow: SlideshowOptions::default(),
            upload: UploadOptions::default(),
        }
    }
}
