use std::time::Duration;

use anyhow::Result;
use serde::Deserialize;
use tokio::select;
use tokio::sync::mpsc::{Receiver, Sender};
use tokio::time::{Instant, MissedTickBehavior, interval_at};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

use crate::events::{SlideChanged, SlideshowCommand};
use crate::model::PhotoId;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct SlideshowOptions {
    /// Time each slide stays up while playing.
    #[serde(with = "humantime_serde")]
    pub interval: Duration,
}

impl SlideshowOptions {
    const fn default_interval() -> Duration {
        Duration::from_secs(3)
    }
}

impl Default for SlideshowOptions {
    fn default() -> Self {
        Self {
            interval: Self::default_interval(),
        }
    }
}

/// Position and play state over a fixed list of slides. Starts paused on the first slide.
#[derive(Debug, Clone)]
pub struct Slideshow {
    slides: Vec<PhotoId>,
    index: usize,
    playing: bool,
}

impl Slideshow {
    pub fn new(slides: Vec<PhotoId>) -> Self {
        Self {
            slides,
            index: 0,
            playing: false,
        }
    }

    pub fn len(&self) -> usize {
        self.slides.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slides.is_empty()
    }

    pub const fn index(&self) -> usize {
        self.index
    }

    pub const fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn current(&self) -> Option<SlideChanged> {
        self.slides.get(self.index).map(|photo| SlideChanged {
            index: self.index,
            photo: *photo,
        })
    }

    /// Auto-advance only makes sense with something to advance to.
    pub fn advances(&self) -> bool {
        self.playing && self.slides.len() > 1
    }

    pub fn next(&mut self) -> Option<SlideChanged> {
        if self.slides.is_empty() {
            return None;
        }
        self.index = (self.index + 1) % self.slides.len();
        self.current()
    }

    pub fn prev(&mut self) -> Option<SlideChanged> {
        if self.slides.is_empty() {
            return None;
        }
        let n = self.slides.len();
        self.index = (self.index + n - 1) % n;
        self.current()
    }

    pub fn play(&mut self) {
        self.playing = true;
    }

    pub fn pause(&mut self) {
        self.playing = false;
    }

    /// Apply a command; returns the new slide if the position moved.
    pub fn apply(&mut self, command: SlideshowCommand) -> Option<SlideChanged> {
        match command {
            SlideshowCommand::Next => self.next(),
            SlideshowCommand::Prev => self.prev(),
            SlideshowCommand::Play => {
                self.play();
                None
            }
            SlideshowCommand::Pause => {
                self.pause();
                None
            }
            SlideshowCommand::TogglePlay => {
                self.playing = !self.playing;
                None
            }
        }
    }
}

/// Drive a slideshow until cancelled or the command channel closes.
///
/// Every position change, manual or timed, is reported on `to_display`.
#[instrument(skip_all, fields(slides = slides.len()))]
pub async fn run(
    slides: Vec<PhotoId>,
    options: SlideshowOptions,
    mut commands: Receiver<SlideshowCommand>,
    to_display: Sender<SlideChanged>,
    cancel: CancellationToken,
) -> Result<()> {
    let mut show = Slideshow::new(slides);
    let period = options.interval.max(Duration::from_millis(1));
    let mut ticker = interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        let changed = select! {
            _ = cancel.cancelled() => break,

            cmd = commands.recv() => {
                let Some(cmd) = cmd else {
                    debug!("slideshow command channel closed");
                    break;
                };
                let was_playing = show.is_playing();
                let changed = show.apply(cmd);
                if show.is_playing() && !was_playing {
                    ticker.reset();
                }
                debug!(?cmd, playing = show.is_playing(), "slideshow command");
                changed
            }

            _ = ticker.tick(), if show.advances() => show.next(),
        };

        if let Some(slide) = changed {
            if to_display.send(slide).await.is_err() {
                warn!("slide receiver dropped");
                break;
            }
        }
    }

    info!(index = show.index(), "slideshow stopped");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn show(n: u32) -> Slideshow {
        Slideshow::new((1..=n).map(PhotoId).collect())
    }

    #[test]
    fn next_and_prev_wrap() {
        let mut s = show(3);
        assert_eq!(s.prev().map(|c| c.index), Some(2));
        assert_eq!(s.next().map(|c| c.index), Some(0));
        assert_eq!(s.next().map(|c| c.photo), Some(PhotoId(2)));
    }

    #[test]
    fn empty_show_never_moves() {
        let mut s = show(0);
        assert!(s.next().is_none());
        assert!(s.prev().is_none());
        s.play();
        assert!(!s.advances());
    }

    #[test]
    fn single_slide_does_not_auto_advance() {
        let mut s = show(1);
        s.apply(SlideshowCommand::TogglePlay);
        assert!(s.is_playing());
        assert!(!s.advances());
    }
}
