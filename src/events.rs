use serde::Serialize;

use crate::model::PhotoId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Destructive,
}

/// User-facing outcome of an action (the "toast").
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub title: String,
    pub description: String,
    pub severity: Severity,
}

impl Notification {
    pub fn info(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            severity: Severity::Info,
        }
    }

    pub fn destructive(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            severity: Severity::Destructive,
        }
    }
}

fn counted(n: usize, noun: &str) -> String {
    if n == 1 {
        format!("1 {noun}")
    } else {
        format!("{n} {noun}s")
    }
}

/// `1 photo`, `3 photos`.
pub(crate) fn photos_phrase(n: usize) -> String {
    counted(n, "photo")
}

pub(crate) fn files_phrase(n: usize) -> String {
    counted(n, "file")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlideshowCommand {
    Next,
    Prev,
    Play,
    Pause,
    TogglePlay,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlideChanged {
    pub index: usize,
    pub photo: PhotoId,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadEvent {
    Progress(u8),
    Finished(Notification),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phrases_agree_in_number() {
        assert_eq!(photos_phrase(0), "0 photos");
        assert_eq!(photos_phrase(1), "1 photo");
        assert_eq!(files_phrase(1), "1 file");
        assert_eq!(files_phrase(12), "12 files");
    }
}
