//! Entity records held by the in-memory library.
//!
//! Derived values (album size, the albums a photo belongs to) are never stored
//! on the records; see [`Album::count`] and
//! [`PhotoLibrary::album_ids_of`](crate::library::PhotoLibrary::album_ids_of).

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

macro_rules! id_type {
    ($name:ident, $label:literal) => {
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub u32);

        impl $name {
            pub const KIND: &'static str = $label;
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

id_type!(PhotoId, "photo");
id_type!(AlbumId, "album");
id_type!(SharedAlbumId, "shared album");
id_type!(MemoryId, "memory");
id_type!(CategoryId, "category");

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

/// Optional capture settings; every field may be absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct CaptureMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub camera: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iso: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aperture: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shutter_speed: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Photo {
    pub id: PhotoId,
    /// Display name.
    pub name: String,
    pub src: String,
    pub captured_at: DateTime<Utc>,
    pub favorite: bool,
    pub location: String,
    pub size_bytes: u64,
    pub dimensions: Dimensions,
    pub metadata: CaptureMetadata,
    #[serde(deserialize_with = "deserialize_tags")]
    tags: Vec<String>,
    pub archived: bool,
    pub trashed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_on: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trashed_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub archived_at: Option<DateTime<Utc>>,
}

impl Photo {
    /// A fresh, active photo with no tags or capture metadata.
    pub fn new(id: PhotoId, name: impl Into<String>, captured_at: DateTime<Utc>) -> Self {
        Self {
            id,
            name: name.into(),
            src: String::new(),
            captured_at,
            favorite: false,
            location: String::new(),
            size_bytes: 0,
            dimensions: Dimensions {
                width: 0,
                height: 0,
            },
            metadata: CaptureMetadata::default(),
            tags: Vec::new(),
            archived: false,
            trashed: false,
            expires_on: None,
            trashed_at: None,
            archived_at: None,
        }
    }

    #[must_use]
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.set_tags(tags);
        self
    }

    #[must_use]
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = location.into();
        self
    }

    #[must_use]
    pub fn with_camera(mut self, camera: impl Into<String>) -> Self {
        self.metadata.camera = Some(camera.into());
        self
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    /// Replace the tag set, keeping the first occurrence of each value.
    pub fn set_tags<I, S>(&mut self, tags: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = dedup_tags(tags.into_iter().map(Into::into));
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    pub fn camera(&self) -> Option<&str> {
        self.metadata.camera.as_deref()
    }

    /// Neither archived nor trashed.
    pub const fn is_active(&self) -> bool {
        !self.archived && !self.trashed
    }
}

fn deserialize_tags<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = Vec::<String>::deserialize(deserializer)?;
    Ok(dedup_tags(raw))
}

fn dedup_tags(tags: impl IntoIterator<Item = String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for tag in tags {
        if !out.contains(&tag) {
            out.push(tag);
        }
    }
    out
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlbumKind {
    User,
    System,
    Shared,
}

impl AlbumKind {
    pub const ALL: &'static [Self] = &[Self::User, Self::System, Self::Shared];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::System => "system",
            Self::Shared => "shared",
        }
    }
}

impl fmt::Display for AlbumKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Album {
    pub id: AlbumId,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub cover: String,
    pub photo_ids: Vec<PhotoId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub shared: bool,
    pub shared_with: Vec<String>,
    pub kind: AlbumKind,
}

impl Album {
    /// Number of member photos; always `photo_ids.len()`.
    pub fn count(&self) -> usize {
        self.photo_ids.len()
    }

    pub fn contains(&self, id: PhotoId) -> bool {
        self.photo_ids.contains(&id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Permission {
    View,
    Contribute,
    Edit,
}

impl Permission {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::View => "view",
            Self::Contribute => "contribute",
            Self::Edit => "edit",
        }
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct SharedAlbum {
    pub id: SharedAlbumId,
    pub album_id: AlbumId,
    pub shared_by: String,
    pub shared_with: Vec<String>,
    pub permission: Permission,
    pub shared_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invite_link: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemoryKind {
    Anniversary,
    Trip,
    Event,
    Seasonal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Memory {
    pub id: MemoryId,
    pub title: String,
    pub description: String,
    pub cover: String,
    pub photo_ids: Vec<PhotoId>,
    pub date: DateTime<Utc>,
    pub kind: MemoryKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryKind {
    People,
    Places,
    Things,
    Animals,
    Food,
    Events,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub cover: String,
    pub photo_ids: Vec<PhotoId>,
    pub kind: CategoryKind,
}
