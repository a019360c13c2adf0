//! Derive an ordered, filtered view of a photo collection.
//!
//! Pipeline: scope restriction, free-text search, category filter, stable
//! sort. The source slice is never mutated; the result borrows from it.

use std::cmp::Ordering;
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::model::{AlbumId, CategoryId, MemoryId, Photo, PhotoId};
use crate::search;

/// Default window for [`CategoryFilter::Recent`].
pub const DEFAULT_RECENT_WINDOW: Duration = Duration::from_secs(14 * 24 * 60 * 60);

/// Which photos survive the category step.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", tag = "type", content = "value")]
pub enum CategoryFilter {
    #[default]
    All,
    Favorites,
    /// Captured strictly after `now - recent_window`.
    Recent,
    ByTag(String),
    ByLocation(String),
    ByCamera(String),
}

impl CategoryFilter {
    fn accepts(&self, photo: &Photo, recent_cutoff: DateTime<Utc>) -> bool {
        match self {
            Self::All => true,
            Self::Favorites => photo.favorite,
            Self::Recent => photo.captured_at > recent_cutoff,
            Self::ByTag(tag) => photo.has_tag(tag),
            Self::ByLocation(location) => photo.location == *location,
            Self::ByCamera(camera) => photo.camera() == Some(camera.as_str()),
        }
    }
}

impl FromStr for CategoryFilter {
    type Err = Error;

    /// `all`, `favorites`, `recent`, `tag:<v>`, `location:<v>`, `camera:<v>`.
    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw {
            "all" => return Ok(Self::All),
            "favorites" => return Ok(Self::Favorites),
            "recent" => return Ok(Self::Recent),
            _ => {}
        }
        let (prefix, value) = raw
            .split_once(':')
            .ok_or_else(|| Error::validation(format!("unknown filter '{raw}'")))?;
        if value.is_empty() {
            return Err(Error::validation(format!("filter '{prefix}' needs a value")));
        }
        match prefix {
            "tag" => Ok(Self::ByTag(value.to_string())),
            "location" => Ok(Self::ByLocation(value.to_string())),
            "camera" => Ok(Self::ByCamera(value.to_string())),
            other => Err(Error::validation(format!(
                "unknown filter kind '{other}', expected one of: tag, location, camera"
            ))),
        }
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("all"),
            Self::Favorites => f.write_str("favorites"),
            Self::Recent => f.write_str("recent"),
            Self::ByTag(v) => write!(f, "tag:{v}"),
            Self::ByLocation(v) => write!(f, "location:{v}"),
            Self::ByCamera(v) => write!(f, "camera:{v}"),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortKey {
    #[default]
    NewestFirst,
    OldestFirst,
    NameAscending,
    LocationAscending,
    SizeDescending,
}

impl SortKey {
    const NAMES: &'static [&'static str] = &["newest", "oldest", "name", "location", "size"];

    fn compare(self, a: &Photo, b: &Photo) -> Ordering {
        match self {
            Self::NewestFirst => b.captured_at.cmp(&a.captured_at),
            Self::OldestFirst => a.captured_at.cmp(&b.captured_at),
            Self::NameAscending => locale_cmp(&a.name, &b.name),
            Self::LocationAscending => locale_cmp(&a.location, &b.location),
            Self::SizeDescending => b.size_bytes.cmp(&a.size_bytes),
        }
    }
}

impl FromStr for SortKey {
    type Err = Error;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw {
            "newest" => Ok(Self::NewestFirst),
            "oldest" => Ok(Self::OldestFirst),
            "name" => Ok(Self::NameAscending),
            "location" => Ok(Self::LocationAscending),
            "size" => Ok(Self::SizeDescending),
            other => Err(Error::validation(format!(
                "unknown sort key '{other}', expected one of: {}",
                Self::NAMES.join(", ")
            ))),
        }
    }
}

/// Dictionary-style ordering: letters compare case-insensitively first and
/// lower case sorts before upper case only when the words are otherwise equal.
pub fn locale_cmp(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| b.cmp(a))
}

/// Membership list a query can be restricted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", tag = "type", content = "id")]
pub enum Scope {
    Album(AlbumId),
    Category(CategoryId),
    Memory(MemoryId),
}

/// Query parameters; the default restricts nothing and sorts newest first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhotoQuery {
    pub search: Option<String>,
    pub filter: CategoryFilter,
    pub sort: SortKey,
    pub scope: Option<Scope>,
    pub recent_window: Duration,
}

impl Default for PhotoQuery {
    fn default() -> Self {
        Self {
            search: None,
            filter: CategoryFilter::All,
            sort: SortKey::NewestFirst,
            scope: None,
            recent_window: DEFAULT_RECENT_WINDOW,
        }
    }
}

impl PhotoQuery {
    #[must_use]
    pub fn search(mut self, text: impl Into<String>) -> Self {
        self.search = Some(text.into());
        self
    }

    #[must_use]
    pub fn filter(mut self, filter: CategoryFilter) -> Self {
        self.filter = filter;
        self
    }

    #[must_use]
    pub fn sort(mut self, sort: SortKey) -> Self {
        self.sort = sort;
        self
    }

    #[must_use]
    pub fn scope(mut self, scope: Scope) -> Self {
        self.scope = Some(scope);
        self
    }

    #[must_use]
    pub fn recent_window(mut self, window: Duration) -> Self {
        self.recent_window = window;
        self
    }

    fn recent_cutoff(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        let window = TimeDelta::from_std(self.recent_window).unwrap_or(TimeDelta::MAX);
        now.checked_sub_signed(window)
            .unwrap_or(DateTime::<Utc>::MIN_UTC)
    }
}

/// Run `params` over `source`.
///
/// `members` is the already-resolved scope membership list, if any; the
/// scope step keeps source order. Photos with equal sort keys keep their
/// relative order.
pub fn query<'a, I>(
    source: I,
    members: Option<&[PhotoId]>,
    params: &PhotoQuery,
    now: DateTime<Utc>,
) -> Vec<&'a Photo>
where
    I: IntoIterator<Item = &'a Photo>,
{
    let members: Option<HashSet<PhotoId>> = members.map(|ids| ids.iter().copied().collect());
    let needle = params.search.as_deref().and_then(search::normalize);
    let cutoff = params.recent_cutoff(now);

    let mut out: Vec<&Photo> = source
        .into_iter()
        .filter(|p| members.as_ref().is_none_or(|m| m.contains(&p.id)))
        .filter(|p| needle.as_deref().is_none_or(|n| search::matches(p, n)))
        .filter(|p| params.filter.accepts(p, cutoff))
        .collect();

    // `sort_by` is stable.
    out.sort_by(|a, b| params.sort.compare(a, b));
    out
}
