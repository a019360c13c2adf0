//! The in-memory repository.
//!
//! A [`PhotoLibrary`] is built once at start-up and passed by reference to
//! everything that reads or mutates the collection. Nothing is persisted.

use std::collections::{BTreeSet, HashSet};
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use chrono_tz::Tz;
use serde::Serialize;
use tracing::{debug, info};

use crate::dates;
use crate::error::Error;
use crate::events::{Notification, photos_phrase};
use crate::grouping::{MonthGroup, group_by_expiry, group_by_month};
use crate::model::{
    Album, AlbumId, AlbumKind, Category, CategoryId, CategoryKind, Memory, MemoryId, Permission,
    Photo, PhotoId, SharedAlbum, SharedAlbumId,
};
use crate::query::{self, PhotoQuery, Scope, locale_cmp};
use crate::search;

/// Default trash retention before [`PhotoLibrary::purge_expired`] removes a photo.
pub const DEFAULT_TRASH_RETENTION: Duration = Duration::from_secs(60 * 24 * 60 * 60);

/// Raw entity lists a library is assembled from.
#[derive(Debug, Clone, Default)]
pub struct LibraryParts {
    pub owner: String,
    pub photos: Vec<Photo>,
    pub albums: Vec<Album>,
    pub shared_albums: Vec<SharedAlbum>,
    pub memories: Vec<Memory>,
    pub categories: Vec<Category>,
}

/// Input for [`PhotoLibrary::create_album`].
#[derive(Debug, Clone, Default)]
pub struct NewAlbum {
    pub name: String,
    pub description: Option<String>,
    pub photo_ids: Vec<PhotoId>,
}

/// Distinct values offered by the filter menu, each sorted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterOptions {
    pub tags: Vec<String>,
    pub locations: Vec<String>,
    pub cameras: Vec<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AlbumSort {
    Name,
    #[default]
    UpdatedNewest,
    CountDescending,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AlbumQuery {
    pub search: Option<String>,
    pub kind: Option<AlbumKind>,
    pub sort: AlbumSort,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct LibraryStats {
    pub total: usize,
    pub favorites: usize,
    pub locations: usize,
    pub this_month: usize,
    pub total_bytes: u64,
    pub trashed: usize,
    pub archived: usize,
}

#[derive(Debug)]
pub struct PhotoLibrary {
    owner: String,
    photos: Vec<Photo>,
    albums: Vec<Album>,
    shared_albums: Vec<SharedAlbum>,
    memories: Vec<Memory>,
    categories: Vec<Category>,
}

impl PhotoLibrary {
    /// Assemble a library, rejecting duplicate photo identifiers.
    ///
    /// # Errors
    /// Returns [`Error::Validation`] if two photos share an id.
    pub fn new(parts: LibraryParts) -> Result<Self, Error> {
        let mut seen = HashSet::with_capacity(parts.photos.len());
        for photo in &parts.photos {
            if !seen.insert(photo.id) {
                return Err(Error::validation(format!("duplicate photo id {}", photo.id)));
            }
        }
        info!(
            photos = parts.photos.len(),
            albums = parts.albums.len(),
            memories = parts.memories.len(),
            categories = parts.categories.len(),
            "library assembled"
        );
        Ok(Self {
            owner: parts.owner,
            photos: parts.photos,
            albums: parts.albums,
            shared_albums: parts.shared_albums,
            memories: parts.memories,
            categories: parts.categories,
        })
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    // ---- lookups -------------------------------------------------------

    pub fn photo(&self, id: PhotoId) -> Option<&Photo> {
        self.photos.iter().find(|p| p.id == id)
    }

    pub fn album(&self, id: AlbumId) -> Option<&Album> {
        self.albums.iter().find(|a| a.id == id)
    }

    pub fn memory(&self, id: MemoryId) -> Option<&Memory> {
        self.memories.iter().find(|m| m.id == id)
    }

    pub fn category(&self, id: CategoryId) -> Option<&Category> {
        self.categories.iter().find(|c| c.id == id)
    }

    pub fn category_by_kind(&self, kind: CategoryKind) -> Option<&Category> {
        self.categories.iter().find(|c| c.kind == kind)
    }

    pub fn shared_album_for(&self, album: AlbumId) -> Option<&SharedAlbum> {
        self.shared_albums.iter().find(|s| s.album_id == album)
    }

    /// # Errors
    /// Returns [`Error::NotFound`] for an unknown id.
    pub fn require_photo(&self, id: PhotoId) -> Result<&Photo, Error> {
        self.photo(id)
            .ok_or_else(|| Error::not_found(PhotoId::KIND, id.0))
    }

    /// # Errors
    /// Returns [`Error::NotFound`] for an unknown id.
    pub fn require_album(&self, id: AlbumId) -> Result<&Album, Error> {
        self.album(id)
            .ok_or_else(|| Error::not_found(AlbumId::KIND, id.0))
    }

    /// # Errors
    /// Returns [`Error::NotFound`] for an unknown id.
    pub fn require_memory(&self, id: MemoryId) -> Result<&Memory, Error> {
        self.memory(id)
            .ok_or_else(|| Error::not_found(MemoryId::KIND, id.0))
    }

    // ---- views ---------------------------------------------------------

    pub fn photos(&self) -> &[Photo] {
        &self.photos
    }

    pub fn albums(&self) -> &[Album] {
        &self.albums
    }

    pub fn shared_albums(&self) -> &[SharedAlbum] {
        &self.shared_albums
    }

    pub fn memories(&self) -> &[Memory] {
        &self.memories
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// Photos that are neither archived nor trashed, in library order.
    pub fn active_photos(&self) -> Vec<&Photo> {
        self.photos.iter().filter(|p| p.is_active()).collect()
    }

    pub fn favorite_photos(&self) -> Vec<&Photo> {
        self.photos
            .iter()
            .filter(|p| p.is_active() && p.favorite)
            .collect()
    }

    pub fn trashed_photos(&self) -> Vec<&Photo> {
        self.photos.iter().filter(|p| p.trashed).collect()
    }

    pub fn archived_photos(&self) -> Vec<&Photo> {
        self.photos.iter().filter(|p| p.archived).collect()
    }

    /// Active members of an album, in library order. Unknown album: empty.
    pub fn photos_in_album(&self, id: AlbumId) -> Vec<&Photo> {
        self.album(id)
            .map(|a| self.active_members(&a.photo_ids))
            .unwrap_or_default()
    }

    pub fn memory_photos(&self, id: MemoryId) -> Vec<&Photo> {
        self.memory(id)
            .map(|m| self.active_members(&m.photo_ids))
            .unwrap_or_default()
    }

    pub fn photos_in_category(&self, kind: CategoryKind) -> Vec<&Photo> {
        self.category_by_kind(kind)
            .map(|c| self.active_members(&c.photo_ids))
            .unwrap_or_default()
    }

    fn active_members(&self, ids: &[PhotoId]) -> Vec<&Photo> {
        let ids: HashSet<PhotoId> = ids.iter().copied().collect();
        self.photos
            .iter()
            .filter(|p| p.is_active() && ids.contains(&p.id))
            .collect()
    }

    /// Albums whose membership list contains `photo`, in album order.
    pub fn album_ids_of(&self, photo: PhotoId) -> Vec<AlbumId> {
        self.albums
            .iter()
            .filter(|a| a.contains(photo))
            .map(|a| a.id)
            .collect()
    }

    /// Membership list behind a scope; `None` if the scope id is unknown.
    pub fn scope_members(&self, scope: Scope) -> Option<&[PhotoId]> {
        match scope {
            Scope::Album(id) => self.album(id).map(|a| a.photo_ids.as_slice()),
            Scope::Category(id) => self.category(id).map(|c| c.photo_ids.as_slice()),
            Scope::Memory(id) => self.memory(id).map(|m| m.photo_ids.as_slice()),
        }
    }

    // ---- queries -------------------------------------------------------

    /// Run a photo query over the active collection.
    ///
    /// An unknown scope yields an empty list.
    pub fn query(&self, params: &PhotoQuery, now: DateTime<Utc>) -> Vec<&Photo> {
        let members = match params.scope {
            Some(scope) => match self.scope_members(scope) {
                Some(ids) => Some(ids),
                None => {
                    debug!(?scope, "query scope not found");
                    return Vec::new();
                }
            },
            None => None,
        };
        query::query(
            self.photos.iter().filter(|p| p.is_active()),
            members,
            params,
            now,
        )
    }

    /// [`PhotoLibrary::query`] followed by month grouping.
    pub fn grouped(&self, params: &PhotoQuery, now: DateTime<Utc>, tz: Tz) -> Vec<MonthGroup<'_>> {
        group_by_month(&self.query(params, now), tz)
    }

    /// Trashed photos grouped by expiry month, undated ones last.
    pub fn grouped_trash(&self, tz: Tz) -> Vec<MonthGroup<'_>> {
        group_by_expiry(&self.trashed_photos(), tz)
    }

    /// Free-text search over active photos; a blank query returns nothing.
    pub fn search(&self, text: &str) -> Vec<&Photo> {
        let Some(needle) = search::normalize(text) else {
            return Vec::new();
        };
        self.photos
            .iter()
            .filter(|p| p.is_active() && search::matches(p, &needle))
            .collect()
    }

    pub fn filter_options(&self) -> FilterOptions {
        let mut tags = BTreeSet::new();
        let mut locations = BTreeSet::new();
        let mut cameras = BTreeSet::new();
        for photo in self.photos.iter().filter(|p| p.is_active()) {
            tags.extend(photo.tags().iter().cloned());
            if !photo.location.is_empty() {
                locations.insert(photo.location.clone());
            }
            if let Some(camera) = photo.camera() {
                cameras.insert(camera.to_string());
            }
        }
        FilterOptions {
            tags: tags.into_iter().collect(),
            locations: locations.into_iter().collect(),
            cameras: cameras.into_iter().collect(),
        }
    }

    pub fn query_albums(&self, params: &AlbumQuery) -> Vec<&Album> {
        let needle = params.search.as_deref().and_then(search::normalize);
        let mut out: Vec<&Album> = self
            .albums
            .iter()
            .filter(|a| {
                needle.as_deref().is_none_or(|n| {
                    a.name.to_lowercase().contains(n)
                        || a
                            .description
                            .as_deref()
                            .is_some_and(|d| d.to_lowercase().contains(n))
                })
            })
            .filter(|a| params.kind.is_none_or(|k| a.kind == k))
            .collect();
        out.sort_by(|a, b| match params.sort {
            AlbumSort::Name => locale_cmp(&a.name, &b.name),
            AlbumSort::UpdatedNewest => b.updated_at.cmp(&a.updated_at),
            AlbumSort::CountDescending => b.count().cmp(&a.count()),
        });
        out
    }

    /// User albums the owner has shared with others.
    pub fn shared_by_me(&self) -> Vec<&Album> {
        self.albums
            .iter()
            .filter(|a| a.shared && a.kind == AlbumKind::User)
            .collect()
    }

    /// Albums other people shared with the owner.
    pub fn shared_with_me(&self) -> Vec<&Album> {
        self.albums
            .iter()
            .filter(|a| a.kind == AlbumKind::Shared)
            .collect()
    }

    pub fn statistics(&self, now: DateTime<Utc>, tz: Tz) -> LibraryStats {
        let active: Vec<&Photo> = self.photos.iter().filter(|p| p.is_active()).collect();
        let locations: HashSet<&str> = active
            .iter()
            .map(|p| p.location.as_str())
            .filter(|l| !l.is_empty())
            .collect();
        LibraryStats {
            total: active.len(),
            favorites: active.iter().filter(|p| p.favorite).count(),
            locations: locations.len(),
            this_month: active
                .iter()
                .filter(|p| dates::same_month(p.captured_at, now, tz))
                .count(),
            total_bytes: active.iter().map(|p| p.size_bytes).sum(),
            trashed: self.photos.iter().filter(|p| p.trashed).count(),
            archived: self.photos.iter().filter(|p| p.archived).count(),
        }
    }

    // ---- mutations -----------------------------------------------------

    fn check_ids(&self, ids: &[PhotoId]) -> Result<(), Error> {
        for id in ids {
            self.require_photo(*id)?;
        }
        Ok(())
    }

    fn photo_mut(&mut self, id: PhotoId) -> Result<&mut Photo, Error> {
        self.photos
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| Error::not_found(PhotoId::KIND, id.0))
    }

    fn album_mut(&mut self, id: AlbumId) -> Result<&mut Album, Error> {
        self.albums
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or_else(|| Error::not_found(AlbumId::KIND, id.0))
    }

    /// # Errors
    /// Returns [`Error::NotFound`] for an unknown id.
    pub fn toggle_favorite(&mut self, id: PhotoId) -> Result<Notification, Error> {
        let photo = self.photo_mut(id)?;
        photo.favorite = !photo.favorite;
        let favorite = photo.favorite;
        debug!(photo = %id, favorite, "favorite toggled");
        Ok(if favorite {
            Notification::info("Added to favorites", "Photo added to your favorites")
        } else {
            Notification::info("Removed from favorites", "Photo removed from your favorites")
        })
    }

    /// Move photos to the trash. A trashed photo is never also archived.
    ///
    /// # Errors
    /// Returns [`Error::NotFound`] if any id is unknown; nothing is changed then.
    pub fn trash(&mut self, ids: &[PhotoId], now: DateTime<Utc>) -> Result<Notification, Error> {
        self.check_ids(ids)?;
        for id in ids {
            let photo = self.photo_mut(*id)?;
            photo.trashed = true;
            photo.trashed_at = Some(now);
            photo.archived = false;
            photo.archived_at = None;
        }
        info!(count = ids.len(), "moved to trash");
        Ok(Notification::info(
            "Moved to trash",
            format!("{} moved to trash", photos_phrase(ids.len())),
        ))
    }

    /// # Errors
    /// Returns [`Error::NotFound`] if any id is unknown; nothing is changed then.
    pub fn restore(&mut self, ids: &[PhotoId]) -> Result<Notification, Error> {
        self.check_ids(ids)?;
        for id in ids {
            let photo = self.photo_mut(*id)?;
            photo.trashed = false;
            photo.trashed_at = None;
        }
        info!(count = ids.len(), "restored from trash");
        Ok(Notification::info(
            "Photos restored",
            format!("{} restored successfully", photos_phrase(ids.len())),
        ))
    }

    /// Remove trashed photos for good, including from every membership list.
    ///
    /// # Errors
    /// [`Error::NotFound`] for unknown ids, [`Error::Validation`] if a photo is
    /// not in the trash. Nothing is changed on error.
    pub fn delete_permanently(&mut self, ids: &[PhotoId]) -> Result<Notification, Error> {
        for id in ids {
            if !self.require_photo(*id)?.trashed {
                return Err(Error::validation(format!(
                    "photo {id} must be in the trash before it can be deleted"
                )));
            }
        }
        let doomed: HashSet<PhotoId> = ids.iter().copied().collect();
        self.photos.retain(|p| !doomed.contains(&p.id));
        for album in &mut self.albums {
            album.photo_ids.retain(|id| !doomed.contains(id));
        }
        for memory in &mut self.memories {
            memory.photo_ids.retain(|id| !doomed.contains(id));
        }
        for category in &mut self.categories {
            category.photo_ids.retain(|id| !doomed.contains(id));
        }
        info!(count = doomed.len(), "permanently deleted");
        Ok(Notification::destructive(
            "Photos permanently deleted",
            format!("{} permanently deleted", photos_phrase(doomed.len())),
        ))
    }

    /// # Errors
    /// Returns [`Error::NotFound`] if any id is unknown; nothing is changed then.
    pub fn archive(&mut self, ids: &[PhotoId], now: DateTime<Utc>) -> Result<Notification, Error> {
        self.check_ids(ids)?;
        for id in ids {
            let photo = self.photo_mut(*id)?;
            photo.archived = true;
            photo.archived_at = Some(now);
            photo.trashed = false;
            photo.trashed_at = None;
        }
        info!(count = ids.len(), "archived");
        Ok(Notification::info(
            "Photos archived",
            format!("{} moved to the archive", photos_phrase(ids.len())),
        ))
    }

    /// # Errors
    /// Returns [`Error::NotFound`] if any id is unknown; nothing is changed then.
    pub fn unarchive(&mut self, ids: &[PhotoId]) -> Result<Notification, Error> {
        self.check_ids(ids)?;
        for id in ids {
            let photo = self.photo_mut(*id)?;
            photo.archived = false;
            photo.archived_at = None;
        }
        info!(count = ids.len(), "unarchived");
        Ok(Notification::info(
            "Photos unarchived",
            format!("{} moved back to your library", photos_phrase(ids.len())),
        ))
    }

    /// Permanently delete trashed photos that have sat in the trash for at
    /// least `retention`. Archived photos are never purged.
    ///
    /// # Errors
    /// Propagates any failure of the underlying permanent delete; nothing is
    /// removed in that case.
    pub fn purge_expired(
        &mut self,
        now: DateTime<Utc>,
        retention: Duration,
    ) -> Result<Vec<PhotoId>, Error> {
        let retention = TimeDelta::from_std(retention).unwrap_or(TimeDelta::MAX);
        let expired: Vec<PhotoId> = self
            .photos
            .iter()
            .filter(|p| p.trashed)
            .filter(|p| {
                p.trashed_at
                    .is_some_and(|at| now.signed_duration_since(at) >= retention)
            })
            .map(|p| p.id)
            .collect();
        if expired.is_empty() {
            debug!("nothing to purge");
            return Ok(expired);
        }
        self.delete_permanently(&expired)?;
        info!(count = expired.len(), "purged expired trash");
        Ok(expired)
    }

    /// Create a user album from a selection.
    ///
    /// The cover is the first selected photo in library order.
    ///
    /// # Errors
    /// [`Error::Validation`] for a blank name or empty selection,
    /// [`Error::NotFound`] for unknown photo ids.
    pub fn create_album(
        &mut self,
        album: NewAlbum,
        now: DateTime<Utc>,
    ) -> Result<(AlbumId, Notification), Error> {
        let name = album.name.trim();
        if name.is_empty() {
            return Err(Error::validation("album name required"));
        }
        if album.photo_ids.is_empty() {
            return Err(Error::validation("select at least one photo for the album"));
        }
        self.check_ids(&album.photo_ids)?;

        let mut photo_ids: Vec<PhotoId> = Vec::with_capacity(album.photo_ids.len());
        for id in album.photo_ids {
            if !photo_ids.contains(&id) {
                photo_ids.push(id);
            }
        }
        let cover = self
            .photos
            .iter()
            .find(|p| photo_ids.contains(&p.id))
            .map(|p| p.src.clone())
            .unwrap_or_default();
        let id = AlbumId(self.albums.iter().map(|a| a.id.0).max().unwrap_or(0) + 1);
        let count = photo_ids.len();
        let description = album
            .description
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty());

        self.albums.push(Album {
            id,
            name: name.to_string(),
            description,
            cover,
            photo_ids,
            created_at: now,
            updated_at: now,
            shared: false,
            shared_with: Vec::new(),
            kind: AlbumKind::User,
        });
        info!(album = %id, count, "album created");
        Ok((
            id,
            Notification::info(
                "Album created successfully!",
                format!("\"{name}\" created with {}", photos_phrase(count)),
            ),
        ))
    }

    /// # Errors
    /// [`Error::NotFound`] for an unknown album or photo.
    pub fn add_to_album(
        &mut self,
        album: AlbumId,
        ids: &[PhotoId],
        now: DateTime<Utc>,
    ) -> Result<Notification, Error> {
        self.check_ids(ids)?;
        let target = self.album_mut(album)?;
        let mut added = 0;
        for id in ids {
            if !target.photo_ids.contains(id) {
                target.photo_ids.push(*id);
                added += 1;
            }
        }
        target.updated_at = now;
        let name = target.name.clone();
        debug!(album = %album, added, "photos added to album");
        Ok(Notification::info(
            "Added to album",
            format!("{} added to \"{name}\"", photos_phrase(added)),
        ))
    }

    /// # Errors
    /// [`Error::NotFound`] for an unknown album.
    pub fn remove_from_album(
        &mut self,
        album: AlbumId,
        ids: &[PhotoId],
        now: DateTime<Utc>,
    ) -> Result<Notification, Error> {
        let target = self.album_mut(album)?;
        let before = target.photo_ids.len();
        target.photo_ids.retain(|id| !ids.contains(id));
        let removed = before - target.photo_ids.len();
        target.updated_at = now;
        let name = target.name.clone();
        debug!(album = %album, removed, "photos removed from album");
        Ok(Notification::info(
            "Removed from album",
            format!("{} removed from \"{name}\"", photos_phrase(removed)),
        ))
    }

    /// Share an album the owner created. Re-sharing replaces the recipients
    /// and permission of the existing share record.
    ///
    /// # Errors
    /// [`Error::NotFound`] for an unknown album, [`Error::Validation`] for an
    /// album shared with the owner, no recipients, or an address without `@`.
    pub fn share_album(
        &mut self,
        album: AlbumId,
        recipients: &[String],
        permission: Permission,
        now: DateTime<Utc>,
    ) -> Result<Notification, Error> {
        if self.require_album(album)?.kind == AlbumKind::Shared {
            return Err(Error::validation(
                "albums shared with you cannot be shared again",
            ));
        }
        let mut emails: Vec<String> = Vec::new();
        for raw in recipients {
            let email = raw.trim();
            if email.is_empty() || !email.contains('@') {
                return Err(Error::validation(format!("invalid email address '{raw}'")));
            }
            if !emails.iter().any(|e| e == email) {
                emails.push(email.to_string());
            }
        }
        if emails.is_empty() {
            return Err(Error::validation("add at least one recipient"));
        }

        let next_id = SharedAlbumId(
            self.shared_albums
                .iter()
                .map(|s| s.id.0)
                .max()
                .unwrap_or(0)
                + 1,
        );
        let owner = self.owner.clone();
        let target = self.album_mut(album)?;
        target.shared = true;
        target.shared_with = emails.clone();
        target.updated_at = now;
        let name = target.name.clone();

        let invite_link = invite_link(album, now);
        match self.shared_albums.iter_mut().find(|s| s.album_id == album) {
            Some(record) => {
                record.shared_with = emails.clone();
                record.permission = permission;
                record.shared_at = now;
                if record.invite_link.is_none() {
                    record.invite_link = Some(invite_link);
                }
            }
            None => self.shared_albums.push(SharedAlbum {
                id: next_id,
                album_id: album,
                shared_by: owner,
                shared_with: emails.clone(),
                permission,
                shared_at: now,
                invite_link: Some(invite_link),
            }),
        }
        info!(album = %album, recipients = emails.len(), %permission, "album shared");
        Ok(Notification::info(
            "Album shared",
            format!("\"{name}\" shared with {} people", emails.len()),
        ))
    }

    /// # Errors
    /// [`Error::NotFound`] for an unknown album.
    pub fn unshare_album(&mut self, album: AlbumId, now: DateTime<Utc>) -> Result<Notification, Error> {
        let target = self.album_mut(album)?;
        target.shared = false;
        target.shared_with.clear();
        target.updated_at = now;
        let name = target.name.clone();
        self.shared_albums.retain(|s| s.album_id != album);
        info!(album = %album, "album unshared");
        Ok(Notification::info(
            "Sharing stopped",
            format!("\"{name}\" is no longer shared"),
        ))
    }

    /// Remove an album and its share record. Photos stay in the library.
    ///
    /// # Errors
    /// [`Error::NotFound`] for an unknown album.
    pub fn delete_album(&mut self, album: AlbumId) -> Result<Notification, Error> {
        let name = self.require_album(album)?.name.clone();
        self.albums.retain(|a| a.id != album);
        self.shared_albums.retain(|s| s.album_id != album);
        info!(album = %album, "album deleted");
        Ok(Notification::destructive(
            "Album deleted",
            format!("\"{name}\" has been deleted"),
        ))
    }

    /// Copy an album's membership into a new, unshared user album.
    ///
    /// # Errors
    /// [`Error::NotFound`] for an unknown album.
    pub fn duplicate_album(
        &mut self,
        album: AlbumId,
        now: DateTime<Utc>,
    ) -> Result<(AlbumId, Notification), Error> {
        let source = self.require_album(album)?;
        let id = AlbumId(self.albums.iter().map(|a| a.id.0).max().unwrap_or(0) + 1);
        let copy = Album {
            id,
            name: format!("Copy of \"{}\"", source.name),
            description: source.description.clone(),
            cover: source.cover.clone(),
            photo_ids: source.photo_ids.clone(),
            created_at: now,
            updated_at: now,
            shared: false,
            shared_with: Vec::new(),
            kind: AlbumKind::User,
        };
        let description = format!("{} has been created", copy.name);
        self.albums.push(copy);
        info!(album = %id, from = %album, "album duplicated");
        Ok((id, Notification::info("Album duplicated", description)))
    }
}

fn invite_link(album: AlbumId, now: DateTime<Utc>) -> String {
    format!(
        "https://photos.app/shared/{:x}{:x}",
        album.0,
        now.timestamp().unsigned_abs()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
    }

    fn small() -> PhotoLibrary {
        let photos = (1..=4)
            .map(|i| {
                let mut p = Photo::new(PhotoId(i), format!("Photo {i}"), at(2024, 1, i));
                p.src = format!("src-{i}");
                p
            })
            .collect();
        PhotoLibrary::new(LibraryParts {
            owner: "you@email.com".into(),
            photos,
            ..LibraryParts::default()
        })
        .unwrap()
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let p = Photo::new(PhotoId(1), "a", at(2024, 1, 1));
        let err = PhotoLibrary::new(LibraryParts {
            photos: vec![p.clone(), p],
            ..LibraryParts::default()
        })
        .expect_err("duplicate ids");
        assert!(matches!(err, Error::Validation(_)));
    }

    #[test]
    fn trash_clears_archive_and_vice_versa() {
        let mut lib = small();
        let now = at(2024, 2, 1);
        lib.archive(&[PhotoId(1)], now).unwrap();
        lib.trash(&[PhotoId(1)], now).unwrap();
        let p = lib.photo(PhotoId(1)).unwrap();
        assert!(p.trashed && !p.archived && p.archived_at.is_none());
        lib.archive(&[PhotoId(1)], now).unwrap();
        let p = lib.photo(PhotoId(1)).unwrap();
        assert!(p.archived && !p.trashed);
    }

    #[test]
    fn unknown_id_changes_nothing() {
        let mut lib = small();
        let err = lib
            .trash(&[PhotoId(1), PhotoId(99)], at(2024, 2, 1))
            .expect_err("unknown id");
        assert!(matches!(err, Error::NotFound { kind: "photo", id: 99 }));
        assert!(!lib.photo(PhotoId(1)).unwrap().trashed);
    }

    #[test]
    fn create_album_validates_and_keeps_count_in_sync() {
        let mut lib = small();
        let now = at(2024, 2, 1);
        assert!(lib
            .create_album(NewAlbum { name: "  ".into(), photo_ids: vec![PhotoId(1)], ..Default::default() }, now)
            .is_err());
        assert!(lib
            .create_album(NewAlbum { name: "Trip".into(), ..Default::default() }, now)
            .is_err());

        let (id, note) = lib
            .create_album(
                NewAlbum {
                    name: " Trip ".into(),
                    description: Some("   ".into()),
                    photo_ids: vec![PhotoId(3), PhotoId(2), PhotoId(3)],
                },
                now,
            )
            .unwrap();
        let album = lib.album(id).unwrap();
        assert_eq!(album.name, "Trip");
        assert_eq!(album.description, None);
        assert_eq!(album.count(), 2);
        assert_eq!(album.cover, "src-2");
        assert_eq!(note.description, "\"Trip\" created with 2 photos");
        assert_eq!(lib.album_ids_of(PhotoId(3)), vec![id]);
        assert!(lib.album_ids_of(PhotoId(1)).is_empty());
    }

    #[test]
    fn share_requires_valid_recipients() {
        let mut lib = small();
        let now = at(2024, 2, 1);
        let (id, _) = lib
            .create_album(NewAlbum { name: "A".into(), photo_ids: vec![PhotoId(1)], ..Default::default() }, now)
            .unwrap();
        assert!(lib.share_album(id, &[], Permission::View, now).is_err());
        assert!(lib
            .share_album(id, &["not-an-email".into()], Permission::View, now)
            .is_err());

        let to = vec!["a@x.com".to_string(), " a@x.com ".to_string(), "b@x.com".to_string()];
        lib.share_album(id, &to, Permission::Contribute, now).unwrap();
        lib.share_album(id, &to[..1], Permission::Edit, now).unwrap();
        assert_eq!(lib.shared_albums().len(), 1);
        let record = lib.shared_album_for(id).unwrap();
        assert_eq!(record.permission, Permission::Edit);
        assert_eq!(record.shared_with, vec!["a@x.com".to_string()]);
        assert!(record.invite_link.is_some());
        assert_eq!(lib.shared_by_me().len(), 1);

        lib.unshare_album(id, now).unwrap();
        assert!(lib.shared_album_for(id).is_none());
        assert!(lib.shared_by_me().is_empty());
    }

    #[test]
    fn blank_locations_are_not_counted() {
        let mut lib = small();
        let stats = lib.statistics(at(2024, 1, 15), Tz::UTC);
        assert_eq!(stats.locations, 0);
        assert_eq!(stats.locations, lib.filter_options().locations.len());

        lib.photos[0].location = "Paris, France".into();
        lib.photos[1].location = "Paris, France".into();
        assert_eq!(lib.statistics(at(2024, 1, 15), Tz::UTC).locations, 1);
    }
}
