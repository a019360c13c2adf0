//! Seedable sample collection used by the CLI and the integration tests.

use chrono::{DateTime, NaiveDate, TimeDelta, Utc};
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};
use serde::Deserialize;
use tracing::{debug, info};

use crate::error::Error;
use crate::library::{LibraryParts, PhotoLibrary};
use crate::model::{
    Album, AlbumId, AlbumKind, CaptureMetadata, Category, CategoryId, CategoryKind, Dimensions,
    Memory, MemoryId, MemoryKind, Permission, Photo, PhotoId, SharedAlbum, SharedAlbumId,
};

pub const OWNER: &str = "you@email.com";

const LOCATIONS: &[&str] = &[
    "Mountain View, CA",
    "San Francisco, CA",
    "New York, NY",
    "Seattle, WA",
    "Chicago, IL",
    "Los Angeles, CA",
    "Miami, FL",
    "Austin, TX",
    "Portland, OR",
    "Denver, CO",
];

const CAMERAS: &[&str] = &[
    "iPhone 14 Pro",
    "Canon EOS R5",
    "Sony A7 IV",
    "Nikon D850",
    "Google Pixel 7",
    "Samsung Galaxy S23",
];

const TAGS: &[&str] = &[
    "sunset",
    "portrait",
    "landscape",
    "nature",
    "city",
    "food",
    "travel",
    "family",
    "friends",
    "beach",
    "mountain",
    "winter",
    "summer",
    "birthday",
    "wedding",
    "vacation",
    "selfie",
    "art",
    "architecture",
    "street",
];

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct DatasetOptions {
    /// Number of photos to generate.
    pub photo_count: usize,
    /// Deterministic seed; `None` draws one from the OS.
    pub seed: Option<u64>,
    /// Calendar year every capture date falls in.
    pub year: i32,
}

impl DatasetOptions {
    const fn default_photo_count() -> usize {
        200
    }

    const fn default_year() -> i32 {
        2024
    }
}

impl Default for DatasetOptions {
    fn default() -> Self {
        Self {
            photo_count: Self::default_photo_count(),
            seed: None,
            year: Self::default_year(),
        }
    }
}

/// Build a populated library.
///
/// For 200 photos, indices 180..190 are trashed and 190..195 archived; other
/// sizes keep the same proportions.
///
/// # Errors
/// Returns [`Error::Validation`] if `options.year` is out of range.
pub fn generate(options: &DatasetOptions, now: DateTime<Utc>) -> Result<PhotoLibrary, Error> {
    let mut rng = match options.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    if NaiveDate::from_ymd_opt(options.year, 1, 1).is_none() {
        return Err(Error::validation(format!(
            "dataset year {} is out of range",
            options.year
        )));
    }

    let n = options.photo_count;
    let trashed = (n * 180 / 200)..(n * 190 / 200);
    let archived = (n * 190 / 200)..(n * 195 / 200);
    let expiring = n / 4;

    let mut photos = Vec::with_capacity(n);
    for i in 0..n {
        let mut photo = sample_photo(&mut rng, i, options.year)?;
        if i < expiring {
            photo.expires_on = Some(now + TimeDelta::days(7));
        }
        if trashed.contains(&i) {
            photo.trashed = true;
            photo.trashed_at = Some(now - random_age(&mut rng, 30));
        }
        if archived.contains(&i) {
            photo.archived = true;
            photo.archived_at = Some(now - random_age(&mut rng, 60));
        }
        photos.push(photo);
    }
    debug!(
        count = n,
        trashed = trashed.len(),
        archived = archived.len(),
        "sample photos generated"
    );

    let active: Vec<&Photo> = photos.iter().filter(|p| p.is_active()).collect();
    let albums = sample_albums(&active, now);
    let memories = sample_memories(&active, now);
    let categories = sample_categories(&active);
    let shared_albums = sample_shares();
    info!(
        photos = photos.len(),
        albums = albums.len(),
        seed = ?options.seed,
        "sample library ready"
    );

    PhotoLibrary::new(LibraryParts {
        owner: OWNER.to_string(),
        photos,
        albums,
        shared_albums,
        memories,
        categories,
    })
}

fn random_age(rng: &mut StdRng, max_days: i64) -> TimeDelta {
    TimeDelta::seconds(rng.random_range(0..max_days * 24 * 60 * 60))
}

fn pick(rng: &mut StdRng, from: &[&str]) -> String {
    from.choose(rng).copied().unwrap_or_default().to_string()
}

fn sample_photo(rng: &mut StdRng, i: usize, year: i32) -> Result<Photo, Error> {
    let month = rng.random_range(1..=12);
    let day = rng.random_range(1..=28);
    let captured_at = NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
        .ok_or_else(|| Error::validation(format!("no such date {year}-{month}-{day}")))?;

    let mut photo = Photo::new(PhotoId(i as u32 + 1), format!("Photo {}", i + 1), captured_at);
    photo.src = format!("https://picsum.photos/seed/photo{i}/800/600");
    photo.favorite = rng.random_bool(0.15);
    photo.location = pick(rng, LOCATIONS);
    photo.size_bytes = rng.random_range(1_000_000..6_000_000);
    photo.dimensions = Dimensions {
        width: rng.random_range(800..1200),
        height: rng.random_range(600..1000),
    };
    photo.metadata = CaptureMetadata {
        camera: rng.random_bool(0.7).then(|| pick(rng, CAMERAS)),
        iso: rng
            .random_bool(0.5)
            .then(|| rng.random_range(100..3300)),
        aperture: rng
            .random_bool(0.5)
            .then(|| format!("f/{:.1}", rng.random_range(1.0..6.0_f64))),
        shutter_speed: rng
            .random_bool(0.5)
            .then(|| format!("1/{}", rng.random_range(10..1010_u32))),
    };
    let tag_count = rng.random_range(1..=4);
    let tags: Vec<String> = (0..tag_count).map(|_| pick(rng, TAGS)).collect();
    photo.set_tags(tags);
    Ok(photo)
}

fn ids_where(active: &[&Photo], keep: impl Fn(&Photo) -> bool) -> Vec<PhotoId> {
    active.iter().filter(|p| keep(p)).map(|p| p.id).collect()
}

fn tagged(active: &[&Photo], tags: &[&str]) -> Vec<PhotoId> {
    ids_where(active, |p| tags.iter().any(|t| p.has_tag(t)))
}

fn fixed(date: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(date)
        .map(|d| d.with_timezone(&Utc))
        .unwrap_or_default()
}

fn seed_url(seed: &str, size: &str) -> String {
    format!("https://picsum.photos/seed/{seed}/{size}")
}

fn sample_albums(active: &[&Photo], now: DateTime<Utc>) -> Vec<Album> {
    let user = |id: u32,
                name: &str,
                description: &str,
                cover: &str,
                photo_ids: Vec<PhotoId>,
                created: &str,
                updated: &str,
                shared_with: &[&str]| Album {
        id: AlbumId(id),
        name: name.to_string(),
        description: Some(description.to_string()),
        cover: seed_url(cover, "400/400"),
        photo_ids,
        created_at: fixed(created),
        updated_at: fixed(updated),
        shared: !shared_with.is_empty(),
        shared_with: shared_with.iter().map(|s| s.to_string()).collect(),
        kind: AlbumKind::User,
    };

    let favorites = ids_where(active, |p| p.favorite);
    let favorites_cover = active
        .iter()
        .find(|p| p.favorite)
        .map(|p| p.src.clone())
        .unwrap_or_else(|| seed_url("album1", "400/400"));

    vec![
        Album {
            id: AlbumId(1),
            name: "Favorites".to_string(),
            description: Some("Your favorite photos".to_string()),
            cover: favorites_cover,
            photo_ids: favorites,
            created_at: fixed("2024-01-01T00:00:00Z"),
            updated_at: now,
            shared: false,
            shared_with: Vec::new(),
            kind: AlbumKind::System,
        },
        user(
            2,
            "Travel Adventures",
            "Photos from amazing trips around the world",
            "travel",
            tagged(active, &["travel"]),
            "2024-02-15T00:00:00Z",
            "2024-03-20T00:00:00Z",
            &["friend1@email.com", "family@email.com"],
        ),
        user(
            3,
            "Family Moments",
            "Precious family memories",
            "family",
            tagged(active, &["family"]),
            "2024-01-10T00:00:00Z",
            "2024-07-15T00:00:00Z",
            &[],
        ),
        user(
            4,
            "Nature & Landscapes",
            "Beautiful natural scenery",
            "nature",
            tagged(active, &["nature", "landscape"]),
            "2024-03-05T00:00:00Z",
            "2024-06-30T00:00:00Z",
            &[],
        ),
        user(
            5,
            "Food & Dining",
            "Delicious meals and culinary experiences",
            "food",
            tagged(active, &["food"]),
            "2024-04-12T00:00:00Z",
            "2024-07-20T00:00:00Z",
            &["foodie@email.com"],
        ),
        user(
            6,
            "Special Events",
            "Birthdays, weddings, and celebrations",
            "events",
            tagged(active, &["birthday", "wedding"]),
            "2024-05-01T00:00:00Z",
            "2024-07-25T00:00:00Z",
            &[],
        ),
        Album {
            id: AlbumId(7),
            name: "John's Vacation".to_string(),
            description: Some("Shared album from John's recent trip".to_string()),
            cover: seed_url("shared1", "400/400"),
            photo_ids: active.iter().skip(50).take(20).map(|p| p.id).collect(),
            created_at: fixed("2024-05-25T00:00:00Z"),
            updated_at: fixed("2024-06-10T00:00:00Z"),
            shared: true,
            shared_with: vec![OWNER.to_string()],
            kind: AlbumKind::Shared,
        },
    ]
}

fn sample_shares() -> Vec<SharedAlbum> {
    vec![
        SharedAlbum {
            id: SharedAlbumId(1),
            album_id: AlbumId(2),
            shared_by: OWNER.to_string(),
            shared_with: vec!["friend1@email.com".into(), "family@email.com".into()],
            permission: Permission::Contribute,
            shared_at: fixed("2024-02-20T00:00:00Z"),
            invite_link: Some("https://photos.app/shared/abc123".into()),
        },
        SharedAlbum {
            id: SharedAlbumId(2),
            album_id: AlbumId(5),
            shared_by: OWNER.to_string(),
            shared_with: vec!["foodie@email.com".into()],
            permission: Permission::View,
            shared_at: fixed("2024-04-15T00:00:00Z"),
            invite_link: Some("https://photos.app/shared/def456".into()),
        },
        SharedAlbum {
            id: SharedAlbumId(3),
            album_id: AlbumId(7),
            shared_by: "friend@email.com".into(),
            shared_with: vec![OWNER.to_string()],
            permission: Permission::Contribute,
            shared_at: fixed("2024-06-01T00:00:00Z"),
            invite_link: None,
        },
    ]
}

fn sample_memories(active: &[&Photo], now: DateTime<Utc>) -> Vec<Memory> {
    let first = |ids: Vec<PhotoId>, limit: usize| -> Vec<PhotoId> {
        ids.into_iter().take(limit).collect()
    };
    vec![
        Memory {
            id: MemoryId(1),
            title: "This Day Last Year".into(),
            description: "Photos from exactly one year ago".into(),
            cover: seed_url("memory1", "600/400"),
            photo_ids: active.iter().take(12).map(|p| p.id).collect(),
            date: now - TimeDelta::days(365),
            kind: MemoryKind::Anniversary,
        },
        Memory {
            id: MemoryId(2),
            title: "Summer Memories".into(),
            description: "Your best summer moments".into(),
            cover: seed_url("summer", "600/400"),
            photo_ids: first(tagged(active, &["summer"]), 25),
            date: fixed("2024-08-15T00:00:00Z"),
            kind: MemoryKind::Seasonal,
        },
        Memory {
            id: MemoryId(3),
            title: "Weekend Trip to Mountains".into(),
            description: "Adventure in the great outdoors".into(),
            cover: seed_url("mountain", "600/400"),
            photo_ids: first(tagged(active, &["mountain"]), 18),
            date: fixed("2024-06-20T00:00:00Z"),
            kind: MemoryKind::Trip,
        },
        Memory {
            id: MemoryId(4),
            title: "Birthday Celebration".into(),
            description: "Special moments from the birthday party".into(),
            cover: seed_url("birthday", "600/400"),
            photo_ids: first(tagged(active, &["birthday"]), 15),
            date: fixed("2024-03-10T00:00:00Z"),
            kind: MemoryKind::Event,
        },
    ]
}

fn sample_categories(active: &[&Photo]) -> Vec<Category> {
    let category = |id: u32, name: &str, cover: &str, photo_ids, kind| Category {
        id: CategoryId(id),
        name: name.to_string(),
        cover: seed_url(cover, "300/300"),
        photo_ids,
        kind,
    };
    let animals: Vec<PhotoId> = active
        .iter()
        .step_by(8)
        .take(25)
        .map(|p| p.id)
        .collect();
    vec![
        category(1, "People", "people", tagged(active, &["portrait", "selfie"]), CategoryKind::People),
        category(2, "Places", "places", tagged(active, &["city", "travel"]), CategoryKind::Places),
        category(3, "Things", "things", tagged(active, &["art", "architecture"]), CategoryKind::Things),
        category(4, "Animals", "animals", animals, CategoryKind::Animals),
        category(5, "Food", "food-cat", tagged(active, &["food"]), CategoryKind::Food),
        category(6, "Events", "events-cat", tagged(active, &["wedding", "birthday"]), CategoryKind::Events),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 9, 1, 12, 0, 0).unwrap()
    }

    fn seeded(seed: u64) -> PhotoLibrary {
        let options = DatasetOptions {
            seed: Some(seed),
            ..DatasetOptions::default()
        };
        generate(&options, now()).unwrap()
    }

    #[test]
    fn same_seed_same_library() {
        let a = seeded(7);
        let b = seeded(7);
        assert_eq!(a.photos(), b.photos());
        assert_eq!(a.albums(), b.albums());
    }

    #[test]
    fn lifecycle_slices_match_default_size() {
        let lib = seeded(1);
        assert_eq!(lib.photos().len(), 200);
        let trashed: Vec<u32> = lib.trashed_photos().iter().map(|p| p.id.0).collect();
        assert_eq!(trashed, (181..=190).collect::<Vec<_>>());
        assert_eq!(lib.archived_photos().len(), 5);
        assert_eq!(lib.active_photos().len(), 185);
        assert!(lib.photos().iter().all(|p| !(p.trashed && p.archived)));
    }

    #[test]
    fn memberships_only_reference_active_photos() {
        let lib = seeded(3);
        for album in lib.albums() {
            for id in &album.photo_ids {
                assert!(lib.photo(*id).unwrap().is_active(), "album {}", album.id);
            }
        }
        let shared = lib.album(AlbumId(7)).unwrap();
        assert_eq!(shared.count(), 20);
        assert_eq!(lib.shared_with_me().len(), 1);
        assert_eq!(lib.shared_by_me().len(), 2);
    }

    #[test]
    fn capture_dates_fall_in_configured_year() {
        let options = DatasetOptions {
            photo_count: 40,
            seed: Some(9),
            year: 2021,
        };
        let lib = generate(&options, now()).unwrap();
        assert_eq!(lib.photos().len(), 40);
        assert!(lib
            .photos()
            .iter()
            .all(|p| p.captured_at.format("%Y").to_string() == "2021"));
    }

    #[test]
    fn out_of_range_year_is_rejected() {
        let options = DatasetOptions {
            year: 400_000,
            ..DatasetOptions::default()
        };
        assert!(generate(&options, now()).is_err());
    }
}
