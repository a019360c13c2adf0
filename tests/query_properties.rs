use std::collections::HashMap;

use chrono::{DateTime, TimeDelta, TimeZone, Utc};
use chrono_tz::Tz;
use photo_library::dataset::{self, DatasetOptions};
use photo_library::model::{Photo, PhotoId};
use photo_library::query::{self, CategoryFilter, PhotoQuery, SortKey};
use photo_library::{PhotoLibrary, group_by_month, search};

const ALL_SORTS: [SortKey; 5] = [
    SortKey::NewestFirst,
    SortKey::OldestFirst,
    SortKey::NameAscending,
    SortKey::LocationAscending,
    SortKey::SizeDescending,
];

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 10, 1, 12, 0, 0).unwrap()
}

fn library(seed: u64) -> PhotoLibrary {
    let options = DatasetOptions {
        seed: Some(seed),
        ..DatasetOptions::default()
    };
    dataset::generate(&options, now()).unwrap()
}

fn ids(photos: &[&Photo]) -> Vec<PhotoId> {
    photos.iter().map(|p| p.id).collect()
}

fn sorted(mut v: Vec<PhotoId>) -> Vec<PhotoId> {
    v.sort();
    v
}

#[test]
fn every_sort_is_a_permutation_of_the_filtered_input() {
    let lib = library(11);
    for filter in [
        CategoryFilter::All,
        CategoryFilter::Favorites,
        CategoryFilter::ByTag("travel".into()),
    ] {
        let unsorted: Vec<PhotoId> = lib
            .active_photos()
            .into_iter()
            .filter(|p| match &filter {
                CategoryFilter::All => true,
                CategoryFilter::Favorites => p.favorite,
                CategoryFilter::ByTag(t) => p.has_tag(t),
                _ => unreachable!(),
            })
            .map(|p| p.id)
            .collect();
        for sort in ALL_SORTS {
            let q = PhotoQuery::default().filter(filter.clone()).sort(sort);
            let got = ids(&lib.query(&q, now()));
            assert_eq!(sorted(got), sorted(unsorted.clone()), "{filter} / {sort:?}");
        }
    }
}

#[test]
fn same_query_twice_gives_same_answer() {
    let lib = library(12);
    let q = PhotoQuery::default()
        .search("a")
        .filter(CategoryFilter::ByLocation("Seattle, WA".into()))
        .sort(SortKey::NameAscending);
    let first = ids(&lib.query(&q, now()));
    let second = ids(&lib.query(&q, now()));
    assert_eq!(first, second);
}

#[test]
fn newest_and_oldest_are_reverses_for_distinct_timestamps() {
    let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    let photos: Vec<Photo> = [5, 1, 9, 3, 7]
        .iter()
        .map(|&h| Photo::new(PhotoId(h), format!("p{h}"), base + TimeDelta::hours(h.into())))
        .collect();
    let newest = ids(&query::query(&photos, None, &PhotoQuery::default(), now()));
    let mut oldest = ids(&query::query(
        &photos,
        None,
        &PhotoQuery::default().sort(SortKey::OldestFirst),
        now(),
    ));
    oldest.reverse();
    assert_eq!(newest, oldest);
    assert_eq!(newest.first(), Some(&PhotoId(9)));
}

#[test]
fn grouping_partitions_its_input() {
    let lib = library(13);
    let all = lib.query(&PhotoQuery::default(), now());
    for tz in [Tz::UTC, chrono_tz::America::Los_Angeles, chrono_tz::Asia::Tokyo] {
        let groups = group_by_month(&all, tz);
        let mut seen: HashMap<PhotoId, usize> = HashMap::new();
        for group in &groups {
            assert!(!group.photos.is_empty());
            for p in &group.photos {
                *seen.entry(p.id).or_default() += 1;
            }
        }
        assert_eq!(seen.len(), all.len());
        assert!(seen.values().all(|&n| n == 1));

        for pair in groups.windows(2) {
            assert!(pair[0].photos[0].captured_at > pair[1].photos[0].captured_at);
        }
    }
}

#[test]
fn favorites_filter_is_exact_and_idempotent() {
    let lib = library(14);
    let q = PhotoQuery::default().filter(CategoryFilter::Favorites);
    let once = lib.query(&q, now());
    let expected: Vec<PhotoId> = lib.favorite_photos().iter().map(|p| p.id).collect();
    assert_eq!(sorted(ids(&once)), sorted(expected));

    let owned: Vec<Photo> = once.iter().map(|p| (*p).clone()).collect();
    let twice = query::query(&owned, None, &q, now());
    assert_eq!(ids(&twice), ids(&once));
}

#[test]
fn recent_filter_uses_strict_fourteen_day_window() {
    let now = now();
    let photos = vec![
        Photo::new(PhotoId(1), "edge", now - TimeDelta::days(14)),
        Photo::new(PhotoId(2), "inside", now - TimeDelta::days(14) + TimeDelta::seconds(1)),
        Photo::new(PhotoId(3), "old", now - TimeDelta::days(30)),
        Photo::new(PhotoId(4), "today", now),
    ];
    let q = PhotoQuery::default().filter(CategoryFilter::Recent);
    assert_eq!(
        ids(&query::query(&photos, None, &q, now)),
        vec![PhotoId(4), PhotoId(2)]
    );
}

#[test]
fn search_scenarios() {
    let target = Photo::new(PhotoId(1), "Evening", now())
        .with_tags(["sunset"])
        .with_location("Seattle, WA");
    let other = Photo::new(PhotoId(2), "Lunch", now())
        .with_tags(["food"])
        .with_location("Austin, TX");
    let photos = vec![target, other];

    for text in ["seattle", "sunset", "SUNSET"] {
        assert_eq!(ids(&search::search(&photos, text)), vec![PhotoId(1)], "{text}");
    }
    assert!(search::search(&photos, "zzz").is_empty());
    assert!(search::search(&photos, "").is_empty());
    assert!(search::search(&photos, "   ").is_empty());
}

#[test]
fn searching_a_tag_returns_exactly_its_carriers() {
    let lib = library(15);
    let hits = sorted(ids(&lib.search("architecture")));
    let carriers: Vec<PhotoId> = lib
        .active_photos()
        .into_iter()
        .filter(|p| p.has_tag("architecture"))
        .map(|p| p.id)
        .collect();
    assert_eq!(hits, sorted(carriers));
}

#[test]
fn unknown_scope_yields_nothing() {
    let lib = library(16);
    let q = PhotoQuery::default().scope(photo_library::Scope::Album(photo_library::model::AlbumId(999)));
    assert!(lib.query(&q, now()).is_empty());
}

#[test]
fn name_sort_puts_lower_case_before_upper_case() {
    let at = now();
    let photos = vec![
        Photo::new(PhotoId(1), "banana", at),
        Photo::new(PhotoId(2), "Banana", at),
        Photo::new(PhotoId(3), "apple", at),
        Photo::new(PhotoId(4), "Cherry", at),
    ];
    let q = PhotoQuery::default().sort(SortKey::NameAscending);
    let names: Vec<&str> = query::query(&photos, None, &q, at)
        .iter()
        .map(|p| p.name.as_str())
        .collect();
    assert_eq!(names, vec!["apple", "banana", "Banana", "Cherry"]);
}
