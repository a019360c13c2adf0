//! Month/year sections for date-headed display.

use std::collections::HashMap;

use chrono_tz::Tz;
use serde::Serialize;

use crate::dates::month_key;
use crate::model::Photo;

/// One section: every photo captured in `key`'s month, newest first.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthGroup<'a> {
    pub key: String,
    pub photos: Vec<&'a Photo>,
}

/// Partition `photos` by capture month as seen from `tz`.
///
/// Groups are ordered by their newest member, most recent month first. Every
/// input photo lands in exactly one group; day of month is ignored.
pub fn group_by_month<'a>(photos: &[&'a Photo], tz: Tz) -> Vec<MonthGroup<'a>> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<MonthGroup<'a>> = Vec::new();

    for &photo in photos {
        let key = month_key(photo.captured_at, tz);
        let slot = *index.entry(key.clone()).or_insert_with(|| {
            groups.push(MonthGroup {
                key,
                photos: Vec::new(),
            });
            groups.len() - 1
        });
        groups[slot].photos.push(photo);
    }

    for group in &mut groups {
        group
            .photos
            .sort_by(|a, b| b.captured_at.cmp(&a.captured_at));
    }
    // Every group has at least one member.
    groups.sort_by(|a, b| b.photos[0].captured_at.cmp(&a.photos[0].captured_at));
    groups
}

/// Key of the trailing group for photos without an expiry date.
pub const UNKNOWN_DATE: &str = "Unknown Date";

/// Partition trashed `photos` by the month their `expires_on` falls in.
///
/// Dated groups come first, latest expiry first; photos with no expiry are
/// collected into a final [`UNKNOWN_DATE`] group.
pub fn group_by_expiry<'a>(photos: &[&'a Photo], tz: Tz) -> Vec<MonthGroup<'a>> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<MonthGroup<'a>> = Vec::new();
    let mut undated: Vec<&'a Photo> = Vec::new();
    for &photo in photos {
        let Some(expires) = photo.expires_on else {
            undated.push(photo);
            continue;
        };
        let key = month_key(expires, tz);
        let slot = *index.entry(key.clone()).or_insert_with(|| {
            groups.push(MonthGroup {
                key,
                photos: Vec::new(),
            });
            groups.len() - 1
        });
        groups[slot].photos.push(photo);
    }

    for group in &mut groups {
        group.photos.sort_by(|a, b| b.expires_on.cmp(&a.expires_on));
    }
    groups.sort_by(|a, b| b.photos[0].expires_on.cmp(&a.photos[0].expires_on));
    if !undated.is_empty() {
        groups.push(MonthGroup {
            key: UNKNOWN_DATE.to_string(),
            photos: undated,
        });
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::PhotoId;
    use chrono::{TimeZone, Utc};

    #[test]
    fn empty_input_yields_no_groups() {
        assert!(group_by_month(&[], Tz::UTC).is_empty());
    }

    #[test]
    fn january_and_february() {
        let jan5 = Photo::new(PhotoId(1), "a", Utc.with_ymd_and_hms(2024, 1, 5, 9, 0, 0).unwrap());
        let jan20 = Photo::new(PhotoId(2), "b", Utc.with_ymd_and_hms(2024, 1, 20, 9, 0, 0).unwrap());
        let feb1 = Photo::new(PhotoId(3), "c", Utc.with_ymd_and_hms(2024, 2, 1, 9, 0, 0).unwrap());
        let input = vec![&jan5, &jan20, &feb1];

        let groups = group_by_month(&input, Tz::UTC);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].key, "February 2024");
        assert_eq!(groups[0].photos.len(), 1);
        assert_eq!(groups[1].key, "January 2024");
        let jan: Vec<PhotoId> = groups[1].photos.iter().map(|p| p.id).collect();
        assert_eq!(jan, vec![PhotoId(2), PhotoId(1)]);
    }

    #[test]
    fn same_month_different_years_are_separate() {
        let a = Photo::new(PhotoId(1), "a", Utc.with_ymd_and_hms(2023, 3, 1, 0, 0, 0).unwrap());
        let b = Photo::new(PhotoId(2), "b", Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap());
        let groups = group_by_month(&[&a, &b], Tz::UTC);
        let keys: Vec<&str> = groups.iter().map(|g| g.key.as_str()).collect();
        assert_eq!(keys, vec!["March 2024", "March 2023"]);
    }

    #[test]
    fn trash_groups_by_expiry_with_unknown_last() {
        let captured = Utc.with_ymd_and_hms(2020, 6, 1, 0, 0, 0).unwrap();
        let mut soon = Photo::new(PhotoId(1), "a", captured);
        soon.expires_on = Some(Utc.with_ymd_and_hms(2024, 11, 3, 0, 0, 0).unwrap());
        let mut later = Photo::new(PhotoId(2), "b", captured);
        later.expires_on = Some(Utc.with_ymd_and_hms(2024, 12, 9, 0, 0, 0).unwrap());
        let mut also_soon = Photo::new(PhotoId(3), "c", captured);
        also_soon.expires_on = Some(Utc.with_ymd_and_hms(2024, 11, 20, 0, 0, 0).unwrap());
        let undated = Photo::new(PhotoId(4), "d", captured);

        let groups = group_by_expiry(&[&undated, &soon, &later, &also_soon], Tz::UTC);
        let keys: Vec<&str> = groups.iter().map(|g| g.key.as_str()).collect();
        assert_eq!(keys, vec!["December 2024", "November 2024", UNKNOWN_DATE]);
        let november: Vec<PhotoId> = groups[1].photos.iter().map(|p| p.id).collect();
        assert_eq!(november, vec![PhotoId(3), PhotoId(1)]);
        assert_eq!(groups[2].photos[0].id, PhotoId(4));
    }

    #[test]
    fn trash_without_expiry_is_one_unknown_group() {
        let p = Photo::new(PhotoId(1), "a", Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
        let groups = group_by_expiry(&[&p], Tz::UTC);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].key, UNKNOWN_DATE);
        assert!(group_by_expiry(&[], Tz::UTC).is_empty());
    }
}
