//! Free-text search over photos.

use crate::model::Photo;

/// Case-insensitive substring test against name, location, tags and camera.
///
/// `needle` must already be lower-cased. An absent camera never matches.
pub fn matches(photo: &Photo, needle: &str) -> bool {
    photo.name.to_lowercase().contains(needle)
        || photo.location.to_lowercase().contains(needle)
        || photo
            .tags()
            .iter()
            .any(|tag| tag.to_lowercase().contains(needle))
        || photo
            .camera()
            .is_some_and(|camera| camera.to_lowercase().contains(needle))
}

/// Lower-cased, trimmed needle, or `None` when there is nothing to search for.
pub(crate) fn normalize(text: &str) -> Option<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_lowercase())
    }
}

/// Photos from `source` matching `text`, in source order.
///
/// An empty or whitespace-only query returns nothing rather than everything.
pub fn search<'a>(source: &'a [Photo], text: &str) -> Vec<&'a Photo> {
    let Some(needle) = normalize(text) else {
        return Vec::new();
    };
    source.iter().filter(|p| matches(p, &needle)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::PhotoId;
    use chrono::{TimeZone, Utc};

    fn sample() -> Vec<Photo> {
        let at = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        vec![
            Photo::new(PhotoId(1), "Photo 1", at)
                .with_location("Seattle, WA")
                .with_tags(["sunset"]),
            Photo::new(PhotoId(2), "Photo 2", at)
                .with_location("Austin, TX")
                .with_camera("Sony A7 IV"),
            Photo::new(PhotoId(3), "Photo 3", at).with_location("Miami, FL"),
        ]
    }

    #[test]
    fn blank_query_returns_nothing() {
        let photos = sample();
        assert!(search(&photos, "").is_empty());
        assert!(search(&photos, "   \t").is_empty());
    }

    #[test]
    fn matches_location_tag_and_camera_case_insensitively() {
        let photos = sample();
        let ids = |q: &str| search(&photos, q).iter().map(|p| p.id).collect::<Vec<_>>();
        assert_eq!(ids("seattle"), vec![PhotoId(1)]);
        assert_eq!(ids("SUNSET"), vec![PhotoId(1)]);
        assert_eq!(ids("sony"), vec![PhotoId(2)]);
        assert_eq!(ids("photo"), vec![PhotoId(1), PhotoId(2), PhotoId(3)]);
        assert!(ids("zzz").is_empty());
    }

    #[test]
    fn query_is_trimmed() {
        let photos = sample();
        assert_eq!(search(&photos, "  miami ").len(), 1);
    }
}
