// Invariants of the static feed content.
// Native-friendly; no wasm/browser APIs.

use std::collections::HashSet;

use deviltown::feed::{FEED_KEYS, FeedAction, SCHEDULE_KEY, data};
use deviltown::overlay::VideoCarousel;

fn static_keys() -> impl Iterator<Item = &'static str> {
    FEED_KEYS.into_iter().filter(|k| *k != SCHEDULE_KEY)
}

#[test]
fn every_static_feed_has_items_with_unique_ids() {
    let mut seen = HashSet::new();
    for key in static_keys() {
        let items = data::items(key);
        assert!(!items.is_empty(), "feed '{}' is empty", key);
        for item in items {
            assert!(seen.insert(item.id), "duplicate id '{}' in feed '{}'", item.id, key);
            assert!(!item.title.is_empty(), "untitled item '{}'", item.id);
        }
    }
}

#[test]
fn tags_are_already_normalised() {
    for key in static_keys() {
        for item in data::items(key) {
            for tag in item.tags {
                assert_eq!(*tag, tag.trim().to_lowercase(), "tag '{}' on '{}'", tag, item.id);
            }
        }
    }
}

#[test]
fn schedule_has_no_static_data() {
    assert!(data::items(SCHEDULE_KEY).is_empty());
}

#[test]
fn playlist_actions_build_carousels() {
    let mut playlists = 0;
    for key in static_keys() {
        for item in data::items(key) {
            if let Some(FeedAction::Playlist { title, videos, titles, instagrams, .. }) = item.action {
                playlists += 1;
                assert_eq!(videos.len(), titles.len(), "titles out of step in '{}'", item.id);
                assert_eq!(videos.len(), instagrams.len(), "profiles out of step in '{}'", item.id);
                let carousel = VideoCarousel::from_attributes(
                    Some(title),
                    Some(videos.join(",").as_str()),
                    Some(titles.join(",").as_str()),
                    Some(instagrams.join(",").as_str()),
                    None,
                )
                .unwrap();
                assert_eq!(carousel.len(), videos.len());
                assert!(carousel.rows().iter().all(|r| r.profile_handle.is_some()));
            }
        }
    }
    assert!(playlists > 0);
}
