//! Tag-filterable content feeds.
//!
//! Four feeds are static reference data ([`data`]); the schedule feed is loaded
//! from the calendar endpoint ([`schedule`]). Rendering produces HTML strings
//! ([`html`]) that the DOM adapter ([`dom`]) drops into the page.

use std::collections::{BTreeSet, HashMap};

pub mod data;
pub mod dom;
pub mod html;
pub mod schedule;

pub use schedule::{ScheduleBucket, ScheduleEvent};

pub const ALL_TAG: &str = "all";
/// Below this many distinct tags the filter bar is hidden.
pub const TAG_BAR_MIN_COUNT: usize = 2;
pub const SCHEDULE_KEY: &str = "schedule";
pub const FEED_KEYS: [&str; 5] = ["wtfis", SCHEDULE_KEY, "archive", "mixes", "marathoner"];

pub fn is_feed_key(key: &str) -> bool {
    FEED_KEYS.contains(&key)
}

/// Trim + lowercase; empty or missing means "all".
pub fn normalize_tag(tag: Option<&str>) -> String {
    let t = tag.unwrap_or(ALL_TAG).trim().to_lowercase();
    if t.is_empty() { ALL_TAG.to_string() } else { t }
}

fn normalized_tags<'a>(raw: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    raw.into_iter()
        .map(|t| t.trim().to_lowercase())
        .filter(|t| !t.is_empty())
        .collect()
}

/// Anything that carries filter tags.
pub trait Tagged {
    fn tags(&self) -> Vec<String>;
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FeedAction {
    Disabled {
        label: &'static str,
    },
    Playlist {
        label: &'static str,
        title: &'static str,
        videos: &'static [&'static str],
        titles: &'static [&'static str],
        instagrams: &'static [&'static str],
    },
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FeedItem {
    pub id: &'static str,
    pub title: &'static str,
    pub subtitle: &'static str,
    pub date: &'static str,
    pub cover: &'static str,
    pub tags: &'static [&'static str],
    pub meta: &'static [&'static str],
    pub action: Option<FeedAction>,
}

impl Tagged for FeedItem {
    fn tags(&self) -> Vec<String> {
        normalized_tags(self.tags.iter().copied())
    }
}

pub fn filter_items<'a, T: Tagged>(items: &'a [T], tag: &str) -> Vec<&'a T> {
    if tag == ALL_TAG {
        return items.iter().collect();
    }
    items.iter().filter(|item| item.tags().iter().any(|t| t == tag)).collect()
}

/// Distinct normalised tags in first-seen order.
pub fn collect_tags<T: Tagged>(items: &[T]) -> Vec<String> {
    let mut seen = Vec::new();
    for tag in items.iter().flat_map(Tagged::tags) {
        if !seen.contains(&tag) {
            seen.push(tag);
        }
    }
    seen
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TagButton {
    pub tag: String,
    pub active: bool,
}

/// Buttons for the filter bar: "all" then the distinct tags sorted, or `None`
/// when there are too few tags to filter by.
pub fn tag_bar(tags: &[String], active: &str) -> Option<Vec<TagButton>> {
    let unique: BTreeSet<String> = normalized_tags(tags.iter().map(String::as_str)).into_iter().collect();
    if unique.len() < TAG_BAR_MIN_COUNT {
        return None;
    }
    let buttons = std::iter::once(ALL_TAG.to_string())
        .chain(unique)
        .map(|tag| TagButton { active: tag == active, tag })
        .collect();
    Some(buttons)
}

/// Per-feed filter and load state.
#[derive(Clone, Debug, PartialEq)]
pub struct FeedState {
    pub active_tag: String,
    pub loaded: bool,
    pub loading: bool,
    pub error: Option<String>,
}

impl FeedState {
    fn new(loaded: bool) -> Self {
        Self { active_tag: ALL_TAG.to_string(), loaded, loading: false, error: None }
    }
}

/// Filter state for every feed plus the loaded schedule.
pub struct FeedBoard {
    states: HashMap<&'static str, FeedState>,
    schedule: Vec<ScheduleEvent>,
}

impl Default for FeedBoard {
    fn default() -> Self {
        Self::new()
    }
}

impl FeedBoard {
    pub fn new() -> Self {
        let states = FEED_KEYS
            .iter()
            .map(|&k| (k, FeedState::new(k != SCHEDULE_KEY)))
            .collect();
        Self { states, schedule: Vec::new() }
    }

    pub fn state(&self, key: &str) -> Option<&FeedState> {
        self.states.get(key)
    }

    pub fn schedule(&self) -> &[ScheduleEvent] {
        &self.schedule
    }

    /// Returns false for unknown feeds.
    pub fn set_tag(&mut self, key: &str, tag: Option<&str>) -> bool {
        match self.states.get_mut(key) {
            Some(state) => {
                state.active_tag = normalize_tag(tag);
                true
            }
            None => false,
        }
    }

    /// Claim the schedule fetch. False if it already ran or is running.
    pub fn begin_schedule_load(&mut self) -> bool {
        let Some(state) = self.states.get_mut(SCHEDULE_KEY) else {
            return false;
        };
        if state.loaded || state.loading {
            return false;
        }
        state.loading = true;
        state.error = None;
        true
    }

    pub fn finish_schedule_load(&mut self, result: Result<Vec<ScheduleEvent>, String>) {
        let Some(state) = self.states.get_mut(SCHEDULE_KEY) else {
            return;
        };
        state.loading = false;
        state.loaded = true;
        match result {
            Ok(mut events) => {
                events.sort_by(|a, b| a.start.cmp(&b.start));
                self.schedule = events;
            }
            Err(err) => {
                state.error = Some(err);
                self.schedule.clear();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct T(&'static [&'static str]);

    impl Tagged for T {
        fn tags(&self) -> Vec<String> {
            normalized_tags(self.0.iter().copied())
        }
    }

    fn ids(items: &[&T]) -> Vec<&'static [&'static str]> {
        items.iter().map(|t| t.0).collect()
    }

    #[test]
    fn filter_by_tag() {
        let items = [T(&["a"]), T(&["a", "b"]), T(&["b"])];
        assert_eq!(ids(&filter_items(&items, "b")), vec![&["a", "b"][..], &["b"][..]]);
        assert_eq!(filter_items(&items, ALL_TAG).len(), 3);
        assert!(filter_items(&items, "c").is_empty());
    }

    #[test]
    fn tags_match_case_insensitively() {
        let items = [T(&[" Techno "]), T(&["LIVE"])];
        assert_eq!(filter_items(&items, &normalize_tag(Some("TECHNO"))).len(), 1);
        assert_eq!(collect_tags(&items), vec!["techno", "live"]);
    }

    #[test]
    fn tag_bar_needs_two_distinct_tags() {
        let items = [T(&["solo"]), T(&["Solo"]), T(&["solo "])];
        assert_eq!(tag_bar(&collect_tags(&items), ALL_TAG), None);

        let items = [T(&["b"]), T(&["a"])];
        let bar = tag_bar(&collect_tags(&items), "b").unwrap();
        let tags: Vec<&str> = bar.iter().map(|b| b.tag.as_str()).collect();
        assert_eq!(tags, vec!["all", "a", "b"]);
        assert!(bar[2].active);
        assert!(!bar[0].active);
    }

    #[test]
    fn normalize_defaults_to_all() {
        assert_eq!(normalize_tag(None), "all");
        assert_eq!(normalize_tag(Some("   ")), "all");
        assert_eq!(normalize_tag(Some(" Night ")), "night");
    }

    #[test]
    fn schedule_load_is_claimed_once() {
        let mut board = FeedBoard::new();
        assert!(board.begin_schedule_load());
        assert!(!board.begin_schedule_load());
        board.finish_schedule_load(Err("HTTP 502".into()));
        let st = board.state(SCHEDULE_KEY).unwrap();
        assert!(st.loaded && !st.loading);
        assert_eq!(st.error.as_deref(), Some("HTTP 502"));
        assert!(!board.begin_schedule_load());
    }

    #[test]
    fn static_feeds_start_loaded() {
        let board = FeedBoard::new();
        assert!(board.state("mixes").unwrap().loaded);
        assert!(!board.state(SCHEDULE_KEY).unwrap().loaded);
        assert_eq!(board.state("wtfis").unwrap().active_tag, "all");
    }

    #[test]
    fn set_tag_rejects_unknown_feed() {
        let mut board = FeedBoard::new();
        assert!(!board.set_tag("skullgame", Some("x")));
        assert!(board.set_tag("archive", Some("PHOTO")));
        assert_eq!(board.state("archive").unwrap().active_tag, "photo");
    }
}
