//! Video carousel model: parallel id / title / profile lists plus a cursor.

/// Ids with this prefix are whole YouTube playlists.
pub const PLAYLIST_PREFIX: &str = "PL";

pub fn embed_url(id: &str) -> String {
    if id.starts_with(PLAYLIST_PREFIX) {
        format!("https://www.youtube.com/embed/videoseries?list={id}&rel=0&modestbranding=1&autoplay=1")
    } else {
        format!("https://www.youtube.com/embed/{id}?rel=0&modestbranding=1&autoplay=1")
    }
}

/// `https://www.instagram.com/someone/` -> `someone`
pub fn profile_handle(url: &str) -> &str {
    let clean = url.strip_suffix('/').unwrap_or(url);
    clean.rsplit('/').next().unwrap_or(clean)
}

fn split_list(raw: &str) -> impl Iterator<Item = String> + '_ {
    raw.split(',').map(|s| s.trim().to_string())
}

#[derive(Clone, Debug, PartialEq)]
pub struct PlaylistRow {
    pub label: String,
    pub profile_url: Option<String>,
    pub profile_handle: Option<String>,
    pub active: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct VideoCarousel {
    title: String,
    ids: Vec<String>,
    titles: Vec<String>,
    profiles: Vec<String>,
    index: usize,
}

impl VideoCarousel {
    /// `None` when there is nothing to play.
    pub fn new(
        title: &str,
        ids: Vec<String>,
        titles: Vec<String>,
        profiles: Vec<String>,
    ) -> Option<Self> {
        if ids.is_empty() {
            return None;
        }
        let title = if title.is_empty() { "Video" } else { title };
        Some(Self { title: title.to_string(), ids, titles, profiles, index: 0 })
    }

    /// Build from a playlist opener's data attributes (comma separated lists).
    pub fn from_attributes(
        title: Option<&str>,
        videos: Option<&str>,
        titles: Option<&str>,
        profiles: Option<&str>,
        playlist: Option<&str>,
    ) -> Option<Self> {
        let present = |s: &&str| !s.trim().is_empty();
        let ids: Vec<String> = match videos.filter(present) {
            Some(v) => split_list(v).filter(|s| !s.is_empty()).collect(),
            None => playlist.filter(present).map(|p| vec![p.trim().to_string()]).unwrap_or_default(),
        };
        Self::new(
            title.filter(present).unwrap_or("Playlist"),
            ids,
            titles.map(|t| split_list(t).collect()).unwrap_or_default(),
            profiles.map(|p| split_list(p).collect()).unwrap_or_default(),
        )
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn current_id(&self) -> &str {
        &self.ids[self.index]
    }

    pub fn current_embed_url(&self) -> String {
        embed_url(self.current_id())
    }

    /// Prev/next buttons, the counter and the playlist are shown only for
    /// more than one item.
    pub fn has_navigation(&self) -> bool {
        self.ids.len() > 1
    }

    pub fn counter_label(&self) -> String {
        if self.has_navigation() {
            format!("{} / {}", self.index + 1, self.ids.len())
        } else {
            String::new()
        }
    }

    pub fn next(&mut self) -> bool {
        if !self.has_navigation() {
            return false;
        }
        self.index = (self.index + 1) % self.ids.len();
        true
    }

    pub fn prev(&mut self) -> bool {
        if !self.has_navigation() {
            return false;
        }
        self.index = self.index.checked_sub(1).unwrap_or(self.ids.len() - 1);
        true
    }

    pub fn select(&mut self, index: usize) -> bool {
        if index >= self.ids.len() {
            return false;
        }
        self.index = index;
        true
    }

    pub fn rows(&self) -> Vec<PlaylistRow> {
        self.ids
            .iter()
            .enumerate()
            .map(|(idx, _)| {
                let title = self
                    .titles
                    .get(idx)
                    .filter(|t| !t.is_empty())
                    .cloned()
                    .unwrap_or_else(|| format!("Track #{}", idx + 1));
                let url = self.profiles.get(idx).filter(|u| !u.is_empty()).cloned();
                PlaylistRow {
                    label: format!("{}. {}", idx + 1, title),
                    profile_handle: url.as_deref().map(|u| profile_handle(u).to_string()),
                    profile_url: url,
                    active: idx == self.index,
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn three() -> VideoCarousel {
        VideoCarousel::new(
            "Ready 2 Drink",
            vec!["o2_g_GyF1iE".into(), "PLabc".into(), "w35YjgOUaZk".into()],
            vec!["CHBS".into(), "".into()],
            vec!["https://www.instagram.com/givemeazerocoke/".into()],
        )
        .unwrap()
    }

    #[test]
    fn embed_urls_distinguish_playlists() {
        assert_eq!(
            embed_url("o2_g_GyF1iE"),
            "https://www.youtube.com/embed/o2_g_GyF1iE?rel=0&modestbranding=1&autoplay=1"
        );
        assert_eq!(
            embed_url("PLxyz"),
            "https://www.youtube.com/embed/videoseries?list=PLxyz&rel=0&modestbranding=1&autoplay=1"
        );
    }

    #[test]
    fn navigation_wraps_both_ways() {
        let mut c = three();
        assert_eq!(c.index(), 0);
        assert!(c.prev());
        assert_eq!(c.index(), 2);
        assert!(c.next());
        assert_eq!(c.index(), 0);
        assert!(c.next());
        assert_eq!(c.current_embed_url(), embed_url("PLabc"));
        assert_eq!(c.counter_label(), "2 / 3");
    }

    #[test]
    fn single_item_has_no_navigation() {
        let mut c = VideoCarousel::new("", vec!["x".into()], vec![], vec![]).unwrap();
        assert_eq!(c.title(), "Video");
        assert!(!c.next());
        assert!(!c.prev());
        assert_eq!(c.counter_label(), "");
    }

    #[test]
    fn select_ignores_out_of_range() {
        let mut c = three();
        assert!(c.select(2));
        assert!(!c.select(3));
        assert_eq!(c.index(), 2);
    }

    #[test]
    fn rows_fall_back_to_track_numbers() {
        let rows = three().rows();
        assert_eq!(rows[0].label, "1. CHBS");
        assert_eq!(rows[0].profile_handle.as_deref(), Some("givemeazerocoke"));
        assert!(rows[0].active);
        assert_eq!(rows[1].label, "2. Track #2");
        assert_eq!(rows[2].profile_url, None);
    }

    #[test]
    fn attributes_are_trimmed_and_empty_ids_dropped() {
        let c = VideoCarousel::from_attributes(
            None,
            Some(" a , ,b "),
            Some("One, Two"),
            None,
            Some("PLignored"),
        )
        .unwrap();
        assert_eq!(c.title(), "Playlist");
        assert_eq!(c.len(), 2);
        assert_eq!(c.rows()[1].label, "2. Two");

        let p = VideoCarousel::from_attributes(Some("Mix"), None, None, None, Some("PLmix")).unwrap();
        assert_eq!(p.current_id(), "PLmix");
        assert!(VideoCarousel::from_attributes(None, Some(" , "), None, None, None).is_none());
    }

    #[test]
    fn blank_attributes_fall_back_to_playlist() {
        let c = VideoCarousel::from_attributes(Some(""), Some(""), None, None, Some("PLmix")).unwrap();
        assert_eq!(c.current_id(), "PLmix");
        assert_eq!(c.title(), "Playlist");

        let c = VideoCarousel::from_attributes(Some("  "), Some(" "), None, None, Some(" PLmix ")).unwrap();
        assert_eq!(c.current_id(), "PLmix");
        assert!(VideoCarousel::from_attributes(None, Some(""), None, None, Some("")).is_none());
    }
}
