//! Menu / page / video overlay stack.
//!
//! [`OverlayStack`] is pure state, generic over the focus handle `F` (an
//! `HtmlElement` in the browser, plain ids in tests). Every transition returns
//! what the DOM layer has to do, notably which element gets focus back.
//! [`dom`] applies those outcomes to the page.

pub mod carousel;
pub mod dom;

pub use carousel::{PlaylistRow, VideoCarousel, embed_url, profile_handle};

/// Key opened by the menu button.
pub const DEFAULT_MENU_KEY: &str = "wtfis";
pub const FALLBACK_TITLE: &str = "DEVILTOWN";

/// Content sections in display order.
pub const SECTION_KEYS: [&str; 7] = [
    "wtfis",
    "schedule",
    "archive",
    "mixes",
    "marathoner",
    "skullgame",
    "devilcoach",
];

pub fn page_title(key: &str) -> &'static str {
    match key {
        "wtfis" => "whatthefuckisdeviltown",
        "schedule" => "Schedule",
        "archive" => "Archive (Photo/Video)",
        "mixes" => "Mixes",
        "marathoner" => "Marathoner",
        "skullgame" => "🎲 Skull DIce",
        "devilcoach" => "Devil Coach (AI)",
        _ => FALLBACK_TITLE,
    }
}

/// Overlay that currently owns the Tab key.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Layer {
    Menu,
    Page,
    Video,
}

/// Where Tab should move focus inside a trapped container, if anywhere.
/// `active` is the index of the focused element among the focusables.
pub fn trap_tab(len: usize, active: Option<usize>, shift: bool) -> Option<usize> {
    if len == 0 {
        return None;
    }
    let last = len - 1;
    match (shift, active) {
        (true, Some(0)) => Some(last),
        (false, Some(i)) if i == last => Some(0),
        _ => None,
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct PageOpened {
    pub key: String,
    pub title: &'static str,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PageClosed<F> {
    /// The video modal was still open and got closed first.
    pub closed_video: bool,
    pub restore: Option<F>,
}

pub struct OverlayStack<F> {
    sections: Vec<String>,
    menu_enabled: bool,
    menu_open: bool,
    menu_key: Option<String>,
    menu_focus: Option<F>,
    page: Option<String>,
    page_focus: Option<F>,
    video: Option<VideoCarousel>,
    video_focus: Option<F>,
}

impl<F: Clone> OverlayStack<F> {
    pub fn new<I, S>(sections: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            sections: sections.into_iter().map(Into::into).collect(),
            menu_enabled: false,
            menu_open: false,
            menu_key: None,
            menu_focus: None,
            page: None,
            page_focus: None,
            video: None,
            video_focus: None,
        }
    }

    pub fn has_section(&self, key: &str) -> bool {
        self.sections.iter().any(|s| s == key)
    }

    pub fn sections(&self) -> &[String] {
        &self.sections
    }

    pub fn menu_enabled(&self) -> bool {
        self.menu_enabled
    }

    pub fn menu_open(&self) -> bool {
        self.menu_open
    }

    pub fn menu_key(&self) -> Option<&str> {
        self.menu_key.as_deref()
    }

    pub fn page(&self) -> Option<&str> {
        self.page.as_deref()
    }

    pub fn page_open(&self) -> bool {
        self.page.is_some()
    }

    pub fn video(&self) -> Option<&VideoCarousel> {
        self.video.as_ref()
    }

    pub fn video_mut(&mut self) -> Option<&mut VideoCarousel> {
        self.video.as_mut()
    }

    pub fn video_open(&self) -> bool {
        self.video.is_some()
    }

    /// Returns true the first time only.
    pub fn enable_menu(&mut self) -> bool {
        if self.menu_enabled {
            return false;
        }
        self.menu_enabled = true;
        true
    }

    /// No-op (returns false) until the menu has been enabled.
    pub fn open_menu(&mut self, key: &str, focused: Option<F>) -> bool {
        if !self.menu_enabled {
            return false;
        }
        if !self.menu_open {
            self.menu_focus = focused;
        }
        self.menu_open = true;
        self.menu_key = Some(key.to_string());
        true
    }

    /// Always hides the menu. Returns the element to refocus, if requested.
    pub fn close_menu(&mut self, restore_focus: bool) -> Option<F> {
        self.menu_open = false;
        let captured = self.menu_focus.take();
        if restore_focus { captured } else { None }
    }

    pub fn open_page(&mut self, key: &str, focused: Option<F>) -> Option<PageOpened> {
        if !self.has_section(key) {
            return None;
        }
        self.page_focus = focused;
        self.page = Some(key.to_string());
        // The menu's saved focus points under the page now.
        self.close_menu(false);
        Some(PageOpened { key: key.to_string(), title: page_title(key) })
    }

    /// Tear down the video (if any) and then the page. Idempotent.
    pub fn close_page(&mut self) -> PageClosed<F> {
        let closed_video = self.video.is_some();
        if closed_video {
            self.video = None;
            self.video_focus = None;
        }
        self.page = None;
        PageClosed { closed_video, restore: self.page_focus.take() }
    }

    pub fn open_video(&mut self, carousel: VideoCarousel, focused: Option<F>) {
        self.video_focus = focused;
        self.video = Some(carousel);
    }

    /// Returns the element to refocus.
    pub fn close_video(&mut self) -> Option<F> {
        self.video = None;
        self.video_focus.take()
    }

    /// Deepest open overlay: video, then page, then menu.
    pub fn trap_layer(&self) -> Option<Layer> {
        if self.video.is_some() {
            Some(Layer::Video)
        } else if self.page.is_some() {
            Some(Layer::Page)
        } else if self.menu_open {
            Some(Layer::Menu)
        } else {
            None
        }
    }

    /// Escape: close video (if open), then menu, then page. Focus restores
    /// come back in the order they should be applied; the last one wins.
    pub fn escape(&mut self) -> Vec<F> {
        let mut restores = Vec::new();
        if self.video.is_some() {
            restores.extend(self.close_video());
        }
        restores.extend(self.close_menu(true));
        restores.extend(self.close_page().restore);
        restores
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stack() -> OverlayStack<&'static str> {
        OverlayStack::new(SECTION_KEYS)
    }

    fn carousel() -> VideoCarousel {
        VideoCarousel::new("Set", vec!["a".into(), "b".into()], vec![], vec![]).unwrap()
    }

    #[test]
    fn menu_is_gated_until_enabled() {
        let mut s = stack();
        assert!(!s.open_menu("wtfis", Some("btn")));
        assert!(!s.menu_open());
        assert!(s.enable_menu());
        assert!(!s.enable_menu());
        assert!(s.open_menu("wtfis", Some("btn")));
        assert!(s.menu_open());
        assert_eq!(s.menu_key(), Some("wtfis"));
    }

    #[test]
    fn reopening_menu_keeps_first_captured_focus() {
        let mut s = stack();
        s.enable_menu();
        s.open_menu("wtfis", Some("menu-btn"));
        s.open_menu("mixes", Some("inside-menu"));
        assert_eq!(s.close_menu(true), Some("menu-btn"));
        // capture cleared
        assert_eq!(s.close_menu(true), None);
    }

    #[test]
    fn close_menu_without_restore_discards_focus() {
        let mut s = stack();
        s.enable_menu();
        s.open_menu("wtfis", Some("menu-btn"));
        assert_eq!(s.close_menu(false), None);
        s.open_menu("wtfis", Some("other"));
        assert_eq!(s.close_menu(true), Some("other"));
    }

    #[test]
    fn unknown_page_is_noop() {
        let mut s = stack();
        assert_eq!(s.open_page("nope", Some("x")), None);
        assert!(!s.page_open());
        assert_eq!(s.trap_layer(), None);
    }

    #[test]
    fn opening_page_closes_menu_silently() {
        let mut s = stack();
        s.enable_menu();
        s.open_menu("wtfis", Some("menu-btn"));
        let opened = s.open_page("archive", Some("menu-item")).unwrap();
        assert_eq!(opened.title, "Archive (Photo/Video)");
        assert!(!s.menu_open());
        assert_eq!(s.close_menu(true), None);
        assert_eq!(s.close_page().restore, Some("menu-item"));
    }

    #[test]
    fn closing_page_closes_video_first_and_restores_page_focus() {
        let mut s = stack();
        s.open_page("archive", Some("page-origin"));
        s.open_video(carousel(), Some("playlist-btn"));
        assert_eq!(s.trap_layer(), Some(Layer::Video));
        let closed = s.close_page();
        assert!(closed.closed_video);
        assert_eq!(closed.restore, Some("page-origin"));
        assert!(!s.video_open());
        assert!(!s.page_open());
        // video's capture was discarded with it
        assert_eq!(s.close_video(), None);
    }

    #[test]
    fn trap_precedence_is_video_page_menu() {
        let mut s = stack();
        s.enable_menu();
        s.open_menu("wtfis", None);
        assert_eq!(s.trap_layer(), Some(Layer::Menu));
        s.open_page("mixes", None);
        assert_eq!(s.trap_layer(), Some(Layer::Page));
        s.open_video(carousel(), None);
        assert_eq!(s.trap_layer(), Some(Layer::Video));
    }

    #[test]
    fn escape_unwinds_everything() {
        let mut s = stack();
        s.open_page("archive", Some("origin"));
        s.open_video(carousel(), Some("play"));
        assert_eq!(s.escape(), vec!["play", "origin"]);
        assert_eq!(s.trap_layer(), None);
        assert!(s.escape().is_empty());
    }

    #[test]
    fn tab_wraps_at_the_edges() {
        assert_eq!(trap_tab(3, Some(2), false), Some(0));
        assert_eq!(trap_tab(3, Some(0), true), Some(2));
        assert_eq!(trap_tab(3, Some(1), false), None);
        assert_eq!(trap_tab(3, Some(1), true), None);
        assert_eq!(trap_tab(3, None, false), None);
        assert_eq!(trap_tab(0, None, true), None);
        assert_eq!(trap_tab(1, Some(0), false), Some(0));
    }

    #[test]
    fn titles_fall_back() {
        assert_eq!(page_title("skullgame"), "🎲 Skull DIce");
        assert_eq!(page_title("extra"), FALLBACK_TITLE);
    }
}
