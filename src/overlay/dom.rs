//! Applies [`OverlayStack`](super::OverlayStack) transitions to the page.
//!
//! State is updated first with the `Site` borrow held; the borrow is released
//! before any DOM work that can re-enter (focus, click handlers).

use wasm_bindgen::JsCast;
use web_sys::{Element, Event, HtmlElement, HtmlIFrameElement, KeyboardEvent};

use super::{DEFAULT_MENU_KEY, Layer, PageClosed, VideoCarousel, trap_tab};
use crate::dom;
use crate::error::SiteResult;
use crate::feed;
use crate::feed::html::escape_html;
use crate::site::SharedSite;

pub const ARCHIVE_KEY: &str = "archive";

fn set_aria(id: &str, attr: &str, on: bool) {
    if let Some(el) = dom::by_id::<Element>(id) {
        let _ = el.set_attribute(attr, if on { "true" } else { "false" });
    }
}

fn set_hidden(id: &str, hidden: bool) {
    if let Some(el) = dom::by_id::<HtmlElement>(id) {
        el.set_hidden(hidden);
    }
}

fn set_page_scroll(locked: bool) {
    let value = if locked { "hidden" } else { "" };
    if let Ok(doc) = dom::document() {
        if let Some(root) = doc.document_element().and_then(|e| e.dyn_into::<HtmlElement>().ok()) {
            dom::set_style(&root, "overflow", value);
        }
    }
    if let Some(body) = dom::body() {
        dom::set_style(&body, "overflow", value);
    }
}

fn section_elements(site: &SharedSite) -> Vec<Element> {
    site.borrow()
        .overlay
        .sections()
        .iter()
        .filter_map(|key| dom::by_id::<Element>(&format!("sec-{key}")))
        .collect()
}

fn menu_items() -> Vec<Element> {
    match dom::document().ok().and_then(|d| d.document_element()) {
        Some(root) => dom::query_all(&root, ".menu-item"),
        None => Vec::new(),
    }
}

// --- Menu -----------------------------------------------------------------------

pub fn enable_menu(site: &SharedSite) {
    if site.borrow_mut().overlay.enable_menu() {
        dom::set_body_class("menu-ready", true);
        log::debug!("menu enabled");
    }
}

pub fn open_menu(site: &SharedSite, key: &str) {
    let focused = dom::active_element();
    if !site.borrow_mut().overlay.open_menu(key, focused) {
        return;
    }
    dom::set_body_class("menu-open", true);
    set_hidden("menuOverlay", false);
    set_aria("menuPanel", "aria-hidden", false);
    set_aria("menuBtn", "aria-expanded", true);
    for item in menu_items() {
        let active = item.get_attribute("data-key").as_deref() == Some(key);
        dom::toggle_class(&item, "active", active);
    }
    if let Some(panel) = dom::by_id::<Element>("menuPanel") {
        dom::focus_first_next_frame(panel);
    }
}

fn hide_menu() {
    dom::set_body_class("menu-open", false);
    set_hidden("menuOverlay", true);
    set_aria("menuPanel", "aria-hidden", true);
    set_aria("menuBtn", "aria-expanded", false);
}

pub fn close_menu(site: &SharedSite, restore_focus: bool) {
    let restore = site.borrow_mut().overlay.close_menu(restore_focus);
    hide_menu();
    if let Some(el) = restore {
        dom::restore_focus(&el);
    }
}

pub fn toggle_menu(site: &SharedSite) {
    let open = site.borrow().overlay.menu_open();
    if open {
        close_menu(site, true);
    } else {
        open_menu(site, DEFAULT_MENU_KEY);
    }
}

// --- Page -----------------------------------------------------------------------

pub fn open_page(site: &SharedSite, key: &str) {
    let focused = dom::active_element();
    let Some(opened) = site.borrow_mut().overlay.open_page(key, focused) else {
        return;
    };
    dom::set_body_class("page-open", true);
    set_hidden("pageOverlay", false);
    set_aria("content", "aria-hidden", false);

    for sec in section_elements(site) {
        dom::remove_class(&sec, "active");
    }
    if let Some(sec) = dom::by_id::<Element>(&format!("sec-{}", opened.key)) {
        dom::add_class(&sec, "active");
    }
    if let Some(title) = dom::by_id::<Element>("contentTitle") {
        title.set_text_content(Some(opened.title));
    }
    if feed::is_feed_key(&opened.key) {
        feed::dom::render_feed_section(site, &opened.key);
    }
    set_page_scroll(true);
    hide_menu();
    if let Some(content) = dom::by_id::<Element>("content") {
        dom::focus_first_next_frame(content);
    }
    log::debug!("page {} opened", opened.key);
}

fn hide_page(site: &SharedSite) {
    dom::set_body_class("page-open", false);
    set_hidden("pageOverlay", true);
    set_aria("content", "aria-hidden", true);
    for sec in section_elements(site) {
        dom::remove_class(&sec, "active");
    }
    set_page_scroll(false);
}

pub fn close_page(site: &SharedSite) {
    let PageClosed { closed_video, restore } = site.borrow_mut().overlay.close_page();
    if closed_video {
        hide_video();
    }
    hide_page(site);
    if let Some(el) = restore {
        dom::restore_focus(&el);
    }
}

// --- Video ----------------------------------------------------------------------

struct VideoView {
    title: String,
    embed: String,
    counter: String,
    navigation: bool,
    playlist: String,
}

fn playlist_html(carousel: &VideoCarousel) -> String {
    if !carousel.has_navigation() {
        return String::new();
    }
    carousel
        .rows()
        .iter()
        .enumerate()
        .map(|(idx, row)| {
            let link = match (&row.profile_url, &row.profile_handle) {
                (Some(url), Some(handle)) => format!(
                    r#"<a class="playlist-profile" href="{}" target="_blank" rel="noopener noreferrer">@{}</a>"#,
                    escape_html(url),
                    escape_html(handle)
                ),
                _ => String::new(),
            };
            format!(
                r#"<div class="playlist-item{active}" data-index="{idx}"><div class="playlist-name"><span>{label}</span>{link}</div></div>"#,
                active = if row.active { " active" } else { "" },
                label = escape_html(&row.label),
            )
        })
        .collect()
}

fn video_view(site: &SharedSite) -> Option<VideoView> {
    let s = site.borrow();
    let carousel = s.overlay.video()?;
    Some(VideoView {
        title: carousel.title().to_string(),
        embed: carousel.current_embed_url(),
        counter: carousel.counter_label(),
        navigation: carousel.has_navigation(),
        playlist: playlist_html(carousel),
    })
}

fn render_video(site: &SharedSite) {
    let Some(view) = video_view(site) else {
        return;
    };
    if let Some(title) = dom::by_id::<Element>("videoModalTitle") {
        title.set_text_content(Some(&view.title));
    }
    if let Some(frame) = dom::by_id::<HtmlIFrameElement>("videoModalFrame") {
        frame.set_src(&view.embed);
    }
    if let Some(counter) = dom::by_id::<Element>("videoCounter") {
        counter.set_text_content(Some(&view.counter));
    }
    let display = if view.navigation { "flex" } else { "none" };
    for id in ["btnPrevVideo", "btnNextVideo", "videoPlaylist"] {
        if let Some(el) = dom::by_id::<HtmlElement>(id) {
            dom::set_style(&el, "display", display);
        }
    }
    if let Some(list) = dom::by_id::<Element>("videoPlaylist") {
        list.set_inner_html(&view.playlist);
    }
}

pub fn open_video(site: &SharedSite, carousel: VideoCarousel) {
    let focused = dom::active_element();
    site.borrow_mut().overlay.open_video(carousel, focused);
    render_video(site);
    dom::set_body_class("video-open", true);
    set_aria("videoModal", "aria-hidden", false);
    if let Some(panel) = video_panel() {
        dom::focus_first_next_frame(panel);
    }
}

fn hide_video() {
    dom::set_body_class("video-open", false);
    set_aria("videoModal", "aria-hidden", true);
    if let Some(frame) = dom::by_id::<HtmlIFrameElement>("videoModalFrame") {
        frame.set_src("");
    }
    if let Some(list) = dom::by_id::<Element>("videoPlaylist") {
        list.set_inner_html("");
    }
}

pub fn close_video(site: &SharedSite) {
    let restore = site.borrow_mut().overlay.close_video();
    hide_video();
    if let Some(el) = restore {
        dom::restore_focus(&el);
    }
}

fn step_video(site: &SharedSite, forward: bool) {
    let moved = {
        let mut s = site.borrow_mut();
        match s.overlay.video_mut() {
            Some(c) if forward => c.next(),
            Some(c) => c.prev(),
            None => false,
        }
    };
    if moved {
        render_video(site);
    }
}

fn select_video(site: &SharedSite, index: usize) {
    let selected = site.borrow_mut().overlay.video_mut().is_some_and(|c| c.select(index));
    if selected {
        render_video(site);
    }
}

fn video_panel() -> Option<Element> {
    dom::document().ok()?.query_selector(".video-modal-panel").ok()?
}

/// Open a carousel from a `.playlist-open` button's data attributes.
pub fn open_playlist_from(site: &SharedSite, button: &Element) {
    let attr = |name: &str| button.get_attribute(name);
    let Some(carousel) = VideoCarousel::from_attributes(
        attr("data-title").as_deref(),
        attr("data-videos").as_deref(),
        attr("data-titles").as_deref(),
        attr("data-instagrams").as_deref(),
        attr("data-playlist").as_deref(),
    ) else {
        return;
    };
    let page_open = site.borrow().overlay.page_open();
    if !page_open {
        open_page(site, ARCHIVE_KEY);
    }
    open_video(site, carousel);
}

// --- Keyboard -------------------------------------------------------------------

fn trap_container(layer: Layer) -> Option<Element> {
    match layer {
        Layer::Video => video_panel(),
        Layer::Page => dom::by_id("content"),
        Layer::Menu => dom::by_id("menuPanel"),
    }
}

fn trap_focus(site: &SharedSite, evt: &KeyboardEvent) {
    let layer = site.borrow().overlay.trap_layer();
    let Some(container) = layer.and_then(trap_container) else {
        return;
    };
    let focusables = dom::focusables(&container);
    let active = dom::active_element();
    let current = active.and_then(|a| focusables.iter().position(|f| *f == a));
    if let Some(next) = trap_tab(focusables.len(), current, evt.shift_key()) {
        evt.prevent_default();
        let _ = focusables[next].focus();
    }
}

pub fn escape(site: &SharedSite) {
    let (video_was_open, restores) = {
        let mut s = site.borrow_mut();
        let video = s.overlay.video_open();
        (video, s.overlay.escape())
    };
    if video_was_open {
        hide_video();
    }
    hide_menu();
    hide_page(site);
    for el in &restores {
        dom::restore_focus(el);
    }
}

// --- Wiring ---------------------------------------------------------------------

pub fn install(site: &SharedSite) -> SiteResult<()> {
    let s = site.clone();
    dom::listen_id("menuBtn", "click", move |_: Event| toggle_menu(&s))?;
    let s = site.clone();
    dom::listen_id("menuClose", "click", move |_: Event| close_menu(&s, true))?;
    let s = site.clone();
    dom::listen_id("menuOverlay", "click", move |_: Event| close_menu(&s, true))?;

    for item in menu_items() {
        let s = site.clone();
        let key = item.get_attribute("data-key").unwrap_or_default();
        dom::listen(&item, "click", move |_: Event| open_page(&s, &key))?;
    }

    for event in ["click", "pointerup"] {
        let s = site.clone();
        dom::listen_id("pageClose", event, move |evt: Event| {
            evt.prevent_default();
            evt.stop_propagation();
            close_page(&s);
        })?;
    }
    let s = site.clone();
    dom::listen_id("pageOverlay", "click", move |_: Event| close_page(&s))?;

    let s = site.clone();
    dom::listen_id("btnPrevVideo", "click", move |_: Event| step_video(&s, false))?;
    let s = site.clone();
    dom::listen_id("btnNextVideo", "click", move |_: Event| step_video(&s, true))?;
    let s = site.clone();
    dom::listen_id("videoModalClose", "click", move |_: Event| close_video(&s))?;
    let s = site.clone();
    dom::listen_id("videoModalBg", "click", move |_: Event| close_video(&s))?;

    // Profile links open in a new tab without changing the track.
    let s = site.clone();
    dom::listen_id("videoPlaylist", "click", move |evt: Event| {
        if dom::closest_from_event(&evt, "a").is_some() {
            evt.stop_propagation();
            return;
        }
        let index = dom::closest_from_event(&evt, ".playlist-item")
            .and_then(|row| row.get_attribute("data-index"))
            .and_then(|i| i.parse::<usize>().ok());
        if let Some(index) = index {
            select_video(&s, index);
        }
    })?;

    let doc = dom::document()?;
    let s = site.clone();
    dom::listen(&doc, "click", move |evt: Event| {
        let Some(button) = dom::closest_from_event(&evt, ".playlist-open") else {
            return;
        };
        if button.has_attribute("disabled") {
            return;
        }
        evt.prevent_default();
        evt.stop_propagation();
        open_playlist_from(&s, &button);
    })?;

    let win = web_sys::window().ok_or(crate::error::SiteError::MissingGlobal("window"))?;
    let s = site.clone();
    dom::listen(&win, "keydown", move |evt: KeyboardEvent| match evt.key().as_str() {
        "Tab" => trap_focus(&s, &evt),
        "Escape" => escape(&s),
        _ => {}
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_video_has_no_playlist() {
        let c = VideoCarousel::new("One", vec!["abc".into()], vec![], vec![]).unwrap();
        assert!(playlist_html(&c).is_empty());
    }

    #[test]
    fn playlist_rows_carry_index_and_profile_link() {
        let c = VideoCarousel::new(
            "Set",
            vec!["a".into(), "b".into()],
            vec!["Opening <live>".into()],
            vec!["".into(), "https://www.instagram.com/dj.devil/".into()],
        )
        .unwrap();
        let html = playlist_html(&c);
        assert!(html.starts_with(r#"<div class="playlist-item active" data-index="0">"#));
        assert!(html.contains("1. Opening &lt;live&gt;"));
        assert!(html.contains(r#"data-index="1""#));
        assert!(html.contains("2. Track #2"));
        assert!(html.contains(">@dj.devil</a>"));
        assert_eq!(html.matches("<a ").count(), 1);
    }
}
