//! Writes rendered feeds into `#{key}Feed`, `#{key}TagBar` and `#{key}Empty`.

use chrono::{FixedOffset, NaiveDate, Offset, Utc};
use web_sys::{Event, HtmlElement};

use super::html::{EmptyState, FeedView, render_schedule, render_static_feed};
use super::{FEED_KEYS, SCHEDULE_KEY, data, is_feed_key, schedule};
use crate::api;
use crate::dom;
use crate::error::SiteResult;
use crate::site::SharedSite;

/// The browser's current UTC offset.
pub fn local_offset() -> FixedOffset {
    // getTimezoneOffset is UTC minus local, in minutes.
    let minutes = js_sys::Date::new_0().get_timezone_offset();
    FixedOffset::west_opt((minutes * 60.0) as i32).unwrap_or_else(|| Utc.fix())
}

pub fn local_today() -> Option<NaiveDate> {
    let now = js_sys::Date::new_0();
    NaiveDate::from_ymd_opt(now.get_full_year() as i32, now.get_month() + 1, now.get_date())
}

fn apply(key: &str, view: FeedView) {
    let Some(list) = dom::by_id::<HtmlElement>(&format!("{key}Feed")) else {
        return;
    };
    list.set_inner_html(&view.list);

    if let Some(bar) = dom::by_id::<HtmlElement>(&format!("{key}TagBar")) {
        match &view.tag_bar {
            Some(html) => {
                bar.set_inner_html(html);
                bar.set_hidden(false);
            }
            None => {
                bar.set_inner_html("");
                bar.set_hidden(true);
            }
        }
    }
    if let Some(empty) = dom::by_id::<HtmlElement>(&format!("{key}Empty")) {
        match view.empty {
            EmptyState::Shown(message) => {
                empty.set_text_content(Some(message));
                empty.set_hidden(false);
            }
            EmptyState::Hidden => empty.set_hidden(true),
        }
    }
}

fn render_schedule_now(site: &SharedSite) {
    let Some(today) = local_today() else {
        return;
    };
    let view = {
        let s = site.borrow();
        let Some(state) = s.feeds.state(SCHEDULE_KEY) else {
            return;
        };
        render_schedule(s.feeds.schedule(), state, today, &s.config.calendar_subscribe_url)
    };
    apply(SCHEDULE_KEY, view);
}

fn load_schedule(site: &SharedSite) {
    if !site.borrow_mut().feeds.begin_schedule_load() {
        return;
    }
    render_schedule_now(site);

    let endpoint = site.borrow().config.calendar_endpoint.clone();
    let site = site.clone();
    wasm_bindgen_futures::spawn_local(async move {
        let result = api::get_json::<serde_json::Value>(&endpoint)
            .await
            .map(|payload| schedule::parse_events(&payload, &local_offset()))
            .map_err(|err| {
                log::error!("schedule load failed: {err}");
                err.to_string()
            });
        if let Ok(events) = &result {
            log::info!("schedule loaded, {} events", events.len());
        }
        site.borrow_mut().feeds.finish_schedule_load(result);
        render_schedule_now(&site);
    });
}

/// Render one feed; the schedule feed also kicks off its one-time load.
pub fn render_feed_section(site: &SharedSite, key: &str) {
    if !is_feed_key(key) {
        return;
    }
    if key == SCHEDULE_KEY {
        render_schedule_now(site);
        let loaded = site.borrow().feeds.state(SCHEDULE_KEY).is_some_and(|s| s.loaded);
        if !loaded {
            load_schedule(site);
        }
        return;
    }
    let view = {
        let s = site.borrow();
        let Some(state) = s.feeds.state(key) else {
            return;
        };
        render_static_feed(key, data::items(key), state)
    };
    apply(key, view);
}

pub fn set_feed_tag(site: &SharedSite, key: &str, tag: Option<&str>) {
    if site.borrow_mut().feeds.set_tag(key, tag) {
        render_feed_section(site, key);
    }
}

pub fn init_feeds(site: &SharedSite) {
    for key in FEED_KEYS {
        render_feed_section(site, key);
    }
}

/// Tag bar buttons and card badges both retarget their feed's filter.
pub fn install(site: &SharedSite) -> SiteResult<()> {
    let doc = dom::document()?;
    let s = site.clone();
    dom::listen(&doc, "click", move |evt: Event| {
        let Some(button) = dom::closest_from_event(&evt, ".feed-tag-btn")
            .or_else(|| dom::closest_from_event(&evt, ".feed-badge"))
        else {
            return;
        };
        evt.prevent_default();
        let key = button.get_attribute("data-feed-key").unwrap_or_default();
        let tag = button.get_attribute("data-tag");
        set_feed_tag(&s, &key, tag.as_deref());
    })
}
