//! HTML fragments for feed cards, tag bars and the schedule timeline.

use chrono::NaiveDate;

use super::schedule::group_events;
use super::{
    FeedAction, FeedItem, FeedState, ScheduleEvent, TagButton, collect_tags, filter_items, tag_bar,
};

pub const EMPTY_TAG_MESSAGE: &str = "해당 태그 항목이 없습니다.";
pub const SCHEDULE_EMPTY_MESSAGE: &str = "해당 조건의 일정이 없습니다.";
pub const SCHEDULE_ERROR_MESSAGE: &str = "일정을 불러오지 못했습니다. 서버 로그를 확인하세요.";

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Empty-state element instruction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EmptyState {
    Hidden,
    Shown(&'static str),
}

/// Everything the DOM adapter writes for one feed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FeedView {
    /// `None` hides the tag bar.
    pub tag_bar: Option<String>,
    pub list: String,
    pub empty: EmptyState,
}

pub fn render_tag_bar(feed_key: &str, buttons: &[TagButton]) -> String {
    buttons
        .iter()
        .map(|b| {
            let active = if b.active { " active" } else { "" };
            format!(
                r#"<button type="button" class="feed-tag-btn{active}" data-feed-key="{key}" data-tag="{tag}">#{tag}</button>"#,
                key = escape_html(feed_key),
                tag = escape_html(&b.tag),
            )
        })
        .collect()
}

fn render_badges(feed_key: &str, tags: &[&str]) -> String {
    if tags.is_empty() {
        return String::new();
    }
    let buttons: String = tags
        .iter()
        .map(|t| {
            format!(
                r#"<button type="button" class="feed-badge" data-feed-key="{}" data-tag="{tag}">#{tag}</button>"#,
                escape_html(feed_key),
                tag = escape_html(t),
            )
        })
        .collect();
    format!(r#"<div class="feed-badges">{buttons}</div>"#)
}

fn render_action(action: Option<&FeedAction>) -> String {
    match action {
        None => String::new(),
        Some(FeedAction::Disabled { label }) => {
            format!(r#"<button class="btn feed-action" disabled>{}</button>"#, escape_html(label))
        }
        Some(FeedAction::Playlist { label, title, videos, titles, instagrams }) => format!(
            r#"<button class="btn feed-action playlist-open" data-title="{}" data-videos="{}" data-titles="{}" data-instagrams="{}">{}</button>"#,
            escape_html(title),
            escape_html(&videos.join(",")),
            escape_html(&titles.join(",")),
            escape_html(&instagrams.join(",")),
            escape_html(label),
        ),
    }
}

pub fn render_card(feed_key: &str, item: &FeedItem) -> String {
    let meta: String = item
        .meta
        .iter()
        .map(|line| format!("<span>{}</span>", escape_html(line)))
        .collect();
    let cover = if item.cover.is_empty() { "ITEM" } else { item.cover };
    format!(
        concat!(
            r#"<article class="feed-card">"#,
            r#"<div class="feed-card-head"><div>"#,
            r#"<h3 class="feed-card-title">{title}</h3>"#,
            r#"<p class="feed-card-sub">{subtitle}</p>"#,
            r#"</div><span class="feed-card-date">{date}</span></div>"#,
            r#"<div class="feed-cover">{cover}</div>"#,
            r#"<div class="feed-meta">{meta}</div>"#,
            "{badges}{action}",
            "</article>"
        ),
        title = escape_html(item.title),
        subtitle = escape_html(item.subtitle),
        date = escape_html(item.date),
        cover = escape_html(cover),
        meta = meta,
        badges = render_badges(feed_key, item.tags),
        action = render_action(item.action.as_ref()),
    )
}

pub fn render_static_feed(feed_key: &str, items: &[FeedItem], state: &FeedState) -> FeedView {
    let bar = tag_bar(&collect_tags(items), &state.active_tag);
    let filtered = filter_items(items, &state.active_tag);
    let list = filtered.iter().map(|item| render_card(feed_key, item)).collect();
    FeedView {
        tag_bar: bar.map(|b| render_tag_bar(feed_key, &b)),
        list,
        empty: if filtered.is_empty() {
            EmptyState::Shown(EMPTY_TAG_MESSAGE)
        } else {
            EmptyState::Hidden
        },
    }
}

fn subscribe_card(url: &str) -> String {
    format!(
        concat!(
            r#"<article class="schedule-item">"#,
            r#"<div class="schedule-title">iCloud Calendar Subscribe</div>"#,
            r#"<div class="schedule-note">모바일 캘린더 앱에서 실시간으로 동기화할 수 있습니다.</div>"#,
            r#"<a class="btn feed-action" target="_blank" rel="noopener noreferrer" href="{}">📅 Subscribe</a>"#,
            "</article>"
        ),
        escape_html(url)
    )
}

const LOADING_CARD: &str = concat!(
    r#"<div class="schedule-item">"#,
    r#"<div class="schedule-title">Loading schedule...</div>"#,
    r#"<div class="schedule-note">iCloud 캘린더에서 이벤트를 가져오는 중입니다.</div>"#,
    "</div>"
);

pub fn render_schedule(
    events: &[ScheduleEvent],
    state: &FeedState,
    today: NaiveDate,
    subscribe_url: &str,
) -> FeedView {
    let current: Vec<ScheduleEvent> = events.iter().filter(|e| e.is_current(today)).cloned().collect();
    let bar = tag_bar(&collect_tags(&current), &state.active_tag)
        .map(|b| render_tag_bar(super::SCHEDULE_KEY, &b));

    if !state.loaded && state.loading {
        return FeedView { tag_bar: bar, list: LOADING_CARD.to_string(), empty: EmptyState::Hidden };
    }

    let filtered = filter_items(&current, &state.active_tag);
    if filtered.is_empty() {
        let msg = if state.error.is_some() { SCHEDULE_ERROR_MESSAGE } else { SCHEDULE_EMPTY_MESSAGE };
        return FeedView { tag_bar: bar, list: String::new(), empty: EmptyState::Shown(msg) };
    }

    let mut list: String = group_events(&filtered, today)
        .into_iter()
        .map(|(bucket, members)| {
            let cards: String = members
                .iter()
                .map(|ev| {
                    format!(
                        r#"<article class="schedule-item"><div class="schedule-time">{} · {}</div><div class="schedule-title">{}</div></article>"#,
                        escape_html(&ev.date_label()),
                        escape_html(&ev.time_label()),
                        escape_html(&ev.title),
                    )
                })
                .collect();
            format!(
                r#"<section class="schedule-group"><h4 class="schedule-group-title">{}</h4>{cards}</section>"#,
                bucket.label()
            )
        })
        .collect();
    list.push_str(&subscribe_card(subscribe_url));
    FeedView { tag_bar: bar, list, empty: EmptyState::Hidden }
}
