//! Calendar-backed schedule feed: record mapping, time buckets, labels.

use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::Deserialize;
use serde_json::Value;

use super::{Tagged, normalized_tags};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ScheduleBucket {
    Today,
    ThisWeek,
    ThisMonth,
    Upcoming,
}

impl ScheduleBucket {
    /// Render order.
    pub const ORDER: [ScheduleBucket; 4] = [
        ScheduleBucket::Today,
        ScheduleBucket::ThisWeek,
        ScheduleBucket::ThisMonth,
        ScheduleBucket::Upcoming,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ScheduleBucket::Today => "Today",
            ScheduleBucket::ThisWeek => "This Week",
            ScheduleBucket::ThisMonth => "This Month",
            ScheduleBucket::Upcoming => "Upcoming",
        }
    }

    /// Whole-day difference from `today`, all in local time.
    pub fn classify(day: NaiveDate, today: NaiveDate) -> Self {
        let diff = (day - today).num_days();
        if diff == 0 {
            ScheduleBucket::Today
        } else if (1..=7).contains(&diff) {
            ScheduleBucket::ThisWeek
        } else if day.month() == today.month() && day.year() == today.year() {
            ScheduleBucket::ThisMonth
        } else {
            ScheduleBucket::Upcoming
        }
    }
}

/// Calendar record as served by `/calendar/events`. Loosely typed on purpose:
/// bad fields degrade to defaults instead of failing the whole payload.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawEvent {
    id: Value,
    title: Value,
    location: Value,
    notes: Value,
    categories: Value,
    start: Value,
    end: Value,
    all_day: Value,
}

fn non_empty_string(v: &Value) -> Option<String> {
    match v {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn truthy(v: &Value) -> bool {
    match v {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Parse a calendar timestamp into local wall-clock time.
///
/// Accepts RFC 3339 (any offset), naive `YYYY-MM-DDTHH:MM[:SS[.f]]` (already
/// local) and bare dates, which count as UTC midnight.
pub fn parse_timestamp(raw: &str, local: &FixedOffset) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(local).naive_local());
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(naive);
        }
    }
    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()?;
    let utc = Utc.from_utc_datetime(&date.and_hms_opt(0, 0, 0)?);
    Some(utc.with_timezone(local).naive_local())
}

#[derive(Clone, Debug, PartialEq)]
pub struct ScheduleEvent {
    pub id: String,
    pub title: String,
    pub location: String,
    pub notes: String,
    pub categories: Vec<String>,
    pub start: NaiveDateTime,
    pub end: Option<NaiveDateTime>,
    pub all_day: bool,
}

impl Tagged for ScheduleEvent {
    fn tags(&self) -> Vec<String> {
        self.categories.clone()
    }
}

impl ScheduleEvent {
    /// `None` when the start timestamp is missing or unparseable.
    pub fn from_value(raw: &Value, idx: usize, local: &FixedOffset) -> Option<Self> {
        let raw: RawEvent = serde_json::from_value(raw.clone()).ok()?;
        let start = raw.start.as_str().and_then(|s| parse_timestamp(s, local))?;
        let end = raw.end.as_str().and_then(|s| parse_timestamp(s, local));
        let categories = match &raw.categories {
            Value::Array(list) => normalized_tags(list.iter().filter_map(Value::as_str)),
            _ => Vec::new(),
        };
        Some(Self {
            id: non_empty_string(&raw.id).unwrap_or_else(|| format!("ev-{idx}")),
            title: non_empty_string(&raw.title).unwrap_or_else(|| "Untitled".to_string()),
            location: non_empty_string(&raw.location).unwrap_or_default(),
            notes: non_empty_string(&raw.notes).unwrap_or_default(),
            categories,
            start,
            end,
            all_day: truthy(&raw.all_day),
        })
    }

    /// Korean locale short date, e.g. `2026. 3. 7.`
    pub fn date_label(&self) -> String {
        let d = self.start.date();
        format!("{}. {}. {}.", d.year(), d.month(), d.day())
    }

    pub fn time_label(&self) -> String {
        if self.all_day {
            return "All day".to_string();
        }
        let start = self.start.format("%H:%M");
        match self.end {
            Some(end) => format!("{start} - {}", end.format("%H:%M")),
            None => start.to_string(),
        }
    }

    /// Still relevant at or after local midnight of `today`.
    pub fn is_current(&self, today: NaiveDate) -> bool {
        let midnight = today.and_hms_opt(0, 0, 0).unwrap_or(NaiveDateTime::MIN);
        self.end.unwrap_or(self.start) >= midnight
    }

    pub fn bucket(&self, today: NaiveDate) -> ScheduleBucket {
        ScheduleBucket::classify(self.start.date(), today)
    }
}

/// Map a `/calendar/events` payload, dropping unusable records.
pub fn parse_events(payload: &Value, local: &FixedOffset) -> Vec<ScheduleEvent> {
    let Some(events) = payload.get("events").and_then(Value::as_array) else {
        return Vec::new();
    };
    events
        .iter()
        .enumerate()
        .filter_map(|(idx, raw)| ScheduleEvent::from_value(raw, idx, local))
        .collect()
}

/// Current events grouped by bucket in render order; empty groups omitted.
pub fn group_events<'a>(
    events: &[&'a ScheduleEvent],
    today: NaiveDate,
) -> Vec<(ScheduleBucket, Vec<&'a ScheduleEvent>)> {
    ScheduleBucket::ORDER
        .iter()
        .map(|&bucket| {
            let members: Vec<&ScheduleEvent> =
                events.iter().copied().filter(|ev| ev.bucket(today) == bucket).collect();
            (bucket, members)
        })
        .filter(|(_, members)| !members.is_empty())
        .collect()
}
