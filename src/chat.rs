//! Devil Coach chat widget. All model calls go through the backend proxy.

use serde::{Deserialize, Serialize};
use wasm_bindgen::JsValue;
use web_sys::{HtmlButtonElement, HtmlElement, KeyboardEvent, MouseEvent};

use crate::api;
use crate::dom;
use crate::error::{SiteError, SiteResult};
use crate::site::SharedSite;

pub const FAILURE_PREFIX: &str = "아 씨발, 서버가 뒤졌네. ";
pub const UNREACHABLE_MESSAGE: &str = "API 서버 연결 실패. 잠시 후 다시 시도해봐.";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ChatTurn {
    pub role: Role,
    pub content: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ChatRequest {
    pub message: String,
    pub history: Vec<ChatTurn>,
}

#[derive(Deserialize)]
struct ChatReply {
    response: String,
}

/// Remove the markdown markers the model likes to emit.
pub fn strip_markdown(text: &str) -> String {
    text.chars().filter(|c| !matches!(c, '*' | '_' | '#' | '`')).collect()
}

/// Text shown in the chat when a request fails.
pub fn failure_text(err: &SiteError) -> String {
    match err {
        SiteError::Status { message, .. } => message.clone(),
        SiteError::Transport(_) => format!("{FAILURE_PREFIX}{UNREACHABLE_MESSAGE}"),
        other => format!("{FAILURE_PREFIX}에러: {other}"),
    }
}

/// Conversation history plus the in-flight guard.
#[derive(Debug, Default)]
pub struct ChatSession {
    history: Vec<ChatTurn>,
    pending: bool,
}

impl ChatSession {
    pub fn history(&self) -> &[ChatTurn] {
        &self.history
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Request for `input`, or `None` when it is blank or a reply is pending.
    /// History sent is the history before this message.
    pub fn begin(&mut self, input: &str) -> Option<ChatRequest> {
        let message = input.trim();
        if message.is_empty() || self.pending {
            return None;
        }
        self.pending = true;
        Some(ChatRequest { message: message.to_string(), history: self.history.clone() })
    }

    /// Record a successful exchange; returns the cleaned reply.
    pub fn complete(&mut self, message: String, raw_reply: &str) -> String {
        let reply = strip_markdown(raw_reply);
        self.history.push(ChatTurn { role: Role::User, content: message });
        self.history.push(ChatTurn { role: Role::Assistant, content: reply.clone() });
        reply
    }

    pub fn finish(&mut self) {
        self.pending = false;
    }
}

// --- DOM ------------------------------------------------------------------------

const USER_BUBBLE: &str = "background: rgba(255,255,255,0.1); align-self: flex-end;";
const COACH_BUBBLE: &str = "background: linear-gradient(135deg, #ff0000 0%, #cc0000 100%); align-self: flex-start;";
const BUBBLE: &str = "padding: 12px 15px; border-radius: 10px; max-width: 80%; animation: fadeIn 0.3s ease-in; color: #fff; line-height: 1.5; font-size: 14px; word-break: break-word; box-shadow: 0 2px 10px rgba(0,0,0,0.2);";

// The input may be an <input> or a <textarea>; both expose `value`.
fn input_value(el: &HtmlElement) -> String {
    js_sys::Reflect::get(el, &JsValue::from_str("value"))
        .ok()
        .and_then(|v| v.as_string())
        .unwrap_or_default()
}

fn clear_input(el: &HtmlElement) {
    let _ = js_sys::Reflect::set(el, &JsValue::from_str("value"), &JsValue::from_str(""));
}

fn append_message(content: &str, from_user: bool) {
    let Some(list) = dom::by_id::<HtmlElement>("coachChatMessages") else {
        return;
    };
    let Ok(doc) = dom::document() else {
        return;
    };
    let Ok(bubble) = doc.create_element("div") else {
        return;
    };
    bubble.set_class_name(if from_user { "user-message" } else { "coach-message" });
    let tone = if from_user { USER_BUBBLE } else { COACH_BUBBLE };
    let _ = bubble.set_attribute("style", &format!("{tone} {BUBBLE}"));
    bubble.set_text_content(Some(content));
    let _ = list.append_child(&bubble);
    list.set_scroll_top(list.scroll_height());
}

fn set_busy(busy: bool) {
    if let Some(btn) = dom::by_id::<HtmlButtonElement>("coachSendBtn") {
        btn.set_disabled(busy);
    }
    if let Some(spinner) = dom::by_id::<HtmlElement>("coachLoading") {
        dom::set_style(&spinner, "display", if busy { "block" } else { "none" });
    }
}

pub fn send(site: &SharedSite) {
    let Some(input) = dom::by_id::<HtmlElement>("coachInput") else {
        return;
    };
    let Some(request) = site.borrow_mut().chat.begin(&input_value(&input)) else {
        return;
    };
    append_message(&request.message, true);
    clear_input(&input);
    set_busy(true);

    let endpoint = site.borrow().config.chat_endpoint.clone();
    let site = site.clone();
    wasm_bindgen_futures::spawn_local(async move {
        let reply: SiteResult<ChatReply> = api::post_json(&endpoint, &request).await;
        let text = match reply {
            Ok(r) => site.borrow_mut().chat.complete(request.message, &r.response),
            Err(err) => {
                log::error!("chat failed: {err}");
                failure_text(&err)
            }
        };
        append_message(&text, false);
        site.borrow_mut().chat.finish();
        set_busy(false);
        let _ = input.focus();
    });
}

pub fn install(site: &SharedSite) -> SiteResult<()> {
    let s = site.clone();
    dom::listen_id("coachSendBtn", "click", move |_: MouseEvent| send(&s))?;
    let s = site.clone();
    dom::listen_id("coachInput", "keypress", move |evt: KeyboardEvent| {
        if evt.key() == "Enter" && !evt.shift_key() {
            evt.prevent_default();
            send(&s);
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_every_marker() {
        assert_eq!(strip_markdown("**뛰어** _now_ # `go` __x__ *y*"), "뛰어 now  go x y");
        assert_eq!(strip_markdown("plain"), "plain");
    }

    #[test]
    fn blank_or_concurrent_sends_are_refused() {
        let mut chat = ChatSession::default();
        assert!(chat.begin("   ").is_none());
        let req = chat.begin("  hi  ").unwrap();
        assert_eq!(req.message, "hi");
        assert!(req.history.is_empty());
        assert!(chat.begin("again").is_none());
        chat.finish();
        assert!(chat.begin("again").is_some());
    }

    #[test]
    fn exchanges_accumulate_history() {
        let mut chat = ChatSession::default();
        let req = chat.begin("why run").unwrap();
        let reply = chat.complete(req.message, "**because**");
        chat.finish();
        assert_eq!(reply, "because");
        let req = chat.begin("ok").unwrap();
        assert_eq!(req.history.len(), 2);
        assert_eq!(req.history[0].role, Role::User);
        assert_eq!(req.history[1].content, "because");
        let body = serde_json::to_value(&req).unwrap();
        assert_eq!(body["history"][1]["role"], "assistant");
        assert_eq!(body["message"], "ok");
    }

    #[test]
    fn failed_exchange_leaves_history_alone() {
        let mut chat = ChatSession::default();
        chat.begin("hello").unwrap();
        chat.finish();
        assert!(chat.history().is_empty());
        assert!(!chat.is_pending());
    }

    #[test]
    fn failure_text_by_kind() {
        let status = SiteError::Status { status: 429, message: "slow".into() };
        assert_eq!(failure_text(&status), "slow");
        let down = SiteError::Transport("Failed to fetch".into());
        assert!(failure_text(&down).contains("연결 실패"));
        let bad = failure_text(&SiteError::Js("boom".into()));
        assert!(bad.starts_with(FAILURE_PREFIX) && bad.contains("boom"));
    }
}
