//! JSON-over-fetch helpers for the backend proxy endpoints and the mapping of
//! failed responses to user-facing text.

use serde::Serialize;
use serde::de::DeserializeOwned;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Request, RequestInit, Response, window};

use crate::error::{SiteError, SiteResult};

pub const UNSTABLE_MESSAGE: &str = "서버가 잠깐 불안정하다. 잠시 후 다시 시도하거나 새로고침해라.";
pub const TOO_LARGE_MESSAGE: &str = "요청 값이 너무 길다. 입력을 줄여서 다시 시도해라.";
pub const BAD_REQUEST_MESSAGE: &str = "요청 형식이 잘못됐다. 다시 시도해라.";

/// Message for a non-2xx response. `detail` is the server's `{"detail": ..}`
/// string when it sent one; 5xx ignores it.
pub fn status_message(
    status: u16,
    retry_after: Option<&str>,
    detail: Option<&str>,
    default: &str,
) -> String {
    let detail = detail.filter(|d| !d.is_empty());
    match status {
        429 => detail.map(str::to_string).unwrap_or_else(|| {
            let wait = match retry_after.map(str::trim).filter(|r| !r.is_empty()) {
                Some(secs) => format!("{secs}초"),
                None => "잠시".to_string(),
            };
            format!("요청이 너무 많다. {wait} 후 다시 시도하거나 새로고침해라.")
        }),
        s if s >= 500 => UNSTABLE_MESSAGE.to_string(),
        413 => detail.unwrap_or(TOO_LARGE_MESSAGE).to_string(),
        400 => detail.unwrap_or(BAD_REQUEST_MESSAGE).to_string(),
        _ => detail.unwrap_or(default).to_string(),
    }
}

/// `detail` field of an error body, if it is a string.
pub fn error_detail(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value.get("detail")?.as_str().map(str::to_string)
}

async fn send(request: Request) -> SiteResult<Response> {
    let win = window().ok_or(SiteError::MissingGlobal("window"))?;
    let resp = JsFuture::from(win.fetch_with_request(&request))
        .await
        .map_err(|e| SiteError::Transport(SiteError::from(e).to_string()))?;
    resp.dyn_into::<Response>()
        .map_err(|_| SiteError::Transport("fetch resolved to a non-response".into()))
}

async fn body_text(resp: &Response) -> SiteResult<String> {
    let text = JsFuture::from(resp.text()?).await?;
    Ok(text.as_string().unwrap_or_default())
}

async fn read_json<T: DeserializeOwned>(resp: Response, default_error: &str) -> SiteResult<T> {
    if !resp.ok() {
        let status = resp.status();
        let retry_after = resp.headers().get("Retry-After").ok().flatten();
        let detail = body_text(&resp).await.ok().and_then(|b| error_detail(&b));
        let message = status_message(status, retry_after.as_deref(), detail.as_deref(), default_error);
        log::warn!("{} -> HTTP {status}", resp.url());
        return Err(SiteError::Status { status, message });
    }
    let text = body_text(&resp).await?;
    Ok(serde_json::from_str(&text)?)
}

pub async fn post_json<B: Serialize, T: DeserializeOwned>(url: &str, body: &B) -> SiteResult<T> {
    let init = RequestInit::new();
    init.set_method("POST");
    init.set_body(&serde_json::to_string(body)?.into());
    let request = Request::new_with_str_and_init(url, &init)?;
    request.headers().set("Content-Type", "application/json")?;
    let resp = send(request).await?;
    let status = resp.status();
    read_json(resp, &format!("Server error: {status}")).await
}

pub async fn get_json<T: DeserializeOwned>(url: &str) -> SiteResult<T> {
    let init = RequestInit::new();
    init.set_method("GET");
    let request = Request::new_with_str_and_init(url, &init)?;
    request.headers().set("Accept", "application/json")?;
    let resp = send(request).await?;
    let status = resp.status();
    read_json(resp, &format!("HTTP {status}")).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rate_limit_mentions_retry_after_seconds() {
        let msg = status_message(429, Some("5"), None, "x");
        assert!(msg.contains("5초"), "{msg}");
        let msg = status_message(429, None, None, "x");
        assert!(msg.contains("잠시 후"));
        assert_eq!(status_message(429, Some("5"), Some("slow down"), "x"), "slow down");
    }

    #[test]
    fn server_errors_ignore_detail() {
        assert_eq!(status_message(500, None, Some("stack trace"), "x"), UNSTABLE_MESSAGE);
        assert_eq!(status_message(503, Some("9"), None, "x"), UNSTABLE_MESSAGE);
    }

    #[test]
    fn client_errors_prefer_detail() {
        assert_eq!(status_message(413, None, None, "x"), TOO_LARGE_MESSAGE);
        assert_eq!(status_message(413, None, Some("max 500 chars"), "x"), "max 500 chars");
        assert_eq!(status_message(400, None, Some(""), "x"), BAD_REQUEST_MESSAGE);
        assert_eq!(status_message(404, None, None, "Server error: 404"), "Server error: 404");
        assert_eq!(status_message(403, None, Some("nope"), "d"), "nope");
    }

    #[test]
    fn detail_is_read_only_from_strings() {
        assert_eq!(error_detail(r#"{"detail":"too long"}"#).as_deref(), Some("too long"));
        assert_eq!(error_detail(r#"{"detail":[{"loc":"body"}]}"#), None);
        assert_eq!(error_detail("<html>"), None);
    }
}
