//! Error type shared by the DOM adapters and the HTTP helpers.

use thiserror::Error;
use wasm_bindgen::JsValue;

#[derive(Debug, Error)]
pub enum SiteError {
    #[error("no {0}")]
    MissingGlobal(&'static str),
    #[error("element #{0} not found")]
    MissingElement(String),
    #[error("canvas has no 2d context")]
    MissingCanvasContext,
    #[error("javascript error: {0}")]
    Js(String),
    #[error("invalid json: {0}")]
    Json(#[from] serde_json::Error),
    /// Non-2xx response. `message` is already user facing.
    #[error("{message}")]
    Status { status: u16, message: String },
    #[error("server unreachable: {0}")]
    Transport(String),
}

impl SiteError {
    pub fn missing(id: &str) -> Self {
        Self::MissingElement(id.to_string())
    }
}

impl From<JsValue> for SiteError {
    fn from(value: JsValue) -> Self {
        let text = value
            .as_string()
            .or_else(|| {
                js_sys::Reflect::get(&value, &JsValue::from_str("message"))
                    .ok()
                    .and_then(|m| m.as_string())
            })
            .unwrap_or_else(|| format!("{value:?}"));
        SiteError::Js(text)
    }
}

impl From<SiteError> for JsValue {
    fn from(err: SiteError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}

pub type SiteResult<T> = Result<T, SiteError>;
