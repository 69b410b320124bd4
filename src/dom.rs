//! Small web-sys conveniences shared by the DOM adapters.

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, EventTarget, HtmlElement, window};

use crate::error::{SiteError, SiteResult};

pub fn document() -> SiteResult<Document> {
    window()
        .ok_or(SiteError::MissingGlobal("window"))?
        .document()
        .ok_or(SiteError::MissingGlobal("document"))
}

pub fn body() -> Option<HtmlElement> {
    document().ok()?.body()
}

/// Element by id, cast to `T`. Missing or mistyped elements are `None`.
pub fn by_id<T: JsCast>(id: &str) -> Option<T> {
    document().ok()?.get_element_by_id(id)?.dyn_into::<T>().ok()
}

pub fn query_all(root: &Element, selector: &str) -> Vec<Element> {
    let Ok(list) = root.query_selector_all(selector) else {
        return Vec::new();
    };
    (0..list.length())
        .filter_map(|i| list.item(i))
        .filter_map(|n| n.dyn_into::<Element>().ok())
        .collect()
}

pub fn add_class(el: &Element, class: &str) {
    let _ = el.class_list().add_1(class);
}

pub fn remove_class(el: &Element, class: &str) {
    let _ = el.class_list().remove_1(class);
}

pub fn toggle_class(el: &Element, class: &str, on: bool) {
    let _ = el.class_list().toggle_with_force(class, on);
}

pub fn body_has_class(class: &str) -> bool {
    body().is_some_and(|b| b.class_list().contains(class))
}

pub fn set_body_class(class: &str, on: bool) {
    if let Some(b) = body() {
        toggle_class(&b, class, on);
    }
}

pub fn set_style(el: &HtmlElement, prop: &str, value: &str) {
    let _ = el.style().set_property(prop, value);
}

pub fn active_element() -> Option<HtmlElement> {
    document().ok()?.active_element()?.dyn_into::<HtmlElement>().ok()
}

/// `focus()` only if the element is still attached.
pub fn restore_focus(el: &HtmlElement) {
    if el.is_connected() {
        let _ = el.focus();
    }
}

const FOCUSABLE_SELECTOR: &str = "a[href],button:not([disabled]),input:not([disabled]),select:not([disabled]),textarea:not([disabled]),[tabindex]:not([tabindex='-1'])";

/// Visible, enabled, tabbable descendants in document order.
pub fn focusables(container: &Element) -> Vec<HtmlElement> {
    query_all(container, FOCUSABLE_SELECTOR)
        .into_iter()
        .filter_map(|e| e.dyn_into::<HtmlElement>().ok())
        .filter(|e| !e.has_attribute("hidden") && e.offset_parent().is_some())
        .collect()
}

/// Focus the first focusable in `container` on the next animation frame.
pub fn focus_first_next_frame(container: Element) {
    let cb = Closure::once_into_js(move || {
        if let Some(first) = focusables(&container).first() {
            let _ = first.focus();
        }
    });
    if let Some(w) = window() {
        let _ = w.request_animation_frame(cb.unchecked_ref());
    }
}

pub fn set_timeout(ms: i32, f: impl FnOnce() + 'static) {
    let cb = Closure::once_into_js(f);
    if let Some(w) = window() {
        let _ = w.set_timeout_with_callback_and_timeout_and_arguments_0(cb.unchecked_ref(), ms);
    }
}

pub fn clear_interval(id: i32) {
    if let Some(w) = window() {
        w.clear_interval_with_handle(id);
    }
}

/// Repeating timer that is cleared when dropped. Never drop it from inside
/// its own callback; clear by id there instead.
pub struct Interval {
    id: i32,
    _callback: Closure<dyn FnMut()>,
}

impl Interval {
    pub fn start(ms: i32, f: impl FnMut() + 'static) -> SiteResult<Self> {
        let win = window().ok_or(SiteError::MissingGlobal("window"))?;
        let callback = Closure::wrap(Box::new(f) as Box<dyn FnMut()>);
        let id = win.set_interval_with_callback_and_timeout_and_arguments_0(
            callback.as_ref().unchecked_ref(),
            ms,
        )?;
        Ok(Self { id, _callback: callback })
    }

    pub fn id(&self) -> i32 {
        self.id
    }
}

impl Drop for Interval {
    fn drop(&mut self) {
        clear_interval(self.id);
    }
}

/// Attach a listener for the lifetime of the page.
pub fn listen<E: JsCast + 'static>(
    target: &EventTarget,
    event: &str,
    mut f: impl FnMut(E) + 'static,
) -> SiteResult<()> {
    let closure = Closure::wrap(Box::new(move |evt: web_sys::Event| {
        if let Ok(evt) = evt.dyn_into::<E>() {
            f(evt);
        }
    }) as Box<dyn FnMut(web_sys::Event)>);
    target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}

/// `listen` on an element looked up by id; absent elements are skipped.
pub fn listen_id<E: JsCast + 'static>(
    id: &str,
    event: &str,
    f: impl FnMut(E) + 'static,
) -> SiteResult<()> {
    match by_id::<EventTarget>(id) {
        Some(target) => listen(&target, event, f),
        None => {
            log::debug!("#{id} absent, no {event} listener");
            Ok(())
        }
    }
}

/// Closest ancestor (or self) of the event target matching `selector`.
pub fn closest_from_event(evt: &web_sys::Event, selector: &str) -> Option<Element> {
    evt.target()?.dyn_into::<Element>().ok()?.closest(selector).ok()?
}
