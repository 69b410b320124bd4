//! Intro sequence, glitch bursts and the entrance gate.

use rand::Rng;
use web_sys::{Element, Event, HtmlElement, HtmlInputElement, KeyboardEvent, window};

use crate::dom::{self, Interval};
use crate::error::{SiteError, SiteResult};
use crate::overlay;
use crate::scramble::{reserve_block, scramble};
use crate::site::SharedSite;

pub const SKULL_SPEED_MS: i32 = 22;
pub const LOGO_SPEED_MS: i32 = 18;
pub const INTRO_STEPS: u32 = 55;
pub const GLITCH_PERIOD_MS: i32 = 360;
pub const GLITCH_CHANCE: f64 = 0.22;
pub const BURST_MS: i32 = 140;
pub const GATE_FADE_MS: i32 = 600;

/// Strong rain while the gate is up.
pub const BOOT_RAIN_TEXT: f64 = 0.34;
pub const BOOT_RAIN_CLEAR: f64 = 0.08;
/// Both rain levels ease here once the gate is passed.
pub const ENTERED_RAIN: f64 = 0.18;

pub const ACCESS_DENIED: &str = "Access denied. Humanity detected.";

/// A touch inside any of these does not replay the intro.
pub const REPLAY_EXCLUDED: &str =
    "#gateOverlay, #menuPanel, #content, #videoModal, button, input, a, textarea, select, label";
const TYPING_TARGETS: &str = "input, textarea, select";

/// Enables the menu when dropped, however the intro sequence ended.
struct MenuRelease(SharedSite);

impl Drop for MenuRelease {
    fn drop(&mut self) {
        overlay::dom::enable_menu(&self.0);
    }
}

fn art_spans() -> Option<(Element, Element)> {
    Some((dom::by_id("skullSpan")?, dom::by_id("logoSpan")?))
}

/// Restart the intro. Any glitch ticker from a previous run stops now.
pub fn play(site: &SharedSite) {
    let site = site.clone();
    wasm_bindgen_futures::spawn_local(async move { run_intro(site).await });
}

/// One intro run; the menu is enabled however it ends.
pub async fn run_intro(site: SharedSite) {
    let run = {
        let mut s = site.borrow_mut();
        s.glitch = None;
        s.next_intro_run()
    };
    let release = MenuRelease(site.clone());
    let Some((skull, logo)) = art_spans() else {
        log::warn!("intro art elements missing");
        return;
    };

    skull.set_text_content(Some(""));
    logo.set_text_content(Some(&reserve_block(LOGO)));
    for el in [&skull, &logo] {
        dom::remove_class(el, "glitch");
        dom::remove_class(el, "burst");
    }

    let sequence = async {
        scramble(skull.clone(), SKULL, SKULL_SPEED_MS, INTRO_STEPS).await?;
        scramble(logo.clone(), LOGO, LOGO_SPEED_MS, INTRO_STEPS).await
    };
    if let Err(err) = sequence.await {
        log::error!("intro animation failed: {err}");
    }
    drop(release);

    if site.borrow().intro_run != run {
        return;
    }
    for el in [&skull, &logo] {
        dom::add_class(el, "glitch");
    }
    start_glitch(&site, skull, logo);
}

fn start_glitch(site: &SharedSite, skull: Element, logo: Element) {
    let s = site.clone();
    let tick = move || {
        if !s.borrow_mut().rng.gen_bool(GLITCH_CHANCE) {
            return;
        }
        for el in [&skull, &logo] {
            dom::add_class(el, "burst");
        }
        let (skull, logo) = (skull.clone(), logo.clone());
        dom::set_timeout(BURST_MS, move || {
            for el in [&skull, &logo] {
                dom::remove_class(el, "burst");
            }
        });
    };
    match Interval::start(GLITCH_PERIOD_MS, tick) {
        Ok(interval) => site.borrow_mut().glitch = Some(interval),
        Err(err) => log::warn!("glitch timer failed: {err}"),
    }
}

// --- Gate -----------------------------------------------------------------------

fn gate_visible() -> bool {
    dom::by_id::<HtmlElement>("gateOverlay").is_some_and(|gate| {
        gate.style().get_property_value("display").map_or(true, |d| d != "none")
    })
}

/// Enter button: pass the gate if the box is ticked.
pub fn enter(site: &SharedSite) {
    let Some(gate) = dom::by_id::<HtmlElement>("gateOverlay") else {
        return;
    };
    let checked = dom::by_id::<HtmlInputElement>("devilCheck").is_some_and(|c| c.checked());
    if !checked {
        if let Some(w) = window() {
            let _ = w.alert_with_message(ACCESS_DENIED);
        }
        return;
    }
    dom::set_style(&gate, "opacity", "0");
    dom::set_style(&gate, "transition", "opacity 0.6s ease");

    let site = site.clone();
    dom::set_timeout(GATE_FADE_MS, move || {
        dom::set_style(&gate, "display", "none");
        site.borrow().with_background(|bg| bg.set_rain_levels(ENTERED_RAIN, ENTERED_RAIN, false));
        overlay::dom::enable_menu(&site);
        play(&site);
        log::info!("gate passed");
    });
}

/// Fill every `.runSkull` block with the skull art.
pub fn seed_run_skulls() {
    let Some(root) = dom::document().ok().and_then(|d| d.document_element()) else {
        return;
    };
    for el in dom::query_all(&root, ".runSkull") {
        el.set_text_content(Some(SKULL.trim()));
    }
}

pub fn install(site: &SharedSite) -> SiteResult<()> {
    let s = site.clone();
    dom::listen_id("enterBtn", "click", move |_: Event| enter(&s))?;

    let doc = dom::document()?;
    dom::listen(&doc, "keydown", move |evt: KeyboardEvent| {
        if evt.key() == "Enter" && gate_visible() {
            if let Some(btn) = dom::by_id::<HtmlElement>("enterBtn") {
                btn.click();
            }
        }
    })?;

    let win = window().ok_or(SiteError::MissingGlobal("window"))?;
    let s = site.clone();
    dom::listen(&win, "keydown", move |evt: KeyboardEvent| {
        // Spaces typed into the chat are not a replay request.
        if evt.code() == "Space" && dom::closest_from_event(&evt, TYPING_TARGETS).is_none() {
            play(&s);
        }
    })?;
    let s = site.clone();
    dom::listen(&win, "touchstart", move |evt: Event| {
        if dom::closest_from_event(&evt, REPLAY_EXCLUDED).is_none() {
            play(&s);
        }
    })
}

// --- Art ------------------------------------------------------------------------

pub const SKULL: &str = r"
 @@@@@                                        @@@@@
@@@@@@@                                      @@@@@@@
@@@@@@@           @@@@@@@@@@@@@@@            @@@@@@@
 @@@@@@@@       @@@@@@@@@@@@@@@@@@@        @@@@@@@@
     @@@@@     @@@@@@@@@@@@@@@@@@@@@     @@@@@
       @@@@@  @@@@@@@@@@@@@@@@@@@@@@@  @@@@@
         @@  @@@@@@@@@@@@@@@@@@@@@@@@@  @@
            @@@@@@@    @@@@@@    @@@@@@
            @@@@@@      @@@@      @@@@@
            @@@@@@      @@@@      @@@@@
             @@@@@@    @@@@@@    @@@@@
              @@@@@@@@@@@  @@@@@@@@@@
               @@@@@@@@@@  @@@@@@@@@
           @@   @@@@@@@@@@@@@@@@@   @@
           @@@@  @@@@ @ @ @ @ @@@@  @@@@
          @@@@@   @@@ @ @ @ @ @@@   @@@@@
        @@@@@      @@@@@@@@@@@@@      @@@@@
      @@@@          @@@@@@@@@@@          @@@@
   @@@@@              @@@@@@@              @@@@@
  @@@@@@@                                 @@@@@@@
   @@@@@                                   @@@@@
";

pub const LOGO: &str = r"
██████╗ ███████╗██╗   ██╗██╗██╗  ████████╗ ██████╗ ██╗    ██╗███╗   ██╗
██╔══██╗██╔════╝██║   ██║██║██║  ╚══██╔══╝██╔═══██╗██║    ██║████╗  ██║
██║  ██║█████╗  ██║   ██║██║██║     ██║   ██║   ██║██║ █╗ ██║██╔██╗ ██║
██║  ██║██╔══╝  ╚██╗ ██╔╝██║██║     ██║   ██║   ██║██║███╗██║██║╚██╗██║
██████╔╝███████╗ ╚████╔╝ ██║███████╗██║   ╚██████╔╝╚███╔███╔╝██║ ╚████║
╚═════╝ ╚══════╝  ╚═══╝  ╚═╝╚══════╝╚═╝    ╚═════╝  ╚══╝╚══╝ ╚═╝  ╚═══╝
";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn art_keeps_its_framing_newlines() {
        assert!(SKULL.starts_with('\n') && SKULL.ends_with('\n'));
        assert_eq!(SKULL.split('\n').count(), 23);
        assert_eq!(LOGO.split('\n').count(), 8);
        assert!(SKULL.trim().starts_with("@@@@@"));
    }

    #[test]
    fn reserved_logo_is_blank_but_same_shape() {
        let reserved = reserve_block(LOGO);
        assert!(reserved.chars().all(char::is_whitespace));
        let shape = |t: &str| t.split('\n').map(|l| l.chars().count()).collect::<Vec<_>>();
        assert_eq!(shape(&reserved), shape(LOGO));
    }
}
