//! Deviltown site engine.
//!
//! Everything on the page that moves: the digital-rain canvas, the ASCII intro
//! with its entrance gate, the menu / page / video overlays, the tag-filtered
//! feeds, the Skull Dice roll and the Devil Coach chat. Pure state lives in
//! plain types with native tests; each module's `dom` side is a thin web-sys
//! adapter wired up by [`start_site`].

use std::cell::RefCell;

use wasm_bindgen::prelude::*;

pub mod api;
pub mod background;
pub mod chat;
pub mod config;
pub mod dice;
pub mod dom;
pub mod error;
pub mod feed;
pub mod intro;
pub mod logging;
pub mod overlay;
pub mod scramble;
pub mod site;

use config::{DeviceProfile, SiteConfig};
use error::{SiteError, SiteResult};
use site::{SharedSite, Site};

// Optional small allocator for size (feature gated)
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

thread_local! {
    static SITE: RefCell<Option<SharedSite>> = const { RefCell::new(None) };
}

const CANVAS_ID: &str = "noise";

// -----------------------------------------------------------------------------
// Entrypoints
// -----------------------------------------------------------------------------

/// Boot with defaults for the detected device.
#[wasm_bindgen]
pub fn start_site() -> Result<(), JsValue> {
    boot(SiteConfig::for_profile(DeviceProfile::detect())).map_err(Into::into)
}

/// Boot with a JSON object overriding any `SiteConfig` field.
#[wasm_bindgen]
pub fn start_site_with_config(json: &str) -> Result<(), JsValue> {
    let config = SiteConfig::from_json(DeviceProfile::detect(), json).map_err(SiteError::from)?;
    boot(config).map_err(Into::into)
}

/// Replay the intro sequence.
#[wasm_bindgen]
pub fn play_intro() -> Result<(), JsValue> {
    let site = SITE
        .with(|s| s.borrow().clone())
        .ok_or_else(|| JsValue::from_str("site not started"))?;
    intro::play(&site);
    Ok(())
}

fn boot(config: SiteConfig) -> SiteResult<()> {
    logging::init(config.level_filter());
    if SITE.with(|s| s.borrow().is_some()) {
        log::warn!("site already started");
        return Ok(());
    }

    let background = background::canvas::start_background(CANVAS_ID, &config)?;
    background
        .borrow_mut()
        .background_mut()
        .set_rain_levels(intro::BOOT_RAIN_TEXT, intro::BOOT_RAIN_CLEAR, true);

    // Sections missing from the markup can never be opened.
    let sections: Vec<&str> = overlay::SECTION_KEYS
        .into_iter()
        .filter(|key| dom::by_id::<web_sys::Element>(&format!("sec-{key}")).is_some())
        .collect();
    let mut state = Site::new(config, sections);
    state.background = Some(background);
    let site = state.into_shared();

    intro::seed_run_skulls();
    overlay::dom::install(&site)?;
    feed::dom::install(&site)?;
    dice::install(&site)?;
    chat::install(&site)?;
    intro::install(&site)?;
    feed::dom::init_feeds(&site);

    // Without a gate there is nothing to wait for.
    if dom::by_id::<web_sys::Element>("gateOverlay").is_none() {
        overlay::dom::enable_menu(&site);
        intro::play(&site);
    }

    SITE.with(|s| *s.borrow_mut() = Some(site));
    log::info!("deviltown started");
    Ok(())
}
