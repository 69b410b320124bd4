// Browser tests for the DOM adapters. Run with `wasm-pack test --headless --firefox`.
#![cfg(target_arch = "wasm32")]

use deviltown::config::SiteConfig;
use deviltown::dom;
use deviltown::intro;
use deviltown::logging;
use deviltown::overlay;
use deviltown::scramble::scramble;
use deviltown::site::{SharedSite, Site};
use wasm_bindgen_test::*;
use web_sys::{Element, HtmlElement};

wasm_bindgen_test_configure!(run_in_browser);

const PAGE: &str = r#"
<button id="menuBtn" aria-expanded="false">menu</button>
<div id="menuOverlay" hidden></div>
<nav id="menuPanel" aria-hidden="true"><button class="menu-item" data-key="mixes">Mixes</button></nav>
<div id="pageOverlay" hidden></div>
<div id="content" aria-hidden="true">
  <h2 id="contentTitle"></h2>
  <section id="sec-mixes">
    <div id="mixesTagBar"></div><div id="mixesFeed"></div><div id="mixesEmpty" hidden></div>
  </section>
</div>
<div id="videoModal" aria-hidden="true"><div class="video-modal-panel">
  <h3 id="videoModalTitle"></h3><iframe id="videoModalFrame"></iframe>
  <span id="videoCounter"></span><button id="btnPrevVideo"></button><button id="btnNextVideo"></button>
  <div id="videoPlaylist"></div>
</div></div>
"#;

fn mount() -> SharedSite {
    dom::body().unwrap().set_inner_html(PAGE);
    for class in ["menu-open", "page-open", "video-open", "menu-ready"] {
        dom::set_body_class(class, false);
    }
    Site::new(SiteConfig::default(), ["mixes", "archive"]).into_shared()
}

fn text(id: &str) -> String {
    dom::by_id::<Element>(id).and_then(|e| e.text_content()).unwrap_or_default()
}

#[wasm_bindgen_test]
fn menu_stays_shut_until_enabled() {
    let site = mount();
    overlay::dom::open_menu(&site, "mixes");
    assert!(!dom::body_has_class("menu-open"));

    overlay::dom::enable_menu(&site);
    assert!(dom::body_has_class("menu-ready"));
    overlay::dom::open_menu(&site, "mixes");
    assert!(dom::body_has_class("menu-open"));
    let btn = dom::by_id::<Element>("menuBtn").unwrap();
    assert_eq!(btn.get_attribute("aria-expanded").as_deref(), Some("true"));
}

#[wasm_bindgen_test]
fn page_renders_feed_and_closes_with_video() {
    let site = mount();
    overlay::dom::open_page(&site, "mixes");
    assert!(dom::body_has_class("page-open"));
    assert_eq!(text("contentTitle"), "Mixes");
    let feed = dom::by_id::<Element>("mixesFeed").unwrap();
    assert_eq!(feed.query_selector_all(".feed-card").unwrap().length(), 3);

    let carousel =
        overlay::VideoCarousel::new("Set", vec!["a".into(), "PLx".into()], vec![], vec![]).unwrap();
    overlay::dom::open_video(&site, carousel);
    assert!(dom::body_has_class("video-open"));
    assert_eq!(text("videoCounter"), "1 / 2");

    overlay::dom::close_page(&site);
    assert!(!dom::body_has_class("video-open"));
    assert!(!dom::body_has_class("page-open"));
    let frame = dom::by_id::<web_sys::HtmlIFrameElement>("videoModalFrame").unwrap();
    assert_eq!(frame.get_attribute("src").as_deref(), Some(""));
}

#[wasm_bindgen_test]
fn unknown_page_changes_nothing() {
    let site = mount();
    overlay::dom::open_page(&site, "nowhere");
    assert!(!dom::body_has_class("page-open"));
    assert_eq!(text("contentTitle"), "");
}

#[wasm_bindgen_test]
async fn scramble_ends_on_exact_text() {
    let _site = mount();
    let el: HtmlElement = dom::by_id("contentTitle").unwrap();
    scramble(el.clone().into(), "AB C\n\nDE", 1, 4).await.unwrap();
    assert_eq!(el.text_content().as_deref(), Some("AB C\n\nDE"));
}

#[wasm_bindgen_test]
async fn intro_without_art_still_enables_menu() {
    let site = mount();
    assert!(dom::by_id::<Element>("skullSpan").is_none());
    intro::run_intro(site.clone()).await;
    assert!(dom::body_has_class("menu-ready"));
    assert!(site.borrow().overlay.menu_enabled());
    assert!(site.borrow().glitch.is_none());
}

#[wasm_bindgen_test]
fn second_logger_init_only_moves_the_level() {
    logging::init(log::LevelFilter::Warn);
    logging::init(log::LevelFilter::Debug);
    assert_eq!(log::max_level(), log::LevelFilter::Debug);
}
