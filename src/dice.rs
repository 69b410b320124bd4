//! Skull Dice: roll a running distance, then ask the backend for a comment.

use std::cell::Cell;
use std::rc::Rc;

use rand::Rng;
use serde::{Deserialize, Serialize};
use web_sys::{Element, HtmlElement};

use crate::api;
use crate::dom::{self, Interval};
use crate::site::SharedSite;

pub const ROLL_INTERVAL_MS: i32 = 70;
/// Flicker frames shown before the result; the roll settles on the tick after.
pub const ROLL_STEPS: u32 = 25;
pub const COMMENT_FALLBACK: &str = "당장 뛰어! 지옥이 기다린다. (API 오류)";

/// Final distance: 1% rest day, 1% full marathon, 5% long slow run, else 3..=21 km.
pub fn pick_distance<R: Rng + ?Sized>(rng: &mut R) -> String {
    let roll: f64 = rng.gen_range(0.0..100.0);
    if roll < 1.0 {
        "0km".to_string()
    } else if roll < 2.0 {
        "42.195km".to_string()
    } else if roll < 7.0 {
        "30km LSD".to_string()
    } else {
        format!("{}km", rng.gen_range(3..=21))
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DiceTick {
    /// Random km shown while rolling.
    pub flicker: u32,
    pub result: Option<String>,
}

#[derive(Debug, Default)]
pub struct DiceGame {
    rolling: bool,
    steps: u32,
}

impl DiceGame {
    pub fn is_rolling(&self) -> bool {
        self.rolling
    }

    /// Claim a roll. False while one is already in progress.
    pub fn try_start(&mut self) -> bool {
        if self.rolling {
            return false;
        }
        self.rolling = true;
        self.steps = 0;
        true
    }

    pub fn tick<R: Rng + ?Sized>(&mut self, rng: &mut R) -> DiceTick {
        self.steps += 1;
        let flicker = rng.gen_range(0..42);
        let result = (self.steps > ROLL_STEPS).then(|| pick_distance(rng));
        DiceTick { flicker, result }
    }

    /// Release the guard once the comment request has settled.
    pub fn finish(&mut self) {
        self.rolling = false;
        self.steps = 0;
    }
}

#[derive(Serialize)]
struct CommentRequest<'a> {
    distance: &'a str,
}

#[derive(Deserialize)]
struct CommentResponse {
    comment: String,
}

// --- DOM ------------------------------------------------------------------------

const ROLLING_HTML: &str = r#"<div style="font-size: 1.2rem; color: #ff0000; font-weight: bold; animation: pulse 0.5s infinite;">운명을 결정하는 중...</div>"#;

fn flicker_html(km: u32) -> String {
    format!(
        r#"<div style="font-size: 3.5rem; font-weight: 900; color: #ff0000; text-shadow: 0 0 15px rgba(255,0,0,0.5);">{km}km...</div>"#
    )
}

fn result_html(distance: &str) -> String {
    format!(
        concat!(
            r#"<div style="font-size: 4rem; font-weight: 900; color: #ff0000; text-shadow: 0 0 20px rgba(255,0,0,0.6); line-height: 1; margin: 0;">{}</div>"#,
            r#"<div id="diceComment" style="font-size: 1.1rem; color: #fff; font-weight: bold; margin-top: 15px; text-align: center; opacity: 0.8;">"#,
            r#"<span class="blink">악마가 코멘트를 생각하는 중...</span></div>"#
        ),
        crate::feed::html::escape_html(distance)
    )
}

pub fn install(site: &SharedSite) -> crate::error::SiteResult<()> {
    let s = site.clone();
    dom::listen_id("skullGameBtn", "click", move |_: web_sys::MouseEvent| roll(&s))
}

fn skull() -> Option<Element> {
    dom::by_id::<Element>("skullSpan")
}

pub fn roll(site: &SharedSite) {
    let Some(target) = dom::by_id::<HtmlElement>("miniGameResult") else {
        return;
    };
    if !site.borrow_mut().dice.try_start() {
        return;
    }
    dom::set_style(&target, "display", "flex");
    target.set_inner_html(ROLLING_HTML);
    if let Some(sk) = skull() {
        dom::add_class(&sk, "burst");
    }

    let own_id: Rc<Cell<Option<i32>>> = Rc::new(Cell::new(None));
    let tick = {
        let site = site.clone();
        let own_id = own_id.clone();
        move || {
            let step = {
                let mut s = site.borrow_mut();
                let s = &mut *s;
                s.dice.tick(&mut s.rng)
            };
            target.set_inner_html(&flicker_html(step.flicker));
            if let Some(distance) = step.result {
                if let Some(id) = own_id.get() {
                    dom::clear_interval(id);
                }
                settle(site.clone(), target.clone(), distance);
            }
        }
    };
    match Interval::start(ROLL_INTERVAL_MS, tick) {
        Ok(interval) => {
            own_id.set(Some(interval.id()));
            // Replacing the previous (finished) roll's timer drops it here.
            site.borrow_mut().dice_timer = Some(interval);
        }
        Err(err) => {
            log::error!("dice timer failed: {err}");
            site.borrow_mut().dice.finish();
        }
    }
}

fn settle(site: SharedSite, target: HtmlElement, distance: String) {
    if let Some(sk) = skull() {
        dom::remove_class(&sk, "burst");
    }
    target.set_inner_html(&result_html(&distance));
    let endpoint = site.borrow().config.dice_endpoint.clone();

    wasm_bindgen_futures::spawn_local(async move {
        let reply: Result<CommentResponse, _> =
            api::post_json(&endpoint, &CommentRequest { distance: &distance }).await;
        let text = match reply {
            Ok(r) => r.comment,
            Err(err) => {
                log::error!("dice comment failed: {err}");
                match err {
                    crate::error::SiteError::Status { message, .. } => message,
                    _ => COMMENT_FALLBACK.to_string(),
                }
            }
        };
        if let Some(comment) = dom::by_id::<HtmlElement>("diceComment") {
            comment.set_text_content(Some(&text));
            dom::set_style(&comment, "opacity", "1");
        }
        site.borrow_mut().dice.finish();
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn valid(distance: &str) -> bool {
        match distance {
            "0km" | "42.195km" | "30km LSD" => true,
            other => other
                .strip_suffix("km")
                .and_then(|n| n.parse::<u32>().ok())
                .is_some_and(|n| (3..=21).contains(&n)),
        }
    }

    #[test]
    fn reentrant_roll_is_rejected() {
        let mut game = DiceGame::default();
        assert!(game.try_start());
        assert!(!game.try_start());
        game.finish();
        assert!(game.try_start());
    }

    #[test]
    fn settles_after_fixed_number_of_ticks() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut game = DiceGame::default();
        game.try_start();
        for _ in 0..ROLL_STEPS {
            let t = game.tick(&mut rng);
            assert!(t.result.is_none());
            assert!(t.flicker < 42);
        }
        let last = game.tick(&mut rng);
        let result = last.result.expect("settles on tick 26");
        assert!(valid(&result), "{result}");
        // still guarded until the comment settles
        assert!(game.is_rolling());
    }

    #[test]
    fn every_distance_matches_a_known_format() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut seen_special = false;
        for _ in 0..5000 {
            let d = pick_distance(&mut rng);
            assert!(valid(&d), "{d}");
            seen_special |= d.contains("LSD");
        }
        assert!(seen_special);
    }
}
