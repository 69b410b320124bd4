//! Line-by-line "decode" reveal of multi-line ASCII art.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Element, window};

use crate::error::{SiteError, SiteResult};

pub const DECODE_GLYPHS: &[char] = &[
    'A', 'B', 'C', 'D', 'E', 'F', 'G', 'H', 'I', 'J', 'K', 'L', 'M', 'N', 'O', 'P', 'Q', 'R',
    'S', 'T', 'U', 'V', 'W', 'X', 'Y', 'Z', '0', '1', '2', '3', '4', '5', '6', '7', '8', '9',
    '!', '@', '#', '$', '%', '^', '&', '*', '░', '▒', '▓', '█',
];

/// Replace every non-whitespace char with a space, keeping the block's shape.
pub fn reserve_block(text: &str) -> String {
    text.split('\n')
        .map(|line| line.chars().map(|c| if c.is_whitespace() { c } else { ' ' }).collect::<String>())
        .collect::<Vec<_>>()
        .join("\n")
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ScrambleStep {
    Frame(String),
    /// Final step; carries the exact target text.
    Done(String),
}

impl ScrambleStep {
    pub fn text(&self) -> &str {
        match self {
            ScrambleStep::Frame(s) | ScrambleStep::Done(s) => s,
        }
    }

    pub fn is_done(&self) -> bool {
        matches!(self, ScrambleStep::Done(_))
    }
}

/// Reveal progress for one piece of text.
///
/// The revealed-line count is `ticks * lines / steps`, derived from the integer
/// tick counter instead of a running float sum, so the task finishes on tick
/// `steps` exactly.
#[derive(Clone, Debug)]
pub struct ScrambleTask {
    target: String,
    lines: Vec<String>,
    steps: u32,
    ticks: u32,
    finished: bool,
}

impl ScrambleTask {
    pub fn new(text: &str, steps: u32) -> Self {
        Self {
            target: text.to_string(),
            lines: text.split('\n').map(str::to_string).collect(),
            steps: steps.max(1),
            ticks: 0,
            finished: false,
        }
    }

    pub fn revealed(&self) -> f64 {
        self.ticks as f64 * self.lines.len() as f64 / self.steps as f64
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Render the current frame and advance. Returns `None` once finished.
    pub fn tick<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<ScrambleStep> {
        if self.finished {
            return None;
        }
        let revealed = self.revealed();
        let frame = self
            .lines
            .iter()
            .enumerate()
            .map(|(li, line)| {
                if (li as f64) < revealed {
                    line.clone()
                } else {
                    line.chars()
                        .map(|c| if c == ' ' { ' ' } else { DECODE_GLYPHS[rng.gen_range(0..DECODE_GLYPHS.len())] })
                        .collect()
                }
            })
            .collect::<Vec<String>>()
            .join("\n");

        self.ticks += 1;
        if self.ticks >= self.steps {
            self.finished = true;
            return Some(ScrambleStep::Done(self.target.clone()));
        }
        Some(ScrambleStep::Frame(frame))
    }
}

/// Run a scramble on `el`, one tick every `speed_ms`. Resolves once the element
/// holds the exact target text.
pub async fn scramble(el: Element, text: &str, speed_ms: i32, steps: u32) -> SiteResult<()> {
    let win = window().ok_or(SiteError::MissingGlobal("window"))?;
    let task = Rc::new(RefCell::new(ScrambleTask::new(text, steps)));
    let interval_id: Rc<Cell<Option<i32>>> = Rc::new(Cell::new(None));
    let resolve_slot: Rc<RefCell<Option<js_sys::Function>>> = Rc::new(RefCell::new(None));

    let promise = {
        let slot = resolve_slot.clone();
        js_sys::Promise::new(&mut |resolve, _reject| {
            *slot.borrow_mut() = Some(resolve);
        })
    };

    let tick = {
        let interval_id = interval_id.clone();
        let slot = resolve_slot.clone();
        let mut rng = StdRng::from_entropy();
        Closure::wrap(Box::new(move || {
            let Some(step) = task.borrow_mut().tick(&mut rng) else {
                return;
            };
            el.set_text_content(Some(step.text()));
            if step.is_done() {
                if let (Some(w), Some(id)) = (window(), interval_id.get()) {
                    w.clear_interval_with_handle(id);
                }
                if let Some(resolve) = slot.borrow_mut().take() {
                    let _ = resolve.call0(&JsValue::NULL);
                }
            }
        }) as Box<dyn FnMut()>)
    };

    let id = win.set_interval_with_callback_and_timeout_and_arguments_0(
        tick.as_ref().unchecked_ref(),
        speed_ms,
    )?;
    interval_id.set(Some(id));

    JsFuture::from(promise).await?;
    // Interval is cleared; the callback can go.
    drop(tick);
    Ok(())
}
