//! Browser side of the background: 2d-context surface, DPR-aware resizing and
//! the self re-arming `requestAnimationFrame` loop.

use std::cell::RefCell;
use std::rc::Rc;

use rand::SeedableRng;
use rand::rngs::StdRng;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, window};

use super::{AnimationLoop, Background, Clock, Surface};
use crate::config::SiteConfig;
use crate::error::{SiteError, SiteResult};

pub struct PerformanceClock;

impl Clock for PerformanceClock {
    fn now_ms(&self) -> f64 {
        window()
            .and_then(|w| w.performance())
            .map(|p| p.now())
            .unwrap_or(0.0)
    }
}

pub struct CanvasSurface {
    ctx: CanvasRenderingContext2d,
    font: String,
}

impl Surface for CanvasSurface {
    fn fade(&mut self, alpha: f64, width: f64, height: f64) {
        self.ctx
            .set_fill_style(&JsValue::from_str(&format!("rgba(0,0,0,{alpha})")));
        self.ctx.fill_rect(0.0, 0.0, width, height);
    }

    fn glyph_alpha(&mut self, alpha: f64) {
        self.ctx
            .set_fill_style(&JsValue::from_str(&format!("rgba(255,255,255,{alpha})")));
        self.ctx.set_font(&self.font);
    }

    fn draw_glyph(&mut self, glyph: char, x: f64, y: f64) {
        let mut buf = [0u8; 4];
        self.ctx.fill_text(glyph.encode_utf8(&mut buf), x, y).ok();
    }
}

/// Everything the repaint callback touches.
pub struct BackgroundRuntime {
    canvas: HtmlCanvasElement,
    surface: CanvasSurface,
    rng: StdRng,
    dpr_cap: f64,
    font_size: f64,
    pub animation: AnimationLoop<PerformanceClock>,
}

impl BackgroundRuntime {
    pub fn background_mut(&mut self) -> &mut Background {
        &mut self.animation.background
    }

    /// Match the backing store to the viewport and re-seed the columns.
    pub fn resize(&mut self) -> SiteResult<()> {
        let win = window().ok_or(SiteError::MissingGlobal("window"))?;
        let w = win.inner_width()?.as_f64().unwrap_or(0.0);
        let h = win.inner_height()?.as_f64().unwrap_or(0.0);
        let dpr = win.device_pixel_ratio().min(self.dpr_cap);

        self.canvas.set_width((w * dpr).floor() as u32);
        self.canvas.set_height((h * dpr).floor() as u32);
        let style = self.canvas.style();
        style.set_property("width", &format!("{w}px"))?;
        style.set_property("height", &format!("{h}px"))?;
        self.surface.ctx.set_transform(dpr, 0.0, 0.0, dpr, 0.0, 0.0)?;
        self.surface.ctx.set_font(&format!("{}px monospace", self.font_size));

        self.animation.background.resize(w, h, &mut self.rng);
        Ok(())
    }

    fn tick(&mut self) {
        self.animation.tick(&mut self.surface, &mut self.rng);
    }
}

pub type SharedBackground = Rc<RefCell<BackgroundRuntime>>;

/// Size the `#noise` canvas, start the loop and keep it sized on `resize`.
pub fn start_background(canvas_id: &str, config: &SiteConfig) -> SiteResult<SharedBackground> {
    let win = window().ok_or(SiteError::MissingGlobal("window"))?;
    let doc = win.document().ok_or(SiteError::MissingGlobal("document"))?;
    let canvas: HtmlCanvasElement = doc
        .get_element_by_id(canvas_id)
        .ok_or_else(|| SiteError::missing(canvas_id))?
        .dyn_into()
        .map_err(|_| SiteError::missing(canvas_id))?;
    let ctx: CanvasRenderingContext2d = canvas
        .get_context("2d")?
        .ok_or(SiteError::MissingCanvasContext)?
        .dyn_into()
        .map_err(|_| SiteError::MissingCanvasContext)?;

    let background = Background::new(config.background_mode, config.font_size, config.noise_step);
    let runtime = BackgroundRuntime {
        canvas,
        surface: CanvasSurface { ctx, font: format!("{}px monospace", config.font_size) },
        rng: StdRng::from_entropy(),
        dpr_cap: config.dpr_cap,
        font_size: config.font_size,
        animation: AnimationLoop::new(PerformanceClock, config.frame_interval_ms, background),
    };
    let shared = Rc::new(RefCell::new(runtime));
    shared.borrow_mut().resize()?;

    {
        let bg = shared.clone();
        let closure = Closure::wrap(Box::new(move || {
            if let Err(err) = bg.borrow_mut().resize() {
                log::warn!("background resize failed: {err}");
            }
        }) as Box<dyn FnMut()>);
        win.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    start_frame_loop(shared.clone());
    log::debug!("background started ({:?})", config.background_mode);
    Ok(shared)
}

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

fn request_frame(cb: &FrameCallback) {
    if let (Some(w), Some(f)) = (window(), cb.borrow().as_ref()) {
        let _ = w.request_animation_frame(f.as_ref().unchecked_ref());
    }
}

fn start_frame_loop(runtime: SharedBackground) {
    let f: FrameCallback = Rc::new(RefCell::new(None));
    let g = f.clone();
    *g.borrow_mut() = Some(Closure::wrap(Box::new(move |_ts: f64| {
        runtime.borrow_mut().tick();
        request_frame(&f);
    }) as Box<dyn FnMut(f64)>));
    request_frame(&g);
}
