//! Page-wide state shared by every listener closure.

use std::cell::RefCell;
use std::rc::Rc;

use rand::SeedableRng;
use rand::rngs::StdRng;
use web_sys::HtmlElement;

use crate::background::Background;
use crate::background::canvas::SharedBackground;
use crate::chat::ChatSession;
use crate::config::SiteConfig;
use crate::dice::DiceGame;
use crate::dom::Interval;
use crate::feed::FeedBoard;
use crate::overlay::OverlayStack;

pub struct Site {
    pub config: SiteConfig,
    pub overlay: OverlayStack<HtmlElement>,
    pub feeds: FeedBoard,
    pub dice: DiceGame,
    /// Rolling ticker; replaced (and so cleared) by the next roll.
    pub dice_timer: Option<Interval>,
    pub chat: ChatSession,
    pub background: Option<SharedBackground>,
    /// Glitch burst ticker started after the intro.
    pub glitch: Option<Interval>,
    /// Bumped on every intro start; a run that is no longer the latest one
    /// does not start the glitch ticker.
    pub intro_run: u32,
    pub rng: StdRng,
}

pub type SharedSite = Rc<RefCell<Site>>;

impl Site {
    pub fn new<I, S>(config: SiteConfig, sections: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::with_rng(config, sections, StdRng::from_entropy())
    }

    pub fn with_rng<I, S>(config: SiteConfig, sections: I, rng: StdRng) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            config,
            overlay: OverlayStack::new(sections),
            feeds: FeedBoard::new(),
            dice: DiceGame::default(),
            dice_timer: None,
            chat: ChatSession::default(),
            background: None,
            glitch: None,
            intro_run: 0,
            rng,
        }
    }

    pub fn into_shared(self) -> SharedSite {
        Rc::new(RefCell::new(self))
    }

    /// Run `f` on the background model, if the canvas is up.
    pub fn with_background(&self, f: impl FnOnce(&mut Background)) {
        if let Some(bg) = &self.background {
            f(bg.borrow_mut().background_mut());
        }
    }

    pub fn next_intro_run(&mut self) -> u32 {
        self.intro_run = self.intro_run.wrapping_add(1);
        self.intro_run
    }
}
