//! Click handlers and the frame loop.
//!
//! The controller owns the deck, the stage, the state and the tween engine.
//! Clicks consult the state's locks and either start a sequence or are
//! dropped. Each sequence is a chain of tweens whose completion cues
//! [`DeckController::tick`] dispatches to the next step.

use glam::Vec2;
use rand::rngs::StdRng;
use rand::SeedableRng;
use web_time::Instant;

use super::cue::Cue;
use super::orbit::FrameSink;
use super::state::{AnimationState, Phase};
use crate::analytics::AnalyticsLogger;
use crate::deck::{
    hit_test, CardId, ClickTarget, Deck, PageLayout, Stage, SubCardId, Target,
};
use crate::error::CardfolioError;
use crate::geometry::position_on_orbit;
use crate::input::{ClickTracker, InputEvent, Key, MouseButton};
use crate::options::Options;
use crate::tween::{Prop, PropertySink, TweenEngine};

/// Sequence being timed for a performance metric.
#[derive(Debug, Clone, Copy)]
pub(crate) struct SequenceTimer {
    pub(crate) name: &'static str,
    pub(crate) started: Instant,
}

/// Drives the card choreography for one page.
pub struct DeckController {
    pub(crate) deck: Deck,
    pub(crate) stage: Stage,
    pub(crate) state: AnimationState,
    pub(crate) engine: TweenEngine<Target, Cue>,
    pub(crate) options: Options,
    pub(crate) rng: StdRng,
    pub(crate) analytics: AnalyticsLogger,
    pub(crate) timer: Option<SequenceTimer>,
    clicks: ClickTracker,
}

impl DeckController {
    /// Controller for `deck` with orbit periods drawn from OS entropy.
    #[must_use]
    pub fn new(deck: Deck, options: Options) -> Self {
        Self::with_rng(deck, options, StdRng::from_os_rng())
    }

    /// Controller whose orbit periods are reproducible from `seed`.
    #[must_use]
    pub fn with_seed(deck: Deck, options: Options, seed: u64) -> Self {
        Self::with_rng(deck, options, StdRng::seed_from_u64(seed))
    }

    fn with_rng(deck: Deck, options: Options, rng: StdRng) -> Self {
        let stage = Stage::for_deck(&deck);
        let analytics = AnalyticsLogger::new(options.analytics.clone());
        Self {
            deck,
            stage,
            state: AnimationState::new(),
            engine: TweenEngine::new(),
            options,
            rng,
            analytics,
            timer: None,
            clicks: ClickTracker::new(),
        }
    }

    /// Build the deck from `layout` and validate `options`.
    pub fn from_layout(
        layout: &PageLayout,
        options: Options,
    ) -> Result<Self, CardfolioError> {
        options.validate()?;
        Ok(Self::new(Deck::from_layout(layout)?, options))
    }

    /// Cards and sub-cards.
    #[must_use]
    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    /// Current visual state of every element.
    #[must_use]
    pub fn stage(&self) -> &Stage {
        &self.stage
    }

    /// Interaction state.
    #[must_use]
    pub fn state(&self) -> &AnimationState {
        &self.state
    }

    /// Tween engine (for inspection).
    #[must_use]
    pub fn engine(&self) -> &TweenEngine<Target, Cue> {
        &self.engine
    }

    /// Options in effect.
    #[must_use]
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Viewport resized. Sequences already running keep their targets.
    pub fn resize(&mut self, width: f32, height: f32) {
        self.deck.set_viewport(Vec2::new(width, height));
    }

    // -- Input ---------------------------------------------------------------

    /// Feed a raw input event. Returns `true` if it started a sequence.
    pub fn handle_input(&mut self, event: InputEvent, now: Instant) -> bool {
        match event {
            InputEvent::PointerMoved { x, y } => {
                self.clicks.moved(Vec2::new(x, y));
                false
            }
            InputEvent::PointerDown {
                x,
                y,
                button: MouseButton::Left,
            } => {
                let pos = Vec2::new(x, y);
                let target = hit_test(&self.deck, &self.stage, pos);
                self.clicks.press(target, pos);
                false
            }
            InputEvent::PointerUp {
                x,
                y,
                button: MouseButton::Left,
            } => {
                let pos = Vec2::new(x, y);
                let target = hit_test(&self.deck, &self.stage, pos);
                match self.clicks.release(target, pos) {
                    Some(target) => self.click(target, now),
                    None => false,
                }
            }
            InputEvent::PointerDown { .. } | InputEvent::PointerUp { .. } => false,
            InputEvent::Key(Key::Escape) => self.request_reset(now),
            InputEvent::Key(Key::Other) => false,
        }
    }

    /// Dispatch a resolved click. Returns `true` if it started a sequence.
    pub fn click(&mut self, target: ClickTarget, now: Instant) -> bool {
        match target {
            ClickTarget::Card(card) => self.on_card_click(card, now),
            ClickTarget::SubCard(sub) => self.on_sub_card_click(sub, now),
            ClickTarget::Outside => self.on_outside_click(now),
        }
    }

    /// A card was clicked.
    ///
    /// Selects it from idle. Clicking the active card resets it; clicking
    /// another card resets the active one and then selects the new one.
    /// With a sub-card focused, any card click is a click off the sub-card
    /// and unfocuses it. Dropped while a lock is held.
    pub fn on_card_click(&mut self, card: CardId, now: Instant) -> bool {
        if let Err(e) = self.deck.require_card(card) {
            log::warn!("card click ignored: {e}");
            return false;
        }
        match self.state.phase() {
            Phase::Idle => self.start_select(card, now),
            Phase::Focused { .. } => self.start_unfocus(None, now),
            Phase::Orbiting { card: active } if active == card => {
                self.start_reset(None, now)
            }
            Phase::Orbiting { .. } => self.start_reset(Some(card), now),
            phase => {
                log::debug!("card click {card:?} dropped while {}", phase.name());
                false
            }
        }
    }

    /// A sub-card was clicked. Never counts as a click on its card.
    ///
    /// Focuses it when nothing is focused, unfocuses it when it is the
    /// focused one (even mid-focus), and swaps focus when another sub-card
    /// is focused.
    pub fn on_sub_card_click(&mut self, sub: SubCardId, now: Instant) -> bool {
        let owner = match self.deck.require_sub_card(sub) {
            Ok(record) => record.owner,
            Err(e) => {
                log::warn!("sub-card click ignored: {e}");
                return false;
            }
        };
        match self.state.phase() {
            Phase::Orbiting { card } if card == owner => self.start_focus(sub, now),
            Phase::Focusing { sub: focused, .. } | Phase::Focused { sub: focused, .. }
                if focused == sub =>
            {
                self.start_unfocus(None, now)
            }
            Phase::Focused { card, .. } if card == owner => {
                self.start_unfocus(Some(sub), now)
            }
            phase => {
                log::debug!("sub-card click {sub:?} dropped while {}", phase.name());
                false
            }
        }
    }

    /// The page background was clicked.
    ///
    /// Unfocuses a focused sub-card, otherwise resets the active card.
    /// Nothing happens when idle or while a lock is held.
    pub fn on_outside_click(&mut self, now: Instant) -> bool {
        match self.state.phase() {
            Phase::Focused { .. } => self.start_unfocus(None, now),
            Phase::Orbiting { .. } => self.start_reset(None, now),
            Phase::Idle => false,
            phase => {
                log::debug!("outside click dropped while {}", phase.name());
                false
            }
        }
    }

    /// Unwind everything back to idle (e.g. on Escape). Only honoured when
    /// no lock is held.
    pub fn request_reset(&mut self, now: Instant) -> bool {
        match self.state.phase() {
            Phase::Orbiting { .. } | Phase::Focused { .. } => self.start_reset(None, now),
            phase => {
                log::debug!("reset request dropped while {}", phase.name());
                false
            }
        }
    }

    // -- Frame loop ----------------------------------------------------------

    /// Advance every tween to `now` and run whatever steps their completion
    /// unlocks. Returns `true` while another frame is needed.
    pub fn tick(&mut self, now: Instant) -> bool {
        let cues = {
            let mut sink = FrameSink {
                stage: &mut self.stage,
                orbits: self.state.orbits_mut(),
            };
            self.engine.tick(now, &mut sink)
        };
        for cue in cues {
            self.dispatch(cue, now);
        }
        self.sync_orbit_positions();
        self.needs_frame()
    }

    /// Whether anything is still moving or waiting on a cue.
    #[must_use]
    pub fn needs_frame(&self) -> bool {
        self.engine.is_busy() || !self.state.orbits().is_empty()
    }

    fn dispatch(&mut self, cue: Cue, now: Instant) {
        log::trace!("cue {cue:?}");
        match cue {
            Cue::Centered(card) => self.on_centered(card, now),
            Cue::Flipped(card) => self.on_flipped(card, now),
            Cue::Spawned(sub) => self.on_spawned(sub, now),
            Cue::FocusIn(sub) => self.on_focus_in(sub),
            Cue::FocusOut(sub) => self.on_focus_out(sub, now),
            Cue::ExitFaded(card) => self.on_exit_faded(card, now),
            Cue::Hidden(sub) => self.stage.set_visible(Target::SubCard(sub), false),
            Cue::ResetSettled(card) => self.on_reset_settled(card, now),
        }
    }

    /// Place every orbiting sub-card at its record's angle. The focused
    /// sub-card keeps whatever its focus tween wrote.
    fn sync_orbit_positions(&mut self) {
        let focused = self.state.focused_sub_card();
        let orbits = self.state.orbits();
        for sub in orbits.orbiting() {
            if Some(sub) == focused {
                continue;
            }
            if let Some(record) = orbits.get(sub) {
                let pos = position_on_orbit(record.angle, record.radius);
                self.stage.write(Target::SubCard(sub), Prop::X, pos.x);
                self.stage.write(Target::SubCard(sub), Prop::Y, pos.y);
            }
        }
    }

    pub(crate) fn start_timer(&mut self, name: &'static str, now: Instant) {
        self.timer = Some(SequenceTimer { name, started: now });
    }

    pub(crate) fn finish_timer(&mut self, name: &'static str, now: Instant) {
        if !self.timer.is_some_and(|t| t.name == name) {
            return;
        }
        if let Some(timer) = self.timer.take() {
            self.analytics.track_sequence(
                timer.name,
                now.saturating_duration_since(timer.started),
            );
        }
    }
}

/// Log a failed state transition. The guards in the click handlers make
/// these unreachable from input; they indicate a bug.
pub(crate) fn checked<T>(result: Result<T, CardfolioError>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            log::error!("{e}");
            None
        }
    }
}

impl std::fmt::Debug for DeckController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeckController")
            .field("phase", &self.state.phase())
            .field("engine", &self.engine)
            .field("cards", &self.deck.cards().len())
            .finish_non_exhaustive()
    }
}
