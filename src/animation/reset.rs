//! Unwinding an active card back to rest.
//!
//! A reset runs as a compensating transaction over everything a selection
//! did. A focused sub-card fades out first; once that completes, the
//! remaining stages run as one timeline whose settle cue returns the state
//! to idle.

use web_time::Instant;

use super::controller::{checked, DeckController};
use super::cue::Cue;
use super::sequences::ORBIT_Z;
use super::state::Phase;
use crate::deck::{CardId, SubCardId, Target, VisualProps};
use crate::tween::{Easing, Prop, TweenSpec};

/// Delay before the sub-cards fade, seconds.
const SUB_HIDE_DELAY: f32 = 0.1;
/// Delay before the inner face flips back, seconds.
const UNFLIP_DELAY: f32 = 0.1;
/// Delay before the card returns to its slot, seconds.
const RETURN_DELAY: f32 = 0.2;

impl DeckController {
    /// Begin resetting the active card. `then` is selected once the reset
    /// settles.
    pub(crate) fn start_reset(&mut self, then: Option<CardId>, now: Instant) -> bool {
        let (card, focused) = match self.state.phase() {
            Phase::Orbiting { card } => (card, None),
            Phase::Focused { card, sub } => (card, Some(sub)),
            _ => return false,
        };
        if checked(self.state.begin_reset(then)).is_none() {
            return false;
        }
        self.start_timer("reset", now);
        log::debug!("reset {card:?} (then {then:?})");

        match focused {
            Some(sub) => self.fade_focused(card, sub, now),
            None => self.run_reset_stages(card, now),
        }
        true
    }

    /// The focused sub-card leaves first, so its exit never overlaps the
    /// card's return.
    fn fade_focused(&mut self, card: CardId, sub: SubCardId, now: Instant) {
        let target = Target::SubCard(sub);
        let _ = self.engine.cancel_animations_on(target);
        self.stage.flags_mut(target).focused = false;
        self.stage.page_mut().interaction_lock = false;
        let _ = self.engine.animate(
            TweenSpec::new(target)
                .prop(Prop::Opacity, 0.0)
                .prop(Prop::Scale, 0.0)
                .duration_secs(self.options.motion.hide_duration)
                .ease(Easing::Power1In)
                .on_complete(Cue::ExitFaded(card)),
            now,
        );
    }

    pub(crate) fn on_exit_faded(&mut self, card: CardId, now: Instant) {
        let Phase::Resetting {
            card: resetting,
            focused,
            ..
        } = self.state.phase()
        else {
            return;
        };
        if resetting != card {
            return;
        }
        if let Some(sub) = focused {
            self.stage.set_visible(Target::SubCard(sub), false);
        }
        self.run_reset_stages(card, now);
    }

    /// Cancel the orbits, then fade the sub-cards, flip the face back,
    /// return the card and restore the dimmed cards, all in one timeline.
    fn run_reset_stages(&mut self, card: CardId, now: Instant) {
        self.state.cancel_orbits(&mut self.engine);

        let Some(card_info) = self.deck.card(card).cloned() else {
            log::warn!("reset: card {card:?} missing, settling immediately");
            let timeline = self.engine.create_timeline(Some(Cue::ResetSettled(card)));
            self.engine.seal_timeline(timeline);
            return;
        };
        let motion = self.options.motion.clone();
        let timeline = self.engine.create_timeline(Some(Cue::ResetSettled(card)));

        for &sub in &card_info.sub_cards {
            let target = Target::SubCard(sub);
            let _ = self.engine.cancel_animations_on(target);
            if !self.stage.props(target).visible {
                continue;
            }
            let _ = self.engine.animate_in(
                timeline,
                TweenSpec::new(target)
                    .prop(Prop::Opacity, 0.0)
                    .prop(Prop::Scale, 0.0)
                    .duration_secs(motion.hide_duration)
                    .delay_secs(SUB_HIDE_DELAY)
                    .ease(Easing::Power1In)
                    .on_complete(Cue::Hidden(sub)),
                now,
            );
        }

        let path = Target::OrbitPath(card);
        let _ = self.engine.cancel_animations_on(path);
        if self.stage.props(path).visible {
            let _ = self.engine.animate_in(
                timeline,
                TweenSpec::new(path)
                    .prop(Prop::Opacity, 0.0)
                    .duration_secs(motion.hide_duration)
                    .ease(Easing::Power1In),
                now,
            );
        }

        let inner = Target::CardInner(card);
        let _ = self.engine.cancel_animations_on(inner);
        let _ = self.engine.animate_in(
            timeline,
            TweenSpec::new(inner)
                .prop(Prop::RotationY, 0.0)
                .duration_secs(motion.unflip_duration)
                .delay_secs(UNFLIP_DELAY)
                .ease(Easing::Power1InOut),
            now,
        );

        let original = card_info.original;
        let target = Target::Card(card);
        let _ = self.engine.cancel_animations_on(target);
        let _ = self.engine.animate_in(
            timeline,
            TweenSpec::new(target)
                .prop(Prop::X, 0.0)
                .prop(Prop::Y, 0.0)
                .prop(Prop::Scale, original.scale)
                .prop(Prop::Opacity, original.opacity)
                .prop(Prop::ZIndex, original.z_index as f32)
                .duration_secs(motion.return_duration)
                .delay_secs(RETURN_DELAY)
                .ease(Easing::Power2InOut),
            now,
        );

        let dimmed: Vec<CardId> = self
            .deck
            .cards()
            .iter()
            .map(|c| c.id)
            .filter(|&id| self.stage.flags(Target::Card(id)).deselected)
            .collect();
        for other in dimmed {
            let target = Target::Card(other);
            self.stage.flags_mut(target).deselected = false;
            let _ = self.engine.cancel_animations_on(target);
            let _ = self.engine.animate_in(
                timeline,
                TweenSpec::new(target)
                    .prop(Prop::Opacity, 1.0)
                    .prop(Prop::Scale, 1.0)
                    .duration_secs(motion.return_duration)
                    .ease(Easing::Power2InOut),
                now,
            );
        }

        self.engine.seal_timeline(timeline);
    }

    /// Every stage finished: snap residual properties to rest, clear the
    /// page flags and return to idle, then run any queued selection.
    pub(crate) fn on_reset_settled(&mut self, card: CardId, now: Instant) {
        if !matches!(self.state.phase(), Phase::Resetting { card: c, .. } if c == card) {
            return;
        }

        for info in self.deck.cards() {
            self.stage.restore_card(info.id, info.original.z_index);
        }
        *self.stage.props_mut(Target::CardInner(card)) = VisualProps::REST;
        *self.stage.props_mut(Target::OrbitPath(card)) = VisualProps::HIDDEN;
        for &sub in self.deck.sub_cards_of(card) {
            let target = Target::SubCard(sub);
            *self.stage.props_mut(target) = VisualProps {
                z_index: ORBIT_Z as i32,
                ..VisualProps::HIDDEN
            };
            *self.stage.flags_mut(target) = Default::default();
        }
        *self.stage.page_mut() = Default::default();

        let queued = self.state.full_reset(&mut self.engine);
        self.finish_timer("reset", now);
        log::debug!("reset of {card:?} settled");

        if let Some(next) = queued {
            let _ = self.start_select(next, now);
        }
    }
}
