//! Select, flip, spawn, focus and unfocus steps.
//!
//! Each `start_*` runs on a click that passed its guard; each `on_*` runs
//! on a completion cue and re-checks the phase, since a cue may arrive
//! after the sequence it belongs to was abandoned.

use web_time::Instant;

use super::controller::{checked, DeckController};
use super::cue::Cue;
use super::orbit::{sample_period, OrbitRecord};
use super::state::Phase;
use crate::deck::{card_rect, CardId, SubCardId, Target};
use crate::geometry::{center_offset, orbit_radius, position_on_orbit, spawn_angle};
use crate::tween::{Easing, Prop, TweenSpec};

/// Stacking order of the card being selected.
pub(crate) const SELECTED_Z: f32 = 9995.0;
/// Stacking order of a focused sub-card.
pub(crate) const FOCUSED_Z: f32 = 10000.0;
/// Stacking order of an orbiting sub-card.
pub(crate) const ORBIT_Z: f32 = 10.0;
/// Rotation of a flipped card's inner face, degrees.
pub(crate) const FLIPPED_DEG: f32 = 180.0;

impl DeckController {
    pub(crate) fn start_select(&mut self, card: CardId, now: Instant) -> bool {
        let Some(rect) = self.deck.card(card).map(|c| c.original.rect) else {
            log::warn!("select: card {card:?} missing");
            return false;
        };
        if checked(self.state.select_card(card)).is_none() {
            return false;
        }
        self.start_timer("select", now);
        let motion = &self.options.motion;

        self.stage.flags_mut(Target::Card(card)).selected = true;
        self.stage.page_mut().dimmed_background = true;

        let target = Target::Card(card);
        let _ = self.engine.cancel_animations_on(target);
        self.engine
            .set_immediately(target, &[(Prop::ZIndex, SELECTED_Z)], &mut self.stage);
        let offset = center_offset(&rect, self.deck.viewport());
        let _ = self.engine.animate(
            TweenSpec::new(target)
                .prop(Prop::X, offset.x)
                .prop(Prop::Y, offset.y)
                .prop(Prop::Scale, motion.select_scale)
                .duration_secs(motion.select_duration)
                .ease(Easing::Power2Out)
                .on_complete(Cue::Centered(card)),
            now,
        );

        let others: Vec<CardId> = self
            .deck
            .cards()
            .iter()
            .map(|c| c.id)
            .filter(|&id| id != card)
            .collect();
        for other in others {
            let target = Target::Card(other);
            self.stage.flags_mut(target).deselected = true;
            let _ = self.engine.cancel_animations_on(target);
            let _ = self.engine.animate(
                TweenSpec::new(target)
                    .prop(Prop::Opacity, motion.dim_opacity)
                    .prop(Prop::Scale, motion.dim_scale)
                    .duration_secs(motion.select_duration)
                    .ease(Easing::Power2Out),
                now,
            );
        }
        true
    }

    pub(crate) fn on_centered(&mut self, card: CardId, now: Instant) {
        if self.state.phase() != (Phase::Selecting { card }) {
            return;
        }
        let motion = &self.options.motion;
        let _ = self.engine.animate(
            TweenSpec::new(Target::CardInner(card))
                .prop(Prop::RotationY, FLIPPED_DEG)
                .duration_secs(motion.flip_duration)
                .delay_secs(motion.flip_delay)
                .ease(Easing::Power2InOut)
                .on_complete(Cue::Flipped(card)),
            now,
        );
    }

    pub(crate) fn on_flipped(&mut self, card: CardId, now: Instant) {
        if self.state.phase() != (Phase::Selecting { card }) {
            return;
        }
        if checked(self.state.release_main_lock()).is_none() {
            return;
        }
        self.finish_timer("select", now);
        self.spawn_sub_cards(card, now);
    }

    /// Fan the card's sub-cards out onto evenly spaced orbit slots.
    fn spawn_sub_cards(&mut self, card: CardId, now: Instant) {
        let Some(card_info) = self.deck.card(card) else {
            return;
        };
        let subs = card_info.sub_cards.clone();
        if subs.is_empty() {
            log::debug!("card {card:?} has no sub-cards to spawn");
            return;
        }
        let radius = orbit_radius(&card_info.original.rect, self.options.orbit.radius_fraction);
        let motion = self.options.motion.clone();

        if self.options.orbit.show_path {
            let path = Target::OrbitPath(card);
            self.engine.set_immediately(
                path,
                &[(Prop::Radius, radius), (Prop::Scale, 1.0), (Prop::Opacity, 0.0)],
                &mut self.stage,
            );
            self.stage.set_visible(path, true);
            let _ = self.engine.animate(
                TweenSpec::new(path)
                    .prop(Prop::Opacity, self.options.orbit.path_opacity)
                    .duration_secs(motion.spawn_duration)
                    .ease(Easing::Power2Out),
                now,
            );
        }

        let count = subs.len();
        for (i, sub) in subs.into_iter().enumerate() {
            let record = OrbitRecord {
                angle: spawn_angle(i, count),
                radius,
                period: sample_period(&self.options.orbit, &mut self.rng),
                direction: 1.0,
            };
            self.state.orbits_mut().insert(sub, record);

            let target = Target::SubCard(sub);
            let _ = self.engine.cancel_animations_on(target);
            self.engine.set_immediately(
                target,
                &[
                    (Prop::X, 0.0),
                    (Prop::Y, 0.0),
                    (Prop::Scale, 0.0),
                    (Prop::Opacity, 0.0),
                    (Prop::ZIndex, ORBIT_Z),
                ],
                &mut self.stage,
            );
            self.stage.set_visible(target, true);

            let pos = position_on_orbit(record.angle, record.radius);
            let _ = self.engine.animate(
                TweenSpec::new(target)
                    .prop(Prop::X, pos.x)
                    .prop(Prop::Y, pos.y)
                    .prop(Prop::Scale, 1.0)
                    .prop(Prop::Opacity, 1.0)
                    .duration_secs(motion.spawn_duration)
                    .delay_secs(motion.spawn_stagger * i as f32)
                    .ease(Easing::Power2Out)
                    .on_complete(Cue::Spawned(sub)),
                now,
            );
        }
        log::debug!("spawned {count} sub-cards for {card:?}");
    }

    pub(crate) fn on_spawned(&mut self, sub: SubCardId, now: Instant) {
        let owner = self.deck.owner_of(sub);
        if owner.is_none() || self.state.active_card() != owner {
            return;
        }
        if self.state.focused_sub_card() == Some(sub)
            || matches!(self.state.phase(), Phase::Resetting { .. })
        {
            return;
        }
        self.start_orbit(sub, now);
    }

    /// Start the endless revolution of `sub` from its recorded angle.
    pub(crate) fn start_orbit(&mut self, sub: SubCardId, now: Instant) {
        let Some(record) = self.state.orbits().get(sub).copied() else {
            log::warn!("orbit: sub-card {sub:?} has no orbit record");
            return;
        };
        let id = self.engine.animate(record.revolution(sub), now);
        self.state.push_orbit_tween(sub, id, &mut self.engine);
    }

    pub(crate) fn start_focus(&mut self, sub: SubCardId, now: Instant) -> bool {
        let Some(owner) = self.deck.owner_of(sub) else {
            return false;
        };
        if checked(self.state.focus_sub_card(sub, owner)).is_none() {
            return false;
        }
        if let Some(id) = self.state.orbit_tween(sub) {
            let _ = self.engine.pause(id, now);
        }
        let target = Target::SubCard(sub);
        // Spawn tween, if the sub-card is still entering.
        let _ = self.engine.cancel_animations_on(target);

        self.stage.flags_mut(target).focused = true;
        self.stage.page_mut().interaction_lock = true;
        self.engine
            .set_immediately(target, &[(Prop::ZIndex, FOCUSED_Z)], &mut self.stage);

        // Sub-card offsets are relative to the card center.
        let card_center = card_rect(&self.deck, &self.stage, owner)
            .map_or(self.deck.viewport() / 2.0, |r| r.center());
        let offset = self.deck.viewport() / 2.0 - card_center;
        let motion = &self.options.motion;
        let _ = self.engine.animate(
            TweenSpec::new(target)
                .prop(Prop::X, offset.x)
                .prop(Prop::Y, offset.y)
                .prop(Prop::Scale, motion.focus_scale)
                .prop(Prop::Opacity, 1.0)
                .duration_secs(motion.focus_duration)
                .ease(Easing::Power2Out)
                .on_complete(Cue::FocusIn(sub)),
            now,
        );
        true
    }

    pub(crate) fn on_focus_in(&mut self, sub: SubCardId) {
        if matches!(self.state.phase(), Phase::Focusing { sub: s, .. } if s == sub) {
            let _ = checked(self.state.finish_focus());
        }
    }

    /// Send the focused sub-card back to the slot it left, optionally
    /// focusing `then` once it arrives. A focus still in flight is cut
    /// short; its cue never fires.
    pub(crate) fn start_unfocus(&mut self, then: Option<SubCardId>, now: Instant) -> bool {
        let (Phase::Focusing { sub, .. } | Phase::Focused { sub, .. }) = self.state.phase()
        else {
            return false;
        };
        if checked(self.state.begin_unfocus(then)).is_none() {
            return false;
        }
        let home = self
            .state
            .orbits()
            .get(sub)
            .map(|r| position_on_orbit(r.angle, r.radius))
            .unwrap_or_default();
        let target = Target::SubCard(sub);
        let _ = self.engine.cancel_animations_on(target);
        let motion = &self.options.motion;
        let _ = self.engine.animate(
            TweenSpec::new(target)
                .prop(Prop::X, home.x)
                .prop(Prop::Y, home.y)
                .prop(Prop::Scale, 1.0)
                .prop(Prop::ZIndex, ORBIT_Z)
                .duration_secs(motion.unfocus_duration)
                .ease(Easing::Power2InOut)
                .on_complete(Cue::FocusOut(sub)),
            now,
        );
        true
    }

    pub(crate) fn on_focus_out(&mut self, sub: SubCardId, now: Instant) {
        if !matches!(self.state.phase(), Phase::Unfocusing { sub: s, .. } if s == sub) {
            return;
        }
        let Some(then) = checked(self.state.unfocus_sub_card()) else {
            return;
        };
        self.stage.flags_mut(Target::SubCard(sub)).focused = false;
        self.stage.page_mut().interaction_lock = false;

        match self.state.orbit_tween(sub) {
            Some(id) => {
                let _ = self.engine.resume(id, now);
            }
            // Focused before its entrance finished.
            None => self.start_orbit(sub, now),
        }

        if let Some(next) = then {
            let _ = self.start_focus(next, now);
        }
    }
}
