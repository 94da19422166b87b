//! The single source of truth for what the page is doing.
//!
//! Every flag the controller checks is derived from one [`Phase`], so the
//! lock combinations that make no sense (a focused sub-card with no active
//! card, both locks held at once) cannot be represented.

use super::cue::Cue;
use super::orbit::OrbitRegistry;
use crate::deck::{CardId, SubCardId, Target};
use crate::error::CardfolioError;
use crate::tween::{TweenEngine, TweenId};

/// Where the choreography currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    /// Nothing active.
    #[default]
    Idle,
    /// Card centering and flipping. Holds the main lock.
    Selecting {
        /// Card being selected.
        card: CardId,
    },
    /// Card flipped; its sub-cards circle it.
    Orbiting {
        /// Active card.
        card: CardId,
    },
    /// Sub-card moving to the focus position. Holds the sub lock.
    Focusing {
        /// Active card.
        card: CardId,
        /// Sub-card being focused.
        sub: SubCardId,
    },
    /// Sub-card enlarged at the viewport center.
    Focused {
        /// Active card.
        card: CardId,
        /// Focused sub-card.
        sub: SubCardId,
    },
    /// Sub-card returning to its orbit. Holds the sub lock.
    Unfocusing {
        /// Active card.
        card: CardId,
        /// Sub-card being released.
        sub: SubCardId,
        /// Sub-card to focus once this one is back.
        then: Option<SubCardId>,
    },
    /// Card unwinding to rest. Holds the main lock.
    Resetting {
        /// Card being reset.
        card: CardId,
        /// Sub-card that was focused when the reset began.
        focused: Option<SubCardId>,
        /// Card to select once the reset settles.
        then: Option<CardId>,
    },
}

impl Phase {
    /// Short name for logs and errors.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Selecting { .. } => "selecting",
            Self::Orbiting { .. } => "orbiting",
            Self::Focusing { .. } => "focusing",
            Self::Focused { .. } => "focused",
            Self::Unfocusing { .. } => "unfocusing",
            Self::Resetting { .. } => "resetting",
        }
    }
}

/// Interaction state plus the orbit tweens it owns.
#[derive(Debug, Default)]
pub struct AnimationState {
    phase: Phase,
    orbits: OrbitRegistry,
}

impl AnimationState {
    /// Idle state with no orbits.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current phase.
    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Re-entrancy lock: any sequence in flight.
    #[must_use]
    pub fn is_animating(&self) -> bool {
        self.main_card_animating() || self.sub_card_animating()
    }

    /// Main card select or reset in flight.
    #[must_use]
    pub fn main_card_animating(&self) -> bool {
        matches!(
            self.phase,
            Phase::Selecting { .. } | Phase::Resetting { .. }
        )
    }

    /// Sub-card focus or unfocus in flight.
    #[must_use]
    pub fn sub_card_animating(&self) -> bool {
        matches!(
            self.phase,
            Phase::Focusing { .. } | Phase::Unfocusing { .. }
        )
    }

    /// Card currently selected, if any.
    #[must_use]
    pub fn active_card(&self) -> Option<CardId> {
        match self.phase {
            Phase::Idle => None,
            Phase::Selecting { card }
            | Phase::Orbiting { card }
            | Phase::Focusing { card, .. }
            | Phase::Focused { card, .. }
            | Phase::Unfocusing { card, .. }
            | Phase::Resetting { card, .. } => Some(card),
        }
    }

    /// Sub-card currently enlarged (or on its way in or out).
    #[must_use]
    pub fn focused_sub_card(&self) -> Option<SubCardId> {
        match self.phase {
            Phase::Focusing { sub, .. }
            | Phase::Focused { sub, .. }
            | Phase::Unfocusing { sub, .. } => Some(sub),
            Phase::Resetting { focused, .. } => focused,
            Phase::Idle | Phase::Selecting { .. } | Phase::Orbiting { .. } => None,
        }
    }

    /// Live orbit tween handles in start order.
    pub fn orbit_tweens(&self) -> impl Iterator<Item = TweenId> + '_ {
        self.orbits.tweens()
    }

    /// Orbit records and tween handles.
    #[must_use]
    pub fn orbits(&self) -> &OrbitRegistry {
        &self.orbits
    }

    pub(crate) fn orbits_mut(&mut self) -> &mut OrbitRegistry {
        &mut self.orbits
    }

    /// Orbit tween driving `sub`.
    #[must_use]
    pub fn orbit_tween(&self, sub: SubCardId) -> Option<TweenId> {
        self.orbits.tween_of(sub)
    }

    /// Attach the orbit tween of `sub`, cancelling any tween it replaces.
    pub fn push_orbit_tween(
        &mut self,
        sub: SubCardId,
        id: TweenId,
        engine: &mut TweenEngine<Target, Cue>,
    ) {
        if let Some(old) = self.orbits.attach(sub, id) {
            let _ = engine.cancel(old);
        }
    }

    /// Cancel (not pause) every orbit tween and forget the orbit records.
    pub fn cancel_orbits(&mut self, engine: &mut TweenEngine<Target, Cue>) {
        for id in self.orbits.drain() {
            let _ = engine.cancel(id);
        }
    }

    fn invalid(&self, op: &'static str) -> CardfolioError {
        CardfolioError::InvalidTransition {
            from: self.phase.name(),
            op,
        }
    }

    fn transition(&mut self, next: Phase) {
        log::debug!("phase {} -> {}", self.phase.name(), next.name());
        self.phase = next;
    }

    /// Begin selecting `card`. Takes the main lock.
    pub fn select_card(&mut self, card: CardId) -> Result<(), CardfolioError> {
        match self.phase {
            Phase::Idle => {
                self.transition(Phase::Selecting { card });
                Ok(())
            }
            _ => Err(self.invalid("select_card")),
        }
    }

    /// Selection finished; the card is now orbiting. Releases the main lock.
    pub fn release_main_lock(&mut self) -> Result<(), CardfolioError> {
        match self.phase {
            Phase::Selecting { card } => {
                self.transition(Phase::Orbiting { card });
                Ok(())
            }
            _ => Err(self.invalid("release_main_lock")),
        }
    }

    /// Begin focusing `sub`, which must belong to the active card. Takes
    /// the sub lock.
    pub fn focus_sub_card(
        &mut self,
        sub: SubCardId,
        owner: CardId,
    ) -> Result<(), CardfolioError> {
        match self.phase {
            Phase::Orbiting { card } if card == owner => {
                self.transition(Phase::Focusing { card, sub });
                Ok(())
            }
            _ => Err(self.invalid("focus_sub_card")),
        }
    }

    /// Focus animation finished. Releases the sub lock.
    pub fn finish_focus(&mut self) -> Result<(), CardfolioError> {
        match self.phase {
            Phase::Focusing { card, sub } => {
                self.transition(Phase::Focused { card, sub });
                Ok(())
            }
            _ => Err(self.invalid("finish_focus")),
        }
    }

    /// Begin returning the focused sub-card, optionally queueing another to
    /// focus afterwards. Also valid while the sub-card is still on its way
    /// in. Takes the sub lock.
    pub fn begin_unfocus(
        &mut self,
        then: Option<SubCardId>,
    ) -> Result<(), CardfolioError> {
        match self.phase {
            Phase::Focusing { card, sub } | Phase::Focused { card, sub } => {
                self.transition(Phase::Unfocusing { card, sub, then });
                Ok(())
            }
            _ => Err(self.invalid("begin_unfocus")),
        }
    }

    /// Clear the focused sub-card and release the sub lock. Returns the
    /// sub-card queued to focus next, if any.
    pub fn unfocus_sub_card(&mut self) -> Result<Option<SubCardId>, CardfolioError> {
        match self.phase {
            Phase::Unfocusing { card, then, .. } => {
                self.transition(Phase::Orbiting { card });
                Ok(then)
            }
            Phase::Focusing { card, .. } | Phase::Focused { card, .. } => {
                self.transition(Phase::Orbiting { card });
                Ok(None)
            }
            _ => Err(self.invalid("unfocus_sub_card")),
        }
    }

    /// Begin resetting the active card, optionally queueing another card to
    /// select afterwards. Takes the main lock.
    pub fn begin_reset(&mut self, then: Option<CardId>) -> Result<(), CardfolioError> {
        match self.phase {
            Phase::Orbiting { card } => {
                self.transition(Phase::Resetting {
                    card,
                    focused: None,
                    then,
                });
                Ok(())
            }
            Phase::Focused { card, sub } => {
                self.transition(Phase::Resetting {
                    card,
                    focused: Some(sub),
                    then,
                });
                Ok(())
            }
            _ => Err(self.invalid("begin_reset")),
        }
    }

    /// Cancel every orbit tween and return to idle. Returns the card queued
    /// by the reset that just settled, if any.
    pub fn full_reset(&mut self, engine: &mut TweenEngine<Target, Cue>) -> Option<CardId> {
        self.cancel_orbits(engine);
        let queued = match self.phase {
            Phase::Resetting { then, .. } => then,
            _ => None,
        };
        self.transition(Phase::Idle);
        queued
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use web_time::Instant;

    use super::*;
    use crate::animation::orbit::OrbitRecord;
    use crate::tween::{Prop, TweenSpec};

    const C1: CardId = CardId(1);
    const S1: SubCardId = SubCardId(10);

    fn assert_lock_invariant(state: &AnimationState) {
        assert_eq!(
            state.is_animating(),
            state.main_card_animating() || state.sub_card_animating()
        );
        assert!(!(state.main_card_animating() && state.sub_card_animating()));
        if state.focused_sub_card().is_some() {
            assert!(state.active_card().is_some());
        }
    }

    #[test]
    fn select_then_focus_cycle() {
        let mut state = AnimationState::new();
        assert!(!state.is_animating());

        state.select_card(C1).unwrap();
        assert!(state.main_card_animating());
        assert_eq!(state.active_card(), Some(C1));
        assert_lock_invariant(&state);

        state.release_main_lock().unwrap();
        assert!(!state.is_animating());

        state.focus_sub_card(S1, C1).unwrap();
        assert!(state.sub_card_animating());
        assert_eq!(state.focused_sub_card(), Some(S1));
        assert_lock_invariant(&state);

        state.finish_focus().unwrap();
        assert!(!state.is_animating());
        state.begin_unfocus(Some(SubCardId(11))).unwrap();
        assert_lock_invariant(&state);
        assert_eq!(state.unfocus_sub_card().unwrap(), Some(SubCardId(11)));
        assert_eq!(state.phase(), Phase::Orbiting { card: C1 });
    }

    #[test]
    fn unfocus_can_interrupt_focusing() {
        let mut state = AnimationState::new();
        state.select_card(C1).unwrap();
        state.release_main_lock().unwrap();
        state.focus_sub_card(S1, C1).unwrap();

        state.begin_unfocus(None).unwrap();
        assert!(matches!(
            state.phase(),
            Phase::Unfocusing {
                sub: S1,
                then: None,
                ..
            }
        ));
        assert!(state.sub_card_animating());
        assert_lock_invariant(&state);
        assert!(state.finish_focus().is_err());
        assert_eq!(state.unfocus_sub_card().unwrap(), None);
        assert!(state.begin_unfocus(None).is_err());
    }

    #[test]
    fn invalid_transitions_are_errors() {
        let mut state = AnimationState::new();
        assert!(state.release_main_lock().is_err());
        assert!(state.focus_sub_card(S1, C1).is_err());
        assert!(state.begin_reset(None).is_err());

        state.select_card(C1).unwrap();
        let err = state.select_card(CardId(2)).unwrap_err();
        assert!(matches!(
            err,
            CardfolioError::InvalidTransition {
                from: "selecting",
                op: "select_card"
            }
        ));
        state.release_main_lock().unwrap();
        // Sub-card of another card.
        assert!(state.focus_sub_card(S1, CardId(2)).is_err());
    }

    #[test]
    fn reset_remembers_focus_and_queue() {
        let mut state = AnimationState::new();
        state.select_card(C1).unwrap();
        state.release_main_lock().unwrap();
        state.focus_sub_card(S1, C1).unwrap();
        state.finish_focus().unwrap();
        state.begin_reset(Some(CardId(2))).unwrap();
        assert!(state.main_card_animating());
        assert_eq!(state.focused_sub_card(), Some(S1));
        assert_lock_invariant(&state);

        let mut engine = TweenEngine::new();
        assert_eq!(state.full_reset(&mut engine), Some(CardId(2)));
        assert_eq!(state.phase(), Phase::Idle);
        assert_eq!(state.focused_sub_card(), None);
    }

    #[test]
    fn full_reset_cancels_orbit_tweens() {
        let start = Instant::now();
        let mut engine: TweenEngine<Target, Cue> = TweenEngine::new();
        let mut state = AnimationState::new();
        for sub in [SubCardId(10), SubCardId(11)] {
            let record = OrbitRecord {
                angle: 0.0,
                radius: 50.0,
                period: 20.0,
                direction: 1.0,
            };
            state.orbits_mut().insert(sub, record);
            let id = engine.animate(record.revolution(sub), start);
            state.push_orbit_tween(sub, id, &mut engine);
        }
        assert_eq!(state.orbit_tweens().count(), 2);

        // Replacing a handle cancels the old tween.
        let old = state.orbit_tween(SubCardId(10)).unwrap();
        let spec = TweenSpec::new(Target::Orbit(SubCardId(10)))
            .prop(Prop::Angle, 1.0)
            .duration(Duration::from_secs(1))
            .repeat_forever();
        let id = engine.animate(spec, start);
        state.push_orbit_tween(SubCardId(10), id, &mut engine);
        assert!(!engine.is_active(old));
        assert_eq!(engine.active_count(), 2);

        let _ = state.full_reset(&mut engine);
        assert_eq!(state.orbit_tweens().count(), 0);
        assert_eq!(engine.active_count(), 0);
        // Idempotent.
        assert_eq!(state.full_reset(&mut engine), None);
    }
}
