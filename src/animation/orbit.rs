//! Orbit records and their live tween handles.

use std::f32::consts::TAU;

use rand::Rng;
use rustc_hash::FxHashMap;

use super::cue::Cue;
use crate::deck::{Stage, SubCardId, Target};
use crate::options::OrbitOptions;
use crate::tween::{Easing, Prop, PropertySink, TweenId, TweenSpec};

/// Where a sub-card is on its circular path.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitRecord {
    /// Current angle in radians.
    pub angle: f32,
    /// Distance from the card center.
    pub radius: f32,
    /// Seconds per revolution.
    pub period: f32,
    /// `1.0` counter-clockwise in screen space, `-1.0` the other way.
    pub direction: f32,
}

impl OrbitRecord {
    /// Infinite tween advancing the angle one full turn per period.
    #[must_use]
    pub fn revolution(&self, sub: SubCardId) -> TweenSpec<Target, Cue> {
        TweenSpec::new(Target::Orbit(sub))
            .prop_from_to(Prop::Angle, self.angle, self.angle + TAU * self.direction)
            .duration_secs(self.period)
            .ease(Easing::Linear)
            .repeat_forever()
    }
}

/// Seconds per revolution: base period plus uniform jitter, floored at the
/// minimum. A non-finite jitter counts as none.
pub fn sample_period<R: Rng + ?Sized>(options: &OrbitOptions, rng: &mut R) -> f32 {
    let jitter = options.period_jitter.max(0.0);
    let offset = if jitter > 0.0 && jitter.is_finite() {
        rng.random_range(-jitter..=jitter)
    } else {
        0.0
    };
    (options.base_period + offset).max(options.min_period)
}

/// Orbit state of every spawned sub-card, plus the tween driving each one.
#[derive(Debug, Default)]
pub struct OrbitRegistry {
    records: FxHashMap<SubCardId, OrbitRecord>,
    /// In start order.
    tweens: Vec<(SubCardId, TweenId)>,
}

impl OrbitRegistry {
    /// Record a sub-card's orbit. Replaces any previous record.
    pub fn insert(&mut self, sub: SubCardId, record: OrbitRecord) {
        let _ = self.records.insert(sub, record);
    }

    /// Orbit record of `sub`.
    #[must_use]
    pub fn get(&self, sub: SubCardId) -> Option<&OrbitRecord> {
        self.records.get(&sub)
    }

    /// Attach the tween driving `sub`. Returns the handle it replaced, which
    /// the caller must cancel.
    pub fn attach(&mut self, sub: SubCardId, id: TweenId) -> Option<TweenId> {
        if let Some(entry) = self.tweens.iter_mut().find(|(s, _)| *s == sub) {
            return Some(std::mem::replace(&mut entry.1, id));
        }
        self.tweens.push((sub, id));
        None
    }

    /// Tween driving `sub`, if one is attached.
    #[must_use]
    pub fn tween_of(&self, sub: SubCardId) -> Option<TweenId> {
        self.tweens.iter().find(|(s, _)| *s == sub).map(|(_, id)| *id)
    }

    /// Live tween handles in start order.
    pub fn tweens(&self) -> impl Iterator<Item = TweenId> + '_ {
        self.tweens.iter().map(|(_, id)| *id)
    }

    /// Sub-cards with an attached tween, in start order.
    pub fn orbiting(&self) -> impl Iterator<Item = SubCardId> + '_ {
        self.tweens.iter().map(|(sub, _)| *sub)
    }

    /// Remove every record and return the handles that were attached.
    pub fn drain(&mut self) -> Vec<TweenId> {
        self.records.clear();
        self.tweens.drain(..).map(|(_, id)| id).collect()
    }

    /// Number of attached tweens.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tweens.len()
    }

    /// Whether no tween is attached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tweens.is_empty()
    }
}

/// Routes orbit writes to the registry and everything else to the stage.
pub(crate) struct FrameSink<'a> {
    pub(crate) stage: &'a mut Stage,
    pub(crate) orbits: &'a mut OrbitRegistry,
}

impl PropertySink<Target> for FrameSink<'_> {
    fn read(&self, target: Target, prop: Prop) -> f32 {
        match (target, prop) {
            (Target::Orbit(sub), Prop::Angle) => {
                self.orbits.get(sub).map_or(0.0, |r| r.angle)
            }
            (Target::Orbit(sub), Prop::Radius) => {
                self.orbits.get(sub).map_or(0.0, |r| r.radius)
            }
            _ => self.stage.read(target, prop),
        }
    }

    fn write(&mut self, target: Target, prop: Prop, value: f32) {
        match (target, prop) {
            (Target::Orbit(sub), Prop::Angle) => {
                if let Some(record) = self.orbits.records.get_mut(&sub) {
                    record.angle = value;
                }
            }
            (Target::Orbit(sub), Prop::Radius) => {
                if let Some(record) = self.orbits.records.get_mut(&sub) {
                    record.radius = value;
                }
            }
            _ => self.stage.write(target, prop, value),
        }
    }
}
