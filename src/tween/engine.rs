//! The tween engine: owns every running tween and timeline.
//!
//! The engine never calls back into the caller. Completion is reported as
//! cues returned from [`TweenEngine::tick`]; the caller decides what runs
//! next. This keeps each animated sequence a chain of named steps instead of
//! nested callbacks.

use std::collections::BTreeMap;

use rustc_hash::FxHashMap;
use web_time::Instant;

use super::props::{Prop, PropertySink, TweenTarget};
use super::runner::TweenRunner;
use super::spec::TweenSpec;
use super::timeline::{Timeline, TimelineId};

/// Handle to a running tween.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TweenId(pub(crate) u64);

/// Property interpolation driven by an external frame clock.
///
/// `T` identifies animatable elements, `C` is the cue type reported on
/// completion.
pub struct TweenEngine<T, C> {
    /// Ordered by id so tweens apply in request order.
    tweens: BTreeMap<TweenId, TweenRunner<T, C>>,
    timelines: FxHashMap<TimelineId, Timeline<C>>,
    /// Cues that became ready outside of `tick` (cancellations, empty
    /// timelines). Delivered first on the next `tick`.
    ready: Vec<C>,
    next_tween: u64,
    next_timeline: u64,
}

impl<T: TweenTarget, C> TweenEngine<T, C> {
    /// Empty engine.
    #[must_use]
    pub fn new() -> Self {
        Self {
            tweens: BTreeMap::new(),
            timelines: FxHashMap::default(),
            ready: Vec::new(),
            next_tween: 0,
            next_timeline: 0,
        }
    }

    /// Start a tween. Its clock (including any delay) starts at `now`.
    pub fn animate(&mut self, spec: TweenSpec<T, C>, now: Instant) -> TweenId {
        self.insert(spec, now, None)
    }

    /// Start a tween as a member of `timeline`.
    ///
    /// If the timeline no longer exists the tween still runs, unattached.
    pub fn animate_in(
        &mut self,
        timeline: TimelineId,
        spec: TweenSpec<T, C>,
        now: Instant,
    ) -> TweenId {
        let attached = self.timelines.contains_key(&timeline);
        let id = self.insert(spec, now, attached.then_some(timeline));
        if let Some(tl) = self.timelines.get_mut(&timeline) {
            tl.add(id);
        }
        id
    }

    fn insert(
        &mut self,
        spec: TweenSpec<T, C>,
        now: Instant,
        timeline: Option<TimelineId>,
    ) -> TweenId {
        let id = TweenId(self.next_tween);
        self.next_tween += 1;
        log::trace!(
            "tween {:?} on {:?}: {} props over {:?}",
            id,
            spec.target,
            spec.props.len(),
            spec.duration
        );
        let _ = self.tweens.insert(id, TweenRunner::new(spec, now, timeline));
        id
    }

    /// Create an open timeline that reports `cue` once sealed and all its
    /// members have finished or been cancelled.
    pub fn create_timeline(&mut self, cue: Option<C>) -> TimelineId {
        let id = TimelineId(self.next_timeline);
        self.next_timeline += 1;
        let _ = self.timelines.insert(id, Timeline::new(cue));
        id
    }

    /// Stop accepting members. An already-empty timeline completes on the
    /// next tick.
    pub fn seal_timeline(&mut self, id: TimelineId) {
        if let Some(tl) = self.timelines.get_mut(&id) {
            tl.seal();
        }
        self.settle_timeline(id);
    }

    /// Number of unfinished members, or `None` if the timeline is gone.
    #[must_use]
    pub fn timeline_len(&self, id: TimelineId) -> Option<usize> {
        self.timelines.get(&id).map(Timeline::len)
    }

    /// Write property values immediately, bypassing interpolation.
    pub fn set_immediately<S: PropertySink<T> + ?Sized>(
        &self,
        target: T,
        props: &[(Prop, f32)],
        sink: &mut S,
    ) {
        for &(prop, value) in props {
            sink.write(target, prop, value);
        }
    }

    /// Cancel every tween on `target`. Cancelled tweens never report their
    /// cue. Returns how many were cancelled.
    pub fn cancel_animations_on(&mut self, target: T) -> usize {
        let ids: Vec<TweenId> = self
            .tweens
            .iter()
            .filter(|(_, t)| t.target() == target)
            .map(|(id, _)| *id)
            .collect();
        for id in &ids {
            let _ = self.cancel(*id);
        }
        ids.len()
    }

    /// Cancel one tween. Returns `false` if it was not running.
    pub fn cancel(&mut self, id: TweenId) -> bool {
        let Some(runner) = self.tweens.remove(&id) else {
            return false;
        };
        if let Some(tl) = runner.timeline() {
            self.detach(tl, id);
        }
        true
    }

    /// Freeze a tween in place. Returns `false` if it was not running.
    pub fn pause(&mut self, id: TweenId, now: Instant) -> bool {
        self.tweens.get_mut(&id).is_some_and(|t| {
            t.pause(now);
            true
        })
    }

    /// Continue a paused tween. Returns `false` if it was not running.
    pub fn resume(&mut self, id: TweenId, now: Instant) -> bool {
        self.tweens.get_mut(&id).is_some_and(|t| {
            t.resume(now);
            true
        })
    }

    /// Whether the tween is still running (paused counts as running).
    #[must_use]
    pub fn is_active(&self, id: TweenId) -> bool {
        self.tweens.contains_key(&id)
    }

    /// Whether the tween is running but paused.
    #[must_use]
    pub fn is_paused(&self, id: TweenId) -> bool {
        self.tweens.get(&id).is_some_and(TweenRunner::is_paused)
    }

    /// Number of running tweens.
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.tweens.len()
    }

    /// Number of running tweens on `target`.
    #[must_use]
    pub fn count_on(&self, target: T) -> usize {
        self.tweens.values().filter(|t| t.target() == target).count()
    }

    /// Whether any single-play tween or pending cue is outstanding. Infinite
    /// repeats do not count.
    #[must_use]
    pub fn is_busy(&self) -> bool {
        !self.ready.is_empty()
            || self.tweens.values().any(|t| !t.is_repeating())
    }

    /// Advance every tween to `now`, writing values into `sink`.
    ///
    /// Returns the cues of everything that completed, in completion order:
    /// tween cues first (in request order), each followed by the cue of any
    /// timeline it settled.
    pub fn tick<S: PropertySink<T> + ?Sized>(
        &mut self,
        now: Instant,
        sink: &mut S,
    ) -> Vec<C> {
        let mut cues = std::mem::take(&mut self.ready);

        let mut finished = Vec::new();
        for (id, runner) in &mut self.tweens {
            if runner.is_paused() {
                continue;
            }
            if runner.apply(now, sink) {
                finished.push(*id);
            }
        }

        for id in finished {
            let Some(mut runner) = self.tweens.remove(&id) else {
                continue;
            };
            if let Some(cue) = runner.take_cue() {
                cues.push(cue);
            }
            if let Some(tl) = runner.timeline() {
                self.detach(tl, id);
                cues.append(&mut self.ready);
            }
        }

        cues
    }

    /// Cancel everything, including timelines. Pending cues are dropped.
    pub fn clear(&mut self) {
        self.tweens.clear();
        self.timelines.clear();
        self.ready.clear();
    }

    fn detach(&mut self, timeline: TimelineId, id: TweenId) {
        if let Some(tl) = self.timelines.get_mut(&timeline) {
            tl.remove(id);
        }
        self.settle_timeline(timeline);
    }

    fn settle_timeline(&mut self, id: TimelineId) {
        let settled = self.timelines.get(&id).is_some_and(Timeline::is_settled);
        if settled {
            if let Some(mut tl) = self.timelines.remove(&id) {
                if let Some(cue) = tl.take_cue() {
                    self.ready.push(cue);
                }
            }
        }
    }
}

impl<T: TweenTarget, C> Default for TweenEngine<T, C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, C> std::fmt::Debug for TweenEngine<T, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TweenEngine")
            .field("tweens", &self.tweens.len())
            .field("timelines", &self.timelines.len())
            .field("ready", &self.ready.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use web_time::Duration;

    use super::*;
    use crate::tween::Easing;

    #[derive(Default)]
    struct MapSink(FxHashMap<(u8, Prop), f32>);

    impl PropertySink<u8> for MapSink {
        fn read(&self, target: u8, prop: Prop) -> f32 {
            self.0.get(&(target, prop)).copied().unwrap_or(0.0)
        }

        fn write(&mut self, target: u8, prop: Prop, value: f32) {
            let _ = self.0.insert((target, prop), value);
        }
    }

    fn ms(start: Instant, ms: u64) -> Instant {
        start + Duration::from_millis(ms)
    }

    fn move_x(target: u8, to: f32, cue: &'static str) -> TweenSpec<u8, &'static str> {
        TweenSpec::new(target)
            .prop(Prop::X, to)
            .duration(Duration::from_millis(100))
            .ease(Easing::Linear)
            .on_complete(cue)
    }

    #[test]
    fn completion_reports_cue_once() {
        let start = Instant::now();
        let mut engine = TweenEngine::new();
        let mut sink = MapSink::default();
        let id = engine.animate(move_x(0, 10.0, "a"), start);

        assert!(engine.tick(ms(start, 50), &mut sink).is_empty());
        assert!((sink.read(0, Prop::X) - 5.0).abs() < 0.1);
        assert_eq!(engine.tick(ms(start, 100), &mut sink), vec!["a"]);
        assert!(!engine.is_active(id));
        assert!(engine.tick(ms(start, 200), &mut sink).is_empty());
        assert_eq!(sink.read(0, Prop::X), 10.0);
    }

    #[test]
    fn cancel_drops_cue() {
        let start = Instant::now();
        let mut engine = TweenEngine::new();
        let mut sink = MapSink::default();
        let _ = engine.animate(move_x(1, 10.0, "x"), start);
        let _ = engine.animate(move_x(1, 20.0, "y"), start);
        let _ = engine.animate(move_x(2, 20.0, "z"), start);

        assert_eq!(engine.cancel_animations_on(1), 2);
        assert_eq!(engine.count_on(1), 0);
        assert_eq!(engine.tick(ms(start, 150), &mut sink), vec!["z"]);
    }

    #[test]
    fn timeline_fires_after_all_members() {
        let start = Instant::now();
        let mut engine = TweenEngine::new();
        let mut sink = MapSink::default();
        let tl = engine.create_timeline(Some("all"));
        let _ = engine.animate_in(tl, move_x(0, 1.0, "first"), start);
        let mut slow = move_x(1, 1.0, "second");
        slow.delay = Duration::from_millis(100);
        let _ = engine.animate_in(tl, slow, start);
        engine.seal_timeline(tl);

        assert_eq!(engine.tick(ms(start, 120), &mut sink), vec!["first"]);
        assert_eq!(engine.timeline_len(tl), Some(1));
        assert_eq!(
            engine.tick(ms(start, 200), &mut sink),
            vec!["second", "all"]
        );
        assert_eq!(engine.timeline_len(tl), None);
    }

    #[test]
    fn empty_sealed_timeline_fires_next_tick() {
        let start = Instant::now();
        let mut engine: TweenEngine<u8, &str> = TweenEngine::new();
        let mut sink = MapSink::default();
        let tl = engine.create_timeline(Some("empty"));
        engine.seal_timeline(tl);
        assert!(engine.is_busy());
        assert_eq!(engine.tick(start, &mut sink), vec!["empty"]);
        assert!(!engine.is_busy());
    }

    #[test]
    fn cancelling_last_member_settles_timeline() {
        let start = Instant::now();
        let mut engine = TweenEngine::new();
        let mut sink = MapSink::default();
        let tl = engine.create_timeline(Some("done"));
        let _ = engine.animate_in(tl, move_x(3, 1.0, "never"), start);
        engine.seal_timeline(tl);
        assert_eq!(engine.cancel_animations_on(3), 1);
        assert_eq!(engine.tick(ms(start, 10), &mut sink), vec!["done"]);
    }

    #[test]
    fn paused_tween_holds_value() {
        let start = Instant::now();
        let mut engine = TweenEngine::new();
        let mut sink = MapSink::default();
        let id = engine.animate(move_x(0, 100.0, "p"), start);
        let _ = engine.tick(ms(start, 40), &mut sink);
        assert!(engine.pause(id, ms(start, 40)));
        let _ = engine.tick(ms(start, 500), &mut sink);
        assert!((sink.read(0, Prop::X) - 40.0).abs() < 0.5);
        assert!(engine.is_paused(id));

        assert!(engine.resume(id, ms(start, 500)));
        assert_eq!(engine.tick(ms(start, 560), &mut sink), vec!["p"]);
    }

    #[test]
    fn repeating_tween_never_completes() {
        let start = Instant::now();
        let mut engine = TweenEngine::new();
        let mut sink = MapSink::default();
        let spec = TweenSpec::new(0u8)
            .prop_from_to(Prop::Angle, 0.0, 1.0)
            .duration(Duration::from_millis(100))
            .repeat_forever()
            .on_complete("never");
        let id = engine.animate(spec, start);
        assert!(!engine.is_busy());
        for step in 1..10 {
            assert!(engine.tick(ms(start, step * 70), &mut sink).is_empty());
        }
        assert!(engine.is_active(id));
        assert!(sink.read(0, Prop::Angle) < 1.0);
    }

    #[test]
    fn set_immediately_writes_all() {
        let engine: TweenEngine<u8, ()> = TweenEngine::new();
        let mut sink = MapSink::default();
        engine.set_immediately(4, &[(Prop::Opacity, 0.0), (Prop::Scale, 0.0)], &mut sink);
        assert_eq!(sink.read(4, Prop::Opacity), 0.0);
        assert_eq!(sink.0.len(), 2);
    }
}
