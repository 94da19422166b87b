//! A single running tween.

use web_time::{Duration, Instant};

use super::props::{lerp, Prop, PropertySink};
use super::spec::{Repeat, TweenSpec};
use super::timeline::TimelineId;

/// Executes one tween: timing, pause bookkeeping and resolved start values.
pub(crate) struct TweenRunner<T, C> {
    spec: TweenSpec<T, C>,
    /// When the tween was requested. Play begins after `spec.delay`.
    start_time: Instant,
    /// Set while paused; progress is frozen at this instant.
    paused_at: Option<Instant>,
    /// `(prop, from, to)` once the delay has elapsed.
    resolved: Option<Vec<(Prop, f32, f32)>>,
    timeline: Option<TimelineId>,
}

impl<T: Copy, C> TweenRunner<T, C> {
    pub(crate) fn new(
        spec: TweenSpec<T, C>,
        start_time: Instant,
        timeline: Option<TimelineId>,
    ) -> Self {
        Self {
            spec,
            start_time,
            paused_at: None,
            resolved: None,
            timeline,
        }
    }

    pub(crate) fn target(&self) -> T {
        self.spec.target
    }

    pub(crate) fn timeline(&self) -> Option<TimelineId> {
        self.timeline
    }

    pub(crate) fn is_paused(&self) -> bool {
        self.paused_at.is_some()
    }

    pub(crate) fn is_repeating(&self) -> bool {
        self.spec.repeat == Repeat::Forever
    }

    pub(crate) fn take_cue(&mut self) -> Option<C> {
        self.spec.on_complete.take()
    }

    /// Freeze progress at `now`. No-op if already paused.
    pub(crate) fn pause(&mut self, now: Instant) {
        if self.paused_at.is_none() {
            self.paused_at = Some(now);
        }
    }

    /// Continue from where `pause` froze it.
    pub(crate) fn resume(&mut self, now: Instant) {
        if let Some(paused_at) = self.paused_at.take() {
            self.start_time += now.saturating_duration_since(paused_at);
        }
    }

    /// Normalized progress of the current play, or `None` while the delay
    /// is still running.
    pub(crate) fn progress(&self, now: Instant) -> Option<f32> {
        let now = self.paused_at.unwrap_or(now);
        let play_start = self.start_time + self.spec.delay;
        if now < play_start {
            return None;
        }
        let elapsed = now.saturating_duration_since(play_start);
        let duration = self.spec.duration;

        if duration.is_zero() {
            return Some(1.0);
        }
        let t = match self.spec.repeat {
            Repeat::Once => {
                (elapsed.as_secs_f32() / duration.as_secs_f32()).min(1.0)
            }
            Repeat::Forever => {
                let nanos = elapsed.as_nanos() % duration.as_nanos();
                Duration::from_nanos(nanos as u64).as_secs_f32()
                    / duration.as_secs_f32()
            }
        };
        Some(t)
    }

    /// Apply the tween at `now`. Returns `true` once a single-play tween
    /// has reached its end.
    pub(crate) fn apply<S: PropertySink<T> + ?Sized>(
        &mut self,
        now: Instant,
        sink: &mut S,
    ) -> bool {
        let Some(t) = self.progress(now) else {
            return false;
        };
        let target = self.spec.target;
        let resolved = self.resolved.get_or_insert_with(|| {
            self.spec
                .props
                .iter()
                .map(|p| {
                    (p.prop, p.from.unwrap_or_else(|| sink.read(target, p.prop)), p.to)
                })
                .collect()
        });

        let eased = self.spec.easing.evaluate(t);
        for &(prop, from, to) in resolved.iter() {
            sink.write(target, prop, lerp(from, to, eased));
        }

        self.spec.repeat == Repeat::Once && t >= 1.0
    }
}

impl<T: std::fmt::Debug, C> std::fmt::Debug for TweenRunner<T, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TweenRunner")
            .field("target", &self.spec.target)
            .field("props", &self.spec.props.len())
            .field("duration", &self.spec.duration)
            .field("easing", &self.spec.easing.name())
            .field("paused", &self.paused_at.is_some())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use rustc_hash::FxHashMap;

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

    fn linear(ms: u64) -> TweenSpec<u8, ()> {
        TweenSpec::new(0)
            .prop(Prop::X, 100.0)
            .duration(Duration::from_millis(ms))
            .ease(Easing::Linear)
    }

    #[test]
    fn progress_clamps() {
        let start = Instant::now();
        let runner = TweenRunner::new(linear(100), start, None);
        assert!((runner.progress(start).unwrap_or(-1.0)).abs() < 0.01);
        let mid = start + Duration::from_millis(50);
        assert!((runner.progress(mid).unwrap_or(-1.0) - 0.5).abs() < 0.01);
        let past = start + Duration::from_millis(300);
        assert_eq!(runner.progress(past), Some(1.0));
    }

    #[test]
    fn delay_defers_start() {
        let start = Instant::now();
        let mut spec = linear(100);
        spec.delay = Duration::from_millis(50);
        let runner = TweenRunner::new(spec, start, None);
        assert_eq!(runner.progress(start + Duration::from_millis(20)), None);
        assert!(runner.progress(start + Duration::from_millis(100)).is_some());
    }

    #[test]
    fn start_value_read_lazily() {
        let start = Instant::now();
        let mut sink = MapSink::default();
        sink.write(0, Prop::X, 50.0);
        let mut runner = TweenRunner::new(linear(100), start, None);
        let done = runner.apply(start + Duration::from_millis(50), &mut sink);
        assert!(!done);
        assert!((sink.read(0, Prop::X) - 75.0).abs() < 0.5);
        assert!(runner.apply(start + Duration::from_millis(100), &mut sink));
        assert_eq!(sink.read(0, Prop::X), 100.0);
    }

    #[test]
    fn pause_freezes_and_resume_continues() {
        let start = Instant::now();
        let mut runner = TweenRunner::new(linear(100), start, None);
        runner.pause(start + Duration::from_millis(30));
        let frozen = runner.progress(start + Duration::from_millis(90));
        assert!((frozen.unwrap_or(-1.0) - 0.3).abs() < 0.01);
        runner.resume(start + Duration::from_millis(200));
        let later = runner.progress(start + Duration::from_millis(210));
        assert!((later.unwrap_or(-1.0) - 0.4).abs() < 0.01);
    }

    #[test]
    fn repeat_wraps_progress() {
        let start = Instant::now();
        let runner = TweenRunner::new(linear(100).repeat_forever(), start, None);
        let t = runner.progress(start + Duration::from_millis(250));
        assert!((t.unwrap_or(-1.0) - 0.5).abs() < 0.01);
    }
}
