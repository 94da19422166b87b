//! Tween requests.

use std::time::Duration;

use super::easing::Easing;
use super::props::{Prop, PropTween};

/// How often a tween plays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Repeat {
    /// Play once, then complete.
    #[default]
    Once,
    /// Restart from the start values forever. Never completes; must be
    /// cancelled.
    Forever,
}

/// Describes a tween to start: which target, which properties, and timing.
///
/// Built with the chained setters:
///
/// ```ignore
/// let spec = TweenSpec::new(Target::Card(id))
///     .prop(Prop::Scale, 1.2)
///     .duration_secs(0.6)
///     .ease(Easing::Power2Out)
///     .on_complete(Cue::Centered(id));
/// ```
#[derive(Debug, Clone)]
pub struct TweenSpec<T, C> {
    /// Element the properties belong to.
    pub target: T,
    /// Properties to interpolate.
    pub props: Vec<PropTween>,
    /// Length of one play.
    pub duration: Duration,
    /// Wait before the first play starts.
    pub delay: Duration,
    /// Interpolation curve.
    pub easing: Easing,
    /// Play once or forever.
    pub repeat: Repeat,
    /// Cue returned from `tick` when the tween completes.
    pub on_complete: Option<C>,
}

impl<T, C> TweenSpec<T, C> {
    /// Empty tween on `target`: no properties, zero duration, linear.
    pub fn new(target: T) -> Self {
        Self {
            target,
            props: Vec::new(),
            duration: Duration::ZERO,
            delay: Duration::ZERO,
            easing: Easing::Linear,
            repeat: Repeat::Once,
            on_complete: None,
        }
    }

    /// Tween `prop` from its current value to `to`.
    #[must_use]
    pub fn prop(mut self, prop: Prop, to: f32) -> Self {
        self.props.push(PropTween::to(prop, to));
        self
    }

    /// Tween `prop` from `from` to `to`.
    #[must_use]
    pub fn prop_from_to(mut self, prop: Prop, from: f32, to: f32) -> Self {
        self.props.push(PropTween::from_to(prop, from, to));
        self
    }

    /// Set the duration of one play.
    #[must_use]
    pub fn duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Set the duration in (non-negative) seconds.
    #[must_use]
    pub fn duration_secs(self, secs: f32) -> Self {
        self.duration(secs_to_duration(secs))
    }

    /// Set the start delay in (non-negative) seconds.
    #[must_use]
    pub fn delay_secs(mut self, secs: f32) -> Self {
        self.delay = secs_to_duration(secs);
        self
    }

    /// Set the easing curve.
    #[must_use]
    pub fn ease(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    /// Repeat forever.
    #[must_use]
    pub fn repeat_forever(mut self) -> Self {
        self.repeat = Repeat::Forever;
        self
    }

    /// Cue to report on completion.
    #[must_use]
    pub fn on_complete(mut self, cue: C) -> Self {
        self.on_complete = Some(cue);
        self
    }
}

/// Longest delay or duration, in seconds, a tween will run for.
pub const MAX_TWEEN_SECS: f32 = 86_400.0;

/// Seconds to `Duration`, treating negative and NaN as zero and capping at
/// [`MAX_TWEEN_SECS`].
#[must_use]
pub fn secs_to_duration(secs: f32) -> Duration {
    if secs.is_nan() || secs <= 0.0 {
        return Duration::ZERO;
    }
    Duration::try_from_secs_f32(secs.min(MAX_TWEEN_SECS)).unwrap_or(Duration::ZERO)
}
