//! Tween engine: eased property interpolation driven by an external frame
//! clock.
//!
//! - [`TweenSpec`]: what to animate (target, properties, timing, cue)
//! - [`TweenEngine`]: runs tweens and timelines, reports completion cues
//! - [`PropertySink`]: where interpolated values land

mod easing;
mod engine;
mod props;
mod runner;
mod spec;
mod timeline;

pub use easing::Easing;
pub use engine::{TweenEngine, TweenId};
pub use props::{lerp, Prop, PropTween, PropertySink, TweenTarget};
pub use spec::{secs_to_duration, Repeat, TweenSpec, MAX_TWEEN_SECS};
pub use timeline::TimelineId;
