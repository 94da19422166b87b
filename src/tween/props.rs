//! Animatable properties and the sink tweens write into.

use std::hash::Hash;

/// A single animatable scalar property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Prop {
    /// Horizontal translation from the element's rest position.
    X,
    /// Vertical translation from the element's rest position.
    Y,
    /// Uniform scale.
    Scale,
    /// Opacity (0 = transparent).
    Opacity,
    /// Rotation about the vertical axis, in degrees (flip faces).
    RotationY,
    /// Stacking order. Rounded when written.
    ZIndex,
    /// Orbit angle in radians.
    Angle,
    /// Orbit radius.
    Radius,
}

/// One property moving from a start value to an end value.
///
/// A `from` of `None` means "whatever the property reads when the tween
/// starts", resolved after the delay elapses.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PropTween {
    /// Which property.
    pub prop: Prop,
    /// Explicit start value, or `None` to read the current one.
    pub from: Option<f32>,
    /// End value.
    pub to: f32,
}

impl PropTween {
    /// Tween from the current value to `to`.
    #[must_use]
    pub const fn to(prop: Prop, to: f32) -> Self {
        Self {
            prop,
            from: None,
            to,
        }
    }

    /// Tween from an explicit `from` to `to`.
    #[must_use]
    pub const fn from_to(prop: Prop, from: f32, to: f32) -> Self {
        Self {
            prop,
            from: Some(from),
            to,
        }
    }
}

/// Storage the tween engine reads start values from and writes
/// interpolated values into.
pub trait PropertySink<T> {
    /// Current value of `prop` on `target`.
    fn read(&self, target: T, prop: Prop) -> f32;

    /// Store a new value of `prop` on `target`.
    fn write(&mut self, target: T, prop: Prop, value: f32);
}

/// Marker for types usable as tween targets.
pub trait TweenTarget: Copy + Eq + Hash + std::fmt::Debug {}

impl<T: Copy + Eq + Hash + std::fmt::Debug> TweenTarget for T {}

/// Linear interpolation between two values.
#[inline]
#[must_use]
pub fn lerp(start: f32, end: f32, t: f32) -> f32 {
    start + (end - start) * t
}
