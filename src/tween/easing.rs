//! Easing functions for tween interpolation.
//!
//! The power curves follow the usual web-animation naming: `power1` is
//! quadratic, `power2` is cubic. All functions map `[0, 1]` onto `[0, 1]`
//! with fixed endpoints.

/// Easing function variants for tween curves.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Easing {
    /// Linear interpolation (no easing). Used for orbits.
    #[default]
    Linear,
    /// Quadratic ease-in (slow start, fast end).
    Power1In,
    /// Quadratic ease-out.
    Power1Out,
    /// Quadratic ease-in-out.
    Power1InOut,
    /// Cubic ease-in.
    Power2In,
    /// Cubic ease-out (fast start, slow end).
    Power2Out,
    /// Cubic ease-in-out.
    Power2InOut,
}

impl Easing {
    /// Evaluate the easing function at time t.
    ///
    /// Input t is clamped to [0.0, 1.0].
    #[inline]
    #[must_use]
    pub fn evaluate(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);

        match self {
            Self::Linear => t,
            Self::Power1In => t * t,
            Self::Power1Out => {
                let omt = 1.0 - t;
                1.0 - omt * omt
            }
            Self::Power1InOut => in_out(t, 2),
            Self::Power2In => t * t * t,
            Self::Power2Out => {
                let omt = 1.0 - t;
                1.0 - omt * omt * omt
            }
            Self::Power2InOut => in_out(t, 3),
        }
    }

    /// Short name for logging.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Linear => "none",
            Self::Power1In => "power1.in",
            Self::Power1Out => "power1.out",
            Self::Power1InOut => "power1.inOut",
            Self::Power2In => "power2.in",
            Self::Power2Out => "power2.out",
            Self::Power2InOut => "power2.inOut",
        }
    }
}

/// Symmetric ease-in-out built from `t^power`.
#[inline]
fn in_out(t: f32, power: i32) -> f32 {
    if t < 0.5 {
        0.5 * (2.0 * t).powi(power)
    } else {
        1.0 - 0.5 * (2.0 * (1.0 - t)).powi(power)
    }
}
