use std::ops::RangeInclusive;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Orbit", inline)]
#[serde(default)]
/// Sub-card orbit parameters.
pub struct OrbitOptions {
    /// Orbit radius as a fraction of the card's shorter side.
    #[schemars(title = "Radius", range(min = 0.30, max = 0.35), extend("step" = 0.01))]
    pub radius_fraction: f32,
    /// Seconds per revolution before jitter.
    #[schemars(title = "Period", range(min = 5.0, max = 120.0), extend("step" = 1.0))]
    pub base_period: f32,
    /// Random +/- spread applied to each sub-card's period.
    #[schemars(title = "Period Jitter", range(min = 0.0, max = 20.0), extend("step" = 0.5))]
    pub period_jitter: f32,
    /// Lower bound on any sub-card's period.
    #[schemars(skip)]
    pub min_period: f32,
    /// Draw a ring along the orbit while sub-cards circle.
    #[schemars(title = "Show Orbit Path")]
    pub show_path: bool,
    /// Opacity of the orbit ring once shown.
    #[schemars(skip)]
    pub path_opacity: f32,
}

impl Default for OrbitOptions {
    fn default() -> Self {
        Self {
            radius_fraction: 0.32,
            base_period: 30.0,
            period_jitter: 5.0,
            min_period: 10.0,
            show_path: true,
            path_opacity: 0.35,
        }
    }
}

impl OrbitOptions {
    /// Every numeric field with the inclusive range it must fall in.
    pub(crate) fn bounded_fields(&self) -> [(&'static str, f32, RangeInclusive<f32>); 5] {
        [
            ("radius_fraction", self.radius_fraction, 0.30..=0.35),
            ("base_period", self.base_period, 5.0..=120.0),
            ("period_jitter", self.period_jitter, 0.0..=20.0),
            ("min_period", self.min_period, 0.1..=120.0),
            ("path_opacity", self.path_opacity, 0.0..=1.0),
        ]
    }
}
