use std::ops::RangeInclusive;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Motion", inline)]
#[serde(default)]
/// Durations (seconds) and target scales of the card choreography.
pub struct MotionOptions {
    /// Moving the selected card to the viewport center.
    #[schemars(title = "Select Duration", range(min = 0.0, max = 3.0), extend("step" = 0.05))]
    pub select_duration: f32,
    /// Flipping the selected card's inner face.
    #[schemars(title = "Flip Duration", range(min = 0.0, max = 3.0), extend("step" = 0.05))]
    pub flip_duration: f32,
    /// Pause between centering and flipping.
    #[schemars(skip)]
    pub flip_delay: f32,
    /// Scale of the selected card.
    #[schemars(title = "Select Scale", range(min = 0.5, max = 3.0), extend("step" = 0.05))]
    pub select_scale: f32,
    /// Sub-card pop-out into focus.
    #[schemars(title = "Focus Duration", range(min = 0.0, max = 3.0), extend("step" = 0.05))]
    pub focus_duration: f32,
    /// Sub-card return to its orbit.
    #[schemars(title = "Unfocus Duration", range(min = 0.0, max = 3.0), extend("step" = 0.05))]
    pub unfocus_duration: f32,
    /// Scale of a focused sub-card.
    #[schemars(title = "Focus Scale", range(min = 1.5, max = 2.0), extend("step" = 0.05))]
    pub focus_scale: f32,
    /// Sub-card spawn (scale/opacity 0 to 1).
    #[schemars(title = "Spawn Duration", range(min = 0.0, max = 3.0), extend("step" = 0.05))]
    pub spawn_duration: f32,
    /// Extra spawn delay per sub-card index.
    #[schemars(title = "Spawn Stagger", range(min = 0.0, max = 1.0), extend("step" = 0.01))]
    pub spawn_stagger: f32,
    /// Fading sub-cards out during reset.
    #[schemars(skip)]
    pub hide_duration: f32,
    /// Flipping the inner face back during reset.
    #[schemars(skip)]
    pub unflip_duration: f32,
    /// Returning the card to its original geometry.
    #[schemars(title = "Reset Duration", range(min = 0.0, max = 3.0), extend("step" = 0.05))]
    pub return_duration: f32,
    /// Opacity of the cards that were not selected.
    #[schemars(title = "Dim Opacity", range(min = 0.0, max = 1.0), extend("step" = 0.05))]
    pub dim_opacity: f32,
    /// Scale of the cards that were not selected.
    #[schemars(skip)]
    pub dim_scale: f32,
}

impl Default for MotionOptions {
    fn default() -> Self {
        Self {
            select_duration: 0.6,
            flip_duration: 0.6,
            flip_delay: 0.1,
            select_scale: 1.2,
            focus_duration: 0.4,
            unfocus_duration: 0.4,
            focus_scale: 1.5,
            spawn_duration: 0.5,
            spawn_stagger: 0.1,
            hide_duration: 0.3,
            unflip_duration: 0.4,
            return_duration: 0.5,
            dim_opacity: 0.5,
            dim_scale: 0.95,
        }
    }
}

impl MotionOptions {
    /// Every field with the inclusive range it must fall in.
    pub(crate) fn bounded_fields(&self) -> [(&'static str, f32, RangeInclusive<f32>); 14] {
        [
            ("select_duration", self.select_duration, 0.0..=3.0),
            ("flip_duration", self.flip_duration, 0.0..=3.0),
            ("flip_delay", self.flip_delay, 0.0..=3.0),
            ("select_scale", self.select_scale, 0.5..=3.0),
            ("focus_duration", self.focus_duration, 0.0..=3.0),
            ("unfocus_duration", self.unfocus_duration, 0.0..=3.0),
            ("focus_scale", self.focus_scale, 1.5..=2.0),
            ("spawn_duration", self.spawn_duration, 0.0..=3.0),
            ("spawn_stagger", self.spawn_stagger, 0.0..=1.0),
            ("hide_duration", self.hide_duration, 0.0..=3.0),
            ("unflip_duration", self.unflip_duration, 0.0..=3.0),
            ("return_duration", self.return_duration, 0.0..=3.0),
            ("dim_opacity", self.dim_opacity, 0.0..=1.0),
            ("dim_scale", self.dim_scale, 0.0..=1.0),
        ]
    }
}
