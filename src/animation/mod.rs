//! The card choreography: state, click handling, sequences and reset.
//!
//! [`DeckController`] is the entry point. It owns an [`AnimationState`]
//! whose [`Phase`] decides which clicks are honoured, and a tween engine
//! whose completion [`Cue`]s drive each sequence from one step to the next.

mod controller;
/// Completion cues.
pub mod cue;
/// Orbit records and their tweens.
pub mod orbit;
mod reset;
mod sequences;
/// Phase and lock state.
pub mod state;

pub use controller::DeckController;
pub use cue::Cue;
pub use orbit::{sample_period, OrbitRecord, OrbitRegistry};
pub use state::{AnimationState, Phase};
