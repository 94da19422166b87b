//! Input handling: event types and the click state machine that turns
//! pointer presses into click targets.

/// Press/release pairing and drag detection.
pub mod click;
/// Platform-agnostic input events.
pub mod event;

pub use click::{ClickTracker, DRAG_THRESHOLD};
pub use event::{InputEvent, Key, MouseButton};
