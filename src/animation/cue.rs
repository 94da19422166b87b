//! Completion cues the controller reacts to.

use crate::deck::{CardId, SubCardId};

/// Reported by the tween engine when a step of a sequence completes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cue {
    /// Card reached the viewport center.
    Centered(CardId),
    /// Card flip to the back face finished.
    Flipped(CardId),
    /// Sub-card finished its entrance and can start orbiting.
    Spawned(SubCardId),
    /// Sub-card reached the focus position.
    FocusIn(SubCardId),
    /// Sub-card returned to its orbit position.
    FocusOut(SubCardId),
    /// Focused sub-card faded out ahead of a reset.
    ExitFaded(CardId),
    /// Sub-card faded out during a reset.
    Hidden(SubCardId),
    /// Every reset stage of the card finished.
    ResetSettled(CardId),
}
