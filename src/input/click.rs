use glam::Vec2;

use crate::deck::ClickTarget;

/// Pointer travel (CSS pixels) beyond which a press becomes a drag.
pub const DRAG_THRESHOLD: f32 = 5.0;

/// Turns press/release pairs into clicks.
///
/// A click is reported only when press and release land on the same
/// target and the pointer did not travel far enough in between to count as
/// a drag.
#[derive(Debug, Default)]
pub struct ClickTracker {
    pointer: Vec2,
    pressed: Option<(ClickTarget, Vec2)>,
    is_dragging: bool,
}

impl ClickTracker {
    /// Tracker with no press in progress.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Last known pointer position.
    #[must_use]
    pub fn pointer(&self) -> Vec2 {
        self.pointer
    }

    /// Whether a press is in progress.
    #[must_use]
    pub fn is_pressed(&self) -> bool {
        self.pressed.is_some()
    }

    /// Update the pointer position, marking a drag once the press has
    /// travelled past [`DRAG_THRESHOLD`].
    pub fn moved(&mut self, pos: Vec2) {
        self.pointer = pos;
        if let Some((_, origin)) = self.pressed {
            if origin.distance(pos) > DRAG_THRESHOLD {
                self.is_dragging = true;
            }
        }
    }

    /// Record what is under the pointer at press time.
    pub fn press(&mut self, target: ClickTarget, pos: Vec2) {
        self.pointer = pos;
        self.pressed = Some((target, pos));
        self.is_dragging = false;
    }

    /// Process a release over `target` and return the click it completes.
    pub fn release(&mut self, target: ClickTarget, pos: Vec2) -> Option<ClickTarget> {
        self.moved(pos);
        let pressed = self.pressed.take();
        let was_dragging = std::mem::take(&mut self.is_dragging);

        let (down_target, _) = pressed?;
        if was_dragging {
            log::trace!("drag released over {target:?}, no click");
            return None;
        }
        // Press and release on different elements
        (down_target == target).then_some(target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deck::{CardId, SubCardId};

    #[test]
    fn same_target_clicks() {
        let mut tracker = ClickTracker::new();
        let card = ClickTarget::Card(CardId(1));
        tracker.press(card, Vec2::new(10.0, 10.0));
        assert_eq!(tracker.release(card, Vec2::new(12.0, 11.0)), Some(card));
        assert!(!tracker.is_pressed());
    }

    #[test]
    fn background_press_and_release_is_outside_click() {
        let mut tracker = ClickTracker::new();
        tracker.press(ClickTarget::Outside, Vec2::ZERO);
        assert_eq!(
            tracker.release(ClickTarget::Outside, Vec2::ZERO),
            Some(ClickTarget::Outside)
        );
    }

    #[test]
    fn mismatched_targets_do_nothing() {
        let mut tracker = ClickTracker::new();
        tracker.press(ClickTarget::SubCard(SubCardId(3)), Vec2::ZERO);
        assert_eq!(
            tracker.release(ClickTarget::Card(CardId(1)), Vec2::ZERO),
            None
        );
    }

    #[test]
    fn drag_cancels_click() {
        let mut tracker = ClickTracker::new();
        let card = ClickTarget::Card(CardId(1));
        tracker.press(card, Vec2::ZERO);
        tracker.moved(Vec2::new(30.0, 0.0));
        tracker.moved(Vec2::ZERO);
        assert_eq!(tracker.release(card, Vec2::ZERO), None);

        // The next press starts clean.
        tracker.press(card, Vec2::ZERO);
        assert_eq!(tracker.release(card, Vec2::ZERO), Some(card));
    }

    #[test]
    fn release_without_press_is_ignored() {
        let mut tracker = ClickTracker::new();
        assert_eq!(tracker.release(ClickTarget::Outside, Vec2::ZERO), None);
    }
}
