//! Timelines: groups of tweens that report one cue when all have finished.

use rustc_hash::FxHashSet;

use super::TweenId;

/// Handle to a timeline owned by a [`TweenEngine`](super::TweenEngine).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimelineId(pub(crate) u64);

/// Pending members and the cue to fire once they are gone.
///
/// A timeline only completes after it has been sealed, so members can be
/// added one at a time without it firing early.
pub(crate) struct Timeline<C> {
    pending: FxHashSet<TweenId>,
    sealed: bool,
    cue: Option<C>,
}

impl<C> Timeline<C> {
    pub(crate) fn new(cue: Option<C>) -> Self {
        Self {
            pending: FxHashSet::default(),
            sealed: false,
            cue,
        }
    }

    pub(crate) fn add(&mut self, id: TweenId) {
        let _ = self.pending.insert(id);
    }

    pub(crate) fn seal(&mut self) {
        self.sealed = true;
    }

    /// Remove a finished or cancelled member.
    pub(crate) fn remove(&mut self, id: TweenId) {
        let _ = self.pending.remove(&id);
    }

    pub(crate) fn is_settled(&self) -> bool {
        self.sealed && self.pending.is_empty()
    }

    pub(crate) fn take_cue(&mut self) -> Option<C> {
        self.cue.take()
    }

    pub(crate) fn len(&self) -> usize {
        self.pending.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settles_only_when_sealed_and_empty() {
        let mut tl = Timeline::new(Some("done"));
        tl.add(TweenId(1));
        tl.add(TweenId(2));
        assert!(!tl.is_settled());
        tl.remove(TweenId(1));
        tl.remove(TweenId(2));
        assert!(!tl.is_settled());
        tl.seal();
        assert!(tl.is_settled());
        assert_eq!(tl.take_cue(), Some("done"));
        assert_eq!(tl.take_cue(), None);
    }
}
