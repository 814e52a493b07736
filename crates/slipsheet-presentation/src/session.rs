//! Per-presentation session state and the remembered-detent store.

use std::rc::Rc;

use rustc_hash::FxHashMap;
use slipsheet_core::DetentId;

use crate::presentable::Presentable;

/// Lifecycle of one presentation session.
#[derive(Debug, Clone, PartialEq)]
pub enum PresentationState {
    Idle,
    Presenting,
    /// Resting at a detent.
    Anchored(DetentId),
    /// A drag stream owns the position.
    Dragging,
    /// Animating toward a detent.
    Settling(DetentId),
    Dismissing,
    Dismissed,
}

impl PresentationState {
    /// Whether scroll-offset events should be processed in this state.
    pub fn observes_scrolling(&self) -> bool {
        matches!(
            self,
            PresentationState::Anchored(_)
                | PresentationState::Dragging
                | PresentationState::Settling(_)
        )
    }
}

/// Mutable state owned exclusively by the controller, mutated one event at
/// a time on the UI turn, and dropped with the session.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionState {
    /// The sheet's current top edge.
    pub current_y: f32,
    /// Currently selected detent, once a layout exists.
    pub selected: Option<DetentId>,
    /// An externally-executed animation is in flight.
    pub is_animating: bool,
    /// Last accepted scroll offset; the freeze target for halting.
    pub tracked_scroll_offset: f32,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            current_y: 0.0,
            selected: None,
            is_animating: false,
            tracked_scroll_offset: 0.0,
        }
    }
}

/// Identity of a presentation chain: the effective (topmost-child)
/// presentable, by pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChainId(usize);

impl ChainId {
    pub fn of(presentable: &Rc<dyn Presentable>) -> Self {
        Self(Rc::as_ptr(presentable) as *const () as usize)
    }
}

/// Remembers the last selected detent per presentation chain, so a
/// re-resolve (rotation, content change) restores the user's choice.
///
/// An explicit record owned by the state machine; selection is never
/// attached to the content object itself.
#[derive(Default)]
pub struct SelectionMemory {
    entries: FxHashMap<ChainId, DetentId>,
}

impl SelectionMemory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn remember(&mut self, chain: ChainId, detent: DetentId) {
        self.entries.insert(chain, detent);
    }

    pub fn recall(&self, chain: ChainId) -> Option<&DetentId> {
        self.entries.get(&chain)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::presentable::topmost_presentable;

    struct Plain;
    impl Presentable for Plain {}

    #[test]
    fn selection_memory_is_keyed_by_chain_identity() {
        let a: Rc<dyn Presentable> = Rc::new(Plain);
        let b: Rc<dyn Presentable> = Rc::new(Plain);
        let mut memory = SelectionMemory::new();

        memory.remember(ChainId::of(&a), DetentId::medium());
        assert_eq!(memory.recall(ChainId::of(&a)), Some(&DetentId::medium()));
        assert_eq!(memory.recall(ChainId::of(&b)), None);

        memory.remember(ChainId::of(&a), DetentId::large());
        assert_eq!(memory.recall(ChainId::of(&a)), Some(&DetentId::large()));
    }

    #[test]
    fn chain_identity_survives_clones_of_the_same_rc() {
        let a: Rc<dyn Presentable> = Rc::new(Plain);
        let clone = Rc::clone(&a);
        assert_eq!(ChainId::of(&a), ChainId::of(&clone));
        assert_eq!(ChainId::of(&a), ChainId::of(&topmost_presentable(&a)));
    }

    #[test]
    fn only_settled_states_observe_scrolling() {
        assert!(PresentationState::Anchored(DetentId::large()).observes_scrolling());
        assert!(PresentationState::Dragging.observes_scrolling());
        assert!(!PresentationState::Presenting.observes_scrolling());
        assert!(!PresentationState::Dismissing.observes_scrolling());
        assert!(!PresentationState::Idle.observes_scrolling());
        assert!(!PresentationState::Dismissed.observes_scrolling());
    }
}
