//! Gesture interpretation and scroll hand-off for Slipsheet.
//!
//! Everything here is a pure decision layer: the drag interpreter and the
//! hand-off coordinator consume observable state and return directives;
//! the presentation controller applies them. Platform input arrives either
//! as recognizer-style [`drag::DragSample`]s or as raw pointer events via
//! [`pointer::PointerSession`].

pub mod constants;
pub mod drag;
pub mod handoff;
pub mod pointer;
pub mod scroll;
pub mod velocity;

pub use constants::{DRAG_THRESHOLD, MAX_FLING_VELOCITY, SNAP_SENSITIVITY};
pub use drag::{
    is_fast_velocity, settle_decision, DragContext, DragDirective, DragInterpreter, DragPhase,
    DragSample, SettleDecision,
};
pub use handoff::{
    resolve_ownership, GestureOwnership, HandoffContext, ScrollDirective, ScrollHandoffCoordinator,
};
pub use pointer::PointerSession;
pub use scroll::{ListenerId, ScrollOffsetChange, ScrollOffsetSubscription, ScrollRegion};
pub use velocity::VelocityEstimator;
