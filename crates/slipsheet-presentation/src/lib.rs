//! Presentation layer of Slipsheet: the `Presentable` capability seam, the
//! host-side surface sink, per-session state, and the controller state
//! machine that ties layout resolution, gesture interpretation and scroll
//! hand-off together.
//!
//! Lifecycle: `Idle → Presenting → Anchored ⇄ Dragging → Settling →
//! Anchored`, or `→ Dismissing → Dismissed`. All transitions that move the
//! sheet run through the content's animation hook and complete on its
//! completion callback.

pub mod controller;
pub mod presentable;
pub mod session;
pub mod surface;

pub use controller::PresentationController;
pub use presentable::{motion_spec_for, topmost_presentable, Presentable};
pub use session::{ChainId, PresentationState, SelectionMemory, SessionState};
pub use surface::PresentationSurface;
