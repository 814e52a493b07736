//! Drag-gesture interpretation.
//!
//! The interpreter consumes one serialized drag stream at a time and, with
//! the current resolved layout, decides what each sample means: move the
//! sheet, hand back a settle decision on release, or ignore a declined
//! stream. It owns no position; the caller supplies the current y and
//! applies whatever directive comes back.

use slipsheet_core::{DetentId, DimState, ResolvedLayout};

use crate::constants::SNAP_SENSITIVITY;

/// Phase of a drag sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragPhase {
    Began,
    Changed,
    Ended,
    Cancelled,
}

impl DragPhase {
    pub fn is_terminal(&self) -> bool {
        matches!(self, DragPhase::Ended | DragPhase::Cancelled)
    }
}

/// One live gesture sample. Transient; never persisted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragSample {
    pub phase: DragPhase,
    /// Vertical translation since the previous sample, logical pixels.
    pub translation_delta: f32,
    /// Vertical velocity in points/second; meaningful on terminal phases.
    pub velocity: f32,
}

impl DragSample {
    pub fn began(translation_delta: f32) -> Self {
        Self {
            phase: DragPhase::Began,
            translation_delta,
            velocity: 0.0,
        }
    }

    pub fn changed(translation_delta: f32) -> Self {
        Self {
            phase: DragPhase::Changed,
            translation_delta,
            velocity: 0.0,
        }
    }

    pub fn ended(velocity: f32) -> Self {
        Self {
            phase: DragPhase::Ended,
            translation_delta: 0.0,
            velocity,
        }
    }
}

/// Rate reduction applied when the sheet is dragged past its largest
/// detent, so overdrag feels like resistance rather than a hard stop.
const OVERDRAG_DAMPENING: f32 = 0.5;

/// Classifies a release velocity against the snap sensitivity.
///
/// The boundary is exclusive: at sensitivity 0.7 a velocity of exactly 300
/// points/second is not fast, 301 is.
pub fn is_fast_velocity(velocity: f32, snap_sensitivity: f32) -> bool {
    velocity.abs() - (1000.0 * (1.0 - snap_sensitivity)) > 0.0
}

/// Outcome of a terminal drag phase.
#[derive(Debug, Clone, PartialEq)]
pub enum SettleDecision {
    /// Snap to the given detent (possibly the one already selected).
    SnapTo(DetentId),
    /// Slide off the bottom and dismiss the presentation.
    Dismiss,
}

/// What the caller should do with one interpreted sample.
#[derive(Debug, Clone, PartialEq)]
pub enum DragDirective {
    /// Declined or out-of-sequence sample; do nothing.
    Ignore,
    /// Free-drag movement.
    Move {
        /// New sheet top edge, already clamped to the anchored position.
        y: f32,
        /// Dimming intensity at that position.
        dim: DimState,
        /// The sheet reached the topmost detent with extended scrolling
        /// enabled; pre-notify an impending transition to the largest
        /// detent (not yet committed).
        at_anchor: bool,
    },
    /// Terminal phase: settle per the decision.
    Settle(SettleDecision),
}

/// Inputs the interpreter needs alongside each sample.
pub struct DragContext<'a> {
    pub layout: &'a ResolvedLayout,
    /// The sheet's current top edge.
    pub current_y: f32,
    /// Container height; doubles as the virtual dismissal target.
    pub container_height: f32,
    /// Whether drag may hand off into the embedded scroll region.
    pub extends_scrolling: bool,
    /// Whether a dismissal outcome is honored; when false it degrades to a
    /// snap to the smallest detent.
    pub allows_drag_to_dismiss: bool,
}

/// Decides the settle outcome for a release at `current_y` with the given
/// velocity. Pure; see [`DragInterpreter`] for the stateful stream wrapper.
pub fn settle_decision(
    velocity: f32,
    layout: &ResolvedLayout,
    current_y: f32,
    container_height: f32,
    allows_drag_to_dismiss: bool,
) -> SettleDecision {
    let dismiss = || {
        if allows_drag_to_dismiss {
            SettleDecision::Dismiss
        } else {
            SettleDecision::SnapTo(layout.smallest().id.clone())
        }
    };

    if is_fast_velocity(velocity, SNAP_SENSITIVITY) {
        if velocity < 0.0 {
            // Fast upward: straight to the largest detent, skipping any
            // intermediates. Already there means a re-snap settle.
            return SettleDecision::SnapTo(layout.topmost().id.clone());
        }
        // Fast downward: one step below the nearest detent, or out.
        return match layout.nearest_detent(current_y, Some(container_height)) {
            Some(nearest) => match layout.next_smaller(nearest) {
                Some(next) => SettleDecision::SnapTo(next.id.clone()),
                None => dismiss(),
            },
            None => dismiss(),
        };
    }

    // Slow release: nearest of all detents and the dismissal target.
    match layout.nearest_detent(current_y, Some(container_height)) {
        Some(nearest) => SettleDecision::SnapTo(nearest.clone()),
        None => dismiss(),
    }
}

/// Stateful wrapper serializing drag streams.
///
/// A stream runs `Began → Changed* → Ended|Cancelled`; a new `Began` is
/// only expected after the previous terminal phase, and out-of-order
/// samples degrade to warnings rather than panics. The caller can decline
/// the active stream (collaborator refused the gesture at `Began`), after
/// which every sample through the terminal phase is ignored.
#[derive(Default)]
pub struct DragInterpreter {
    active: bool,
    declined: bool,
}

impl DragInterpreter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Marks the in-flight stream declined; samples are ignored until the
    /// stream terminates. Replaces recognizer-reset tricks with explicit
    /// state.
    pub fn decline_stream(&mut self) {
        self.declined = true;
    }

    pub fn interpret(&mut self, sample: &DragSample, ctx: &DragContext<'_>) -> DragDirective {
        match sample.phase {
            DragPhase::Began => {
                if self.active {
                    log::warn!("drag began before the previous stream terminated");
                }
                self.active = true;
                self.declined = false;
                self.movement(sample, ctx)
            }
            DragPhase::Changed => {
                if !self.active {
                    log::warn!("drag changed without a began; adopting the stream");
                    self.active = true;
                }
                self.movement(sample, ctx)
            }
            DragPhase::Ended | DragPhase::Cancelled => {
                if !self.active {
                    log::warn!("terminal drag sample without an active stream");
                    return DragDirective::Ignore;
                }
                self.active = false;
                if self.declined {
                    self.declined = false;
                    return DragDirective::Ignore;
                }
                DragDirective::Settle(settle_decision(
                    sample.velocity,
                    ctx.layout,
                    ctx.current_y,
                    ctx.container_height,
                    ctx.allows_drag_to_dismiss,
                ))
            }
        }
    }

    fn movement(&self, sample: &DragSample, ctx: &DragContext<'_>) -> DragDirective {
        if self.declined {
            return DragDirective::Ignore;
        }

        let mut delta = sample.translation_delta;
        if ctx.current_y < ctx.layout.topmost_y() {
            delta *= OVERDRAG_DAMPENING;
        }
        let y = (ctx.current_y + delta).max(ctx.layout.anchored_y());
        let dim = ctx.layout.dim_for_position(y, ctx.container_height);
        let at_anchor = ctx.extends_scrolling && y <= ctx.layout.topmost_y();

        DragDirective::Move { y, dim, at_anchor }
    }
}

#[cfg(test)]
#[path = "tests/drag_tests.rs"]
mod tests;
