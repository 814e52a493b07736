//! Scroll hand-off: who owns the touch, and what a scroll-offset change
//! means for the sheet.
//!
//! Both decisions are pure functions of observable state so they can be
//! tested without a platform gesture system; the controller applies the
//! returned directives.

use crate::scroll::ScrollOffsetChange;

/// Which recognizer owns the current touch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureOwnership {
    /// The sheet drag proceeds; the inner scroll yields.
    SheetOwns,
    /// The sheet drag stands down in favor of the inner scroll.
    ScrollOwns,
}

/// Arbitrates sheet-drag vs. inner-scroll ownership for one gesture start.
///
/// The scroll region wins exactly when the sheet is anchored at its
/// topmost detent, the region's content is past its top inset, and the
/// touch either lies within the region or the region is actively
/// scrolling. A content that explicitly prioritized the sheet gesture
/// always wins; the caller then interrupts the region's own recognizer.
pub fn resolve_ownership(
    anchored: bool,
    offset_past_top_inset: bool,
    touch_in_region: bool,
    actively_scrolling: bool,
    sheet_prioritized: bool,
) -> GestureOwnership {
    if sheet_prioritized {
        return GestureOwnership::SheetOwns;
    }
    if anchored && offset_past_top_inset && (touch_in_region || actively_scrolling) {
        GestureOwnership::ScrollOwns
    } else {
        GestureOwnership::SheetOwns
    }
}

/// Sheet-side facts the coordinator needs per offset change.
#[derive(Debug, Clone, Copy)]
pub struct HandoffContext {
    /// Sheet resting at the topmost detent (pixel-rounded), not animating,
    /// extended scrolling permitted.
    pub anchored: bool,
    /// Sheet currently mid-animation.
    pub animating: bool,
    /// Region reports user-driven scrolling in progress.
    pub actively_scrolling: bool,
    /// Region is coasting after a fling.
    pub decelerating: bool,
    /// The presented content's root is itself the scroll region.
    pub scroll_root: bool,
    /// Region's top content inset.
    pub top_inset: f32,
    /// Container height (restored as the sheet bounds after a bounce).
    pub container_height: f32,
    /// Resolved y of the largest detent.
    pub largest_y: f32,
    /// Last tracked offset, the freeze target for halting.
    pub tracked_offset: f32,
}

/// What to do with one scroll-offset change.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScrollDirective {
    /// Freeze the region back to `offset` and hide its indicator; the
    /// sheet itself should be moving, not the content.
    Halt { offset: f32 },
    /// Record `offset` as the new tracked value and show the indicator.
    Track { offset: f32 },
    /// Top-bounce deepening: shrink the sheet bounds and raise its top
    /// edge so the scroll momentum visibly carries into the sheet.
    BounceShrink { bounds_height: f32, sheet_y: f32 },
    /// Top-bounce recovery: snap to the largest detent, restore bounds,
    /// and resume tracking at `offset`.
    BounceSettle { offset: f32 },
}

/// Per-offset-change decision state. The only memory it keeps is the
/// bounce latch that makes the recovery finalize exactly once.
#[derive(Default)]
pub struct ScrollHandoffCoordinator {
    in_bounce: bool,
}

impl ScrollHandoffCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clears the bounce latch (layout reload, session teardown).
    pub fn reset(&mut self) {
        self.in_bounce = false;
    }

    pub fn on_offset_changed(
        &mut self,
        change: ScrollOffsetChange,
        ctx: &HandoffContext,
    ) -> ScrollDirective {
        let rest_offset = -ctx.top_inset;
        let tracked = change.new.max(rest_offset);

        if !ctx.anchored && change.new > rest_offset {
            // The user scrolled while the sheet should be moving instead.
            return ScrollDirective::Halt {
                offset: ctx.tracked_offset,
            };
        }

        if ctx.actively_scrolling || ctx.animating {
            return if ctx.anchored {
                ScrollDirective::Track { offset: tracked }
            } else {
                ScrollDirective::Halt {
                    offset: ctx.tracked_offset,
                }
            };
        }

        if ctx.scroll_root && !ctx.animating && change.new <= rest_offset {
            return self.bounce(change, ctx, rest_offset, tracked);
        }

        ScrollDirective::Track { offset: tracked }
    }

    /// The content has bounced above its top inset after a fling: follow
    /// the deceleration curve into sheet movement, then settle.
    fn bounce(
        &mut self,
        change: ScrollOffsetChange,
        ctx: &HandoffContext,
        rest_offset: f32,
        tracked: f32,
    ) -> ScrollDirective {
        if !ctx.decelerating {
            return ScrollDirective::Track { offset: tracked };
        }

        let overscroll = rest_offset - change.new;
        if change.old > change.new {
            // Overscroll still increasing: transfer the momentum.
            self.in_bounce = true;
            return ScrollDirective::BounceShrink {
                bounds_height: ctx.container_height - overscroll,
                sheet_y: ctx.largest_y - overscroll,
            };
        }

        if self.in_bounce {
            self.in_bounce = false;
            return ScrollDirective::BounceSettle {
                offset: rest_offset,
            };
        }

        ScrollDirective::Track { offset: tracked }
    }
}

#[cfg(test)]
#[path = "tests/handoff_tests.rs"]
mod tests;
