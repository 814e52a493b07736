//! The embedded scroll region seam and its offset subscription.
//!
//! The engine never talks to a platform scroll view directly; the host
//! wraps one in a [`ScrollRegion`] adapter. Offset observation is an
//! explicit subscription object with paired `start`/`stop`, so scoped
//! pauses (batched content updates) and session teardown cannot leak a
//! listener.

use std::cell::Cell;
use std::rc::Rc;

use slipsheet_core::Point;

/// One content-offset change, with the previous value (the bounce
/// hand-off needs the direction of travel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollOffsetChange {
    pub old: f32,
    pub new: f32,
}

/// Handle for a registered offset listener.
pub type ListenerId = u64;

/// Adapter over the host's embedded scrollable area.
///
/// Offsets follow the platform convention used throughout the engine:
/// resting at the top is `-top_inset()`, scrolling down increases the
/// offset, and bouncing above the top goes below `-top_inset()`.
pub trait ScrollRegion {
    fn content_offset(&self) -> f32;

    /// Writes the content offset without animation. Implementations must
    /// only notify listeners when the value actually changes, or halting
    /// would re-enter forever.
    fn set_content_offset(&self, offset: f32);

    fn top_inset(&self) -> f32;

    fn bottom_inset(&self) -> f32 {
        0.0
    }

    /// Total content height.
    fn content_height(&self) -> f32;

    /// Visible viewport height.
    fn viewport_height(&self) -> f32;

    /// Whether the point (container coordinates) lies inside the region.
    fn frame_contains(&self, point: Point) -> bool;

    /// A touch is currently down on the region.
    fn is_tracking(&self) -> bool;

    /// The region is being dragged.
    fn is_dragging(&self) -> bool;

    /// The region is coasting after a fling.
    fn is_decelerating(&self) -> bool;

    fn set_shows_scroll_indicator(&self, visible: bool);

    /// Forces the region to relinquish an in-flight drag so the sheet
    /// gesture can take over. Default no-op.
    fn interrupt_gesture(&self) {}

    fn add_offset_listener(&self, listener: Box<dyn Fn(ScrollOffsetChange)>) -> ListenerId;

    fn remove_offset_listener(&self, id: ListenerId);

    /// User-driven scrolling is in progress (dragging that hasn't handed
    /// off to deceleration, or a touch that is still down).
    fn is_actively_scrolling(&self) -> bool {
        self.is_dragging() && !self.is_decelerating() || self.is_tracking()
    }

    /// The content is scrolled past its resting top position.
    fn offset_past_top_inset(&self) -> bool {
        self.content_offset() > -self.top_inset()
    }
}

/// Explicit offset subscription: `start()`/`stop()` pair the listener
/// registration, `last_value()` is the most recent observed offset.
///
/// Dropping an active subscription stops it.
pub struct ScrollOffsetSubscription {
    region: Rc<dyn ScrollRegion>,
    handler: Rc<dyn Fn(ScrollOffsetChange)>,
    listener_id: Cell<Option<ListenerId>>,
    last_value: Rc<Cell<f32>>,
}

impl ScrollOffsetSubscription {
    pub fn new(region: Rc<dyn ScrollRegion>, handler: Rc<dyn Fn(ScrollOffsetChange)>) -> Self {
        let last_value = Rc::new(Cell::new(region.content_offset()));
        Self {
            region,
            handler,
            listener_id: Cell::new(None),
            last_value,
        }
    }

    /// Registers the listener. Idempotent; an already-active subscription
    /// stays as it is.
    pub fn start(&self) {
        if self.listener_id.get().is_some() {
            return;
        }
        self.last_value.set(self.region.content_offset());
        let last_value = Rc::clone(&self.last_value);
        let handler = Rc::clone(&self.handler);
        let id = self.region.add_offset_listener(Box::new(move |change| {
            last_value.set(change.new);
            handler(change);
        }));
        self.listener_id.set(Some(id));
    }

    /// Unregisters the listener. Idempotent.
    pub fn stop(&self) {
        if let Some(id) = self.listener_id.take() {
            self.region.remove_offset_listener(id);
        }
    }

    pub fn is_active(&self) -> bool {
        self.listener_id.get().is_some()
    }

    /// Most recent observed offset (the starting offset until the first
    /// change arrives).
    pub fn last_value(&self) -> f32 {
        self.last_value.get()
    }

    pub fn region(&self) -> &Rc<dyn ScrollRegion> {
        &self.region
    }
}

impl Drop for ScrollOffsetSubscription {
    fn drop(&mut self) {
        self.stop();
    }
}
