//! Test collaborators shared by the Slipsheet crates' test suites.
//!
//! Three fakes cover the engine's seams: a scroll region with a real
//! listener registry, a recording presentable with configurable answers
//! and a manual animation queue, and a surface that records everything
//! pushed into it.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use slipsheet_animation::MotionSpec;
use slipsheet_core::{Color, Detent, DetentId, DimState, Point};
use slipsheet_foundation::{ListenerId, ScrollOffsetChange, ScrollRegion};
use slipsheet_presentation::Presentable;

// ============================================================================
// TestScrollRegion
// ============================================================================

/// In-memory scroll region with a working offset-listener registry.
///
/// `scroll_to` simulates user/deceleration scrolling; the engine's own
/// `set_content_offset` goes through the same notification path. Listeners
/// fire only when the value actually changes.
#[derive(Clone)]
pub struct TestScrollRegion {
    inner: Rc<RegionInner>,
}

struct RegionInner {
    offset: Cell<f32>,
    top_inset: Cell<f32>,
    bottom_inset: Cell<f32>,
    content_height: Cell<f32>,
    viewport_height: Cell<f32>,
    /// (x, y, width, height) in container coordinates.
    frame: Cell<(f32, f32, f32, f32)>,
    tracking: Cell<bool>,
    dragging: Cell<bool>,
    decelerating: Cell<bool>,
    indicator_visible: Cell<bool>,
    interrupt_count: Cell<u32>,
    listeners: RefCell<HashMap<ListenerId, Rc<dyn Fn(ScrollOffsetChange)>>>,
    next_listener: Cell<ListenerId>,
}

impl TestScrollRegion {
    pub fn new(content_height: f32, viewport_height: f32) -> Self {
        Self {
            inner: Rc::new(RegionInner {
                offset: Cell::new(0.0),
                top_inset: Cell::new(0.0),
                bottom_inset: Cell::new(0.0),
                content_height: Cell::new(content_height),
                viewport_height: Cell::new(viewport_height),
                frame: Cell::new((0.0, 0.0, 400.0, viewport_height)),
                tracking: Cell::new(false),
                dragging: Cell::new(false),
                decelerating: Cell::new(false),
                indicator_visible: Cell::new(true),
                interrupt_count: Cell::new(0),
                listeners: RefCell::new(HashMap::new()),
                next_listener: Cell::new(1),
            }),
        }
    }

    pub fn set_top_inset(&self, inset: f32) {
        self.inner.top_inset.set(inset);
        self.inner.offset.set(-inset);
    }

    pub fn set_frame(&self, x: f32, y: f32, width: f32, height: f32) {
        self.inner.frame.set((x, y, width, height));
    }

    pub fn set_tracking(&self, tracking: bool) {
        self.inner.tracking.set(tracking);
    }

    pub fn set_dragging(&self, dragging: bool) {
        self.inner.dragging.set(dragging);
    }

    pub fn set_decelerating(&self, decelerating: bool) {
        self.inner.decelerating.set(decelerating);
    }

    /// Simulates the platform moving the content (user drag or fling
    /// deceleration); notifies listeners like a real scroll view would.
    pub fn scroll_to(&self, offset: f32) {
        self.apply_offset(offset);
    }

    pub fn offset(&self) -> f32 {
        self.inner.offset.get()
    }

    pub fn indicator_visible(&self) -> bool {
        self.inner.indicator_visible.get()
    }

    pub fn interrupt_count(&self) -> u32 {
        self.inner.interrupt_count.get()
    }

    pub fn listener_count(&self) -> usize {
        self.inner.listeners.borrow().len()
    }

    pub fn as_region(&self) -> Rc<dyn ScrollRegion> {
        Rc::new(self.clone())
    }

    fn apply_offset(&self, offset: f32) {
        let old = self.inner.offset.get();
        if (offset - old).abs() <= f32::EPSILON {
            return;
        }
        self.inner.offset.set(offset);
        // Clone the callbacks out so a listener can (un)register reentrantly.
        let listeners: Vec<Rc<dyn Fn(ScrollOffsetChange)>> =
            self.inner.listeners.borrow().values().cloned().collect();
        let change = ScrollOffsetChange { old, new: offset };
        for listener in listeners {
            listener(change);
        }
    }
}

impl ScrollRegion for TestScrollRegion {
    fn content_offset(&self) -> f32 {
        self.inner.offset.get()
    }

    fn set_content_offset(&self, offset: f32) {
        self.apply_offset(offset);
    }

    fn top_inset(&self) -> f32 {
        self.inner.top_inset.get()
    }

    fn bottom_inset(&self) -> f32 {
        self.inner.bottom_inset.get()
    }

    fn content_height(&self) -> f32 {
        self.inner.content_height.get()
    }

    fn viewport_height(&self) -> f32 {
        self.inner.viewport_height.get()
    }

    fn frame_contains(&self, point: Point) -> bool {
        let (x, y, width, height) = self.inner.frame.get();
        point.x >= x && point.x <= x + width && point.y >= y && point.y <= y + height
    }

    fn is_tracking(&self) -> bool {
        self.inner.tracking.get()
    }

    fn is_dragging(&self) -> bool {
        self.inner.dragging.get()
    }

    fn is_decelerating(&self) -> bool {
        self.inner.decelerating.get()
    }

    fn set_shows_scroll_indicator(&self, visible: bool) {
        self.inner.indicator_visible.set(visible);
    }

    fn interrupt_gesture(&self) {
        self.inner.interrupt_count.set(self.inner.interrupt_count.get() + 1);
        self.inner.tracking.set(false);
        self.inner.dragging.set(false);
    }

    fn add_offset_listener(&self, listener: Box<dyn Fn(ScrollOffsetChange)>) -> ListenerId {
        let id = self.inner.next_listener.get();
        self.inner.next_listener.set(id + 1);
        self.inner.listeners.borrow_mut().insert(id, Rc::from(listener));
        id
    }

    fn remove_offset_listener(&self, id: ListenerId) {
        self.inner.listeners.borrow_mut().remove(&id);
    }
}

// ============================================================================
// RecordingPresentable
// ============================================================================

/// How the fake presentable executes animations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationMode {
    /// Apply changes and complete synchronously (the trait default).
    Immediate,
    /// Apply changes immediately, queue the completion for
    /// [`RecordingPresentable::complete_animation`].
    Manual,
}

/// Everything the engine asked of or told the presentable, in order.
#[derive(Debug, Clone, PartialEq)]
pub enum PresentableEvent {
    WillRespond,
    WillTransition(DetentId),
    WillDismiss,
    DidDismiss,
    Animated { duration_millis: u64 },
}

/// Configurable presentable that records every callback.
#[derive(Clone)]
pub struct RecordingPresentable {
    inner: Rc<PresentableInner>,
}

struct PresentableInner {
    detents: RefCell<Vec<Detent>>,
    scroll_region: RefCell<Option<Rc<dyn ScrollRegion>>>,
    scroll_root: Cell<bool>,
    extended_scrolling: Cell<Option<bool>>,
    allows_drag_to_dismiss: Cell<bool>,
    allows_tap_to_dismiss: Cell<bool>,
    haptics_enabled: Cell<bool>,
    responds_to_gesture: Cell<bool>,
    prioritizes_gesture: Cell<bool>,
    refused_detents: RefCell<Vec<DetentId>>,
    intrinsic_height: Cell<Option<f32>>,
    transition_duration: Cell<u64>,
    animation_mode: Cell<AnimationMode>,
    pending_completions: RefCell<Vec<Box<dyn FnOnce(bool)>>>,
    events: RefCell<Vec<PresentableEvent>>,
}

impl Default for RecordingPresentable {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordingPresentable {
    pub fn new() -> Self {
        Self {
            inner: Rc::new(PresentableInner {
                detents: RefCell::new(vec![Detent::new(
                    DetentId::content(),
                    slipsheet_core::HeightSpec::Content,
                )]),
                scroll_region: RefCell::new(None),
                scroll_root: Cell::new(false),
                extended_scrolling: Cell::new(None),
                allows_drag_to_dismiss: Cell::new(true),
                allows_tap_to_dismiss: Cell::new(true),
                haptics_enabled: Cell::new(true),
                responds_to_gesture: Cell::new(true),
                prioritizes_gesture: Cell::new(false),
                refused_detents: RefCell::new(Vec::new()),
                intrinsic_height: Cell::new(None),
                transition_duration: Cell::new(500),
                animation_mode: Cell::new(AnimationMode::Immediate),
                pending_completions: RefCell::new(Vec::new()),
                events: RefCell::new(Vec::new()),
            }),
        }
    }

    pub fn with_detents(detents: Vec<Detent>) -> Self {
        let presentable = Self::new();
        presentable.set_detents(detents);
        presentable
    }

    pub fn set_detents(&self, detents: Vec<Detent>) {
        *self.inner.detents.borrow_mut() = detents;
    }

    pub fn set_scroll_region(&self, region: Option<Rc<dyn ScrollRegion>>) {
        *self.inner.scroll_region.borrow_mut() = region;
    }

    pub fn set_scroll_root(&self, root: bool) {
        self.inner.scroll_root.set(root);
    }

    /// Overrides the derived extended-scrolling answer.
    pub fn set_extended_scrolling(&self, allowed: bool) {
        self.inner.extended_scrolling.set(Some(allowed));
    }

    pub fn set_allows_drag_to_dismiss(&self, allowed: bool) {
        self.inner.allows_drag_to_dismiss.set(allowed);
    }

    pub fn set_allows_tap_to_dismiss(&self, allowed: bool) {
        self.inner.allows_tap_to_dismiss.set(allowed);
    }

    pub fn set_responds_to_gesture(&self, responds: bool) {
        self.inner.responds_to_gesture.set(responds);
    }

    pub fn set_prioritizes_gesture(&self, prioritizes: bool) {
        self.inner.prioritizes_gesture.set(prioritizes);
    }

    /// Makes `should_transition` refuse the given detent.
    pub fn refuse_transition_to(&self, detent: DetentId) {
        self.inner.refused_detents.borrow_mut().push(detent);
    }

    pub fn set_intrinsic_height(&self, height: Option<f32>) {
        self.inner.intrinsic_height.set(height);
    }

    pub fn set_animation_mode(&self, mode: AnimationMode) {
        self.inner.animation_mode.set(mode);
    }

    /// Completes the oldest pending animation. Panics when none is queued,
    /// which in a test means the engine never started one.
    pub fn complete_animation(&self, success: bool) {
        let completion = self.inner.pending_completions.borrow_mut().remove(0);
        completion(success);
    }

    pub fn pending_animation_count(&self) -> usize {
        self.inner.pending_completions.borrow().len()
    }

    pub fn events(&self) -> Vec<PresentableEvent> {
        self.inner.events.borrow().clone()
    }

    pub fn clear_events(&self) {
        self.inner.events.borrow_mut().clear();
    }

    pub fn will_transition_calls(&self) -> Vec<DetentId> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                PresentableEvent::WillTransition(id) => Some(id),
                _ => None,
            })
            .collect()
    }

    fn record(&self, event: PresentableEvent) {
        self.inner.events.borrow_mut().push(event);
    }
}

impl Presentable for RecordingPresentable {
    fn detents(&self) -> Vec<Detent> {
        self.inner.detents.borrow().clone()
    }

    fn transition_duration_millis(&self) -> u64 {
        self.inner.transition_duration.get()
    }

    fn scroll_region(&self) -> Option<Rc<dyn ScrollRegion>> {
        self.inner.scroll_region.borrow().clone()
    }

    fn scroll_region_is_root(&self) -> bool {
        self.inner.scroll_root.get()
    }

    fn preferred_content_height(&self, _width: f32) -> Option<f32> {
        self.inner.intrinsic_height.get()
    }

    fn allows_extended_scrolling(&self) -> bool {
        match self.inner.extended_scrolling.get() {
            Some(answer) => answer,
            None => match self.scroll_region() {
                Some(region) => {
                    region.content_height() > region.viewport_height() - region.bottom_inset()
                }
                None => false,
            },
        }
    }

    fn allows_drag_to_dismiss(&self) -> bool {
        self.inner.allows_drag_to_dismiss.get()
    }

    fn allows_tap_to_dismiss(&self) -> bool {
        self.inner.allows_tap_to_dismiss.get()
    }

    fn is_haptic_feedback_enabled(&self) -> bool {
        self.inner.haptics_enabled.get()
    }

    fn should_respond_to_gesture(&self) -> bool {
        self.inner.responds_to_gesture.get()
    }

    fn will_respond_to_gesture(&self) {
        self.record(PresentableEvent::WillRespond);
    }

    fn should_prioritize_gesture(&self) -> bool {
        self.inner.prioritizes_gesture.get()
    }

    fn should_transition(&self, detent: &DetentId) -> bool {
        !self.inner.refused_detents.borrow().contains(detent)
    }

    fn will_transition(&self, detent: &DetentId) {
        self.record(PresentableEvent::WillTransition(detent.clone()));
    }

    fn will_dismiss(&self) {
        self.record(PresentableEvent::WillDismiss);
    }

    fn did_dismiss(&self) {
        self.record(PresentableEvent::DidDismiss);
    }

    fn animate(&self, motion: MotionSpec, changes: Box<dyn FnOnce()>, completion: Box<dyn FnOnce(bool)>) {
        self.record(PresentableEvent::Animated {
            duration_millis: motion.duration_millis,
        });
        changes();
        match self.inner.animation_mode.get() {
            AnimationMode::Immediate => completion(true),
            AnimationMode::Manual => self.inner.pending_completions.borrow_mut().push(completion),
        }
    }
}

// ============================================================================
// TestSurface
// ============================================================================

/// Records every value the controller pushes to the chrome.
#[derive(Clone, Default)]
pub struct TestSurface {
    inner: Rc<SurfaceInner>,
}

#[derive(Default)]
struct SurfaceInner {
    y_history: RefCell<Vec<f32>>,
    dim_history: RefCell<Vec<DimState>>,
    bounds_history: RefCell<Vec<f32>>,
    corner_radius: Cell<f32>,
    grabber_visible: Cell<bool>,
    user_interaction_enabled: Cell<bool>,
    dim_color: Cell<Option<Color>>,
    feedback_count: Cell<u32>,
}

impl TestSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_y(&self) -> Option<f32> {
        self.inner.y_history.borrow().last().copied()
    }

    pub fn y_history(&self) -> Vec<f32> {
        self.inner.y_history.borrow().clone()
    }

    pub fn last_dim(&self) -> Option<DimState> {
        self.inner.dim_history.borrow().last().copied()
    }

    pub fn last_bounds_height(&self) -> Option<f32> {
        self.inner.bounds_history.borrow().last().copied()
    }

    pub fn corner_radius(&self) -> f32 {
        self.inner.corner_radius.get()
    }

    pub fn grabber_visible(&self) -> bool {
        self.inner.grabber_visible.get()
    }

    pub fn user_interaction_enabled(&self) -> bool {
        self.inner.user_interaction_enabled.get()
    }

    pub fn dim_color(&self) -> Option<Color> {
        self.inner.dim_color.get()
    }

    pub fn feedback_count(&self) -> u32 {
        self.inner.feedback_count.get()
    }

    pub fn as_surface(&self) -> Rc<dyn slipsheet_presentation::PresentationSurface> {
        Rc::new(self.clone())
    }
}

impl slipsheet_presentation::PresentationSurface for TestSurface {
    fn set_sheet_y(&self, y: f32) {
        self.inner.y_history.borrow_mut().push(y);
    }

    fn set_dim(&self, dim: DimState) {
        self.inner.dim_history.borrow_mut().push(dim);
    }

    fn set_bounds_height(&self, height: f32) {
        self.inner.bounds_history.borrow_mut().push(height);
    }

    fn set_dim_color(&self, color: Color) {
        self.inner.dim_color.set(Some(color));
    }

    fn set_corner_radius(&self, radius: f32) {
        self.inner.corner_radius.set(radius);
    }

    fn set_grabber_visible(&self, visible: bool) {
        self.inner.grabber_visible.set(visible);
    }

    fn set_user_interaction_enabled(&self, enabled: bool) {
        self.inner.user_interaction_enabled.set(enabled);
    }

    fn play_selection_feedback(&self) {
        self.inner.feedback_count.set(self.inner.feedback_count.get() + 1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn region_listeners_fire_only_on_real_changes() {
        let region = TestScrollRegion::new(1200.0, 600.0);
        let fired = Rc::new(Cell::new(0u32));
        let fired_clone = Rc::clone(&fired);
        let id = region.add_offset_listener(Box::new(move |_| {
            fired_clone.set(fired_clone.get() + 1);
        }));

        region.scroll_to(10.0);
        region.scroll_to(10.0);
        region.scroll_to(25.0);
        assert_eq!(fired.get(), 2);

        region.remove_offset_listener(id);
        region.scroll_to(50.0);
        assert_eq!(fired.get(), 2);
    }

    #[test]
    fn manual_animation_queues_its_completion() {
        let presentable = RecordingPresentable::new();
        presentable.set_animation_mode(AnimationMode::Manual);

        let applied = Rc::new(Cell::new(false));
        let applied_clone = Rc::clone(&applied);
        let completed = Rc::new(Cell::new(None));
        let completed_clone = Rc::clone(&completed);

        presentable.animate(
            MotionSpec::default(),
            Box::new(move || applied_clone.set(true)),
            Box::new(move |success| completed_clone.set(Some(success))),
        );

        assert!(applied.get(), "changes must run immediately");
        assert_eq!(completed.get(), None);
        assert_eq!(presentable.pending_animation_count(), 1);

        presentable.complete_animation(true);
        assert_eq!(completed.get(), Some(true));
        assert_eq!(presentable.pending_animation_count(), 0);
    }
}
