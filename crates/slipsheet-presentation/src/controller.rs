//! The presentation state machine.
//!
//! `PresentationController` owns the session: it resolves layouts, routes
//! drag samples through the interpreter, applies scroll directives from the
//! hand-off coordinator, and drives externally-executed animations through
//! the presentable's hook. All processing happens on the UI turn, one event
//! at a time; shared access uses the usual `Rc<RefCell>` interior, with
//! weak references from animation and scroll callbacks back into the
//! controller.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use slipsheet_core::{
    pixel_rounded, ContainerMetrics, ContentMeasurements, DetentId, DimState, Point,
    ResolvedLayout, TopOffsetPolicy,
};
use slipsheet_foundation::{
    resolve_ownership, DragContext, DragDirective, DragInterpreter, DragPhase, DragSample,
    GestureOwnership, HandoffContext, ScrollDirective, ScrollHandoffCoordinator,
    ScrollOffsetChange, ScrollOffsetSubscription, ScrollRegion, SettleDecision,
};

use crate::presentable::{motion_spec_for, topmost_presentable, Presentable};
use crate::session::{ChainId, PresentationState, SelectionMemory, SessionState};
use crate::surface::PresentationSurface;

/// Orchestrates one sheet presentation from `present` to `Dismissed`.
pub struct PresentationController {
    inner: Rc<RefCell<Inner>>,
}

struct Inner {
    self_weak: Weak<RefCell<Inner>>,
    presentable: Rc<dyn Presentable>,
    /// Topmost child of `presentable`; the content actually consulted.
    effective: Rc<dyn Presentable>,
    surface: Rc<dyn PresentationSurface>,
    policy: TopOffsetPolicy,
    state: PresentationState,
    session: SessionState,
    memory: SelectionMemory,
    metrics: Option<ContainerMetrics>,
    layout: Option<ResolvedLayout>,
    scroll_region: Option<Rc<dyn ScrollRegion>>,
    subscription: Option<Rc<ScrollOffsetSubscription>>,
    extends_scrolling: bool,
    interpreter: DragInterpreter,
    coordinator: ScrollHandoffCoordinator,
    /// Monotonic token pairing each animation with its completion; a
    /// superseded animation's completion arrives stale and is ignored.
    animation_generation: u64,
}

/// What an in-flight animation is for, deciding the completion handling.
#[derive(Clone)]
enum AnimationKind {
    Present(DetentId),
    Settle(DetentId),
    Dismiss,
}

impl PresentationController {
    pub fn new(presentable: Rc<dyn Presentable>, surface: Rc<dyn PresentationSurface>) -> Self {
        let effective = topmost_presentable(&presentable);
        let inner = Rc::new_cyclic(|weak| {
            RefCell::new(Inner {
                self_weak: weak.clone(),
                presentable,
                effective,
                surface,
                policy: TopOffsetPolicy::default(),
                state: PresentationState::Idle,
                session: SessionState::default(),
                memory: SelectionMemory::new(),
                metrics: None,
                layout: None,
                scroll_region: None,
                subscription: None,
                extends_scrolling: false,
                interpreter: DragInterpreter::new(),
                coordinator: ScrollHandoffCoordinator::new(),
                animation_generation: 0,
            })
        });
        Self { inner }
    }

    /// Begins the presentation: resolves the layout for `metrics` and
    /// animates the sheet in from the container bottom to the selected
    /// detent.
    pub fn present(&self, metrics: ContainerMetrics) {
        {
            let mut inner = self.inner.borrow_mut();
            if inner.state != PresentationState::Idle {
                log::warn!("present called in state {:?}; ignoring", inner.state);
                return;
            }
            inner.metrics = Some(metrics);
        }
        reload_layout(&self.inner);

        let staged = {
            let mut inner = self.inner.borrow_mut();
            let Some(layout) = &inner.layout else {
                log::warn!("present without a resolvable layout");
                return;
            };
            let selected = layout.selected().clone();
            let target_y = layout.y_for(&selected).unwrap_or_else(|| layout.anchored_y());
            let haptic = inner.effective.is_haptic_feedback_enabled();

            // Start offscreen at the container bottom.
            inner.session.current_y = metrics.height;
            inner.surface.set_sheet_y(metrics.height);
            inner.surface.set_dim(DimState::Off);
            if haptic {
                inner.surface.play_selection_feedback();
            }
            (selected, target_y)
        };

        let (selected, target_y) = staged;
        start_animation(&self.inner, AnimationKind::Present(selected), target_y);
    }

    /// Feeds one drag sample into the session.
    ///
    /// Ownership arbitration against the inner scroll happens separately
    /// (see [`Self::gesture_ownership`]); by the time samples arrive here,
    /// the sheet owns the touch.
    pub fn handle_drag(&self, sample: DragSample) {
        handle_drag(&self.inner, sample);
    }

    /// Arbitrates sheet-drag vs. inner-scroll for a touch at `location`
    /// (container coordinates) at gesture start. When the content
    /// prioritizes the sheet, the scroll region's own recognizer is
    /// interrupted as a side effect.
    pub fn gesture_ownership(&self, location: Point) -> GestureOwnership {
        gesture_ownership(&self.inner, location)
    }

    /// Requests a transition to the given detent. Consults
    /// `should_transition` first; a refusal leaves the sheet unmoved and
    /// skips `will_transition`.
    pub fn transition_to(&self, detent: &DetentId) {
        transition_to_detent(&self.inner, detent);
    }

    /// Re-resolves the layout from current geometry and content answers,
    /// without changing the lifecycle state. Re-establishes scroll
    /// observation.
    pub fn request_layout_refresh(&self) {
        reload_layout(&self.inner);
    }

    /// Rotation/resize path: swaps the container geometry and re-resolves.
    pub fn update_container_metrics(&self, metrics: ContainerMetrics) {
        self.inner.borrow_mut().metrics = Some(metrics);
        reload_layout(&self.inner);
    }

    /// Runs `body` with scroll observation suspended, then restores it and
    /// re-syncs the tracked offset, even if `body` panics.
    pub fn perform_scoped_update(&self, body: impl FnOnce()) {
        let subscription = self.inner.borrow().subscription.clone();
        match subscription {
            None => body(),
            Some(subscription) => {
                subscription.stop();
                let _resume = ObservationResume {
                    subscription: Rc::clone(&subscription),
                    inner: self.inner.borrow().self_weak.clone(),
                };
                body();
            }
        }
    }

    /// A tap landed on the dimming overlay.
    pub fn handle_dim_tap(&self) {
        let allowed = {
            let inner = self.inner.borrow();
            inner.effective.allows_tap_to_dismiss()
        };
        if allowed {
            begin_dismiss(&self.inner);
        }
    }

    /// Dismisses the sheet: `will_dismiss`, slide out, `did_dismiss`.
    pub fn dismiss(&self) {
        begin_dismiss(&self.inner);
    }

    pub fn state(&self) -> PresentationState {
        self.inner.borrow().state.clone()
    }

    pub fn session(&self) -> SessionState {
        self.inner.borrow().session.clone()
    }

    pub fn current_y(&self) -> f32 {
        self.inner.borrow().session.current_y
    }

    pub fn selected_detent(&self) -> Option<DetentId> {
        self.inner.borrow().session.selected.clone()
    }

    pub fn is_animating(&self) -> bool {
        self.inner.borrow().session.is_animating
    }

    pub fn layout(&self) -> Option<ResolvedLayout> {
        self.inner.borrow().layout.clone()
    }

    /// Scroll observation is currently registered.
    pub fn is_observing_scroll(&self) -> bool {
        self.inner
            .borrow()
            .subscription
            .as_ref()
            .is_some_and(|s| s.is_active())
    }
}

impl Inner {
    /// The sheet rests at its topmost detent: not mid-animation, extended
    /// scrolling permitted, and the top edge within one device pixel of
    /// the topmost detent's position.
    fn is_anchored(&self) -> bool {
        let Some(layout) = &self.layout else {
            return false;
        };
        let scale = self.metrics.map(|m| m.display_scale).unwrap_or(1.0);
        !self.session.is_animating
            && self.extends_scrolling
            && pixel_rounded(self.session.current_y, scale) <= pixel_rounded(layout.topmost_y(), scale)
    }

    /// Applies a position: clamp, push to the surface, recompute dim.
    fn apply_position(&mut self, y: f32, dim_override: Option<DimState>) {
        let Some(layout) = &self.layout else {
            return;
        };
        let clamped = y.max(layout.anchored_y());
        let dim = dim_override.unwrap_or_else(|| match self.metrics {
            Some(metrics) => layout.dim_for_position(clamped, metrics.height),
            None => DimState::Off,
        });
        self.session.current_y = clamped;
        self.surface.set_sheet_y(clamped);
        self.surface.set_dim(dim);
    }

    fn interpret_sample(&mut self, sample: &DragSample) -> DragDirective {
        let Some(layout) = &self.layout else {
            return DragDirective::Ignore;
        };
        let Some(metrics) = &self.metrics else {
            return DragDirective::Ignore;
        };
        let ctx = DragContext {
            layout,
            current_y: self.session.current_y,
            container_height: metrics.height,
            extends_scrolling: self.extends_scrolling,
            allows_drag_to_dismiss: self.effective.allows_drag_to_dismiss(),
        };
        self.interpreter.interpret(sample, &ctx)
    }
}

/// Restarts scroll observation when dropped, unwinding included.
struct ObservationResume {
    subscription: Rc<ScrollOffsetSubscription>,
    inner: Weak<RefCell<Inner>>,
}

impl Drop for ObservationResume {
    fn drop(&mut self) {
        self.subscription.start();
        if let Some(rc) = self.inner.upgrade() {
            if let Ok(mut inner) = rc.try_borrow_mut() {
                inner.session.tracked_scroll_offset = self.subscription.last_value();
            }
        }
    }
}

/// Recomputes the layout wholesale from current metrics and content
/// answers, refreshes surface configuration, and re-establishes scroll
/// observation. The single choke point for geometry and config changes.
fn reload_layout(rc: &Rc<RefCell<Inner>>) {
    let (old_subscription, new_subscription) = {
        let mut inner = rc.borrow_mut();
        let Some(metrics) = inner.metrics else {
            log::warn!("layout refresh requested before geometry is known");
            return;
        };

        let effective = topmost_presentable(&inner.presentable);
        inner.effective = Rc::clone(&effective);

        let detents = effective.detents();
        let region = effective.scroll_region();
        let measurements = ContentMeasurements {
            scroll_content_height: region.as_ref().map(|r| r.content_height()),
            scroll_top_inset: region.as_ref().map(|r| r.top_inset()).unwrap_or(0.0),
            intrinsic_height: effective.preferred_content_height(metrics.width),
        };
        let remembered = inner.memory.recall(ChainId::of(&effective)).cloned();

        let Some(layout) = ResolvedLayout::recompute(
            &detents,
            &metrics,
            &inner.policy,
            &measurements,
            remembered.as_ref(),
        ) else {
            inner.layout = None;
            return;
        };

        inner.session.selected = Some(layout.selected().clone());
        inner.session.tracked_scroll_offset =
            region.as_ref().map(|r| r.content_offset()).unwrap_or(0.0);
        inner.extends_scrolling = effective.allows_extended_scrolling();

        inner.surface.set_corner_radius(effective.preferred_corner_radius());
        inner.surface.set_grabber_visible(effective.prefers_grabber_visible());
        inner
            .surface
            .set_user_interaction_enabled(effective.is_user_interaction_enabled());
        inner.surface.set_dim_color(effective.background_dim_color());

        let selected_y = layout
            .y_for(layout.selected())
            .unwrap_or_else(|| layout.anchored_y());
        inner.layout = Some(layout);
        inner.coordinator.reset();

        // Reposition at the selected detent; mid-gesture refreshes snap
        // the sheet the same way the original does.
        if inner.state.observes_scrolling() {
            inner.apply_position(selected_y, None);
        } else {
            inner.session.current_y = selected_y;
        }

        let old = inner.subscription.take();
        let new = region.map(|region| {
            inner.scroll_region = Some(Rc::clone(&region));
            let weak = inner.self_weak.clone();
            Rc::new(ScrollOffsetSubscription::new(
                region,
                Rc::new(move |change| {
                    if let Some(rc) = weak.upgrade() {
                        on_scroll_offset_changed(&rc, change);
                    }
                }),
            ))
        });
        if new.is_none() {
            inner.scroll_region = None;
        }
        inner.subscription = new.clone();
        (old, new)
    };

    // Listener (un)registration talks to the region, which may notify
    // synchronously, so keep it outside the borrow.
    if let Some(old) = old_subscription {
        old.stop();
    }
    if let Some(new) = new_subscription {
        new.start();
    }
}

fn handle_drag(rc: &Rc<RefCell<Inner>>, sample: DragSample) {
    let effective = {
        let mut inner = rc.borrow_mut();
        match inner.state {
            PresentationState::Idle
            | PresentationState::Dismissing
            | PresentationState::Dismissed => {
                log::warn!("drag sample in state {:?}; ignoring", inner.state);
                return;
            }
            _ => {}
        }
        if inner.layout.is_none() {
            log::warn!("drag sample before layout resolution; ignoring");
            return;
        }
        if sample.phase == DragPhase::Began && inner.session.is_animating {
            // The drag takes position ownership; the in-flight animation's
            // completion becomes stale.
            inner.session.is_animating = false;
            inner.animation_generation += 1;
        }
        Rc::clone(&inner.effective)
    };

    let declined = sample.phase == DragPhase::Began && !effective.should_respond_to_gesture();

    let directive = {
        let mut inner = rc.borrow_mut();
        let directive = inner.interpret_sample(&sample);
        if declined {
            inner.interpreter.decline_stream();
            DragDirective::Ignore
        } else {
            directive
        }
    };

    match directive {
        DragDirective::Ignore => {}
        DragDirective::Move { y, dim, at_anchor } => {
            effective.will_respond_to_gesture();
            {
                let mut inner = rc.borrow_mut();
                inner.state = PresentationState::Dragging;
                inner.session.current_y = y;
                inner.surface.set_sheet_y(y);
                inner.surface.set_dim(dim);
            }
            if at_anchor {
                let largest = {
                    let inner = rc.borrow();
                    inner.layout.as_ref().map(|l| l.topmost().id.clone())
                };
                if let Some(largest) = largest {
                    // Impending, not yet committed.
                    effective.will_transition(&largest);
                }
            }
        }
        DragDirective::Settle(SettleDecision::SnapTo(id)) => {
            transition_to_detent(rc, &id);
        }
        DragDirective::Settle(SettleDecision::Dismiss) => {
            begin_dismiss(rc);
        }
    }
}

fn gesture_ownership(rc: &Rc<RefCell<Inner>>, location: Point) -> GestureOwnership {
    let (region, prioritized, anchored) = {
        let inner = rc.borrow();
        let Some(region) = inner.scroll_region.clone() else {
            return GestureOwnership::SheetOwns;
        };
        let prioritized = inner.effective.should_prioritize_gesture();
        (region, prioritized, inner.is_anchored())
    };

    if prioritized {
        // The content wants the sheet gesture; make the region let go of
        // any in-flight tracking.
        region.interrupt_gesture();
        return GestureOwnership::SheetOwns;
    }

    resolve_ownership(
        anchored,
        region.offset_past_top_inset(),
        region.frame_contains(location),
        region.is_actively_scrolling(),
        false,
    )
}

/// Transitions to `detent` after consulting the content. Gesture settles
/// and the external API both land here; the bounce finalize instead snaps
/// directly (momentum transfer is already committed).
fn transition_to_detent(rc: &Rc<RefCell<Inner>>, detent: &DetentId) {
    let effective = {
        let inner = rc.borrow();
        let known = inner
            .layout
            .as_ref()
            .map(|l| l.contains(detent))
            .unwrap_or(false);
        if !known {
            log::warn!("transition to unknown detent {detent}; ignoring");
            return;
        }
        Rc::clone(&inner.effective)
    };

    if !effective.should_transition(detent) {
        // Abandoned: no will_transition, no movement. A drag that ended
        // here settles logically at its previous selection.
        let mut inner = rc.borrow_mut();
        if inner.state == PresentationState::Dragging {
            if let Some(selected) = inner.session.selected.clone() {
                inner.state = PresentationState::Anchored(selected);
            }
        }
        return;
    }
    effective.will_transition(detent);

    let target_y = {
        let mut inner = rc.borrow_mut();
        inner.session.selected = Some(detent.clone());
        let chain = ChainId::of(&inner.effective);
        inner.memory.remember(chain, detent.clone());
        inner
            .layout
            .as_ref()
            .and_then(|l| l.y_for(detent))
            .unwrap_or(inner.session.current_y)
    };

    start_animation(rc, AnimationKind::Settle(detent.clone()), target_y);
}

fn begin_dismiss(rc: &Rc<RefCell<Inner>>) {
    let (effective, target_y) = {
        let inner = rc.borrow();
        match inner.state {
            PresentationState::Idle
            | PresentationState::Dismissing
            | PresentationState::Dismissed => return,
            _ => {}
        }
        let Some(metrics) = inner.metrics else {
            return;
        };
        (Rc::clone(&inner.effective), metrics.height)
    };

    effective.will_dismiss();
    start_animation(rc, AnimationKind::Dismiss, target_y);
}

fn start_animation(rc: &Rc<RefCell<Inner>>, kind: AnimationKind, target_y: f32) {
    let (presentable, motion, generation, weak, dim_override) = {
        let mut inner = rc.borrow_mut();
        inner.session.is_animating = true;
        inner.animation_generation += 1;
        let dim_override = match &kind {
            AnimationKind::Present(_) => {
                inner.state = PresentationState::Presenting;
                None
            }
            AnimationKind::Settle(id) => {
                inner.state = PresentationState::Settling(id.clone());
                None
            }
            AnimationKind::Dismiss => {
                inner.state = PresentationState::Dismissing;
                Some(DimState::Off)
            }
        };
        (
            Rc::clone(&inner.effective),
            motion_spec_for(&*inner.effective),
            inner.animation_generation,
            inner.self_weak.clone(),
            dim_override,
        )
    };

    let changes_weak = weak.clone();
    let changes = Box::new(move || {
        if let Some(rc) = changes_weak.upgrade() {
            rc.borrow_mut().apply_position(target_y, dim_override);
        }
    });
    let completion = Box::new(move |success: bool| {
        if let Some(rc) = weak.upgrade() {
            finish_animation(&rc, generation, &kind, success);
        }
    });

    presentable.animate(motion, changes, completion);
}

fn finish_animation(rc: &Rc<RefCell<Inner>>, generation: u64, kind: &AnimationKind, success: bool) {
    let notify = {
        let mut inner = rc.borrow_mut();
        if generation != inner.animation_generation {
            // Superseded by a drag or a newer transition.
            return;
        }
        inner.session.is_animating = !success;
        match kind {
            AnimationKind::Present(id) | AnimationKind::Settle(id) => {
                if success {
                    inner.state = PresentationState::Anchored(id.clone());
                }
                None
            }
            AnimationKind::Dismiss => {
                if success {
                    inner.state = PresentationState::Dismissed;
                    if let Some(subscription) = inner.subscription.take() {
                        subscription.stop();
                    }
                    inner.scroll_region = None;
                    Some(Rc::clone(&inner.effective))
                } else {
                    None
                }
            }
        }
    };

    if let Some(effective) = notify {
        effective.did_dismiss();
    }
}

fn on_scroll_offset_changed(rc: &Rc<RefCell<Inner>>, change: ScrollOffsetChange) {
    let Ok(mut inner) = rc.try_borrow_mut() else {
        // Re-entrant notification from a halt we are applying; the
        // follow-up event carries no new information.
        return;
    };

    if !inner.state.observes_scrolling() {
        return;
    }
    let Some(region) = inner.scroll_region.clone() else {
        return;
    };
    let (ctx, largest) = {
        let Some(layout) = &inner.layout else { return };
        let Some(metrics) = &inner.metrics else { return };
        (
            HandoffContext {
                anchored: inner.is_anchored(),
                animating: inner.session.is_animating,
                actively_scrolling: region.is_actively_scrolling(),
                decelerating: region.is_decelerating(),
                scroll_root: inner.effective.scroll_region_is_root(),
                top_inset: region.top_inset(),
                container_height: metrics.height,
                largest_y: layout.topmost_y(),
                tracked_offset: inner.session.tracked_scroll_offset,
            },
            layout.topmost().id.clone(),
        )
    };
    let directive = inner.coordinator.on_offset_changed(change, &ctx);
    drop(inner);

    match directive {
        ScrollDirective::Halt { offset } => {
            region.set_content_offset(offset);
            region.set_shows_scroll_indicator(false);
        }
        ScrollDirective::Track { offset } => {
            rc.borrow_mut().session.tracked_scroll_offset = offset;
            region.set_shows_scroll_indicator(true);
        }
        ScrollDirective::BounceShrink {
            bounds_height,
            sheet_y,
        } => {
            let mut inner = rc.borrow_mut();
            inner.session.current_y = sheet_y;
            inner.surface.set_bounds_height(bounds_height);
            inner.surface.set_sheet_y(sheet_y);
            drop(inner);
            region.set_shows_scroll_indicator(false);
        }
        ScrollDirective::BounceSettle { offset } => {
            {
                let mut inner = rc.borrow_mut();
                inner.session.tracked_scroll_offset = offset;
                inner.session.selected = Some(largest.clone());
                if let Some(metrics) = inner.metrics {
                    inner.surface.set_bounds_height(metrics.height);
                }
            }
            region.set_shows_scroll_indicator(false);
            // Momentum transfer committed; no consultation on the way up.
            let target_y = {
                let inner = rc.borrow();
                inner.layout.as_ref().and_then(|l| l.y_for(&largest))
            };
            if let Some(target_y) = target_y {
                start_animation(rc, AnimationKind::Settle(largest), target_y);
            }
        }
    }
}
