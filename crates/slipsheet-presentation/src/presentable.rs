//! The presented content's capability seam.
//!
//! The engine asks the content everything it needs to know (detent set,
//! motion preferences, behavior flags) and notifies it around gestures,
//! transitions and dismissal. Every method has a default, so implementers
//! override only what differs from stock sheet behavior.

use std::rc::Rc;

use slipsheet_animation::{Easing, MotionSpec, SpringSpec};
use slipsheet_core::{Color, Detent, DetentId, HeightSpec};
use slipsheet_foundation::ScrollRegion;

/// Configuration and callback surface for content presented as a sheet.
pub trait Presentable {
    /// The detent set this content can rest at.
    fn detents(&self) -> Vec<Detent> {
        vec![Detent::new(DetentId::content(), HeightSpec::Content)]
    }

    /// Radius used to round the sheet's top corners; 0 disables.
    fn preferred_corner_radius(&self) -> f32 {
        12.0
    }

    /// Transition speed, including the initial presentation.
    fn transition_duration_millis(&self) -> u64 {
        500
    }

    /// Spring damping for detent transitions; 0.8 gives a slight bounce.
    fn spring_damping(&self) -> f32 {
        0.8
    }

    fn transition_easing(&self) -> Easing {
        Easing::EaseInOut
    }

    /// Color of the dimming overlay behind the sheet.
    fn background_dim_color(&self) -> Color {
        Color::BLACK.with_alpha(0.12)
    }

    /// The embedded scrollable area, if any. Enables seamless hand-off
    /// between sheet dragging and content scrolling.
    fn scroll_region(&self) -> Option<Rc<dyn ScrollRegion>> {
        None
    }

    /// Whether the content's root is itself the scroll region. Required
    /// for the top-bounce momentum hand-off.
    fn scroll_region_is_root(&self) -> bool {
        false
    }

    /// Best-fit content height at the given width, for intrinsic-content
    /// detents. `None` degrades those detents to the top anchor.
    fn preferred_content_height(&self, width: f32) -> Option<f32> {
        let _ = width;
        None
    }

    /// Whether dragging hands off into the scroll region once the sheet is
    /// anchored. Defaults to true exactly when the scrollable content is
    /// taller than its viewport.
    fn allows_extended_scrolling(&self) -> bool {
        match self.scroll_region() {
            Some(region) => {
                region.content_height() > region.viewport_height() - region.bottom_inset()
            }
            None => false,
        }
    }

    /// Whether swiping down past the smallest detent dismisses. When
    /// false, such gestures fall back to the smallest detent instead.
    fn allows_drag_to_dismiss(&self) -> bool {
        true
    }

    /// Whether tapping the dimming overlay dismisses.
    fn allows_tap_to_dismiss(&self) -> bool {
        true
    }

    fn is_user_interaction_enabled(&self) -> bool {
        true
    }

    fn is_haptic_feedback_enabled(&self) -> bool {
        true
    }

    fn prefers_grabber_visible(&self) -> bool {
        self.preferred_corner_radius() > 0.0
    }

    /// Container content delegates sheet behavior to this child (a
    /// navigation stack delegates to its top entry, for example). The
    /// engine walks to the topmost child before querying anything else.
    fn child_presentable(&self) -> Option<Rc<dyn Presentable>> {
        None
    }

    /// Return false to refuse the starting drag stream; the sheet stays
    /// put but the content keeps receiving its own gestures.
    fn should_respond_to_gesture(&self) -> bool {
        true
    }

    /// Invoked on every began/changed sample before the sheet moves.
    fn will_respond_to_gesture(&self) {}

    /// Return true to force the sheet gesture to win arbitration even
    /// over an actively scrolling region.
    fn should_prioritize_gesture(&self) -> bool {
        false
    }

    /// Return false to refuse a detent transition; the in-flight change
    /// is abandoned with no movement.
    fn should_transition(&self, detent: &DetentId) -> bool {
        let _ = detent;
        true
    }

    fn will_transition(&self, detent: &DetentId) {
        let _ = detent;
    }

    fn will_dismiss(&self) {}

    fn did_dismiss(&self) {}

    /// Executes a transition host-side. `changes` applies the final frame
    /// values and must run immediately; `completion` must be invoked
    /// exactly once, with `true` when the animation ran to completion.
    ///
    /// The default executor is synchronous: apply and complete at once.
    fn animate(&self, motion: MotionSpec, changes: Box<dyn FnOnce()>, completion: Box<dyn FnOnce(bool)>) {
        let _ = motion;
        changes();
        completion(true);
    }
}

/// Walks `child_presentable` links to the effective content for this
/// presentation, the one whose detents and callbacks drive the sheet.
pub fn topmost_presentable(root: &Rc<dyn Presentable>) -> Rc<dyn Presentable> {
    let mut current = Rc::clone(root);
    while let Some(child) = current.child_presentable() {
        current = child;
    }
    current
}

/// Assembles the motion configuration for one transition from the
/// content's preferences.
pub fn motion_spec_for(presentable: &dyn Presentable) -> MotionSpec {
    MotionSpec::new(
        presentable.transition_duration_millis(),
        presentable.transition_easing(),
        SpringSpec::with_damping_ratio(presentable.spring_damping()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Stock;
    impl Presentable for Stock {}

    #[test]
    fn defaults_match_stock_sheet_behavior() {
        let p = Stock;
        assert_eq!(p.preferred_corner_radius(), 12.0);
        assert_eq!(p.spring_damping(), 0.8);
        assert_eq!(p.transition_duration_millis(), 500);
        assert!(p.allows_drag_to_dismiss());
        assert!(p.allows_tap_to_dismiss());
        assert!(p.is_user_interaction_enabled());
        assert!(p.is_haptic_feedback_enabled());
        assert!(p.prefers_grabber_visible());
        assert!(!p.allows_extended_scrolling(), "no scroll region configured");
        assert!(p.should_transition(&DetentId::content()));
        let detents = p.detents();
        assert_eq!(detents.len(), 1);
        assert_eq!(detents[0].id, DetentId::content());
    }

    #[test]
    fn grabber_follows_corner_radius() {
        struct Square;
        impl Presentable for Square {
            fn preferred_corner_radius(&self) -> f32 {
                0.0
            }
        }
        assert!(!Square.prefers_grabber_visible());
    }

    #[test]
    fn topmost_walk_follows_nested_children() {
        struct Leaf;
        impl Presentable for Leaf {
            fn preferred_corner_radius(&self) -> f32 {
                3.0
            }
        }
        struct Stack(Rc<dyn Presentable>);
        impl Presentable for Stack {
            fn child_presentable(&self) -> Option<Rc<dyn Presentable>> {
                Some(Rc::clone(&self.0))
            }
        }

        let leaf: Rc<dyn Presentable> = Rc::new(Leaf);
        let outer: Rc<dyn Presentable> = Rc::new(Stack(Rc::new(Stack(Rc::clone(&leaf)))));
        let effective = topmost_presentable(&outer);
        assert_eq!(effective.preferred_corner_radius(), 3.0);
    }

    #[test]
    fn motion_spec_reflects_content_preferences() {
        struct Slow;
        impl Presentable for Slow {
            fn transition_duration_millis(&self) -> u64 {
                900
            }
            fn spring_damping(&self) -> f32 {
                0.6
            }
        }
        let motion = motion_spec_for(&Slow);
        assert_eq!(motion.duration_millis, 900);
        assert_eq!(motion.spring.damping_ratio, 0.6);
    }
}
