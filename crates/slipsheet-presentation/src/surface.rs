//! Write-only sink for the sheet's visual state.
//!
//! The chrome (shadow wrapper, dimming overlay, grabber) lives host-side;
//! the controller only pushes values into it. Nothing here is ever read
//! back: the controller's session state is the single source of truth for
//! position.

use slipsheet_core::{Color, DimState};

/// Host-side visual sink driven by the presentation controller.
///
/// Implementations must not call back into the controller synchronously.
pub trait PresentationSurface {
    /// Positions the sheet's top edge.
    fn set_sheet_y(&self, y: f32);

    /// Updates the dimming overlay intensity.
    fn set_dim(&self, dim: DimState);

    /// Resizes the sheet's visible bounds (top-bounce hand-off only).
    fn set_bounds_height(&self, height: f32);

    fn set_dim_color(&self, color: Color) {
        let _ = color;
    }

    fn set_corner_radius(&self, radius: f32) {
        let _ = radius;
    }

    fn set_grabber_visible(&self, visible: bool) {
        let _ = visible;
    }

    fn set_user_interaction_enabled(&self, enabled: bool) {
        let _ = enabled;
    }

    /// Selection haptic at presentation start. No-op by default.
    fn play_selection_feedback(&self) {}
}
