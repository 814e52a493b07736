//! Spring parameters handed to the host's animation executor.

/// Spring animation configuration.
///
/// Only describes the spring; integration happens host-side.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpringSpec {
    /// Damping ratio. 1.0 = critically damped, < 1.0 = bouncy,
    /// > 1.0 = over-damped.
    pub damping_ratio: f32,
    /// Stiffness constant. Higher = faster settle.
    pub stiffness: f32,
}

impl SpringSpec {
    pub const DEFAULT_STIFFNESS: f32 = 1500.0;

    /// Spring with the sheet's default damping (a slightly bouncy settle).
    pub fn sheet_default() -> Self {
        Self::with_damping_ratio(0.8)
    }

    /// Spring at the given damping ratio and default stiffness.
    pub fn with_damping_ratio(damping_ratio: f32) -> Self {
        Self {
            damping_ratio,
            stiffness: Self::DEFAULT_STIFFNESS,
        }
    }

    /// Critically damped spring (fast, no bounce).
    pub fn stiff() -> Self {
        Self {
            damping_ratio: 1.0,
            stiffness: 3000.0,
        }
    }
}

impl Default for SpringSpec {
    fn default() -> Self {
        Self::sheet_default()
    }
}
