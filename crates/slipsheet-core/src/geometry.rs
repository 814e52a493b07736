//! Geometry value types shared across the sheet engine.

/// A point in container coordinates (logical pixels, y grows downward).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const ZERO: Point = Point { x: 0.0, y: 0.0 };

    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Safe-area style edge insets.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EdgeInsets {
    pub top: f32,
    pub left: f32,
    pub bottom: f32,
    pub right: f32,
}

impl EdgeInsets {
    pub const ZERO: EdgeInsets = EdgeInsets {
        top: 0.0,
        left: 0.0,
        bottom: 0.0,
        right: 0.0,
    };

    pub fn vertical(top: f32, bottom: f32) -> Self {
        Self {
            top,
            bottom,
            ..Self::ZERO
        }
    }
}

/// Snapshot of the presentation container's geometry.
///
/// The host supplies one at presentation start and again whenever the
/// container is re-laid-out (rotation, window resize). All detent y
/// positions are derived from it; the engine never measures anything itself.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContainerMetrics {
    /// Container width in logical pixels.
    pub width: f32,
    /// Container height in logical pixels.
    pub height: f32,
    /// Safe-area insets of the container.
    pub safe_area: EdgeInsets,
    /// Device pixels per logical pixel. Drives the anchored-position check.
    pub display_scale: f32,
}

impl ContainerMetrics {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            safe_area: EdgeInsets::ZERO,
            display_scale: 1.0,
        }
    }

    pub fn with_safe_area(mut self, safe_area: EdgeInsets) -> Self {
        self.safe_area = safe_area;
        self
    }

    pub fn with_display_scale(mut self, display_scale: f32) -> Self {
        self.display_scale = display_scale;
        self
    }
}

/// Rounds a logical coordinate onto the device-pixel grid.
///
/// Two positions compare as "the same place on screen" when their rounded
/// values are equal, which is how the anchored check tolerates sub-pixel
/// layout noise.
pub fn pixel_rounded(value: f32, scale: f32) -> f32 {
    if scale <= 0.0 {
        return value;
    }
    (value * scale).round() / scale
}

/// RGBA color, components in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color(pub f32, pub f32, pub f32, pub f32);

impl Color {
    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self(r, g, b, a)
    }

    pub fn with_alpha(&self, alpha: f32) -> Self {
        Self(self.0, self.1, self.2, alpha)
    }

    pub fn a(&self) -> f32 {
        self.3
    }

    pub const BLACK: Color = Color(0.0, 0.0, 0.0, 1.0);
    pub const TRANSPARENT: Color = Color(0.0, 0.0, 0.0, 0.0);
}

/// Intensity of the dimming overlay behind the sheet.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DimState {
    /// No dimming (sheet fully below the smallest detent, or dismissed).
    Off,
    /// Full dimming (sheet at or above the smallest detent).
    Max,
    /// Partial dimming while the sheet travels the dismissal band.
    Percent(f32),
}

impl DimState {
    /// The overlay alpha fraction this state maps to, in [0, 1].
    pub fn fraction(&self) -> f32 {
        match self {
            DimState::Off => 0.0,
            DimState::Max => 1.0,
            DimState::Percent(p) => p.clamp(0.0, 1.0),
        }
    }
}
