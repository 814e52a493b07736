//! Motion descriptions for sheet transitions.
//!
//! Slipsheet never runs animation frames itself: presenting, settling and
//! dismissing are executed by the host through the presentable's animation
//! hook. This crate provides the vocabulary for that hook: easing curves,
//! tween and spring parameters, and the combined [`MotionSpec`] the engine
//! hands over per transition.

pub mod easing;
pub mod spring;

pub use easing::Easing;
pub use spring::SpringSpec;

/// Trait for values that can be linearly interpolated.
pub trait Lerp {
    fn lerp(&self, target: &Self, fraction: f32) -> Self;
}

impl Lerp for f32 {
    fn lerp(&self, target: &Self, fraction: f32) -> Self {
        self + (target - self) * fraction
    }
}

impl Lerp for f64 {
    fn lerp(&self, target: &Self, fraction: f32) -> Self {
        self + (target - self) * fraction as f64
    }
}

/// Time-based animation parameters: duration plus easing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationSpec {
    /// Duration in milliseconds.
    pub duration_millis: u64,
    /// Easing function to apply.
    pub easing: Easing,
    /// Delay before starting, in milliseconds.
    pub delay_millis: u64,
}

impl AnimationSpec {
    pub fn tween(duration_millis: u64, easing: Easing) -> Self {
        Self {
            duration_millis,
            easing,
            delay_millis: 0,
        }
    }

    pub fn linear(duration_millis: u64) -> Self {
        Self::tween(duration_millis, Easing::Linear)
    }

    pub fn with_delay(mut self, delay_millis: u64) -> Self {
        self.delay_millis = delay_millis;
        self
    }
}

impl Default for AnimationSpec {
    fn default() -> Self {
        Self::tween(300, Easing::FastOutSlowIn)
    }
}

/// The full motion configuration for one sheet transition, assembled from
/// the presented content's preferences and executed by the host.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionSpec {
    pub duration_millis: u64,
    pub easing: Easing,
    pub spring: SpringSpec,
}

impl MotionSpec {
    pub fn new(duration_millis: u64, easing: Easing, spring: SpringSpec) -> Self {
        Self {
            duration_millis,
            easing,
            spring,
        }
    }

    /// Samples the eased value between `from` and `to` at a linear time
    /// fraction in [0, 1]. Hosts (and the test animator) use this to place
    /// intermediate frames without owning curve math.
    pub fn interpolate(&self, from: f32, to: f32, linear_fraction: f32) -> f32 {
        let progress = self.easing.transform(linear_fraction.clamp(0.0, 1.0));
        from.lerp(&to, progress)
    }
}

impl Default for MotionSpec {
    fn default() -> Self {
        Self {
            duration_millis: 500,
            easing: Easing::EaseInOut,
            spring: SpringSpec::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interpolate_respects_endpoints() {
        let motion = MotionSpec::default();
        assert_eq!(motion.interpolate(100.0, 300.0, 0.0), 100.0);
        assert_eq!(motion.interpolate(100.0, 300.0, 1.0), 300.0);
    }

    #[test]
    fn interpolate_clamps_out_of_range_fractions() {
        let motion = MotionSpec::default();
        assert_eq!(motion.interpolate(0.0, 10.0, -0.5), 0.0);
        assert_eq!(motion.interpolate(0.0, 10.0, 1.5), 10.0);
    }

    #[test]
    fn linear_interpolation_is_proportional() {
        let motion = MotionSpec {
            easing: Easing::Linear,
            ..MotionSpec::default()
        };
        assert!((motion.interpolate(0.0, 200.0, 0.25) - 50.0).abs() < 1e-4);
    }
}
