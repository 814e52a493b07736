//! Easing curves for externally-executed transitions.

/// Easing functions over a linear fraction in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Easing {
    Linear,
    EaseIn,
    EaseOut,
    /// Cubic ease on both ends; the default sheet transition curve.
    EaseInOut,
    /// Material-style fast-out slow-in.
    FastOutSlowIn,
}

impl Easing {
    /// Apply the easing function to a linear fraction in [0, 1].
    pub fn transform(&self, fraction: f32) -> f32 {
        match self {
            Easing::Linear => fraction,
            Easing::EaseIn => cubic_bezier(0.42, 0.0, 1.0, 1.0, fraction),
            Easing::EaseOut => cubic_bezier(0.0, 0.0, 0.58, 1.0, fraction),
            Easing::EaseInOut => cubic_bezier(0.42, 0.0, 0.58, 1.0, fraction),
            Easing::FastOutSlowIn => cubic_bezier(0.4, 0.0, 0.2, 1.0, fraction),
        }
    }
}

/// Cubic bezier curve evaluation for easing.
fn cubic_bezier(x1: f32, y1: f32, x2: f32, y2: f32, fraction: f32) -> f32 {
    if fraction <= 0.0 {
        return 0.0;
    }
    if fraction >= 1.0 {
        return 1.0;
    }

    let cx = 3.0 * x1;
    let bx = 3.0 * (x2 - x1) - cx;
    let ax = 1.0 - cx - bx;

    let cy = 3.0 * y1;
    let by = 3.0 * (y2 - y1) - cy;
    let ay = 1.0 - cy - by;

    fn sample_curve(a: f32, b: f32, c: f32, t: f32) -> f32 {
        ((a * t + b) * t + c) * t
    }

    fn sample_derivative(a: f32, b: f32, c: f32, t: f32) -> f32 {
        (3.0 * a * t + 2.0 * b) * t + c
    }

    // Newton-Raphson for the parametric t matching the x fraction, clamped
    // to [0, 1] to keep the solution in bounds.
    let mut t = fraction;
    let mut converged = false;
    for _ in 0..8 {
        let x = sample_curve(ax, bx, cx, t) - fraction;
        if x.abs() < 1e-6 {
            converged = true;
            break;
        }
        let dx = sample_derivative(ax, bx, cx, t);
        if dx.abs() < 1e-6 {
            break;
        }
        t = (t - x / dx).clamp(0.0, 1.0);
    }

    if !converged {
        // Binary subdivision fallback when Newton-Raphson stalls.
        let mut t0 = 0.0;
        let mut t1 = 1.0;
        t = fraction;
        for _ in 0..16 {
            let x = sample_curve(ax, bx, cx, t);
            let delta = x - fraction;
            if delta.abs() < 1e-6 {
                break;
            }
            if delta > 0.0 {
                t1 = t;
            } else {
                t0 = t;
            }
            t = 0.5 * (t0 + t1);
        }
    }

    sample_curve(ay, by, cy, t)
}

#[cfg(test)]
mod tests {
    use super::*;

    const CURVES: [Easing; 5] = [
        Easing::Linear,
        Easing::EaseIn,
        Easing::EaseOut,
        Easing::EaseInOut,
        Easing::FastOutSlowIn,
    ];

    #[test]
    fn all_curves_pin_their_endpoints() {
        for easing in CURVES {
            assert_eq!(easing.transform(0.0), 0.0, "{easing:?} at 0");
            assert_eq!(easing.transform(1.0), 1.0, "{easing:?} at 1");
        }
    }

    #[test]
    fn all_curves_are_monotonically_nondecreasing() {
        for easing in CURVES {
            let mut previous = 0.0;
            for step in 1..=100 {
                let value = easing.transform(step as f32 / 100.0);
                assert!(
                    value >= previous - 1e-4,
                    "{easing:?} decreased at step {step}: {previous} -> {value}"
                );
                previous = value;
            }
        }
    }

    #[test]
    fn ease_in_out_is_symmetric_about_the_midpoint() {
        let easing = Easing::EaseInOut;
        for step in 0..=50 {
            let fraction = step as f32 / 100.0;
            let low = easing.transform(fraction);
            let high = easing.transform(1.0 - fraction);
            assert!((low - (1.0 - high)).abs() < 1e-3);
        }
    }

    #[test]
    fn out_of_range_fractions_clamp() {
        assert_eq!(Easing::EaseInOut.transform(-0.3), 0.0);
        assert_eq!(Easing::EaseInOut.transform(1.3), 1.0);
    }
}
