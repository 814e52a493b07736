//! Release-velocity estimation for drag gestures.
//!
//! Impulse-strategy 1D estimator: velocity is derived from the kinetic
//! energy the touch imparts over a short trailing window, which behaves
//! much better for flicks than a simple last-two-samples slope.

use smallvec::SmallVec;

/// Ring buffer size for tracked samples.
const HISTORY_SIZE: usize = 20;

/// Only samples within this trailing window contribute to the estimate.
const HORIZON_MS: i64 = 100;

/// A gap this long between consecutive samples means the pointer stopped;
/// older samples are discarded.
pub const ASSUME_STOPPED_MS: i64 = 40;

#[derive(Clone, Copy)]
struct Sample {
    time_ms: i64,
    position: f32,
}

/// 1D velocity estimator over absolute vertical positions.
#[derive(Clone, Default)]
pub struct VelocityEstimator {
    samples: Vec<Sample>,
    next: usize,
}

impl VelocityEstimator {
    pub fn new() -> Self {
        Self {
            samples: Vec::with_capacity(HISTORY_SIZE),
            next: 0,
        }
    }

    /// Records a position sample at the given timestamp (milliseconds,
    /// any monotonic origin).
    pub fn record(&mut self, time_ms: i64, position: f32) {
        let sample = Sample { time_ms, position };
        if self.samples.len() < HISTORY_SIZE {
            self.samples.push(sample);
        } else {
            self.samples[self.next] = sample;
        }
        self.next = (self.next + 1) % HISTORY_SIZE;
    }

    /// Discards all tracked samples.
    pub fn reset(&mut self) {
        self.samples.clear();
        self.next = 0;
    }

    /// Estimated velocity in units/second. Zero without at least two
    /// recent samples, or when the pointer had stopped before release.
    pub fn velocity(&self) -> f32 {
        // Collect the usable trailing window, newest first.
        let mut window: SmallVec<[Sample; HISTORY_SIZE]> = SmallVec::new();
        let count = self.samples.len();
        if count == 0 {
            return 0.0;
        }

        let newest_index = (self.next + HISTORY_SIZE - 1) % HISTORY_SIZE;
        let newest = self.samples[newest_index.min(count - 1)];
        let mut previous_time = newest.time_ms;

        for step in 0..count {
            let index = (newest_index + HISTORY_SIZE - step) % HISTORY_SIZE;
            if index >= count {
                break;
            }
            let sample = self.samples[index];
            let age = newest.time_ms - sample.time_ms;
            let gap = previous_time - sample.time_ms;
            if age > HORIZON_MS || gap > ASSUME_STOPPED_MS {
                break;
            }
            previous_time = sample.time_ms;
            window.push(sample);
        }

        if window.len() < 2 {
            return 0.0;
        }

        // Oldest-first for the impulse accumulation.
        window.reverse();

        let mut work = 0.0f32;
        for (index, pair) in window.windows(2).enumerate() {
            let (older, newer) = (pair[0], pair[1]);
            let dt_ms = (newer.time_ms - older.time_ms) as f32;
            if dt_ms == 0.0 {
                continue;
            }
            let v_curr = (newer.position - older.position) / dt_ms;
            let v_prev = kinetic_energy_to_velocity(work);
            work += (v_curr - v_prev) * v_curr.abs();
            if index == 0 {
                // The oldest pair contributes half its energy.
                work *= 0.5;
            }
        }

        // Per-millisecond estimate, scaled to per-second.
        kinetic_energy_to_velocity(work) * 1000.0
    }

    /// Estimated velocity clamped to `±max_velocity`.
    pub fn velocity_capped(&self, max_velocity: f32) -> f32 {
        if !max_velocity.is_finite() || max_velocity <= 0.0 {
            return 0.0;
        }
        let velocity = self.velocity();
        if velocity.is_nan() {
            return 0.0;
        }
        velocity.clamp(-max_velocity, max_velocity)
    }
}

/// E = ½mv² with m = 1, signed.
#[inline]
fn kinetic_energy_to_velocity(kinetic_energy: f32) -> f32 {
    kinetic_energy.signum() * (2.0 * kinetic_energy.abs()).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_estimator_reports_zero() {
        assert_eq!(VelocityEstimator::new().velocity(), 0.0);
    }

    #[test]
    fn single_sample_reports_zero() {
        let mut estimator = VelocityEstimator::new();
        estimator.record(0, 100.0);
        assert_eq!(estimator.velocity(), 0.0);
    }

    #[test]
    fn constant_motion_estimates_its_speed() {
        let mut estimator = VelocityEstimator::new();
        // 100 px per 10 ms = 10_000 px/s.
        estimator.record(0, 0.0);
        estimator.record(10, 100.0);
        estimator.record(20, 200.0);
        estimator.record(30, 300.0);

        let velocity = estimator.velocity();
        assert!(
            (velocity - 10_000.0).abs() < 1_000.0,
            "expected ~10000, got {velocity}"
        );
    }

    #[test]
    fn upward_motion_is_negative() {
        let mut estimator = VelocityEstimator::new();
        estimator.record(0, 300.0);
        estimator.record(10, 200.0);
        estimator.record(20, 100.0);
        assert!(estimator.velocity() < 0.0);
    }

    #[test]
    fn estimate_is_capped() {
        let mut estimator = VelocityEstimator::new();
        estimator.record(0, 0.0);
        estimator.record(1, 10_000.0);
        assert_eq!(estimator.velocity_capped(8_000.0), 8_000.0);

        estimator.reset();
        estimator.record(0, 10_000.0);
        estimator.record(1, 0.0);
        assert_eq!(estimator.velocity_capped(8_000.0), -8_000.0);
    }

    #[test]
    fn a_pause_before_release_reads_as_stopped() {
        let mut estimator = VelocityEstimator::new();
        estimator.record(0, 0.0);
        estimator.record(ASSUME_STOPPED_MS + 1, 100.0);
        assert_eq!(estimator.velocity(), 0.0);
    }

    #[test]
    fn stale_samples_beyond_the_horizon_are_ignored() {
        let mut estimator = VelocityEstimator::new();
        estimator.record(0, 0.0);
        estimator.record(150, 100.0);
        estimator.record(160, 200.0);
        estimator.record(170, 300.0);
        assert!(estimator.velocity().abs() > 0.0);
    }

    #[test]
    fn reset_discards_history() {
        let mut estimator = VelocityEstimator::new();
        estimator.record(0, 0.0);
        estimator.record(10, 100.0);
        estimator.reset();
        assert_eq!(estimator.velocity(), 0.0);
    }
}
