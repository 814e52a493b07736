//! Pointer-to-drag adaptation.
//!
//! Platforms that hand the engine raw pointer events (rather than a
//! recognizer-style translation/velocity stream) feed them through a
//! [`PointerSession`], which applies the touch slop, emits per-move deltas,
//! and estimates the release velocity.

use crate::constants::{DRAG_THRESHOLD, MAX_FLING_VELOCITY};
use crate::drag::{DragPhase, DragSample};
use crate::velocity::VelocityEstimator;

/// Converts a raw vertical pointer stream into serialized [`DragSample`]s.
///
/// One session handles one pointer at a time; `begin` resets any stale
/// state, so a session can be reused across gestures.
pub struct PointerSession {
    estimator: VelocityEstimator,
    epoch: web_time::Instant,
    last_y: Option<f32>,
    accumulated: f32,
    slop_passed: bool,
}

impl Default for PointerSession {
    fn default() -> Self {
        Self::new()
    }
}

impl PointerSession {
    pub fn new() -> Self {
        Self {
            estimator: VelocityEstimator::new(),
            epoch: web_time::Instant::now(),
            last_y: None,
            accumulated: 0.0,
            slop_passed: false,
        }
    }

    /// Milliseconds since the session was created. Convenience timestamp
    /// source for hosts without their own event clock.
    pub fn timestamp_ms(&self) -> i64 {
        self.epoch.elapsed().as_millis() as i64
    }

    /// Pointer down. No sample is emitted; tracking starts.
    pub fn begin(&mut self, time_ms: i64, y: f32) {
        self.estimator.reset();
        self.estimator.record(time_ms, y);
        self.last_y = Some(y);
        self.accumulated = 0.0;
        self.slop_passed = false;
    }

    /// Pointer move. Returns `None` until the touch slop is exceeded; the
    /// first emitted sample is the stream's `Began`.
    pub fn advance(&mut self, time_ms: i64, y: f32) -> Option<DragSample> {
        let last = self.last_y?;
        let delta = y - last;
        self.last_y = Some(y);
        self.estimator.record(time_ms, y);

        if !self.slop_passed {
            self.accumulated += delta.abs();
            if self.accumulated <= DRAG_THRESHOLD {
                return None;
            }
            self.slop_passed = true;
            return Some(DragSample::began(delta));
        }
        Some(DragSample::changed(delta))
    }

    /// Pointer up. Emits the terminal `Ended` sample with the estimated
    /// release velocity, or `None` if the slop was never passed.
    pub fn finish(&mut self, time_ms: i64, y: f32) -> Option<DragSample> {
        self.estimator.record(time_ms, y);
        let velocity = self.estimator.velocity_capped(MAX_FLING_VELOCITY);
        let was_dragging = self.slop_passed;
        self.clear();
        was_dragging.then(|| DragSample::ended(velocity))
    }

    /// Pointer cancelled by the platform. Uses the last-known velocity.
    pub fn cancel(&mut self) -> Option<DragSample> {
        let velocity = self.estimator.velocity_capped(MAX_FLING_VELOCITY);
        let was_dragging = self.slop_passed;
        self.clear();
        was_dragging.then(|| DragSample {
            phase: DragPhase::Cancelled,
            translation_delta: 0.0,
            velocity,
        })
    }

    fn clear(&mut self) {
        self.estimator.reset();
        self.last_y = None;
        self.accumulated = 0.0;
        self.slop_passed = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn moves_inside_the_slop_emit_nothing() {
        let mut session = PointerSession::new();
        session.begin(0, 100.0);
        assert!(session.advance(10, 103.0).is_none());
        assert!(session.advance(20, 106.0).is_none());
    }

    #[test]
    fn first_sample_past_the_slop_is_began() {
        let mut session = PointerSession::new();
        session.begin(0, 100.0);
        assert!(session.advance(10, 105.0).is_none());
        let sample = session.advance(20, 112.0).expect("slop passed");
        assert_eq!(sample.phase, DragPhase::Began);
        assert_eq!(sample.translation_delta, 7.0);

        let next = session.advance(30, 120.0).expect("dragging");
        assert_eq!(next.phase, DragPhase::Changed);
        assert_eq!(next.translation_delta, 8.0);
    }

    #[test]
    fn release_carries_a_signed_capped_velocity() {
        let mut session = PointerSession::new();
        session.begin(0, 300.0);
        session.advance(10, 250.0);
        session.advance(20, 200.0);
        let sample = session.finish(30, 150.0).expect("was dragging");
        assert_eq!(sample.phase, DragPhase::Ended);
        assert!(sample.velocity < 0.0, "upward drag must be negative");
        assert!(sample.velocity >= -MAX_FLING_VELOCITY);
    }

    #[test]
    fn release_without_a_drag_emits_nothing() {
        let mut session = PointerSession::new();
        session.begin(0, 100.0);
        session.advance(10, 102.0);
        assert!(session.finish(20, 103.0).is_none());
    }

    #[test]
    fn cancel_terminates_an_active_stream() {
        let mut session = PointerSession::new();
        session.begin(0, 100.0);
        session.advance(10, 120.0);
        let sample = session.cancel().expect("was dragging");
        assert_eq!(sample.phase, DragPhase::Cancelled);
        // Session reusable afterwards.
        session.begin(100, 50.0);
        assert!(session.advance(110, 70.0).is_some());
    }

    #[test]
    fn timestamp_source_is_monotonic() {
        let session = PointerSession::new();
        let a = session.timestamp_ms();
        let b = session.timestamp_ms();
        assert!(b >= a);
        assert!(a >= 0);
    }
}
