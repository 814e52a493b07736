//! Layout resolution: turning a detent set plus container geometry into
//! absolute y positions.
//!
//! A [`ResolvedLayout`] is computed wholesale whenever geometry or the
//! detent set changes and is immutable once produced: callers replace it,
//! never patch it, so gesture processing can't observe a torn layout.

use indexmap::IndexMap;

use crate::detent::{Detent, DetentId, HeightSpec};
use crate::geometry::{ContainerMetrics, DimState};

/// Default gap between the safe-area top and the tallest sheet position.
pub const DEFAULT_TOP_GAP: f32 = 18.0;

/// Policy for the offset between the container top and the sheet's topmost
/// reachable position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TopOffsetPolicy {
    /// Extra gap below the safe-area top, in logical pixels.
    pub gap: f32,
}

impl Default for TopOffsetPolicy {
    fn default() -> Self {
        Self {
            gap: DEFAULT_TOP_GAP,
        }
    }
}

impl TopOffsetPolicy {
    pub fn top_offset(&self, metrics: &ContainerMetrics) -> f32 {
        metrics.safe_area.top + self.gap
    }
}

/// Content-derived inputs to height resolution, sampled once per layout
/// pass. Absent measurements degrade to documented fallbacks, never errors.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ContentMeasurements {
    /// Total content height of the embedded scroll region, if one exists.
    pub scroll_content_height: Option<f32>,
    /// Top content inset of the embedded scroll region.
    pub scroll_top_inset: f32,
    /// Best-fit height of the content at container width.
    pub intrinsic_height: Option<f32>,
}

/// Resolves a height spec to a raw y offset from the container top,
/// before the top-offset policy is applied.
pub fn resolve_height_offset(
    spec: HeightSpec,
    metrics: &ContainerMetrics,
    measurements: &ContentMeasurements,
) -> f32 {
    match spec {
        HeightSpec::MaxWithTopInset(inset) => inset,
        HeightSpec::Fixed(height) => metrics.height - (height + metrics.safe_area.bottom),
        HeightSpec::FitsScrollContent => match measurements.scroll_content_height {
            Some(content_height) => {
                metrics.height
                    - (content_height + measurements.scroll_top_inset + metrics.safe_area.bottom)
            }
            None => {
                log::warn!("fits-scroll-content detent without a scroll region; using top anchor");
                resolve_height_offset(HeightSpec::MAX, metrics, measurements)
            }
        },
        HeightSpec::FitsIntrinsicContent => match measurements.intrinsic_height {
            Some(intrinsic) => metrics.height - (intrinsic + metrics.safe_area.bottom),
            None => {
                log::warn!("intrinsic-content detent without a measurement; using top anchor");
                resolve_height_offset(HeightSpec::MAX, metrics, measurements)
            }
        },
        HeightSpec::Content => {
            let delegate = if measurements.scroll_content_height.is_some() {
                HeightSpec::FitsScrollContent
            } else {
                HeightSpec::FitsIntrinsicContent
            };
            resolve_height_offset(delegate, metrics, measurements)
        }
    }
}

/// The fully resolved detent layout for one container geometry.
///
/// `ordered_detents` is sorted ascending by resolved y, so index 0 is the
/// topmost (tallest) detent. `y_positions` preserves the configured detent
/// order, which makes nearest-detent ties deterministic: the first
/// configured candidate wins.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedLayout {
    ordered_detents: Vec<Detent>,
    y_positions: IndexMap<DetentId, f32>,
    anchored_y: f32,
    selected: DetentId,
}

impl ResolvedLayout {
    /// Computes a fresh layout for the given detent set and geometry.
    ///
    /// `remembered` is the detent selected earlier in this presentation
    /// chain; it survives the recompute only if still present in the set,
    /// otherwise selection falls back to the topmost detent.
    ///
    /// Returns `None` for an empty detent set, a precondition violation
    /// the caller treats as a no-op.
    pub fn recompute(
        detents: &[Detent],
        metrics: &ContainerMetrics,
        policy: &TopOffsetPolicy,
        measurements: &ContentMeasurements,
        remembered: Option<&DetentId>,
    ) -> Option<ResolvedLayout> {
        if detents.is_empty() {
            log::warn!("layout requested with an empty detent set");
            return None;
        }

        let top_offset = policy.top_offset(metrics);
        let top_anchor = resolve_height_offset(HeightSpec::MAX, metrics, measurements);

        let mut y_positions = IndexMap::with_capacity(detents.len());
        for detent in detents {
            let raw = resolve_height_offset(detent.height, metrics, measurements);
            let y = raw.max(top_anchor) + top_offset;
            y_positions.insert(detent.id.clone(), y);
        }

        let mut ordered_detents = detents.to_vec();
        ordered_detents.sort_by(|a, b| {
            let ya = y_positions[&a.id];
            let yb = y_positions[&b.id];
            ya.partial_cmp(&yb).unwrap_or(std::cmp::Ordering::Equal)
        });

        let selected = remembered
            .filter(|id| y_positions.contains_key(*id))
            .cloned()
            .unwrap_or_else(|| ordered_detents[0].id.clone());

        Some(ResolvedLayout {
            ordered_detents,
            y_positions,
            anchored_y: top_offset,
            selected,
        })
    }

    pub fn ordered_detents(&self) -> &[Detent] {
        &self.ordered_detents
    }

    pub fn y_positions(&self) -> &IndexMap<DetentId, f32> {
        &self.y_positions
    }

    /// Topmost reachable y for the sheet; the drag clamp floor.
    pub fn anchored_y(&self) -> f32 {
        self.anchored_y
    }

    pub fn selected(&self) -> &DetentId {
        &self.selected
    }

    pub fn contains(&self, id: &DetentId) -> bool {
        self.y_positions.contains_key(id)
    }

    pub fn y_for(&self, id: &DetentId) -> Option<f32> {
        self.y_positions.get(id).copied()
    }

    /// The tallest configured detent.
    pub fn topmost(&self) -> &Detent {
        &self.ordered_detents[0]
    }

    /// The shortest configured detent.
    pub fn smallest(&self) -> &Detent {
        &self.ordered_detents[self.ordered_detents.len() - 1]
    }

    pub fn topmost_y(&self) -> f32 {
        self.y_positions[&self.topmost().id]
    }

    pub fn smallest_y(&self) -> f32 {
        self.y_positions[&self.smallest().id]
    }

    /// Finds the detent whose y position is nearest to `y`, in configured
    /// order (the first candidate wins ties).
    ///
    /// When `dismissal` is given it competes as a virtual target: if it is
    /// strictly nearer than every configured detent the result is `None`,
    /// meaning "dismiss is the nearest outcome".
    pub fn nearest_detent(&self, y: f32, dismissal: Option<f32>) -> Option<&DetentId> {
        let mut best: Option<(&DetentId, f32)> = None;
        for (id, detent_y) in &self.y_positions {
            let distance = (y - detent_y).abs();
            match best {
                Some((_, best_distance)) if distance >= best_distance => {}
                _ => best = Some((id, distance)),
            }
        }
        let (id, best_distance) = best?;
        if let Some(dismissal_y) = dismissal {
            if (y - dismissal_y).abs() < best_distance {
                return None;
            }
        }
        Some(id)
    }

    /// The next detent one step toward the bottom of the screen (the next
    /// shorter one), or `None` when `id` is already the smallest or absent.
    pub fn next_smaller(&self, id: &DetentId) -> Option<&Detent> {
        let index = self.ordered_detents.iter().position(|d| &d.id == id)?;
        self.ordered_detents.get(index + 1)
    }

    /// Dimming intensity for a sheet top edge at `y`.
    ///
    /// Full dim at or above the smallest detent; below it, fades linearly
    /// over the sheet height toward the container bottom.
    pub fn dim_for_position(&self, y: f32, sheet_height: f32) -> DimState {
        let smallest_y = self.smallest_y();
        if y <= smallest_y {
            return DimState::Max;
        }
        if sheet_height <= 0.0 {
            return DimState::Off;
        }
        let displacement = y - smallest_y;
        DimState::Percent((1.0 - displacement / sheet_height).clamp(0.0, 1.0))
    }
}

#[cfg(test)]
#[path = "tests/layout_tests.rs"]
mod tests;
