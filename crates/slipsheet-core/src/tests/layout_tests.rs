use super::*;
use crate::detent::{Detent, DetentId, HeightSpec};
use crate::geometry::{ContainerMetrics, DimState, EdgeInsets};

fn medium_large() -> Vec<Detent> {
    vec![
        Detent::new("medium", HeightSpec::Fixed(200.0)),
        Detent::new("large", HeightSpec::Fixed(500.0)),
    ]
}

fn resolve(detents: &[Detent], metrics: &ContainerMetrics) -> ResolvedLayout {
    ResolvedLayout::recompute(
        detents,
        metrics,
        &TopOffsetPolicy::default(),
        &ContentMeasurements::default(),
        None,
    )
    .expect("non-empty detent set")
}

#[test]
fn fixed_detents_resolve_against_container_bottom() {
    // Container 800, no insets, top gap 18.
    let metrics = ContainerMetrics::new(400.0, 800.0);
    let layout = resolve(&medium_large(), &metrics);

    assert_eq!(layout.y_for(&DetentId::new("medium")), Some(618.0));
    assert_eq!(layout.y_for(&DetentId::new("large")), Some(318.0));

    let order: Vec<&str> = layout
        .ordered_detents()
        .iter()
        .map(|d| d.id.as_str())
        .collect();
    assert_eq!(order, ["large", "medium"]);
}

#[test]
fn every_configured_detent_gets_exactly_one_y_entry() {
    let metrics = ContainerMetrics::new(400.0, 800.0);
    let detents = vec![
        Detent::new("a", HeightSpec::Fixed(100.0)),
        Detent::new("b", HeightSpec::Fixed(300.0)),
        Detent::new("c", HeightSpec::MAX),
    ];
    let layout = resolve(&detents, &metrics);

    assert_eq!(layout.y_positions().len(), detents.len());
    for detent in layout.ordered_detents() {
        assert!(layout.y_for(&detent.id).is_some());
    }
}

#[test]
fn ordered_detents_sorted_ascending_by_y() {
    let metrics = ContainerMetrics::new(400.0, 800.0);
    let detents = vec![
        Detent::new("small", HeightSpec::Fixed(120.0)),
        Detent::new("full", HeightSpec::MAX),
        Detent::new("half", HeightSpec::Fixed(400.0)),
    ];
    let layout = resolve(&detents, &metrics);

    let ys: Vec<f32> = layout
        .ordered_detents()
        .iter()
        .map(|d| layout.y_for(&d.id).unwrap())
        .collect();
    assert!(ys.windows(2).all(|w| w[0] <= w[1]), "ys not ascending: {ys:?}");
    assert_eq!(layout.topmost().id.as_str(), "full");
    assert_eq!(layout.smallest().id.as_str(), "small");
}

#[test]
fn fixed_height_is_monotonically_decreasing_in_y() {
    let metrics = ContainerMetrics::new(400.0, 800.0);
    let measurements = ContentMeasurements::default();
    let mut previous = f32::INFINITY;
    for height in [50.0, 150.0, 300.0, 600.0] {
        let y = resolve_height_offset(HeightSpec::Fixed(height), &metrics, &measurements);
        assert!(y < previous, "taller content must sit higher on screen");
        previous = y;
    }
}

#[test]
fn anchored_y_is_a_lower_bound_for_all_positions() {
    let metrics = ContainerMetrics::new(400.0, 800.0).with_safe_area(EdgeInsets::vertical(44.0, 34.0));
    let detents = vec![
        Detent::new("tall", HeightSpec::MaxWithTopInset(0.0)),
        Detent::new("short", HeightSpec::Fixed(180.0)),
    ];
    let layout = resolve(&detents, &metrics);

    assert_eq!(layout.anchored_y(), 44.0 + DEFAULT_TOP_GAP);
    for (_, y) in layout.y_positions() {
        assert!(*y >= layout.anchored_y());
    }
}

#[test]
fn detents_never_resolve_above_the_top_anchor() {
    let metrics = ContainerMetrics::new(400.0, 300.0);
    // Fixed height taller than the container resolves to a negative raw
    // offset; the max() clamp pins it at the top anchor.
    let detents = vec![Detent::new("oversized", HeightSpec::Fixed(900.0))];
    let layout = resolve(&detents, &metrics);
    assert_eq!(layout.y_for(&DetentId::new("oversized")), Some(layout.anchored_y()));
}

#[test]
fn recompute_is_idempotent_for_unchanged_geometry() {
    let metrics = ContainerMetrics::new(400.0, 800.0);
    let detents = medium_large();
    let a = resolve(&detents, &metrics);
    let b = resolve(&detents, &metrics);
    assert_eq!(a, b);
}

#[test]
fn remembered_selection_survives_recompute_when_still_configured() {
    let metrics = ContainerMetrics::new(400.0, 800.0);
    let detents = medium_large();
    let remembered = DetentId::new("medium");
    let layout = ResolvedLayout::recompute(
        &detents,
        &metrics,
        &TopOffsetPolicy::default(),
        &ContentMeasurements::default(),
        Some(&remembered),
    )
    .unwrap();
    assert_eq!(layout.selected(), &remembered);
}

#[test]
fn stale_remembered_selection_falls_back_to_topmost() {
    let metrics = ContainerMetrics::new(400.0, 800.0);
    let detents = medium_large();
    let gone = DetentId::new("no-longer-configured");
    let layout = ResolvedLayout::recompute(
        &detents,
        &metrics,
        &TopOffsetPolicy::default(),
        &ContentMeasurements::default(),
        Some(&gone),
    )
    .unwrap();
    assert_eq!(layout.selected().as_str(), "large");
}

#[test]
fn empty_detent_set_degrades_to_none() {
    let metrics = ContainerMetrics::new(400.0, 800.0);
    assert!(ResolvedLayout::recompute(
        &[],
        &metrics,
        &TopOffsetPolicy::default(),
        &ContentMeasurements::default(),
        None,
    )
    .is_none());
}

#[test]
fn scroll_content_height_drives_fits_scroll_content() {
    let metrics = ContainerMetrics::new(400.0, 800.0).with_safe_area(EdgeInsets::vertical(0.0, 20.0));
    let measurements = ContentMeasurements {
        scroll_content_height: Some(500.0),
        scroll_top_inset: 10.0,
        intrinsic_height: None,
    };
    let y = resolve_height_offset(HeightSpec::FitsScrollContent, &metrics, &measurements);
    assert_eq!(y, 800.0 - (500.0 + 10.0 + 20.0));
}

#[test]
fn missing_scroll_region_falls_back_to_top_anchor() {
    let metrics = ContainerMetrics::new(400.0, 800.0);
    let y = resolve_height_offset(
        HeightSpec::FitsScrollContent,
        &metrics,
        &ContentMeasurements::default(),
    );
    assert_eq!(y, 0.0);
}

#[test]
fn content_delegates_on_scroll_region_presence() {
    let metrics = ContainerMetrics::new(400.0, 800.0);
    let with_scroll = ContentMeasurements {
        scroll_content_height: Some(300.0),
        scroll_top_inset: 0.0,
        intrinsic_height: Some(150.0),
    };
    let without_scroll = ContentMeasurements {
        scroll_content_height: None,
        scroll_top_inset: 0.0,
        intrinsic_height: Some(150.0),
    };
    assert_eq!(
        resolve_height_offset(HeightSpec::Content, &metrics, &with_scroll),
        resolve_height_offset(HeightSpec::FitsScrollContent, &metrics, &with_scroll),
    );
    assert_eq!(
        resolve_height_offset(HeightSpec::Content, &metrics, &without_scroll),
        resolve_height_offset(HeightSpec::FitsIntrinsicContent, &metrics, &without_scroll),
    );
}

#[test]
fn nearest_detent_prefers_first_configured_on_ties() {
    let metrics = ContainerMetrics::new(400.0, 800.0);
    // Same resolved height under two ids; configured order decides.
    let detents = vec![
        Detent::new("first", HeightSpec::Fixed(200.0)),
        Detent::new("second", HeightSpec::Fixed(200.0)),
    ];
    let layout = resolve(&detents, &metrics);
    assert_eq!(layout.nearest_detent(618.0, None).unwrap().as_str(), "first");
}

#[test]
fn nearest_detent_yields_to_a_closer_dismissal_target() {
    let metrics = ContainerMetrics::new(400.0, 800.0);
    let layout = resolve(&medium_large(), &metrics);

    // Near the bottom edge: dismissal (y=800) is nearer than medium (618).
    assert_eq!(layout.nearest_detent(760.0, Some(800.0)), None);
    // Near medium: the detent wins.
    assert_eq!(
        layout.nearest_detent(640.0, Some(800.0)).unwrap().as_str(),
        "medium"
    );
}

#[test]
fn next_smaller_walks_toward_the_bottom() {
    let metrics = ContainerMetrics::new(400.0, 800.0);
    let layout = resolve(&medium_large(), &metrics);

    let below_large = layout.next_smaller(&DetentId::new("large")).unwrap();
    assert_eq!(below_large.id.as_str(), "medium");
    assert!(layout.next_smaller(&DetentId::new("medium")).is_none());
    assert!(layout.next_smaller(&DetentId::new("absent")).is_none());
}

#[test]
fn dim_is_full_above_smallest_and_fades_below() {
    let metrics = ContainerMetrics::new(400.0, 800.0);
    let layout = resolve(&medium_large(), &metrics);
    let smallest_y = layout.smallest_y();

    assert_eq!(layout.dim_for_position(smallest_y, 800.0), DimState::Max);
    assert_eq!(layout.dim_for_position(smallest_y - 50.0, 800.0), DimState::Max);

    match layout.dim_for_position(smallest_y + 400.0, 800.0) {
        DimState::Percent(p) => assert!((p - 0.5).abs() < 1e-6),
        other => panic!("expected partial dim, got {other:?}"),
    }
}
