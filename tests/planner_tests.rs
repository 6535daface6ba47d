//! End-to-end timeline planning tests
//!
//! Exercises the documented timeline properties: cross-fade offsets, total
//! duration, override precedence, and the shape of the generated graph.

use demoreel::domain::model::{TransitionSpec, TransitionStyle};
use demoreel::filter::{FilterOp, MERGED_VIDEO_LABEL};
use demoreel::planner::{compute_total_duration, plan_boundaries, plan_transitions};

fn fade(duration: f64) -> TransitionSpec {
    TransitionSpec::new(TransitionStyle::Fade, duration).unwrap()
}

#[test]
fn global_fade_timeline_has_expected_offsets_and_total() {
    let durations = [5.0, 4.0, 3.0];
    let global = Some(fade(0.5));

    let boundaries = plan_boundaries(&durations, global, &[]);
    assert_eq!(boundaries.len(), 2);
    assert_eq!(boundaries[0].offset, Some(4.5));
    assert_eq!(boundaries[1].offset, Some(8.0));

    // Merged stream length: sum of segments minus the overlapped fades
    assert_eq!(compute_total_duration(&durations, global, &[]), 11.0);

    let graph = plan_transitions(&durations, global, &[]).unwrap().unwrap();
    assert_eq!(
        graph.count_ops(|op| matches!(op, FilterOp::CrossFade { .. })),
        2
    );
    assert_eq!(graph.output_label(), Some(MERGED_VIDEO_LABEL));
}

#[test]
fn partial_overrides_mix_fades_and_hard_cuts() {
    let durations = [5.0, 4.0, 3.0, 2.0];
    let overrides = [Some(fade(0.5)), None, None];

    let graph = plan_transitions(&durations, None, &overrides)
        .unwrap()
        .unwrap();
    assert_eq!(
        graph.count_ops(|op| matches!(op, FilterOp::CrossFade { .. })),
        1
    );
    assert_eq!(graph.count_ops(|op| matches!(op, FilterOp::ConcatPair)), 2);

    // Only the faded boundary shortens the timeline
    assert_eq!(
        compute_total_duration(&durations, None, &overrides),
        13.5
    );
}

#[test]
fn override_beats_global_at_its_boundary() {
    let durations = [5.0, 4.0, 3.0];
    let global = Some(fade(0.5));
    let overrides = [Some(TransitionSpec::new(TransitionStyle::WipeLeft, 1.0).unwrap()), None];

    let boundaries = plan_boundaries(&durations, global, &overrides);
    let first = boundaries[0].transition.unwrap();
    assert_eq!(first.style, TransitionStyle::WipeLeft);
    assert_eq!(first.duration, 1.0);
    // Boundary without an override falls back to the global spec
    let second = boundaries[1].transition.unwrap();
    assert_eq!(second.style, TransitionStyle::Fade);
}

#[test]
fn transition_longer_than_segment_clamps_offset() {
    // A 2s fade out of a 1s opening segment cannot start before zero
    let durations = [1.0, 4.0];
    let boundaries = plan_boundaries(&durations, Some(fade(2.0)), &[]);
    assert_eq!(boundaries[0].offset, Some(0.0));
}

#[test]
fn no_transitions_anywhere_yields_no_graph() {
    assert!(plan_transitions(&[5.0, 4.0, 3.0], None, &[])
        .unwrap()
        .is_none());
    assert!(plan_transitions(&[5.0], Some(fade(0.5)), &[])
        .unwrap()
        .is_none());
}

#[test]
fn total_duration_never_goes_negative() {
    let durations = [0.3, 0.3];
    assert_eq!(compute_total_duration(&durations, Some(fade(5.0)), &[]), 0.0);
}
