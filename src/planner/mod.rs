//! Transition planning across segment boundaries
//!
//! For N segments there are exactly N-1 boundaries. Each boundary resolves
//! its effective transition independently: per-boundary override if present,
//! else the global spec, else a hard cut. The planner emits the cross-fade /
//! concat chain as typed filter nodes and computes the total output duration;
//! both derive from the same resolved specs so they agree exactly.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::model::TransitionSpec;
use crate::error::DemoReelResult;
use crate::filter::{FilterGraph, FilterNode, FilterOp, MERGED_VIDEO_LABEL};

/// One boundary's resolved transition and, for cross-fades, its time offset
/// on the first input's timeline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundaryResolution {
    /// Boundary index; boundary i sits between segments i and i+1
    pub boundary: usize,
    /// Effective spec after override resolution; `None` is a hard cut
    pub transition: Option<TransitionSpec>,
    /// Cross-fade start offset in seconds, clamped at zero
    pub offset: Option<f64>,
}

/// Resolve the effective transition spec at every boundary.
///
/// The override list may be shorter than the boundary count; missing tail
/// entries fall back to the global spec like any other `None`.
pub fn resolve_boundary_specs(
    segment_count: usize,
    global: Option<TransitionSpec>,
    per_boundary: &[Option<TransitionSpec>],
) -> Vec<Option<TransitionSpec>> {
    let boundaries = segment_count.saturating_sub(1);
    (0..boundaries)
        .map(|i| per_boundary.get(i).copied().flatten().or(global))
        .collect()
}

/// Resolve every boundary with its cross-fade offset.
///
/// The offset for boundary i is the cumulative sum of the original segment
/// durations through segment i, minus every transition duration applied at
/// boundaries up to and including i, clamped at zero. Each cross-fade
/// shortens the effective timeline by its own duration; when a segment is
/// shorter than its outgoing transition the offset clamps to zero and the
/// remainder is consumed from the next segment's running total.
pub fn plan_boundaries(
    durations: &[f64],
    global: Option<TransitionSpec>,
    per_boundary: &[Option<TransitionSpec>],
) -> Vec<BoundaryResolution> {
    let specs = resolve_boundary_specs(durations.len(), global, per_boundary);
    let mut resolutions = Vec::with_capacity(specs.len());

    // Effective end of the current merged stream on the output timeline.
    // Deliberately not clamped between boundaries: a deficit carries into the
    // next segment's running total.
    let mut running = 0.0_f64;

    for (i, spec) in specs.into_iter().enumerate() {
        running += durations[i];
        let offset = spec.map(|s| {
            let at = (running - s.duration).max(0.0);
            running -= s.duration;
            at
        });
        resolutions.push(BoundaryResolution {
            boundary: i,
            transition: spec,
            offset,
        });
    }
    resolutions
}

/// Build the cross-fade/concat chain merging all segment streams.
///
/// Returns `None` when fewer than two segments exist, or when no boundary has
/// a transition configured; the caller then uses plain n-ary concatenation
/// (or, for a single segment, binds that stream to the merged label directly).
///
/// Consumes labels `v0..v{n-1}` and produces [`MERGED_VIDEO_LABEL`].
/// Boundary 0 merges inputs 0 and 1 into an intermediate label; boundary i
/// merges the previous intermediate with input i+1. Hard-cut boundaries use
/// binary concat nodes under the identical chaining discipline, so fades and
/// cuts mix freely.
pub fn plan_transitions(
    durations: &[f64],
    global: Option<TransitionSpec>,
    per_boundary: &[Option<TransitionSpec>],
) -> DemoReelResult<Option<FilterGraph>> {
    if durations.len() < 2 {
        return Ok(None);
    }
    if resolve_boundary_specs(durations.len(), global, per_boundary)
        .iter()
        .all(Option::is_none)
    {
        return Ok(None);
    }

    let resolutions = plan_boundaries(durations, global, per_boundary);
    let mut graph = FilterGraph::new();
    let mut prev_label = "v0".to_string();
    let last = resolutions.len() - 1;

    for res in &resolutions {
        let next_input = format!("v{}", res.boundary + 1);
        let out_label = if res.boundary == last {
            MERGED_VIDEO_LABEL.to_string()
        } else {
            format!("xf{}", res.boundary + 1)
        };

        let op = match (res.transition, res.offset) {
            (Some(spec), Some(offset)) => {
                debug!(
                    "Boundary {}: {} fade {:.3}s at offset {:.3}s",
                    res.boundary, spec.style, spec.duration, offset
                );
                FilterOp::CrossFade {
                    style: spec.style,
                    duration: spec.duration,
                    offset,
                }
            }
            _ => {
                debug!("Boundary {}: hard cut", res.boundary);
                FilterOp::ConcatPair
            }
        };

        graph.push(FilterNode::new(
            op,
            vec![prev_label.clone(), next_input],
            out_label.clone(),
        ))?;
        prev_label = out_label;
    }

    Ok(Some(graph))
}

/// Total output duration: sum of segment durations minus the effective
/// transition duration at every boundary, floored at zero.
///
/// Agrees exactly with the timeline implied by [`plan_boundaries`]' offset
/// math; both are derived from the same resolved specs.
pub fn compute_total_duration(
    durations: &[f64],
    global: Option<TransitionSpec>,
    per_boundary: &[Option<TransitionSpec>],
) -> f64 {
    let sum: f64 = durations.iter().sum();
    let overlap: f64 = resolve_boundary_specs(durations.len(), global, per_boundary)
        .iter()
        .filter_map(|s| s.map(|spec| spec.duration))
        .sum();
    (sum - overlap).max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::TransitionStyle;

    fn fade(duration: f64) -> TransitionSpec {
        TransitionSpec::new(TransitionStyle::Fade, duration).unwrap()
    }

    #[test]
    fn test_single_segment_plans_nothing() {
        let graph = plan_transitions(&[5.0], Some(fade(0.5)), &[]).unwrap();
        assert!(graph.is_none());
        assert_eq!(compute_total_duration(&[5.0], Some(fade(0.5)), &[]), 5.0);
    }

    #[test]
    fn test_global_fade_chain() {
        let durations = [5.0, 4.0, 3.0];
        let graph = plan_transitions(&durations, Some(fade(0.5)), &[])
            .unwrap()
            .unwrap();

        assert_eq!(
            graph.count_ops(|op| matches!(op, FilterOp::CrossFade { .. })),
            2
        );
        assert_eq!(graph.output_label(), Some(MERGED_VIDEO_LABEL));
        assert_eq!(compute_total_duration(&durations, Some(fade(0.5)), &[]), 11.0);
    }

    #[test]
    fn test_offsets_account_for_earlier_overlap() {
        let boundaries = plan_boundaries(&[5.0, 4.0, 3.0], Some(fade(0.5)), &[]);
        assert_eq!(boundaries[0].offset, Some(4.5));
        // 5 + 4 = 9 original, minus 0.5 already applied, minus this fade's 0.5
        assert_eq!(boundaries[1].offset, Some(8.0));
    }

    #[test]
    fn test_offset_and_total_agree() {
        let durations = [5.0, 4.0, 3.0];
        let boundaries = plan_boundaries(&durations, Some(fade(0.5)), &[]);
        let last = boundaries.last().unwrap();
        // Timeline implied by the last fade: offset + full remaining segment
        let implied = last.offset.unwrap() + durations[2];
        assert_eq!(
            implied,
            compute_total_duration(&durations, Some(fade(0.5)), &[])
        );
    }

    #[test]
    fn test_per_boundary_override_beats_global() {
        let per = vec![Some(fade(1.0))];
        let boundaries = plan_boundaries(&[5.0, 4.0, 3.0], Some(fade(0.5)), &per);
        assert_eq!(boundaries[0].transition.unwrap().duration, 1.0);
        // Global still applies at the other boundary
        assert_eq!(boundaries[1].transition.unwrap().duration, 0.5);
    }

    #[test]
    fn test_mixed_fade_and_hard_cut() {
        let per = vec![Some(fade(0.5)), None, None];
        let graph = plan_transitions(&[5.0, 4.0, 3.0], None, &per[..2])
            .unwrap()
            .unwrap();
        assert_eq!(
            graph.count_ops(|op| matches!(op, FilterOp::CrossFade { .. })),
            1
        );
        assert_eq!(
            graph.count_ops(|op| matches!(op, FilterOp::ConcatPair)),
            1
        );
    }

    #[test]
    fn test_no_transitions_returns_none() {
        // Pure hard cuts everywhere: the caller concatenates without a chain
        let graph = plan_transitions(&[5.0, 4.0], None, &[]).unwrap();
        assert!(graph.is_none());
        let graph = plan_transitions(&[5.0, 4.0, 3.0], None, &[None, None]).unwrap();
        assert!(graph.is_none());
    }

    #[test]
    fn test_hard_cut_boundary_keeps_full_durations() {
        let durations = [5.0, 4.0, 3.0];
        let per = vec![None, Some(fade(0.5))];
        assert_eq!(compute_total_duration(&durations, None, &per), 11.5);
        let boundaries = plan_boundaries(&durations, None, &per);
        assert_eq!(boundaries[0].offset, None);
        // Hard cut at boundary 0 applies no overlap before this fade
        assert_eq!(boundaries[1].offset, Some(8.5));
    }

    #[test]
    fn test_segment_shorter_than_transition_clamps_offset() {
        // Second segment (0.2s) is shorter than its outgoing 1s fade
        let boundaries = plan_boundaries(&[0.5, 0.2, 3.0], Some(fade(1.0)), &[]);
        assert_eq!(boundaries[0].offset, Some(0.0));
        // Deficit carried: 0.5 + 0.2 - 1.0 - 1.0 < 0 clamps again
        assert_eq!(boundaries[1].offset, Some(0.0));
    }

    #[test]
    fn test_total_duration_never_negative() {
        let total = compute_total_duration(&[0.5, 0.2, 0.1], Some(fade(5.0)), &[]);
        assert_eq!(total, 0.0);
    }

    #[test]
    fn test_intermediate_labels_chain() {
        let graph = plan_transitions(&[5.0, 4.0, 3.0, 2.0], Some(fade(0.5)), &[])
            .unwrap()
            .unwrap();
        let nodes = graph.nodes();
        assert_eq!(nodes[0].inputs, vec!["v0", "v1"]);
        assert_eq!(nodes[0].outputs, vec!["xf1"]);
        assert_eq!(nodes[1].inputs, vec!["xf1", "v2"]);
        assert_eq!(nodes[2].inputs, vec!["xf2", "v3"]);
        assert_eq!(nodes[2].outputs, vec![MERGED_VIDEO_LABEL]);
    }
}
