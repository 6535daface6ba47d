//! Text band overlays
//!
//! Composites optional semi-transparent top/bottom bands with centered text
//! onto the video. When nothing is configured a pass-through node keeps the
//! label chain intact so downstream stages never special-case "no overlay".

use tracing::debug;

use crate::domain::model::OverlaySpec;
use crate::error::DemoReelResult;
use crate::filter::{BandAnchor, FilterGraph, FilterNode, FilterOp};

/// Build the overlay fragment from `input_label` to `output_label`.
///
/// The output label is fixed by the caller and never varies with which bands
/// are present: zero bands emit a pass-through, one band one node, two bands
/// a two-node chain through an intermediate label.
pub fn build_overlay(
    spec: &OverlaySpec,
    input_label: &str,
    output_label: &str,
) -> DemoReelResult<FilterGraph> {
    let mut graph = FilterGraph::new();

    if spec.is_empty() {
        graph.push(FilterNode::new(
            FilterOp::PassThrough,
            vec![input_label.to_string()],
            output_label,
        ))?;
        return Ok(graph);
    }

    debug!(
        "Overlay: top={} bottom={}",
        spec.top.is_some(),
        spec.bottom.is_some()
    );

    let mut current = input_label.to_string();
    let both = spec.top.is_some() && spec.bottom.is_some();

    if let Some(band) = &spec.top {
        let out = if both {
            "votop".to_string()
        } else {
            output_label.to_string()
        };
        graph.push(FilterNode::new(
            FilterOp::TextBand {
                anchor: BandAnchor::Top,
                height: band.height,
                font_size: band.font_size,
                text: band.text.clone(),
            },
            vec![current],
            out.clone(),
        ))?;
        current = out;
    }

    if let Some(band) = &spec.bottom {
        graph.push(FilterNode::new(
            FilterOp::TextBand {
                anchor: BandAnchor::Bottom,
                height: band.height,
                font_size: band.font_size,
                text: band.text.clone(),
            },
            vec![current],
            output_label,
        ))?;
    }

    Ok(graph)
}
