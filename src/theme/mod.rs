//! Window-chrome theme compositing
//!
//! Frames the content in a simulated application window: the stream shrinks
//! by the theme's padding fraction, optionally gains a title bar with the
//! three indicator dots, gets rounded corners via a per-pixel alpha mask, and
//! is composited (with an optional drop shadow) onto a solid background.

use tracing::debug;

use crate::domain::model::ThemeSpec;
use crate::error::DemoReelResult;
use crate::filter::{FilterGraph, FilterNode, FilterOp};

/// Title bar height in pixels when the theme requests one
pub const TITLE_BAR_HEIGHT: u32 = 40;
/// Shadow offset relative to the window, both axes
const SHADOW_OFFSET: u32 = 14;
const SHADOW_OPACITY: f64 = 0.45;
const SHADOW_BLUR_SIGMA: f64 = 16.0;

/// Derived window geometry, all dimensions even.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowGeometry {
    /// Scaled content width
    pub content_width: u32,
    /// Scaled content height, derived from the width via the output aspect
    /// ratio so the content is never distorted
    pub content_height: u32,
    /// Title bar height (0 when absent)
    pub bar_height: u32,
    /// Full window height: content plus bar
    pub window_height: u32,
}

/// Compute the centered window region for the given output size and theme.
///
/// The content shrinks by `2 * padding` relative to the output; width and
/// height are forced even as required by chroma subsampling downstream.
pub fn window_geometry(output_width: u32, output_height: u32, theme: &ThemeSpec) -> WindowGeometry {
    let content_width = even(((output_width as f64) * (1.0 - 2.0 * theme.padding)) as u32);
    // Height follows from the width and the original aspect ratio
    let aspect = output_height as f64 / output_width as f64;
    let content_height = even((content_width as f64 * aspect) as u32);
    let bar_height = if theme.title_bar { TITLE_BAR_HEIGHT } else { 0 };
    WindowGeometry {
        content_width,
        content_height,
        bar_height,
        window_height: content_height + bar_height,
    }
}

fn even(v: u32) -> u32 {
    v & !1
}

/// Build the theme fragment from `input_label` to `output_label`.
pub fn build_theme(
    input_label: &str,
    output_label: &str,
    output_width: u32,
    output_height: u32,
    theme: &ThemeSpec,
) -> DemoReelResult<FilterGraph> {
    let geo = window_geometry(output_width, output_height, theme);
    debug!(
        "Theme window: {}x{} content, {}px bar, radius {}",
        geo.content_width, geo.content_height, geo.bar_height, theme.corner_radius
    );

    let mut graph = FilterGraph::new();

    // Scale content into the window region
    graph.push(FilterNode::new(
        FilterOp::Scale {
            width: geo.content_width,
            height: geo.content_height,
        },
        vec![input_label.to_string()],
        "thcontent",
    ))?;

    // Stack the title bar above the content, or use the content directly
    let window_label = if theme.title_bar {
        graph.push(FilterNode::source(
            FilterOp::TitleBar {
                color: theme.bar_color.clone(),
                width: geo.content_width,
                height: geo.bar_height,
            },
            "thbar",
        ))?;
        graph.push(FilterNode::new(
            FilterOp::VStackPair,
            vec!["thbar".to_string(), "thcontent".to_string()],
            "thwindow",
        ))?;
        "thwindow"
    } else {
        "thcontent"
    };

    // Rounded corners: pixels outside the inscribed circle in any of the four
    // corner regions go fully transparent
    let rounded_label = if theme.corner_radius > 0 {
        graph.push(FilterNode::new(
            FilterOp::RoundedCorners {
                radius: theme.corner_radius,
            },
            vec![window_label.to_string()],
            "throunded",
        ))?;
        "throunded"
    } else {
        window_label
    };

    // Background canvas at the full output size
    graph.push(FilterNode::source(
        FilterOp::ColorSource {
            color: theme.background.clone(),
            width: output_width,
            height: output_height,
        },
        "thbg",
    ))?;

    let centered_x = "(W-w)/2".to_string();
    let centered_y = "(H-h)/2".to_string();

    if theme.shadow {
        // Blurred dark duplicate of the window shape beneath the sharp window
        graph.push(FilterNode {
            op: FilterOp::Split2,
            inputs: vec![rounded_label.to_string()],
            outputs: vec!["thshadowsrc".to_string(), "thsharp".to_string()],
        })?;
        graph.push(FilterNode::new(
            FilterOp::ShadowTint {
                opacity: SHADOW_OPACITY,
                blur_sigma: SHADOW_BLUR_SIGMA,
            },
            vec!["thshadowsrc".to_string()],
            "thshadow",
        ))?;
        graph.push(FilterNode::new(
            FilterOp::OverlayAt {
                x: format!("(W-w)/2+{}", SHADOW_OFFSET),
                y: format!("(H-h)/2+{}", SHADOW_OFFSET),
            },
            vec!["thbg".to_string(), "thshadow".to_string()],
            "thbgshadow",
        ))?;
        graph.push(FilterNode::new(
            FilterOp::OverlayAt {
                x: centered_x,
                y: centered_y,
            },
            vec!["thbgshadow".to_string(), "thsharp".to_string()],
            output_label,
        ))?;
    } else {
        graph.push(FilterNode::new(
            FilterOp::OverlayAt {
                x: centered_x,
                y: centered_y,
            },
            vec!["thbg".to_string(), rounded_label.to_string()],
            output_label,
        ))?;
    }

    Ok(graph)
}
