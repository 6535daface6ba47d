//! Encode orchestration
//!
//! Composes the normalize/transition/subtitle/overlay/theme fragments into
//! one filter graph per render, then invokes the external encode command once
//! per requested output format with format-specific codec parameters. Graph
//! construction is pure and shared across formats; only codec arguments and
//! the destination differ per invocation.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::Utc;
use serde::Serialize;
use tracing::{error, info, warn};

use crate::config::ProjectConfig;
use crate::domain::model::{OutputArtifact, OutputFormat};
use crate::domain::rules::RenderRules;
use crate::error::{DemoReelError, DemoReelResult};
use crate::filter::{FilterGraph, FilterNode, FilterOp, FINAL_VIDEO_LABEL, MERGED_VIDEO_LABEL};
use crate::overlay::build_overlay;
use crate::planner::{compute_total_duration, plan_boundaries, plan_transitions, BoundaryResolution};
use crate::subtitle::build_burn_filter;
use crate::theme::build_theme;
use crate::timing::SegmentTimeline;
use crate::utils::format_file_size;
use crate::utils::time::format_duration;

/// Output label of the theme stage when a theme is configured.
const THEMED_VIDEO_LABEL: &str = "vthemed";

/// The shared filter graph plus the label the encoder should map.
#[derive(Debug, Clone, Serialize)]
pub struct RenderGraph {
    pub graph: FilterGraph,
    /// Final video stream label to `-map`
    pub final_label: String,
}

/// Resolved timeline summary for dry runs and diagnostics.
#[derive(Debug, Clone, Serialize)]
pub struct RenderPlan {
    pub segment_durations: Vec<f64>,
    pub boundaries: Vec<BoundaryResolution>,
    pub total_duration: f64,
    /// Serialized `-filter_complex` description
    pub filtergraph: String,
    pub final_label: String,
}

/// Build the complete shared filter graph for one render.
///
/// Stages, in order: per-input normalization, transition-or-concat merge,
/// optional subtitle burn, overlay (always present, pass-through when empty),
/// optional theme framing. The overlay always produces the canonical final
/// label; the theme, when configured, consumes it and produces its own, which
/// then becomes the label the encoder maps.
pub fn build_render_graph(
    config: &ProjectConfig,
    timeline: &SegmentTimeline,
    captions: Option<&Path>,
) -> DemoReelResult<RenderGraph> {
    let durations = timeline.durations();
    let mut graph = FilterGraph::new();

    // Normalize every raw input to the shared geometry
    for i in 0..durations.len() {
        graph.push(FilterNode::new(
            FilterOp::Normalize {
                width: config.output.width,
                height: config.output.height,
                fps: config.output.fps,
            },
            vec![format!("{}:v", i)],
            format!("v{}", i),
        ))?;
    }

    // Merge segments into one stream
    match plan_transitions(
        &durations,
        config.global_transition,
        &config.boundary_transitions,
    )? {
        Some(transition_graph) => graph.extend(transition_graph)?,
        None if durations.len() >= 2 => {
            // No transitions anywhere: plain n-ary concatenation
            graph.push(FilterNode::new(
                FilterOp::ConcatAll { n: durations.len() },
                (0..durations.len()).map(|i| format!("v{}", i)).collect(),
                MERGED_VIDEO_LABEL,
            ))?;
        }
        None => {
            // One segment: its own stream is the merged stream
            graph.push(FilterNode::new(
                FilterOp::PassThrough,
                vec!["v0".to_string()],
                MERGED_VIDEO_LABEL,
            ))?;
        }
    }

    // Optional subtitle burn between merge and overlay
    let overlay_input = match (captions, &config.subtitles) {
        (Some(path), Some(style)) => {
            graph.push(build_burn_filter(path, MERGED_VIDEO_LABEL, "vsub", style.clone()))?;
            "vsub"
        }
        _ => MERGED_VIDEO_LABEL,
    };

    // Overlay always emits the canonical final label
    graph.extend(build_overlay(&config.overlay, overlay_input, FINAL_VIDEO_LABEL)?)?;

    // Optional theme framing consumes the final label
    let final_label = match &config.theme {
        Some(theme) => {
            graph.extend(build_theme(
                FINAL_VIDEO_LABEL,
                THEMED_VIDEO_LABEL,
                config.output.width,
                config.output.height,
                theme,
            )?)?;
            THEMED_VIDEO_LABEL
        }
        None => FINAL_VIDEO_LABEL,
    };

    Ok(RenderGraph {
        graph,
        final_label: final_label.to_string(),
    })
}

/// Build the dry-run plan: timeline resolution plus the serialized graph.
pub fn build_render_plan(
    config: &ProjectConfig,
    timeline: &SegmentTimeline,
    captions: Option<&Path>,
) -> DemoReelResult<RenderPlan> {
    let durations = timeline.durations();
    let render_graph = build_render_graph(config, timeline, captions)?;
    Ok(RenderPlan {
        boundaries: plan_boundaries(
            &durations,
            config.global_transition,
            &config.boundary_transitions,
        ),
        total_duration: compute_total_duration(
            &durations,
            config.global_transition,
            &config.boundary_transitions,
        ),
        segment_durations: durations,
        filtergraph: render_graph.graph.serialize(),
        final_label: render_graph.final_label,
    })
}

/// Build the full encoder argument list for one output format.
///
/// Input order is the segment order (each with its trim offset as a fast
/// input seek), then the optional audio track last. With audio present,
/// `-shortest` clamps the output to the shorter of video and audio.
pub fn build_encode_args(
    config: &ProjectConfig,
    render_graph: &RenderGraph,
    format: OutputFormat,
    output_path: &Path,
) -> Vec<String> {
    let mut args: Vec<String> = vec!["-y".into()];

    for segment in &config.segments {
        if segment.trim_offset > 0.0 {
            args.push("-ss".into());
            args.push(format!("{:.3}", segment.trim_offset));
        }
        args.push("-i".into());
        args.push(segment.recording.to_string_lossy().into_owned());
    }

    let audio_input_index = config.segments.len();
    if let Some(track) = &config.audio_track {
        args.push("-i".into());
        args.push(track.to_string_lossy().into_owned());
    }

    args.push("-filter_complex".into());
    args.push(render_graph.graph.serialize());
    args.push("-map".into());
    args.push(format!("[{}]", render_graph.final_label));

    if config.audio_track.is_some() {
        args.push("-map".into());
        args.push(format!("{}:a", audio_input_index));
        args.push("-shortest".into());
    }

    match format {
        OutputFormat::Mp4 => {
            args.extend(
                [
                    "-c:v",
                    "libx264",
                    "-preset",
                    "medium",
                    "-crf",
                    "23",
                    "-pix_fmt",
                    "yuv420p",
                    "-movflags",
                    "+faststart",
                ]
                .map(String::from),
            );
            if config.audio_track.is_some() {
                args.extend(["-c:a", "aac", "-b:a", "192k"].map(String::from));
            }
        }
        OutputFormat::Webm => {
            args.extend(["-c:v", "libvpx-vp9", "-crf", "32", "-b:v", "0"].map(String::from));
            if config.audio_track.is_some() {
                args.extend(["-c:a", "libopus", "-b:a", "128k"].map(String::from));
            }
        }
    }

    args.push(output_path.to_string_lossy().into_owned());
    args
}

/// Result of one render: artifacts produced plus per-format failures.
///
/// A failed format never invalidates artifacts already written, but the
/// failures are surfaced here rather than silently dropped.
#[derive(Debug)]
pub struct RenderOutcome {
    pub artifacts: Vec<OutputArtifact>,
    pub failures: Vec<DemoReelError>,
}

impl RenderOutcome {
    pub fn all_succeeded(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Capability contract for turning a validated project into artifacts.
///
/// The filter-graph pipeline is the shipped implementation; alternative
/// compositing backends plug in here without touching the orchestration.
#[async_trait]
pub trait Renderer: Send + Sync {
    async fn render(
        &self,
        config: &ProjectConfig,
        timeline: &SegmentTimeline,
        captions: Option<&Path>,
    ) -> DemoReelResult<RenderOutcome>;
}

/// Renderer driving the external encode command with a shared filter graph.
pub struct FilterGraphRenderer<R> {
    runner: R,
}

impl<R: crate::ports::EncodeRunner> FilterGraphRenderer<R> {
    pub fn new(runner: R) -> Self {
        Self { runner }
    }
}

#[async_trait]
impl<R: crate::ports::EncodeRunner> Renderer for FilterGraphRenderer<R> {
    async fn render(
        &self,
        config: &ProjectConfig,
        timeline: &SegmentTimeline,
        captions: Option<&Path>,
    ) -> DemoReelResult<RenderOutcome> {
        RenderRules::validate_segments(&config.segments)?;
        RenderRules::validate_formats(&config.output.formats)?;

        let durations = timeline.durations();
        let total = compute_total_duration(
            &durations,
            config.global_transition,
            &config.boundary_transitions,
        );
        info!(
            "Rendering '{}': {} segments, {} output duration",
            config.name,
            durations.len(),
            format_duration(total)
        );

        let render_graph = build_render_graph(config, timeline, captions)?;
        std::fs::create_dir_all(&config.output.directory)?;

        let mut artifacts = Vec::new();
        let mut failures = Vec::new();

        for &format in &config.output.formats {
            let output_path = output_file(config, format);
            let args = build_encode_args(config, &render_graph, format, &output_path);

            match self.runner.run(format.extension(), &args).await {
                Ok(()) => {
                    let size_bytes = std::fs::metadata(&output_path).map(|m| m.len()).unwrap_or(0);
                    info!(
                        "Wrote {} ({})",
                        output_path.display(),
                        format_file_size(size_bytes)
                    );
                    artifacts.push(OutputArtifact {
                        path: output_path,
                        format,
                        size_bytes,
                        created_at: Utc::now(),
                    });
                }
                Err(e) => {
                    // Fatal for this format only; earlier artifacts stand
                    error!("{} encode failed: {}", format.extension(), e);
                    failures.push(e);
                }
            }
        }

        if !failures.is_empty() {
            warn!(
                "{} of {} formats failed",
                failures.len(),
                config.output.formats.len()
            );
        }

        Ok(RenderOutcome {
            artifacts,
            failures,
        })
    }
}

fn output_file(config: &ProjectConfig, format: OutputFormat) -> PathBuf {
    let stem: String = config
        .name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c.to_ascii_lowercase()
            } else {
                '_'
            }
        })
        .collect();
    config
        .output
        .directory
        .join(format!("{}.{}", stem, format.extension()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RenderSettings;
    use crate::domain::model::*;

    fn test_config(segment_count: usize) -> ProjectConfig {
        let segments = (0..segment_count)
            .map(|i| Segment::new(format!("page{}", i), format!("/rec/page{}.mp4", i), 0.0))
            .collect();
        ProjectConfig {
            name: "test demo".to_string(),
            output: RenderSettings {
                width: 1280,
                height: 720,
                fps: 30,
                formats: vec![OutputFormat::Mp4],
                directory: PathBuf::from("/tmp/out"),
            },
            segments,
            global_transition: None,
            boundary_transitions: Vec::new(),
            overlay: OverlaySpec::default(),
            subtitles: None,
            theme: None,
            audio_track: None,
        }
    }

    #[test]
    fn test_single_segment_graph() {
        let config = test_config(1);
        let timeline = SegmentTimeline::from_durations(&[5.0]);
        let rg = build_render_graph(&config, &timeline, None).unwrap();
        // Normalize, pass-through to merged, overlay pass-through to final
        assert_eq!(rg.final_label, FINAL_VIDEO_LABEL);
        assert_eq!(
            rg.graph.count_ops(|op| matches!(op, FilterOp::CrossFade { .. })),
            0
        );
        assert_eq!(
            rg.graph.count_ops(|op| matches!(op, FilterOp::Normalize { .. })),
            1
        );
    }

    #[test]
    fn test_hard_cut_timeline_uses_nary_concat() {
        let config = test_config(3);
        let timeline = SegmentTimeline::from_durations(&[5.0, 4.0, 3.0]);
        let rg = build_render_graph(&config, &timeline, None).unwrap();
        assert_eq!(
            rg.graph
                .count_ops(|op| matches!(op, FilterOp::ConcatAll { n: 3 })),
            1
        );
    }

    #[test]
    fn test_transition_timeline_end_to_end() {
        let mut config = test_config(3);
        config.global_transition =
            Some(TransitionSpec::new(TransitionStyle::Fade, 0.5).unwrap());
        let timeline = SegmentTimeline::from_durations(&[5.0, 4.0, 3.0]);
        let rg = build_render_graph(&config, &timeline, None).unwrap();

        assert_eq!(
            rg.graph.count_ops(|op| matches!(op, FilterOp::CrossFade { .. })),
            2
        );
        // First fade starts at 4.5s into the merged head stream
        let first_fade = rg
            .graph
            .nodes()
            .iter()
            .find_map(|n| match n.op {
                FilterOp::CrossFade { offset, .. } => Some(offset),
                _ => None,
            })
            .unwrap();
        assert_eq!(first_fade, 4.5);
        assert_eq!(
            compute_total_duration(&[5.0, 4.0, 3.0], config.global_transition, &[]),
            11.0
        );
    }

    #[test]
    fn test_theme_shifts_final_label() {
        let mut config = test_config(2);
        config.theme = Some(ThemeSpec::named("midnight").unwrap());
        let timeline = SegmentTimeline::from_durations(&[5.0, 4.0]);
        let rg = build_render_graph(&config, &timeline, None).unwrap();
        assert_eq!(rg.final_label, THEMED_VIDEO_LABEL);
        // Overlay still produced the canonical label along the way
        assert!(rg.graph.serialize().contains(&format!("[{}]", FINAL_VIDEO_LABEL)));
    }

    #[test]
    fn test_encode_args_mp4_shape() {
        let config = test_config(2);
        let timeline = SegmentTimeline::from_durations(&[5.0, 4.0]);
        let rg = build_render_graph(&config, &timeline, None).unwrap();
        let args = build_encode_args(&config, &rg, OutputFormat::Mp4, Path::new("/tmp/out/demo.mp4"));

        assert_eq!(args.iter().filter(|a| *a == "-i").count(), 2);
        assert!(args.contains(&"-filter_complex".to_string()));
        assert!(args.contains(&format!("[{}]", FINAL_VIDEO_LABEL)));
        assert!(args.contains(&"libx264".to_string()));
        assert!(args.contains(&"+faststart".to_string()));
        assert!(!args.contains(&"-shortest".to_string()));
        assert_eq!(args.last().unwrap(), "/tmp/out/demo.mp4");
    }

    #[test]
    fn test_encode_args_trim_offsets_are_input_seeks() {
        let mut config = test_config(2);
        config.segments[1].trim_offset = 2.25;
        let timeline = SegmentTimeline::from_durations(&[5.0, 4.0]);
        let rg = build_render_graph(&config, &timeline, None).unwrap();
        let args = build_encode_args(&config, &rg, OutputFormat::Mp4, Path::new("/tmp/x.mp4"));

        let ss_pos = args.iter().position(|a| a == "-ss").unwrap();
        assert_eq!(args[ss_pos + 1], "2.250");
        // The seek precedes its input
        assert_eq!(args[ss_pos + 2], "-i");
    }

    #[test]
    fn test_encode_args_audio_mapping_and_shortest() {
        let mut config = test_config(2);
        config.audio_track = Some(PathBuf::from("/audio/narration.mp3"));
        let timeline = SegmentTimeline::from_durations(&[5.0, 4.0]);
        let rg = build_render_graph(&config, &timeline, None).unwrap();
        let args = build_encode_args(&config, &rg, OutputFormat::Mp4, Path::new("/tmp/x.mp4"));

        // Audio is the third input (index 2) and gets -shortest clamping
        assert!(args.contains(&"2:a".to_string()));
        assert!(args.contains(&"-shortest".to_string()));
        assert!(args.contains(&"aac".to_string()));
    }

    #[test]
    fn test_encode_args_webm_codecs() {
        let config = test_config(1);
        let timeline = SegmentTimeline::from_durations(&[5.0]);
        let rg = build_render_graph(&config, &timeline, None).unwrap();
        let args = build_encode_args(&config, &rg, OutputFormat::Webm, Path::new("/tmp/x.webm"));
        assert!(args.contains(&"libvpx-vp9".to_string()));
        assert!(!args.contains(&"libx264".to_string()));
    }

    #[test]
    fn test_graph_is_deterministic() {
        let mut config = test_config(3);
        config.global_transition =
            Some(TransitionSpec::new(TransitionStyle::Dissolve, 1.0).unwrap());
        let timeline = SegmentTimeline::from_durations(&[5.0, 4.0, 3.0]);
        let a = build_render_graph(&config, &timeline, None).unwrap();
        let b = build_render_graph(&config, &timeline, None).unwrap();
        assert_eq!(a.graph.serialize(), b.graph.serialize());
    }

    #[test]
    fn test_render_plan_summarizes_timeline() {
        let mut config = test_config(3);
        config.global_transition =
            Some(TransitionSpec::new(TransitionStyle::Fade, 0.5).unwrap());
        let timeline = SegmentTimeline::from_durations(&[5.0, 4.0, 3.0]);
        let plan = build_render_plan(&config, &timeline, None).unwrap();
        assert_eq!(plan.total_duration, 11.0);
        assert_eq!(plan.boundaries.len(), 2);
        assert!(plan.filtergraph.contains("xfade"));
    }
}
