//! Command implementations

use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::adapters::{FfmpegEncodeRunner, FfprobeDurationProbe};
use crate::cli::args::{CaptionsArgs, PlanArgs, RenderArgs};
use crate::config::ProjectConfig;
use crate::domain::model::OutputFormat;
use crate::encode::{build_render_plan, FilterGraphRenderer, Renderer};
use crate::subtitle::{build_entries, write_srt};
use crate::timing::SegmentTimeline;
use crate::utils::time::format_duration;

/// Execute the render command
pub async fn render(args: RenderArgs) -> Result<()> {
    let mut config = load_project(&args.project)?;

    if let Some(dir) = args.output_dir {
        config.output.directory = dir;
    }
    if !args.format.is_empty() {
        config.output.formats = args
            .format
            .iter()
            .map(|tag| OutputFormat::parse(tag))
            .collect::<Result<Vec<_>, _>>()
            .context("Invalid --format value")?;
    }

    let timeline = resolve_timeline(&config).await?;

    let captions = if args.no_captions || config.subtitles.is_none() {
        None
    } else {
        write_captions(&config, &timeline)?
    };

    let renderer = FilterGraphRenderer::new(FfmpegEncodeRunner::new());
    let outcome = renderer
        .render(&config, &timeline, captions.as_deref())
        .await
        .context("Render failed")?;

    for artifact in &outcome.artifacts {
        info!("Artifact: {}", artifact.path.display());
    }

    if !outcome.all_succeeded() {
        let details: Vec<String> = outcome.failures.iter().map(|e| e.to_string()).collect();
        anyhow::bail!(
            "{} format(s) failed to encode:\n{}",
            outcome.failures.len(),
            details.join("\n")
        );
    }

    info!("Render completed: {} artifact(s)", outcome.artifacts.len());
    Ok(())
}

/// Execute the plan command
pub async fn plan(args: PlanArgs) -> Result<()> {
    let config = load_project(&args.project)?;
    let timeline = resolve_timeline(&config).await?;

    let captions_path = config.subtitles.as_ref().map(|_| captions_file(&config));
    let plan = build_render_plan(&config, &timeline, captions_path.as_deref())
        .context("Failed to build render plan")?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&plan)?);
        return Ok(());
    }

    println!("Project: {}", config.name);
    println!("Segments:");
    for (segment, duration) in config.segments.iter().zip(&plan.segment_durations) {
        println!("  {:<24} {}", segment.name, format_duration(*duration));
    }
    println!("Transitions:");
    if plan.boundaries.iter().all(|b| b.transition.is_none()) {
        println!("  (none, hard cuts)");
    }
    for boundary in &plan.boundaries {
        if let Some(spec) = &boundary.transition {
            println!(
                "  boundary {}: {} {:.3}s at offset {:.3}s",
                boundary.boundary,
                spec.style,
                spec.duration,
                boundary.offset.unwrap_or(0.0)
            );
        }
    }
    println!("Total duration: {}", format_duration(plan.total_duration));
    println!("Final stream: [{}]", plan.final_label);
    println!("Filter graph:\n  {}", plan.filtergraph.replace(';', ";\n  "));
    Ok(())
}

/// Execute the captions command
pub async fn captions(args: CaptionsArgs) -> Result<()> {
    let config = load_project(&args.project)?;
    let timeline = resolve_timeline(&config).await?;

    let entries = build_entries(&config.segments, &timeline.durations());
    if entries.is_empty() {
        warn!("No narrations in project, nothing to write");
        return Ok(());
    }

    let path = args.output.unwrap_or_else(|| captions_file(&config));
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    write_srt(&entries, &path).context("Failed to write caption file")?;
    info!("Wrote {} caption(s) to {}", entries.len(), path.display());
    Ok(())
}

fn load_project(path: &std::path::Path) -> Result<ProjectConfig> {
    info!("Loading project {}", path.display());
    ProjectConfig::load(path).with_context(|| format!("Failed to load {}", path.display()))
}

async fn resolve_timeline(config: &ProjectConfig) -> Result<SegmentTimeline> {
    let probe = FfprobeDurationProbe::new();
    let timeline = SegmentTimeline::resolve(&config.segments, &probe)
        .await
        .context("Failed to resolve segment durations")?;
    info!("Resolved {} segment duration(s)", timeline.len());
    Ok(timeline)
}

/// Generate captions for a render, if any segment carries narration.
fn write_captions(
    config: &ProjectConfig,
    timeline: &SegmentTimeline,
) -> Result<Option<PathBuf>> {
    let entries = build_entries(&config.segments, &timeline.durations());
    if entries.is_empty() {
        return Ok(None);
    }
    let path = captions_file(config);
    std::fs::create_dir_all(&config.output.directory)?;
    write_srt(&entries, &path).context("Failed to write caption file")?;
    info!("Wrote {} caption(s) to {}", entries.len(), path.display());
    Ok(Some(path))
}

fn captions_file(config: &ProjectConfig) -> PathBuf {
    config.output.directory.join("captions.srt")
}
