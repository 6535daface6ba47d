//! Full-pipeline integration tests
//!
//! Drives the renderer end to end against fake probe and encoder adapters:
//! graph assembly, caption generation, artifact reporting, and the
//! per-format failure semantics.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tempfile::TempDir;

use demoreel::config::{ProjectConfig, RenderSettings};
use demoreel::domain::model::{
    OutputFormat, OverlaySpec, Segment, SubtitleStyle, TransitionSpec, TransitionStyle,
};
use demoreel::encode::{FilterGraphRenderer, Renderer};
use demoreel::error::{DemoReelError, DemoReelResult};
use demoreel::ports::{DurationProbe, EncodeRunner};
use demoreel::subtitle::{build_entries, write_srt};
use demoreel::timing::SegmentTimeline;

// Test utilities

/// Probe returning fixed durations keyed by file stem.
struct FixedProbe;

#[async_trait]
impl DurationProbe for FixedProbe {
    async fn duration_secs(&self, path: &Path) -> DemoReelResult<f64> {
        match path.file_stem().and_then(|s| s.to_str()) {
            Some("intro") => Ok(5.0),
            Some("dashboard") => Ok(4.0),
            Some("settings") => Ok(3.0),
            other => Err(DemoReelError::RecordingNotFound {
                path: format!("{:?}", other),
            }),
        }
    }
}

/// Encoder that records its invocations and writes the destination file,
/// optionally failing for one format.
struct FakeEncoder {
    calls: Arc<Mutex<Vec<(String, Vec<String>)>>>,
    fail_format: Option<&'static str>,
}

impl FakeEncoder {
    fn new() -> Self {
        Self {
            calls: Arc::new(Mutex::new(Vec::new())),
            fail_format: None,
        }
    }

    fn failing_for(format: &'static str) -> Self {
        Self {
            fail_format: Some(format),
            ..Self::new()
        }
    }

    fn call_log(&self) -> Arc<Mutex<Vec<(String, Vec<String>)>>> {
        Arc::clone(&self.calls)
    }
}

#[async_trait]
impl EncodeRunner for FakeEncoder {
    async fn run(&self, format_tag: &str, args: &[String]) -> DemoReelResult<()> {
        self.calls
            .lock()
            .unwrap()
            .push((format_tag.to_string(), args.to_vec()));
        if self.fail_format == Some(format_tag) {
            return Err(DemoReelError::EncodeFailed {
                format: format_tag.to_string(),
                diagnostics: "simulated encoder crash".to_string(),
            });
        }
        // Last argument is the destination path
        if let Some(dest) = args.last() {
            std::fs::write(dest, b"encoded video payload")?;
        }
        Ok(())
    }
}

fn project(out_dir: &Path, formats: Vec<OutputFormat>) -> ProjectConfig {
    ProjectConfig {
        name: "Acme Walkthrough".to_string(),
        output: RenderSettings {
            width: 1280,
            height: 720,
            fps: 30,
            formats,
            directory: out_dir.to_path_buf(),
        },
        segments: vec![
            Segment::new("intro", "/recordings/intro.mp4", 0.0)
                .with_narration("Welcome to Acme. This is the landing page."),
            Segment::new("dashboard", "/recordings/dashboard.mp4", 1.0),
            Segment::new("settings", "/recordings/settings.mp4", 0.0),
        ],
        global_transition: Some(TransitionSpec::new(TransitionStyle::Fade, 0.5).unwrap()),
        boundary_transitions: Vec::new(),
        overlay: OverlaySpec::default(),
        subtitles: Some(SubtitleStyle::default()),
        theme: None,
        audio_track: None,
    }
}

async fn resolve(config: &ProjectConfig) -> SegmentTimeline {
    SegmentTimeline::resolve(&config.segments, &FixedProbe)
        .await
        .unwrap()
}

#[tokio::test]
async fn render_produces_one_artifact_per_format() {
    let dir = TempDir::new().unwrap();
    let config = project(dir.path(), vec![OutputFormat::Mp4, OutputFormat::Webm]);
    let timeline = resolve(&config).await;

    let encoder = FakeEncoder::new();
    let outcome = FilterGraphRenderer::new(encoder)
        .render(&config, &timeline, None)
        .await
        .unwrap();

    assert!(outcome.all_succeeded());
    assert_eq!(outcome.artifacts.len(), 2);
    for artifact in &outcome.artifacts {
        assert!(artifact.path.exists());
        assert!(artifact.size_bytes > 0);
    }
    let formats: Vec<OutputFormat> = outcome.artifacts.iter().map(|a| a.format).collect();
    assert_eq!(formats, vec![OutputFormat::Mp4, OutputFormat::Webm]);
}

#[tokio::test]
async fn failed_format_keeps_earlier_artifacts() {
    let dir = TempDir::new().unwrap();
    let config = project(dir.path(), vec![OutputFormat::Mp4, OutputFormat::Webm]);
    let timeline = resolve(&config).await;

    let outcome = FilterGraphRenderer::new(FakeEncoder::failing_for("webm"))
        .render(&config, &timeline, None)
        .await
        .unwrap();

    assert!(!outcome.all_succeeded());
    assert_eq!(outcome.artifacts.len(), 1);
    assert_eq!(outcome.artifacts[0].format, OutputFormat::Mp4);
    assert!(outcome.artifacts[0].path.exists());

    assert_eq!(outcome.failures.len(), 1);
    let message = outcome.failures[0].to_string();
    assert!(message.contains("simulated encoder crash"));
}

#[tokio::test]
async fn encoder_receives_shared_graph_and_trim_seeks() {
    let dir = TempDir::new().unwrap();
    let config = project(dir.path(), vec![OutputFormat::Mp4, OutputFormat::Webm]);
    let timeline = resolve(&config).await;

    let encoder = FakeEncoder::new();
    let calls = encoder.call_log();
    let outcome = FilterGraphRenderer::new(encoder)
        .render(&config, &timeline, None)
        .await
        .unwrap();
    assert!(outcome.all_succeeded());

    let calls = calls.lock().unwrap();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0].0, "mp4");
    assert_eq!(calls[1].0, "webm");

    // Both invocations share one filter graph
    let graph_of = |args: &[String]| {
        let i = args.iter().position(|a| a == "-filter_complex").unwrap();
        args[i + 1].clone()
    };
    let mp4_graph = graph_of(&calls[0].1);
    assert_eq!(mp4_graph, graph_of(&calls[1].1));
    assert!(mp4_graph.contains("xfade=transition=fade:duration=0.500:offset=4.500"));

    // The dashboard segment's 1s trim becomes a fast input seek
    let args = &calls[0].1;
    let ss = args.iter().position(|a| a == "-ss").unwrap();
    assert_eq!(args[ss + 1], "1.000");
    assert!(args[ss + 3].ends_with("dashboard.mp4"));
}

#[tokio::test]
async fn trim_offset_shortens_the_resolved_duration() {
    let dir = TempDir::new().unwrap();
    let config = project(dir.path(), vec![OutputFormat::Mp4]);
    let timeline = resolve(&config).await;

    // dashboard.mp4 probes at 4.0s with a 1.0s trim
    assert_eq!(timeline.durations(), vec![5.0, 3.0, 3.0]);
}

#[tokio::test]
async fn probe_failure_degrades_to_zero_duration_segment() {
    let dir = TempDir::new().unwrap();
    let mut config = project(dir.path(), vec![OutputFormat::Mp4]);
    config.segments.push(Segment::new(
        "missing",
        "/recordings/missing.mp4",
        0.0,
    ));

    let timeline = resolve(&config).await;
    assert_eq!(timeline.durations(), vec![5.0, 3.0, 3.0, 0.0]);
}

#[tokio::test]
async fn captions_cover_narrated_segments_only() {
    let dir = TempDir::new().unwrap();
    let config = project(dir.path(), vec![OutputFormat::Mp4]);
    let timeline = resolve(&config).await;

    let entries = build_entries(&config.segments, &timeline.durations());
    assert!(!entries.is_empty());
    // All caption time lies inside the narrated first segment
    assert!(entries.iter().all(|e| e.end <= 5.0 + 1e-9));
    assert_eq!(entries[0].index, 1);

    let srt_path: PathBuf = dir.path().join("captions.srt");
    write_srt(&entries, &srt_path).unwrap();
    let content = std::fs::read_to_string(&srt_path).unwrap();
    assert!(content.starts_with("1\n00:00:00,000 --> "));
    assert!(content.contains("Welcome to Acme."));
}

#[tokio::test]
async fn project_file_round_trip_drives_the_renderer() {
    let dir = TempDir::new().unwrap();
    let toml = format!(
        r#"
[project]
name = "File Demo"

[output]
directory = "{}"
formats = ["mp4"]

[transitions]
style = "fade"
duration = 0.5

[[segments]]
name = "intro"
recording = "/recordings/intro.mp4"

[[segments]]
name = "settings"
recording = "/recordings/settings.mp4"
"#,
        dir.path().display()
    );
    let project_path = dir.path().join("demo.toml");
    std::fs::write(&project_path, toml).unwrap();

    let config = ProjectConfig::load(&project_path).unwrap();
    let timeline = resolve(&config).await;

    let outcome = FilterGraphRenderer::new(FakeEncoder::new())
        .render(&config, &timeline, None)
        .await
        .unwrap();
    assert!(outcome.all_succeeded());
    assert_eq!(outcome.artifacts.len(), 1);
    assert_eq!(
        outcome.artifacts[0].path.file_name().unwrap(),
        "file_demo.mp4"
    );
}
