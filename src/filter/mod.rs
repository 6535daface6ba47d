//! Typed filter graph construction
//!
//! Processing steps are assembled as an in-memory graph of typed nodes
//! (operation kind, input labels, output labels, parameters) and serialized to
//! the encoder's `-filter_complex` syntax in a single step at the boundary.
//! Graph correctness is testable on the nodes themselves without string
//! matching, and an alternative encode backend only needs a new serializer.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::model::{SubtitlePosition, SubtitleStyle, TransitionStyle};
use crate::error::{DemoReelError, DemoReelResult};

/// Label of the merged (concatenated/cross-faded) video stream
pub const MERGED_VIDEO_LABEL: &str = "vmerged";
/// Canonical label of the final video stream the orchestrator maps
pub const FINAL_VIDEO_LABEL: &str = "vfinal";

/// Which edge a text band is anchored to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BandAnchor {
    Top,
    Bottom,
}

/// One typed processing operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FilterOp {
    /// Conform one raw input to the shared output geometry: scale preserving
    /// aspect, pad to exact size, square pixels, constant frame rate, yuv420p
    Normalize { width: u32, height: u32, fps: u32 },
    /// Cross-fade two streams; `offset` is seconds into the first stream
    CrossFade {
        style: TransitionStyle,
        duration: f64,
        offset: f64,
    },
    /// Hard cut: binary concatenation of two video streams
    ConcatPair,
    /// Plain n-ary concatenation for timelines with no transitions at all
    ConcatAll { n: usize },
    /// Identity operation so empty stages never special-case downstream
    PassThrough,
    /// Semi-transparent band with centered text at the top or bottom edge
    TextBand {
        anchor: BandAnchor,
        height: u32,
        font_size: u32,
        text: String,
    },
    /// Burn an SRT caption file into the stream
    BurnSubtitles { path: String, style: SubtitleStyle },
    /// Plain scale to exact dimensions
    Scale { width: u32, height: u32 },
    /// Solid color source (no inputs)
    ColorSource {
        color: String,
        width: u32,
        height: u32,
    },
    /// Window title bar: colored strip with the three indicator dots (no inputs)
    TitleBar {
        color: String,
        width: u32,
        height: u32,
    },
    /// Stack two streams vertically (first on top)
    VStackPair,
    /// Make pixels outside the inscribed corner circles fully transparent
    RoundedCorners { radius: u32 },
    /// Duplicate a stream into two outputs
    Split2,
    /// Darken a stream into a translucent blurred silhouette for drop shadows
    ShadowTint { opacity: f64, blur_sigma: f64 },
    /// Composite the second input over the first at the given position expressions
    OverlayAt { x: String, y: String },
}

impl FilterOp {
    /// Render the operation as an encoder filter expression (without labels).
    fn expression(&self) -> String {
        match self {
            FilterOp::Normalize { width, height, fps } => format!(
                "scale={w}:{h}:force_original_aspect_ratio=decrease,\
                 pad={w}:{h}:(ow-iw)/2:(oh-ih)/2,setsar=1,fps={fps},format=yuv420p",
                w = width,
                h = height,
                fps = fps
            ),
            FilterOp::CrossFade {
                style,
                duration,
                offset,
            } => format!(
                "xfade=transition={}:duration={:.3}:offset={:.3}",
                style.as_str(),
                duration,
                offset
            ),
            FilterOp::ConcatPair => "concat=n=2:v=1:a=0".to_string(),
            FilterOp::ConcatAll { n } => format!("concat=n={}:v=1:a=0", n),
            FilterOp::PassThrough => "null".to_string(),
            FilterOp::TextBand {
                anchor,
                height,
                font_size,
                text,
            } => {
                let escaped = escape_drawtext(text);
                let (box_y, text_y) = match anchor {
                    BandAnchor::Top => ("0".to_string(), format!("({}-text_h)/2", height)),
                    BandAnchor::Bottom => (
                        format!("ih-{}", height),
                        format!("h-{}+({}-text_h)/2", height, height),
                    ),
                };
                format!(
                    "drawbox=x=0:y={box_y}:w=iw:h={h}:color=black@0.5:t=fill,\
                     drawtext=text='{text}':fontsize={fs}:fontcolor=white:\
                     x=(w-text_w)/2:y={text_y}",
                    box_y = box_y,
                    h = height,
                    text = escaped,
                    fs = font_size,
                    text_y = text_y
                )
            }
            FilterOp::BurnSubtitles { path, style } => {
                // Alignment uses the ASS numpad convention: 2 = bottom center,
                // 6 = top center with its own margin.
                let (alignment, margin_v) = match style.position {
                    SubtitlePosition::Bottom => (2, 30),
                    SubtitlePosition::Top => (6, 20),
                };
                format!(
                    "subtitles='{}':force_style='FontSize={},PrimaryColour=&HFFFFFF&,\
                     BackColour=&H80000000&,BorderStyle=4,Alignment={},MarginV={}'",
                    escape_filter_path(path),
                    style.font_size,
                    alignment,
                    margin_v
                )
            }
            FilterOp::Scale { width, height } => format!("scale={}:{}", width, height),
            FilterOp::ColorSource {
                color,
                width,
                height,
            } => format!("color=c=0x{}:s={}x{}", color, width, height),
            FilterOp::TitleBar {
                color,
                width,
                height,
            } => {
                // macOS-style traffic lights, vertically centered in the bar
                let dot_y = format!("({}-text_h)/2", height);
                format!(
                    "color=c=0x{color}:s={w}x{h},\
                     drawtext=text='●':fontsize=14:fontcolor=0xff5f57:x=16:y={y},\
                     drawtext=text='●':fontsize=14:fontcolor=0xfebc2e:x=40:y={y},\
                     drawtext=text='●':fontsize=14:fontcolor=0x28c840:x=64:y={y}",
                    color = color,
                    w = width,
                    h = height,
                    y = dot_y
                )
            }
            FilterOp::VStackPair => "vstack=inputs=2".to_string(),
            FilterOp::RoundedCorners { radius } => {
                // Fold all four corners into one predicate via abs() symmetry:
                // a pixel is transparent when it lies in a corner square but
                // outside the inscribed circle of radius r.
                format!(
                    "format=yuva444p,geq=lum='p(X,Y)':cb='cb(X,Y)':cr='cr(X,Y)':\
                     a='if(gt(abs(W/2-X),W/2-{r})*gt(abs(H/2-Y),H/2-{r}),\
                     if(lte(hypot({r}-(W/2-abs(W/2-X)),{r}-(H/2-abs(H/2-Y))),{r}),255,0),255)'",
                    r = radius
                )
            }
            FilterOp::Split2 => "split=2".to_string(),
            FilterOp::ShadowTint {
                opacity,
                blur_sigma,
            } => format!(
                "colorchannelmixer=rr=0:gg=0:bb=0:aa={:.2},gblur=sigma={:.1}",
                opacity, blur_sigma
            ),
            FilterOp::OverlayAt { x, y } => format!("overlay=x={}:y={}", x, y),
        }
    }
}

/// One node of the graph: typed operation plus its stream labels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterNode {
    pub op: FilterOp,
    /// Input stream labels, in positional order. Empty for source ops.
    pub inputs: Vec<String>,
    /// Output stream labels. Exactly one except for `Split2`.
    pub outputs: Vec<String>,
}

impl FilterNode {
    /// Node with any number of inputs and a single output.
    pub fn new(op: FilterOp, inputs: Vec<String>, output: impl Into<String>) -> Self {
        Self {
            op,
            inputs,
            outputs: vec![output.into()],
        }
    }

    /// Source node (no inputs).
    pub fn source(op: FilterOp, output: impl Into<String>) -> Self {
        Self::new(op, Vec::new(), output)
    }

    fn serialize(&self) -> String {
        let inputs: String = self.inputs.iter().map(|l| format!("[{}]", l)).collect();
        let outputs: String = self.outputs.iter().map(|l| format!("[{}]", l)).collect();
        format!("{}{}{}", inputs, self.op.expression(), outputs)
    }
}

impl fmt::Display for FilterNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.serialize())
    }
}

/// Ordered, label-checked filter graph.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterGraph {
    nodes: Vec<FilterNode>,
}

impl FilterGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a node, rejecting duplicate output labels.
    pub fn push(&mut self, node: FilterNode) -> DemoReelResult<()> {
        for label in &node.outputs {
            if self
                .nodes
                .iter()
                .any(|n| n.outputs.iter().any(|o| o == label))
            {
                return Err(DemoReelError::DuplicateLabel {
                    label: label.clone(),
                });
            }
        }
        self.nodes.push(node);
        Ok(())
    }

    /// Append every node of another graph.
    pub fn extend(&mut self, other: FilterGraph) -> DemoReelResult<()> {
        for node in other.nodes {
            self.push(node)?;
        }
        Ok(())
    }

    pub fn nodes(&self) -> &[FilterNode] {
        &self.nodes
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Output label of the last node, if any.
    pub fn output_label(&self) -> Option<&str> {
        self.nodes
            .last()
            .and_then(|n| n.outputs.last())
            .map(String::as_str)
    }

    /// Serialize the whole graph to `-filter_complex` syntax.
    pub fn serialize(&self) -> String {
        self.nodes
            .iter()
            .map(FilterNode::serialize)
            .collect::<Vec<_>>()
            .join(";")
    }

    /// Count nodes matching a predicate; used by planners and tests.
    pub fn count_ops(&self, predicate: impl Fn(&FilterOp) -> bool) -> usize {
        self.nodes.iter().filter(|n| predicate(&n.op)).count()
    }
}

/// Escape text for use inside a single-quoted drawtext value.
///
/// Backslash must go first so later escapes are not double-escaped.
/// Apostrophes become the typographic quote: a literal `'` would terminate
/// the quoted string and no portable in-string escape exists for it.
pub fn escape_drawtext(text: &str) -> String {
    text.replace('\\', "\\\\")
        .replace(':', "\\:")
        .replace('[', "\\[")
        .replace(']', "\\]")
        .replace(';', "\\;")
        .replace('%', "\\%")
        .replace('\'', "\u{2019}")
}

/// Escape a file path for use as a filter option value, where a bare colon
/// terminates the option (Windows drive letters hit this every time).
pub fn escape_filter_path(path: &str) -> String {
    path.replace('\\', "/").replace(':', "\\:")
}
