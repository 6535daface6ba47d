//! Subtitle generation and burn-in
//!
//! Narration scripts attached to segments become time-coded SRT entries:
//! each script is split into short display chunks and the chunks share the
//! segment's resolved duration evenly. Times are cumulative across the whole
//! output timeline; entries never cross segment boundaries.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::model::{Segment, SubtitleStyle};
use crate::error::{DemoReelError, DemoReelResult};
use crate::filter::{FilterNode, FilterOp};
use crate::utils::time::format_srt_timestamp;

/// Maximum words per displayed caption chunk
pub const MAX_CHUNK_WORDS: usize = 10;

/// One SRT caption entry. Index is 1-based and global across the output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubtitleEntry {
    pub index: usize,
    /// Start time in seconds on the output timeline
    pub start: f64,
    /// End time in seconds on the output timeline
    pub end: f64,
    pub text: String,
}

/// Split narration text into display chunks of at most `max_words` words.
///
/// Sentence-ending punctuation splits first; any sentence still longer than
/// the limit is broken into consecutive fixed-size word groups. Never
/// produces an empty chunk, and concatenating all chunks' words reproduces
/// the original word sequence.
pub fn split_into_chunks(text: &str, max_words: usize) -> Vec<String> {
    let max_words = max_words.max(1);
    let mut chunks = Vec::new();

    for sentence in split_sentences(text) {
        let words: Vec<&str> = sentence.split_whitespace().collect();
        if words.is_empty() {
            continue;
        }
        if words.len() <= max_words {
            chunks.push(words.join(" "));
        } else {
            for group in words.chunks(max_words) {
                chunks.push(group.join(" "));
            }
        }
    }
    chunks
}

/// Split on sentence-ending punctuation, keeping the punctuation attached.
fn split_sentences(text: &str) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut current = String::new();
    for ch in text.chars() {
        current.push(ch);
        if matches!(ch, '.' | '!' | '?') {
            if !current.trim().is_empty() {
                sentences.push(current.trim().to_string());
            }
            current.clear();
        }
    }
    if !current.trim().is_empty() {
        sentences.push(current.trim().to_string());
    }
    sentences
}

/// Build time-coded entries for every narrated segment.
///
/// Segments without narration contribute zero entries and only advance the
/// cumulative-time cursor by their own duration. Within a narrated segment
/// the chunks divide the duration evenly, so the union of its entries spans
/// exactly `[cumulative_start, cumulative_start + duration]`.
pub fn build_entries(segments: &[Segment], durations: &[f64]) -> Vec<SubtitleEntry> {
    let mut entries = Vec::new();
    let mut cursor = 0.0_f64;
    let mut index = 1;

    for (segment, &duration) in segments.iter().zip(durations) {
        if let Some(script) = segment.narration.as_deref() {
            let chunks = split_into_chunks(script, MAX_CHUNK_WORDS);
            if !chunks.is_empty() && duration > 0.0 {
                let per_chunk = duration / chunks.len() as f64;
                for (i, chunk) in chunks.into_iter().enumerate() {
                    entries.push(SubtitleEntry {
                        index,
                        start: cursor + i as f64 * per_chunk,
                        end: cursor + (i + 1) as f64 * per_chunk,
                        text: chunk,
                    });
                    index += 1;
                }
            }
        }
        cursor += duration;
    }

    debug!("Built {} subtitle entries over {:.3}s", entries.len(), cursor);
    entries
}

/// Render entries in the SRT caption format.
///
/// Sequential index, `HH:MM:SS,mmm --> HH:MM:SS,mmm` range, caption text,
/// blank-line separator; round-trips through standards-compliant readers.
pub fn render_srt(entries: &[SubtitleEntry]) -> String {
    let mut out = String::new();
    for entry in entries {
        out.push_str(&format!(
            "{}\n{} --> {}\n{}\n\n",
            entry.index,
            format_srt_timestamp(entry.start),
            format_srt_timestamp(entry.end),
            entry.text
        ));
    }
    out
}

/// Write entries to an SRT file on disk.
pub fn write_srt(entries: &[SubtitleEntry], path: &Path) -> DemoReelResult<()> {
    std::fs::write(path, render_srt(entries)).map_err(|e| DemoReelError::CaptionError {
        message: format!("{}: {}", path.display(), e),
    })
}

/// Build the filter node burning a caption file into `input_label`.
pub fn build_burn_filter(
    path: &Path,
    input_label: &str,
    output_label: &str,
    style: SubtitleStyle,
) -> FilterNode {
    FilterNode::new(
        FilterOp::BurnSubtitles {
            path: path.to_string_lossy().into_owned(),
            style,
        },
        vec![input_label.to_string()],
        output_label,
    )
}
