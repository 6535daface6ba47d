// Adapters - External tool implementations of the ports

pub mod ffmpeg;
pub mod ffprobe;

pub use ffmpeg::FfmpegEncodeRunner;
pub use ffprobe::FfprobeDurationProbe;
