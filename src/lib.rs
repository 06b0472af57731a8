pub mod segmenter;
pub mod srt;
pub mod transcript;
pub mod types;
