//! SRT rendering and parsing
//!
//! Blocks of `index\nHH:MM:SS,mmm --> HH:MM:SS,mmm\ntext\n\n`, UTF-8,
//! millisecond precision with rounding.

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use anyhow::{ensure, Context, Result};

use crate::types::Cue;

/// Format seconds as an SRT timestamp, rounding to the nearest millisecond
pub fn format_timestamp(seconds: f64) -> String {
    let total_ms = (seconds * 1000.0).round() as u64;
    let ms = total_ms % 1000;
    let total_secs = total_ms / 1000;
    let secs = total_secs % 60;
    let total_mins = total_secs / 60;
    let mins = total_mins % 60;
    let hours = total_mins / 60;
    format!("{hours:02}:{mins:02}:{secs:02},{ms:03}")
}

/// Render a cue sequence as one SRT document
pub fn render(cues: &[Cue]) -> String {
    let mut out = String::new();
    for cue in cues {
        let _ = writeln!(out, "{}", cue.index);
        let _ = writeln!(
            out,
            "{} --> {}",
            format_timestamp(cue.start),
            format_timestamp(cue.end)
        );
        let _ = writeln!(out, "{}", cue.text);
        out.push('\n');
    }
    out
}

/// Write a cue sequence to an SRT file
pub fn write_srt(path: &Path, cues: &[Cue]) -> Result<()> {
    fs::write(path, render(cues))
        .with_context(|| format!("failed to write subtitle file {:?}", path))
}

/// Parse an SRT document back into cues.
///
/// Used to verify the round-trip property; times come back with millisecond
/// resolution.
pub fn parse(raw: &str) -> Result<Vec<Cue>> {
    let mut cues = Vec::new();
    for block in raw.split("\n\n").filter(|block| !block.trim().is_empty()) {
        let mut lines = block.lines();
        let index_line = lines.next().context("subtitle block missing index line")?;
        let index: usize = index_line
            .trim()
            .parse()
            .with_context(|| format!("invalid subtitle index '{}'", index_line.trim()))?;

        let timing_line = lines.next().context("subtitle block missing timing line")?;
        let (raw_start, raw_end) = timing_line
            .split_once("-->")
            .with_context(|| format!("invalid timing line '{timing_line}'"))?;
        let start = parse_timestamp(raw_start.trim())?;
        let end = parse_timestamp(raw_end.trim())?;

        let text = lines.collect::<Vec<_>>().join("\n");
        cues.push(Cue {
            index,
            start,
            end,
            text,
        });
    }
    Ok(cues)
}

fn parse_timestamp(raw: &str) -> Result<f64> {
    let (clock, millis) = raw
        .split_once(',')
        .with_context(|| format!("timestamp '{raw}' missing millisecond separator"))?;
    let parts: Vec<&str> = clock.split(':').collect();
    ensure!(parts.len() == 3, "timestamp '{}' must be HH:MM:SS,mmm", raw);

    let hours: u64 = parts[0]
        .parse()
        .with_context(|| format!("invalid hours in '{raw}'"))?;
    let mins: u64 = parts[1]
        .parse()
        .with_context(|| format!("invalid minutes in '{raw}'"))?;
    let secs: u64 = parts[2]
        .parse()
        .with_context(|| format!("invalid seconds in '{raw}'"))?;
    let ms: u64 = millis
        .parse()
        .with_context(|| format!("invalid milliseconds in '{raw}'"))?;

    Ok((hours * 3600 + mins * 60 + secs) as f64 + ms as f64 / 1000.0)
}
