use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::warn;

use storyreel::segmenter::{segment_words, END_CARD_LEAD, END_CARD_LENGTH};
use storyreel::srt;
use storyreel::transcript;
use storyreel::types::{CaseMode, EndCard, RuntimePolicy, SubtitlePolicy};

/// Storyreel - subtitle generation for short-form story videos
///
/// Converts a word-level speech transcript (Whisper verbose_json) into an
/// SRT subtitle file with bounded words per cue, punctuation-aware breaks,
/// and non-overlapping timing.
#[derive(Parser, Debug)]
#[command(name = "storyreel")]
#[command(version = "0.1.0")]
#[command(about = "Transcript to subtitle converter", long_about = None)]
struct Args {
    /// Input transcript JSON file (word-level timestamps)
    #[arg(value_name = "TRANSCRIPT")]
    transcript: PathBuf,

    /// Output SRT subtitle file
    #[arg(value_name = "OUTPUT")]
    output: PathBuf,

    /// Maximum number of words per subtitle cue
    #[arg(long, default_value_t = 4)]
    words_per_cue: usize,

    /// Minimum cue duration in seconds
    #[arg(long, value_name = "SECONDS")]
    min_duration: Option<f64>,

    /// Also break cues on commas, not just sentence punctuation
    #[arg(long)]
    split_on_commas: bool,

    /// Append a trailing end-card cue with this text
    #[arg(long, value_name = "TEXT")]
    end_card: Option<String>,

    /// Upper-case every cue
    #[arg(long, conflicts_with = "lower")]
    upper: bool,

    /// Lower-case every cue
    #[arg(long, conflicts_with = "upper")]
    lower: bool,

    /// JSON policy specification (inline JSON string)
    #[arg(long, value_name = "JSON", conflicts_with = "policy_file")]
    policy_json: Option<String>,

    /// Path to JSON policy specification
    #[arg(long, value_name = "PATH", conflicts_with = "policy_json")]
    policy_file: Option<PathBuf>,

    /// Total narration duration in seconds, used to sanity-check cue timing
    #[arg(long, value_name = "SECONDS")]
    total_duration: Option<f64>,
}

impl Args {
    /// Validate CLI arguments
    fn validate(&self) -> Result<()> {
        if !self.transcript.exists() {
            bail!("Transcript file does not exist: {:?}", self.transcript);
        }

        if !self.transcript.is_file() {
            bail!("Transcript path is not a file: {:?}", self.transcript);
        }

        if self.words_per_cue < 1 {
            bail!("Words per cue must be at least 1");
        }

        if let Some(min) = self.min_duration {
            if min <= 0.0 {
                bail!("Minimum duration must be positive, got: {}", min);
            }
        }

        if let Some(total) = self.total_duration {
            if total <= 0.0 {
                bail!("Total duration must be positive, got: {}", total);
            }
        }

        if self.output.is_dir() {
            bail!("Output path must be a file: {:?}", self.output);
        }

        Ok(())
    }

    fn policy(&self) -> Result<SubtitlePolicy> {
        if self.policy_json.is_some() || self.policy_file.is_some() {
            let runtime =
                load_policy_from_sources(self.policy_file.as_deref(), self.policy_json.as_deref())?;
            runtime.validate().context("Policy validation failed")?;
            return Ok(runtime.to_policy());
        }

        let mut policy = SubtitlePolicy::new(self.words_per_cue);
        policy.min_duration = self.min_duration;
        if self.split_on_commas {
            policy.split_punctuation.push(',');
        }
        if self.upper {
            policy.case_mode = CaseMode::Upper;
        } else if self.lower {
            policy.case_mode = CaseMode::Lower;
        }
        policy.end_card = self.end_card.as_ref().map(|text| EndCard {
            text: text.clone(),
        });
        Ok(policy)
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    args.validate()
        .context("Failed to validate command-line arguments")?;

    let policy = args.policy().context("Failed to build subtitle policy")?;

    println!("Storyreel v0.1.0 - Subtitle Generator");
    println!("Transcript: {:?}", args.transcript);
    println!("Output:     {:?}", args.output);
    println!("Words per cue: {}", policy.words_per_cue);

    println!("\n1. Loading transcript...");
    let words =
        transcript::load_words(&args.transcript).context("Failed to load transcript")?;
    println!("   Loaded {} timed words", words.len());

    println!("\n2. Segmenting into subtitle cues...");
    let cues = segment_words(&words, &policy);
    println!("   Produced {} cues", cues.len());

    if cues.is_empty() {
        bail!("Transcript produced no subtitle cues: {:?}", args.transcript);
    }

    if let (Some(total), Some(last)) = (args.total_duration, cues.last()) {
        check_total_duration(last.end, total, policy.end_card.is_some());
    }

    println!("\n3. Writing subtitle file...");
    if let Some(parent) = args.output.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create output directory {:?}", parent))?;
    }
    write_output(&args.output, &cues)?;
    println!("   Wrote {} cues to {:?}", cues.len(), args.output);

    println!("\n✓ Subtitles complete!");

    Ok(())
}

fn check_total_duration(last_end: f64, total: f64, has_end_card: bool) {
    if last_end > total + end_card_allowance(has_end_card) {
        warn!(
            last_cue_end = last_end,
            total_duration = total,
            "last cue ends after the stated narration duration"
        );
    }
}

/// End card is allowed to run past the narration by its lead plus length
fn end_card_allowance(has_end_card: bool) -> f64 {
    if has_end_card {
        END_CARD_LEAD + END_CARD_LENGTH
    } else {
        0.0
    }
}

fn write_output(path: &Path, cues: &[storyreel::types::Cue]) -> Result<()> {
    srt::write_srt(path, cues)
        .with_context(|| format!("Failed to write subtitle file {:?}", path))
}

fn load_policy_from_sources(path: Option<&Path>, json: Option<&str>) -> Result<RuntimePolicy> {
    if let Some(p) = path {
        let data =
            fs::read_to_string(p).with_context(|| format!("Failed to read policy file {:?}", p))?;
        return parse_runtime_policy(&data);
    }

    if let Some(raw) = json {
        return parse_runtime_policy(raw);
    }

    bail!("No policy source provided"); // Should not happen due to the caller's check
}

fn parse_runtime_policy(raw: &str) -> Result<RuntimePolicy> {
    let policy: RuntimePolicy =
        serde_json::from_str(raw).context("Failed to parse policy JSON")?;
    Ok(policy)
}
