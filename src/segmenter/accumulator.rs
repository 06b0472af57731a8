use crate::types::{CaseMode, Cue, SubtitlePolicy, Word};

/// Shift applied to a cue whose start would precede the previous cue's end
const OVERLAP_SHIFT: f64 = 0.1;
/// Floor length for a cue whose start was shifted forward
const CORRECTED_MIN_LENGTH: f64 = 0.5;
/// Substitute word length when upstream timing has end before start
const FALLBACK_WORD_LENGTH: f64 = 1.0;

/// Accumulate-and-flush state machine behind `segment_words`.
///
/// `current_start` doubles as the state marker: `None` means idle,
/// `Some` means a cue is accumulating.
pub(super) struct CueAccumulator {
    cues: Vec<Cue>,
    buffer: Vec<String>,
    current_start: Option<f64>,
    current_end: f64,
}

impl CueAccumulator {
    pub(super) fn new() -> Self {
        Self {
            cues: Vec::new(),
            buffer: Vec::new(),
            current_start: None,
            current_end: 0.0,
        }
    }

    pub(super) fn handle_word(&mut self, word: &Word, policy: &SubtitlePolicy) {
        let text = word.text.trim();
        if text.is_empty() {
            return;
        }
        let end = if word.end < word.start {
            word.start + FALLBACK_WORD_LENGTH
        } else {
            word.end
        };

        if self.current_start.is_none() {
            self.current_start = Some(word.start);
        }
        self.buffer.push(text.to_string());
        self.current_end = end;

        // Close conditions are non-exclusive; any one firing is sufficient
        let at_capacity = self.buffer.len() >= policy.words_per_cue;
        let hit_punctuation = word
            .text
            .chars()
            .any(|ch| policy.split_punctuation.contains(&ch));
        if at_capacity || hit_punctuation {
            self.finish_cue(policy);
        }
    }

    pub(super) fn finish_cue(&mut self, policy: &SubtitlePolicy) {
        let Some(natural_start) = self.current_start.take() else {
            return;
        };

        let mut start = natural_start;
        let mut end = self.current_end;
        if let Some(min) = policy.min_duration {
            if end - start < min {
                end = start + min;
            }
        }
        // A cue closed from a zero-width word would otherwise have no duration
        if end <= start {
            end = start + FALLBACK_WORD_LENGTH;
        }
        // Later cues shift forward; touching cues (start == previous end) stay put
        if let Some(previous) = self.cues.last() {
            if start < previous.end {
                start = previous.end + OVERLAP_SHIFT;
                if end < start + CORRECTED_MIN_LENGTH {
                    end = start + CORRECTED_MIN_LENGTH;
                }
            }
        }

        let text = normalize_text(&self.buffer.join(" "), policy.case_mode);
        self.cues.push(Cue {
            index: self.cues.len() + 1,
            start,
            end,
            text,
        });
        self.buffer.clear();
    }

    pub(super) fn into_cues(self) -> Vec<Cue> {
        self.cues
    }
}

/// Trim, collapse internal whitespace, then apply the display casing
fn normalize_text(raw: &str, case_mode: CaseMode) -> String {
    let collapsed = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    match case_mode {
        CaseMode::Upper => collapsed.to_uppercase(),
        CaseMode::Lower => collapsed.to_lowercase(),
        CaseMode::Capitalize => capitalize_first(&collapsed),
    }
}

fn capitalize_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
