mod accumulator;


use crate::types::{Cue, EndCard, SubtitlePolicy, Word};

use accumulator::CueAccumulator;

/// Gap between the last real cue and the end card, in seconds
pub const END_CARD_LEAD: f64 = 0.5;
/// Length of the end card, in seconds
pub const END_CARD_LENGTH: f64 = 4.5;
/// Window used when the end card is the only cue
const LONE_END_CARD_START: f64 = 0.5;
const LONE_END_CARD_END: f64 = 5.0;

/// Pure function to group a time-ordered word transcript into subtitle cues.
///
/// Cues hold at most `words_per_cue` words, close early on split punctuation,
/// and come out strictly ordered and non-overlapping. An empty transcript
/// yields an empty sequence unless an end card is configured.
pub fn segment_words(words: &[Word], policy: &SubtitlePolicy) -> Vec<Cue> {
    let mut accumulator = CueAccumulator::new();
    for word in words {
        accumulator.handle_word(word, policy);
    }
    // Forced close on end of input; no dangling buffer survives
    accumulator.finish_cue(policy);
    let mut cues = accumulator.into_cues();

    if let Some(card) = &policy.end_card {
        append_end_card(&mut cues, card);
    }

    cues
}

fn append_end_card(cues: &mut Vec<Cue>, card: &EndCard) {
    let (start, end) = match cues.last() {
        Some(last) => (last.end + END_CARD_LEAD, last.end + END_CARD_LEAD + END_CARD_LENGTH),
        None => (LONE_END_CARD_START, LONE_END_CARD_END),
    };
    cues.push(Cue {
        index: cues.len() + 1,
        start,
        end,
        text: card.text.clone(),
    });
}
