//! Core types for the storyreel subtitle pipeline

use anyhow::{ensure, Result};
use serde::Deserialize;

/// One time-stamped token from a speech-to-text transcript
#[derive(Debug, Clone)]
pub struct Word {
    pub text: String,
    pub start: f64, // seconds
    pub end: f64,   // seconds
}

/// One timed subtitle entry
#[derive(Debug, Clone, PartialEq)]
pub struct Cue {
    /// 1-based sequential index, assigned in emission order
    pub index: usize,
    pub start: f64, // seconds
    pub end: f64,   // seconds
    pub text: String,
}

/// Display casing applied to cue text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CaseMode {
    /// Capitalize the first character, leave the rest as recognized
    #[default]
    Capitalize,
    Upper,
    Lower,
}

/// Trailing call-to-action cue appended after the last real subtitle
#[derive(Debug, Clone)]
pub struct EndCard {
    pub text: String,
}

/// Configuration controlling how words are grouped into cues
#[derive(Debug, Clone)]
pub struct SubtitlePolicy {
    /// A cue closes once it holds this many words
    pub words_per_cue: usize,
    /// If set, cues shorter than this are extended to meet it (seconds)
    pub min_duration: Option<f64>,
    /// Characters that force an early close of the current cue
    pub split_punctuation: Vec<char>,
    pub case_mode: CaseMode,
    pub end_card: Option<EndCard>,
}

impl SubtitlePolicy {
    pub fn new(words_per_cue: usize) -> Self {
        Self {
            words_per_cue: words_per_cue.max(1),
            min_duration: None,
            split_punctuation: default_split_punctuation(),
            case_mode: CaseMode::Capitalize,
            end_card: None,
        }
    }
}

impl Default for SubtitlePolicy {
    fn default() -> Self {
        Self::new(4)
    }
}

/// Baseline sentence punctuation; the comma variant is opt-in
pub fn default_split_punctuation() -> Vec<char> {
    vec!['.', '!', '?']
}

/// Runtime-configurable policy parsed from JSON input
#[derive(Debug, Clone, Deserialize)]
pub struct RuntimePolicy {
    #[serde(default = "default_words_per_cue", alias = "words", alias = "wordsPerCue")]
    pub words_per_cue: usize,
    #[serde(default, alias = "minDuration")]
    pub min_duration: Option<f64>,
    /// Punctuation characters given as one string, e.g. ".!?,"
    #[serde(default, alias = "splitPunctuation")]
    pub split_punctuation: Option<String>,
    #[serde(default, alias = "case")]
    pub case_mode: CaseMode,
    #[serde(default, alias = "endCard")]
    pub end_card: Option<RuntimeEndCard>,
}

fn default_words_per_cue() -> usize {
    4
}

impl RuntimePolicy {
    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.words_per_cue >= 1,
            "words_per_cue must be at least 1, got {}",
            self.words_per_cue
        );
        if let Some(min) = self.min_duration {
            ensure!(
                min > 0.0,
                "min_duration must be positive, got {}",
                min
            );
        }
        if let Some(punctuation) = &self.split_punctuation {
            ensure!(
                !punctuation.trim().is_empty(),
                "split_punctuation must contain at least one character when given"
            );
        }
        if let Some(card) = &self.end_card {
            card.validate()?;
        }
        Ok(())
    }

    pub fn to_policy(&self) -> SubtitlePolicy {
        SubtitlePolicy {
            words_per_cue: self.words_per_cue,
            min_duration: self.min_duration,
            split_punctuation: self
                .split_punctuation
                .as_ref()
                .map(|raw| raw.chars().filter(|ch| !ch.is_whitespace()).collect())
                .unwrap_or_else(default_split_punctuation),
            case_mode: self.case_mode,
            end_card: self.end_card.as_ref().and_then(|card| card.to_end_card()),
        }
    }
}

/// Runtime end-card settings parsed from JSON
#[derive(Debug, Clone, Deserialize)]
pub struct RuntimeEndCard {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    pub text: String,
}

fn default_enabled() -> bool {
    true
}

impl RuntimeEndCard {
    fn validate(&self) -> Result<()> {
        if self.enabled {
            ensure!(
                !self.text.trim().is_empty(),
                "end_card text must not be empty when enabled"
            );
        }
        Ok(())
    }

    fn to_end_card(&self) -> Option<EndCard> {
        self.enabled.then(|| EndCard {
            text: self.text.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn policy_defaults() {
        let policy = SubtitlePolicy::default();
        assert_eq!(policy.words_per_cue, 4);
        assert_eq!(policy.min_duration, None);
        assert_eq!(policy.split_punctuation, vec!['.', '!', '?']);
        assert_eq!(policy.case_mode, CaseMode::Capitalize);
        assert!(policy.end_card.is_none());
    }

    #[test]
    fn runtime_policy_from_json() {
        let json = r#"{
            "words_per_cue": 6,
            "min_duration": 1.0,
            "split_punctuation": ".!?,",
            "case": "upper",
            "end_card": {"text": "Subscribe!"}
        }"#;
        let runtime: RuntimePolicy = serde_json::from_str(json).unwrap();
        runtime.validate().unwrap();
        let policy = runtime.to_policy();
        assert_eq!(policy.words_per_cue, 6);
        assert_eq!(policy.min_duration, Some(1.0));
        assert_eq!(policy.split_punctuation, vec!['.', '!', '?', ',']);
        assert_eq!(policy.case_mode, CaseMode::Upper);
        assert_eq!(policy.end_card.unwrap().text, "Subscribe!");
    }

    #[test]
    fn runtime_policy_defaults_when_fields_missing() {
        let runtime: RuntimePolicy = serde_json::from_str("{}").unwrap();
        runtime.validate().unwrap();
        let policy = runtime.to_policy();
        assert_eq!(policy.words_per_cue, 4);
        assert_eq!(policy.split_punctuation, vec!['.', '!', '?']);
    }

    #[test]
    fn runtime_policy_rejects_zero_words() {
        let runtime: RuntimePolicy = serde_json::from_str(r#"{"words_per_cue": 0}"#).unwrap();
        assert!(runtime.validate().is_err());
    }

    #[test]
    fn disabled_end_card_is_dropped() {
        let json = r#"{"end_card": {"enabled": false, "text": "Bye"}}"#;
        let runtime: RuntimePolicy = serde_json::from_str(json).unwrap();
        runtime.validate().unwrap();
        assert!(runtime.to_policy().end_card.is_none());
    }
}
