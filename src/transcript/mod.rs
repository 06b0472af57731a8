//! Transcript input surface
//!
//! Loads word-level timing data in the Whisper `verbose_json` shape: a
//! top-level object carrying a `words` array (a bare array of words is also
//! accepted). Individual malformed words are skipped with a warning; they
//! never abort the load.

use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::types::Word;

#[derive(Debug, Deserialize)]
struct RawWord {
    #[serde(alias = "text", alias = "value")]
    word: Option<String>,
    start: Option<f64>,
    end: Option<f64>,
}

/// Load timed words from a transcript JSON file
pub fn load_words(path: &Path) -> Result<Vec<Word>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read transcript file {:?}", path))?;
    words_from_json(&raw).with_context(|| format!("failed to parse transcript file {:?}", path))
}

/// Extract timed words from a transcript JSON document
pub fn words_from_json(raw: &str) -> Result<Vec<Word>> {
    let document: Value = serde_json::from_str(raw).context("transcript is not valid JSON")?;

    let entries = match &document {
        Value::Object(fields) => match fields.get("words").and_then(Value::as_array) {
            Some(entries) => entries,
            None => bail!("transcript object has no 'words' array"),
        },
        Value::Array(entries) => entries,
        _ => bail!("transcript must be a JSON object or array"),
    };

    let mut words = Vec::with_capacity(entries.len());
    for (position, entry) in entries.iter().enumerate() {
        match parse_word(entry) {
            Some(word) => words.push(word),
            None => warn!(position, "skipping malformed transcript word"),
        }
    }
    debug!(
        total = entries.len(),
        usable = words.len(),
        "parsed transcript words"
    );
    Ok(words)
}

fn parse_word(entry: &Value) -> Option<Word> {
    let raw: RawWord = serde_json::from_value(entry.clone()).ok()?;
    let text = raw.word?;
    let start = raw.start?;
    let end = raw.end?;
    if !start.is_finite() || !end.is_finite() || start < 0.0 {
        return None;
    }
    Some(Word { text, start, end })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_verbose_json_words() {
        let raw = r#"{
            "text": "Hello world",
            "words": [
                {"word": "Hello", "start": 0.0, "end": 0.4},
                {"word": "world", "start": 0.4, "end": 0.9}
            ]
        }"#;
        let words = words_from_json(raw).unwrap();
        assert_eq!(words.len(), 2);
        assert_eq!(words[0].text, "Hello");
        assert!((words[1].end - 0.9).abs() < 1e-9);
    }

    #[test]
    fn accepts_bare_word_array() {
        let raw = r#"[{"word": "solo", "start": 1.0, "end": 1.5}]"#;
        let words = words_from_json(raw).unwrap();
        assert_eq!(words.len(), 1);
        assert_eq!(words[0].text, "solo");
    }

    #[test]
    fn accepts_text_field_alias() {
        let raw = r#"[{"text": "aliased", "start": 0.0, "end": 0.2}]"#;
        let words = words_from_json(raw).unwrap();
        assert_eq!(words.len(), 1);
        assert_eq!(words[0].text, "aliased");
    }

    #[test]
    fn skips_words_with_missing_fields() {
        let raw = r#"{"words": [
            {"word": "good", "start": 0.0, "end": 0.3},
            {"word": "no-times"},
            {"start": 0.3, "end": 0.6},
            {"word": "bad-time", "start": "soon", "end": 0.9},
            {"word": "fine", "start": 0.6, "end": 0.9}
        ]}"#;
        let words = words_from_json(raw).unwrap();
        assert_eq!(words.len(), 2);
        assert_eq!(words[0].text, "good");
        assert_eq!(words[1].text, "fine");
    }

    #[test]
    fn empty_word_list_is_not_an_error() {
        let words = words_from_json(r#"{"words": []}"#).unwrap();
        assert!(words.is_empty());
    }

    #[test]
    fn rejects_non_transcript_document() {
        assert!(words_from_json("42").is_err());
        assert!(words_from_json(r#"{"segments": []}"#).is_err());
        assert!(words_from_json("not json").is_err());
    }
}
