//! Urgency/importance classification.
//!
//! Whole-word vocabulary matching: the urgent list is tried first, then the
//! important list; absent both, priority is Normal and the fragment is
//! returned untouched. Matched vocabulary is stripped from the fragment.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::config::{phrase_pattern, Vocabulary, VocabularyError};
use crate::domain::Priority;

use super::collapse_ws;

/// Punctuation left dangling at the front after vocabulary removal
static LEADING_PUNCT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*[,:\-]\s*").expect("valid leading-punct regex"));

/// Result of classifying one fragment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriorityMatch {
    pub priority: Priority,

    /// Fragment with the matched vocabulary removed
    pub text: String,
}

/// Classifies fragments by urgency/importance vocabulary.
pub struct PriorityClassifier {
    urgent: Vec<Regex>,
    important: Vec<Regex>,
}

impl PriorityClassifier {
    pub fn new(vocab: &Vocabulary) -> Result<Self, VocabularyError> {
        Ok(Self {
            urgent: compile_markers(&vocab.urgent_markers)?,
            important: compile_markers(&vocab.important_markers)?,
        })
    }

    /// Classify a fragment and strip the matched vocabulary.
    ///
    /// Urgent wins over important when both could match; only the winning
    /// category's vocabulary is removed.
    pub fn classify(&self, fragment: &str) -> PriorityMatch {
        let probe = normalize(fragment);

        if self.urgent.iter().any(|re| re.is_match(&probe)) {
            return PriorityMatch {
                priority: Priority::Urgent,
                text: strip_all(fragment, &self.urgent),
            };
        }

        if self.important.iter().any(|re| re.is_match(&probe)) {
            return PriorityMatch {
                priority: Priority::Important,
                text: strip_all(fragment, &self.important),
            };
        }

        PriorityMatch {
            priority: Priority::Normal,
            text: fragment.to_string(),
        }
    }
}

/// Compile marker phrases as case-insensitive whole-word patterns, phrases
/// before single words so "очень срочно" does not leave "очень" behind.
fn compile_markers(markers: &[String]) -> Result<Vec<Regex>, VocabularyError> {
    let mut sorted: Vec<&String> = markers.iter().collect();
    sorted.sort_by(|a, b| {
        let words = |s: &str| s.split_whitespace().count();
        words(b).cmp(&words(a)).then(b.len().cmp(&a.len()))
    });

    sorted
        .into_iter()
        .map(|marker| {
            Regex::new(&format!(r"(?i)\b(?:{})\b", phrase_pattern(marker))).map_err(Into::into)
        })
        .collect()
}

/// Lowercase, fold the ё/е spelling variant, collapse whitespace
fn normalize(fragment: &str) -> String {
    collapse_ws(&fragment.to_lowercase().replace('ё', "е"))
}

fn strip_all(fragment: &str, patterns: &[Regex]) -> String {
    let mut text = fragment.to_string();
    for re in patterns {
        text = re.replace_all(&text, "").into_owned();
    }
    let collapsed = collapse_ws(&text);
    LEADING_PUNCT_RE.replace(&collapsed, "").trim().to_string()
}
