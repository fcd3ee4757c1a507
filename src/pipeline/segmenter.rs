//! Transcript normalization and sentence segmentation.
//!
//! Turns one raw, possibly run-on transcript into an ordered sequence of
//! candidate task fragments: lowercase and collapse whitespace, replace
//! spoken transition phrases with sentence boundaries, shield dotted
//! abbreviations and numeric dates from the splitter, insert a boundary
//! before a mid-sentence temporal marker that introduces a new task, split,
//! then clean and filter each fragment.
//!
//! This stage cannot fail; the worst case is an empty sequence.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::trace;

use crate::config::{Vocabulary, VocabularyError};

use super::collapse_ws;
use super::temporal::DAY_MARKED_PATTERN;

/// Characters that terminate a sentence
const SENTENCE_BREAKS: [char; 5] = ['.', '!', '?', ';', '\n'];

/// Placeholder for a period shielded from the splitter
const SHIELDED_DOT: char = '\u{1}';

/// Fragments longer than this are re-split on soft connectors
const SOFT_SPLIT_THRESHOLD: usize = 55;

/// Minimum fragment length in characters, unless it starts a short command
pub(crate) const MIN_FRAGMENT_CHARS: usize = 4;

/// Minimum alphabetic characters for a real task title
pub(crate) const MIN_TITLE_LETTERS: usize = 3;

/// Periods between digits ("24.02") are dates, not sentence ends
static DIGIT_DOT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d)\.(\d)").expect("valid digit-dot regex"));

/// Splits transcripts into candidate task fragments.
pub struct Segmenter {
    transitions: Vec<String>,
    filler_words: HashSet<String>,
    filler_phrases: Vec<String>,
    leading_fillers: Vec<String>,
    leading_prefixes: Vec<String>,
    short_commands: Vec<String>,
    soft_connectors: Vec<String>,
    re_abbreviation: Option<Regex>,
    re_marker: Regex,
    re_leading_time: Regex,
}

impl Segmenter {
    pub fn new(vocab: &Vocabulary) -> Result<Self, VocabularyError> {
        let months = vocab.month_pattern();
        let relative = vocab.relative_pattern();
        let preposition = vocab.preposition_pattern();

        let stems: Vec<String> = vocab
            .abbreviations
            .iter()
            .filter_map(|abbr| abbr.strip_suffix('.'))
            .map(regex::escape)
            .collect();
        let re_abbreviation = if stems.is_empty() {
            None
        } else {
            Some(Regex::new(&format!(r"\b({})\.", stems.join("|")))?)
        };

        Ok(Self {
            transitions: vocab.transition_phrases.clone(),
            filler_words: vocab.filler_words.iter().cloned().collect(),
            filler_phrases: vocab.filler_phrases.clone(),
            leading_fillers: vocab.leading_fillers.clone(),
            leading_prefixes: vocab.leading_prefixes.clone(),
            short_commands: vocab.short_commands.clone(),
            soft_connectors: vocab.soft_connectors.clone(),
            re_abbreviation,
            re_marker: Regex::new(&format!(
                r"\b(?:{relative}|(?:on\s+)?\d{{1,2}}\s*(?:{months})\b|\d{{1,2}}[./-]\d{{1,2}}(?:[./-]\d{{2,4}})?|(?:{DAY_MARKED_PATTERN}))"
            ))?,
            re_leading_time: Regex::new(&format!(
                r"^\s*(?:(?:{preposition})\s*)?\d{{1,2}}(?::\d{{2}}|\s+\d{{2}})?\b"
            ))?,
        })
    }

    /// Split a transcript into trimmed, non-empty task fragments, in
    /// original speech order.
    pub fn segment(&self, transcript: &str) -> Vec<String> {
        // newlines are dictation pauses; turn them into boundaries before
        // whitespace collapsing eats them
        let mut text = collapse_ws(&transcript.replace('\n', ". ")).to_lowercase();

        for phrase in &self.transitions {
            let needle = format!(" {phrase} ");
            if text.contains(&needle) {
                text = text.replace(&needle, ". ");
            }
        }

        if let Some(re) = &self.re_abbreviation {
            let replacement = format!("${{1}}{SHIELDED_DOT}");
            text = re.replace_all(&text, replacement.as_str()).into_owned();
        }

        let text = self.insert_marker_boundaries(&text);
        let text = DIGIT_DOT_RE
            .replace_all(&text, concat!("${1}", "\u{1}", "${2}"))
            .into_owned();

        let mut fragments = Vec::new();
        for raw in text.split(SENTENCE_BREAKS.as_slice()) {
            let restored = raw.replace(SHIELDED_DOT, ".");
            let cleaned = self.clean_fragment(&restored);
            if cleaned.is_empty() {
                continue;
            }
            if cleaned.chars().count() > SOFT_SPLIT_THRESHOLD {
                for piece in self.split_soft_connectors(&cleaned) {
                    let piece = self.clean_fragment(&piece);
                    if self.keep(&piece) {
                        fragments.push(piece);
                    }
                }
            } else if self.keep(&cleaned) {
                fragments.push(cleaned);
            }
        }

        trace!(count = fragments.len(), "segmented transcript");
        fragments
    }

    /// The "is this a real task" filter: non-empty, not filler, at least
    /// [`MIN_FRAGMENT_CHARS`] characters unless it starts with a short
    /// command verb, and at least [`MIN_TITLE_LETTERS`] alphabetic
    /// characters.
    pub fn is_task_like(&self, text: &str) -> bool {
        let t = text.trim();
        if t.is_empty() || self.is_filler(t) {
            return false;
        }
        if t.chars().count() < MIN_FRAGMENT_CHARS && !self.starts_with_short_command(t) {
            return false;
        }
        t.chars().filter(|c| c.is_alphabetic()).count() >= MIN_TITLE_LETTERS
    }

    /// Insert a sentence boundary before a temporal marker that begins a new
    /// task mid-sentence ("buy milk 5 march call mom"). A marker at the
    /// start of its sentence, or one with no task text left after the
    /// temporal expression ("buy milk today"), does not split.
    fn insert_marker_boundaries(&self, text: &str) -> String {
        let mut out = String::with_capacity(text.len() + 8);
        let mut last = 0;

        for m in self.re_marker.find_iter(text) {
            if at_sentence_start(text, m.start()) {
                continue;
            }
            if !self.continues_after(text, m.end()) {
                continue;
            }
            out.push_str(&text[last..m.start()]);
            let keep = out.trim_end().len();
            out.truncate(keep);
            out.push_str(". ");
            last = m.start();
        }

        out.push_str(&text[last..]);
        out
    }

    /// Whether task text remains in the same sentence after a temporal
    /// marker, skipping one trailing time expression ("завтра в 18:30").
    fn continues_after(&self, text: &str, end: usize) -> bool {
        let rest = text[end..].split(SENTENCE_BREAKS.as_slice()).next().unwrap_or("");
        let rest = match self.re_leading_time.find(rest) {
            Some(m) => &rest[m.end()..],
            None => rest,
        };
        rest.chars().filter(|c| c.is_alphabetic()).count() >= MIN_TITLE_LETTERS
    }

    fn clean_fragment(&self, raw: &str) -> String {
        let mut t = collapse_ws(raw);

        for filler in &self.leading_fillers {
            if let Some(rest) = t.strip_prefix(&format!("{filler} ")) {
                t = rest.trim_start().to_string();
            }
        }
        for prefix in &self.leading_prefixes {
            if let Some(rest) = t.strip_prefix(&format!("{prefix} ")) {
                t = rest.trim_start().to_string();
            }
        }

        t.trim().to_string()
    }

    fn keep(&self, fragment: &str) -> bool {
        if fragment.is_empty() || self.is_filler(fragment) {
            return false;
        }
        fragment.chars().count() >= MIN_FRAGMENT_CHARS || self.starts_with_short_command(fragment)
    }

    fn is_filler(&self, text: &str) -> bool {
        let t = text.trim().to_lowercase();
        if t.is_empty() {
            return false;
        }
        if self.filler_phrases.iter().any(|p| *p == t) {
            return true;
        }
        t.split_whitespace().all(|w| self.filler_words.contains(w))
    }

    fn starts_with_short_command(&self, text: &str) -> bool {
        text.split_whitespace()
            .next()
            .map(|first| self.short_commands.iter().any(|c| c == first))
            .unwrap_or(false)
    }

    fn split_soft_connectors(&self, fragment: &str) -> Vec<String> {
        let mut parts = vec![fragment.to_string()];
        for connector in &self.soft_connectors {
            let needle = format!(" {connector} ");
            parts = parts
                .iter()
                .flat_map(|part| part.split(needle.as_str()).map(str::to_string))
                .collect();
        }
        parts
            .into_iter()
            .map(|part| part.trim().to_string())
            .filter(|part| !part.is_empty())
            .collect()
    }
}

/// Whether nothing but whitespace separates this position from the start
/// of its sentence.
fn at_sentence_start(text: &str, start: usize) -> bool {
    text[..start]
        .rsplit(SENTENCE_BREAKS.as_slice())
        .next()
        .unwrap_or("")
        .trim()
        .is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segmenter() -> Segmenter {
        Segmenter::new(&Vocabulary::default()).unwrap()
    }

    #[test]
    fn test_split_on_transition_phrases() {
        let fragments = segmenter().segment("купить молоко потом позвонить маме");
        assert_eq!(fragments, vec!["купить молоко", "позвонить маме"]);
    }

    #[test]
    fn test_split_on_punctuation_and_newlines() {
        let fragments = segmenter().segment("купить молоко! позвонить маме\nзабрать посылку");
        assert_eq!(
            fragments,
            vec!["купить молоко", "позвонить маме", "забрать посылку"]
        );
    }

    #[test]
    fn test_idempotent_on_own_output() {
        let segmenter = segmenter();
        let fragments =
            segmenter.segment("Ну купить молоко, и потом позвонить маме 5 марта. Забрать посылку");
        assert!(!fragments.is_empty());
        for fragment in &fragments {
            assert_eq!(segmenter.segment(fragment), vec![fragment.clone()]);
        }
    }

    #[test]
    fn test_abbreviations_do_not_split() {
        let fragments = segmenter().segment("зайти на ул. ленина 5 потом домой");
        assert_eq!(fragments, vec!["зайти на ул. ленина 5", "домой"]);
    }

    #[test]
    fn test_numeric_date_does_not_split() {
        let fragments = segmenter().segment("сходить к врачу 24.02");
        assert_eq!(fragments, vec!["сходить к врачу 24.02"]);
    }

    #[test]
    fn test_boundary_before_mid_sentence_marker() {
        let fragments = segmenter().segment("купить молоко 5 марта позвонить маме");
        assert_eq!(fragments, vec!["купить молоко", "5 марта позвонить маме"]);
    }

    #[test]
    fn test_no_boundary_before_trailing_marker() {
        let fragments = segmenter().segment("купить молоко завтра");
        assert_eq!(fragments, vec!["купить молоко завтра"]);
    }

    #[test]
    fn test_no_boundary_when_only_time_follows() {
        let fragments = segmenter().segment("спортзал завтра в 18:30");
        assert_eq!(fragments, vec!["спортзал завтра в 18:30"]);
    }

    #[test]
    fn test_no_boundary_before_bare_number() {
        let fragments = segmenter().segment("купить 2 литра молока для дома");
        assert_eq!(fragments, vec!["купить 2 литра молока для дома"]);
    }

    #[test]
    fn test_filler_fragments_dropped() {
        assert!(segmenter().segment("ну вот и всё").is_empty());
        assert!(segmenter().segment("в принципе всё. что дальше").is_empty());
    }

    #[test]
    fn test_short_fragments_dropped_unless_command() {
        let segmenter = segmenter();
        assert!(segmenter.segment("эх").is_empty());
        assert_eq!(segmenter.segment("buy milk. go"), vec!["buy milk", "go"]);
    }

    #[test]
    fn test_leading_fillers_and_need_prefixes_trimmed() {
        let fragments = segmenter().segment("короче мне нужно купить молоко");
        assert_eq!(fragments, vec!["купить молоко"]);
    }

    #[test]
    fn test_long_fragment_split_on_soft_connectors() {
        let fragments = segmenter()
            .segment("сходить в магазин за продуктами на неделю и приготовить ужин для всей семьи");
        assert_eq!(
            fragments,
            vec![
                "сходить в магазин за продуктами на неделю",
                "приготовить ужин для всей семьи"
            ]
        );
    }

    #[test]
    fn test_is_task_like() {
        let segmenter = segmenter();
        assert!(segmenter.is_task_like("купить молоко"));
        assert!(segmenter.is_task_like("buy"));
        assert!(!segmenter.is_task_like(""));
        assert!(!segmenter.is_task_like("эх"));
        assert!(!segmenter.is_task_like("ну вот и всё"));
        assert!(!segmenter.is_task_like("№ 5 !"));
    }
}
