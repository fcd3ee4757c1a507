//! Vocabulary configuration and the reference clock.
//!
//! All locale-specific knowledge (transition phrases, month names,
//! relative-day words, priority vocabulary, street markers) lives in a
//! [`Vocabulary`] value. The built-in default is Russian-first with partial
//! English/German markers; alternative packs can be loaded from YAML.
//!
//! The pipeline never reads the wall clock directly: "now" comes from a
//! [`Clock`] injected into the extractor, so date resolution is fully
//! deterministic in tests.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while validating or compiling a vocabulary.
///
/// The built-in default vocabulary never produces these; they exist for
/// user-supplied packs with empty lists or broken entries.
#[derive(Debug, Error)]
pub enum VocabularyError {
    #[error("vocabulary list '{0}' must not be empty")]
    EmptyList(&'static str),

    #[error("month '{name}' maps to {number}, expected 1..=12")]
    InvalidMonth { name: String, number: u32 },

    #[error("invalid vocabulary pattern: {0}")]
    Pattern(#[from] regex::Error),
}

/// Word lists driving every pattern in the pipeline.
///
/// Lists are matched case-insensitively on already-lowercased fragments.
/// Multi-word entries are matched as whole phrases with flexible internal
/// whitespace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Vocabulary {
    /// Spoken run-on connectors replaced with sentence boundaries
    pub transition_phrases: Vec<String>,

    /// Single filler words; a fragment made only of these is dropped
    pub filler_words: Vec<String>,

    /// Exact throwaway utterances dropped as whole fragments
    pub filler_phrases: Vec<String>,

    /// Conversational openers trimmed from the front of a fragment
    pub leading_fillers: Vec<String>,

    /// "I need to"-style prefixes trimmed from the front of a fragment
    pub leading_prefixes: Vec<String>,

    /// Verbs that make a shorter-than-minimum title acceptable
    pub short_commands: Vec<String>,

    /// Dotted abbreviations shielded from sentence splitting
    pub abbreviations: Vec<String>,

    /// Connectors used to break up overlong fragments
    pub soft_connectors: Vec<String>,

    /// Month name (as dictated) to month number
    pub months: BTreeMap<String, u32>,

    /// Words meaning "today"
    pub today_words: Vec<String>,

    /// Words meaning "tomorrow"
    pub tomorrow_words: Vec<String>,

    /// Words/phrases meaning "day after tomorrow", spelling variants included
    pub day_after_tomorrow_words: Vec<String>,

    /// Prepositions introducing a clock time ("в 17", "at 5")
    pub time_prepositions: Vec<String>,

    /// Urgent-priority vocabulary (checked before important)
    pub urgent_markers: Vec<String>,

    /// Important-priority vocabulary
    pub important_markers: Vec<String>,

    /// Street-type words that introduce an address span
    pub street_markers: Vec<String>,

    /// Explicit "by address:"-style prefixes
    pub address_prefixes: Vec<String>,
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self {
            transition_phrases: strings(&[
                "и потом", "потом же", "потом", "затем", "после этого", "далее",
                "и дальше", "дальше", "и еще", "и ещё", "что еще", "что ещё",
                "еще", "ещё", "after that", "and then", "then", "further",
                "and also", "also",
            ]),
            filler_words: strings(&[
                "ну", "итак", "короче", "значит", "так", "вот", "получается",
                "все", "всё", "и", "а", "well", "so", "anyway", "okay",
            ]),
            filler_phrases: strings(&[
                "всё", "все", "я ну вот и всё", "ну вот и всё", "что дальше",
                "в принципе всё", "that's all", "that's it",
            ]),
            leading_fillers: strings(&[
                "итак", "ну", "короче", "в общем", "значит", "так",
                "получается", "well", "so", "okay", "basically",
            ]),
            leading_prefixes: strings(&[
                "мне нужно", "надо", "нужно", "i need to", "i have to",
                "need to",
            ]),
            short_commands: strings(&["call", "buy", "go", "pay"]),
            abbreviations: strings(&[
                "ул.", "пр.", "пер.", "пл.", "д.", "кв.", "st.", "str.",
                "rd.", "ave.", "blvd.", "al.", "ul.",
            ]),
            soft_connectors: strings(&[
                "также", "и еще", "и ещё", "ещё", "еще", "может быть", "плюс",
                "а еще", "а ещё", "и", "and", "plus", "also", "maybe",
            ]),
            months: default_months(),
            today_words: strings(&["сегодня", "today"]),
            tomorrow_words: strings(&["завтра", "tomorrow"]),
            day_after_tomorrow_words: strings(&[
                "послезавтра", "после завтра", "day after tomorrow",
                "the day after tomorrow",
            ]),
            time_prepositions: strings(&["в", "at", "um"]),
            urgent_markers: strings(&[
                "срочно", "очень срочно", "прям срочно", "немедленно",
                "как можно скорее", "в крайние сроки", "в кратчайшие сроки",
                "до конца дня", "urgent", "asap", "as soon as possible",
                "sofort", "dringend",
            ]),
            important_markers: strings(&[
                "важно", "очень важно", "крайне важно", "это важно",
                "приоритет", "приоритетно", "необходимо", "important",
                "priority", "wichtig",
            ]),
            street_markers: strings(&[
                "улица", "ул.", "проспект", "пр-т", "переулок", "пер.",
                "площадь", "шоссе", "street", "st.", "road", "rd.", "avenue",
                "ave.", "boulevard", "blvd", "straße", "str.", "strasse",
                "weg", "platz", "allee", "ulica", "ul.", "aleja", "al.",
                "plac",
            ]),
            address_prefixes: strings(&[
                "по адресу", "адрес", "by address", "address",
                "an die adresse", "adresse",
            ]),
        }
    }
}

impl Vocabulary {
    /// Load a vocabulary pack from a YAML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read vocabulary file: {}", path.display()))?;

        Self::from_yaml(&content)
    }

    /// Parse a vocabulary pack from YAML content
    pub fn from_yaml(content: &str) -> Result<Self> {
        serde_yaml::from_str(content).context("Failed to parse vocabulary YAML")
    }

    /// Validate the vocabulary definition
    ///
    /// Lists the pipeline cannot function without must be non-empty, and
    /// month numbers must be in range. Called by the extractor constructor.
    pub fn validate(&self) -> Result<(), VocabularyError> {
        if self.months.is_empty() {
            return Err(VocabularyError::EmptyList("months"));
        }

        for (name, number) in &self.months {
            if !(1..=12).contains(number) {
                return Err(VocabularyError::InvalidMonth {
                    name: name.clone(),
                    number: *number,
                });
            }
        }

        let required: [(&'static str, &Vec<String>); 5] = [
            ("today_words", &self.today_words),
            ("tomorrow_words", &self.tomorrow_words),
            ("day_after_tomorrow_words", &self.day_after_tomorrow_words),
            ("time_prepositions", &self.time_prepositions),
            ("street_markers", &self.street_markers),
        ];
        for (field, list) in required {
            if list.is_empty() {
                return Err(VocabularyError::EmptyList(field));
            }
        }

        if self.address_prefixes.is_empty() {
            return Err(VocabularyError::EmptyList("address_prefixes"));
        }

        Ok(())
    }

    /// Alternation over month names, longest first
    pub(crate) fn month_pattern(&self) -> String {
        let mut names: Vec<String> = self.months.keys().map(|n| regex::escape(n)).collect();
        names.sort_by(|a, b| b.len().cmp(&a.len()));
        names.join("|")
    }

    /// Alternation over every relative-day word and phrase
    pub(crate) fn relative_pattern(&self) -> String {
        let mut all = self.day_after_tomorrow_words.clone();
        all.extend(self.tomorrow_words.iter().cloned());
        all.extend(self.today_words.iter().cloned());
        word_list_pattern(&all)
    }

    /// Alternation over time prepositions
    pub(crate) fn preposition_pattern(&self) -> String {
        word_list_pattern(&self.time_prepositions)
    }
}

/// Escape a phrase into a pattern with flexible internal whitespace
pub(crate) fn phrase_pattern(phrase: &str) -> String {
    phrase
        .split_whitespace()
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join(r"\s+")
}

/// Join phrases into an alternation, longest first so that compound
/// phrases are not shadowed by their single-word substrings
pub(crate) fn word_list_pattern(words: &[String]) -> String {
    let mut alts: Vec<String> = words.iter().map(|w| phrase_pattern(w)).collect();
    alts.sort_by(|a, b| b.len().cmp(&a.len()));
    alts.join("|")
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn default_months() -> BTreeMap<String, u32> {
    let entries = [
        ("января", 1),
        ("февраля", 2),
        ("марта", 3),
        ("апреля", 4),
        ("мая", 5),
        ("июня", 6),
        ("июля", 7),
        ("августа", 8),
        ("сентября", 9),
        ("октября", 10),
        ("ноября", 11),
        ("декабря", 12),
        ("january", 1),
        ("february", 2),
        ("march", 3),
        ("april", 4),
        ("may", 5),
        ("june", 6),
        ("july", 7),
        ("august", 8),
        ("september", 9),
        ("october", 10),
        ("november", 11),
        ("december", 12),
    ];

    entries
        .into_iter()
        .map(|(name, number)| (name.to_string(), number))
        .collect()
}

/// Source of "now" for date resolution.
///
/// The extractor reads the clock once per call so every fragment of one
/// transcript resolves against the same instant.
pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveDateTime;
}

/// Wall-clock time in the local timezone
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// Fixed instant, for tests and the CLI `--now` override
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDateTime);

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}
