//! dictask - voice-dictation task extraction
//!
//! A rule-based pipeline that turns one free-form, possibly run-on
//! voice-transcribed string into a sequence of structured task drafts, each
//! with an optional due instant, an optional address and a priority level.
//!
//! # Architecture
//!
//! Five pure stages composed in order:
//! - Segmenter: normalizes the transcript and splits it into candidate
//!   task fragments
//! - Temporal resolver: ordered pattern precedence over relative days,
//!   clock times and three date forms, with calendar rollover
//! - Priority classifier: urgent-first vocabulary matching
//! - Address extractor: prefix and street-marker forms
//! - Orchestrator: folds the stages over the fragments, carrying the last
//!   resolved date forward across fragments that lack their own
//!
//! # Modules
//!
//! - `config`: vocabulary packs and the injected reference clock
//! - `domain`: output data structures (TaskDraft, Priority)
//! - `pipeline`: the five extraction stages
//! - `cli`: command-line interface
//!
//! # Usage
//!
//! ```bash
//! # Extract tasks from a dictated transcript
//! echo "купить молоко завтра потом позвонить маме" | dictask extract
//!
//! # Deterministic date resolution
//! dictask extract --input memo.txt --now 2026-02-19T10:00 --format json
//! ```

pub mod cli;
pub mod config;
pub mod domain;
pub mod pipeline;

// Re-export main types at crate root for convenience
pub use config::{Clock, FixedClock, SystemClock, Vocabulary, VocabularyError};
pub use domain::{Priority, TaskDraft};
pub use pipeline::{
    AddressExtractor, AddressMatch, PriorityClassifier, PriorityMatch, Segmenter, TaskExtractor,
    TemporalMatch, TemporalResolver,
};
