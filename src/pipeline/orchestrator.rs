//! Extraction orchestrator.
//!
//! Drives the temporal, priority and address stages over every fragment the
//! segmenter produces, in original speech order. The only cross-fragment
//! state is the carried date: a fragment without its own temporal
//! expression inherits the most recently resolved one, until it is
//! overwritten or explicitly reset by a broken relative marker.

use chrono::NaiveDateTime;
use tracing::{debug, instrument};

use crate::config::{Clock, Vocabulary, VocabularyError};
use crate::domain::TaskDraft;

use super::address::AddressExtractor;
use super::capitalize_first;
use super::priority::PriorityClassifier;
use super::segmenter::Segmenter;
use super::temporal::TemporalResolver;

/// Turns transcripts into ordered task drafts.
pub struct TaskExtractor {
    segmenter: Segmenter,
    temporal: TemporalResolver,
    priority: PriorityClassifier,
    address: AddressExtractor,
    clock: Box<dyn Clock>,
}

impl TaskExtractor {
    /// Build an extractor from a vocabulary and a reference clock.
    ///
    /// Validates the vocabulary and compiles every stage's patterns once.
    pub fn new(vocabulary: &Vocabulary, clock: Box<dyn Clock>) -> Result<Self, VocabularyError> {
        vocabulary.validate()?;

        Ok(Self {
            segmenter: Segmenter::new(vocabulary)?,
            temporal: TemporalResolver::new(vocabulary)?,
            priority: PriorityClassifier::new(vocabulary)?,
            address: AddressExtractor::new(vocabulary)?,
            clock,
        })
    }

    /// Extract task drafts from one transcript.
    ///
    /// The clock is read once so every fragment resolves against the same
    /// "now". Fragments that fail the task-quality filter are skipped with
    /// no record and no error.
    #[instrument(skip(self, transcript))]
    pub fn extract(&self, transcript: &str) -> Vec<TaskDraft> {
        let now = self.clock.now();
        let fragments = self.segmenter.segment(transcript);
        debug!(count = fragments.len(), "segmented transcript");

        let mut carried: Option<NaiveDateTime> = None;
        let mut drafts = Vec::new();

        for fragment in fragments {
            let has_relative = self.temporal.has_relative_marker(&fragment);
            let temporal = self.temporal.resolve(&fragment, now);
            carried = advance_carried(carried, has_relative, temporal.instant);

            let priority = self.priority.classify(&temporal.text);
            let address = self.address.extract(&priority.text);

            let cleaned = trim_title(&address.text);
            if !self.segmenter.is_task_like(cleaned) {
                debug!(%fragment, "dropped low-quality fragment");
                continue;
            }

            drafts.push(TaskDraft::new(
                capitalize_first(cleaned),
                carried,
                address.address,
                priority.priority,
            ));
        }

        debug!(count = drafts.len(), "extraction finished");
        drafts
    }
}

/// Advance the carried-date accumulator for one fragment.
///
/// A resolved instant always wins. A fragment that mentioned a relative-day
/// word but still failed to resolve must not inherit an earlier date, so the
/// accumulator resets. Otherwise the previous date persists.
fn advance_carried(
    carried: Option<NaiveDateTime>,
    has_relative_marker: bool,
    resolved: Option<NaiveDateTime>,
) -> Option<NaiveDateTime> {
    match resolved {
        Some(instant) => Some(instant),
        None if has_relative_marker => None,
        None => carried,
    }
}

/// Trim whitespace and the punctuation that span removal leaves at the edges
fn trim_title(text: &str) -> &str {
    text.trim()
        .trim_matches(|c: char| c.is_whitespace() || matches!(c, ',' | ';' | ':' | '-'))
}
