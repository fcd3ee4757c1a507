//! The extraction pipeline.
//!
//! Five stages composed in order, each a pure transformation:
//! segmentation, temporal resolution, priority classification, address
//! extraction, and the orchestrator that folds the middle three over every
//! fragment while threading the carried date.

pub mod address;
pub mod orchestrator;
pub mod priority;
pub mod segmenter;
pub mod temporal;

pub use address::{AddressExtractor, AddressMatch};
pub use orchestrator::TaskExtractor;
pub use priority::{PriorityClassifier, PriorityMatch};
pub use segmenter::Segmenter;
pub use temporal::{TemporalMatch, TemporalResolver};

use std::ops::Range;

/// Normalize whitespace: collapse runs of whitespace to single space, trim
pub(crate) fn collapse_ws(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Remove a matched byte range from a string and renormalize whitespace
pub(crate) fn splice_out(text: &str, range: Range<usize>) -> String {
    let mut out = String::with_capacity(text.len());
    out.push_str(&text[..range.start]);
    out.push_str(&text[range.end..]);
    collapse_ws(&out)
}

/// Uppercase the first character, leaving the rest untouched
pub(crate) fn capitalize_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
