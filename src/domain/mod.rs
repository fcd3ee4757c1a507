//! Data structures produced by the extraction pipeline.

pub mod draft;

pub use draft::{Priority, TaskDraft, DEFAULT_REMINDER_LEAD_MINUTES};
