//! Task drafts and priority levels.
//!
//! A [`TaskDraft`] is the pipeline's output unit: one structured task
//! extracted from one transcript fragment, prior to any storage identity
//! being assigned by the (external) persistence layer.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Minutes before the due instant a reminder would fire, if enabled
pub const DEFAULT_REMINDER_LEAD_MINUTES: u32 = 10;

/// Task priority, ordered by severity.
///
/// The ordering is load-bearing: when both urgent and important vocabulary
/// could match a fragment, urgent wins.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    #[default]
    Normal,
    Important,
    Urgent,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Normal => "normal",
            Priority::Important => "important",
            Priority::Urgent => "urgent",
        }
    }
}

/// One extracted task, immutable within the pipeline.
///
/// Two drafts are content-equal when title, due instant, address and
/// priority match; the generated `id` is excluded from equality.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskDraft {
    /// Unique identifier, not meaningful for equality
    pub id: Uuid,

    /// Display title: capitalized, trimmed, never empty
    pub title: String,

    /// Due instant; always carries both a date and a time-of-day
    pub due: Option<NaiveDateTime>,

    /// Address span extracted from the fragment, if any
    pub address: Option<String>,

    /// Resolved priority (never undetermined)
    pub priority: Priority,

    /// Reminder toggle, off by default; the UI layer may flip it later
    pub reminder_enabled: bool,

    /// Reminder lead time in minutes
    pub reminder_lead_minutes: u32,
}

impl TaskDraft {
    /// Create a draft with a fresh id and reminder defaults
    pub fn new(
        title: impl Into<String>,
        due: Option<NaiveDateTime>,
        address: Option<String>,
        priority: Priority,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            due,
            address,
            priority,
            reminder_enabled: false,
            reminder_lead_minutes: DEFAULT_REMINDER_LEAD_MINUTES,
        }
    }
}

impl PartialEq for TaskDraft {
    fn eq(&self, other: &Self) -> bool {
        self.title == other.title
            && self.due == other.due
            && self.address == other.address
            && self.priority == other.priority
    }
}

impl Eq for TaskDraft {}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    #[test]
    fn test_equality_ignores_id() {
        let due = Some(at(2026, 2, 20, 9, 0));
        let a = TaskDraft::new("Купить молоко", due, None, Priority::Normal);
        let b = TaskDraft::new("Купить молоко", due, None, Priority::Normal);
        assert_ne!(a.id, b.id);
        assert_eq!(a, b);
    }

    #[test]
    fn test_equality_considers_content() {
        let a = TaskDraft::new("Купить молоко", None, None, Priority::Normal);
        let b = TaskDraft::new("Купить молоко", None, None, Priority::Urgent);
        assert_ne!(a, b);
    }

    #[test]
    fn test_reminder_defaults() {
        let draft = TaskDraft::new("Call mom", None, None, Priority::Normal);
        assert!(!draft.reminder_enabled);
        assert_eq!(draft.reminder_lead_minutes, 10);
    }

    #[test]
    fn test_priority_ordering() {
        assert!(Priority::Urgent > Priority::Important);
        assert!(Priority::Important > Priority::Normal);
        assert_eq!(Priority::default(), Priority::Normal);
    }
}
