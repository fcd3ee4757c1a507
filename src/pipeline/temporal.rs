//! Temporal expression resolution.
//!
//! Given one fragment and a reference "now", finds at most one date and one
//! time-of-day, removes the matched spans, and merges the parts into an
//! absolute instant. Matchers run in fixed priority so that specific or
//! context-sensitive forms are not shadowed by generic numeric patterns:
//!
//! 1. Relative-day markers (today / tomorrow / day after tomorrow)
//! 2. Clock times: `HH:MM`, then spaced "17 00", then hour-only "в 17"
//! 3. Numeric dates `D.M[.YYYY]` (also `/` and `-` separators)
//! 4. Named-month dates ("3 марта", "24 february")
//! 5. Marked day-of-month ("22-го", "22 числа", "the 22nd"); a bare number
//!    is never treated as a date
//!
//! # Design Decisions
//!
//! - **First match only**: per category, only the first match is considered;
//!   if its numeric ranges are invalid the category yields nothing.
//! - **No lookarounds**: the `regex` crate has none, so the "at 22" vs
//!   "22nd" conflict is an explicit suffix check after the match.
//! - **Total**: every input produces a result; "no instant" is a value.

use std::collections::BTreeMap;
use std::ops::Range;

use chrono::{Datelike, Days, NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::config::{word_list_pattern, Vocabulary, VocabularyError};

use super::{collapse_ws, splice_out};

/// Default hour for dates dictated without a time of day
const DEFAULT_HOUR: u32 = 9;

/// Marked day-of-month forms, shared with the segmenter's boundary scan.
///
/// Requires an explicit suffix (or "day"/"the Nth" framing); a bare number
/// must never match.
pub(crate) const DAY_MARKED_PATTERN: &str = r"(?:on\s+)?(?:the\s+)?\d{1,2}\s*(?:-?\s*(?:го|е)|числа|дня|день|st|nd|rd|th)\b|day\s+\d{1,2}\b";

static HYPHEN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s*-\s*").expect("valid hyphen regex"));
static LEAD_ZERO_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:0|00)\s+").expect("valid leading-zero regex"));
static TRAIL_ZERO_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+(?:0|00)$").expect("valid trailing-zero regex"));
static EDGE_HYPHEN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^-|-$").expect("valid edge-hyphen regex"));
// no trailing \b: English ordinals glue the suffix to the digits ("19th")
static DAY_NUMBER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(\d{1,2})").expect("valid day-number regex"));

/// Result of temporal resolution over one fragment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemporalMatch {
    /// Resolved absolute instant, if any; always date + time-of-day
    pub instant: Option<NaiveDateTime>,

    /// The fragment with the matched spans removed, whitespace renormalized
    pub text: String,
}

/// Resolves temporal expressions against an injected "now".
///
/// All patterns are compiled once at construction from the vocabulary;
/// resolution itself is a pure function of (fragment, now).
pub struct TemporalResolver {
    /// Relative-day matchers, most specific first, with their day offsets
    relative: Vec<(u64, Regex)>,
    re_any_relative: Regex,
    re_time_hhmm: Regex,
    re_time_spaced: Regex,
    re_time_hour: Regex,
    re_day_suffix_ahead: Regex,
    re_numeric_date: Regex,
    re_named_date: Regex,
    re_day_marked: Regex,
    months: BTreeMap<String, u32>,
}

impl TemporalResolver {
    pub fn new(vocab: &Vocabulary) -> Result<Self, VocabularyError> {
        let preposition = vocab.preposition_pattern();
        let months_alt = vocab.month_pattern();

        let day_after = word_list_pattern(&vocab.day_after_tomorrow_words);
        let tomorrow = word_list_pattern(&vocab.tomorrow_words);
        let today = word_list_pattern(&vocab.today_words);

        // "day after tomorrow" first: the longer phrase contains "tomorrow"
        let relative = vec![
            (2, Regex::new(&format!(r"\b(?:{day_after})\b"))?),
            (1, Regex::new(&format!(r"\b(?:{tomorrow})\b"))?),
            (0, Regex::new(&format!(r"\b(?:{today})\b"))?),
        ];

        Ok(Self {
            relative,
            re_any_relative: Regex::new(&format!(r"\b(?:{})\b", vocab.relative_pattern()))?,
            re_time_hhmm: Regex::new(&format!(
                r"\b(?:(?:{preposition})\s*)?(\d{{1,2}}):(\d{{2}})\b"
            ))?,
            re_time_spaced: Regex::new(&format!(
                r"\b(?:(?:{preposition})\s*)?(\d{{1,2}})\s+(\d{{2}})\b"
            ))?,
            re_time_hour: Regex::new(&format!(r"\b(?:{preposition})\s*(\d{{1,2}})\b"))?,
            re_day_suffix_ahead: Regex::new(
                r"^\s*-?\s*(?:го|числа|дня|день|st|nd|rd|th|е\b)",
            )?,
            re_numeric_date: Regex::new(
                r"\b(\d{1,2})[./-](\d{1,2})(?:[./-](\d{2,4}))?\b",
            )?,
            re_named_date: Regex::new(&format!(
                r"\b(?:on\s+)?(\d{{1,2}})\s*({months_alt})\b"
            ))?,
            re_day_marked: Regex::new(&format!(r"\b(?:{DAY_MARKED_PATTERN})"))?,
            months: vocab.months.clone(),
        })
    }

    /// Resolve the temporal expression in a fragment, if any.
    ///
    /// Returns the instant (or `None`) and the fragment with the matched
    /// spans removed. The instant always carries both a date and a
    /// time-of-day: 09:00 for numeric/named/marked dates without a time,
    /// start-of-day for relative-day markers without a time, and "today"
    /// as the base date when only a time was found.
    pub fn resolve(&self, fragment: &str, now: NaiveDateTime) -> TemporalMatch {
        let today = now.date();
        let mut title = normalize(fragment);
        let mut date: Option<NaiveDateTime> = None;
        let mut time: Option<(u32, u32)> = None;

        if let Some((instant, cleaned)) = self.extract_relative(&title, today) {
            date = Some(instant);
            title = cleaned;
        }

        if let Some((at, range)) = self.extract_time_hhmm(&title) {
            time = Some(at);
            title = splice_out(&title, range);
        }
        if time.is_none() {
            if let Some((at, range)) = self.extract_time_spaced(&title) {
                time = Some(at);
                title = splice_out(&title, range);
            }
        }
        if time.is_none() {
            if let Some((at, range)) = self.extract_time_hour_only(&title) {
                time = Some(at);
                title = splice_out(&title, range);
            }
        }

        if date.is_none() {
            if let Some((instant, range)) = self.extract_numeric_date(&title, today) {
                date = Some(instant);
                title = splice_out(&title, range);
            }
        }
        if date.is_none() {
            if let Some((instant, range)) = self.extract_named_date(&title, today) {
                date = Some(instant);
                title = splice_out(&title, range);
            }
        }
        if date.is_none() {
            if let Some((instant, range)) = self.extract_marked_day(&title, today) {
                date = Some(instant);
                title = splice_out(&title, range);
            }
        }

        let instant = match (date, time) {
            (None, None) => None,
            (Some(d), None) => Some(d),
            (None, Some((hour, minute))) => today.and_hms_opt(hour, minute, 0),
            (Some(d), Some((hour, minute))) => d.date().and_hms_opt(hour, minute, 0),
        };

        TemporalMatch {
            instant,
            text: clean_title(&title),
        }
    }

    /// Whether the fragment mentions a relative-day word at all, regardless
    /// of whether resolution succeeds. The orchestrator uses this to decide
    /// when to drop a stale carried date.
    pub fn has_relative_marker(&self, fragment: &str) -> bool {
        self.re_any_relative.is_match(&normalize(fragment))
    }

    // --- Relative days ---

    fn extract_relative(&self, t: &str, today: NaiveDate) -> Option<(NaiveDateTime, String)> {
        for (offset, re) in &self.relative {
            if re.is_match(t) {
                let day = today.checked_add_days(Days::new(*offset))?;
                let instant = day.and_hms_opt(0, 0, 0)?;
                let cleaned = collapse_ws(&re.replace_all(t, ""));
                return Some((instant, cleaned));
            }
        }
        None
    }

    // --- Times ---

    fn extract_time_hhmm(&self, t: &str) -> Option<((u32, u32), Range<usize>)> {
        let caps = self.re_time_hhmm.captures(t)?;
        let whole = caps.get(0)?;
        let hour: u32 = caps.get(1)?.as_str().parse().ok()?;
        let minute: u32 = caps.get(2)?.as_str().parse().ok()?;
        if hour > 23 || minute > 59 {
            return None;
        }
        Some(((hour, minute), whole.range()))
    }

    fn extract_time_spaced(&self, t: &str) -> Option<((u32, u32), Range<usize>)> {
        let caps = self.re_time_spaced.captures(t)?;
        let whole = caps.get(0)?;
        let hour: u32 = caps.get(1)?.as_str().parse().ok()?;
        let minute: u32 = caps.get(2)?.as_str().parse().ok()?;
        if hour > 23 || minute > 59 {
            return None;
        }
        Some(((hour, minute), whole.range()))
    }

    /// Hour-only "в 17" form. Skips candidates followed by a day suffix so
    /// "в 22-го" stays a marked day-of-month, not ten o'clock at night.
    fn extract_time_hour_only(&self, t: &str) -> Option<((u32, u32), Range<usize>)> {
        for caps in self.re_time_hour.captures_iter(t) {
            let whole = caps.get(0)?;
            if self.re_day_suffix_ahead.is_match(&t[whole.end()..]) {
                continue;
            }
            let hour: u32 = caps.get(1)?.as_str().parse().ok()?;
            if hour > 23 {
                return None;
            }
            return Some(((hour, 0), whole.range()));
        }
        None
    }

    // --- Dates ---

    fn extract_numeric_date(
        &self,
        t: &str,
        today: NaiveDate,
    ) -> Option<(NaiveDateTime, Range<usize>)> {
        let caps = self.re_numeric_date.captures(t)?;
        let whole = caps.get(0)?;
        let day: u32 = caps.get(1)?.as_str().parse().ok()?;
        let month: u32 = caps.get(2)?.as_str().parse().ok()?;
        if !(1..=31).contains(&day) || !(1..=12).contains(&month) {
            return None;
        }

        let explicit_year = match caps.get(3) {
            Some(raw) => {
                let value: i32 = raw.as_str().parse().ok()?;
                Some(if raw.as_str().len() == 2 { 2000 + value } else { value })
            }
            None => None,
        };
        let year = explicit_year.unwrap_or_else(|| today.year());

        let mut date = NaiveDate::from_ymd_opt(year, month, day)?;

        // Year-less dates already behind us roll forward one year
        if explicit_year.is_none() && date < today {
            date = date.with_year(year + 1)?;
        }

        Some((date.and_hms_opt(DEFAULT_HOUR, 0, 0)?, whole.range()))
    }

    fn extract_named_date(
        &self,
        t: &str,
        today: NaiveDate,
    ) -> Option<(NaiveDateTime, Range<usize>)> {
        let caps = self.re_named_date.captures(t)?;
        let whole = caps.get(0)?;
        let day: u32 = caps.get(1)?.as_str().parse().ok()?;
        let month = *self.months.get(caps.get(2)?.as_str())?;
        if !(1..=31).contains(&day) {
            return None;
        }

        let mut date = NaiveDate::from_ymd_opt(today.year(), month, day)?;
        if date < today {
            date = date.with_year(today.year() + 1)?;
        }

        Some((date.and_hms_opt(DEFAULT_HOUR, 0, 0)?, whole.range()))
    }

    fn extract_marked_day(
        &self,
        t: &str,
        today: NaiveDate,
    ) -> Option<(NaiveDateTime, Range<usize>)> {
        let m = self.re_day_marked.find(t)?;
        let caps = DAY_NUMBER_RE.captures(m.as_str())?;
        let day: u32 = caps.get(1)?.as_str().parse().ok()?;
        if !(1..=31).contains(&day) {
            return None;
        }

        Some((self.nearest_future_day(day, today)?, m.range()))
    }

    /// Nearest future occurrence of a day-of-month at the default hour:
    /// this month when the day is on/after today, otherwise next month,
    /// clamped to the next month's last valid day.
    fn nearest_future_day(&self, day: u32, today: NaiveDate) -> Option<NaiveDateTime> {
        if let Some(candidate) = NaiveDate::from_ymd_opt(today.year(), today.month(), day) {
            if candidate >= today {
                return candidate.and_hms_opt(DEFAULT_HOUR, 0, 0);
            }
        }

        let (year, month) = if today.month() == 12 {
            (today.year() + 1, 1)
        } else {
            (today.year(), today.month() + 1)
        };
        let clamped = day.min(days_in_month(year, month));
        NaiveDate::from_ymd_opt(year, month, clamped)?.and_hms_opt(DEFAULT_HOUR, 0, 0)
    }
}

fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|first| first.pred_opt())
        .map(|last| last.day())
        .unwrap_or(28)
}

/// Lowercase, join spaced hyphens ("22 - го" -> "22-го"), collapse whitespace
fn normalize(fragment: &str) -> String {
    let lowered = fragment.trim().to_lowercase();
    let hyphenated = HYPHEN_RE.replace_all(&lowered, "-");
    collapse_ws(&hyphenated)
}

/// Final title cleanup after span removal: collapse whitespace, strip the
/// stray "0"/"00" the speech recognizer leaves at the edges, drop lone
/// hyphens left at either end
fn clean_title(text: &str) -> String {
    let collapsed = collapse_ws(text);
    let no_lead = LEAD_ZERO_RE.replace(&collapsed, "");
    let no_trail = TRAIL_ZERO_RE.replace(&no_lead, "");
    let no_hyphens = EDGE_HYPHEN_RE.replace_all(&no_trail, "");
    no_hyphens.trim().to_string()
}
