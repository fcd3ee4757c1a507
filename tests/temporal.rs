//! Date Resolution Integration Tests
//!
//! Exercises the temporal resolver against a fixed reference "now"
//! (2026-02-19 10:00) so calendar arithmetic is deterministic.

use chrono::{NaiveDate, NaiveDateTime};
use dictask::{TemporalResolver, Vocabulary};

fn resolver() -> TemporalResolver {
    TemporalResolver::new(&Vocabulary::default()).unwrap()
}

fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .unwrap()
        .and_hms_opt(h, min, 0)
        .unwrap()
}

fn now() -> NaiveDateTime {
    at(2026, 2, 19, 10, 0)
}

#[test]
fn test_today() {
    let result = resolver().resolve("купить молоко сегодня", now());
    assert_eq!(result.instant, Some(at(2026, 2, 19, 0, 0)));
    assert_eq!(result.text, "купить молоко");
}

#[test]
fn test_today_english() {
    let result = resolver().resolve("buy milk today", now());
    assert_eq!(result.instant, Some(at(2026, 2, 19, 0, 0)));
    assert_eq!(result.text, "buy milk");
}

#[test]
fn test_tomorrow_with_time() {
    let result = resolver().resolve("спортзал завтра в 18:30", now());
    assert_eq!(result.instant, Some(at(2026, 2, 20, 18, 30)));
    assert_eq!(result.text, "спортзал");
}

#[test]
fn test_tomorrow_with_time_english() {
    let result = resolver().resolve("gym tomorrow at 18:30", now());
    assert_eq!(result.instant, Some(at(2026, 2, 20, 18, 30)));
    assert_eq!(result.text, "gym");
}

#[test]
fn test_day_after_tomorrow() {
    let result = resolver().resolve("сдать отчет послезавтра", now());
    assert_eq!(result.instant, Some(at(2026, 2, 21, 0, 0)));
}

#[test]
fn test_marked_day_resolves_to_same_day() {
    let result = resolver().resolve("встреча с аней 19 числа", now());
    assert_eq!(result.instant, Some(at(2026, 2, 19, 9, 0)));
    assert_eq!(result.text, "встреча с аней");
}

#[test]
fn test_marked_day_english_ordinal() {
    let result = resolver().resolve("meeting with anna on the 19th", now());
    assert_eq!(result.instant, Some(at(2026, 2, 19, 9, 0)));
    assert_eq!(result.text, "meeting with anna");
}

#[test]
fn test_marked_day_rolls_to_next_month() {
    let result = resolver().resolve("уборка 5 числа", now());
    assert_eq!(result.instant, Some(at(2026, 3, 5, 9, 0)));
}

#[test]
fn test_marked_day_clamped_to_short_month() {
    let end_of_january = at(2026, 1, 31, 10, 0);
    let result = resolver().resolve("уборка 30 числа", end_of_january);
    assert_eq!(result.instant, Some(at(2026, 2, 28, 9, 0)));
}

#[test]
fn test_named_month_date() {
    let result = resolver().resolve("с друзьями в ресторан 24 февраля", now());
    assert_eq!(result.instant, Some(at(2026, 2, 24, 9, 0)));
    assert_eq!(result.text, "с друзьями в ресторан");
}

#[test]
fn test_named_month_date_english() {
    let result = resolver().resolve("dinner with friends on 24 february", now());
    assert_eq!(result.instant, Some(at(2026, 2, 24, 9, 0)));
    assert_eq!(result.text, "dinner with friends");
}

#[test]
fn test_named_month_past_date_rolls_to_next_year() {
    let result = resolver().resolve("концерт 10 января", now());
    assert_eq!(result.instant, Some(at(2027, 1, 10, 9, 0)));
}

#[test]
fn test_numeric_date_separators() {
    let resolver = resolver();
    for text in ["врач 24.02", "врач 24/02", "врач 24-02"] {
        let result = resolver.resolve(text, now());
        assert_eq!(result.instant, Some(at(2026, 2, 24, 9, 0)), "{text}");
        assert_eq!(result.text, "врач");
    }
}

#[test]
fn test_numeric_past_date_rolls_to_next_year() {
    let result = resolver().resolve("оплатить налог 01.01", now());
    assert_eq!(result.instant, Some(at(2027, 1, 1, 9, 0)));
}

#[test]
fn test_numeric_date_two_digit_year() {
    let result = resolver().resolve("встреча 24.02.27", now());
    assert_eq!(result.instant, Some(at(2027, 2, 24, 9, 0)));
}

#[test]
fn test_numeric_explicit_year_suppresses_rollover() {
    let result = resolver().resolve("архив 24.02.2020", now());
    assert_eq!(result.instant, Some(at(2020, 2, 24, 9, 0)));
}

#[test]
fn test_time_only_anchors_to_today() {
    let result = resolver().resolve("позвонить маме в 19:30", now());
    assert_eq!(result.instant, Some(at(2026, 2, 19, 19, 30)));
    assert_eq!(result.text, "позвонить маме");
}

#[test]
fn test_no_temporal_expression() {
    let result = resolver().resolve("купить молоко", now());
    assert_eq!(result.instant, None);
    assert_eq!(result.text, "купить молоко");
}

#[test]
fn test_stripped_fragment_has_no_further_match() {
    let resolver = resolver();
    let inputs = [
        "купить молоко сегодня",
        "спортзал завтра в 18:30",
        "встреча с аней 19 числа",
        "с друзьями в ресторан 24 февраля",
        "врач 24.02",
        "позвонить маме в 19:30",
    ];
    for input in inputs {
        let first = resolver.resolve(input, now());
        assert!(first.instant.is_some(), "{input}");
        let second = resolver.resolve(&first.text, now());
        assert_eq!(second.instant, None, "{input} -> {}", first.text);
        assert_eq!(second.text, first.text);
    }
}

#[test]
fn test_resolver_from_vocabulary_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("vocab.yaml");
    let yaml = serde_yaml::to_string(&Vocabulary::default()).unwrap();
    std::fs::write(&path, yaml).unwrap();

    let vocab = Vocabulary::from_file(&path).unwrap();
    let resolver = TemporalResolver::new(&vocab).unwrap();

    let result = resolver.resolve("buy milk today", now());
    assert_eq!(result.instant, Some(at(2026, 2, 19, 0, 0)));
}
