//! Integration tests for the wxwrapped pipeline
//!
//! These tests build threads in memory, run them through classification,
//! aggregation and ranking, and check the persisted user data on disk.

use chrono::{DateTime, TimeZone, Utc};
use proptest::prelude::*;
use std::io::Cursor;
use tempfile::TempDir;
use wxwrapped_core::aggregate::{count_by_bucket, MessageFilter, WindowTotals};
use wxwrapped_core::classify::{coverage_prefix_len, Classifier, DEFAULT_COVERAGE_THRESHOLD};
use wxwrapped_core::ranking::{rank_categories, top_share};
use wxwrapped_core::report::{build_report, ReportOptions};
use wxwrapped_core::timeline::{monthly_windows, ReferenceZone, Window};
use wxwrapped_core::{slugify, Category, GroupAliases, Message, Thread, ThreadKind, UserData};

fn utc(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
}

fn year_2015() -> Window {
    Window::year(2015, &ReferenceZone::default()).unwrap()
}

/// An individual thread with `sent` sent and `received` received messages in
/// mid-2015.
fn contact(id: &str, name: &str, sent: usize, received: usize) -> Thread {
    let base = utc(2015, 6, 1, 4, 0);
    let mut messages = Vec::new();
    for i in 0..sent {
        messages.push(Message::sent(base + chrono::Duration::minutes(i as i64)));
    }
    for i in 0..received {
        messages.push(Message::received(
            base + chrono::Duration::minutes((sent + i) as i64),
        ));
    }
    Thread::new(id, name, ThreadKind::Individual).with_messages(messages)
}

fn group(id: &str, name: &str, sent: usize, received: usize) -> Thread {
    let mut thread = contact(id, name, sent, received);
    thread.kind = ThreadKind::Group;
    thread
}

// ============================================
// Slugs
// ============================================

proptest! {
    #[test]
    fn slugify_is_idempotent(text in "\\PC{0,40}") {
        let once = slugify(&text);
        prop_assert_eq!(slugify(&once), once);
    }

    #[test]
    fn slugify_output_is_lowercase_ascii_and_dashes(text in "\\PC{0,40}") {
        let slug = slugify(&text);
        prop_assert!(slug
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-'));
        prop_assert!(!slug.starts_with('-'));
        prop_assert!(!slug.ends_with('-'));
        prop_assert!(!slug.contains("--"));
    }
}

#[test]
fn test_category_keys_match_slugified_names() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("userdata.json");

    let mut userdata = UserData::empty(&path);
    for name in ["Family", "Close Friends", "  Work / School  ", "Book Club 2"] {
        userdata.add_category(Category::new(name).unwrap()).unwrap();
    }
    userdata.save().unwrap();

    let reloaded = UserData::initialize(&path, &mut []);
    assert_eq!(reloaded.len(), 4);
    for (key, category) in reloaded.iter() {
        assert_eq!(key, slugify(category.display_name()));
        assert_eq!(key, category.slug());
    }
}

// ============================================
// Persistence
// ============================================

#[test]
fn test_save_and_initialize_restore_links() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("nested/userdata.json");

    let mut threads = vec![
        contact("wxid_mom", "Mom", 3, 3),
        contact("wxid_boss", "Boss", 1, 1),
        contact("wxid_pal", "Pal", 1, 0),
    ];

    let mut userdata = UserData::empty(&path);
    userdata.add_category(Category::new("Family").unwrap()).unwrap();
    userdata.add_category(Category::new("Work").unwrap()).unwrap();
    userdata.assign("family", &mut threads[0]).unwrap();
    userdata.assign("work", &mut threads[1]).unwrap();
    userdata.save().unwrap();
    assert!(path.exists());

    // Fresh threads, as a new run would load them
    let mut fresh = vec![
        contact("wxid_mom", "Mom", 3, 3),
        contact("wxid_boss", "Boss", 1, 1),
        contact("wxid_pal", "Pal", 1, 0),
    ];
    let reloaded = UserData::initialize(&path, &mut fresh);

    assert_eq!(reloaded.len(), 2);
    assert_eq!(fresh[0].category_slug(), Some("family"));
    assert_eq!(fresh[1].category_slug(), Some("work"));
    assert_eq!(fresh[2].category_slug(), None);
    assert!(reloaded.get("family").unwrap().contains("wxid_mom"));
    assert_eq!(reloaded.get("work").unwrap().display_name(), "Work");
}

#[test]
fn test_initialize_with_missing_file_is_empty() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("absent.json");

    let mut threads = vec![contact("wxid_mom", "Mom", 1, 1)];
    let userdata = UserData::initialize(&path, &mut threads);

    assert!(userdata.is_empty());
    assert!(threads[0].category.is_none());
    assert!(!path.exists());
}

// ============================================
// Time windows
// ============================================

#[test]
fn test_message_at_local_new_year_lands_in_january() {
    let zone = ReferenceZone::default();
    let months = monthly_windows(2015, &zone).unwrap();

    // 2015-01-01 00:00 in UTC+8
    let first = Thread::new("a", "A", ThreadKind::Individual)
        .with_messages(vec![Message::sent(utc(2014, 12, 31, 16, 0))]);
    // One minute earlier belongs to 2014
    let before = Thread::new("b", "B", ThreadKind::Individual)
        .with_messages(vec![Message::sent(utc(2014, 12, 31, 15, 59))]);

    let series = count_by_bucket(&[first, before], &months, MessageFilter::All);
    assert_eq!(series.len(), 1);
    assert_eq!(series[0].key, "other");
    assert_eq!(series[0].counts[0], 1);
    assert_eq!(series[0].total(), 1);
}

proptest! {
    #[test]
    fn monthly_counts_partition_the_year(
        offsets in prop::collection::vec(0i64..(400 * 24 * 60), 0..60)
    ) {
        let zone = ReferenceZone::default();
        let months = monthly_windows(2015, &zone).unwrap();
        let year = Window::year(2015, &zone).unwrap();

        // Start a little before the year so some messages fall outside it
        let start = utc(2014, 12, 20, 0, 0);
        let messages: Vec<Message> = offsets
            .iter()
            .map(|m| Message::received(start + chrono::Duration::minutes(*m)))
            .collect();
        let in_year = messages.iter().filter(|m| year.contains(m.timestamp)).count() as u64;

        let thread = Thread::new("wxid_x", "X", ThreadKind::Individual).with_messages(messages);
        let series = count_by_bucket(std::slice::from_ref(&thread), &months, MessageFilter::All);

        prop_assert_eq!(series.len(), 1);
        prop_assert_eq!(series[0].counts.len(), 12);
        prop_assert_eq!(series[0].total(), in_year);
    }
}

// ============================================
// Classification
// ============================================

#[test]
fn test_coverage_prefix_for_known_volumes() {
    assert_eq!(coverage_prefix_len(&[50, 30, 15, 5], DEFAULT_COVERAGE_THRESHOLD), 3);
}

#[test]
fn test_classification_creates_and_persists_category() {
    wxwrapped_core::logging::init_test();

    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("userdata.json");

    let mut threads = vec![contact("wxid_mom", "Mom", 20, 20), contact("wxid_pal", "Pal", 1, 0)];
    let mut userdata = UserData::initialize(&path, &mut threads);
    let window = year_2015();

    let mut output = Vec::new();
    let summary = Classifier::new(Cursor::new("Family\n"), &mut output)
        .run(&mut threads, &mut userdata, &window, DEFAULT_COVERAGE_THRESHOLD)
        .unwrap();

    assert_eq!(summary.considered, 1);
    assert_eq!(summary.assigned, 1);
    assert_eq!(summary.created, 1);
    assert!(!summary.interrupted);

    assert_eq!(userdata.len(), 1);
    assert_eq!(threads[0].category_slug(), Some("family"));

    // Persisted immediately, without an explicit save
    let mut reloaded_threads = vec![contact("wxid_mom", "Mom", 20, 20)];
    let reloaded = UserData::initialize(&path, &mut reloaded_threads);
    assert_eq!(reloaded.get("family").unwrap().display_name(), "Family");
    assert_eq!(reloaded_threads[0].category_slug(), Some("family"));

    let prompt = String::from_utf8(output).unwrap();
    assert!(prompt.contains("Mom"));
}

#[test]
fn test_classification_reuses_category_by_number() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("userdata.json");

    let mut threads = vec![
        contact("wxid_mom", "Mom", 10, 10),
        contact("wxid_dad", "Dad", 10, 9),
        contact("wxid_pal", "Pal", 0, 1),
    ];
    let mut userdata = UserData::initialize(&path, &mut threads);

    let mut output = Vec::new();
    let summary = Classifier::new(Cursor::new("Family\n0\n"), &mut output)
        .run(&mut threads, &mut userdata, &year_2015(), DEFAULT_COVERAGE_THRESHOLD)
        .unwrap();

    assert_eq!(summary.assigned, 2);
    assert_eq!(summary.created, 1);
    assert_eq!(userdata.len(), 1);
    assert_eq!(userdata.get("family").unwrap().len(), 2);
    assert_eq!(threads[1].category_slug(), Some("family"));
}

// ============================================
// Rankings and report
// ============================================

#[test]
fn test_twelve_categories_top_n() {
    let temp_dir = TempDir::new().unwrap();
    let mut userdata = UserData::empty(temp_dir.path().join("userdata.json"));
    let window = year_2015();

    let mut threads = Vec::new();
    for i in 0..12usize {
        let name = format!("Circle {}", i);
        userdata.add_category(Category::new(&name).unwrap()).unwrap();
        let mut thread = contact(&format!("wxid_{}", i), &format!("Friend {}", i), 10 + i, 5);
        userdata.assign(&slugify(&name), &mut thread).unwrap();
        threads.push(thread);
    }

    for n in [1, 5, 10, 12, 20] {
        let rows = rank_categories(&threads, &userdata, &window, n);
        assert_eq!(rows.len(), n.min(12));
    }

    let rows = rank_categories(&threads, &userdata, &window, 12);
    assert_eq!(rows[0].display_name, "Circle 11");
    assert_eq!(rows[0].sent, 21);

    assert!(rows.windows(2).all(|w| w[0].sent >= w[1].sent));

    let expected: f64 = rows[..5].iter().map(|r| r.percent).sum();
    assert_eq!(top_share(&rows, 5), expected);
    assert_eq!(top_share(&rows[..3], 5), rows[..3].iter().map(|r| r.percent).sum::<f64>());
}

#[test]
fn test_report_end_to_end() {
    let temp_dir = TempDir::new().unwrap();
    let mut userdata = UserData::empty(temp_dir.path().join("userdata.json"));
    userdata.add_category(Category::new("Family").unwrap()).unwrap();

    let mut threads = vec![
        contact("wxid_mom", "Mom", 6, 4),
        contact("wxid_pal", "Pal", 2, 2),
        group("1@chatroom", "Book Club", 2, 10),
        group("2@chatroom", "Neighbors", 0, 7),
    ];
    userdata.assign("family", &mut threads[0]).unwrap();

    let totals = WindowTotals::compute(&threads, &year_2015());
    assert_eq!(totals.individual_messages, 14);
    assert_eq!(totals.individual_sent, 8);
    assert_eq!(totals.group_messages, 19);
    assert_eq!(totals.group_sent, 2);

    let aliases = GroupAliases::from_pairs([("Book Club", "Readers")]);
    let report = build_report(&threads, &userdata, &aliases, &ReportOptions::default()).unwrap();
    let html = report.to_html();

    assert!(html.contains("2015 Top Contacts"));
    assert!(html.contains("Readers"));
    assert!(html.contains("Neighbors"));
    assert!(html.contains("Mom"));
    assert!(html.contains("\"name\":\"family\""));
}
