//! Top-N rankings of threads and categories.

use std::cmp::Ordering;
use std::collections::HashMap;

use crate::aggregate::{bucket_key, count_in_window, MessageFilter, GROUP_CHATS_BUCKET, OTHER_BUCKET};
use crate::aliases::GroupAliases;
use crate::timeline::Window;
use crate::types::Thread;
use crate::userdata::UserData;

/// `100 * part / whole`, rounded to one decimal place.
///
/// Returns 0.0 when `whole` is zero.
pub fn percentage(part: u64, whole: u64) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    let pct = 100.0 * part as f64 / whole as f64;
    (pct * 10.0).round() / 10.0
}

/// Format an integer with thousands separators (e.g., "12,345").
pub fn format_count(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Sort `items` by `metric`, largest first, and keep the first `n`.
///
/// The sort is stable: items with equal metrics keep their input order.
pub fn top_n<T, K, F>(mut items: Vec<T>, n: usize, metric: F) -> Vec<T>
where
    K: PartialOrd,
    F: Fn(&T) -> K,
{
    items.sort_by(|a, b| {
        metric(b)
            .partial_cmp(&metric(a))
            .unwrap_or(Ordering::Equal)
    });
    items.truncate(n);
    items
}

/// Denominator for a row's percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PercentBasis {
    /// Sent as a share of the row's own total
    OwnTotal,
    /// Sent as a share of a fixed number, e.g. everything sent in the year
    Fixed(u64),
}

impl PercentBasis {
    fn percent(&self, sent: u64, total: u64) -> f64 {
        match self {
            PercentBasis::OwnTotal => percentage(sent, total),
            PercentBasis::Fixed(whole) => percentage(sent, *whole),
        }
    }
}

/// Message counts for one thread inside a window.
#[derive(Debug, Clone, Copy)]
pub struct ThreadStats<'a> {
    pub thread: &'a Thread,
    /// Messages the owner sent
    pub sent: u64,
    /// All messages
    pub total: u64,
}

impl<'a> ThreadStats<'a> {
    pub fn compute(thread: &'a Thread, window: &Window) -> Self {
        Self {
            thread,
            sent: count_in_window(thread, window, MessageFilter::Sent),
            total: count_in_window(thread, window, MessageFilter::All),
        }
    }
}

/// One ranked entry, ready for a table.
#[derive(Debug, Clone, PartialEq)]
pub struct RankingRow {
    pub display_name: String,
    pub sent: u64,
    pub total: u64,
    pub percent: f64,
}

impl RankingRow {
    pub fn new(display_name: impl Into<String>, sent: u64, total: u64, basis: PercentBasis) -> Self {
        Self {
            display_name: display_name.into(),
            sent,
            total,
            percent: basis.percent(sent, total),
        }
    }

    pub fn sent_display(&self) -> String {
        format_count(self.sent)
    }

    pub fn total_display(&self) -> String {
        format_count(self.total)
    }
}

/// Sum of the percentages of the first `k` rows.
pub fn top_share(rows: &[RankingRow], k: usize) -> f64 {
    rows.iter().take(k).map(|r| r.percent).sum()
}

fn group_stats<'a>(threads: &'a [Thread], window: &Window) -> Vec<ThreadStats<'a>> {
    threads
        .iter()
        .filter(|t| t.is_group())
        .map(|t| ThreadStats::compute(t, window))
        .collect()
}

fn named_group_rows(
    ranked: Vec<ThreadStats<'_>>,
    aliases: &GroupAliases,
    n: usize,
) -> Vec<RankingRow> {
    ranked
        .into_iter()
        .filter_map(|stats| {
            let name = aliases.resolve(&stats.thread.display_name);
            if name.is_empty() {
                return None;
            }
            Some(RankingRow::new(name, stats.sent, stats.total, PercentBasis::OwnTotal))
        })
        .take(n)
        .collect()
}

/// Group chats where the owner sent the most messages.
///
/// Names go through `aliases`; chats aliased to an empty name are skipped
/// before the cut to `n`.
pub fn rank_group_chats(
    threads: &[Thread],
    window: &Window,
    aliases: &GroupAliases,
    n: usize,
) -> Vec<RankingRow> {
    let ranked = top_n(group_stats(threads, window), usize::MAX, |s| s.sent);
    named_group_rows(ranked, aliases, n)
}

/// Busiest group chats in which the owner never said a word.
pub fn rank_silent_group_chats(
    threads: &[Thread],
    window: &Window,
    aliases: &GroupAliases,
    n: usize,
) -> Vec<RankingRow> {
    let silent: Vec<_> = group_stats(threads, window)
        .into_iter()
        .filter(|s| s.sent == 0)
        .collect();
    let ranked = top_n(silent, usize::MAX, |s| s.total);
    named_group_rows(ranked, aliases, n)
}

/// One-on-one contacts the owner sent the most messages to.
pub fn rank_contacts(
    threads: &[Thread],
    window: &Window,
    basis: PercentBasis,
    n: usize,
) -> Vec<RankingRow> {
    let stats: Vec<_> = threads
        .iter()
        .filter(|t| t.is_individual())
        .map(|t| ThreadStats::compute(t, window))
        .collect();

    top_n(stats, n, |s| s.sent)
        .into_iter()
        .map(|s| RankingRow::new(s.thread.display_name.clone(), s.sent, s.total, basis))
        .collect()
}

/// Human-readable name for a bucket key.
pub fn bucket_display_name(key: &str, userdata: &UserData) -> String {
    match key {
        GROUP_CHATS_BUCKET => "Group Chats".to_string(),
        OTHER_BUCKET => "Other".to_string(),
        slug => userdata
            .get(slug)
            .map(|c| c.display_name().to_string())
            .unwrap_or_else(|| slug.to_string()),
    }
}

/// Buckets (categories, group chats, other) by messages sent.
pub fn rank_categories(
    threads: &[Thread],
    userdata: &UserData,
    window: &Window,
    n: usize,
) -> Vec<RankingRow> {
    // Insertion order of first appearance keeps ties stable
    let mut order: Vec<&str> = Vec::new();
    let mut totals: HashMap<&str, (u64, u64)> = HashMap::new();
    for thread in threads {
        let key = bucket_key(thread);
        let stats = ThreadStats::compute(thread, window);
        let entry = totals.entry(key).or_insert_with(|| {
            order.push(key);
            (0, 0)
        });
        entry.0 += stats.sent;
        entry.1 += stats.total;
    }

    let rows: Vec<RankingRow> = order
        .into_iter()
        .map(|key| {
            let (sent, total) = totals.get(key).copied().unwrap_or_default();
            RankingRow::new(
                bucket_display_name(key, userdata),
                sent,
                total,
                PercentBasis::OwnTotal,
            )
        })
        .collect();
    top_n(rows, n, |r| r.sent)
}
