//! Per-window message counts grouped by bucket.
//!
//! A bucket is the category slug of an individual thread, [`OTHER_BUCKET`]
//! for uncategorized or non-human threads, or [`GROUP_CHATS_BUCKET`] for all
//! group chats together.

use std::collections::HashMap;

use crate::timeline::Window;
use crate::types::{Message, Thread};

/// Bucket for individual threads with no category and for official accounts.
pub const OTHER_BUCKET: &str = "other";

/// Bucket shared by every group chat.
pub const GROUP_CHATS_BUCKET: &str = "group-chats";

/// Which messages to count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageFilter {
    /// Every message in the thread
    All,
    /// Only messages the owner sent
    Sent,
}

impl MessageFilter {
    pub fn matches(&self, message: &Message) -> bool {
        match self {
            MessageFilter::All => true,
            MessageFilter::Sent => message.sent,
        }
    }
}

/// Bucket key a thread's messages are counted under.
pub fn bucket_key(thread: &Thread) -> &str {
    if thread.is_group() {
        return GROUP_CHATS_BUCKET;
    }
    match thread.category_slug() {
        Some(slug) if thread.is_individual() => slug,
        _ => OTHER_BUCKET,
    }
}

/// Count of messages in `thread` inside `window` matching `filter`.
pub fn count_in_window(thread: &Thread, window: &Window, filter: MessageFilter) -> u64 {
    let start = window.start_utc();
    let end = window.end_utc();
    thread
        .messages_between(start, end)
        .filter(|m| filter.matches(m))
        .count() as u64
}

/// One bucket's counts, one entry per window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BucketSeries {
    pub key: String,
    pub counts: Vec<u64>,
}

impl BucketSeries {
    /// Sum over all windows.
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }
}

/// Count messages per bucket per window.
///
/// Every thread creates its bucket, even if none of its messages fall in any
/// window. Buckets come back most active first (total over all windows);
/// equal totals are ordered by key.
pub fn count_by_bucket(
    threads: &[Thread],
    windows: &[Window],
    filter: MessageFilter,
) -> Vec<BucketSeries> {
    let mut counts: HashMap<&str, Vec<u64>> = HashMap::new();

    for thread in threads {
        let row = counts
            .entry(bucket_key(thread))
            .or_insert_with(|| vec![0; windows.len()]);
        for (i, window) in windows.iter().enumerate() {
            row[i] += count_in_window(thread, window, filter);
        }
    }

    let mut series: Vec<BucketSeries> = counts
        .into_iter()
        .map(|(key, counts)| BucketSeries {
            key: key.to_string(),
            counts,
        })
        .collect();
    series.sort_by(|a, b| b.total().cmp(&a.total()).then_with(|| a.key.cmp(&b.key)));

    tracing::debug!(
        buckets = series.len(),
        windows = windows.len(),
        filter = ?filter,
        "Aggregated messages by bucket"
    );
    series
}

/// Sent messages per bucket per window.
pub fn sent_by_bucket(threads: &[Thread], windows: &[Window]) -> Vec<BucketSeries> {
    count_by_bucket(threads, windows, MessageFilter::Sent)
}

/// Headline totals for one window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WindowTotals {
    /// All messages in one-on-one chats with people
    pub individual_messages: u64,
    /// Messages the owner sent in one-on-one chats
    pub individual_sent: u64,
    /// All messages in group chats
    pub group_messages: u64,
    /// Messages the owner sent in group chats
    pub group_sent: u64,
}

impl WindowTotals {
    pub fn compute(threads: &[Thread], window: &Window) -> Self {
        let mut totals = Self::default();
        for thread in threads {
            let all = count_in_window(thread, window, MessageFilter::All);
            let sent = count_in_window(thread, window, MessageFilter::Sent);
            if thread.is_group() {
                totals.group_messages += all;
                totals.group_sent += sent;
            } else if thread.is_individual() {
                totals.individual_messages += all;
                totals.individual_sent += sent;
            }
        }
        totals
    }

    /// Everything the owner sent, to people and groups.
    pub fn total_sent(&self) -> u64 {
        self.individual_sent + self.group_sent
    }
}
