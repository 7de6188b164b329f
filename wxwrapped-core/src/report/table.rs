//! Table descriptions for the ranking reports.

use serde::Serialize;

use crate::ranking::{top_share, RankingRow};

/// A titled table.
///
/// Headers may contain inline markup such as `<br/>`; cells are plain text.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Table {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

fn format_percent(percent: f64) -> String {
    format!("{:.1}", percent)
}

/// Columns: name, your messages, total messages, % yours.
fn share_rows(rows: &[RankingRow]) -> Vec<Vec<String>> {
    rows.iter()
        .map(|r| {
            vec![
                r.display_name.clone(),
                r.sent_display(),
                r.total_display(),
                format_percent(r.percent),
            ]
        })
        .collect()
}

fn share_headers() -> Vec<String> {
    ["", "Your<br/>messages", "Total<br/>messages", "%"]
        .iter()
        .map(|h| h.to_string())
        .collect()
}

/// "Top Group Chats": group chats by messages sent.
pub fn group_chat_table(year: i32, rows: &[RankingRow]) -> Table {
    Table {
        title: format!("Top Group Chats ({})", year),
        subtitle: Some("By your messages sent".to_string()),
        headers: share_headers(),
        rows: share_rows(rows),
    }
}

/// "Peak Lurkage": busy group chats the owner never wrote in.
pub fn silent_group_chat_table(year: i32, rows: &[RankingRow]) -> Table {
    Table {
        title: format!("Peak Lurkage ({})", year),
        subtitle: Some("Pleading the fifth".to_string()),
        headers: share_headers(),
        rows: share_rows(rows),
    }
}

/// "Top Contacts": percentages are shares of everything sent in the year.
pub fn contact_table(year: i32, rows: &[RankingRow]) -> Table {
    let top_five = top_share(rows, 5);
    Table {
        title: format!("{} Top Contacts", year),
        subtitle: Some(format!(
            "{:.1}% of your sent messages were to just five people",
            top_five
        )),
        headers: vec![
            String::new(),
            "Your<br/>messages".to_string(),
            format!("% of all {}<br/>sent messages", year),
            "Total<br/>messages".to_string(),
        ],
        rows: rows
            .iter()
            .map(|r| {
                vec![
                    r.display_name.clone(),
                    r.sent_display(),
                    format_percent(r.percent),
                    r.total_display(),
                ]
            })
            .collect(),
    }
}

/// "Top Categories": buckets by messages sent.
pub fn category_table(year: i32, rows: &[RankingRow]) -> Table {
    Table {
        title: format!("Top Categories ({})", year),
        subtitle: Some("By your messages sent".to_string()),
        headers: share_headers(),
        rows: share_rows(rows),
    }
}
