//! Year-in-review report assembly
//!
//! Turns threads and categories into chart and table descriptions, then into
//! a single HTML page:
//! - Messages sent per month, stacked by category
//! - Every sent message as a day/hour scatter plot
//! - Top contacts, top categories, top group chats, and silent group chats
//!
//! See [`chart`] and [`table`] for the description types and [`html`] for
//! rendering.

pub mod chart;
pub mod html;
pub mod table;

pub use chart::{Chart, Palette, Series, SeriesData, CONTRASTY, CONTRASTY_TRANSLUCENT};
pub use html::{render_page, HighchartRenderer, Render, TableRenderer};
pub use table::Table;

use crate::aggregate::{sent_by_bucket, WindowTotals};
use crate::aliases::GroupAliases;
use crate::error::Result;
use crate::ranking::{
    rank_categories, rank_contacts, rank_group_chats, rank_silent_group_chats, PercentBasis,
};
use crate::timeline::{monthly_windows, ReferenceZone, Window};
use crate::types::Thread;
use crate::userdata::UserData;

/// Knobs for report generation.
#[derive(Debug, Clone)]
pub struct ReportOptions {
    /// Calendar year to report on
    pub year: i32,
    /// Zone months and clock times are read in
    pub zone: ReferenceZone,
    /// Rows in the top contacts table
    pub top_contacts: usize,
    /// Rows in each group chat table
    pub top_group_chats: usize,
    /// Rows in the top categories table
    pub top_categories: usize,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            year: 2015,
            zone: ReferenceZone::default(),
            top_contacts: 10,
            top_group_chats: 8,
            top_categories: 10,
        }
    }
}

/// Everything that goes on the page.
#[derive(Debug, Clone)]
pub struct Report {
    pub year: i32,
    pub totals: WindowTotals,
    /// `(container id, chart)` pairs
    pub charts: Vec<(String, Chart)>,
    pub tables: Vec<Table>,
}

impl Report {
    pub fn title(&self) -> String {
        format!("{} in Chats", self.year)
    }

    /// Render the whole report as a standalone HTML page.
    pub fn to_html(&self) -> String {
        let mut fragments: Vec<String> = self
            .charts
            .iter()
            .map(|(id, chart)| HighchartRenderer::new(id.as_str(), chart).render())
            .collect();
        fragments.extend(self.tables.iter().map(|t| TableRenderer::new(t).render()));
        render_page(&self.title(), &fragments)
    }
}

/// Build every chart and table for `options.year`.
pub fn build_report(
    threads: &[Thread],
    userdata: &UserData,
    aliases: &GroupAliases,
    options: &ReportOptions,
) -> Result<Report> {
    let year = options.year;
    let window = Window::year(year, &options.zone)?;
    let months = monthly_windows(year, &options.zone)?;
    let totals = WindowTotals::compute(threads, &window);

    let by_bucket = sent_by_bucket(threads, &months);
    let area = chart::sent_by_category_chart(&by_bucket, &months, CONTRASTY);
    let scatter = chart::sent_messages_scatter(
        threads,
        userdata,
        &window,
        &options.zone,
        CONTRASTY_TRANSLUCENT,
        &format!("{} - All Sent Messages", year),
    );

    let contacts = rank_contacts(
        threads,
        &window,
        PercentBasis::Fixed(totals.total_sent()),
        options.top_contacts,
    );
    let categories = rank_categories(threads, userdata, &window, options.top_categories);
    let groups = rank_group_chats(threads, &window, aliases, options.top_group_chats);
    let silent = rank_silent_group_chats(threads, &window, aliases, options.top_group_chats);

    tracing::info!(
        year,
        individual_messages = totals.individual_messages,
        total_sent = totals.total_sent(),
        buckets = by_bucket.len(),
        "Built report"
    );

    Ok(Report {
        year,
        totals,
        charts: vec![
            ("sent-by-category".to_string(), area),
            ("sent-scatter".to_string(), scatter),
        ],
        tables: vec![
            table::contact_table(year, &contacts),
            table::category_table(year, &categories),
            table::group_chat_table(year, &groups),
            table::silent_group_chat_table(year, &silent),
        ],
    })
}
