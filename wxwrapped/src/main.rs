//! wxwrapped - WeChat Year in Review CLI
//!
//! Categorize your busiest chats, then generate an HTML report of a year of
//! messaging.

use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use wxwrapped_core::classify::{ClassifySummary, Classifier};
use wxwrapped_core::ranking::format_count;
use wxwrapped_core::report::{build_report, Report};
use wxwrapped_core::source::{ThreadSource, WeChatDatabase};
use wxwrapped_core::timeline::Window;
use wxwrapped_core::{Config, GroupAliases, UserData};

#[derive(Parser, Debug)]
#[command(name = "wxwrapped")]
#[command(about = "WeChat Wrapped - Your Year in Chats")]
#[command(version)]
struct Args {
    /// Config file (default: ~/.config/wxwrapped/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Year to report on (default: from config, 2015 if unset)
    #[arg(long)]
    year: Option<i32>,

    /// Skip categorizing chats and only regenerate the report
    #[arg(long)]
    no_classify: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Load configuration
    let mut config = match &args.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
    .context("failed to load configuration")?;
    if let Some(year) = args.year {
        config.report.year = year;
        config.validate().context("invalid --year")?;
    }
    let log_guard = wxwrapped_core::logging::init(&config.logging).ok();

    // Read the chat history
    let db = WeChatDatabase::open(&config.paths.database)
        .with_context(|| format!("failed to open {}", config.paths.database.display()))?;
    let mut threads = db.load_threads().context("failed to read chat database")?;
    let mut userdata = UserData::initialize(&config.paths.userdata, &mut threads);
    tracing::info!(
        threads = threads.len(),
        categories = userdata.len(),
        year = config.report.year,
        "Starting wxwrapped"
    );

    let options = config.report.report_options()?;
    let year = Window::year(options.year, &options.zone)?;

    // Categorize the busiest chats
    if !args.no_classify {
        let summary = Classifier::new(io::stdin().lock(), io::stdout().lock())
            .run(
                &mut threads,
                &mut userdata,
                &year,
                config.report.coverage_threshold,
            )
            .context("classification failed")?;
        print_classify_summary(&summary);
    }

    // Build and write the report
    let aliases = GroupAliases::load(&config.paths.aliases);
    let report = build_report(&threads, &userdata, &aliases, &options)
        .context("failed to build report")?;
    std::fs::write(&config.paths.output, report.to_html())
        .with_context(|| format!("failed to write {}", config.paths.output.display()))?;
    tracing::info!(output = %config.paths.output.display(), "Wrote report");

    print_report_summary(&report);
    println!("Report written to {}", config.paths.output.display());
    if let Some(guard) = &log_guard {
        println!("Logs in {}", guard.log_dir().display());
    }

    Ok(())
}

fn print_classify_summary(summary: &ClassifySummary) {
    if summary.considered == 0 {
        return;
    }
    println!(
        "Categorized {} of {} top chats ({} new categories)",
        summary.assigned + summary.already_categorized,
        summary.considered,
        summary.created
    );
    if summary.interrupted {
        println!("Input ended early; answers so far are saved. Run again to continue.");
    }
}

fn print_report_summary(report: &Report) {
    let totals = &report.totals;
    println!();
    println!("{}", report.title());
    println!(
        "   One-on-one: {:>10} messages, {:>10} sent",
        format_count(totals.individual_messages),
        format_count(totals.individual_sent)
    );
    println!(
        "   Groups:     {:>10} messages, {:>10} sent",
        format_count(totals.group_messages),
        format_count(totals.group_sent)
    );
    println!();
}
