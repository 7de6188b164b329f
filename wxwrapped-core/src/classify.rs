//! Interactive categorization of the busiest one-on-one threads.
//!
//! Only enough threads to explain a target share of the year's individual
//! message volume are asked about. Every answer is saved immediately, so an
//! interrupted session keeps all earlier answers.

use std::io::{BufRead, Write};

use crate::aggregate::{count_in_window, MessageFilter};
use crate::category::Category;
use crate::error::{Error, Result};
use crate::slug::slugify;
use crate::timeline::Window;
use crate::types::Thread;
use crate::userdata::UserData;

/// Share of individual message volume the categorized threads should cover.
pub const DEFAULT_COVERAGE_THRESHOLD: f64 = 0.90;

const PROMPT: &str = "Enter a number or name a new category: ";

/// Length of the shortest prefix of `volumes` whose sum is strictly more
/// than `threshold` of the total.
///
/// `volumes` should already be sorted descending. Returns 0 when the total is
/// zero, since there is nothing to cover. A prefix that already holds the
/// whole total ends the search, so trailing zero volumes are never included.
pub fn coverage_prefix_len(volumes: &[u64], threshold: f64) -> usize {
    let total: u64 = volumes.iter().sum();
    if total == 0 {
        return 0;
    }

    let mut cumulative = 0u64;
    for (i, volume) in volumes.iter().enumerate() {
        cumulative += volume;
        if cumulative == total || cumulative as f64 / total as f64 > threshold {
            return i + 1;
        }
    }
    volumes.len()
}

/// Indices into `threads` of the individual threads to categorize, busiest
/// first.
///
/// Threads are ranked by message count inside `window`; equal counts keep
/// their original order. Threads with no messages in `window` are never
/// selected.
pub fn threads_to_categorize(threads: &[Thread], window: &Window, threshold: f64) -> Vec<usize> {
    let mut ranked: Vec<(usize, u64)> = threads
        .iter()
        .enumerate()
        .filter(|(_, t)| t.is_individual())
        .map(|(i, t)| (i, count_in_window(t, window, MessageFilter::All)))
        .filter(|(_, volume)| *volume > 0)
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1));

    let volumes: Vec<u64> = ranked.iter().map(|(_, v)| *v).collect();
    let keep = coverage_prefix_len(&volumes, threshold);

    tracing::debug!(
        candidates = ranked.len(),
        selected = keep,
        threshold,
        "Selected threads to categorize"
    );
    ranked.into_iter().take(keep).map(|(i, _)| i).collect()
}

/// What the user typed at the category prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// A valid index into the category menu
    Index(usize),
    /// Anything else: an existing category's name or a new one
    Name(String),
}

impl Selection {
    /// Interpret one line of input against a menu of `menu_len` entries.
    ///
    /// Returns `None` for blank input. Digits outside the menu range are
    /// treated as a name.
    pub fn parse(input: &str, menu_len: usize) -> Option<Self> {
        let input = input.trim();
        if input.is_empty() {
            return None;
        }
        if input.bytes().all(|b| b.is_ascii_digit()) {
            if let Ok(index) = input.parse::<usize>() {
                if index < menu_len {
                    return Some(Selection::Index(index));
                }
            }
        }
        Some(Selection::Name(input.to_string()))
    }
}

/// Outcome of a classification session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassifySummary {
    /// Threads inside the coverage prefix
    pub considered: usize,
    /// Of those, threads that already had a category
    pub already_categorized: usize,
    /// Threads assigned during this session
    pub assigned: usize,
    /// Categories created during this session
    pub created: usize,
    /// Input ended before every thread was answered
    pub interrupted: bool,
}

/// Prompts for categories on `output` and reads answers from `input`.
pub struct Classifier<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Classifier<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Ask about every uncategorized thread in the coverage prefix.
    ///
    /// `userdata` is saved after each assignment. End of input stops the
    /// session without error.
    pub fn run(
        &mut self,
        threads: &mut [Thread],
        userdata: &mut UserData,
        window: &Window,
        threshold: f64,
    ) -> Result<ClassifySummary> {
        let selected = threads_to_categorize(threads, window, threshold);
        let mut summary = ClassifySummary {
            considered: selected.len(),
            ..Default::default()
        };

        for index in selected {
            let thread = &mut threads[index];
            if thread.category.is_some() {
                summary.already_categorized += 1;
                continue;
            }

            match self.ask(thread, userdata)? {
                Some(created) => {
                    summary.assigned += 1;
                    if created {
                        summary.created += 1;
                    }
                }
                None => {
                    tracing::info!(thread = %thread.id, "Input ended, stopping classification");
                    summary.interrupted = true;
                    break;
                }
            }
        }

        tracing::info!(
            considered = summary.considered,
            already_categorized = summary.already_categorized,
            assigned = summary.assigned,
            created = summary.created,
            interrupted = summary.interrupted,
            "Classification finished"
        );
        Ok(summary)
    }

    /// Prompt until `thread` is assigned.
    ///
    /// Returns `Some(created_new_category)` once assigned and saved, or
    /// `None` at end of input.
    fn ask(&mut self, thread: &mut Thread, userdata: &mut UserData) -> Result<Option<bool>> {
        loop {
            let menu: Vec<(String, String)> = userdata
                .categories_as_list()
                .iter()
                .map(|c| (c.slug().to_string(), c.display_name().to_string()))
                .collect();

            writeln!(self.output, "{}", thread.display_name)?;
            writeln!(self.output)?;
            for (i, (_, name)) in menu.iter().enumerate() {
                writeln!(self.output, "{:4} - {}", i, name)?;
            }
            writeln!(self.output)?;
            write!(self.output, "{}", PROMPT)?;
            self.output.flush()?;

            // GBK terminals send bytes that are not UTF-8
            let mut buf = Vec::new();
            if self.input.read_until(b'\n', &mut buf)? == 0 {
                return Ok(None);
            }
            let line = String::from_utf8_lossy(&buf);

            let (slug, created) = match Selection::parse(&line, menu.len()) {
                None => {
                    writeln!(self.output, "Please enter a number or a category name.")?;
                    continue;
                }
                Some(Selection::Index(i)) => (menu[i].0.clone(), false),
                Some(Selection::Name(name)) => {
                    let slug = slugify(&name);
                    if userdata.contains(&slug) {
                        (slug, false)
                    } else {
                        match Category::new(&name) {
                            Ok(category) => {
                                let slug = category.slug().to_string();
                                userdata.add_category(category)?;
                                (slug, true)
                            }
                            Err(Error::InvalidName(_)) => {
                                writeln!(
                                    self.output,
                                    "{:?} needs at least one letter or digit (a-z, 0-9).",
                                    name
                                )?;
                                continue;
                            }
                            Err(e) => return Err(e),
                        }
                    }
                }
            };

            userdata.assign(&slug, thread)?;
            userdata.save()?;
            writeln!(self.output)?;

            tracing::info!(thread = %thread.id, category = %slug, created, "Categorized thread");
            return Ok(Some(created));
        }
    }
}
