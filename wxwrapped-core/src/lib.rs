//! # wxwrapped-core
//!
//! Core library for wxwrapped - a year in review for a WeChat chat history.
//!
//! This library provides:
//! - Domain types for threads and messages
//! - A reader for decrypted WeChat databases
//! - Categories and the JSON-backed user data store
//! - The interactive classification workflow
//! - Time-windowed aggregation and rankings
//! - Chart and table descriptions, rendered to HTML
//! - Configuration management and logging infrastructure
//!
//! ## Data Flow
//!
//! database → threads → classification (mutates [`UserData`]) →
//! aggregation → rankings → HTML report
//!
//! ## Example
//!
//! ```rust,no_run
//! use wxwrapped_core::report::{build_report, ReportOptions};
//! use wxwrapped_core::source::{ThreadSource, WeChatDatabase};
//! use wxwrapped_core::{GroupAliases, UserData};
//! use std::path::Path;
//!
//! let db = WeChatDatabase::open(Path::new("decrypted.db")).expect("missing database");
//! let mut threads = db.load_threads().expect("failed to read database");
//! let userdata = UserData::initialize("userdata.json", &mut threads);
//! let aliases = GroupAliases::load(Path::new("group_chat_aliases.json"));
//!
//! let report = build_report(&threads, &userdata, &aliases, &ReportOptions::default())
//!     .expect("failed to build report");
//! std::fs::write("chart.html", report.to_html()).expect("failed to write report");
//! ```

// Re-export commonly used items at the crate root
pub use aliases::GroupAliases;
pub use category::Category;
pub use config::Config;
pub use error::{Error, Result};
pub use slug::slugify;
pub use types::*;
pub use userdata::UserData;

// Public modules
pub mod aggregate;
pub mod aliases;
pub mod category;
pub mod classify;
pub mod config;
pub mod error;
pub mod logging;
pub mod ranking;
pub mod report;
pub mod slug;
pub mod source;
pub mod timeline;
pub mod types;
pub mod userdata;
