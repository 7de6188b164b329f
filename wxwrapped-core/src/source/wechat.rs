//! Reader for a decrypted WeChat message database (`EnMicroMsg.db`).
//!
//! Only two tables are read:
//! - `rcontact(username, nickname, conRemark)` for display names
//! - `message(msgId, talker, isSend, createTime)` for messages, with
//!   `createTime` in milliseconds since the epoch
//!
//! The database is opened read-only.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use chrono::{DateTime, TimeZone, Utc};
use rusqlite::{Connection, OpenFlags};

use super::ThreadSource;
use crate::error::{Error, Result};
use crate::types::{Message, Thread, ThreadKind};

/// Suffix WeChat gives chatroom usernames.
const CHATROOM_SUFFIX: &str = "@chatroom";

/// Prefix of official (brand) account usernames.
const OFFICIAL_PREFIX: &str = "gh_";

/// Built-in helper accounts that are not people.
const SYSTEM_ACCOUNTS: &[&str] = &[
    "filehelper",
    "weixin",
    "fmessage",
    "medianote",
    "floatbottle",
    "qqmail",
    "qmessage",
    "tmessage",
    "qqsync",
    "newsapp",
    "blogapp",
    "masssendapp",
    "feedsapp",
    "voip",
    "voipapp",
    "voicevoipapp",
    "voiceinputapp",
    "qqfriend",
    "readerapp",
    "notifymessage",
    "notification_messages",
    "officialaccounts",
    "brandsessionholder",
    "helper_entry",
    "linkedinplugin",
    "lbsapp",
    "shakeapp",
];

/// Decide what kind of conversation a talker username belongs to.
pub fn classify_username(username: &str) -> ThreadKind {
    if username.ends_with(CHATROOM_SUFFIX) {
        ThreadKind::Group
    } else if username.starts_with(OFFICIAL_PREFIX) || SYSTEM_ACCOUNTS.contains(&username) {
        ThreadKind::Official
    } else {
        ThreadKind::Individual
    }
}

/// First non-empty of remark, nickname, username.
fn display_name(username: &str, nickname: Option<String>, remark: Option<String>) -> String {
    remark
        .filter(|s| !s.trim().is_empty())
        .or_else(|| nickname.filter(|s| !s.trim().is_empty()))
        .unwrap_or_else(|| username.to_string())
}

/// A decrypted WeChat database on disk.
pub struct WeChatDatabase {
    path: PathBuf,
}

impl WeChatDatabase {
    /// Point at the database file. Fails if it does not exist.
    pub fn open(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("chat database not found: {}", path.display()),
            )));
        }
        Ok(Self {
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn connect(&self) -> Result<Connection> {
        let conn = Connection::open_with_flags(
            &self.path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        Ok(conn)
    }

    fn load_display_names(conn: &Connection) -> Result<HashMap<String, String>> {
        let mut stmt = conn.prepare("SELECT username, nickname, conRemark FROM rcontact")?;
        let rows = stmt.query_map([], |row| {
            let username: String = row.get(0)?;
            let nickname: Option<String> = row.get(1)?;
            let remark: Option<String> = row.get(2)?;
            Ok((username, nickname, remark))
        })?;

        let mut names = HashMap::new();
        let mut skipped = 0usize;
        for row in rows {
            match row {
                Ok((username, nickname, remark)) => {
                    let name = display_name(&username, nickname, remark);
                    names.insert(username, name);
                }
                Err(e) => {
                    skipped += 1;
                    tracing::debug!(error = %e, "Unreadable contact row");
                }
            }
        }

        if skipped > 0 {
            tracing::warn!(skipped, "Skipped contacts that could not be read");
        }
        Ok(names)
    }
}

fn timestamp_from_millis(ms: i64) -> Option<DateTime<Utc>> {
    Utc.timestamp_millis_opt(ms).single()
}

impl ThreadSource for WeChatDatabase {
    fn load_threads(&self) -> Result<Vec<Thread>> {
        let conn = self.connect()?;
        let names = Self::load_display_names(&conn)?;

        let mut stmt = conn.prepare(
            "SELECT talker, isSend, createTime FROM message
             WHERE talker IS NOT NULL AND talker != ''
             ORDER BY createTime ASC, msgId ASC",
        )?;
        let rows = stmt.query_map([], |row| {
            let talker: String = row.get(0)?;
            let is_send: i64 = row.get(1)?;
            let create_time: i64 = row.get(2)?;
            Ok((talker, is_send, create_time))
        })?;

        let mut threads: Vec<Thread> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();
        let mut skipped = 0usize;

        for row in rows {
            let (talker, is_send, create_time) = row?;
            let Some(timestamp) = timestamp_from_millis(create_time) else {
                skipped += 1;
                continue;
            };

            let i = match index.get(&talker) {
                Some(&i) => i,
                None => {
                    let name = names
                        .get(&talker)
                        .cloned()
                        .unwrap_or_else(|| talker.clone());
                    threads.push(Thread::new(talker.clone(), name, classify_username(&talker)));
                    index.insert(talker, threads.len() - 1);
                    threads.len() - 1
                }
            };
            threads[i].messages.push(Message {
                timestamp,
                sent: is_send == 1,
            });
        }

        if skipped > 0 {
            tracing::warn!(skipped, "Skipped messages with invalid timestamps");
        }
        tracing::info!(
            path = %self.path.display(),
            threads = threads.len(),
            messages = threads.iter().map(|t| t.messages.len()).sum::<usize>(),
            "Loaded chat database"
        );
        Ok(threads)
    }
}
