//! Core domain types for wxwrapped
//!
//! These types represent the in-memory model built from the chat database.
//!
//! ## Terminology
//!
//! | Term | Definition |
//! |------|------------|
//! | **Owner** | The person who exported the archive; their messages are "sent" |
//! | **Thread** | One conversation: a one-on-one chat, a group chat, or an official account |
//! | **Message** | A single chat event inside a Thread |
//! | **Category** | A user-named bucket of individual Threads (see [`crate::category`]) |
//! | **Bucket** | Aggregation key: a category slug, `other`, or `group-chats` |

use chrono::{DateTime, Utc};

// ============================================
// Thread
// ============================================

/// What kind of conversation a [`Thread`] is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ThreadKind {
    /// One-on-one chat with a person
    Individual,
    /// Group chat (chatroom)
    Group,
    /// Official account, system helper, or other non-human contact
    Official,
}

impl ThreadKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ThreadKind::Individual => "individual",
            ThreadKind::Group => "group",
            ThreadKind::Official => "official",
        }
    }
}

impl std::fmt::Display for ThreadKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One conversation from the chat archive.
///
/// Threads are owned by the list returned from a
/// [`ThreadSource`](crate::source::ThreadSource). Categories only refer to
/// them by [`Thread::id`].
#[derive(Debug, Clone)]
pub struct Thread {
    /// Contact username, stable across exports (persisted in userdata)
    pub id: String,
    /// Name shown to the owner (remark, nickname, or username)
    pub display_name: String,
    /// Individual, group, or official
    pub kind: ThreadKind,
    /// Messages in time order
    pub messages: Vec<Message>,
    /// Slug of the category this thread belongs to, if any
    pub category: Option<String>,
}

impl Thread {
    /// Create a thread with no messages and no category.
    pub fn new(id: impl Into<String>, display_name: impl Into<String>, kind: ThreadKind) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            kind,
            messages: Vec::new(),
            category: None,
        }
    }

    /// Builder-style helper for attaching messages.
    pub fn with_messages(mut self, messages: Vec<Message>) -> Self {
        self.messages = messages;
        self
    }

    pub fn is_group(&self) -> bool {
        self.kind == ThreadKind::Group
    }

    /// True for one-on-one chats with a real person.
    pub fn is_individual(&self) -> bool {
        self.kind == ThreadKind::Individual
    }

    /// Category slug, if the thread has been categorized.
    pub fn category_slug(&self) -> Option<&str> {
        self.category.as_deref()
    }

    /// Messages whose timestamp falls in `[start, end)`.
    pub fn messages_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> impl Iterator<Item = &Message> + '_ {
        self.messages
            .iter()
            .filter(move |m| m.timestamp >= start && m.timestamp < end)
    }
}

// ============================================
// Message
// ============================================

/// A single chat event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Message {
    /// When the message was sent or received
    pub timestamp: DateTime<Utc>,
    /// True when authored by the archive owner
    pub sent: bool,
}

impl Message {
    pub fn sent(timestamp: DateTime<Utc>) -> Self {
        Self {
            timestamp,
            sent: true,
        }
    }

    pub fn received(timestamp: DateTime<Utc>) -> Self {
        Self {
            timestamp,
            sent: false,
        }
    }
}
