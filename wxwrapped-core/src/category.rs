//! Categories: user-named buckets of conversation threads.

use std::collections::BTreeSet;

use crate::error::{Error, Result};
use crate::slug::slugify;
use crate::types::Thread;

/// A named grouping of threads.
///
/// The slug is derived from the display name once, at construction, and is
/// the key under which the category lives in [`UserData`](crate::UserData).
/// Members are thread identifiers, not copies of the threads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    display_name: String,
    slug: String,
    threads: BTreeSet<String>,
}

impl Category {
    /// Create an empty category.
    ///
    /// Fails with [`Error::InvalidName`] when the trimmed name is empty or
    /// contains no ASCII letters or digits to build a slug from.
    pub fn new(display_name: &str) -> Result<Self> {
        let display_name = display_name.trim();
        let slug = slugify(display_name);
        if display_name.is_empty() || slug.is_empty() {
            return Err(Error::InvalidName(display_name.to_string()));
        }
        Ok(Self {
            display_name: display_name.to_string(),
            slug,
            threads: BTreeSet::new(),
        })
    }

    /// Rebuild a category from persisted membership.
    pub(crate) fn with_members<I>(display_name: &str, members: I) -> Result<Self>
    where
        I: IntoIterator<Item = String>,
    {
        let mut category = Self::new(display_name)?;
        category.threads.extend(members);
        Ok(category)
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn slug(&self) -> &str {
        &self.slug
    }

    /// Add a thread to this category and point the thread back at it.
    ///
    /// Adding the same thread twice has no further effect.
    pub fn add_thread(&mut self, thread: &mut Thread) {
        if self.threads.insert(thread.id.clone()) {
            tracing::debug!(
                category = %self.slug,
                thread = %thread.id,
                "Added thread to category"
            );
        }
        thread.category = Some(self.slug.clone());
    }

    /// Drop a member by identifier. Returns whether it was a member.
    pub(crate) fn remove_thread(&mut self, thread_id: &str) -> bool {
        self.threads.remove(thread_id)
    }

    /// Whether a thread with this identifier is a member.
    pub fn contains(&self, thread_id: &str) -> bool {
        self.threads.contains(thread_id)
    }

    /// Member thread identifiers, in sorted order.
    pub fn thread_ids(&self) -> impl Iterator<Item = &str> + '_ {
        self.threads.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.threads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.threads.is_empty()
    }
}
