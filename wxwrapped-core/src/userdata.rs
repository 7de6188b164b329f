//! User data store: categories and their members, persisted as JSON.
//!
//! The file maps category slug to display name and member thread ids:
//!
//! ```json
//! {
//!   "family": { "display_name": "Family", "threads": ["wxid_mom", "wxid_dad"] }
//! }
//! ```
//!
//! Loading is best-effort. A missing or malformed file yields an empty store
//! so a fresh run can always start classifying. Saving rewrites the whole
//! file through a temp file and a rename.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::category::Category;
use crate::error::{Error, Result};
use crate::types::Thread;

/// On-disk form of a [`Category`].
#[derive(Debug, Serialize, Deserialize)]
struct StoredCategory {
    display_name: String,
    #[serde(default)]
    threads: Vec<String>,
}

/// Owns every [`Category`], keyed by slug.
#[derive(Debug)]
pub struct UserData {
    path: PathBuf,
    categories: BTreeMap<String, Category>,
}

impl UserData {
    /// An empty store that will save to `path`.
    pub fn empty(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            categories: BTreeMap::new(),
        }
    }

    /// Load the store from `path` and link `threads` to their categories.
    ///
    /// Never fails: unreadable or malformed files are logged and treated as
    /// absent.
    pub fn initialize(path: impl Into<PathBuf>, threads: &mut [Thread]) -> Self {
        let mut userdata = Self::empty(path);

        let content = match std::fs::read_to_string(&userdata.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(path = %userdata.path.display(), "No userdata file, starting empty");
                return userdata;
            }
            Err(e) => {
                tracing::warn!(path = %userdata.path.display(), error = %e, "Failed to read userdata, starting empty");
                return userdata;
            }
        };

        let stored: BTreeMap<String, StoredCategory> = match serde_json::from_str(&content) {
            Ok(stored) => stored,
            Err(e) => {
                tracing::warn!(path = %userdata.path.display(), error = %e, "Malformed userdata, starting empty");
                return userdata;
            }
        };

        // A thread belongs to at most one category; the first listing wins
        let mut owners: HashMap<String, String> = HashMap::new();
        for (key, entry) in stored {
            let mut category = match Category::with_members(&entry.display_name, entry.threads) {
                Ok(category) => category,
                Err(e) => {
                    tracing::warn!(key = %key, error = %e, "Skipping stored category");
                    continue;
                }
            };
            if category.slug() != key {
                tracing::warn!(key = %key, slug = %category.slug(), "Re-keying stored category");
            }
            if userdata.categories.contains_key(category.slug()) {
                tracing::warn!(slug = %category.slug(), "Skipping duplicate stored category");
                continue;
            }
            let claimed: Vec<String> = category
                .thread_ids()
                .filter(|id| owners.contains_key(*id))
                .map(str::to_string)
                .collect();
            for id in claimed {
                tracing::warn!(
                    thread = %id,
                    kept = %owners[&id],
                    dropped = %category.slug(),
                    "Thread listed under two categories"
                );
                category.remove_thread(&id);
            }
            for id in category.thread_ids() {
                owners.insert(id.to_string(), category.slug().to_string());
            }
            userdata
                .categories
                .insert(category.slug().to_string(), category);
        }

        let linked = userdata.relink(threads);
        tracing::info!(
            path = %userdata.path.display(),
            categories = userdata.categories.len(),
            linked_threads = linked,
            "Loaded userdata"
        );

        userdata
    }

    /// Point each thread at the category that lists it as a member.
    ///
    /// Returns how many threads were linked.
    fn relink(&self, threads: &mut [Thread]) -> usize {
        let mut owner: HashMap<&str, &str> = HashMap::new();
        for category in self.categories.values() {
            for id in category.thread_ids() {
                owner.entry(id).or_insert(category.slug());
            }
        }

        let mut linked = 0;
        for thread in threads.iter_mut() {
            if let Some(slug) = owner.get(thread.id.as_str()) {
                thread.category = Some((*slug).to_string());
                linked += 1;
            }
        }
        linked
    }

    /// Path the store saves to.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Add a new category.
    ///
    /// Fails with [`Error::DuplicateSlug`] if its slug is already taken.
    pub fn add_category(&mut self, category: Category) -> Result<()> {
        if self.categories.contains_key(category.slug()) {
            return Err(Error::DuplicateSlug(category.slug().to_string()));
        }
        tracing::info!(slug = %category.slug(), name = %category.display_name(), "Added category");
        self.categories
            .insert(category.slug().to_string(), category);
        Ok(())
    }

    pub fn get(&self, slug: &str) -> Option<&Category> {
        self.categories.get(slug)
    }

    pub fn contains(&self, slug: &str) -> bool {
        self.categories.contains_key(slug)
    }

    /// Add `thread` to the category with `slug`.
    pub fn assign(&mut self, slug: &str, thread: &mut Thread) -> Result<()> {
        let category = self
            .categories
            .get_mut(slug)
            .ok_or_else(|| Error::CategoryNotFound(slug.to_string()))?;
        category.add_thread(thread);
        Ok(())
    }

    /// Categories sorted by display name (slug breaks ties).
    ///
    /// The order is stable across calls, so menu indices stay valid between
    /// listings.
    pub fn categories_as_list(&self) -> Vec<&Category> {
        let mut list: Vec<&Category> = self.categories.values().collect();
        list.sort_by(|a, b| {
            a.display_name()
                .cmp(b.display_name())
                .then_with(|| a.slug().cmp(b.slug()))
        });
        list
    }

    /// Iterate `(slug, category)` pairs in slug order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Category)> + '_ {
        self.categories.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Write the whole store to disk, replacing the previous file.
    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let stored: BTreeMap<&str, StoredCategory> = self
            .categories
            .iter()
            .map(|(slug, category)| {
                (
                    slug.as_str(),
                    StoredCategory {
                        display_name: category.display_name().to_string(),
                        threads: category.thread_ids().map(str::to_string).collect(),
                    },
                )
            })
            .collect();
        let payload = serde_json::to_string_pretty(&stored)?;

        // Write atomically (temp file + rename)
        let temp_path = self.path.with_extension("json.tmp");
        std::fs::write(&temp_path, payload)?;
        std::fs::rename(&temp_path, &self.path)?;

        tracing::debug!(path = %self.path.display(), categories = stored.len(), "Saved userdata");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::slug::slugify;
    use crate::types::ThreadKind;
    use tempfile::TempDir;

    fn thread(id: &str) -> Thread {
        Thread::new(id, id.trim_start_matches("wxid_"), ThreadKind::Individual)
    }

    #[test]
    fn test_missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let mut threads = vec![thread("wxid_a")];
        let userdata = UserData::initialize(dir.path().join("userdata.json"), &mut threads);
        assert!(userdata.is_empty());
        assert!(threads[0].category.is_none());
    }

    #[test]
    fn test_malformed_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("userdata.json");
        std::fs::write(&path, "{ not json").unwrap();

        let userdata = UserData::initialize(&path, &mut []);
        assert!(userdata.is_empty());
    }

    #[test]
    fn test_add_category_rejects_duplicate_slug() {
        let mut userdata = UserData::empty("unused.json");
        userdata.add_category(Category::new("Family").unwrap()).unwrap();

        let err = userdata
            .add_category(Category::new("  family!").unwrap())
            .unwrap_err();
        assert!(matches!(err, Error::DuplicateSlug(ref s) if s == "family"));
        assert_eq!(userdata.len(), 1);
    }

    #[test]
    fn test_categories_as_list_sorted_by_display_name() {
        let mut userdata = UserData::empty("unused.json");
        for name in ["Work", "Family", "Classmates"] {
            userdata.add_category(Category::new(name).unwrap()).unwrap();
        }

        let names: Vec<_> = userdata
            .categories_as_list()
            .iter()
            .map(|c| c.display_name())
            .collect();
        assert_eq!(names, vec!["Classmates", "Family", "Work"]);
    }

    #[test]
    fn test_assign_unknown_category() {
        let mut userdata = UserData::empty("unused.json");
        let mut t = thread("wxid_a");
        assert!(matches!(
            userdata.assign("nope", &mut t),
            Err(Error::CategoryNotFound(_))
        ));
    }

    #[test]
    fn test_save_and_initialize_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("userdata.json");

        let mut threads = vec![thread("wxid_a"), thread("wxid_b"), thread("wxid_c")];
        let mut userdata = UserData::empty(&path);
        userdata.add_category(Category::new("Family").unwrap()).unwrap();
        userdata.add_category(Category::new("Work").unwrap()).unwrap();
        userdata.assign("family", &mut threads[0]).unwrap();
        userdata.assign("work", &mut threads[2]).unwrap();
        userdata.save().unwrap();
        assert!(!path.with_extension("json.tmp").exists());

        let mut reloaded_threads = vec![thread("wxid_a"), thread("wxid_b"), thread("wxid_c")];
        let reloaded = UserData::initialize(&path, &mut reloaded_threads);

        assert_eq!(reloaded.len(), 2);
        assert_eq!(reloaded.get("family"), userdata.get("family"));
        assert_eq!(reloaded.get("work"), userdata.get("work"));
        assert_eq!(reloaded_threads[0].category_slug(), Some("family"));
        assert_eq!(reloaded_threads[1].category_slug(), None);
        assert_eq!(reloaded_threads[2].category_slug(), Some("work"));
    }

    #[test]
    fn test_initialize_rekeys_mismatched_slugs() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("userdata.json");
        std::fs::write(
            &path,
            r#"{
                "fam": {"display_name": "Family", "threads": ["wxid_a"]},
                "family": {"display_name": "FAMILY", "threads": ["wxid_b"]},
                "blank": {"display_name": "  ", "threads": []}
            }"#,
        )
        .unwrap();

        let userdata = UserData::initialize(&path, &mut []);

        assert_eq!(userdata.len(), 1);
        for (key, category) in userdata.iter() {
            assert_eq!(key, slugify(category.display_name()));
        }
    }

    #[test]
    fn test_initialize_keeps_thread_in_one_category() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("userdata.json");
        std::fs::write(
            &path,
            r#"{
                "a": {"display_name": "A", "threads": ["wxid_x", "wxid_y"]},
                "b": {"display_name": "B", "threads": ["wxid_x", "wxid_z"]}
            }"#,
        )
        .unwrap();

        let mut threads = vec![thread("wxid_x"), thread("wxid_z")];
        let userdata = UserData::initialize(&path, &mut threads);

        assert_eq!(threads[0].category_slug(), Some("a"));
        assert_eq!(threads[1].category_slug(), Some("b"));
        assert!(userdata.get("a").unwrap().contains("wxid_x"));
        assert!(!userdata.get("b").unwrap().contains("wxid_x"));
        assert!(userdata.get("b").unwrap().contains("wxid_z"));

        userdata.save().unwrap();
        let saved = std::fs::read_to_string(&path).unwrap();
        assert_eq!(saved.matches("wxid_x").count(), 1);
    }
}
