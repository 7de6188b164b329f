//! Preferred names for group chats.
//!
//! Many group chats have no name, or one that makes sense only to their
//! members. An optional JSON object maps the name stored in the database to
//! the name to show in the report:
//!
//! ```json
//! { "张三、李四、王五": "Hiking Crew", "Spam Group": "" }
//! ```
//!
//! An empty alias hides the chat from group rankings.

use std::collections::HashMap;
use std::path::Path;

/// Group chat name overrides, loaded once per run.
#[derive(Debug, Clone, Default)]
pub struct GroupAliases {
    aliases: HashMap<String, String>,
}

impl GroupAliases {
    /// Load aliases from `path`.
    ///
    /// A missing or malformed file yields no aliases.
    pub fn load(path: &Path) -> Self {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                tracing::debug!(path = %path.display(), error = %e, "No group chat aliases");
                return Self::default();
            }
        };

        match serde_json::from_str::<HashMap<String, String>>(&content) {
            Ok(aliases) => {
                tracing::info!(path = %path.display(), count = aliases.len(), "Loaded group chat aliases");
                Self { aliases }
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Malformed group chat aliases, ignoring");
                Self::default()
            }
        }
    }

    /// Build from in-memory pairs.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            aliases: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Preferred name for `original`, or `original` itself.
    pub fn resolve<'a>(&'a self, original: &'a str) -> &'a str {
        self.aliases
            .get(original)
            .map(String::as_str)
            .unwrap_or(original)
    }

    pub fn len(&self) -> usize {
        self.aliases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.aliases.is_empty()
    }
}
