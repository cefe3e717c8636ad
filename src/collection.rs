//! Icon collection index flattening.
//!
//! An icon collection arrives as a hierarchical index (categories, aliases,
//! hidden and uncategorized entries). [`flatten`] turns it into the flat,
//! deduplicated list of visible icon names used by search and browsing.
//!
//! Collections can hold tens of thousands of names, so the work is split
//! into fixed-size batches with a yield to the scheduler after each one.
//! The routine never runs batches in parallel; it only gives other tasks on
//! the same runtime a chance to run in between.
//!
//! # Example
//!
//! ```
//! use icon_styler::{CollectionIndex, flatten};
//!
//! # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
//! let index = CollectionIndex::from_json(r#"{
//!     "uncategorized": ["a", "b"],
//!     "categories": { "x": ["b", "c"] },
//!     "hidden": ["c"],
//!     "aliases": { "a": "z" }
//! }"#).unwrap();
//!
//! assert_eq!(flatten(&index).await, vec!["b".to_string()]);
//! # });
//! ```

use std::collections::HashSet;
use std::fmt;

use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};

/// Number of entries processed between two yields.
pub const FLATTEN_BATCH_SIZE: usize = 1000;

// ============================================================================
// CollectionIndex
// ============================================================================

/// The index of an icon collection, as returned by the collection API.
///
/// Every field is optional; missing ones default to empty. Unknown fields
/// are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollectionIndex {
    /// Collection prefix, e.g. `mdi`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Total number of icons as reported by the API.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<u64>,

    /// Alias name to target icon name. Alias names are never listed.
    pub aliases: IndexMap<String, String>,

    /// Category name to the icons it contains, in stored order.
    pub categories: IndexMap<String, Vec<String>>,

    /// Icons that exist but must not be listed.
    pub hidden: Vec<String>,

    /// Icons that belong to no category.
    pub uncategorized: Vec<String>,
}

impl CollectionIndex {
    /// Deserializes an index from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

// ============================================================================
// Batching
// ============================================================================

/// Calls `f` on every item, yielding to the scheduler after each batch of
/// `batch_size` items.
///
/// A `batch_size` of zero is treated as one. Returns the number of batches.
pub async fn for_each_batch<'a, T>(
    items: &'a [T],
    batch_size: usize,
    mut f: impl FnMut(&'a T),
) -> usize {
    let mut batches = 0;
    for chunk in items.chunks(batch_size.max(1)) {
        chunk.iter().for_each(&mut f);
        batches += 1;
        tokio::task::yield_now().await;
    }
    batches
}

/// Flattens `index` into the visible icon names.
///
/// Equivalent to [`flatten_with`] using [`FLATTEN_BATCH_SIZE`].
pub async fn flatten(index: &CollectionIndex) -> Vec<String> {
    flatten_with(index, FLATTEN_BATCH_SIZE).await
}

/// Flattens `index` into the visible icon names, yielding after every
/// `batch_size` entries.
///
/// Names from `uncategorized` are added first, then each category in stored
/// order. Every `hidden` name and every alias key is then removed. The
/// result has no duplicates and keeps the insertion order of the names that
/// survive.
pub async fn flatten_with(index: &CollectionIndex, batch_size: usize) -> Vec<String> {
    let mut icons: IndexSet<String> = IndexSet::new();
    let mut batches = 0;

    batches += for_each_batch(&index.uncategorized, batch_size, |name| {
        icons.insert(name.clone());
    })
    .await;

    for names in index.categories.values() {
        batches += for_each_batch(names, batch_size, |name| {
            icons.insert(name.clone());
        })
        .await;
    }

    // Removals are collected first and applied in one pass over the set
    let mut removed: HashSet<&str> =
        HashSet::with_capacity(index.hidden.len() + index.aliases.len());
    batches += for_each_batch(&index.hidden, batch_size, |name| {
        removed.insert(name.as_str());
    })
    .await;

    let alias_names: Vec<&String> = index.aliases.keys().collect();
    batches += for_each_batch(&alias_names, batch_size, |name| {
        removed.insert(name.as_str());
    })
    .await;

    if !removed.is_empty() {
        icons.retain(|name| !removed.contains(name.as_str()));
    }

    tracing::debug!(
        prefix = index.prefix.as_deref().unwrap_or_default(),
        visible = icons.len(),
        batches,
        "flattened icon collection"
    );

    icons.into_iter().collect()
}

// ============================================================================
// IconName
// ============================================================================

/// A fully qualified icon name, `prefix:name`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IconName {
    pub prefix: String,
    pub name: String,
}

impl IconName {
    pub fn new(prefix: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            name: name.into(),
        }
    }

    /// Parses `prefix:name`. Returns `None` if either part is empty or the
    /// separator is missing.
    pub fn parse(qualified: &str) -> Option<Self> {
        let (prefix, name) = qualified.split_once(':')?;
        if prefix.is_empty() || name.is_empty() {
            return None;
        }
        Some(Self::new(prefix, name))
    }
}

impl fmt::Display for IconName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.prefix, self.name)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn names(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[tokio::test]
    async fn hidden_and_aliases_are_removed() {
        let index = CollectionIndex {
            uncategorized: names(&["a", "b"]),
            categories: IndexMap::from([("x".to_string(), names(&["b", "c"]))]),
            hidden: names(&["c"]),
            aliases: IndexMap::from([("a".to_string(), "z".to_string())]),
            ..Default::default()
        };

        assert_eq!(flatten(&index).await, names(&["b"]));
    }

    #[tokio::test]
    async fn empty_index() {
        assert!(flatten(&CollectionIndex::default()).await.is_empty());

        let index = CollectionIndex::from_json("{}").unwrap();
        assert!(flatten(&index).await.is_empty());
    }

    #[tokio::test]
    async fn duplicates_appear_once() {
        let index = CollectionIndex {
            uncategorized: names(&["a", "b", "a"]),
            categories: IndexMap::from([
                ("x".to_string(), names(&["b", "c"])),
                ("y".to_string(), names(&["c", "a", "d"])),
            ]),
            ..Default::default()
        };

        assert_eq!(flatten(&index).await, names(&["a", "b", "c", "d"]));
    }

    #[tokio::test]
    async fn removing_unknown_names_is_noop() {
        let index = CollectionIndex {
            uncategorized: names(&["a"]),
            hidden: names(&["missing"]),
            aliases: IndexMap::from([("other".to_string(), "a".to_string())]),
            ..Default::default()
        };

        assert_eq!(flatten(&index).await, names(&["a"]));
    }

    #[tokio::test]
    async fn categories_follow_stored_order() {
        let index = CollectionIndex::from_json(
            r#"{ "categories": { "zeta": ["z1", "z2"], "alpha": ["a1"] } }"#,
        )
        .unwrap();

        assert_eq!(flatten(&index).await, names(&["z1", "z2", "a1"]));
    }

    #[tokio::test]
    async fn large_collection_is_batched() {
        let uncategorized: Vec<String> = (0..2500).map(|i| format!("icon-{i}")).collect();
        let hidden: Vec<String> = (0..2500).step_by(2).map(|i| format!("icon-{i}")).collect();
        let index = CollectionIndex {
            uncategorized: uncategorized.clone(),
            hidden,
            ..Default::default()
        };

        let result = flatten(&index).await;
        assert_eq!(result.len(), 1250);
        assert!(result.iter().all(|n| {
            let i: usize = n.trim_start_matches("icon-").parse().unwrap();
            i % 2 == 1
        }));

        let unique: HashSet<_> = result.iter().collect();
        assert_eq!(unique.len(), result.len());
    }

    #[tokio::test]
    async fn large_hidden_list_keeps_survivor_order() {
        let uncategorized: Vec<String> = (0..60_000).map(|i| format!("icon-{i}")).collect();
        let hidden: Vec<String> = (0..60_000)
            .rev()
            .filter(|i| i % 2 == 0)
            .map(|i| format!("icon-{i}"))
            .collect();
        let aliases: IndexMap<String, String> = (0..60_000)
            .filter(|i| i % 3 == 0)
            .map(|i| (format!("icon-{i}"), "icon-1".to_string()))
            .collect();
        let index = CollectionIndex {
            uncategorized,
            hidden,
            aliases,
            ..Default::default()
        };

        let expected: Vec<String> = (0..60_000)
            .filter(|i| i % 2 == 1 && i % 3 != 0)
            .map(|i| format!("icon-{i}"))
            .collect();
        assert_eq!(flatten(&index).await, expected);
    }

    #[tokio::test]
    async fn batch_count() {
        let items: Vec<u32> = (0..2001).collect();
        let mut seen = 0;
        let batches = for_each_batch(&items, 1000, |_| seen += 1).await;
        assert_eq!(batches, 3);
        assert_eq!(seen, 2001);

        // Zero batch size still makes progress
        assert_eq!(for_each_batch(&items[..3], 0, |_| {}).await, 3);
        assert_eq!(for_each_batch::<u32>(&[], 10, |_| {}).await, 0);
    }

    #[tokio::test]
    async fn other_tasks_run_between_batches() {
        use std::sync::Arc;
        use std::sync::atomic::{AtomicBool, Ordering};

        let ran = Arc::new(AtomicBool::new(false));
        let flag = ran.clone();
        let observer = tokio::spawn(async move {
            flag.store(true, Ordering::SeqCst);
        });

        let index = CollectionIndex {
            uncategorized: (0..3000).map(|i| i.to_string()).collect(),
            ..Default::default()
        };
        let mut observed_mid_flatten = false;
        let items = index.uncategorized.clone();
        for_each_batch(&items, 1000, |_| {
            observed_mid_flatten |= ran.load(Ordering::SeqCst);
        })
        .await;

        assert!(observed_mid_flatten, "spawned task should run at a yield point");
        observer.await.unwrap();
    }

    #[test]
    fn unknown_fields_ignored() {
        let index = CollectionIndex::from_json(
            r#"{ "prefix": "mdi", "total": 3, "info": { "name": "Material" }, "uncategorized": ["home"] }"#,
        )
        .unwrap();
        assert_eq!(index.prefix.as_deref(), Some("mdi"));
        assert_eq!(index.total, Some(3));
        assert_eq!(index.uncategorized, names(&["home"]));
    }

    #[test]
    fn icon_name_parse() {
        let name = IconName::parse("mdi:home").unwrap();
        assert_eq!(name, IconName::new("mdi", "home"));
        assert_eq!(name.to_string(), "mdi:home");

        assert_eq!(IconName::parse("fa6-solid:arrow-right").unwrap().prefix, "fa6-solid");
        assert!(IconName::parse("home").is_none());
        assert!(IconName::parse(":home").is_none());
        assert!(IconName::parse("mdi:").is_none());
    }
}
