//! Keyed cache over a single persistent document.
//!
//! A [`DocumentCache`] owns one [`Document`] for its whole lifetime and keeps
//! an insertion-ordered index from string keys to the document's named
//! ranges. The index is a view over document state: it is rebuilt from the
//! document's existing ranges at open time, and every mutation keeps keys and
//! range markers in lockstep.

mod reconcile;

pub use reconcile::reconcile_cache;

use std::collections::HashSet;

use indexmap::IndexMap;
use regex::Regex;

use crate::document::{BlockId, Document, NamedRange, RangeId};
use crate::error::{CoreError, Result};

/// Content to cache under a key: literal block texts, or a producer invoked
/// lazily so expensive reads never run for keys that are already cached.
pub enum Content {
    Blocks(Vec<String>),
    Producer(Box<dyn FnOnce() -> Result<Vec<String>>>),
}

impl Content {
    pub fn producer(f: impl FnOnce() -> Result<Vec<String>> + 'static) -> Self {
        Content::Producer(Box::new(f))
    }

    fn resolve(self) -> Result<Vec<String>> {
        let blocks = match self {
            Content::Blocks(blocks) => blocks,
            Content::Producer(f) => f()?,
        };
        if blocks.is_empty() {
            return Err(CoreError::EmptyContent);
        }
        Ok(blocks)
    }
}

impl From<Vec<String>> for Content {
    fn from(blocks: Vec<String>) -> Self {
        Content::Blocks(blocks)
    }
}

/// A cached region: one named range viewed against its document.
#[derive(Clone, Copy)]
pub struct Region<'a> {
    doc: &'a Document,
    range: &'a NamedRange,
}

impl<'a> Region<'a> {
    /// The cache key this region is stored under.
    pub fn key(&self) -> &'a str {
        self.range.name()
    }

    pub fn blocks(&self) -> &'a [BlockId] {
        self.range.blocks()
    }

    /// The region's full text: block texts joined with a single space.
    pub fn text(&self) -> String {
        self.doc
            .range_text(self.range.id())
            .unwrap_or_default()
    }
}

/// Cache of keyed content regions inside one exclusively owned document.
pub struct DocumentCache {
    doc: Document,
    index: IndexMap<String, RangeId>,
}

impl DocumentCache {
    /// Open a cache over a document, rebuilding the key index from the
    /// document's existing named ranges. When several ranges share a name the
    /// most recently created one wins.
    pub fn open(doc: Document) -> Self {
        let index = doc
            .named_ranges()
            .iter()
            .map(|range| (range.name().to_string(), range.id()))
            .collect();
        DocumentCache { doc, index }
    }

    pub fn document(&self) -> &Document {
        &self.doc
    }

    /// Hand the backing document back, consuming the cache.
    pub fn into_document(self) -> Document {
        self.doc
    }

    /// Persist the backing document to its file path.
    pub fn save(&mut self) -> Result<std::path::PathBuf> {
        self.doc.save()
    }

    /// Cache content under a key: append the resolved blocks to the document
    /// and mark a named range spanning exactly them.
    ///
    /// On key reuse the new region replaces the old one in the index and the
    /// stale marker is dropped, but the old content stays in the document -
    /// `set` grows it monotonically. Callers wanting replace semantics should
    /// `delete` first. Failures are logged and leave the cache unchanged.
    pub fn set(&mut self, key: &str, content: impl Into<Content>) -> &mut Self {
        if let Err(err) = self.try_set(key, content.into()) {
            log::warn!("failed to cache content for key {key:?}: {err}");
        }
        self
    }

    /// Cache content only if the key is not already present. Producers are
    /// never invoked for keys that are already cached.
    pub fn set_if_key_is_new(&mut self, key: &str, content: impl Into<Content>) {
        if self.does_not_have(key) {
            self.set(key, content);
        }
    }

    pub fn get(&self, key: &str) -> Option<Region<'_>> {
        let range = *self.index.get(key)?;
        self.region(range)
    }

    pub fn has(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    pub fn does_not_have(&self, key: &str) -> bool {
        !self.has(key)
    }

    /// Remove a key: the region's content, its marker, and the index entry.
    /// Just the index entry if the range is already gone from the document.
    pub fn delete(&mut self, key: &str) {
        let Some(range) = self.index.shift_remove(key) else {
            return;
        };
        if self.doc.range(range).is_none() {
            return;
        }
        if let Err(err) = self.doc.remove_range_and_content(range) {
            log::warn!("failed to remove cached content for key {key:?}: {err}");
        }
    }

    /// First region (in insertion order) whose text matches `pattern`,
    /// skipping excluded keys. This is how free text content is associated
    /// back to a structured key without an explicit index.
    pub fn get_range_containing(
        &self,
        pattern: &Regex,
        exclude: &HashSet<String>,
    ) -> Option<Region<'_>> {
        for (key, &range) in &self.index {
            if exclude.contains(key) {
                continue;
            }
            let Some(text) = self.doc.range_text(range) else {
                continue;
            };
            if pattern.is_match(&text) {
                return self.region(range);
            }
        }
        None
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.index.keys().map(String::as_str)
    }

    /// `(key, region)` pairs in insertion order.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            inner: self.index.iter(),
            doc: &self.doc,
        }
    }

    fn try_set(&mut self, key: &str, content: Content) -> Result<()> {
        let blocks = content.resolve()?;
        let ids: Vec<BlockId> = blocks
            .into_iter()
            .map(|text| self.doc.append_block(text))
            .collect();
        let range = self.doc.add_named_range(key, ids)?;
        if let Some(stale) = self.index.insert(key.to_string(), range) {
            self.doc.remove_named_range(stale);
        }
        Ok(())
    }

    fn region(&self, id: RangeId) -> Option<Region<'_>> {
        self.doc.range(id).map(|range| Region {
            doc: &self.doc,
            range,
        })
    }
}

/// Iterator over a cache's `(key, region)` pairs.
pub struct Iter<'a> {
    inner: indexmap::map::Iter<'a, String, RangeId>,
    doc: &'a Document,
}

impl<'a> Iterator for Iter<'a> {
    type Item = (&'a str, Region<'a>);

    fn next(&mut self) -> Option<Self::Item> {
        for (key, &range) in self.inner.by_ref() {
            if let Some(range) = self.doc.range(range) {
                return Some((
                    key.as_str(),
                    Region {
                        doc: self.doc,
                        range,
                    },
                ));
            }
        }
        None
    }
}

impl<'a> IntoIterator for &'a DocumentCache {
    type Item = (&'a str, Region<'a>);
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blocks(texts: &[&str]) -> Vec<String> {
        texts.iter().map(|text| text.to_string()).collect()
    }

    #[test]
    fn test_set_get_delete_scenario() {
        let mut cache = DocumentCache::open(Document::new());
        assert!(cache.is_empty());

        cache.set("k1", Content::producer(|| Ok(vec!["para1".to_string()])));
        assert!(cache.has("k1"));
        assert_eq!(cache.get("k1").unwrap().text(), "para1");

        cache.delete("k1");
        assert!(!cache.has("k1"));
        assert!(cache.get("k1").is_none());
    }

    #[test]
    fn test_set_multiple_blocks_spans_exactly_them() {
        let mut cache = DocumentCache::open(Document::new());
        cache.set("scan", blocks(&["John", "Smith"]));
        let region = cache.get("scan").unwrap();
        assert_eq!(region.blocks().len(), 2);
        assert_eq!(region.text(), "John Smith");
    }

    #[test]
    fn test_failed_producer_leaves_cache_unchanged() {
        let mut cache = DocumentCache::open(Document::new());
        cache.set("good", blocks(&["content"]));
        let doc_blocks = cache.document().blocks().len();

        cache.set(
            "bad",
            Content::producer(|| Err(CoreError::Producer("no text extracted".to_string()))),
        );

        assert!(cache.does_not_have("bad"));
        assert!(cache.has("good"));
        assert_eq!(cache.document().blocks().len(), doc_blocks);
    }

    #[test]
    fn test_empty_content_is_rejected_as_no_op() {
        let mut cache = DocumentCache::open(Document::new());
        cache.set("empty", Vec::<String>::new());
        assert!(cache.does_not_have("empty"));
    }

    #[test]
    fn test_set_on_existing_key_grows_document_but_not_keys() {
        let mut cache = DocumentCache::open(Document::new());
        cache.set("k", blocks(&["old"]));
        let blocks_before = cache.document().blocks().len();

        cache.set("k", blocks(&["new"]));

        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get("k").unwrap().text(), "new");
        // Old content is not reclaimed, but only one marker remains.
        assert_eq!(cache.document().blocks().len(), blocks_before + 1);
        assert_eq!(cache.document().named_ranges().len(), 1);
    }

    #[test]
    fn test_set_if_key_is_new_skips_existing_producer() {
        let mut cache = DocumentCache::open(Document::new());
        cache.set("k", blocks(&["original"]));
        cache.set_if_key_is_new(
            "k",
            Content::producer(|| panic!("producer must not run for cached keys")),
        );
        assert_eq!(cache.get("k").unwrap().text(), "original");
    }

    #[test]
    fn test_open_rebuilds_index_from_document() {
        let mut doc = Document::new();
        let first = doc.append_block("certificate for Ada");
        let second = doc.append_block("card for Lin");
        doc.add_named_range("file-1", vec![first]).unwrap();
        doc.add_named_range("file-2", vec![second]).unwrap();

        let cache = DocumentCache::open(doc);
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get("file-1").unwrap().text(), "certificate for Ada");
        assert_eq!(cache.get("file-2").unwrap().text(), "card for Lin");
    }

    #[test]
    fn test_open_with_duplicate_names_keeps_latest() {
        let mut doc = Document::new();
        let old = doc.append_block("old");
        let new = doc.append_block("new");
        doc.add_named_range("k", vec![old]).unwrap();
        doc.add_named_range("k", vec![new]).unwrap();

        let cache = DocumentCache::open(doc);
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get("k").unwrap().text(), "new");
    }

    #[test]
    fn test_get_range_containing_scans_in_insertion_order() {
        let mut cache = DocumentCache::open(Document::new());
        cache.set("first", blocks(&["certificate of Jane Doe"]));
        cache.set("second", blocks(&["certificate of John Doe"]));

        let pattern = Regex::new("(?i)doe").unwrap();
        let hit = cache.get_range_containing(&pattern, &HashSet::new()).unwrap();
        assert_eq!(hit.key(), "first");
    }

    #[test]
    fn test_get_range_containing_skips_excluded_keys() {
        let mut cache = DocumentCache::open(Document::new());
        cache.set("first", blocks(&["certificate of Jane Doe"]));
        cache.set("second", blocks(&["certificate of John Doe"]));

        let pattern = Regex::new("(?i)doe").unwrap();
        let exclude: HashSet<String> = [String::from("first")].into();
        let hit = cache.get_range_containing(&pattern, &exclude).unwrap();
        assert_eq!(hit.key(), "second");
    }

    #[test]
    fn test_get_range_containing_matches_across_blocks() {
        let mut cache = DocumentCache::open(Document::new());
        cache.set("scan", blocks(&["John", "Smith"]));
        let pattern = Regex::new("John.*Smith").unwrap();
        assert!(cache.get_range_containing(&pattern, &HashSet::new()).is_some());
    }

    #[test]
    fn test_get_range_containing_no_match() {
        let mut cache = DocumentCache::open(Document::new());
        cache.set("scan", blocks(&["nothing relevant"]));
        let pattern = Regex::new("missing").unwrap();
        assert!(cache.get_range_containing(&pattern, &HashSet::new()).is_none());
    }

    #[test]
    fn test_iteration_in_insertion_order() {
        let mut cache = DocumentCache::open(Document::new());
        cache.set("b", blocks(&["2"]));
        cache.set("a", blocks(&["1"]));
        let keys: Vec<&str> = cache.iter().map(|(key, _)| key).collect();
        assert_eq!(keys, vec!["b", "a"]);
        let keys: Vec<&str> = (&cache).into_iter().map(|(key, _)| key).collect();
        assert_eq!(keys, vec!["b", "a"]);
    }

    #[test]
    fn test_delete_keeps_other_regions_intact() {
        let mut cache = DocumentCache::open(Document::new());
        cache.set("a", blocks(&["content a"]));
        cache.set("b", blocks(&["content b"]));
        cache.delete("a");
        assert!(cache.does_not_have("a"));
        assert_eq!(cache.get("b").unwrap().text(), "content b");
        assert_eq!(cache.document().named_ranges().len(), 1);
    }

    #[test]
    fn test_delete_unknown_key_is_a_no_op() {
        let mut cache = DocumentCache::open(Document::new());
        cache.set("a", blocks(&["content"]));
        cache.delete("missing");
        assert_eq!(cache.len(), 1);
    }
}
