//! Seeding and reconciling document caches from folders of student files.
//!
//! Each scan folder (photo ids, certificates, cards) is mirrored into one
//! cache document: file path -> region of extracted text. Reconciliation
//! keeps the cache in step with the folder without re-reading files that are
//! already cached.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use trackline_core::{Content, CoreError, Document, DocumentCache, reconcile_cache};

use crate::error::Result;

/// Files in a folder, keyed by uppercased file stem. Subdirectories are
/// skipped.
pub fn list_files(dir: &Path) -> Result<BTreeMap<String, PathBuf>> {
    let mut files = BTreeMap::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let path = entry.path();
        let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) else {
            continue;
        };
        files.insert(stem.to_uppercase(), path);
    }
    Ok(files)
}

/// Build the reconciliation target set for a folder: file path -> lazy text
/// producer. Producers only run for files not yet cached.
pub fn cache_targets(dir: &Path) -> Result<IndexMap<String, Content>> {
    let mut targets = IndexMap::new();
    for (_, path) in list_files(dir)? {
        let key = path.display().to_string();
        targets.insert(key, Content::producer(move || read_text_blocks(&path)));
    }
    Ok(targets)
}

/// Open (or create) the cache document for a folder, reconcile it against
/// the folder's current files, and return it ready for content searches.
/// The caller saves it when done.
pub fn reconciled_cache_for(folder: &Path, cache_path: &Path) -> Result<DocumentCache> {
    let doc = Document::load_or_new(cache_path)?;
    let mut cache = DocumentCache::open(doc);
    reconcile_cache(&mut cache, cache_targets(folder)?);
    Ok(cache)
}

/// Extract a file's text as content blocks, one per non-empty line. Stands
/// in for the OCR step the host platform performed on image scans.
fn read_text_blocks(path: &Path) -> trackline_core::Result<Vec<String>> {
    let content = fs::read_to_string(path)?;
    let blocks: Vec<String> = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect();
    if blocks.is_empty() {
        return Err(CoreError::Producer(format!(
            "no text content extracted from {}",
            path.display()
        )));
    }
    Ok(blocks)
}
